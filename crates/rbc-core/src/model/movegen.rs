//! Pseudo-legal move generation and attack detection.
//!
//! Nothing here checks king safety: in reconnaissance blind chess a king may
//! be left en prise and is simply captured.

use crate::model::chess_move::Move;
use crate::model::color::Color;
use crate::model::piece::{KING_DELTAS, KNIGHT_DELTAS, Piece, PieceKind};
use crate::model::position::{CastlingSide, Position};
use crate::model::square::Square;

impl Position {
    /// All pseudo-legal moves for the side to move, castling included.
    pub fn pseudo_legal_moves(&self) -> Vec<Move> {
        let mover = self.turn;
        let mut moves = Vec::with_capacity(48);
        for (from, piece) in self.occupied() {
            if piece.color != mover {
                continue;
            }
            match piece.kind {
                PieceKind::Pawn => self.pawn_moves(from, mover, &mut moves),
                PieceKind::Knight => self.step_moves(from, mover, &KNIGHT_DELTAS, &mut moves),
                PieceKind::King => self.step_moves(from, mover, &KING_DELTAS, &mut moves),
                kind => self.slide_moves(from, mover, kind.slide_dirs(), &mut moves),
            }
        }
        moves.extend(self.castling_moves());
        moves
    }

    /// King moves for each castling right the side to move still holds whose
    /// path between king and rook is empty.
    pub fn castling_moves(&self) -> Vec<Move> {
        let mover = self.turn;
        let rank = mover.back_rank();
        let mut moves = Vec::with_capacity(2);
        for side in CastlingSide::BOTH {
            if !self.castling.has(mover, side) {
                continue;
            }
            let (low, high) = match side {
                CastlingSide::Kingside => (5, 6),
                CastlingSide::Queenside => (1, 3),
            };
            let clear = (low..=high)
                .filter_map(|file| Square::from_coords(file, rank))
                .all(|sq| self.is_empty_at(sq));
            if !clear {
                continue;
            }
            if let (Some(from), Some(to)) = (
                Square::from_coords(4, rank),
                Square::from_coords(side.king_target_file(), rank),
            ) {
                moves.push(Move::new(from, to));
            }
        }
        moves
    }

    pub fn is_pseudo_legal(&self, mv: Move) -> bool {
        if mv.is_null() {
            return false;
        }
        match self.piece_at(mv.from) {
            Some(piece) if piece.color == self.turn => self.pseudo_legal_moves().contains(&mv),
            _ => false,
        }
    }

    pub fn is_en_passant(&self, mv: Move) -> bool {
        let Some(piece) = self.piece_at(mv.from) else {
            return false;
        };
        piece.kind == PieceKind::Pawn
            && Some(mv.to) == self.ep_square
            && mv.to.file() != mv.from.file()
            && self.is_empty_at(mv.to)
    }

    /// True when `mv` lands on an opposing piece or captures en passant.
    pub fn is_capture(&self, mv: Move) -> bool {
        if mv.is_null() {
            return false;
        }
        let lands_on_enemy = self
            .piece_at(mv.to)
            .is_some_and(|piece| piece.color != self.turn);
        lands_on_enemy || self.is_en_passant(mv)
    }

    /// Squares holding `color` pieces that attack `target`, in ascending order.
    pub fn attackers(&self, color: Color, target: Square) -> Vec<Square> {
        let mut found = Vec::new();

        let pawn = Piece::new(PieceKind::Pawn, color);
        for df in [-1i8, 1] {
            if let Some(sq) = target.offset(df, -color.forward()) {
                if self.piece_at(sq) == Some(pawn) {
                    found.push(sq);
                }
            }
        }

        for (kind, deltas) in [
            (PieceKind::Knight, &KNIGHT_DELTAS),
            (PieceKind::King, &KING_DELTAS),
        ] {
            let wanted = Piece::new(kind, color);
            for &(df, dr) in deltas.iter() {
                if let Some(sq) = target.offset(df, dr) {
                    if self.piece_at(sq) == Some(wanted) {
                        found.push(sq);
                    }
                }
            }
        }

        for &(df, dr) in PieceKind::Queen.slide_dirs() {
            let diagonal = df != 0 && dr != 0;
            let mut cursor = target;
            while let Some(sq) = cursor.offset(df, dr) {
                cursor = sq;
                let Some(piece) = self.piece_at(sq) else {
                    continue;
                };
                let slides_here = match piece.kind {
                    PieceKind::Queen => true,
                    PieceKind::Bishop => diagonal,
                    PieceKind::Rook => !diagonal,
                    _ => false,
                };
                if piece.color == color && slides_here {
                    found.push(sq);
                }
                break;
            }
        }

        found.sort();
        found.dedup();
        found
    }

    fn step_moves(&self, from: Square, mover: Color, deltas: &[(i8, i8)], out: &mut Vec<Move>) {
        for &(df, dr) in deltas {
            if let Some(to) = from.offset(df, dr) {
                if self.piece_at(to).is_none_or(|piece| piece.color != mover) {
                    out.push(Move::new(from, to));
                }
            }
        }
    }

    fn slide_moves(&self, from: Square, mover: Color, dirs: &[(i8, i8)], out: &mut Vec<Move>) {
        for &(df, dr) in dirs {
            let mut cursor = from;
            while let Some(to) = cursor.offset(df, dr) {
                cursor = to;
                match self.piece_at(to) {
                    None => out.push(Move::new(from, to)),
                    Some(piece) => {
                        if piece.color != mover {
                            out.push(Move::new(from, to));
                        }
                        break;
                    }
                }
            }
        }
    }

    fn pawn_moves(&self, from: Square, mover: Color, out: &mut Vec<Move>) {
        let forward = mover.forward();
        let start_rank = match mover {
            Color::White => 1,
            Color::Black => 6,
        };

        if let Some(one) = from.offset(0, forward) {
            if self.is_empty_at(one) {
                push_pawn_move(from, one, out);
                if from.rank() == start_rank {
                    if let Some(two) = from.offset(0, 2 * forward) {
                        if self.is_empty_at(two) {
                            out.push(Move::new(from, two));
                        }
                    }
                }
            }
        }

        for df in [-1i8, 1] {
            let Some(to) = from.offset(df, forward) else {
                continue;
            };
            let enemy_there = self.piece_at(to).is_some_and(|piece| piece.color != mover);
            if enemy_there || Some(to) == self.ep_square {
                push_pawn_move(from, to, out);
            }
        }
    }
}

/// Pushes a pawn move, expanding to every promotion on the last rank.
fn push_pawn_move(from: Square, to: Square, out: &mut Vec<Move>) {
    if to.rank() == 0 || to.rank() == 7 {
        for kind in PieceKind::PROMOTIONS.iter().rev() {
            out.push(Move::with_promotion(from, to, *kind));
        }
    } else {
        out.push(Move::new(from, to));
    }
}
