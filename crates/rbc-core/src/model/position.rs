use crate::model::chess_move::Move;
use crate::model::color::Color;
use crate::model::piece::{Piece, PieceKind};
use crate::model::square::Square;
use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CastlingSide {
    Kingside,
    Queenside,
}

impl CastlingSide {
    pub const BOTH: [CastlingSide; 2] = [CastlingSide::Kingside, CastlingSide::Queenside];

    /// Starting file of the rook involved.
    pub const fn rook_file(self) -> u8 {
        match self {
            CastlingSide::Kingside => 7,
            CastlingSide::Queenside => 0,
        }
    }

    /// Destination file of the king.
    pub const fn king_target_file(self) -> u8 {
        match self {
            CastlingSide::Kingside => 6,
            CastlingSide::Queenside => 2,
        }
    }

    /// Destination file of the rook.
    pub const fn rook_target_file(self) -> u8 {
        match self {
            CastlingSide::Kingside => 5,
            CastlingSide::Queenside => 3,
        }
    }
}

/// Four castling flags packed into a byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CastlingRights(u8);

impl CastlingRights {
    pub const NONE: CastlingRights = CastlingRights(0);
    pub const ALL: CastlingRights = CastlingRights(0b1111);

    const fn bit(color: Color, side: CastlingSide) -> u8 {
        let base = match color {
            Color::White => 0,
            Color::Black => 2,
        };
        let offset = match side {
            CastlingSide::Kingside => 0,
            CastlingSide::Queenside => 1,
        };
        1 << (base + offset)
    }

    pub const fn has(self, color: Color, side: CastlingSide) -> bool {
        self.0 & Self::bit(color, side) != 0
    }

    pub const fn with(self, color: Color, side: CastlingSide) -> Self {
        CastlingRights(self.0 | Self::bit(color, side))
    }

    pub const fn without(self, color: Color, side: CastlingSide) -> Self {
        CastlingRights(self.0 & !Self::bit(color, side))
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

/// One complete chess position.
///
/// Fields are kept normalised (castling rights only while king and rook sit
/// on their home squares, en-passant target only while a capture onto it is
/// available), so structural equality coincides with FEN equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Position {
    pub(crate) board: [Option<Piece>; 64],
    pub(crate) turn: Color,
    pub(crate) castling: CastlingRights,
    pub(crate) ep_square: Option<Square>,
    pub(crate) halfmove_clock: u32,
    pub(crate) fullmove_number: u32,
}

pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

impl Position {
    /// Board with no pieces, White to move.
    pub fn empty() -> Self {
        Self {
            board: [None; 64],
            turn: Color::White,
            castling: CastlingRights::NONE,
            ep_square: None,
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }

    pub fn starting() -> Self {
        let mut position = Self::empty();
        let back = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];
        for (file, kind) in back.into_iter().enumerate() {
            let file = file as u8;
            position.put(file, 0, Piece::new(kind, Color::White));
            position.put(file, 1, Piece::new(PieceKind::Pawn, Color::White));
            position.put(file, 6, Piece::new(PieceKind::Pawn, Color::Black));
            position.put(file, 7, Piece::new(kind, Color::Black));
        }
        position.castling = CastlingRights::ALL;
        position
    }

    fn put(&mut self, file: u8, rank: u8, piece: Piece) {
        if let Some(square) = Square::from_coords(file, rank) {
            self.board[square.index()] = Some(piece);
        }
    }

    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.board[square.index()]
    }

    pub fn is_empty_at(&self, square: Square) -> bool {
        self.board[square.index()].is_none()
    }

    pub fn turn(&self) -> Color {
        self.turn
    }

    pub fn castling_rights(&self) -> CastlingRights {
        self.castling
    }

    pub fn ep_square(&self) -> Option<Square> {
        self.ep_square
    }

    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    pub fn has_castling_right(&self, color: Color, side: CastlingSide) -> bool {
        self.castling.has(color, side)
    }

    /// Same position with `color` to move; castling and en passant are renormalised.
    pub fn with_turn(&self, color: Color) -> Position {
        if self.turn == color {
            return self.clone();
        }
        let mut next = self.clone();
        next.turn = color;
        next.normalize();
        next
    }

    /// Returns a copy with `piece` placed on (or removed from) `square`.
    pub fn with_piece(&self, square: Square, piece: Option<Piece>) -> Position {
        let mut next = self.clone();
        next.board[square.index()] = piece;
        next.normalize();
        next
    }

    pub fn occupied(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::all().filter_map(|sq| self.piece_at(sq).map(|piece| (sq, piece)))
    }

    pub fn pieces(&self, kind: PieceKind, color: Color) -> impl Iterator<Item = Square> + '_ {
        let wanted = Piece::new(kind, color);
        Square::all().filter(move |sq| self.piece_at(*sq) == Some(wanted))
    }

    /// Square of `color`'s king; the lowest-indexed one if several exist.
    pub fn king(&self, color: Color) -> Option<Square> {
        self.pieces(PieceKind::King, color).next()
    }

    /// Applies `mv` for the side to move and returns the successor.
    ///
    /// The move is trusted to be pseudo-legal. A move from an empty square
    /// behaves like the null move.
    pub fn play(&self, mv: Move) -> Position {
        let mut next = self.clone();
        let mover = self.turn;
        let previous_ep = self.ep_square;

        next.ep_square = None;
        next.halfmove_clock += 1;
        if mover == Color::Black {
            next.fullmove_number += 1;
        }

        let moving = match (mv.is_null(), self.piece_at(mv.from)) {
            (false, Some(piece)) => piece,
            _ => {
                next.turn = mover.opposite();
                next.normalize();
                return next;
            }
        };

        let captured = self.piece_at(mv.to).filter(|piece| piece.color != mover);
        if moving.kind == PieceKind::Pawn || captured.is_some() {
            next.halfmove_clock = 0;
        }

        next.board[mv.from.index()] = None;

        if moving.kind == PieceKind::Pawn {
            let rank_diff = mv.to.rank() as i8 - mv.from.rank() as i8;
            let file_changed = mv.to.file() != mv.from.file();
            if rank_diff.abs() == 2 && !file_changed {
                next.ep_square = mv.from.offset(0, rank_diff / 2);
            } else if file_changed && Some(mv.to) == previous_ep && self.is_empty_at(mv.to) {
                if let Some(victim) = mv.to.offset(0, -mover.forward()) {
                    next.board[victim.index()] = None;
                }
            }
        }

        let castle_side = self.castling_side_of(moving, mv);
        match castle_side {
            Some(side) => {
                let rank = mover.back_rank();
                let rook_from = Square::from_coords(side.rook_file(), rank);
                let rook_to = Square::from_coords(side.rook_target_file(), rank);
                let king_to = Square::from_coords(side.king_target_file(), rank);
                if let (Some(rook_from), Some(rook_to), Some(king_to)) = (rook_from, rook_to, king_to)
                {
                    let rook = next.board[rook_from.index()].take();
                    next.board[king_to.index()] = Some(moving);
                    if let Some(rook) = rook {
                        next.board[rook_to.index()] = Some(rook);
                    }
                }
            }
            None => {
                let placed = match mv.promotion {
                    Some(kind) if moving.kind == PieceKind::Pawn => Piece::new(kind, mover),
                    _ => moving,
                };
                next.board[mv.to.index()] = Some(placed);
            }
        }

        next.turn = mover.opposite();
        next.normalize();
        next
    }

    /// Castling side when `mv` is a two-file king step from its home square.
    pub(crate) fn castling_side_of(&self, moving: Piece, mv: Move) -> Option<CastlingSide> {
        if moving.kind != PieceKind::King {
            return None;
        }
        let home = Square::from_coords(4, moving.color.back_rank())?;
        if mv.from != home || mv.to.rank() != home.rank() {
            return None;
        }
        match mv.to.file() {
            6 => Some(CastlingSide::Kingside),
            2 => Some(CastlingSide::Queenside),
            _ => None,
        }
    }

    pub(crate) fn normalize(&mut self) {
        for color in Color::BOTH {
            for side in CastlingSide::BOTH {
                if self.castling.has(color, side) && !self.castling_pieces_home(color, side) {
                    self.castling = self.castling.without(color, side);
                }
            }
        }
        if let Some(ep) = self.ep_square {
            if !self.ep_capture_available(ep) {
                self.ep_square = None;
            }
        }
    }

    fn castling_pieces_home(&self, color: Color, side: CastlingSide) -> bool {
        let rank = color.back_rank();
        let king_home = Square::from_coords(4, rank);
        let rook_home = Square::from_coords(side.rook_file(), rank);
        match (king_home, rook_home) {
            (Some(king), Some(rook)) => {
                self.piece_at(king) == Some(Piece::new(PieceKind::King, color))
                    && self.piece_at(rook) == Some(Piece::new(PieceKind::Rook, color))
            }
            _ => false,
        }
    }

    /// True when a pawn of the side to move can capture onto `ep` en passant.
    fn ep_capture_available(&self, ep: Square) -> bool {
        let mover = self.turn;
        let expected_rank = match mover {
            Color::White => 5,
            Color::Black => 2,
        };
        if ep.rank() != expected_rank || !self.is_empty_at(ep) {
            return false;
        }
        let pushed = ep.offset(0, -mover.forward());
        let origin = ep.offset(0, mover.forward());
        let pushed_ok = pushed.and_then(|sq| self.piece_at(sq))
            == Some(Piece::new(PieceKind::Pawn, mover.opposite()));
        let origin_ok = origin.is_some_and(|sq| self.is_empty_at(sq));
        if !pushed_ok || !origin_ok {
            return false;
        }
        let own_pawn = Piece::new(PieceKind::Pawn, mover);
        [-1i8, 1].into_iter().any(|df| {
            ep.offset(df, -mover.forward())
                .and_then(|sq| self.piece_at(sq))
                == Some(own_pawn)
        })
    }

    /// Structural sanity check mirroring what UCI engines expect.
    pub fn validate(&self) -> Result<(), InvalidPosition> {
        for color in Color::BOTH {
            let kings = self.pieces(PieceKind::King, color).count();
            if kings == 0 {
                return Err(InvalidPosition::MissingKing(color));
            }
            if kings > 1 {
                return Err(InvalidPosition::TooManyKings(color));
            }
            let total = self.occupied().filter(|(_, p)| p.color == color).count();
            if total > 16 {
                return Err(InvalidPosition::TooManyPieces(color));
            }
            if self.pieces(PieceKind::Pawn, color).count() > 8 {
                return Err(InvalidPosition::TooManyPawns(color));
            }
        }

        let pawn_on_back_rank = self
            .occupied()
            .any(|(sq, piece)| piece.kind == PieceKind::Pawn && (sq.rank() == 0 || sq.rank() == 7));
        if pawn_on_back_rank {
            return Err(InvalidPosition::PawnsOnBackRank);
        }

        let waiting = self.turn.opposite();
        if let Some(king) = self.king(waiting) {
            if !self.attackers(self.turn, king).is_empty() {
                return Err(InvalidPosition::OppositeCheck);
            }
        }
        if let Some(king) = self.king(self.turn) {
            if self.attackers(waiting, king).len() > 2 {
                return Err(InvalidPosition::TooManyCheckers);
            }
        }
        Ok(())
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::starting()
    }
}

/// Reasons a position fails [`Position::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidPosition {
    MissingKing(Color),
    TooManyKings(Color),
    TooManyPieces(Color),
    TooManyPawns(Color),
    PawnsOnBackRank,
    OppositeCheck,
    TooManyCheckers,
}

impl fmt::Display for InvalidPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidPosition::MissingKing(color) => write!(f, "{color} has no king"),
            InvalidPosition::TooManyKings(color) => write!(f, "{color} has more than one king"),
            InvalidPosition::TooManyPieces(color) => {
                write!(f, "{color} has more than 16 pieces")
            }
            InvalidPosition::TooManyPawns(color) => write!(f, "{color} has more than 8 pawns"),
            InvalidPosition::PawnsOnBackRank => write!(f, "pawn on first or last rank"),
            InvalidPosition::OppositeCheck => write!(f, "side not to move is in check"),
            InvalidPosition::TooManyCheckers => write!(f, "king attacked by more than two pieces"),
        }
    }
}

impl std::error::Error for InvalidPosition {}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(name: &str) -> Square {
        name.parse().unwrap()
    }

    #[test]
    fn starting_position_is_valid() {
        let start = Position::starting();
        assert!(start.validate().is_ok());
        assert_eq!(start.king(Color::White), Some(Square::E1));
        assert_eq!(start.king(Color::Black), Some(Square::E8));
        assert_eq!(start.castling_rights(), CastlingRights::ALL);
    }

    #[test]
    fn double_push_without_capturer_leaves_no_ep_square() {
        let next = Position::starting().play("e2e4".parse().unwrap());
        assert_eq!(next.ep_square(), None);
        assert_eq!(next.turn(), Color::Black);
        assert_eq!(next.piece_at(sq("e4")).map(|p| p.kind), Some(PieceKind::Pawn));
        assert!(next.is_empty_at(sq("e2")));
    }

    #[test]
    fn en_passant_removes_pushed_pawn() {
        let position = Position::from_fen("4k3/8/8/8/3p4/8/4P3/4K3 w - - 0 1").unwrap();
        let pushed = position.play("e2e4".parse().unwrap());
        assert_eq!(pushed.ep_square(), Some(sq("e3")));
        let taken = pushed.play("d4e3".parse().unwrap());
        assert!(taken.is_empty_at(sq("e4")));
        assert_eq!(
            taken.piece_at(sq("e3")),
            Some(Piece::new(PieceKind::Pawn, Color::Black))
        );
    }

    #[test]
    fn castling_hops_rook_and_clears_rights() {
        let position = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        let castled = position.play(Move::new(Square::E1, Square::G1));
        assert_eq!(
            castled.piece_at(Square::G1),
            Some(Piece::new(PieceKind::King, Color::White))
        );
        assert_eq!(
            castled.piece_at(Square::F1),
            Some(Piece::new(PieceKind::Rook, Color::White))
        );
        assert!(castled.is_empty_at(Square::H1));
        assert!(!castled.has_castling_right(Color::White, CastlingSide::Kingside));
        assert!(!castled.has_castling_right(Color::White, CastlingSide::Queenside));
        assert!(castled.has_castling_right(Color::Black, CastlingSide::Queenside));
    }

    #[test]
    fn promotion_replaces_pawn() {
        let position = Position::from_fen("4k3/P7/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        let promoted = position.play("a7a8n".parse().unwrap());
        assert_eq!(
            promoted.piece_at(Square::A8),
            Some(Piece::new(PieceKind::Knight, Color::White))
        );
    }

    #[test]
    fn null_move_only_passes_turn() {
        let start = Position::starting();
        let passed = start.play(Move::NULL);
        assert_eq!(passed.turn(), Color::Black);
        assert_eq!(passed.board, start.board);
        assert_eq!(passed.halfmove_clock(), 1);
    }

    #[test]
    fn validate_flags_missing_king_and_opposite_check() {
        let no_black_king = Position::from_fen("8/8/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        assert_eq!(
            no_black_king.validate(),
            Err(InvalidPosition::MissingKing(Color::Black))
        );

        let black_in_check = Position::from_fen("4k3/8/8/8/8/8/8/4RK2 w - - 0 1").unwrap();
        assert_eq!(black_in_check.validate(), Err(InvalidPosition::OppositeCheck));
    }

    #[test]
    fn with_turn_flips_side() {
        let start = Position::starting();
        let flipped = start.with_turn(Color::Black);
        assert_eq!(flipped.turn(), Color::Black);
        assert_eq!(flipped.with_turn(Color::White), start);
    }
}
