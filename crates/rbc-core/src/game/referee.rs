use crate::belief::{MoveOutcome, SenseObservation};
use crate::game::history::{GameHistory, TurnRecord};
use crate::model::chess_move::Move;
use crate::model::color::Color;
use crate::model::piece::PieceKind;
use crate::model::position::Position;
use crate::model::square::Square;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WinReason {
    KingCapture,
    Timeout,
    TurnLimit,
}

impl WinReason {
    pub fn as_str(self) -> &'static str {
        match self {
            WinReason::KingCapture => "king_capture",
            WinReason::Timeout => "timeout",
            WinReason::TurnLimit => "turn_limit",
        }
    }
}

/// Squares revealed by sensing at `center`: the 3x3 block around it, clipped to the board.
pub fn sense_window(center: Square) -> Vec<Square> {
    let mut squares = Vec::with_capacity(9);
    for dr in [1i8, 0, -1] {
        for df in [-1i8, 0, 1] {
            if let Some(square) = center.offset(df, dr) {
                squares.push(square);
            }
        }
    }
    squares
}

/// Moves the side to move may request: everything pseudo-legal with the
/// opponent's pieces lifted off the board, plus every forward pawn diagonal.
pub fn move_actions(position: &Position) -> Vec<Move> {
    let mover = position.turn();
    let mut own_only = position.clone();
    for square in Square::all() {
        if own_only
            .piece_at(square)
            .is_some_and(|piece| piece.color != mover)
        {
            own_only.board[square.index()] = None;
        }
    }
    own_only.ep_square = None;
    own_only.normalize();

    let mut moves = own_only.pseudo_legal_moves();
    for from in own_only.pieces(PieceKind::Pawn, mover).collect::<Vec<_>>() {
        for df in [-1i8, 1] {
            let Some(to) = from.offset(df, mover.forward()) else {
                continue;
            };
            if own_only.piece_at(to).is_some() {
                continue;
            }
            if to.rank() == 0 || to.rank() == 7 {
                for kind in PieceKind::PROMOTIONS {
                    moves.push(Move::with_promotion(from, to, kind));
                }
            } else {
                moves.push(Move::new(from, to));
            }
        }
    }
    moves.sort_by_key(|mv| (mv.from, mv.to, mv.promotion));
    moves.dedup();
    moves
}

/// Revises a requested move against the true board.
///
/// Pseudo-legal requests go through unchanged. Pawns and sliders stop at the
/// furthest pseudo-legal square on their path. Anything else is dropped.
pub fn revise_move(position: &Position, requested: Move) -> Option<Move> {
    if requested.is_null() {
        return None;
    }
    let piece = position.piece_at(requested.from)?;
    if piece.color != position.turn() {
        return None;
    }
    if position.is_pseudo_legal(requested) {
        return Some(requested);
    }
    if piece.kind != PieceKind::Pawn && !piece.kind.is_slider() {
        return None;
    }

    let mut path = squares_between(requested.from, requested.to);
    path.push(requested.to);
    path.sort_by_key(|sq| std::cmp::Reverse(sq.distance(requested.from)));
    for square in path {
        let promotion = requested
            .promotion
            .filter(|_| square.rank() == 0 || square.rank() == 7);
        let candidate = Move {
            from: requested.from,
            to: square,
            promotion,
        };
        if position.is_pseudo_legal(candidate) {
            return Some(candidate);
        }
    }
    None
}

/// Squares strictly between two squares on a shared line, or nothing.
fn squares_between(from: Square, to: Square) -> Vec<Square> {
    let df = to.file() as i8 - from.file() as i8;
    let dr = to.rank() as i8 - from.rank() as i8;
    let aligned = df == 0 || dr == 0 || df.abs() == dr.abs();
    if !aligned || (df == 0 && dr == 0) {
        return Vec::new();
    }
    let step = (df.signum(), dr.signum());
    let mut out = Vec::new();
    let mut cursor = from;
    while let Some(next) = cursor.offset(step.0, step.1) {
        if next == to {
            break;
        }
        out.push(next);
        cursor = next;
    }
    out
}

/// Holds the true board of a local game and adjudicates both players.
#[derive(Debug, Clone)]
pub struct Referee {
    board: Position,
    clocks: [Duration; 2],
    max_fullmoves: Option<u32>,
    last_capture: Option<Square>,
    winner: Option<Color>,
    reason: Option<WinReason>,
    finished: bool,
    history: GameHistory,
}

impl Referee {
    pub fn new(start: Position, time_per_player: Duration, max_fullmoves: Option<u32>) -> Self {
        let history = GameHistory::new(start.to_fen());
        Self {
            board: start,
            clocks: [time_per_player; 2],
            max_fullmoves,
            last_capture: None,
            winner: None,
            reason: None,
            finished: false,
            history,
        }
    }

    pub fn board(&self) -> &Position {
        &self.board
    }

    pub fn turn(&self) -> Color {
        self.board.turn()
    }

    pub fn seconds_left(&self, color: Color) -> f64 {
        self.clocks[color.index()].as_secs_f64()
    }

    pub fn is_over(&self) -> bool {
        self.finished
    }

    pub fn winner(&self) -> Option<Color> {
        self.winner
    }

    pub fn reason(&self) -> Option<WinReason> {
        self.reason
    }

    pub fn history(&self) -> &GameHistory {
        &self.history
    }

    /// Whether the previous move captured a piece of the side now to move, and where.
    pub fn opponent_move_result(&self) -> (bool, Option<Square>) {
        (self.last_capture.is_some(), self.last_capture)
    }

    pub fn sense_actions(&self) -> Vec<Square> {
        Square::all().collect()
    }

    pub fn move_actions(&self) -> Vec<Move> {
        move_actions(&self.board)
    }

    pub fn sense(&self, center: Option<Square>) -> SenseObservation {
        match center {
            Some(square) => SenseObservation::observe(&self.board, sense_window(square)),
            None => SenseObservation::default(),
        }
    }

    /// Deducts `elapsed` from the mover's clock; flags the game on timeout.
    pub fn charge(&mut self, color: Color, elapsed: Duration) {
        if self.finished {
            return;
        }
        let clock = &mut self.clocks[color.index()];
        *clock = clock.saturating_sub(elapsed);
        if clock.is_zero() {
            self.finish(Some(color.opposite()), WinReason::Timeout);
        }
    }

    /// Executes the mover's request, records the turn and checks for game end.
    pub fn apply_move(&mut self, sense: Option<Square>, requested: Option<Move>) -> MoveOutcome {
        let mover = self.board.turn();
        let taken = requested.and_then(|mv| revise_move(&self.board, mv));

        let mut outcome = MoveOutcome {
            requested,
            taken,
            captured: false,
            capture_square: None,
        };
        let mut king_taken = false;
        if let Some(mv) = taken {
            if self.board.is_capture(mv) {
                let square = if self.board.is_en_passant(mv) {
                    mv.to.offset(0, -mover.forward())
                } else {
                    Some(mv.to)
                };
                king_taken = square
                    .and_then(|sq| self.board.piece_at(sq))
                    .is_some_and(|piece| piece.kind == PieceKind::King);
                outcome.captured = true;
                outcome.capture_square = square;
            }
        }

        self.board = self.board.play(taken.unwrap_or(Move::NULL));
        self.last_capture = outcome.capture_square;
        self.history.push(TurnRecord {
            color: mover,
            sense,
            requested,
            taken,
            capture_square: outcome.capture_square,
            fen_after: self.board.to_fen(),
        });

        if king_taken {
            self.finish(Some(mover), WinReason::KingCapture);
        } else if let Some(limit) = self.max_fullmoves {
            if self.board.fullmove_number() > limit {
                self.finish(None, WinReason::TurnLimit);
            }
        }
        outcome
    }

    fn finish(&mut self, winner: Option<Color>, reason: WinReason) {
        self.finished = true;
        self.winner = winner;
        self.reason = Some(reason);
        self.history.finish(winner, reason);
    }
}
