//! Forsyth-Edwards encoding, the canonical text form of a [`Position`].

use crate::model::color::Color;
use crate::model::piece::Piece;
use crate::model::position::{CastlingRights, CastlingSide, Position};
use crate::model::square::Square;
use core::fmt;
use core::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FenError {
    FieldCount(usize),
    Placement(String),
    Turn(String),
    Castling(String),
    EnPassant(String),
    Counter(String),
}

impl fmt::Display for FenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FenError::FieldCount(count) => write!(f, "expected 4 to 6 FEN fields, found {count}"),
            FenError::Placement(detail) => write!(f, "invalid piece placement: {detail}"),
            FenError::Turn(value) => write!(f, "invalid side to move '{value}'"),
            FenError::Castling(value) => write!(f, "invalid castling field '{value}'"),
            FenError::EnPassant(value) => write!(f, "invalid en-passant field '{value}'"),
            FenError::Counter(value) => write!(f, "invalid move counter '{value}'"),
        }
    }
}

impl std::error::Error for FenError {}

impl Position {
    pub fn from_fen(fen: &str) -> Result<Position, FenError> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        if !(4..=6).contains(&fields.len()) {
            return Err(FenError::FieldCount(fields.len()));
        }

        let mut position = Position::empty();
        parse_placement(fields[0], &mut position)?;

        let mut turn_chars = fields[1].chars();
        position.turn = match (turn_chars.next().and_then(Color::from_fen_char), turn_chars.next()) {
            (Some(color), None) => color,
            _ => return Err(FenError::Turn(fields[1].to_string())),
        };

        position.castling = parse_castling(fields[2])?;

        position.ep_square = match fields[3] {
            "-" => None,
            value => Some(
                value
                    .parse::<Square>()
                    .map_err(|_| FenError::EnPassant(value.to_string()))?,
            ),
        };

        position.halfmove_clock = match fields.get(4) {
            Some(value) => value
                .parse()
                .map_err(|_| FenError::Counter(value.to_string()))?,
            None => 0,
        };
        position.fullmove_number = match fields.get(5) {
            Some(value) => value
                .parse::<u32>()
                .map_err(|_| FenError::Counter(value.to_string()))?
                .max(1),
            None => 1,
        };

        position.normalize();
        Ok(position)
    }

    pub fn to_fen(&self) -> String {
        let mut out = String::with_capacity(90);
        for rank in (0..8u8).rev() {
            let mut empty_run = 0u8;
            for file in 0..8u8 {
                let piece = Square::from_coords(file, rank).and_then(|sq| self.piece_at(sq));
                match piece {
                    Some(piece) => {
                        if empty_run > 0 {
                            out.push((b'0' + empty_run) as char);
                            empty_run = 0;
                        }
                        out.push(piece.symbol());
                    }
                    None => empty_run += 1,
                }
            }
            if empty_run > 0 {
                out.push((b'0' + empty_run) as char);
            }
            if rank > 0 {
                out.push('/');
            }
        }

        out.push(' ');
        out.push(self.turn.fen_char());
        out.push(' ');
        out.push_str(&castling_field(self.castling));
        out.push(' ');
        match self.ep_square {
            Some(square) => out.push_str(&square.to_string()),
            None => out.push('-'),
        }
        out.push_str(&format!(" {} {}", self.halfmove_clock, self.fullmove_number));
        out
    }
}

impl FromStr for Position {
    type Err = FenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Position::from_fen(s)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_fen())
    }
}

fn parse_placement(field: &str, position: &mut Position) -> Result<(), FenError> {
    let ranks: Vec<&str> = field.split('/').collect();
    if ranks.len() != 8 {
        return Err(FenError::Placement(format!("expected 8 ranks, found {}", ranks.len())));
    }
    for (row, text) in ranks.iter().enumerate() {
        let rank = 7 - row as u8;
        let mut file = 0u8;
        for c in text.chars() {
            if let Some(skip) = c.to_digit(10) {
                if skip == 0 || skip > 8 {
                    return Err(FenError::Placement(format!("bad run length '{c}'")));
                }
                file += skip as u8;
            } else {
                let piece = Piece::from_symbol(c)
                    .ok_or_else(|| FenError::Placement(format!("unknown piece '{c}'")))?;
                let square = Square::from_coords(file, rank)
                    .ok_or_else(|| FenError::Placement(format!("rank {} overflows", rank + 1)))?;
                position.board[square.index()] = Some(piece);
                file += 1;
            }
            if file > 8 {
                return Err(FenError::Placement(format!("rank {} overflows", rank + 1)));
            }
        }
        if file != 8 {
            return Err(FenError::Placement(format!("rank {} is short", rank + 1)));
        }
    }
    Ok(())
}

fn parse_castling(field: &str) -> Result<CastlingRights, FenError> {
    if field == "-" {
        return Ok(CastlingRights::NONE);
    }
    let mut rights = CastlingRights::NONE;
    for c in field.chars() {
        rights = match c {
            'K' => rights.with(Color::White, CastlingSide::Kingside),
            'Q' => rights.with(Color::White, CastlingSide::Queenside),
            'k' => rights.with(Color::Black, CastlingSide::Kingside),
            'q' => rights.with(Color::Black, CastlingSide::Queenside),
            _ => return Err(FenError::Castling(field.to_string())),
        };
    }
    Ok(rights)
}

fn castling_field(rights: CastlingRights) -> String {
    let mut out = String::new();
    let flags = [
        (Color::White, CastlingSide::Kingside, 'K'),
        (Color::White, CastlingSide::Queenside, 'Q'),
        (Color::Black, CastlingSide::Kingside, 'k'),
        (Color::Black, CastlingSide::Queenside, 'q'),
    ];
    for (color, side, symbol) in flags {
        if rights.has(color, side) {
            out.push(symbol);
        }
    }
    if out.is_empty() {
        out.push('-');
    }
    out
}
