//! The `Move` value passed between generation, make/unmake and callers.
//!
//! A move is its from/to squares plus a tag carrying only the data that tag
//! needs. Two moves are equal iff all of those match.

use std::fmt;

use crate::game_state::chess_types::{CastleSide, PieceKind, Square};
use crate::utils::algebraic::square_name;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveKind {
    Normal,
    Castle(CastleSide),
    /// `captured` is the square of the pawn removed, not the destination.
    EnPassant { captured: Square },
    Promotion(PieceKind),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub kind: MoveKind,
}

impl Move {
    #[inline]
    pub const fn normal(from: Square, to: Square) -> Self {
        Self {
            from,
            to,
            kind: MoveKind::Normal,
        }
    }

    #[inline]
    pub const fn castle(from: Square, to: Square, side: CastleSide) -> Self {
        Self {
            from,
            to,
            kind: MoveKind::Castle(side),
        }
    }

    #[inline]
    pub const fn en_passant(from: Square, to: Square, captured: Square) -> Self {
        Self {
            from,
            to,
            kind: MoveKind::EnPassant { captured },
        }
    }

    #[inline]
    pub const fn promotion(from: Square, to: Square, piece: PieceKind) -> Self {
        Self {
            from,
            to,
            kind: MoveKind::Promotion(piece),
        }
    }

    #[inline]
    pub const fn promotion_piece(self) -> Option<PieceKind> {
        match self.kind {
            MoveKind::Promotion(piece) => Some(piece),
            _ => None,
        }
    }
}

/// Lowercase promotion letter used by UCI move text.
#[inline]
pub const fn promotion_char(piece: PieceKind) -> Option<char> {
    match piece {
        PieceKind::Knight => Some('n'),
        PieceKind::Bishop => Some('b'),
        PieceKind::Rook => Some('r'),
        PieceKind::Queen => Some('q'),
        PieceKind::Pawn | PieceKind::King => None,
    }
}

/// Long algebraic (UCI) form, e.g. `e2e4`, `e1g1`, `a7a8q`.
impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", square_name(self.from), square_name(self.to))?;
        if let Some(letter) = self.promotion_piece().and_then(promotion_char) {
            write!(f, "{letter}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::Move;
    use crate::game_state::chess_types::{CastleSide, PieceKind};

    #[test]
    fn equality_includes_the_tag_payload() {
        assert_eq!(
            Move::promotion(52, 60, PieceKind::Queen),
            Move::promotion(52, 60, PieceKind::Queen)
        );
        assert_ne!(
            Move::promotion(52, 60, PieceKind::Queen),
            Move::promotion(52, 60, PieceKind::Knight)
        );
        assert_ne!(Move::normal(4, 6), Move::castle(4, 6, CastleSide::King));
    }

    #[test]
    fn display_uses_long_algebraic() {
        assert_eq!(Move::normal(12, 28).to_string(), "e2e4");
        assert_eq!(Move::castle(60, 58, CastleSide::Queen).to_string(), "e8c8");
        assert_eq!(Move::en_passant(36, 43, 35).to_string(), "e5d6");
        assert_eq!(Move::promotion(48, 56, PieceKind::Rook).to_string(), "a7a8r");
    }
}
