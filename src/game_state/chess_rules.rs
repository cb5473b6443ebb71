//! Canonical chess-rule constants.
//!
//! Starting position, draw thresholds and the fixed castling geometry.

use crate::game_state::chess_types::{CastleSide, Color, Square};

/// Standard chess starting position in Forsyth-Edwards Notation (FEN).
pub const STARTING_POSITION_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Halfmove clock value at which the game is drawn.
pub const FIFTY_MOVE_HALFMOVES: u16 = 100;

/// Occurrences of the same position that draw the game.
pub const REPETITION_COUNT: usize = 3;

/// Squares touched by one castle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CastleGeometry {
    pub king_from: Square,
    pub king_to: Square,
    pub rook_from: Square,
    pub rook_to: Square,
    /// Squares between king and rook.
    pub must_be_empty: &'static [Square],
    /// Squares the king crosses or lands on, excluding its start square.
    pub king_transit: &'static [Square],
}

const WHITE_KINGSIDE: CastleGeometry = CastleGeometry {
    king_from: 4,
    king_to: 6,
    rook_from: 7,
    rook_to: 5,
    must_be_empty: &[5, 6],
    king_transit: &[5, 6],
};

const WHITE_QUEENSIDE: CastleGeometry = CastleGeometry {
    king_from: 4,
    king_to: 2,
    rook_from: 0,
    rook_to: 3,
    must_be_empty: &[1, 2, 3],
    king_transit: &[3, 2],
};

const BLACK_KINGSIDE: CastleGeometry = CastleGeometry {
    king_from: 60,
    king_to: 62,
    rook_from: 63,
    rook_to: 61,
    must_be_empty: &[61, 62],
    king_transit: &[61, 62],
};

const BLACK_QUEENSIDE: CastleGeometry = CastleGeometry {
    king_from: 60,
    king_to: 58,
    rook_from: 56,
    rook_to: 59,
    must_be_empty: &[57, 58, 59],
    king_transit: &[59, 58],
};

#[inline]
pub fn castle_geometry(color: Color, side: CastleSide) -> &'static CastleGeometry {
    match (color, side) {
        (Color::White, CastleSide::King) => &WHITE_KINGSIDE,
        (Color::White, CastleSide::Queen) => &WHITE_QUEENSIDE,
        (Color::Black, CastleSide::King) => &BLACK_KINGSIDE,
        (Color::Black, CastleSide::Queen) => &BLACK_QUEENSIDE,
    }
}

/// The castling right lost when a piece leaves or lands on `square`.
#[inline]
pub const fn castle_right_for_corner(square: Square) -> Option<(Color, CastleSide)> {
    match square {
        0 => Some((Color::White, CastleSide::Queen)),
        7 => Some((Color::White, CastleSide::King)),
        56 => Some((Color::Black, CastleSide::Queen)),
        63 => Some((Color::Black, CastleSide::King)),
        _ => None,
    }
}
