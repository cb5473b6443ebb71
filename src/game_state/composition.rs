//! Packed material signature used for insufficient-material draws.
//!
//! Per color, 4-bit counts of pawns, knights, bishops, rooks, queens and
//! dark-square bishops. Bit 63 caches whether the material left on the board
//! is a USCF-style dead draw.
//!
//! ```text
//! [3:0]   white pawns         [35:32] black pawns
//! [7:4]   white knights       [39:36] black knights
//! [11:8]  white bishops       [43:40] black bishops
//! [15:12] white rooks         [47:44] black rooks
//! [19:16] white queens        [51:48] black queens
//! [23:20] white dark bishops  [55:52] black dark bishops
//! [31:24] unused              [62:56] unused
//! [63]    insufficient material
//! ```

use crate::game_state::chess_types::{is_dark_square, Color, Piece, PieceKind, Square};

const INSUFFICIENT_BIT: u64 = 1 << 63;
const DARK_BISHOP_OFFSET: u32 = 20;
const COUNT_MASK: u64 = 0xF;

/// Any pawn, rook or queen on either side.
const PAWN_ROOK_QUEEN_MASK: u64 = 0x000F_F00F_000F_F00F;
/// Counts with the dark-bishop sub-counts dropped.
const BISHOP_AGNOSTIC_MASK: u64 = 0x000F_FFFF_000F_FFFF;
/// Counts including the dark-bishop sub-counts.
const COUNTS_MASK: u64 = 0x00FF_FFFF_00FF_FFFF;

// Patterns named white-side first; black counts live in the upper word.
const K_K: u64 = 0x0000_0000_0000_0000;
const KN_K: u64 = 0x0000_0000_0000_0010;
const K_KN: u64 = 0x0000_0010_0000_0000;
const KN_KN: u64 = 0x0000_0010_0000_0010;
const KNN_K: u64 = 0x0000_0000_0000_0020;
const K_KNN: u64 = 0x0000_0020_0000_0000;
const KDB_KDB: u64 = 0x0010_0100_0010_0100;
const KLB_KLB: u64 = 0x0000_0100_0000_0100;
const KDBDB_K: u64 = 0x0000_0000_0020_0200;
const K_KDBDB: u64 = 0x0020_0200_0000_0000;
const KLBLB_K: u64 = 0x0000_0000_0000_0200;
const K_KLBLB: u64 = 0x0000_0200_0000_0000;

const KB_K: u64 = 0x0000_0000_0000_0100;
const K_KB: u64 = 0x0000_0100_0000_0000;
const KB_KN: u64 = 0x0000_0010_0000_0100;
const KN_KB: u64 = 0x0000_0100_0000_0010;

/// Drawn patterns where bishop square colors matter.
const DRAWN_EXACT: [u64; 12] = [
    K_K, KN_K, K_KN, KN_KN, KNN_K, K_KNN, KDB_KDB, KLB_KLB, KDBDB_K, K_KDBDB, KLBLB_K, K_KLBLB,
];

/// Drawn patterns with a single minor where bishop color is disregarded.
const DRAWN_BISHOP_AGNOSTIC: [u64; 4] = [KB_K, K_KB, KB_KN, KN_KB];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Composition(u64);

impl Default for Composition {
    fn default() -> Self {
        Self::starting_position()
    }
}

impl Composition {
    /// Material of the standard starting position.
    pub const fn starting_position() -> Self {
        Self(0x0011_2228_0011_2228)
    }

    /// Builds the signature from a full board, ignoring kings.
    pub fn from_squares(squares: &[Option<Piece>; 64]) -> Self {
        let mut composition = Self(0);
        for (square, piece) in squares.iter().enumerate() {
            if let Some(piece) = piece {
                composition.add_unchecked(*piece, square as Square);
            }
        }
        composition.encode_insufficient_material();
        composition
    }

    #[inline]
    const fn count_offset(color: Color, kind: PieceKind) -> u32 {
        (color.index() as u32) * 32 + (kind.index() as u32) * 4
    }

    #[inline]
    const fn dark_bishop_offset(color: Color) -> u32 {
        (color.index() as u32) * 32 + DARK_BISHOP_OFFSET
    }

    /// Records `piece` arriving on `square`. Kings are not counted.
    pub fn add(&mut self, piece: Piece, square: Square) {
        self.add_unchecked(piece, square);
        self.encode_insufficient_material();
    }

    /// Records `piece` leaving `square`. Kings are not counted.
    pub fn remove(&mut self, piece: Piece, square: Square) {
        if piece.kind == PieceKind::King {
            return;
        }
        debug_assert!(self.count(piece.color, piece.kind) > 0);
        self.0 -= 1 << Self::count_offset(piece.color, piece.kind);
        if piece.kind == PieceKind::Bishop && is_dark_square(square) {
            self.0 -= 1 << Self::dark_bishop_offset(piece.color);
        }
        self.encode_insufficient_material();
    }

    fn add_unchecked(&mut self, piece: Piece, square: Square) {
        if piece.kind == PieceKind::King {
            return;
        }
        debug_assert!(self.count(piece.color, piece.kind) < 15);
        self.0 += 1 << Self::count_offset(piece.color, piece.kind);
        if piece.kind == PieceKind::Bishop && is_dark_square(square) {
            self.0 += 1 << Self::dark_bishop_offset(piece.color);
        }
    }

    #[inline]
    pub const fn count(self, color: Color, kind: PieceKind) -> u8 {
        match kind {
            PieceKind::King => 1,
            _ => ((self.0 >> Self::count_offset(color, kind)) & COUNT_MASK) as u8,
        }
    }

    #[inline]
    pub const fn dark_bishops(self, color: Color) -> u8 {
        ((self.0 >> Self::dark_bishop_offset(color)) & COUNT_MASK) as u8
    }

    #[inline]
    pub const fn is_insufficient_material(self) -> bool {
        self.0 & INSUFFICIENT_BIT != 0
    }

    #[inline]
    pub const fn bits(self) -> u64 {
        self.0
    }

    fn encode_insufficient_material(&mut self) {
        let insufficient = if self.0 & PAWN_ROOK_QUEEN_MASK != 0 {
            false
        } else {
            let exact = self.0 & COUNTS_MASK;
            let agnostic = self.0 & BISHOP_AGNOSTIC_MASK;
            DRAWN_EXACT.contains(&exact) || DRAWN_BISHOP_AGNOSTIC.contains(&agnostic)
        };

        if insufficient {
            self.0 |= INSUFFICIENT_BIT;
        } else {
            self.0 &= !INSUFFICIENT_BIT;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Composition;
    use crate::game_state::chess_types::{Color, Piece, PieceKind};
    use crate::utils::fen_parser::parse_fen;

    fn composition_of(fen: &str) -> Composition {
        let state = parse_fen(fen).expect("FEN should parse");
        Composition::from_squares(&state.squares)
    }

    #[test]
    fn starting_constant_matches_board_scan() {
        let scanned =
            composition_of("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1");
        assert_eq!(scanned, Composition::starting_position());
        assert_eq!(scanned.count(Color::White, PieceKind::Pawn), 8);
        assert_eq!(scanned.count(Color::Black, PieceKind::Bishop), 2);
        assert_eq!(scanned.dark_bishops(Color::White), 1);
        assert!(!scanned.is_insufficient_material());
    }

    #[test]
    fn lone_minor_pieces_are_insufficient() {
        for fen in [
            "4k3/8/8/8/8/8/8/4K3 w - - 0 1",
            "4k3/8/8/8/8/8/8/2B1K3 w - - 0 1",
            "4k3/8/8/8/8/8/8/3BK3 w - - 0 1",
            "4k3/8/8/8/8/8/8/1N2K3 w - - 0 1",
            "4k3/8/8/8/8/8/8/1N2KN2 w - - 0 1",
            "3nk3/8/8/8/8/8/8/1N2K3 w - - 0 1",
            "3nk3/8/8/8/8/8/8/2B1K3 w - - 0 1",
        ] {
            assert!(
                composition_of(fen).is_insufficient_material(),
                "expected insufficient material for {fen}"
            );
        }
    }

    #[test]
    fn bishop_pairs_depend_on_square_color() {
        // c1 and f4 are both dark.
        assert!(composition_of("4k3/8/8/8/5B2/8/8/2B1K3 w - - 0 1").is_insufficient_material());
        // c1 dark, f1 light.
        assert!(!composition_of("4k3/8/8/8/8/8/8/2B1KB2 w - - 0 1").is_insufficient_material());
        // One bishop each, g8 and f1 both light.
        assert!(composition_of("4k1b1/8/8/8/8/8/8/4KB2 w - - 0 1").is_insufficient_material());
        // One bishop each, f8 dark and f1 light.
        assert!(!composition_of("4kb2/8/8/8/8/8/8/4KB2 w - - 0 1").is_insufficient_material());
    }

    #[test]
    fn heavy_pieces_and_pawns_are_always_sufficient() {
        assert!(!composition_of("4k3/8/8/8/8/8/4P3/4K3 w - - 0 1").is_insufficient_material());
        assert!(!composition_of("4k3/8/8/8/8/8/8/R3K3 w - - 0 1").is_insufficient_material());
        assert!(!composition_of("4k3/8/8/8/8/8/8/3QK3 w - - 0 1").is_insufficient_material());
    }

    #[test]
    fn add_and_remove_keep_dark_bishop_counts() {
        let mut composition = composition_of("4k3/8/8/8/8/8/8/4K3 w - - 0 1");
        let bishop = Piece::new(Color::Black, PieceKind::Bishop);
        composition.add(bishop, 0);
        assert_eq!(composition.dark_bishops(Color::Black), 1);
        assert!(composition.is_insufficient_material());
        composition.add(Piece::new(Color::White, PieceKind::Rook), 7);
        assert!(!composition.is_insufficient_material());
        composition.remove(Piece::new(Color::White, PieceKind::Rook), 7);
        composition.remove(bishop, 0);
        assert_eq!(composition.dark_bishops(Color::Black), 0);
        assert_eq!(composition.count(Color::Black, PieceKind::Bishop), 0);
        assert!(composition.is_insufficient_material());
    }
}
