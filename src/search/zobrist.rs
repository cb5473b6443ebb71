//! Zobrist hashing support for fast position identity and repetition tracking.
//!
//! The keys are generated from a fixed seed so hashes are deterministic across
//! runs, which is useful for testing and debugging. Board mutation keeps the
//! key up to date incrementally; [`compute_zobrist_key`] is the from-scratch
//! reference the incremental path must always agree with.

use std::sync::OnceLock;

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use crate::game_state::board_state::BoardState;
use crate::game_state::chess_types::*;

const ZOBRIST_SEED: u64 = 0x9E37_79B9_7F4A_7C15;

#[derive(Debug)]
struct ZobristTables {
    piece_square: [[[u64; 64]; 6]; 2],
    black_to_move: u64,
    // [color][castle side]
    castling: [[u64; 2]; 2],
    en_passant_file: [u64; 8],
}

static TABLES: OnceLock<ZobristTables> = OnceLock::new();

#[inline]
fn tables() -> &'static ZobristTables {
    TABLES.get_or_init(build_tables)
}

fn build_tables() -> ZobristTables {
    let mut rng = StdRng::seed_from_u64(ZOBRIST_SEED);

    let mut piece_square = [[[0u64; 64]; 6]; 2];
    for color in &mut piece_square {
        for piece in color {
            for sq in piece {
                *sq = rng.next_u64();
            }
        }
    }

    let black_to_move = rng.next_u64();

    let mut castling = [[0u64; 2]; 2];
    for color in &mut castling {
        for key in color {
            *key = rng.next_u64();
        }
    }

    let mut en_passant_file = [0u64; 8];
    for key in &mut en_passant_file {
        *key = rng.next_u64();
    }

    ZobristTables {
        piece_square,
        black_to_move,
        castling,
        en_passant_file,
    }
}

/// Return the Zobrist key for a piece standing on `square`.
#[inline]
pub fn piece_square_key(piece: Piece, square: Square) -> u64 {
    tables().piece_square[piece.color.index()][piece.kind.index()][square as usize]
}

/// Return the key for one castling right.
#[inline]
pub fn castling_key(color: Color, side: CastleSide) -> u64 {
    tables().castling[color.index()][side.index()]
}

/// XOR of the keys of every right held in `rights`.
#[inline]
pub fn castling_rights_key(rights: CastlingRights) -> u64 {
    rights
        .iter()
        .fold(0u64, |key, (color, side)| key ^ castling_key(color, side))
}

/// Return the key contribution for a capturable en-passant file.
#[inline]
pub fn en_passant_file_key(file: u8) -> u64 {
    tables().en_passant_file[file as usize]
}

/// Return the side-to-move toggle key (xor in when black to move).
#[inline]
pub fn side_to_move_key() -> u64 {
    tables().black_to_move
}

/// Compute the full position Zobrist key from the complete board state.
pub fn compute_zobrist_key(state: &BoardState) -> u64 {
    let mut key = 0u64;

    for (square, piece) in state.squares.iter().enumerate() {
        if let Some(piece) = piece {
            key ^= piece_square_key(*piece, square as Square);
        }
    }

    if state.side_to_move == Color::Black {
        key ^= side_to_move_key();
    }

    key ^= castling_rights_key(state.castling_rights);

    if let Some(target) = state.en_passant_target() {
        key ^= en_passant_file_key(file_of(target));
    }

    key
}
