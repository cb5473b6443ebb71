//! Long algebraic (UCI) move text to `Move`.
//!
//! UCI text carries only squares and an optional promotion letter. Castling
//! and en passant are recovered from board context: a king moving two files
//! from its home square castles, and a pawn moving diagonally onto the
//! en-passant target captures en passant. The result is not checked for
//! legality; see [`Board::play_uci`](crate::game_state::game_state::Board::play_uci).

use crate::chess_errors::MoveParseError;
use crate::game_state::board_state::BoardState;
use crate::game_state::chess_rules::castle_geometry;
use crate::game_state::chess_types::*;
use crate::moves::move_descriptions::Move;
use crate::utils::algebraic::algebraic_to_square;

pub fn parse_long_algebraic(
    long_algebraic: &str,
    state: &BoardState,
) -> Result<Move, MoveParseError> {
    let invalid = || MoveParseError::InvalidText(long_algebraic.to_owned());

    if !long_algebraic.is_ascii() || !(4..=5).contains(&long_algebraic.len()) {
        return Err(invalid());
    }

    let from = algebraic_to_square(&long_algebraic[0..2]).ok_or_else(invalid)?;
    let to = algebraic_to_square(&long_algebraic[2..4]).ok_or_else(invalid)?;
    let promotion = match long_algebraic.as_bytes().get(4) {
        None => None,
        Some(&letter) => Some(promotion_from_char(letter).ok_or_else(invalid)?),
    };

    let piece = state
        .piece_on(from)
        .filter(|piece| piece.color == state.side_to_move)
        .ok_or_else(|| MoveParseError::NoPiece(long_algebraic[0..2].to_owned()))?;

    if let Some(kind) = promotion {
        return Ok(Move::promotion(from, to, kind));
    }

    match piece.kind {
        PieceKind::King => {
            for side in CASTLE_SIDES {
                let geometry = castle_geometry(piece.color, side);
                if from == geometry.king_from && to == geometry.king_to {
                    return Ok(Move::castle(from, to, side));
                }
            }
        }
        PieceKind::Pawn => {
            let diagonal = file_of(from) != file_of(to);
            if let Some(ep) = state.en_passant {
                if diagonal && to == ep.target && state.piece_on(to).is_none() {
                    return Ok(Move::en_passant(from, to, ep.capture_square()));
                }
            }
        }
        _ => {}
    }

    Ok(Move::normal(from, to))
}

fn promotion_from_char(letter: u8) -> Option<PieceKind> {
    match letter {
        b'n' => Some(PieceKind::Knight),
        b'b' => Some(PieceKind::Bishop),
        b'r' => Some(PieceKind::Rook),
        b'q' => Some(PieceKind::Queen),
        _ => None,
    }
}
