//! Move application for BoardState.
//!
//! Mutates a copy of the current state in place. Placement changes go
//! through the `BoardState` helpers so the Zobrist key and material
//! signature are updated incrementally. Rights, en passant, side to move
//! and clocks are handled here.

use crate::game_state::board_state::{BoardState, EnPassant};
use crate::game_state::chess_rules::{castle_geometry, castle_right_for_corner};
use crate::game_state::chess_types::*;
use crate::move_generation::legal_moves_pawn::has_legal_en_passant;
use crate::moves::move_descriptions::{Move, MoveKind};
use crate::search::zobrist::{castling_rights_key, side_to_move_key};

/// Plays `mv` on `state`. `mv` must be legal in `state`.
pub fn apply_move(state: &mut BoardState, mv: Move) {
    let side = state.side_to_move;
    let opponent = side.opposite();
    let mut resets_clock = false;

    let moved_kind = match mv.kind {
        MoveKind::Normal => {
            if let Some(captured) = state.remove_piece(mv.to) {
                debug_assert_eq!(captured.color, opponent);
                resets_clock = true;
            }
            let moved = state.move_piece(mv.from, mv.to);
            moved.kind
        }
        MoveKind::Castle(castle_side) => {
            let geometry = castle_geometry(side, castle_side);
            state.move_piece(geometry.king_from, geometry.king_to);
            state.move_piece(geometry.rook_from, geometry.rook_to);
            PieceKind::King
        }
        MoveKind::EnPassant { captured } => {
            state.remove_piece(captured);
            state.move_piece(mv.from, mv.to);
            PieceKind::Pawn
        }
        MoveKind::Promotion(kind) => {
            if state.remove_piece(mv.to).is_some() {
                resets_clock = true;
            }
            state.remove_piece(mv.from);
            state.put_piece(mv.to, Piece::new(side, kind));
            PieceKind::Pawn
        }
    };

    if moved_kind == PieceKind::Pawn {
        resets_clock = true;
    }

    let old_rights = state.castling_rights;
    let mut rights = old_rights;
    if moved_kind == PieceKind::King {
        rights.remove_color(side);
    }
    for square in [mv.from, mv.to] {
        if let Some((color, castle_side)) = castle_right_for_corner(square) {
            rights.remove(color, castle_side);
        }
    }
    if rights != old_rights {
        state.zobrist_key ^= castling_rights_key(old_rights) ^ castling_rights_key(rights);
        state.castling_rights = rights;
    }

    state.side_to_move = opponent;
    state.zobrist_key ^= side_to_move_key();

    let double_push = moved_kind == PieceKind::Pawn
        && mv.kind == MoveKind::Normal
        && mv.from.abs_diff(mv.to) == 16;
    let en_passant = double_push.then(|| {
        let target = (mv.from + mv.to) / 2;
        EnPassant {
            target,
            capturable: has_legal_en_passant(state, target),
        }
    });
    state.set_en_passant(en_passant);

    state.halfmove_clock = if resets_clock {
        0
    } else {
        state.halfmove_clock.saturating_add(1)
    };
    state.ply_count = state.ply_count.saturating_add(1);
    state.game_end = None;
}
