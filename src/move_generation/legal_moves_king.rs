use crate::game_state::board_state::BoardState;
use crate::game_state::chess_rules::castle_geometry;
use crate::game_state::chess_types::*;
use crate::move_generation::attack_squares::AttackSet;
use crate::move_generation::legal_move_checks::CheckInfo;
use crate::move_generation::legal_move_generator::MoveBuffer;
use crate::moves::attack_rays::attack_rays;
use crate::moves::move_descriptions::Move;

/// Single king steps onto squares the opponent neither attacks nor shadows.
pub fn generate_king_moves(state: &BoardState, attacks: &AttackSet, out: &mut MoveBuffer) {
    let side = state.side_to_move;
    let from = state.king_square(side);

    for ray in attack_rays(from, PieceKind::King) {
        let to = ray[0];
        if matches!(state.piece_on(to), Some(piece) if piece.color == side) {
            continue;
        }
        if attacks.attacked.contains(to) || attacks.check_shadow.contains(to) {
            continue;
        }
        out.push(Move::normal(from, to));
    }
}

pub fn generate_castling_moves(
    state: &BoardState,
    checks: &CheckInfo,
    attacks: &AttackSet,
    out: &mut MoveBuffer,
) {
    // Cannot castle out of check.
    if checks.is_check {
        return;
    }

    let side = state.side_to_move;
    for castle_side in CASTLE_SIDES {
        if !state.castling_rights.has(side, castle_side) {
            continue;
        }

        let geometry = castle_geometry(side, castle_side);
        let path_clear = geometry
            .must_be_empty
            .iter()
            .all(|&square| state.piece_on(square).is_none());
        let path_safe = geometry
            .king_transit
            .iter()
            .all(|&square| !attacks.attacked.contains(square));

        if path_clear && path_safe {
            out.push(Move::castle(geometry.king_from, geometry.king_to, castle_side));
        }
    }
}
