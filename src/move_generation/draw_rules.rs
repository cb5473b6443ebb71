//! Draws decided by the position and its history alone.
//!
//! Checked in the order threefold repetition, insufficient material,
//! fifty-move rule, ahead of checkmate and stalemate.

use smallvec::SmallVec;
use tracing::warn;

use crate::game_state::board_state::{BoardState, GameEnd};
use crate::game_state::chess_rules::{FIFTY_MOVE_HALFMOVES, REPETITION_COUNT};

/// The draw the last state in `history` has reached, if any.
pub fn detect_draw(history: &[BoardState]) -> Option<GameEnd> {
    let current = history.last()?;

    if is_threefold_repetition(history) {
        Some(GameEnd::ThreefoldRepetition)
    } else if current.composition.is_insufficient_material() {
        Some(GameEnd::InsufficientMaterial)
    } else if current.halfmove_clock >= FIFTY_MOVE_HALFMOVES {
        Some(GameEnd::FiftyMove)
    } else {
        None
    }
}

/// Indices of the earlier states that could repeat the last one: same side
/// to move, and no capture or pawn move since.
fn reversible_window(history: &[BoardState]) -> impl Iterator<Item = usize> {
    let current_index = history.len().saturating_sub(1);
    let reach = history
        .last()
        .map_or(0, |state| usize::from(state.halfmove_clock))
        .min(current_index);
    let oldest = current_index - reach;

    (oldest..current_index)
        .rev()
        .filter(move |index| (current_index - index) % 2 == 0)
}

/// Whether the last state occurs for the third time.
///
/// Matching Zobrist keys are only a candidate; every candidate is confirmed
/// by a full comparison before the draw is declared.
pub fn is_threefold_repetition(history: &[BoardState]) -> bool {
    let Some(current) = history.last() else {
        return false;
    };

    let candidates: SmallVec<[usize; 8]> = reversible_window(history)
        .filter(|&index| history[index].zobrist_key == current.zobrist_key)
        .collect();

    if candidates.len() + 1 < REPETITION_COUNT {
        return false;
    }

    if candidates
        .iter()
        .all(|&index| history[index].is_repetition_of(current))
    {
        return true;
    }

    warn!(
        zobrist_key = current.zobrist_key,
        ply = current.ply_count,
        "zobrist collision in repetition history, recounting by full comparison"
    );
    count_repetitions_exact(history) >= REPETITION_COUNT
}

/// Occurrences of the last state, including itself, found without hashing.
fn count_repetitions_exact(history: &[BoardState]) -> usize {
    let Some(current) = history.last() else {
        return 0;
    };

    1 + reversible_window(history)
        .filter(|&index| history[index].is_repetition_of(current))
        .count()
}
