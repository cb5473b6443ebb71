//! Knight and slider moves.
//!
//! Knights walk their one-square rays, sliders walk to the first occupied
//! square and stop there (capturing it when hostile).

use crate::game_state::board_state::BoardState;
use crate::game_state::chess_types::*;
use crate::move_generation::legal_move_checks::CheckInfo;
use crate::move_generation::legal_move_generator::MoveBuffer;
use crate::moves::attack_rays::attack_rays;
use crate::moves::move_descriptions::Move;

pub fn generate_ray_moves(
    state: &BoardState,
    from: Square,
    kind: PieceKind,
    checks: &CheckInfo,
    out: &mut MoveBuffer,
) {
    debug_assert!(kind == PieceKind::Knight || kind.is_slider());
    let side = state.side_to_move;

    for ray in attack_rays(from, kind) {
        for &to in ray {
            let occupant = state.piece_on(to);
            let friendly = matches!(occupant, Some(piece) if piece.color == side);

            if !friendly && checks.allows(from, to) {
                out.push(Move::normal(from, to));
            }
            if occupant.is_some() {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::game_state::game_state::Board;
    use crate::moves::move_descriptions::Move;

    fn moves_from(fen: &str, from: u8) -> Vec<Move> {
        let mut board = Board::from_fen(fen).expect("FEN should parse");
        board.legal_moves().into_iter().filter(|mv| mv.from == from).collect()
    }

    #[test]
    fn pinned_rook_stays_on_its_line_until_the_pinner_leaves() {
        let pinned = moves_from("k7/4r3/8/8/8/8/4R3/4K3 w - - 0 1", 12);
        assert_eq!(pinned.len(), 5);
        assert!(pinned.iter().all(|mv| mv.to % 8 == 4));
        assert!(pinned.contains(&Move::normal(12, 52)));

        let free = moves_from("k7/8/8/8/8/8/4R3/4K3 w - - 0 1", 12);
        assert_eq!(free.len(), 13);
    }

    #[test]
    fn pieces_must_block_or_capture_when_in_check() {
        // Rook e8 checks the e1 king; the d2 knight can only interpose on e4.
        let knight = moves_from("k3r3/8/8/8/8/8/3N4/4K3 w - - 0 1", 11);
        assert_eq!(knight, vec![Move::normal(11, 28)]);

        let bishop = moves_from("k3r3/8/8/8/8/8/8/1B2K3 w - - 0 1", 1);
        assert_eq!(bishop, vec![Move::normal(1, 28)]);
    }

    #[test]
    fn sliders_stop_at_friendly_pieces_and_capture_hostile_ones() {
        let queen = moves_from("k7/8/8/8/8/8/PP6/QK6 w - - 0 1", 0);
        assert!(queen.is_empty());

        let rook = moves_from("k7/8/8/8/p7/8/8/RK6 w - - 0 1", 0);
        assert_eq!(
            rook,
            vec![Move::normal(0, 8), Move::normal(0, 16), Move::normal(0, 24)]
        );
    }
}
