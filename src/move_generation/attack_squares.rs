//! Pseudo-legal attack sets, used for king and castling safety.

use crate::game_state::board_state::BoardState;
use crate::game_state::chess_types::*;
use crate::moves::attack_rays::{attack_rays, pawn_attacks};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AttackSet {
    pub attacked: SquareSet,
    /// Squares directly behind the enemy king on a line it is attacked
    /// along. The king is the only thing blocking them.
    pub check_shadow: SquareSet,
}

/// Every square `color` attacks, including squares holding its own pieces.
pub fn build_attack_set(state: &BoardState, color: Color) -> AttackSet {
    let mut attacks = AttackSet::default();

    for (square, piece) in state.squares.iter().enumerate() {
        let Some(piece) = piece else {
            continue;
        };
        if piece.color != color {
            continue;
        }
        let square = square as Square;

        if piece.kind == PieceKind::Pawn {
            for &target in pawn_attacks(square, color) {
                attacks.attacked.insert(target);
            }
            continue;
        }

        for ray in attack_rays(square, piece.kind) {
            for (distance, &target) in ray.iter().enumerate() {
                attacks.attacked.insert(target);

                let Some(blocker) = state.piece_on(target) else {
                    continue;
                };
                if blocker.is(color.opposite(), PieceKind::King) {
                    if let Some(&behind) = ray.get(distance + 1) {
                        attacks.check_shadow.insert(behind);
                    }
                }
                break;
            }
        }
    }

    attacks
}

#[cfg(test)]
mod tests {
    use super::build_attack_set;
    use crate::game_state::chess_types::Color;
    use crate::utils::fen_parser::parse_fen;

    #[test]
    fn rays_stop_at_the_first_piece_and_include_it() {
        let state = parse_fen("4k3/8/8/8/R2p4/8/8/4K3 b - - 0 1").expect("FEN should parse");
        let attacks = build_attack_set(&state, Color::White);
        // a4 rook: b4, c4, d4 (blocked there), never e4.
        assert!(attacks.attacked.contains(25));
        assert!(attacks.attacked.contains(27));
        assert!(!attacks.attacked.contains(28));
        // Own pieces are defended squares too.
        let state = parse_fen("4k3/8/8/8/8/8/3P4/4K3 b - - 0 1").expect("FEN should parse");
        assert!(build_attack_set(&state, Color::White).attacked.contains(11));
    }

    #[test]
    fn pawns_attack_diagonally_only() {
        let state = parse_fen("4k3/8/8/8/8/8/4P3/4K3 b - - 0 1").expect("FEN should parse");
        let attacks = build_attack_set(&state, Color::White);
        assert!(attacks.attacked.contains(19));
        assert!(attacks.attacked.contains(21));
        assert!(!attacks.attacked.contains(20));
    }

    #[test]
    fn king_on_attacked_line_casts_a_shadow() {
        let state = parse_fen("8/8/8/8/8/k7/8/R3K3 b - - 0 1").expect("FEN should parse");
        let attacks = build_attack_set(&state, Color::White);
        assert!(attacks.attacked.contains(16));
        assert!(!attacks.attacked.contains(24));
        assert_eq!(attacks.check_shadow.iter().collect::<Vec<_>>(), vec![24]);
    }
}
