use crate::game_state::board_state::{BoardState, EnPassant};
use crate::game_state::chess_types::*;
use crate::move_generation::legal_move_checks::{analyze_checks_and_pins, CheckInfo};
use crate::move_generation::legal_move_generator::MoveBuffer;
use crate::moves::attack_rays::{pawn_attacks, pawn_pushes};
use crate::moves::move_descriptions::Move;

/// Captures (including en passant) first, then pushes.
pub fn generate_pawn_moves(
    state: &BoardState,
    from: Square,
    checks: &CheckInfo,
    out: &mut MoveBuffer,
) {
    let side = state.side_to_move;

    for &to in pawn_attacks(from, side) {
        match state.piece_on(to) {
            Some(piece) if piece.color != side => {
                if checks.allows(from, to) {
                    push_pawn_move(side, from, to, out);
                }
            }
            Some(_) => {}
            None => {
                let Some(ep) = state.en_passant.filter(|ep| ep.capturable && ep.target == to) else {
                    continue;
                };
                let captured = ep.capture_square();
                if checks.allows_en_passant(from, to, captured)
                    && !en_passant_exposes_king(state, from, captured)
                {
                    out.push(Move::en_passant(from, to, captured));
                }
            }
        }
    }

    for &to in pawn_pushes(from, side) {
        if state.piece_on(to).is_some() {
            break;
        }
        if checks.allows(from, to) {
            push_pawn_move(side, from, to, out);
        }
    }
}

fn push_pawn_move(side: Color, from: Square, to: Square, out: &mut MoveBuffer) {
    if rank_of(to) == side.promotion_rank() {
        for kind in PROMOTION_KINDS {
            out.push(Move::promotion(from, to, kind));
        }
    } else {
        out.push(Move::normal(from, to));
    }
}

/// Whether the side to move has a legal en-passant capture onto `target`.
/// Decides if the target is recorded, hashed and written to FEN at all.
pub(crate) fn has_legal_en_passant(state: &BoardState, target: Square) -> bool {
    let side = state.side_to_move;
    let own_pawn = Some(Piece::new(side, PieceKind::Pawn));
    let mut capturers = pawn_attacks(target, side.opposite())
        .iter()
        .copied()
        .filter(|&from| state.piece_on(from) == own_pawn)
        .peekable();
    if capturers.peek().is_none() {
        return false;
    }

    let checks = analyze_checks_and_pins(state);
    if checks.is_double_check {
        return false;
    }
    let captured = EnPassant {
        target,
        capturable: true,
    }
    .capture_square();
    capturers.any(|from| {
        checks.allows_en_passant(from, target, captured)
            && !en_passant_exposes_king(state, from, captured)
    })
}

/// Removing both pawns from their rank, or the captured pawn from a king
/// diagonal, can uncover a slider the pin analysis never saw.
fn en_passant_exposes_king(state: &BoardState, from: Square, captured: Square) -> bool {
    let side = state.side_to_move;
    let king = state.king_square(side);

    let d_rank = rank_of(captured) as i8 - rank_of(king) as i8;
    let d_file = file_of(captured) as i8 - file_of(king) as i8;

    let (step, line_kind) = if d_rank == 0 {
        ((0, d_file.signum()), PieceKind::Rook)
    } else if d_rank.abs() == d_file.abs() {
        ((d_rank.signum(), d_file.signum()), PieceKind::Bishop)
    } else {
        return false;
    };

    let mut rank = rank_of(king) as i8 + step.0;
    let mut file = file_of(king) as i8 + step.1;
    while (0..8).contains(&rank) && (0..8).contains(&file) {
        let square = square_at(rank as u8, file as u8);
        rank += step.0;
        file += step.1;

        if square == from || square == captured {
            continue;
        }
        if let Some(piece) = state.piece_on(square) {
            return piece.color != side
                && (piece.kind == line_kind || piece.kind == PieceKind::Queen);
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use crate::game_state::chess_types::PieceKind;
    use crate::game_state::game_state::Board;
    use crate::moves::move_descriptions::Move;
    use crate::utils::fen_generator::generate_fen;
    use crate::utils::fen_parser::parse_fen;

    fn legal(fen: &str) -> Vec<Move> {
        Board::from_fen(fen).expect("FEN should parse").legal_moves()
    }

    #[test]
    fn captures_come_before_pushes() {
        let moves = legal("4k3/8/8/8/8/3p4/4P3/K7 w - - 0 1");
        let pawn: Vec<Move> = moves.into_iter().filter(|mv| mv.from == 12).collect();
        assert_eq!(
            pawn,
            vec![Move::normal(12, 19), Move::normal(12, 20), Move::normal(12, 28)]
        );
    }

    #[test]
    fn promotion_expands_to_four_moves() {
        let moves = legal("8/4P3/8/8/8/8/8/k3K3 w - - 0 1");
        let promotions: Vec<PieceKind> = moves
            .iter()
            .filter(|mv| mv.from == 52)
            .filter_map(|mv| mv.promotion_piece())
            .collect();
        assert_eq!(
            promotions,
            vec![PieceKind::Knight, PieceKind::Bishop, PieceKind::Rook, PieceKind::Queen]
        );
    }

    #[test]
    fn en_passant_blocked_by_horizontal_discovered_check() {
        let ep = Move::en_passant(36, 43, 35);
        assert!(!legal("8/8/8/K2pP2r/8/8/8/7k w - d6 0 2").contains(&ep));
        assert!(legal("8/8/8/K2pP3/8/8/8/7k w - d6 0 2").contains(&ep));
    }

    #[test]
    fn en_passant_blocked_by_diagonal_discovered_check() {
        let ep = Move::en_passant(36, 43, 35);
        let moves = legal("7k/5b2/8/3pP3/8/8/K7/8 w - d6 0 2");
        assert!(!moves.contains(&ep));
        assert!(moves.contains(&Move::normal(36, 44)));
        assert!(legal("7k/8/8/3pP3/8/8/K7/8 w - d6 0 2").contains(&ep));
    }

    #[test]
    fn en_passant_target_requires_a_legal_capture() {
        let with_target = parse_fen("8/8/8/K2pP2r/8/8/8/7k w - d6 0 2").expect("FEN should parse");
        let without = parse_fen("8/8/8/K2pP2r/8/8/8/7k w - - 0 2").expect("FEN should parse");
        assert_eq!(with_target.en_passant_target(), None);
        assert_eq!(with_target.zobrist_key, without.zobrist_key);
        assert_eq!(generate_fen(&with_target), generate_fen(&without));
        assert!(with_target.is_repetition_of(&without));

        // A capturer pinned along the e-file cannot take either.
        let pinned = parse_fen("4r2k/8/8/3pP3/8/8/8/4K3 w - d6 0 2").expect("FEN should parse");
        assert_eq!(pinned.en_passant_target(), None);

        let open = parse_fen("8/8/8/K2pP3/8/8/8/7k w - d6 0 2").expect("FEN should parse");
        assert_eq!(open.en_passant_target(), Some(43));
    }

    #[test]
    fn en_passant_can_remove_a_checking_pawn() {
        let moves = legal("8/8/8/2k5/3Pp3/8/8/4K3 b - d3 0 1");
        assert!(moves.contains(&Move::en_passant(28, 19, 27)));
    }

    #[test]
    fn pinned_pawn_only_moves_along_its_pin() {
        // The f2 pawn is pinned on the e1-h4 diagonal and may not push.
        let moves = legal("k7/8/8/8/7b/8/5P2/4K3 w - - 0 1");
        let pawn: Vec<Move> = moves.into_iter().filter(|mv| mv.from == 13).collect();
        assert!(pawn.is_empty());
        // Capturing the pinner stays on the line.
        let moves = legal("k7/8/8/8/8/6b1/5P2/4K3 w - - 0 1");
        let pawn: Vec<Move> = moves.into_iter().filter(|mv| mv.from == 13).collect();
        assert_eq!(pawn, vec![Move::normal(13, 22)]);
    }
}
