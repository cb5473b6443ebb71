//! Perft move-path enumeration over make/unmake.
//!
//! Draws by repetition, material or the fifty-move rule are ignored here so
//! counts match the published reference tables.

use crate::game_state::game_state::Board;
use crate::move_generation::legal_move_checks::analyze_checks_and_pins;
use crate::move_generation::legal_move_generator::LegalMoves;
use crate::moves::move_descriptions::{Move, MoveKind};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PerftCounts {
    pub nodes: u64,
    pub captures: u64,
    pub en_passant: u64,
    pub castles: u64,
    pub promotions: u64,
    pub checks: u64,
    pub double_checks: u64,
    pub checkmates: u64,
}

impl PerftCounts {
    fn merge(&mut self, rhs: PerftCounts) {
        self.nodes += rhs.nodes;
        self.captures += rhs.captures;
        self.en_passant += rhs.en_passant;
        self.castles += rhs.castles;
        self.promotions += rhs.promotions;
        self.checks += rhs.checks;
        self.double_checks += rhs.double_checks;
        self.checkmates += rhs.checkmates;
    }
}

fn generate(board: &mut Board) -> Vec<Move> {
    LegalMoves::without_draw_detection(board).collect()
}

/// Number of leaf positions `depth` plies below the current one.
pub fn perft(board: &mut Board, depth: u8) -> u64 {
    if depth == 0 {
        return 1;
    }

    let moves = generate(board);
    if depth == 1 {
        return moves.len() as u64;
    }

    let mut nodes = 0;
    for mv in moves {
        board.make_move(mv);
        nodes += perft(board, depth - 1);
        board.unmake_move();
    }
    nodes
}

/// Leaf counts per root move, in generation order.
pub fn perft_divide(board: &mut Board, depth: u8) -> Vec<(Move, u64)> {
    if depth == 0 {
        return Vec::new();
    }

    generate(board)
        .into_iter()
        .map(|mv| {
            board.make_move(mv);
            let nodes = perft(board, depth - 1);
            board.unmake_move();
            (mv, nodes)
        })
        .collect()
}

/// Leaf counts broken down by the kind of the last move played.
pub fn perft_detailed(board: &mut Board, depth: u8) -> PerftCounts {
    if depth == 0 {
        return PerftCounts {
            nodes: 1,
            ..PerftCounts::default()
        };
    }

    let mut total = PerftCounts::default();
    for mv in generate(board) {
        if depth == 1 {
            total.merge(leaf_counts(board, mv));
        } else {
            board.make_move(mv);
            total.merge(perft_detailed(board, depth - 1));
            board.unmake_move();
        }
    }
    total
}

fn leaf_counts(board: &mut Board, mv: Move) -> PerftCounts {
    let mut counts = PerftCounts {
        nodes: 1,
        ..PerftCounts::default()
    };

    match mv.kind {
        MoveKind::Normal => {
            if board.state().piece_on(mv.to).is_some() {
                counts.captures += 1;
            }
        }
        MoveKind::Castle(_) => counts.castles += 1,
        MoveKind::EnPassant { .. } => {
            counts.captures += 1;
            counts.en_passant += 1;
        }
        MoveKind::Promotion(_) => {
            counts.promotions += 1;
            if board.state().piece_on(mv.to).is_some() {
                counts.captures += 1;
            }
        }
    }

    board.make_move(mv);
    let checks = analyze_checks_and_pins(board.state());
    if checks.is_check {
        counts.checks += 1;
        if checks.is_double_check {
            counts.double_checks += 1;
        }
        if LegalMoves::without_draw_detection(board).next().is_none() {
            counts.checkmates += 1;
        }
    }
    board.unmake_move();

    counts
}
