//! Lazy legal move generation.
//!
//! [`LegalMoves`] produces moves one generation step at a time: king steps,
//! castles, then each remaining piece in square order. A caller that only
//! needs to know whether a move exists stops after the first one.
//!
//! When generation runs to the end without producing a move, the current
//! state is classified as checkmate or stalemate. Positional draws are
//! detected up front, before any move is produced.

use std::iter::FusedIterator;

use smallvec::SmallVec;
use tracing::debug;

use crate::game_state::board_state::GameEnd;
use crate::game_state::chess_types::*;
use crate::game_state::game_state::Board;
use crate::move_generation::attack_squares::{build_attack_set, AttackSet};
use crate::move_generation::draw_rules::detect_draw;
use crate::move_generation::legal_move_checks::{analyze_checks_and_pins, CheckInfo};
use crate::move_generation::legal_moves_king::{generate_castling_moves, generate_king_moves};
use crate::move_generation::legal_moves_pawn::generate_pawn_moves;
use crate::move_generation::legal_moves_ray::generate_ray_moves;
use crate::moves::move_descriptions::Move;

/// Scratch buffer filled by one generation step.
pub type MoveBuffer = SmallVec<[Move; 32]>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    King,
    Castles,
    Pieces(Square),
    Exhausted,
    Done,
}

#[derive(Debug)]
struct Analysis {
    checks: CheckInfo,
    attacks: AttackSet,
}

pub struct LegalMoves<'a> {
    board: &'a mut Board,
    analysis: Option<Analysis>,
    phase: Phase,
    pending: MoveBuffer,
    cursor: usize,
    found: bool,
}

impl<'a> LegalMoves<'a> {
    pub(crate) fn new(board: &'a mut Board) -> Self {
        if let Some(draw) = detect_draw(board.history()) {
            let state = board.current_mut();
            debug!(reason = ?draw, ply = state.ply_count, "game end classified");
            state.game_end = Some(draw);
            return Self::finished(board);
        }
        Self::without_draw_detection(board)
    }

    /// Generates from the current position even if it is a positional draw.
    pub(crate) fn without_draw_detection(board: &'a mut Board) -> Self {
        let state = board.state();
        let analysis = Analysis {
            checks: analyze_checks_and_pins(state),
            attacks: build_attack_set(state, state.side_to_move.opposite()),
        };

        Self {
            board,
            analysis: Some(analysis),
            phase: Phase::King,
            pending: MoveBuffer::new(),
            cursor: 0,
            found: false,
        }
    }

    fn finished(board: &'a mut Board) -> Self {
        Self {
            board,
            analysis: None,
            phase: Phase::Done,
            pending: MoveBuffer::new(),
            cursor: 0,
            found: false,
        }
    }

    /// Runs the current phase, filling `pending`, and picks the next one.
    fn advance(&mut self) {
        if self.phase == Phase::Exhausted {
            if !self.found {
                self.classify_no_moves();
            }
            self.phase = Phase::Done;
            return;
        }

        let Some(analysis) = self.analysis.as_ref() else {
            self.phase = Phase::Done;
            return;
        };
        let state = self.board.state();

        self.phase = match self.phase {
            Phase::King => {
                generate_king_moves(state, &analysis.attacks, &mut self.pending);
                if analysis.checks.is_double_check {
                    Phase::Exhausted
                } else {
                    Phase::Castles
                }
            }
            Phase::Castles => {
                generate_castling_moves(
                    state,
                    &analysis.checks,
                    &analysis.attacks,
                    &mut self.pending,
                );
                Phase::Pieces(0)
            }
            Phase::Pieces(64) => Phase::Exhausted,
            Phase::Pieces(square) => {
                if let Some(piece) = state.piece_on(square) {
                    if piece.color == state.side_to_move {
                        match piece.kind {
                            PieceKind::King => {}
                            PieceKind::Pawn => generate_pawn_moves(
                                state,
                                square,
                                &analysis.checks,
                                &mut self.pending,
                            ),
                            kind => generate_ray_moves(
                                state,
                                square,
                                kind,
                                &analysis.checks,
                                &mut self.pending,
                            ),
                        }
                    }
                }
                Phase::Pieces(square + 1)
            }
            Phase::Exhausted | Phase::Done => Phase::Done,
        };
    }

    fn classify_no_moves(&mut self) {
        let in_check = self
            .analysis
            .as_ref()
            .is_some_and(|analysis| analysis.checks.is_check);
        let state = self.board.current_mut();
        let end = if in_check {
            GameEnd::Checkmate {
                winner: state.side_to_move.opposite(),
            }
        } else {
            GameEnd::Stalemate
        };
        debug!(reason = ?end, ply = state.ply_count, "game end classified");
        state.game_end = Some(end);
    }
}

impl Iterator for LegalMoves<'_> {
    type Item = Move;

    fn next(&mut self) -> Option<Move> {
        loop {
            if let Some(&mv) = self.pending.get(self.cursor) {
                self.cursor += 1;
                self.found = true;
                return Some(mv);
            }
            if self.phase == Phase::Done {
                return None;
            }
            self.pending.clear();
            self.cursor = 0;
            self.advance();
        }
    }
}

impl FusedIterator for LegalMoves<'_> {}
