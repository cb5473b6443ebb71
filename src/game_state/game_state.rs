//! The live game: a history stack of position snapshots.
//!
//! `Board` owns every `BoardState` from the loaded position to the current
//! one. `make_move` pushes a fully derived copy, `unmake_move` pops it, so
//! undo restores every field exactly without inverting any incremental
//! update. Callers should re-fetch [`Board::state`] after each mutation
//! rather than holding on to it.

use tracing::debug;

use crate::chess_errors::{ChessResult, FenError, MoveParseError};
use crate::game_state::board_state::{BoardState, GameEnd};
use crate::game_state::chess_rules::STARTING_POSITION_FEN;
use crate::game_state::chess_types::*;
use crate::game_state::composition::Composition;
use crate::move_generation::legal_move_apply::apply_move;
use crate::move_generation::legal_move_checks::analyze_checks_and_pins;
use crate::move_generation::legal_move_generator::LegalMoves;
use crate::moves::move_descriptions::Move;
use crate::utils::fen_generator::generate_fen;
use crate::utils::fen_parser::parse_fen;
use crate::utils::long_algebraic::parse_long_algebraic;

/// Plies of history allocated up front.
pub const HISTORY_CAPACITY: usize = 256;

#[derive(Debug, Clone)]
pub struct Board {
    // Never empty; index 0 is the loaded position.
    history: Vec<BoardState>,
    // `moves[i]` leads from `history[i]` to `history[i + 1]`.
    moves: Vec<Move>,
}

impl Board {
    #[inline]
    pub fn new_game() -> Self {
        Self::from_fen(STARTING_POSITION_FEN).expect("starting FEN should always parse")
    }

    /// Loads a position and classifies it immediately, so
    /// [`Board::game_end`] is meaningful before any move is generated.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        let state = parse_fen(fen)?;
        debug!(fen, zobrist_key = state.zobrist_key, "loaded position from FEN");

        let mut history = Vec::with_capacity(HISTORY_CAPACITY);
        history.push(state);
        let mut board = Self {
            history,
            moves: Vec::with_capacity(HISTORY_CAPACITY),
        };
        board.refresh_game_end();
        Ok(board)
    }

    /// A FEN followed by UCI moves, as in a UCI `position` command.
    pub fn from_position(fen: &str, moves: &[&str]) -> ChessResult<Self> {
        let mut board = Self::from_fen(fen)?;
        for text in moves {
            board.play_uci(text)?;
        }
        Ok(board)
    }

    /// The current position.
    #[inline]
    pub fn state(&self) -> &BoardState {
        &self.history[self.history.len() - 1]
    }

    #[inline]
    pub(crate) fn current_mut(&mut self) -> &mut BoardState {
        let top = self.history.len() - 1;
        &mut self.history[top]
    }

    /// Every position from the loaded one to the current one.
    #[inline]
    pub fn history(&self) -> &[BoardState] {
        &self.history
    }

    /// Moves played since the loaded position.
    #[inline]
    pub fn moves_played(&self) -> &[Move] {
        &self.moves
    }

    #[inline]
    pub fn to_fen(&self) -> String {
        generate_fen(self.state())
    }

    /// Lazily generated legal moves. Exhausting the iterator without a move
    /// records checkmate or stalemate on the current position.
    #[inline]
    pub fn moves(&mut self) -> LegalMoves<'_> {
        LegalMoves::new(self)
    }

    pub fn legal_moves(&mut self) -> Vec<Move> {
        self.moves().collect()
    }

    #[inline]
    pub fn has_legal_move(&mut self) -> bool {
        self.moves().next().is_some()
    }

    /// Classifies the current position and returns the result.
    pub fn refresh_game_end(&mut self) -> Option<GameEnd> {
        if self.has_legal_move() {
            self.current_mut().game_end = None;
        }
        self.game_end()
    }

    /// Plays `mv`, which must be one of [`Board::legal_moves`].
    ///
    /// # Panics
    ///
    /// If the from-square does not hold a piece of the side to move, or,
    /// with the `validate` feature, if `mv` is not legal here.
    pub fn make_move(&mut self, mv: Move) {
        let state = self.state();
        if !matches!(state.piece_on(mv.from), Some(piece) if piece.color == state.side_to_move) {
            panic!(
                "make_move: {mv} does not move a piece of the side to move in {}",
                self.to_fen()
            );
        }

        #[cfg(feature = "validate")]
        {
            let legal = LegalMoves::without_draw_detection(self).any(|candidate| candidate == mv);
            assert!(legal, "make_move: {mv} is not legal in {}", self.to_fen());
        }

        let mut next = self.state().clone();
        apply_move(&mut next, mv);

        #[cfg(any(debug_assertions, feature = "validate"))]
        {
            assert_eq!(
                next.zobrist_key,
                crate::search::zobrist::compute_zobrist_key(&next),
                "incremental zobrist key diverged after {mv}"
            );
            assert_eq!(
                next.composition,
                Composition::from_squares(&next.squares),
                "incremental composition diverged after {mv}"
            );
        }

        self.history.push(next);
        self.moves.push(mv);
    }

    /// Takes back the last move and returns it.
    ///
    /// # Panics
    ///
    /// At the loaded position, where there is nothing to undo.
    pub fn unmake_move(&mut self) -> Move {
        let Some(mv) = self.moves.pop() else {
            panic!("unmake_move called at the root of the history");
        };
        self.history.pop();
        mv
    }

    /// Parses UCI move text against the current position and plays it.
    pub fn play_uci(&mut self, text: &str) -> Result<Move, MoveParseError> {
        let mv = parse_long_algebraic(text, self.state())?;
        if !self.moves().any(|candidate| candidate == mv) {
            return Err(MoveParseError::Illegal(text.to_owned()));
        }
        self.make_move(mv);
        Ok(mv)
    }

    #[inline]
    pub fn zobrist_key(&self) -> u64 {
        self.state().zobrist_key
    }

    #[inline]
    pub fn composition(&self) -> Composition {
        self.state().composition
    }

    /// Packed material signature, see [`Composition`].
    #[inline]
    pub fn material_signature(&self) -> u64 {
        self.state().composition.bits()
    }

    #[inline]
    pub fn game_end(&self) -> Option<GameEnd> {
        self.state().game_end
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.state().side_to_move
    }

    pub fn is_check(&self) -> bool {
        analyze_checks_and_pins(self.state()).is_check
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new_game()
    }
}

#[cfg(test)]
mod tests {
    use super::Board;
    use crate::chess_errors::{ChessError, FenError, MoveParseError};
    use crate::game_state::board_state::BoardState;
    use crate::game_state::chess_rules::STARTING_POSITION_FEN;
    use crate::game_state::composition::Composition;
    use crate::moves::move_descriptions::Move;
    use crate::search::zobrist::compute_zobrist_key;
    use crate::utils::fen_generator::generate_fen;
    use crate::utils::fen_parser::parse_fen;

    const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
    const POSITION_3: &str = "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1";
    const POSITION_4: &str = "r2q1rk1/pP1p2pp/Q4n2/bbp1p3/Np6/1B3NBn/pPPP1PPP/R3K2R b KQ - 0 1";

    fn assert_round_trips(state: &BoardState) {
        let fen = generate_fen(state);
        let reparsed = parse_fen(&fen).expect("generated FEN should parse");
        assert_eq!(generate_fen(&reparsed), fen);
        assert_eq!(reparsed.zobrist_key, state.zobrist_key, "{fen}");
        assert_eq!(reparsed.composition, state.composition, "{fen}");
        assert_eq!(reparsed.king_squares, state.king_squares, "{fen}");
        assert_eq!(reparsed.halfmove_clock, state.halfmove_clock, "{fen}");
        assert_eq!(reparsed.ply_count, state.ply_count, "{fen}");
        assert!(reparsed.is_repetition_of(state), "{fen}");
    }

    /// Every make/unmake pair restores the position exactly, the incremental
    /// key always matches a recompute, and every position survives FEN.
    fn walk(board: &mut Board, depth: u8) {
        assert_eq!(board.zobrist_key(), compute_zobrist_key(board.state()));
        assert_eq!(board.composition(), Composition::from_squares(&board.state().squares));
        assert_round_trips(board.state());

        if depth == 0 {
            return;
        }

        for mv in board.legal_moves() {
            let before = board.state().clone();
            board.make_move(mv);
            walk(board, depth - 1);
            assert_eq!(board.unmake_move(), mv);
            assert_eq!(board.state(), &before, "unmake after {mv}");
        }
    }

    #[test]
    fn make_unmake_and_fen_invariants_hold_across_traversals() {
        for (fen, depth) in [
            (STARTING_POSITION_FEN, 3),
            (KIWIPETE, 2),
            (POSITION_3, 3),
            (POSITION_4, 2),
        ] {
            let mut board = Board::from_fen(fen).expect("FEN should parse");
            walk(&mut board, depth);
            assert_eq!(board.history().len(), 1);
        }
    }

    #[test]
    fn play_uci_rejects_illegal_moves_without_changing_state() {
        let mut board = Board::new_game();
        let before = board.state().clone();

        assert_eq!(
            board.play_uci("e2e5"),
            Err(MoveParseError::Illegal("e2e5".to_owned()))
        );
        assert_eq!(board.play_uci("e7e5"), Err(MoveParseError::NoPiece("e7".to_owned())));
        assert_eq!(board.state(), &before);

        assert_eq!(board.play_uci("e2e4"), Ok(Move::normal(12, 28)));
        assert_eq!(board.moves_played(), &[Move::normal(12, 28)]);
    }

    #[test]
    fn from_position_replays_moves() {
        let board = Board::from_position(STARTING_POSITION_FEN, &["e2e4", "e7e5", "g1f3"])
            .expect("scripted moves should be legal");
        assert_eq!(
            board.to_fen(),
            "rnbqkbnr/pppp1ppp/8/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R b KQkq - 1 2"
        );

        let err = Board::from_position(STARTING_POSITION_FEN, &["e2e4", "e2e4"])
            .expect_err("second e2e4 has no piece");
        assert_eq!(err, ChessError::Move(MoveParseError::NoPiece("e2".to_owned())));

        let err = Board::from_position("8/8 w - - 0 1", &[]).expect_err("FEN is malformed");
        assert_eq!(err, ChessError::Fen(FenError::RankCount(2)));
    }

    #[test]
    fn identity_accessors_follow_the_current_state() {
        let mut board = Board::new_game();
        let start_key = board.zobrist_key();
        assert_eq!(board.material_signature(), Composition::starting_position().bits());

        board.play_uci("e2e4").expect("scripted move should be legal");
        assert_ne!(board.zobrist_key(), start_key);
        board.unmake_move();
        assert_eq!(board.zobrist_key(), start_key);
    }

    #[test]
    #[should_panic(expected = "root of the history")]
    fn unmake_at_root_panics() {
        let mut board = Board::new_game();
        board.unmake_move();
    }

    #[test]
    #[should_panic(expected = "does not move a piece of the side to move")]
    fn make_move_from_an_empty_square_panics() {
        let mut board = Board::new_game();
        board.make_move(Move::normal(28, 36));
    }
}
