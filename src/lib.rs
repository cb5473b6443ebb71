//! Crate root module declarations for the chess rules core.
//!
//! This file exposes the subsystems (game state, geometry tables, hashing,
//! legal move generation, and text codecs) so benchmarks, tests, and
//! external search or UI code can import stable module paths.

pub mod chess_errors;

pub mod game_state {
    pub mod board_state;
    pub mod chess_rules;
    pub mod chess_types;
    pub mod composition;
    pub mod game_state;
}

pub mod moves {
    pub mod attack_rays;
    pub mod move_descriptions;
}

pub mod move_generation {
    pub mod attack_squares;
    pub mod draw_rules;
    pub mod legal_move_apply;
    pub mod legal_move_checks;
    pub mod legal_move_generator;
    pub mod legal_moves_king;
    pub mod legal_moves_pawn;
    pub mod legal_moves_ray;
    pub mod perft;
}

pub mod search {
    pub mod zobrist;
}

pub mod utils {
    pub mod algebraic;
    pub mod fen_generator;
    pub mod fen_parser;
    pub mod long_algebraic;
    pub mod render_game_state;
}
