//! Errors used throughout the rules core.
//!
//! Malformed input (FEN text, UCI move text) is reported through these typed
//! errors. Precondition violations such as making an illegal move are
//! programmer errors and panic instead.

use thiserror::Error;

use crate::game_state::chess_types::{Color, PieceKind};

/// A FEN string that could not be turned into a position.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FenError {
    #[error("missing {0} field in FEN")]
    MissingField(&'static str),

    #[error("FEN has extra trailing fields: {0}")]
    TrailingField(String),

    #[error("board layout must contain 8 ranks, found {0}")]
    RankCount(usize),

    #[error("rank {rank} does not sum to 8 files")]
    RankWidth { rank: u8 },

    #[error("invalid piece character '{0}' in board layout")]
    InvalidPiece(char),

    #[error("invalid side-to-move field: {0}")]
    InvalidSideToMove(String),

    #[error("invalid castling rights field: {0}")]
    InvalidCastling(String),

    #[error("castling right '{0}' needs king and rook on their home squares")]
    InconsistentCastling(char),

    #[error("invalid en-passant square: {0}")]
    InvalidEnPassant(String),

    #[error("invalid halfmove clock: {0}")]
    InvalidHalfmoveClock(String),

    #[error("invalid fullmove number: {0}")]
    InvalidFullmoveNumber(String),

    #[error("{color:?} must have exactly one king, found {count}")]
    KingCount { color: Color, count: usize },

    #[error("pawn on back rank square {0}")]
    PawnOnBackRank(String),

    #[error("{color:?} has {count} pieces, at most 16 are possible")]
    TooManyPieces { color: Color, count: usize },

    #[error("{color:?} has {count} of {kind:?}, more than any game can reach")]
    TooManyOfKind {
        color: Color,
        kind: PieceKind,
        count: usize,
    },
}

/// UCI move text that does not name a legal move.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveParseError {
    #[error("malformed move text: {0}")]
    InvalidText(String),

    #[error("no piece of the side to move on {0}")]
    NoPiece(String),

    #[error("move {0} is not legal in this position")]
    Illegal(String),
}

/// Crate-level error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChessError {
    #[error(transparent)]
    Fen(#[from] FenError),

    #[error(transparent)]
    Move(#[from] MoveParseError),
}

pub type ChessResult<T> = Result<T, ChessError>;
