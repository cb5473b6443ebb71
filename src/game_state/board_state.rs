//! One position snapshot in a game's history.
//!
//! `BoardState` stores piece placement, side and rights flags, clocks and the
//! incrementally maintained identity fields (Zobrist key, material
//! signature, king squares). The piece-placement helpers here are the only
//! writers of `squares`, so the derived fields can never drift from it.

use std::fmt;

use crate::game_state::chess_types::*;
use crate::game_state::composition::Composition;
use crate::move_generation::legal_moves_pawn::has_legal_en_passant;
use crate::search::zobrist::{compute_zobrist_key, en_passant_file_key, piece_square_key};
use crate::utils::render_game_state::render_game_state;

/// Square skipped by the last double pawn push.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EnPassant {
    pub target: Square,
    /// The side to move has a legal capture onto `target`.
    pub capturable: bool,
}

impl EnPassant {
    /// Square of the pawn that made the double push.
    #[inline]
    pub const fn capture_square(self) -> Square {
        if rank_of(self.target) == 2 {
            self.target + 8
        } else {
            self.target - 8
        }
    }
}

/// Why the game is over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameEnd {
    Checkmate { winner: Color },
    Stalemate,
    ThreefoldRepetition,
    FiftyMove,
    InsufficientMaterial,
}

impl GameEnd {
    /// `None` for every drawn outcome.
    #[inline]
    pub const fn winner(self) -> Option<Color> {
        match self {
            GameEnd::Checkmate { winner } => Some(winner),
            _ => None,
        }
    }

    #[inline]
    pub const fn is_draw(self) -> bool {
        !matches!(self, GameEnd::Checkmate { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardState {
    pub squares: [Option<Piece>; 64],
    // [color]
    pub king_squares: [Square; 2],

    pub side_to_move: Color,
    pub castling_rights: CastlingRights,
    pub en_passant: Option<EnPassant>,

    pub halfmove_clock: u16,
    pub ply_count: u16,

    pub zobrist_key: u64,
    pub composition: Composition,

    pub game_end: Option<GameEnd>,
}

impl BoardState {
    /// No pieces, white to move, no rights. Only meaningful as a starting
    /// point for a parser that then calls [`BoardState::recompute_derived`].
    pub(crate) fn empty() -> Self {
        Self {
            squares: [None; 64],
            king_squares: [0; 2],
            side_to_move: Color::White,
            castling_rights: CastlingRights::NONE,
            en_passant: None,
            halfmove_clock: 0,
            ply_count: 0,
            zobrist_key: 0,
            composition: Composition::from_squares(&[None; 64]),
            game_end: None,
        }
    }

    #[inline]
    pub fn piece_on(&self, square: Square) -> Option<Piece> {
        self.squares[square as usize]
    }

    #[inline]
    pub fn king_square(&self, color: Color) -> Square {
        self.king_squares[color.index()]
    }

    /// Fullmove number as written in FEN, starting at 1.
    #[inline]
    pub fn fullmove_number(&self) -> u16 {
        self.ply_count / 2 + 1
    }

    /// The en-passant target, only while a capture onto it is possible.
    #[inline]
    pub fn en_passant_target(&self) -> Option<Square> {
        self.en_passant
            .filter(|ep| ep.capturable)
            .map(|ep| ep.target)
    }

    /// Same placement, side to move, castling rights and en-passant
    /// availability. Clocks and counters are ignored.
    pub fn is_repetition_of(&self, other: &BoardState) -> bool {
        self.side_to_move == other.side_to_move
            && self.castling_rights == other.castling_rights
            && self.en_passant_target() == other.en_passant_target()
            && self.squares == other.squares
    }

    /// Rebuilds every field derived from placement and flags.
    pub(crate) fn recompute_derived(&mut self) {
        for (square, piece) in self.squares.iter().enumerate() {
            if let Some(piece) = piece {
                if piece.kind == PieceKind::King {
                    self.king_squares[piece.color.index()] = square as Square;
                }
            }
        }

        if let Some(ep) = self.en_passant {
            let capturable = has_legal_en_passant(self, ep.target);
            self.en_passant = Some(EnPassant { capturable, ..ep });
        }

        self.composition = Composition::from_squares(&self.squares);
        self.zobrist_key = compute_zobrist_key(self);
    }

    pub(crate) fn put_piece(&mut self, square: Square, piece: Piece) {
        debug_assert!(self.squares[square as usize].is_none());
        self.squares[square as usize] = Some(piece);
        self.zobrist_key ^= piece_square_key(piece, square);
        self.composition.add(piece, square);
        if piece.kind == PieceKind::King {
            self.king_squares[piece.color.index()] = square;
        }
    }

    pub(crate) fn remove_piece(&mut self, square: Square) -> Option<Piece> {
        let piece = self.squares[square as usize].take()?;
        self.zobrist_key ^= piece_square_key(piece, square);
        self.composition.remove(piece, square);
        Some(piece)
    }

    /// Moves whatever stands on `from` to the empty square `to`.
    pub(crate) fn move_piece(&mut self, from: Square, to: Square) -> Piece {
        let Some(piece) = self.remove_piece(from) else {
            panic!("no piece on square {from} to move");
        };
        self.put_piece(to, piece);
        piece
    }

    /// Replaces the en-passant status, keeping the key in step.
    pub(crate) fn set_en_passant(&mut self, en_passant: Option<EnPassant>) {
        if let Some(target) = self.en_passant_target() {
            self.zobrist_key ^= en_passant_file_key(file_of(target));
        }
        self.en_passant = en_passant;
        if let Some(target) = self.en_passant_target() {
            self.zobrist_key ^= en_passant_file_key(file_of(target));
        }
    }
}

impl fmt::Display for BoardState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render_game_state(self))
    }
}
