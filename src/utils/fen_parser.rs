//! FEN-to-BoardState parser.
//!
//! Builds a fully-populated position from a Forsyth-Edwards Notation string,
//! including king squares, the material signature and the Zobrist key.
//! Beyond syntax it rejects positions no game could reach: a missing or
//! extra king, more material than promotions allow, pawns on a back rank,
//! castling rights without the king and rook at home, or an en-passant
//! square with no pawn behind it.

use crate::chess_errors::FenError;
use crate::game_state::board_state::{BoardState, EnPassant};
use crate::game_state::chess_rules::castle_geometry;
use crate::game_state::chess_types::*;
use crate::utils::algebraic::{algebraic_to_square, square_name};

const MAX_PIECES_PER_SIDE: usize = 16;
const MAX_PAWNS_PER_SIDE: usize = 8;
// Two originals plus eight promotions.
const MAX_PIECES_OF_KIND: usize = 10;

pub fn parse_fen(fen: &str) -> Result<BoardState, FenError> {
    let mut parts = fen.split_whitespace();

    let board_part = parts.next().ok_or(FenError::MissingField("board layout"))?;
    let side_part = parts.next().ok_or(FenError::MissingField("side-to-move"))?;
    let castling_part = parts.next().ok_or(FenError::MissingField("castling rights"))?;
    let en_passant_part = parts.next().ok_or(FenError::MissingField("en-passant square"))?;
    let halfmove_part = parts.next().ok_or(FenError::MissingField("halfmove clock"))?;
    let fullmove_part = parts.next().ok_or(FenError::MissingField("fullmove number"))?;

    if let Some(extra) = parts.next() {
        return Err(FenError::TrailingField(extra.to_owned()));
    }

    let mut state = BoardState::empty();

    parse_board(board_part, &mut state)?;
    validate_placement(&state)?;

    state.side_to_move = parse_side_to_move(side_part)?;
    state.castling_rights = parse_castling_rights(castling_part, &state)?;
    state.en_passant = parse_en_passant_square(en_passant_part, &state)?;

    state.halfmove_clock = halfmove_part
        .parse::<u16>()
        .map_err(|_| FenError::InvalidHalfmoveClock(halfmove_part.to_owned()))?;

    let fullmove_number = fullmove_part
        .parse::<u16>()
        .map_err(|_| FenError::InvalidFullmoveNumber(fullmove_part.to_owned()))?
        .max(1);
    let black_to_move = u16::from(state.side_to_move == Color::Black);
    state.ply_count = (fullmove_number - 1)
        .checked_mul(2)
        .and_then(|plies| plies.checked_add(black_to_move))
        .ok_or_else(|| FenError::InvalidFullmoveNumber(fullmove_part.to_owned()))?;

    state.recompute_derived();

    Ok(state)
}

fn parse_board(board_part: &str, state: &mut BoardState) -> Result<(), FenError> {
    let ranks: Vec<&str> = board_part.split('/').collect();
    if ranks.len() != 8 {
        return Err(FenError::RankCount(ranks.len()));
    }

    for (fen_rank_idx, rank_str) in ranks.iter().enumerate() {
        let board_rank = 7 - fen_rank_idx as u8;
        let width_error = FenError::RankWidth {
            rank: board_rank + 1,
        };
        let mut file = 0u8;

        for ch in rank_str.chars() {
            if let Some(empty_count) = ch.to_digit(10) {
                if !(1..=8).contains(&empty_count) {
                    return Err(FenError::InvalidPiece(ch));
                }
                file += empty_count as u8;
                if file > 8 {
                    return Err(width_error);
                }
                continue;
            }

            let piece = piece_from_fen_char(ch).ok_or(FenError::InvalidPiece(ch))?;

            if file >= 8 {
                return Err(width_error);
            }

            state.squares[square_at(board_rank, file) as usize] = Some(piece);
            file += 1;
        }

        if file != 8 {
            return Err(width_error);
        }
    }

    Ok(())
}

fn validate_placement(state: &BoardState) -> Result<(), FenError> {
    for color in [Color::White, Color::Black] {
        let mut counts = [0usize; 6];
        for piece in state.squares.iter().flatten().filter(|piece| piece.color == color) {
            counts[piece.kind.index()] += 1;
        }

        let kings = counts[PieceKind::King.index()];
        if kings != 1 {
            return Err(FenError::KingCount { color, count: kings });
        }

        let total: usize = counts.iter().sum();
        if total > MAX_PIECES_PER_SIDE {
            return Err(FenError::TooManyPieces { color, count: total });
        }

        for kind in [PieceKind::Pawn].into_iter().chain(PROMOTION_KINDS) {
            let limit = if kind == PieceKind::Pawn {
                MAX_PAWNS_PER_SIDE
            } else {
                MAX_PIECES_OF_KIND
            };
            let count = counts[kind.index()];
            if count > limit {
                return Err(FenError::TooManyOfKind { color, kind, count });
            }
        }
    }

    for (square, piece) in state.squares.iter().enumerate() {
        let square = square as Square;
        let back_rank = rank_of(square) == 0 || rank_of(square) == 7;
        if back_rank && matches!(piece, Some(p) if p.kind == PieceKind::Pawn) {
            return Err(FenError::PawnOnBackRank(square_name(square).to_owned()));
        }
    }

    Ok(())
}

fn parse_side_to_move(side_part: &str) -> Result<Color, FenError> {
    match side_part {
        "w" => Ok(Color::White),
        "b" => Ok(Color::Black),
        _ => Err(FenError::InvalidSideToMove(side_part.to_owned())),
    }
}

fn parse_castling_rights(
    castling_part: &str,
    state: &BoardState,
) -> Result<CastlingRights, FenError> {
    if castling_part == "-" {
        return Ok(CastlingRights::NONE);
    }

    let mut rights = CastlingRights::NONE;

    for ch in castling_part.chars() {
        let (color, side) = match ch {
            'K' => (Color::White, CastleSide::King),
            'Q' => (Color::White, CastleSide::Queen),
            'k' => (Color::Black, CastleSide::King),
            'q' => (Color::Black, CastleSide::Queen),
            _ => return Err(FenError::InvalidCastling(castling_part.to_owned())),
        };

        if rights.has(color, side) {
            return Err(FenError::InvalidCastling(castling_part.to_owned()));
        }

        let geometry = castle_geometry(color, side);
        let king_home =
            state.piece_on(geometry.king_from) == Some(Piece::new(color, PieceKind::King));
        let rook_home =
            state.piece_on(geometry.rook_from) == Some(Piece::new(color, PieceKind::Rook));
        if !king_home || !rook_home {
            return Err(FenError::InconsistentCastling(ch));
        }

        rights.insert(color, side);
    }

    Ok(rights)
}

/// The target must sit behind a pawn of the side that just moved, with the
/// target and the pawn's origin square both empty.
fn parse_en_passant_square(
    en_passant_part: &str,
    state: &BoardState,
) -> Result<Option<EnPassant>, FenError> {
    if en_passant_part == "-" {
        return Ok(None);
    }

    let invalid = || FenError::InvalidEnPassant(en_passant_part.to_owned());
    let target = algebraic_to_square(en_passant_part).ok_or_else(invalid)?;

    let (pusher, expected_rank) = match state.side_to_move {
        Color::White => (Color::Black, 5),
        Color::Black => (Color::White, 2),
    };
    if rank_of(target) != expected_rank {
        return Err(invalid());
    }

    let en_passant = EnPassant {
        target,
        capturable: false,
    };
    let origin = match pusher {
        Color::White => target - 8,
        Color::Black => target + 8,
    };
    let pushed_pawn =
        state.piece_on(en_passant.capture_square()) == Some(Piece::new(pusher, PieceKind::Pawn));
    if !pushed_pawn || state.piece_on(target).is_some() || state.piece_on(origin).is_some() {
        return Err(invalid());
    }

    Ok(Some(en_passant))
}

fn piece_from_fen_char(ch: char) -> Option<Piece> {
    let color = if ch.is_ascii_uppercase() {
        Color::White
    } else {
        Color::Black
    };
    let kind = match ch.to_ascii_lowercase() {
        'p' => PieceKind::Pawn,
        'n' => PieceKind::Knight,
        'b' => PieceKind::Bishop,
        'r' => PieceKind::Rook,
        'q' => PieceKind::Queen,
        'k' => PieceKind::King,
        _ => return None,
    };
    Some(Piece::new(color, kind))
}
