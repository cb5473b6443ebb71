//! BoardState-to-FEN serializer.
//!
//! The en-passant field follows x-FEN: a target is written only while a
//! capture onto it is possible.

use crate::game_state::board_state::BoardState;
use crate::game_state::chess_types::*;
use crate::utils::algebraic::square_name;

pub fn generate_fen(state: &BoardState) -> String {
    let board = generate_board_field(state);
    let side_to_move = match state.side_to_move {
        Color::White => "w",
        Color::Black => "b",
    };
    let castling = generate_castling_field(state.castling_rights);
    let en_passant = state.en_passant_target().map_or("-", square_name);

    format!(
        "{} {} {} {} {} {}",
        board,
        side_to_move,
        castling,
        en_passant,
        state.halfmove_clock,
        state.fullmove_number()
    )
}

fn generate_board_field(state: &BoardState) -> String {
    let mut out = String::new();

    for rank in (0..8u8).rev() {
        let mut empty_count = 0u8;

        for file in 0..8u8 {
            if let Some(piece) = state.piece_on(square_at(rank, file)) {
                if empty_count > 0 {
                    out.push(char::from(b'0' + empty_count));
                    empty_count = 0;
                }
                out.push(piece_to_fen_char(piece));
            } else {
                empty_count += 1;
            }
        }

        if empty_count > 0 {
            out.push(char::from(b'0' + empty_count));
        }

        if rank > 0 {
            out.push('/');
        }
    }

    out
}

fn piece_to_fen_char(piece: Piece) -> char {
    let base = match piece.kind {
        PieceKind::Pawn => 'p',
        PieceKind::Knight => 'n',
        PieceKind::Bishop => 'b',
        PieceKind::Rook => 'r',
        PieceKind::Queen => 'q',
        PieceKind::King => 'k',
    };

    match piece.color {
        Color::White => base.to_ascii_uppercase(),
        Color::Black => base,
    }
}

fn generate_castling_field(rights: CastlingRights) -> String {
    if rights.is_empty() {
        return "-".to_owned();
    }

    rights
        .iter()
        .map(|(color, side)| match (color, side) {
            (Color::White, CastleSide::King) => 'K',
            (Color::White, CastleSide::Queen) => 'Q',
            (Color::Black, CastleSide::King) => 'k',
            (Color::Black, CastleSide::Queen) => 'q',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::generate_fen;
    use crate::game_state::chess_rules::STARTING_POSITION_FEN;
    use crate::utils::fen_parser::parse_fen;

    #[test]
    fn round_trips_canonical_fens() {
        for fen in [
            STARTING_POSITION_FEN,
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8",
            "4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 2",
            "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 b - - 17 42",
        ] {
            let state = parse_fen(fen).expect("FEN should parse");
            assert_eq!(generate_fen(&state), fen);
        }
    }

    #[test]
    fn drops_uncapturable_en_passant_and_normalizes_fullmove() {
        let state = parse_fen("4k3/8/8/3p4/8/8/8/4K3 w - d6 0 0").expect("FEN should parse");
        assert_eq!(generate_fen(&state), "4k3/8/8/3p4/8/8/8/4K3 w - - 0 1");
    }
}
