//! Check and pin analysis for the side to move.
//!
//! Walks outward from the king once: knight jumps, bishop rays, rook rays,
//! then pawn attack squares. A hostile attacker with nothing in front of it
//! is a checker; one with exactly one friendly piece in front of it pins
//! that piece.

use smallvec::SmallVec;

use crate::game_state::board_state::BoardState;
use crate::game_state::chess_types::*;
use crate::moves::attack_rays::{attack_rays, pawn_attacks};

/// A friendly piece that may only move along `line`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pin {
    pub pinned: Square,
    /// From the square next to the king up to and including the pinner.
    pub line: SquareSet,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckInfo {
    pub is_check: bool,
    pub is_double_check: bool,
    /// Squares a non-king move must land on to resolve a single check:
    /// the checker and everything between it and the king.
    pub block_or_capture: SquareSet,
    pub pins: SmallVec<[Pin; 8]>,
}

impl CheckInfo {
    #[inline]
    pub fn pin_line(&self, square: Square) -> Option<SquareSet> {
        self.pins
            .iter()
            .find(|pin| pin.pinned == square)
            .map(|pin| pin.line)
    }

    /// Pin and check filter for a non-king move.
    #[inline]
    pub fn allows(&self, from: Square, to: Square) -> bool {
        if let Some(line) = self.pin_line(from) {
            if !line.contains(to) {
                return false;
            }
        }
        !self.is_check || self.block_or_capture.contains(to)
    }

    /// Same as [`CheckInfo::allows`], except that removing the checking
    /// pawn on `captured` also resolves a check.
    #[inline]
    pub fn allows_en_passant(&self, from: Square, to: Square, captured: Square) -> bool {
        if let Some(line) = self.pin_line(from) {
            if !line.contains(to) {
                return false;
            }
        }
        !self.is_check
            || self.block_or_capture.contains(captured)
            || self.block_or_capture.contains(to)
    }

    fn record_check(&mut self, path: &[Square]) {
        if self.is_check {
            self.is_double_check = true;
        } else {
            self.is_check = true;
            self.block_or_capture = path.iter().copied().collect();
        }
    }
}

pub fn analyze_checks_and_pins(state: &BoardState) -> CheckInfo {
    let us = state.side_to_move;
    let them = us.opposite();
    let king = state.king_square(us);
    let mut info = CheckInfo::default();

    for ray in attack_rays(king, PieceKind::Knight) {
        if state.piece_on(ray[0]) == Some(Piece::new(them, PieceKind::Knight)) {
            info.record_check(&ray[..1]);
        }
    }

    for line_kind in [PieceKind::Bishop, PieceKind::Rook] {
        for ray in attack_rays(king, line_kind) {
            let mut blocker = None;

            for (distance, &square) in ray.iter().enumerate() {
                let Some(piece) = state.piece_on(square) else {
                    continue;
                };

                if piece.color == us {
                    if blocker.is_some() {
                        break;
                    }
                    blocker = Some(square);
                    continue;
                }

                if piece.kind == line_kind || piece.kind == PieceKind::Queen {
                    let line = &ray[..=distance];
                    match blocker {
                        None => info.record_check(line),
                        Some(pinned) => info.pins.push(Pin {
                            pinned,
                            line: line.iter().copied().collect(),
                        }),
                    }
                }
                break;
            }
        }
    }

    for &square in pawn_attacks(king, us) {
        if state.piece_on(square) == Some(Piece::new(them, PieceKind::Pawn)) {
            info.record_check(&[square]);
        }
    }

    info
}

#[cfg(test)]
mod tests {
    use super::analyze_checks_and_pins;
    use crate::utils::fen_parser::parse_fen;

    fn analyze(fen: &str) -> super::CheckInfo {
        analyze_checks_and_pins(&parse_fen(fen).expect("FEN should parse"))
    }

    #[test]
    fn quiet_position_has_no_checks_or_pins() {
        let info = analyze("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1");
        assert!(!info.is_check);
        assert!(info.pins.is_empty());
    }

    #[test]
    fn slider_check_blocks_along_the_whole_line() {
        // Rook a8 checks the king on e8 along the back rank.
        let info = analyze("R3k3/8/8/8/8/8/8/4K3 b - - 0 1");
        assert!(info.is_check);
        assert!(!info.is_double_check);
        assert_eq!(info.block_or_capture.iter().collect::<Vec<_>>(), vec![56, 57, 58, 59]);
    }

    #[test]
    fn knight_and_pawn_checks_are_single_squares() {
        let knight = analyze("4k3/8/3N4/8/8/8/8/4K3 b - - 0 1");
        assert!(knight.is_check);
        assert_eq!(knight.block_or_capture.iter().collect::<Vec<_>>(), vec![43]);

        let pawn = analyze("4k3/8/8/8/8/8/3p4/4K3 w - - 0 1");
        assert!(pawn.is_check);
        assert_eq!(pawn.block_or_capture.iter().collect::<Vec<_>>(), vec![11]);
    }

    #[test]
    fn two_checkers_make_a_double_check() {
        let info = analyze("3rk3/8/8/1B6/8/8/8/4RK2 b - - 0 1");
        assert!(info.is_check);
        assert!(info.is_double_check);
    }

    #[test]
    fn single_blocker_is_pinned_but_two_blockers_are_not() {
        let pinned = analyze("k7/4r3/8/8/8/8/4R3/4K3 w - - 0 1");
        let line = pinned.pin_line(12).expect("e2 rook should be pinned");
        assert_eq!(line.iter().collect::<Vec<_>>(), vec![12, 20, 28, 36, 44, 52]);
        assert!(!pinned.is_check);

        let shielded = analyze("k7/4r3/8/8/4B3/8/4R3/4K3 w - - 0 1");
        assert!(shielded.pins.is_empty());

        let diagonal = analyze("k7/8/8/8/7b/8/5N2/4K3 w - - 0 1");
        assert!(diagonal.pin_line(13).is_some());
    }
}
