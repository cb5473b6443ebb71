//! Precomputed empty-board geometry.
//!
//! For every square and piece kind, the ordered rays a piece walks outward
//! along until the board edge (sliders) or a single step (knight, king).
//! Blocking is a runtime concern and is never baked into the tables. Pawn
//! captures and pushes are stored per color because they are asymmetric.

use std::sync::OnceLock;

use smallvec::SmallVec;

use crate::game_state::chess_types::{file_of, rank_of, square_at, Color, PieceKind, Square};

/// Squares in walking order, nearest first.
pub type Ray = SmallVec<[Square; 7]>;

const KNIGHT_STEPS: [(i8, i8); 8] = [
    (-2, 1),
    (-2, -1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, 1),
    (2, -1),
];
const BISHOP_DIRS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
const ROOK_DIRS: [(i8, i8); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];
const QUEEN_DIRS: [(i8, i8); 8] = [
    (0, 1),
    (0, -1),
    (1, 0),
    (-1, 0),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

#[derive(Debug)]
struct RayTables {
    // [square][piece kind]; the pawn slot stays empty.
    rays: Vec<[Vec<Ray>; 6]>,
    // [square][color]
    pawn_attacks: Vec<[SmallVec<[Square; 2]>; 2]>,
    pawn_pushes: Vec<[SmallVec<[Square; 2]>; 2]>,
}

static TABLES: OnceLock<RayTables> = OnceLock::new();

#[inline]
fn tables() -> &'static RayTables {
    TABLES.get_or_init(build_tables)
}

/// Walk from `start` in direction `(d_rank, d_file)` for at most `max_len` squares.
fn travel(start: Square, d_rank: i8, d_file: i8, max_len: usize) -> Ray {
    let mut rank = rank_of(start) as i8 + d_rank;
    let mut file = file_of(start) as i8 + d_file;
    let mut ray = Ray::new();

    while (0..8).contains(&rank) && (0..8).contains(&file) && ray.len() < max_len {
        ray.push(square_at(rank as u8, file as u8));
        rank += d_rank;
        file += d_file;
    }

    ray
}

fn rays_for(square: Square, dirs: &[(i8, i8)], max_len: usize) -> Vec<Ray> {
    dirs.iter()
        .map(|&(d_rank, d_file)| travel(square, d_rank, d_file, max_len))
        .filter(|ray| !ray.is_empty())
        .collect()
}

fn build_tables() -> RayTables {
    let mut rays = Vec::with_capacity(64);
    let mut pawn_attacks = Vec::with_capacity(64);
    let mut pawn_pushes = Vec::with_capacity(64);

    for square in 0..64u8 {
        rays.push([
            Vec::new(),
            rays_for(square, &KNIGHT_STEPS, 1),
            rays_for(square, &BISHOP_DIRS, usize::MAX),
            rays_for(square, &ROOK_DIRS, usize::MAX),
            rays_for(square, &QUEEN_DIRS, usize::MAX),
            rays_for(square, &QUEEN_DIRS, 1),
        ]);

        let attacks = |d_rank: i8| -> SmallVec<[Square; 2]> {
            [-1i8, 1]
                .into_iter()
                .filter_map(|d_file| travel(square, d_rank, d_file, 1).first().copied())
                .collect()
        };
        pawn_attacks.push([attacks(1), attacks(-1)]);

        let white_push = if rank_of(square) == 1 { 2 } else { 1 };
        let black_push = if rank_of(square) == 6 { 2 } else { 1 };
        pawn_pushes.push([
            SmallVec::from_slice(&travel(square, 1, 0, white_push)),
            SmallVec::from_slice(&travel(square, -1, 0, black_push)),
        ]);
    }

    RayTables {
        rays,
        pawn_attacks,
        pawn_pushes,
    }
}

/// Rays for `kind` from `square` on an empty board. Pawns have no entry here;
/// use [`pawn_attacks`] and [`pawn_pushes`].
#[inline]
pub fn attack_rays(square: Square, kind: PieceKind) -> &'static [Ray] {
    &tables().rays[square as usize][kind.index()]
}

/// Diagonal capture squares of a `color` pawn on `square`.
#[inline]
pub fn pawn_attacks(square: Square, color: Color) -> &'static [Square] {
    &tables().pawn_attacks[square as usize][color.index()]
}

/// Forward push path of a `color` pawn on `square` (two squares from its home rank).
#[inline]
pub fn pawn_pushes(square: Square, color: Color) -> &'static [Square] {
    &tables().pawn_pushes[square as usize][color.index()]
}
