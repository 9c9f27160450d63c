//! Precomputed attack tables.
//!
//! Leaper attacks (pawn, knight, king) are built at compile time. Slider
//! attacks use magic bitboards: for every square the relevant occupancy is
//! multiplied by a magic factor and shifted down to index a dense table of
//! attack sets. Magics are found once at first use by a seeded random search
//! that checks every occupancy subset against ray-cast references, so the
//! tables are correct by construction.

use once_cell::sync::Lazy;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::types::{Bitboard, Color, Square};

const ROOK_DIRECTIONS: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
const BISHOP_DIRECTIONS: [(i32, i32); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

const MAGIC_SEED: u64 = 0x5EED_0F_4D41_4749;

const fn leaper_table(deltas: &[(i32, i32)]) -> [u64; 64] {
    let mut table = [0u64; 64];
    let mut sq = 0;
    while sq < 64 {
        let rank = (sq / 8) as i32;
        let file = (sq % 8) as i32;
        let mut i = 0;
        while i < deltas.len() {
            let r = rank + deltas[i].0;
            let f = file + deltas[i].1;
            if r >= 0 && r < 8 && f >= 0 && f < 8 {
                table[sq] |= 1u64 << (r * 8 + f);
            }
            i += 1;
        }
        sq += 1;
    }
    table
}

static KNIGHT_ATTACKS: [u64; 64] = leaper_table(&[
    (2, 1),
    (2, -1),
    (-2, 1),
    (-2, -1),
    (1, 2),
    (1, -2),
    (-1, 2),
    (-1, -2),
]);

static KING_ATTACKS: [u64; 64] = leaper_table(&[
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
]);

static PAWN_ATTACKS: [[u64; 64]; 2] = [
    leaper_table(&[(1, 1), (1, -1)]),
    leaper_table(&[(-1, 1), (-1, -1)]),
];

#[inline]
#[must_use]
pub fn knight_attacks(sq: Square) -> Bitboard {
    Bitboard(KNIGHT_ATTACKS[sq.index()])
}

#[inline]
#[must_use]
pub fn king_attacks(sq: Square) -> Bitboard {
    Bitboard(KING_ATTACKS[sq.index()])
}

/// Squares a pawn of `color` on `sq` attacks.
#[inline]
#[must_use]
pub fn pawn_attacks(color: Color, sq: Square) -> Bitboard {
    Bitboard(PAWN_ATTACKS[color.index()][sq.index()])
}

#[derive(Clone, Copy, Default)]
struct Magic {
    mask: u64,
    magic: u64,
    shift: u32,
    offset: usize,
}

struct SliderTable {
    magics: [Magic; 64],
    attacks: Vec<u64>,
}

impl SliderTable {
    #[inline]
    fn attacks(&self, sq: Square, occupancy: Bitboard) -> Bitboard {
        let m = &self.magics[sq.index()];
        let idx = ((occupancy.0 & m.mask).wrapping_mul(m.magic) >> m.shift) as usize;
        Bitboard(self.attacks[m.offset + idx])
    }

    fn build(directions: &[(i32, i32); 4], rng: &mut StdRng) -> Self {
        let mut magics = [Magic::default(); 64];
        let mut attacks = Vec::new();

        for (sq, entry) in magics.iter_mut().enumerate() {
            let mask = relevant_mask(sq, directions);
            let bits = mask.count_ones();
            let size = 1usize << bits;

            // Carry-rippler walk over every subset of the mask.
            let mut occupancies = Vec::with_capacity(size);
            let mut references = Vec::with_capacity(size);
            let mut subset = 0u64;
            loop {
                occupancies.push(subset);
                references.push(ray_attacks(sq, subset, directions));
                subset = subset.wrapping_sub(mask) & mask;
                if subset == 0 {
                    break;
                }
            }

            let shift = 64 - bits;
            let (magic, table) = find_magic(mask, shift, &occupancies, &references, rng);
            *entry = Magic {
                mask,
                magic,
                shift,
                offset: attacks.len(),
            };
            attacks.extend_from_slice(&table);
        }

        SliderTable { magics, attacks }
    }
}

fn find_magic(
    mask: u64,
    shift: u32,
    occupancies: &[u64],
    references: &[u64],
    rng: &mut StdRng,
) -> (u64, Vec<u64>) {
    let size = occupancies.len();
    let mut table = vec![0u64; size];
    let mut epoch = vec![0u32; size];
    let mut attempt = 0u32;

    loop {
        let magic = rng.gen::<u64>() & rng.gen::<u64>() & rng.gen::<u64>();
        if (mask.wrapping_mul(magic) >> 56).count_ones() < 6 {
            continue;
        }
        attempt += 1;

        let mut collision = false;
        for (occ, reference) in occupancies.iter().zip(references) {
            let idx = (occ.wrapping_mul(magic) >> shift) as usize;
            if epoch[idx] != attempt {
                epoch[idx] = attempt;
                table[idx] = *reference;
            } else if table[idx] != *reference {
                collision = true;
                break;
            }
        }

        if !collision {
            return (magic, table);
        }
    }
}

/// Ray squares that can block a slider, excluding the board edge.
fn relevant_mask(sq: usize, directions: &[(i32, i32); 4]) -> u64 {
    let rank = (sq / 8) as i32;
    let file = (sq % 8) as i32;
    let mut mask = 0u64;
    for &(dr, df) in directions {
        let mut r = rank + dr;
        let mut f = file + df;
        while (0..8).contains(&(r + dr)) && (0..8).contains(&(f + df)) {
            mask |= 1u64 << (r * 8 + f);
            r += dr;
            f += df;
        }
    }
    mask
}

fn ray_attacks(sq: usize, occupancy: u64, directions: &[(i32, i32); 4]) -> u64 {
    let rank = (sq / 8) as i32;
    let file = (sq % 8) as i32;
    let mut attacks = 0u64;
    for &(dr, df) in directions {
        let mut r = rank + dr;
        let mut f = file + df;
        while (0..8).contains(&r) && (0..8).contains(&f) {
            let bit = 1u64 << (r * 8 + f);
            attacks |= bit;
            if occupancy & bit != 0 {
                break;
            }
            r += dr;
            f += df;
        }
    }
    attacks
}

struct SliderTables {
    bishop: SliderTable,
    rook: SliderTable,
}

static SLIDERS: Lazy<SliderTables> = Lazy::new(|| {
    let mut rng = StdRng::seed_from_u64(MAGIC_SEED);
    let bishop = SliderTable::build(&BISHOP_DIRECTIONS, &mut rng);
    let rook = SliderTable::build(&ROOK_DIRECTIONS, &mut rng);
    SliderTables { bishop, rook }
});

/// Build the slider tables now instead of on first lookup.
pub fn init() {
    Lazy::force(&SLIDERS);
}

#[inline]
#[must_use]
pub fn bishop_attacks(sq: Square, occupancy: Bitboard) -> Bitboard {
    SLIDERS.bishop.attacks(sq, occupancy)
}

#[inline]
#[must_use]
pub fn rook_attacks(sq: Square, occupancy: Bitboard) -> Bitboard {
    SLIDERS.rook.attacks(sq, occupancy)
}

#[inline]
#[must_use]
pub fn queen_attacks(sq: Square, occupancy: Bitboard) -> Bitboard {
    bishop_attacks(sq, occupancy) | rook_attacks(sq, occupancy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    fn sq(name: &str) -> Square {
        name.parse().unwrap()
    }

    #[test]
    fn leapers_from_corner() {
        assert_eq!(knight_attacks(sq("a1")).popcount(), 2);
        assert_eq!(king_attacks(sq("a1")).popcount(), 3);
        assert_eq!(king_attacks(sq("e4")).popcount(), 8);
        assert_eq!(pawn_attacks(Color::White, sq("a2")), Bitboard::from_square(sq("b3")));
        assert_eq!(pawn_attacks(Color::Black, sq("h7")), Bitboard::from_square(sq("g6")));
    }

    #[test]
    fn rook_on_empty_board_sees_fourteen_squares() {
        for idx in 0..64 {
            assert_eq!(rook_attacks(Square::from_index(idx), Bitboard::EMPTY).popcount(), 14);
        }
    }

    #[test]
    fn magic_lookups_match_ray_casting() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..2000 {
            let occupancy = rng.gen::<u64>() & rng.gen::<u64>();
            let idx = rng.gen_range(0..64usize);
            let s = Square::from_index(idx);
            assert_eq!(
                bishop_attacks(s, Bitboard(occupancy)).0,
                ray_attacks(idx, occupancy, &BISHOP_DIRECTIONS)
            );
            assert_eq!(
                rook_attacks(s, Bitboard(occupancy)).0,
                ray_attacks(idx, occupancy, &ROOK_DIRECTIONS)
            );
        }
    }

    #[test]
    fn blockers_stop_rays() {
        let occ = Bitboard::from_square(sq("d6")) | Bitboard::from_square(sq("f4"));
        let attacks = rook_attacks(sq("d4"), occ);
        assert!(attacks.contains(sq("d6")));
        assert!(!attacks.contains(sq("d7")));
        assert!(attacks.contains(sq("f4")));
        assert!(!attacks.contains(sq("g4")));
    }
}
