//! Observed-code matching against a family table.

use crate::family::code_bit;
use crate::TagFamily;

/// Best family match for an observed payload code.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CodeMatch {
    /// Tag id in the family.
    pub id: u32,
    /// Quarter turns `0..=3` such that
    /// `observed == rotate_code(family.code(id), dim, rotation)`.
    pub rotation: u8,
    /// Bit errors between observed and family code after rotation.
    pub hamming: u8,
}

/// Brute-force matcher over all ids and rotations.
///
/// Rotated code words are precomputed at construction; family sizes stay
/// well under a thousand entries, so the linear scan is cheap and keeps
/// no per-call state.
#[derive(Clone, Debug)]
pub struct Matcher {
    family: TagFamily,
    max_hamming: u8,
    rotated: Vec<[u64; 4]>,
}

impl Matcher {
    /// Build a matcher for `family` accepting up to `max_hamming` bit errors.
    ///
    /// The budget is capped at the family's unambiguous correction limit.
    pub fn new(family: TagFamily, max_hamming: u8) -> Self {
        assert!(
            family.bit_count() <= 64,
            "payload dim {} exceeds a 64-bit code word",
            family.dim
        );

        let dim = family.dim;
        let rotated = family
            .codes
            .iter()
            .map(|&code| {
                [
                    code,
                    rotate_code(code, dim, 1),
                    rotate_code(code, dim, 2),
                    rotate_code(code, dim, 3),
                ]
            })
            .collect();
        let max_hamming = max_hamming.min(family.max_correction());

        Self {
            family,
            max_hamming,
            rotated,
        }
    }

    #[inline]
    pub fn family(&self) -> &TagFamily {
        &self.family
    }

    #[inline]
    pub fn max_hamming(&self) -> u8 {
        self.max_hamming
    }

    /// Best match for `observed` within the Hamming budget.
    pub fn match_code(&self, observed: u64) -> Option<CodeMatch> {
        let mut best: Option<CodeMatch> = None;

        for (id, rotations) in self.rotated.iter().enumerate() {
            for (rot, &candidate) in rotations.iter().enumerate() {
                let hamming = (observed ^ candidate).count_ones() as u8;
                if hamming > self.max_hamming {
                    continue;
                }
                if best.map_or(true, |b| hamming < b.hamming) {
                    best = Some(CodeMatch {
                        id: id as u32,
                        rotation: rot as u8,
                        hamming,
                    });
                    if hamming == 0 {
                        return best;
                    }
                }
            }
        }

        best
    }
}

/// Rotate a packed payload by `rot` quarter turns.
pub fn rotate_code(code: u64, dim: usize, rot: u8) -> u64 {
    let rot = rot & 3;
    if rot == 0 {
        return code;
    }

    let mut out = 0u64;
    for y in 0..dim {
        for x in 0..dim {
            let (sx, sy) = match rot {
                1 => (y, dim - 1 - x),
                2 => (dim - 1 - x, dim - 1 - y),
                _ => (dim - 1 - y, x),
            };
            if code_bit(code, dim, sx, sy) {
                out |= 1 << (dim * dim - 1 - (y * dim + x));
            }
        }
    }
    out
}
