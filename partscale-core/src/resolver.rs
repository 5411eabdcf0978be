// Copyright (C) 2025 Paul Hampson
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License version 3 as  published by the
// Free Software Foundation.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE.  See the GNU General Public License for more
// details.
//
// You should have received a copy of the GNU General Public License along with
// this program.  If not, see <https://www.gnu.org/licenses/>.

use heapless::Vec;

/// At most two object classes exist per deployment (new/factory and reused).
pub const MAX_CLASSES: usize = 2;

/// Per-class piece counts, ordered new/factory first then reused.
pub type Counts = Vec<u32, MAX_CLASSES>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionResult {
    /// Counts for every configured class; never partially populated.
    Resolved(Counts),
    Unresolved,
}

fn counts_of(values: &[u32]) -> Counts {
    let mut counts = Counts::new();
    for &value in values {
        counts
            .push(value)
            .expect("More count classes than the resolver supports");
    }
    counts
}

/// Match a reading against multiples of one unit weight.
///
/// The candidate count is `reading / unit_weight` rounded half-up (integer
/// form `(reading + unit_weight / 2) / unit_weight`; an exact half boundary
/// only exists for even unit weights and rounds towards the higher count).
/// The candidate is accepted when the deviation from `count * unit_weight`
/// is no more than `tolerance_multiplier * count`.
///
/// At a candidate count of zero the allowed deviation is therefore zero:
/// a non-zero reading below half a unit weight is rejected rather than
/// silently rounded down to an empty scale. Deliberate strictness - an
/// occupied pan that does not account for a whole piece is a fault worth
/// surfacing, not a zero.
pub fn resolve_single(reading: u32, unit_weight: u32, tolerance_multiplier: u32) -> ResolutionResult {
    let count = ((u64::from(reading) + u64::from(unit_weight) / 2) / u64::from(unit_weight)) as u32;
    let expected = u64::from(count) * u64::from(unit_weight);
    let deviation = expected.abs_diff(u64::from(reading));

    log::trace!(
        "Single-class candidate: count {} expected weight {} deviation {}",
        count,
        expected,
        deviation
    );

    if deviation <= u64::from(tolerance_multiplier) * u64::from(count) {
        ResolutionResult::Resolved(counts_of(&[count]))
    } else {
        ResolutionResult::Unresolved
    }
}

/// Find a non-negative combination of two unit weights totalling within
/// `tolerance` of the reading.
///
/// Explicit bounded double loop: the new-piece count `m` ascends over
/// `0..=reading / new_weight` and, for each `m`, the reused-piece count `n`
/// ascends over `0..=(reading - m * new_weight) / reused_weight`. The first
/// combination inside the tolerance wins, so among all admissible
/// combinations the one with the fewest new pieces is preferred, and among
/// those the one with the fewest reused pieces. That tie-break order is an
/// observable contract; do not swap the loops or replace the search with a
/// closest-total optimisation.
pub fn resolve_dual(
    reading: u32,
    new_weight: u32,
    reused_weight: u32,
    tolerance: u32,
) -> ResolutionResult {
    for m in 0..=reading / new_weight {
        let remainder = reading - m * new_weight;
        for n in 0..=remainder / reused_weight {
            let total = u64::from(m) * u64::from(new_weight) + u64::from(n) * u64::from(reused_weight);
            if total.abs_diff(u64::from(reading)) <= u64::from(tolerance) {
                log::trace!("Dual-class match: {} new, {} reused, total weight {}", m, n, total);
                return ResolutionResult::Resolved(counts_of(&[m, n]));
            }
        }
    }
    log::trace!("Dual-class search exhausted for reading {}", reading);
    ResolutionResult::Unresolved
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolved(counts: &[u32]) -> ResolutionResult {
        ResolutionResult::Resolved(counts_of(counts))
    }

    #[test]
    fn single_exact_multiple_resolves() {
        assert_eq!(resolve_single(70, 70, 3), resolved(&[1]));
        assert_eq!(resolve_single(210, 70, 3), resolved(&[3]));
    }

    #[test]
    fn single_within_scaled_tolerance_resolves() {
        // deviation 5, allowed 3 * 2 = 6
        assert_eq!(resolve_single(145, 70, 3), resolved(&[2]));
    }

    #[test]
    fn single_outside_scaled_tolerance_is_unresolved() {
        // deviation 7, allowed 3 * 2 = 6
        assert_eq!(resolve_single(147, 70, 3), ResolutionResult::Unresolved);
    }

    #[test]
    fn single_zero_reading_resolves_to_zero_count() {
        assert_eq!(resolve_single(0, 70, 3), resolved(&[0]));
        assert_eq!(resolve_single(0, 1, 0), resolved(&[0]));
    }

    #[test]
    fn single_sub_half_unit_reading_is_rejected_not_rounded_to_zero() {
        // rounds to count 0, where the allowed deviation is exactly zero
        assert_eq!(resolve_single(34, 70, 0), ResolutionResult::Unresolved);
        assert_eq!(resolve_single(34, 70, 50), ResolutionResult::Unresolved);
        assert_eq!(resolve_single(1, 70, 3), ResolutionResult::Unresolved);
    }

    #[test]
    fn single_half_boundary_rounds_up() {
        // 35 / 70 rounds half-up to count 1, deviation 35
        assert_eq!(resolve_single(35, 70, 35), resolved(&[1]));
        assert_eq!(resolve_single(35, 70, 34), ResolutionResult::Unresolved);
    }

    #[test]
    fn single_resolved_reconstruction_is_within_declared_tolerance() {
        for reading in 0..500u32 {
            if let ResolutionResult::Resolved(counts) = resolve_single(reading, 70, 3) {
                let expected = counts[0] * 70;
                assert!(expected.abs_diff(reading) <= 3 * counts[0]);
            }
        }
    }

    #[test]
    fn single_is_pure() {
        assert_eq!(resolve_single(145, 70, 3), resolve_single(145, 70, 3));
        assert_eq!(resolve_single(147, 70, 3), resolve_single(147, 70, 3));
    }

    #[test]
    fn dual_exact_combination_resolves() {
        assert_eq!(resolve_dual(155, 70, 85, 3), resolved(&[1, 1]));
    }

    #[test]
    fn dual_zero_reading_resolves_to_empty_scale() {
        assert_eq!(resolve_dual(0, 70, 85, 0), resolved(&[0, 0]));
    }

    #[test]
    fn dual_prefers_fewest_new_then_fewest_reused() {
        // with a wide tolerance both [0, 1] and [2, 0] are admissible for
        // reading 140; the ascending search must settle on [0, 1]
        assert_eq!(resolve_dual(140, 70, 85, 100), resolved(&[0, 1]));
        // exact match on the reused class alone
        assert_eq!(resolve_dual(170, 70, 85, 3), resolved(&[0, 2]));
    }

    #[test]
    fn dual_no_admissible_combination_is_unresolved() {
        // candidates are 0, 70, 85, 140, 155; nearest is 5 off a tolerance of 3
        assert_eq!(resolve_dual(160, 70, 85, 3), ResolutionResult::Unresolved);
        // below both unit weights, only the empty combination is in bounds
        assert_eq!(resolve_dual(69, 70, 85, 3), ResolutionResult::Unresolved);
    }

    #[test]
    fn dual_large_reading_exhausts_bounded_search() {
        // gcd(70, 85) = 5, so every combination total is a multiple of 5;
        // 1000002 sits 2 away from the nearest such total, outside a
        // tolerance of 1, and the full bounded search must run dry.
        // (At tolerance 3 the same reading resolves: 14276 * 70 + 8 * 85
        // lands exactly on 1000000.)
        assert_eq!(
            resolve_dual(1_000_002, 70, 85, 1),
            ResolutionResult::Unresolved
        );
    }

    #[test]
    fn dual_resolved_reconstruction_is_within_declared_tolerance() {
        for reading in 0..400u32 {
            if let ResolutionResult::Resolved(counts) = resolve_dual(reading, 70, 85, 3) {
                let total = counts[0] * 70 + counts[1] * 85;
                assert!(total.abs_diff(reading) <= 3);
            }
        }
    }

    #[test]
    fn dual_first_match_minimality_holds_over_a_sweep() {
        for reading in 0..400u32 {
            if let ResolutionResult::Resolved(counts) = resolve_dual(reading, 70, 85, 3) {
                let (m, n) = (counts[0], counts[1]);
                for m_prior in 0..=m {
                    let n_limit = if m_prior == m { n } else { (reading - m_prior * 70) / 85 + 1 };
                    for n_prior in 0..n_limit {
                        let total = m_prior * 70 + n_prior * 85;
                        assert!(
                            total.abs_diff(reading) > 3,
                            "({m_prior}, {n_prior}) precedes ({m}, {n}) for reading {reading}"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn dual_is_pure() {
        assert_eq!(resolve_dual(155, 70, 85, 3), resolve_dual(155, 70, 85, 3));
        assert_eq!(resolve_dual(160, 70, 85, 3), resolve_dual(160, 70, 85, 3));
    }
}
