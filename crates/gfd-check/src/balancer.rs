//! Greedy work balancing across a fixed number of bins.
//!
//! [`balance`] spreads integer work weights over `P` bins so that bin sums
//! land near `total / P`:
//!
//! 1. Round-robin the weights into `m = min(P, n)` bins and sort each bin.
//! 2. An item is *large* when it exceeds half the optimal load. Each bin keeps
//!    at most one large item; the rest go to a large pool.
//! 3. For every bin count `a`, the trailing small items to remove so the small
//!    part fits in `optimal / 2`, and `b`, the trailing small items to remove
//!    so the whole bin fits in `optimal`. Quality is `a - b`.
//! 4. Bins without a large item are ranked by descending quality. The top
//!    ones, one per pooled large item, strip `a` small items and receive a
//!    large item directly; the others strip `b`. Bins already holding a large
//!    item strip `max(a, b)`.
//! 5. Remaining large items, then the stripped small items (each group
//!    heaviest first), go one at a time to the currently lightest bin.
//!
//! The result always has exactly `P` bins and contains the input multiset.

use std::cmp::Reverse;

/// Removal plan for one bin.
struct BinPlan {
    /// Removals to fit the small part into `optimal / 2`.
    a: usize,
    /// Removals to fit the whole bin into `optimal`.
    b: usize,
    has_large: bool,
}

impl BinPlan {
    fn quality(&self) -> isize {
        self.a as isize - self.b as isize
    }
}

/// Number of trailing items of `small` to drop until `fits(base + rest)`.
fn trailing_removals(small: &[usize], base: usize, fits: impl Fn(usize) -> bool) -> usize {
    let mut sum = base + small.iter().sum::<usize>();
    let mut removed = 0;
    for &w in small.iter().rev() {
        if fits(sum) {
            break;
        }
        sum -= w;
        removed += 1;
    }
    removed
}

/// Partitions `weights` into exactly `bins` lists.
///
/// An empty input yields `bins` empty lists. `bins == 0` yields no lists.
pub fn balance(weights: &[usize], bins: usize) -> Vec<Vec<usize>> {
    if bins == 0 {
        return Vec::new();
    }
    if weights.is_empty() {
        return vec![Vec::new(); bins];
    }

    let m = bins.min(weights.len());
    let mut procs: Vec<Vec<usize>> = vec![Vec::new(); m];
    for (i, &w) in weights.iter().enumerate() {
        procs[i % m].push(w);
    }
    let total: usize = weights.iter().sum();
    let optimal = total / m;
    let is_large = |w: usize| 2 * w > optimal;

    // Large-item extraction.
    let mut large_pool = Vec::new();
    for p in &mut procs {
        p.sort_unstable();
        let first_large = p.partition_point(|&w| !is_large(w));
        if p.len() > first_large + 1 {
            large_pool.extend(p.drain(first_large + 1..));
        }
    }

    // Quality scoring.
    let plans: Vec<BinPlan> = procs
        .iter()
        .map(|p| {
            let has_large = p.last().is_some_and(|&w| is_large(w));
            let (small, large) = if has_large {
                (&p[..p.len() - 1], p[p.len() - 1])
            } else {
                (&p[..], 0)
            };
            BinPlan {
                a: trailing_removals(small, 0, |sum| 2 * sum <= optimal),
                b: trailing_removals(small, large, |sum| sum <= optimal),
                has_large,
            }
        })
        .collect();

    let mut ranked: Vec<usize> = (0..m).filter(|&i| !plans[i].has_large).collect();
    ranked.sort_by_key(|&i| Reverse(plans[i].quality()));
    let seeded = large_pool.len().min(ranked.len());

    // Small-item removal.
    let mut removed = Vec::new();
    for (i, p) in procs.iter_mut().enumerate() {
        let plan = &plans[i];
        let strip = if plan.has_large {
            plan.a.max(plan.b)
        } else if ranked[..seeded].contains(&i) {
            plan.a
        } else {
            plan.b
        };
        let small_len = p.len() - usize::from(plan.has_large);
        removed.extend(p.drain(small_len - strip..small_len));
    }

    // Redistribution.
    large_pool.sort_unstable_by(|a, b| b.cmp(a));
    removed.sort_unstable_by(|a, b| b.cmp(a));
    let mut pool = large_pool.into_iter();
    for &i in &ranked[..seeded] {
        if let Some(w) = pool.next() {
            procs[i].push(w);
        }
    }
    let mut loads: Vec<usize> = procs.iter().map(|p| p.iter().sum()).collect();
    for w in pool.chain(removed) {
        let target = (0..m).min_by_key(|&i| loads[i]).unwrap_or(0);
        procs[target].push(w);
        loads[target] += w;
    }

    procs.resize(bins, Vec::new());
    procs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sums(bins: &[Vec<usize>]) -> Vec<usize> {
        bins.iter().map(|b| b.iter().sum()).collect()
    }

    fn sorted_flat(bins: &[Vec<usize>]) -> Vec<usize> {
        let mut all: Vec<usize> = bins.iter().flatten().copied().collect();
        all.sort_unstable();
        all
    }

    #[test]
    fn empty_input_gives_empty_bins() {
        assert_eq!(balance(&[], 3), vec![Vec::<usize>::new(); 3]);
        assert!(balance(&[1, 2], 0).is_empty());
    }

    #[test]
    fn fewer_weights_than_bins_pads() {
        let bins = balance(&[5, 7], 4);
        assert_eq!(bins.len(), 4);
        assert_eq!(sorted_flat(&bins), vec![5, 7]);
        assert_eq!(bins.iter().filter(|b| b.is_empty()).count(), 2);
    }

    #[test]
    fn one_large_item_is_offset_by_small_ones() {
        let mut weights = vec![10];
        weights.extend(std::iter::repeat(1).take(10));
        let bins = balance(&weights, 2);
        let mut loads = sums(&bins);
        loads.sort_unstable();
        assert_eq!(loads, vec![10, 10]);
    }

    #[test]
    fn several_large_items_are_spread() {
        let bins = balance(&[9, 9, 9, 1, 1, 1], 3);
        let mut loads = sums(&bins);
        loads.sort_unstable();
        assert_eq!(loads, vec![10, 10, 10]);
    }

    #[test]
    fn keeps_the_multiset() {
        let weights = [4, 8, 15, 16, 23, 42, 4, 8, 1];
        let bins = balance(&weights, 4);
        assert_eq!(bins.len(), 4);
        let mut expected = weights.to_vec();
        expected.sort_unstable();
        assert_eq!(sorted_flat(&bins), expected);
    }

    #[test]
    fn single_bin_takes_everything() {
        let bins = balance(&[3, 1, 2], 1);
        assert_eq!(bins.len(), 1);
        assert_eq!(sorted_flat(&bins), vec![1, 2, 3]);
    }

    #[test]
    fn removal_counts() {
        assert_eq!(trailing_removals(&[1, 2, 3], 0, |s| s <= 3), 1);
        assert_eq!(trailing_removals(&[1, 2, 3], 0, |s| s <= 6), 0);
        assert_eq!(trailing_removals(&[1, 2, 3], 10, |s| s <= 10), 3);
    }
}
