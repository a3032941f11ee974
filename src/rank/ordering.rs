//! The tie-break ordering shared by every scorer.

use std::cmp::Ordering;

/// Sort key for one scored candidate.
///
/// Orders by score descending, overlap descending, question token count
/// ascending, then guid ascending. `doc` is the candidate's dense id and never
/// takes part in the comparison.
#[derive(Debug, Clone, Copy)]
pub struct RankKey<'a> {
    pub score: f64,
    pub overlap: usize,
    pub token_count: usize,
    pub guid: &'a str,
    pub doc: usize,
}

impl Ord for RankKey<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .score
            .total_cmp(&self.score)
            .then_with(|| other.overlap.cmp(&self.overlap))
            .then_with(|| self.token_count.cmp(&other.token_count))
            .then_with(|| self.guid.cmp(other.guid))
    }
}

impl PartialOrd for RankKey<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for RankKey<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for RankKey<'_> {}

/// Requested result counts below one mean one.
pub fn clamp_k(k: usize) -> usize {
    k.max(1)
}

/// The first `k` candidates under [`RankKey`] order.
///
/// Selects the head before sorting it, so large pools with a small `k` only
/// pay for a partial sort.
pub fn top_k(mut candidates: Vec<RankKey<'_>>, k: usize) -> Vec<RankKey<'_>> {
    let k = clamp_k(k);
    if candidates.len() > k {
        candidates.select_nth_unstable(k - 1);
        candidates.truncate(k);
    }
    candidates.sort_unstable();
    candidates
}
