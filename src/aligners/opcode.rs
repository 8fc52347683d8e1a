//! Longest-common-subsequence opcode alignment.

use ndarray::Array2;

use crate::{AlignmentOp, AlignmentResult};

/// Every non-matching pair costs 1 under binary matching.
const SUBSTITUTION_COST: f64 = 1.0;

/// Diff-style aligner for exact-equality matching.
///
/// Anchors the alignment on a longest common subsequence of the two token
/// sequences, then expands each gap between anchors into substitutions and
/// gaps: a gap covering `p` reference and `q` hypothesis tokens becomes
/// `min(p, q)` substitutions pairing positions in order, followed by the
/// leftover deletions, followed by the leftover insertions.
///
/// Unlike [`WeightedAligner`](super::WeightedAligner) this never consults
/// a cost model, so it is the right pass for human-readable diffing and
/// the classic WER/MER/WIL counts where every substitution costs 1.
pub struct OpcodeAligner;

impl OpcodeAligner {
    pub fn align(reference: &[String], hypothesis: &[String]) -> AlignmentResult {
        let m = reference.len();
        let n = hypothesis.len();
        log::debug!("opcode-aligning {}x{} token table", m, n);

        let anchors = matching_pairs(reference, hypothesis);

        let mut ops = Vec::with_capacity(m.max(n));
        let (mut ref_next, mut hyp_next) = (0, 0);
        for &(ref_index, hyp_index) in &anchors {
            expand_gap(&mut ops, ref_next..ref_index, hyp_next..hyp_index);
            ops.push(AlignmentOp::Match {
                ref_index,
                hyp_index,
                cost: 0.0,
            });
            ref_next = ref_index + 1;
            hyp_next = hyp_index + 1;
        }
        expand_gap(&mut ops, ref_next..m, hyp_next..n);

        let total_cost = ops.iter().map(AlignmentOp::cost).sum();
        AlignmentResult {
            ops,
            total_cost,
            reference_len: m,
            hypothesis_len: n,
        }
    }
}

/// Positions of a longest common subsequence, as (ref_index, hyp_index)
/// pairs in ascending order.
fn matching_pairs(reference: &[String], hypothesis: &[String]) -> Vec<(usize, usize)> {
    let m = reference.len();
    let n = hypothesis.len();

    // lcs[[i, j]] = LCS length of reference[..i] and hypothesis[..j].
    let mut lcs = Array2::<usize>::zeros((m + 1, n + 1));
    for i in 1..=m {
        for j in 1..=n {
            lcs[[i, j]] = if reference[i - 1] == hypothesis[j - 1] {
                lcs[[i - 1, j - 1]] + 1
            } else {
                lcs[[i - 1, j]].max(lcs[[i, j - 1]])
            };
        }
    }

    let mut pairs = Vec::with_capacity(lcs[[m, n]]);
    let (mut i, mut j) = (m, n);
    while i > 0 && j > 0 {
        if reference[i - 1] == hypothesis[j - 1] {
            pairs.push((i - 1, j - 1));
            i -= 1;
            j -= 1;
        } else if lcs[[i - 1, j]] >= lcs[[i, j - 1]] {
            i -= 1;
        } else {
            j -= 1;
        }
    }
    pairs.reverse();
    pairs
}

/// Emit the operations for one non-matching run between anchors.
fn expand_gap(
    ops: &mut Vec<AlignmentOp>,
    ref_range: std::ops::Range<usize>,
    hyp_range: std::ops::Range<usize>,
) {
    let paired = ref_range.len().min(hyp_range.len());

    for offset in 0..paired {
        ops.push(AlignmentOp::Substitution {
            ref_index: ref_range.start + offset,
            hyp_index: hyp_range.start + offset,
            cost: SUBSTITUTION_COST,
        });
    }
    for ref_index in ref_range.start + paired..ref_range.end {
        ops.push(AlignmentOp::Deletion { ref_index });
    }
    for hyp_index in hyp_range.start + paired..hyp_range.end {
        ops.push(AlignmentOp::Insertion { hyp_index });
    }
}
