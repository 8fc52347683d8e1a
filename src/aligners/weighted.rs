//! Cost-weighted edit-distance alignment.

use ndarray::Array2;

use crate::cost::CostModel;
use crate::{AlignmentOp, AlignmentResult, GAP_COST};

/// Which predecessor produced a cell's minimal cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Backpointer {
    /// Cell (0, 0); terminates the backtrace walk.
    Start,
    /// Diagonal predecessor: substitution (or match) of one token pair.
    Substitute,
    /// Upper predecessor: deletion of a reference token.
    Delete,
    /// Left predecessor: insertion of a hypothesis token.
    Insert,
}

/// Classic edit-distance dynamic program over an (m+1) x (n+1) table.
///
/// Deletion and insertion cost [`GAP_COST`]; substitution cost comes from
/// the model. Ties prefer substitution over deletion and deletion over
/// insertion — the ordering does not affect the total cost, but it pins
/// down which of several optimal alignments is reconstructed.
pub struct WeightedAligner;

impl WeightedAligner {
    /// Align `reference` against `hypothesis` under `model`.
    ///
    /// Runs in O(m*n) time and space. The model is consulted once per
    /// table cell, so callers pairing this with an embedding-backed model
    /// must batch the embedding lookups at model construction rather than
    /// per pair.
    pub fn align<M: CostModel>(
        reference: &[String],
        hypothesis: &[String],
        model: &M,
    ) -> AlignmentResult {
        let m = reference.len();
        let n = hypothesis.len();
        log::debug!("aligning {}x{} token table", m, n);

        let mut table = Array2::<f64>::zeros((m + 1, n + 1));
        let mut trace = Array2::from_elem((m + 1, n + 1), Backpointer::Start);

        for i in 1..=m {
            table[[i, 0]] = i as f64 * GAP_COST;
            trace[[i, 0]] = Backpointer::Delete;
        }
        for j in 1..=n {
            table[[0, j]] = j as f64 * GAP_COST;
            trace[[0, j]] = Backpointer::Insert;
        }

        for i in 1..=m {
            for j in 1..=n {
                let substitute = table[[i - 1, j - 1]] + model.cost(i - 1, j - 1);
                let delete = table[[i - 1, j]] + GAP_COST;
                let insert = table[[i, j - 1]] + GAP_COST;

                let (best, pointer) = if substitute <= delete && substitute <= insert {
                    (substitute, Backpointer::Substitute)
                } else if delete <= insert {
                    (delete, Backpointer::Delete)
                } else {
                    (insert, Backpointer::Insert)
                };

                table[[i, j]] = best;
                trace[[i, j]] = pointer;
            }
        }

        let mut ops = Vec::with_capacity(m.max(n));
        let (mut i, mut j) = (m, n);
        while i > 0 || j > 0 {
            match trace[[i, j]] {
                Backpointer::Substitute => {
                    let cost = model.cost(i - 1, j - 1);
                    let op = if model.is_match(cost) {
                        AlignmentOp::Match {
                            ref_index: i - 1,
                            hyp_index: j - 1,
                            cost,
                        }
                    } else {
                        AlignmentOp::Substitution {
                            ref_index: i - 1,
                            hyp_index: j - 1,
                            cost,
                        }
                    };
                    ops.push(op);
                    i -= 1;
                    j -= 1;
                }
                Backpointer::Delete => {
                    ops.push(AlignmentOp::Deletion { ref_index: i - 1 });
                    i -= 1;
                }
                Backpointer::Insert => {
                    ops.push(AlignmentOp::Insertion { hyp_index: j - 1 });
                    j -= 1;
                }
                // Start is only ever written at (0, 0), where the loop
                // condition has already failed.
                Backpointer::Start => unreachable!("backtrace walked past the table origin"),
            }
        }
        ops.reverse();

        AlignmentResult {
            ops,
            total_cost: table[[m, n]],
            reference_len: m,
            hypothesis_len: n,
        }
    }
}
