//! Alignment engines for reference/hypothesis comparison.
//!
//! This module contains the two aligners that turn a pair of token
//! sequences into an [`AlignmentResult`](crate::AlignmentResult). Both
//! produce the same operation structure; they differ in cost handling and
//! speed.
//!
//! # Available Aligners
//!
//! ## Weighted Aligner
//!
//! Full dynamic-programming edit-distance solver:
//! - **Cost model**: pluggable ([`CostModel`](crate::cost::CostModel));
//!   pairs with the semantic embedding model for meaning-weighted scoring
//! - **Output**: cost-optimal alignment, total cost = final table cell
//! - **Complexity**: O(m*n) time and space
//!
//! ## Opcode Aligner
//!
//! Longest-common-subsequence pass for binary (exact-equality) matching:
//! - **Cost model**: implicit 0/1, never evaluated per pair
//! - **Output**: run-structured alignment suitable for highlighted diffs
//!   and the classic WER/MER/WIL counts
//! - **Complexity**: O(m*n) time, cheaper constants than the weighted DP
//!
//! # Usage Comparison
//!
//! ```rust
//! use score_rs::aligners::{OpcodeAligner, WeightedAligner};
//! use score_rs::cost::ExactMatchCost;
//! use score_rs::text::tokenize;
//!
//! let reference = tokenize("the cat sat");
//! let hypothesis = tokenize("the big cat sat");
//!
//! // Opcode: fast classification for plain word-error metrics
//! let by_opcode = OpcodeAligner::align(&reference, &hypothesis);
//!
//! // Weighted: same result here, but accepts any cost model
//! let model = ExactMatchCost::new(&reference, &hypothesis);
//! let by_dp = WeightedAligner::align(&reference, &hypothesis, &model);
//!
//! assert_eq!(by_opcode.total_cost, by_dp.total_cost);
//! ```

pub mod opcode;
pub mod weighted;

pub use opcode::OpcodeAligner;
pub use weighted::WeightedAligner;
