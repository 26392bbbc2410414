//! # blindroute-scoring
//!
//! **Pure encrypted scoring engine for BlindRoute.**
//!
//! Takes an encrypted need profile, an encrypted urgency and the indexed
//! agents, and returns the encrypted id of the best match. It has:
//!
//! - **Zero side effects**: no ledger writes, no grants, no events
//! - **No plaintext branching**: the only branch is the plaintext liveness
//!   flag; every comparison result flows into `select`
//! - **Deterministic tie-break**: strict comparison, so the earliest indexed
//!   agent keeps the lead on equal scores
//!
//! A [`RoutingReceipt`] commits to the public transcript of one routing pass
//! so independent observers can check they saw the same candidate set.

pub mod receipt;
pub mod score;
pub mod selection;

pub use receipt::{RoutingReceipt, compute_receipt_digest, verify_receipt};
pub use score::score_agent;
pub use selection::{RoutingQuery, Selection, select_best};
