//! # blindroute-router
//!
//! **Facade crate** for BlindRoute: the only component a host talks to.
//!
//! - [`Router`]: owns registry, match ledger, ACL and backend; exposes the
//!   routing pipeline, the owner-only admin surface and the read accessors
//! - [`CallerContext`]: who is calling, either ed25519-verified or
//!   host-trusted
//! - [`EventSink`]: where boundary events go ([`MemorySink`], [`TracingSink`])
//!
//! ## Data flow
//!
//! ```text
//! client ──encrypt──▶ (ciphertexts, proof)
//!                          │
//!                          ▼
//!   Router::route ──▶ ingest ──▶ select_best ──▶ MatchLedger ──▶ ACL grants
//!                                                     │
//!                                                     ▼
//!                                        EventSink: MatchRouted{winner handle}
//!                                                     │
//!                                                     ▼
//!                           decrypt oracle (requester / router principal only)
//! ```
//!
//! Nothing in the router ever sees a plaintext score, need, skill or winner.

pub mod auth;
pub mod router;
pub mod sink;

pub use auth::{AdminAction, CallerContext};
pub use router::Router;
pub use sink::{EventSink, MemorySink, TracingSink};

pub use blindroute_fhe::{
    DecryptionOracle, ExternalCiphertext, FheBackend, InputProof, InputValue, MockBackend,
};
pub use blindroute_scoring::{RoutingReceipt, verify_receipt};
pub use blindroute_types::{
    AgentId, BlindRouteError, EventEnvelope, Handle, Principal, Result, RouterConfig, RouterEvent,
    TicketId,
};
