//! # blindroute-ledger
//!
//! **Finality state** for BlindRoute: who won each ticket, and who may see it.
//!
//! - [`MatchLedger`]: `TicketId → MatchRecord`, written once per ticket and
//!   never overwritten
//! - [`AclManager`]: per-handle decrypt grants plus a public flag, only ever
//!   growing
//!
//! The ACL implements [`AccessPolicy`](blindroute_fhe::AccessPolicy), so the
//! decrypt oracle consults it directly.

pub mod acl;
pub mod match_ledger;

pub use acl::AclManager;
pub use match_ledger::{MatchLedger, MatchRecord};
