//! Entitlement domain - time-boxed access grants.

mod grant;

pub use grant::{Entitlement, EntitlementStatus};
