//! Command and query handlers, grouped by aggregate.

pub mod payment;
