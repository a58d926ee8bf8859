//! PostgreSQL adapter implementations of the persistence ports.

mod entitlement_repository;
mod payment_repository;
mod payment_user_map;
mod user_directory;

pub use entitlement_repository::PostgresEntitlementRepository;
pub use payment_repository::PostgresPaymentRepository;
pub use payment_user_map::PostgresPaymentUserMapRepository;
pub use user_directory::PostgresUserDirectory;
