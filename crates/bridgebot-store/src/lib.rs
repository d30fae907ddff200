pub mod audit;
pub mod error;
pub mod schema;

pub use audit::SqliteAuditStore;
pub use error::StoreError;
