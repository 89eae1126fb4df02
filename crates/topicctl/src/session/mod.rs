//! Administrative session traits and backends.

pub mod memory;
pub mod r#trait;

// Re-exports for ergonomics
pub use memory::{InMemoryCluster, InMemorySession};
pub use r#trait::{AdminConnector, AdminSession, DEFAULT_ADMIN_TIMEOUT, SessionConfig};
