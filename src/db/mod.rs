pub mod connection;
#[cfg(test)]
pub mod memory;
pub mod migrations;
pub mod models;
pub mod pg_store;
pub mod store;

pub use pg_store::PgStore;
pub use store::Store;
