// src/db/mod.rs
//
// Database module
//
// Provides:
// - Connection pooling
// - Schema migrations and seed data
// - Database utilities

pub mod connection;
pub mod migrations;

pub use connection::{
    create_connection_pool, get_connection, get_database_path, ConnectionPool, PooledConn,
};

#[cfg(test)]
pub(crate) use connection::create_test_pool;

pub use migrations::{
    bootstrap_database, get_database_stats, initialize_database, seed_default_data,
    verify_database_integrity, DatabaseStats,
};
