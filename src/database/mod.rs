pub mod connection;
pub mod entities;
pub mod models;
pub mod reviews;
pub mod setup;

pub use connection::{create_pool, get_connection, DbConn, DbPool};
#[cfg(test)]
pub use connection::create_memory_pool;
pub use models::*;
