pub mod feeds;
pub mod sqlite;
