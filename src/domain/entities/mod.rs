pub mod player;
pub mod squad;
pub mod swap;
