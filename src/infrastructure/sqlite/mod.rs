pub mod migrations;
pub mod player_repo;
pub mod squad_repo;
