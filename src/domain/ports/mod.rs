pub mod cost_feed;
pub mod player_catalog;
pub mod squad_repository;
