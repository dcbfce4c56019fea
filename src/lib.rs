pub mod arena;
pub mod bullet;
pub mod config;
pub mod control;
pub mod error;
pub mod geometry;
pub mod gun;
pub mod logging;
pub mod movement;
pub mod person;
pub mod render;
pub mod sight;
pub mod world;
