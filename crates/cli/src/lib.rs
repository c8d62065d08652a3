//! Public library modules for the CLI crate
pub mod commands;
pub mod render;
