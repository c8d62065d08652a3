//! Core library: configuration, title resolution, entry merging, tracker facade.

pub mod auth;
pub mod bootstrap;
pub mod config;
pub mod entry;
pub mod resolver;
pub mod tracker;
