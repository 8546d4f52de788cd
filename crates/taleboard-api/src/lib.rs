//! Taleboard API — HTTP surface over the board engine.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;
