//! Route modules.

pub mod boards;
pub mod health;
