//! Taleboard Core — shared abstractions.
//!
//! This crate defines the randomness seam, the error taxonomy and the
//! command trait that the board engine and its callers depend on. It
//! contains no game logic and no infrastructure code.

pub mod command;
pub mod error;
pub mod rng;
