//! Shared test doubles for the Taleboard engine.

mod rng;

pub use rng::{MockRng, SequenceRng};
