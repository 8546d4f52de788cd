//! Taleboard — branching board engine.
//!
//! Synthesizes a main line with forks that split into parallel paths and
//! rejoin, lays the result out in 2D, and resolves how a token advances
//! along it for a die roll. Every operation is synchronous and pure given
//! its `RandomSource`; the session layer owns player positions.

pub mod application;
pub mod domain;
