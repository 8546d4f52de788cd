//! Board domain: spaces, settings, graph, and the three engine stages.

pub mod commands;
pub mod generator;
pub mod graph;
pub mod layout;
pub mod movement;
pub mod settings;
pub mod space;
