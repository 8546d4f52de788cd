//! Application services that drive the board engine for the session layer.

pub mod command_handlers;
