//! Command abstractions.

use uuid::Uuid;

/// A request handed to the board engine by the session layer.
pub trait Command: Send + Sync + std::fmt::Debug {
    /// Stable name used as the `command` field in log records.
    fn command_type(&self) -> &'static str;

    /// Correlation ID carried through every log line the command produces.
    fn correlation_id(&self) -> Uuid;

    /// Seed for a command-local RNG. When `None`, the caller's shared
    /// random source is used instead.
    fn seed(&self) -> Option<u64> {
        None
    }
}
