//! Tracing hooks for query and transaction observability.
//!
//! The `tracing` feature is on by default; with it disabled these macros
//! no-op, keeping `#[cfg]` noise out of the engine.

/// Emit a debug-level event with the SQL text and parameter count before a
/// statement is executed.
macro_rules! trace_query {
    ($sql:expr, $param_count:expr) => {
        #[cfg(feature = "tracing")]
        tracing::debug!(sql = %$sql, params = $param_count, "griddle.query");
    };
}

/// Emit an info-level event for a transaction transition.
macro_rules! trace_tx {
    ($event:literal) => {
        #[cfg(feature = "tracing")]
        tracing::info!(event = $event, "griddle.transaction");
    };
}

/// Emit an error-level event for an error crossing the engine boundary.
macro_rules! trace_error {
    ($err:expr) => {
        #[cfg(feature = "tracing")]
        tracing::error!(error = %$err, "griddle.error");
    };
}
