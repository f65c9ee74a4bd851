//! Fatal error reporting shared by the queue, light, simulation and
//! configuration error types

/// Errors that know whether the user can fix them
///
/// A user-actionable error (a bad configuration value, say) carries its
/// own message through `user_message()`. System errors return `None` and
/// are reported with the context of the operation that failed.
pub trait ContextualError: std::error::Error {
    fn is_user_actionable(&self) -> bool;

    /// Message to show the user; `Some` only for user-actionable errors
    fn user_message(&self) -> Option<&str>;
}

/// Log a fatal error at `error` level
///
/// The headline is the user message when there is one and the operation
/// context otherwise. The full error and its debug form follow at `debug`.
///
/// # Examples
/// ```rust,no_run
/// # use trafficlight::core::error_handling::log_error_with_context;
/// # use trafficlight::app::cli::config::ConfigError;
/// let err = ConfigError::Invalid {
///     field: "lights".to_string(),
///     message: "at least one light is required".to_string(),
/// };
/// log_error_with_context(&err, "Loading configuration");
/// // Logs: "FATAL: at least one light is required"
/// ```
pub fn log_error_with_context<E: ContextualError + std::fmt::Debug>(
    error: &E,
    operation_context: &str,
) {
    log::error!("FATAL: {}", fatal_headline(error, operation_context));
    log::debug!("DETAIL: {}", error);
    log::debug!("DEBUG_DETAILS: {:?}", error);
}

/// Headline used by [`log_error_with_context`]
pub fn fatal_headline<'a, E: ContextualError + ?Sized>(
    error: &'a E,
    operation_context: &'a str,
) -> &'a str {
    match error.user_message() {
        Some(message) if error.is_user_actionable() => message,
        _ => operation_context,
    }
}
