//! Formatting of errors and their causes.

use std::error::Error as StdError;

/// Returns the message of `error` followed by the messages of each of its [`source`]s.
///
/// [`source`]: StdError::source
pub fn error_messages<E>(error: &E) -> Vec<String>
where
    E: StdError,
{
    let mut messages = vec![error.to_string()];

    let mut cause = error.source();
    while let Some(current) = cause {
        messages.push(current.to_string());
        cause = current.source();
    }

    messages
}

/// Describes `error` and its causes on a single line, separated by `: `.
///
/// # Examples
///
/// ```
/// use pokedex_api::error::QueryContext;
/// use pokedex_api::helpers::error::error_chain_message;
///
/// let error = diesel::result::Error::NotFound.with_query_context(|| "loading pokemon 1");
///
/// assert_eq!("query error: loading pokemon 1: Record not found", error_chain_message(&error));
/// ```
pub fn error_chain_message<E>(error: &E) -> String
where
    E: StdError,
{
    error_messages(error).join(": ")
}

/// Describes `error` with one `caused by:` line per cause, then its backtrace if it captured one
/// (see [`backtrace_message`]).
pub fn recursive_error_message<E>(error: &E) -> String
where
    E: StdError,
{
    let mut message = error_messages(error).join("\ncaused by: ");

    if let Some(backtrace) = backtrace_message(error) {
        message.push_str("\n\nBacktrace: ");
        message.push_str(&backtrace);
    }

    message
}

/// Returns the [`Backtrace`](std::backtrace::Backtrace) captured by `error`, if any.
///
/// Always `None` unless built with `backtrace_support` (Nightly toolchains; see `build.rs`).
#[cfg(backtrace_support)]
pub fn backtrace_message<E>(error: &E) -> Option<String>
where
    E: StdError,
{
    std::error::request_ref::<std::backtrace::Backtrace>(error)
        .map(|backtrace| format!("{:#}", backtrace))
}

#[cfg(not(backtrace_support))]
#[doc(hidden)]
pub fn backtrace_message<E>(_error: &E) -> Option<String>
where
    E: StdError,
{
    None
}
