//! Crate-wide [`Error`] type.
//!
//! Each variant carries a captured [`Backtrace`](std::backtrace::Backtrace) when the crate is
//! built with `backtrace_support` (Nightly toolchains; see `build.rs`). Backtraces only contain
//! frames if enabled at runtime (see [`Backtrace::capture`](std::backtrace::Backtrace::capture)).

use std::env;
use std::ffi::OsString;
use std::num::ParseIntError;

use diesel_async::pooled_connection::deadpool::PoolError;

use crate::forward_from;

/// [`Result`](core::result::Result) using our [`Error`] type.
pub type Result<T> = core::result::Result<T, Error>;

/// Errors returned by the Pokedex API.
///
/// How each variant is reported to HTTP clients is decided in [`api::errors`](crate::api::errors).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Configuration could not be read from an environment variable.
    #[error("error related to environment variable: {context}")]
    EnvVar {
        /// What we were trying to read (see [`EnvVarContext`]).
        context: String,
        source: EnvVarError,
        #[cfg(backtrace_support)]
        backtrace: std::backtrace::Backtrace,
    },

    /// Request input (path, query or body) could not be parsed or failed validation.
    #[error("input parsing error")]
    Input {
        #[from]
        source: actix_web_validator::error::Error,
        #[cfg(backtrace_support)]
        backtrace: std::backtrace::Backtrace,
    },

    /// A required request parameter was absent or empty.
    #[error("missing required parameter `{name}`")]
    MissingParameter {
        /// Name of the parameter.
        name: &'static str,
        #[cfg(backtrace_support)]
        backtrace: std::backtrace::Backtrace,
    },

    /// No database connection could be obtained from the pool.
    #[error("database connection error")]
    Pool {
        #[from]
        source: PoolError,
        #[cfg(backtrace_support)]
        backtrace: std::backtrace::Backtrace,
    },

    /// A database query failed.
    #[error("query error: {context}")]
    Query {
        /// Description of the query (see [`QueryContext`]).
        context: String,
        source: diesel::result::Error,
        #[cfg(backtrace_support)]
        backtrace: std::backtrace::Backtrace,
    },
}

impl Error {
    /// Returns a [`MissingParameter`](Error::MissingParameter) error for parameter `name`.
    pub fn missing_parameter(name: &'static str) -> Self {
        Self::MissingParameter {
            name,
            #[cfg(backtrace_support)]
            backtrace: std::backtrace::Backtrace::capture(),
        }
    }
}

/// Reasons why an environment variable could not be used.
///
/// Mirrors [`VarError`](env::VarError), plus parsing failures.
#[derive(Debug, thiserror::Error)]
pub enum EnvVarError {
    /// The variable is not set.
    #[error("variable not found in environment")]
    NotFound,

    /// The variable's value is not valid Unicode.
    #[error("variable contained invalid, non-Unicode characters")]
    NotUnicode(OsString),

    /// The variable was expected to contain an integer.
    #[error("expected int value, found {value}")]
    IntExpected {
        /// The value found.
        value: String,
        source: ParseIntError,
    },
}

impl From<env::VarError> for EnvVarError {
    fn from(value: env::VarError) -> Self {
        match value {
            env::VarError::NotPresent => Self::NotFound,
            env::VarError::NotUnicode(os_str) => Self::NotUnicode(os_str),
        }
    }
}

/// Wraps environment variable errors in an [`EnvVar`](Error::EnvVar) error.
pub trait EnvVarContext {
    /// [`Error`], or a [`Result`] when called on a result.
    type Output;

    /// Attaches a description of what was being read.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use std::env;
    ///
    /// use pokedex_api::error::EnvVarContext;
    ///
    /// # fn example() -> pokedex_api::Result<()> {
    /// let http_addr = env::var("HTTP_ADDR")
    ///     .with_env_var_context(|| "HTTP_ADDR environment variable should be set")?;
    /// #
    /// # Ok(())
    /// # }
    /// ```
    fn with_env_var_context<C, F>(self, context: F) -> Self::Output
    where
        C: Into<String>,
        F: FnOnce() -> C;
}

impl<E> EnvVarContext for E
where
    E: Into<EnvVarError>,
{
    type Output = Error;

    fn with_env_var_context<C, F>(self, context: F) -> Self::Output
    where
        C: Into<String>,
        F: FnOnce() -> C,
    {
        Error::EnvVar {
            context: context().into(),
            source: self.into(),
            #[cfg(backtrace_support)]
            backtrace: std::backtrace::Backtrace::capture(),
        }
    }
}

impl<T, E> EnvVarContext for core::result::Result<T, E>
where
    E: EnvVarContext<Output = Error>,
{
    type Output = Result<T>;

    fn with_env_var_context<C, F>(self, context: F) -> Self::Output
    where
        C: Into<String>,
        F: FnOnce() -> C,
    {
        self.map_err(|err| err.with_env_var_context(context))
    }
}

forward_from!(diesel_async::pooled_connection::PoolError => PoolError => Error);

impl<E> From<deadpool::managed::BuildError<E>> for Error
where
    E: Into<Error>,
{
    /// Allows `?` on the result of building the connection pool.
    ///
    /// # Panics
    ///
    /// If no async runtime is configured for `deadpool`; this is a build configuration issue.
    fn from(value: deadpool::managed::BuildError<E>) -> Self {
        match value {
            deadpool::managed::BuildError::Backend(err) => err.into(),
            deadpool::managed::BuildError::NoRuntimeSpecified(msg) => {
                panic!("deadpool runtime feature must be enabled in Cargo.toml: {}", msg);
            },
        }
    }
}

/// Wraps [`diesel`] errors in a [`Query`](Error::Query) error.
pub trait QueryContext {
    /// [`Error`], or a [`Result`] when called on a result.
    type Output;

    /// Attaches a description of the query that failed.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use diesel::{ExpressionMethods, QueryDsl};
    /// use diesel_async::RunQueryDsl;
    /// use pokedex_api::error::QueryContext;
    /// # use pokedex_api::db::get_pool;
    /// use pokedex_api::models::pokemon::PokemonRow;
    /// use pokedex_api::schema::pokemons::dsl::*;
    ///
    /// # async fn example(pokemon_id: i64) -> pokedex_api::Result<()> {
    /// # let pool = get_pool()?;
    /// # let mut connection = pool.get().await?;
    /// #
    /// let pokemon: PokemonRow = pokemons
    ///     .filter(id.eq(pokemon_id))
    ///     .first(&mut connection)
    ///     .await
    ///     .with_query_context(|| format!("failed to fetch pokemon with id {}", pokemon_id))?;
    /// #
    /// # Ok(())
    /// # }
    /// ```
    fn with_query_context<C, F>(self, context: F) -> Self::Output
    where
        C: Into<String>,
        F: FnOnce() -> C;
}

impl QueryContext for diesel::result::Error {
    type Output = Error;

    fn with_query_context<C, F>(self, context: F) -> Self::Output
    where
        C: Into<String>,
        F: FnOnce() -> C,
    {
        Error::Query {
            context: context().into(),
            source: self,
            #[cfg(backtrace_support)]
            backtrace: std::backtrace::Backtrace::capture(),
        }
    }
}

impl<T, E> QueryContext for core::result::Result<T, E>
where
    E: QueryContext<Output = Error>,
{
    type Output = Result<T>;

    fn with_query_context<C, F>(self, context: F) -> Self::Output
    where
        C: Into<String>,
        F: FnOnce() -> C,
    {
        self.map_err(|err| err.with_query_context(context))
    }
}
