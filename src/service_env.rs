//! Whether the service runs in development or production, as set by `POKEDEX_ENV`.

use std::env;
use std::sync::OnceLock;

use strum_macros::{AsRefStr, Display, EnumIs, EnumString};

/// Environment variable holding the [`ServiceEnv`] name (case-insensitive).
pub const SERVICE_ENV_VAR: &str = "POKEDEX_ENV";

/// Environment the service runs in.
///
/// Only affects error responses: in [`Development`](ServiceEnv::Development), they carry an
/// [`internal_error`](crate::api::errors::ErrorResponse::internal_error) with the full cause
/// chain.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, AsRefStr, Display, EnumIs, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum ServiceEnv {
    Development,
    #[default]
    Production,
}

impl ServiceEnv {
    /// Parses an environment name, falling back to [`Production`](ServiceEnv::Production) when
    /// `value` is absent or unknown.
    ///
    /// # Examples
    ///
    /// ```
    /// use pokedex_api::service_env::ServiceEnv;
    ///
    /// assert_eq!(ServiceEnv::Development, ServiceEnv::parse_or_default(Some("development")));
    /// assert_eq!(ServiceEnv::Production, ServiceEnv::parse_or_default(Some("staging")));
    /// assert_eq!(ServiceEnv::Production, ServiceEnv::parse_or_default(None));
    /// ```
    pub fn parse_or_default(value: Option<&str>) -> Self {
        value
            .and_then(|value| value.trim().parse().ok())
            .unwrap_or_default()
    }

    /// Reads the environment from [`SERVICE_ENV_VAR`] without caching it.
    pub fn from_env() -> Self {
        Self::parse_or_default(env::var(SERVICE_ENV_VAR).ok().as_deref())
    }

    /// Returns the environment the service runs in.
    ///
    /// [`SERVICE_ENV_VAR`] is read on the first call only.
    pub fn current() -> Self {
        static CURRENT: OnceLock<ServiceEnv> = OnceLock::new();

        #[cfg(test)]
        {
            if let Some(overridden) = test_override::get() {
                return overridden;
            }
        }

        *CURRENT.get_or_init(Self::from_env)
    }

    /// Awaits `f` with [`current`](ServiceEnv::current) returning `env`.
    #[cfg(test)]
    pub async fn test<F>(env: ServiceEnv, f: F)
    where
        F: std::future::Future<Output = ()>,
    {
        let previous = test_override::set(Some(env));
        f.await;
        test_override::set(previous);
    }
}
