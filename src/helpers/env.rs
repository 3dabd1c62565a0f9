//! Helpers to read configuration from environment variables.

use std::env;
use std::num::ParseIntError;
use std::str::FromStr;

use dotenvy::dotenv;

use crate::error::EnvVarError;

/// Loads the `.env` file via [`dotenv`], if there is one.
///
/// # Return values
///
/// | `.env` file                | Return value |
/// |----------------------------|--------------|
/// | Exists, loads successfully | `Ok(true)`   |
/// | Does not exist             | `Ok(false)`  |
/// | Exists but fails to load   | `Err(_)`     |
pub fn load_optional_dotenv() -> dotenvy::Result<bool> {
    match dotenv() {
        Ok(_) => Ok(true),
        Err(err) if err.not_found() => Ok(false),
        Err(err) => Err(err),
    }
}

/// Reads an environment variable as an integer.
///
/// # Return values
///
/// | Environment variable     | Return value                    |
/// |--------------------------|---------------------------------|
/// | Contains value `42`      | `Ok(42)`                        |
/// | Does not exist           | `Err(EnvVarError::NotFound)`    |
/// | Contains invalid unicode | `Err(EnvVarError::NotUnicode)`  |
/// | Contains value `foo`     | `Err(EnvVarError::IntExpected)` |
pub fn int_env_var<T>(key: &str) -> Result<T, EnvVarError>
where
    T: FromStr<Err = ParseIntError>,
{
    let value = env::var(key)?;
    value
        .parse::<T>()
        .map_err(|source| EnvVarError::IntExpected { value, source })
}

/// Reads an environment variable, falling back to `default` if it is not set.
///
/// Other errors (like invalid unicode) are returned as-is.
pub fn env_var_or<D>(key: &str, default: D) -> Result<String, EnvVarError>
where
    D: Into<String>,
{
    match env::var(key) {
        Ok(value) => Ok(value),
        Err(env::VarError::NotPresent) => Ok(default.into()),
        Err(err) => Err(err.into()),
    }
}

/// Reads an environment variable as an integer, falling back to `default` if it is not set.
pub fn int_env_var_or<T>(key: &str, default: T) -> Result<T, EnvVarError>
where
    T: FromStr<Err = ParseIntError>,
{
    match int_env_var(key) {
        Err(EnvVarError::NotFound) => Ok(default),
        result => result,
    }
}
