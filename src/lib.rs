//! Pokedex API library crate.
//!
//! Contains the implementation of a small REST API exposing a collection of Pokemons stored
//! in a Postgres database. The web application itself is created in the main bin crate, through
//! the [`pokedex_app`] macro.
//!
//! For more information, see `README.md`.

#![cfg_attr(backtrace_support, feature(error_generic_member_access))]

pub mod api;
pub mod db;
pub mod error;
pub mod helpers;
pub mod models;
pub mod schema;
pub mod service_env;
pub mod services;

pub use error::Error;
pub use error::Result;

/// Creates an [`App`](actix_web::App) serving the Pokedex API, using the given database [`Pool`](db::Pool).
///
/// The app includes request logging, permissive CORS and all endpoints (see [`api::configure`]).
///
/// # Examples
///
/// ```no_run
/// use actix_web::HttpServer;
/// use pokedex_api::db::get_pool;
/// use pokedex_api::pokedex_app;
///
/// # async fn example() -> anyhow::Result<()> {
/// let pool = get_pool()?;
/// HttpServer::new(move || pokedex_app!(pool))
///     .bind(("127.0.0.1", 3000))?
///     .run()
///     .await?;
/// #
/// # Ok(())
/// # }
/// ```
#[macro_export]
macro_rules! pokedex_app {
    ($pool:expr) => {
        actix_web::App::new()
            .wrap($crate::api::cors())
            .wrap(actix_web::middleware::Logger::default())
            .configure($crate::api::configure(&$pool))
    };
}
