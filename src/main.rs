//! Main Pokedex API bin crate.
//!
//! Creates the web application, then serves the Pokedex endpoints over HTTP until the process
//! is stopped. All the actual implementation is in the [lib crate](pokedex_api).
//!
//! For more information, see `README.md`.

use actix_web::HttpServer;
use anyhow::Context;
use env_logger::Env;
use log::info;
use pokedex_api::db::get_pool;
use pokedex_api::helpers::env::{env_var_or, int_env_var_or, load_optional_dotenv};
use pokedex_api::pokedex_app;
use pokedex_api::service_env::ServiceEnv;
use rustc_version_runtime::version;

/// Environment variable containing the address to bind to.
const HTTP_ADDR_VAR: &str = "HTTP_ADDR";

/// Address used if [`HTTP_ADDR_VAR`] is not set.
const DEFAULT_HTTP_ADDR: &str = "127.0.0.1";

/// Environment variable containing the HTTP port to listen on.
const HTTP_PORT_VAR: &str = "HTTP_PORT";

/// Port used if [`HTTP_PORT_VAR`] is not set.
const DEFAULT_HTTP_PORT: u16 = 3000;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let env_file_loaded = load_optional_dotenv()?;

    env_logger::init_from_env(Env::default().default_filter_or("info"));

    if !env_file_loaded {
        info!(".env file not found; skipped");
    }

    info!("Creating DB connection pool");
    let pool = get_pool().with_context(|| "failed to create DB connection pool")?;

    let server_address = env_var_or(HTTP_ADDR_VAR, DEFAULT_HTTP_ADDR)
        .with_context(|| format!("failed to read {} environment variable", HTTP_ADDR_VAR))?;
    let http_port: u16 = int_env_var_or(HTTP_PORT_VAR, DEFAULT_HTTP_PORT)
        .with_context(|| format!("failed to parse {} environment variable", HTTP_PORT_VAR))?;

    info!("Starting Pokedex HTTP server");
    let server_pool = pool.clone();
    let server = HttpServer::new(move || pokedex_app!(server_pool))
        .bind((server_address.as_str(), http_port))
        .with_context(|| format!("failed to bind to {}:{}", server_address, http_port))?
        .run();

    info!(
        "Pokedex server started in {}! Listening on http://{}:{}",
        ServiceEnv::current(),
        server_address,
        http_port
    );
    info!("Rust version used: {}", version());
    if ServiceEnv::current().is_development() {
        info!("Backtrace support: {}", get_backtrace_support());
    }

    let result = server.await;

    info!("Server stopped; closing DB connection pool");
    pool.close();

    Ok(result?)
}

/// Returns a string representing the status of [`Backtrace`](std::backtrace::Backtrace) support.
fn get_backtrace_support() -> &'static str {
    #[cfg(backtrace_support)]
    match std::backtrace::Backtrace::capture().status() {
        std::backtrace::BacktraceStatus::Captured => "supported",
        std::backtrace::BacktraceStatus::Disabled => "disabled",
        std::backtrace::BacktraceStatus::Unsupported => "unsupported",
        _ => "unknown",
    }

    #[cfg(not(backtrace_support))]
    "unsupported (not Nightly toolchain)"
}
