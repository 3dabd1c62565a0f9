//! Applies the Pokedex database migrations, to both the main and the test databases.
//!
//! Equivalent to `diesel migration run`, without requiring the diesel CLI.

use std::sync::OnceLock;
use std::time::Instant;

use anyhow::{anyhow, Context};
use diesel::migration::MigrationSource;
use diesel::{Connection, ConnectionError};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use log::{info, trace, warn};
use pokedex_api::db::{get_db_url, test_db_url, Backend, SyncConnection};
use pokedex_api::helpers::env::load_optional_dotenv;
use regex::Regex;
use simple_logger::SimpleLogger;

/// Migrations embedded in the executable (from the `migrations` directory).
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

fn main() -> anyhow::Result<()> {
    SimpleLogger::new()
        .init()
        .with_context(|| "failed to initialize logging facility")?;

    info!("Loading environment variables");
    load_optional_dotenv()
        .with_context(|| "failed to load `.env` file containing environment variables")?;

    let start_time = Instant::now();

    let db_url = get_db_url().with_context(|| "failed to get DB URL")?;
    let test_db_url = test_db_url(&db_url);

    for target_url in [db_url, test_db_url] {
        let display_url = redact_db_url(&target_url)?;

        info!("Applying migrations to database `{}`", display_url);
        if !apply_migrations(&target_url, MIGRATIONS)? {
            warn!("Could not connect to database `{}`; skipped", display_url);
        }
    }

    info!("Migrations done in {:.4?}s.", start_time.elapsed().as_secs_f64());

    Ok(())
}

/// Removes the user and password from a DB URL so that it can be logged.
fn redact_db_url(db_url: &str) -> anyhow::Result<String> {
    static CREDENTIALS: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();

    let credentials = CREDENTIALS
        .get_or_init(|| Regex::new("^(?<scheme>postgres(?:ql)?://)[^@/]+@"))
        .as_ref()
        .map_err(Clone::clone)
        .with_context(|| "failed to compile DB URL filter")?;

    Ok(credentials.replace(db_url, "$scheme").into_owned())
}

/// Applies pending migrations to the database at `db_url`.
///
/// Returns `Ok(false)` if the database could not be reached.
fn apply_migrations<S>(db_url: &str, migrations: S) -> anyhow::Result<bool>
where
    S: MigrationSource<Backend>,
{
    let mut connection = match SyncConnection::establish(db_url) {
        Ok(connection) => connection,
        Err(ConnectionError::BadConnection(err)) => {
            trace!("Connection error: {}", err);
            return Ok(false);
        },
        Err(err) => return Err(err).with_context(|| "failed to connect to Postgres database"),
    };

    let applied_migrations = connection
        .run_pending_migrations(migrations)
        .map_err(|err| anyhow!("{}", err))
        .with_context(|| "failed to apply migrations")?;
    info!("{} migration(s) applied", applied_migrations.len());

    Ok(true)
}
