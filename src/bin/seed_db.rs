//! Seeds the Pokedex database with the pokemons listed in `seed/pokedex.json`.
//!
//! Existing pokemons are removed first. See `README.md` for usage.

use std::env::current_exe;
use std::fs::File;
use std::io::BufReader;
use std::time::Instant;

use anyhow::Context;
use cargo_metadata::camino::Utf8PathBuf;
use cargo_metadata::MetadataCommand;
use diesel::{delete, insert_into, Connection, RunQueryDsl};
use log::{info, trace};
use pokedex_api::db::{get_db_url, SyncConnection};
use pokedex_api::helpers::env::load_optional_dotenv;
use pokedex_api::models::pokemon::{NewPokemonRow, Pokemon};
use simple_logger::SimpleLogger;
use validator::Validate;

/// Name of the seed file, in the `seed` directory.
const SEED_FILE_NAME: &str = "pokedex.json";

fn main() -> anyhow::Result<()> {
    SimpleLogger::new()
        .init()
        .with_context(|| "failed to initialize logging facility")?;

    info!("Loading environment variables");
    load_optional_dotenv()
        .with_context(|| "failed to load `.env` file containing environment variables")?;

    let start_time = Instant::now();
    let seed_file_path = get_seed_file_path()?;

    info!("Loading pokemon data from {}", seed_file_path);
    let new_pokemons = load_seed_file(&seed_file_path)?;

    info!("Connecting to Postgres database");
    let mut connection = SyncConnection::establish(&get_db_url()?)
        .with_context(|| "failed to connect to Postgres database")?;

    connection.transaction(|connection| replace_pokemons(connection, &new_pokemons))?;

    info!("Pokemon database seeded in {:.4?}s.", start_time.elapsed().as_secs_f64());

    Ok(())
}

/// Returns the path to the seed file.
///
/// Looks next to the current executable first, then in the workspace root (found through cargo).
fn get_seed_file_path() -> anyhow::Result<Utf8PathBuf> {
    let mut exe_seed_path = current_exe()?;
    exe_seed_path.pop();
    exe_seed_path.push("seed");
    exe_seed_path.push(SEED_FILE_NAME);
    if exe_seed_path.is_file() {
        return exe_seed_path
            .try_into()
            .with_context(|| "seed file path contains invalid UTF-8 characters");
    }

    let metadata = MetadataCommand::new()
        .exec()
        .with_context(|| "failed to get metadata to fetch workspace root")?;

    Ok(metadata.workspace_root.join("seed").join(SEED_FILE_NAME))
}

/// Loads and validates the pokemons stored in the JSON seed file.
fn load_seed_file(path: &Utf8PathBuf) -> anyhow::Result<Vec<NewPokemonRow>> {
    let file = File::open(path).with_context(|| format!("failed to open seed file {}", path))?;

    let pokemons: Vec<Pokemon> = serde_json::from_reader(BufReader::new(file))
        .with_context(|| "failed to parse pokemon data from seed file")?;

    for pokemon in &pokemons {
        pokemon
            .validate()
            .with_context(|| format!("seed file contains invalid pokemon with id {}", pokemon.id))?;
    }
    trace!("Found {} pokemons in the seed file", pokemons.len());

    Ok(pokemons.iter().map(NewPokemonRow::from).collect())
}

/// Replaces every pokemon in the database with `new_pokemons`.
fn replace_pokemons(
    connection: &mut SyncConnection,
    new_pokemons: &[NewPokemonRow],
) -> anyhow::Result<()> {
    use pokedex_api::schema::pokemons::dsl::*;

    info!("Deleting existing pokemons from database, if any");
    let deleted_count = delete(pokemons)
        .execute(connection)
        .with_context(|| "failed to delete existing pokemons from database")?;
    trace!("{} existing pokemons have been deleted", deleted_count);

    info!("Inserting pokemons into database");
    let inserted_count = insert_into(pokemons)
        .values(new_pokemons)
        .execute(connection)
        .with_context(|| "failed to insert pokemons into database")?;
    info!("{} pokemons have been inserted into database", inserted_count);

    Ok(())
}
