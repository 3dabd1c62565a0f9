//! Service used to load and save pokemons. Used by the Pokedex REST API.

use diesel::{delete, insert_into, update, ExpressionMethods, PgTextExpressionMethods, QueryDsl};
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::RunQueryDsl;
use log::debug;
use serde::{Deserialize, Serialize};
use utoipa::ToResponse;

use crate::db::{Pool, PooledConnection};
use crate::error::QueryContext;
use crate::helpers::db::paginate::{total_pages, Paginate};
use crate::helpers::db::search::contains_pattern;
use crate::models::pokemon::{NewPokemonRow, Pokemon, PokemonChangeset, PokemonPatch, PokemonRow};
use crate::schema::pokemons::all_columns;

/// Service implementation for [`Pokemon`] records.
///
/// Holds the database connection [`Pool`] and implements every operation exposed by the
/// [pokemons REST API endpoints](crate::api::pokemons). Records are identified by their `id`
/// field, never by the table's internal primary key.
#[derive(Clone)]
pub struct Service {
    pool: Pool,
}

impl Service {
    /// Number of pokemons per page when [listing](Service::get_pokemons).
    pub const PAGE_SIZE: i64 = 20;

    /// Creates a new pokemon service using the provided database connection [`Pool`].
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    /// Fetches one page of [`Pokemon`]s (1-based), in insertion order.
    ///
    /// See [`PokemonsPage`] for details on the returned data.
    pub async fn get_pokemons(&self, page: i64) -> crate::Result<PokemonsPage> {
        use crate::schema::pokemons::dsl::*;

        let mut connection = self.get_pooled_connection().await?;

        // The windowed count comes back with the rows, so a page past the end reports a total
        // of 0. In that case we count separately; the transaction makes both queries see the
        // same data.
        let (page_rows, total_pokemons) = connection
            .build_transaction()
            .read_only()
            .repeatable_read()
            .run(|connection| {
                async move {
                    let (page_rows, total) = pokemons
                        .order(pk)
                        .select(all_columns)
                        .paginate(page, Self::PAGE_SIZE)
                        .load_with_total::<PokemonRow, _>(connection)
                        .await?;

                    let total = if page_rows.is_empty() {
                        pokemons.count().get_result(connection).await?
                    } else {
                        total
                    };

                    Ok::<_, diesel::result::Error>((page_rows, total))
                }
                .scope_boxed()
            })
            .await
            .with_query_context(|| format!("failed to load pokemons at page {}", page))?;

        Ok(PokemonsPage {
            page,
            total_pages: total_pages(total_pokemons, Self::PAGE_SIZE),
            total_pokemons,
            pokemons: page_rows.into_iter().map(Pokemon::from).collect(),
        })
    }

    /// Returns the first [`Pokemon`] (in insertion order) whose English name contains
    /// `english_name`, ignoring case.
    pub async fn search_pokemon(&self, english_name: &str) -> crate::Result<Pokemon> {
        use crate::schema::pokemons::dsl::*;

        let mut connection = self.get_pooled_connection().await?;

        pokemons
            .filter(name_english.ilike(contains_pattern(english_name)))
            .order(pk)
            .first::<PokemonRow>(&mut connection)
            .await
            .map(Pokemon::from)
            .with_query_context(|| format!("failed to search pokemon named {:?}", english_name))
    }

    /// Returns the [`Pokemon`] with the given `id`.
    pub async fn get_pokemon(&self, pokemon_id: i64) -> crate::Result<Pokemon> {
        use crate::schema::pokemons::dsl::*;

        let mut connection = self.get_pooled_connection().await?;

        pokemons
            .filter(id.eq(pokemon_id))
            .first::<PokemonRow>(&mut connection)
            .await
            .map(Pokemon::from)
            .with_query_context(|| format!("failed to fetch pokemon with id {}", pokemon_id))
    }

    /// Adds a new [`Pokemon`] to the database and returns it as stored.
    ///
    /// Fails with a unique violation if a Pokemon with the same `id` already exists.
    pub async fn create_pokemon(&self, new_pokemon: &Pokemon) -> crate::Result<Pokemon> {
        use crate::schema::pokemons::dsl::*;

        let mut connection = self.get_pooled_connection().await?;

        insert_into(pokemons)
            .values(NewPokemonRow::from(new_pokemon))
            .get_result::<PokemonRow>(&mut connection)
            .await
            .map(Pokemon::from)
            .with_query_context(|| format!("failed to insert pokemon with id {}", new_pokemon.id))
    }

    /// Applies a [`PokemonPatch`] to the [`Pokemon`] with the given `id` and returns the result.
    ///
    /// Fields absent from the patch are left untouched. A patch without any field simply
    /// returns the current record.
    pub async fn update_pokemon(
        &self,
        pokemon_id: i64,
        pokemon_patch: &PokemonPatch,
    ) -> crate::Result<Pokemon> {
        use crate::schema::pokemons::dsl::*;

        let changeset = PokemonChangeset::from(pokemon_patch);
        if changeset.is_empty() {
            debug!("Empty update for pokemon {}; returning it unchanged", pokemon_id);
            return self.get_pokemon(pokemon_id).await;
        }

        let mut connection = self.get_pooled_connection().await?;

        update(pokemons.filter(id.eq(pokemon_id)))
            .set(&changeset)
            .get_result::<PokemonRow>(&mut connection)
            .await
            .map(Pokemon::from)
            .with_query_context(|| format!("failed to update pokemon {}", pokemon_id))
    }

    /// Deletes the [`Pokemon`] with the given `id` and returns it as it was before deletion.
    pub async fn delete_pokemon(&self, pokemon_id: i64) -> crate::Result<Pokemon> {
        use crate::schema::pokemons::dsl::*;

        let mut connection = self.get_pooled_connection().await?;

        delete(pokemons.filter(id.eq(pokemon_id)))
            .returning(all_columns)
            .get_result::<PokemonRow>(&mut connection)
            .await
            .map(Pokemon::from)
            .with_query_context(|| format!("failed to delete pokemon {}", pokemon_id))
    }

    /// Returns a [`PooledConnection`] from our internal database connection pool.
    async fn get_pooled_connection(&self) -> crate::Result<PooledConnection> {
        Ok(self.pool.get().await?)
    }
}

#[cfg_attr(
    doc,
    doc = r"
        A page of [`Pokemon`]s, as returned by [`Service::get_pokemons`].

        Pages hold [`Service::PAGE_SIZE`] pokemons, except for the last one. If pokemons are
        added or removed between calls, the totals may change from one page to the next.
    "
)]
#[cfg_attr(not(doc), doc = "A page of Pokemons")]
#[derive(Debug, Serialize, Deserialize, ToResponse)]
#[serde(rename_all = "camelCase")]
#[response(example = json!({
    "page": 1,
    "totalPages": 1,
    "totalPokemons": 1,
    "pokemons": [
        {
            "id": 1,
            "name": {
                "english": "Bulbasaur",
                "japanese": "フシギダネ",
                "chinese": "妙蛙种子",
                "french": "Bulbizarre"
            },
            "type": ["Grass", "Poison"],
            "base": {
                "HP": 45,
                "Attack": 49,
                "Defense": 49,
                "SpecialAttack": 65,
                "SpecialDefense": 65,
                "Speed": 45
            },
            "image": "https://raw.githubusercontent.com/fanzeyi/pokemon.json/master/images/001.png"
        }
    ]
}))]
pub struct PokemonsPage {
    /// Current page number (1-based)
    pub page: i64,

    /// Total number of pages available
    pub total_pages: i64,

    /// Total number of Pokemons in the Pokedex
    pub total_pokemons: i64,

    /// The Pokemons in the page
    pub pokemons: Vec<Pokemon>,
}
