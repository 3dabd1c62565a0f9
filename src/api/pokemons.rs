//! Pokedex REST API endpoints for pokemons, registered under `/pokemons`.
//!
//! # Endpoints
//!
//! | HTTP method | Endpoint                      | Usage                                         | See                       |
//! |-------------|-------------------------------|-----------------------------------------------|---------------------------|
//! | `GET`       | `/pokemons?page=<n>`          | Lists pokemons, 20 per page                   | [`list`]                  |
//! | `GET`       | `/pokemons/search?name=<str>` | Finds a pokemon by part of its English name   | [`search`]                |
//! | `GET`       | `/pokemons/{id}`              | Returns one pokemon, using its id             | [`get`](struct@get)       |
//! | `POST`      | `/pokemons`                   | Adds a new pokemon                            | [`create`]                |
//! | `PUT`       | `/pokemons/{id}`              | Updates some or all fields of a pokemon       | [`update`]                |
//! | `DELETE`    | `/pokemons/{id}`              | Deletes a pokemon                             | [`delete`](struct@delete) |

pub mod doc;

use std::ops::Deref;

use actix_web::web::{Data, ServiceConfig};
use actix_web::{delete, get, post, put, HttpResponse};
use actix_web_validator::{Json, Path, Query};
use log::{debug, trace};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::{IntoParams, ToResponse, ToSchema};
use validator::Validate;

use crate::api::pokemons::doc::{
    InvalidIdParamOrPokemonBodyResponse, InvalidIdParamResponse, InvalidPokemonBodyResponse,
    MissingNameParamResponse, PokemonNotFoundResponse, ServerErrorResponse,
};
use crate::db::Pool;
use crate::models::pokemon::{Pokemon, PokemonPatch};
use crate::services::pokemon;
use crate::services::pokemon::PokemonsPage;
use crate::Error;

/// Registers all pokemon endpoints, along with the [`pokemon::Service`] they use.
///
/// `/search` is registered before `/{id}` so that it is not mistaken for an id.
pub fn configure(pool: &Pool) -> impl FnOnce(&mut ServiceConfig) + '_ {
    |config| {
        trace!("Registering Pokemon service app data");
        config.app_data(Data::new(pokemon::Service::new(pool.clone())));

        trace!("Adding API CRUD endpoints for /pokemons");
        config
            .service(list)
            .service(search)
            .service(get)
            .service(create)
            .service(update)
            .service(delete);
    }
}

/// [`Result`](crate::Result) returned by API endpoints.
///
/// Errors are turned into JSON responses (see [`ErrorResponse::from`](crate::api::errors::ErrorResponse::from)).
pub type HttpResult = crate::Result<HttpResponse>;

/// Path parameter of endpoints working on a single Pokemon.
#[derive(Debug, Copy, Clone, Serialize, Deserialize, Validate, IntoParams)]
pub struct Id {
    /// Pokemon id
    #[validate(range(min = 0))]
    #[param(minimum = 0)]
    pub id: i64,
}

impl Deref for Id {
    type Target = i64;

    fn deref(&self) -> &Self::Target {
        &self.id
    }
}

/// Query parameters of the [list endpoint](list).
///
/// `page` never causes a 400: see [`parse_page`].
#[derive(Debug, Copy, Clone, Serialize, Deserialize, Validate, IntoParams)]
#[serde(default)]
pub struct ListParams {
    /// Index of the page to fetch (1-based)
    #[serde(deserialize_with = "deserialize_page")]
    #[param(default = 1)]
    pub page: i64,
}

impl Default for ListParams {
    fn default() -> Self {
        Self { page: 1 }
    }
}

fn deserialize_page<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    Ok(parse_page(&value))
}

/// Parses the value of the `page` query parameter, leniently.
///
/// Leading whitespace is skipped and only the leading integer is read, so `"2abc"` is page 2.
/// A value with no leading integer, or one that is not a positive `i64`, is page 1.
///
/// # Examples
///
/// ```
/// use pokedex_api::api::pokemons::parse_page;
///
/// assert_eq!(3, parse_page("3"));
/// assert_eq!(2, parse_page(" 2abc"));
/// assert_eq!(1, parse_page("abc"));
/// assert_eq!(1, parse_page(""));
/// assert_eq!(1, parse_page("0"));
/// assert_eq!(1, parse_page("-4"));
/// ```
pub fn parse_page(value: &str) -> i64 {
    let value = value.trim_start();
    let unsigned = value.strip_prefix(['+', '-']).unwrap_or(value);
    let digits_len = unsigned
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(unsigned.len());
    let number = &value[..value.len() - unsigned.len() + digits_len];

    number
        .parse::<i64>()
        .ok()
        .filter(|&page| page >= 1)
        .unwrap_or(1)
}

/// Query parameters of the [search endpoint](search).
///
/// `name` is optional at the extractor level so that a missing value can be reported with
/// a specific error message.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, IntoParams)]
#[serde(default)]
pub struct SearchParams {
    /// Part of the English name of the Pokemon to find (case-insensitive)
    #[param(min_length = 1)]
    pub name: Option<String>,
}

/// Confirmation returned by the [delete endpoint](struct@delete).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema, ToResponse)]
#[response(
    description = "Pokemon deleted",
    example = json!({ "message": "Pokemon \"Bulbasaur\" supprimé avec succès" }),
)]
pub struct DeletedPokemon {
    /// Confirmation message, including the deleted Pokemon's English name
    pub message: String,
}

impl From<&Pokemon> for DeletedPokemon {
    fn from(pokemon: &Pokemon) -> Self {
        Self { message: format!("Pokemon \"{}\" supprimé avec succès", pokemon.name.english) }
    }
}

#[cfg_attr(
    doc,
    doc = r"
        API endpoint to list pokemons, one page at a time.

        Registered as `GET /pokemons`.

        # Input

        | Query parameter | Usage                                           |
        |-----------------|-------------------------------------------------|
        | `page`          | Index of page to fetch (1-based, defaults to 1) |

        A `page` that is not a positive integer is read as page 1 (see [`parse_page`]).

        # Output

        A [`PokemonsPage`] holding up to [`PAGE_SIZE`] pokemons in insertion order, along
        with the total number of pokemons and pages. Requesting a page past the end returns
        an empty list.

        [`PAGE_SIZE`]: pokemon::Service::PAGE_SIZE
    "
)]
#[cfg_attr(not(doc), doc = "Lists Pokemons in the Pokedex, 20 at a time")]
#[utoipa::path(
    context_path = "/pokemons",
    params(ListParams),
    responses(
        (status = OK, response = PokemonsPage),
        ServerErrorResponse,
    ),
)]
#[get("", name = "/")]
pub async fn list(params: Query<ListParams>, service: Data<pokemon::Service>) -> HttpResult {
    let pokemons_page = service.get_ref().get_pokemons(params.page).await?;

    Ok(HttpResponse::Ok().json(pokemons_page))
}

#[cfg_attr(
    doc,
    doc = r"
        API endpoint to find a pokemon by name.

        Registered as `GET /pokemons/search`.

        # Input

        | Query parameter | Usage                                                  |
        |-----------------|--------------------------------------------------------|
        | `name`          | Required; part of the English name, matched ignoring case |

        # Output

        The first matching [`Pokemon`] (in insertion order), serialized as JSON. Only one
        result is returned even if several pokemons match.
    "
)]
#[cfg_attr(not(doc), doc = "Finds a Pokemon by part of its English name")]
#[utoipa::path(
    context_path = "/pokemons",
    params(SearchParams),
    responses(
        (status = OK, response = Pokemon),
        MissingNameParamResponse,
        PokemonNotFoundResponse,
        ServerErrorResponse,
    ),
)]
#[get("/search", name = "/search")]
pub async fn search(params: Query<SearchParams>, service: Data<pokemon::Service>) -> HttpResult {
    let name = match params.name.as_deref() {
        Some(name) if !name.is_empty() => name,
        _ => return Err(Error::missing_parameter("name")),
    };

    let pokemon = service.get_ref().search_pokemon(name).await?;

    Ok(HttpResponse::Ok().json(pokemon))
}

#[cfg_attr(
    doc,
    doc = r"
        API endpoint to fetch one pokemon.

        Registered as `GET /pokemons/{id}`.

        # Input

        - `{id}`: id of the pokemon to fetch.

        # Output

        A [`Pokemon`], serialized as JSON.
    "
)]
#[cfg_attr(not(doc), doc = "Returns information about a Pokemon")]
#[utoipa::path(
    context_path = "/pokemons",
    params(Id),
    responses(
        (status = OK, response = Pokemon),
        InvalidIdParamResponse,
        PokemonNotFoundResponse,
        ServerErrorResponse,
    ),
)]
#[get("/{id}", name = "/{id}")]
pub async fn get(id: Path<Id>, service: Data<pokemon::Service>) -> HttpResult {
    let pokemon = service.get_ref().get_pokemon(*id.into_inner()).await?;

    Ok(HttpResponse::Ok().json(pokemon))
}

#[cfg_attr(
    doc,
    doc = r"
        API endpoint to add a new pokemon.

        Registered as `POST /pokemons`.

        # Input

        - Request body: the complete [`Pokemon`], as JSON. Its `id` must not be in use.

        # Output

        The stored [`Pokemon`], serialized as JSON, with status `201 Created`.
    "
)]
#[cfg_attr(not(doc), doc = "Creates a new Pokemon")]
#[utoipa::path(
    context_path = "/pokemons",
    request_body(content = Pokemon, description = "New Pokemon information"),
    responses(
        (status = CREATED, response = Pokemon),
        InvalidPokemonBodyResponse,
        ServerErrorResponse,
    ),
)]
#[post("", name = "/")]
pub async fn create(new_pokemon: Json<Pokemon>, service: Data<pokemon::Service>) -> HttpResult {
    let pokemon = service.get_ref().create_pokemon(&new_pokemon).await?;
    debug!("Created pokemon {} ({})", pokemon.id, pokemon.name.english);

    Ok(HttpResponse::Created().json(pokemon))
}

#[cfg_attr(
    doc,
    doc = r"
        API endpoint to update a pokemon.

        Registered as `PUT /pokemons/{id}`.

        # Input

        - `{id}`: id of the pokemon to update.
        - Request body: a [`PokemonPatch`], as JSON. Only the fields present are updated; a
          complete pokemon replaces every field.

        # Output

        The updated [`Pokemon`], serialized as JSON.
    "
)]
#[cfg_attr(not(doc), doc = "Updates some or all fields of a Pokemon")]
#[utoipa::path(
    context_path = "/pokemons",
    params(Id),
    request_body(content = PokemonPatch, description = "Pokemon fields to update"),
    responses(
        (status = OK, response = Pokemon),
        InvalidIdParamOrPokemonBodyResponse,
        PokemonNotFoundResponse,
        ServerErrorResponse,
    ),
)]
#[put("/{id}", name = "/{id}")]
pub async fn update(
    id: Path<Id>,
    pokemon_patch: Json<PokemonPatch>,
    service: Data<pokemon::Service>,
) -> HttpResult {
    let pokemon = service
        .get_ref()
        .update_pokemon(*id.into_inner(), &pokemon_patch)
        .await?;

    Ok(HttpResponse::Ok().json(pokemon))
}

#[cfg_attr(
    doc,
    doc = r"
        API endpoint to delete a pokemon.

        Registered as `DELETE /pokemons/{id}`.

        # Input

        - `{id}`: id of the pokemon to delete.

        # Output

        A [`DeletedPokemon`] confirmation message naming the deleted pokemon.
    "
)]
#[cfg_attr(not(doc), doc = "Deletes a Pokemon")]
#[utoipa::path(
    context_path = "/pokemons",
    params(Id),
    responses(
        (status = OK, response = DeletedPokemon),
        InvalidIdParamResponse,
        PokemonNotFoundResponse,
        ServerErrorResponse,
    ),
)]
#[delete("/{id}", name = "/{id}")]
pub async fn delete(id: Path<Id>, service: Data<pokemon::Service>) -> HttpResult {
    let pokemon = service.get_ref().delete_pokemon(*id.into_inner()).await?;
    debug!("Deleted pokemon {} ({})", pokemon.id, pokemon.name.english);

    Ok(HttpResponse::Ok().json(DeletedPokemon::from(&pokemon)))
}
