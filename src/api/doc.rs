//! OpenAPI documentation support.

use actix_web::web::ServiceConfig;
use log::trace;
use utoipa::OpenApi;
use utoipa_rapidoc::RapiDoc;
use utoipa_redoc::{Redoc, Servable};
use utoipa_swagger_ui::SwaggerUi;

use crate::api;
use crate::api::errors::ErrorResponse;
use crate::api::pokemons::DeletedPokemon;
use crate::models::pokemon::{
    Pokemon, PokemonBase, PokemonBasePatch, PokemonName, PokemonNamePatch, PokemonPatch,
};
use crate::services::pokemon::PokemonsPage;

/// URL of the generated OpenAPI document.
pub const OPENAPI_URL: &str = "/api-docs/openapi.json";

/// Registers the OpenAPI document and the Swagger UI, Redoc and RapiDoc viewers.
///
/// Called from [`api::configure`].
pub fn configure(config: &mut ServiceConfig) {
    trace!("Adding OpenAPI doc endpoints");

    let openapi = ApiDoc::openapi();
    config
        .service(
            SwaggerUi::new("/swagger-ui/{_:.*}").url(OPENAPI_URL, openapi.clone()),
        )
        .service(Redoc::with_url("/redoc", openapi.clone()))
        .service(RapiDoc::new(OPENAPI_URL).path("/rapidoc"));
}

/// OpenAPI description of the Pokedex API, generated by [`utoipa`].
#[derive(OpenApi)]
#[openapi(
    info(title = "Pokedex API"),
    paths(
        api::pokemons::list,
        api::pokemons::search,
        api::pokemons::get,
        api::pokemons::create,
        api::pokemons::update,
        api::pokemons::delete,
    ),
    components(
        schemas(
            Pokemon,
            PokemonName,
            PokemonBase,
            PokemonPatch,
            PokemonNamePatch,
            PokemonBasePatch,
            DeletedPokemon,
            ErrorResponse,
        ),
        responses(PokemonsPage, Pokemon, DeletedPokemon, ErrorResponse),
    ),
    tags((name = "pokemons", description = "Pokedex CRUD endpoints")),
)]
pub struct ApiDoc;
