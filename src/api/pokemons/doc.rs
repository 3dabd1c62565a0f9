//! [`IntoResponses`] wrappers used to document the pokemons endpoints with [`utoipa::path`].

use utoipa::IntoResponses;

use crate::api::errors::ErrorResponse;

/// 400 response for an invalid `id` path parameter.
#[derive(Debug, IntoResponses)]
#[response(status = BAD_REQUEST, description = "Invalid value for id path parameter")]
pub struct InvalidIdParamResponse;

/// 400 response for a missing or empty `name` query parameter.
#[derive(Debug, IntoResponses)]
#[response(status = BAD_REQUEST, description = "Missing name query parameter")]
pub struct MissingNameParamResponse;

/// 400 response for an invalid Pokemon request body (including an `id` already in use).
#[derive(Debug, IntoResponses)]
#[response(
    status = BAD_REQUEST,
    description = "Invalid Pokemon information in request body, or id already used",
)]
pub struct InvalidPokemonBodyResponse;

/// 400 response for an invalid `id` path parameter OR an invalid Pokemon request body.
#[derive(Debug, IntoResponses)]
#[response(
    status = BAD_REQUEST,
    description = "Invalid value for id path parameter OR invalid Pokemon information in request body",
)]
pub struct InvalidIdParamOrPokemonBodyResponse;

/// 404 response when the requested Pokemon does not exist.
#[derive(Debug, IntoResponses)]
#[response(status = NOT_FOUND, description = "Requested Pokemon not found in database")]
pub struct PokemonNotFoundResponse;

/// 5XX response for internal server errors.
#[derive(Debug, IntoResponses)]
#[response(status = "5XX")]
pub struct ServerErrorResponse(#[to_response] ErrorResponse);
