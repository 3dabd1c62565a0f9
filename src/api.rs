//! Types and functions used to implement the Pokedex REST API.
//!
//! # Endpoints
//!
//! | HTTP method | Endpoint                      | See                             |
//! |-------------|-------------------------------|---------------------------------|
//! | `GET`       | `/`                           | [`hello`]                       |
//! | `GET`       | `/pokemons`                   | [`pokemons::list`]              |
//! | `GET`       | `/pokemons/search?name=<str>` | [`pokemons::search`]            |
//! | `GET`       | `/pokemons/{id}`              | [`pokemons::get`](struct@pokemons::get)       |
//! | `POST`      | `/pokemons`                   | [`pokemons::create`]            |
//! | `PUT`       | `/pokemons/{id}`              | [`pokemons::update`]            |
//! | `DELETE`    | `/pokemons/{id}`              | [`pokemons::delete`](struct@pokemons::delete) |
//!
//! The OpenAPI documentation is served under `/swagger-ui/`, `/redoc` and `/rapidoc` (see [`doc`]).

pub mod doc;
pub mod errors;
pub mod pokemons;

use actix_cors::Cors;
use actix_web::http::header::ContentType;
use actix_web::web::ServiceConfig;
use actix_web::{web, HttpResponse, Responder};
use actix_web_validator::{JsonConfig, PathConfig, QueryConfig};
use log::trace;

use crate::api::errors::actix_error_handler;
use crate::db::Pool;

/// Body returned by the [`hello`] endpoint.
pub const HELLO_MESSAGE: &str = "Hello, World!";

/// Registers every Pokedex API endpoint, using `pool` to reach the database.
///
/// Also registers the extractor configs so that invalid input produces our JSON error
/// responses (see [`actix_error_handler`]). Called from [`pokedex_app`](crate::pokedex_app).
pub fn configure(pool: &Pool) -> impl FnOnce(&mut ServiceConfig) + '_ {
    |config| {
        trace!("Registering extractor error handlers");
        config
            .app_data(JsonConfig::default().error_handler(actix_error_handler))
            .app_data(QueryConfig::default().error_handler(actix_error_handler))
            .app_data(PathConfig::default().error_handler(actix_error_handler));

        trace!("Adding health endpoint at /");
        config.route("/", web::get().to(hello));

        trace!("Adding API endpoints for /pokemons");
        config.service(web::scope("/pokemons").configure(pokemons::configure(pool)));

        doc::configure(config);
    }
}

/// Returns the CORS middleware used by the Pokedex app.
///
/// Requests from any origin are accepted, with any method and header.
pub fn cors() -> Cors {
    trace!("Enabling CORS for all origins");

    Cors::default()
        .allow_any_origin()
        .send_wildcard()
        .allow_any_method()
        .allow_any_header()
        .max_age(3600)
}

/// Handler for the `/` endpoint. Returns a plain text greeting; usable as a health check.
pub async fn hello() -> impl Responder {
    HttpResponse::Ok()
        .content_type(ContentType::plaintext())
        .body(HELLO_MESSAGE)
}
