//! Services implementing the Pokedex business logic. Used by the REST API endpoints.

pub mod pokemon;
