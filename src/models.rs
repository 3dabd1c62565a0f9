//! Models used by the Pokedex API and its database layer.

pub mod pokemon;
