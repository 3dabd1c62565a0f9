//! Helpers to validate Pokemon data.

use std::borrow::Cow;

use validator::ValidationError;

/// The valid Pokemon types.
///
/// Used to validate the `type` field of Pokemon records.
pub const POKEMON_TYPES: [&str; 18] = [
    "Normal", "Fire", "Water", "Grass", "Flying", "Fighting", "Poison", "Electric", "Ground",
    "Rock", "Psychic", "Ice", "Bug", "Ghost", "Steel", "Dragon", "Dark", "Fairy",
];

/// Validates a single Pokemon type value.
///
/// A type is valid only if it appears in [`POKEMON_TYPES`] (case-sensitive).
pub fn validate_pokemon_type(type_value: &str) -> Result<(), ValidationError> {
    if POKEMON_TYPES.contains(&type_value) {
        return Ok(());
    }

    let mut validation_error = ValidationError::new("invalid_type");
    validation_error.message = Some(Cow::from(format!(
        "type `{}` must be one of {} or {}",
        type_value,
        POKEMON_TYPES[..POKEMON_TYPES.len() - 1].join(", "),
        POKEMON_TYPES[POKEMON_TYPES.len() - 1],
    )));
    validation_error.add_param(Cow::from("value"), &type_value);

    Err(validation_error)
}

/// Validates a list of Pokemon types, as found in the `type` field of a record.
///
/// Fails on the first invalid type (see [`validate_pokemon_type`]). Emptiness is not checked
/// here; use a `length` validation for that.
pub fn validate_pokemon_types(types: &[String]) -> Result<(), ValidationError> {
    types
        .iter()
        .try_for_each(|type_value| validate_pokemon_type(type_value))
}
