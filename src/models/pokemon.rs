//! Models used to create, update and return Pokemon records.
//!
//! The API works with nested records ([`Pokemon`]); the database stores them flattened in a
//! single row (see [`rows`]). Conversions between both are provided here.

pub mod rows;
pub mod validations;

use serde::{Deserialize, Serialize};
use utoipa::{ToResponse, ToSchema};
use validations::validate_pokemon_types;
use validator::Validate;

pub use self::rows::{NewPokemonRow, PokemonChangeset, PokemonRow};

#[cfg_attr(
    doc,
    doc = r#"
        A Pokemon record, as exposed by the API.

        Used both as the request body when [creating](crate::api::pokemons::create) a Pokemon and
        as the response body of most endpoints. The `id` is chosen by the client and must be
        unique; it is distinct from the internal primary key used in the database.

        Validation rules:

        | Field          | Rule                                                                |
        |----------------|---------------------------------------------------------------------|
        | `id`           | ≥ 1                                                                 |
        | `name.english` | non-empty                                                           |
        | `type`         | non-empty, each value in [`POKEMON_TYPES`](validations::POKEMON_TYPES) |
        | `base.HP`      | ≥ 1                                                                 |
        | other `base`   | ≥ 0                                                                 |
        | `image`        | a URL                                                               |
    "#
)]
#[cfg_attr(not(doc), doc = "Information about a Pokemon")]
#[derive(
    Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema, ToResponse,
)]
#[serde(deny_unknown_fields)]
#[response(
    description = "Pokemon information",
    example = json!({
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
    }),
)]
pub struct Pokemon {
    /// Pokemon id, chosen by the client; unique
    #[validate(range(min = 1))]
    #[schema(example = 1)]
    pub id: i64,

    /// Pokemon names in various languages
    #[validate]
    pub name: PokemonName,

    /// Pokemon types
    #[serde(rename = "type")]
    #[validate(length(min = 1), custom = "validate_pokemon_types")]
    #[schema(example = json!(["Grass", "Poison"]))]
    pub types: Vec<String>,

    /// Pokemon base stats
    #[validate]
    pub base: PokemonBase,

    /// URL of an image of the Pokemon
    #[validate(url)]
    #[schema(example = "https://raw.githubusercontent.com/fanzeyi/pokemon.json/master/images/001.png")]
    pub image: String,
}

/// Names of a Pokemon in various languages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct PokemonName {
    /// English name; used when searching by name
    #[validate(length(min = 1))]
    #[schema(example = "Bulbasaur")]
    pub english: String,

    /// Japanese name
    #[schema(example = "フシギダネ")]
    pub japanese: String,

    /// Chinese name
    #[schema(example = "妙蛙种子")]
    pub chinese: String,

    /// French name
    #[schema(example = "Bulbizarre")]
    pub french: String,
}

/// Base stats of a Pokemon
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
pub struct PokemonBase {
    /// Hit points
    #[serde(rename = "HP")]
    #[validate(range(min = 1))]
    #[schema(example = 45)]
    pub hp: i32,

    /// Attack stat
    #[validate(range(min = 0))]
    #[schema(example = 49)]
    pub attack: i32,

    /// Defense stat
    #[validate(range(min = 0))]
    #[schema(example = 49)]
    pub defense: i32,

    /// Special attack stat
    #[validate(range(min = 0))]
    #[schema(example = 65)]
    pub special_attack: i32,

    /// Special defense stat
    #[validate(range(min = 0))]
    #[schema(example = 65)]
    pub special_defense: i32,

    /// Speed stat
    #[validate(range(min = 0))]
    #[schema(example = 45)]
    pub speed: i32,
}

#[cfg_attr(
    doc,
    doc = r#"
        Fields to update in a Pokemon record.

        Every field is optional; omitted fields keep their current value. `name` and `base` can
        themselves be partial, in which case only the given sub-fields are replaced. The same
        validation rules as [`Pokemon`] apply to the fields that are present.
    "#
)]
#[cfg_attr(not(doc), doc = "Fields to update in a Pokemon; omitted fields are left unchanged")]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
#[schema(example = json!({
    "name": { "english": "Ivysaur" },
    "base": { "HP": 60 }
}))]
pub struct PokemonPatch {
    /// New Pokemon id; must not be used by another Pokemon
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1))]
    pub id: Option<i64>,

    /// Names to update
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate]
    pub name: Option<PokemonNamePatch>,

    /// New Pokemon types, replacing all existing ones
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1), custom = "validate_pokemon_types")]
    pub types: Option<Vec<String>>,

    /// Base stats to update
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate]
    pub base: Option<PokemonBasePatch>,

    /// New image URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(url)]
    pub image: Option<String>,
}

/// Pokemon names to update; omitted names are left unchanged
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct PokemonNamePatch {
    /// English name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1))]
    pub english: Option<String>,

    /// Japanese name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub japanese: Option<String>,

    /// Chinese name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chinese: Option<String>,

    /// French name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub french: Option<String>,
}

/// Pokemon base stats to update; omitted stats are left unchanged
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
pub struct PokemonBasePatch {
    /// Hit points
    #[serde(rename = "HP", default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1))]
    pub hp: Option<i32>,

    /// Attack stat
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0))]
    pub attack: Option<i32>,

    /// Defense stat
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0))]
    pub defense: Option<i32>,

    /// Special attack stat
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0))]
    pub special_attack: Option<i32>,

    /// Special defense stat
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0))]
    pub special_defense: Option<i32>,

    /// Speed stat
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0))]
    pub speed: Option<i32>,
}

impl From<PokemonRow> for Pokemon {
    /// Re-nests a database row into a [`Pokemon`] record, dropping its internal primary key.
    fn from(row: PokemonRow) -> Self {
        Self {
            id: row.id,
            name: PokemonName {
                english: row.name_english,
                japanese: row.name_japanese,
                chinese: row.name_chinese,
                french: row.name_french,
            },
            types: row.types,
            base: PokemonBase {
                hp: row.hp,
                attack: row.attack,
                defense: row.defense,
                special_attack: row.special_attack,
                special_defense: row.special_defense,
                speed: row.speed,
            },
            image: row.image,
        }
    }
}

impl From<Pokemon> for PokemonPatch {
    /// Converts a [`Pokemon`] into a patch that overwrites every field.
    fn from(pokemon: Pokemon) -> Self {
        Self {
            id: Some(pokemon.id),
            name: Some(PokemonNamePatch {
                english: Some(pokemon.name.english),
                japanese: Some(pokemon.name.japanese),
                chinese: Some(pokemon.name.chinese),
                french: Some(pokemon.name.french),
            }),
            types: Some(pokemon.types),
            base: Some(PokemonBasePatch {
                hp: Some(pokemon.base.hp),
                attack: Some(pokemon.base.attack),
                defense: Some(pokemon.base.defense),
                special_attack: Some(pokemon.base.special_attack),
                special_defense: Some(pokemon.base.special_defense),
                speed: Some(pokemon.base.speed),
            }),
            image: Some(pokemon.image),
        }
    }
}
