//! Database representations of Pokemon records.
//!
//! A [`Pokemon`] is stored as a single row of the `pokemons` table, with its nested `name`
//! and `base` objects flattened into columns.

use diesel_derives::{AsChangeset, Insertable, Queryable, Selectable};

use crate::models::pokemon::{Pokemon, PokemonPatch};
use crate::schema::pokemons;

/// A row of the `pokemons` table.
///
/// Loaded with `select(all_columns)`, so field order must match the table definition.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable)]
#[diesel(table_name = pokemons, check_for_backend(diesel::pg::Pg))]
#[allow(missing_docs)]
pub struct PokemonRow {
    /// Internal primary key; never exposed through the API. Reflects insertion order.
    pub pk: i64,
    pub id: i64,
    pub name_english: String,
    pub name_japanese: String,
    pub name_chinese: String,
    pub name_french: String,
    pub types: Vec<String>,
    pub hp: i32,
    pub attack: i32,
    pub defense: i32,
    pub special_attack: i32,
    pub special_defense: i32,
    pub speed: i32,
    pub image: String,
}

/// A new row to insert in the `pokemons` table. The primary key is generated by the database.
#[derive(Debug, Clone, PartialEq, Eq, Insertable)]
#[diesel(table_name = pokemons)]
#[allow(missing_docs)]
pub struct NewPokemonRow {
    pub id: i64,
    pub name_english: String,
    pub name_japanese: String,
    pub name_chinese: String,
    pub name_french: String,
    pub types: Vec<String>,
    pub hp: i32,
    pub attack: i32,
    pub defense: i32,
    pub special_attack: i32,
    pub special_defense: i32,
    pub speed: i32,
    pub image: String,
}

/// Changes to apply to a row of the `pokemons` table. Columns set to `None` are not updated.
///
/// `id` is a regular column here (the table's primary key is `pk`), so it can be changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, AsChangeset)]
#[diesel(table_name = pokemons, primary_key(pk))]
#[allow(missing_docs)]
pub struct PokemonChangeset {
    pub id: Option<i64>,
    pub name_english: Option<String>,
    pub name_japanese: Option<String>,
    pub name_chinese: Option<String>,
    pub name_french: Option<String>,
    pub types: Option<Vec<String>>,
    pub hp: Option<i32>,
    pub attack: Option<i32>,
    pub defense: Option<i32>,
    pub special_attack: Option<i32>,
    pub special_defense: Option<i32>,
    pub speed: Option<i32>,
    pub image: Option<String>,
}

impl PokemonChangeset {
    /// Returns `true` if this changeset would not update any column.
    ///
    /// `diesel` refuses to execute an `UPDATE` with an empty changeset, so callers must
    /// check this first.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl From<&Pokemon> for NewPokemonRow {
    fn from(pokemon: &Pokemon) -> Self {
        Self {
            id: pokemon.id,
            name_english: pokemon.name.english.clone(),
            name_japanese: pokemon.name.japanese.clone(),
            name_chinese: pokemon.name.chinese.clone(),
            name_french: pokemon.name.french.clone(),
            types: pokemon.types.clone(),
            hp: pokemon.base.hp,
            attack: pokemon.base.attack,
            defense: pokemon.base.defense,
            special_attack: pokemon.base.special_attack,
            special_defense: pokemon.base.special_defense,
            speed: pokemon.base.speed,
            image: pokemon.image.clone(),
        }
    }
}

impl From<&PokemonPatch> for PokemonChangeset {
    fn from(patch: &PokemonPatch) -> Self {
        let name = patch.name.clone().unwrap_or_default();
        let base = patch.base.unwrap_or_default();

        Self {
            id: patch.id,
            name_english: name.english,
            name_japanese: name.japanese,
            name_chinese: name.chinese,
            name_french: name.french,
            types: patch.types.clone(),
            hp: base.hp,
            attack: base.attack,
            defense: base.defense,
            special_attack: base.special_attack,
            special_defense: base.special_defense,
            speed: base.speed,
            image: patch.image.clone(),
        }
    }
}
