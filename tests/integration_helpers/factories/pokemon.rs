use pokedex_api::models::pokemon::{Pokemon, PokemonBase, PokemonName};
use validator::Validate;

pub fn build_pokemon(pokemon_id: i64) -> Pokemon {
    let pokemon = Pokemon {
        id: pokemon_id,
        name: PokemonName {
            english: format!("Pikafoo_{}", pokemon_id),
            japanese: format!("ピカフー_{}", pokemon_id),
            chinese: format!("皮卡福_{}", pokemon_id),
            french: format!("Pikafou_{}", pokemon_id),
        },
        types: vec!["Grass".into(), "Electric".into()],
        base: PokemonBase {
            hp: 66,
            attack: 7,
            defense: 11,
            special_attack: 23,
            special_defense: 67,
            speed: 3,
        },
        image: format!("https://example.com/pokedex/images/{:03}.png", pokemon_id),
    };

    pokemon.validate().unwrap();
    pokemon
}

pub fn build_pokemons(count: usize) -> Vec<Pokemon> {
    (1..=count as i64).map(build_pokemon).collect()
}

pub fn build_named_pokemon(pokemon_id: i64, english_name: &str) -> Pokemon {
    let mut pokemon = build_pokemon(pokemon_id);
    pokemon.name.english = english_name.into();

    pokemon
}
