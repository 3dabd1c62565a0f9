mod pokemons;
