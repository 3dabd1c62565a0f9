mod list {
    use actix_web::http::StatusCode;
    use actix_web::test;
    use diesel::result::Error as DieselError;
    use pokedex_api::api::errors::ErrorResponse;
    use pokedex_api::helpers::db::paginate::{reset_mock_error_producer, set_mock_error_producer};
    use pokedex_api::services::pokemon::PokemonsPage;
    use serial_test::file_serial;

    use crate::init_test_service;
    use crate::integration_helpers::factories::pokemon::build_pokemons;

    #[test_log::test(actix_web::test)]
    #[file_serial(api_pokemons)]
    async fn test_empty_list() {
        init_test_service!(app, service);

        let req = test::TestRequest::with_uri("/pokemons").to_request();
        let page: PokemonsPage = test::call_and_read_body_json(&service, req).await;

        assert!(page.pokemons.is_empty());
        assert_eq!(1, page.page);
        assert_eq!(0, page.total_pages);
        assert_eq!(0, page.total_pokemons);
    }

    #[test_log::test(actix_web::test)]
    #[file_serial(api_pokemons)]
    async fn test_paginated_list() {
        init_test_service!(app, service);

        app.insert_pokemons(&build_pokemons(45)).await;

        for (page_number, expected_count) in [(1i64, 20usize), (2, 20), (3, 5)] {
            let req = test::TestRequest::with_uri(&format!("/pokemons?page={}", page_number))
                .to_request();
            let page: PokemonsPage = test::call_and_read_body_json(&service, req).await;

            assert_eq!(page_number, page.page);
            assert_eq!(3, page.total_pages);
            assert_eq!(45, page.total_pokemons);
            assert_eq!(expected_count, page.pokemons.len());

            let first_id = (page_number - 1) * 20 + 1;
            let ids: Vec<i64> = page.pokemons.iter().map(|pokemon| pokemon.id).collect();
            let expected_ids: Vec<i64> = (first_id..first_id + expected_count as i64).collect();
            assert_eq!(expected_ids, ids);
        }
    }

    #[test_log::test(actix_web::test)]
    #[file_serial(api_pokemons)]
    async fn test_default_page() {
        init_test_service!(app, service);

        app.insert_pokemons(&build_pokemons(25)).await;

        let req = test::TestRequest::with_uri("/pokemons").to_request();
        let page: PokemonsPage = test::call_and_read_body_json(&service, req).await;

        assert_eq!(1, page.page);
        assert_eq!(20, page.pokemons.len());
        assert_eq!(1, page.pokemons[0].id);
    }

    #[test_log::test(actix_web::test)]
    #[file_serial(api_pokemons)]
    async fn test_page_past_the_end() {
        init_test_service!(app, service);

        app.insert_pokemons(&build_pokemons(5)).await;

        let req = test::TestRequest::with_uri("/pokemons?page=4").to_request();
        let page: PokemonsPage = test::call_and_read_body_json(&service, req).await;

        assert!(page.pokemons.is_empty());
        assert_eq!(4, page.page);
        assert_eq!(1, page.total_pages);
        assert_eq!(5, page.total_pokemons);
    }

    #[test_log::test(actix_web::test)]
    #[file_serial(api_pokemons)]
    async fn test_invalid_page_falls_back_to_first() {
        init_test_service!(app, service);

        app.insert_pokemons(&build_pokemons(25)).await;

        for query in ["page=0", "page=-3", "page=foo", "page="] {
            let req = test::TestRequest::with_uri(&format!("/pokemons?{}", query)).to_request();
            let result = test::call_service(&service, req).await;
            assert_eq!(StatusCode::OK, result.status(), "query: {}", query);

            let page: PokemonsPage = test::read_body_json(result).await;
            assert_eq!(1, page.page, "query: {}", query);
            assert_eq!(20, page.pokemons.len(), "query: {}", query);
            assert_eq!(1, page.pokemons[0].id, "query: {}", query);
        }
    }

    #[test_log::test(actix_web::test)]
    #[file_serial(api_pokemons)]
    async fn test_broken_db_connection() {
        init_test_service!(app, service);

        let result = {
            set_mock_error_producer(Box::new(|| Some(DieselError::BrokenTransactionManager)));

            let req = test::TestRequest::with_uri("/pokemons").to_request();
            let result = test::call_service(&service, req).await;

            reset_mock_error_producer();

            result
        };

        assert_eq!(StatusCode::INTERNAL_SERVER_ERROR, result.status());
        let error: ErrorResponse = test::read_body_json(result).await;
        assert_eq!(StatusCode::INTERNAL_SERVER_ERROR, error.status_code);
        assert!(!error.error.is_empty());
    }

    #[test_log::test(actix_web::test)]
    #[file_serial(api_pokemons)]
    async fn test_working_db_connection() {
        init_test_service!(app, service);

        let result = {
            set_mock_error_producer(Box::new(|| None));

            let req = test::TestRequest::with_uri("/pokemons").to_request();
            let result = test::call_service(&service, req).await;

            reset_mock_error_producer();

            result
        };

        assert!(result.status().is_success());
    }
}

mod search {
    use actix_web::http::StatusCode;
    use actix_web::test;
    use pokedex_api::api::errors::ErrorResponse;
    use pokedex_api::models::pokemon::Pokemon;
    use serial_test::file_serial;

    use crate::init_test_service;
    use crate::integration_helpers::factories::pokemon::build_named_pokemon;

    #[test_log::test(actix_web::test)]
    #[file_serial(api_pokemons)]
    async fn test_case_insensitive_substring() {
        init_test_service!(app, service);

        app.insert_pokemons(&[
            build_named_pokemon(1, "Bulbasaur"),
            build_named_pokemon(4, "Charmander"),
        ])
        .await;

        for query in ["bulba", "BULBA", "saur", "Bulbasaur"] {
            let req = test::TestRequest::with_uri(&format!("/pokemons/search?name={}", query))
                .to_request();
            let pokemon: Pokemon = test::call_and_read_body_json(&service, req).await;

            assert_eq!(1, pokemon.id, "query: {}", query);
            assert_eq!("Bulbasaur", pokemon.name.english);
        }
    }

    #[test_log::test(actix_web::test)]
    #[file_serial(api_pokemons)]
    async fn test_first_match_in_insertion_order() {
        init_test_service!(app, service);

        app.insert_pokemons(&[
            build_named_pokemon(9, "Blastoise"),
            build_named_pokemon(3, "Venusaur"),
            build_named_pokemon(1, "Bulbasaur"),
        ])
        .await;

        let req = test::TestRequest::with_uri("/pokemons/search?name=saur").to_request();
        let pokemon: Pokemon = test::call_and_read_body_json(&service, req).await;

        assert_eq!(3, pokemon.id);
    }

    #[test_log::test(actix_web::test)]
    #[file_serial(api_pokemons)]
    async fn test_only_english_name() {
        init_test_service!(app, service);

        app.insert_pokemons(&[build_named_pokemon(1, "Bulbasaur")]).await;

        // The factory's French name is "Pikafou_1"
        let req = test::TestRequest::with_uri("/pokemons/search?name=Pikafou").to_request();
        let result = test::call_service(&service, req).await;

        assert_eq!(StatusCode::NOT_FOUND, result.status());
    }

    #[test_log::test(actix_web::test)]
    #[file_serial(api_pokemons)]
    async fn test_wildcards_match_literally() {
        init_test_service!(app, service);

        app.insert_pokemons(&[build_named_pokemon(1, "Bulbasaur")]).await;

        for query in ["%25", "_", "B%25r"] {
            let req = test::TestRequest::with_uri(&format!("/pokemons/search?name={}", query))
                .to_request();
            let result = test::call_service(&service, req).await;

            assert_eq!(StatusCode::NOT_FOUND, result.status(), "query: {}", query);
        }
    }

    #[test_log::test(actix_web::test)]
    #[file_serial(api_pokemons)]
    async fn test_not_found() {
        init_test_service!(app, service);

        app.insert_pokemons(&[build_named_pokemon(1, "Bulbasaur")]).await;

        let req = test::TestRequest::with_uri("/pokemons/search?name=mewtwo").to_request();
        let result = test::call_service(&service, req).await;
        assert_eq!(StatusCode::NOT_FOUND, result.status());

        let error: ErrorResponse = test::read_body_json(result).await;
        assert_eq!("Pokemon non trouvé", error.error);
    }

    #[test_log::test(actix_web::test)]
    #[file_serial(api_pokemons)]
    async fn test_missing_name() {
        init_test_service!(app, service);

        for uri in ["/pokemons/search", "/pokemons/search?name="] {
            let req = test::TestRequest::with_uri(uri).to_request();
            let result = test::call_service(&service, req).await;
            assert_eq!(StatusCode::BAD_REQUEST, result.status(), "uri: {}", uri);

            let error: ErrorResponse = test::read_body_json(result).await;
            assert_eq!("Le paramètre \"name\" est requis", error.error);
        }
    }
}

mod get {
    use actix_web::http::StatusCode;
    use actix_web::test;
    use pokedex_api::api::errors::ErrorResponse;
    use pokedex_api::models::pokemon::Pokemon;
    use serial_test::file_serial;

    use crate::init_test_service;
    use crate::integration_helpers::factories::pokemon::build_pokemon;

    #[test_log::test(actix_web::test)]
    #[file_serial(api_pokemons)]
    async fn test_exists() {
        init_test_service!(app, service);

        let new_pokemon = build_pokemon(151);
        app.insert_pokemons(&[new_pokemon.clone()]).await;

        let req = test::TestRequest::with_uri("/pokemons/151").to_request();
        let api_pokemon: Pokemon = test::call_and_read_body_json(&service, req).await;

        assert_eq!(new_pokemon, api_pokemon);
    }

    #[test_log::test(actix_web::test)]
    #[file_serial(api_pokemons)]
    async fn test_does_not_exist() {
        init_test_service!(app, service);

        let req = test::TestRequest::with_uri(&format!("/pokemons/{}", i64::MAX)).to_request();
        let result = test::call_service(&service, req).await;
        assert_eq!(StatusCode::NOT_FOUND, result.status());

        let error: ErrorResponse = test::read_body_json(result).await;
        assert_eq!(StatusCode::NOT_FOUND, error.status_code);
        assert_eq!("Pokemon non trouvé", error.error);
    }

    #[test_log::test(actix_web::test)]
    #[file_serial(api_pokemons)]
    async fn test_invalid_path_param() {
        init_test_service!(app, service);

        for uri in ["/pokemons/foobar", "/pokemons/-1"] {
            let req = test::TestRequest::with_uri(uri).to_request();
            let result = test::call_service(&service, req).await;

            assert_eq!(StatusCode::BAD_REQUEST, result.status(), "uri: {}", uri);
        }
    }
}

mod create {
    use actix_web::http::StatusCode;
    use actix_web::test;
    use pokedex_api::api::errors::ErrorResponse;
    use pokedex_api::models::pokemon::Pokemon;
    use serde_json::json;
    use serial_test::file_serial;

    use crate::init_test_service;
    use crate::integration_helpers::factories::pokemon::build_pokemon;

    #[test_log::test(actix_web::test)]
    #[file_serial(api_pokemons)]
    async fn test_create_pokemon() {
        init_test_service!(app, service);

        let new_pokemon = build_pokemon(25);

        let req = test::TestRequest::post()
            .uri("/pokemons")
            .set_json(&new_pokemon)
            .to_request();
        let result = test::call_service(&service, req).await;
        assert_eq!(StatusCode::CREATED, result.status());

        let api_pokemon: Pokemon = test::read_body_json(result).await;
        assert_eq!(new_pokemon, api_pokemon);

        let req = test::TestRequest::with_uri("/pokemons/25").to_request();
        let stored_pokemon: Pokemon = test::call_and_read_body_json(&service, req).await;
        assert_eq!(new_pokemon, stored_pokemon);
    }

    #[test_log::test(actix_web::test)]
    #[file_serial(api_pokemons)]
    async fn test_duplicate_id() {
        init_test_service!(app, service);

        app.insert_pokemons(&[build_pokemon(25)]).await;

        let req = test::TestRequest::post()
            .uri("/pokemons")
            .set_json(build_pokemon(25))
            .to_request();
        let result = test::call_service(&service, req).await;
        assert_eq!(StatusCode::BAD_REQUEST, result.status());

        assert_eq!(1, app.count_pokemons().await);
    }

    #[test_log::test(actix_web::test)]
    #[file_serial(api_pokemons)]
    async fn test_invalid_payload() {
        init_test_service!(app, service);

        let req = test::TestRequest::post()
            .uri("/pokemons")
            .set_json(json!({ "foo": "bar" }))
            .to_request();
        let result = test::call_service(&service, req).await;
        assert_eq!(StatusCode::BAD_REQUEST, result.status());

        let error: ErrorResponse = test::read_body_json(result).await;
        assert!(!error.error.is_empty());
    }

    #[test_log::test(actix_web::test)]
    #[file_serial(api_pokemons)]
    async fn test_missing_field() {
        init_test_service!(app, service);

        let mut payload = serde_json::to_value(build_pokemon(25)).unwrap();
        payload.as_object_mut().unwrap().remove("image");

        let req = test::TestRequest::post()
            .uri("/pokemons")
            .set_json(payload)
            .to_request();
        let result = test::call_service(&service, req).await;

        assert_eq!(StatusCode::BAD_REQUEST, result.status());
    }

    #[test_log::test(actix_web::test)]
    #[file_serial(api_pokemons)]
    async fn test_invalid_payload_values_validation() {
        init_test_service!(app, service);

        let invalid_payload = json!({
            "id": 0,
            "name": {
                "english": "",
                "japanese": "",
                "chinese": "",
                "french": ""
            },
            "type": ["Love"],
            "base": {
                "HP": 0,
                "Attack": -1,
                "Defense": 0,
                "SpecialAttack": 0,
                "SpecialDefense": 0,
                "Speed": 0
            },
            "image": "not a url"
        });

        let req = test::TestRequest::post()
            .uri("/pokemons")
            .set_json(invalid_payload)
            .to_request();
        let result = test::call_service(&service, req).await;

        assert_eq!(StatusCode::BAD_REQUEST, result.status());
        assert_eq!(0, app.count_pokemons().await);
    }
}

mod update {
    use actix_web::http::StatusCode;
    use actix_web::test;
    use pokedex_api::models::pokemon::Pokemon;
    use serde_json::json;
    use serial_test::file_serial;

    use crate::init_test_service;
    use crate::integration_helpers::factories::pokemon::build_pokemon;

    #[test_log::test(actix_web::test)]
    #[file_serial(api_pokemons)]
    async fn test_partial_update() {
        init_test_service!(app, service);

        let orig_pokemon = build_pokemon(7);
        app.insert_pokemons(&[orig_pokemon.clone()]).await;

        let req = test::TestRequest::put()
            .uri("/pokemons/7")
            .set_json(json!({
                "name": { "english": "Squirtle" },
                "base": { "Speed": 43 }
            }))
            .to_request();
        let api_pokemon: Pokemon = test::call_and_read_body_json(&service, req).await;

        let mut expected_pokemon = orig_pokemon;
        expected_pokemon.name.english = "Squirtle".into();
        expected_pokemon.base.speed = 43;
        assert_eq!(expected_pokemon, api_pokemon);

        let req = test::TestRequest::with_uri("/pokemons/7").to_request();
        let stored_pokemon: Pokemon = test::call_and_read_body_json(&service, req).await;
        assert_eq!(expected_pokemon, stored_pokemon);
    }

    #[test_log::test(actix_web::test)]
    #[file_serial(api_pokemons)]
    async fn test_full_update() {
        init_test_service!(app, service);

        app.insert_pokemons(&[build_pokemon(7)]).await;

        let mut updated_pokemon = build_pokemon(7);
        updated_pokemon.name.french = "Carapuce".into();
        updated_pokemon.types = vec!["Water".into()];
        updated_pokemon.image = "https://example.com/pokedex/images/squirtle.png".into();

        let req = test::TestRequest::put()
            .uri("/pokemons/7")
            .set_json(&updated_pokemon)
            .to_request();
        let api_pokemon: Pokemon = test::call_and_read_body_json(&service, req).await;

        assert_eq!(updated_pokemon, api_pokemon);
    }

    #[test_log::test(actix_web::test)]
    #[file_serial(api_pokemons)]
    async fn test_empty_update() {
        init_test_service!(app, service);

        let orig_pokemon = build_pokemon(7);
        app.insert_pokemons(&[orig_pokemon.clone()]).await;

        let req = test::TestRequest::put()
            .uri("/pokemons/7")
            .set_json(json!({}))
            .to_request();
        let api_pokemon: Pokemon = test::call_and_read_body_json(&service, req).await;

        assert_eq!(orig_pokemon, api_pokemon);
    }

    #[test_log::test(actix_web::test)]
    #[file_serial(api_pokemons)]
    async fn test_update_nonexistent() {
        init_test_service!(app, service);

        for payload in [json!({ "name": { "english": "Missingno" } }), json!({})] {
            let req = test::TestRequest::put()
                .uri(&format!("/pokemons/{}", i64::MAX))
                .set_json(payload)
                .to_request();
            let result = test::call_service(&service, req).await;

            assert_eq!(StatusCode::NOT_FOUND, result.status());
        }
    }

    #[test_log::test(actix_web::test)]
    #[file_serial(api_pokemons)]
    async fn test_id_already_used() {
        init_test_service!(app, service);

        app.insert_pokemons(&[build_pokemon(7), build_pokemon(8)]).await;

        let req = test::TestRequest::put()
            .uri("/pokemons/8")
            .set_json(json!({ "id": 7 }))
            .to_request();
        let result = test::call_service(&service, req).await;

        assert_eq!(StatusCode::BAD_REQUEST, result.status());
    }

    #[test_log::test(actix_web::test)]
    #[file_serial(api_pokemons)]
    async fn test_invalid_path_param() {
        init_test_service!(app, service);

        for uri in ["/pokemons/foobar", "/pokemons/-1"] {
            let req = test::TestRequest::put()
                .uri(uri)
                .set_json(json!({ "name": { "english": "Squirtle" } }))
                .to_request();
            let result = test::call_service(&service, req).await;

            assert_eq!(StatusCode::BAD_REQUEST, result.status(), "uri: {}", uri);
        }
    }

    #[test_log::test(actix_web::test)]
    #[file_serial(api_pokemons)]
    async fn test_invalid_payload() {
        init_test_service!(app, service);

        let orig_pokemon = build_pokemon(7);
        app.insert_pokemons(&[orig_pokemon.clone()]).await;

        let invalid_payloads = [
            json!({ "foo": "bar" }),
            json!({ "name": { "english": "" } }),
            json!({ "type": [] }),
            json!({ "type": ["Love"] }),
            json!({ "base": { "HP": 0 } }),
            json!({ "image": "not a url" }),
            json!({ "base": { "Attack": "strong" } }),
        ];

        for payload in invalid_payloads {
            let req = test::TestRequest::put()
                .uri("/pokemons/7")
                .set_json(&payload)
                .to_request();
            let result = test::call_service(&service, req).await;

            assert_eq!(StatusCode::BAD_REQUEST, result.status(), "payload: {}", payload);
        }

        let req = test::TestRequest::with_uri("/pokemons/7").to_request();
        let stored_pokemon: Pokemon = test::call_and_read_body_json(&service, req).await;
        assert_eq!(orig_pokemon, stored_pokemon);
    }
}

mod delete {
    use actix_web::http::StatusCode;
    use actix_web::test;
    use pokedex_api::api::pokemons::DeletedPokemon;
    use serial_test::file_serial;

    use crate::init_test_service;
    use crate::integration_helpers::factories::pokemon::{build_named_pokemon, build_pokemon};

    #[test_log::test(actix_web::test)]
    #[file_serial(api_pokemons)]
    async fn test_delete_existing() {
        init_test_service!(app, service);

        app.insert_pokemons(&[build_named_pokemon(1, "Bulbasaur"), build_pokemon(2)])
            .await;

        let req = test::TestRequest::delete().uri("/pokemons/1").to_request();
        let deleted: DeletedPokemon = test::call_and_read_body_json(&service, req).await;
        assert_eq!("Pokemon \"Bulbasaur\" supprimé avec succès", deleted.message);

        let req = test::TestRequest::with_uri("/pokemons/1").to_request();
        let result = test::call_service(&service, req).await;
        assert_eq!(StatusCode::NOT_FOUND, result.status());

        assert_eq!(1, app.count_pokemons().await);
    }

    #[test_log::test(actix_web::test)]
    #[file_serial(api_pokemons)]
    async fn test_delete_nonexistent() {
        init_test_service!(app, service);

        let req = test::TestRequest::delete()
            .uri(&format!("/pokemons/{}", i64::MAX))
            .to_request();
        let result = test::call_service(&service, req).await;

        assert_eq!(StatusCode::NOT_FOUND, result.status());
    }

    #[test_log::test(actix_web::test)]
    #[file_serial(api_pokemons)]
    async fn test_invalid_path_param() {
        init_test_service!(app, service);

        let req = test::TestRequest::delete().uri("/pokemons/foobar").to_request();
        let result = test::call_service(&service, req).await;

        assert_eq!(StatusCode::BAD_REQUEST, result.status());
    }
}
