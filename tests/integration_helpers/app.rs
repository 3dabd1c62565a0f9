use std::env;
use std::sync::Once;

use diesel::Connection;
use log::{debug, trace};
use pokedex_api::db::{get_db_url, get_pool, test_db_url, Pool, PooledConnection, SyncConnection};
use pokedex_api::helpers::env::load_optional_dotenv;
use pokedex_api::models::pokemon::{NewPokemonRow, Pokemon};

#[macro_export]
macro_rules! init_test_service {
    ($app_var:ident, $service_var:ident) => {
        let $app_var = $crate::integration_helpers::app::TestApp::new();
        let $service_var =
            actix_web::test::init_service(pokedex_api::pokedex_app!($app_var.get_pool())).await;
    };
}

/// Test fixture giving access to the test DB. Deletes all pokemons when dropped.
pub struct TestApp {
    pool: Pool,
}

impl TestApp {
    pub fn new() -> Self {
        static INIT_TEST_DB_ENV_VAR: Once = Once::new();
        INIT_TEST_DB_ENV_VAR.call_once(|| {
            debug!("Loading environment variables");
            load_optional_dotenv().unwrap();

            let db_url = test_db_url(&get_db_url().unwrap());
            debug!("Using test DB");
            env::set_var("DATABASE_URL", db_url);
        });

        Self { pool: get_pool().unwrap() }
    }

    pub fn get_pool(&self) -> Pool {
        self.pool.clone()
    }

    pub async fn get_pooled_connection(&self) -> PooledConnection {
        self.pool.get().await.unwrap()
    }

    /// Inserts pokemons directly in the test DB, in order.
    pub async fn insert_pokemons(&self, new_pokemons: &[Pokemon]) {
        use diesel_async::RunQueryDsl;
        use pokedex_api::schema::pokemons::dsl::*;

        let rows: Vec<NewPokemonRow> = new_pokemons.iter().map(NewPokemonRow::from).collect();

        let mut connection = self.get_pooled_connection().await;
        let inserted_count = diesel::insert_into(pokemons)
            .values(&rows)
            .execute(&mut connection)
            .await
            .unwrap();
        assert_eq!(new_pokemons.len(), inserted_count);
    }

    /// Returns the number of pokemons in the test DB.
    pub async fn count_pokemons(&self) -> i64 {
        use diesel::QueryDsl;
        use diesel_async::RunQueryDsl;
        use pokedex_api::schema::pokemons::dsl::*;

        let mut connection = self.get_pooled_connection().await;
        pokemons.count().get_result(&mut connection).await.unwrap()
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        use diesel::RunQueryDsl;
        use pokedex_api::schema::pokemons::dsl::*;

        debug!("Connecting to test DB to perform cleanup");
        let db_url = get_db_url().unwrap();
        let mut connection = SyncConnection::establish(&db_url).unwrap();

        let deleted_count = diesel::delete(pokemons).execute(&mut connection).unwrap();
        trace!("Cleaned up {} pokemons from test DB", deleted_count);
    }
}
