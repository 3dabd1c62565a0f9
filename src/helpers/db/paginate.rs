//! Pagination helper for [`diesel`] queries.
//!
//! Wraps a query so that a single round-trip returns one page of rows along with the total
//! number of rows the unpaginated query would return (via `COUNT(*) OVER ()`). Adapted from
//! the [`diesel` pagination example](https://github.com/diesel-rs/diesel/blob/2.1.x/examples/postgres/advanced-blog-cli/src/pagination.rs).

use diesel::QueryResult;
use diesel_async::methods::LoadQuery;
use diesel_async::AsyncConnection;

use crate::helpers::db::paginate::detail::InnerPaginated;

/// Adds a [`paginate`](Paginate::paginate) method to [`diesel`] queries.
pub trait Paginate: Sized {
    /// Paginates the current query.
    ///
    /// `page` is 1-based. The returned [`Paginated`] can then be loaded with
    /// [`load_with_total`](Paginated::load_with_total).
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use diesel::QueryDsl;
    /// # use pokedex_api::db::get_pool;
    /// use pokedex_api::helpers::db::paginate::Paginate;
    /// use pokedex_api::models::pokemon::PokemonRow;
    /// use pokedex_api::schema::pokemons::all_columns;
    /// use pokedex_api::schema::pokemons::dsl::*;
    ///
    /// # async fn example() -> anyhow::Result<()> {
    /// # let pool = get_pool()?;
    /// let mut connection = pool.get().await?;
    ///
    /// let (rows, total_pokemons) = pokemons
    ///     .order(pk)
    ///     .select(all_columns)
    ///     .paginate(2, 20)
    ///     .load_with_total::<PokemonRow, _>(&mut connection)
    ///     .await?;
    /// #
    /// # Ok(())
    /// # }
    /// ```
    fn paginate(self, page: i64, page_size: i64) -> Paginated<Self>;
}

impl<T> Paginate for T {
    fn paginate(self, page: i64, page_size: i64) -> Paginated<Self> {
        Paginated(InnerPaginated::new(self, page_size, page_offset(page, page_size)))
    }
}

/// A paginated query, created by [`paginate`](Paginate::paginate).
#[derive(Debug, Clone, Copy)]
pub struct Paginated<T>(InnerPaginated<T>);

impl<T> Paginated<T> {
    /// Loads one page of results.
    ///
    /// Returns the rows in the page and the total number of rows across all pages. If the
    /// page is past the end, no rows are returned and the total is reported as 0, since it
    /// comes from the rows themselves; callers needing an accurate total must count separately.
    pub async fn load_with_total<'query, 'conn, U, Conn>(
        self,
        conn: &'conn mut Conn,
    ) -> QueryResult<(Vec<U>, i64)>
    where
        U: Send,
        Conn: AsyncConnection,
        detail::RealPaginated<T>: LoadQuery<'query, Conn, (U, i64)> + 'query,
        detail::mock::MockablePaginated<T>: LoadQuery<'query, Conn, (U, i64)> + 'query,
    {
        self.0.load_with_total(conn).await
    }
}

/// Returns the offset of the first row of a 1-based `page`.
///
/// Pages below 1 are treated as page 1; the computation saturates instead of overflowing.
pub fn page_offset(page: i64, page_size: i64) -> i64 {
    page.max(1).saturating_sub(1).saturating_mul(page_size)
}

/// Returns the number of pages needed to hold `total_records` rows, i.e.
/// `ceil(total_records / page_size)`. An empty result set has 0 pages.
pub fn total_pages(total_records: i64, page_size: i64) -> i64 {
    if total_records <= 0 || page_size <= 0 {
        return 0;
    }

    total_records / page_size + i64::from(total_records % page_size != 0)
}

/// Sets a global "error producer" for [`Paginated`] queries.
///
/// While set, [`load_with_total`](Paginated::load_with_total) calls the producer first; if it
/// returns an error, that error is returned instead of running the query.
///
/// For tests **only**.
///
/// # Examples
///
/// ```no_run
/// use actix_web::http::StatusCode;
/// use actix_web::test;
/// use diesel::result::Error as DieselError;
/// # use pokedex_api::db::get_pool;
/// use pokedex_api::helpers::db::paginate::{reset_mock_error_producer, set_mock_error_producer};
///
/// # async fn example() -> pokedex_api::Result<()> {
/// # let service = test::init_service(pokedex_api::pokedex_app!(get_pool()?)).await;
/// set_mock_error_producer(Box::new(|| Some(DieselError::BrokenTransactionManager)));
///
/// let req = test::TestRequest::with_uri("/pokemons").to_request();
/// let result = test::call_service(&service, req).await;
///
/// reset_mock_error_producer();
///
/// assert_eq!(StatusCode::INTERNAL_SERVER_ERROR, result.status());
/// #
/// # Ok(())
/// # }
/// ```
pub fn set_mock_error_producer(producer: detail::mock::BoxedErrorProducer) {
    detail::mock::set_error_producer(producer);
}

/// Removes the error producer set by [`set_mock_error_producer`].
///
/// For tests **only**.
pub fn reset_mock_error_producer() {
    detail::mock::reset_error_producer();
}

mod detail {
    use diesel::backend::Backend;
    use diesel::query_builder::{AstPass, Query, QueryFragment};
    use diesel::serialize::ToSql;
    use diesel::sql_types::BigInt;
    use diesel::QueryResult;
    use diesel_async::methods::LoadQuery;
    use diesel_async::{AsyncConnection, RunQueryDsl};
    use diesel_derives::QueryId;

    use crate::helpers::db::paginate::detail::mock::MockablePaginated;

    // Picks the mockable implementation only when an error producer is installed, so regular
    // queries never go through the global lock at load time.
    #[derive(Debug, Clone, Copy)]
    pub enum InnerPaginated<T> {
        Real(RealPaginated<T>),
        Mockable(MockablePaginated<T>),
    }

    impl<T> InnerPaginated<T> {
        pub fn new(query: T, limit: i64, offset: i64) -> Self {
            let real = RealPaginated { query, limit, offset };
            if mock::has_error_producer() {
                Self::Mockable(MockablePaginated(real))
            } else {
                Self::Real(real)
            }
        }

        pub async fn load_with_total<'query, 'conn, U, Conn>(
            self,
            conn: &'conn mut Conn,
        ) -> QueryResult<(Vec<U>, i64)>
        where
            U: Send,
            Conn: AsyncConnection,
            RealPaginated<T>: LoadQuery<'query, Conn, (U, i64)> + 'query,
            MockablePaginated<T>: LoadQuery<'query, Conn, (U, i64)> + 'query,
        {
            match self {
                Self::Real(real) => real.load_with_total(conn).await,
                Self::Mockable(mockable) => mockable.load_with_total(conn).await,
            }
        }
    }

    #[derive(Debug, Clone, Copy, QueryId)]
    pub struct RealPaginated<T> {
        query: T,
        limit: i64,
        offset: i64,
    }

    impl<T> RealPaginated<T> {
        pub async fn load_with_total<'query, 'conn, U, Conn>(
            self,
            conn: &'conn mut Conn,
        ) -> QueryResult<(Vec<U>, i64)>
        where
            U: Send,
            Conn: AsyncConnection,
            Self: LoadQuery<'query, Conn, (U, i64)> + 'query,
        {
            let results: Vec<(U, i64)> = self.load(conn).await?;

            let total_records = results.as_slice().first().map(|(_, total)| *total).unwrap_or(0);
            let records = results.into_iter().map(|(record, _)| record).collect();

            Ok((records, total_records))
        }
    }

    impl<T> Query for RealPaginated<T>
    where
        T: Query,
    {
        type SqlType = (T::SqlType, BigInt);
    }

    impl<T, DB> QueryFragment<DB> for RealPaginated<T>
    where
        T: QueryFragment<DB>,
        DB: Backend,
        i64: ToSql<BigInt, DB>,
    {
        fn walk_ast<'b>(&'b self, mut out: AstPass<'_, 'b, DB>) -> QueryResult<()> {
            out.push_sql("SELECT *, COUNT(*) OVER () FROM (");
            self.query.walk_ast(out.reborrow())?;
            out.push_sql(") t LIMIT ");
            out.push_bind_param::<BigInt, _>(&self.limit)?;
            out.push_sql(" OFFSET ");
            out.push_bind_param::<BigInt, _>(&self.offset)?;
            Ok(())
        }
    }

    pub mod mock {
        use std::sync::{Mutex, MutexGuard};

        use diesel::backend::Backend;
        use diesel::query_builder::{AstPass, Query, QueryFragment, QueryId};
        use diesel::result::Error as DieselError;
        use diesel::QueryResult;
        use diesel_async::methods::LoadQuery;
        use diesel_async::AsyncConnection;

        use crate::helpers::db::paginate::detail::RealPaginated;

        #[derive(Debug, Clone, Copy)]
        pub struct MockablePaginated<T>(pub(super) RealPaginated<T>);

        impl<T> MockablePaginated<T> {
            pub async fn load_with_total<'query, 'conn, U, Conn>(
                self,
                conn: &'conn mut Conn,
            ) -> QueryResult<(Vec<U>, i64)>
            where
                U: Send,
                Conn: AsyncConnection,
                RealPaginated<T>: LoadQuery<'query, Conn, (U, i64)> + 'query,
            {
                match mocked_error() {
                    Some(mocked_error) => Err(mocked_error),
                    None => self.0.load_with_total(conn).await,
                }
            }
        }

        impl<T> QueryId for MockablePaginated<T>
        where
            RealPaginated<T>: QueryId,
        {
            type QueryId = <RealPaginated<T> as QueryId>::QueryId;
        }

        impl<T> Query for MockablePaginated<T>
        where
            RealPaginated<T>: Query,
        {
            type SqlType = <RealPaginated<T> as Query>::SqlType;
        }

        impl<T, DB> QueryFragment<DB> for MockablePaginated<T>
        where
            RealPaginated<T>: QueryFragment<DB>,
            DB: Backend,
        {
            #[cfg(not(tarpaulin_include))]
            fn walk_ast<'b>(&'b self, out: AstPass<'_, 'b, DB>) -> QueryResult<()> {
                self.0.walk_ast(out)
            }
        }

        pub type BoxedErrorProducer = Box<dyn FnMut() -> Option<DieselError> + Send + Sync>;

        static ERROR_PRODUCER: Mutex<Option<BoxedErrorProducer>> = Mutex::new(None);

        fn error_producer() -> MutexGuard<'static, Option<BoxedErrorProducer>> {
            ERROR_PRODUCER
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
        }

        pub fn has_error_producer() -> bool {
            error_producer().is_some()
        }

        pub fn set_error_producer(producer: BoxedErrorProducer) {
            error_producer().replace(producer);
        }

        pub fn reset_error_producer() {
            error_producer().take();
        }

        fn mocked_error() -> Option<DieselError> {
            error_producer().as_mut().and_then(|producer| producer())
        }
    }
}
