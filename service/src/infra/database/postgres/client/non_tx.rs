//! [`NonTx`] client definitions.

use tokio_postgres::{types::ToSql, Row, ToStatement};
use tracerr::Traced;

use crate::infra::database::{
    self,
    postgres::{self, connection, Connection},
};

/// Non-transactional Postgres database client.
///
/// Checks out a [`Connection`] from its [`connection::Pool`] per operation,
/// so closed connections are discarded by the pool on recycling.
#[derive(Clone, Debug)]
pub struct NonTx {
    /// [`connection::Pool`] to check out [`Connection`]s from.
    pub(crate) pool: connection::Pool,
}

impl NonTx {
    /// Creates a new [`NonTx`] client from the provided [`connection::Pool`].
    #[must_use]
    pub(crate) fn from_pool(pool: connection::Pool) -> Self {
        Self { pool }
    }

    /// Checks out a [`Connection`] for a single operation.
    pub(crate) async fn connection(
        &self,
    ) -> Result<connection::NonTx, Traced<database::Error>> {
        self.pool
            .get()
            .await
            .map_err(tracerr::from_and_wrap!(=> postgres::Error))
            .map_err(tracerr::map_from)
    }
}

impl Connection for NonTx {
    async fn query<T>(
        &self,
        stmt: &T,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<Vec<Row>, Traced<database::Error>>
    where
        T: ToStatement + ?Sized,
    {
        self.connection()
            .await
            .map_err(tracerr::wrap!())?
            .query(stmt, params)
            .await
            .map_err(tracerr::wrap!())
    }

    async fn query_opt<T>(
        &self,
        stmt: &T,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<Option<Row>, Traced<database::Error>>
    where
        T: ToStatement + ?Sized,
    {
        self.connection()
            .await
            .map_err(tracerr::wrap!())?
            .query_opt(stmt, params)
            .await
            .map_err(tracerr::wrap!())
    }

    async fn exec<T>(
        &self,
        stmt: &T,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<u64, Traced<database::Error>>
    where
        T: ToStatement + ?Sized,
    {
        self.connection()
            .await
            .map_err(tracerr::wrap!())?
            .exec(stmt, params)
            .await
            .map_err(tracerr::wrap!())
    }
}

#[cfg(test)]
mod spec {
    use deadpool_postgres::{Config, Runtime};
    use tokio_postgres::NoTls;

    use crate::infra::database::postgres::Connection as _;

    use super::NonTx;

    #[tokio::test]
    async fn keeps_no_connection_between_operations() {
        let pool = Config {
            host: Some("127.0.0.1".to_owned()),
            port: Some(1),
            user: Some("postgres".to_owned()),
            dbname: Some("postgres".to_owned()),
            ..Config::default()
        }
        .create_pool(Some(Runtime::Tokio1), NoTls)
        .unwrap();
        let client = NonTx::from_pool(pool);

        assert!(client.exec("SELECT 1", &[]).await.is_err());
        assert!(client.query("SELECT 1", &[]).await.is_err());
        assert_eq!(client.pool.status().size, 0);
    }
}
