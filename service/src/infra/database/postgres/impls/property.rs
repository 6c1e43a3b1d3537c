//! [`Property`]-related [`Database`] implementations.

use common::{
    operations::{By, Delete, Insert, Select, Update},
    unit::All,
};
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{property, Property},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
};

/// Columns of the `properties` table, in the order read by [`from_row()`].
const COLUMNS: &str = "\
    id, name, mode, status, \
    contract_started_on, contract_expires_on, reins_renewal_on, \
    valuation, created_at";

/// Reads a [`Property`] from the provided [`Row`].
fn from_row(row: &Row) -> Property {
    Property {
        id: row.get("id"),
        name: row.get("name"),
        mode: row.get("mode"),
        status: row.get("status"),
        contract_started_on: row.get("contract_started_on"),
        contract_expires_on: row.get("contract_expires_on"),
        reins_renewal_on: row.get("reins_renewal_on"),
        valuation: row.get("valuation"),
        created_at: row.get("created_at"),
    }
}

impl<C> Database<Select<By<Option<Property>, property::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Property>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Property>, property::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM properties \
             WHERE id = $1::UUID"
        );
        Ok(self
            .query_opt(sql.as_str(), &[&id])
            .await
            .map_err(tracerr::wrap!())?
            .as_ref()
            .map(from_row))
    }
}

impl<C> Database<Select<By<Vec<Property>, All>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Property>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Select<By<Vec<Property>, All>>,
    ) -> Result<Self::Ok, Self::Err> {
        let sql = format!(
            "SELECT {COLUMNS} \
             FROM properties \
             ORDER BY created_at ASC, id ASC"
        );
        Ok(self
            .query(sql.as_str(), &[])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(from_row)
            .collect())
    }
}

impl<C> Database<Insert<Property>> for Postgres<C>
where
    C: Connection,
    Self: Database<Update<Property>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(property): Insert<Property>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(property))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Property>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(property): Update<Property>,
    ) -> Result<Self::Ok, Self::Err> {
        let Property {
            id,
            name,
            mode,
            status,
            contract_started_on,
            contract_expires_on,
            reins_renewal_on,
            valuation,
            created_at,
        } = property;

        const SQL: &str = "\
            INSERT INTO properties (\
                id, name, mode, status, \
                contract_started_on, contract_expires_on, reins_renewal_on, \
                valuation, created_at\
            ) VALUES (\
                $1::UUID, $2::VARCHAR, $3::INT2, $4::INT2, \
                $5::DATE, $6::DATE, $7::DATE, \
                $8::NUMERIC, $9::TIMESTAMPTZ\
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET name = EXCLUDED.name, \
                mode = EXCLUDED.mode, \
                status = EXCLUDED.status, \
                contract_started_on = EXCLUDED.contract_started_on, \
                contract_expires_on = EXCLUDED.contract_expires_on, \
                reins_renewal_on = EXCLUDED.reins_renewal_on, \
                valuation = EXCLUDED.valuation";
        self.exec(
            SQL,
            &[
                &id,
                &name,
                &mode,
                &status,
                &contract_started_on,
                &contract_expires_on,
                &reins_renewal_on,
                &valuation,
                &created_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Delete<By<Property, property::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = bool;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Property, property::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();

        const SQL: &str = "\
            DELETE FROM properties \
            WHERE id = $1::UUID";
        self.exec(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(|affected| affected > 0)
    }
}
