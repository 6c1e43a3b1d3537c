//! [`Notification`]-related [`Database`] implementations.

use common::{
    operations::{By, Delete, Insert, Select, Update},
    unit::All,
};
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{notification, property::Deadline, Notification},
    infra::{
        database::{
            self,
            postgres::{self, Connection},
            Postgres,
        },
        Database,
    },
};

/// Columns of the `notifications` table, in the order read by [`from_row()`].
const COLUMNS: &str = "\
    id, property_id, property_name, kind, due_on, \
    message, urgent, is_read, created_at";

/// Stored code of the provided [`Deadline`].
const fn kind_code(kind: Deadline) -> i16 {
    match kind {
        Deadline::ContractExpiration => 1,
        Deadline::ReinsRenewal => 2,
    }
}

/// Reads a [`Notification`] from the provided [`Row`].
fn from_row(row: &Row) -> Result<Notification, Traced<database::Error>> {
    let kind = match row.get::<_, i16>("kind") {
        1 => Deadline::ContractExpiration,
        2 => Deadline::ReinsRenewal,
        _ => {
            return Err(tracerr::new!(database::Error::from(
                postgres::Error::MalformedRow("notifications"),
            )));
        }
    };

    Ok(Notification {
        id: row.get("id"),
        property_id: row.get("property_id"),
        property_name: row.get("property_name"),
        kind,
        due_on: row.get("due_on"),
        message: row.get("message"),
        urgent: row.get("urgent"),
        read: row.get("is_read"),
        created_at: row.get("created_at"),
    })
}

impl<C> Database<Select<By<Option<Notification>, notification::Id>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Notification>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Notification>, notification::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM notifications \
             WHERE id = $1::UUID"
        );
        self.query_opt(sql.as_str(), &[&id])
            .await
            .map_err(tracerr::wrap!())?
            .as_ref()
            .map(from_row)
            .transpose()
    }
}

impl<C> Database<Select<By<Vec<Notification>, All>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Notification>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Select<By<Vec<Notification>, All>>,
    ) -> Result<Self::Ok, Self::Err> {
        let sql = format!(
            "SELECT {COLUMNS} \
             FROM notifications \
             ORDER BY created_at DESC, due_on ASC, id ASC"
        );
        self.query(sql.as_str(), &[])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(from_row)
            .collect()
    }
}

impl<C> Database<Insert<Notification>> for Postgres<C>
where
    C: Connection,
{
    type Ok = bool;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(notification): Insert<Notification>,
    ) -> Result<Self::Ok, Self::Err> {
        let Notification {
            id,
            property_id,
            property_name,
            kind,
            due_on,
            message,
            urgent,
            read,
            created_at,
        } = notification;

        const SQL: &str = "\
            INSERT INTO notifications (\
                id, property_id, property_name, kind, due_on, \
                message, urgent, is_read, created_at\
            ) VALUES (\
                $1::UUID, $2::UUID, $3::VARCHAR, $4::INT2, $5::DATE, \
                $6::TEXT, $7::BOOLEAN, $8::BOOLEAN, $9::TIMESTAMPTZ\
            ) \
            ON CONFLICT (property_id, kind, due_on) DO NOTHING";
        self.exec(
            SQL,
            &[
                &id,
                &property_id,
                &property_name,
                &kind_code(kind),
                &due_on,
                &message,
                &urgent,
                &read,
                &created_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(|inserted| inserted > 0)
    }
}

impl<C> Database<Update<Notification>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(notification): Update<Notification>,
    ) -> Result<Self::Ok, Self::Err> {
        const SQL: &str = "\
            UPDATE notifications \
            SET is_read = $2::BOOLEAN \
            WHERE id = $1::UUID";
        _ = self
            .exec(SQL, &[&notification.id, &notification.read])
            .await
            .map_err(tracerr::wrap!())?;
        Ok(())
    }
}

impl<C> Database<Delete<By<Notification, All>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = usize;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Delete<By<Notification, All>>,
    ) -> Result<Self::Ok, Self::Err> {
        const SQL: &str = "DELETE FROM notifications";
        let deleted = self.exec(SQL, &[]).await.map_err(tracerr::wrap!())?;
        Ok(usize::try_from(deleted).unwrap_or(usize::MAX))
    }
}
