//! [`Goal`]-related [`Database`] implementations.

use common::{
    operations::{By, Insert, Select},
    unit::All,
    Money, Period,
};
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{goal, Goal},
    infra::{
        database::{
            self,
            postgres::{self, Connection},
            Postgres,
        },
        Database,
    },
};

/// Reads a [`Goal`] from the provided [`Row`].
fn from_row(row: &Row) -> Result<Goal, Traced<database::Error>> {
    let malformed = || {
        tracerr::new!(database::Error::from(postgres::Error::MalformedRow(
            "goals"
        )))
    };

    let period = row
        .get::<_, String>("period")
        .parse::<Period>()
        .map_err(|_| malformed())?;
    let target_amount = goal::TargetAmount::new(row.get::<_, Money>(
        "target_amount",
    ))
    .ok_or_else(malformed)?;
    let target_count = u32::try_from(row.get::<_, i32>("target_count"))
        .map_err(|_| malformed())?;

    Ok(Goal {
        id: row.get("id"),
        period,
        target_amount,
        target_count,
        created_at: row.get("created_at"),
    })
}

impl<C> Database<Select<By<Option<Goal>, Period>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Goal>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Goal>, Period>>,
    ) -> Result<Self::Ok, Self::Err> {
        let period = by.into_inner().to_string();

        const SQL: &str = "\
            SELECT id, period, target_amount, target_count, created_at \
            FROM goals \
            WHERE period = $1::VARCHAR";
        self.query_opt(SQL, &[&period])
            .await
            .map_err(tracerr::wrap!())?
            .as_ref()
            .map(from_row)
            .transpose()
    }
}

impl<C> Database<Select<By<Vec<Goal>, All>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Goal>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Select<By<Vec<Goal>, All>>,
    ) -> Result<Self::Ok, Self::Err> {
        const SQL: &str = "\
            SELECT id, period, target_amount, target_count, created_at \
            FROM goals";
        let mut goals = self
            .query(SQL, &[])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(from_row)
            .collect::<Result<Vec<_>, _>>()?;
        // Textual order differs from the calendar one for years.
        goals.sort_by_key(|g| g.period);
        Ok(goals)
    }
}

impl<C> Database<Insert<Goal>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(goal): Insert<Goal>,
    ) -> Result<Self::Ok, Self::Err> {
        let Goal {
            id,
            period,
            target_amount,
            target_count,
            created_at,
        } = goal;
        let target_count = i32::try_from(target_count).unwrap_or(i32::MAX);

        const SQL: &str = "\
            INSERT INTO goals (\
                period, id, kind, target_amount, target_count, created_at\
            ) VALUES (\
                $1::VARCHAR, $2::UUID, $3::INT2, $4::NUMERIC, $5::INT4, \
                $6::TIMESTAMPTZ\
            ) \
            ON CONFLICT (period) DO UPDATE \
            SET id = EXCLUDED.id, \
                kind = EXCLUDED.kind, \
                target_amount = EXCLUDED.target_amount, \
                target_count = EXCLUDED.target_count, \
                created_at = EXCLUDED.created_at";
        self.exec(
            SQL,
            &[
                &period.to_string(),
                &id,
                &period.granularity(),
                &Money::from(target_amount),
                &target_count,
                &created_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}
