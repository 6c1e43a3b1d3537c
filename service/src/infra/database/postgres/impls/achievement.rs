//! [`Achievement`]-related [`Database`] implementations.

use common::{
    operations::{By, Insert, Select},
    unit::All,
};
use tracerr::Traced;

use crate::{
    domain::{achievement, Achievement},
    infra::{
        database::{
            self,
            postgres::{self, Connection},
            Postgres,
        },
        Database,
    },
};

impl<C> Database<Select<By<Vec<Achievement>, All>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Achievement>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Select<By<Vec<Achievement>, All>>,
    ) -> Result<Self::Ok, Self::Err> {
        const SQL: &str = "\
            SELECT key, name, description, icon, unlocked_at \
            FROM achievements \
            ORDER BY unlocked_at ASC, key ASC";
        self.query(SQL, &[])
            .await
            .map_err(tracerr::wrap!())?
            .into_iter()
            .map(|row| {
                let key = row
                    .get::<_, String>("key")
                    .parse::<achievement::Key>()
                    .map_err(|_| {
                        tracerr::new!(database::Error::from(
                            postgres::Error::MalformedRow("achievements"),
                        ))
                    })?;
                Ok(Achievement {
                    key,
                    name: row.get("name"),
                    description: row.get("description"),
                    icon: row.get("icon"),
                    unlocked_at: row.get("unlocked_at"),
                })
            })
            .collect()
    }
}

impl<C> Database<Insert<Achievement>> for Postgres<C>
where
    C: Connection,
{
    type Ok = bool;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(achievement): Insert<Achievement>,
    ) -> Result<Self::Ok, Self::Err> {
        let Achievement {
            key,
            name,
            description,
            icon,
            unlocked_at,
        } = achievement;

        const SQL: &str = "\
            INSERT INTO achievements (\
                key, name, description, icon, unlocked_at\
            ) VALUES (\
                $1::VARCHAR, $2::VARCHAR, $3::VARCHAR, $4::VARCHAR, \
                $5::TIMESTAMPTZ\
            ) \
            ON CONFLICT (key) DO NOTHING";
        self.exec(
            SQL,
            &[&key.to_string(), &name, &description, &icon, &unlocked_at],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(|inserted| inserted > 0)
    }
}
