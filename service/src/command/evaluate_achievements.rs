//! [`Command`] for unlocking newly reached [`Achievement`]s.

use std::collections::HashSet;

use common::{
    operations::{By, Select},
    unit::All,
};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{Achievement, Goal, Sale},
    infra::{database, Database},
    lifecycle, Clock, Service,
};

use super::{save_achievement, Command, SaveAchievement};

/// [`Command`] for unlocking newly reached [`Achievement`]s.
///
/// Every rule is evaluated against the whole history, so executing this
/// [`Command`] repeatedly unlocks nothing new.
#[derive(Clone, Copy, Debug)]
pub struct EvaluateAchievements;

impl<Db, Clk> Command<EvaluateAchievements> for Service<Db, Clk>
where
    Db: Database<
            Select<By<Vec<Sale>, All>>,
            Ok = Vec<Sale>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<Goal>, All>>,
            Ok = Vec<Goal>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<Achievement>, All>>,
            Ok = Vec<Achievement>,
            Err = Traced<database::Error>,
        >,
    Clk: Clock,
    Self: Command<
        SaveAchievement,
        Ok = bool,
        Err = Traced<save_achievement::ExecutionError>,
    >,
{
    type Ok = Vec<Achievement>;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        _: EvaluateAchievements,
    ) -> Result<Self::Ok, Self::Err> {
        let sales = self
            .database()
            .execute(Select(By::<Vec<Sale>, _>::new(All)))
            .await
            .map_err(tracerr::wrap!())?;
        let goals = self
            .database()
            .execute(Select(By::<Vec<Goal>, _>::new(All)))
            .await
            .map_err(tracerr::wrap!())?;
        let unlocked = self
            .database()
            .execute(Select(By::<Vec<Achievement>, _>::new(All)))
            .await
            .map_err(tracerr::wrap!())?
            .into_iter()
            .map(|a| a.key)
            .collect::<HashSet<_>>();

        let mut newly = vec![];
        for key in lifecycle::evaluate(&sales, &goals, &unlocked) {
            let achievement =
                Achievement::unlock(key, self.clock().now().coerce());
            let saved = self
                .execute(SaveAchievement(achievement.clone()))
                .await
                .map_err(tracerr::wrap!())?;
            if saved {
                log::info!(
                    "`Achievement(key: {key})` unlocked: {}",
                    achievement.name,
                );
                newly.push(achievement);
            }
        }
        Ok(newly)
    }
}

/// Error of [`EvaluateAchievements`] [`Command`] execution.
pub type ExecutionError = database::Error;
