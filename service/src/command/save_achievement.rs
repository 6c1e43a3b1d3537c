//! [`Command`] for storing an unlocked [`Achievement`].

use common::operations::Insert;
use tracerr::Traced;

use crate::{
    domain::Achievement,
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for storing an unlocked [`Achievement`].
///
/// Returns `false` if an [`Achievement`] with the same key is stored
/// already, leaving it untouched.
#[derive(Clone, Debug)]
pub struct SaveAchievement(pub Achievement);

impl<Db, Clk> Command<SaveAchievement> for Service<Db, Clk>
where
    Db: Database<
        Insert<Achievement>,
        Ok = bool,
        Err = Traced<database::Error>,
    >,
{
    type Ok = bool;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        SaveAchievement(achievement): SaveAchievement,
    ) -> Result<Self::Ok, Self::Err> {
        self.database()
            .execute(Insert(achievement))
            .await
            .map_err(tracerr::wrap!())
    }
}

/// Error of [`SaveAchievement`] [`Command`] execution.
pub type ExecutionError = database::Error;
