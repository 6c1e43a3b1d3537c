//! [`Command`] for deleting all the [`Notification`]s.

use common::{
    operations::{By, Delete},
    unit::All,
};
use tracerr::Traced;

use crate::{
    domain::Notification,
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for deleting all the [`Notification`]s, read or not.
///
/// Returns the number of deleted [`Notification`]s. Deadlines still
/// upcoming are recorded again on the next [`RefreshNotifications`].
///
/// [`RefreshNotifications`]: super::RefreshNotifications
#[derive(Clone, Copy, Debug)]
pub struct ClearNotifications;

impl<Db, Clk> Command<ClearNotifications> for Service<Db, Clk>
where
    Db: Database<
        Delete<By<Notification, All>>,
        Ok = usize,
        Err = Traced<database::Error>,
    >,
{
    type Ok = usize;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        _: ClearNotifications,
    ) -> Result<Self::Ok, Self::Err> {
        self.database()
            .execute(Delete(By::<Notification, _>::new(All)))
            .await
            .map_err(tracerr::wrap!())
    }
}

/// Error of [`ClearNotifications`] [`Command`] execution.
pub type ExecutionError = database::Error;
