//! [`Command`] for marking a [`Notification`] as read.

use common::operations::{By, Select, Update};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{notification, Notification},
    error::{Categorize, Kind},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for marking a [`Notification`] as read.
///
/// Marking an already read [`Notification`] changes nothing.
#[derive(Clone, Copy, Debug)]
pub struct MarkNotificationAsRead {
    /// ID of the [`Notification`] to be marked.
    pub notification_id: notification::Id,
}

impl<Db, Clk> Command<MarkNotificationAsRead> for Service<Db, Clk>
where
    Db: Database<
            Select<By<Option<Notification>, notification::Id>>,
            Ok = Option<Notification>,
            Err = Traced<database::Error>,
        > + Database<
            Update<Notification>,
            Ok = (),
            Err = Traced<database::Error>,
        >,
{
    type Ok = Notification;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        MarkNotificationAsRead { notification_id }: MarkNotificationAsRead,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let mut notification = self
            .database()
            .execute(Select(By::<Option<Notification>, _>::new(
                notification_id,
            )))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::NotificationNotExists(notification_id))
            .map_err(tracerr::wrap!())?;
        if notification.read {
            return Ok(notification);
        }

        notification.read = true;
        self.database()
            .execute(Update(notification.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        Ok(notification)
    }
}

/// Error of [`MarkNotificationAsRead`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Notification`] with the provided ID does not exist.
    #[display("`Notification(id: {_0})` does not exist")]
    NotificationNotExists(#[error(not(source))] notification::Id),
}

impl Categorize for ExecutionError {
    fn kind(&self) -> Kind {
        match self {
            Self::Db(e) => e.kind(),
            Self::NotificationNotExists(_) => Kind::NotFound,
        }
    }
}
