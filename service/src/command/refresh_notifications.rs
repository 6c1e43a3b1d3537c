//! [`Command`] for recording [`Notification`]s about upcoming deadlines.

use std::collections::HashSet;

use common::{
    operations::{By, Insert, Select},
    unit::All,
};
use tracerr::Traced;

use crate::{
    domain::{Notification, Property},
    infra::{database, Database},
    read::Alert,
    Clock, Service,
};

use super::Command;

/// [`Command`] for recording a [`Notification`] about every upcoming
/// [`Property`] deadline not recorded yet.
///
/// Returns the newly recorded [`Notification`]s only.
#[derive(Clone, Copy, Debug, Default)]
pub struct RefreshNotifications {
    /// Number of days ahead to look for deadlines.
    ///
    /// [`Config::notification_days`] is used if [`None`].
    ///
    /// [`Config::notification_days`]: crate::Config::notification_days
    pub notification_days: Option<u16>,
}

impl<Db, Clk> Command<RefreshNotifications> for Service<Db, Clk>
where
    Db: Database<
            Select<By<Vec<Property>, All>>,
            Ok = Vec<Property>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<Notification>, All>>,
            Ok = Vec<Notification>,
            Err = Traced<database::Error>,
        > + Database<
            Insert<Notification>,
            Ok = bool,
            Err = Traced<database::Error>,
        >,
    Clk: Clock,
{
    type Ok = Vec<Notification>;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: RefreshNotifications,
    ) -> Result<Self::Ok, Self::Err> {
        let days = cmd
            .notification_days
            .unwrap_or(self.config().notification_days);

        let properties = self
            .database()
            .execute(Select(By::<Vec<Property>, _>::new(All)))
            .await
            .map_err(tracerr::wrap!())?;
        let recorded = self
            .database()
            .execute(Select(By::<Vec<Notification>, _>::new(All)))
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(Notification::subject)
            .collect::<HashSet<_>>();

        let alerts = Alert::upcoming(&properties, self.clock().today(), days);
        let now = self.clock().now();
        let mut fresh = vec![];
        for alert in alerts {
            if recorded.contains(&alert.subject()) {
                continue;
            }
            let notification = alert.into_notification(now.coerce());
            // Concurrent refreshes may record the same subject first.
            let inserted = self
                .database()
                .execute(Insert(notification.clone()))
                .await
                .map_err(tracerr::wrap!())?;
            if inserted {
                fresh.push(notification);
            }
        }
        Ok(fresh)
    }
}

/// Error of [`RefreshNotifications`] [`Command`] execution.
pub type ExecutionError = database::Error;
