//! Deadline [`Alert`] read model definition.

use common::Date;
use serde::Serialize;

use crate::domain::{
    notification::{self, Subject},
    property::{self, Deadline, Status},
    Notification, Property,
};

/// Upcoming contract-related deadline of a [`Property`].
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    /// ID of the [`Property`] the deadline belongs to.
    pub property_id: property::Id,

    /// Name of the [`Property`] the deadline belongs to.
    pub property_name: property::Name,

    /// Kind of the deadline.
    pub kind: Deadline,

    /// [`Date`] the deadline is due on.
    pub due_on: Date,

    /// Number of days left until the deadline.
    pub days_remaining: i64,

    /// Human-readable message of this [`Alert`].
    pub message: String,

    /// Indicator whether the deadline requires immediate attention.
    pub urgent: bool,
}

impl Alert {
    /// Collects [`Alert`]s of the provided [`Property`]s whose deadlines fall
    /// within `notification_days` from `today` (both ends inclusive).
    ///
    /// [`Status::Completed`] [`Property`]s and overdue deadlines are skipped.
    /// [`Alert`]s are ordered by the days remaining, then by the
    /// [`Property`] ID, then by the [`Deadline`] kind.
    #[must_use]
    pub fn upcoming<'p>(
        properties: impl IntoIterator<Item = &'p Property>,
        today: Date,
        notification_days: u16,
    ) -> Vec<Self> {
        let horizon = i64::from(notification_days);
        let urgency = (horizon / 2).max(1);

        let mut alerts = properties
            .into_iter()
            .filter(|p| p.status != Status::Completed)
            .flat_map(|p| {
                p.deadlines().filter_map(move |(kind, due_on)| {
                    let days_remaining = today.days_until(due_on);
                    (0..=horizon).contains(&days_remaining).then(|| Self {
                        property_id: p.id,
                        property_name: p.name.clone(),
                        kind,
                        due_on,
                        days_remaining,
                        message: message(&p.name, kind, days_remaining),
                        urgent: days_remaining <= urgency,
                    })
                })
            })
            .collect::<Vec<_>>();
        alerts.sort_by_key(|a| (a.days_remaining, a.property_id, a.kind));
        alerts
    }
}

impl Alert {
    /// Returns the [`Subject`] of this [`Alert`].
    #[must_use]
    pub const fn subject(&self) -> Subject {
        Subject {
            property_id: self.property_id,
            kind: self.kind,
            due_on: self.due_on,
        }
    }

    /// Records this [`Alert`] as a new unread [`Notification`].
    #[must_use]
    pub fn into_notification(
        self,
        created_at: notification::CreationDateTime,
    ) -> Notification {
        let Self {
            property_id,
            property_name,
            kind,
            due_on,
            days_remaining: _,
            message,
            urgent,
        } = self;

        Notification {
            id: notification::Id::new(),
            property_id,
            property_name,
            kind,
            due_on,
            message,
            urgent,
            read: false,
            created_at,
        }
    }
}

/// Formats a human-readable [`Alert`] message.
fn message(name: &property::Name, kind: Deadline, days: i64) -> String {
    match days {
        0 => format!("{name}: {kind} is due today"),
        1 => format!("{name}: {kind} is due tomorrow"),
        n => format!("{name}: {kind} is due in {n} days"),
    }
}

#[cfg(test)]
mod spec {
    use common::{Date, DateTime};

    use crate::{
        domain::property::{Deadline, Mode, Status},
        read::fixture::property,
    };

    use super::Alert;

    fn date(s: &str) -> Date {
        s.parse().unwrap()
    }

    #[test]
    fn orders_by_days_then_property_then_kind() {
        let today = date("2024-06-01");

        let mut a = property("A", Mode::Exclusive, Status::Active, 0);
        a.contract_expires_on = Some(date("2024-06-11"));
        a.reins_renewal_on = Some(date("2024-06-04"));
        let mut b = property("B", Mode::General, Status::Contracted, 0);
        b.contract_expires_on = Some(date("2024-06-04"));
        b.reins_renewal_on = Some(date("2024-06-04"));

        let alerts = Alert::upcoming([&a, &b], today, 30);

        assert_eq!(alerts.len(), 4);
        assert!(alerts
            .windows(2)
            .all(|w| w[0].days_remaining <= w[1].days_remaining));
        assert_eq!(alerts[3].property_id, a.id);
        assert_eq!(alerts[3].days_remaining, 10);

        let (first, second) =
            if a.id < b.id { (a.id, b.id) } else { (b.id, a.id) };
        assert_eq!(alerts[0].property_id, first);
        assert_eq!(alerts[2].property_id, second);
        let b_alerts = alerts
            .iter()
            .filter(|x| x.property_id == b.id)
            .map(|x| x.kind)
            .collect::<Vec<_>>();
        assert_eq!(
            b_alerts,
            [Deadline::ContractExpiration, Deadline::ReinsRenewal],
        );
    }

    #[test]
    fn window_and_urgency() {
        let today = date("2024-06-01");

        let mut p = property("A", Mode::Exclusive, Status::Active, 0);
        p.contract_expires_on = Some(date("2024-06-08"));
        p.reins_renewal_on = Some(date("2024-06-09"));
        let mut overdue = property("B", Mode::Exclusive, Status::Active, 0);
        overdue.contract_expires_on = Some(date("2024-05-31"));
        let mut completed = property("C", Mode::Seller, Status::Completed, 0);
        completed.contract_expires_on = Some(date("2024-06-02"));

        let alerts = Alert::upcoming([&p, &overdue, &completed], today, 7);

        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].kind, Deadline::ContractExpiration);
        assert_eq!(alerts[0].days_remaining, 7);
        assert!(!alerts[0].urgent);

        p.contract_expires_on = Some(date("2024-06-04"));
        let alerts = Alert::upcoming([&p], today, 7);
        assert!(alerts[0].urgent);
        assert_eq!(
            alerts[0].message,
            "A: contract expiration is due in 3 days",
        );
    }

    #[test]
    fn zero_day_window_is_urgent_today() {
        let today = date("2024-06-01");
        let mut p = property("A", Mode::Exclusive, Status::Negotiating, 0);
        p.reins_renewal_on = Some(today);

        let alerts = Alert::upcoming([&p], today, 0);

        assert_eq!(alerts.len(), 1);
        assert!(alerts[0].urgent);
        assert_eq!(alerts[0].message, "A: REINS renewal is due today");
    }

    #[test]
    fn records_unread_notification_of_same_subject() {
        let today = date("2024-06-01");
        let mut p = property("A", Mode::Exclusive, Status::Active, 0);
        p.contract_expires_on = Some(date("2024-06-02"));
        let alert = Alert::upcoming([&p], today, 30).remove(0);
        let subject = alert.subject();

        let notification =
            alert.into_notification(DateTime::at_midnight(today).coerce());

        assert_eq!(notification.subject(), subject);
        assert_eq!(notification.property_name, p.name);
        assert_eq!(
            notification.message,
            "A: contract expiration is due tomorrow",
        );
        assert!(notification.urgent);
        assert!(!notification.read);
    }
}
