//! [`Query`] collection related to the multiple [`Notification`]s.

use common::{operations::By, unit::All};

use crate::domain::Notification;
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries all the [`Notification`]s, the most recently recorded first.
pub type List = DatabaseQuery<By<Vec<Notification>, All>>;
