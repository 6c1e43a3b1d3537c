//! [`Query`] collection related to the multiple [`Goal`]s.

use common::{operations::By, unit::All};

use crate::domain::Goal;
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries all the [`Goal`]s ordered by their periods.
pub type List = DatabaseQuery<By<Vec<Goal>, All>>;
