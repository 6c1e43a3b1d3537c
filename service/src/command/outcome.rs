//! [`Outcome`] of mutating a [`Sale`].

use tracerr::Traced;
use tracing as log;

#[cfg(doc)]
use crate::domain::Property;
use crate::{
    domain::{
        property::{self, Status, Transition},
        Achievement, Sale,
    },
    lifecycle, Service,
};

use super::{
    cascade_property_status, evaluate_achievements, CascadePropertyStatus,
    Command, EvaluateAchievements,
};

/// Result of a successful [`Sale`] mutation along with its side effects.
#[derive(Debug)]
pub struct Outcome {
    /// Mutated [`Sale`], as stored.
    pub sale: Sale,

    /// Result of cascading the [`Sale`] collection onto its linked
    /// [`Property`].
    pub cascade: Cascade,

    /// Result of evaluating [`Achievement`]s afterwards.
    pub achievements: Evaluation,
}

/// Result of cascading a [`Sale`] collection onto its linked [`Property`].
#[derive(Debug)]
pub enum Cascade {
    /// No cascade was required.
    NotRequired,

    /// [`Property`] already had the required [`Status`].
    Unchanged {
        /// ID of the linked [`Property`].
        property_id: property::Id,

        /// [`Status`] of the linked [`Property`].
        status: Status,
    },

    /// [`Property`] was moved to the required [`Status`].
    Applied {
        /// ID of the linked [`Property`].
        property_id: property::Id,

        /// Applied [`Transition`].
        transition: Transition,
    },

    /// Cascade failed, while the [`Sale`] mutation itself is persisted.
    Failed {
        /// ID of the linked [`Property`].
        property_id: property::Id,

        /// Error of the cascade.
        error: Traced<cascade_property_status::ExecutionError>,
    },
}

/// Result of evaluating [`Achievement`]s after a [`Sale`] mutation.
#[derive(Debug)]
pub enum Evaluation {
    /// Evaluation was not performed.
    Skipped,

    /// Evaluation succeeded, unlocking the provided [`Achievement`]s.
    Unlocked(Vec<Achievement>),

    /// Evaluation failed, while the [`Sale`] mutation itself is persisted.
    Failed(Traced<evaluate_achievements::ExecutionError>),
}

impl<Db, Clk> Service<Db, Clk> {
    /// Cascades the collection of the provided [`Sale`] onto its linked
    /// [`Property`], if any.
    pub(crate) async fn cascade(&self, sale: &Sale) -> Cascade
    where
        Self: Command<
            CascadePropertyStatus,
            Ok = Option<Transition>,
            Err = Traced<cascade_property_status::ExecutionError>,
        >,
    {
        let Some((property_id, target)) = lifecycle::cascade_target(sale)
        else {
            return Cascade::NotRequired;
        };

        match self
            .execute(CascadePropertyStatus {
                property_id,
                target,
            })
            .await
        {
            Ok(Some(transition)) => Cascade::Applied {
                property_id,
                transition,
            },
            Ok(None) => Cascade::Unchanged {
                property_id,
                status: target,
            },
            Err(error) => {
                log::warn!(
                    "`Sale(id: {})` is saved, but cascading onto \
                     `Property(id: {property_id})` failed: {error}",
                    sale.id,
                );
                Cascade::Failed { property_id, error }
            }
        }
    }

    /// Evaluates [`Achievement`]s, never failing the caller.
    pub(crate) async fn evaluate(&self) -> Evaluation
    where
        Self: Command<
            EvaluateAchievements,
            Ok = Vec<Achievement>,
            Err = Traced<evaluate_achievements::ExecutionError>,
        >,
    {
        match self.execute(EvaluateAchievements).await {
            Ok(unlocked) => Evaluation::Unlocked(unlocked),
            Err(e) => {
                log::warn!("`Achievement`s evaluation failed: {e}");
                Evaluation::Failed(e)
            }
        }
    }
}
