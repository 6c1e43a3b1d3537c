//! [`Command`] for updating an existing [`Property`].

use common::operations::{By, Select, Update};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        property::{self, Transition},
        Property,
    },
    error::{Categorize, Kind},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for updating an existing [`Property`].
#[derive(Clone, Debug)]
pub struct UpdateProperty {
    /// ID of the [`Property`] to be updated.
    pub property_id: property::Id,

    /// [`property::Patch`] to apply.
    pub patch: property::Patch,
}

impl<Db, Clk> Command<UpdateProperty> for Service<Db, Clk>
where
    Db: Database<
            Select<By<Option<Property>, property::Id>>,
            Ok = Option<Property>,
            Err = Traced<database::Error>,
        > + Database<Update<Property>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = Property;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: UpdateProperty,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdateProperty { property_id, patch } = cmd;

        // Avoid concurrent changes of the same `Property`.
        let _guard = self.property_locks.lock(property_id).await;

        let mut property = self
            .database()
            .execute(Select(By::<Option<Property>, _>::new(property_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::PropertyNotExists(property_id))
            .map_err(tracerr::wrap!())?;

        property
            .apply(patch)
            .map_err(E::ForbiddenTransition)
            .map_err(tracerr::wrap!())?;

        self.database()
            .execute(Update(property.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        Ok(property)
    }
}

/// Error of [`UpdateProperty`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// Status of a [`Property`] cannot be changed manually this way.
    #[display("`Property` status cannot be changed manually: {_0}")]
    ForbiddenTransition(#[error(not(source))] Transition),

    /// [`Property`] with the provided ID does not exist.
    #[display("`Property(id: {_0})` does not exist")]
    PropertyNotExists(#[error(not(source))] property::Id),
}

impl Categorize for ExecutionError {
    fn kind(&self) -> Kind {
        match self {
            Self::Db(e) => e.kind(),
            Self::ForbiddenTransition(_) => Kind::InconsistentState,
            Self::PropertyNotExists(_) => Kind::NotFound,
        }
    }
}
