//! [`Command`] for creating a new [`Property`].

use common::operations::Insert;
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        property::{self, Status},
        Property,
    },
    error::{Categorize, Kind},
    infra::{database, Database},
    Clock, Service,
};

use super::Command;

/// [`Command`] for creating a new [`Property`].
#[derive(Clone, Debug)]
pub struct CreateProperty {
    /// [`property::Draft`] of a new [`Property`].
    pub draft: property::Draft,
}

impl<Db, Clk> Command<CreateProperty> for Service<Db, Clk>
where
    Db: Database<Insert<Property>, Ok = (), Err = Traced<database::Error>>,
    Clk: Clock,
{
    type Ok = Property;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        CreateProperty { draft }: CreateProperty,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        if draft.status == Status::Completed {
            return Err(tracerr::new!(E::CompletedStatus));
        }

        let property = Property::new(
            property::Id::new(),
            draft,
            self.clock().now().coerce(),
        );
        self.database()
            .execute(Insert(property.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        Ok(property)
    }
}

/// Error of [`CreateProperty`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Property`] cannot be created as [`Status::Completed`].
    #[display("`Property` cannot be created as `completed`")]
    CompletedStatus,

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),
}

impl Categorize for ExecutionError {
    fn kind(&self) -> Kind {
        match self {
            Self::CompletedStatus => Kind::Validation,
            Self::Db(e) => e.kind(),
        }
    }
}
