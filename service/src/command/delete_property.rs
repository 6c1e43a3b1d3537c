//! [`Command`] for deleting a [`Property`].

use common::operations::{By, Delete};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{property, Property},
    error::{Categorize, Kind},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for deleting a [`Property`].
///
/// [`Sale`]s referring the deleted [`Property`] are left untouched.
///
/// [`Sale`]: crate::domain::Sale
#[derive(Clone, Copy, Debug)]
pub struct DeleteProperty {
    /// ID of the [`Property`] to be deleted.
    pub property_id: property::Id,
}

impl<Db, Clk> Command<DeleteProperty> for Service<Db, Clk>
where
    Db: Database<
        Delete<By<Property, property::Id>>,
        Ok = bool,
        Err = Traced<database::Error>,
    >,
{
    type Ok = ();
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        DeleteProperty { property_id }: DeleteProperty,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        // Avoid concurrent changes of the same `Property`.
        let _guard = self.property_locks.lock(property_id).await;

        let deleted = self
            .database()
            .execute(Delete(By::<Property, _>::new(property_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if !deleted {
            return Err(tracerr::new!(E::PropertyNotExists(property_id)));
        }
        Ok(())
    }
}

/// Error of [`DeleteProperty`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Property`] with the provided ID does not exist.
    #[display("`Property(id: {_0})` does not exist")]
    PropertyNotExists(#[error(not(source))] property::Id),
}

impl Categorize for ExecutionError {
    fn kind(&self) -> Kind {
        match self {
            Self::Db(e) => e.kind(),
            Self::PropertyNotExists(_) => Kind::NotFound,
        }
    }
}
