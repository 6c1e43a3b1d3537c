//! [`Command`] for deleting a [`Sale`].

use common::operations::{By, Delete};
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::Property;
use crate::{
    domain::{sale, Sale},
    error::{Categorize, Kind},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for deleting a [`Sale`].
///
/// The linked [`Property`] is left untouched.
#[derive(Clone, Copy, Debug)]
pub struct DeleteSale {
    /// ID of the [`Sale`] to be deleted.
    pub sale_id: sale::Id,
}

impl<Db, Clk> Command<DeleteSale> for Service<Db, Clk>
where
    Db: Database<
        Delete<By<Sale, sale::Id>>,
        Ok = bool,
        Err = Traced<database::Error>,
    >,
{
    type Ok = ();
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        DeleteSale { sale_id }: DeleteSale,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        // Avoid concurrent changes of the same `Sale`.
        let _guard = self.sale_locks.lock(sale_id).await;

        let deleted = self
            .database()
            .execute(Delete(By::<Sale, _>::new(sale_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if !deleted {
            return Err(tracerr::new!(E::SaleNotExists(sale_id)));
        }
        Ok(())
    }
}

/// Error of [`DeleteSale`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Sale`] with the provided ID does not exist.
    #[display("`Sale(id: {_0})` does not exist")]
    SaleNotExists(#[error(not(source))] sale::Id),
}

impl Categorize for ExecutionError {
    fn kind(&self) -> Kind {
        match self {
            Self::Db(e) => e.kind(),
            Self::SaleNotExists(_) => Kind::NotFound,
        }
    }
}
