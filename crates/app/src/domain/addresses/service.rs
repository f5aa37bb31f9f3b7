//! Addresses service.

use uuid::Uuid;

use crate::{
    database::Db,
    domain::addresses::{
        errors::AddressesServiceError,
        models::{Address, NewAddress},
        repository::PgAddressesRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgAddressesService {
    db: Db,
    repository: PgAddressesRepository,
}

impl PgAddressesService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgAddressesRepository::new(),
        }
    }

    /// Retrieve an address, enforcing ownership.
    ///
    /// # Errors
    ///
    /// Returns [`AddressesServiceError::NotFound`] when the address does not
    /// exist or belongs to another user.
    pub async fn get_address(
        &self,
        address: Uuid,
        user: Uuid,
    ) -> Result<Address, AddressesServiceError> {
        let mut tx = self.db.begin().await?;

        let address = self.repository.get_for_user(&mut tx, address, user).await?;

        tx.commit().await?;

        Ok(address)
    }

    /// The user's default delivery address, if any is set.
    ///
    /// # Errors
    ///
    /// Returns an error when the lookup fails.
    pub async fn default_address(
        &self,
        user: Uuid,
    ) -> Result<Option<Address>, AddressesServiceError> {
        let mut tx = self.db.begin().await?;

        let address = self.repository.default_for_user(&mut tx, user).await?;

        tx.commit().await?;

        Ok(address)
    }

    /// Creates a new address.
    ///
    /// # Errors
    ///
    /// Returns [`AddressesServiceError::AlreadyExists`] on a duplicate UUID.
    pub async fn create_address(
        &self,
        address: NewAddress,
    ) -> Result<Address, AddressesServiceError> {
        let mut tx = self.db.begin().await?;

        let created = self.repository.create_address(&mut tx, &address).await?;

        tx.commit().await?;

        Ok(created)
    }
}
