//! Customer use-case service.
//!
//! # Responsibility
//! - Provide the list/create/update/delete entry points for core callers.
//! - Run identity validation before any mutating persistence call.
//! - Classify failures into the stable [`ServiceError`] taxonomy.
//!
//! # Invariants
//! - Invalid input never reaches the repository's write methods.
//! - Create rejects an identity number that is already stored.
//! - Every repository failure not classified here becomes
//!   `ServiceError::Persistence` carrying the original message.
//! - Update gaps (missing row, identity collision) are governed by
//!   [`UpdatePolicy`], never decided implicitly.

use crate::model::customer::{Customer, CustomerId, CustomerInput, CustomerValidationError};
use crate::repo::customer_repo::{CustomerRepository, RepoError};
use crate::validation::cpf;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Service error for customer use-cases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// Input field is blank.
    InvalidInput(CustomerValidationError),
    /// Identity number fails the CPF format or checksum.
    InvalidIdentity,
    /// Identity number already belongs to a stored customer.
    DuplicateIdentity,
    /// Target customer does not exist.
    NotFound(CustomerId),
    /// Storage failure; message passed through verbatim.
    Persistence(String),
}

impl ServiceError {
    /// Stable machine-readable category.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::InvalidIdentity => "INVALID_IDENTITY",
            Self::DuplicateIdentity => "DUPLICATE_IDENTITY",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Persistence(_) => "PERSISTENCE_ERROR",
        }
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput(err) => write!(f, "{err}"),
            Self::InvalidIdentity => write!(f, "invalid identity number"),
            Self::DuplicateIdentity => write!(f, "identity number already registered"),
            Self::NotFound(id) => write!(f, "customer not found: {id}"),
            Self::Persistence(message) => write!(f, "{message}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidInput(err) => Some(err),
            _ => None,
        }
    }
}

impl From<CustomerValidationError> for ServiceError {
    fn from(value: CustomerValidationError) -> Self {
        Self::InvalidInput(value)
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::DuplicateIdentity(message) => Self::Persistence(message),
            RepoError::Db(err) => Self::Persistence(err.to_string()),
        }
    }
}

impl From<crate::db::PoolError> for ServiceError {
    fn from(value: crate::db::PoolError) -> Self {
        Self::Persistence(value.to_string())
    }
}

/// Update behavior for the two cases create guards against and update,
/// historically, did not.
///
/// The default reproduces the historical behavior: no existence check and
/// no identity uniqueness pre-check.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdatePolicy {
    /// Fail with `NotFound` when no row matches the id.
    pub require_existing: bool,
    /// Fail with `DuplicateIdentity` when another customer holds the
    /// identity number, and map storage constraint rejections likewise.
    pub enforce_unique_identity: bool,
}

/// Customer service facade over a repository implementation.
pub struct CustomerService<R: CustomerRepository> {
    repo: R,
    update_policy: UpdatePolicy,
}

impl<R: CustomerRepository> CustomerService<R> {
    /// Creates a service with the default [`UpdatePolicy`].
    pub fn new(repo: R) -> Self {
        Self::with_update_policy(repo, UpdatePolicy::default())
    }

    pub fn with_update_policy(repo: R, update_policy: UpdatePolicy) -> Self {
        Self {
            repo,
            update_policy,
        }
    }

    /// Lists every stored customer in storage order.
    pub fn list_customers(&self) -> ServiceResult<Vec<Customer>> {
        Ok(self.repo.list_all()?)
    }

    /// Registers a new customer and returns its storage id.
    ///
    /// # Errors
    /// - `InvalidIdentity` when the CPF is blank or fails the checksum.
    /// - `InvalidInput` when another field is blank.
    /// - `DuplicateIdentity` when the identity number is already stored,
    ///   whether caught by the pre-check or by the storage constraint.
    pub fn create_customer(&self, input: &CustomerInput) -> ServiceResult<CustomerId> {
        validate_input(input)?;

        if self
            .repo
            .find_by_identity_number(&input.identity_number)?
            .is_some()
        {
            warn!("event=customer_create module=service status=rejected error_code=duplicate_identity");
            return Err(ServiceError::DuplicateIdentity);
        }

        let id = self.repo.insert(input).map_err(|err| match err {
            RepoError::DuplicateIdentity(_) => ServiceError::DuplicateIdentity,
            other => ServiceError::from(other),
        })?;

        info!("event=customer_create module=service status=ok customer_id={id}");
        Ok(id)
    }

    /// Replaces every field of the customer keyed by `id`.
    ///
    /// With the default policy this succeeds even if no row matched.
    pub fn update_customer(&self, id: CustomerId, input: &CustomerInput) -> ServiceResult<()> {
        validate_input(input)?;

        if self.update_policy.enforce_unique_identity {
            if let Some(holder) = self.repo.find_by_identity_number(&input.identity_number)? {
                if holder.id != id {
                    warn!(
                        "event=customer_update module=service status=rejected customer_id={id} error_code=duplicate_identity"
                    );
                    return Err(ServiceError::DuplicateIdentity);
                }
            }
        }

        let changed = self.repo.update_by_id(id, input).map_err(|err| match err {
            RepoError::DuplicateIdentity(_) if self.update_policy.enforce_unique_identity => {
                ServiceError::DuplicateIdentity
            }
            other => ServiceError::from(other),
        })?;

        if changed == 0 {
            if self.update_policy.require_existing {
                return Err(ServiceError::NotFound(id));
            }
            warn!("event=customer_update module=service status=ok customer_id={id} rows_affected=0");
            return Ok(());
        }

        info!("event=customer_update module=service status=ok customer_id={id} rows_affected={changed}");
        Ok(())
    }

    /// Hard-deletes the customer keyed by `id`.
    ///
    /// # Errors
    /// - `NotFound` when no row matched.
    pub fn delete_customer(&self, id: CustomerId) -> ServiceResult<()> {
        let changed = self.repo.delete_by_id(id)?;
        if changed == 0 {
            return Err(ServiceError::NotFound(id));
        }

        info!("event=customer_delete module=service status=ok customer_id={id}");
        Ok(())
    }
}

/// The CPF check runs first; the remaining fields are checked for presence.
fn validate_input(input: &CustomerInput) -> ServiceResult<()> {
    if !cpf::is_valid(&input.identity_number) {
        return Err(ServiceError::InvalidIdentity);
    }
    input.validate()?;
    Ok(())
}
