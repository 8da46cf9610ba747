//! Operator session

use std::{
    fmt::{Debug, Display, Formatter, Result as FmtResult},
    num::ParseIntError,
    sync::Arc,
};

use thiserror::Error;

use crate::storage::{KeyValueStorage, StorageError};

/// Storage key written at login.
pub const EMPLOYEE_ID_KEY: &str = "employee_id";

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("employee id not found, log in again")]
    NotLoggedIn,

    #[error("stored employee id {value:?} is not a number")]
    InvalidEmployeeId {
        value: String,
        #[source]
        source: ParseIntError,
    },

    #[error("failed to access session storage: {0}")]
    Storage(#[from] StorageError),
}

/// ERP employee the operator is logged in as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EmployeeId(i64);

impl EmployeeId {
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    pub const fn get(self) -> i64 {
        self.0
    }
}

impl Display for EmployeeId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        Display::fmt(&self.0, f)
    }
}

/// Session context scoping catalog and order requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    employee_id: EmployeeId,
}

impl SessionContext {
    pub const fn new(employee_id: EmployeeId) -> Self {
        Self { employee_id }
    }

    pub const fn employee_id(&self) -> EmployeeId {
        self.employee_id
    }

    /// Load the session saved at login.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotLoggedIn`] when no employee id is stored.
    pub fn load(storage: &dyn KeyValueStorage) -> Result<Self, SessionError> {
        let stored = storage
            .get(EMPLOYEE_ID_KEY)?
            .ok_or(SessionError::NotLoggedIn)?;

        let stored = stored.trim();

        if stored.is_empty() {
            return Err(SessionError::NotLoggedIn);
        }

        let id = stored
            .parse::<i64>()
            .map_err(|source| SessionError::InvalidEmployeeId {
                value: stored.to_string(),
                source,
            })?;

        Ok(Self::new(EmployeeId::new(id)))
    }

    /// Persist the session so later runs pick it up.
    ///
    /// # Errors
    ///
    /// Returns an error when writing to storage fails.
    pub fn save(&self, storage: &dyn KeyValueStorage) -> Result<(), SessionError> {
        storage.set(EMPLOYEE_ID_KEY, &self.employee_id.to_string())?;

        Ok(())
    }

    /// Forget the stored session.
    ///
    /// # Errors
    ///
    /// Returns an error when removing the key fails.
    pub fn clear(storage: &dyn KeyValueStorage) -> Result<(), SessionError> {
        storage.remove(EMPLOYEE_ID_KEY)?;

        Ok(())
    }
}

/// Source of the current session, consulted whenever a request needs one.
pub trait SessionSource: Send + Sync {
    /// The session in effect right now.
    ///
    /// # Errors
    ///
    /// Returns an error when no usable session exists.
    fn current(&self) -> Result<SessionContext, SessionError>;
}

impl SessionSource for SessionContext {
    fn current(&self) -> Result<SessionContext, SessionError> {
        Ok(self.clone())
    }
}

/// Reads the session from storage on every call, so a login in the same process is seen
/// immediately.
#[derive(Clone)]
pub struct StoredSession {
    storage: Arc<dyn KeyValueStorage>,
}

impl Debug for StoredSession {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("StoredSession").finish_non_exhaustive()
    }
}

impl StoredSession {
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self { storage }
    }
}

impl SessionSource for StoredSession {
    fn current(&self) -> Result<SessionContext, SessionError> {
        SessionContext::load(self.storage.as_ref())
    }
}
