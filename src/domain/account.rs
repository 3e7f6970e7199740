//! Account descriptor consumed from the account-management service.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::IngestError;

/// An exchange account as handed to the pipeline. Read-only input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    /// Exchange-specific address or credential used to query the venue.
    pub address: String,
}

/// An [`Account`] whose id parsed and whose address is present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedAccount {
    pub id: Uuid,
    pub address: String,
}

impl Account {
    pub fn new(id: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            address: address.into(),
        }
    }

    pub fn validate(&self) -> Result<ValidatedAccount, IngestError> {
        let id = Uuid::parse_str(self.id.trim()).map_err(|e| {
            IngestError::InvalidInput(format!("invalid account id {:?}: {}", self.id, e))
        })?;
        let address = self.address.trim();
        if address.is_empty() {
            return Err(IngestError::InvalidInput(format!(
                "account {} has an empty address",
                id
            )));
        }
        Ok(ValidatedAccount {
            id,
            address: address.to_string(),
        })
    }
}
