//! Ring request payload and its validation

use crate::domain::shared::error::{DomainError, Result};
use crate::domain::shared::value_objects::PublicId;
use serde::{Deserialize, Serialize};

const USER_ID: &str = "user_id";

/// Target identity as it arrives on the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserIdField {
    Number(serde_json::Number),
    Text(String),
}

/// Payload of a ring request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CallRequest {
    #[serde(default)]
    pub user_id: Option<UserIdField>,
}

impl CallRequest {
    pub fn new(user_id: UserIdField) -> Self {
        Self {
            user_id: Some(user_id),
        }
    }

    /// Check the payload without touching any collaborator
    pub fn validate(&self) -> Result<()> {
        match &self.user_id {
            None => Err(missing()),
            Some(UserIdField::Text(text)) if text.is_empty() => Err(missing()),
            Some(UserIdField::Text(text)) => {
                if text.bytes().all(|b| b.is_ascii_digit()) {
                    Ok(())
                } else {
                    Err(malformed())
                }
            }
            // Only zero counts as absent; the digit rule applies to text alone
            Some(UserIdField::Number(number)) if number.as_f64() == Some(0.0) => Err(missing()),
            Some(UserIdField::Number(_)) => Ok(()),
        }
    }

    /// Integer form of the target identity, whichever way it was sent
    pub fn public_id(&self) -> Result<PublicId> {
        match &self.user_id {
            Some(UserIdField::Text(text)) => text.parse(),
            Some(UserIdField::Number(number)) => number.as_u64().map(PublicId::new).ok_or_else(|| {
                DomainError::Internal(format!("{} {} is not a positive integer", USER_ID, number))
            }),
            None => Err(missing()),
        }
    }
}

fn missing() -> DomainError {
    DomainError::MissingField(format!("{} (public id of the target user)", USER_ID))
}

fn malformed() -> DomainError {
    DomainError::MalformedField(format!("{} given as text must consist of digits only", USER_ID))
}
