use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

/// A named record with an optional description and a store-assigned id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: u64,
    pub name: String,
    pub description: Option<String>,
}

/// Payload accepted by create and update.
///
/// `id` is tolerated on the wire so clients can send back an item they fetched,
/// but the store never reads it: the id is issued on create and taken from the
/// path on update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ItemCandidate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,

    #[serde(default)]
    #[validate(
        length(min = 2, max = 50, message = "name must be between 2 and 50 characters"),
        custom(function = "validate_not_blank")
    )]
    pub name: String,

    #[serde(default)]
    pub description: Option<String>,
}

impl ItemCandidate {
    pub fn new(name: impl Into<String>, description: Option<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            description,
        }
    }

    pub(crate) fn into_item(self, id: u64) -> Item {
        Item {
            id,
            name: self.name,
            description: self.description,
        }
    }
}

fn validate_not_blank(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("name cannot be blank".into());
        return Err(err);
    }
    Ok(())
}

/// Flatten validator output into one message per field
pub fn field_messages(errors: &ValidationErrors) -> HashMap<String, String> {
    errors
        .field_errors()
        .iter()
        .map(|(field, errs)| {
            let message = errs
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string())
                })
                .collect::<Vec<_>>()
                .join("; ");
            (field.to_string(), message)
        })
        .collect()
}
