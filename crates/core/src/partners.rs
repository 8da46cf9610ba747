//! Partners

use serde::{Deserialize, Serialize};

/// Customer the sale order is created for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partner {
    /// ERP partner identifier
    pub id: i64,

    /// Display name
    pub name: String,

    /// Contact email
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Contact phone
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    /// Tax or identity document number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vat: Option<String>,
}

impl Partner {
    /// Create a partner with only an id and a name.
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            email: None,
            phone: None,
            vat: None,
        }
    }
}
