//! Earmark data types.

use chrono::{DateTime, Utc};
use kassenwart_shared::EarmarkId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// An earmarked fund.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Earmark {
    /// Earmark ID.
    pub id: EarmarkId,
    /// Unique short code.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Amount available for this purpose.
    pub budget_amount: Decimal,
    /// Display color.
    pub color: Option<String>,
    /// Free text description.
    pub description: Option<String>,
    /// Archived earmarks stay referenceable but trigger warnings.
    pub archived: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Earmark {
    /// Label used for sorting and display: `<code> <name>`.
    #[must_use]
    pub fn label(&self) -> String {
        if self.name.is_empty() {
            self.code.clone()
        } else {
            format!("{} {}", self.code, self.name)
        }
    }
}

/// Input for creating an earmark.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateEarmarkInput {
    /// Unique short code.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Amount available.
    #[serde(default)]
    pub budget_amount: Decimal,
    /// Display color.
    #[serde(default)]
    pub color: Option<String>,
    /// Description.
    #[serde(default)]
    pub description: Option<String>,
}

/// Partial update of an earmark.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateEarmarkInput {
    /// New code.
    pub code: Option<String>,
    /// New name.
    pub name: Option<String>,
    /// New budget amount.
    pub budget_amount: Option<Decimal>,
    /// New color.
    pub color: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// Archive or unarchive.
    pub archived: Option<bool>,
}
