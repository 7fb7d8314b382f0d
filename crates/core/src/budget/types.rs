//! Budget data types.

use chrono::{DateTime, NaiveDate, Utc};
use kassenwart_shared::BudgetId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A budget record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Budget {
    /// Budget ID.
    pub id: BudgetId,
    /// Budget year.
    pub year: i32,
    /// Planned amount.
    pub planned_amount: Decimal,
    /// Optional display name.
    pub name: Option<String>,
    /// Optional category label.
    pub category_name: Option<String>,
    /// Optional project label.
    pub project: Option<String>,
    /// First day vouchers may be dated on, if enforced.
    pub start_date: Option<NaiveDate>,
    /// Last day vouchers may be dated on, if enforced.
    pub end_date: Option<NaiveDate>,
    /// Whether the date range is enforced for allocating vouchers.
    pub enforce_time_range: bool,
    /// Display color.
    pub color: Option<String>,
    /// Archived budgets are hidden from overviews but stay referenceable.
    pub archived: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Budget {
    /// Name, else category, else project, else `Budget <year>`.
    #[must_use]
    pub fn label(&self) -> String {
        [&self.name, &self.category_name, &self.project]
            .into_iter()
            .flatten()
            .map(|s| s.trim())
            .find(|s| !s.is_empty())
            .map_or_else(|| format!("Budget {}", self.year), ToString::to_string)
    }

    /// Whether a voucher dated `date` may allocate to this budget.
    #[must_use]
    pub fn accepts_date(&self, date: NaiveDate) -> bool {
        if !self.enforce_time_range {
            return true;
        }
        let after_start = self.start_date.is_none_or(|start| date >= start);
        let before_end = self.end_date.is_none_or(|end| date <= end);
        after_start && before_end
    }
}

/// Input for creating a budget.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBudgetInput {
    /// Budget year.
    pub year: i32,
    /// Planned amount.
    pub planned_amount: Decimal,
    /// Optional display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Optional category label.
    #[serde(default)]
    pub category_name: Option<String>,
    /// Optional project label.
    #[serde(default)]
    pub project: Option<String>,
    /// Range start.
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    /// Range end.
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    /// Whether the range is enforced.
    #[serde(default)]
    pub enforce_time_range: bool,
    /// Display color.
    #[serde(default)]
    pub color: Option<String>,
}

/// Partial update of a budget. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateBudgetInput {
    /// New year.
    pub year: Option<i32>,
    /// New planned amount.
    pub planned_amount: Option<Decimal>,
    /// New display name.
    pub name: Option<String>,
    /// New category label.
    pub category_name: Option<String>,
    /// New project label.
    pub project: Option<String>,
    /// New range start.
    pub start_date: Option<NaiveDate>,
    /// New range end.
    pub end_date: Option<NaiveDate>,
    /// Removes both range bounds (applied before new bounds).
    #[serde(default)]
    pub clear_date_range: bool,
    /// New enforcement flag.
    pub enforce_time_range: Option<bool>,
    /// New color.
    pub color: Option<String>,
    /// Archive or unarchive.
    pub archived: Option<bool>,
}
