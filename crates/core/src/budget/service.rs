//! Budget validation and construction.

use chrono::{DateTime, Utc};
use kassenwart_shared::BudgetId;
use rust_decimal::Decimal;

use super::error::BudgetError;
use super::types::{Budget, CreateBudgetInput, UpdateBudgetInput};
use crate::amount::AmountCalculator;

const MIN_YEAR: i32 = 1900;
const MAX_YEAR: i32 = 9999;

/// Budget service for business logic.
pub struct BudgetService;

impl BudgetService {
    /// Builds a new budget after validating the input.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the year, amount or date range is invalid.
    pub fn create(
        id: BudgetId,
        input: CreateBudgetInput,
        now: DateTime<Utc>,
    ) -> Result<Budget, BudgetError> {
        let budget = Budget {
            id,
            year: input.year,
            planned_amount: input.planned_amount,
            name: input.name,
            category_name: input.category_name,
            project: input.project,
            start_date: input.start_date,
            end_date: input.end_date,
            enforce_time_range: input.enforce_time_range,
            color: input.color,
            archived: false,
            created_at: now,
            updated_at: now,
        };
        Self::validate(&budget)?;
        Ok(budget)
    }

    /// Applies a partial update and returns the new state.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the resulting budget is invalid.
    pub fn apply_update(
        existing: &Budget,
        input: UpdateBudgetInput,
        now: DateTime<Utc>,
    ) -> Result<Budget, BudgetError> {
        let mut budget = existing.clone();
        if let Some(year) = input.year {
            budget.year = year;
        }
        if let Some(amount) = input.planned_amount {
            budget.planned_amount = amount;
        }
        if input.name.is_some() {
            budget.name = input.name;
        }
        if input.category_name.is_some() {
            budget.category_name = input.category_name;
        }
        if input.project.is_some() {
            budget.project = input.project;
        }
        if input.clear_date_range {
            budget.start_date = None;
            budget.end_date = None;
        }
        if input.start_date.is_some() {
            budget.start_date = input.start_date;
        }
        if input.end_date.is_some() {
            budget.end_date = input.end_date;
        }
        if let Some(enforce) = input.enforce_time_range {
            budget.enforce_time_range = enforce;
        }
        if input.color.is_some() {
            budget.color = input.color;
        }
        if let Some(archived) = input.archived {
            budget.archived = archived;
        }
        budget.updated_at = now;

        Self::validate(&budget)?;
        Ok(budget)
    }

    /// Validates a budget's invariants.
    ///
    /// # Errors
    ///
    /// Returns `BudgetError::InvalidYear`, `NegativeAmount`, `AmountOutOfRange`,
    /// `InvalidDateRange` or `MissingDateRange`.
    pub fn validate(budget: &Budget) -> Result<(), BudgetError> {
        if !(MIN_YEAR..=MAX_YEAR).contains(&budget.year) {
            return Err(BudgetError::InvalidYear(budget.year));
        }

        if budget.planned_amount < Decimal::ZERO {
            return Err(BudgetError::NegativeAmount);
        }
        if !AmountCalculator::in_range(budget.planned_amount)
            || !AmountCalculator::is_cents(budget.planned_amount)
        {
            return Err(BudgetError::AmountOutOfRange(budget.planned_amount));
        }

        if let (Some(start), Some(end)) = (budget.start_date, budget.end_date)
            && start > end
        {
            return Err(BudgetError::InvalidDateRange { start, end });
        }

        if budget.enforce_time_range && (budget.start_date.is_none() || budget.end_date.is_none()) {
            return Err(BudgetError::MissingDateRange);
        }

        Ok(())
    }
}
