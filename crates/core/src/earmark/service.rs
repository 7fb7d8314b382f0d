//! Earmark validation and construction.

use chrono::{DateTime, Utc};
use kassenwart_shared::EarmarkId;
use rust_decimal::Decimal;

use super::error::EarmarkError;
use super::types::{CreateEarmarkInput, Earmark, UpdateEarmarkInput};
use crate::amount::AmountCalculator;

/// Earmark service for business logic.
pub struct EarmarkService;

impl EarmarkService {
    /// Builds a new earmark.
    ///
    /// `code_taken` reports whether another earmark already uses a code.
    ///
    /// # Errors
    ///
    /// Returns `EmptyCode`, `DuplicateCode` or `NegativeAmount`.
    pub fn create<F>(
        id: EarmarkId,
        input: CreateEarmarkInput,
        now: DateTime<Utc>,
        code_taken: F,
    ) -> Result<Earmark, EarmarkError>
    where
        F: Fn(&str) -> bool,
    {
        let code = Self::normalize_code(&input.code)?;
        if code_taken(&code) {
            return Err(EarmarkError::DuplicateCode(code));
        }

        let earmark = Earmark {
            id,
            code,
            name: input.name.trim().to_string(),
            budget_amount: input.budget_amount,
            color: input.color,
            description: input.description,
            archived: false,
            created_at: now,
            updated_at: now,
        };
        Self::validate(&earmark)?;
        Ok(earmark)
    }

    /// Applies a partial update.
    ///
    /// `code_taken` must not report the earmark's own current code.
    ///
    /// # Errors
    ///
    /// Returns `EmptyCode`, `DuplicateCode` or `NegativeAmount`.
    pub fn apply_update<F>(
        existing: &Earmark,
        input: UpdateEarmarkInput,
        now: DateTime<Utc>,
        code_taken: F,
    ) -> Result<Earmark, EarmarkError>
    where
        F: Fn(&str) -> bool,
    {
        let mut earmark = existing.clone();
        if let Some(code) = input.code {
            let code = Self::normalize_code(&code)?;
            if code != existing.code && code_taken(&code) {
                return Err(EarmarkError::DuplicateCode(code));
            }
            earmark.code = code;
        }
        if let Some(name) = input.name {
            earmark.name = name.trim().to_string();
        }
        if let Some(amount) = input.budget_amount {
            earmark.budget_amount = amount;
        }
        if input.color.is_some() {
            earmark.color = input.color;
        }
        if input.description.is_some() {
            earmark.description = input.description;
        }
        if let Some(archived) = input.archived {
            earmark.archived = archived;
        }
        earmark.updated_at = now;

        Self::validate(&earmark)?;
        Ok(earmark)
    }

    fn normalize_code(code: &str) -> Result<String, EarmarkError> {
        let code = code.trim();
        if code.is_empty() {
            return Err(EarmarkError::EmptyCode);
        }
        Ok(code.to_string())
    }

    fn validate(earmark: &Earmark) -> Result<(), EarmarkError> {
        if earmark.budget_amount < Decimal::ZERO {
            return Err(EarmarkError::NegativeAmount);
        }
        if !AmountCalculator::in_range(earmark.budget_amount)
            || !AmountCalculator::is_cents(earmark.budget_amount)
        {
            return Err(EarmarkError::AmountOutOfRange(earmark.budget_amount));
        }
        Ok(())
    }
}
