//! Consistency checks over the itinerary aggregate.
//!
//! Checks are pure and fail-fast: the first violated invariant is returned, in the
//! fixed order date range → day count → payment plan.

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

use crate::models::itinerary::{
    CreateItineraryRequest, Day, Itinerary, PaymentPlan, UpdateItineraryRequest,
};

/// Absolute tolerance when comparing currency sums.
pub const AMOUNT_TOLERANCE: f64 = 0.01;

// ────────────────────────────────────────────────────────────────────────────
// Error types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationError {
    #[error("end date must be after start date")]
    InvalidDateRange,

    #[error("number of days doesn't match date range: expected {expected} days, got {actual}")]
    InvalidDayCount { expected: i64, actual: usize },

    #[error("invalid payment plan: {0}")]
    InvalidPaymentPlan(PaymentPlanError),
}

#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum PaymentPlanError {
    #[error("total amount must be positive")]
    NonPositiveTotal,

    #[error("at least one installment is required")]
    NoInstallments,

    #[error("installment amounts ({actual:.2}) don't match total amount ({expected:.2})")]
    AmountMismatch { expected: f64, actual: f64 },
}

impl From<PaymentPlanError> for ValidationError {
    fn from(e: PaymentPlanError) -> Self {
        ValidationError::InvalidPaymentPlan(e)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Individual checks
// ────────────────────────────────────────────────────────────────────────────

/// Number of calendar days from `start` to `end`, counting both endpoints.
pub fn inclusive_day_span(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days() + 1
}

/// A zero-length trip (`end == start`) is rejected as well.
pub fn check_date_range(start: NaiveDate, end: NaiveDate) -> Result<(), ValidationError> {
    if end <= start {
        return Err(ValidationError::InvalidDateRange);
    }
    Ok(())
}

/// Only the count is checked. Ordering and duplicate day numbers are a storage concern.
pub fn check_day_count(
    days: &[Day],
    start: NaiveDate,
    end: NaiveDate,
) -> Result<(), ValidationError> {
    let expected = inclusive_day_span(start, end);
    if days.len() as i64 != expected {
        return Err(ValidationError::InvalidDayCount {
            expected,
            actual: days.len(),
        });
    }
    Ok(())
}

pub fn check_payment_plan(plan: &PaymentPlan) -> Result<(), ValidationError> {
    if plan.amount_due <= 0.0 {
        return Err(PaymentPlanError::NonPositiveTotal.into());
    }

    if plan.installments.is_empty() {
        return Err(PaymentPlanError::NoInstallments.into());
    }

    // Inclusive bounds on the sum itself; an exact one-cent difference passes.
    let sum: f64 = plan.installments.iter().map(|i| i.amount).sum();
    let (low, high) = (plan.amount_due - AMOUNT_TOLERANCE, plan.amount_due + AMOUNT_TOLERANCE);
    if sum < low || sum > high {
        return Err(PaymentPlanError::AmountMismatch {
            expected: plan.amount_due,
            actual: sum,
        }
        .into());
    }

    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// Aggregate entry points
// ────────────────────────────────────────────────────────────────────────────

fn validate_fields(
    start: NaiveDate,
    end: NaiveDate,
    days: &[Day],
    plan: &PaymentPlan,
) -> Result<(), ValidationError> {
    check_date_range(start, end)?;
    check_day_count(days, start, end)?;
    check_payment_plan(plan)
}

/// Validates a stored or fully materialized itinerary against every invariant.
pub fn validate(itinerary: &Itinerary) -> Result<(), ValidationError> {
    validate_fields(
        itinerary.start_date,
        itinerary.end_date,
        &itinerary.days,
        &itinerary.payment_plan,
    )
}

/// Validates the create shape before any identity is assigned.
pub fn validate_create(req: &CreateItineraryRequest) -> Result<(), ValidationError> {
    validate_fields(req.start_date, req.end_date, &req.days, &req.payment_plan)
}

/// Validates `merged`, the stored itinerary after `update` has been applied.
///
/// The day count is re-checked only when the update supplies a start date, end date
/// or day list; the date range and payment plan are always re-checked.
pub fn validate_update(
    merged: &Itinerary,
    update: &UpdateItineraryRequest,
) -> Result<(), ValidationError> {
    if update.touches_schedule() {
        return validate(merged);
    }
    check_date_range(merged.start_date, merged.end_date)?;
    check_payment_plan(&merged.payment_plan)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
