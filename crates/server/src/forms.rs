//! Parsing of raw form fields.
//!
//! Empty numeric fields mean "not set"; anything else must parse, otherwise
//! the whole form is rejected with a field-level message.

use std::fmt;

use api_types::event::EventForm;
use axum::response::Response;
use engine::{EngineError, EventDetails, MoneyCents};
use tower_sessions::Session;

use crate::{ServerError, session::redirect_with};

#[derive(Debug, PartialEq, Eq)]
pub(crate) struct FieldError {
    pub field: &'static str,
    pub reason: String,
}

impl FieldError {
    fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.reason)
    }
}

/// Field-level message for validation errors raised by the engine.
fn engine_field_message(err: &EngineError) -> Option<String> {
    match err {
        EngineError::InvalidField { field, reason } => Some(format!("{field}: {reason}")),
        EngineError::InvalidAmount(reason) => Some(format!("amount: {reason}")),
        _ => None,
    }
}

/// Recover validation failures as a flash message and a redirect to `to`.
pub(crate) async fn recover(
    session: &Session,
    err: EngineError,
    to: &str,
) -> Result<Response, ServerError> {
    match engine_field_message(&err) {
        Some(message) => redirect_with(session, message, to).await,
        None => match err {
            EngineError::InvalidState(reason) => redirect_with(session, reason, to).await,
            other => Err(other.into()),
        },
    }
}

fn money(field: &'static str, raw: &str) -> Result<MoneyCents, FieldError> {
    let amount = raw
        .parse::<MoneyCents>()
        .map_err(|_| FieldError::new(field, "invalid amount"))?;
    if amount.is_negative() {
        return Err(FieldError::new(field, "must not be negative"));
    }
    Ok(amount)
}

pub(crate) fn optional_money(
    field: &'static str,
    raw: &str,
) -> Result<Option<MoneyCents>, FieldError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    money(field, raw).map(Some)
}

pub(crate) fn optional_count(field: &'static str, raw: &str) -> Result<Option<u32>, FieldError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse::<u32>()
        .map(Some)
        .map_err(|_| FieldError::new(field, "must be a whole non-negative number"))
}

/// Pair `category[]` with `amount[]`, skipping rows where either side is blank.
///
/// The rows must also add up to an amount that fits.
pub(crate) fn budget_rows(
    categories: &[String],
    amounts: &[String],
) -> Result<Vec<(String, MoneyCents)>, FieldError> {
    let rows = categories
        .iter()
        .zip(amounts)
        .map(|(category, amount)| (category.trim(), amount.trim()))
        .filter(|(category, amount)| !category.is_empty() && !amount.is_empty())
        .map(|(category, amount)| {
            money("amount", amount).map(|amount| (category.to_string(), amount))
        })
        .collect::<Result<Vec<_>, _>>()?;

    if MoneyCents::checked_sum(rows.iter().map(|(_, amount)| *amount)).is_none() {
        return Err(FieldError::new("amount", "amount too large"));
    }
    Ok(rows)
}

pub(crate) fn event_details(form: &EventForm) -> Result<EventDetails, FieldError> {
    Ok(EventDetails {
        event_name: form.event_name.clone(),
        description: Some(form.description.clone()),
        host_name: Some(form.host_name.clone()),
        date: form.date.clone(),
        time: form.time.clone(),
        venue: form.venue.clone(),
        budget: optional_money("budget", &form.budget)?,
        guest_count: optional_count("guest_count", &form.guest_count)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn empty_numbers_are_unset() {
        assert_eq!(optional_money("budget", "  "), Ok(None));
        assert_eq!(optional_count("guest_count", ""), Ok(None));
    }

    #[test]
    fn malformed_numbers_are_rejected_not_nulled() {
        assert_eq!(
            optional_money("budget", "lots"),
            Err(FieldError::new("budget", "invalid amount"))
        );
        assert_eq!(
            optional_money("budget", "-5"),
            Err(FieldError::new("budget", "must not be negative"))
        );
        assert!(optional_count("guest_count", "12.5").is_err());
        assert!(optional_count("guest_count", "-3").is_err());
        assert_eq!(optional_count("guest_count", " 30 "), Ok(Some(30)));
    }

    #[test]
    fn budget_rows_skip_blank_pairs() {
        let rows = budget_rows(
            &strings(&["Venue", " ", "Catering", "Music"]),
            &strings(&["500", "20", "300.50", ""]),
        )
        .unwrap();
        assert_eq!(
            rows,
            vec![
                ("Venue".to_string(), MoneyCents::from_units(500)),
                ("Catering".to_string(), MoneyCents::new(30_050)),
            ]
        );
    }

    #[test]
    fn budget_rows_reject_bad_amounts() {
        let err = budget_rows(&strings(&["Venue"]), &strings(&["abc"])).unwrap_err();
        assert_eq!(err.to_string(), "amount: invalid amount");
    }

    #[test]
    fn budget_rows_reject_totals_that_overflow() {
        let err = budget_rows(
            &strings(&["A", "B"]),
            &strings(&["90000000000000000", "90000000000000000"]),
        )
        .unwrap_err();
        assert_eq!(err, FieldError::new("amount", "amount too large"));
        assert!(budget_rows(&strings(&["A"]), &strings(&["90000000000000000"])).is_ok());
    }

    #[test]
    fn event_details_parses_numbers() {
        let form = EventForm {
            event_name: "Party".to_string(),
            budget: "1000".to_string(),
            guest_count: "25".to_string(),
            ..Default::default()
        };
        let details = event_details(&form).unwrap();
        assert_eq!(details.budget, Some(MoneyCents::from_units(1000)));
        assert_eq!(details.guest_count, Some(25));

        let form = EventForm {
            guest_count: "many".to_string(),
            ..Default::default()
        };
        assert_eq!(event_details(&form).unwrap_err().field, "guest_count");
    }
}
