use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{AMOUNT_CEILING, RecordId, amount_ceiling};
use crate::{ClientError, ClientResult};

/// A field-level validation message shown next to the offending input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldIssue {
    pub field: String,
    pub message: String,
}

impl FieldIssue {
    pub fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}

/// Result of submitting a form. Invalid input is an outcome, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormOutcome<T> {
    Saved(T),
    Invalid(Vec<FieldIssue>),
}

impl<T> FormOutcome<T> {
    pub fn is_saved(&self) -> bool {
        matches!(self, Self::Saved(_))
    }

    pub fn issues(&self) -> &[FieldIssue] {
        match self {
            Self::Saved(_) => &[],
            Self::Invalid(issues) => issues,
        }
    }

    /// Collapses the outcome for callers that report through `ClientError`.
    pub fn into_result(self, command: &str) -> ClientResult<T> {
        match self {
            Self::Saved(value) => Ok(value),
            Self::Invalid(issues) => Err(ClientError::form_validation_failed(command, issues)),
        }
    }
}

#[derive(Debug, Default)]
pub struct Validator {
    issues: Vec<FieldIssue>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn require(&mut self, field: &str, value: &str, message: &str) -> &mut Self {
        self.check(!value.trim().is_empty(), field, message)
    }

    /// A money amount greater than zero.
    pub fn require_amount(
        &mut self,
        field: &str,
        value: Option<Decimal>,
        label: &str,
    ) -> &mut Self {
        self.check(
            value.is_some_and(|amount| amount > Decimal::ZERO),
            field,
            &format!("{label} must be greater than zero."),
        );
        self.check_amount_bounds(field, value, label)
    }

    /// A money amount that may be zero.
    pub fn require_amount_or_zero(
        &mut self,
        field: &str,
        value: Option<Decimal>,
        label: &str,
    ) -> &mut Self {
        self.check(
            value.is_some_and(|amount| !amount.is_sign_negative()),
            field,
            &format!("{label} must be zero or more."),
        );
        self.check_amount_bounds(field, value, label)
    }

    fn check_amount_bounds(
        &mut self,
        field: &str,
        value: Option<Decimal>,
        label: &str,
    ) -> &mut Self {
        let Some(amount) = value else {
            return self;
        };
        self.check(
            amount.normalize().scale() <= 2,
            field,
            &format!("{label} can have at most two decimal places."),
        )
        .check(
            amount < amount_ceiling(),
            field,
            &format!("{label} must be less than {AMOUNT_CEILING}."),
        )
    }

    pub fn check(&mut self, condition: bool, field: &str, message: &str) -> &mut Self {
        // Only the first failing check per field is reported.
        if !condition && !self.issues.iter().any(|issue| issue.field == field) {
            self.issues.push(FieldIssue::new(field, message));
        }
        self
    }

    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn into_issues(self) -> Vec<FieldIssue> {
        self.issues
    }
}

/// Two-phase delete: a request opens the confirmation, confirm takes it.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PendingDelete {
    target: Option<RecordId>,
}

impl PendingDelete {
    pub fn request(&mut self, id: RecordId) {
        self.target = Some(id);
    }

    pub fn pending(&self) -> Option<RecordId> {
        self.target
    }

    pub fn take(&mut self) -> Option<RecordId> {
        self.target.take()
    }

    pub fn cancel(&mut self) {
        self.target = None;
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    use super::{FormOutcome, PendingDelete, Validator};

    #[test]
    fn validator_keeps_first_message_per_field() {
        let mut validator = Validator::new();
        validator
            .require("title", "  ", "Title is required.")
            .check(false, "title", "Title is too short.")
            .require_amount("target", Some(dec!(0)), "Target")
            .require_amount("amount", Some(dec!(3)), "Amount");
        assert!(!validator.is_valid());
        let issues = validator.into_issues();
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].message, "Title is required.");
        assert_eq!(issues[1].field, "target");
    }

    #[test]
    fn amounts_are_bounded_and_limited_to_cents() {
        let mut validator = Validator::new();
        validator
            .require_amount("amount", Some(dec!(12.50)), "Amount")
            .require_amount("cents", Some(dec!(12.505)), "Cents")
            .require_amount("huge", Some(dec!(1000000000000)), "Huge")
            .require_amount("max", Some(Decimal::MAX), "Max")
            .require_amount("missing", None, "Missing")
            .require_amount_or_zero("spent", Some(dec!(0)), "Spent")
            .require_amount_or_zero("negative", Some(dec!(-1)), "Negative")
            .require_amount_or_zero("edge", Some(dec!(999999999999.99)), "Edge");

        let issues = validator.into_issues();
        let messages = issues
            .iter()
            .map(|issue| (issue.field.as_str(), issue.message.as_str()))
            .collect::<Vec<_>>();
        assert_eq!(
            messages,
            vec![
                ("cents", "Cents can have at most two decimal places."),
                ("huge", "Huge must be less than 1000000000000."),
                ("max", "Max must be less than 1000000000000."),
                ("missing", "Missing must be greater than zero."),
                ("negative", "Negative must be zero or more."),
            ]
        );
    }

    #[test]
    fn invalid_outcome_becomes_form_error() {
        let outcome: FormOutcome<()> = FormOutcome::Invalid(Vec::new());
        assert!(!outcome.is_saved());
        let result = outcome.into_result("goals add");
        assert!(result.is_err());
        if let Err(error) = result {
            assert_eq!(error.code, "form_validation_failed");
        }
    }

    #[test]
    fn pending_delete_is_consumed_once() {
        let mut pending = PendingDelete::default();
        assert_eq!(pending.take(), None);
        pending.request(4);
        assert_eq!(pending.pending(), Some(4));
        assert_eq!(pending.take(), Some(4));
        assert_eq!(pending.take(), None);
        pending.request(5);
        pending.cancel();
        assert_eq!(pending.pending(), None);
    }
}
