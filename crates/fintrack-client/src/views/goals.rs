use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::goal::GOAL_COLORS;
use crate::models::{AMOUNT_CEILING, Goal, RecordId, Session, palette_color, saturating_total};
use crate::store::records::Change;
use crate::store::RecordStore;
use crate::views::form::{FormOutcome, Validator};
use crate::views::list::RecordList;
use crate::{ClientError, ClientResult};

#[derive(Debug, Clone, Default)]
pub struct GoalDraft {
    pub title: String,
    pub target_amount: Option<Decimal>,
    /// Defaults to zero.
    pub current_amount: Option<Decimal>,
    pub deadline: Option<NaiveDate>,
    pub category: String,
}

/// Sums over goals that are not completed yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GoalTotals {
    pub target: Decimal,
    pub current: Decimal,
    pub remaining: Decimal,
}

pub struct GoalsView<'a, S> {
    list: RecordList<'a, S, Goal>,
}

impl<'a, S: RecordStore> GoalsView<'a, S> {
    pub fn load(store: &'a S, session: &Session) -> ClientResult<Self> {
        Ok(Self {
            list: RecordList::load(store, session)?,
        })
    }

    pub fn records(&self) -> &[Goal] {
        self.list.records()
    }

    pub fn active(&self) -> Vec<&Goal> {
        self.list.records().iter().filter(|goal| !goal.completed).collect()
    }

    pub fn completed(&self) -> Vec<&Goal> {
        self.list.records().iter().filter(|goal| goal.completed).collect()
    }

    pub fn totals(&self) -> GoalTotals {
        let active = self.active();
        let target = saturating_total(active.iter().map(|goal| goal.target_amount));
        let current = saturating_total(active.iter().map(|goal| goal.current_amount));
        GoalTotals {
            target,
            current,
            remaining: target.saturating_sub(current),
        }
    }

    fn validate(draft: &GoalDraft) -> Validator {
        let mut validator = Validator::new();
        validator
            .require("title", &draft.title, "Title is required.")
            .require_amount("target_amount", draft.target_amount, "Target amount")
            .check(draft.deadline.is_some(), "deadline", "Deadline is required.")
            .require("category", &draft.category, "Category is required.");
        if draft.current_amount.is_some() {
            validator.require_amount_or_zero(
                "current_amount",
                draft.current_amount,
                "Current amount",
            );
        }
        validator
    }

    pub fn create(&mut self, draft: &GoalDraft) -> ClientResult<FormOutcome<Goal>> {
        let validator = Self::validate(draft);
        let (Some(target_amount), Some(deadline)) = (draft.target_amount, draft.deadline) else {
            return Ok(FormOutcome::Invalid(validator.into_issues()));
        };
        if !validator.is_valid() {
            return Ok(FormOutcome::Invalid(validator.into_issues()));
        }

        let current_amount = draft.current_amount.unwrap_or(Decimal::ZERO);
        let goal = Goal {
            id: self.list.next_id(),
            title: draft.title.trim().to_string(),
            target_amount,
            current_amount,
            deadline,
            category: draft.category.trim().to_string(),
            color_tag: palette_color(&GOAL_COLORS, self.list.records().len()),
            completed: current_amount >= target_amount,
        };
        self.list.commit(Change::Insert(goal.clone()))?;
        Ok(FormOutcome::Saved(goal))
    }

    /// Edits the goal fields. Color is kept and completion stays sticky.
    pub fn update(&mut self, id: RecordId, draft: &GoalDraft) -> ClientResult<FormOutcome<Goal>> {
        let Some(existing) = self.list.find(id).cloned() else {
            return Err(ClientError::record_not_found("goals", id));
        };
        let validator = Self::validate(draft);
        let (Some(target_amount), Some(deadline)) = (draft.target_amount, draft.deadline) else {
            return Ok(FormOutcome::Invalid(validator.into_issues()));
        };
        if !validator.is_valid() {
            return Ok(FormOutcome::Invalid(validator.into_issues()));
        }

        let current_amount = draft.current_amount.unwrap_or(Decimal::ZERO);
        let goal = Goal {
            title: draft.title.trim().to_string(),
            target_amount,
            current_amount,
            deadline,
            category: draft.category.trim().to_string(),
            completed: existing.completed || current_amount >= target_amount,
            ..existing
        };
        self.list.commit(Change::Update(goal.clone()))?;
        Ok(FormOutcome::Saved(goal))
    }

    pub fn contribute(
        &mut self,
        id: RecordId,
        amount: Option<Decimal>,
    ) -> ClientResult<FormOutcome<Goal>> {
        let Some(mut goal) = self.list.find(id).cloned() else {
            return Err(ClientError::record_not_found("goals", id));
        };
        let mut validator = Validator::new();
        validator.require_amount("amount", amount, "Contribution");
        let Some(amount) = amount.filter(|_| validator.is_valid()) else {
            return Ok(FormOutcome::Invalid(validator.into_issues()));
        };

        if !goal.contribute(amount) {
            validator.check(
                false,
                "amount",
                &format!("Contribution would take the saved total to {AMOUNT_CEILING} or more."),
            );
            return Ok(FormOutcome::Invalid(validator.into_issues()));
        }
        self.list.commit(Change::Update(goal.clone()))?;
        if goal.completed {
            tracing::debug!(goal_id = goal.id, "goal reached");
        }
        Ok(FormOutcome::Saved(goal))
    }

    pub fn request_delete(&mut self, id: RecordId) {
        self.list.request_delete(id);
    }

    pub fn pending_delete(&self) -> Option<RecordId> {
        self.list.pending_delete()
    }

    pub fn cancel_delete(&mut self) {
        self.list.cancel_delete();
    }

    pub fn confirm_delete(&mut self) -> ClientResult<bool> {
        self.list.confirm_delete()
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    use super::{GoalDraft, GoalsView};
    use crate::models::Session;
    use crate::store::feed::ChangeFeed;
    use crate::store::kv::MemoryKeyValueStore;
    use crate::store::local::LocalRecordStore;
    use crate::views::form::FormOutcome;

    fn session() -> Session {
        Session {
            user_id: 3,
            display_name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
        }
    }

    fn draft(title: &str, target: Decimal) -> GoalDraft {
        GoalDraft {
            title: title.to_string(),
            target_amount: Some(target),
            current_amount: None,
            deadline: NaiveDate::from_ymd_opt(2027, 6, 30),
            category: "Vacation".to_string(),
        }
    }

    #[test]
    fn missing_fields_are_reported_together() {
        let store = LocalRecordStore::new(MemoryKeyValueStore::new(), ChangeFeed::default());
        let Ok(mut view) = GoalsView::load(&store, &session()) else {
            return;
        };
        let outcome = view.create(&GoalDraft::default());
        assert!(outcome.is_ok());
        if let Ok(outcome) = outcome {
            let fields: Vec<&str> = outcome.issues().iter().map(|i| i.field.as_str()).collect();
            assert_eq!(fields, vec!["title", "target_amount", "deadline", "category"]);
        }
        assert!(view.records().is_empty());
    }

    #[test]
    fn contributions_complete_goal_once_and_move_it_out_of_totals() {
        let store = LocalRecordStore::new(MemoryKeyValueStore::new(), ChangeFeed::default());
        let Ok(mut view) = GoalsView::load(&store, &session()) else {
            return;
        };
        let Ok(FormOutcome::Saved(trip)) = view.create(&draft("Lisbon", dec!(1000))) else {
            return;
        };
        assert!(view.create(&draft("Laptop", dec!(2000))).is_ok());
        assert_eq!(trip.current_amount, Decimal::ZERO);
        assert_eq!(view.totals().target, dec!(3000));

        let rejected = view.contribute(trip.id, Some(dec!(0)));
        assert!(rejected.is_ok_and(|outcome| !outcome.is_saved()));

        let reached = view.contribute(trip.id, Some(dec!(1000)));
        assert!(matches!(reached, Ok(FormOutcome::Saved(ref goal)) if goal.completed));
        let beyond = view.contribute(trip.id, Some(dec!(25)));
        assert!(matches!(beyond, Ok(FormOutcome::Saved(ref goal)) if goal.completed));

        assert_eq!(view.completed().len(), 1);
        assert_eq!(view.active().len(), 1);
        let totals = view.totals();
        assert_eq!(totals.target, dec!(2000));
        assert_eq!(totals.remaining, dec!(2000));

        let mut lowered = draft("Lisbon", dec!(5000));
        lowered.current_amount = Some(dec!(10));
        let edited = view.update(trip.id, &lowered);
        assert!(matches!(edited, Ok(FormOutcome::Saved(ref goal)) if goal.completed));
    }

    #[test]
    fn colors_rotate_through_the_goal_palette() {
        let store = LocalRecordStore::new(MemoryKeyValueStore::new(), ChangeFeed::default());
        let Ok(mut view) = GoalsView::load(&store, &session()) else {
            return;
        };
        let colors: Vec<String> = (0..9)
            .filter_map(|index| match view.create(&draft(&format!("g{index}"), dec!(10))) {
                Ok(FormOutcome::Saved(goal)) => Some(goal.color_tag),
                _ => None,
            })
            .collect();
        assert_eq!(colors.len(), 9);
        assert_eq!(colors[1], "#22c55e");
        assert_eq!(colors[8], colors[0]);
    }
}
