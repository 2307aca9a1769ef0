use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::budget::{BUDGET_CATEGORIES, BUDGET_COLORS};
use crate::models::{Budget, BudgetPeriod, RecordId, Session, palette_color, saturating_total};
use crate::store::records::Change;
use crate::store::RecordStore;
use crate::views::form::{FormOutcome, Validator};
use crate::views::list::RecordList;
use crate::{ClientError, ClientResult};

#[derive(Debug, Clone, Default)]
pub struct BudgetDraft {
    pub category: String,
    pub limit: Option<Decimal>,
    pub period: BudgetPeriod,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BudgetTotals {
    pub limit: Decimal,
    pub spent: Decimal,
    /// Not capped; zero when there is no limit at all.
    pub percentage: Decimal,
}

pub struct BudgetsView<'a, S> {
    list: RecordList<'a, S, Budget>,
}

impl<'a, S: RecordStore> BudgetsView<'a, S> {
    pub fn load(store: &'a S, session: &Session) -> ClientResult<Self> {
        Ok(Self {
            list: RecordList::load(store, session)?,
        })
    }

    pub fn records(&self) -> &[Budget] {
        self.list.records()
    }

    pub fn totals(&self) -> BudgetTotals {
        let limit = saturating_total(self.list.records().iter().map(|budget| budget.limit));
        let spent = saturating_total(self.list.records().iter().map(|budget| budget.spent));
        let percentage = if limit > Decimal::ZERO {
            spent
                .checked_div(limit)
                .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
                .map(|value| value.round_dp(2))
                .unwrap_or(Decimal::ZERO)
        } else {
            Decimal::ZERO
        };
        BudgetTotals {
            limit,
            spent,
            percentage,
        }
    }

    /// Categories offered by the form. Editing offers all of them.
    pub fn available_categories(&self, editing: bool) -> Vec<&'static str> {
        BUDGET_CATEGORIES
            .into_iter()
            .filter(|category| {
                editing
                    || !self
                        .list
                        .records()
                        .iter()
                        .any(|budget| budget.category == *category)
            })
            .collect()
    }

    fn validate(&self, draft: &BudgetDraft, editing: Option<RecordId>) -> Validator {
        let mut validator = Validator::new();
        validator
            .require("category", &draft.category, "Category is required.")
            .require_amount("limit", draft.limit, "Limit");
        let category = draft.category.trim();
        let taken = self
            .list
            .records()
            .iter()
            .any(|budget| budget.category == category && Some(budget.id) != editing);
        validator.check(
            !taken,
            "category",
            &format!("A budget for `{category}` already exists."),
        );
        validator
    }

    pub fn create(&mut self, draft: &BudgetDraft) -> ClientResult<FormOutcome<Budget>> {
        let validator = self.validate(draft, None);
        let Some(limit) = draft.limit.filter(|_| validator.is_valid()) else {
            return Ok(FormOutcome::Invalid(validator.into_issues()));
        };

        let budget = Budget {
            id: self.list.next_id(),
            category: draft.category.trim().to_string(),
            limit,
            spent: Decimal::ZERO,
            period: draft.period,
            color_tag: palette_color(&BUDGET_COLORS, self.list.records().len()),
        };
        self.list.commit(Change::Insert(budget.clone()))?;
        Ok(FormOutcome::Saved(budget))
    }

    /// Edits category, limit and period. `spent` and color are kept.
    pub fn update(
        &mut self,
        id: RecordId,
        draft: &BudgetDraft,
    ) -> ClientResult<FormOutcome<Budget>> {
        let Some(existing) = self.list.find(id).cloned() else {
            return Err(ClientError::record_not_found("budgets", id));
        };
        let validator = self.validate(draft, Some(id));
        let Some(limit) = draft.limit.filter(|_| validator.is_valid()) else {
            return Ok(FormOutcome::Invalid(validator.into_issues()));
        };

        let budget = Budget {
            category: draft.category.trim().to_string(),
            limit,
            period: draft.period,
            ..existing
        };
        self.list.commit(Change::Update(budget.clone()))?;
        Ok(FormOutcome::Saved(budget))
    }

    /// Records the amount spent so far, as reported from outside.
    pub fn set_spent(
        &mut self,
        id: RecordId,
        spent: Option<Decimal>,
    ) -> ClientResult<FormOutcome<Budget>> {
        let Some(existing) = self.list.find(id).cloned() else {
            return Err(ClientError::record_not_found("budgets", id));
        };
        let mut validator = Validator::new();
        validator.require_amount_or_zero("spent", spent, "Spent");
        let Some(spent) = spent.filter(|_| validator.is_valid()) else {
            return Ok(FormOutcome::Invalid(validator.into_issues()));
        };

        let budget = Budget { spent, ..existing };
        self.list.commit(Change::Update(budget.clone()))?;
        Ok(FormOutcome::Saved(budget))
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
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    use super::{BudgetDraft, BudgetsView};
    use crate::models::{BudgetPeriod, BudgetStatus, Session};
    use crate::store::feed::ChangeFeed;
    use crate::store::kv::MemoryKeyValueStore;
    use crate::store::local::LocalRecordStore;
    use crate::views::form::FormOutcome;

    fn session() -> Session {
        Session {
            user_id: 5,
            display_name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
        }
    }

    fn draft(category: &str, limit: Option<Decimal>) -> BudgetDraft {
        BudgetDraft {
            category: category.to_string(),
            limit,
            period: BudgetPeriod::Monthly,
        }
    }

    #[test]
    fn new_budgets_start_unspent_with_rotating_colors() {
        let store = LocalRecordStore::new(MemoryKeyValueStore::new(), ChangeFeed::default());
        let Ok(mut view) = BudgetsView::load(&store, &session()) else {
            return;
        };
        let first = view.create(&draft("Travel", Some(dec!(300))));
        let second = view.create(&draft("Fitness", Some(dec!(50))));
        let (Ok(FormOutcome::Saved(first)), Ok(FormOutcome::Saved(second))) = (first, second) else {
            return;
        };
        assert_eq!(first.spent, Decimal::ZERO);
        assert_eq!(first.color_tag, "#6366f1");
        assert_eq!(second.color_tag, "#f87171");
        assert!(!view.available_categories(false).contains(&"Travel"));
        assert!(view.available_categories(true).contains(&"Travel"));
    }

    #[test]
    fn duplicate_categories_and_bad_limits_are_field_issues() {
        let store = LocalRecordStore::new(MemoryKeyValueStore::new(), ChangeFeed::default());
        let Ok(mut view) = BudgetsView::load(&store, &session()) else {
            return;
        };
        assert!(view.create(&draft("Travel", Some(dec!(300)))).is_ok());

        let duplicate = view.create(&draft("Travel", Some(dec!(100))));
        assert_eq!(duplicate.ok().map(|outcome| outcome.issues().len()), Some(1));
        let bad_limit = view.create(&draft("Shopping", None));
        assert!(bad_limit.is_ok_and(|outcome| outcome.issues()[0].field == "limit"));
        assert_eq!(view.records().len(), 1);
    }

    #[test]
    fn spent_is_set_explicitly_and_drives_status() {
        let store = LocalRecordStore::new(MemoryKeyValueStore::new(), ChangeFeed::default());
        let Ok(mut view) = BudgetsView::load(&store, &session()) else {
            return;
        };
        let Ok(FormOutcome::Saved(travel)) = view.create(&draft("Travel", Some(dec!(200)))) else {
            return;
        };
        assert!(view.create(&draft("Healthcare", Some(dec!(300)))).is_ok());

        let updated = view.set_spent(travel.id, Some(dec!(170)));
        assert!(updated.is_ok_and(|outcome| outcome.is_saved()));
        assert_eq!(view.records()[0].status(), BudgetStatus::Warning);

        let negative = view.set_spent(travel.id, Some(dec!(-1)));
        assert!(negative.is_ok_and(|outcome| !outcome.is_saved()));

        let edited = view.update(travel.id, &draft("Travel", Some(dec!(100))));
        assert!(edited.is_ok());
        assert_eq!(view.records()[0].spent, dec!(170));
        assert_eq!(view.records()[0].status(), BudgetStatus::OverBudget);

        let totals = view.totals();
        assert_eq!(totals.limit, dec!(400));
        assert_eq!(totals.spent, dec!(170));
        assert_eq!(totals.percentage, dec!(42.5));
    }
}
