use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{RecordId, amount_ceiling};
use crate::models::budget::capped_percentage;
use crate::models::date::lenient_date;

pub const GOAL_CATEGORIES: [&str; 10] = [
    "Emergency Fund",
    "Vacation",
    "Home Purchase",
    "Car Purchase",
    "Education",
    "Retirement",
    "Investment",
    "Wedding",
    "Business",
    "Other",
];

pub const GOAL_COLORS: [&str; 8] = [
    "#6366f1", "#22c55e", "#f59e0b", "#f87171", "#a78bfa", "#f472b6", "#60a5fa", "#84cc16",
];

const URGENT_DAYS: i64 = 30;
const ON_TRACK_PERCENTAGE: i64 = 80;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum GoalStatus {
    Completed,
    Overdue,
    Urgent,
    OnTrack,
    InProgress,
}

impl GoalStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Overdue => "overdue",
            Self::Urgent => "urgent",
            Self::OnTrack => "on-track",
            Self::InProgress => "in-progress",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: RecordId,
    pub title: String,
    pub target_amount: Decimal,
    pub current_amount: Decimal,
    #[serde(with = "lenient_date")]
    pub deadline: NaiveDate,
    pub category: String,
    #[serde(rename = "color")]
    pub color_tag: String,
    #[serde(default)]
    pub completed: bool,
}

impl Goal {
    pub fn is_well_formed(&self) -> bool {
        !self.title.trim().is_empty()
            && self.target_amount > Decimal::ZERO
            && !self.current_amount.is_sign_negative()
    }

    pub fn reached_target(&self) -> bool {
        self.current_amount >= self.target_amount
    }

    /// Adds `amount` to the saved total. Completion is sticky once reached.
    ///
    /// Returns false, leaving the goal untouched, when the new total would reach
    /// the amount ceiling.
    pub fn contribute(&mut self, amount: Decimal) -> bool {
        let Some(total) = self
            .current_amount
            .checked_add(amount)
            .filter(|total| *total < amount_ceiling())
        else {
            return false;
        };
        self.current_amount = total;
        if self.reached_target() {
            self.completed = true;
        }
        true
    }

    pub fn percentage(&self) -> Decimal {
        capped_percentage(self.current_amount, self.target_amount)
    }

    pub fn remaining(&self) -> Decimal {
        (self.target_amount - self.current_amount).max(Decimal::ZERO)
    }

    /// Whole days until the deadline; negative once it has passed.
    pub fn days_remaining(&self, today: NaiveDate) -> i64 {
        (self.deadline - today).num_days()
    }

    pub fn status(&self, today: NaiveDate) -> GoalStatus {
        if self.completed {
            return GoalStatus::Completed;
        }
        let days_remaining = self.days_remaining(today);
        let percentage = self.percentage();
        let on_track = percentage >= Decimal::from(ON_TRACK_PERCENTAGE);
        if days_remaining < 0 {
            GoalStatus::Overdue
        } else if days_remaining < URGENT_DAYS && !on_track {
            GoalStatus::Urgent
        } else if on_track {
            GoalStatus::OnTrack
        } else {
            GoalStatus::InProgress
        }
    }
}
