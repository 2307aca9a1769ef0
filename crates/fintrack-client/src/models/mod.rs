pub mod budget;
pub mod date;
pub mod goal;
pub mod transaction;
pub mod user;

use rust_decimal::Decimal;

pub use budget::{Budget, BudgetPeriod, BudgetStatus};
pub use goal::{Goal, GoalStatus};
pub use transaction::{Transaction, TransactionKind};
pub use user::{Session, User};

/// Integer identity of a stored record, unique within one user's collection.
pub type RecordId = i64;
pub type UserId = i64;

/// Amounts stay strictly below this so their digits survive the float JSON encoding.
pub const AMOUNT_CEILING: i64 = 1_000_000_000_000;

pub fn amount_ceiling() -> Decimal {
    Decimal::from(AMOUNT_CEILING)
}

/// Sums amounts, pinning at `Decimal::MAX` instead of overflowing.
pub fn saturating_total(amounts: impl IntoIterator<Item = Decimal>) -> Decimal {
    amounts
        .into_iter()
        .fold(Decimal::ZERO, Decimal::saturating_add)
}

/// Picks the color tag for the `index`-th record of a collection.
pub fn palette_color(palette: &[&str], index: usize) -> String {
    if palette.is_empty() {
        return String::new();
    }
    palette[index % palette.len()].to_string()
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    use super::{palette_color, saturating_total};

    #[test]
    fn palette_wraps_around() {
        let palette = ["#a", "#b", "#c"];
        assert_eq!(palette_color(&palette, 0), "#a");
        assert_eq!(palette_color(&palette, 4), "#b");
        assert_eq!(palette_color(&[], 3), "");
    }

    #[test]
    fn totals_pin_instead_of_overflowing() {
        assert_eq!(saturating_total([dec!(1.25), dec!(2.50)]), dec!(3.75));
        assert_eq!(saturating_total([Decimal::MAX, Decimal::MAX]), Decimal::MAX);
        assert_eq!(saturating_total(Vec::new()), Decimal::ZERO);
    }
}
