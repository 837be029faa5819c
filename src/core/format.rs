//! Display formatting for amounts and rates.

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};

/// Format an amount with exactly two decimal places.
pub fn format_amount(d: Decimal) -> String {
    let rounded = d.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let s = format!("{rounded:.2}");
    // -0.00 and 0.00 print the same
    if rounded.is_zero() { "0.00".to_string() } else { s }
}

/// Format a rate as a truncated integer percentage, e.g. `21%`.
pub fn format_percent(d: Decimal) -> String {
    let whole = d.trunc().normalize();
    if whole.is_zero() {
        "0%".to_string()
    } else {
        format!("{whole}%")
    }
}

/// Format a rate without the percent sign, for labels like "stopu 21%".
pub fn format_rate(d: Decimal) -> String {
    let n = d.normalize();
    if n.is_zero() { "0".to_string() } else { n.to_string() }
}

/// `YYYY-MM-DD`.
pub fn format_date(d: NaiveDate) -> String {
    d.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn format_amount_cases() {
        assert_eq!(format_amount(dec!(100)), "100.00");
        assert_eq!(format_amount(dec!(49.9)), "49.90");
        assert_eq!(format_amount(dec!(1833.481)), "1833.48");
        assert_eq!(format_amount(dec!(0.005)), "0.01");
        assert_eq!(format_amount(dec!(-12.345)), "-12.35");
        assert_eq!(format_amount(dec!(-0.001)), "0.00");
        assert_eq!(format_amount(Decimal::ZERO), "0.00");
    }

    #[test]
    fn format_percent_truncates() {
        assert_eq!(format_percent(dec!(21)), "21%");
        assert_eq!(format_percent(dec!(21.00)), "21%");
        assert_eq!(format_percent(dec!(7.9)), "7%");
        assert_eq!(format_percent(dec!(0)), "0%");
    }

    #[test]
    fn format_rate_cases() {
        assert_eq!(format_rate(dec!(21.00)), "21");
        assert_eq!(format_rate(dec!(7)), "7");
        assert_eq!(format_rate(dec!(0.0)), "0");
    }
}
