//! Money helpers shared by every crate that formats balances.

use rust_decimal::Decimal;

/// Number of decimal places money values are displayed with.
pub const MONEY_SCALE: u32 = 2;

/// Rounds a money value to [`MONEY_SCALE`] decimal places for display.
///
/// Balances keep their full precision in storage; only outgoing values are rounded.
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp(MONEY_SCALE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_to_two_places() {
        let value = Decimal::from_str_exact("1002.9166666").unwrap();
        assert_eq!(round_money(value), Decimal::from_str_exact("1002.92").unwrap());
    }
}
