use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

pub const MINOR_UNIT_DP: u32 = 2;

pub fn round_half_up(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(MINOR_UNIT_DP, RoundingStrategy::MidpointAwayFromZero)
}

pub fn to_minor(amount: Decimal) -> Option<i64> {
    (amount * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
}

/// Like `to_minor` but refuses amounts finer than one minor unit instead of
/// rounding them.
pub fn exact_minor(amount: Decimal) -> Option<i64> {
    if amount.normalize().scale() > MINOR_UNIT_DP {
        return None;
    }
    to_minor(amount)
}

pub fn from_minor(minor: i64) -> Decimal {
    Decimal::new(minor, MINOR_UNIT_DP)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn rounds_midpoint_up() {
        assert_eq!(round_half_up(dec!(10.005)), dec!(10.01));
        assert_eq!(round_half_up(dec!(10.004)), dec!(10.00));
        assert_eq!(to_minor(dec!(0.125)), Some(13));
        assert_eq!(to_minor(dec!(199.90)), Some(19990));
    }

    #[test]
    fn exact_minor_refuses_sub_cent_amounts() {
        assert_eq!(exact_minor(dec!(140.004)), None);
        assert_eq!(exact_minor(dec!(140.000)), Some(14000));
        assert_eq!(exact_minor(dec!(0.5)), Some(50));
    }

    #[test]
    fn minor_back_to_decimal() {
        assert_eq!(from_minor(19990), dec!(199.90));
        assert_eq!(from_minor(1), dec!(0.01));
    }
}
