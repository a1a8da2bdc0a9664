use crate::pricing::money::{round_half_up, to_minor};
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

pub const MAX_INSTALLMENTS: u8 = 12;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PricingError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

pub fn surcharge_rate(installments: u8) -> Decimal {
    if installments > 1 {
        Decimal::new(25, 3)
    } else {
        Decimal::ZERO
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InstallmentQuote {
    pub base_amount: Decimal,
    pub installments: u8,
    pub surcharge_rate: Decimal,
    pub total: Decimal,
    pub total_minor: i64,
    pub per_installment: Decimal,
    #[serde(skip)]
    pub per_installment_exact: Decimal,
}

pub fn installment_quote(base_amount: Decimal, installments: u8) -> Result<InstallmentQuote, PricingError> {
    if base_amount <= Decimal::ZERO {
        return Err(PricingError::InvalidArgument(
            "base amount must be > 0".to_string(),
        ));
    }
    if installments == 0 || installments > MAX_INSTALLMENTS {
        return Err(PricingError::InvalidArgument(format!(
            "installments must be between 1 and {}",
            MAX_INSTALLMENTS
        )));
    }

    let surcharge = surcharge_rate(installments);
    let total_exact = base_amount * (Decimal::ONE + surcharge);
    let per_installment_exact = total_exact / Decimal::from(installments);
    let total_minor = to_minor(total_exact)
        .ok_or_else(|| PricingError::InvalidArgument("amount out of range".to_string()))?;

    Ok(InstallmentQuote {
        base_amount,
        installments,
        surcharge_rate: surcharge,
        total: round_half_up(total_exact),
        total_minor,
        per_installment: round_half_up(per_installment_exact),
        per_installment_exact,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn single_installment_has_no_surcharge() {
        let q = installment_quote(dec!(100), 1).unwrap();
        assert_eq!(q.surcharge_rate, Decimal::ZERO);
        assert_eq!(q.total, dec!(100));
        assert_eq!(q.total_minor, 10_000);
        assert_eq!(q.per_installment, dec!(100));
    }

    #[test]
    fn split_purchase_pays_surcharge() {
        let q = installment_quote(dec!(100), 3).unwrap();
        assert_eq!(q.total, dec!(102.50));
        assert_eq!(q.total_minor, 10_250);
        assert_eq!(q.per_installment, dec!(34.17));
    }

    #[test]
    fn charge_uses_total_not_sum_of_rounded_installments() {
        let q = installment_quote(dec!(100), 3).unwrap();
        // 3 x 34.17 = 102.51, one cent of drift
        assert_eq!(q.per_installment * Decimal::from(3u8), dec!(102.51));
        assert_eq!(q.total_minor, 10_250);
    }

    #[test]
    fn rejects_out_of_range_arguments() {
        assert!(matches!(
            installment_quote(dec!(0), 1),
            Err(PricingError::InvalidArgument(_))
        ));
        assert!(matches!(
            installment_quote(dec!(-5), 2),
            Err(PricingError::InvalidArgument(_))
        ));
        assert!(installment_quote(dec!(10), 0).is_err());
        assert!(installment_quote(dec!(10), 13).is_err());
    }
}
