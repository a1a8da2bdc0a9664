use course_checkout::pricing::installments::{installment_quote, MAX_INSTALLMENTS};
use course_checkout::pricing::money::from_minor;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

#[test]
fn installments_multiply_back_to_total_within_one_cent() {
    let one_cent = dec!(0.01);
    for base in [dec!(0.01), dec!(1), dec!(19.99), dec!(100), dec!(297.00), dec!(1234.56)] {
        for n in 1..=MAX_INSTALLMENTS {
            let q = installment_quote(base, n).unwrap();
            let expected = base * (Decimal::ONE + q.surcharge_rate);
            let reconstructed = q.per_installment * Decimal::from(n);
            assert!(
                (reconstructed - expected).abs() <= one_cent * Decimal::from(n),
                "base {} n {}: {} vs {}",
                base,
                n,
                reconstructed,
                expected
            );
            assert!((q.per_installment_exact * Decimal::from(n) - expected).abs() < one_cent);
        }
    }
}

#[test]
fn charged_amount_is_rounded_total() {
    let q = installment_quote(dec!(100), 3).unwrap();
    assert_eq!(q.total, dec!(102.50));
    assert_eq!(from_minor(q.total_minor), dec!(102.50));
    assert_eq!(q.per_installment, dec!(34.17));
}

#[test]
fn surcharge_only_applies_to_split_purchases() {
    assert_eq!(installment_quote(dec!(50), 1).unwrap().surcharge_rate, Decimal::ZERO);
    for n in 2..=MAX_INSTALLMENTS {
        assert_eq!(installment_quote(dec!(50), n).unwrap().surcharge_rate, dec!(0.025));
    }
}

#[test]
fn rejects_zero_and_thirteen_installments() {
    assert!(installment_quote(dec!(10), 0).is_err());
    assert!(installment_quote(dec!(10), 13).is_err());
    assert!(installment_quote(dec!(0), 1).is_err());
}
