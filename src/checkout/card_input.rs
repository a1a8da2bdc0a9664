use crate::domain::card::CardDetails;
use serde::Deserialize;
use thiserror::Error;

pub const MAX_CARD_DIGITS: usize = 16;
pub const MIN_CARD_DIGITS: usize = 13;
const EXPIRY_DIGITS: usize = 4;

#[derive(Clone, Deserialize)]
pub struct CardInput {
    pub card_number: String,
    pub expiry: String,
    pub cvv: String,
    pub cardholder_name: String,
}

impl std::fmt::Debug for CardInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CardInput")
            .field("cardholder_name", &self.cardholder_name)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CardValidationError {
    #[error("card number must have at least 13 digits")]
    CardNumberTooShort,
    #[error("expiry date must be in MM/YY format")]
    ExpiryIncomplete,
    #[error("security code must have at least 3 digits")]
    CvvTooShort,
    #[error("cardholder name is required")]
    CardholderNameMissing,
}

fn digits(raw: &str) -> impl Iterator<Item = char> + '_ {
    raw.chars().filter(char::is_ascii_digit)
}

pub fn format_card_number(raw: &str) -> String {
    let mut out = String::with_capacity(MAX_CARD_DIGITS + 3);
    for (i, d) in digits(raw).take(MAX_CARD_DIGITS).enumerate() {
        if i > 0 && i % 4 == 0 {
            out.push(' ');
        }
        out.push(d);
    }
    out
}

pub fn format_expiry(raw: &str) -> String {
    let ds: String = digits(raw).take(EXPIRY_DIGITS).collect();
    if ds.len() >= 2 {
        let (month, year) = ds.split_at(2);
        format!("{}/{}", month, year)
    } else {
        ds
    }
}

pub fn validate_card_input(input: &CardInput) -> Result<(), CardValidationError> {
    if digits(&input.card_number).count() < MIN_CARD_DIGITS {
        return Err(CardValidationError::CardNumberTooShort);
    }
    if input.expiry.chars().count() < 5 {
        return Err(CardValidationError::ExpiryIncomplete);
    }
    if input.cvv.chars().count() < 3 {
        return Err(CardValidationError::CvvTooShort);
    }
    if input.cardholder_name.trim().is_empty() {
        return Err(CardValidationError::CardholderNameMissing);
    }
    Ok(())
}

impl CardInput {
    pub fn into_card_details(self) -> Result<CardDetails, CardValidationError> {
        validate_card_input(&self)?;

        let expiry_digits: String = digits(&self.expiry).take(EXPIRY_DIGITS).collect();
        if expiry_digits.len() < EXPIRY_DIGITS {
            return Err(CardValidationError::ExpiryIncomplete);
        }
        let (mm, yy) = expiry_digits.split_at(2);
        let exp_month = mm
            .parse::<u8>()
            .map_err(|_| CardValidationError::ExpiryIncomplete)?;
        let exp_year = yy
            .parse::<u16>()
            .map_err(|_| CardValidationError::ExpiryIncomplete)?;

        Ok(CardDetails {
            number: digits(&self.card_number).collect(),
            exp_month,
            exp_year: 2000 + exp_year,
            cvv: self.cvv.trim().to_string(),
            name: self.cardholder_name.trim().to_string(),
        })
    }
}
