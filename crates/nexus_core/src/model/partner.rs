//! Partner domain model.
//!
//! # Responsibility
//! - Define the tracked partner record and its JSON shape.
//! - Validate records coming from user input, storage, or imports.
//!
//! # Invariants
//! - `name` is non-empty after trimming.
//! - `rating` is finite and within `[0, 5]`; `0` means unrated.
//! - `id` is never reassigned once a partner exists.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Partner identifier. New ids are derived from epoch milliseconds.
pub type PartnerId = i64;

/// Highest allowed rating.
pub const MAX_RATING: f64 = 5.0;

/// Tracked contact record with engagement statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Partner {
    pub id: PartnerId,
    pub name: String,
    pub smashes: u32,
    /// `0.0` means "unrated".
    pub rating: f64,
    /// Image reference (URL, path or `data:` URL).
    #[serde(default)]
    pub avatar: Option<String>,
}

/// Validation failure for partner records.
#[derive(Debug, Clone, PartialEq)]
pub enum PartnerValidationError {
    EmptyName,
    RatingOutOfRange(f64),
}

impl Display for PartnerValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "partner name cannot be empty"),
            Self::RatingOutOfRange(value) => {
                write!(f, "partner rating {value} is outside 0..={MAX_RATING}")
            }
        }
    }
}

impl Error for PartnerValidationError {}

impl Partner {
    /// Creates a fresh partner with zeroed statistics and no avatar.
    pub fn new(id: PartnerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            smashes: 0,
            rating: 0.0,
            avatar: None,
        }
    }

    pub fn validate(&self) -> Result<(), PartnerValidationError> {
        if self.name.trim().is_empty() {
            return Err(PartnerValidationError::EmptyName);
        }
        if !self.rating.is_finite() || !(0.0..=MAX_RATING).contains(&self.rating) {
            return Err(PartnerValidationError::RatingOutOfRange(self.rating));
        }
        Ok(())
    }

    pub fn is_rated(&self) -> bool {
        self.rating > 0.0
    }

    /// Rating with one decimal, or `–` when unrated.
    pub fn rating_label(&self) -> String {
        if self.is_rated() {
            format!("{:.1}", self.rating)
        } else {
            "–".to_string()
        }
    }

    /// Uppercased first character of the name, used when there is no avatar.
    pub fn initial(&self) -> String {
        initial_of(&self.name)
    }
}

/// Uppercased first character of `name`, or an empty string.
pub fn initial_of(name: &str) -> String {
    name.trim()
        .chars()
        .next()
        .map(|ch| ch.to_uppercase().collect())
        .unwrap_or_default()
}

/// Returns the first invalid partner as `(index, error)`.
pub fn validate_partners(partners: &[Partner]) -> Result<(), (usize, PartnerValidationError)> {
    partners
        .iter()
        .enumerate()
        .try_for_each(|(index, partner)| partner.validate().map_err(|err| (index, err)))
}

#[cfg(test)]
mod tests {
    use super::{initial_of, validate_partners, Partner, PartnerValidationError};

    #[test]
    fn new_partner_has_zeroed_stats() {
        let partner = Partner::new(42, "Zed");
        assert_eq!(partner.smashes, 0);
        assert_eq!(partner.rating, 0.0);
        assert_eq!(partner.avatar, None);
        assert!(partner.validate().is_ok());
    }

    #[test]
    fn validate_rejects_blank_name_and_bad_rating() {
        assert_eq!(
            Partner::new(1, "  ").validate(),
            Err(PartnerValidationError::EmptyName)
        );

        let mut partner = Partner::new(2, "Mark");
        partner.rating = 5.5;
        assert!(matches!(
            partner.validate(),
            Err(PartnerValidationError::RatingOutOfRange(_))
        ));
        partner.rating = f64::NAN;
        assert!(partner.validate().is_err());
    }

    #[test]
    fn rating_label_formats_or_dashes() {
        let mut partner = Partner::new(3, "RF");
        assert_eq!(partner.rating_label(), "–");
        partner.rating = 4.26;
        assert_eq!(partner.rating_label(), "4.3");
        partner.rating = 5.0;
        assert_eq!(partner.rating_label(), "5.0");
    }

    #[test]
    fn initial_is_uppercased_first_char() {
        assert_eq!(initial_of("random m"), "R");
        assert_eq!(initial_of(""), "");
        assert_eq!(Partner::new(4, "ßeta").initial(), "SS");
    }

    #[test]
    fn validate_partners_reports_index_of_first_failure() {
        let partners = vec![Partner::new(1, "IB"), Partner::new(2, ""), Partner::new(3, "")];
        assert_eq!(
            validate_partners(&partners),
            Err((1, PartnerValidationError::EmptyName))
        );
    }

    #[test]
    fn missing_avatar_field_deserializes_as_none() {
        let partner: Partner =
            serde_json::from_str(r#"{"id":7,"name":"T","smashes":0,"rating":0}"#)
                .expect("partner without avatar");
        assert_eq!(partner, Partner::new(7, "T"));
    }
}
