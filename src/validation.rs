//! Validation
//!
//! Delivery address checks. These run before anything is priced or sent to the
//! backend.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

const PINCODE_LENGTH: usize = 6;
const PHONE_LENGTH: usize = 10;

/// Fields of a [`DeliveryAddress`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressField {
    /// Recipient name
    Name,
    /// Street address
    Street,
    /// City
    City,
    /// State
    State,
    /// Contact phone number
    Phone,
    /// Postal index number
    Pincode,
}

impl fmt::Display for AddressField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AddressField::Name => "name",
            AddressField::Street => "street",
            AddressField::City => "city",
            AddressField::State => "state",
            AddressField::Phone => "phone",
            AddressField::Pincode => "pincode",
        })
    }
}

/// Address validation failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AddressError {
    /// A required field is blank.
    #[error("{0} is required")]
    Missing(AddressField),

    /// Pincode is not six digits.
    #[error("pincode must be {PINCODE_LENGTH} digits, got {0:?}")]
    InvalidPincode(String),

    /// Phone number is not ten digits.
    #[error("phone number must be {PHONE_LENGTH} digits, got {0:?}")]
    InvalidPhone(String),
}

/// Whether `pincode` is exactly six ASCII digits.
pub fn validate_pincode(pincode: &str) -> bool {
    is_digits(pincode, PINCODE_LENGTH)
}

/// Whether `phone` is exactly ten ASCII digits.
pub fn validate_phone(phone: &str) -> bool {
    is_digits(phone, PHONE_LENGTH)
}

fn is_digits(value: &str, length: usize) -> bool {
    value.len() == length && value.bytes().all(|b| b.is_ascii_digit())
}

/// Where an order is shipped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryAddress {
    /// Recipient name
    pub name: String,

    /// Street address
    pub street: String,

    /// City
    pub city: String,

    /// State
    pub state: String,

    /// Ten digit phone number
    pub phone: String,

    /// Six digit pincode
    pub pincode: String,
}

impl DeliveryAddress {
    /// Check every field, in declaration order.
    ///
    /// # Errors
    ///
    /// Returns the first [`AddressError`] found.
    pub fn validate(&self) -> Result<(), AddressError> {
        let fields = [
            (AddressField::Name, &self.name),
            (AddressField::Street, &self.street),
            (AddressField::City, &self.city),
            (AddressField::State, &self.state),
            (AddressField::Phone, &self.phone),
            (AddressField::Pincode, &self.pincode),
        ];

        if let Some((field, _)) = fields.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(AddressError::Missing(*field));
        }

        if !validate_phone(self.phone.trim()) {
            return Err(AddressError::InvalidPhone(self.phone.clone()));
        }

        if !validate_pincode(self.pincode.trim()) {
            return Err(AddressError::InvalidPincode(self.pincode.clone()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn address() -> DeliveryAddress {
        DeliveryAddress {
            name: "Asha Rao".to_string(),
            street: "12 MG Road".to_string(),
            city: "Bengaluru".to_string(),
            state: "Karnataka".to_string(),
            phone: "9876543210".to_string(),
            pincode: "560001".to_string(),
        }
    }

    #[test]
    fn pincodes_are_six_digits() {
        assert!(validate_pincode("560001"));
        assert!(!validate_pincode("56001"));
        assert!(!validate_pincode("5600011"));
        assert!(!validate_pincode("56000a"));
        assert!(!validate_pincode("５６０００１"));
    }

    #[test]
    fn phones_are_ten_digits() {
        assert!(validate_phone("9876543210"));
        assert!(!validate_phone("+919876543210"));
        assert!(!validate_phone("98765 43210"));
    }

    #[test]
    fn complete_address_is_valid() {
        assert_eq!(address().validate(), Ok(()));
    }

    #[test]
    fn blank_fields_are_reported_first() {
        let mut blank = address();
        blank.city = "  ".to_string();
        blank.pincode = "x".to_string();

        assert_eq!(
            blank.validate(),
            Err(AddressError::Missing(AddressField::City))
        );
    }

    #[test]
    fn malformed_numbers_are_rejected() {
        let mut phone = address();
        phone.phone = "12345".to_string();

        assert_eq!(
            phone.validate(),
            Err(AddressError::InvalidPhone("12345".to_string()))
        );

        let mut pincode = address();
        pincode.pincode = "1234567".to_string();

        assert_eq!(
            pincode.validate(),
            Err(AddressError::InvalidPincode("1234567".to_string()))
        );
    }

    #[test]
    fn missing_field_message_names_field() {
        assert_eq!(
            AddressError::Missing(AddressField::Street).to_string(),
            "street is required"
        );
    }
}
