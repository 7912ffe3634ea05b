//! Customer domain model.
//!
//! # Responsibility
//! - Define the persisted customer record and its write-side input shape.
//! - Provide field-presence checks shared by create and update.
//!
//! # Invariants
//! - `id` is assigned by storage, monotonic, and never reused.
//! - Every text field of a stored customer is non-blank.
//! - `identity_number` is kept exactly as submitted.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage-assigned customer identifier.
pub type CustomerId = i64;

/// Persisted customer record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    /// CPF as submitted; may contain punctuation.
    pub identity_number: String,
    /// Caller-defined format, stored verbatim.
    pub birth_date: String,
    pub street_address: String,
    pub postal_code: String,
    pub city: String,
    pub state: String,
}

/// Every customer field except `id`.
///
/// Create and update both take this shape; update replaces all fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerInput {
    pub name: String,
    pub identity_number: String,
    pub birth_date: String,
    pub street_address: String,
    pub postal_code: String,
    pub city: String,
    pub state: String,
}

/// Field-presence failure for customer input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CustomerValidationError {
    /// Named field is empty or whitespace-only.
    BlankField(&'static str),
}

impl Display for CustomerValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankField(field) => write!(f, "field `{field}` must not be blank"),
        }
    }
}

impl Error for CustomerValidationError {}

impl CustomerInput {
    /// Checks that every field except `identity_number` carries a non-blank
    /// value.
    ///
    /// Fields are checked in declaration order; the first blank one is
    /// reported. `identity_number` is judged by the CPF validator alone, so a
    /// blank one is an invalid identity rather than a missing field.
    pub fn validate(&self) -> Result<(), CustomerValidationError> {
        for (field, value) in self.fields() {
            if value.trim().is_empty() {
                return Err(CustomerValidationError::BlankField(field));
            }
        }
        Ok(())
    }

    /// Attaches a storage id, producing the persisted shape.
    pub fn into_customer(self, id: CustomerId) -> Customer {
        Customer {
            id,
            name: self.name,
            identity_number: self.identity_number,
            birth_date: self.birth_date,
            street_address: self.street_address,
            postal_code: self.postal_code,
            city: self.city,
            state: self.state,
        }
    }

    fn fields(&self) -> [(&'static str, &str); 6] {
        [
            ("name", self.name.as_str()),
            ("birth_date", self.birth_date.as_str()),
            ("street_address", self.street_address.as_str()),
            ("postal_code", self.postal_code.as_str()),
            ("city", self.city.as_str()),
            ("state", self.state.as_str()),
        ]
    }
}

impl From<Customer> for CustomerInput {
    fn from(value: Customer) -> Self {
        Self {
            name: value.name,
            identity_number: value.identity_number,
            birth_date: value.birth_date,
            street_address: value.street_address,
            postal_code: value.postal_code,
            city: value.city,
            state: value.state,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CustomerInput, CustomerValidationError};

    fn sample() -> CustomerInput {
        CustomerInput {
            name: "Ana".to_string(),
            identity_number: "11144477735".to_string(),
            birth_date: "1990-01-01".to_string(),
            street_address: "Rua A".to_string(),
            postal_code: "00000-000".to_string(),
            city: "X".to_string(),
            state: "SP".to_string(),
        }
    }

    #[test]
    fn complete_input_passes() {
        assert_eq!(sample().validate(), Ok(()));
    }

    #[test]
    fn whitespace_only_field_is_blank() {
        let mut input = sample();
        input.city = "   ".to_string();
        assert_eq!(
            input.validate(),
            Err(CustomerValidationError::BlankField("city"))
        );
    }

    #[test]
    fn first_blank_field_is_reported() {
        let mut input = sample();
        input.name.clear();
        input.state.clear();
        assert_eq!(
            input.validate(),
            Err(CustomerValidationError::BlankField("name"))
        );
    }

    #[test]
    fn blank_identity_number_is_left_to_the_cpf_validator() {
        let mut input = sample();
        input.identity_number = "   ".to_string();
        assert_eq!(input.validate(), Ok(()));
    }

    #[test]
    fn into_customer_keeps_fields() {
        let customer = sample().into_customer(7);
        assert_eq!(customer.id, 7);
        assert_eq!(customer.identity_number, "11144477735");
        assert_eq!(CustomerInput::from(customer), sample());
    }

    #[test]
    fn record_serializes_with_wire_field_names() {
        let value = serde_json::to_value(sample().into_customer(1)).unwrap();
        let mut keys: Vec<&str> = value
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            [
                "birth_date",
                "city",
                "id",
                "identity_number",
                "name",
                "postal_code",
                "state",
                "street_address"
            ]
        );
    }
}
