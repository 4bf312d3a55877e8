//! Invoice form validation
//!
//! Raw form fields come in as an untyped string map. [`validate_invoice_form`]
//! checks them against the invoice schema and either returns a typed
//! [`InvoiceInput`] or the messages for every field that failed.

pub mod validators;

use crate::core::error::ValidationError;
use crate::core::invoice::InvoiceStatus;
use indexmap::IndexMap;
use std::collections::HashMap;

/// Form field carrying the customer reference
pub const FIELD_CUSTOMER_ID: &str = "customerId";
/// Form field carrying the decimal amount
pub const FIELD_AMOUNT: &str = "amount";
/// Form field carrying the status
pub const FIELD_STATUS: &str = "status";

pub const CUSTOMER_MESSAGE: &str = "Please select a customer.";
pub const AMOUNT_NAN_MESSAGE: &str = "Please enter a valid amount.";
pub const AMOUNT_MESSAGE: &str = "Please enter an amount greater than $0.";
pub const AMOUNT_TOO_LARGE_MESSAGE: &str = "Please enter a smaller amount.";
pub const STATUS_MESSAGE: &str = "Please select an invoice status.";

/// Typed, coerced invoice form values
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceInput {
    pub customer_id: String,
    /// Amount in minor units, rounded to the nearest cent; always positive
    pub amount_cents: i64,
    pub status: InvoiceStatus,
}

/// Validate raw form fields against the invoice schema
///
/// Every field is checked, so the failure lists all failing fields at once,
/// in schema order.
pub fn validate_invoice_form(
    fields: &HashMap<String, String>,
) -> Result<InvoiceInput, ValidationError> {
    let field = |name: &str| fields.get(name).map(String::as_str);

    let customer_id = validators::non_empty(CUSTOMER_MESSAGE)(field(FIELD_CUSTOMER_ID));
    let amount = validators::positive_cents(
        AMOUNT_NAN_MESSAGE,
        AMOUNT_MESSAGE,
        AMOUNT_TOO_LARGE_MESSAGE,
    )(field(FIELD_AMOUNT));
    let status = validators::one_of::<InvoiceStatus>(STATUS_MESSAGE)(field(FIELD_STATUS));

    match (customer_id, amount, status) {
        (Ok(customer_id), Ok(amount_cents), Ok(status)) => Ok(InvoiceInput {
            customer_id,
            amount_cents,
            status,
        }),
        (customer_id, amount, status) => {
            let mut errors: IndexMap<String, Vec<String>> = IndexMap::new();
            let failures = [
                (FIELD_CUSTOMER_ID, customer_id.err()),
                (FIELD_AMOUNT, amount.err()),
                (FIELD_STATUS, status.err()),
            ];
            for (name, message) in failures {
                if let Some(message) = message {
                    errors.entry(name.to_string()).or_default().push(message);
                }
            }
            Err(ValidationError::FieldErrors(errors))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn field_errors(result: Result<InvoiceInput, ValidationError>) -> IndexMap<String, Vec<String>> {
        match result {
            Err(ValidationError::FieldErrors(errors)) => errors,
            other => panic!("expected field errors, got {:?}", other),
        }
    }

    #[test]
    fn test_valid_form_is_coerced() {
        let input = validate_invoice_form(&form(&[
            ("customerId", "c1"),
            ("amount", "12.50"),
            ("status", "pending"),
        ]))
        .unwrap();

        assert_eq!(input.customer_id, "c1");
        assert_eq!(input.amount_cents, 1250);
        assert_eq!(input.status, InvoiceStatus::Pending);
    }

    #[test]
    fn test_cents_are_rounded_not_truncated() {
        let input = validate_invoice_form(&form(&[
            ("customerId", "c1"),
            ("amount", "19.99"),
            ("status", "paid"),
        ]))
        .unwrap();
        assert_eq!(input.amount_cents, 1999);
    }

    #[test]
    fn test_empty_form_reports_every_field_in_order() {
        let errors = field_errors(validate_invoice_form(&HashMap::new()));

        let keys: Vec<&str> = errors.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["customerId", "amount", "status"]);
        assert_eq!(errors["customerId"], vec![CUSTOMER_MESSAGE]);
        assert_eq!(errors["amount"], vec![AMOUNT_MESSAGE]);
        assert_eq!(errors["status"], vec![STATUS_MESSAGE]);
    }

    #[test]
    fn test_only_failing_fields_are_reported() {
        let errors = field_errors(validate_invoice_form(&form(&[
            ("customerId", "c1"),
            ("amount", "0"),
            ("status", "paid"),
        ])));

        assert_eq!(errors.len(), 1);
        assert!(errors.contains_key("amount"));
    }

    #[test]
    fn test_non_numeric_amount_is_a_field_error() {
        let errors = field_errors(validate_invoice_form(&form(&[
            ("customerId", "c1"),
            ("amount", "ten dollars"),
            ("status", "paid"),
        ])));

        assert_eq!(errors["amount"], vec![AMOUNT_NAN_MESSAGE]);
    }

    #[test]
    fn test_amount_rounding_to_zero_cents_is_rejected() {
        let errors = field_errors(validate_invoice_form(&form(&[
            ("customerId", "c1"),
            ("amount", "0.001"),
            ("status", "paid"),
        ])));

        assert_eq!(errors["amount"], vec![AMOUNT_MESSAGE]);
    }

    #[test]
    fn test_amount_beyond_i64_cents_is_rejected() {
        let errors = field_errors(validate_invoice_form(&form(&[
            ("customerId", "c1"),
            ("amount", "1e300"),
            ("status", "paid"),
        ])));

        assert_eq!(errors["amount"], vec![AMOUNT_TOO_LARGE_MESSAGE]);
    }
}
