//! Checkout hand-off to WhatsApp.
//!
//! The storefront never takes payment. Checkout validates the customer's
//! details, composes a plain-text order message from the cart, and hands the
//! customer a `wa.me` link that opens a chat with the business number. A
//! successful hand-off empties the cart.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;
use tracing::{info, instrument};
use url::Url;

use shophub_core::{NewOrder, NewOrderItem, Price};

use crate::cart::{CartLine, CartStore};
use crate::config::CheckoutConfig;
use crate::format::format_price;
use crate::storage::Storage;

static PHONE_PATTERN: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"^\+?[\d\s\-()]+$"));

/// Checkout form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutField {
    Name,
    Phone,
    Address,
}

/// Validation failure for one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: CheckoutField,
    pub message: &'static str,
}

/// Errors that stop a checkout.
#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("Your cart is empty")]
    EmptyCart,

    #[error("Please fill in all required fields correctly")]
    Invalid(Vec<FieldError>),

    #[error("Invalid WhatsApp link: {0}")]
    Url(#[from] url::ParseError),
}

/// Customer details entered at checkout.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckoutForm {
    pub name: String,
    pub phone: String,
    pub address: String,
    pub notes: String,
}

impl CheckoutForm {
    /// Check every required field, collecting one error per failing field.
    ///
    /// # Errors
    ///
    /// Returns the failing fields in form order.
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();

        if self.name.trim().is_empty() {
            errors.push(FieldError {
                field: CheckoutField::Name,
                message: "Name is required",
            });
        }

        if self.phone.trim().is_empty() {
            errors.push(FieldError {
                field: CheckoutField::Phone,
                message: "Phone number is required",
            });
        } else if !is_valid_phone(&self.phone) {
            errors.push(FieldError {
                field: CheckoutField::Phone,
                message: "Please enter a valid phone number",
            });
        }

        if self.address.trim().is_empty() {
            errors.push(FieldError {
                field: CheckoutField::Address,
                message: "Delivery address is required",
            });
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    /// Order request for the REST API built from these details and `lines`.
    #[must_use]
    pub fn to_new_order(&self, lines: &[CartLine]) -> NewOrder {
        let notes = self.notes.trim();
        NewOrder {
            items: lines
                .iter()
                .map(|line| NewOrderItem {
                    product: line.product_id.clone(),
                    quantity: line.quantity,
                })
                .collect(),
            shipping_address: self.address.trim().to_string(),
            phone: self.phone.trim().to_string(),
            notes: (!notes.is_empty()).then(|| notes.to_string()),
        }
    }
}

/// Result of a successful checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutReceipt {
    /// Link that opens the pre-filled WhatsApp chat.
    pub whatsapp_url: Url,
    /// The composed order message, unencoded.
    pub message: String,
    pub total: Price,
    pub item_count: u64,
}

/// Compose the WhatsApp order message.
#[must_use]
pub fn compose_order_message(
    store_name: &str,
    form: &CheckoutForm,
    lines: &[CartLine],
    total: Price,
) -> String {
    let mut message = format!("*New Order from {store_name}*\n\n");

    message.push_str("*Customer Details:*\n");
    message.push_str(&format!("Name: {}\n", form.name.trim()));
    message.push_str(&format!("Phone: {}\n", form.phone.trim()));
    message.push_str(&format!("Address: {}\n\n", form.address.trim()));

    message.push_str("*Order Items:*\n");
    for (index, line) in lines.iter().enumerate() {
        message.push_str(&format!("{}. {}\n", index + 1, line.name));
        message.push_str(&format!(
            "   Qty: {} x {} = {}\n",
            line.quantity,
            format_price(line.unit_price),
            format_price(line.line_total()),
        ));
    }

    message.push_str(&format!("\n*Total: {}*\n", format_price(total)));

    let notes = form.notes.trim();
    if !notes.is_empty() {
        message.push_str(&format!("\n*Additional Notes:*\n{notes}\n"));
    }

    message.push_str(&format!("\n_Generated from {store_name} eCommerce_"));
    message
}

/// `https://wa.me/<number>?text=<message>`.
///
/// # Errors
///
/// Returns an error if `number` does not form a valid URL.
pub fn whatsapp_link(number: &str, message: &str) -> Result<Url, url::ParseError> {
    Url::parse(&format!(
        "https://wa.me/{number}?text={}",
        urlencoding::encode(message)
    ))
}

/// A checkout whose hand-off is fully built but whose cart is not yet
/// cleared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingCheckout {
    /// The lines being ordered.
    pub lines: Vec<CartLine>,
    pub receipt: CheckoutReceipt,
}

impl PendingCheckout {
    /// Clear the cart and return the receipt.
    pub fn complete<S: Storage>(self, cart: &CartStore<S>) -> CheckoutReceipt {
        cart.clear();
        info!(
            lines = self.lines.len(),
            item_count = self.receipt.item_count,
            total = %self.receipt.total,
            "order handed off to WhatsApp"
        );
        self.receipt
    }
}

/// Validate `form` and build the WhatsApp hand-off for the current cart
/// without touching the cart.
///
/// # Errors
///
/// Returns [`CheckoutError::EmptyCart`] when there is nothing to order,
/// [`CheckoutError::Invalid`] when the form fails validation, and
/// [`CheckoutError::Url`] when the link cannot be built.
#[instrument(skip_all)]
pub fn prepare_order<S: Storage>(
    cart: &CartStore<S>,
    config: &CheckoutConfig,
    form: &CheckoutForm,
) -> Result<PendingCheckout, CheckoutError> {
    let lines = cart.lines();
    if lines.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }
    form.validate().map_err(CheckoutError::Invalid)?;

    let total: Price = lines.iter().map(CartLine::line_total).sum();
    let item_count = lines.iter().map(|line| u64::from(line.quantity)).sum();
    let message = compose_order_message(&config.store_name, form, &lines, total);
    let whatsapp_url = whatsapp_link(&config.whatsapp_number, &message)?;

    Ok(PendingCheckout {
        lines,
        receipt: CheckoutReceipt {
            whatsapp_url,
            message,
            total,
            item_count,
        },
    })
}

/// Validate `form`, build the WhatsApp hand-off for the current cart, and
/// clear the cart.
///
/// # Errors
///
/// As [`prepare_order`]. The cart is left untouched on every error.
pub fn place_order<S: Storage>(
    cart: &CartStore<S>,
    config: &CheckoutConfig,
    form: &CheckoutForm,
) -> Result<CheckoutReceipt, CheckoutError> {
    Ok(prepare_order(cart, config, form)?.complete(cart))
}

// =============================================================================
// Helper Functions
// =============================================================================

fn is_valid_phone(phone: &str) -> bool {
    PHONE_PATTERN
        .as_ref()
        .is_ok_and(|pattern| pattern.is_match(phone))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use shophub_core::ProductId;

    use super::*;
    use crate::cart::ProductSnapshot;
    use crate::storage::MemoryStorage;

    fn form() -> CheckoutForm {
        CheckoutForm {
            name: "Ada Lovelace".to_string(),
            phone: "+254 700 000-000".to_string(),
            address: "12 Analytical Way".to_string(),
            notes: String::new(),
        }
    }

    fn filled_cart() -> CartStore<MemoryStorage> {
        let cart = CartStore::new(MemoryStorage::new());
        cart.add(
            &ProductSnapshot::new("p1", "Desk Lamp", Price::from_cents(1000), 5),
            2,
        );
        cart.add(
            &ProductSnapshot::new("p2", "Notebook", Price::from_cents(350), 10),
            1,
        );
        cart
    }

    #[test]
    fn test_validate_accepts_complete_form() {
        assert!(form().validate().is_ok());
        let bracketed = CheckoutForm {
            phone: "(020) 123 4567".to_string(),
            ..form()
        };
        assert!(bracketed.validate().is_ok());
    }

    #[test]
    fn test_validate_collects_every_failing_field() {
        let errors = CheckoutForm::default().validate().unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec![
                CheckoutField::Name,
                CheckoutField::Phone,
                CheckoutField::Address
            ]
        );
        assert_eq!(errors[1].message, "Phone number is required");
    }

    #[test]
    fn test_validate_rejects_malformed_phone() {
        let bad = CheckoutForm {
            phone: "call me".to_string(),
            ..form()
        };
        let errors = bad.validate().unwrap_err();
        assert_eq!(
            errors,
            vec![FieldError {
                field: CheckoutField::Phone,
                message: "Please enter a valid phone number",
            }]
        );
    }

    #[test]
    fn test_compose_order_message() {
        let cart = filled_cart();
        let form = CheckoutForm {
            notes: "Leave at the gate".to_string(),
            ..form()
        };
        let message = compose_order_message("ShopHub", &form, &cart.lines(), cart.total());

        assert_eq!(
            message,
            "*New Order from ShopHub*\n\n\
             *Customer Details:*\n\
             Name: Ada Lovelace\n\
             Phone: +254 700 000-000\n\
             Address: 12 Analytical Way\n\n\
             *Order Items:*\n\
             1. Desk Lamp\n   Qty: 2 x $10.00 = $20.00\n\
             2. Notebook\n   Qty: 1 x $3.50 = $3.50\n\
             \n*Total: $23.50*\n\
             \n*Additional Notes:*\nLeave at the gate\n\
             \n_Generated from ShopHub eCommerce_"
        );
    }

    #[test]
    fn test_compose_order_message_omits_empty_notes() {
        let cart = filled_cart();
        let message = compose_order_message("ShopHub", &form(), &cart.lines(), cart.total());
        assert!(!message.contains("Additional Notes"));
    }

    #[test]
    fn test_whatsapp_link_percent_encodes_message() {
        let url = whatsapp_link("254114087028", "*Hi* & bye\n").unwrap();
        assert_eq!(
            url.as_str(),
            "https://wa.me/254114087028?text=%2AHi%2A%20%26%20bye%0A"
        );
    }

    #[test]
    fn test_place_order_clears_cart() {
        let cart = filled_cart();
        let receipt = place_order(&cart, &CheckoutConfig::default(), &form()).unwrap();

        assert_eq!(receipt.total, Price::from_cents(2350));
        assert_eq!(receipt.item_count, 3);
        assert!(
            receipt
                .whatsapp_url
                .as_str()
                .starts_with("https://wa.me/254114087028?text=")
        );
        assert!(cart.is_empty());
    }

    #[test]
    fn test_place_order_rejects_empty_cart() {
        let cart = CartStore::new(MemoryStorage::new());
        let err = place_order(&cart, &CheckoutConfig::default(), &form()).unwrap_err();
        assert!(matches!(err, CheckoutError::EmptyCart));
    }

    #[test]
    fn test_place_order_keeps_cart_when_form_invalid() {
        let cart = filled_cart();
        let err = place_order(&cart, &CheckoutConfig::default(), &CheckoutForm::default())
            .unwrap_err();
        assert!(matches!(err, CheckoutError::Invalid(ref fields) if fields.len() == 3));
        assert_eq!(cart.item_count(), 3);
    }

    #[test]
    fn test_prepare_order_keeps_cart_until_completed() {
        let cart = filled_cart();
        let pending = prepare_order(&cart, &CheckoutConfig::default(), &form()).unwrap();

        assert_eq!(pending.lines.len(), 2);
        assert_eq!(cart.item_count(), 3);

        let receipt = pending.complete(&cart);
        assert_eq!(receipt.total, Price::from_cents(2350));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_to_new_order() {
        let cart = filled_cart();
        let order = form().to_new_order(&cart.lines());
        assert_eq!(order.items.len(), 2);
        assert_eq!(order.items[0].product, ProductId::new("p1"));
        assert_eq!(order.items[0].quantity, 2);
        assert_eq!(order.shipping_address, "12 Analytical Way");
        assert_eq!(order.notes, None);
    }
}
