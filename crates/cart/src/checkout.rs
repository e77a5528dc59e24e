//! Simulated checkout.
//!
//! There is no payment integration. Placing an order validates the shipping
//! form, prices the cart, waits a short processing delay, clears the cart and
//! hands back a confirmation.

use std::str::FromStr;
use std::time::Duration;

use artcrafts_core::{CurrencyCode, Email, PhoneNumber, PinCode};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::config::CartConfig;
use crate::context::CartContext;
use crate::error::CheckoutError;
use crate::summary::{OrderSummary, ShippingPolicy};

/// How the shopper intends to pay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    #[default]
    CashOnDelivery,
    Online,
}

impl PaymentMethod {
    /// Short code used on forms and the command line.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::CashOnDelivery => "cod",
            Self::Online => "online",
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = CheckoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cod" | "cash_on_delivery" => Ok(Self::CashOnDelivery),
            "online" => Ok(Self::Online),
            _ => Err(CheckoutError::UnknownPaymentMethod(s.to_owned())),
        }
    }
}

/// Shipping form as submitted, before validation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ShippingForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
}

impl ShippingForm {
    /// Check every field and produce validated [`ShippingDetails`].
    ///
    /// # Errors
    ///
    /// Returns `MissingField` for the first blank field, or `InvalidContact`
    /// if the email, phone, or PIN code is malformed.
    pub fn validate(self) -> Result<ShippingDetails, CheckoutError> {
        let name = required(self.name, "name")?;
        let email = Email::parse(&required(self.email, "email")?)?;
        let phone = PhoneNumber::parse(&required(self.phone, "phone")?)?;
        let address = required(self.address, "address")?;
        let city = required(self.city, "city")?;
        let state = required(self.state, "state")?;
        let pincode = PinCode::parse(&required(self.pincode, "pincode")?)?;

        Ok(ShippingDetails {
            name,
            email,
            phone,
            address,
            city,
            state,
            pincode,
        })
    }
}

fn required(value: String, field: &'static str) -> Result<String, CheckoutError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(CheckoutError::MissingField(field))
    } else {
        Ok(trimmed.to_owned())
    }
}

/// Validated shipping details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShippingDetails {
    pub name: String,
    pub email: Email,
    pub phone: PhoneNumber,
    pub address: String,
    pub city: String,
    pub state: String,
    pub pincode: PinCode,
}

/// Result of a successful (simulated) order.
#[derive(Debug, Clone, Serialize)]
pub struct OrderConfirmation {
    pub order_id: Uuid,
    pub placed_at: DateTime<Utc>,
    pub payment_method: PaymentMethod,
    pub ship_to: ShippingDetails,
    pub summary: OrderSummary,
}

/// Places orders against a shared cart.
#[derive(Debug, Clone)]
pub struct Checkout {
    policy: ShippingPolicy,
    currency: CurrencyCode,
    processing_delay: Duration,
}

impl Checkout {
    /// Create a checkout with explicit settings.
    #[must_use]
    pub const fn new(
        policy: ShippingPolicy,
        currency: CurrencyCode,
        processing_delay: Duration,
    ) -> Self {
        Self {
            policy,
            currency,
            processing_delay,
        }
    }

    /// Create a checkout from application configuration.
    #[must_use]
    pub const fn from_config(config: &CartConfig) -> Self {
        Self::new(config.shipping, config.currency, config.checkout_delay)
    }

    /// Price the cart as it stands, without placing anything.
    #[must_use]
    pub fn summarize(&self, cart: &CartContext) -> OrderSummary {
        OrderSummary::from_items(&cart.items(), &self.policy, self.currency)
    }

    /// Place an order for everything in `cart`.
    ///
    /// The summary is taken when the order is submitted. After the
    /// processing delay the cart is cleared.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::EmptyCart` if there is nothing to order.
    #[instrument(skip(self, cart, ship_to), fields(payment = payment_method.code()))]
    pub async fn place_order(
        &self,
        cart: &CartContext,
        ship_to: ShippingDetails,
        payment_method: PaymentMethod,
    ) -> Result<OrderConfirmation, CheckoutError> {
        let summary = self.summarize(cart);
        if summary.lines.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        if !self.processing_delay.is_zero() {
            tokio::time::sleep(self.processing_delay).await;
        }

        cart.clear_cart();

        let confirmation = OrderConfirmation {
            order_id: Uuid::new_v4(),
            placed_at: Utc::now(),
            payment_method,
            ship_to,
            summary,
        };

        info!(
            order_id = %confirmation.order_id,
            items = confirmation.summary.item_count,
            total = %confirmation.summary.total,
            "Order placed"
        );

        Ok(confirmation)
    }
}
