//! Integration tests for the checkout flow.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use artcrafts_cart::{
    Checkout, CheckoutError, PaymentMethod, Product, ShippingForm, ShippingPolicy,
};
use artcrafts_core::{ContactError, CurrencyCode};
use artcrafts_integration_tests::TestContext;
use rust_decimal::Decimal;

fn form() -> ShippingForm {
    ShippingForm {
        name: "Asha Verma".to_string(),
        email: "asha@example.in".to_string(),
        phone: "+91 98765-43210".to_string(),
        address: "14 Hawa Mahal Road".to_string(),
        city: "Jaipur".to_string(),
        state: "Rajasthan".to_string(),
        pincode: "302002".to_string(),
    }
}

fn checkout(delay: Duration) -> Checkout {
    Checkout::new(ShippingPolicy::default(), CurrencyCode::INR, delay)
}

#[tokio::test]
async fn test_order_clears_persisted_cart() {
    let ctx = TestContext::new();
    let cart = ctx.open_cart();
    cart.add_to_cart(&Product::new(1_i64, "Blue Pottery Vase", Decimal::new(600, 0)));
    cart.add_to_cart(&Product::new(1_i64, "Blue Pottery Vase", Decimal::new(600, 0)));

    let confirmation = checkout(Duration::ZERO)
        .place_order(&cart, form().validate().unwrap(), PaymentMethod::CashOnDelivery)
        .await
        .unwrap();

    assert_eq!(confirmation.summary.item_count, 2);
    assert_eq!(confirmation.summary.subtotal.amount, Decimal::new(1200, 0));
    assert!(confirmation.summary.has_free_shipping());
    assert_eq!(confirmation.summary.total.amount, Decimal::new(1200, 0));
    assert_eq!(confirmation.ship_to.phone.as_str(), "9876543210");

    assert!(cart.items().is_empty());
    assert!(ctx.open_cart().items().is_empty());
}

#[test]
fn test_shipping_charged_at_threshold() {
    let ctx = TestContext::new();
    let cart = ctx.open_cart();
    cart.add_to_cart(&Product::new("madhubani", "Madhubani Print", Decimal::new(1000, 0)));

    let summary = checkout(Duration::ZERO).summarize(&cart);
    assert_eq!(summary.shipping.amount, Decimal::new(99, 0));
    assert_eq!(summary.total.amount, Decimal::new(1099, 0));
}

#[tokio::test]
async fn test_empty_cart_is_rejected() {
    let ctx = TestContext::new();
    let cart = ctx.open_cart();

    let err = checkout(Duration::ZERO)
        .place_order(&cart, form().validate().unwrap(), PaymentMethod::Online)
        .await
        .unwrap_err();
    assert!(matches!(err, CheckoutError::EmptyCart));
}

#[test]
fn test_invalid_form_is_rejected() {
    let mut bad_email = form();
    bad_email.email = "asha.example.in".to_string();
    assert!(matches!(
        bad_email.validate(),
        Err(CheckoutError::InvalidContact(ContactError::MalformedEmail))
    ));

    let mut no_name = form();
    no_name.name = "   ".to_string();
    assert!(matches!(
        no_name.validate(),
        Err(CheckoutError::MissingField("name"))
    ));
}

#[tokio::test(start_paused = true)]
async fn test_cart_kept_until_processing_finishes() {
    let ctx = TestContext::new();
    let cart = ctx.open_cart();
    cart.add_to_cart(&Product::new(5_i64, "Dhokra Horse", Decimal::new(850, 0)));

    let pending = tokio::spawn({
        let cart = cart.clone();
        async move {
            checkout(Duration::from_secs(2))
                .place_order(&cart, form().validate().unwrap(), PaymentMethod::Online)
                .await
        }
    });

    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(cart.cart_items_count(), 1);

    let confirmation = pending.await.unwrap().unwrap();
    assert_eq!(confirmation.summary.total.amount, Decimal::new(949, 0));
    assert!(cart.items().is_empty());
}
