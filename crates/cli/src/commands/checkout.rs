//! Simulated checkout command.

use artcrafts_cart::{
    CartConfig, CartContext, Checkout, OrderConfirmation, PaymentMethod, ShippingForm,
};
use tracing::info;

/// Validate the shipping form and place an order for the whole cart.
///
/// # Errors
///
/// Returns an error if the form is invalid, the cart is empty, or JSON
/// output fails.
pub async fn place_order(
    cart: &CartContext,
    config: &CartConfig,
    form: ShippingForm,
    payment: PaymentMethod,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let ship_to = form.validate()?;

    info!(
        delay = ?config.checkout_delay,
        "Processing order"
    );
    let confirmation = Checkout::from_config(config)
        .place_order(cart, ship_to, payment)
        .await?;

    let output = if json {
        serde_json::to_string_pretty(&confirmation)?
    } else {
        render_confirmation(&confirmation)
    };

    #[allow(clippy::print_stdout)]
    {
        println!("{output}");
    }
    Ok(())
}

fn render_confirmation(confirmation: &OrderConfirmation) -> String {
    let payment = match confirmation.payment_method {
        PaymentMethod::CashOnDelivery => "Cash on Delivery",
        PaymentMethod::Online => "Online Payment",
    };
    let ship_to = &confirmation.ship_to;
    format!(
        "Order placed successfully!\n\
         Order:    {}\n\
         Items:    {}\n\
         Total:    {}\n\
         Payment:  {payment}\n\
         Ship to:  {}, {}, {}, {} {}",
        confirmation.order_id,
        confirmation.summary.item_count,
        confirmation.summary.total,
        ship_to.name,
        ship_to.address,
        ship_to.city,
        ship_to.state,
        ship_to.pincode,
    )
}
