//! Cart commands.
//!
//! # Usage
//!
//! ```bash
//! artcrafts cart add --id 3 --name "Brass Diya" --price 250
//! artcrafts cart remove 3
//! artcrafts cart set-qty 3 2
//! artcrafts cart clear
//! artcrafts cart show --json
//! ```

use artcrafts_cart::{
    CartConfig, CartContext, CartLineItem, CartStore, Checkout, OrderSummary, Product,
    SharedStorage,
};
use artcrafts_core::{CurrencyCode, Price, ProductId};
use tracing::info;

/// Number of tags shown per line, matching the cart page.
const TAGS_SHOWN: usize = 2;

/// Open the configured cart.
pub fn open(storage: &SharedStorage, config: &CartConfig) -> CartContext {
    CartContext::new(CartStore::load(storage.clone(), &config.cart_key))
}

/// Add one unit of `product`.
pub fn add(cart: &CartContext, product: &Product) {
    cart.add_to_cart(product);
    info!(product_id = %product.id, "Added to cart");
    print_badge(cart);
}

/// Remove a product's line.
pub fn remove(cart: &CartContext, id: &ProductId) {
    cart.remove_from_cart(id);
    print_badge(cart);
}

/// Set a product's quantity.
pub fn set_quantity(cart: &CartContext, id: &ProductId, quantity: i64) {
    cart.update_quantity(id, quantity);
    print_badge(cart);
}

/// Empty the cart.
pub fn clear(cart: &CartContext) {
    cart.clear_cart();
    info!("Cart cleared");
    print_badge(cart);
}

/// Print the cart with its order summary.
///
/// # Errors
///
/// Returns an error if JSON output was requested and serialization fails.
pub fn show(cart: &CartContext, config: &CartConfig, json: bool) -> Result<(), serde_json::Error> {
    let snapshot = cart.snapshot();
    let summary = Checkout::from_config(config).summarize(cart);

    let output = if json {
        serde_json::to_string_pretty(&serde_json::json!({
            "items": snapshot.items,
            "summary": summary,
        }))?
    } else {
        render_cart(&snapshot.items, &summary, config.currency)
    };

    #[allow(clippy::print_stdout)]
    {
        println!("{output}");
    }
    Ok(())
}

fn print_badge(cart: &CartContext) {
    let count = cart.cart_items_count();
    #[allow(clippy::print_stdout)]
    {
        println!("{}", badge_text(count));
    }
}

fn badge_text(count: u64) -> String {
    match count {
        0 => "Cart is empty".to_string(),
        1 => "1 item in cart".to_string(),
        n => format!("{n} items in cart"),
    }
}

fn render_cart(items: &[CartLineItem], summary: &OrderSummary, currency: CurrencyCode) -> String {
    if items.is_empty() {
        return "Your cart is empty. Add some handicrafts to get started.".to_string();
    }

    let mut out = String::new();
    for item in items {
        out.push_str(&item.name);
        if !item.city.is_empty() || !item.state.is_empty() {
            out.push_str(&format!(" ({}, {})", item.city, item.state));
        }
        let tags: Vec<&str> = item.tags.iter().take(TAGS_SHOWN).map(String::as_str).collect();
        if !tags.is_empty() {
            out.push_str(&format!(" [{}]", tags.join(", ")));
        }
        out.push('\n');
        out.push_str(&format!(
            "  [{}] {} x {} = {}\n",
            item.id,
            Price::new(item.price, currency),
            item.quantity,
            Price::new(item.line_total(), currency),
        ));
    }

    out.push_str(&format!("\nSubtotal: {}\n", summary.subtotal));
    out.push_str(&format!("Shipping: {}\n", summary.shipping));
    out.push_str(&format!("Total:    {}", summary.total));
    out
}
