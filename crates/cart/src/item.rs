//! Products and cart line items.

use artcrafts_core::{ProductId, Quantity};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A catalog product as handed to the cart by a product card.
///
/// Only `id`, `name` and `price` are required. Unknown fields in a catalog
/// payload are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Product {
    /// A product with only the required fields set.
    #[must_use]
    pub fn new(id: impl Into<ProductId>, name: impl Into<String>, price: Decimal) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            image: None,
            city: String::new(),
            state: String::new(),
            tags: Vec::new(),
        }
    }

    /// Set the origin city and state.
    #[must_use]
    pub fn with_origin(mut self, city: impl Into<String>, state: impl Into<String>) -> Self {
        self.city = city.into();
        self.state = state.into();
        self
    }

    /// Set the image reference.
    #[must_use]
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// Set the tags.
    #[must_use]
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }
}

/// One product line in the cart.
///
/// Display fields are a snapshot of the product taken when it was first
/// added; later catalog changes do not reach the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLineItem {
    pub id: ProductId,
    pub name: String,
    pub price: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub quantity: Quantity,
}

impl CartLineItem {
    /// A new line holding one unit of `product`.
    #[must_use]
    pub fn from_product(product: &Product) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            price: product.price,
            image: product.image.clone(),
            city: product.city.clone(),
            state: product.state.clone(),
            tags: product.tags.clone(),
            quantity: Quantity::ONE,
        }
    }

    /// `price × quantity` for this line, saturating at [`Decimal::MAX`].
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price.saturating_mul(Decimal::from(self.quantity.get()))
    }

    /// `price × quantity`, or `None` if it does not fit in a [`Decimal`].
    #[must_use]
    pub fn checked_line_total(&self) -> Option<Decimal> {
        self.price.checked_mul(Decimal::from(self.quantity.get()))
    }

    /// The file name of the image reference, the way the cart page shows it.
    #[must_use]
    pub fn image_name(&self) -> Option<&str> {
        self.image
            .as_deref()
            .and_then(|image| image.rsplit('/').next())
    }
}

/// Sum of line totals, or `None` if any product or the sum overflows.
#[must_use]
pub fn checked_total(items: &[CartLineItem]) -> Option<Decimal> {
    items.iter().try_fold(Decimal::ZERO, |total, item| {
        total.checked_add(item.checked_line_total()?)
    })
}
