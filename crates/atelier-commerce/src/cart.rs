//! Cart aggregate: the order-creation input.
//!
//! The cart is an explicit value passed into order creation, never ambient
//! state. It carries everything creation needs: contact details, address,
//! items with their customization input, an optional discount code and the
//! rush flag.

use crate::error::CommerceError;
use crate::ids::{CustomerId, ProductId};
use crate::pricing::CustomizationInput;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Maximum quantity allowed per cart item.
pub const MAX_QUANTITY_PER_ITEM: i64 = 999;

/// A shipping address, snapshotted onto the order at creation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Address {
    /// Recipient name.
    pub name: String,
    /// Address line 1.
    pub line1: String,
    /// Address line 2 (apt, landmark, etc.).
    pub line2: Option<String>,
    /// City.
    pub city: String,
    /// State name.
    pub state: Option<String>,
    /// Postal/PIN code.
    pub postal_code: String,
}

impl Address {
    /// Create a new address.
    pub fn new(
        name: impl Into<String>,
        line1: impl Into<String>,
        city: impl Into<String>,
        postal_code: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            line1: line1.into(),
            line2: None,
            city: city.into(),
            state: None,
            postal_code: postal_code.into(),
        }
    }

    /// Check the address has the fields shipping needs.
    pub fn is_complete(&self) -> bool {
        !self.name.is_empty()
            && !self.line1.is_empty()
            && !self.city.is_empty()
            && !self.postal_code.is_empty()
    }
}

/// What kind of cart item this is.
///
/// Custom-stitched items carry their measurements and customization input;
/// standard items carry neither. The tagged representation replaces
/// runtime presence checks on optional fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum CartItemKind {
    /// Off-the-rack item.
    Standard,
    /// Tailored item with measurements and customization choices.
    CustomStitched {
        /// Measurement name -> value in centimeters.
        measurements: BTreeMap<String, f64>,
        /// Fabric/embroidery/add-on choices, validated at pricing time.
        customization: CustomizationInput,
    },
}

/// One product/quantity unit in the cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartItem {
    /// Product being purchased.
    pub product_id: ProductId,
    /// Quantity.
    pub quantity: i64,
    /// Standard or custom-stitched.
    pub kind: CartItemKind,
}

impl CartItem {
    /// Whether this item needs tailoring.
    pub fn is_custom_stitched(&self) -> bool {
        matches!(self.kind, CartItemKind::CustomStitched { .. })
    }
}

/// The order-creation input aggregate.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Cart {
    /// Customer reference (None for guest checkout).
    pub customer_id: Option<CustomerId>,
    /// Contact email.
    pub email: String,
    /// Contact phone.
    pub phone: String,
    /// Shipping address.
    pub shipping_address: Address,
    /// Items to order.
    pub items: Vec<CartItem>,
    /// Optional discount code.
    pub discount_code: Option<String>,
    /// Expedited production, flat fee applied once per order.
    pub rush_order: bool,
}

impl Cart {
    /// Create an empty cart for a guest.
    pub fn new(email: impl Into<String>, phone: impl Into<String>, address: Address) -> Self {
        Self {
            customer_id: None,
            email: email.into(),
            phone: phone.into(),
            shipping_address: address,
            items: Vec::new(),
            discount_code: None,
            rush_order: false,
        }
    }

    /// Create a cart for an identified customer.
    pub fn for_customer(
        customer_id: CustomerId,
        email: impl Into<String>,
        phone: impl Into<String>,
        address: Address,
    ) -> Self {
        let mut cart = Self::new(email, phone, address);
        cart.customer_id = Some(customer_id);
        cart
    }

    /// Add a standard item.
    pub fn add_item(&mut self, product_id: ProductId, quantity: i64) -> Result<(), CommerceError> {
        self.push_item(CartItem {
            product_id,
            quantity,
            kind: CartItemKind::Standard,
        })
    }

    /// Add a custom-stitched item.
    pub fn add_custom_item(
        &mut self,
        product_id: ProductId,
        quantity: i64,
        measurements: BTreeMap<String, f64>,
        customization: CustomizationInput,
    ) -> Result<(), CommerceError> {
        self.push_item(CartItem {
            product_id,
            quantity,
            kind: CartItemKind::CustomStitched {
                measurements,
                customization,
            },
        })
    }

    fn push_item(&mut self, item: CartItem) -> Result<(), CommerceError> {
        if item.quantity <= 0 {
            return Err(CommerceError::InvalidQuantity(item.quantity));
        }
        if item.quantity > MAX_QUANTITY_PER_ITEM {
            return Err(CommerceError::Validation(format!(
                "quantity {} exceeds maximum {}",
                item.quantity, MAX_QUANTITY_PER_ITEM
            )));
        }
        self.items.push(item);
        Ok(())
    }

    /// Apply a discount code.
    pub fn apply_discount_code(&mut self, code: impl Into<String>) {
        self.discount_code = Some(code.into());
    }

    /// Check if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total item count (sum of quantities).
    pub fn item_count(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Whether any item needs tailoring.
    pub fn has_custom_items(&self) -> bool {
        self.items.iter().any(|i| i.is_custom_stitched())
    }

    /// Validate the cart is submittable.
    pub fn validate(&self) -> Result<(), CommerceError> {
        if self.is_empty() {
            return Err(CommerceError::Validation("cart is empty".into()));
        }
        if self.email.is_empty() {
            return Err(CommerceError::Validation("email is required".into()));
        }
        if !self.shipping_address.is_complete() {
            return Err(CommerceError::Validation(
                "shipping address is incomplete".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn address() -> Address {
        Address::new("Ayesha Khan", "12 MG Road", "Bengaluru", "560001")
    }

    #[test]
    fn test_cart_starts_empty() {
        let cart = Cart::new("a@example.com", "9876543210", address());
        assert!(cart.is_empty());
        assert!(cart.validate().is_err());
    }

    #[test]
    fn test_add_items_and_count() {
        let mut cart = Cart::new("a@example.com", "9876543210", address());
        cart.add_item(ProductId::new("prod-1"), 2).unwrap();
        cart.add_custom_item(
            ProductId::new("prod-2"),
            1,
            BTreeMap::new(),
            CustomizationInput {
                customer_fabric: true,
                ..Default::default()
            },
        )
        .unwrap();

        assert_eq!(cart.item_count(), 3);
        assert!(cart.has_custom_items());
        assert!(cart.validate().is_ok());
    }

    #[test]
    fn test_invalid_quantity_rejected() {
        let mut cart = Cart::new("a@example.com", "9876543210", address());
        assert!(cart.add_item(ProductId::new("prod-1"), 0).is_err());
        assert!(cart
            .add_item(ProductId::new("prod-1"), MAX_QUANTITY_PER_ITEM + 1)
            .is_err());
    }

    #[test]
    fn test_incomplete_address_rejected() {
        let mut cart = Cart::new("a@example.com", "9876543210", address());
        cart.add_item(ProductId::new("prod-1"), 1).unwrap();
        cart.shipping_address.postal_code.clear();
        assert!(cart.validate().is_err());
    }
}
