//! Domain types for line items and computed totals.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use saral_shared::types::money::round_display;

/// Kind of a priced row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    /// A service rendered (installation, repair, visit).
    Service,
    /// A physical product.
    Product,
}

impl ItemKind {
    /// Returns the string representation of the kind.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Service => "service",
            Self::Product => "product",
        }
    }

    /// Parses a kind from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "service" => Some(Self::Service),
            "product" => Some(Self::Product),
            _ => None,
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How a line discount is expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscountType {
    /// Discount is a fixed monetary amount.
    Fixed,
    /// Discount is a percentage of the line subtotal (0–100).
    Percentage,
}

impl fmt::Display for DiscountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed => write!(f, "fixed"),
            Self::Percentage => write!(f, "percentage"),
        }
    }
}

/// A named tax rate applied to a line's taxable amount.
///
/// Component names are unique per line (e.g. CGST + SGST, or a single
/// Tax entry); order is preserved through to the computed amounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxComponent {
    /// Component name (e.g. "CGST").
    pub name: String,
    /// Percentage rate (e.g. 9 for 9%).
    pub rate: Decimal,
}

impl TaxComponent {
    /// Creates a new tax component.
    #[must_use]
    pub fn new(name: impl Into<String>, rate: Decimal) -> Self {
        Self {
            name: name.into(),
            rate,
        }
    }
}

/// One priced row within a quotation or invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Service or product.
    pub kind: ItemKind,
    /// Item name.
    pub name: String,
    /// Optional free-form description.
    pub description: Option<String>,
    /// Quantity (>= 0; zero contributes nothing but is valid).
    pub quantity: Decimal,
    /// Price per unit (>= 0).
    pub unit_price: Decimal,
    /// How the discount value is interpreted.
    pub discount_type: DiscountType,
    /// Discount amount or percentage (>= 0; percentage capped at 100).
    pub discount_value: Decimal,
    /// Tax components applied to the taxable amount.
    pub tax_components: Vec<TaxComponent>,
}

/// A computed tax amount for one component of one line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxAmount {
    /// Component name, copied from the line item.
    pub name: String,
    /// Computed amount (taxable × rate / 100), full precision.
    pub amount: Decimal,
}

/// Computed totals for a single line item. Full precision; rounding
/// happens at the persistence/display boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineTotals {
    /// quantity × unit price.
    pub subtotal: Decimal,
    /// Discount applied, clamped to `[0, subtotal]`.
    pub discount: Decimal,
    /// subtotal − discount.
    pub taxable: Decimal,
    /// Per-component tax amounts, in component order.
    pub tax_amounts: Vec<TaxAmount>,
    /// taxable + Σ tax amounts.
    pub total: Decimal,
}

/// Computed totals for a whole document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentTotals {
    /// Σ line subtotals.
    pub subtotal: Decimal,
    /// Σ line discounts.
    pub discount_total: Decimal,
    /// Σ of every tax component amount.
    pub tax_total: Decimal,
    /// Σ line totals; the payable amount.
    pub grand_total: Decimal,
}

impl DocumentTotals {
    /// Returns a copy rounded to the display/persistence scale.
    #[must_use]
    pub fn rounded(&self) -> Self {
        Self {
            subtotal: round_display(self.subtotal),
            discount_total: round_display(self.discount_total),
            tax_total: round_display(self.tax_total),
            grand_total: round_display(self.grand_total),
        }
    }
}
