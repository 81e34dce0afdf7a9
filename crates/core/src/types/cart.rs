//! Priced cart views.

use serde::{Deserialize, Serialize};

use super::{Price, Quantity, Sku, SkuId};

/// One priced line of a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub sku_id: SkuId,
    pub name: String,
    pub unit_price: Price,
    pub quantity: Quantity,
    pub line_total: Price,
}

impl CartLine {
    /// Price `quantity` units of `sku`.
    ///
    /// Returns `None` if the line total overflows.
    #[must_use]
    pub fn new(sku_id: SkuId, sku: Sku, quantity: Quantity) -> Option<Self> {
        let line_total = sku.price.checked_times(quantity)?;
        Some(Self {
            sku_id,
            name: sku.name,
            unit_price: sku.price,
            quantity,
            line_total,
        })
    }
}

/// The result of viewing a cart.
///
/// An empty cart is its own variant so callers can tell "nothing in the cart"
/// apart from "everything in the cart is free".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CartSummary {
    Empty,
    Items { lines: Vec<CartLine>, total: Price },
}

impl CartSummary {
    /// Build a summary from priced lines, summing the grand total.
    ///
    /// Returns `None` if the total overflows.
    #[must_use]
    pub fn from_lines(lines: Vec<CartLine>) -> Option<Self> {
        if lines.is_empty() {
            return Some(Self::Empty);
        }
        let total = lines
            .iter()
            .try_fold(Price::ZERO, |acc, line| acc.checked_add(line.line_total))?;
        Some(Self::Items { lines, total })
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Grand total, or `None` for an empty cart.
    #[must_use]
    pub const fn total(&self) -> Option<Price> {
        match self {
            Self::Empty => None,
            Self::Items { total, .. } => Some(*total),
        }
    }

    /// The priced lines (empty slice for an empty cart).
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        match self {
            Self::Empty => &[],
            Self::Items { lines, .. } => lines,
        }
    }

    /// Total number of units across all lines.
    ///
    /// Returns `None` if the count overflows.
    #[must_use]
    pub fn item_count(&self) -> Option<i64> {
        self.lines()
            .iter()
            .try_fold(0_i64, |acc, line| acc.checked_add(line.quantity.get()))
    }
}
