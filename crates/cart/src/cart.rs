use serde::{Deserialize, Serialize};

use empower_core::{ProductKey, SessionId};
use empower_products::Product;

/// Cart line: a product snapshot and how many times it was added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub product: Product,
    pub quantity: u32,
}

impl CartLine {
    /// Line total, if the product's price is a plain unsigned integer.
    pub fn total(&self) -> Option<u64> {
        let unit: u64 = self.product.price().trim().parse().ok()?;
        unit.checked_mul(u64::from(self.quantity))
    }
}

/// Cart subtotal over the lines whose price could be read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subtotal {
    pub amount: u64,
    /// Lines left out of `amount` because their price is not numeric.
    pub unpriced_lines: usize,
}

/// Session-scoped shopping cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cart {
    session_id: SessionId,
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new(session_id: SessionId) -> Self {
        Self {
            session_id,
            lines: Vec::new(),
        }
    }

    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total number of units across all lines.
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|l| u64::from(l.quantity)).sum()
    }

    /// Add one unit of `product`. Lines are keyed by store key, so two rows
    /// sharing a `productId` stay separate. Returns the line's new quantity.
    pub fn add_product(&mut self, product: &Product) -> u32 {
        if let Some(line) = self.lines.iter_mut().find(|l| l.product.key() == product.key()) {
            line.quantity = line.quantity.saturating_add(1);
            return line.quantity;
        }

        self.lines.push(CartLine {
            product: product.clone(),
            quantity: 1,
        });
        1
    }

    /// Remove a whole line.
    pub fn remove(&mut self, key: ProductKey) -> Option<CartLine> {
        let idx = self.lines.iter().position(|l| l.product.key() == key)?;
        Some(self.lines.remove(idx))
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn subtotal(&self) -> Subtotal {
        self.lines.iter().fold(Subtotal::default(), |mut acc, line| {
            match line.total() {
                Some(total) => acc.amount = acc.amount.saturating_add(total),
                None => acc.unpriced_lines += 1,
            }
            acc
        })
    }
}
