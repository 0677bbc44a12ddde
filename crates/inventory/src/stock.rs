use serde::{Deserialize, Serialize};

use forecourt_core::{DomainError, Entity, ProductId};

/// Inventory snapshot for one product (litres for fuel, units otherwise).
///
/// `available = current - reserved` is maintained as an invariant: every
/// mutation is checked before it is applied, so a failed call leaves the
/// level untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockLevel {
    product: ProductId,
    current: i64,
    reserved: i64,
    minimum: i64,
    maximum: i64,
}

impl StockLevel {
    pub fn new(product: ProductId, minimum: i64, maximum: i64) -> Result<Self, DomainError> {
        if minimum < 0 || maximum < minimum {
            return Err(DomainError::validation(
                "stock bounds must satisfy 0 <= minimum <= maximum",
            ));
        }
        Ok(Self {
            product,
            current: 0,
            reserved: 0,
            minimum,
            maximum,
        })
    }

    pub fn product(&self) -> ProductId {
        self.product
    }

    pub fn current(&self) -> i64 {
        self.current
    }

    pub fn reserved(&self) -> i64 {
        self.reserved
    }

    pub fn available(&self) -> i64 {
        self.current - self.reserved
    }

    pub fn is_below_minimum(&self) -> bool {
        self.current < self.minimum
    }

    fn positive(quantity: i64) -> Result<(), DomainError> {
        if quantity <= 0 {
            return Err(DomainError::validation("quantity must be positive"));
        }
        Ok(())
    }

    /// Take delivery (purchase posting).
    pub fn receive(&mut self, quantity: i64) -> Result<(), DomainError> {
        Self::positive(quantity)?;
        if self.current + quantity > self.maximum {
            return Err(DomainError::invariant(
                "delivery would exceed maximum tank capacity",
            ));
        }
        self.current += quantity;
        Ok(())
    }

    /// Dispense stock (sale posting). Reserved stock is not issuable.
    pub fn issue(&mut self, quantity: i64) -> Result<(), DomainError> {
        Self::positive(quantity)?;
        if quantity > self.available() {
            return Err(DomainError::invariant("available stock cannot go negative"));
        }
        self.current -= quantity;
        Ok(())
    }

    /// Set stock aside for a committed order.
    pub fn reserve(&mut self, quantity: i64) -> Result<(), DomainError> {
        Self::positive(quantity)?;
        if quantity > self.available() {
            return Err(DomainError::invariant("cannot reserve more than available"));
        }
        self.reserved += quantity;
        Ok(())
    }

    /// Release a reservation without issuing.
    pub fn release(&mut self, quantity: i64) -> Result<(), DomainError> {
        Self::positive(quantity)?;
        if quantity > self.reserved {
            return Err(DomainError::invariant("cannot release more than reserved"));
        }
        self.reserved -= quantity;
        Ok(())
    }
}

impl Entity for StockLevel {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.product
    }
}
