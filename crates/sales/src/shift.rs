use serde::{Deserialize, Serialize};

use forecourt_core::{DomainError, ValueObject};

/// Work shift a sale is booked under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shift {
    Morning,
    Evening,
    Night,
}

impl core::fmt::Display for Shift {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            Shift::Morning => "morning",
            Shift::Evening => "evening",
            Shift::Night => "night",
        })
    }
}

/// A dispenser totalizer value in centilitres (2-decimal litres).
///
/// Meters are cumulative and only move forward; volumes come from reading
/// differences, never from re-entered totals.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct MeterReading(u64);

impl MeterReading {
    pub const fn from_centilitres(cl: u64) -> Self {
        Self(cl)
    }

    pub const fn centilitres(&self) -> u64 {
        self.0
    }
}

impl ValueObject for MeterReading {}

impl core::fmt::Display for MeterReading {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

/// A dispensed volume in centilitres.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Volume(u64);

impl Volume {
    pub const fn from_centilitres(cl: u64) -> Self {
        Self(cl)
    }

    pub const fn from_litres(litres: u64) -> Self {
        Self(litres * 100)
    }

    pub const fn centilitres(&self) -> u64 {
        self.0
    }

    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Whole litres, truncated (stock is tracked in whole litres).
    pub const fn whole_litres(&self) -> i64 {
        (self.0 / 100) as i64
    }
}

impl ValueObject for Volume {}

impl core::fmt::Display for Volume {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}.{:02} L", self.0 / 100, self.0 % 100)
    }
}

/// Opening/closing meter pair for one dispenser over one shift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispenserReading {
    pub dispenser: String,
    pub opening: MeterReading,
    pub closing: MeterReading,
}

impl DispenserReading {
    pub fn new(
        dispenser: impl Into<String>,
        opening: MeterReading,
        closing: MeterReading,
    ) -> Result<Self, DomainError> {
        let dispenser = dispenser.into();
        if dispenser.trim().is_empty() {
            return Err(DomainError::validation("dispenser name cannot be empty"));
        }
        if closing < opening {
            return Err(DomainError::invariant(
                "closing reading cannot be below opening reading",
            ));
        }
        Ok(Self {
            dispenser,
            opening,
            closing,
        })
    }

    pub fn volume_sold(&self) -> Volume {
        Volume::from_centilitres(self.closing.centilitres() - self.opening.centilitres())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn volume_sold_is_the_meter_difference() {
        let r = DispenserReading::new(
            "D-1",
            MeterReading::from_centilitres(1_234_500),
            MeterReading::from_centilitres(1_250_000),
        )
        .unwrap();
        assert_eq!(r.volume_sold(), Volume::from_centilitres(15_500));
        assert_eq!(r.volume_sold().to_string(), "155.00 L");
    }

    #[test]
    fn backwards_meter_is_rejected() {
        let err = DispenserReading::new(
            "D-1",
            MeterReading::from_centilitres(100),
            MeterReading::from_centilitres(99),
        )
        .unwrap_err();
        match err {
            DomainError::InvariantViolation(_) => {}
            _ => panic!("expected InvariantViolation"),
        }
    }

    #[test]
    fn empty_dispenser_name_is_rejected() {
        assert!(DispenserReading::new(
            " ",
            MeterReading::from_centilitres(0),
            MeterReading::from_centilitres(1),
        )
        .is_err());
    }

    #[test]
    fn unchanged_meter_is_a_zero_volume() {
        let r = DispenserReading::new(
            "D-2",
            MeterReading::from_centilitres(500),
            MeterReading::from_centilitres(500),
        )
        .unwrap();
        assert!(r.volume_sold().is_zero());
    }
}
