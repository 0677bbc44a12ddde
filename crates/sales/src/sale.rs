use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use forecourt_core::{DomainError, Money, ProductId};
use forecourt_ledger::{AccountNumber, PostingInstruction, PostingPlan, TransactionType};

use crate::shift::{DispenserReading, Shift, Volume};

/// Sale value of a fuel volume at a per-litre price, rounded half-up to the
/// smallest money unit.
///
/// The rounding happens once, here, when the domain transaction is priced;
/// the ledger then only ever sees already-quantized amounts.
pub fn fuel_amount(volume: Volume, unit_price: Money) -> Money {
    let minor = (volume.centilitres() as i128 * unit_price.minor_units() + 50) / 100;
    Money::from_minor(minor)
}

/// Cash fuel sale for one dispenser over one shift.
///
/// Settles immediately: its ledger effect is a single Cr on the station
/// cash account (money in).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftSale {
    pub product: ProductId,
    pub shift: Shift,
    pub reading: DispenserReading,
    pub unit_price: Money,
    pub cash_account: AccountNumber,
    pub date: NaiveDate,
    pub time: NaiveTime,
}

impl ShiftSale {
    pub fn new(
        product: ProductId,
        shift: Shift,
        reading: DispenserReading,
        unit_price: Money,
        cash_account: AccountNumber,
        date: NaiveDate,
        time: NaiveTime,
    ) -> Result<Self, DomainError> {
        if !unit_price.is_positive() {
            return Err(DomainError::validation("unit price must be positive"));
        }
        if reading.volume_sold().is_zero() {
            return Err(DomainError::validation(
                "shift sale requires a dispensed volume",
            ));
        }
        Ok(Self {
            product,
            shift,
            reading,
            unit_price,
            cash_account,
            date,
            time,
        })
    }

    pub fn volume(&self) -> Volume {
        self.reading.volume_sold()
    }

    pub fn amount(&self) -> Money {
        fuel_amount(self.volume(), self.unit_price)
    }

    pub fn posting_plan(&self) -> PostingPlan {
        PostingPlan::new(self.date, self.time).push(PostingInstruction::new(
            self.cash_account,
            TransactionType::Cr,
            self.amount(),
            format!(
                "fuel sale, {} shift, dispenser {} ({})",
                self.shift,
                self.reading.dispenser,
                self.volume()
            ),
        ))
    }
}

/// Fuel sale on account: the customer takes delivery now and owes the value.
///
/// Ledger effect is a Dr on the customer's account, raising the derived
/// receivable; the later payment is a Cr voucher leg against the same
/// account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditSale {
    pub customer: AccountNumber,
    pub product: ProductId,
    pub volume: Volume,
    pub unit_price: Money,
    pub date: NaiveDate,
    pub time: NaiveTime,
}

impl CreditSale {
    pub fn new(
        customer: AccountNumber,
        product: ProductId,
        volume: Volume,
        unit_price: Money,
        date: NaiveDate,
        time: NaiveTime,
    ) -> Result<Self, DomainError> {
        if !unit_price.is_positive() {
            return Err(DomainError::validation("unit price must be positive"));
        }
        if volume.is_zero() {
            return Err(DomainError::validation("credit sale requires a volume"));
        }
        Ok(Self {
            customer,
            product,
            volume,
            unit_price,
            date,
            time,
        })
    }

    pub fn amount(&self) -> Money {
        fuel_amount(self.volume, self.unit_price)
    }

    pub fn posting_plan(&self) -> PostingPlan {
        PostingPlan::new(self.date, self.time).push(PostingInstruction::new(
            self.customer,
            TransactionType::Dr,
            self.amount(),
            format!("credit fuel sale ({})", self.volume),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shift::MeterReading;
    use proptest::prelude::*;

    fn ymd_hms() -> (NaiveDate, NaiveTime) {
        (
            NaiveDate::from_ymd_opt(2024, 4, 10).unwrap(),
            NaiveTime::from_hms_opt(6, 0, 0).unwrap(),
        )
    }

    fn reading(litres: u64) -> DispenserReading {
        DispenserReading::new(
            "D-1",
            MeterReading::from_centilitres(0),
            MeterReading::from_centilitres(litres * 100),
        )
        .unwrap()
    }

    #[test]
    fn fuel_amount_multiplies_exactly_for_whole_litres() {
        // 150 L at 87.25 per litre = 13087.50
        let amount = fuel_amount(Volume::from_litres(150), "87.25".parse().unwrap());
        assert_eq!(amount, "13087.50".parse().unwrap());
    }

    #[test]
    fn fuel_amount_rounds_half_up_to_the_paisa() {
        // 0.01 L at 87.25 per litre = 0.8725 -> 0.87
        let amount = fuel_amount(Volume::from_centilitres(1), "87.25".parse().unwrap());
        assert_eq!(amount, "0.87".parse().unwrap());
        // 0.02 L at 87.25 = 1.745 -> 1.75
        let amount = fuel_amount(Volume::from_centilitres(2), "87.25".parse().unwrap());
        assert_eq!(amount, "1.75".parse().unwrap());
    }

    #[test]
    fn shift_sale_credits_the_cash_account() {
        let (date, time) = ymd_hms();
        let sale = ShiftSale::new(
            ProductId::new(),
            Shift::Morning,
            reading(200),
            "100.00".parse().unwrap(),
            AccountNumber::FIRST,
            date,
            time,
        )
        .unwrap();

        let plan = sale.posting_plan();
        plan.validate().unwrap();
        assert_eq!(plan.instructions.len(), 1);
        let leg = &plan.instructions[0];
        assert_eq!(leg.account, AccountNumber::FIRST);
        assert_eq!(leg.transaction_type, TransactionType::Cr);
        assert_eq!(leg.amount, Money::from_major(20_000));
    }

    #[test]
    fn shift_sale_rejects_zero_volume_and_bad_price() {
        let (date, time) = ymd_hms();
        assert!(ShiftSale::new(
            ProductId::new(),
            Shift::Night,
            reading(0),
            "100.00".parse().unwrap(),
            AccountNumber::FIRST,
            date,
            time,
        )
        .is_err());

        assert!(ShiftSale::new(
            ProductId::new(),
            Shift::Night,
            reading(10),
            Money::ZERO,
            AccountNumber::FIRST,
            date,
            time,
        )
        .is_err());
    }

    #[test]
    fn credit_sale_debits_the_customer() {
        let (date, time) = ymd_hms();
        let customer = AccountNumber::FIRST.next().unwrap();
        let sale = CreditSale::new(
            customer,
            ProductId::new(),
            Volume::from_litres(50),
            "110.50".parse().unwrap(),
            date,
            time,
        )
        .unwrap();

        let plan = sale.posting_plan();
        plan.validate().unwrap();
        let leg = &plan.instructions[0];
        assert_eq!(leg.account, customer);
        assert_eq!(leg.transaction_type, TransactionType::Dr);
        assert_eq!(leg.amount, "5525.00".parse().unwrap());
    }

    proptest! {
        /// Property: pricing whole litres at a whole-paisa rate never loses
        /// or invents a paisa.
        #[test]
        fn whole_litre_pricing_is_exact(
            litres in 1u64..100_000u64,
            price_minor in 1i128..50_000i128,
        ) {
            let amount = fuel_amount(Volume::from_litres(litres), Money::from_minor(price_minor));
            prop_assert_eq!(amount.minor_units(), litres as i128 * price_minor);
        }
    }
}
