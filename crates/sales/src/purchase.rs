use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use forecourt_core::{DomainError, Money, ProductId};
use forecourt_ledger::{
    AccountNumber, PaymentMeta, PostingInstruction, PostingPlan, TransactionType,
};

use crate::sale::fuel_amount;
use crate::shift::Volume;

/// How a fuel delivery is settled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Settlement {
    /// Paid on delivery out of a cash/bank account (Dr: money out).
    Cash {
        account: AccountNumber,
        payment: Option<PaymentMeta>,
    },
    /// Taken on supplier credit (Cr on the supplier account: we owe more).
    OnCredit,
}

/// Fuel delivery from a supplier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Purchase {
    pub supplier: AccountNumber,
    pub product: ProductId,
    pub volume: Volume,
    pub unit_cost: Money,
    pub settlement: Settlement,
    pub date: NaiveDate,
    pub time: NaiveTime,
}

impl Purchase {
    pub fn new(
        supplier: AccountNumber,
        product: ProductId,
        volume: Volume,
        unit_cost: Money,
        settlement: Settlement,
        date: NaiveDate,
        time: NaiveTime,
    ) -> Result<Self, DomainError> {
        if !unit_cost.is_positive() {
            return Err(DomainError::validation("unit cost must be positive"));
        }
        if volume.is_zero() {
            return Err(DomainError::validation("purchase requires a volume"));
        }
        Ok(Self {
            supplier,
            product,
            volume,
            unit_cost,
            settlement,
            date,
            time,
        })
    }

    pub fn amount(&self) -> Money {
        fuel_amount(self.volume, self.unit_cost)
    }

    pub fn posting_plan(&self) -> PostingPlan {
        let description = format!("fuel purchase ({})", self.volume);
        let instruction = match &self.settlement {
            Settlement::Cash { account, payment } => {
                let leg = PostingInstruction::new(
                    *account,
                    TransactionType::Dr,
                    self.amount(),
                    description,
                );
                match payment {
                    Some(meta) => leg.with_payment(meta.clone()),
                    None => leg,
                }
            }
            Settlement::OnCredit => PostingInstruction::new(
                self.supplier,
                TransactionType::Cr,
                self.amount(),
                description,
            ),
        };
        PostingPlan::new(self.date, self.time).push(instruction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd_hms() -> (NaiveDate, NaiveTime) {
        (
            NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(),
            NaiveTime::from_hms_opt(14, 30, 0).unwrap(),
        )
    }

    fn supplier() -> AccountNumber {
        "1000000000020".parse().unwrap()
    }

    fn cash() -> AccountNumber {
        "1000000000001".parse().unwrap()
    }

    #[test]
    fn cash_purchase_debits_the_paying_account() {
        let (date, time) = ymd_hms();
        let p = Purchase::new(
            supplier(),
            ProductId::new(),
            Volume::from_litres(5_000),
            "95.00".parse().unwrap(),
            Settlement::Cash {
                account: cash(),
                payment: Some(PaymentMeta::Cheque {
                    number: "CHQ-3341".to_string(),
                    bank: "City Bank".to_string(),
                }),
            },
            date,
            time,
        )
        .unwrap();

        let plan = p.posting_plan();
        plan.validate().unwrap();
        let leg = &plan.instructions[0];
        assert_eq!(leg.account, cash());
        assert_eq!(leg.transaction_type, TransactionType::Dr);
        assert_eq!(leg.amount, "475000.00".parse().unwrap());
        assert!(leg.payment.is_some());
    }

    #[test]
    fn credit_purchase_credits_the_supplier() {
        let (date, time) = ymd_hms();
        let p = Purchase::new(
            supplier(),
            ProductId::new(),
            Volume::from_litres(1_000),
            "95.00".parse().unwrap(),
            Settlement::OnCredit,
            date,
            time,
        )
        .unwrap();

        let leg = &p.posting_plan().instructions[0];
        assert_eq!(leg.account, supplier());
        assert_eq!(leg.transaction_type, TransactionType::Cr);
        assert_eq!(leg.amount, "95000.00".parse().unwrap());
    }

    #[test]
    fn zero_volume_or_cost_is_rejected() {
        let (date, time) = ymd_hms();
        assert!(Purchase::new(
            supplier(),
            ProductId::new(),
            Volume::from_litres(0),
            "95.00".parse().unwrap(),
            Settlement::OnCredit,
            date,
            time,
        )
        .is_err());

        assert!(Purchase::new(
            supplier(),
            ProductId::new(),
            Volume::from_litres(10),
            Money::ZERO,
            Settlement::OnCredit,
            date,
            time,
        )
        .is_err());
    }
}
