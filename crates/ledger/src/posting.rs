use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use forecourt_core::Money;

use crate::account::AccountNumber;
use crate::error::LedgerError;
use crate::transaction::{PaymentMeta, TransactionType};

/// One leg of a planned posting, before the store assigns it a sequence id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostingInstruction {
    pub account: AccountNumber,
    pub transaction_type: TransactionType,
    pub amount: Money,
    pub description: String,
    pub payment: Option<PaymentMeta>,
}

impl PostingInstruction {
    pub fn new(
        account: AccountNumber,
        transaction_type: TransactionType,
        amount: Money,
        description: impl Into<String>,
    ) -> Self {
        Self {
            account,
            transaction_type,
            amount,
            description: description.into(),
            payment: None,
        }
    }

    pub fn with_payment(mut self, payment: PaymentMeta) -> Self {
        self.payment = Some(payment);
        self
    }

    pub fn validate(&self) -> Result<(), LedgerError> {
        if !self.amount.is_positive() {
            return Err(LedgerError::InvalidAmount(self.amount));
        }
        Ok(())
    }
}

/// A dated batch of posting legs committed together or not at all.
///
/// Sales and purchases describe their ledger effect as a plan; the engine
/// posts all legs under one shared transaction id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostingPlan {
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub instructions: Vec<PostingInstruction>,
}

impl PostingPlan {
    pub fn new(date: NaiveDate, time: NaiveTime) -> Self {
        Self {
            date,
            time,
            instructions: Vec::new(),
        }
    }

    pub fn push(mut self, instruction: PostingInstruction) -> Self {
        self.instructions.push(instruction);
        self
    }

    pub fn validate(&self) -> Result<(), LedgerError> {
        if self.instructions.is_empty() {
            return Err(LedgerError::Store("posting plan has no legs".to_string()));
        }
        for instruction in &self.instructions {
            instruction.validate()?;
        }
        Ok(())
    }

    /// Whether debits equal credits within the plan.
    ///
    /// Transfers are balanced by construction; single-leg plans (a credit
    /// sale raising a receivable) are intentionally one-sided here because
    /// the counterpart lives outside the plan.
    pub fn is_balanced(&self) -> bool {
        let net: Money = self
            .instructions
            .iter()
            .map(|i| i.transaction_type.signed(i.amount))
            .sum();
        net.is_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan_date() -> (NaiveDate, NaiveTime) {
        (
            NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
            NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
        )
    }

    #[test]
    fn empty_plan_is_rejected() {
        let (d, t) = plan_date();
        assert!(PostingPlan::new(d, t).validate().is_err());
    }

    #[test]
    fn non_positive_leg_is_rejected() {
        let (d, t) = plan_date();
        let plan = PostingPlan::new(d, t).push(PostingInstruction::new(
            AccountNumber::FIRST,
            TransactionType::Cr,
            Money::ZERO,
            "zero leg",
        ));
        match plan.validate().unwrap_err() {
            LedgerError::InvalidAmount(a) => assert_eq!(a, Money::ZERO),
            other => panic!("expected InvalidAmount, got {other:?}"),
        }
    }

    #[test]
    fn balance_check_matches_leg_sum() {
        let (d, t) = plan_date();
        let a = AccountNumber::FIRST;
        let b = AccountNumber::FIRST.next().unwrap();

        let balanced = PostingPlan::new(d, t)
            .push(PostingInstruction::new(
                a,
                TransactionType::Dr,
                Money::from_major(1000),
                "out",
            ))
            .push(PostingInstruction::new(
                b,
                TransactionType::Cr,
                Money::from_major(1000),
                "in",
            ));
        assert!(balanced.is_balanced());

        let one_sided = PostingPlan::new(d, t).push(PostingInstruction::new(
            a,
            TransactionType::Dr,
            Money::from_major(700),
            "credit sale",
        ));
        assert!(!one_sided.is_balanced());
    }
}
