//! Balance and status derivation for a ledger.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::ledger_model::{Expense, Fee, FinancialStatus, Ledger, Payment};
use crate::constants::CURRENCY_DECIMAL_PLACES;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerBalances {
    pub total_fees: Decimal,
    pub total_expenses: Decimal,
    pub total_payments: Decimal,
    pub receivable_balance: Decimal,
    pub payable_balance: Decimal,
    pub financial_status: FinancialStatus,
}

pub fn compute_balances(fees: &[Fee], expenses: &[Expense], payments: &[Payment]) -> LedgerBalances {
    let total_fees: Decimal = fees.iter().map(|f| f.amount).sum();
    let total_expenses: Decimal = expenses.iter().map(|e| e.amount).sum();
    let total_payments: Decimal = payments.iter().map(|p| p.amount).sum();

    let receivable_balance = total_fees + total_expenses - total_payments;
    let payable_balance = (total_payments - total_fees - total_expenses).max(Decimal::ZERO);

    LedgerBalances {
        total_fees,
        total_expenses,
        total_payments,
        receivable_balance,
        payable_balance,
        financial_status: derive_status(receivable_balance, total_payments),
    }
}

/// Nothing left to receive is settled, even for an empty ledger.
pub fn derive_status(receivable_balance: Decimal, total_payments: Decimal) -> FinancialStatus {
    if receivable_balance <= Decimal::ZERO {
        FinancialStatus::Settled
    } else if total_payments > Decimal::ZERO {
        FinancialStatus::PartiallyPaid
    } else {
        FinancialStatus::Open
    }
}

/// Refreshes the derived fields of `ledger` from its collections.
pub fn recompute(ledger: &mut Ledger) -> LedgerBalances {
    let balances = compute_balances(&ledger.fees, &ledger.expenses, &ledger.payments);
    ledger.receivable_balance = balances.receivable_balance;
    ledger.payable_balance = balances.payable_balance;
    ledger.financial_status = balances.financial_status;
    balances
}

/// `claim_value × percentage / 100`, rounded to cents with midpoints away
/// from zero. `None` on overflow.
pub fn percentage_fee_amount(claim_value: Decimal, percentage: Decimal) -> Option<Decimal> {
    claim_value
        .checked_mul(percentage)?
        .checked_div(Decimal::ONE_HUNDRED)
        .map(|v| {
            v.round_dp_with_strategy(
                CURRENCY_DECIMAL_PLACES,
                RoundingStrategy::MidpointAwayFromZero,
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::ledger_model::{FeeKind, FeeStatus, PaymentKind, PaymentMethod};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
    }

    fn fee(amount: Decimal) -> Fee {
        Fee {
            id: "f".to_string(),
            kind: FeeKind::Fixed,
            description: "Fee".to_string(),
            amount,
            percentage: None,
            contracted_date: day(),
            due_date: None,
            status: FeeStatus::Pending,
        }
    }

    fn payment(amount: Decimal) -> Payment {
        Payment {
            id: "p".to_string(),
            kind: PaymentKind::FeePayment,
            description: "Payment".to_string(),
            amount,
            paid_date: day(),
            method: PaymentMethod::Cash,
            notes: None,
        }
    }

    #[test]
    fn test_empty_ledger_is_settled() {
        let balances = compute_balances(&[], &[], &[]);
        assert_eq!(balances.receivable_balance, Decimal::ZERO);
        assert_eq!(balances.payable_balance, Decimal::ZERO);
        assert_eq!(balances.financial_status, FinancialStatus::Settled);
    }

    #[test]
    fn test_status_transitions() {
        let open = compute_balances(&[fee(dec!(1000))], &[], &[]);
        assert_eq!(open.financial_status, FinancialStatus::Open);
        assert_eq!(open.receivable_balance, dec!(1000));

        let partial = compute_balances(&[fee(dec!(1000))], &[], &[payment(dec!(400))]);
        assert_eq!(partial.financial_status, FinancialStatus::PartiallyPaid);
        assert_eq!(partial.receivable_balance, dec!(600));

        let overpaid = compute_balances(&[fee(dec!(1000))], &[], &[payment(dec!(1250))]);
        assert_eq!(overpaid.financial_status, FinancialStatus::Settled);
        assert_eq!(overpaid.receivable_balance, dec!(-250));
        assert_eq!(overpaid.payable_balance, dec!(250));
    }

    #[test]
    fn test_percentage_rounding() {
        assert_eq!(percentage_fee_amount(dec!(50000), dec!(20)), Some(dec!(10000.00)));
        assert_eq!(percentage_fee_amount(dec!(1234.56), dec!(15)), Some(dec!(185.18)));
        // 0.125 -> 0.13, midpoint away from zero
        assert_eq!(percentage_fee_amount(dec!(1.25), dec!(10)), Some(dec!(0.13)));
        assert_eq!(percentage_fee_amount(Decimal::MAX, dec!(200)), None);
    }
}
