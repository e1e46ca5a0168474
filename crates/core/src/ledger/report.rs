//! Period report and overdue detection over a set of ledgers.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ledger_model::{FeeStatus, FinancialStatus, Ledger};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRow {
    pub case_id: String,
    pub case_number: Option<String>,
    pub client_name: Option<String>,
    pub fees: Decimal,
    pub expenses: Decimal,
    pub received: Decimal,
    pub balance: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialReport {
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub total_fees: Decimal,
    pub total_expenses: Decimal,
    pub total_received: Decimal,
    pub pending_balance: Decimal,
    pub rows: Vec<ReportRow>,
    pub generated_at: DateTime<Utc>,
}

/// Builds the report for `[start, end]`, both ends inclusive.
///
/// A ledger belongs to the period when the contracted date of its first fee
/// falls inside it. Ledgers without fees are left out.
pub fn build_report(ledgers: &[Ledger], start: NaiveDate, end: NaiveDate) -> FinancialReport {
    let rows: Vec<ReportRow> = ledgers
        .iter()
        .filter(|l| {
            l.reference_date()
                .is_some_and(|date| date >= start && date <= end)
        })
        .map(|l| ReportRow {
            case_id: l.case_id.clone(),
            case_number: None,
            client_name: None,
            fees: l.total_fees(),
            expenses: l.total_expenses(),
            received: l.total_payments(),
            balance: l.receivable_balance,
        })
        .collect();

    FinancialReport {
        period_start: start,
        period_end: end,
        total_fees: rows.iter().map(|r| r.fees).sum(),
        total_expenses: rows.iter().map(|r| r.expenses).sum(),
        total_received: rows.iter().map(|r| r.received).sum(),
        pending_balance: rows.iter().map(|r| r.balance.max(Decimal::ZERO)).sum(),
        rows,
        generated_at: Utc::now(),
    }
}

/// Ledgers still open that hold an unpaid fee due before `today`.
pub fn overdue_ledgers(ledgers: &[Ledger], today: NaiveDate) -> Vec<Ledger> {
    ledgers
        .iter()
        .filter(|l| l.financial_status != FinancialStatus::Settled)
        .filter(|l| {
            l.fees.iter().any(|f| {
                f.status != FeeStatus::Paid && f.due_date.is_some_and(|due| due < today)
            })
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::calculator::recompute;
    use crate::ledger::ledger_model::{Fee, FeeKind, Payment, PaymentKind, PaymentMethod};
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn fee(amount: Decimal, contracted: NaiveDate, due: Option<NaiveDate>) -> Fee {
        Fee {
            id: uuid::Uuid::new_v4().to_string(),
            kind: FeeKind::Fixed,
            description: "Fee".to_string(),
            amount,
            percentage: None,
            contracted_date: contracted,
            due_date: due,
            status: FeeStatus::Pending,
        }
    }

    fn paid(amount: Decimal) -> Payment {
        Payment {
            id: uuid::Uuid::new_v4().to_string(),
            kind: PaymentKind::FeePayment,
            description: "Payment".to_string(),
            amount,
            paid_date: date(2024, 3, 1),
            method: PaymentMethod::Cash,
            notes: None,
        }
    }

    fn ledger(case_id: &str, fees: Vec<Fee>, payments: Vec<Payment>) -> Ledger {
        let mut ledger = Ledger::new(case_id, dec!(0));
        ledger.fees = fees;
        ledger.payments = payments;
        recompute(&mut ledger);
        ledger
    }

    #[test]
    fn test_report_selects_by_first_fee_date() {
        let ledgers = vec![
            ledger(
                "in",
                vec![fee(dec!(1000), date(2024, 2, 10), None)],
                vec![paid(dec!(400))],
            ),
            ledger(
                "after",
                vec![fee(dec!(500), date(2024, 7, 1), None)],
                vec![],
            ),
            ledger("empty", vec![], vec![]),
        ];

        let report = build_report(&ledgers, date(2024, 1, 1), date(2024, 6, 30));

        assert_eq!(report.rows.len(), 1);
        assert_eq!(report.rows[0].case_id, "in");
        assert_eq!(report.total_fees, dec!(1000));
        assert_eq!(report.total_received, dec!(400));
        assert_eq!(report.pending_balance, dec!(600));
    }

    #[test]
    fn test_report_period_is_inclusive() {
        let ledgers = vec![ledger(
            "edge",
            vec![fee(dec!(10), date(2024, 6, 30), None)],
            vec![],
        )];
        let report = build_report(&ledgers, date(2024, 6, 1), date(2024, 6, 30));
        assert_eq!(report.rows.len(), 1);
    }

    #[test]
    fn test_overdue_detection() {
        let today = date(2024, 5, 1);
        let mut paid_fee = fee(dec!(100), date(2024, 1, 1), Some(date(2024, 2, 1)));
        paid_fee.status = FeeStatus::Paid;

        let ledgers = vec![
            ledger(
                "late",
                vec![fee(dec!(100), date(2024, 1, 1), Some(date(2024, 4, 30)))],
                vec![],
            ),
            ledger(
                "due-today",
                vec![fee(dec!(100), date(2024, 1, 1), Some(today))],
                vec![],
            ),
            ledger(
                "settled",
                vec![fee(dec!(100), date(2024, 1, 1), Some(date(2024, 2, 1)))],
                vec![paid(dec!(100))],
            ),
            ledger(
                "marked-paid",
                vec![paid_fee, fee(dec!(5), date(2024, 1, 1), None)],
                vec![],
            ),
        ];

        let overdue: Vec<_> = overdue_ledgers(&ledgers, today)
            .into_iter()
            .map(|l| l.case_id)
            .collect();
        assert_eq!(overdue, vec!["late".to_string()]);
    }
}
