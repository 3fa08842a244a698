use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::define_string_enum;

define_string_enum! {
    /// 账单状态
    InvoiceStatus, "../frontend/src/types/generated/finance.ts" {
        Issued => "issued",
        Void => "void",
    }
}

define_string_enum! {
    /// 账单结余状态（由金额、已付款和到期日推导）
    BalanceStatus, "../frontend/src/types/generated/finance.ts" {
        Paid => "paid",
        Partial => "partial",
        Unpaid => "unpaid",
        Overdue => "overdue",
        Void => "void",
    }
}

// 账单
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/finance.ts")]
pub struct Invoice {
    pub id: i64,
    pub school_id: i64,
    pub student_id: i64,
    pub number: String,
    pub description: String,
    pub amount_cents: i64,
    pub currency: String,
    pub due_date: chrono::NaiveDate,
    pub status: InvoiceStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// 付款记录
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/finance.ts")]
pub struct InvoicePayment {
    pub id: i64,
    pub invoice_id: i64,
    pub amount_cents: i64,
    pub method: String,
    pub reference: Option<String>,
    pub paid_at: chrono::DateTime<chrono::Utc>,
    pub recorded_by: Option<i64>,
}

// 账单结余
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/finance.ts")]
pub struct InvoiceBalance {
    pub invoice: Invoice,
    pub paid_cents: i64,
    pub balance_cents: i64,
    pub balance_status: BalanceStatus,
}

impl InvoiceBalance {
    pub fn compute(invoice: Invoice, paid_cents: i64, today: chrono::NaiveDate) -> Self {
        let balance_cents = (invoice.amount_cents - paid_cents).max(0);
        let balance_status = if invoice.status == InvoiceStatus::Void {
            BalanceStatus::Void
        } else if balance_cents == 0 {
            BalanceStatus::Paid
        } else if invoice.due_date < today {
            BalanceStatus::Overdue
        } else if paid_cents > 0 {
            BalanceStatus::Partial
        } else {
            BalanceStatus::Unpaid
        };
        Self {
            invoice,
            paid_cents,
            balance_cents,
            balance_status,
        }
    }

    /// 仍需支付的金额；作废账单不计
    pub fn outstanding_cents(&self) -> i64 {
        match self.balance_status {
            BalanceStatus::Void | BalanceStatus::Paid => 0,
            _ => self.balance_cents,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};

    fn invoice(amount_cents: i64, due: NaiveDate, status: InvoiceStatus) -> Invoice {
        Invoice {
            id: 1,
            school_id: 1,
            student_id: 1,
            number: "INV-001".into(),
            description: "Term 1 tuition".into(),
            amount_cents,
            currency: "USD".into(),
            due_date: due,
            status,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_balance_classification() {
        let today = day(2026, 3, 1);
        let future = day(2026, 4, 1);
        let past = day(2026, 2, 1);

        let b = InvoiceBalance::compute(invoice(10_000, future, InvoiceStatus::Issued), 0, today);
        assert_eq!(b.balance_status, BalanceStatus::Unpaid);
        assert_eq!(b.balance_cents, 10_000);

        let b =
            InvoiceBalance::compute(invoice(10_000, future, InvoiceStatus::Issued), 2_500, today);
        assert_eq!(b.balance_status, BalanceStatus::Partial);
        assert_eq!(b.balance_cents, 7_500);

        let b =
            InvoiceBalance::compute(invoice(10_000, past, InvoiceStatus::Issued), 2_500, today);
        assert_eq!(b.balance_status, BalanceStatus::Overdue);

        let b =
            InvoiceBalance::compute(invoice(10_000, past, InvoiceStatus::Issued), 10_000, today);
        assert_eq!(b.balance_status, BalanceStatus::Paid);
        assert_eq!(b.outstanding_cents(), 0);
    }

    #[test]
    fn test_void_and_overpaid() {
        let today = day(2026, 3, 1);
        let b = InvoiceBalance::compute(invoice(5_000, day(2026, 1, 1), InvoiceStatus::Void), 0, today);
        assert_eq!(b.balance_status, BalanceStatus::Void);
        assert_eq!(b.outstanding_cents(), 0);

        let b = InvoiceBalance::compute(
            invoice(5_000, day(2026, 4, 1), InvoiceStatus::Issued),
            6_000,
            today,
        );
        assert_eq!(b.balance_cents, 0);
        assert_eq!(b.balance_status, BalanceStatus::Paid);
    }

    #[test]
    fn test_due_today_is_not_overdue() {
        let today = day(2026, 3, 1);
        let b = InvoiceBalance::compute(invoice(1_000, today, InvoiceStatus::Issued), 0, today);
        assert_eq!(b.balance_status, BalanceStatus::Unpaid);
    }
}
