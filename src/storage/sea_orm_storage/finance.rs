//! 账单与缴费存储操作
//!
//! 账单余额视图在这里按请求聚合：已付款为缴费记录之和，余额不低于 0。

use std::collections::HashMap;

use super::{SeaOrmStorage, query_error, write_error};
use crate::entity::invoice_payments::{
    ActiveModel as PaymentActiveModel, Column as PaymentColumn, Entity as InvoicePayments,
};
use crate::entity::invoices::{ActiveModel, Column, Entity as Invoices, Model as InvoiceModel};
use crate::entity::students::{Column as StudentColumn, Entity as Students};
use crate::errors::{CampusError, Result};
use crate::models::finance::{
    entities::{Invoice, InvoiceBalance, InvoicePayment, InvoiceStatus},
    requests::{CreateInvoiceRequest, RecordPaymentRequest},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};

fn today() -> chrono::NaiveDate {
    chrono::Utc::now().date_naive()
}

/// 按账单汇总已付款金额
async fn paid_by_invoice<C: ConnectionTrait>(
    conn: &C,
    invoice_ids: Vec<i64>,
) -> Result<HashMap<i64, i64>> {
    if invoice_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let payments = InvoicePayments::find()
        .filter(PaymentColumn::InvoiceId.is_in(invoice_ids))
        .all(conn)
        .await
        .map_err(|e| query_error("查询缴费记录失败", e))?;

    let mut paid = HashMap::new();
    for payment in payments {
        *paid.entry(payment.invoice_id).or_insert(0) += payment.amount_cents;
    }
    Ok(paid)
}

async fn balance_of<C: ConnectionTrait>(conn: &C, invoice: InvoiceModel) -> Result<InvoiceBalance> {
    let paid = paid_by_invoice(conn, vec![invoice.id]).await?;
    let paid_cents = paid.get(&invoice.id).copied().unwrap_or(0);
    Ok(InvoiceBalance::compute(
        invoice.into_invoice(),
        paid_cents,
        today(),
    ))
}

impl SeaOrmStorage {
    /// 创建账单，学生必须属于同一学校
    pub async fn create_invoice_impl(
        &self,
        school_id: i64,
        req: CreateInvoiceRequest,
    ) -> Result<Invoice> {
        let student_exists = Students::find_by_id(req.student_id)
            .filter(StudentColumn::SchoolId.eq(school_id))
            .count(&self.db)
            .await
            .map_err(|e| query_error("查询学生失败", e))?
            > 0;
        if !student_exists {
            return Err(CampusError::not_found("学生不存在"));
        }

        let now = chrono::Utc::now().timestamp();
        let model = ActiveModel {
            school_id: Set(school_id),
            student_id: Set(req.student_id),
            number: Set(req.number),
            description: Set(req.description),
            amount_cents: Set(req.amount_cents),
            currency: Set(req.currency),
            due_date: Set(req.due_date.format("%Y-%m-%d").to_string()),
            status: Set(InvoiceStatus::Issued.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| write_error("创建账单失败", e))?;

        Ok(result.into_invoice())
    }

    pub async fn get_invoice_balance_impl(
        &self,
        school_id: i64,
        id: i64,
    ) -> Result<Option<InvoiceBalance>> {
        let invoice = Invoices::find_by_id(id)
            .filter(Column::SchoolId.eq(school_id))
            .one(&self.db)
            .await
            .map_err(|e| query_error("查询账单失败", e))?;

        match invoice {
            Some(invoice) => Ok(Some(balance_of(&self.db, invoice).await?)),
            None => Ok(None),
        }
    }

    /// 账单余额视图，按到期日倒序
    pub async fn list_invoice_balances_impl(
        &self,
        school_id: i64,
        student_ids: Option<Vec<i64>>,
    ) -> Result<Vec<InvoiceBalance>> {
        let mut select = Invoices::find().filter(Column::SchoolId.eq(school_id));

        if let Some(ids) = student_ids {
            if ids.is_empty() {
                return Ok(Vec::new());
            }
            select = select.filter(Column::StudentId.is_in(ids));
        }

        let invoices = select
            .order_by_desc(Column::DueDate)
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| query_error("查询账单列表失败", e))?;

        let paid = paid_by_invoice(&self.db, invoices.iter().map(|i| i.id).collect()).await?;
        let today = today();

        Ok(invoices
            .into_iter()
            .map(|invoice| {
                let paid_cents = paid.get(&invoice.id).copied().unwrap_or(0);
                InvoiceBalance::compute(invoice.into_invoice(), paid_cents, today)
            })
            .collect())
    }

    /// 登记缴费
    ///
    /// 在事务内校验账单状态和剩余金额，作废账单返回 Conflict，超额返回 Validation。
    pub async fn record_payment_impl(
        &self,
        school_id: i64,
        invoice_id: i64,
        req: RecordPaymentRequest,
        recorded_by: Option<i64>,
    ) -> Result<(InvoicePayment, InvoiceBalance)> {
        if req.amount_cents <= 0 {
            return Err(CampusError::validation("缴费金额必须大于 0"));
        }

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| query_error("开启事务失败", e))?;

        // 同一账单的缴费在行锁上串行，余额校验基于最新已付金额
        let invoice = Invoices::find_by_id(invoice_id)
            .filter(Column::SchoolId.eq(school_id))
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(|e| query_error("查询账单失败", e))?
            .ok_or_else(|| CampusError::not_found("账单不存在"))?;

        let before = balance_of(&txn, invoice.clone()).await?;
        if before.invoice.status == InvoiceStatus::Void {
            return Err(CampusError::conflict("账单已作废"));
        }
        if req.amount_cents > before.balance_cents {
            return Err(CampusError::validation(format!(
                "缴费金额超过剩余应付 {}",
                before.balance_cents
            )));
        }

        let paid_at = req.paid_at.unwrap_or_else(chrono::Utc::now).timestamp();
        let payment = PaymentActiveModel {
            invoice_id: Set(invoice_id),
            amount_cents: Set(req.amount_cents),
            method: Set(req.method),
            reference: Set(req.reference),
            paid_at: Set(paid_at),
            recorded_by: Set(recorded_by),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| write_error("登记缴费失败", e))?;

        let after = balance_of(&txn, invoice).await?;

        txn.commit()
            .await
            .map_err(|e| query_error("提交事务失败", e))?;

        Ok((payment.into_payment(), after))
    }

    pub async fn void_invoice_impl(
        &self,
        school_id: i64,
        id: i64,
    ) -> Result<Option<InvoiceBalance>> {
        let existing = Invoices::find_by_id(id)
            .filter(Column::SchoolId.eq(school_id))
            .one(&self.db)
            .await
            .map_err(|e| query_error("查询账单失败", e))?;

        let Some(existing) = existing else {
            return Ok(None);
        };

        let mut model: ActiveModel = existing.into();
        model.status = Set(InvoiceStatus::Void.to_string());
        model.updated_at = Set(chrono::Utc::now().timestamp());

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| write_error("作废账单失败", e))?;

        Ok(Some(balance_of(&self.db, updated).await?))
    }
}
