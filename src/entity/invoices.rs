//! 账单实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "invoices")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub school_id: i64,
    pub student_id: i64,
    pub number: String,
    pub description: String,
    pub amount_cents: i64,
    pub currency: String,
    /// YYYY-MM-DD
    pub due_date: String,
    pub status: String,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::students::Entity",
        from = "Column::StudentId",
        to = "super::students::Column::Id"
    )]
    Student,
    #[sea_orm(has_many = "super::invoice_payments::Entity")]
    Payments,
}

impl Related<super::students::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl Related<super::invoice_payments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_invoice(self) -> crate::models::finance::entities::Invoice {
        use crate::models::finance::entities::{Invoice, InvoiceStatus};

        Invoice {
            id: self.id,
            school_id: self.school_id,
            student_id: self.student_id,
            number: self.number,
            description: self.description,
            amount_cents: self.amount_cents,
            currency: self.currency,
            due_date: chrono::NaiveDate::parse_from_str(&self.due_date, "%Y-%m-%d")
                .unwrap_or_default(),
            status: self.status.parse().unwrap_or(InvoiceStatus::Issued),
            created_at: super::ts_to_datetime(self.created_at),
            updated_at: super::ts_to_datetime(self.updated_at),
        }
    }
}
