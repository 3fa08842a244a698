//! 入学申请线索实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "admission_leads")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub school_id: i64,
    #[sea_orm(unique)]
    pub resume_token: String,
    pub step: i32,
    pub status: String,
    pub guardian_name: String,
    pub guardian_email: String,
    pub guardian_phone: Option<String>,
    pub student_name: Option<String>,
    /// YYYY-MM-DD
    pub student_birth_date: Option<String>,
    pub grade_applying: Option<i32>,
    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
    pub submitted_at: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::schools::Entity",
        from = "Column::SchoolId",
        to = "super::schools::Column::Id"
    )]
    School,
}

impl Related<super::schools::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::School.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_lead(self) -> crate::models::admissions::entities::AdmissionLead {
        use crate::models::admissions::entities::{AdmissionLead, LeadStatus};

        AdmissionLead {
            id: self.id,
            school_id: self.school_id,
            resume_token: self.resume_token,
            step: self.step,
            status: self.status.parse().unwrap_or(LeadStatus::Draft),
            guardian_name: self.guardian_name,
            guardian_email: self.guardian_email,
            guardian_phone: self.guardian_phone,
            student_name: self.student_name,
            student_birth_date: self
                .student_birth_date
                .and_then(|d| chrono::NaiveDate::parse_from_str(&d, "%Y-%m-%d").ok()),
            grade_applying: self.grade_applying,
            notes: self.notes,
            created_at: super::ts_to_datetime(self.created_at),
            updated_at: super::ts_to_datetime(self.updated_at),
            submitted_at: self.submitted_at.map(super::ts_to_datetime),
        }
    }
}
