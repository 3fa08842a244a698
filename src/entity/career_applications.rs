//! 职位申请实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "career_applications")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub school_id: i64,
    pub job_id: i64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub cover_letter: Option<String>,
    pub resume_url: Option<String>,
    pub status: String,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::career_jobs::Entity",
        from = "Column::JobId",
        to = "super::career_jobs::Column::Id"
    )]
    Job,
}

impl Related<super::career_jobs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Job.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_application(self) -> crate::models::careers::entities::CareerApplication {
        use crate::models::careers::entities::{ApplicationStatus, CareerApplication};

        CareerApplication {
            id: self.id,
            school_id: self.school_id,
            job_id: self.job_id,
            name: self.name,
            email: self.email,
            phone: self.phone,
            cover_letter: self.cover_letter,
            resume_url: self.resume_url,
            status: self.status.parse().unwrap_or(ApplicationStatus::Received),
            created_at: super::ts_to_datetime(self.created_at),
        }
    }
}
