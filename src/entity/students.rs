//! 学生实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "students")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub school_id: i64,
    #[sea_orm(unique)]
    pub user_id: Option<i64>,
    pub first_name: String,
    pub last_name: String,
    pub grade_level: i32,
    pub admission_no: String,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::schools::Entity",
        from = "Column::SchoolId",
        to = "super::schools::Column::Id"
    )]
    School,
    #[sea_orm(has_many = "super::guardian_students::Entity")]
    GuardianStudents,
    #[sea_orm(has_many = "super::invoices::Entity")]
    Invoices,
    #[sea_orm(has_many = "super::exam_attempts::Entity")]
    ExamAttempts,
}

impl Related<super::schools::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::School.def()
    }
}

impl Related<super::guardian_students::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GuardianStudents.def()
    }
}

impl Related<super::invoices::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Invoices.def()
    }
}

impl Related<super::exam_attempts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ExamAttempts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_student(self) -> crate::models::directory::entities::Student {
        crate::models::directory::entities::Student {
            id: self.id,
            school_id: self.school_id,
            user_id: self.user_id,
            first_name: self.first_name,
            last_name: self.last_name,
            grade_level: self.grade_level,
            admission_no: self.admission_no,
            created_at: super::ts_to_datetime(self.created_at),
        }
    }
}
