//! 考试实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "exams")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub school_id: i64,
    pub title: String,
    pub grade_level: Option<i32>,
    pub duration_minutes: i32,
    pub opens_at: i64,
    pub closes_at: i64,
    pub published: bool,
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
    #[sea_orm(has_many = "super::exam_questions::Entity")]
    Questions,
    #[sea_orm(has_many = "super::exam_attempts::Entity")]
    Attempts,
}

impl Related<super::schools::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::School.def()
    }
}

impl Related<super::exam_questions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Questions.def()
    }
}

impl Related<super::exam_attempts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Attempts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_exam(self) -> crate::models::exams::entities::Exam {
        crate::models::exams::entities::Exam {
            id: self.id,
            school_id: self.school_id,
            title: self.title,
            grade_level: self.grade_level,
            duration_minutes: self.duration_minutes,
            opens_at: super::ts_to_datetime(self.opens_at),
            closes_at: super::ts_to_datetime(self.closes_at),
            published: self.published,
            created_at: super::ts_to_datetime(self.created_at),
        }
    }
}
