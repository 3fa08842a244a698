//! 答题记录实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "exam_attempts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub exam_id: i64,
    pub student_id: i64,
    pub status: String,
    pub started_at: i64,
    pub deadline_at: i64,
    pub locked_at: Option<i64>,
    pub submitted_at: Option<i64>,
    pub score: Option<i32>,
    pub max_score: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::exams::Entity",
        from = "Column::ExamId",
        to = "super::exams::Column::Id"
    )]
    Exam,
    #[sea_orm(
        belongs_to = "super::students::Entity",
        from = "Column::StudentId",
        to = "super::students::Column::Id"
    )]
    Student,
    #[sea_orm(has_many = "super::exam_answers::Entity")]
    Answers,
    #[sea_orm(has_many = "super::exam_attempt_events::Entity")]
    Events,
}

impl Related<super::exams::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Exam.def()
    }
}

impl Related<super::students::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl Related<super::exam_answers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Answers.def()
    }
}

impl Related<super::exam_attempt_events::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Events.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_attempt(self) -> crate::models::exams::entities::ExamAttempt {
        use crate::models::exams::entities::{AttemptStatus, ExamAttempt};

        ExamAttempt {
            id: self.id,
            exam_id: self.exam_id,
            student_id: self.student_id,
            // 无法识别的状态视为已锁定，需要监考处理
            status: self.status.parse().unwrap_or(AttemptStatus::Locked),
            started_at: super::ts_to_datetime(self.started_at),
            deadline_at: super::ts_to_datetime(self.deadline_at),
            locked_at: self.locked_at.map(super::ts_to_datetime),
            submitted_at: self.submitted_at.map(super::ts_to_datetime),
            score: self.score,
            max_score: self.max_score,
        }
    }
}
