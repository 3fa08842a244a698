//! 考题实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "exam_questions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub exam_id: i64,
    pub position: i32,
    #[sea_orm(column_type = "Text")]
    pub prompt: String,
    pub kind: String,
    /// 选项列表（JSON 数组）
    #[sea_orm(column_type = "Text", nullable)]
    pub options: Option<String>,
    pub correct_answer: Option<String>,
    pub points: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::exams::Entity",
        from = "Column::ExamId",
        to = "super::exams::Column::Id"
    )]
    Exam,
}

impl Related<super::exams::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Exam.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_question(self) -> crate::models::exams::entities::ExamQuestion {
        use crate::models::exams::entities::{ExamQuestion, QuestionKind};

        let options = self
            .options
            .as_deref()
            .and_then(|raw| serde_json::from_str::<Vec<String>>(raw).ok())
            .unwrap_or_default();

        ExamQuestion {
            id: self.id,
            exam_id: self.exam_id,
            position: self.position,
            prompt: self.prompt,
            kind: self.kind.parse().unwrap_or(QuestionKind::Text),
            options,
            correct_answer: self.correct_answer,
            points: self.points,
        }
    }
}
