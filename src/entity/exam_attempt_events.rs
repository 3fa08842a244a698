//! 答题事件审计实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "exam_attempt_events")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub attempt_id: i64,
    pub kind: String,
    pub reason: Option<String>,
    pub actor_user_id: Option<i64>,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::exam_attempts::Entity",
        from = "Column::AttemptId",
        to = "super::exam_attempts::Column::Id"
    )]
    Attempt,
}

impl Related<super::exam_attempts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Attempt.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_event(self) -> crate::models::exams::entities::AttemptEvent {
        use crate::models::exams::entities::{AttemptEvent, AttemptEventKind};

        AttemptEvent {
            id: self.id,
            attempt_id: self.attempt_id,
            kind: self.kind.parse().unwrap_or(AttemptEventKind::Started),
            reason: self.reason,
            actor_user_id: self.actor_user_id,
            created_at: super::ts_to_datetime(self.created_at),
        }
    }
}
