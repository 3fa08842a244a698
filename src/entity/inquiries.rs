//! 咨询留言实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "inquiries")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub school_id: i64,
    pub name: String,
    pub email: String,
    #[sea_orm(column_type = "Text")]
    pub message: String,
    pub status: String,
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
}

impl Related<super::schools::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::School.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_inquiry(self) -> crate::models::inquiries::entities::Inquiry {
        use crate::models::inquiries::entities::{Inquiry, InquiryStatus};

        Inquiry {
            id: self.id,
            school_id: self.school_id,
            name: self.name,
            email: self.email,
            message: self.message,
            status: self.status.parse().unwrap_or(InquiryStatus::New),
            created_at: super::ts_to_datetime(self.created_at),
        }
    }
}
