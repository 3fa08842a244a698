//! 招聘职位实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "career_jobs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub school_id: i64,
    pub title: String,
    pub slug: String,
    pub department: Option<String>,
    pub location: Option<String>,
    pub employment_type: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub published: bool,
    pub closes_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::schools::Entity",
        from = "Column::SchoolId",
        to = "super::schools::Column::Id"
    )]
    School,
    #[sea_orm(has_many = "super::career_applications::Entity")]
    Applications,
}

impl Related<super::schools::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::School.def()
    }
}

impl Related<super::career_applications::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Applications.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_job(self) -> crate::models::careers::entities::CareerJob {
        use crate::models::careers::entities::{CareerJob, EmploymentType};

        CareerJob {
            id: self.id,
            school_id: self.school_id,
            title: self.title,
            slug: self.slug,
            department: self.department,
            location: self.location,
            employment_type: self
                .employment_type
                .parse()
                .unwrap_or(EmploymentType::FullTime),
            description: self.description,
            published: self.published,
            closes_at: self.closes_at.map(super::ts_to_datetime),
            created_at: super::ts_to_datetime(self.created_at),
            updated_at: super::ts_to_datetime(self.updated_at),
        }
    }
}
