//! 学校（租户）存储操作

use super::{SeaOrmStorage, query_error, write_error};
use crate::entity::schools::{ActiveModel, Column, Entity as Schools};
use crate::errors::Result;
use crate::models::directory::entities::School;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};

impl SeaOrmStorage {
    pub async fn get_school_by_slug_impl(&self, slug: &str) -> Result<Option<School>> {
        let result = Schools::find()
            .filter(Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .map_err(|e| query_error("查询学校失败", e))?;

        Ok(result.map(|m| m.into_school()))
    }

    pub async fn get_school_by_id_impl(&self, id: i64) -> Result<Option<School>> {
        let result = Schools::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| query_error("查询学校失败", e))?;

        Ok(result.map(|m| m.into_school()))
    }

    /// 已存在时保持原名称不变
    pub async fn ensure_school_impl(&self, slug: &str, name: &str) -> Result<School> {
        if let Some(existing) = self.get_school_by_slug_impl(slug).await? {
            return Ok(existing);
        }

        let model = ActiveModel {
            slug: Set(slug.to_string()),
            name: Set(name.to_string()),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| write_error("创建学校失败", e))?;

        Ok(result.into_school())
    }
}
