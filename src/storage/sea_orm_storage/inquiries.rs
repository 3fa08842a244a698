//! 咨询留言存储操作

use super::{SeaOrmStorage, query_error, write_error};
use crate::entity::inquiries::{ActiveModel, Column, Entity as Inquiries};
use crate::errors::Result;
use crate::models::{
    PaginationInfo, page_bounds,
    inquiries::{
        entities::{Inquiry, InquiryStatus},
        requests::{CreateInquiryRequest, InquiryListQuery},
        responses::InquiryListResponse,
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

impl SeaOrmStorage {
    /// 写入新留言，状态为 new
    pub async fn create_inquiry_impl(
        &self,
        school_id: i64,
        req: CreateInquiryRequest,
    ) -> Result<Inquiry> {
        let model = ActiveModel {
            school_id: Set(school_id),
            name: Set(req.name),
            email: Set(req.email),
            message: Set(req.message),
            status: Set(InquiryStatus::New.to_string()),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| write_error("保存咨询失败", e))?;

        Ok(result.into_inquiry())
    }

    pub async fn list_inquiries_with_pagination_impl(
        &self,
        school_id: i64,
        query: InquiryListQuery,
    ) -> Result<InquiryListResponse> {
        let (page, size) = page_bounds(query.page, query.size);

        let mut select = Inquiries::find().filter(Column::SchoolId.eq(school_id));

        if let Some(status) = query.status {
            select = select.filter(Column::Status.eq(status.to_string()));
        }

        let paginator = select
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .paginate(&self.db, size);

        let total = paginator
            .num_items()
            .await
            .map_err(|e| query_error("查询咨询总数失败", e))?;

        let items = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| query_error("查询咨询列表失败", e))?;

        Ok(InquiryListResponse {
            items: items.into_iter().map(|m| m.into_inquiry()).collect(),
            pagination: PaginationInfo::new(page, size, total),
        })
    }

    pub async fn update_inquiry_status_impl(
        &self,
        school_id: i64,
        id: i64,
        status: InquiryStatus,
    ) -> Result<Option<Inquiry>> {
        let existing = Inquiries::find_by_id(id)
            .filter(Column::SchoolId.eq(school_id))
            .one(&self.db)
            .await
            .map_err(|e| query_error("查询咨询失败", e))?;

        let Some(existing) = existing else {
            return Ok(None);
        };

        let mut model: ActiveModel = existing.into();
        model.status = Set(status.to_string());

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| write_error("更新咨询状态失败", e))?;

        Ok(Some(result.into_inquiry()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inquiry(name: &str) -> CreateInquiryRequest {
        CreateInquiryRequest {
            name: name.into(),
            email: "parent@example.com".into(),
            message: "When does enrolment open?".into(),
        }
    }

    #[actix_web::test]
    async fn test_inquiries_scoped_by_school_and_status() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let main = storage.ensure_school_impl("main", "Main").await.unwrap();
        let other = storage.ensure_school_impl("other", "Other").await.unwrap();

        let first = storage.create_inquiry_impl(main.id, inquiry("Ann")).await.unwrap();
        storage.create_inquiry_impl(main.id, inquiry("Bob")).await.unwrap();
        storage.create_inquiry_impl(other.id, inquiry("Cid")).await.unwrap();
        assert_eq!(first.status, InquiryStatus::New);

        // 其他学校无法修改
        let foreign = storage
            .update_inquiry_status_impl(other.id, first.id, InquiryStatus::Read)
            .await
            .unwrap();
        assert!(foreign.is_none());

        storage
            .update_inquiry_status_impl(main.id, first.id, InquiryStatus::Read)
            .await
            .unwrap()
            .unwrap();

        let new_only = storage
            .list_inquiries_with_pagination_impl(
                main.id,
                InquiryListQuery {
                    page: Some(1),
                    size: Some(10),
                    status: Some(InquiryStatus::New),
                },
            )
            .await
            .unwrap();
        assert_eq!(new_only.items.len(), 1);
        assert_eq!(new_only.items[0].name, "Bob");
    }

    #[actix_web::test]
    async fn test_out_of_range_page_is_empty() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let school = storage.ensure_school_impl("main", "Main").await.unwrap();
        storage.create_inquiry_impl(school.id, inquiry("Ann")).await.unwrap();

        let page = storage
            .list_inquiries_with_pagination_impl(
                school.id,
                InquiryListQuery {
                    page: Some(i64::MAX),
                    size: Some(100),
                    status: None,
                },
            )
            .await
            .unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.pagination.total, 1);
    }
}
