//! 入学申请线索存储操作

use super::{SeaOrmStorage, query_error, write_error};
use crate::entity::admission_leads::{ActiveModel, Column, Entity as AdmissionLeads};
use crate::errors::{CampusError, Result};
use crate::models::{
    PaginationInfo, page_bounds,
    admissions::{
        entities::{AdmissionLead, LeadStatus},
        requests::{LeadChanges, LeadListQuery, StartApplicationRequest},
        responses::LeadListResponse,
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

impl SeaOrmStorage {
    /// 创建草稿线索，步骤从 1 开始
    pub async fn create_lead_impl(
        &self,
        school_id: i64,
        resume_token: &str,
        req: StartApplicationRequest,
    ) -> Result<AdmissionLead> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            school_id: Set(school_id),
            resume_token: Set(resume_token.to_string()),
            step: Set(1),
            status: Set(LeadStatus::Draft.to_string()),
            guardian_name: Set(req.guardian_name),
            guardian_email: Set(req.guardian_email),
            guardian_phone: Set(req.guardian_phone),
            student_name: Set(req.student_name),
            student_birth_date: Set(None),
            grade_applying: Set(req.grade_applying),
            notes: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            submitted_at: Set(None),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| write_error("创建申请失败", e))?;

        Ok(result.into_lead())
    }

    pub async fn get_lead_by_token_impl(
        &self,
        school_id: i64,
        resume_token: &str,
    ) -> Result<Option<AdmissionLead>> {
        let result = AdmissionLeads::find()
            .filter(Column::SchoolId.eq(school_id))
            .filter(Column::ResumeToken.eq(resume_token))
            .one(&self.db)
            .await
            .map_err(|e| query_error("查询申请失败", e))?;

        Ok(result.map(|m| m.into_lead()))
    }

    /// 更新草稿线索
    ///
    /// 在事务内重新读取状态，已提交的线索返回 Conflict。
    pub async fn update_lead_impl(&self, id: i64, changes: LeadChanges) -> Result<AdmissionLead> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| query_error("开启事务失败", e))?;

        let existing = AdmissionLeads::find_by_id(id)
            .one(&txn)
            .await
            .map_err(|e| query_error("查询申请失败", e))?
            .ok_or_else(|| CampusError::not_found("申请不存在"))?;

        if existing.status == LeadStatus::Submitted.as_str() {
            return Err(CampusError::conflict("申请已提交"));
        }

        let now = chrono::Utc::now().timestamp();
        let mut model: ActiveModel = existing.into();

        if let Some(step) = changes.step {
            model.step = Set(step);
        }
        if let Some(name) = changes.guardian_name {
            model.guardian_name = Set(name);
        }
        if let Some(email) = changes.guardian_email {
            model.guardian_email = Set(email);
        }
        if let Some(phone) = changes.guardian_phone {
            model.guardian_phone = Set(Some(phone));
        }
        if let Some(student_name) = changes.student_name {
            model.student_name = Set(Some(student_name));
        }
        if let Some(birth_date) = changes.student_birth_date {
            model.student_birth_date = Set(Some(birth_date.format("%Y-%m-%d").to_string()));
        }
        if let Some(grade) = changes.grade_applying {
            model.grade_applying = Set(Some(grade));
        }
        if let Some(notes) = changes.notes {
            model.notes = Set(Some(notes));
        }
        if changes.submit {
            model.status = Set(LeadStatus::Submitted.to_string());
            model.submitted_at = Set(Some(now));
        }
        model.updated_at = Set(now);

        let result = model
            .update(&txn)
            .await
            .map_err(|e| write_error("更新申请失败", e))?;

        txn.commit()
            .await
            .map_err(|e| query_error("提交事务失败", e))?;

        Ok(result.into_lead())
    }

    pub async fn list_leads_with_pagination_impl(
        &self,
        school_id: i64,
        query: LeadListQuery,
    ) -> Result<LeadListResponse> {
        let (page, size) = page_bounds(query.page, query.size);

        let mut select = AdmissionLeads::find().filter(Column::SchoolId.eq(school_id));

        if let Some(status) = query.status {
            select = select.filter(Column::Status.eq(status.to_string()));
        }

        let paginator = select
            .order_by_desc(Column::UpdatedAt)
            .order_by_desc(Column::Id)
            .paginate(&self.db, size);

        let total = paginator
            .num_items()
            .await
            .map_err(|e| query_error("查询申请总数失败", e))?;

        let leads = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| query_error("查询申请列表失败", e))?;

        Ok(LeadListResponse {
            items: leads.into_iter().map(|m| m.into_lead()).collect(),
            pagination: PaginationInfo::new(page, size, total),
        })
    }
}
