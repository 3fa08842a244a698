//! 仪表盘统计

use super::{SeaOrmStorage, query_error};
use crate::entity::admission_leads::{Column as LeadColumn, Entity as AdmissionLeads};
use crate::entity::career_jobs::{Column as JobColumn, Entity as CareerJobs};
use crate::entity::exam_attempts::{Column as AttemptColumn, Entity as ExamAttempts};
use crate::entity::exams::{Column as ExamColumn, Entity as Exams};
use crate::entity::inquiries::{Column as InquiryColumn, Entity as Inquiries};
use crate::entity::students::{Column as StudentColumn, Entity as Students};
use crate::errors::Result;
use crate::models::{
    admissions::entities::LeadStatus, dashboards::responses::AdminDashboard,
    exams::entities::AttemptStatus, inquiries::entities::InquiryStatus,
};
use sea_orm::{ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter};

impl SeaOrmStorage {
    pub async fn admin_dashboard_impl(&self, school_id: i64) -> Result<AdminDashboard> {
        let students = Students::find()
            .filter(StudentColumn::SchoolId.eq(school_id))
            .count(&self.db)
            .await
            .map_err(|e| query_error("统计学生失败", e))?;

        let new_inquiries = Inquiries::find()
            .filter(InquiryColumn::SchoolId.eq(school_id))
            .filter(InquiryColumn::Status.eq(InquiryStatus::New.as_str()))
            .count(&self.db)
            .await
            .map_err(|e| query_error("统计咨询失败", e))?;

        let db = &self.db;
        let leads = move |status: LeadStatus| {
            AdmissionLeads::find()
                .filter(LeadColumn::SchoolId.eq(school_id))
                .filter(LeadColumn::Status.eq(status.as_str()))
                .count(db)
        };
        let draft_leads = leads(LeadStatus::Draft)
            .await
            .map_err(|e| query_error("统计申请失败", e))?;
        let submitted_leads = leads(LeadStatus::Submitted)
            .await
            .map_err(|e| query_error("统计申请失败", e))?;

        let now = chrono::Utc::now().timestamp();
        let open_jobs = CareerJobs::find()
            .filter(JobColumn::SchoolId.eq(school_id))
            .filter(JobColumn::Published.eq(true))
            .filter(
                Condition::any()
                    .add(JobColumn::ClosesAt.is_null())
                    .add(JobColumn::ClosesAt.gt(now)),
            )
            .count(&self.db)
            .await
            .map_err(|e| query_error("统计职位失败", e))?;

        let outstanding_cents = self
            .list_invoice_balances_impl(school_id, None)
            .await?
            .iter()
            .map(|b| b.outstanding_cents())
            .sum();

        let attempts = move |status: AttemptStatus| {
            ExamAttempts::find()
                .inner_join(Exams)
                .filter(ExamColumn::SchoolId.eq(school_id))
                .filter(AttemptColumn::Status.eq(status.as_str()))
                .count(db)
        };
        let attempts_in_progress = attempts(AttemptStatus::InProgress)
            .await
            .map_err(|e| query_error("统计答题记录失败", e))?;
        let attempts_locked = attempts(AttemptStatus::Locked)
            .await
            .map_err(|e| query_error("统计答题记录失败", e))?;

        Ok(AdminDashboard {
            students,
            new_inquiries,
            draft_leads,
            submitted_leads,
            open_jobs,
            outstanding_cents,
            attempts_in_progress,
            attempts_locked,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::inquiries::requests::CreateInquiryRequest;

    #[actix_web::test]
    async fn test_empty_school_dashboard() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let school = storage.ensure_school_impl("main", "Main").await.unwrap();
        storage
            .create_inquiry_impl(
                school.id,
                CreateInquiryRequest {
                    name: "Ann".into(),
                    email: "ann@example.com".into(),
                    message: "Do you offer a bus service?".into(),
                },
            )
            .await
            .unwrap();

        let dashboard = storage.admin_dashboard_impl(school.id).await.unwrap();
        assert_eq!(dashboard.new_inquiries, 1);
        assert_eq!(dashboard.students, 0);
        assert_eq!(dashboard.outstanding_cents, 0);
        assert_eq!(dashboard.attempts_locked, 0);
    }
}
