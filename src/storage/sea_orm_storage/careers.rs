//! 招聘职位与申请存储操作

use super::{SeaOrmStorage, query_error, write_error};
use crate::entity::career_applications::{
    ActiveModel as ApplicationActiveModel, Column as ApplicationColumn,
    Entity as CareerApplications,
};
use crate::entity::career_jobs::{ActiveModel, Column, Entity as CareerJobs};
use crate::errors::Result;
use crate::models::careers::{
    entities::{ApplicationStatus, CareerApplication, CareerJob},
    requests::{ApplyJobRequest, JobDraft},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, Set,
};

impl SeaOrmStorage {
    pub async fn create_job_impl(&self, school_id: i64, draft: JobDraft) -> Result<CareerJob> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            school_id: Set(school_id),
            title: Set(draft.title),
            slug: Set(draft.slug),
            department: Set(draft.department),
            location: Set(draft.location),
            employment_type: Set(draft.employment_type.to_string()),
            description: Set(draft.description),
            published: Set(draft.published),
            closes_at: Set(draft.closes_at.map(|t| t.timestamp())),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| write_error("创建职位失败", e))?;

        Ok(result.into_job())
    }

    pub async fn update_job_impl(
        &self,
        school_id: i64,
        id: i64,
        draft: JobDraft,
    ) -> Result<Option<CareerJob>> {
        let existing = CareerJobs::find_by_id(id)
            .filter(Column::SchoolId.eq(school_id))
            .one(&self.db)
            .await
            .map_err(|e| query_error("查询职位失败", e))?;

        let Some(existing) = existing else {
            return Ok(None);
        };

        let mut model: ActiveModel = existing.into();
        model.title = Set(draft.title);
        model.slug = Set(draft.slug);
        model.department = Set(draft.department);
        model.location = Set(draft.location);
        model.employment_type = Set(draft.employment_type.to_string());
        model.description = Set(draft.description);
        model.published = Set(draft.published);
        model.closes_at = Set(draft.closes_at.map(|t| t.timestamp()));
        model.updated_at = Set(chrono::Utc::now().timestamp());

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| write_error("更新职位失败", e))?;

        Ok(Some(result.into_job()))
    }

    pub async fn get_job_impl(&self, school_id: i64, id: i64) -> Result<Option<CareerJob>> {
        let result = CareerJobs::find_by_id(id)
            .filter(Column::SchoolId.eq(school_id))
            .one(&self.db)
            .await
            .map_err(|e| query_error("查询职位失败", e))?;

        Ok(result.map(|m| m.into_job()))
    }

    pub async fn get_job_by_slug_impl(
        &self,
        school_id: i64,
        slug: &str,
    ) -> Result<Option<CareerJob>> {
        let result = CareerJobs::find()
            .filter(Column::SchoolId.eq(school_id))
            .filter(Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .map_err(|e| query_error("查询职位失败", e))?;

        Ok(result.map(|m| m.into_job()))
    }

    pub async fn list_jobs_impl(&self, school_id: i64, only_open: bool) -> Result<Vec<CareerJob>> {
        let mut select = CareerJobs::find().filter(Column::SchoolId.eq(school_id));

        if only_open {
            let now = chrono::Utc::now().timestamp();
            select = select.filter(Column::Published.eq(true)).filter(
                Condition::any()
                    .add(Column::ClosesAt.is_null())
                    .add(Column::ClosesAt.gt(now)),
            );
        }

        let jobs = select
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| query_error("查询职位列表失败", e))?;

        Ok(jobs.into_iter().map(|m| m.into_job()).collect())
    }

    /// 删除职位，申请记录级联删除
    pub async fn delete_job_impl(&self, school_id: i64, id: i64) -> Result<bool> {
        let result = CareerJobs::delete_many()
            .filter(Column::Id.eq(id))
            .filter(Column::SchoolId.eq(school_id))
            .exec(&self.db)
            .await
            .map_err(|e| write_error("删除职位失败", e))?;

        Ok(result.rows_affected > 0)
    }

    pub async fn create_application_impl(
        &self,
        school_id: i64,
        job_id: i64,
        req: ApplyJobRequest,
    ) -> Result<CareerApplication> {
        let model = ApplicationActiveModel {
            school_id: Set(school_id),
            job_id: Set(job_id),
            name: Set(req.name),
            email: Set(req.email),
            phone: Set(req.phone),
            cover_letter: Set(req.cover_letter),
            resume_url: Set(req.resume_url),
            status: Set(ApplicationStatus::Received.to_string()),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| write_error("提交职位申请失败", e))?;

        Ok(result.into_application())
    }

    pub async fn list_applications_impl(&self, job_id: i64) -> Result<Vec<CareerApplication>> {
        let items = CareerApplications::find()
            .filter(ApplicationColumn::JobId.eq(job_id))
            .order_by_desc(ApplicationColumn::CreatedAt)
            .order_by_desc(ApplicationColumn::Id)
            .all(&self.db)
            .await
            .map_err(|e| query_error("查询职位申请失败", e))?;

        Ok(items.into_iter().map(|m| m.into_application()).collect())
    }

    pub async fn update_application_status_impl(
        &self,
        school_id: i64,
        id: i64,
        status: ApplicationStatus,
    ) -> Result<Option<CareerApplication>> {
        let existing = CareerApplications::find_by_id(id)
            .filter(ApplicationColumn::SchoolId.eq(school_id))
            .one(&self.db)
            .await
            .map_err(|e| query_error("查询职位申请失败", e))?;

        let Some(existing) = existing else {
            return Ok(None);
        };

        let mut model: ApplicationActiveModel = existing.into();
        model.status = Set(status.to_string());

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| write_error("更新申请状态失败", e))?;

        Ok(Some(result.into_application()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::CampusError;
    use crate::models::careers::entities::EmploymentType;
    use chrono::{Duration, Utc};

    fn draft(slug: &str, published: bool, closes_at: Option<chrono::DateTime<Utc>>) -> JobDraft {
        JobDraft {
            title: "Physics Teacher".into(),
            slug: slug.into(),
            department: Some("Science".into()),
            location: None,
            employment_type: EmploymentType::FullTime,
            description: "Teach physics to grades nine through twelve.".into(),
            published,
            closes_at,
        }
    }

    #[actix_web::test]
    async fn test_open_jobs_filter() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let school = storage.ensure_school_impl("main", "Main").await.unwrap();
        let now = Utc::now();

        storage.create_job_impl(school.id, draft("open", true, None)).await.unwrap();
        storage
            .create_job_impl(school.id, draft("later", true, Some(now + Duration::days(3))))
            .await
            .unwrap();
        storage
            .create_job_impl(school.id, draft("closed", true, Some(now - Duration::days(1))))
            .await
            .unwrap();
        storage.create_job_impl(school.id, draft("hidden", false, None)).await.unwrap();

        let open = storage.list_jobs_impl(school.id, true).await.unwrap();
        let mut slugs: Vec<_> = open.iter().map(|j| j.slug.as_str()).collect();
        slugs.sort_unstable();
        assert_eq!(slugs, vec!["later", "open"]);
        assert_eq!(storage.list_jobs_impl(school.id, false).await.unwrap().len(), 4);
    }

    #[actix_web::test]
    async fn test_duplicate_slug_conflicts() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let school = storage.ensure_school_impl("main", "Main").await.unwrap();
        storage.create_job_impl(school.id, draft("physics", true, None)).await.unwrap();
        let second = storage.create_job_impl(school.id, draft("chem", true, None)).await.unwrap();

        let dup = storage
            .update_job_impl(school.id, second.id, draft("physics", true, None))
            .await;
        assert!(matches!(dup, Err(CampusError::Conflict(_))));
    }

    #[actix_web::test]
    async fn test_delete_job_cascades_applications() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let school = storage.ensure_school_impl("main", "Main").await.unwrap();
        let job = storage.create_job_impl(school.id, draft("physics", true, None)).await.unwrap();
        storage
            .create_application_impl(
                school.id,
                job.id,
                ApplyJobRequest {
                    name: "Marie Curie".into(),
                    email: "marie@example.com".into(),
                    phone: None,
                    cover_letter: None,
                    resume_url: None,
                },
            )
            .await
            .unwrap();

        assert!(storage.delete_job_impl(school.id, job.id).await.unwrap());
        assert!(storage.list_applications_impl(job.id).await.unwrap().is_empty());
    }
}
