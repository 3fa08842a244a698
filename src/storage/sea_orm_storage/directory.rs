//! 学籍目录存储操作：学生、监护人及其关联

use super::{SeaOrmStorage, query_error, write_error};
use crate::entity::guardian_students::{
    ActiveModel as LinkActiveModel, Column as LinkColumn, Entity as GuardianStudents,
};
use crate::entity::guardians::{
    ActiveModel as GuardianActiveModel, Column as GuardianColumn, Entity as Guardians,
};
use crate::entity::students::{ActiveModel, Column, Entity as Students};
use crate::errors::{CampusError, Result};
use crate::models::{
    PaginationInfo, page_bounds,
    directory::{
        entities::{Guardian, Student},
        requests::{CreateGuardianRequest, CreateStudentRequest, StudentListQuery},
        responses::{GuardianResponse, StudentListResponse},
    },
};
use crate::utils::escape_like_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Set, TransactionTrait,
};

impl SeaOrmStorage {
    /// 创建学生，学号在学校内唯一
    pub async fn create_student_impl(
        &self,
        school_id: i64,
        req: CreateStudentRequest,
    ) -> Result<Student> {
        let model = ActiveModel {
            school_id: Set(school_id),
            first_name: Set(req.first_name),
            last_name: Set(req.last_name),
            grade_level: Set(req.grade_level),
            admission_no: Set(req.admission_no),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| write_error("创建学生失败", e))?;

        Ok(result.into_student())
    }

    pub async fn get_student_impl(&self, school_id: i64, id: i64) -> Result<Option<Student>> {
        let result = Students::find_by_id(id)
            .filter(Column::SchoolId.eq(school_id))
            .one(&self.db)
            .await
            .map_err(|e| query_error("查询学生失败", e))?;

        Ok(result.map(|m| m.into_student()))
    }

    pub async fn get_student_by_user_id_impl(&self, user_id: i64) -> Result<Option<Student>> {
        let result = Students::find()
            .filter(Column::UserId.eq(user_id))
            .one(&self.db)
            .await
            .map_err(|e| query_error("查询学生失败", e))?;

        Ok(result.map(|m| m.into_student()))
    }

    /// 分页列出学生
    pub async fn list_students_with_pagination_impl(
        &self,
        school_id: i64,
        query: StudentListQuery,
    ) -> Result<StudentListResponse> {
        let (page, size) = page_bounds(query.page, query.size);

        let mut select = Students::find().filter(Column::SchoolId.eq(school_id));

        if let Some(grade) = query.grade_level {
            select = select.filter(Column::GradeLevel.eq(grade));
        }

        // 搜索条件
        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let escaped = escape_like_pattern(search.trim());
            select = select.filter(
                Condition::any()
                    .add(Column::FirstName.contains(&escaped))
                    .add(Column::LastName.contains(&escaped))
                    .add(Column::AdmissionNo.contains(&escaped)),
            );
        }

        let paginator = select
            .order_by_asc(Column::LastName)
            .order_by_asc(Column::FirstName)
            .paginate(&self.db, size);

        let total = paginator
            .num_items()
            .await
            .map_err(|e| query_error("查询学生总数失败", e))?;

        let students = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| query_error("查询学生列表失败", e))?;

        Ok(StudentListResponse {
            items: students.into_iter().map(|m| m.into_student()).collect(),
            pagination: PaginationInfo::new(page, size, total),
        })
    }

    /// 创建监护人并关联学生
    pub async fn create_guardian_impl(
        &self,
        school_id: i64,
        req: CreateGuardianRequest,
    ) -> Result<GuardianResponse> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| query_error("开启事务失败", e))?;

        // 关联的学生必须属于同一学校
        let mut student_ids = req.student_ids.clone();
        student_ids.sort_unstable();
        student_ids.dedup();
        if !student_ids.is_empty() {
            let found = Students::find()
                .filter(Column::SchoolId.eq(school_id))
                .filter(Column::Id.is_in(student_ids.clone()))
                .count(&txn)
                .await
                .map_err(|e| query_error("查询学生失败", e))?;
            if found != student_ids.len() as u64 {
                return Err(CampusError::not_found("关联的学生不存在"));
            }
        }

        let guardian = GuardianActiveModel {
            school_id: Set(school_id),
            full_name: Set(req.full_name),
            email: Set(req.email),
            phone: Set(req.phone),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| write_error("创建监护人失败", e))?;

        let mut links = Vec::with_capacity(student_ids.len());
        for student_id in student_ids {
            let link = LinkActiveModel {
                guardian_id: Set(guardian.id),
                student_id: Set(student_id),
                relationship: Set(req.relationship.clone()),
                ..Default::default()
            }
            .insert(&txn)
            .await
            .map_err(|e| write_error("关联学生失败", e))?;
            links.push(link.into_link());
        }

        txn.commit()
            .await
            .map_err(|e| query_error("提交事务失败", e))?;

        Ok(GuardianResponse {
            guardian: guardian.into_guardian(),
            links,
        })
    }

    pub async fn get_guardian_impl(&self, school_id: i64, id: i64) -> Result<Option<Guardian>> {
        let result = Guardians::find_by_id(id)
            .filter(GuardianColumn::SchoolId.eq(school_id))
            .one(&self.db)
            .await
            .map_err(|e| query_error("查询监护人失败", e))?;

        Ok(result.map(|m| m.into_guardian()))
    }

    pub async fn get_guardian_by_user_id_impl(&self, user_id: i64) -> Result<Option<Guardian>> {
        let result = Guardians::find()
            .filter(GuardianColumn::UserId.eq(user_id))
            .one(&self.db)
            .await
            .map_err(|e| query_error("查询监护人失败", e))?;

        Ok(result.map(|m| m.into_guardian()))
    }

    /// 监护人关联的学生，按姓名排序
    pub async fn list_guardian_students_impl(&self, guardian_id: i64) -> Result<Vec<Student>> {
        let students = Students::find()
            .inner_join(GuardianStudents)
            .filter(LinkColumn::GuardianId.eq(guardian_id))
            .order_by_asc(Column::FirstName)
            .order_by_asc(Column::LastName)
            .all(&self.db)
            .await
            .map_err(|e| query_error("查询关联学生失败", e))?;

        Ok(students.into_iter().map(|m| m.into_student()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student(first: &str, grade: i32, no: &str) -> CreateStudentRequest {
        CreateStudentRequest {
            first_name: first.into(),
            last_name: "Okafor".into(),
            grade_level: grade,
            admission_no: no.into(),
        }
    }

    #[actix_web::test]
    async fn test_guardian_links_students() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let school = storage.ensure_school_impl("main", "Main").await.unwrap();
        let ben = storage
            .create_student_impl(school.id, student("Ben", 3, "S-2"))
            .await
            .unwrap();
        let ada = storage
            .create_student_impl(school.id, student("Ada", 5, "S-1"))
            .await
            .unwrap();

        let created = storage
            .create_guardian_impl(
                school.id,
                CreateGuardianRequest {
                    full_name: "Ngozi Okafor".into(),
                    email: None,
                    phone: None,
                    student_ids: vec![ben.id, ada.id, ben.id],
                    relationship: Some("mother".into()),
                },
            )
            .await
            .unwrap();
        assert_eq!(created.links.len(), 2);

        let children = storage
            .list_guardian_students_impl(created.guardian.id)
            .await
            .unwrap();
        let names: Vec<_> = children.iter().map(|s| s.first_name.as_str()).collect();
        assert_eq!(names, vec!["Ada", "Ben"]);
    }

    #[actix_web::test]
    async fn test_guardian_rejects_foreign_students() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let main = storage.ensure_school_impl("main", "Main").await.unwrap();
        let other = storage.ensure_school_impl("other", "Other").await.unwrap();
        let foreign = storage
            .create_student_impl(other.id, student("Cy", 2, "S-9"))
            .await
            .unwrap();

        let result = storage
            .create_guardian_impl(
                main.id,
                CreateGuardianRequest {
                    full_name: "Someone".into(),
                    email: None,
                    phone: None,
                    student_ids: vec![foreign.id],
                    relationship: None,
                },
            )
            .await;
        assert!(matches!(result, Err(CampusError::NotFound(_))));
    }

    #[actix_web::test]
    async fn test_admission_no_unique_and_search() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let school = storage.ensure_school_impl("main", "Main").await.unwrap();
        storage
            .create_student_impl(school.id, student("Ada", 5, "S-1"))
            .await
            .unwrap();
        let dup = storage
            .create_student_impl(school.id, student("Eve", 5, "S-1"))
            .await;
        assert!(matches!(dup, Err(CampusError::Conflict(_))));

        let page = storage
            .list_students_with_pagination_impl(
                school.id,
                StudentListQuery {
                    page: Some(1),
                    size: Some(10),
                    grade_level: Some(5),
                    search: Some("ad".into()),
                },
            )
            .await
            .unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.pagination.total, 1);
    }
}
