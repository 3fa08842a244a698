use super::{SeaOrmStorage, query_error, write_error};
use crate::entity::guardians::{Column as GuardianColumn, Entity as Guardians};
use crate::entity::students::{Column as StudentColumn, Entity as Students};
use crate::entity::users::{ActiveModel, Column, Entity as Users};
use crate::errors::{CampusError, Result};
use crate::models::users::{
    entities::{User, UserRole, UserStatus},
    requests::CreateUserRequest,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, Set,
    TransactionTrait, sea_query::Expr,
};

impl SeaOrmStorage {
    /// 创建用户
    ///
    /// 学生/监护人账号需要关联已有的学籍记录，关联在同一事务中完成。
    pub async fn create_user_impl(&self, school_id: i64, req: CreateUserRequest) -> Result<User> {
        let now = chrono::Utc::now().timestamp();
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| query_error("开启事务失败", e))?;

        let model = ActiveModel {
            school_id: Set(school_id),
            email: Set(req.email),
            password_hash: Set(req.password),
            role: Set(req.role.to_string()),
            status: Set(UserStatus::Active.to_string()),
            display_name: Set(req.display_name),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let user = model
            .insert(&txn)
            .await
            .map_err(|e| write_error("创建用户失败", e))?;

        // 关联学籍记录，要求记录属于同一学校且尚未绑定账号
        let linked = match req.role {
            UserRole::Student => match req.student_id {
                Some(student_id) => Students::update_many()
                    .col_expr(StudentColumn::UserId, Expr::value(user.id))
                    .filter(StudentColumn::Id.eq(student_id))
                    .filter(StudentColumn::SchoolId.eq(school_id))
                    .filter(StudentColumn::UserId.is_null())
                    .exec(&txn)
                    .await
                    .map_err(|e| write_error("关联学生失败", e))?
                    .rows_affected
                    == 1,
                None => false,
            },
            UserRole::Guardian => match req.guardian_id {
                Some(guardian_id) => Guardians::update_many()
                    .col_expr(GuardianColumn::UserId, Expr::value(user.id))
                    .filter(GuardianColumn::Id.eq(guardian_id))
                    .filter(GuardianColumn::SchoolId.eq(school_id))
                    .filter(GuardianColumn::UserId.is_null())
                    .exec(&txn)
                    .await
                    .map_err(|e| write_error("关联监护人失败", e))?
                    .rows_affected
                    == 1,
                None => false,
            },
            _ => true,
        };

        if !linked {
            // txn 丢弃时自动回滚
            return Err(CampusError::validation(
                "学生/监护人账号需要关联本校未绑定的记录",
            ));
        }

        txn.commit()
            .await
            .map_err(|e| query_error("提交事务失败", e))?;

        Ok(user.into_user())
    }

    /// 通过 ID 获取用户
    pub async fn get_user_by_id_impl(&self, id: i64) -> Result<Option<User>> {
        let result = Users::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| query_error("查询用户失败", e))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 通过邮箱获取用户，邮箱按小写比较
    pub async fn get_user_by_email_impl(
        &self,
        school_id: i64,
        email: &str,
    ) -> Result<Option<User>> {
        let result = Users::find()
            .filter(Column::SchoolId.eq(school_id))
            .filter(Column::Email.eq(email.trim().to_lowercase()))
            .one(&self.db)
            .await
            .map_err(|e| query_error("查询用户失败", e))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 更新用户最后登录时间
    pub async fn update_last_login_impl(&self, id: i64) -> Result<bool> {
        let now = chrono::Utc::now().timestamp();

        let result = Users::update_many()
            .col_expr(Column::LastLogin, Expr::value(now))
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| write_error("更新最后登录时间失败", e))?;

        Ok(result.rows_affected > 0)
    }

    /// 统计用户数量
    pub async fn count_users_impl(&self, school_id: i64) -> Result<u64> {
        let count = Users::find()
            .filter(Column::SchoolId.eq(school_id))
            .count(&self.db)
            .await
            .map_err(|e| query_error("统计用户数量失败", e))?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::directory::requests::CreateStudentRequest;

    fn request(email: &str, role: UserRole) -> CreateUserRequest {
        CreateUserRequest {
            email: email.to_string(),
            password: "hash".to_string(),
            role,
            display_name: None,
            student_id: None,
            guardian_id: None,
        }
    }

    #[actix_web::test]
    async fn test_email_is_unique_per_school() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let a = storage.ensure_school_impl("alpha", "Alpha").await.unwrap();
        let b = storage.ensure_school_impl("beta", "Beta").await.unwrap();

        storage
            .create_user_impl(a.id, request("staff@example.com", UserRole::Staff))
            .await
            .unwrap();
        // 不同学校允许相同邮箱
        storage
            .create_user_impl(b.id, request("staff@example.com", UserRole::Staff))
            .await
            .unwrap();

        let dup = storage
            .create_user_impl(a.id, request("staff@example.com", UserRole::Admin))
            .await;
        assert!(matches!(dup, Err(CampusError::Conflict(_))));

        let found = storage
            .get_user_by_email_impl(b.id, "Staff@Example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.school_id, b.id);
        assert_eq!(storage.count_users_impl(a.id).await.unwrap(), 1);
    }

    #[actix_web::test]
    async fn test_student_account_links_record() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let school = storage.ensure_school_impl("main", "Main").await.unwrap();
        let student = storage
            .create_student_impl(
                school.id,
                CreateStudentRequest {
                    first_name: "Ada".into(),
                    last_name: "Lovelace".into(),
                    grade_level: 5,
                    admission_no: "A-001".into(),
                },
            )
            .await
            .unwrap();

        // 未指定学生记录时拒绝，且不留下用户
        let missing = storage
            .create_user_impl(school.id, request("ada@example.com", UserRole::Student))
            .await;
        assert!(matches!(missing, Err(CampusError::Validation(_))));
        assert_eq!(storage.count_users_impl(school.id).await.unwrap(), 0);

        let mut req = request("ada@example.com", UserRole::Student);
        req.student_id = Some(student.id);
        let user = storage.create_user_impl(school.id, req).await.unwrap();

        let linked = storage
            .get_student_by_user_id_impl(user.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(linked.id, student.id);
    }
}
