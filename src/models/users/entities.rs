use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::define_string_enum;

define_string_enum! {
    /// 用户角色
    UserRole, "../frontend/src/types/generated/user.ts" {
        Admin => "admin",         // 管理员
        Staff => "staff",         // 教务人员（招生、招聘）
        Finance => "finance",     // 财务
        Conductor => "conductor", // 监考
        Guardian => "guardian",   // 家长/监护人
        Student => "student",     // 学生
    }
}

impl UserRole {
    /// 可进入后台的角色
    pub fn admin_area_roles() -> &'static [&'static UserRole] {
        &[&Self::Admin, &Self::Staff, &Self::Finance]
    }
    /// 可管理财务的角色
    pub fn finance_roles() -> &'static [&'static UserRole] {
        &[&Self::Admin, &Self::Finance]
    }
    /// 可管理招聘与招生的角色
    pub fn careers_roles() -> &'static [&'static UserRole] {
        &[&Self::Admin, &Self::Staff]
    }
    /// 可进入监考台的角色
    pub fn conductor_roles() -> &'static [&'static UserRole] {
        &[&Self::Conductor, &Self::Admin]
    }
    /// 可管理学籍与账号的角色
    pub fn directory_roles() -> &'static [&'static UserRole] {
        &[&Self::Admin]
    }

    pub fn is_one_of(&self, roles: &[&UserRole]) -> bool {
        roles.iter().any(|r| *r == self)
    }
}

define_string_enum! {
    /// 用户状态
    UserStatus, "../frontend/src/types/generated/user.ts" {
        Active => "active",       // 活跃
        Inactive => "inactive",   // 非活跃
        Suspended => "suspended", // 暂停
    }
}

// 用户实体
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct User {
    pub id: i64,
    pub school_id: i64,
    pub email: String,
    #[serde(skip_serializing, default)] // 不序列化到JSON响应中
    #[ts(skip)]
    pub password_hash: String,
    pub role: UserRole,
    pub status: UserStatus,
    pub display_name: Option<String>,
    pub last_login: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl User {
    // 生成 token 对（access + refresh）
    pub fn generate_token_pair(
        &self,
        refresh_token_expiry: Option<chrono::TimeDelta>,
    ) -> Result<crate::utils::jwt::TokenPair, String> {
        crate::utils::jwt::JwtUtils::generate_token_pair(
            self.id,
            self.school_id,
            self.role.as_str(),
            refresh_token_expiry,
        )
        .map_err(|e| format!("生成 token 对失败: {e}"))
    }

    pub fn is_active(&self) -> bool {
        self.status == UserStatus::Active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse_and_display() {
        assert_eq!("guardian".parse::<UserRole>(), Ok(UserRole::Guardian));
        assert_eq!(UserRole::Conductor.to_string(), "conductor");
        assert!("teacher".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_role_serde_uses_snake_strings() {
        let json = serde_json::to_string(&UserRole::Finance).unwrap();
        assert_eq!(json, "\"finance\"");
        let back: UserRole = serde_json::from_str("\"student\"").unwrap();
        assert_eq!(back, UserRole::Student);
    }

    #[test]
    fn test_role_groups() {
        assert!(UserRole::Finance.is_one_of(UserRole::admin_area_roles()));
        assert!(!UserRole::Guardian.is_one_of(UserRole::admin_area_roles()));
        assert!(UserRole::Admin.is_one_of(UserRole::conductor_roles()));
        assert!(!UserRole::Staff.is_one_of(UserRole::finance_roles()));
    }
}
