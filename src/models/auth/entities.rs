use crate::define_string_enum;
use crate::models::directory::entities::{Guardian, Student};
use crate::models::users::entities::{User, UserRole};

define_string_enum! {
    /// 受保护区域
    Area, "../frontend/src/types/generated/auth.ts" {
        Admin => "admin",         // 后台
        Portal => "portal",       // 家长/学生门户
        Conductor => "conductor", // 监考台
    }
}

impl Area {
    /// 页面路径前缀
    pub fn page_prefix(&self) -> &'static str {
        match self {
            Area::Admin => "/admin",
            Area::Portal => "/portal",
            Area::Conductor => "/conductor",
        }
    }

    /// 接口路径前缀
    pub fn api_prefix(&self) -> &'static str {
        match self {
            Area::Admin => "/api/admin",
            Area::Portal => "/api/portal",
            Area::Conductor => "/api/conductor",
        }
    }

    pub fn login_path(&self) -> String {
        format!("{}/login", self.page_prefix())
    }

    /// 仅按角色即可判定的区域（门户还需要学籍关联）
    pub fn allowed_roles(&self) -> &'static [&'static UserRole] {
        match self {
            Area::Admin => UserRole::admin_area_roles(),
            Area::Conductor => UserRole::conductor_roles(),
            Area::Portal => &[&UserRole::Guardian, &UserRole::Student],
        }
    }
}

/// 门户登录者对应的学籍记录
#[derive(Debug, Clone)]
pub enum PortalSubject {
    Student(Student),
    Guardian {
        guardian: Guardian,
        students: Vec<Student>,
    },
}

impl PortalSubject {
    /// 该身份可查看的学生
    pub fn students(&self) -> Vec<&Student> {
        match self {
            PortalSubject::Student(student) => vec![student],
            PortalSubject::Guardian { students, .. } => students.iter().collect(),
        }
    }

    pub fn student_ids(&self) -> Vec<i64> {
        self.students().into_iter().map(|s| s.id).collect()
    }
}

/// 通过区域鉴权后放入请求扩展的会话信息
#[derive(Debug, Clone)]
pub struct SessionUser {
    pub user: User,
    pub area: Area,
    pub subject: Option<PortalSubject>,
}

impl SessionUser {
    pub fn school_id(&self) -> i64 {
        self.user.school_id
    }

    /// 以学生身份登录时的学生记录
    pub fn student(&self) -> Option<&Student> {
        match &self.subject {
            Some(PortalSubject::Student(student)) => Some(student),
            _ => None,
        }
    }
}
