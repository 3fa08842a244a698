//! 学籍目录与登录账号管理（仅管理员）

pub mod guardians;
pub mod students;
pub mod users;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::{
    directory::requests::{CreateGuardianRequest, CreateStudentRequest, StudentListParams},
    users::requests::CreateUserRequest,
};
use crate::storage::Storage;

pub struct DirectoryService {
    storage: Option<Arc<dyn Storage>>,
}

impl DirectoryService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    pub async fn list_students(
        &self,
        request: &HttpRequest,
        query: StudentListParams,
    ) -> ActixResult<HttpResponse> {
        students::list_students(self, request, query).await
    }

    pub async fn create_student(
        &self,
        request: &HttpRequest,
        req: CreateStudentRequest,
    ) -> ActixResult<HttpResponse> {
        students::create_student(self, request, req).await
    }

    pub async fn create_guardian(
        &self,
        request: &HttpRequest,
        req: CreateGuardianRequest,
    ) -> ActixResult<HttpResponse> {
        guardians::create_guardian(self, request, req).await
    }

    pub async fn create_user(
        &self,
        request: &HttpRequest,
        req: CreateUserRequest,
    ) -> ActixResult<HttpResponse> {
        users::create_user(self, request, req).await
    }
}
