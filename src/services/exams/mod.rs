//! 考试服务
//!
//! 门户（学生作答）、监考台（查看与解锁）、后台（出卷）三部分共用。
//! 状态迁移在存储层以条件更新完成，这里只负责归属校验与结果映射。

pub mod admin;
pub mod answer;
pub mod attempt;
pub mod conductor;
pub mod lock;
pub mod portal;
pub mod submit;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;
use tracing::error;

use crate::config::AppConfig;
use crate::models::{
    ErrorCode,
    auth::entities::SessionUser,
    directory::entities::Student,
    exams::{
        entities::ExamAttempt,
        requests::{
            AttemptListParams, AttemptQuery, CreateExamRequest, LockAttemptRequest,
            SaveAnswerRequest, StartExamRequest, SubmitAttemptRequest, UnlockAttemptRequest,
        },
    },
};
use crate::services::tenancy;
use crate::storage::Storage;

pub struct ExamService {
    storage: Option<Arc<dyn Storage>>,
}

/// 学生本人的答题上下文
pub(crate) struct OwnAttempt {
    pub session: SessionUser,
    pub student: Student,
    pub attempt: ExamAttempt,
}

impl ExamService {
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

    pub(crate) fn get_config(&self) -> &AppConfig {
        AppConfig::get()
    }

    /// 当前会话必须是学生本人
    pub(crate) fn session_student(
        &self,
        request: &HttpRequest,
    ) -> Result<(SessionUser, Student), HttpResponse> {
        let session = tenancy::session_user(request)?;
        match session.student().cloned() {
            Some(student) => Ok((session, student)),
            None => Err(HttpResponse::Forbidden().json(
                crate::models::ApiResponse::error_empty(
                    ErrorCode::Forbidden,
                    "Only students can take exams",
                ),
            )),
        }
    }

    /// 读取属于当前学生的答题记录，别人的记录视为不存在
    pub(crate) async fn own_attempt(
        &self,
        request: &HttpRequest,
        attempt_id: i64,
    ) -> Result<OwnAttempt, HttpResponse> {
        let (session, student) = self.session_student(request)?;
        let storage = self.get_storage(request);

        match storage.get_attempt(session.school_id(), attempt_id).await {
            Ok(Some(attempt)) if attempt.student_id == student.id => Ok(OwnAttempt {
                session,
                student,
                attempt,
            }),
            Ok(_) => Err(tenancy::not_found(
                ErrorCode::AttemptNotFound,
                "Attempt not found",
            )),
            Err(e) => {
                error!("Failed to load attempt {}: {}", attempt_id, e);
                Err(tenancy::internal_error("Failed to load attempt"))
            }
        }
    }

    // 门户：学生可见的考试
    pub async fn list_student_exams(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        portal::list_student_exams(self, request).await
    }

    // 门户：开始或继续考试
    pub async fn start_attempt(
        &self,
        request: &HttpRequest,
        req: StartExamRequest,
    ) -> ActixResult<HttpResponse> {
        portal::start_attempt(self, request, req).await
    }

    // 门户：答题详情
    pub async fn get_attempt(
        &self,
        request: &HttpRequest,
        query: AttemptQuery,
    ) -> ActixResult<HttpResponse> {
        attempt::get_attempt_detail(self, request, query).await
    }

    // 门户：保存作答
    pub async fn save_answer(
        &self,
        request: &HttpRequest,
        req: SaveAnswerRequest,
    ) -> ActixResult<HttpResponse> {
        answer::save_answer(self, request, req).await
    }

    // 门户：锁定
    pub async fn lock_attempt(
        &self,
        request: &HttpRequest,
        req: LockAttemptRequest,
    ) -> ActixResult<HttpResponse> {
        lock::lock_attempt(self, request, req).await
    }

    // 门户：交卷
    pub async fn submit_attempt(
        &self,
        request: &HttpRequest,
        req: SubmitAttemptRequest,
    ) -> ActixResult<HttpResponse> {
        submit::submit_attempt(self, request, req).await
    }

    // 监考台：答题列表
    pub async fn list_attempts(
        &self,
        request: &HttpRequest,
        query: AttemptListParams,
    ) -> ActixResult<HttpResponse> {
        conductor::list_attempts(self, request, query).await
    }

    // 监考台：解锁
    pub async fn unlock_attempt(
        &self,
        request: &HttpRequest,
        req: UnlockAttemptRequest,
    ) -> ActixResult<HttpResponse> {
        conductor::unlock_attempt(self, request, req).await
    }

    // 监考台：答题事件
    pub async fn list_attempt_events(
        &self,
        request: &HttpRequest,
        attempt_id: i64,
    ) -> ActixResult<HttpResponse> {
        conductor::list_attempt_events(self, request, attempt_id).await
    }

    // 后台：创建考试
    pub async fn create_exam(
        &self,
        request: &HttpRequest,
        req: CreateExamRequest,
    ) -> ActixResult<HttpResponse> {
        admin::create_exam(self, request, req).await
    }

    // 后台：考试列表
    pub async fn list_exams(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        admin::list_exams(self, request).await
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use std::sync::Arc;

    use actix_web::HttpRequest;
    use chrono::{Duration, Utc};

    use crate::models::auth::entities::{Area, PortalSubject};
    use crate::models::directory::{entities::Student, requests::CreateStudentRequest};
    use crate::models::exams::{
        entities::{Exam, ExamQuestion, QuestionKind},
        requests::{CreateExamRequest, CreateQuestionRequest},
    };
    use crate::models::users::entities::UserRole;
    use crate::services::test_support::{fake_user, session_request};
    use crate::storage::{Storage, create_memory_storage};

    pub struct ExamFixture {
        pub storage: Arc<dyn Storage>,
        pub school_id: i64,
        pub student: Student,
        pub exam: Exam,
        pub questions: Vec<ExamQuestion>,
    }

    impl ExamFixture {
        pub fn student_request(&self) -> HttpRequest {
            self.request_for(&self.student)
        }

        pub fn request_for(&self, student: &Student) -> HttpRequest {
            session_request(
                &self.storage,
                fake_user(self.school_id, UserRole::Student),
                Area::Portal,
                Some(PortalSubject::Student(student.clone())),
            )
        }

        pub fn conductor_request(&self) -> HttpRequest {
            session_request(
                &self.storage,
                fake_user(self.school_id, UserRole::Conductor),
                Area::Conductor,
                None,
            )
        }

        pub async fn other_student(&self) -> Student {
            self.storage
                .create_student(
                    self.school_id,
                    CreateStudentRequest {
                        first_name: "Ben".into(),
                        last_name: "Other".into(),
                        grade_level: 7,
                        admission_no: "B-2".into(),
                    },
                )
                .await
                .unwrap()
        }

        pub fn choice_question(&self) -> &ExamQuestion {
            self.questions
                .iter()
                .find(|q| q.kind == QuestionKind::Choice)
                .unwrap()
        }
    }

    pub fn exam_request(opens_in_minutes: i64) -> CreateExamRequest {
        let opens_at = Utc::now() + Duration::minutes(opens_in_minutes);
        CreateExamRequest {
            title: "Algebra quiz".into(),
            grade_level: Some(7),
            duration_minutes: 30,
            opens_at,
            closes_at: opens_at + Duration::hours(2),
            published: true,
            questions: vec![
                CreateQuestionRequest {
                    prompt: "2 + 2 = ?".into(),
                    kind: QuestionKind::Choice,
                    options: vec!["3".into(), "4".into(), "5".into()],
                    correct_answer: Some("4".into()),
                    points: 2,
                },
                CreateQuestionRequest {
                    prompt: "Explain commutativity".into(),
                    kind: QuestionKind::Text,
                    options: vec![],
                    correct_answer: None,
                    points: 5,
                },
            ],
        }
    }

    /// 已开放的七年级考试与一名七年级学生
    pub async fn open_exam() -> ExamFixture {
        let storage = create_memory_storage().await;
        let school = storage.ensure_school("north", "North").await.unwrap();
        let student = storage
            .create_student(
                school.id,
                CreateStudentRequest {
                    first_name: "Ada".into(),
                    last_name: "Lovelace".into(),
                    grade_level: 7,
                    admission_no: "A-1".into(),
                },
            )
            .await
            .unwrap();
        let detail = storage
            .create_exam(school.id, exam_request(-5))
            .await
            .unwrap();
        ExamFixture {
            storage,
            school_id: school.id,
            student,
            exam: detail.exam,
            questions: detail.questions,
        }
    }
}
