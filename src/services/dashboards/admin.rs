use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::DashboardService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::tenancy;

pub async fn admin_dashboard(
    service: &DashboardService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let session = match tenancy::session_user(request) {
        Ok(session) => session,
        Err(res) => return Ok(res),
    };
    let storage = service.get_storage(request);

    match storage.admin_dashboard(session.school_id()).await {
        Ok(dashboard) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            dashboard,
            "Dashboard retrieved successfully",
        ))),
        Err(e) => Ok(tenancy::storage_error(
            "Failed to build dashboard",
            ErrorCode::InternalServerError,
            e,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::auth::entities::Area;
    use crate::models::inquiries::requests::CreateInquiryRequest;
    use crate::models::users::entities::UserRole;
    use crate::services::test_support::{fake_user, read_json, session_request};
    use crate::storage::create_memory_storage;

    #[actix_web::test]
    async fn test_admin_dashboard_counts_own_school() {
        let storage = create_memory_storage().await;
        let north = storage.ensure_school("north", "North").await.unwrap();
        let south = storage.ensure_school("south", "South").await.unwrap();
        for school_id in [north.id, south.id, south.id] {
            storage
                .create_inquiry(
                    school_id,
                    CreateInquiryRequest {
                        name: "Grace Hopper".into(),
                        email: "grace@example.com".into(),
                        message: "Do you offer a robotics club?".into(),
                    },
                )
                .await
                .unwrap();
        }

        let req = session_request(
            &storage,
            fake_user(north.id, UserRole::Admin),
            Area::Admin,
            None,
        );
        let body = read_json(
            DashboardService::new_lazy()
                .admin_dashboard(&req)
                .await
                .unwrap(),
        )
        .await;
        assert_eq!(body["data"]["new_inquiries"], 1);
        assert_eq!(body["data"]["students"], 0);
    }
}
