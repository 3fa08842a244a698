use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info};

use super::InquiryService;
use crate::models::{ApiResponse, ErrorCode, inquiries::requests::CreateInquiryRequest};
use crate::services::tenancy;
use crate::utils::validate::{validate_email, validate_length};

/// 校验并规整咨询内容
pub fn validate_inquiry(req: &CreateInquiryRequest) -> Result<CreateInquiryRequest, String> {
    let name = req.name.trim();
    let email = req.email.trim();
    let message = req.message.trim();

    validate_length("Name", name, 2, 100)?;
    validate_email(email).map_err(str::to_string)?;
    validate_length("Message", message, 10, 2000)?;

    Ok(CreateInquiryRequest {
        name: name.to_string(),
        email: email.to_string(),
        message: message.to_string(),
    })
}

pub async fn create_inquiry(
    service: &InquiryService,
    request: &HttpRequest,
    req: CreateInquiryRequest,
) -> ActixResult<HttpResponse> {
    let inquiry = match validate_inquiry(&req) {
        Ok(inquiry) => inquiry,
        Err(msg) => {
            return Ok(tenancy::bad_request(ErrorCode::InquiryInvalid, msg));
        }
    };

    let storage = service.get_storage(request);
    let school = match tenancy::resolve_school(&storage, request).await {
        Ok(school) => school,
        Err(res) => return Ok(res),
    };

    match storage.create_inquiry(school.id, inquiry).await {
        Ok(created) => {
            info!("Inquiry {} received for school {}", created.id, school.slug);
            Ok(HttpResponse::Created().json(ApiResponse::<()>::success_empty(
                "Thanks! We will get back to you soon.",
            )))
        }
        Err(e) => {
            error!("Failed to save inquiry: {}", e);
            Ok(tenancy::internal_error("Failed to save inquiry"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::inquiries::requests::InquiryListQuery;
    use crate::services::test_support::{public_request, read_json};
    use crate::storage::create_memory_storage;
    use actix_web::http::StatusCode;

    fn inquiry(name: &str, email: &str, message: &str) -> CreateInquiryRequest {
        CreateInquiryRequest {
            name: name.to_string(),
            email: email.to_string(),
            message: message.to_string(),
        }
    }

    #[test]
    fn test_validation_rules() {
        assert!(validate_inquiry(&inquiry("A", "a@b.co", "Hello there, school")).is_err());
        assert!(validate_inquiry(&inquiry("Ada", "not-an-email", "Hello there, school")).is_err());
        assert!(validate_inquiry(&inquiry("Ada", "ada@example.com", "too short")).is_err());
        let ok = validate_inquiry(&inquiry("  Ada  ", " ada@example.com ", "  Hello there, school  "))
            .unwrap();
        assert_eq!(ok.name, "Ada");
        assert_eq!(ok.message, "Hello there, school");
    }

    #[actix_web::test]
    async fn test_create_inquiry_for_tenant() {
        let storage = create_memory_storage().await;
        let school = storage.ensure_school("north", "North").await.unwrap();
        let service = InquiryService::new_lazy();

        let res = service
            .create_inquiry(
                &public_request(&storage, "north"),
                inquiry("Ada", "ada@example.com", "Do you offer grade 5 places?"),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::CREATED);
        assert_eq!(read_json(res).await["ok"], true);

        let list = storage
            .list_inquiries_with_pagination(school.id, InquiryListQuery::default())
            .await
            .unwrap();
        assert_eq!(list.items.len(), 1);

        let res = service
            .create_inquiry(
                &public_request(&storage, "south"),
                inquiry("Ada", "ada@example.com", "Do you offer grade 5 places?"),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        let body = read_json(res).await;
        assert_eq!(body["error"], "School not found");

        let res = service
            .create_inquiry(
                &public_request(&storage, "north"),
                inquiry("A", "ada@example.com", "Do you offer grade 5 places?"),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}
