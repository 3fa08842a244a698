use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::AdmissionService;
use super::load::find_resumable_lead;
use crate::models::{
    ApiResponse, ErrorCode,
    admissions::{
        entities::AdmissionLead,
        requests::{LeadChanges, UpdateApplicationRequest},
        responses::ApplicationView,
    },
};
use crate::services::tenancy;
use crate::utils::validate::{normalize_optional, validate_email, validate_length};

/// 校验单步更新，提交时按合并后的内容检查必填项
pub fn build_changes(
    lead: &AdmissionLead,
    req: UpdateApplicationRequest,
    max_step: i32,
) -> Result<LeadChanges, String> {
    if let Some(step) = req.step
        && !(1..=max_step).contains(&step)
    {
        return Err(format!("Step must be between 1 and {max_step}"));
    }

    let guardian_name = normalize_optional(req.guardian_name);
    if let Some(name) = &guardian_name {
        validate_length("Guardian name", name, 2, 100)?;
    }
    let guardian_email = normalize_optional(req.guardian_email);
    if let Some(email) = &guardian_email {
        validate_email(email).map_err(str::to_string)?;
    }
    let student_name = normalize_optional(req.student_name);
    if let Some(name) = &student_name {
        validate_length("Student name", name, 2, 100)?;
    }
    if let Some(grade) = req.grade_applying
        && !(0..=12).contains(&grade)
    {
        return Err("Grade must be between 0 and 12".to_string());
    }
    let notes = normalize_optional(req.notes);
    if let Some(notes) = &notes {
        validate_length("Notes", notes, 0, 2000)?;
    }

    if req.submit {
        let has_guardian = guardian_name.is_some() || !lead.guardian_name.is_empty();
        let has_email = guardian_email.is_some() || !lead.guardian_email.is_empty();
        let has_student = student_name.is_some() || lead.student_name.is_some();
        let has_grade = req.grade_applying.is_some() || lead.grade_applying.is_some();
        if !(has_guardian && has_email && has_student && has_grade) {
            return Err(
                "Guardian name, guardian email, student name and grade are required to submit"
                    .to_string(),
            );
        }
    }

    Ok(LeadChanges {
        step: req.step,
        guardian_name,
        guardian_email,
        guardian_phone: normalize_optional(req.guardian_phone),
        student_name,
        student_birth_date: req.student_birth_date,
        grade_applying: req.grade_applying,
        notes,
        submit: req.submit,
    })
}

pub async fn update_application(
    service: &AdmissionService,
    request: &HttpRequest,
    req: UpdateApplicationRequest,
) -> ActixResult<HttpResponse> {
    let lead = match find_resumable_lead(service, request, &req.token).await {
        Ok(lead) => lead,
        Err(res) => return Ok(res),
    };

    if lead.is_submitted() {
        return Ok(tenancy::conflict(
            ErrorCode::LeadAlreadySubmitted,
            "Application has already been submitted",
        ));
    }

    let max_step = service.get_config().admissions.max_step;
    let changes = match build_changes(&lead, req, max_step) {
        Ok(changes) => changes,
        Err(msg) => return Ok(tenancy::bad_request(ErrorCode::LeadInvalid, msg)),
    };
    let submitting = changes.submit;

    let storage = service.get_storage(request);
    match storage.update_lead(lead.id, changes).await {
        Ok(updated) => {
            if submitting {
                info!("Admission lead {} submitted", updated.id);
            }
            let message = if submitting {
                "Application submitted"
            } else {
                "Application saved"
            };
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                ApplicationView::from(updated),
                message,
            )))
        }
        Err(e) => Ok(tenancy::storage_error(
            "Failed to update application",
            ErrorCode::LeadAlreadySubmitted,
            e,
        )),
    }
}
