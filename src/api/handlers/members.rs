/*
 * Responsibility
 * - GET/POST /api/members (demo data, no storage)
 * - Creating members is limited to owner/staff
 */
use axum::{Json, extract::rejection::JsonRejection};
use uuid::Uuid;

use crate::api::dto::envelope::DataResponse;
use crate::api::dto::resources::{CreateMemberRequest, MemberResponse};
use crate::api::extractors::CurrentPrincipal;
use crate::error::AppError;
use crate::services::auth::Role;

fn demo_members() -> Vec<MemberResponse> {
    vec![
        MemberResponse {
            id: "1".to_string(),
            full_name: "John Doe".to_string(),
            email: "john@example.com".to_string(),
            phone: "1234567890".to_string(),
            join_date: "2024-01-15".to_string(),
        },
        MemberResponse {
            id: "2".to_string(),
            full_name: "Jane Smith".to_string(),
            email: "jane@example.com".to_string(),
            phone: "0987654321".to_string(),
            join_date: "2024-02-01".to_string(),
        },
    ]
}

pub async fn list_members(
    CurrentPrincipal(principal): CurrentPrincipal,
) -> Json<DataResponse<Vec<MemberResponse>>> {
    tracing::info!(subject_id = %principal.subject_id, "listing members");
    Json(DataResponse::ok(demo_members()))
}

pub async fn create_member(
    CurrentPrincipal(principal): CurrentPrincipal,
    body: Result<Json<CreateMemberRequest>, JsonRejection>,
) -> Result<Json<DataResponse<MemberResponse>>, AppError> {
    if !(principal.require_role(Role::Owner) || principal.require_role(Role::Staff)) {
        tracing::warn!(
            subject_id = %principal.subject_id,
            role = %principal.role,
            "member creation denied"
        );
        return Err(AppError::Forbidden);
    }

    let Json(req) = body?;
    let member = req
        .validate()
        .ok_or_else(|| AppError::bad_request("Missing required fields"))?;

    tracing::info!(subject_id = %principal.subject_id, "creating member");

    Ok(Json(DataResponse::ok(MemberResponse {
        id: Uuid::new_v4().to_string(),
        full_name: member.full_name,
        email: member.email,
        phone: member.phone,
        join_date: chrono::Utc::now().format("%Y-%m-%d").to_string(),
    })))
}
