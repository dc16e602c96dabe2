use axum::{
    extract::{Json, Path, State},
    routing::{get, put},
    Router,
};
use tracing::instrument;
use validator::Validate;

use super::AppState;
use crate::dto::{
    CreateMemberRequest, CreateMemberResponse, ListResult, MemberEntityRequest, MemberNameDto,
    UpdateMemberRequest, UpdateMemberResponse,
};
use crate::entities::member;
use crate::errors::ServiceError;
use crate::repositories::NewMember;

/// List members as stored entities
#[utoipa::path(
    get,
    path = "/api/v1/members",
    summary = "List member entities",
    description = "Returns the stored member entities as-is. Prefer /api/v2/members.",
    responses(
        (status = 200, description = "Members retrieved", body = [member::Model]),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse),
    ),
    tag = "members"
)]
#[instrument(skip(state))]
pub async fn members_v1(
    State(state): State<AppState>,
) -> Result<Json<Vec<member::Model>>, ServiceError> {
    Ok(Json(state.services.members.find_members().await?))
}

#[utoipa::path(
    get,
    path = "/api/v2/members",
    summary = "List member names",
    responses(
        (status = 200, description = "Members retrieved", body = ListResult<MemberNameDto>),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse),
    ),
    tag = "members"
)]
#[instrument(skip(state))]
pub async fn members_v2(
    State(state): State<AppState>,
) -> Result<Json<ListResult<MemberNameDto>>, ServiceError> {
    let members = state.services.members.find_members().await?;
    Ok(Json(ListResult::new(
        members.into_iter().map(MemberNameDto::from).collect(),
    )))
}

#[utoipa::path(
    post,
    path = "/api/v1/members",
    summary = "Register member from an entity-shaped body",
    request_body = MemberEntityRequest,
    responses(
        (status = 200, description = "Member registered", body = CreateMemberResponse),
        (status = 400, description = "Invalid request data", body = crate::errors::ErrorResponse),
        (status = 409, description = "Member name already taken", body = crate::errors::ErrorResponse),
    ),
    tag = "members"
)]
#[instrument(skip(state, request))]
pub async fn save_member_v1(
    State(state): State<AppState>,
    Json(request): Json<MemberEntityRequest>,
) -> Result<Json<CreateMemberResponse>, ServiceError> {
    request.validate()?;
    let id = state.services.members.join(request.into()).await?;
    Ok(Json(CreateMemberResponse { id }))
}

#[utoipa::path(
    post,
    path = "/api/v2/members",
    summary = "Register member",
    request_body = CreateMemberRequest,
    responses(
        (status = 200, description = "Member registered", body = CreateMemberResponse),
        (status = 400, description = "Invalid request data", body = crate::errors::ErrorResponse),
        (status = 409, description = "Member name already taken", body = crate::errors::ErrorResponse),
    ),
    tag = "members"
)]
#[instrument(skip(state, request))]
pub async fn save_member_v2(
    State(state): State<AppState>,
    Json(request): Json<CreateMemberRequest>,
) -> Result<Json<CreateMemberResponse>, ServiceError> {
    request.validate()?;
    let id = state
        .services
        .members
        .join(NewMember::new(request.name, None))
        .await?;
    Ok(Json(CreateMemberResponse { id }))
}

#[utoipa::path(
    put,
    path = "/api/v2/members/{id}",
    summary = "Rename member",
    params(("id" = i64, Path, description = "Member id")),
    request_body = UpdateMemberRequest,
    responses(
        (status = 200, description = "Member renamed", body = UpdateMemberResponse),
        (status = 400, description = "Invalid request data", body = crate::errors::ErrorResponse),
        (status = 404, description = "Member not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Member name already taken", body = crate::errors::ErrorResponse),
    ),
    tag = "members"
)]
#[instrument(skip(state, request))]
pub async fn update_member_v2(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateMemberRequest>,
) -> Result<Json<UpdateMemberResponse>, ServiceError> {
    request.validate()?;
    let member = state.services.members.update(id, &request.name).await?;
    Ok(Json(UpdateMemberResponse {
        id: member.id,
        name: member.name,
    }))
}

pub fn member_routes() -> Router<AppState> {
    Router::new()
        .route("/api/v1/members", get(members_v1).post(save_member_v1))
        .route("/api/v2/members", get(members_v2).post(save_member_v2))
        .route("/api/v2/members/:id", put(update_member_v2))
}
