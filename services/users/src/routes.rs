//! Routes for the user RPC service
//!
//! Each RPC is a unary `POST {RPC_PREFIX}/{Method}` with a JSON body, in the
//! shape of the Connect protocol.

use axum::{
    Json, Router,
    extract::State,
    response::IntoResponse,
    routing::{get, post},
};
use axum_extra::extract::WithRejection;
use serde_json::json;
use tracing::{error, info, warn};

use crate::{
    error::{RpcError, ServiceError},
    models::{
        CreateUserRequest, CreateUserResponse, DeleteUserRequest, DeleteUserResponse,
        GetUserRequest, GetUserResponse, ListUsersRequest, ListUsersResponse, UpdateUserRequest,
        UpdateUserResponse, UserMessage,
    },
    state::AppState,
};

/// Path prefix of the user RPC service
pub const RPC_PREFIX: &str = "/user.v1.UserService";

/// JSON body whose decode failures surface as `invalid_argument`
type RpcRequest<T> = WithRejection<Json<T>, RpcError>;

/// Create the router for the users service
pub fn create_router(state: AppState) -> Router {
    let rpc_routes = Router::new()
        .route("/CreateUser", post(create_user))
        .route("/GetUser", post(get_user))
        .route("/ListUsers", post(list_users))
        .route("/UpdateUser", post(update_user))
        .route("/DeleteUser", post(delete_user));

    Router::new()
        .route("/health", get(health_check))
        .nest(RPC_PREFIX, rpc_routes)
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": state.service_name,
    }))
}

/// Wrap a service failure as `internal`, logging conflicts below error level
fn internal(action: &str, err: ServiceError) -> RpcError {
    if err.is_conflict() {
        warn!("Failed to {}: {}", action, err);
    } else {
        error!("Failed to {}: {}", action, err);
    }
    RpcError::Internal(format!("failed to {}: {}", action, err))
}

/// Create a new user
pub async fn create_user(
    State(state): State<AppState>,
    WithRejection(Json(req), _): RpcRequest<CreateUserRequest>,
) -> Result<Json<CreateUserResponse>, RpcError> {
    let user = state
        .user_service
        .create_user(&req.name, &req.email)
        .await
        .map_err(|e| internal("create user", e))?;

    info!("Created user {}", user.id);
    Ok(Json(CreateUserResponse {
        user: UserMessage::from(&user),
    }))
}

/// Get a user by ID. Every failure is reported as `not_found`.
pub async fn get_user(
    State(state): State<AppState>,
    WithRejection(Json(req), _): RpcRequest<GetUserRequest>,
) -> Result<Json<GetUserResponse>, RpcError> {
    let user = state.user_service.get_user(req.id).await.map_err(|e| {
        match &e {
            ServiceError::NotFound(_) => info!("User {} not found", req.id),
            ServiceError::Store { .. } => error!("Failed to get user: {}", e),
        }
        RpcError::NotFound(format!("user not found: {}", e))
    })?;

    Ok(Json(GetUserResponse {
        user: UserMessage::from(&user),
    }))
}

/// List users. Page parameters are forwarded as received.
pub async fn list_users(
    State(state): State<AppState>,
    WithRejection(Json(req), _): RpcRequest<ListUsersRequest>,
) -> Result<Json<ListUsersResponse>, RpcError> {
    let (users, total) = state
        .user_service
        .list_users(req.page_size, req.page)
        .await
        .map_err(|e| internal("list users", e))?;

    Ok(Json(ListUsersResponse {
        users: users.iter().map(UserMessage::from).collect(),
        total: i32::try_from(total).unwrap_or(i32::MAX),
    }))
}

/// Replace a user's name and email
pub async fn update_user(
    State(state): State<AppState>,
    WithRejection(Json(req), _): RpcRequest<UpdateUserRequest>,
) -> Result<Json<UpdateUserResponse>, RpcError> {
    let user = state
        .user_service
        .update_user(req.id, &req.name, &req.email)
        .await
        .map_err(|e| internal("update user", e))?;

    Ok(Json(UpdateUserResponse {
        user: UserMessage::from(&user),
    }))
}

/// Delete a user
pub async fn delete_user(
    State(state): State<AppState>,
    WithRejection(Json(req), _): RpcRequest<DeleteUserRequest>,
) -> Result<Json<DeleteUserResponse>, RpcError> {
    state
        .user_service
        .delete_user(req.id)
        .await
        .map_err(|e| internal("delete user", e))?;

    info!("Deleted user {}", req.id);
    Ok(Json(DeleteUserResponse { success: true }))
}
