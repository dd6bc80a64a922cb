use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::app::items::ItemService;
use crate::app::users::UserService;
use crate::domain::device::DeviceEndpoint;
use crate::domain::item::Item;
use crate::domain::notification::ActivityAction;
use crate::domain::user::User;
use crate::http::{AppError, AuthUser};
use crate::AppState;

const MAX_TITLE_LEN: usize = 500;
const MAX_TOKEN_LEN: usize = 4096;

#[derive(Serialize)]
pub(crate) struct HealthResponse {
    status: &'static str,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

pub(crate) async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let status = if state.db.ping().await.is_ok() {
        "ok"
    } else {
        "degraded"
    };

    Json(HealthResponse { status })
}

pub async fn get_account(
    auth: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<User>, AppError> {
    let service = UserService::new(state.db.clone());
    let user = service.get_user(auth.user_id).await.map_err(|err| {
        tracing::error!(error = ?err, user_id = %auth.user_id, "failed to get user");
        AppError::internal("failed to get user")
    })?;

    match user {
        Some(user) => Ok(Json(user)),
        None => Err(AppError::not_found("user not found")),
    }
}

#[derive(Deserialize)]
pub struct UpdateSettingsRequest {
    pub settings: Value,
}

#[derive(Serialize)]
pub struct SettingsResponse {
    pub settings: Value,
}

pub async fn update_settings(
    auth: AuthUser,
    State(state): State<AppState>,
    payload: Result<Json<UpdateSettingsRequest>, JsonRejection>,
) -> Result<Json<SettingsResponse>, AppError> {
    let Json(payload) = payload?;
    if !payload.settings.is_object() {
        return Err(AppError::bad_request("settings must be an object"));
    }

    let service = UserService::new(state.db.clone());
    let settings = service
        .update_settings(auth.user_id, payload.settings)
        .await
        .map_err(|err| {
            tracing::error!(error = ?err, user_id = %auth.user_id, "failed to update settings");
            AppError::internal("failed to update settings")
        })?;

    match settings {
        Some(settings) => Ok(Json(SettingsResponse { settings })),
        None => Err(AppError::not_found("user not found")),
    }
}

pub async fn list_device_tokens(
    auth: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<DeviceEndpoint>>, AppError> {
    let endpoints = state
        .devices
        .list_for_user(auth.user_id)
        .await
        .map_err(|err| {
            tracing::error!(error = ?err, user_id = %auth.user_id, "failed to list device tokens");
            AppError::internal("failed to list device tokens")
        })?;

    Ok(Json(endpoints))
}

#[derive(Deserialize)]
pub struct RegisterDeviceTokenRequest {
    pub token: String,
    pub device_type: String,
    pub device_name: Option<String>,
}

pub async fn register_device_token(
    auth: AuthUser,
    State(state): State<AppState>,
    payload: Result<Json<RegisterDeviceTokenRequest>, JsonRejection>,
) -> Result<Json<DeviceEndpoint>, AppError> {
    let Json(payload) = payload?;
    let token = payload.token.trim().to_string();
    let device_type = payload.device_type.trim().to_string();
    if token.is_empty() || device_type.is_empty() {
        return Err(AppError::bad_request("token and device_type are required"));
    }
    if token.chars().count() > MAX_TOKEN_LEN {
        return Err(AppError::bad_request("token must be at most 4096 characters"));
    }
    let device_name = payload
        .device_name
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty());

    let endpoint = state
        .devices
        .register(auth.user_id, token, device_type, device_name)
        .await
        .map_err(|err| {
            tracing::error!(error = ?err, user_id = %auth.user_id, "failed to register device token");
            AppError::internal("failed to register device token")
        })?;

    Ok(Json(endpoint))
}

#[derive(Deserialize)]
pub struct RemoveDeviceTokenRequest {
    pub token: String,
}

pub async fn remove_device_token(
    auth: AuthUser,
    State(state): State<AppState>,
    payload: Result<Json<RemoveDeviceTokenRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let Json(payload) = payload?;
    let token = payload.token.trim();
    if token.is_empty() {
        return Err(AppError::bad_request("token is required"));
    }

    state
        .devices
        .remove(auth.user_id, token)
        .await
        .map_err(|err| {
            tracing::error!(error = ?err, user_id = %auth.user_id, "failed to remove device token");
            AppError::internal("failed to remove device token")
        })?;

    Ok(Json(MessageResponse {
        message: "device token removed",
    }))
}

#[derive(Deserialize)]
pub struct CreateItemRequest {
    pub title: String,
    pub notes: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateItemRequest {
    pub title: Option<String>,
    /// Absent leaves notes alone, `null` clears them.
    #[serde(default, deserialize_with = "present")]
    pub notes: Option<Option<String>>,
}

fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

fn validate_title(title: &str) -> Result<String, AppError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(AppError::bad_request("title is required"));
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(AppError::bad_request("title must be at most 500 characters"));
    }
    Ok(title.to_string())
}

pub async fn list_items(
    _auth: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<Item>>, AppError> {
    let service = ItemService::new(state.db.clone());
    let items = service.list_items().await.map_err(|err| {
        tracing::error!(error = ?err, "failed to list items");
        AppError::internal("failed to list items")
    })?;

    Ok(Json(items))
}

pub async fn get_item(
    Path(id): Path<Uuid>,
    _auth: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Item>, AppError> {
    let service = ItemService::new(state.db.clone());
    let item = service.get_item(id).await.map_err(|err| {
        tracing::error!(error = ?err, item_id = %id, "failed to get item");
        AppError::internal("failed to get item")
    })?;

    match item {
        Some(item) => Ok(Json(item)),
        None => Err(AppError::not_found("item not found")),
    }
}

pub async fn create_item(
    auth: AuthUser,
    State(state): State<AppState>,
    payload: Result<Json<CreateItemRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Item>), AppError> {
    let Json(payload) = payload?;
    let title = validate_title(&payload.title)?;

    let service = ItemService::new(state.db.clone());
    let item = service
        .create_item(auth.user_id, title, payload.notes)
        .await
        .map_err(|err| {
            tracing::error!(error = ?err, user_id = %auth.user_id, "failed to create item");
            AppError::internal("failed to create item")
        })?;

    state.dispatcher.notify_activity(
        auth.user_id,
        ActivityAction::Create,
        item.title.clone(),
        item.id,
    );

    Ok((StatusCode::CREATED, Json(item)))
}

pub async fn update_item(
    Path(id): Path<Uuid>,
    auth: AuthUser,
    State(state): State<AppState>,
    payload: Result<Json<UpdateItemRequest>, JsonRejection>,
) -> Result<Json<Item>, AppError> {
    let Json(payload) = payload?;
    let title = payload.title.as_deref().map(validate_title).transpose()?;

    let service = ItemService::new(state.db.clone());
    let item = service
        .update_item(id, title, payload.notes)
        .await
        .map_err(|err| {
            tracing::error!(error = ?err, item_id = %id, "failed to update item");
            AppError::internal("failed to update item")
        })?;

    let Some(item) = item else {
        return Err(AppError::not_found("item not found"));
    };

    state.dispatcher.notify_activity(
        auth.user_id,
        ActivityAction::Update,
        item.title.clone(),
        item.id,
    );

    Ok(Json(item))
}

pub async fn delete_item(
    Path(id): Path<Uuid>,
    auth: AuthUser,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    let service = ItemService::new(state.db.clone());
    let deleted = service.delete_item(id).await.map_err(|err| {
        tracing::error!(error = ?err, item_id = %id, "failed to delete item");
        AppError::internal("failed to delete item")
    })?;

    let Some(item) = deleted else {
        return Err(AppError::not_found("item not found"));
    };

    state
        .dispatcher
        .notify_activity(auth.user_id, ActivityAction::Delete, item.title, item.id);

    Ok(StatusCode::NO_CONTENT)
}
