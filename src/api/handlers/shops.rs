//! Shop endpoints: file management, the current document, and item CRUD.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post, put};
use axum::{Json, Router};

use crate::api::dto::{
    AckResponse, CreateShopRequest, ItemCreatedResponse, ItemRequest, ShopListResponse,
    ShopSettingsRequest,
};
use crate::app_state::AppState;
use crate::error::{EditorError, ErrorResponse};

/// `GET /shops` — List known shop files.
#[utoipa::path(
    get,
    path = "/api/v1/shops",
    tag = "Shops",
    summary = "List shop files",
    description = "Returns the sorted stems of every known shop file and which one is currently open.",
    responses(
        (status = 200, description = "Shop list", body = ShopListResponse),
    )
)]
pub async fn list_shops(State(state): State<AppState>) -> impl IntoResponse {
    let shops = state.editor.shop_stems().await;
    let current = state.editor.current_shop().await.map(|(stem, _)| stem);
    Json(ShopListResponse { shops, current })
}

/// `POST /shops` — Create a new shop file.
///
/// # Errors
///
/// Returns [`EditorError::DuplicateShopFile`] or
/// [`EditorError::InvalidRequest`].
#[utoipa::path(
    post,
    path = "/api/v1/shops",
    tag = "Shops",
    summary = "Create a shop file",
    description = "Creates a shop file with canonical defaults and writes it to disk.",
    request_body = CreateShopRequest,
    responses(
        (status = 201, description = "Shop created", body = AckResponse),
        (status = 409, description = "Stem already taken", body = ErrorResponse),
    )
)]
pub async fn create_shop(
    State(state): State<AppState>,
    Json(req): Json<CreateShopRequest>,
) -> Result<impl IntoResponse, EditorError> {
    state.editor.create_shop(&req.name).await?;
    Ok((StatusCode::CREATED, Json(AckResponse::ok())))
}

/// `DELETE /shops/{stem}` — Delete a shop file.
///
/// # Errors
///
/// Returns [`EditorError::ShopNotFound`] for an unknown stem.
#[utoipa::path(
    delete,
    path = "/api/v1/shops/{stem}",
    tag = "Shops",
    summary = "Delete a shop file",
    description = "Removes the shop file from disk and memory. This deletion cannot be rolled back.",
    params(("stem" = String, Path, description = "Shop file stem")),
    responses(
        (status = 204, description = "Shop deleted"),
        (status = 404, description = "Unknown stem", body = ErrorResponse),
    )
)]
pub async fn delete_shop(
    State(state): State<AppState>,
    Path(stem): Path<String>,
) -> Result<impl IntoResponse, EditorError> {
    state.editor.delete_shop(&stem).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /shops/{stem}/open` — Make a shop the current document.
///
/// # Errors
///
/// Returns [`EditorError::ShopNotFound`] for an unknown stem.
#[utoipa::path(
    post,
    path = "/api/v1/shops/{stem}/open",
    tag = "Shops",
    summary = "Open a shop",
    description = "Persists any pending edits, then parses and opens the given shop file. Item ids reset.",
    params(("stem" = String, Path, description = "Shop file stem")),
    responses(
        (status = 200, description = "The parsed document", body = serde_json::Value),
        (status = 404, description = "Unknown stem", body = ErrorResponse),
    )
)]
pub async fn open_shop(
    State(state): State<AppState>,
    Path(stem): Path<String>,
) -> Result<impl IntoResponse, EditorError> {
    let document = state.editor.open_shop(&stem).await?;
    Ok(Json(document))
}

/// `GET /shops/current` — The currently open document.
///
/// # Errors
///
/// Returns [`EditorError::NoShopOpen`] when nothing is open.
#[utoipa::path(
    get,
    path = "/api/v1/shops/current",
    tag = "Shops",
    summary = "Get the current shop",
    responses(
        (status = 200, description = "The current document", body = serde_json::Value),
        (status = 409, description = "No shop open", body = ErrorResponse),
    )
)]
pub async fn current_shop(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, EditorError> {
    let (stem, document) = state
        .editor
        .current_shop()
        .await
        .ok_or(EditorError::NoShopOpen)?;
    Ok(Json(serde_json::json!({ "stem": stem, "document": document })))
}

/// `PUT /shops/current/settings` — Update the shop settings block.
///
/// # Errors
///
/// Returns [`EditorError::NoShopOpen`] or [`EditorError::InvalidRequest`].
#[utoipa::path(
    put,
    path = "/api/v1/shops/current/settings",
    tag = "Shops",
    summary = "Update shop settings",
    request_body = ShopSettingsRequest,
    responses(
        (status = 200, description = "Settings updated", body = AckResponse),
        (status = 400, description = "Rows out of range", body = ErrorResponse),
        (status = 409, description = "No shop open", body = ErrorResponse),
    )
)]
pub async fn update_shop_settings(
    State(state): State<AppState>,
    Json(req): Json<ShopSettingsRequest>,
) -> Result<impl IntoResponse, EditorError> {
    state
        .editor
        .update_shop_settings(req.into_snapshot())
        .await?;
    Ok(Json(AckResponse::ok()))
}

/// `POST /shops/current/items` — Add an item to the current shop.
///
/// # Errors
///
/// Returns [`EditorError::NoShopOpen`] when nothing is open.
#[utoipa::path(
    post,
    path = "/api/v1/shops/current/items",
    tag = "Shops",
    summary = "Add an item",
    request_body = ItemRequest,
    responses(
        (status = 201, description = "Item created", body = ItemCreatedResponse),
        (status = 409, description = "No shop open", body = ErrorResponse),
    )
)]
pub async fn add_item(
    State(state): State<AppState>,
    Json(req): Json<ItemRequest>,
) -> Result<impl IntoResponse, EditorError> {
    let id = state.editor.add_item(req.into_item()).await?;
    Ok((StatusCode::CREATED, Json(ItemCreatedResponse { id })))
}

/// `PUT /shops/current/items/{id}` — Overwrite an item's fields.
///
/// # Errors
///
/// Returns [`EditorError::ItemNotFound`] for an unknown id.
#[utoipa::path(
    put,
    path = "/api/v1/shops/current/items/{id}",
    tag = "Shops",
    summary = "Update an item",
    params(("id" = u64, Path, description = "In-memory item id")),
    request_body = ItemRequest,
    responses(
        (status = 200, description = "Item updated", body = AckResponse),
        (status = 404, description = "Unknown item", body = ErrorResponse),
    )
)]
pub async fn update_item(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(req): Json<ItemRequest>,
) -> Result<impl IntoResponse, EditorError> {
    state.editor.update_item(id, req.into_item()).await?;
    Ok(Json(AckResponse::ok()))
}

/// `DELETE /shops/current/items/{id}` — Remove an item.
///
/// # Errors
///
/// Returns [`EditorError::ItemNotFound`] for an unknown id.
#[utoipa::path(
    delete,
    path = "/api/v1/shops/current/items/{id}",
    tag = "Shops",
    summary = "Remove an item",
    params(("id" = u64, Path, description = "In-memory item id")),
    responses(
        (status = 204, description = "Item removed"),
        (status = 404, description = "Unknown item", body = ErrorResponse),
    )
)]
pub async fn remove_item(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<impl IntoResponse, EditorError> {
    state.editor.remove_item(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Shop routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/shops", get(list_shops).post(create_shop))
        .route("/shops/current", get(current_shop))
        .route("/shops/current/settings", put(update_shop_settings))
        .route("/shops/current/items", post(add_item))
        .route(
            "/shops/current/items/{id}",
            put(update_item).delete(remove_item),
        )
        .route("/shops/{stem}", axum::routing::delete(delete_shop))
        .route("/shops/{stem}/open", post(open_shop))
}
