//! Main-menu and transaction-menu endpoints.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, put};
use axum::{Json, Router};

use crate::api::dto::{
    AckResponse, ActionButtonRequest, AmountButtonRequest, DisplayRequest, MenuButtonRequest,
    MenuSettingsRequest, TransactionScalarsRequest,
};
use crate::app_state::AppState;
use crate::domain::{ActionButtonKind, AmountGroupKind, TransactionKind};
use crate::error::{EditorError, ErrorResponse};

fn parse_kind(raw: &str) -> Result<TransactionKind, EditorError> {
    match raw {
        "purchase" => Ok(TransactionKind::Purchase),
        "sell" => Ok(TransactionKind::Sell),
        other => Err(EditorError::InvalidRequest(format!(
            "unknown transaction menu: {other}"
        ))),
    }
}

fn parse_group(raw: &str) -> Result<AmountGroupKind, EditorError> {
    match raw {
        "add" => Ok(AmountGroupKind::Add),
        "remove" => Ok(AmountGroupKind::Remove),
        "set" => Ok(AmountGroupKind::Set),
        other => Err(EditorError::InvalidRequest(format!(
            "unknown button group: {other}"
        ))),
    }
}

fn parse_action(raw: &str) -> Result<ActionButtonKind, EditorError> {
    match raw {
        "confirm" => Ok(ActionButtonKind::Confirm),
        "cancel" => Ok(ActionButtonKind::Cancel),
        "back" => Ok(ActionButtonKind::Back),
        "sell-all" => Ok(ActionButtonKind::SellAll),
        other => Err(EditorError::InvalidRequest(format!(
            "unknown action button: {other}"
        ))),
    }
}

/// `GET /menu` — The main menu document.
#[utoipa::path(
    get,
    path = "/api/v1/menu",
    tag = "Menus",
    summary = "Get the main menu",
    responses(
        (status = 200, description = "The main menu", body = serde_json::Value),
    )
)]
pub async fn get_menu(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.editor.main_menu().await)
}

/// `PUT /menu/settings` — Update the main-menu title and rows.
///
/// # Errors
///
/// Returns [`EditorError::InvalidRequest`] when rows are out of range.
#[utoipa::path(
    put,
    path = "/api/v1/menu/settings",
    tag = "Menus",
    summary = "Update main-menu settings",
    request_body = MenuSettingsRequest,
    responses(
        (status = 200, description = "Settings updated", body = AckResponse),
        (status = 400, description = "Rows out of range", body = ErrorResponse),
    )
)]
pub async fn update_menu_settings(
    State(state): State<AppState>,
    Json(req): Json<MenuSettingsRequest>,
) -> Result<impl IntoResponse, EditorError> {
    state
        .editor
        .update_menu_settings(req.title, req.rows)
        .await?;
    Ok(Json(AckResponse::ok()))
}

/// `PUT /menu/buttons/{key}` — Insert or replace a main-menu button.
///
/// # Errors
///
/// Returns [`EditorError::SlotConflict`] naming the occupant.
#[utoipa::path(
    put,
    path = "/api/v1/menu/buttons/{key}",
    tag = "Menus",
    summary = "Upsert a main-menu button",
    params(("key" = String, Path, description = "Button key")),
    request_body = MenuButtonRequest,
    responses(
        (status = 200, description = "Button stored", body = AckResponse),
        (status = 409, description = "Slot already occupied", body = ErrorResponse),
    )
)]
pub async fn upsert_menu_button(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(req): Json<MenuButtonRequest>,
) -> Result<impl IntoResponse, EditorError> {
    let button = req.into_button(&key)?;
    state.editor.upsert_menu_button(button).await?;
    Ok(Json(AckResponse::ok()))
}

/// `DELETE /menu/buttons/{key}` — Remove a main-menu button.
///
/// # Errors
///
/// Returns [`EditorError::ButtonNotFound`] for an unknown key.
#[utoipa::path(
    delete,
    path = "/api/v1/menu/buttons/{key}",
    tag = "Menus",
    summary = "Remove a main-menu button",
    params(("key" = String, Path, description = "Button key")),
    responses(
        (status = 204, description = "Button removed"),
        (status = 404, description = "Unknown key", body = ErrorResponse),
    )
)]
pub async fn remove_menu_button(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<impl IntoResponse, EditorError> {
    state.editor.remove_menu_button(&key).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /transactions/{kind}` — A transaction menu's settings.
///
/// # Errors
///
/// Returns [`EditorError::InvalidRequest`] for an unknown kind.
#[utoipa::path(
    get,
    path = "/api/v1/transactions/{kind}",
    tag = "Menus",
    summary = "Get transaction-menu settings",
    params(("kind" = String, Path, description = "`purchase` or `sell`")),
    responses(
        (status = 200, description = "The settings", body = serde_json::Value),
        (status = 400, description = "Unknown kind", body = ErrorResponse),
    )
)]
pub async fn get_transaction(
    State(state): State<AppState>,
    Path(kind): Path<String>,
) -> Result<impl IntoResponse, EditorError> {
    let kind = parse_kind(&kind)?;
    Ok(Json(state.editor.transaction_menu(kind).await))
}

/// `PUT /transactions/{kind}/settings` — Update the scalar fields.
///
/// # Errors
///
/// Returns [`EditorError::InvalidRequest`] for an unknown kind.
#[utoipa::path(
    put,
    path = "/api/v1/transactions/{kind}/settings",
    tag = "Menus",
    summary = "Update transaction-menu scalars",
    params(("kind" = String, Path, description = "`purchase` or `sell`")),
    request_body = TransactionScalarsRequest,
    responses(
        (status = 200, description = "Settings updated", body = AckResponse),
        (status = 400, description = "Unknown kind", body = ErrorResponse),
    )
)]
pub async fn update_transaction_scalars(
    State(state): State<AppState>,
    Path(kind): Path<String>,
    Json(req): Json<TransactionScalarsRequest>,
) -> Result<impl IntoResponse, EditorError> {
    let kind = parse_kind(&kind)?;
    state
        .editor
        .update_transaction_scalars(kind, req.into_scalars())
        .await?;
    Ok(Json(AckResponse::ok()))
}

/// `PUT /transactions/{kind}/display` — Move the display item.
///
/// # Errors
///
/// Returns [`EditorError::SlotConflict`] naming the occupant.
#[utoipa::path(
    put,
    path = "/api/v1/transactions/{kind}/display",
    tag = "Menus",
    summary = "Move the display item",
    params(("kind" = String, Path, description = "`purchase` or `sell`")),
    request_body = DisplayRequest,
    responses(
        (status = 200, description = "Display moved", body = AckResponse),
        (status = 409, description = "Slot already occupied", body = ErrorResponse),
    )
)]
pub async fn set_display(
    State(state): State<AppState>,
    Path(kind): Path<String>,
    Json(req): Json<DisplayRequest>,
) -> Result<impl IntoResponse, EditorError> {
    let kind = parse_kind(&kind)?;
    let (material, slot) = req.into_parts()?;
    state
        .editor
        .set_transaction_display(kind, material, slot)
        .await?;
    Ok(Json(AckResponse::ok()))
}

/// `PUT /transactions/{kind}/buttons/{which}` — Replace an action button.
///
/// # Errors
///
/// Returns [`EditorError::SlotConflict`] or
/// [`EditorError::InvalidRequest`] for `sell-all` on the purchase menu.
#[utoipa::path(
    put,
    path = "/api/v1/transactions/{kind}/buttons/{which}",
    tag = "Menus",
    summary = "Replace an action button",
    params(
        ("kind" = String, Path, description = "`purchase` or `sell`"),
        ("which" = String, Path, description = "`confirm`, `cancel`, `back` or `sell-all`"),
    ),
    request_body = ActionButtonRequest,
    responses(
        (status = 200, description = "Button stored", body = AckResponse),
        (status = 409, description = "Slot already occupied", body = ErrorResponse),
    )
)]
pub async fn set_action_button(
    State(state): State<AppState>,
    Path((kind, which)): Path<(String, String)>,
    Json(req): Json<ActionButtonRequest>,
) -> Result<impl IntoResponse, EditorError> {
    let kind = parse_kind(&kind)?;
    let which = parse_action(&which)?;
    let button = req.into_button()?;
    state.editor.set_action_button(kind, which, button).await?;
    Ok(Json(AckResponse::ok()))
}

/// `PUT /transactions/{kind}/amounts/{group}/{amount}` — Upsert an
/// amount button.
///
/// # Errors
///
/// Returns [`EditorError::SlotConflict`] naming the occupant.
#[utoipa::path(
    put,
    path = "/api/v1/transactions/{kind}/amounts/{group}/{amount}",
    tag = "Menus",
    summary = "Upsert an amount button",
    params(
        ("kind" = String, Path, description = "`purchase` or `sell`"),
        ("group" = String, Path, description = "`add`, `remove` or `set`"),
        ("amount" = String, Path, description = "Amount token, kept verbatim"),
    ),
    request_body = AmountButtonRequest,
    responses(
        (status = 200, description = "Button stored", body = AckResponse),
        (status = 409, description = "Slot already occupied", body = ErrorResponse),
    )
)]
pub async fn upsert_amount_button(
    State(state): State<AppState>,
    Path((kind, group, amount)): Path<(String, String, String)>,
    Json(req): Json<AmountButtonRequest>,
) -> Result<impl IntoResponse, EditorError> {
    let kind = parse_kind(&kind)?;
    let group = parse_group(&group)?;
    let button = req.into_button()?;
    state
        .editor
        .upsert_amount_button(kind, group, &amount, button)
        .await?;
    Ok(Json(AckResponse::ok()))
}

/// `DELETE /transactions/{kind}/amounts/{group}/{amount}` — Remove an
/// amount button.
///
/// # Errors
///
/// Returns [`EditorError::ButtonNotFound`] for an unknown amount key.
#[utoipa::path(
    delete,
    path = "/api/v1/transactions/{kind}/amounts/{group}/{amount}",
    tag = "Menus",
    summary = "Remove an amount button",
    params(
        ("kind" = String, Path, description = "`purchase` or `sell`"),
        ("group" = String, Path, description = "`add`, `remove` or `set`"),
        ("amount" = String, Path, description = "Amount token"),
    ),
    responses(
        (status = 204, description = "Button removed"),
        (status = 404, description = "Unknown amount key", body = ErrorResponse),
    )
)]
pub async fn remove_amount_button(
    State(state): State<AppState>,
    Path((kind, group, amount)): Path<(String, String, String)>,
) -> Result<impl IntoResponse, EditorError> {
    let kind = parse_kind(&kind)?;
    let group = parse_group(&group)?;
    state
        .editor
        .remove_amount_button(kind, group, &amount)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Menu routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/menu", get(get_menu))
        .route("/menu/settings", put(update_menu_settings))
        .route(
            "/menu/buttons/{key}",
            put(upsert_menu_button).delete(remove_menu_button),
        )
        .route("/transactions/{kind}", get(get_transaction))
        .route(
            "/transactions/{kind}/settings",
            put(update_transaction_scalars),
        )
        .route("/transactions/{kind}/display", put(set_display))
        .route(
            "/transactions/{kind}/buttons/{which}",
            put(set_action_button),
        )
        .route(
            "/transactions/{kind}/amounts/{group}/{amount}",
            put(upsert_amount_button).delete(remove_amount_button),
        )
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn kind_and_group_parsing() {
        assert!(parse_kind("purchase").is_ok());
        assert!(parse_kind("sell").is_ok());
        assert!(parse_kind("trade").is_err());
        assert!(parse_group("add").is_ok());
        assert!(parse_group("clear").is_err());
        assert!(parse_action("sell-all").is_ok());
        assert!(parse_action("maybe").is_err());
    }
}
