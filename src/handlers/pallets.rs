// src/handlers/pallets.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    models::pallet::{
        AddProductPayload, CreatePositionPayload, ExpirationStatus, FilterState,
        SetPositionEnabledPayload, UpdateUnitCountPayload,
    },
};

// ---
// Query: filtros da tela de posições
// ---
// Campos planos de propósito: `serde(flatten)` com query string entrega tudo como
// texto e quebra `productCode`/`date`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PalletViewQuery {
    #[serde(default)]
    pub query: String,
    pub product_code: Option<i32>,
    pub date: Option<NaiveDate>,
    pub status: Option<ExpirationStatus>,
    // Permite fixar o "hoje" (relatórios, testes); senão vale a data local do servidor
    pub today: Option<NaiveDate>,
}

impl PalletViewQuery {
    pub fn into_parts(self, fallback_today: NaiveDate) -> (FilterState, NaiveDate) {
        let state = FilterState {
            query: self.query,
            product_code: self.product_code,
            date: self.date,
            status: self.status,
        };
        (state, self.today.unwrap_or(fallback_today))
    }
}

// GET /api/pallet-products
pub async fn get_snapshot(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let positions = app_state.pallet_service.get_snapshot().await?;
    Ok((StatusCode::OK, Json(positions)))
}

// GET /api/pallet-products/view
pub async fn get_view(
    State(app_state): State<AppState>,
    Query(params): Query<PalletViewQuery>,
) -> Result<impl IntoResponse, AppError> {
    // Único lugar em que o relógio é lido
    let (state, today) = params.into_parts(chrono::Local::now().date_naive());

    let view = app_state.pallet_service.get_view(&state, today).await?;
    Ok((StatusCode::OK, Json(view)))
}

// POST /api/pallet-positions
pub async fn create_position(
    State(app_state): State<AppState>,
    Json(payload): Json<CreatePositionPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let position = app_state
        .pallet_service
        .create_position(&payload.row, payload.slot)
        .await?;

    Ok((StatusCode::CREATED, Json(position)))
}

// PATCH /api/pallet-positions/{id}
pub async fn set_position_enabled(
    State(app_state): State<AppState>,
    Path(position_id): Path<i32>,
    Json(payload): Json<SetPositionEnabledPayload>,
) -> Result<impl IntoResponse, AppError> {
    let position = app_state
        .pallet_service
        .set_position_enabled(position_id, payload.enabled)
        .await?;

    Ok((StatusCode::OK, Json(position)))
}

// DELETE /api/pallet-positions/{id}
pub async fn delete_position(
    State(app_state): State<AppState>,
    Path(position_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    app_state.pallet_service.delete_position(position_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// POST /api/pallet-positions/{id}/products
pub async fn add_product(
    State(app_state): State<AppState>,
    Path(position_id): Path<i32>,
    Json(payload): Json<AddProductPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let product = app_state
        .pallet_service
        .add_product(position_id, payload)
        .await?;

    Ok((StatusCode::CREATED, Json(product)))
}

// PATCH /api/pallet-products/{id}
pub async fn update_unit_count(
    State(app_state): State<AppState>,
    Path(product_id): Path<i32>,
    Json(payload): Json<UpdateUnitCountPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let product = app_state
        .pallet_service
        .update_unit_count(product_id, payload.unit_count)
        .await?;

    Ok((StatusCode::OK, Json(product)))
}

// DELETE /api/pallet-products/{id}
pub async fn remove_product(
    State(app_state): State<AppState>,
    Path(product_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    app_state.pallet_service.remove_product(product_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
