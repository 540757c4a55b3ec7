// src/handlers/inventory.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::i18n::Locale,
    models::inventory::{
        BulkImportReport, ImportHistoryEntry, Material, MaterialCost, MaterialImport,
        MaterialWithCost,
    },
};

// ---
// Validações customizadas
// ---
fn validate_not_negative(val: &Decimal) -> Result<(), ValidationError> {
    if val.is_sign_negative() {
        let mut err = ValidationError::new("range");
        err.add_param("min".into(), &0.0);
        err.message = Some("O valor não pode ser negativo.".into());
        return Err(err);
    }
    Ok(())
}

fn validate_positive(val: &Decimal) -> Result<(), ValidationError> {
    if *val <= Decimal::ZERO {
        let mut err = ValidationError::new("range");
        err.add_param("min".into(), &0.0);
        err.message = Some("O valor deve ser maior que zero.".into());
        return Err(err);
    }
    Ok(())
}

// =============================================================================
//  MATERIAIS
// =============================================================================

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateMaterialPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    #[schema(example = "Tecido tricoline")]
    pub name: String,

    #[validate(length(min = 1, message = "A unidade é obrigatória."))]
    #[schema(example = "m")]
    pub unit: String,

    // Saldo de abertura para quem já tem estoque na prateleira.
    #[validate(custom(function = "validate_not_negative"))]
    #[schema(example = "12.500")]
    pub initial_stock: Option<Decimal>,
}

// POST /api/inventory/materials
#[utoipa::path(
    post,
    path = "/api/inventory/materials",
    tag = "Inventory",
    request_body = CreateMaterialPayload,
    responses(
        (status = 201, description = "Material criado", body = Material),
        (status = 409, description = "Nome já cadastrado")
    )
)]
pub async fn create_material(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<CreateMaterialPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let material = app_state
        .inventory_service
        .create_material(&payload.name, &payload.unit, payload.initial_stock)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(material)))
}

#[derive(Debug, Deserialize)]
pub struct MaterialSearchQuery {
    pub q: Option<String>,
}

// GET /api/inventory/materials?q=
#[utoipa::path(
    get,
    path = "/api/inventory/materials",
    tag = "Inventory",
    params(
        ("q" = Option<String>, Query, description = "Busca por nome")
    ),
    responses(
        (status = 200, description = "Materiais com custo médio", body = Vec<MaterialWithCost>)
    )
)]
pub async fn list_materials(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(query): Query<MaterialSearchQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let materials = app_state
        .inventory_service
        .list_materials(query.q.as_deref())
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(materials)))
}

// GET /api/inventory/materials/{id}
#[utoipa::path(
    get,
    path = "/api/inventory/materials/{id}",
    tag = "Inventory",
    params(
        ("id" = Uuid, Path, description = "ID do Material")
    ),
    responses(
        (status = 200, description = "Material encontrado", body = Material),
        (status = 404, description = "Material não encontrado")
    )
)]
pub async fn get_material(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let material = app_state
        .inventory_service
        .get_material(id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(material)))
}

// GET /api/inventory/materials/{id}/cost
#[utoipa::path(
    get,
    path = "/api/inventory/materials/{id}/cost",
    tag = "Inventory",
    params(
        ("id" = Uuid, Path, description = "ID do Material")
    ),
    responses(
        (status = 200, description = "Custo médio ponderado do material", body = MaterialCost),
        (status = 404, description = "Material não encontrado")
    )
)]
pub async fn get_material_cost(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let cost = app_state
        .inventory_service
        .get_material_cost(id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(cost)))
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMaterialPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: Option<String>,

    #[validate(length(min = 1, message = "A unidade é obrigatória."))]
    pub unit: Option<String>,

    // Correção manual de inventário (contagem física).
    #[validate(custom(function = "validate_not_negative"))]
    pub current_stock: Option<Decimal>,
}

// PUT /api/inventory/materials/{id}
#[utoipa::path(
    put,
    path = "/api/inventory/materials/{id}",
    tag = "Inventory",
    request_body = UpdateMaterialPayload,
    params(
        ("id" = Uuid, Path, description = "ID do Material")
    ),
    responses(
        (status = 200, description = "Material atualizado", body = Material),
        (status = 404, description = "Material não encontrado"),
        (status = 409, description = "Nome já cadastrado")
    )
)]
pub async fn update_material(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateMaterialPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let material = app_state
        .inventory_service
        .update_material(
            id,
            payload.name.as_deref(),
            payload.unit.as_deref(),
            payload.current_stock,
        )
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(material)))
}

// DELETE /api/inventory/materials/{id}
#[utoipa::path(
    delete,
    path = "/api/inventory/materials/{id}",
    tag = "Inventory",
    params(
        ("id" = Uuid, Path, description = "ID do Material")
    ),
    responses(
        (status = 204, description = "Material removido"),
        (status = 404, description = "Material não encontrado"),
        (status = 409, description = "Material possui importações ou está em alguma receita")
    )
)]
pub async fn delete_material(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .inventory_service
        .delete_material(id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
//  IMPORTAÇÕES
// =============================================================================

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateImportPayload {
    pub material_id: Uuid,

    #[validate(custom(function = "validate_positive"))]
    #[schema(example = "10.000")]
    pub quantity: Decimal,

    #[validate(custom(function = "validate_positive"))]
    #[schema(example = "18.90")]
    pub unit_price: Decimal,

    pub notes: Option<String>,

    // Data da compra; sem ela, vale o momento do registro.
    #[schema(value_type = Option<String>, format = DateTime, example = "2024-04-02T14:00:00Z")]
    pub import_date: Option<DateTime<Utc>>,
}

// POST /api/inventory/imports
#[utoipa::path(
    post,
    path = "/api/inventory/imports",
    tag = "Inventory",
    request_body = CreateImportPayload,
    responses(
        (status = 201, description = "Importação registrada (estoque somado)", body = MaterialImport),
        (status = 404, description = "Material não encontrado")
    )
)]
pub async fn create_import(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<CreateImportPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let import = app_state
        .inventory_service
        .record_import(
            payload.material_id,
            payload.quantity,
            payload.unit_price,
            payload.notes.as_deref(),
            payload.import_date,
        )
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(import)))
}

#[derive(Debug, Deserialize)]
pub struct ImportHistoryQuery {
    pub material_id: Option<Uuid>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

// GET /api/inventory/imports?material_id=&from=&to=
#[utoipa::path(
    get,
    path = "/api/inventory/imports",
    tag = "Inventory",
    params(
        ("material_id" = Option<Uuid>, Query, description = "Filtra por material"),
        ("from" = Option<String>, Query, description = "Data inicial (RFC 3339)"),
        ("to" = Option<String>, Query, description = "Data final (RFC 3339)")
    ),
    responses(
        (status = 200, description = "Histórico de importações", body = Vec<ImportHistoryEntry>)
    )
)]
pub async fn list_imports(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(query): Query<ImportHistoryQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let history = app_state
        .inventory_service
        .get_import_history(query.material_id, query.from, query.to)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(history)))
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BulkImportPayload {
    // Planilha colada: uma linha por importação, colunas
    // nome/unidade/quantidade/preço (TAB ou ponto e vírgula).
    #[validate(length(min = 1, message = "O conteúdo é obrigatório."))]
    #[schema(example = "Tecido tricoline;m;10;18,90\nZiper 20cm;un;50;1,25")]
    pub text: String,
}

// POST /api/inventory/imports/bulk
#[utoipa::path(
    post,
    path = "/api/inventory/imports/bulk",
    tag = "Inventory",
    request_body = BulkImportPayload,
    responses(
        (status = 200, description = "Lote processado; linhas ruins vêm em skipped", body = BulkImportReport)
    )
)]
pub async fn bulk_import(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<BulkImportPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let report = app_state
        .inventory_service
        .bulk_import(&payload.text)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(report)))
}
