// src/handlers/catalog.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::i18n::Locale,
    models::catalog::{CostPreview, ProductDetail, ProductOverview},
    services::catalog_service::BomLineInput,
};

fn validate_positive(val: &Decimal) -> Result<(), ValidationError> {
    if *val <= Decimal::ZERO {
        let mut err = ValidationError::new("range");
        err.add_param("min".into(), &0.0);
        err.message = Some("O valor deve ser maior que zero.".into());
        return Err(err);
    }
    Ok(())
}

// Linha de receita como chega no JSON: material + quanto dele vai em
// uma unidade do produto.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BomLinePayload {
    pub material_id: Uuid,

    #[validate(custom(function = "validate_positive"))]
    #[schema(example = "2.000")]
    pub quantity_required: Decimal,
}

fn to_bom_inputs(lines: &[BomLinePayload]) -> Vec<BomLineInput> {
    lines
        .iter()
        .map(|line| BomLineInput {
            material_id: line.material_id,
            quantity_required: line.quantity_required,
        })
        .collect()
}

// =============================================================================
//  PRODUTOS
// =============================================================================

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    #[schema(example = "Bolsa térmica G")]
    pub name: String,

    #[validate(length(min = 1, message = "A unidade é obrigatória."))]
    #[schema(example = "un")]
    pub unit: String,

    #[validate(nested)]
    pub materials: Vec<BomLinePayload>,
}

// POST /api/catalog/products
#[utoipa::path(
    post,
    path = "/api/catalog/products",
    tag = "Catalog",
    request_body = CreateProductPayload,
    responses(
        (status = 201, description = "Produto criado com receita", body = ProductDetail),
        (status = 404, description = "Material da receita não encontrado"),
        (status = 409, description = "Material repetido na receita")
    )
)]
pub async fn create_product(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<CreateProductPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let product = app_state
        .catalog_service
        .create_product(&payload.name, &payload.unit, &to_bom_inputs(&payload.materials))
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(product)))
}

#[derive(Debug, Deserialize)]
pub struct ProductSearchQuery {
    pub q: Option<String>,
}

// GET /api/catalog/products?q=
#[utoipa::path(
    get,
    path = "/api/catalog/products",
    tag = "Catalog",
    params(
        ("q" = Option<String>, Query, description = "Busca por nome")
    ),
    responses(
        (status = 200, description = "Produtos com custo unitário e quantidade possível", body = Vec<ProductOverview>)
    )
)]
pub async fn list_products(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(query): Query<ProductSearchQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let products = app_state
        .catalog_service
        .list_products(query.q.as_deref())
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(products)))
}

// GET /api/catalog/products/{id}
#[utoipa::path(
    get,
    path = "/api/catalog/products/{id}",
    tag = "Catalog",
    params(
        ("id" = Uuid, Path, description = "ID do Produto")
    ),
    responses(
        (status = 200, description = "Produto com receita detalhada", body = ProductDetail),
        (status = 404, description = "Produto não encontrado")
    )
)]
pub async fn get_product(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let product = app_state
        .catalog_service
        .get_product(id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(product)))
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: Option<String>,

    #[validate(length(min = 1, message = "A unidade é obrigatória."))]
    pub unit: Option<String>,

    // Quando vem, substitui a receita inteira.
    #[validate(nested)]
    pub materials: Option<Vec<BomLinePayload>>,
}

// PUT /api/catalog/products/{id}
#[utoipa::path(
    put,
    path = "/api/catalog/products/{id}",
    tag = "Catalog",
    request_body = UpdateProductPayload,
    params(
        ("id" = Uuid, Path, description = "ID do Produto")
    ),
    responses(
        (status = 200, description = "Produto atualizado", body = ProductDetail),
        (status = 404, description = "Produto ou material da receita não encontrado"),
        (status = 409, description = "Material repetido na receita")
    )
)]
pub async fn update_product(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateProductPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let bom = payload.materials.as_deref().map(to_bom_inputs);

    let product = app_state
        .catalog_service
        .update_product(
            id,
            payload.name.as_deref(),
            payload.unit.as_deref(),
            bom.as_deref(),
        )
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(product)))
}

// DELETE /api/catalog/products/{id}
#[utoipa::path(
    delete,
    path = "/api/catalog/products/{id}",
    tag = "Catalog",
    params(
        ("id" = Uuid, Path, description = "ID do Produto")
    ),
    responses(
        (status = 204, description = "Produto e receita removidos"),
        (status = 404, description = "Produto não encontrado")
    )
)]
pub async fn delete_product(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .catalog_service
        .delete_product(id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
//  CUSTO
// =============================================================================

// GET /api/catalog/products/{id}/cost
#[utoipa::path(
    get,
    path = "/api/catalog/products/{id}/cost",
    tag = "Catalog",
    params(
        ("id" = Uuid, Path, description = "ID do Produto")
    ),
    responses(
        (status = 200, description = "Custo unitário do produto pela receita atual", body = CostPreview),
        (status = 404, description = "Produto não encontrado")
    )
)]
pub async fn get_product_cost(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let cost = app_state
        .catalog_service
        .get_product_cost(id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(cost)))
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CostPreviewPayload {
    #[validate(nested)]
    pub materials: Vec<BomLinePayload>,
}

// POST /api/catalog/products/cost-preview
// Custo de uma receita ainda não salva, para o formulário de produto.
#[utoipa::path(
    post,
    path = "/api/catalog/products/cost-preview",
    tag = "Catalog",
    request_body = CostPreviewPayload,
    responses(
        (status = 200, description = "Custo da receita proposta", body = CostPreview),
        (status = 404, description = "Material da receita não encontrado")
    )
)]
pub async fn cost_preview(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<CostPreviewPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let preview = app_state
        .catalog_service
        .cost_preview(&to_bom_inputs(&payload.materials))
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(preview)))
}
