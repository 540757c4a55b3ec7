// src/handlers/sales.rs

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

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::i18n::Locale,
    models::sales::{
        DraftOrderItem, OrderDetail, OrderItemType, OrderListEntry, OrderStatus, Payment,
        PaymentMethod,
    },
};

// =============================================================================
//  SUBMISSÃO DE PEDIDO
// =============================================================================

// Linha do rascunho como chega do formulário. As regras cruzadas
// (tipo × id, quantidade, preço) são do planejador, que responde com
// o motivo exato da recusa.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemPayload {
    #[schema(example = "PRODUCT")]
    pub item_type: OrderItemType,

    pub product_id: Option<Uuid>,
    pub material_id: Option<Uuid>,

    #[schema(example = "2.000")]
    pub quantity: Decimal,

    #[schema(example = "100.00")]
    pub unit_price: Decimal,

    #[serde(default)]
    #[schema(example = "5.00")]
    pub discount: Decimal,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitOrderPayload {
    pub customer_id: Uuid,

    pub items: Vec<OrderItemPayload>,

    // Entrada paga na hora, como veio do campo de texto ("50", "50,00",
    // vazio). Ilegível vale zero.
    #[schema(example = "50,00")]
    pub paid_amount: Option<String>,

    #[schema(example = "CASH")]
    pub payment_method: Option<PaymentMethod>,

    pub notes: Option<String>,

    #[schema(value_type = Option<String>, format = DateTime)]
    pub order_date: Option<DateTime<Utc>>,
}

// POST /api/sales/orders
#[utoipa::path(
    post,
    path = "/api/sales/orders",
    tag = "Sales",
    request_body = SubmitOrderPayload,
    responses(
        (status = 201, description = "Pedido gravado (estoque baixado)", body = OrderDetail),
        (status = 400, description = "Rascunho inválido"),
        (status = 404, description = "Cliente, produto ou material não encontrado"),
        (status = 409, description = "Estoque insuficiente")
    )
)]
pub async fn submit_order(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<SubmitOrderPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let items: Vec<DraftOrderItem> = payload
        .items
        .iter()
        .map(|item| DraftOrderItem {
            item_type: item.item_type,
            product_id: item.product_id,
            material_id: item.material_id,
            quantity: item.quantity,
            unit_price: item.unit_price,
            discount: item.discount,
        })
        .collect();

    let order = app_state
        .sales_service
        .submit_order(
            payload.customer_id,
            &items,
            payload.paid_amount.as_deref(),
            payload.payment_method.unwrap_or(PaymentMethod::Cash),
            payload.notes.as_deref(),
            payload.order_date,
        )
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(order)))
}

// =============================================================================
//  CONSULTA
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct OrderListQuery {
    pub customer_id: Option<Uuid>,
    pub status: Option<OrderStatus>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

// GET /api/sales/orders?customer_id=&status=&from=&to=
#[utoipa::path(
    get,
    path = "/api/sales/orders",
    tag = "Sales",
    params(
        ("customer_id" = Option<Uuid>, Query, description = "Filtra por cliente"),
        ("status" = Option<String>, Query, description = "PENDING, PARTIAL_PAID ou COMPLETED"),
        ("from" = Option<String>, Query, description = "Data inicial (RFC 3339)"),
        ("to" = Option<String>, Query, description = "Data final (RFC 3339)")
    ),
    responses(
        (status = 200, description = "Pedidos com nome do cliente", body = Vec<OrderListEntry>)
    )
)]
pub async fn list_orders(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(query): Query<OrderListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let orders = app_state
        .sales_service
        .list_orders(query.customer_id, query.status, query.from, query.to)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(orders)))
}

// GET /api/sales/orders/{id}
#[utoipa::path(
    get,
    path = "/api/sales/orders/{id}",
    tag = "Sales",
    params(
        ("id" = Uuid, Path, description = "ID do Pedido")
    ),
    responses(
        (status = 200, description = "Pedido com itens e pagamentos", body = OrderDetail),
        (status = 404, description = "Pedido não encontrado")
    )
)]
pub async fn get_order(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let order = app_state
        .sales_service
        .get_order_detail(id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(order)))
}

// =============================================================================
//  PAGAMENTOS
// =============================================================================

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentPayload {
    #[schema(example = "80.00")]
    pub amount: Decimal,

    #[schema(example = "TRANSFER")]
    pub payment_method: Option<PaymentMethod>,

    pub notes: Option<String>,
}

// POST /api/sales/orders/{id}/payments
#[utoipa::path(
    post,
    path = "/api/sales/orders/{id}/payments",
    tag = "Sales",
    request_body = CreatePaymentPayload,
    params(
        ("id" = Uuid, Path, description = "ID do Pedido")
    ),
    responses(
        (status = 201, description = "Pagamento registrado (status do pedido refeito)", body = Payment),
        (status = 400, description = "Valor não positivo"),
        (status = 404, description = "Pedido não encontrado")
    )
)]
pub async fn create_payment(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
    Json(payload): Json<CreatePaymentPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let payment = app_state
        .sales_service
        .record_payment(
            id,
            payload.amount,
            payload.payment_method.unwrap_or(PaymentMethod::Cash),
            payload.notes.as_deref(),
        )
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(payment)))
}

// GET /api/sales/orders/{id}/payments
#[utoipa::path(
    get,
    path = "/api/sales/orders/{id}/payments",
    tag = "Sales",
    params(
        ("id" = Uuid, Path, description = "ID do Pedido")
    ),
    responses(
        (status = 200, description = "Pagamentos do pedido", body = Vec<Payment>),
        (status = 404, description = "Pedido não encontrado")
    )
)]
pub async fn list_payments(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let payments = app_state
        .sales_service
        .list_payments(id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(payments)))
}
