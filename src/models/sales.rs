// src/models/sales.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// --- ENUMS ---

// Derivado de paid_amount vs total_amount, nunca informado pelo cliente.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "order_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,     // Vira "PENDING"
    PartialPaid, // Vira "PARTIAL_PAID"
    Completed,   // Vira "COMPLETED"
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "order_item_type", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderItemType {
    Product,
    Material,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "payment_method", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Cash,
    Transfer,
    Other,
}

// --- Pedido (cabeçalho) ---
// Totais gravados na criação; paid_amount/debt_amount/status são
// recalculados a cada pagamento registrado.

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: Uuid,
    pub customer_id: Uuid,

    #[schema(example = "480.00")]
    pub total_amount: Decimal,
    #[schema(example = "139.20")]
    pub total_cost: Decimal,
    #[schema(example = "200.00")]
    pub paid_amount: Decimal,
    #[schema(example = "280.00")]
    pub debt_amount: Decimal,
    #[schema(example = "340.80")]
    pub profit: Decimal,

    pub status: OrderStatus,
    pub notes: Option<String>,
    pub order_date: DateTime<Utc>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// --- Item do pedido ---
// Snapshot: unit_price e unit_cost ficam congelados no momento da
// venda, imunes a importações futuras.

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    pub item_type: OrderItemType,
    pub product_id: Option<Uuid>,
    pub material_id: Option<Uuid>,

    #[schema(example = "4.000")]
    pub quantity: Decimal,
    #[schema(example = "120.00")]
    pub unit_price: Decimal,
    #[schema(example = "34.80")]
    pub unit_cost: Decimal,
    #[schema(example = "0.00")]
    pub discount: Decimal,

    pub created_at: DateTime<Utc>,
}

// --- Pagamento ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: Uuid,
    pub order_id: Uuid,

    #[schema(example = "200.00")]
    pub amount: Decimal,

    pub payment_method: PaymentMethod,
    pub notes: Option<String>,
    pub payment_date: DateTime<Utc>,
}

// --- Item de rascunho ---
// Linha de um pedido ainda não persistido, como chega da borda HTTP.
// O custo unitário NÃO vem daqui: o servidor resolve na submissão.

#[derive(Debug, Clone)]
pub struct DraftOrderItem {
    pub item_type: OrderItemType,
    pub product_id: Option<Uuid>,
    pub material_id: Option<Uuid>,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub discount: Decimal,
}

// --- Visões de leitura ---

// Pedido na listagem, com o nome do cliente resolvido.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderListEntry {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub customer_name: String,
    pub total_amount: Decimal,
    pub paid_amount: Decimal,
    pub debt_amount: Decimal,
    pub profit: Decimal,
    pub status: OrderStatus,
    pub order_date: DateTime<Utc>,
    pub items_count: i64,
}

// Item com o nome do produto/material resolvido (pode ter sido
// apagado do catálogo depois da venda, daí o Option).
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemDetail {
    pub id: Uuid,
    pub item_type: OrderItemType,
    pub product_id: Option<Uuid>,
    pub material_id: Option<Uuid>,
    pub item_name: Option<String>,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub unit_cost: Decimal,
    pub discount: Decimal,

    // quantity × unit_price − discount
    pub line_total: Decimal,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: Order,

    pub customer_name: String,
    pub items: Vec<OrderItemDetail>,
    pub payments: Vec<Payment>,
}
