// src/models/dashboard.rs

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

// 1. Resumo geral (os cards do topo)
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SystemOverview {
    pub customers_count: i64,
    pub materials_count: i64,
    pub products_count: i64,
    pub orders_count: i64,

    pub total_revenue: Decimal,  // Σ total_amount de todos os pedidos
    pub total_profit: Decimal,   // Σ profit
    pub total_received: Decimal, // Σ paid_amount

    // Fiado em aberto: Σ debt_amount dos pedidos + ajustes manuais,
    // a mesma conta do detalhamento por cliente.
    pub total_outstanding_debt: Decimal,

    pub inventory_value: Decimal, // Σ (estoque atual × custo médio)
    pub pending_orders_count: i64,
}

// 2. Gráfico de vendas (últimos N dias)
#[derive(Debug, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SalesChartEntry {
    pub date: Option<String>, // O SQL devolve a data como string (YYYY-MM-DD)
    pub total: Option<Decimal>,
}

// 3. Curva ABC (top produtos por receita)
#[derive(Debug, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TopProductEntry {
    pub item_name: String,
    pub total_quantity: Option<Decimal>,
    pub total_revenue: Option<Decimal>,
}
