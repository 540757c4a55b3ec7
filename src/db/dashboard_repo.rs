// src/db/dashboard_repo.rs

use rust_decimal::Decimal;
use sqlx::{Acquire, PgPool, Postgres};

use crate::{
    common::error::AppError,
    models::dashboard::{SalesChartEntry, TopProductEntry},
};

// Contadores e somas do painel, lidos num snapshot só.
#[derive(Debug, Clone, Copy)]
pub struct OverviewCounters {
    pub customers_count: i64,
    pub materials_count: i64,
    pub products_count: i64,
    pub orders_count: i64,
    pub pending_orders_count: i64,
    pub total_revenue: Decimal,
    pub total_profit: Decimal,
    pub total_received: Decimal,
    pub orders_debt: Decimal,
    pub adjustments_total: Decimal,
}

#[derive(Clone)]
pub struct DashboardRepository {
    pool: PgPool,
}

impl DashboardRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // 1. Resumo geral
    pub async fn get_overview_counters<'e, A>(
        &self,
        conn: A,
    ) -> Result<OverviewCounters, AppError>
    where
        A: Acquire<'e, Database = Postgres>,
    {
        // REPEATABLE READ: todas as contagens saem do mesmo snapshot,
        // mesmo com pedidos entrando no meio.
        let mut tx = conn.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ")
            .execute(&mut *tx)
            .await?;

        let customers_count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM customers")
            .fetch_one(&mut *tx)
            .await?;

        let materials_count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM materials")
            .fetch_one(&mut *tx)
            .await?;

        let products_count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM products")
            .fetch_one(&mut *tx)
            .await?;

        let (orders_count, pending_orders_count, total_revenue, total_profit, total_received, orders_debt) =
            sqlx::query_as::<_, (i64, i64, Decimal, Decimal, Decimal, Decimal)>(
                r#"
                SELECT
                    COUNT(*),
                    COUNT(*) FILTER (WHERE status <> 'COMPLETED'),
                    COALESCE(SUM(total_amount), 0),
                    COALESCE(SUM(profit), 0),
                    COALESCE(SUM(paid_amount), 0),
                    COALESCE(SUM(debt_amount), 0)
                FROM orders
                "#,
            )
            .fetch_one(&mut *tx)
            .await?;

        let adjustments_total = sqlx::query_scalar::<_, Decimal>(
            "SELECT COALESCE(SUM(amount), 0) FROM debt_adjustments",
        )
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(OverviewCounters {
            customers_count,
            materials_count,
            products_count,
            orders_count,
            pending_orders_count,
            total_revenue,
            total_profit,
            total_received,
            orders_debt,
            adjustments_total,
        })
    }

    // 2. Gráfico de linha (últimos 30 dias)
    pub async fn get_sales_last_30_days(&self) -> Result<Vec<SalesChartEntry>, AppError> {
        let data = sqlx::query_as::<_, SalesChartEntry>(
            r#"
            SELECT
                to_char(order_date, 'YYYY-MM-DD') AS date,
                SUM(total_amount)                 AS total
            FROM orders
            WHERE order_date >= (CURRENT_DATE - INTERVAL '30 days')
            GROUP BY 1
            ORDER BY 1 ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(data)
    }

    // 3. Curva ABC (top 5 em receita, produtos e materiais vendidos direto)
    pub async fn get_top_products(&self) -> Result<Vec<TopProductEntry>, AppError> {
        let data = sqlx::query_as::<_, TopProductEntry>(
            r#"
            SELECT
                COALESCE(p.name, m.name, '?')                        AS item_name,
                SUM(oi.quantity)                                     AS total_quantity,
                SUM(ROUND(oi.quantity * oi.unit_price, 2) - oi.discount) AS total_revenue
            FROM order_items oi
            LEFT JOIN products p ON p.id = oi.product_id
            LEFT JOIN materials m ON m.id = oi.material_id
            GROUP BY COALESCE(p.name, m.name, '?')
            ORDER BY total_revenue DESC
            LIMIT 5
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(data)
    }
}
