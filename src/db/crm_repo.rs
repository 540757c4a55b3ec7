// src/db/crm_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::crm::{Customer, CustomerDebtDetail, DebtAdjustment},
};

// Agregados por cliente, calculados na hora a partir de pedidos e
// ajustes. dívida em aberto = Σ debt_amount dos pedidos + Σ ajustes.
const DEBT_DETAILS_SQL: &str = r#"
    SELECT
        c.id,
        c.name,
        c.phone,
        COALESCE(o.revenue, 0)                           AS total_revenue,
        COALESCE(o.profit, 0)                            AS total_profit,
        COALESCE(o.paid, 0)                              AS paid_total,
        COALESCE(a.adjustments, 0)                       AS adjustments_total,
        COALESCE(o.debt, 0) + COALESCE(a.adjustments, 0) AS outstanding_debt,
        COALESCE(o.orders_count, 0)                      AS orders_count,
        o.last_order_date
    FROM customers c
    LEFT JOIN (
        SELECT
            customer_id,
            SUM(total_amount) AS revenue,
            SUM(profit)       AS profit,
            SUM(paid_amount)  AS paid,
            SUM(debt_amount)  AS debt,
            COUNT(*)          AS orders_count,
            MAX(order_date)   AS last_order_date
        FROM orders
        GROUP BY customer_id
    ) o ON o.customer_id = c.id
    LEFT JOIN (
        SELECT customer_id, SUM(amount) AS adjustments
        FROM debt_adjustments
        GROUP BY customer_id
    ) a ON a.customer_id = c.id
"#;

#[derive(Clone)]
pub struct CrmRepository {
    pool: PgPool,
}

impl CrmRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---
    // Leituras (usam a pool principal)
    // ---

    pub async fn get_all_customers(&self, search: Option<&str>) -> Result<Vec<Customer>, AppError> {
        let customers = sqlx::query_as::<_, Customer>(
            r#"
            SELECT * FROM customers
            WHERE ($1::text IS NULL OR name ILIKE '%' || $1 || '%' OR phone ILIKE '%' || $1 || '%')
            ORDER BY name ASC
            "#,
        )
        .bind(search)
        .fetch_all(&self.pool)
        .await?;

        Ok(customers)
    }

    pub async fn get_customer_by_id(&self, id: Uuid) -> Result<Option<Customer>, AppError> {
        let customer = sqlx::query_as::<_, Customer>("SELECT * FROM customers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(customer)
    }

    pub async fn get_adjustments_for_customer(
        &self,
        customer_id: Uuid,
    ) -> Result<Vec<DebtAdjustment>, AppError> {
        let adjustments = sqlx::query_as::<_, DebtAdjustment>(
            r#"
            SELECT * FROM debt_adjustments
            WHERE customer_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(adjustments)
    }

    pub async fn get_debt_details(&self) -> Result<Vec<CustomerDebtDetail>, AppError> {
        let sql = format!("{DEBT_DETAILS_SQL} ORDER BY outstanding_debt DESC, c.name ASC");

        let details = sqlx::query_as::<_, CustomerDebtDetail>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(details)
    }

    pub async fn get_debt_detail_for_customer(
        &self,
        customer_id: Uuid,
    ) -> Result<Option<CustomerDebtDetail>, AppError> {
        let sql = format!("{DEBT_DETAILS_SQL} WHERE c.id = $1");

        let detail = sqlx::query_as::<_, CustomerDebtDetail>(&sql)
            .bind(customer_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(detail)
    }

    // ---
    // Escritas (padrão 'Executor' para rodar dentro de transações)
    // ---

    pub async fn create_customer<'e, E>(
        &self,
        executor: E,
        name: &str,
        phone: Option<&str>,
        address: Option<&str>,
        notes: Option<&str>,
    ) -> Result<Customer, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let customer = sqlx::query_as::<_, Customer>(
            r#"
            INSERT INTO customers (name, phone, address, notes)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(phone)
        .bind(address)
        .bind(notes)
        .fetch_one(executor)
        .await?;

        Ok(customer)
    }

    // Atualização parcial: campo ausente no payload mantém o valor atual.
    pub async fn update_customer<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        name: Option<&str>,
        phone: Option<&str>,
        address: Option<&str>,
        notes: Option<&str>,
    ) -> Result<Option<Customer>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let customer = sqlx::query_as::<_, Customer>(
            r#"
            UPDATE customers SET
                name       = COALESCE($2, name),
                phone      = COALESCE($3, phone),
                address    = COALESCE($4, address),
                notes      = COALESCE($5, notes),
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(phone)
        .bind(address)
        .bind(notes)
        .fetch_optional(executor)
        .await?;

        Ok(customer)
    }

    pub async fn delete_customer<'e, E>(&self, executor: E, id: Uuid) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM customers WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected())
    }

    // Guarda de remoção: cliente com pedido registrado fica. Roda na
    // mesma transação do DELETE para não disputar com um pedido novo.
    pub async fn count_orders_for_customer<'e, E>(
        &self,
        executor: E,
        customer_id: Uuid,
    ) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM orders WHERE customer_id = $1")
                .bind(customer_id)
                .fetch_one(executor)
                .await?;

        Ok(count)
    }

    pub async fn create_debt_adjustment<'e, E>(
        &self,
        executor: E,
        customer_id: Uuid,
        amount: Decimal,
        reason: Option<&str>,
        notes: Option<&str>,
    ) -> Result<DebtAdjustment, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let adjustment = sqlx::query_as::<_, DebtAdjustment>(
            r#"
            INSERT INTO debt_adjustments (customer_id, amount, reason, notes)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(customer_id)
        .bind(amount)
        .bind(reason)
        .bind(notes)
        .fetch_one(executor)
        .await?;

        Ok(adjustment)
    }
}
