// src/db/sales_repo.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::sales::{
        Order, OrderItem, OrderItemDetail, OrderItemType, OrderListEntry, OrderStatus, Payment,
        PaymentMethod,
    },
};

#[derive(Clone)]
pub struct SalesRepository {
    pool: PgPool,
}

impl SalesRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---
    // Leituras (usam a pool principal)
    // ---

    pub async fn get_orders(
        &self,
        customer_id: Option<Uuid>,
        status: Option<OrderStatus>,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<Vec<OrderListEntry>, AppError> {
        let orders = sqlx::query_as::<_, OrderListEntry>(
            r#"
            SELECT
                o.id,
                o.customer_id,
                c.name AS customer_name,
                o.total_amount,
                o.paid_amount,
                o.debt_amount,
                o.profit,
                o.status,
                o.order_date,
                COALESCE(i.items_count, 0) AS items_count
            FROM orders o
            JOIN customers c ON c.id = o.customer_id
            LEFT JOIN (
                SELECT order_id, COUNT(*) AS items_count
                FROM order_items
                GROUP BY order_id
            ) i ON i.order_id = o.id
            WHERE ($1::uuid IS NULL OR o.customer_id = $1)
              AND ($2::order_status IS NULL OR o.status = $2)
              AND ($3::timestamptz IS NULL OR o.order_date >= $3)
              AND ($4::timestamptz IS NULL OR o.order_date <= $4)
            ORDER BY o.order_date DESC
            "#,
        )
        .bind(customer_id)
        .bind(status)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        Ok(orders)
    }

    pub async fn get_order_by_id(&self, id: Uuid) -> Result<Option<Order>, AppError> {
        let order = sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(order)
    }

    pub async fn get_items_for_order(
        &self,
        order_id: Uuid,
    ) -> Result<Vec<OrderItemDetail>, AppError> {
        let items = sqlx::query_as::<_, OrderItemDetail>(
            r#"
            SELECT
                oi.id,
                oi.item_type,
                oi.product_id,
                oi.material_id,
                COALESCE(p.name, m.name) AS item_name,
                oi.quantity,
                oi.unit_price,
                oi.unit_cost,
                oi.discount,
                ROUND(oi.quantity * oi.unit_price, 2) - oi.discount AS line_total
            FROM order_items oi
            LEFT JOIN products p ON p.id = oi.product_id
            LEFT JOIN materials m ON m.id = oi.material_id
            WHERE oi.order_id = $1
            ORDER BY oi.created_at ASC
            "#,
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    pub async fn get_payments_for_order(&self, order_id: Uuid) -> Result<Vec<Payment>, AppError> {
        let payments = sqlx::query_as::<_, Payment>(
            r#"
            SELECT * FROM payments
            WHERE order_id = $1
            ORDER BY payment_date ASC
            "#,
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(payments)
    }

    // ---
    // Escritas (padrão 'Executor' para rodar dentro de transações)
    // ---

    #[allow(clippy::too_many_arguments)]
    pub async fn insert_order<'e, E>(
        &self,
        executor: E,
        customer_id: Uuid,
        total_amount: Decimal,
        total_cost: Decimal,
        paid_amount: Decimal,
        debt_amount: Decimal,
        profit: Decimal,
        status: OrderStatus,
        notes: Option<&str>,
        order_date: Option<DateTime<Utc>>,
    ) -> Result<Order, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Order>(
            r#"
            INSERT INTO orders (
                customer_id, total_amount, total_cost, paid_amount,
                debt_amount, profit, status, notes, order_date
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, COALESCE($9, now()))
            RETURNING *
            "#,
        )
        .bind(customer_id)
        .bind(total_amount)
        .bind(total_cost)
        .bind(paid_amount)
        .bind(debt_amount)
        .bind(profit)
        .bind(status)
        .bind(notes)
        .bind(order_date)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            // Cliente removido entre a checagem e o INSERT
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_foreign_key_violation() {
                    return AppError::CustomerNotFound;
                }
            }
            e.into()
        })
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn insert_order_item<'e, E>(
        &self,
        executor: E,
        order_id: Uuid,
        item_type: OrderItemType,
        product_id: Option<Uuid>,
        material_id: Option<Uuid>,
        quantity: Decimal,
        unit_price: Decimal,
        unit_cost: Decimal,
        discount: Decimal,
    ) -> Result<OrderItem, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let item = sqlx::query_as::<_, OrderItem>(
            r#"
            INSERT INTO order_items (
                order_id, item_type, product_id, material_id,
                quantity, unit_price, unit_cost, discount
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(order_id)
        .bind(item_type)
        .bind(product_id)
        .bind(material_id)
        .bind(quantity)
        .bind(unit_price)
        .bind(unit_cost)
        .bind(discount)
        .fetch_one(executor)
        .await?;

        Ok(item)
    }

    pub async fn insert_payment<'e, E>(
        &self,
        executor: E,
        order_id: Uuid,
        amount: Decimal,
        payment_method: PaymentMethod,
        notes: Option<&str>,
    ) -> Result<Payment, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let payment = sqlx::query_as::<_, Payment>(
            r#"
            INSERT INTO payments (order_id, amount, payment_method, notes)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(order_id)
        .bind(amount)
        .bind(payment_method)
        .bind(notes)
        .fetch_one(executor)
        .await?;

        Ok(payment)
    }

    // Tranca o cabeçalho do pedido enquanto o pagamento é registrado e
    // o status recalculado; dois pagamentos simultâneos se serializam.
    pub async fn get_order_for_update<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<Order>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let order = sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(executor)
            .await?;

        Ok(order)
    }

    pub async fn sum_payments_for_order<'e, E>(
        &self,
        executor: E,
        order_id: Uuid,
    ) -> Result<Decimal, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let total = sqlx::query_scalar::<_, Decimal>(
            "SELECT COALESCE(SUM(amount), 0) FROM payments WHERE order_id = $1",
        )
        .bind(order_id)
        .fetch_one(executor)
        .await?;

        Ok(total)
    }

    pub async fn update_order_payment_state<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        paid_amount: Decimal,
        debt_amount: Decimal,
        status: OrderStatus,
    ) -> Result<Order, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let order = sqlx::query_as::<_, Order>(
            r#"
            UPDATE orders SET
                paid_amount = $2,
                debt_amount = $3,
                status      = $4,
                updated_at  = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(paid_amount)
        .bind(debt_amount)
        .bind(status)
        .fetch_one(executor)
        .await?;

        Ok(order)
    }
}
