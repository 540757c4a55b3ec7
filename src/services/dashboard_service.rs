// src/services/dashboard_service.rs

use std::collections::HashMap;

use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{DashboardRepository, InventoryRepository},
    models::dashboard::{SalesChartEntry, SystemOverview, TopProductEntry},
    services::pricing,
};

#[derive(Clone)]
pub struct DashboardService {
    repo: DashboardRepository,
    inventory_repo: InventoryRepository,
    pool: PgPool,
}

impl DashboardService {
    pub fn new(repo: DashboardRepository, inventory_repo: InventoryRepository, pool: PgPool) -> Self {
        Self {
            repo,
            inventory_repo,
            pool,
        }
    }

    // Resumo geral do sistema. Os contadores e somas vêm do banco num
    // snapshot só; o valor do estoque fecha aqui, saldo × custo médio
    // de cada material, com a mesma média usada no resto do sistema.
    pub async fn get_overview(&self) -> Result<SystemOverview, AppError> {
        let counters = self.repo.get_overview_counters(&self.pool).await?;

        let materials = self.inventory_repo.get_all_materials(None).await?;
        let lots = self.inventory_repo.get_all_import_lots().await?;

        let mut lots_by_material: HashMap<Uuid, Vec<(Decimal, Decimal)>> = HashMap::new();
        for (material_id, quantity, unit_price) in lots {
            lots_by_material
                .entry(material_id)
                .or_default()
                .push((quantity, unit_price));
        }

        let mut inventory_value = Decimal::ZERO;
        for material in &materials {
            let average_cost = lots_by_material
                .remove(&material.id)
                .map(pricing::weighted_average_cost)
                .unwrap_or(Decimal::ZERO);
            inventory_value += pricing::round_money(material.current_stock * average_cost);
        }

        Ok(SystemOverview {
            customers_count: counters.customers_count,
            materials_count: counters.materials_count,
            products_count: counters.products_count,
            orders_count: counters.orders_count,
            total_revenue: counters.total_revenue,
            total_profit: counters.total_profit,
            total_received: counters.total_received,
            total_outstanding_debt: counters.orders_debt + counters.adjustments_total,
            inventory_value,
            pending_orders_count: counters.pending_orders_count,
        })
    }

    pub async fn get_sales_chart(&self) -> Result<Vec<SalesChartEntry>, AppError> {
        self.repo.get_sales_last_30_days().await
    }

    pub async fn get_top_products(&self) -> Result<Vec<TopProductEntry>, AppError> {
        self.repo.get_top_products().await
    }
}
