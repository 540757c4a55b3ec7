// src/config.rs

use sqlx::{postgres::PgPoolOptions, PgPool};
use std::{env, time::Duration};

use crate::{
    common::i18n::I18nStore,
    db::{
        CatalogRepository, CrmRepository, DashboardRepository, InventoryRepository,
        SalesRepository,
    },
    services::{CatalogService, CrmService, DashboardService, InventoryService, SalesService},
};

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub i18n_store: I18nStore,
    pub crm_service: CrmService,
    pub inventory_service: InventoryService,
    pub catalog_service: CatalogService,
    pub sales_service: SalesService,
    pub dashboard_service: DashboardService,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL")?;

        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o gráfico de dependências ---
        let crm_repo = CrmRepository::new(db_pool.clone());
        let inventory_repo = InventoryRepository::new(db_pool.clone());
        let catalog_repo = CatalogRepository::new(db_pool.clone());
        let sales_repo = SalesRepository::new(db_pool.clone());
        let dashboard_repo = DashboardRepository::new(db_pool.clone());

        let crm_service = CrmService::new(crm_repo.clone(), db_pool.clone());
        let inventory_service = InventoryService::new(inventory_repo.clone(), db_pool.clone());
        let catalog_service = CatalogService::new(
            catalog_repo.clone(),
            inventory_repo.clone(),
            db_pool.clone(),
        );
        let sales_service = SalesService::new(
            sales_repo,
            inventory_repo.clone(),
            catalog_repo,
            crm_repo,
            db_pool.clone(),
        );
        let dashboard_service =
            DashboardService::new(dashboard_repo, inventory_repo, db_pool.clone());

        Ok(Self {
            db_pool,
            i18n_store: I18nStore::new(),
            crm_service,
            inventory_service,
            catalog_service,
            sales_service,
            dashboard_service,
        })
    }
}
