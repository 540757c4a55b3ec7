//src/main.rs

use axum::{
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::config::AppState;
use crate::docs::ApiDoc;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_target(false).compact().init();

    // .expect() é bom aqui: se a configuração falhar, a aplicação não deve iniciar.
    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    let crm_routes = Router::new()
        .route(
            "/customers",
            post(handlers::crm::create_customer).get(handlers::crm::list_customers),
        )
        .route(
            "/customers/{id}",
            get(handlers::crm::get_customer)
                .put(handlers::crm::update_customer)
                .delete(handlers::crm::delete_customer),
        )
        .route("/customers/{id}/debt", get(handlers::crm::get_customer_debt))
        .route(
            "/customers/{id}/debt-adjustments",
            post(handlers::crm::create_debt_adjustment).get(handlers::crm::list_debt_adjustments),
        )
        .route("/debts", get(handlers::crm::list_debts));

    let inventory_routes = Router::new()
        .route(
            "/materials",
            post(handlers::inventory::create_material).get(handlers::inventory::list_materials),
        )
        .route(
            "/materials/{id}",
            get(handlers::inventory::get_material)
                .put(handlers::inventory::update_material)
                .delete(handlers::inventory::delete_material),
        )
        .route(
            "/materials/{id}/cost",
            get(handlers::inventory::get_material_cost),
        )
        .route(
            "/imports",
            post(handlers::inventory::create_import).get(handlers::inventory::list_imports),
        )
        .route("/imports/bulk", post(handlers::inventory::bulk_import));

    let catalog_routes = Router::new()
        .route(
            "/products",
            post(handlers::catalog::create_product).get(handlers::catalog::list_products),
        )
        .route(
            "/products/cost-preview",
            post(handlers::catalog::cost_preview),
        )
        .route(
            "/products/{id}",
            get(handlers::catalog::get_product)
                .put(handlers::catalog::update_product)
                .delete(handlers::catalog::delete_product),
        )
        .route(
            "/products/{id}/cost",
            get(handlers::catalog::get_product_cost),
        );

    let sales_routes = Router::new()
        .route(
            "/orders",
            post(handlers::sales::submit_order).get(handlers::sales::list_orders),
        )
        .route("/orders/{id}", get(handlers::sales::get_order))
        .route(
            "/orders/{id}/payments",
            post(handlers::sales::create_payment).get(handlers::sales::list_payments),
        );

    let dashboard_routes = Router::new()
        .route("/overview", get(handlers::dashboard::get_overview))
        .route("/sales-chart", get(handlers::dashboard::get_sales_chart))
        .route("/top-products", get(handlers::dashboard::get_top_products));

    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/crm", crm_routes)
        .nest("/api/inventory", inventory_routes)
        .nest("/api/catalog", catalog_routes)
        .nest("/api/sales", sales_routes)
        .nest("/api/dashboard", dashboard_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(app_state);

    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let listener = TcpListener::bind(&addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr().unwrap());
    axum::serve(listener, app)
        .await
        .expect("Erro no servidor Axum");
}
