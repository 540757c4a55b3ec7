// src/db.rs

pub mod catalog_repo;
pub mod crm_repo;
pub mod dashboard_repo;
pub mod inventory_repo;
pub mod sales_repo;

pub use catalog_repo::CatalogRepository;
pub use crm_repo::CrmRepository;
pub use dashboard_repo::DashboardRepository;
pub use inventory_repo::InventoryRepository;
pub use sales_repo::SalesRepository;
