mod connection;
mod inventory_repository;
mod run_repository;
mod template_repository;

pub use connection::establish_connection;
pub use inventory_repository::InventoryRepository;
pub use run_repository::RunRepository;
pub use template_repository::TemplateRepository;

pub type DbPool = sqlx::SqlitePool;
