use std::net::SocketAddr;
use terradmin_node::api::create_router;
use terradmin_node::azure::AzureClient;
use terradmin_node::config::Config;
use terradmin_node::repository::{
    InventoryRepository, RunRepository, TemplateRepository, establish_connection,
};
use terradmin_node::services::{ProvisionService, SyncService, TemplateService};
use terradmin_node::terraform::TerraformCli;
use terradmin_node::paths;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "terradmin_node=debug,tower_http=debug,axum=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;
    tracing::info!("Starting terradmin_node with config: {:?}", config);

    if let Some(path) = config.database_url.strip_prefix("sqlite:") {
        let path = std::path::Path::new(path);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let terraform_root = paths::terraform_root()?;
    std::fs::create_dir_all(&terraform_root)?;

    // Establish database connection
    let db_pool = establish_connection(&config.database_url).await?;
    tracing::info!("Database connected: {}", config.database_url);

    // Initialize repositories
    let run_repo = RunRepository::new(db_pool.clone());
    let template_repo = TemplateRepository::new(db_pool.clone());
    let inventory_repo = InventoryRepository::new(db_pool);

    // Initialize services
    let terraform = TerraformCli::new(config.terraform_path.clone());
    let provision_service = ProvisionService::new(
        run_repo,
        template_repo.clone(),
        terraform,
        terraform_root,
    );
    let template_service = TemplateService::new(template_repo);
    let sync_service = SyncService::new(inventory_repo, AzureClient::new());

    // Create router
    let app = create_router(provision_service, template_service, sync_service);
    let app = app.layer(TraceLayer::new_for_http());

    // Start server
    let addr = format!("{}:{}", config.host, config.port);
    let addr = addr.parse::<SocketAddr>()?;
    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
