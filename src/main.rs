use std::sync::Arc;

use clap::Parser;
use poem::{listener::TcpListener, EndpointExt, Route, Server};
use poem_openapi::OpenApiService;

use staffdesk_backend::api::{BodyLimit, EmployeeApi, HealthApi, KycApi};
use staffdesk_backend::cli::{issue_token, migrate, Cli, Commands};
use staffdesk_backend::config::database::DatabaseConnections;
use staffdesk_backend::config::{
    init_logging, BootstrapSettings, LifecycleSettings, SecretManager, SystemEnvironment,
};
use staffdesk_backend::AppData;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    let env = SystemEnvironment;
    init_logging(&env)?;

    let bootstrap_settings = BootstrapSettings::from_env_provider(&env)?;
    tracing::debug!("{:?}", bootstrap_settings);

    match cli.command() {
        Commands::Migrate => migrate::run_migrations(&bootstrap_settings).await,
        Commands::IssueToken { sub, role, ttl_minutes } => {
            let secret_manager = Arc::new(SecretManager::init_from(&env)?);
            issue_token::issue_token(secret_manager, &sub, role, ttl_minutes)
        }
        Commands::Serve => serve(&env, &bootstrap_settings).await,
    }
}

async fn serve(
    env: &SystemEnvironment,
    bootstrap_settings: &BootstrapSettings,
) -> Result<(), Box<dyn std::error::Error>> {
    // Step 1: Load settings and secrets
    let settings = LifecycleSettings::from_env_provider(env)?;
    let secret_manager = Arc::new(SecretManager::init_from(env)?);

    // Step 2: Connect and migrate
    let connections = DatabaseConnections::init(bootstrap_settings).await?;
    connections.migrate().await?;
    tracing::info!("Database migrations completed");

    // Step 3: Shared application data
    let app_data = Arc::new(AppData::init(connections, settings, secret_manager)?);

    // Step 4: Routes
    let body_limit = BodyLimit::for_uploads(&app_data.settings);
    let address = bootstrap_settings.server_address();
    let api_service = OpenApiService::new(
        (HealthApi, EmployeeApi::new(app_data.clone()), KycApi::new(app_data)),
        "Staffdesk API",
        env!("CARGO_PKG_VERSION"),
    )
    .server(format!("http://{}", address));

    let ui = api_service.swagger_ui();
    let app = Route::new()
        .nest("/", api_service.with(body_limit))
        .nest("/swagger", ui);

    tracing::info!("Starting server on http://{}", address);
    tracing::info!("Swagger UI available at http://{}/swagger", address);

    Server::new(TcpListener::bind(address)).run(app).await?;

    Ok(())
}
