use anyhow::Context;
use clap::Parser;
use foodgram_server::cli::{self, Cli, Commands};
use foodgram_server::config::Config;
use foodgram_server::{api, app, db, telemetry, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Openapi => {
            println!("{}", api::openapi().to_pretty_json()?);
        }
        Commands::Serve => serve().await?,
        Commands::ImportIngredients { path, format } => {
            telemetry::init_telemetry()?;
            let config = Config::from_env()?;
            let pool = db::create_pool(&config.database_url)?;
            let mut conn = pool.get()?;

            let (read, inserted) = cli::import_ingredients(&mut conn, &path, format)?;
            tracing::info!(
                "Imported {} of {} ingredients from {} ({} already present)",
                inserted,
                read,
                path.display(),
                read - inserted
            );
        }
        Commands::GrantAdmin { email } => {
            telemetry::init_telemetry()?;
            let config = Config::from_env()?;
            let pool = db::create_pool(&config.database_url)?;
            let mut conn = pool.get()?;

            cli::grant_admin(&mut conn, &email)?;
            tracing::info!("Granted admin rights to {}", email);
        }
    }

    Ok(())
}

async fn serve() -> anyhow::Result<()> {
    telemetry::init_telemetry()?;
    telemetry::install_query_counter()?;

    let config = Config::from_env()?;
    let pool = db::create_pool(&config.database_url)?;
    let bind_addr = config.bind_addr;
    let public_url = config.public_url.clone();

    let app = app(AppState::new(pool, config));

    let listener = tokio::net::TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", bind_addr))?;

    tracing::info!("Server listening on {}", listener.local_addr()?);
    tracing::info!("Swagger UI available at {}/swagger-ui/", public_url);
    tracing::info!(
        "OpenAPI spec available at {}/api-docs/openapi.json",
        public_url
    );

    axum::serve(listener, app).await?;
    Ok(())
}
