mod auth;
mod config;
mod db;
mod error;
mod filters;
mod models;
mod routes;
mod state;
mod templates;


use actix_files::Files;
use actix_web::{middleware, web, App, HttpServer};
use clap::{Parser, Subcommand};

use crate::{config::AppConfig, state::AppState};

#[derive(Parser)]
#[command(name = "barberia", about = "Appointment booking for a single barber shop")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Apply pending migrations, then serve HTTP (the default).
    Serve,
    /// Apply pending migrations and exit.
    Migrate,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(err) = run().await {
        eprintln!("Startup error: {err}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = AppConfig::from_env()?;

    let pool = db::connect(&config.database_url).await?;
    db::run_migrations(&pool).await?;
    log::info!("Database ready at {}", config.database_url);

    if matches!(cli.command, Some(Command::Migrate)) {
        pool.close().await;
        return Ok(());
    }

    let state = AppState {
        db: pool,
        barber_password: config.barber_password.clone(),
    };
    let session_key = config.session_key.clone();
    let cookie_secure = config.cookie_secure;
    let static_dir = config.static_dir.clone();

    let address = config.bind_address();
    log::info!("Starting Barbería on http://{address}");

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .wrap(auth::session_middleware(session_key.clone(), cookie_secure))
            .wrap(middleware::Logger::default())
            .service(Files::new("/static", static_dir.clone()).prefer_utf8(true))
            .configure(routes::configure)
    })
    .bind(address)?
    .run()
    .await?;

    Ok(())
}
