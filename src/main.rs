use clap::Parser;
use device_activator::cli::Args;
use device_activator::{Config, TracingReporter};
use figment::providers::Serialized;
use mimalloc::MiMalloc;
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let cfg = match Config::load(Serialized::defaults(&args)) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cfg.loglevel.clone()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_level(true)
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    info!(
        environment = cfg.environment.as_str(),
        service_url = %cfg.service_url,
        db_host = %cfg.database.host,
        db_sslmode = %cfg.database.sslmode,
        dry_run = cfg.dry_run,
        input = %cfg.input_file.display(),
        output = %cfg.output_file.display()
    );

    match device_activator::service::run(&cfg, &TracingReporter).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
