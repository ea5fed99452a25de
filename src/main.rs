use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use usecase_radar::cli::Args;
use usecase_radar::launch;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let args = Args::parse();
    let company = args.company.clone();
    let config = args.into_config()?;

    let default_level = if config.verbose {
        "usecase_radar=debug"
    } else {
        "usecase_radar=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(default_level.parse()?))
        .with_writer(std::io::stderr)
        .init();

    launch(&config, &company).await?;
    Ok(())
}
