use clap::Parser;
use weather_store::cli::{run, Cli};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    run(cli).await?;
    Ok(())
}
