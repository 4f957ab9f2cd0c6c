use core::error::Error;
use dotenv::dotenv;
use inertia_bands::dashboard;
use inertia_bands::ext::yfinance::YfinanceClient;
use inertia_bands::prelude::*;
use std::io::IsTerminal;
use tracing::{info, warn};
use tracing_subscriber::prelude::*;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    dotenv().ok();
    setup_tracing()?;

    let conf = EnvConf::from_env()?;
    info!(?conf, "loaded configuration");

    let yfinance_client = YfinanceClient::new()?;
    let klines = dashboard::fetch(&yfinance_client, &conf).await?;
    let display = dashboard::compute(&klines, &conf)?;

    match InertiaSnapshot::from_frame(&display)? {
        Some(snapshot) => info!(
            date = %format_date(snapshot.time),
            close = ?snapshot.close,
            inertia = ?snapshot.inertia,
            stddev = ?snapshot.stddev,
            deviation = ?snapshot.deviation(),
            "latest bar"
        ),
        None => warn!("Display window is empty"),
    }

    let html = dashboard::render(&display, &conf)?;
    let out_path = conf.output_dir.join(page_file_name(conf.ticker));
    tokio::fs::write(&out_path, html).await?;
    info!("Wrote {}", out_path.display());

    Ok(())
}

fn setup_tracing() -> Result<(), tracing::subscriber::SetGlobalDefaultError> {
    let subscriber = tracing_subscriber::Registry::default()
        .with(
            // stdout layer, to view everything in the console
            tracing_subscriber::fmt::layer()
                .compact()
                .with_ansi(std::io::stdin().is_terminal())
                .with_file(true)
                .with_line_number(true)
                .with_filter(tracing::level_filters::LevelFilter::INFO),
        )
        .with(
            tracing_subscriber::filter::targets::Targets::new()
                .with_target("inertia_dashboard", tracing::level_filters::LevelFilter::DEBUG)
                .with_target("inertia_bands", tracing::level_filters::LevelFilter::DEBUG),
        );
    tracing::subscriber::set_global_default(subscriber)
}
