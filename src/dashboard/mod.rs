pub mod frame;
pub mod render;

pub use frame::*;
pub use render::*;

use crate::config::EnvConf;
use crate::error::{FetchError, FrameError};
use crate::ext::yfinance::{QuoteSource, YfinanceInterval};
use crate::model::{Kline, Ticker};
use polars::prelude::*;
use tracing::{debug, info};

/// Daily history of the configured ticker
pub async fn fetch<S: QuoteSource>(source: &S, conf: &EnvConf) -> Result<Vec<Kline>, FetchError> {
    info!("Fetch ticker {}...", conf.ticker);
    source
        .get_quote_history(conf.ticker.symbol(), conf.fetch_range, YfinanceInterval::D1)
        .await
}

/// Indicators over the full history, then cut to the display window
pub fn compute(klines: &[Kline], conf: &EnvConf) -> Result<DataFrame, FrameError> {
    let df = process_data(klines, &conf.params())?;
    let shown = trailing_window(&df, conf.display_years)?;
    info!(
        ticker = %conf.ticker,
        history_rows = df.height(),
        display_rows = shown.height(),
        "inertia frame ready"
    );
    Ok(shown)
}

/// Tickers whose page already sits in the output directory
pub fn generated_pages(conf: &EnvConf) -> Vec<Ticker> {
    Ticker::ALL
        .into_iter()
        .filter(|t| conf.output_dir.join(page_file_name(*t)).is_file())
        .collect()
}

pub fn render(display: &DataFrame, conf: &EnvConf) -> Result<String, FrameError> {
    let available = generated_pages(conf);
    debug!(?available, "selectable tickers");
    render_dashboard(display, conf.ticker, &conf.params(), &available)
}
