use crate::error::FetchError;
use crate::model::{Kline, opt_f64};
use core::fmt::Display;
use core::future::Future;
use core::str::FromStr;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use tap::Pipe;
use tracing::{debug, info, instrument, warn};

const YFINANCE_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36";
const YFINANCE_COOKIE_URL: &str = "https://fc.yahoo.com";
const YFINANCE_CRUMB_URL: &str = "https://query1.finance.yahoo.com/v1/test/getcrumb";
pub const YFINANCE_API_HISTORY: &str = "https://query2.finance.yahoo.com/v8/finance/chart/";

/// History window requested from the chart API
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum YfinanceRange {
    //"1d","5d","1mo","3mo","6mo","1y","2y","5y","10y","ytd","max"
    D1,
    D5,
    Mo1,
    Mo3,
    Mo6,
    Y1,
    #[default]
    Y2,
    Y5,
    Y10,
    Ytd,
    Max,
}

impl YfinanceRange {
    const ALL: [YfinanceRange; 11] = [
        YfinanceRange::D1,
        YfinanceRange::D5,
        YfinanceRange::Mo1,
        YfinanceRange::Mo3,
        YfinanceRange::Mo6,
        YfinanceRange::Y1,
        YfinanceRange::Y2,
        YfinanceRange::Y5,
        YfinanceRange::Y10,
        YfinanceRange::Ytd,
        YfinanceRange::Max,
    ];

    fn as_str(self) -> &'static str {
        match self {
            YfinanceRange::D1 => "1d",
            YfinanceRange::D5 => "5d",
            YfinanceRange::Mo1 => "1mo",
            YfinanceRange::Mo3 => "3mo",
            YfinanceRange::Mo6 => "6mo",
            YfinanceRange::Y1 => "1y",
            YfinanceRange::Y2 => "2y",
            YfinanceRange::Y5 => "5y",
            YfinanceRange::Y10 => "10y",
            YfinanceRange::Ytd => "ytd",
            YfinanceRange::Max => "max",
        }
    }
}

impl Display for YfinanceRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::result::Result<(), std::fmt::Error> {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for YfinanceRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| format!("Invalid range: {s}"))
    }
}

impl TryFrom<String> for YfinanceRange {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Bar size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YfinanceInterval {
    D1,
    Wk1,
    Mo1,
}

impl Display for YfinanceInterval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::result::Result<(), std::fmt::Error> {
        let s = match self {
            YfinanceInterval::D1 => "1d",
            YfinanceInterval::Wk1 => "1wk",
            YfinanceInterval::Mo1 => "1mo",
        };
        write!(f, "{s}")
    }
}

/// Anything able to hand back a price history for one ticker
pub trait QuoteSource {
    fn get_quote_history(
        &self,
        ticker: &str,
        range: YfinanceRange,
        interval: YfinanceInterval,
    ) -> impl Future<Output = Result<Vec<Kline>, FetchError>>;
}

/// Warning: For research purpose, only use this for backtesting on historical data
#[derive(Clone)]
pub struct YfinanceClient {
    client: reqwest::Client,
}

impl YfinanceClient {
    pub fn new() -> Result<Self, FetchError> {
        let client = reqwest::ClientBuilder::new()
            .cookie_store(true)
            .user_agent(YFINANCE_USER_AGENT)
            .build()?;
        Ok(Self { client })
    }

    /// Cookie then crumb. Both are best effort, the chart endpoint usually answers without.
    async fn crumb(&self) -> Option<String> {
        if let Err(e) = self.client.get(YFINANCE_COOKIE_URL).send().await {
            warn!(error = %e, "failed to fetch yahoo cookie");
        }
        match self.client.get(YFINANCE_CRUMB_URL).send().await {
            Ok(resp) if resp.status().is_success() => resp
                .text()
                .await
                .ok()
                .map(|crumb| crumb.trim().to_string())
                .filter(|crumb| !crumb.is_empty() && !crumb.contains('<')),
            Ok(resp) => {
                debug!(status = %resp.status(), "no crumb issued");
                None
            }
            Err(e) => {
                warn!(error = %e, "failed to fetch yahoo crumb");
                None
            }
        }
    }
}

impl QuoteSource for YfinanceClient {
    /// Fetch un-adjusted history
    #[instrument(skip(self))]
    async fn get_quote_history(
        &self,
        ticker: &str,
        range: YfinanceRange,
        interval: YfinanceInterval,
    ) -> Result<Vec<Kline>, FetchError> {
        let crumb = self.crumb().await;

        let url_str = YFINANCE_API_HISTORY.to_string() + ticker;
        let params_vec = vec![
            ("range", range.to_string()),
            ("interval", interval.to_string()),
            ("events", "history".to_string()),
            ("includeAdjustedClose", "true".to_string()),
        ];

        let response = self
            .client
            .get(url_str)
            .query(&params_vec)
            .pipe(|req| match &crumb {
                Some(crumb) => req.query(&[("crumb", crumb)]),
                None => req,
            })
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(FetchError::UnknownTicker(ticker.to_string()));
        }
        let body = response.text().await?;
        let json_resp: Value = match serde_json::from_str(&body) {
            Ok(json) => json,
            Err(_) if !status.is_success() => {
                return Err(FetchError::Api {
                    code: status.as_u16().to_string(),
                    description: body.chars().take(200).collect(),
                });
            }
            Err(e) => return Err(FetchError::Malformed(e.to_string())),
        };

        let klines = parse_chart(ticker, &json_resp)?;
        info!(%ticker, rows = klines.len(), "fetched quote history");
        Ok(klines)
    }
}

/// Turn a v8 chart payload into klines sorted by time, one per timestamp
pub fn parse_chart(ticker: &str, json_resp: &Value) -> Result<Vec<Kline>, FetchError> {
    let chart = &json_resp["chart"];
    if !chart["error"].is_null() {
        let error = &chart["error"];
        let code = error["code"].as_str().unwrap_or("unknown").to_string();
        let description = error["description"].as_str().unwrap_or_default().to_string();
        if code == "Not Found" {
            return Err(FetchError::UnknownTicker(ticker.to_string()));
        }
        return Err(FetchError::Api { code, description });
    }

    let chart_data = &chart["result"][0];
    if chart_data.is_null() {
        return Err(FetchError::Empty(ticker.to_string()));
    }
    // Yahoo omits the timestamp array when the range holds no bars
    let Some(timestamps) = chart_data["timestamp"].as_array() else {
        return Err(FetchError::Empty(ticker.to_string()));
    };
    let timestamps = timestamps
        .iter()
        .map(|v| {
            v.as_i64()
                .ok_or_else(|| FetchError::Malformed(format!("invalid timestamp {v}")))
        })
        .collect::<Result<Vec<_>, _>>()?;
    let len = timestamps.len();

    let quotes = &chart_data["indicators"]["quote"][0];
    let open = quote_field(quotes, "open", len)?;
    let high = quote_field(quotes, "high", len)?;
    let low = quote_field(quotes, "low", len)?;
    let close = quote_field(quotes, "close", len)?;
    let volume = optional_quote_field(quotes, "volume", len)?;
    let adjclose =
        optional_quote_field(&chart_data["indicators"]["adjclose"][0], "adjclose", len)?;

    let mut klines: Vec<Kline> = (0..len)
        .map(|i| Kline {
            open: open[i],
            high: high[i],
            low: low[i],
            close: close[i],
            volume: volume[i],
            time: timestamps[i],
            adjclose: adjclose[i],
        })
        .collect();

    // Strictly increasing time, the latest duplicate wins
    klines.sort_by_key(|k| k.time);
    klines.reverse();
    klines.dedup_by_key(|k| k.time);
    klines.reverse();

    if klines.is_empty() {
        return Err(FetchError::Empty(ticker.to_string()));
    }
    Ok(klines)
}

fn quote_field(quotes: &Value, field: &str, len: usize) -> Result<Vec<Option<f64>>, FetchError> {
    let Some(values) = quotes[field].as_array() else {
        return Err(FetchError::Malformed(format!("missing `{field}` array")));
    };
    if values.len() != len {
        return Err(FetchError::Malformed(format!(
            "`{field}` has {} values for {len} timestamps",
            values.len()
        )));
    }
    values
        .iter()
        .map(|v| opt_f64(v).map_err(FetchError::Malformed))
        .collect()
}

fn optional_quote_field(
    quotes: &Value,
    field: &str,
    len: usize,
) -> Result<Vec<Option<f64>>, FetchError> {
    if quotes[field].is_null() {
        return Ok(vec![None; len]);
    }
    quote_field(quotes, field, len)
}
