use crate::df_utils::last_value;
use crate::error::{FrameError, TaError};
use crate::model::Kline;
use crate::ta::prelude::*;
use crate::time_utils::{format_date, start_of_day, years_before};
use polars::prelude::*;
use serde::Serialize;
use tracing::debug;

pub const TIME: &str = "time";
pub const DATE: &str = "Date";
pub const OPEN: &str = "open";
pub const HIGH: &str = "high";
pub const LOW: &str = "low";
pub const CLOSE: &str = "close";
pub const VOLUME: &str = "volume";
pub const INERTIA: &str = "inertia";
pub const STDDEV: &str = "stddev";
pub const EMA_FAST: &str = "ema_fast";
pub const EMA_SLOW: &str = "ema_slow";

/// Lengths of one computation run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InertiaParams {
    /// Regression and deviation window, one trading year by default
    pub rolling_window: usize,
    pub ema_fast: usize,
    pub ema_slow: usize,
}

impl InertiaParams {
    pub const DEFAULT_ROLLING_WINDOW: usize = 252;
    pub const DEFAULT_EMA_FAST: usize = 10;
    pub const DEFAULT_EMA_SLOW: usize = 50;

    pub fn validate(&self) -> Result<(), TaError> {
        let lengths = [
            ("inertia", self.rolling_window),
            ("ema_fast", self.ema_fast),
            ("ema_slow", self.ema_slow),
        ];
        match lengths.into_iter().find(|(_, length)| *length == 0) {
            Some((indicator, length)) => Err(TaError::InvalidLength { indicator, length }),
            None => Ok(()),
        }
    }
}

impl Default for InertiaParams {
    fn default() -> Self {
        Self {
            rolling_window: Self::DEFAULT_ROLLING_WINDOW,
            ema_fast: Self::DEFAULT_EMA_FAST,
            ema_slow: Self::DEFAULT_EMA_SLOW,
        }
    }
}

/// Raw price columns, one row per kline. Non-finite prices become null.
pub fn klines_to_df(klines: &[Kline]) -> PolarsResult<DataFrame> {
    let prices = |field: fn(&Kline) -> Option<f64>| -> Vec<Option<f64>> {
        klines
            .iter()
            .map(|k| field(k).filter(|v| v.is_finite()))
            .collect()
    };
    df!(
        TIME => klines.iter().map(|k| k.time).collect::<Vec<_>>(),
        OPEN => prices(|k| k.open),
        HIGH => prices(|k| k.high),
        LOW => prices(|k| k.low),
        CLOSE => prices(|k| k.close),
        VOLUME => prices(|k| k.volume),
    )
}

/// Expressions derived from the close and the inertia column
pub fn indicators(params: &InertiaParams) -> Vec<Expr> {
    let close = col(CLOSE);

    // Axis conversion
    let time_to_date = (col(TIME) * lit(1000))
        .cast(DataType::Datetime(TimeUnit::Milliseconds, None))
        .alias(DATE);

    let stddev = close.stdev(params.rolling_window);

    let mut exprs = vec![time_to_date, stddev.clone().alias(STDDEV)];
    exprs.extend(bands(&col(INERTIA), &stddev));
    exprs.push(close.ema(params.ema_fast).alias(EMA_FAST));
    exprs.push(close.ema(params.ema_slow).alias(EMA_SLOW));
    exprs
}

/// Column order of the merged frame
pub fn frame_columns() -> Vec<String> {
    let mut columns: Vec<String> = [TIME, DATE, OPEN, HIGH, LOW, CLOSE, VOLUME, INERTIA, STDDEV]
        .into_iter()
        .map(String::from)
        .collect();
    columns.extend(BandOffset::ALL.iter().map(|offset| offset.column_name()));
    columns.extend([EMA_FAST.to_string(), EMA_SLOW.to_string()]);
    columns
}

/// Merged frame over the whole history: prices, inertia, deviation, bands and EMAs
pub fn process_data(klines: &[Kline], params: &InertiaParams) -> Result<DataFrame, FrameError> {
    params.validate()?;
    if klines.is_empty() {
        return Err(FrameError::Empty);
    }

    let mut df = klines_to_df(klines)?;
    let inertia = inertia_series(df.column(CLOSE)?, params.rolling_window, INERTIA)?;
    df.with_column(inertia)?;

    let columns: Vec<Expr> = frame_columns().into_iter().map(col).collect();
    let df = df
        .lazy()
        .with_columns(indicators(params))
        .select(columns)
        .collect()?;
    debug!(rows = df.height(), columns = df.width(), "computed inertia frame");
    Ok(df)
}

/// Rows from the calendar day `years` years before the last bar's day onward
pub fn trailing_window(df: &DataFrame, years: u32) -> Result<DataFrame, FrameError> {
    let last = df.column(TIME)?.i64()?.max().ok_or(FrameError::Empty)?;
    let cutoff = start_of_day(last)
        .and_then(|day| years_before(day, years))
        .ok_or(FrameError::Timestamp(last))?;
    debug!(from = %format_date(cutoff), to = %format_date(last), "trailing window");

    let df = df
        .clone()
        .lazy()
        .filter(col(TIME).gt_eq(lit(cutoff)))
        .collect()?;
    Ok(df)
}

/// Latest row of the merged frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct InertiaSnapshot {
    pub time: i64,
    pub close: Option<f64>,
    pub inertia: Option<f64>,
    pub stddev: Option<f64>,
    pub ema_fast: Option<f64>,
    pub ema_slow: Option<f64>,
}

impl InertiaSnapshot {
    pub fn from_frame(df: &DataFrame) -> Result<Option<Self>, FrameError> {
        let times = df.column(TIME)?.i64()?;
        let Some(time) = times.len().checked_sub(1).and_then(|i| times.get(i)) else {
            return Ok(None);
        };
        Ok(Some(Self {
            time,
            close: last_value(df, CLOSE)?,
            inertia: last_value(df, INERTIA)?,
            stddev: last_value(df, STDDEV)?,
            ema_fast: last_value(df, EMA_FAST)?,
            ema_slow: last_value(df, EMA_SLOW)?,
        }))
    }

    /// Signed distance of the close from the inertia line, in deviations
    pub fn deviation(&self) -> Option<f64> {
        match (self.close, self.inertia, self.stddev) {
            (Some(close), Some(inertia), Some(stddev)) if stddev > 0. => {
                Some((close - inertia) / stddev)
            }
            _ => None,
        }
    }
}
