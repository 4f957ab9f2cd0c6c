use crate::dashboard::InertiaParams;
use crate::error::ConfigError;
use crate::ext::yfinance::YfinanceRange;
use crate::model::Ticker;
use serde::Deserialize;
use std::path::PathBuf;

/// Run configuration, read from the environment (`.env` is honoured by the binary)
#[derive(Debug, Clone, Deserialize)]
pub struct EnvConf {
    #[serde(default)]
    pub ticker: Ticker,
    #[serde(default = "default_rolling_window")]
    pub rolling_window: usize,
    #[serde(default = "default_ema_fast")]
    pub ema_fast: usize,
    #[serde(default = "default_ema_slow")]
    pub ema_slow: usize,
    #[serde(default)]
    pub fetch_range: YfinanceRange,
    #[serde(default = "default_display_years")]
    pub display_years: u32,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

fn default_rolling_window() -> usize {
    InertiaParams::DEFAULT_ROLLING_WINDOW
}

fn default_ema_fast() -> usize {
    InertiaParams::DEFAULT_EMA_FAST
}

fn default_ema_slow() -> usize {
    InertiaParams::DEFAULT_EMA_SLOW
}

fn default_display_years() -> u32 {
    1
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

impl Default for EnvConf {
    fn default() -> Self {
        Self {
            ticker: Ticker::default(),
            rolling_window: default_rolling_window(),
            ema_fast: default_ema_fast(),
            ema_slow: default_ema_slow(),
            fetch_range: YfinanceRange::default(),
            display_years: default_display_years(),
            output_dir: default_output_dir(),
        }
    }
}

impl EnvConf {
    pub fn from_env() -> Result<Self, ConfigError> {
        let conf: EnvConf = envy::from_env()?;
        conf.validate()?;
        Ok(conf)
    }

    pub fn from_vars<I>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let conf: EnvConf = envy::from_iter(vars)?;
        conf.validate()?;
        Ok(conf)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positives = [
            ("ROLLING_WINDOW", self.rolling_window),
            ("EMA_FAST", self.ema_fast),
            ("EMA_SLOW", self.ema_slow),
            ("DISPLAY_YEARS", self.display_years as usize),
        ];
        if let Some((name, _)) = positives.iter().find(|(_, v)| *v == 0) {
            return Err(ConfigError::NonPositive { name: *name });
        }
        if self.ema_fast >= self.ema_slow {
            return Err(ConfigError::SpanOrder {
                fast: self.ema_fast,
                slow: self.ema_slow,
            });
        }
        Ok(())
    }

    pub fn params(&self) -> InertiaParams {
        InertiaParams {
            rolling_window: self.rolling_window,
            ema_fast: self.ema_fast,
            ema_slow: self.ema_slow,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn defaults_cover_standard_chart() {
        let conf = EnvConf::from_vars(vars(&[])).unwrap();
        assert_eq!(conf.ticker, Ticker::SPY);
        assert_eq!(conf.rolling_window, 252);
        assert_eq!(conf.ema_fast, 10);
        assert_eq!(conf.ema_slow, 50);
        assert_eq!(conf.fetch_range, YfinanceRange::Y2);
        assert_eq!(conf.display_years, 1);
        assert_eq!(conf.output_dir, PathBuf::from("."));
    }

    #[test]
    fn reads_overrides() {
        let conf = EnvConf::from_vars(vars(&[
            ("TICKER", "msft"),
            ("ROLLING_WINDOW", "126"),
            ("FETCH_RANGE", "5y"),
            ("OUTPUT_DIR", "/tmp/charts"),
        ]))
        .unwrap();
        assert_eq!(conf.ticker, Ticker::MSFT);
        assert_eq!(conf.rolling_window, 126);
        assert_eq!(conf.fetch_range, YfinanceRange::Y5);
        assert_eq!(conf.output_dir, PathBuf::from("/tmp/charts"));
        assert_eq!(conf.params().rolling_window, 126);
    }

    #[test]
    fn rejects_unknown_ticker() {
        let err = EnvConf::from_vars(vars(&[("TICKER", "GME")])).unwrap_err();
        assert!(matches!(err, ConfigError::Env(_)));
    }

    #[test]
    fn rejects_zero_window() {
        let err = EnvConf::from_vars(vars(&[("ROLLING_WINDOW", "0")])).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::NonPositive {
                name: "ROLLING_WINDOW"
            }
        ));
    }

    #[test]
    fn rejects_swapped_spans() {
        let err =
            EnvConf::from_vars(vars(&[("EMA_FAST", "50"), ("EMA_SLOW", "10")])).unwrap_err();
        assert!(matches!(err, ConfigError::SpanOrder { fast: 50, slow: 10 }));
    }
}
