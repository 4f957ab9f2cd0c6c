pub(crate) mod inertia;
pub(crate) mod ma;
pub(crate) mod volatility;

pub use inertia::*;
pub use ma::*;
pub use volatility::*;

pub mod prelude {
    pub use super::inertia::{inertia, inertia_series};
    pub use super::ma::{ExprMa, ema};
    pub use super::volatility::{BandOffset, ExprVolatility, band, bands, stdev};
}
