mod kline;
mod ticker;

pub use kline::*;
pub use ticker::*;

pub(crate) use kline::opt_f64;
