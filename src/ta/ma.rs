use polars::prelude::*;

/// Exponential moving average with alpha = 2 / (span + 1).
///
/// Uses adjusted weights: every value is the weighted mean of all closes so far with
/// weights `(1 - alpha)^age`, so there is no warm-up gap and the first value is the
/// first close. A missing close still ages the weights and carries the previous mean.
pub fn ema(src: &Expr, span: usize) -> Expr {
    let alpha = 2. / (span as f64 + 1.);
    src.clone()
        .ewm_mean(EWMOptions {
            alpha,
            adjust: true,
            min_periods: 1,
            ignore_nulls: false,
            ..Default::default()
        })
        .fill_null_with_strategy(FillNullStrategy::Forward(None))
}

pub trait ExprMa {
    fn ema(&self, span: usize) -> Expr;
}

/// Chaining
impl ExprMa for Expr {
    fn ema(&self, span: usize) -> Expr {
        ema(self, span)
    }
}
