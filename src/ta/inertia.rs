use polars::prelude::*;

use crate::error::{FrameError, TaError};

/// Ordinary least squares line over `window` with x = 0..n, evaluated at the last x.
///
/// The fit is done on centered coordinates. With a constant window every deviation is
/// zero, so the slope is zero and the result is the window mean.
fn project_window(window: &[f64]) -> f64 {
    let n = window.len() as f64;
    let x_mean = (n - 1.) / 2.;
    let y_mean = window.iter().sum::<f64>() / n;

    let (sxy, sxx) = window
        .iter()
        .enumerate()
        .fold((0., 0.), |(sxy, sxx), (x, y)| {
            let dx = x as f64 - x_mean;
            (sxy + dx * (y - y_mean), sxx + dx * dx)
        });
    // sxx is only zero for a single point
    let slope = if sxx > 0. { sxy / sxx } else { 0. };
    let intercept = y_mean - slope * x_mean;

    intercept + slope * (n - 1.)
}

/// Inertia: rolling linear regression projected to the end of each trailing window.
///
/// The output has one value per input position. Positions without `length` values of
/// history are `None`, and so is every position whose window holds a missing or
/// non-finite close.
pub fn inertia(closes: &[Option<f64>], length: usize) -> Result<Vec<Option<f64>>, TaError> {
    if length == 0 {
        return Err(TaError::InvalidLength {
            indicator: "inertia",
            length,
        });
    }

    let mut values = vec![None; closes.len().min(length - 1)];
    values.reserve(closes.len() - values.len());

    let mut buf = Vec::with_capacity(length);
    for window in closes.windows(length) {
        buf.clear();
        for value in window {
            match value {
                Some(v) if v.is_finite() => buf.push(*v),
                _ => break,
            }
        }
        values.push((buf.len() == length).then(|| project_window(&buf)));
    }

    Ok(values)
}

/// Apply [`inertia`] to a dataframe column, keeping nulls as undefined
pub fn inertia_series(src: &Column, length: usize, name: &str) -> Result<Series, FrameError> {
    let src = src.cast(&DataType::Float64)?;
    let closes: Vec<Option<f64>> = src.f64()?.into_iter().collect();
    let values = inertia(&closes, length)?;
    Ok(Series::new(name.into(), values))
}
