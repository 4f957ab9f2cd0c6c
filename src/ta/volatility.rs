use polars::prelude::*;
use serde::Serialize;
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Rolling population standard deviation (ddof = 0).
///
/// `min_periods` equals the window, so the warm-up region and any window holding a
/// null or NaN come out null.
pub fn stdev(src: &Expr, len: usize) -> Expr {
    src.clone().fill_nan(lit(NULL)).rolling_std(RollingOptionsFixedWindow {
        window_size: len,
        min_periods: len,
        weights: None,
        center: false,
        fn_params: Some(RollingFnParams::Var(RollingVarParams { ddof: 0 })),
    })
}

/// Integer multiple of the rolling deviation applied to the inertia line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct BandOffset(i8);

impl BandOffset {
    pub const MAX: i8 = 4;

    /// Offsets -4..=4, lowest first
    pub const ALL: [BandOffset; 9] = [
        BandOffset(-4),
        BandOffset(-3),
        BandOffset(-2),
        BandOffset(-1),
        BandOffset(0),
        BandOffset(1),
        BandOffset(2),
        BandOffset(3),
        BandOffset(4),
    ];

    pub fn new(k: i8) -> Option<Self> {
        (-Self::MAX..=Self::MAX).contains(&k).then_some(Self(k))
    }

    pub fn k(self) -> i8 {
        self.0
    }

    pub fn magnitude(self) -> u8 {
        self.0.unsigned_abs()
    }

    /// Same magnitude on the other side of the inertia line
    pub fn mirror(self) -> Self {
        Self(-self.0)
    }

    /// Column name in the merged frame, e.g. `band_-2`
    pub fn column_name(self) -> String {
        format!("band_{}", self.0)
    }
}

impl Display for BandOffset {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "SE {}", self.0)
    }
}

/// `projection + k * stddev`, null when either side is null
pub fn band(projection: &Expr, stddev: &Expr, offset: BandOffset) -> Expr {
    projection.clone() + lit(offset.k() as f64) * stddev.clone()
}

/// All nine bands, aliased to their column names
pub fn bands(projection: &Expr, stddev: &Expr) -> Vec<Expr> {
    BandOffset::ALL
        .iter()
        .map(|offset| band(projection, stddev, *offset).alias(offset.column_name()))
        .collect()
}

pub trait ExprVolatility {
    fn stdev(&self, len: usize) -> Expr;
}

impl ExprVolatility for Expr {
    fn stdev(&self, len: usize) -> Expr {
        stdev(self, len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn values(df: &DataFrame, name: &str) -> Vec<Option<f64>> {
        df.column(name).unwrap().f64().unwrap().into_iter().collect()
    }

    #[test]
    fn offsets_are_symmetric_and_include_zero() {
        assert_eq!(BandOffset::ALL.len(), 9);
        assert!(BandOffset::ALL.contains(&BandOffset(0)));
        for offset in BandOffset::ALL {
            assert!(BandOffset::ALL.contains(&offset.mirror()));
            assert_eq!(offset.magnitude(), offset.mirror().magnitude());
        }
        assert_eq!(BandOffset::new(5), None);
        assert_eq!(BandOffset::new(-4).map(BandOffset::k), Some(-4));
    }

    #[test]
    fn names() {
        let offset = BandOffset::new(-2).unwrap();
        assert_eq!(offset.column_name(), "band_-2");
        assert_eq!(offset.to_string(), "SE -2");
    }

    #[test]
    fn stdev_is_population() {
        let df = df!("price" => [2., 4., 4., 4., 5., 5., 7., 9.])
            .unwrap()
            .lazy()
            .with_column(col("price").stdev(8).alias("sd"))
            .collect()
            .unwrap();
        let sd = values(&df, "sd");
        assert!(sd[..7].iter().all(Option::is_none));
        assert_relative_eq!(sd[7].unwrap(), 2., epsilon = 1e-9);
    }

    #[test]
    fn stdev_of_constant_is_zero() {
        let df = df!("price" => [100.; 6])
            .unwrap()
            .lazy()
            .with_column(col("price").stdev(3).alias("sd"))
            .collect()
            .unwrap();
        let sd = values(&df, "sd");
        assert_eq!(sd[0], None);
        assert_eq!(sd[1], None);
        for v in &sd[2..] {
            assert_relative_eq!(v.unwrap(), 0., epsilon = 1e-9);
        }
    }

    #[test]
    fn stdev_null_in_window_is_undefined() {
        let df = df!("price" => [Some(1.), Some(2.), Some(3.), None, Some(5.), Some(6.), Some(7.)])
            .unwrap()
            .lazy()
            .with_column(col("price").stdev(3).alias("sd"))
            .collect()
            .unwrap();
        let sd = values(&df, "sd");
        assert!(sd[2].is_some());
        assert_eq!(sd[3], None);
        assert_eq!(sd[4], None);
        assert_eq!(sd[5], None);
        assert_relative_eq!(sd[6].unwrap(), (2f64 / 3.).sqrt(), epsilon = 1e-9);
    }

    #[test]
    fn stdev_nan_in_window_is_undefined() {
        let df = df!("price" => [1., 2., f64::NAN, 4., 5., 6.])
            .unwrap()
            .lazy()
            .with_column(col("price").stdev(3).alias("sd"))
            .collect()
            .unwrap();
        let sd = values(&df, "sd");
        assert!(sd[..5].iter().all(Option::is_none));
        assert_relative_eq!(sd[5].unwrap(), (2f64 / 3.).sqrt(), epsilon = 1e-9);
    }

    #[test]
    fn bands_offset_projection() {
        let df = df!(
            "projection" => [Some(10.), Some(20.), None],
            "sd" => [Some(1.5), None, Some(2.)],
        )
        .unwrap()
        .lazy()
        .with_columns(bands(&col("projection"), &col("sd")))
        .collect()
        .unwrap();

        assert_eq!(values(&df, "band_0")[0], Some(10.));
        assert_relative_eq!(values(&df, "band_2")[0].unwrap(), 13.);
        assert_relative_eq!(values(&df, "band_-4")[0].unwrap(), 4.);
        for offset in BandOffset::ALL {
            let band = values(&df, &offset.column_name());
            assert_eq!(band[1], None);
            assert_eq!(band[2], None);
        }
    }
}
