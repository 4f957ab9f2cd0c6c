use inertia_bands::ta::prelude::*;
use polars::prelude::*;

fn main() {
    let data = [
        44.34, 44.09, 44.15, 43.61, 44.33, 44.83, 45.10, 45.42, 45.84, 46.08, 45.89, 46.03, 45.61,
        46.28, 46.28, 46.00, 46.03, 46.41, 46.22, 45.64, 46.21,
    ];
    let series = Series::new("price".into(), &data);
    let df = DataFrame::new(vec![series.into()]).unwrap();

    let df = df
        .lazy()
        .with_column(col("price").ema(10).alias("ema_10"))
        .with_column(col("price").ema(50).alias("ema_50"))
        .with_column(col("price").stdev(5).alias("stddev_5"))
        .collect()
        .unwrap();

    dbg!(df);
}
