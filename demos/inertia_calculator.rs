use inertia_bands::dashboard::{InertiaParams, process_data};
use inertia_bands::model::Kline;

fn main() {
    let data = [
        44.34, 44.09, 44.15, 43.61, 44.33, 44.83, 45.10, 45.42, 45.84, 46.08, 45.89, 46.03, 45.61,
        46.28, 46.28, 46.00, 46.03, 46.41, 46.22, 45.64, 46.21,
    ];
    let klines: Vec<Kline> = data
        .iter()
        .enumerate()
        .map(|(i, close)| Kline::flat(1_700_000_000 + i as i64 * 86_400, *close))
        .collect();

    let params = InertiaParams {
        rolling_window: 14,
        ema_fast: 5,
        ema_slow: 10,
    };
    let df = process_data(&klines, &params).unwrap();

    dbg!(df);
}
