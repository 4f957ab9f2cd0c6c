use crate::df_utils::JsonDataframe;
use crate::error::FrameError;
use crate::model::Ticker;
use crate::ta::BandOffset;
use minijinja::render;
use polars::prelude::*;
use serde::Serialize;
use serde_json::Value;

use super::frame::{EMA_FAST, EMA_SLOW, InertiaParams, InertiaSnapshot};

pub const EMA_FAST_COLOR: &str = "red";
pub const EMA_SLOW_COLOR: &str = "skyblue";

/// One overlay line on the price pane
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineSpec {
    pub name: String,
    pub column: String,
    pub color: &'static str,
    pub dashed: bool,
}

/// Same color on both sides of the inertia line
pub fn band_color(offset: BandOffset) -> &'static str {
    match offset.magnitude() {
        0 => "white",
        1 => "goldenrod",
        2 => "limegreen",
        3 => "turquoise",
        _ => "purple",
    }
}

/// Dashed bands first, then the solid EMAs
pub fn line_specs(params: &InertiaParams) -> Vec<LineSpec> {
    let mut lines: Vec<LineSpec> = BandOffset::ALL
        .iter()
        .map(|offset| LineSpec {
            name: offset.to_string(),
            column: offset.column_name(),
            color: band_color(*offset),
            dashed: true,
        })
        .collect();
    lines.push(LineSpec {
        name: format!("EMA {}", params.ema_fast),
        column: EMA_FAST.to_string(),
        color: EMA_FAST_COLOR,
        dashed: false,
    });
    lines.push(LineSpec {
        name: format!("EMA {}", params.ema_slow),
        column: EMA_SLOW.to_string(),
        color: EMA_SLOW_COLOR,
        dashed: false,
    });
    lines
}

pub fn chart_title(ticker: Ticker) -> String {
    format!("{ticker} Candlestick + Inertia Bands + EMAs")
}

/// File the page of `ticker` is written to, also the target of the selector
pub fn page_file_name(ticker: Ticker) -> String {
    format!("tdv.{ticker}.html")
}

#[derive(Debug, Serialize)]
struct TickerOption {
    symbol: &'static str,
    file: String,
    available: bool,
}

struct TdvHtmlVars {
    dataset: String,
    lines: String,
    pages: String,
    tickers: Vec<TickerOption>,
    symbol: String,
    title: String,
    inertia: String,
    stddev: String,
    deviation: String,
}

fn fmt_opt(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.2}"))
}

/// Self-contained chart page for the display frame.
///
/// Only tickers in `available` (plus `ticker` itself) are selectable, the other
/// options are listed disabled.
pub fn render_dashboard(
    display: &DataFrame,
    ticker: Ticker,
    params: &InertiaParams,
    available: &[Ticker],
) -> Result<String, FrameError> {
    let df_json: JsonDataframe = display.try_into()?;
    let df_json: Value = df_json.into();
    let snapshot = InertiaSnapshot::from_frame(display)?;

    let tickers: Vec<TickerOption> = Ticker::ALL
        .iter()
        .map(|t| TickerOption {
            symbol: t.symbol(),
            file: page_file_name(*t),
            available: *t == ticker || available.contains(t),
        })
        .collect();
    let pages: serde_json::Map<String, Value> = tickers
        .iter()
        .filter(|t| t.available)
        .map(|t| (t.symbol.to_string(), Value::from(t.file.clone())))
        .collect();

    let html_vars = TdvHtmlVars {
        dataset: serde_json::to_string(&df_json)?,
        lines: serde_json::to_string(&line_specs(params))?,
        pages: serde_json::to_string(&pages)?,
        tickers,
        symbol: ticker.to_string(),
        title: chart_title(ticker),
        inertia: fmt_opt(snapshot.and_then(|s| s.inertia)),
        stddev: fmt_opt(snapshot.and_then(|s| s.stddev)),
        deviation: fmt_opt(snapshot.and_then(|s| s.deviation())),
    };
    Ok(render_tdv_html(&html_vars))
}

fn render_tdv_html(vars: &TdvHtmlVars) -> String {
    render!(
        TDV_HTML_TEMPLATE,
        dataset => vars.dataset,
        lines => vars.lines,
        pages => vars.pages,
        tickers => vars.tickers,
        symbol => vars.symbol,
        title => vars.title,
        inertia => vars.inertia,
        stddev => vars.stddev,
        deviation => vars.deviation,
    )
    .trim()
    .to_string()
}

const TDV_HTML_TEMPLATE: &str = r#"
<!DOCTYPE html>
<html class="sl-theme-dark">
  <head>
    <meta charset="utf-8" />
    <title>{{ title }}</title>
    <script src="https://unpkg.com/lightweight-charts/dist/lightweight-charts.standalone.production.js"></script>
    <link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/@shoelace-style/shoelace@2.20.1/cdn/themes/dark.css" />
    <script type="module" src="https://cdn.jsdelivr.net/npm/@shoelace-style/shoelace@2.20.1/cdn/shoelace-autoloader.js"></script>
    <style>
        html, body {
            margin: 0;
            padding: 0;
            background: #000000;
            color: #FFFFFF;
        }

        #header {
            display: flex;
            align-items: center;
            justify-content: space-between;
            gap: 16px;
            padding: 8px 16px;
        }

        #legend {
            display: flex;
            flex-wrap: wrap;
            justify-content: flex-end;
            gap: 12px;
            padding: 0 16px 6px;
            font-size: 13px;
        }

        .legend-item {
            display: inline-flex;
            align-items: center;
            gap: 6px;
            cursor: pointer;
            user-select: none;
        }

        .legend-item.off {
            opacity: 0.35;
        }

        .swatch {
            width: 22px;
            border-top: 2px solid;
        }

        .swatch.dashed {
            border-top-style: dashed;
        }

        #container {
            position: relative;
            height: 800px;
        }

        .axis-title {
            position: absolute;
            z-index: 10;
            font-size: 12px;
            color: #AAAAAA;
        }

        #x-title {
            bottom: 30px;
            left: 50%;
        }

        #y-title {
            top: 50%;
            right: 70px;
            writing-mode: vertical-rl;
        }
    </style>
  </head>
  <body>
    <div id="header">
      <h3 id="title">{{ title }}</h3>
      <div id="badges">
        <sl-badge variant="neutral" pill>Inertia: {{ inertia }}</sl-badge>
        <sl-badge variant="warning" pill>Std: {{ stddev }}</sl-badge>
        <sl-badge variant="primary" pill>Z: {{ deviation }}</sl-badge>
      </div>
      <sl-select id="ticker-select" label="Choose a ticker" size="small" value="{{ symbol }}">
        {% for t in tickers %}<sl-option value="{{ t.symbol }}"{% if not t.available %} disabled{% endif %}>{{ t.symbol }}</sl-option>
        {% endfor %}
        <div slot="help-text">Greyed out tickers have no generated page yet</div>
      </sl-select>
    </div>
    <div id="legend"></div>
    <div id="container">
      <span id="x-title" class="axis-title">Date</span>
      <span id="y-title" class="axis-title">Price</span>
    </div>
    <script id="dataset" type="application/json">
        {{ dataset }}
    </script>
    <script id="lines" type="application/json">
        {{ lines }}
    </script>
    <script id="pages" type="application/json">
        {{ pages }}
    </script>
    <script type="text/javascript">
        const dataset = JSON.parse(document.getElementById('dataset').textContent);
        const lines = JSON.parse(document.getElementById('lines').textContent);
        const pages = JSON.parse(document.getElementById('pages').textContent);
        const container = document.getElementById('container');
        const legend = document.getElementById('legend');

        document.getElementById('ticker-select').addEventListener('sl-change', (event) => {
            const page = pages[event.target.value];
            if (page) {
                window.location.href = page;
            }
        });

        const chart = LightweightCharts.createChart(container, {
            autoSize: true,
            layout: {
                background: { type: 'solid', color: '#000000' },
                textColor: '#FFFFFF',
            },
            grid: {
                vertLines: { visible: false },
                horzLines: { visible: false },
            },
            rightPriceScale: { visible: true },
            leftPriceScale: { visible: false },
            timeScale: {
                timeVisible: false,
            },
        });

        const legendItem = (name, color, dashed, series) => {
            const item = document.createElement('span');
            item.className = 'legend-item';
            const swatch = document.createElement('span');
            swatch.className = dashed ? 'swatch dashed' : 'swatch';
            swatch.style.borderTopColor = color;
            item.appendChild(swatch);
            item.appendChild(document.createTextNode(name));
            item.addEventListener('click', () => {
                const visible = !item.classList.toggle('off');
                series.applyOptions({ visible });
            });
            return item;
        };

        // Undefined values become whitespace points, never zeros
        const point = (d, key) => d[key] === null || d[key] === undefined
            ? { time: d.time }
            : { time: d.time, value: d[key] };

        lines.forEach(line => {
            const series = chart.addSeries(LightweightCharts.LineSeries, {
                color: line.color,
                lineWidth: 2,
                lineStyle: line.dashed ? LightweightCharts.LineStyle.Dashed : LightweightCharts.LineStyle.Solid,
                priceLineVisible: false,
                lastValueVisible: false,
            });
            series.setData(dataset.map(d => point(d, line.column)));
            legend.appendChild(legendItem(line.name, line.color, line.dashed, series));
        });

        // Candlestick is added last in the panel to have higher z-order
        const candlestickSeries = chart.addSeries(LightweightCharts.CandlestickSeries);
        candlestickSeries.setData(dataset.map(d =>
            [d.open, d.high, d.low, d.close].some(v => v === null || v === undefined)
                ? { time: d.time }
                : { time: d.time, open: d.open, high: d.high, low: d.low, close: d.close }
        ));
        legend.prepend(legendItem('Candlestick', '#26a69a', false, candlestickSeries));

        chart.timeScale().fitContent();
    </script>
  </body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::process_data;
    use crate::model::Kline;

    #[test]
    fn band_colors_are_symmetric() {
        for offset in BandOffset::ALL {
            assert_eq!(band_color(offset), band_color(offset.mirror()));
        }
        assert_eq!(band_color(BandOffset::new(0).unwrap()), "white");
        assert_eq!(band_color(BandOffset::new(-4).unwrap()), "purple");
    }

    #[test]
    fn lines_cover_bands_and_emas() {
        let lines = line_specs(&InertiaParams::default());
        assert_eq!(lines.len(), 11);
        assert_eq!(lines.iter().filter(|l| l.dashed).count(), 9);
        assert_eq!(lines[0].name, "SE -4");
        assert_eq!(lines[0].column, "band_-4");
        assert_eq!(lines[9].name, "EMA 10");
        assert_eq!(lines[9].color, "red");
        assert_eq!(lines[10].name, "EMA 50");
        assert_eq!(lines[10].color, "skyblue");
    }

    #[test]
    fn names() {
        assert_eq!(
            chart_title(Ticker::TSM),
            "TSM Candlestick + Inertia Bands + EMAs"
        );
        assert_eq!(page_file_name(Ticker::O), "tdv.O.html");
    }

    #[test]
    fn only_generated_pages_are_selectable() {
        let params = InertiaParams {
            rolling_window: 1,
            ..InertiaParams::default()
        };
        let df = process_data(&[Kline::flat(1_700_000_000, 1.)], &params).unwrap();
        let html = render_dashboard(&df, Ticker::KO, &params, &[Ticker::MSFT]).unwrap();
        assert!(html.contains(r#"<sl-option value="KO">"#));
        assert!(html.contains(r#"<sl-option value="MSFT">"#));
        assert!(html.contains(r#"<sl-option value="SPY" disabled>"#));
        assert!(html.contains(r#""MSFT":"tdv.MSFT.html""#));
        assert!(!html.contains("tdv.SPY.html"));
    }

    #[test]
    fn formats_missing_values() {
        assert_eq!(fmt_opt(None), "-");
        assert_eq!(fmt_opt(Some(1.23456)), "1.23");
    }
}
