use chrono::{NaiveDate, Utc};
use tracing::{error, info, warn};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;

use volatility_analyzer::config::AnalyzerConfig;
use volatility_analyzer::provider::PriceSeriesProvider;
use volatility_analyzer::report;
use volatility_analyzer::{AnalysisRequest, run_analysis};

/// Custom timer implementation to format log timestamps using the system's
/// local timezone. By default, tracing uses UTC (Zulu time), which can be
/// confusing for local debugging.
struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        let now = chrono::Local::now();
        write!(w, "{}", now.format("%Y-%m-%dT%H:%M:%S%.3f"))
    }
}

struct CliArgs {
    ticker: Option<String>,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    num_std_devs: Option<f64>,
    bounds: Option<(f64, f64)>,
}

fn usage() -> &'static str {
    "Usage: volatility_analyzer [TICKER] [--start YYYY-MM-DD] [--end YYYY-MM-DD] \
     [--std-devs K] [--bounds LOWER UPPER]"
}

fn parse_args(args: &[String]) -> Result<CliArgs, String> {
    let mut out = CliArgs {
        ticker: None,
        start: None,
        end: None,
        num_std_devs: None,
        bounds: None,
    };

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--start" => {
                let raw = iter.next().ok_or("--start requires a date")?;
                out.start = Some(parse_date(raw)?);
            }
            "--end" => {
                let raw = iter.next().ok_or("--end requires a date")?;
                out.end = Some(parse_date(raw)?);
            }
            "--std-devs" => {
                let raw = iter.next().ok_or("--std-devs requires a value")?;
                out.num_std_devs = Some(parse_number(raw)?);
            }
            "--bounds" => {
                let lo = iter.next().ok_or("--bounds requires two values")?;
                let hi = iter.next().ok_or("--bounds requires two values")?;
                out.bounds = Some((parse_number(lo)?, parse_number(hi)?));
            }
            "--help" | "-h" => return Err(usage().to_string()),
            flag if flag.starts_with("--") => {
                return Err(format!("unknown flag '{flag}'. {}", usage()));
            }
            ticker => {
                if out.ticker.is_some() {
                    return Err(format!("unexpected argument '{ticker}'. {}", usage()));
                }
                out.ticker = Some(ticker.to_string());
            }
        }
    }
    Ok(out)
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| format!("'{raw}' is not a YYYY-MM-DD date"))
}

fn parse_number(raw: &str) -> Result<f64, String> {
    raw.parse::<f64>()
        .map_err(|_| format!("'{raw}' is not a number"))
}

#[tokio::main]
async fn main() {
    // Initialize the tracing subscriber.
    // 1. Reads the log level from the RUST_LOG environment variable (defaults to "info").
    // 2. Injects the custom LocalTimer to ensure logs show local time.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_timer(LocalTimer)
        .init();

    let raw_args: Vec<String> = std::env::args().skip(1).collect();
    let args = match parse_args(&raw_args) {
        Ok(a) => a,
        Err(msg) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
    };

    // Load configuration immediately at startup.
    // Fail fast: a present-but-invalid config file means exit, not guesswork.
    let cfg = match AnalyzerConfig::load() {
        Ok(c) => c,
        Err(e) => {
            error!("❌ Critical Error: Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    let request = AnalysisRequest {
        ticker: args.ticker.unwrap_or_else(|| cfg.default_ticker.clone()),
        start: args.start.unwrap_or(cfg.start_date),
        end: args.end.unwrap_or_else(|| Utc::now().date_naive()),
        num_std_devs: args.num_std_devs.unwrap_or(cfg.num_std_devs),
    };

    let provider = match PriceSeriesProvider::new(&cfg.provider.base_url) {
        Ok(p) => p,
        Err(e) => {
            error!("❌ Failed to construct HTTP client: {e}");
            std::process::exit(1);
        }
    };

    info!(
        "🚀 Analyzing {} ({} → {}, {}σ band)",
        request.ticker, request.start, request.end, request.num_std_devs
    );

    let session = match run_analysis(&provider, &request).await {
        Ok(s) => s,
        Err(e) => {
            error!("❌ Analysis failed: {e}");
            std::process::exit(1);
        }
    };

    println!("{}", report::render_summary(&session));

    // The bounds table and the containment query are independent: either
    // may fail (empty filtered set) while the other still prints.
    match session.bounds_table() {
        Ok(rows) => println!("{}", report::render_bounds_table(&rows)),
        Err(e) => warn!("⚠️ Bounds table unavailable: {e}"),
    }

    if let Some((lower, upper)) = args.bounds {
        match session.containment(lower, upper) {
            Ok(c) => println!("{}", report::render_containment(&c)),
            Err(e) => warn!("⚠️ Containment query unavailable: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn positional_ticker_and_flags() {
        let args = parse_args(&strings(&[
            "nvda", "--start", "2010-06-01", "--std-devs", "1.5", "--bounds", "-3", "3",
        ]))
        .unwrap();

        assert_eq!(args.ticker.as_deref(), Some("nvda"));
        assert_eq!(args.start.unwrap().to_string(), "2010-06-01");
        assert_eq!(args.num_std_devs, Some(1.5));
        assert_eq!(args.bounds, Some((-3.0, 3.0)));
    }

    #[test]
    fn no_arguments_is_valid() {
        let args = parse_args(&[]).unwrap();
        assert!(args.ticker.is_none());
        assert!(args.bounds.is_none());
    }

    #[test]
    fn malformed_date_is_an_error() {
        assert!(parse_args(&strings(&["--start", "June 2010"])).is_err());
    }

    #[test]
    fn unknown_flag_is_an_error() {
        assert!(parse_args(&strings(&["--frequency", "daily"])).is_err());
    }

    #[test]
    fn second_positional_argument_is_an_error() {
        assert!(parse_args(&strings(&["AAPL", "MSFT"])).is_err());
    }
}
