// =============================================================================
// Aurora Charts — Main Entry Point
// =============================================================================
//
// Interactive ticker prompt: fetch daily bars, normalize them to business
// days, compute the indicator set and print a summary. When `enable_api` is
// set, the JSON chart API is served alongside the prompt from the same state.
// =============================================================================

// ── Module declarations ──────────────────────────────────────────────────────
mod analysis;
mod api;
mod app_state;
mod indicators;
mod market_data;
mod report;
mod runtime_config;
mod types;

use std::io::{BufRead, Write};
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::app_state::AppState;
use crate::runtime_config::{RuntimeConfig, DEFAULT_CONFIG_PATH};
use crate::types::Period;

const BANNER_WIDTH: usize = 50;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Environment & config ──────────────────────────────────────────
    let _ = dotenv::dotenv();

    // Logs go to stderr so the prompt on stdout stays readable.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config_path =
        std::env::var("AURORA_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let mut config = RuntimeConfig::load(&config_path).unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        RuntimeConfig::default()
    });
    config.apply_env_overrides(|key| std::env::var(key).ok());

    info!(
        default_period = %config.default_period,
        enable_api = config.enable_api,
        "Aurora Charts starting"
    );

    // ── 2. Build shared state ────────────────────────────────────────────
    let state = Arc::new(AppState::new(config)?);

    // ── 3. Optional API server ───────────────────────────────────────────
    if state.config.enable_api {
        let api_state = state.clone();
        let bind_addr = state.config.bind_addr.clone();
        let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
        info!(addr = %bind_addr, "API server listening");

        tokio::spawn(async move {
            let app = api::rest::router(api_state);
            if let Err(e) = axum::serve(listener, app).await {
                error!(error = %e, "API server failed");
            }
        });
    }

    // ── 4. Prompt loop until quit, EOF or Ctrl+C ─────────────────────────
    tokio::select! {
        res = prompt_loop(state.clone()) => res?,
        _ = tokio::signal::ctrl_c() => {
            warn!("Shutdown signal received");
        }
    }

    info!(analyses = state.analyses_served(), "Aurora Charts shut down");
    Ok(())
}

/// One line of user input at the ticker prompt.
#[derive(Debug, PartialEq)]
enum Command {
    Quit,
    Skip,
    Analyze { symbol: String, period: Option<Period> },
}

/// Parse `TICKER [PERIOD]`, or a quit word.
fn parse_command(line: &str) -> anyhow::Result<Command> {
    let mut parts = line.split_whitespace();
    let symbol = match parts.next() {
        Some(s) => s,
        None => return Ok(Command::Skip),
    };
    if symbol.eq_ignore_ascii_case("q") || symbol.eq_ignore_ascii_case("quit") {
        return Ok(Command::Quit);
    }
    let period = parts.next().map(str::parse::<Period>).transpose()?;
    if let Some(extra) = parts.next() {
        anyhow::bail!("unexpected input '{}' (expected: TICKER [PERIOD])", extra);
    }
    Ok(Command::Analyze {
        symbol: symbol.to_ascii_uppercase(),
        period,
    })
}

/// Read stdin on a dedicated thread so a pending read never holds up runtime
/// shutdown. The channel closes on EOF.
fn spawn_stdin_reader() -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            match line {
                Ok(l) => {
                    if tx.send(l).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    warn!(error = %e, "stdin read failed");
                    break;
                }
            }
        }
    });
    rx
}

async fn prompt_loop(state: Arc<AppState>) -> anyhow::Result<()> {
    let mut lines = spawn_stdin_reader();
    let rule = "=".repeat(BANNER_WIDTH);
    let mut stdout = std::io::stdout();

    loop {
        print!(
            "\n{rule}\nStock Data Analysis Tool\n{rule}\nEnter 'q' or 'quit' to exit the program\n\nEnter the stock ticker symbol [period, default {}]: ",
            state.config.default_period
        );
        stdout.flush()?;

        let line = match lines.recv().await {
            Some(l) => l,
            None => break,
        };

        match parse_command(&line) {
            Ok(Command::Quit) => {
                println!("\nThank you for using the Stock Data Analysis Tool!");
                break;
            }
            Ok(Command::Skip) => continue,
            Ok(Command::Analyze { symbol, period }) => {
                let period = period.unwrap_or(state.config.default_period);
                match analysis::run_analysis(&state, &symbol, period).await {
                    Ok(Some(a)) => print!("\n{}", report::render_summary(&a, state.config.head_rows)),
                    Ok(None) => println!("\nNo data found for ticker symbol: {symbol}"),
                    Err(e) => {
                        println!("\nError fetching data for {symbol}: {e:#}");
                        println!("Please check if the ticker symbol is correct and try again.");
                    }
                }
            }
            Err(e) => println!("\n{e}"),
        }
    }

    stdout.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quit_words() {
        assert_eq!(parse_command("q").unwrap(), Command::Quit);
        assert_eq!(parse_command(" QUIT ").unwrap(), Command::Quit);
        assert_eq!(parse_command("Quit").unwrap(), Command::Quit);
    }

    #[test]
    fn blank_line_is_skipped() {
        assert_eq!(parse_command("   ").unwrap(), Command::Skip);
    }

    #[test]
    fn ticker_with_optional_period() {
        assert_eq!(
            parse_command("aapl").unwrap(),
            Command::Analyze {
                symbol: "AAPL".to_string(),
                period: None
            }
        );
        assert_eq!(
            parse_command("msft 6mo").unwrap(),
            Command::Analyze {
                symbol: "MSFT".to_string(),
                period: Some(Period::SixMonths)
            }
        );
    }

    #[test]
    fn bad_period_or_extra_tokens_rejected() {
        assert!(parse_command("msft 6weeks").is_err());
        assert!(parse_command("msft 6mo extra").is_err());
    }
}
