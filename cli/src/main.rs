mod error_formatter;
mod formatter;
mod server;

use anyhow::Result;
use clap::{Parser, Subcommand};
use formatter::Formatter;
use grossup::{
    Config, GrossUpError, SearchLimits, SearchRequest, SearchStatus, Searcher, Snapshot,
};
use rust_decimal::Decimal;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::watch;

#[derive(Parser)]
#[command(name = "grossup")]
#[command(about = "Find the gross salary that pays a given net salary.")]
#[command(
    long_about = "grossup runs payroll deductions backwards: given the net salary you want to take home, it walks the gross salary up until the deductions leave at least that much.\nIt can also compute net salaries directly, follow a live search step by step, or serve all of this over HTTP."
)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find the gross salary behind a target net salary
    ///
    /// Walks the gross salary up in steps of 1.00 while the net salary is 5.00 or more
    /// away from the target, then in steps of 0.01, and stops at the first gross salary
    /// whose net salary reaches the target.
    Solve {
        /// Net salary to reach
        #[arg(allow_negative_numbers = true)]
        target: Decimal,
        /// Gross salary to start from (default: the target itself)
        #[arg(short, long, allow_negative_numbers = true)]
        start: Option<Decimal>,
        /// JSON configuration file with deductions, step policy and limits
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Give up after this many steps
        #[arg(long)]
        max_iterations: Option<u64>,
        /// Give up after this many milliseconds
        #[arg(long)]
        timeout_ms: Option<u64>,
        /// Search without any bound, even if the target is out of reach
        #[arg(long, conflicts_with_all = ["max_iterations", "timeout_ms"])]
        unbounded: bool,
        /// Show every step of the walk
        #[arg(long)]
        trace: bool,
        /// Output the gross salary only (for piping to other tools)
        #[arg(short = 'r', long)]
        raw: bool,
        /// Output the full outcome as JSON
        #[arg(long, conflicts_with = "raw")]
        json: bool,
    },
    /// Compute the net salary of a gross salary
    ///
    /// Shows the contribution, taxable income and income tax along the way.
    Net {
        /// Gross salary to compute deductions for
        #[arg(allow_negative_numbers = true)]
        gross: Decimal,
        /// JSON configuration file with deductions, step policy and limits
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Output the net salary only
        #[arg(short = 'r', long)]
        raw: bool,
        /// Output the breakdown as JSON
        #[arg(long, conflicts_with = "raw")]
        json: bool,
    },
    /// Follow a search tick by tick
    ///
    /// Runs the search the way an interactive front end would: one step per tick,
    /// printing every state as it is published. Ctrl-C cancels the search.
    Live {
        /// Net salary to reach
        #[arg(allow_negative_numbers = true)]
        target: Decimal,
        /// Gross salary to start from (default: the target itself)
        #[arg(short, long, allow_negative_numbers = true)]
        start: Option<Decimal>,
        /// JSON configuration file with deductions, step policy and limits
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Milliseconds between steps (overrides the configuration)
        #[arg(long)]
        tick_ms: Option<u64>,
    },
    /// Start HTTP REST API server (default: localhost:3000)
    ///
    /// API: GET /net?gross=..., POST /solve, POST /searches,
    /// GET /searches/current, DELETE /searches/current
    Server {
        /// JSON configuration file with deductions, step policy and limits
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Host address to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
        /// Port number to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,
    },
}

fn main() {
    let cli = Cli::parse();

    if !matches!(cli.command, Commands::Server { .. }) {
        init_tracing();
    }

    let result = match &cli.command {
        Commands::Solve {
            target,
            start,
            config,
            max_iterations,
            timeout_ms,
            unbounded,
            trace,
            raw,
            json,
        } => {
            let limits = LimitOverrides {
                max_iterations: *max_iterations,
                timeout_ms: *timeout_ms,
                unbounded: *unbounded,
            };
            solve_command(
                config.as_deref(),
                search_request(*target, *start),
                limits,
                *trace,
                *raw,
                *json,
            )
        }
        Commands::Net {
            gross,
            config,
            raw,
            json,
        } => net_command(config.as_deref(), *gross, *raw, *json),
        Commands::Live {
            target,
            start,
            config,
            tick_ms,
        } => live_command(config.as_deref(), search_request(*target, *start), *tick_ms),
        Commands::Server { config, host, port } => server_command(config.as_deref(), host, *port),
    };

    if let Err(e) = result {
        // Check if it's a GrossUpError and format it nicely, otherwise use default
        if let Some(grossup_err) = e.downcast_ref::<GrossUpError>() {
            eprintln!("Error: {}", error_formatter::format_error(grossup_err));
        } else {
            eprintln!("Error: {}", e);
        }
        std::process::exit(1);
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "grossup=warn".into()),
        )
        .init();
}

struct LimitOverrides {
    max_iterations: Option<u64>,
    timeout_ms: Option<u64>,
    unbounded: bool,
}

impl LimitOverrides {
    fn apply(&self, limits: SearchLimits) -> SearchLimits {
        if self.unbounded {
            return SearchLimits::unbounded();
        }
        SearchLimits {
            max_iterations: self.max_iterations.or(limits.max_iterations),
            max_search_time_ms: self.timeout_ms.or(limits.max_search_time_ms),
        }
    }
}

fn solve_command(
    config_path: Option<&Path>,
    request: SearchRequest,
    overrides: LimitOverrides,
    trace: bool,
    raw: bool,
    json: bool,
) -> Result<()> {
    let config = load_config(config_path)?;
    let limits = overrides.apply(config.limits);

    let outcome = config
        .solver()
        .limits(limits)
        .trace(trace)
        .solve(&config.deductions, request)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        print!("{}", Formatter::default().format_outcome(&outcome, raw));
    }

    Ok(())
}

fn net_command(config_path: Option<&Path>, gross: Decimal, raw: bool, json: bool) -> Result<()> {
    let config = load_config(config_path)?;
    let breakdown = config.deductions.breakdown(gross);

    if json {
        println!("{}", serde_json::to_string_pretty(&breakdown)?);
    } else {
        print!("{}", Formatter::default().format_breakdown(&breakdown, raw));
    }

    Ok(())
}

fn live_command(
    config_path: Option<&Path>,
    request: SearchRequest,
    tick_ms: Option<u64>,
) -> Result<()> {
    use tokio::runtime::Runtime;

    let config = load_config(config_path)?;
    let tick = tick_ms.map(Duration::from_millis).unwrap_or(config.tick());
    let searcher = Searcher::from_config(config.deductions.clone(), &config).tick(tick);
    let formatter = Formatter::default();

    let rt = Runtime::new()?;
    let outcome = rt.block_on(async {
        let mut rx = searcher.subscribe();
        let handle = searcher.start(request);
        let mut stdout = std::io::stdout();

        tokio::select! {
            followed = follow_search(&mut rx, &formatter, &mut stdout) => {
                if let Err(err) = followed {
                    searcher.cancel();
                    return Err(anyhow::Error::new(err).context("cannot write search progress"));
                }
            }
            _ = tokio::signal::ctrl_c() => {
                searcher.cancel();
            }
        }

        Ok(handle.outcome().await?)
    })?;

    println!();
    print!("{}", formatter.format_outcome(&outcome, false));
    Ok(())
}

/// Print each new probe until the search leaves the `Searching` status.
/// Stops at the first failed write.
async fn follow_search<W: Write>(
    rx: &mut watch::Receiver<Snapshot>,
    formatter: &Formatter,
    out: &mut W,
) -> std::io::Result<()> {
    let mut last_iteration = None;
    while rx.changed().await.is_ok() {
        let snapshot = *rx.borrow_and_update();
        if let Some(probe) = snapshot.probe {
            if last_iteration != Some(probe.iteration) {
                last_iteration = Some(probe.iteration);
                out.write_all(formatter.format_probe_line(&probe).as_bytes())?;
                out.flush()?;
            }
        }
        if snapshot.status != SearchStatus::Searching {
            break;
        }
    }
    Ok(())
}

fn server_command(config_path: Option<&Path>, host: &str, port: u16) -> Result<()> {
    #[cfg(feature = "server")]
    {
        use tokio::runtime::Runtime;
        let config = load_config(config_path)?;
        let rt = Runtime::new()?;
        rt.block_on(async {
            println!("Starting HTTP server on {}:{}", host, port);
            server::http::start_server(config, host, port).await
        })?;
    }

    #[cfg(not(feature = "server"))]
    {
        let _ = (config_path, host, port);
        eprintln!("Error: Server feature not enabled");
        eprintln!("Recompile with: cargo build --features server");
        std::process::exit(1);
    }

    Ok(())
}

fn search_request(target: Decimal, start: Option<Decimal>) -> SearchRequest {
    match start {
        Some(start) => SearchRequest::new(start, target),
        None => SearchRequest::from_target(target),
    }
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Ok(Config::load(path)?),
        None => Ok(Config::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grossup::Identity;
    use std::io;

    /// Accepts `capacity` writes, then behaves like a closed pipe
    struct ClosingPipe {
        capacity: usize,
        lines: Vec<u8>,
    }

    impl Write for ClosingPipe {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.capacity == 0 {
                return Err(io::Error::from(io::ErrorKind::BrokenPipe));
            }
            self.capacity -= 1;
            self.lines.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_follow_stops_when_output_closes() {
        let searcher = Searcher::new(Identity)
            .tick(Duration::from_millis(1))
            .limits(SearchLimits::unbounded());
        let mut rx = searcher.subscribe();
        let _handle = searcher.start(SearchRequest::new(
            Decimal::ZERO,
            Decimal::from(1_000_000_000),
        ));
        let mut pipe = ClosingPipe {
            capacity: 2,
            lines: Vec::new(),
        };

        let followed = follow_search(&mut rx, &Formatter::default(), &mut pipe).await;

        assert_eq!(followed.unwrap_err().kind(), io::ErrorKind::BrokenPipe);
        assert!(!pipe.lines.is_empty());
        assert!(searcher.is_searching());
    }

    #[tokio::test]
    async fn test_follow_prints_until_done() {
        let searcher = Searcher::new(Identity).tick(Duration::ZERO);
        let mut rx = searcher.subscribe();
        let handle = searcher.start(SearchRequest::new(Decimal::ZERO, Decimal::from(3)));
        let mut out = Vec::new();

        follow_search(&mut rx, &Formatter::default(), &mut out)
            .await
            .unwrap();
        let outcome = handle.outcome().await.unwrap();

        assert_eq!(outcome.gross_salary(), Decimal::from(3));
        assert!(!out.is_empty());
    }
}
