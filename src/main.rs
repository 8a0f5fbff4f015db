//! # Route-picker CLI
//!
//! Command-line front-end for the route-picker library.
//! Drives a route selection session from the terminal, or runs one-shot
//! route queries and coordinate reports against the backend.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use log::error;
use route_picker::{ApiClient, ClientConfig, MapView, Point, RouteBuilder, RouteQuery, RouteStyle};
use tokio::io::{AsyncBufReadExt, BufReader};

mod cli;

use cli::display::{format_map_view, format_routes, format_status};
use cli::{parse_command, Command, LoadingOverlay};

/// Command-line interface for route-picker
#[derive(Parser)]
#[command(name = "route-picker")]
#[command(about = "Pick start and end points on a map and fetch traffic-colored routes")]
#[command(long_about = "Pick start and end points on a map and fetch traffic-colored routes.

Without a subcommand an interactive session reads commands from stdin:
  rclick 50.40 30.50     # select a point
  start                  # confirm it as start
  rclick 50.46 30.55
  end                    # confirm as end, routes are fetched
  show                   # print routes and draw order

Backend URL comes from --api-url, then ROUTE_PICKER_API_URL, then http://localhost:8000")]
#[command(version = env!("ROUTE_PICKER_VERSION"))]
struct Cli {
    /// Backend base URL (overrides ROUTE_PICKER_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// JSON file with route colors, widths and opacities
    #[arg(long, global = true)]
    style: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch routes between two points once and print them
    Route {
        /// Origin as LAT,LNG
        #[arg(allow_hyphen_values = true)]
        origin: Point,

        /// Destination as LAT,LNG
        #[arg(allow_hyphen_values = true)]
        destination: Point,

        /// Print the request instead of sending it
        #[arg(long)]
        dry_run: bool,
    },
    /// Report one clicked coordinate to the backend
    Report {
        #[arg(allow_negative_numbers = true)]
        lat: f64,

        #[arg(allow_negative_numbers = true)]
        lng: f64,
    },
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("❌ Error: {e:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging to stderr
    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .target(env_logger::Target::Stderr)
        .init();

    if cli.verbose {
        eprintln!("🗺️  Route-picker v{} starting...", env!("ROUTE_PICKER_VERSION"));
    }

    let mut config = ClientConfig::from_env().context("Invalid backend configuration")?;
    if let Some(url) = &cli.api_url {
        config = config.with_base_url(url).context("Invalid --api-url")?;
    }

    let style = match &cli.style {
        Some(path) => RouteStyle::from_file(path)
            .with_context(|| format!("Failed to load style from {}", path.display()))?,
        None => RouteStyle::default(),
    };

    match cli.command {
        Some(Commands::Route {
            origin,
            destination,
            dry_run,
        }) => {
            let query = RouteQuery {
                origin,
                destination,
            };
            if dry_run {
                eprintln!("🔍 [DRY RUN] Would POST to {}", config.endpoint("routes"));
                println!("{}", serde_json::to_string_pretty(&query)?);
                return Ok(());
            }
            fetch_once(config, query, &style).await
        }
        Some(Commands::Report { lat, lng }) => {
            let point = Point::checked(lat, lng)?;
            let client = ApiClient::new(config)?;
            client
                .report_coordinates(point)
                .await
                .with_context(|| format!("Failed to report coordinates {point}"))?;
            eprintln!("✅ Reported {point}");
            Ok(())
        }
        None => interactive(config, &style).await,
    }
}

/// One route query, printed with its draw plan
async fn fetch_once(config: ClientConfig, query: RouteQuery, style: &RouteStyle) -> anyhow::Result<()> {
    let mut builder = RouteBuilder::new(ApiClient::new(config)?);
    let mut overlay = LoadingOverlay::new();

    for event in [
        route_picker::Event::ContextClick(query.origin),
        route_picker::Event::ConfirmStart,
        route_picker::Event::ContextClick(query.destination),
        route_picker::Event::ConfirmEnd,
    ] {
        builder.handle(event)?;
    }

    overlay.sync(true, builder.session().in_flight());
    builder.wait_idle().await;
    overlay.sync(false, 0);

    println!("{}", format_routes(builder.session(), style));
    Ok(())
}

/// Interactive session over stdin
async fn interactive(config: ClientConfig, style: &RouteStyle) -> anyhow::Result<()> {
    eprintln!("{}", format_map_view(&MapView::default(), &config.base_url));
    eprintln!("Type 'help' for commands.");

    let mut builder = RouteBuilder::new(ApiClient::new(config)?);
    let mut overlay = LoadingOverlay::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut input_closed = false;

    loop {
        let session = builder.session();
        overlay.sync(session.is_loading(), session.in_flight());
        let loading = session.is_loading();

        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read stdin")? else {
                    input_closed = true;
                    break;
                };
                let command = match parse_command(&line) {
                    Ok(Some(command)) => command,
                    Ok(None) => continue,
                    Err(e) => {
                        eprintln!("⚠️  {e}");
                        continue;
                    }
                };
                match command {
                    Command::Session(event) => {
                        if let Err(e) = builder.handle(event) {
                            eprintln!("⚠️  {e}");
                        }
                    }
                    Command::Show => println!("{}", format_routes(builder.session(), style)),
                    Command::Status => println!("{}", format_status(builder.session())),
                    Command::Help => println!("{}", cli::commands::HELP),
                    Command::Quit => break,
                }
            }
            Some(_) = builder.settle_next(), if loading => {
                builder.settle_ready();
                if !builder.session().is_loading() {
                    overlay.sync(false, 0);
                    println!("{}", format_routes(builder.session(), style));
                }
            }
        }
    }

    // Scripted input: let outstanding calls finish before exiting
    if input_closed {
        if builder.session().is_loading() {
            overlay.sync(true, builder.session().in_flight());
            builder.wait_idle().await;
            overlay.sync(false, 0);
            println!("{}", format_routes(builder.session(), style));
        }
        builder.flush_reports().await;
    }

    overlay.sync(false, 0);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_route_subcommand() {
        let cli = Cli::parse_from(["route-picker", "route", "50.40,30.50", "-33.9,18.4", "--dry-run"]);
        match cli.command {
            Some(Commands::Route {
                origin,
                destination,
                dry_run,
            }) => {
                assert_eq!(origin, Point::new(50.40, 30.50));
                assert_eq!(destination, Point::new(-33.9, 18.4));
                assert!(dry_run);
            }
            _ => panic!("Expected route subcommand"),
        }
    }

    #[test]
    fn test_parse_report_with_negative_coordinates() {
        let cli = Cli::parse_from(["route-picker", "report", "-33.9", "-18.4"]);
        match cli.command {
            Some(Commands::Report { lat, lng }) => {
                assert_eq!(lat, -33.9);
                assert_eq!(lng, -18.4);
            }
            _ => panic!("Expected report subcommand"),
        }
    }

    #[test]
    fn test_interactive_is_default() {
        let cli = Cli::parse_from(["route-picker", "--api-url", "http://backend:9000"]);
        assert!(cli.command.is_none());
        assert_eq!(cli.api_url.as_deref(), Some("http://backend:9000"));
    }
}
