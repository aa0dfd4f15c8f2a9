use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use departure_fetcher::DepartureFetcher;
use dotenvy::dotenv;
use render::{DEFAULT_MARGIN, DEFAULT_WIDTH, RenderOptions, nearest::nearest_path_coordinate};
use tracing::info;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry};

mod config;
mod departure_fetcher;
mod model;
mod render;
mod web;

#[derive(Parser)]
#[command(version, about = "Tram departure board and route shape renderer")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the departure board web page and `/api/tram_time`
    Serve {
        /// Address to listen on, defaults to BIND_ADDRESS or 0.0.0.0:5000
        #[arg(long)]
        bind: Option<String>,
    },
    /// Draw a route shape CSV as an SVG with labelled stops
    Render {
        /// CSV with shape_pt_sequence, lat and lon columns
        input: PathBuf,
        /// Where to write the SVG
        output: PathBuf,
        /// Width of the drawing without margins, in pixels
        #[arg(long, default_value_t = DEFAULT_WIDTH)]
        width: u32,
        #[arg(long, default_value_t = DEFAULT_MARGIN)]
        margin: u32,
        /// CSV with name, lat and lon columns. The Hotel Golf - Klamovka stops are used if omitted
        #[arg(long)]
        stops: Option<PathBuf>,
    },
    /// Find the path coordinate of a rendered SVG closest to a pixel position
    #[command(allow_negative_numbers = true)]
    Nearest { svg: PathBuf, x: f64, y: f64 },
}

#[tokio::main(flavor = "multi_thread")]
async fn main() -> Result<()> {
    _ = dotenv();
    let args = Args::parse();

    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();

    let appender = tracing_appender::rolling::daily("./logs", "tram_board.log");
    let (non_blocking_appender, _guard) = tracing_appender::non_blocking(appender);

    // A layer that logs events to rolling files.
    let file_log = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_appender)
        .with_ansi(false)
        .pretty();

    let stdout_log = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    Registry::default()
        .with(file_log)
        .with(stdout_log)
        .with(env_filter)
        .init();

    match args.command {
        Command::Serve { bind } => {
            let config = config::BoardConfig::from_env()?;
            info!("board config {:?}", config);

            let fetcher = DepartureFetcher::new(config)?;
            let bind = bind.unwrap_or_else(config::bind_address);

            web::serve(&bind, fetcher).await?;
        }
        Command::Render {
            input,
            output,
            width,
            margin,
            stops,
        } => {
            let stops = match stops {
                Some(path) => render::shape_loader::read_stops(&path)?,
                None => model::named_stop::default_stops(),
            };
            let options = RenderOptions {
                desired_width: width,
                margin,
                stops,
            };

            render::render_route(&input, &output, &options)
                .with_context(|| format!("couldn't render {}", input.display()))?;
        }
        Command::Nearest { svg, x, y } => {
            let document = std::fs::read_to_string(&svg)
                .with_context(|| format!("couldn't read {}", svg.display()))?;

            match nearest_path_coordinate(&document, x, y)? {
                Some(point) => println!("{} {}", point.x, point.y),
                None => anyhow::bail!("{} has no path coordinates", svg.display()),
            }
        }
    }

    Ok(())
}
