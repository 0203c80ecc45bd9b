use anyhow::{bail, Context, Result};
use charimachi_cli::render::{render_comfort_legend, render_suggestions, render_summary};
use charimachi_core::{GeoPoint, Mode, ModeFlags, SuggestionPanel};
use charimachi_sdk::{spawn_session, CharimachiClient, ClientConfig, FixedLocation};
use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Find a cycling destination and print the bicycle route summary.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Routing service URL (overrides CHARIMACHI_API_URL)
    #[arg(long)]
    url: Option<String>,

    /// Current latitude
    #[arg(long, allow_hyphen_values = true)]
    lat: f64,

    /// Current longitude
    #[arg(long, allow_hyphen_values = true)]
    lon: f64,

    /// Destination search keyword
    #[arg(short, long)]
    query: String,

    /// Index of the suggestion to route to
    #[arg(long, default_value_t = 0)]
    pick: usize,

    /// Prefer routes via bike parking
    #[arg(long)]
    via_bike_parking: bool,

    /// Avoid bus stops
    #[arg(long)]
    avoid_bus_stops: bool,

    /// Avoid traffic lights
    #[arg(long)]
    avoid_traffic_lights: bool,

    /// Debounce quiet period in milliseconds (overrides CHARIMACHI_DEBOUNCE_MS)
    #[arg(long)]
    debounce_ms: Option<u64>,

    /// Seconds to wait for each service response
    #[arg(long, default_value_t = 30)]
    wait_secs: u64,

    /// Print the comfort score legend
    #[arg(long)]
    legend: bool,
}

impl Args {
    fn modes(&self) -> ModeFlags {
        [
            (Mode::ViaBikeParking, self.via_bike_parking),
            (Mode::AvoidBusStops, self.avoid_bus_stops),
            (Mode::AvoidTrafficLights, self.avoid_traffic_lights),
        ]
        .into_iter()
        .filter(|(_, enabled)| *enabled)
        .map(|(mode, _)| mode)
        .collect()
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("charimachi=info".parse()?),
        )
        .init();

    let args = Args::parse();
    let mut config = ClientConfig::from_env();
    if let Some(url) = &args.url {
        config.api_url = url.clone();
    }
    if let Some(ms) = args.debounce_ms {
        config.debounce = Duration::from_millis(ms);
    }
    let wait = Duration::from_secs(args.wait_secs);

    let client = CharimachiClient::from_config(&config)?;
    match client.health().await {
        Ok(health) => tracing::info!(status = %health.status, "routing service reachable"),
        Err(err) => tracing::warn!(error = %err, "health check failed"),
    }

    let origin = GeoPoint::new(args.lat, args.lon);
    if !origin.is_finite() {
        bail!("origin coordinates must be finite");
    }

    let handle = spawn_session(
        Arc::new(client),
        Arc::new(FixedLocation(origin)),
        config.debounce,
    );
    handle.set_modes(args.modes())?;
    handle.set_keyword(args.query.clone())?;

    let view = timeout(
        wait + config.debounce,
        handle.wait_for(|view| {
            matches!(
                view.suggestions,
                SuggestionPanel::Results { .. } | SuggestionPanel::NotFound
            )
        }),
    )
    .await
    .context("timed out waiting for search results")??;

    println!("{}", render_suggestions(&view));
    let SuggestionPanel::Results { items, .. } = view.suggestions else {
        return Ok(());
    };
    let destination = items
        .get(args.pick)
        .cloned()
        .with_context(|| format!("no suggestion at index {}", args.pick))?;

    handle.select_destination(destination)?;
    let view = timeout(
        wait,
        handle.wait_for(|view| {
            view.destination.is_some() && !view.locating && !view.route_loading
        }),
    )
    .await
    .context("timed out waiting for route")??;

    print!("{}", render_summary(&view, chrono::Local::now()));
    if args.legend {
        println!("\n{}", render_comfort_legend());
    }

    Ok(())
}
