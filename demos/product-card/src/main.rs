//! Product card - card-dispatch demo
//!
//! A terminal product card with three async buttons backed by a simulated
//! store API:
//! 1. Key -> ProductCard.handle_event() -> CardAction
//! 2. CardAction dispatched to the EffectStore; the reducer returns effects
//! 3. Effects trigger controllers (debounced, one call in flight)
//! 4. Controllers report back through ChannelObservers as `*Did*` messages
//! 5. If state changed, re-render
//!
//! # Usage
//!
//! ```sh
//! # Default product, 10% simulated failures
//! cargo run -p product-card
//!
//! # Always fail, reproducibly
//! cargo run -p product-card -- --failure-rate 1 --seed 7
//! ```
//!
//! Logs go to `product-card.log` (override with `--log-file`, filter with
//! `RUST_LOG`).

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use card_dispatch::{
    Clock, EffectStoreWithMiddleware, JsonFileStore, LoggingMiddleware, SimulatedBackend,
    TokioClock, WishlistPrefs,
};
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use product_card::components::{Component, ProductCard, ProductCardProps};
use product_card::input::{spawn_event_poller, TermEvent};
use product_card::state::{CardState, TICK_MS};
use product_card::{reducer, CardAction, CardConfig, Controls};

/// Product card with async add-to-cart, wishlist and quick view buttons
#[derive(Parser, Debug)]
#[command(name = "product-card")]
#[command(about = "A terminal product card demonstrating card-dispatch controllers")]
struct Args {
    /// JSON config file (product, controller timings, backend)
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Override the product id
    #[arg(long)]
    product_id: Option<String>,

    /// Override the simulated failure rate (0.0 - 1.0)
    #[arg(long)]
    failure_rate: Option<f64>,

    /// Seed the simulated backend for reproducible failures
    #[arg(long)]
    seed: Option<u64>,

    /// Wishlist preferences file (defaults to the user data directory)
    #[arg(long)]
    prefs: Option<PathBuf>,

    /// Where to write logs
    #[arg(long, default_value = "product-card.log")]
    log_file: PathBuf,
}

impl Args {
    fn card_config(&self) -> Result<CardConfig, card_dispatch::ConfigError> {
        let mut config = match &self.config {
            Some(path) => CardConfig::from_file(path)?,
            None => CardConfig::default(),
        };
        if let Some(id) = &self.product_id {
            config.product.id = id.clone();
        }
        if let Some(rate) = self.failure_rate {
            config.backend.failure_rate = rate;
        }
        if self.seed.is_some() {
            config.backend.seed = self.seed;
        }
        config.validate()?;
        Ok(config)
    }

    fn prefs_path(&self) -> PathBuf {
        self.prefs
            .clone()
            .or_else(JsonFileStore::default_path)
            .unwrap_or_else(|| PathBuf::from("product-card-prefs.json"))
    }
}

fn init_logging(path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("product_card=debug,card_dispatch_core=debug"));
    let result = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(true),
        )
        .try_init();
    if let Err(e) = result {
        eprintln!("Warning: logging disabled: {e}");
    }
    Ok(())
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let args = Args::parse();

    // Validate everything before entering TUI mode
    let config = match args.card_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };
    let prefs_path = args.prefs_path();
    let prefs = match JsonFileStore::open(&prefs_path) {
        Ok(store) => WishlistPrefs::new(store),
        Err(e) => {
            eprintln!(
                "Error: could not open preferences at {}: {e}",
                prefs_path.display()
            );
            std::process::exit(1);
        }
    };
    init_logging(&args.log_file)?;
    info!(product = %config.product.id, prefs = %prefs_path.display(), "starting");

    // ===== Terminal setup =====
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, config, prefs).await;

    // ===== Cleanup =====
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    config: CardConfig,
    prefs: WishlistPrefs<JsonFileStore>,
) -> io::Result<()> {
    let (action_tx, mut action_rx) = mpsc::unbounded_channel();
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<TermEvent>();
    let cancel = CancellationToken::new();
    let _poller = spawn_event_poller(
        event_tx,
        Duration::from_millis(10),
        Duration::from_millis(16),
        cancel.clone(),
    );

    let backend = SimulatedBackend::new(config.backend.clone());
    let clock = TokioClock;
    let mut controls = Controls::new(&config, backend, prefs, clock, action_tx.clone());
    controls.load_image(config.product.image.as_deref(), config.image_delay);

    let state = CardState::new(config.product.product(), controls.wishlisted(), clock.now());
    let mut store = EffectStoreWithMiddleware::new(
        state,
        reducer,
        LoggingMiddleware::new().skipping("Tick"),
    );

    let mut card = ProductCard;
    let mut tick = tokio::time::interval(Duration::from_millis(TICK_MS));
    let mut should_render = true;

    loop {
        if should_render {
            terminal.draw(|frame| {
                let area = frame.area();
                card.render(frame, area, ProductCardProps { state: store.state() });
            })?;
            should_render = false;
        }

        tokio::select! {
            Some(event) = event_rx.recv() => {
                if matches!(event, TermEvent::Resize(..)) {
                    should_render = true;
                }
                for action in card.handle_event(&event, ProductCardProps { state: store.state() }) {
                    let _ = action_tx.send(action);
                }
            }
            Some(action) = action_rx.recv() => {
                if action == CardAction::Quit {
                    break;
                }
                let result = store.dispatch(action);
                should_render |= result.changed;
                for effect in result.effects {
                    if let Err(e) = controls.run(effect) {
                        warn!(error = %e, "controller hook failed");
                    }
                }
            }
            settled = controls.settle_next() => {
                if let Err(e) = settled {
                    warn!(error = %e, "controller hook failed");
                }
            }
            _ = tick.tick() => {
                let _ = action_tx.send(CardAction::Tick(clock.now()));
            }
        }
    }

    cancel.cancel();
    info!(cart_count = store.state().cart_count, "quitting");
    Ok(())
}
