//! Ally Input - frame-driven driver for the unified input layer
//!
//! Polls the keyboard and gilrs gamepads at the configured tick rate and
//! logs what a UI sitting on top of it would see.

use ally_input::input::diagnostics::print_gamepad_diagnostics;
use ally_input::input::{
    GilrsSource, DEFAULT_RUMBLE_DURATION, DEFAULT_RUMBLE_INTENSITY,
};
use ally_input::{
    ActiveInputMethod, ButtonName, GamepadBackend, InputBackend, InputConfig, KeyEvent,
    KeyboardBackend, UnifiedInput,
};
use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use std::path::Path;
use std::rc::Rc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;

/// Unified keyboard + gamepad input for the ROG Ally UI
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.yaml")]
    config: String,

    /// Log level (error, warn, info, debug, trace)
    #[arg(short, long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Dump detected gamepads and exit
    #[arg(long)]
    diagnostics: bool,

    /// Seconds to wait for gamepads in diagnostics mode
    #[arg(long, default_value = "5")]
    diagnostics_wait: u64,

    /// Drive the keyboard backend from an interactive prompt
    #[arg(long)]
    repl: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let args = Args::parse();
    init_logging(&args.log_level)?;

    info!("Starting Ally Input v{}...", env!("CARGO_PKG_VERSION"));

    if args.diagnostics {
        let mut source = GilrsSource::new()?;
        print_gamepad_diagnostics(&mut source, Duration::from_secs(args.diagnostics_wait));
        return Ok(());
    }

    let config = load_config(&args.config).await?;

    if args.repl {
        return cli::run_repl(&config);
    }

    // gilrs and the haptics handle are !Send, so everything runs on one thread
    let local = tokio::task::LocalSet::new();
    local.run_until(run_frame_loop(config, shutdown_signal())).await?;

    info!("Ally Input shutdown complete");
    Ok(())
}

async fn load_config(path: &str) -> Result<InputConfig> {
    if !Path::new(path).exists() {
        info!("Configuration file {} not found, using defaults", path);
        return Ok(InputConfig::default());
    }
    let config = InputConfig::load(path)
        .await
        .with_context(|| format!("Failed to load configuration from {}", path))?;
    info!("Configuration loaded from {}", path);
    Ok(config)
}

async fn run_frame_loop(
    config: InputConfig,
    shutdown: impl std::future::Future<Output = ()>,
) -> Result<()> {
    let source = GilrsSource::new()?;
    let haptics = Rc::new(source.haptics());
    let (key_tx, mut key_rx) = mpsc::unbounded_channel::<KeyEvent>();

    let gamepad = GamepadBackend::new(source, &config.gamepad)
        .with_haptics(haptics)
        .with_key_sink(Box::new(key_tx));
    let mut input = UnifiedInput::new(KeyboardBackend::new(&config.keyboard), gamepad);

    let mut ticker = tokio::time::interval(Duration::from_millis(config.tick_interval_ms));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    info!(
        "Polling every {} ms, press {} to stop",
        config.tick_interval_ms,
        "Ctrl+C".bold()
    );

    let mut method: Option<ActiveInputMethod> = None;
    let mut pressed: Vec<ButtonName> = Vec::new();

    tokio::pin!(shutdown);
    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            _ = ticker.tick() => {
                input.update();

                let current = input.active_input_method();
                if method != Some(current) {
                    info!("Input method: {}", current.to_string().cyan().bold());
                    if current == ActiveInputMethod::Gamepad {
                        for (index, id) in input.gamepad().gamepad_ids() {
                            info!("   {} {}", index, id.green());
                        }
                        tokio::task::spawn_local(
                            input.rumble(DEFAULT_RUMBLE_INTENSITY, DEFAULT_RUMBLE_DURATION),
                        );
                    }
                    method = Some(current);
                }

                let now_pressed = input.pressed_buttons();
                if now_pressed != pressed {
                    let names: Vec<&str> = now_pressed.iter().map(|b| b.as_str()).collect();
                    debug!("Pressed: [{}]", names.join(" "));
                    for button in ButtonName::ALL {
                        if input.just_pressed(button) {
                            info!("{} {}", "▼".green(), button);
                        }
                        if input.just_released(button) {
                            info!("{} {}", "▲".yellow(), button);
                        }
                    }
                    pressed = now_pressed;
                }

                for event in input.route_forwarded_keys(&mut key_rx) {
                    info!("⌨️  {}", event.to_string().magenta());
                }
            }
        }
    }

    Ok(())
}

fn init_logging(level: &str) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_thread_names(false),
        )
        .init();

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to install Ctrl+C handler: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
