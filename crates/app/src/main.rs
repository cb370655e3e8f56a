//! Punguin - terminal storefront-management client.
//!
//! Users sign in (or create an account) against the external auth
//! provider, then manage their own product records: live list with
//! search and category filtering, add, edit, and delete. All data lives
//! in the remote realtime store; this process keeps nothing durable.
//!
//! # Architecture
//!
//! - `punguin-client` wraps the auth provider and the realtime store
//! - A single event channel multiplexes terminal input, session
//!   changes, subscription snapshots, and write completions
//! - ratatui renders the current screen after every event

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use secrecy::ExposeSecret as _;
use sentry::integrations::tracing as sentry_tracing;
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod app;
mod event;
mod navigator;
mod picker;
mod screens;
mod ui;
mod viewmodel;

use punguin_client::{ClientConfig, IdentityClient, ProductStore, RealtimeStore, SessionStore};
use punguin_core::Session;

use app::App;
use event::AppEvent;
use picker::ImageGallery;

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &ClientConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    // Load configuration from environment (needed for Sentry init)
    let config = ClientConfig::from_env().expect("Failed to load configuration");

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);

    // Tracing goes to a file; the terminal belongs to the UI.
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file)
        .expect("Failed to open log file");
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "punguin=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Arc::new(log_file))
                .with_ansi(false),
        )
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let session_store = Arc::new(SessionStore::new(Arc::new(IdentityClient::new(&config))));
    let gallery = ImageGallery::new(config.gallery_dir.clone());

    // Each session gets a store carrying that session's credential.
    let store_config = config.clone();
    let make_store = Box::new(move |session: &Session| {
        Arc::new(
            RealtimeStore::new(&store_config)
                .with_auth(session.id_token.expose_secret().to_owned().into()),
        ) as Arc<dyn ProductStore>
    });

    let (tx, mut rx) = mpsc::unbounded_channel();

    // Terminal input from a blocking thread.
    event::spawn_input_pump(tx.clone());

    // Session changes from the store's watcher.
    let mut watcher = session_store.subscribe();
    let session_tx = tx.clone();
    tokio::spawn(async move {
        while let Some(state) = watcher.changed().await {
            if session_tx.send(AppEvent::SessionChanged(state)).is_err() {
                break;
            }
        }
    });

    let mut app = App::new(session_store, make_store, gallery, tx);

    let mut terminal = ratatui::init();
    tracing::info!("punguin started");

    loop {
        if let Err(err) = terminal.draw(|frame| ui::render(frame, &app)) {
            tracing::error!(error = %err, "draw failed");
            break;
        }
        let Some(event) = rx.recv().await else { break };
        app.handle_event(event);
        if app.should_quit {
            break;
        }
    }

    ratatui::restore();
}
