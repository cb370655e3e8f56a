//! The app event stream.
//!
//! Everything the UI reacts to arrives on one channel: terminal input,
//! session changes, subscription snapshots, and completions of spawned
//! auth or write tasks. The render loop blocks on this channel only.

use tokio::sync::mpsc;

use punguin_core::{Product, Session};

/// Which write a completion belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteAction {
    Create,
    Update,
    Delete,
}

/// One occurrence the app loop handles.
#[derive(Debug)]
pub enum AppEvent {
    /// A terminal event (key press, resize).
    Input(crossterm::event::Event),
    /// The session store published a change.
    SessionChanged(Option<Session>),
    /// The product subscription published a new snapshot.
    Products(Vec<Product>),
    /// A sign-in or sign-up attempt finished. Errors carry the
    /// provider's message verbatim.
    AuthDone(Result<(), String>),
    /// A store write finished.
    WriteDone {
        action: WriteAction,
        result: Result<(), String>,
    },
    /// The product subscription could not be established.
    SubscriptionFailed(String),
}

/// Forward terminal events into the app channel from a blocking thread.
///
/// The thread exits when the receiving side goes away.
pub fn spawn_input_pump(tx: mpsc::UnboundedSender<AppEvent>) {
    std::thread::spawn(move || {
        loop {
            match crossterm::event::read() {
                Ok(event) => {
                    if tx.send(AppEvent::Input(event)).is_err() {
                        break;
                    }
                }
                Err(err) => {
                    tracing::error!(error = %err, "terminal input read failed");
                    break;
                }
            }
        }
    });
}
