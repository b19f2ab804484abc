use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use tokio::{sync::watch, time::sleep};

use crate::database::{self, PointRepo};

/// Fixed delay between two connection attempts.
pub const RETRY_INTERVAL: Duration = Duration::from_secs(3);

/// Opens a connection to a persistence backend.
#[async_trait]
pub trait Connector: Send + Sync + 'static {
    async fn connect(&self) -> database::Result<Arc<dyn PointRepo>>;

    /// Human readable name of the backend, used in log messages.
    fn name(&self) -> String;
}

#[derive(Clone)]
pub enum ConnectionState {
    Connecting { attempt: u32 },
    Connected(Arc<dyn PointRepo>),
}

/// Handle to the process wide persistence connection.
///
/// The connection is established by a background task that retries on a fixed
/// interval until it succeeds. Until then `repo` returns `None`.
#[derive(Clone)]
pub struct Connection {
    state: watch::Receiver<ConnectionState>,
}

impl Connection {
    pub fn establish<C: Connector>(connector: C, retry_interval: Duration) -> Self {
        let (sender, receiver) =
            watch::channel(ConnectionState::Connecting { attempt: 0 });

        tokio::spawn(async move {
            let mut attempt = 0;
            loop {
                attempt += 1;
                match connector.connect().await {
                    Ok(repo) => {
                        log::info!(
                            "connected to {} after {} attempt(s).",
                            connector.name(),
                            attempt
                        );
                        let _ = sender.send(ConnectionState::Connected(repo));
                        break;
                    }
                    Err(why) => {
                        log::warn!(
                            "could not connect to {} (attempt {}): {}. retrying in {:?}.",
                            connector.name(),
                            attempt,
                            why,
                            retry_interval
                        );
                        if sender.send(ConnectionState::Connecting { attempt }).is_err() {
                            // every handle is gone, nobody is waiting for us
                            break;
                        }
                        sleep(retry_interval).await;
                    }
                }
            }
        });

        Self { state: receiver }
    }

    /// A connection that is ready from the start.
    pub fn connected(repo: Arc<dyn PointRepo>) -> Self {
        let (_, receiver) = watch::channel(ConnectionState::Connected(repo));
        Self { state: receiver }
    }

    pub fn state(&self) -> ConnectionState {
        self.state.borrow().clone()
    }

    pub fn is_ready(&self) -> bool {
        matches!(*self.state.borrow(), ConnectionState::Connected(_))
    }

    pub fn repo(&self) -> Option<Arc<dyn PointRepo>> {
        match &*self.state.borrow() {
            ConnectionState::Connected(repo) => Some(repo.clone()),
            ConnectionState::Connecting { .. } => None,
        }
    }

    /// Waits until the connection is established. Returns `None` if the
    /// connecting task gave up.
    pub async fn ready(&self) -> Option<Arc<dyn PointRepo>> {
        let mut state = self.state.clone();
        let connected = state
            .wait_for(|state| matches!(state, ConnectionState::Connected(_)))
            .await
            .ok()?;
        match &*connected {
            ConnectionState::Connected(repo) => Some(repo.clone()),
            ConnectionState::Connecting { .. } => None,
        }
    }
}
