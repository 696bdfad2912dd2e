//! `TankforgeServer` builder and server loop.
//!
//! This is the entry point for running a Tankforge server. It ties
//! together all the layers: transport → protocol → session → cards/battle.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tankforge_battle::{BattleConfig, BattleCoordinator};
use tankforge_cards::{Catalog, PackConfig, PackDispenser};
use tankforge_protocol::{Codec, JsonCodec};
use tankforge_session::{PairingDirectory, SessionRegistry};
use tankforge_transport::{TcpLineTransport, Transport};

use crate::handler::handle_connection;
use crate::{ServerConfig, TankforgeError};

/// Shared server state passed to each connection handler task.
///
/// Wrapped in `Arc` so it can be cheaply cloned across tasks. Each
/// component guards its own data; nothing here needs an outer lock.
pub(crate) struct ServerState<C: Codec> {
    pub(crate) sessions: SessionRegistry,
    pub(crate) pairings: PairingDirectory,
    pub(crate) battles: BattleCoordinator,
    pub(crate) dispenser: PackDispenser,
    pub(crate) codec: C,
}

/// Builder for configuring and starting a Tankforge server.
///
/// # Example
///
/// ```rust,no_run
/// use std::time::Duration;
/// use tankforge::prelude::*;
///
/// # async fn start() -> Result<(), TankforgeError> {
/// let server = TankforgeServer::builder()
///     .bind("0.0.0.0:8080")
///     .card_timeout(Duration::from_secs(10))
///     .build()
///     .await?;
/// server.run().await
/// # }
/// ```
pub struct TankforgeServerBuilder {
    config: ServerConfig,
    catalog: Catalog,
}

impl TankforgeServerBuilder {
    /// Creates a new builder with default settings and the standard
    /// catalog.
    pub fn new() -> Self {
        Self {
            config: ServerConfig::default(),
            catalog: Catalog::standard(),
        }
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.config.bind_addr = addr.to_string();
        self
    }

    /// Replaces the whole configuration.
    pub fn config(mut self, config: ServerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn max_frame_len(mut self, len: usize) -> Self {
        self.config.max_frame_len = len;
        self
    }

    pub fn packs(mut self, packs: PackConfig) -> Self {
        self.config.packs = packs;
        self
    }

    pub fn battle(mut self, battle: BattleConfig) -> Self {
        self.config.battle = battle;
        self
    }

    /// How long a player has to answer a card request.
    pub fn card_timeout(mut self, timeout: Duration) -> Self {
        self.config.battle.card_timeout = timeout;
        self
    }

    /// Pause between resolved rounds.
    pub fn round_delay(mut self, delay: Duration) -> Self {
        self.config.battle.round_delay = delay;
        self
    }

    /// Pause between the battle announcement and the first round.
    pub fn start_delay(mut self, delay: Duration) -> Self {
        self.config.battle.start_delay = delay;
        self
    }

    /// Draws packs from `catalog` instead of the standard one.
    pub fn catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Validates the configuration and binds the listener.
    ///
    /// Uses `JsonCodec` over newline-delimited TCP.
    pub async fn build(self) -> Result<TankforgeServer<JsonCodec>, TankforgeError> {
        self.config.validate()?;
        let dispenser = PackDispenser::new(Arc::new(self.catalog), &self.config.packs)?;
        let battles = BattleCoordinator::new(self.config.battle.clone())?;

        let transport =
            TcpLineTransport::bind(&self.config.bind_addr, self.config.max_frame_len)
                .await?;

        let state = Arc::new(ServerState {
            sessions: SessionRegistry::new(),
            pairings: PairingDirectory::new(),
            battles,
            dispenser,
            codec: JsonCodec,
        });

        Ok(TankforgeServer { transport, state })
    }
}

impl Default for TankforgeServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A bound Tankforge server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct TankforgeServer<C: Codec> {
    transport: TcpLineTransport,
    state: Arc<ServerState<C>>,
}

impl TankforgeServer<JsonCodec> {
    /// Creates a new builder.
    pub fn builder() -> TankforgeServerBuilder {
        TankforgeServerBuilder::new()
    }
}

impl<C> TankforgeServer<C>
where
    C: Codec,
{
    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.transport.local_addr()
    }

    /// Runs the accept loop until the process is terminated.
    pub async fn run(self) -> Result<(), TankforgeError> {
        self.run_until(std::future::pending()).await
    }

    /// Runs the accept loop until `shutdown` completes, then closes every
    /// session.
    ///
    /// Closing a session ends its connection handler, which runs the usual
    /// disconnection cascade, so running battles end as forced
    /// terminations.
    pub async fn run_until(
        mut self,
        shutdown: impl Future<Output = ()>,
    ) -> Result<(), TankforgeError> {
        tracing::info!(addr = ?self.local_addr().ok(), "Tankforge server running");
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                accepted = self.transport.accept() => match accepted {
                    Ok(conn) => {
                        let state = Arc::clone(&self.state);
                        tokio::spawn(async move {
                            if let Err(e) = handle_connection(conn, state).await {
                                tracing::debug!(
                                    error = %e,
                                    "connection ended with error"
                                );
                            }
                        });
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "accept failed");
                    }
                },
            }
        }

        let closed = self.state.sessions.close_all().await;
        tracing::info!(sessions = closed, "Tankforge server shut down");
        Ok(())
    }
}
