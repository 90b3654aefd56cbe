pub mod content;
pub mod entity;
pub mod ids;
pub mod models;

use std::time::Duration;

use iroh::Endpoint;
use tracing_subscriber::EnvFilter;
use zel_core::{prelude::RpcServerBuilder, protocol::RpcClient, IrohBundle};

use crate::service::comments::{CommentsClient, CommentsServer, CommentsService};

pub mod service;

pub mod error;

pub mod config;

static ALPN: &[u8] = b"threadline::0.1.0";

/// Main runtime handle for Threadline.
pub struct ThreadlineCore {
    pub config: config::ThreadlineConfig,

    /// Server bundle that accepts inbound RPC traffic.
    pub server: IrohBundle,

    /// Client-side endpoint connected to the local server.
    pub client_endpoint: Endpoint,

    /// Typed client for the local comments service.
    pub comments: CommentsClient,
}

impl ThreadlineCore {
    pub async fn start() -> Result<Self, Box<dyn std::error::Error>> {
        let config = config::get_or_init().await?;
        init_tracing(config.log_filter());
        tracing::info!(database = %config.database_path().display(), "starting threadline");

        // ----------------
        // Server endpoint
        // ----------------
        let mut server_builder = IrohBundle::builder(Some(config.secret_key.clone())).await?;
        let server_endpoint = server_builder.endpoint().clone();

        // DB + migrations
        let db = models::open_or_create_db(&config).await?;
        models::migrate_up(&db).await?;

        let comments_service = CommentsService::new(db);

        // Register RPC servers
        let rpc_server_builder = RpcServerBuilder::new(ALPN, server_endpoint.clone());

        let rpc_server_builder = comments_service.register_service(rpc_server_builder);

        let rpc_server = rpc_server_builder.build();

        let server = server_builder.accept(ALPN, rpc_server).finish().await;

        server.wait_online().await;

        // ----------------
        // Client endpoint
        // ----------------
        let client_endpoint = Endpoint::builder()
            .secret_key(config.client_secret_key.clone())
            .alpns(vec![ALPN.to_vec()])
            .bind()
            .await?;

        client_endpoint.online().await;

        // Connect client endpoint -> server endpoint
        let conn = client_endpoint
            .connect(server.endpoint.addr(), ALPN)
            .await?;

        let rpc = RpcClient::new(conn).await?;
        let comments = CommentsClient::new(rpc);

        tracing::info!("threadline online");

        Ok(Self {
            config,
            server,
            client_endpoint,
            comments,
        })
    }

    pub async fn shutdown(self) -> Result<(), Box<dyn std::error::Error>> {
        // Close client endpoint
        self.client_endpoint.close().await;

        // Shutdown server bundle
        self.server.shutdown(Duration::from_secs(5)).await?;
        tracing::info!("threadline stopped");
        Ok(())
    }
}

/// Installs the global fmt subscriber. A subscriber the host already set up
/// wins; `RUST_LOG` wins over the configured filter.
fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

pub mod prelude {
    pub use super::content::{ContentRef, ContentType};
    pub use super::entity;
    pub use super::ids;
    pub use super::models;

    pub use super::service;

    pub use super::error::CommentError;

    pub use super::config;

    pub use zel_core;
}
