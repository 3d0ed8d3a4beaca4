//! Video Mapper Service
//!
//! Catches native Brightcove video content, transforms it into canonical
//! publication events, and sends them back to the queue. Also serves a
//! synchronous mapping endpoint and health probes over HTTP.

use anyhow::{anyhow, Result};
use clap::Parser;
use std::sync::Arc;
use tracing::info;

use video_mapper::{VideoMapper, BRIGHTCOVE_ORIGIN};
use video_mapper_broker::{
    listener, MessageHandler, ProxyConfig, ProxyConsumer, ProxyHealth, ProxyProducer, Shutdown,
};
use video_mapper_server::{routes, AppState};

/// Service configuration; every option has an environment-variable fallback.
#[derive(Debug, Parser)]
#[command(
    name = "video-mapper-server",
    about = "Catch native video content, transform into Content and send back to queue"
)]
struct Config {
    /// Address to connect to the queue proxy (hostname)
    #[arg(
        long = "queue-address",
        env = "Q_ADDR",
        default_value = "http://localhost:9090"
    )]
    queue_address: String,

    /// Group used to read the messages from the queue
    #[arg(long, env = "Q_GROUP", default_value = "videoMapper")]
    group: String,

    /// The topic to read the messages from
    #[arg(
        long = "read-topic",
        env = "Q_READ_TOPIC",
        default_value = "NativeCmsPublicationEvents"
    )]
    read_topic: String,

    /// The topic to write the messages to
    #[arg(
        long = "write-topic",
        env = "Q_WRITE_TOPIC",
        default_value = "CmsPublicationEvents"
    )]
    write_topic: String,

    /// Authorization key to access the queue proxy
    #[arg(long, env = "Q_AUTHORIZATION")]
    authorization: Option<String>,

    /// Port for the HTTP listener
    #[arg(long, env = "PORT", default_value_t = 8080)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_target(false)
        .compact()
        .init();

    let config = Config::parse();
    info!("Starting video mapper...");

    let proxy_config = ProxyConfig {
        address: config.queue_address.clone(),
        group: config.group.clone(),
        read_topic: config.read_topic.clone(),
        write_topic: config.write_topic.clone(),
        authorization: config.authorization.clone(),
    };

    let mapper = Arc::new(VideoMapper::default());
    let producer = ProxyProducer::new(proxy_config.clone());
    let consumer = ProxyConsumer::new(proxy_config.clone());
    let handler = MessageHandler::new((*mapper).clone(), producer, BRIGHTCOVE_ORIGIN);

    // The consume loop runs blocking I/O, so it gets its own thread.
    let shutdown = Shutdown::new();
    let consumer_shutdown = shutdown.clone();
    let consumer_thread =
        std::thread::spawn(move || listener::run(consumer, &handler, &consumer_shutdown));

    let state = AppState {
        mapper,
        connectivity: Arc::new(ProxyHealth::new(&proxy_config)),
    };
    let app = routes::create_routes(state)
        .layer(tower_http::trace::TraceLayer::new_for_http());

    let addr = format!("0.0.0.0:{}", config.port);
    let tcp_listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);

    axum::serve(tcp_listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Stop accepting new messages and wait for the in-flight batch.
    shutdown.trigger();
    consumer_thread
        .join()
        .map_err(|_| anyhow!("consumer thread panicked"))?;

    info!("Shutdown complete");
    Ok(())
}

/// Resolve when SIGINT or SIGTERM arrives.
async fn shutdown_signal() {
    let ctrl_c = async {
        if tokio::signal::ctrl_c().await.is_err() {
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutdown signal received");
}
