use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use bridgebot_core::config::BridgeConfig;
use bridgebot_core::security::BearerSigner;
use bridgebot_outbound::{HttpOutbound, OutboundConfig};
use bridgebot_pipeline::Pipeline;
use bridgebot_store::SqliteAuditStore;
use bridgebot_stream::{ReconnectSupervisor, RetryConfig, SessionConfig, StreamSession};

#[derive(Parser, Debug)]
#[command(name = "bridgebot", about = "Bridges a server-push feed to outbound posts")]
struct Args {
    /// Path to the JSON config file.
    #[arg(long, default_value = "bridge.json")]
    config: PathBuf,

    /// Emit JSON log lines instead of human-readable output.
    #[arg(long)]
    json_logs: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    bridgebot_telemetry::init(bridgebot_telemetry::TelemetryConfig {
        json: args.json_logs,
        ..Default::default()
    });

    tracing::info!(config = %args.config.display(), "starting bridgebot");

    let config = BridgeConfig::load(&args.config).expect("failed to load config");

    let ca_cert_pem = config
        .ca_cert_path
        .as_ref()
        .map(|path| std::fs::read(path).expect("failed to read trust anchor"));

    let signer = Arc::new(BearerSigner::new(config.access_token.clone()));

    let session = StreamSession::new(
        SessionConfig {
            stream_url: config.stream_url.clone(),
            user_agent: config.user_agent.clone(),
            self_user_id: config.self_user_id,
            ca_cert_pem,
            idle_timeout: config.idle_timeout(),
        },
        signer.clone(),
    )
    .expect("failed to build stream session");

    let api = Arc::new(HttpOutbound::new(
        OutboundConfig {
            publish_url: config.publish_url.clone(),
            notify_url: config.notify_url.clone(),
            user_agent: config.user_agent.clone(),
        },
        signer,
    ));

    let audit = Arc::new(SqliteAuditStore::new(config.audit_db_path.clone()));

    let pipeline = Pipeline::spawn(audit, api);

    let supervisor = ReconnectSupervisor::new(
        session,
        RetryConfig {
            max_attempts: config.max_attempts,
            interval: config.retry_interval(),
        },
    );

    tracing::info!(screen_name = %config.screen_name, "bridge running");
    supervisor.run(|event| pipeline.router.route(event)).await;

    // The supervisor only returns from its terminal state.
    tracing::error!("feed permanently lost, exiting");
    std::process::exit(1);
}
