use std::sync::Arc;

use anyhow::Context;

use assessment_wizard::assessment::AssessmentSession;
use assessment_wizard::config::{ServerConfig, SinkConfig};
use assessment_wizard::routes::assessment_routes;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let sink_config = SinkConfig::from_env().unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        eprintln!("  export ASSESSMENT_CRM_URL=https://crm.example.com/api/sync");
        std::process::exit(1);
    });
    let server_config = ServerConfig::from_env();

    eprintln!("📋 Assessment Wizard v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   CRM: {}", sink_config.crm_url);
    eprintln!(
        "   Documents: {}",
        sink_config.document_url.as_deref().unwrap_or("disabled")
    );
    eprintln!(
        "   Sink timeout: {}s ({:?} dispatch)",
        sink_config.timeout.as_secs(),
        sink_config.mode
    );
    eprintln!("   API: http://0.0.0.0:{}/api/assessment\n", server_config.port);

    let coordinator = sink_config.build_coordinator()?;
    let session = Arc::new(AssessmentSession::new(coordinator));
    let app = assessment_routes(session);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", server_config.port))
        .await
        .with_context(|| format!("Failed to bind port {}", server_config.port))?;
    tracing::info!(port = server_config.port, "Assessment server started");
    axum::serve(listener, app).await?;

    Ok(())
}
