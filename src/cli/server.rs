use std::sync::Arc;

use anyhow::Result;
use portfolio_contact::Envelope;
use portfolio_notification::{EmailService, Mailer};
use tower_http::trace::TraceLayer;

use crate::routes::AppState;

pub async fn serve(
    config: crate::config::Config,
    host_override: Option<String>,
    port_override: Option<u16>,
) -> Result<()> {
    tracing::info!("Starting portfolio contact relay...");

    // Use CLI overrides if provided, otherwise use config
    let host = host_override.unwrap_or(config.server.host.to_owned());
    let port = port_override.unwrap_or(config.server.port);

    // One pooled transport shared by every request
    let email_service = EmailService::new(&config.mail)?;
    match email_service.verify().await {
        Ok(true) => tracing::info!("SMTP server reachable"),
        Ok(false) => tracing::warn!(
            smtp_host = %config.mail.smtp_host,
            "SMTP server rejected test connection, sends will be attempted per request"
        ),
        Err(e) => tracing::warn!(
            smtp_host = %config.mail.smtp_host,
            error = %e,
            "SMTP server not reachable at startup, sends will be attempted per request"
        ),
    }

    let envelope = Envelope::from(&config.mail);
    tracing::info!(to = %envelope.to, "Contact submissions will be relayed");

    let mailer: Arc<dyn Mailer> = Arc::new(email_service);
    let state = AppState {
        config,
        contact_command: portfolio_contact::Command::new(mailer, envelope),
    };

    let app = crate::routes::router(state).layer(TraceLayer::new_for_http());

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Graceful shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal");
        },
    }

    tracing::info!("Starting graceful shutdown...");
}
