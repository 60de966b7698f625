use std::net::Ipv4Addr;
use std::sync::Arc;

use anyhow::Context as _;

use geobeacon::mail::{Mailer, SmtpMailer};
use geobeacon::{api_router, AppState, Config, EnvConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Arc::new(Config::from_env().context("could not load configuration")?);
    let port = config.port;

    if config.email_to.is_none() {
        tracing::warn!("EMAIL_TO not set, location reports will not be relayed");
    }

    let mailer: Option<Arc<dyn Mailer>> = match config.smtp_credentials() {
        Some(_) => {
            let mailer =
                SmtpMailer::from_config(&config).context("could not build SMTP transport")?;
            Some(Arc::new(mailer))
        }
        None => {
            tracing::warn!("EMAIL_USER/EMAIL_PASS not set, email notifications disabled");
            None
        }
    };

    let state = AppState { config, mailer };
    let routes = api_router(state);

    geobeacon::serve((Ipv4Addr::UNSPECIFIED, port), routes)
        .await
        .context("error running HTTP server")?;
    Ok(())
}
