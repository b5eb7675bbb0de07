#![warn(
    missing_debug_implementations,
    rust_2018_idioms,
    missing_docs,
    rustdoc::broken_intra_doc_links,
    rustdoc::missing_crate_level_docs
)]

//! REST API for course registrations

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use course_registration_mailer::{
    domain::{
        clock::SystemClock,
        communication::{email_addresses::EmailAddress, mailer::Mailer},
        registrations::RegistrationServiceImpl,
    },
    infrastructure::{
        email::smtp::{SmtpConfig, SmtpMailer},
        http::{HttpServer, HttpServerConfig},
    },
};
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Command-line arguments / environment variables
#[derive(Debug, Parser)]
#[command(version, about)]
pub struct Args {
    /// The HTTP server configuration
    #[clap(flatten)]
    pub server: HttpServerConfig,

    /// The SMTP transport configuration
    #[clap(flatten)]
    pub smtp: SmtpConfig,
}

#[mutants::skip]
#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer())
        .init();

    let args = Args::parse();

    let staff_mailbox =
        EmailAddress::new(&args.smtp.username).context("EMAIL_USER must be an email address")?;
    let mailer = SmtpMailer::new(&args.smtp).context("failed to configure SMTP transport")?;

    tokio::spawn(verify_mailer(mailer.clone()));

    let registrations =
        RegistrationServiceImpl::new(Arc::new(mailer), Arc::new(SystemClock), staff_mailbox);

    HttpServer::new(registrations, args.server).await?.run().await
}

/// Logs whether the mail server accepts our configuration. Never stops the server.
#[mutants::skip]
async fn verify_mailer(mailer: SmtpMailer) {
    match mailer.verify().await {
        Ok(()) => info!("Email server is ready to send messages"),
        Err(err) => error!(error = %err, "error with email configuration"),
    }
}
