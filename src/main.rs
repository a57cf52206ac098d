use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};
use paydesk::harness::{Harness, HarnessConfig};
use paydesk::infrastructure::seed;
use paydesk::interfaces::http;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the customer directory (CRM) service
    Crm {
        #[arg(long, default_value_t = 5001)]
        port: u16,
    },
    /// Run the accounting (ERP) service
    Accounting {
        #[arg(long, default_value_t = 5002)]
        port: u16,
    },
    /// Run the email notification service
    Notifier {
        #[arg(long, default_value_t = 5003)]
        port: u16,
    },
    /// Run the cross-service scenario suite against live services
    Harness {
        #[arg(long, default_value = "http://localhost:5001")]
        crm_url: String,
        #[arg(long, default_value = "http://localhost:5002")]
        accounting_url: String,
        #[arg(long, default_value = "http://localhost:5003")]
        notifier_url: String,
    },
}

async fn serve(router: axum::Router, service: &'static str, port: u16) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
        .await
        .into_diagnostic()?;
    info!(service, port, "listening");
    axum::serve(listener, router).await.into_diagnostic()?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Crm { port } => {
            let directory = seed::seeded_directory().await.into_diagnostic()?;
            serve(http::crm::router(Arc::new(directory)), "crm", port).await
        }
        Command::Accounting { port } => {
            let accounting = seed::seeded_accounting().await.into_diagnostic()?;
            serve(
                http::accounting::router(Arc::new(accounting)),
                "accounting",
                port,
            )
            .await
        }
        Command::Notifier { port } => {
            let notifier = seed::seeded_notifier().await.into_diagnostic()?;
            serve(http::notifier::router(Arc::new(notifier)), "notifier", port).await
        }
        Command::Harness {
            crm_url,
            accounting_url,
            notifier_url,
        } => {
            let harness = Harness::new(HarnessConfig {
                crm_url,
                accounting_url,
                notifier_url,
            })
            .into_diagnostic()?;
            harness.check_health().await;
            let summary = harness.run_all().await;
            summary.print_report();
            if summary.failed() > 0 {
                miette::bail!("{} scenario(s) failed", summary.failed());
            }
            Ok(())
        }
    }
}
