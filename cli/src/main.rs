//! Interactive terminal front end for the QuickBill bill service.

mod command;
mod transport;
mod view;

use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use inquire::{error::InquireError, Confirm, Text};
use quickbill_core::{
    config::API_BASE_ENV, BillApi, BillClient, BillGateway, BillStore, GatewayConfig, Outcome,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::command::{Command, HELP};
use crate::transport::ReqwestTransport;

#[derive(Parser, Debug)]
#[command(name = "quickbill", version, about = "Manage bills against a QuickBill API")]
struct Cli {
    /// API host, e.g. http://localhost:8080/
    #[arg(long, env = API_BASE_ENV)]
    api_base: Option<String>,

    /// Per-request timeout in seconds (none by default)
    #[arg(long)]
    timeout_secs: Option<u64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = match cli.api_base.as_deref() {
        Some(base) if !base.trim().is_empty() => GatewayConfig::new(base.trim()),
        _ => GatewayConfig::from_env(),
    };
    let client = BillClient::from_config(&config);
    info!(endpoint = client.base_url(), "using bill API");

    let transport = ReqwestTransport::new(cli.timeout_secs.map(Duration::from_secs))
        .context("building HTTP client")?;
    let mut store = BillStore::new(BillGateway::new(client, transport));

    let mut loading = store.loading_updates();
    tokio::spawn(async move {
        while loading.changed().await.is_ok() {
            if *loading.borrow_and_update() {
                eprintln!("Loading...");
            }
        }
    });

    store.load().await;
    println!("{}", view::render(&store));

    loop {
        let line = match Text::new("quickbill>").with_help_message("type `help`").prompt() {
            Ok(line) => line,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(e) => return Err(e).context("reading command"),
        };

        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(msg) => {
                eprintln!("{msg}");
                continue;
            }
        };

        if !run(&mut store, command).await {
            break;
        }
    }
    Ok(())
}

/// Apply one command and redraw. Returns `false` when the user quits.
async fn run<A: BillApi>(store: &mut BillStore<A>, command: Command) -> bool {
    match command {
        Command::Set(field, value) => {
            if let Err(e) = store.set_field(field, &value) {
                eprintln!("{e}");
            }
        }
        Command::Add => {
            if let Err(e) = store.submit().await {
                eprintln!("{e}");
            }
        }
        Command::Search(term) => {
            if let Some(term) = term {
                store.set_search_term(&term);
            }
            store.search().await;
        }
        Command::Reset => {
            store.reset().await;
        }
        Command::Sort => {
            store.sort_by_date().await;
        }
        Command::Delete(id) => {
            let outcome = store.delete(&id, confirm).await;
            if outcome == Outcome::Skipped {
                println!("Kept bill {id}");
            }
        }
        Command::Reload => {
            store.load().await;
        }
        Command::Show => {}
        Command::Help => {
            println!("{HELP}");
            return true;
        }
        Command::Quit => return false,
    }
    println!("{}", view::render(store));
    true
}

/// Anything but an explicit yes keeps the bill.
fn confirm(prompt: &str) -> bool {
    Confirm::new(prompt)
        .with_default(false)
        .prompt()
        .unwrap_or(false)
}
