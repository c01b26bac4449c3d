#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

//! CLI for snapshotting, comparing and resetting migration test mailboxes

use clap::{Parser, Subcommand};
use mailbox_verify::{
    AccountSnapshots, BulkEraser, EraseReport, ExpectedMailbox, GraphClient, GraphConfig,
    ItemKind, Snapshot,
};
use std::fmt::Display;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mailbox-verify")]
#[command(about = "Snapshot, compare and reset mailboxes used in migration tests")]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Print a snapshot of one account
    Snapshot {
        /// Environment prefix of the account (reads PREFIX_GRAPH_*)
        #[arg(long, default_value = "SOURCE")]
        account: String,

        /// Only this item kind (mail, events, contacts)
        #[arg(long)]
        kind: Option<ItemKind>,
    },

    /// Delete every item of an account
    Cleanup {
        /// Environment prefix of the account (reads PREFIX_GRAPH_*)
        #[arg(long, default_value = "DESTINATION")]
        account: String,

        /// Only this item kind (mail, events, contacts)
        #[arg(long)]
        kind: Option<ItemKind>,
    },

    /// Check that an account holds everything a fixture expects
    Check {
        /// Expected-mailbox JSON fixture
        fixture: PathBuf,

        /// Environment prefix of the account (reads PREFIX_GRAPH_*)
        #[arg(long, default_value = "SOURCE")]
        account: String,
    },

    /// Compare a source account against a destination account
    Compare {
        /// Environment prefix of the source account
        #[arg(long, default_value = "SOURCE")]
        source: String,

        /// Environment prefix of the destination account
        #[arg(long, default_value = "DESTINATION")]
        destination: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match &args.command {
        Command::Snapshot { account, kind } => {
            cmd_snapshot(&args, &client_for(account)?, *kind).await?;
        }
        Command::Cleanup { account, kind } => {
            cmd_cleanup(&args, &client_for(account)?, *kind).await?;
        }
        Command::Check { fixture, account } => {
            cmd_check(&client_for(account)?, fixture).await?;
        }
        Command::Compare {
            source,
            destination,
        } => {
            cmd_compare(&client_for(source)?, &client_for(destination)?).await?;
        }
    }

    Ok(())
}

fn client_for(prefix: &str) -> anyhow::Result<GraphClient> {
    let config = GraphConfig::from_env(prefix)?;
    Ok(GraphClient::new(config)?)
}

async fn cmd_snapshot(
    args: &Args,
    client: &GraphClient,
    kind: Option<ItemKind>,
) -> anyhow::Result<()> {
    let snapshots = AccountSnapshots::capture(client).await;

    let wanted = |k: ItemKind| kind.is_none_or(|only| only == k);
    if args.json {
        let mut out = serde_json::Map::new();
        if wanted(ItemKind::Mail) {
            out.insert("mails".into(), serde_json::to_value(&snapshots.mails)?);
        }
        if wanted(ItemKind::Event) {
            out.insert("events".into(), serde_json::to_value(&snapshots.events)?);
        }
        if wanted(ItemKind::Contact) {
            out.insert("contacts".into(), serde_json::to_value(&snapshots.contacts)?);
        }
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        if wanted(ItemKind::Mail) {
            print_snapshot(&snapshots.mails);
        }
        if wanted(ItemKind::Event) {
            print_snapshot(&snapshots.events);
        }
        if wanted(ItemKind::Contact) {
            print_snapshot(&snapshots.contacts);
        }
    }

    Ok(())
}

async fn cmd_cleanup(
    args: &Args,
    client: &GraphClient,
    kind: Option<ItemKind>,
) -> anyhow::Result<()> {
    let eraser = BulkEraser::new(client);
    let reports = match kind {
        Some(kind) => vec![eraser.erase(kind).await],
        None => eraser.erase_all().await,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        for report in &reports {
            print_erase_report(report);
        }
    }

    Ok(())
}

async fn cmd_check(client: &GraphClient, fixture: &Path) -> anyhow::Result<()> {
    let expected = ExpectedMailbox::load(fixture)?;
    let snapshots = AccountSnapshots::capture(client).await;
    snapshots.require_complete()?;
    snapshots.require_contains(&expected)?;

    println!(
        "{} holds all {} mail(s), {} event(s) and {} contact(s) from {}",
        snapshots.mails.account,
        expected.mails.len(),
        expected.events.len(),
        expected.contacts.len(),
        fixture.display()
    );
    Ok(())
}

async fn cmd_compare(source: &GraphClient, destination: &GraphClient) -> anyhow::Result<()> {
    let source_snapshots = AccountSnapshots::capture(source).await;
    source_snapshots.require_complete()?;
    let destination_snapshots = AccountSnapshots::capture(destination).await;
    destination_snapshots.require_complete()?;

    let failures = source_snapshots.equivalence_failures(&destination_snapshots);
    if failures.is_empty() {
        println!(
            "{} and {} are equivalent",
            source_snapshots.mails.account, destination_snapshots.mails.account
        );
        return Ok(());
    }

    for failure in &failures {
        println!("{failure}");
    }
    anyhow::bail!("{} equivalence check(s) failed", failures.len())
}

fn print_snapshot<T: Display>(snapshot: &Snapshot<T>) {
    println!(
        "{} of {} at {} ({} item(s), {} dropped{})",
        snapshot.kind,
        snapshot.account,
        snapshot.captured_at.format("%Y-%m-%d %H:%M:%S"),
        snapshot.len(),
        snapshot.dropped,
        if snapshot.is_complete() {
            ""
        } else {
            ", INCOMPLETE"
        }
    );
    println!("{}", "-".repeat(100));
    for item in &snapshot.items {
        println!("{}", truncate(&item.to_string(), 100));
    }
    println!();
}

fn print_erase_report(report: &EraseReport) {
    println!(
        "{:<10} deleted {}/{}",
        report.kind.to_string(),
        report.deleted,
        report.attempted
    );
    for failure in &report.failures {
        println!("  failed {}: {}", failure.id, failure.error);
    }
    if let Some(error) = &report.enumeration_error {
        println!("  enumeration stopped early: {error}");
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{truncated}...")
    }
}
