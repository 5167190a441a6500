//! Reference embedding of the ledger core
//!
//! Runs the canonical scenario end-to-end against RocksDB: seed two
//! public balances, perform a confidential move through the transient
//! channel, then query both sides. Each step is one transaction,
//! committed only on success, the way a host runtime would drive the
//! core.

use ledger_service::{LedgerService, Metrics};
use state_store::{Config, RocksStore, Transaction, TransientMap};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    tracing::info!("Starting confidential ledger demo");

    let config = Config::from_env()?;
    let store = Arc::new(RocksStore::open(&config)?);
    let service = LedgerService::new(Metrics::new()?);

    // Seed public balances
    let tx = Transaction::new(store.clone());
    let args: Vec<String> = ["alice", "100", "bob", "50"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    service.initialize(&tx, &args).await?;
    tx.commit()?;

    // Confidential move: parameters travel only through the
    // transient channel
    let tx = Transaction::new(store.clone());
    let transient: TransientMap = [
        ("collection", "orgA"),
        ("amount", "30"),
        ("fromAccount", "alice"),
        ("toAccount", "bob"),
    ]
    .into_iter()
    .collect();
    service.invoke(&tx, "move", &[], &transient).await?;
    tx.commit()?;

    // Query both sides
    for args in [vec!["alice".to_string()], vec!["bob".to_string(), "orgA".to_string()]] {
        let tx = Transaction::new(store.clone());
        let response = service
            .invoke(&tx, "query", &args, &TransientMap::new())
            .await?;
        tx.abort();

        let payload = response
            .payload()
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
            .unwrap_or_default();
        tracing::info!(account = %args[0], %payload, "Query answered");
    }

    tracing::info!("Demo complete");
    Ok(())
}
