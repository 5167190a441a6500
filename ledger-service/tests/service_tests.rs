//! End-to-end tests driving the dispatcher surface the way a host
//! runtime would: one transaction per invocation, committed on
//! success and aborted on failure.

use ledger_service::{Error, LedgerService, QueryResponse, Response, PRIVATE_BALANCE_NA};
use state_store::{CommitStore, Config, MemoryStore, RocksStore, Transaction, TransientMap};
use std::sync::Arc;

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

fn move_transient(collection: &str, amount: &str, from: &str, to: &str) -> TransientMap {
    [
        ("collection", collection),
        ("amount", amount),
        ("fromAccount", from),
        ("toAccount", to),
    ]
    .into_iter()
    .collect()
}

fn parse_query(response: &Response) -> QueryResponse {
    serde_json::from_slice(response.payload().expect("query carries a payload")).unwrap()
}

/// One committed invocation against the store
async fn run_committed<S, F, Fut>(store: &Arc<S>, f: F) -> ledger_service::Result<Response>
where
    S: CommitStore + 'static,
    F: FnOnce(LedgerService, Transaction) -> Fut,
    Fut: std::future::Future<Output = (Transaction, ledger_service::Result<Response>)>,
{
    let service = LedgerService::default();
    let tx = Transaction::new(store.clone() as Arc<dyn CommitStore>);

    let (tx, result) = f(service, tx).await;
    match result {
        Ok(response) => {
            tx.commit().unwrap();
            Ok(response)
        }
        Err(err) => {
            tx.abort();
            Err(err)
        }
    }
}

/// The worked scenario: init alice/bob, confidential move, queries.
async fn run_worked_example(store: Arc<dyn CommitStore>) {
    let service = LedgerService::default();

    let tx = Transaction::new(store.clone());
    service
        .initialize(&tx, &strings(&["alice", "100", "bob", "50"]))
        .await
        .unwrap();
    tx.commit().unwrap();

    let tx = Transaction::new(store.clone());
    service
        .invoke(&tx, "move", &[], &move_transient("orgA", "30", "alice", "bob"))
        .await
        .unwrap();
    tx.commit().unwrap();

    let tx = Transaction::new(store.clone());
    let alice = parse_query(
        &service
            .invoke(&tx, "query", &strings(&["alice"]), &TransientMap::new())
            .await
            .unwrap(),
    );
    assert_eq!(alice.name, "alice");
    assert_eq!(alice.balance, "70");
    assert_eq!(alice.private_balance, PRIVATE_BALANCE_NA);

    let bob = parse_query(
        &service
            .invoke(&tx, "query", &strings(&["bob", "orgA"]), &TransientMap::new())
            .await
            .unwrap(),
    );
    assert_eq!(bob.name, "bob");
    assert_eq!(bob.balance, "50");
    assert_eq!(bob.private_balance, "30");
}

#[tokio::test]
async fn worked_example_over_memory() {
    let store: Arc<dyn CommitStore> = Arc::new(MemoryStore::new());
    run_worked_example(store).await;
}

#[tokio::test]
async fn worked_example_over_rocksdb() {
    let temp_dir = tempfile::tempdir().unwrap();
    let mut config = Config::default();
    config.data_dir = temp_dir.path().to_path_buf();

    let store: Arc<dyn CommitStore> = Arc::new(RocksStore::open(&config).unwrap());
    run_worked_example(store).await;
}

#[tokio::test]
async fn failed_invocation_leaves_committed_state_unchanged() {
    let store = Arc::new(MemoryStore::new());

    run_committed(&store, |service, tx| async move {
        let result = service
            .initialize(&tx, &strings(&["alice", "100", "bob", "50"]))
            .await;
        (tx, result)
    })
    .await
    .unwrap();

    // Malformed move: missing toAccount. Aborted, so nothing changes.
    let transient: TransientMap = [
        ("collection", "orgA"),
        ("amount", "30"),
        ("fromAccount", "alice"),
    ]
    .into_iter()
    .collect();

    let err = run_committed(&store, |service, tx| async move {
        let result = service.invoke(&tx, "move", &[], &transient).await;
        (tx, result)
    })
    .await
    .unwrap_err();
    assert!(err.to_string().contains("toAccount"));

    let service = LedgerService::default();
    let tx = Transaction::new(store.clone() as Arc<dyn CommitStore>);
    let alice = parse_query(
        &service
            .invoke(&tx, "query", &strings(&["alice"]), &TransientMap::new())
            .await
            .unwrap(),
    );
    assert_eq!(alice.balance, "100");
}

#[tokio::test]
async fn transfer_parameters_never_reach_world_state() {
    let store = Arc::new(MemoryStore::new());
    let service = LedgerService::default();

    let tx = Transaction::new(store.clone() as Arc<dyn CommitStore>);
    service
        .initialize(&tx, &strings(&["alice", "100", "bob", "50"]))
        .await
        .unwrap();
    tx.commit().unwrap();

    let tx = Transaction::new(store.clone() as Arc<dyn CommitStore>);
    let response = service
        .invoke(
            &tx,
            "move",
            &[],
            &move_transient("secret-org", "30", "alice", "bob"),
        )
        .await
        .unwrap();
    tx.commit().unwrap();

    // Success payload is a bare confirmation
    assert_eq!(response.payload().unwrap(), "move succeed");

    // Public namespace: only the source account's key changed, and no
    // key or value leaks the collection, the amount, or the
    // destination's private holdings.
    let world = store.world_entries();
    assert_eq!(world.len(), 2);
    for (key, value) in &world {
        let value = String::from_utf8_lossy(value);
        assert!(!key.contains("secret-org"));
        assert!(!value.contains("secret-org"));
        assert_ne!(value, "30");
    }

    let alice = world.iter().find(|(k, _)| k == "alice").unwrap();
    assert_eq!(alice.1, b"70");
    let bob = world.iter().find(|(k, _)| k == "bob").unwrap();
    assert_eq!(bob.1, b"50");
}

#[tokio::test]
async fn query_fails_for_account_with_only_private_balance() {
    let store = Arc::new(MemoryStore::new());
    let service = LedgerService::default();

    let tx = Transaction::new(store.clone() as Arc<dyn CommitStore>);
    service
        .initialize(&tx, &strings(&["alice", "100", "bob", "50"]))
        .await
        .unwrap();
    tx.commit().unwrap();

    // carol receives privately but was never publicly initialized
    let tx = Transaction::new(store.clone() as Arc<dyn CommitStore>);
    service
        .invoke(&tx, "move", &[], &move_transient("orgA", "10", "alice", "carol"))
        .await
        .unwrap();
    tx.commit().unwrap();

    let tx = Transaction::new(store.clone() as Arc<dyn CommitStore>);
    let err = service
        .invoke(&tx, "query", &strings(&["carol", "orgA"]), &TransientMap::new())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::AccountNotFound(_)));
}

#[tokio::test]
async fn collections_are_independent() {
    let store = Arc::new(MemoryStore::new());
    let service = LedgerService::default();

    let tx = Transaction::new(store.clone() as Arc<dyn CommitStore>);
    service
        .initialize(&tx, &strings(&["alice", "100", "bob", "50"]))
        .await
        .unwrap();
    tx.commit().unwrap();

    for (collection, amount) in [("orgA", "30"), ("orgB", "5")] {
        let tx = Transaction::new(store.clone() as Arc<dyn CommitStore>);
        service
            .invoke(&tx, "move", &[], &move_transient(collection, amount, "alice", "bob"))
            .await
            .unwrap();
        tx.commit().unwrap();
    }

    let tx = Transaction::new(store.clone() as Arc<dyn CommitStore>);
    let in_a = parse_query(
        &service
            .invoke(&tx, "query", &strings(&["bob", "orgA"]), &TransientMap::new())
            .await
            .unwrap(),
    );
    let in_b = parse_query(
        &service
            .invoke(&tx, "query", &strings(&["bob", "orgB"]), &TransientMap::new())
            .await
            .unwrap(),
    );

    assert_eq!(in_a.private_balance, "30");
    assert_eq!(in_b.private_balance, "5");
    // Public balance reflects both transfers
    assert_eq!(in_a.balance, "50");
}

#[tokio::test]
async fn metrics_count_invocations_and_failures() {
    let store = Arc::new(MemoryStore::new());
    let service = LedgerService::default();

    let tx = Transaction::new(store.clone() as Arc<dyn CommitStore>);
    service
        .initialize(&tx, &strings(&["alice", "100", "bob", "50"]))
        .await
        .unwrap();
    tx.commit().unwrap();

    let tx = Transaction::new(store.clone() as Arc<dyn CommitStore>);
    service
        .invoke(&tx, "query", &strings(&["alice"]), &TransientMap::new())
        .await
        .unwrap();
    service
        .invoke(&tx, "query", &strings(&["nobody"]), &TransientMap::new())
        .await
        .unwrap_err();
    service
        .invoke(&tx, "mint", &[], &TransientMap::new())
        .await
        .unwrap_err();

    assert_eq!(service.metrics().invocations("init"), 1);
    assert_eq!(service.metrics().invocations("query"), 2);
    assert_eq!(service.metrics().failures("query"), 1);
    assert_eq!(service.metrics().failures("mint"), 1);
}

#[tokio::test]
async fn read_your_writes_within_one_invocation() {
    let store = Arc::new(MemoryStore::new());
    let service = LedgerService::default();

    let tx = Transaction::new(store.clone() as Arc<dyn CommitStore>);
    service
        .initialize(&tx, &strings(&["alice", "100", "bob", "50"]))
        .await
        .unwrap();

    // Same transaction: the query sees the uncommitted writes
    let alice = parse_query(
        &service
            .invoke(&tx, "query", &strings(&["alice"]), &TransientMap::new())
            .await
            .unwrap(),
    );
    assert_eq!(alice.balance, "100");

    // Committed store is still empty
    assert!(store.is_empty());
}
