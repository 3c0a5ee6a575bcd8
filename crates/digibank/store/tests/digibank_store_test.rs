use std::{collections::HashSet, str::FromStr, sync::Arc};

use digibank_domain::{
    AccountKind, AccountStatus, CheckingTerms, ClientId, PasswordHash, SavingsTerms,
    TransactionKind,
};
use digibank_store::{DigibankStore, DigibankStoreError, NewAccount, NewClient, NewTransaction};
use rust_decimal::Decimal;

async fn store() -> (tempfile::TempDir, DigibankStore) {
    let dir = tempfile::tempdir().unwrap();
    let store = DigibankStore::new(dir.path().join("data"));
    store.ensure_initialized().await.unwrap();
    (dir, store)
}

fn new_client(email: &str, national_id: &str) -> NewClient {
    NewClient::builder()
        .first_name("Ana")
        .last_name("Pérez")
        .national_id(national_id)
        .email(email)
        .password_hash(PasswordHash::new("$argon2id$placeholder"))
        .build()
}

fn checking(client_id: ClientId, balance: i64) -> NewAccount {
    NewAccount::builder()
        .client_id(client_id)
        .opening_balance(Decimal::from(balance))
        .kind(AccountKind::Checking(CheckingTerms::builder().build()))
        .build()
}

#[tokio::test]
async fn initialization_creates_empty_collections() {
    let (_dir, store) = store().await;

    for name in ["clients", "accounts", "transactions"] {
        let content = std::fs::read_to_string(store.data_dir().join(format!("{name}.json")))
            .unwrap();
        assert_eq!(serde_json::from_str::<Vec<serde_json::Value>>(&content).unwrap().len(), 0);
    }
}

#[tokio::test]
async fn client_ids_are_monotonic_and_duplicates_are_rejected() {
    let (_dir, store) = store().await;

    let first = store.create_client(new_client("a@example.com", "1")).await.unwrap();
    let second = store.create_client(new_client("b@example.com", "2")).await.unwrap();
    assert_eq!(first.id().get(), 1);
    assert_eq!(second.id().get(), 2);

    assert!(matches!(
        store.create_client(new_client("a@example.com", "3")).await,
        Err(DigibankStoreError::DuplicateEmail)
    ));
    assert!(matches!(
        store.create_client(new_client("c@example.com", "2")).await,
        Err(DigibankStoreError::DuplicateNationalId)
    ));

    let found = store.find_client_by_email("b@example.com").await.unwrap().unwrap();
    assert_eq!(found.id(), second.id());
    assert!(store.find_client_by_id(ClientId::from(9)).await.unwrap().is_none());
}

#[tokio::test]
async fn next_id_continues_after_the_largest_stored_id() {
    let (_dir, store) = store().await;

    std::fs::write(
        store.data_dir().join("accounts.json"),
        r#"[
            {"account_id": 3, "client_id": 1, "account_number": "1000000000000003",
             "account_type": "checking", "balance": 10, "opened_at": "2024-01-01T10:00:00+00:00",
             "status": "active"},
            {"account_id": 7, "client_id": 1, "account_number": "1000000000000007",
             "account_type": "savings", "balance": "20.50", "opened_at": "2024-01-01T10:00:00+00:00",
             "status": "active"}
        ]"#,
    )
    .unwrap();

    let account = store.create_account(checking(ClientId::from(1), 0)).await.unwrap();
    assert_eq!(account.id().get(), 8);

    let legacy = store
        .find_account_by_number(&"1000000000000007".parse().unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(legacy.balance(), Decimal::from_str("20.50").unwrap());
    let AccountKind::Savings(terms) = legacy.kind() else { panic!("expected savings") };
    assert_eq!(terms.interest_rate(), SavingsTerms::DEFAULT_INTEREST_RATE);
    assert_eq!(terms.withdrawal_limit(), SavingsTerms::DEFAULT_WITHDRAWAL_LIMIT);
}

#[tokio::test]
async fn corrupt_collection_reads_as_empty() {
    let (_dir, store) = store().await;

    std::fs::write(store.data_dir().join("transactions.json"), "{ not json").unwrap();

    assert!(store.all_transactions().await.unwrap().is_empty());
}

#[tokio::test]
async fn writes_fail_instead_of_replacing_a_corrupt_collection() {
    let (_dir, store) = store().await;
    let path = store.data_dir().join("accounts.json");
    std::fs::write(&path, "[{ not json").unwrap();

    assert!(matches!(
        store.create_account(checking(ClientId::from(1), 0)).await,
        Err(DigibankStoreError::Serialization(_))
    ));
    assert!(matches!(store.ledger().await, Err(DigibankStoreError::Serialization(_))));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "[{ not json");
}

#[tokio::test]
async fn unknown_account_statuses_are_preserved_across_writes() {
    let (_dir, store) = store().await;
    let path = store.data_dir().join("accounts.json");
    store.create_account(checking(ClientId::from(1), 10)).await.unwrap();
    let legacy = store.create_account(checking(ClientId::from(1), 20)).await.unwrap();

    let mut raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    raw[1]["status"] = "inactive".into();
    std::fs::write(&path, raw.to_string()).unwrap();

    store.create_account(checking(ClientId::from(1), 30)).await.unwrap();

    let accounts = store.accounts_by_client(ClientId::from(1)).await.unwrap();
    assert_eq!(accounts.len(), 3);
    let reloaded = accounts.iter().find(|a| a.id() == legacy.id()).unwrap();
    assert_eq!(*reloaded.status(), AccountStatus::Other("inactive".to_owned()));

    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(raw[1]["status"], "inactive");
}

#[tokio::test]
async fn generated_account_numbers_are_unique() {
    let (_dir, store) = store().await;

    let mut numbers = HashSet::new();
    for _ in 0..50 {
        let account = store.create_account(checking(ClientId::from(1), 0)).await.unwrap();
        assert_eq!(account.number().as_str().len(), 16);
        assert!(numbers.insert(account.number().clone()));
    }

    assert_eq!(store.accounts_by_client(ClientId::from(1)).await.unwrap().len(), 50);
}

#[tokio::test]
async fn dropped_ledger_persists_nothing() {
    let (_dir, store) = store().await;
    let account = store.create_account(checking(ClientId::from(1), 100)).await.unwrap();

    {
        let mut ledger = store.ledger().await.unwrap();
        ledger.account_mut(account.number()).unwrap().deposit(Decimal::from(50)).unwrap();
    }

    let reloaded = store.find_account_by_id(account.id()).await.unwrap().unwrap();
    assert_eq!(reloaded.balance(), Decimal::from(100));
    assert!(store.all_transactions().await.unwrap().is_empty());
}

#[tokio::test]
async fn committed_records_use_the_flat_file_layout() {
    let (_dir, store) = store().await;
    let account = store.create_account(checking(ClientId::from(1), 100)).await.unwrap();

    let mut ledger = store.ledger().await.unwrap();
    ledger.account_mut(account.number()).unwrap().deposit(Decimal::from(25)).unwrap();
    let tx = ledger
        .commit(
            NewTransaction::builder()
                .origin(account.number().clone())
                .kind(TransactionKind::Deposit)
                .amount(Decimal::from(25))
                .description("Deposit")
                .build(),
        )
        .await
        .unwrap();
    assert_eq!(tx.id().get(), 1);

    let raw: serde_json::Value = serde_json::from_str(
        &std::fs::read_to_string(store.data_dir().join("transactions.json")).unwrap(),
    )
    .unwrap();
    let entry = &raw[0];
    assert_eq!(entry["transaction_id"], 1);
    assert_eq!(entry["transaction_type"], "deposit");
    assert_eq!(entry["status"], "completed");
    assert_eq!(entry["origin_account_number"], account.number().as_str());
    assert!(entry["destination_account_number"].is_null());

    let raw: serde_json::Value = serde_json::from_str(
        &std::fs::read_to_string(store.data_dir().join("accounts.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(raw[0]["account_type"], "checking");
    assert_eq!(raw[0]["balance"], "125");
    assert_eq!(raw[0]["overdraft_limit"], "0");
}

#[tokio::test]
async fn failed_account_write_leaves_the_log_entry_behind() {
    let (_dir, store) = store().await;
    let account = store.create_account(checking(ClientId::from(1), 100)).await.unwrap();
    std::fs::create_dir(store.data_dir().join("accounts.json.tmp")).unwrap();

    let mut ledger = store.ledger().await.unwrap();
    ledger.account_mut(account.number()).unwrap().deposit(Decimal::from(25)).unwrap();
    let result = ledger
        .commit(
            NewTransaction::builder()
                .origin(account.number().clone())
                .kind(TransactionKind::Deposit)
                .amount(Decimal::from(25))
                .description("Deposit")
                .build(),
        )
        .await;
    assert!(matches!(result, Err(DigibankStoreError::Io(_))));

    assert_eq!(store.all_transactions().await.unwrap().len(), 1);
    let reloaded = store.find_account_by_id(account.id()).await.unwrap().unwrap();
    assert_eq!(reloaded.balance(), Decimal::from(100));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_deposits_lose_no_update() {
    let (_dir, store) = store().await;
    let store = Arc::new(store);
    let account = store.create_account(checking(ClientId::from(1), 0)).await.unwrap();

    let tasks: Vec<_> = (0..20)
        .map(|_| {
            let store = Arc::clone(&store);
            let number = account.number().clone();
            tokio::spawn(async move {
                let mut ledger = store.ledger().await.unwrap();
                ledger.account_mut(&number).unwrap().deposit(Decimal::ONE).unwrap();
                ledger
                    .commit(
                        NewTransaction::builder()
                            .origin(number)
                            .kind(TransactionKind::Deposit)
                            .amount(Decimal::ONE)
                            .description("Deposit")
                            .build(),
                    )
                    .await
                    .unwrap();
            })
        })
        .collect();

    for task in tasks {
        task.await.unwrap();
    }

    let reloaded = store.find_account_by_id(account.id()).await.unwrap().unwrap();
    assert_eq!(reloaded.balance(), Decimal::from(20));

    let ids: HashSet<u64> =
        store.all_transactions().await.unwrap().iter().map(|tx| tx.id().get()).collect();
    assert_eq!(ids, (1..=20).collect::<HashSet<u64>>());
}
