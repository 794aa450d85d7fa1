//! Integration tests for atm-core
//!
//! Real JSON data files in temp directories, driven through the session.
//!
//! Run with: cargo test --test integration_tests -- --nocapture

use std::sync::Arc;

use rust_decimal::Decimal;
use tempfile::TempDir;

use atm_core::adapters::json_file::JsonFileRepository;
use atm_core::services::{BackupService, DoctorService};
use atm_core::{AccountStore, AtmContext, Command, Error, Notice, Pin, Screen, Session};

// ============================================================================
// Test Helpers
// ============================================================================

fn open_session(temp_dir: &TempDir) -> Session {
    let path = temp_dir.path().join("users.json");
    let repo = JsonFileRepository::open(&path).expect("Failed to open repository");
    let store = AccountStore::load(Arc::new(repo)).expect("Failed to load store");
    Session::new(store)
}

fn pin(s: &str) -> Pin {
    Pin::parse(s).unwrap()
}

fn login_new(session: &mut Session, pin: &str) {
    session.handle(Command::SubmitPin(pin.to_string())).unwrap();
    session.handle(Command::Confirm(true)).unwrap();
}

// ============================================================================
// End-to-end scenarios
// ============================================================================

#[test]
fn test_create_deposit_withdraw_survives_restart() {
    let temp_dir = TempDir::new().unwrap();

    {
        let mut session = open_session(&temp_dir);
        login_new(&mut session, "1234");
        session.handle(Command::Deposit("500".into())).unwrap();
        session.handle(Command::Withdraw("200".into())).unwrap();
        session.handle(Command::Logout).unwrap();
    }

    let mut session = open_session(&temp_dir);
    assert_eq!(
        session.handle(Command::SubmitPin("1234".into())).unwrap(),
        Notice::LoggedIn { pin: "1234".into() }
    );
    assert_eq!(
        session.handle(Command::CheckBalance).unwrap(),
        Notice::Balance { balance: Decimal::new(300, 0) }
    );
    assert_eq!(
        session.handle(Command::ShowHistory).unwrap(),
        Notice::History {
            entries: vec!["Deposited 500".into(), "Withdrew 200".into()]
        }
    );
}

#[test]
fn test_every_mutation_is_written_immediately() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("users.json");
    let mut session = open_session(&temp_dir);

    let read = || -> serde_json::Value {
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap()
    };

    login_new(&mut session, "1234");
    assert_eq!(read()["1234"]["history"].as_array().unwrap().len(), 0);

    session.handle(Command::Deposit("75.25".into())).unwrap();
    assert_eq!(read()["1234"]["balance"].as_f64(), Some(75.25));

    session.handle(Command::ChangePin("4321".into())).unwrap();
    assert!(read().get("1234").is_none());
    assert_eq!(read()["4321"]["history"][0], "Deposited 75.25");

    session.handle(Command::DeleteAccount).unwrap();
    session.handle(Command::Confirm(true)).unwrap();
    assert_eq!(read(), serde_json::json!({}));
}

#[test]
fn test_rejected_operations_do_not_touch_the_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("users.json");
    let mut session = open_session(&temp_dir);

    login_new(&mut session, "1111");
    session.handle(Command::Deposit("10".into())).unwrap();
    let before = std::fs::read_to_string(&path).unwrap();

    assert!(matches!(
        session.handle(Command::Withdraw("11".into())),
        Err(Error::InsufficientFunds)
    ));
    assert!(matches!(
        session.handle(Command::Deposit("0".into())),
        Err(Error::InvalidAmount)
    ));
    assert!(matches!(
        session.handle(Command::ChangePin("1".into())),
        Err(Error::InvalidPin)
    ));

    assert_eq!(std::fs::read_to_string(&path).unwrap(), before);
    assert_eq!(session.screen(), &Screen::Dashboard(pin("1111")));
}

#[test]
fn test_round_trip_preserves_mapping() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("users.json");

    let original = {
        let mut session = open_session(&temp_dir);
        for (p, deposits) in [
            ("0001", vec!["5"]),
            ("4242", vec!["1.5", "2.25", "100"]),
            ("5555", vec!["1234567.123456789012345"]),
            ("7777", vec!["79228162514264337593543950335"]),
            ("9999", vec![]),
        ] {
            login_new(&mut session, p);
            for d in deposits {
                session.handle(Command::Deposit(d.into())).unwrap();
            }
            session.handle(Command::Logout).unwrap();
        }
        let store = session.into_store();
        store.save().unwrap();
        store.accounts().clone()
    };

    let repo = JsonFileRepository::open(&path).unwrap();
    let reloaded = AccountStore::load(Arc::new(repo)).unwrap();
    assert_eq!(reloaded.accounts(), &original);
    assert_eq!(reloaded.accounts()[&pin("4242")].balance, Decimal::new(10375, 2));

    let precise = &reloaded.accounts()[&pin("5555")];
    assert_eq!(precise.balance.to_string(), "1234567.123456789012345");
    assert_eq!(precise.history, vec!["Deposited 1234567.123456789012345"]);
    assert_eq!(reloaded.accounts()[&pin("7777")].balance, Decimal::MAX);
}

#[test]
fn test_deleted_account_offers_creation_after_restart() {
    let temp_dir = TempDir::new().unwrap();
    {
        let mut session = open_session(&temp_dir);
        login_new(&mut session, "5555");
        session.handle(Command::DeleteAccount).unwrap();
        session.handle(Command::Confirm(true)).unwrap();
    }

    let mut session = open_session(&temp_dir);
    assert_eq!(
        session.handle(Command::SubmitPin("5555".into())).unwrap(),
        Notice::CreatePrompt { pin: "5555".into() }
    );
}

// ============================================================================
// Context, backups and doctor
// ============================================================================

#[test]
fn test_context_locks_data_file() {
    let temp_dir = TempDir::new().unwrap();

    let ctx = AtmContext::new(temp_dir.path()).unwrap();
    assert!(ctx.store.is_empty());
    assert!(AtmContext::new(temp_dir.path()).is_err());

    drop(ctx);
    assert!(AtmContext::new(temp_dir.path()).is_ok());
}

#[test]
fn test_corrupt_data_file_is_fatal_but_diagnosable() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("users.json");
    std::fs::write(&path, r#"{"1234": {"balance": "lots"}}"#).unwrap();

    assert!(AtmContext::new(temp_dir.path()).is_err());

    let report = DoctorService::new(path).run_checks().unwrap();
    assert_eq!(report.checks["balances"].status, "error");
}

#[test]
fn test_backup_restores_previous_state() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("users.json");
    let backups = BackupService::new(temp_dir.path().to_path_buf(), path.clone());

    {
        let mut session = open_session(&temp_dir);
        login_new(&mut session, "1234");
        session.handle(Command::Deposit("50".into())).unwrap();
    }
    let backup = backups.create(Some(5)).unwrap();

    {
        let mut session = open_session(&temp_dir);
        session.handle(Command::SubmitPin("1234".into())).unwrap();
        session.handle(Command::Withdraw("50".into())).unwrap();
    }

    backups.restore(&backup.name).unwrap();

    let mut session = open_session(&temp_dir);
    session.handle(Command::SubmitPin("1234".into())).unwrap();
    assert_eq!(
        session.handle(Command::CheckBalance).unwrap(),
        Notice::Balance { balance: Decimal::new(50, 0) }
    );
}
