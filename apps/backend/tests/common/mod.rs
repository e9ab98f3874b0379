#![allow(dead_code)]

// tests/common/mod.rs
use milsim_backend::db::txn_policy::{set_txn_policy, TxnPolicy};

// Logging is auto-installed for every test binary
#[ctor::ctor]
fn init_logging() {
    backend_test_support::logging::init();
}

// Policy defaults to rollback but can be flipped per-binary via `MILSIM_TXN_POLICY=commit`.
#[ctor::ctor]
fn init_txn_policy() {
    let policy = match std::env::var("MILSIM_TXN_POLICY")
        .unwrap_or_default()
        .to_lowercase()
        .as_str()
    {
        "commit" => TxnPolicy::CommitOnOk,
        _ => TxnPolicy::RollbackOnOk,
    };

    set_txn_policy(policy);
}
