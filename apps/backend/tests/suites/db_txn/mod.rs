mod with_txn;
