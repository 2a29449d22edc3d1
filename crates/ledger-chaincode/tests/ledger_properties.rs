//! Property tests for the ledger invariants.

use ledger_chaincode::prelude::*;
use proptest::prelude::*;

fn seeded_peer(a: i64, b: i64) -> MockPeer {
    let peer = MockPeer::default();
    peer.state().insert("alice", a.to_string().into_bytes());
    peer.state().insert("bob", b.to_string().into_bytes());
    peer
}

fn balance(peer: &MockPeer, key: &str) -> i64 {
    let bytes = peer.state().get(key).unwrap();
    String::from_utf8(bytes).unwrap().parse().unwrap()
}

proptest! {
    #[test]
    fn test_transfer_conserves_sum(
        a in -1_000_000i64..1_000_000,
        b in -1_000_000i64..1_000_000,
        amount in -1_000_000i64..1_000_000,
    ) {
        prop_assume!(amount != 0);
        let peer = seeded_peer(a, b);

        let resp = peer.invoke("move", &["x", "alice", "bob", &amount.to_string()]);

        prop_assert!(resp.is_ok());
        prop_assert_eq!(balance(&peer, "alice") + balance(&peer, "bob"), a + b);
        prop_assert_eq!(resp.payload_text(), (a + amount).to_string());
    }

    #[test]
    fn test_debit_above_balance_rejected(
        usable in 0i64..1_000_000,
        excess in 1i64..1_000_000,
    ) {
        let peer = MockPeer::default();
        peer.invoke("initMoneyAccount", &["org", "u", "in", &usable.to_string()]);
        let key = AccountKey::derive("org", "u");
        let before = peer.state().get(key.as_str());

        let debit = (usable + excess).to_string();
        let resp = peer.invoke("initMoneyAccount", &["org", "u", "out", &debit]);

        prop_assert!(!resp.is_ok());
        prop_assert_eq!(peer.state().get(key.as_str()), before);
    }

    #[test]
    fn test_debit_within_balance_never_negative(
        usable in 0i64..1_000_000,
        debit in 0i64..1_000_000,
    ) {
        prop_assume!(debit <= usable);
        let peer = MockPeer::default();
        peer.invoke("initMoneyAccount", &["org", "u", "in", &usable.to_string()]);

        let resp = peer.invoke("initMoneyAccount", &["org", "u", "out", &debit.to_string()]);

        prop_assert!(resp.is_ok());
        let query = peer.invoke("queryMoneyAccount", &["org", "u"]);
        let account: MoneyAccount = serde_json::from_slice(&query.payload).unwrap();
        prop_assert_eq!(account.usable_money, usable - debit);
        prop_assert!(account.usable_money >= 0);
    }

    #[test]
    fn test_account_keys_injective(
        org_a in "[a-zA-Z0-9:~]{0,8}",
        user_a in "[a-zA-Z0-9:~]{0,8}",
        org_b in "[a-zA-Z0-9:~]{0,8}",
        user_b in "[a-zA-Z0-9:~]{0,8}",
    ) {
        let same_pair = org_a == org_b && user_a == user_b;
        let same_key = AccountKey::derive(&org_a, &user_a) == AccountKey::derive(&org_b, &user_b);
        prop_assert_eq!(same_pair, same_key);
    }
}
