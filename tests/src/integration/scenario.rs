//! # Registry and Credit Scenario
//!
//! The full lifecycle: instantiate, onboard an org, mint and move credit,
//! record, find and delete a blacklist entry.

#[cfg(test)]
mod tests {
    use crate::{fixed_time, instantiated_host, payload};
    use bc_chaincode::domain::services::org_address;
    use bc_chaincode::prelude::*;
    use serde_json::Value;

    // =========================================================================
    // TEST FIXTURES
    // =========================================================================

    fn invoke(host: &mut ChaincodeHost, tx: &str, minute: i64, args: &[&str]) -> Response {
        host.invoke_with(tx, fixed_time(minute), "invoke", args)
    }

    fn agency(host: &mut ChaincodeHost) -> Agency {
        payload(&host.invoke("invoke", &["queryAgency"]))
    }

    fn org(host: &mut ChaincodeHost, id: &str) -> Org {
        payload(&host.invoke("invoke", &["queryOrg", id]))
    }

    // =========================================================================
    // END-TO-END
    // =========================================================================

    #[test]
    fn test_reference_scenario() {
        let mut host = instantiated_host();
        assert_eq!(agency(&mut host).credit, 100_000_000);

        assert!(invoke(&mut host, "tx-1", 1, &["createOrg", "org1", "OrgOne"]).is_ok());
        let org1 = org(&mut host, "org1");
        assert_eq!(org1.org_credit, 0);
        assert_eq!(org1.org_addr, org_address("org1"));

        assert!(invoke(&mut host, "tx-2", 2, &["issueCoin", "5000"]).is_ok());
        assert_eq!(agency(&mut host).credit, 100_005_000);

        assert!(invoke(&mut host, "tx-3", 3, &["transfer", "Agency", "org1", "2000"]).is_ok());
        let after = agency(&mut host);
        assert_eq!(after.credit, 100_003_000);
        assert_eq!(after.issue_credit, 100_005_000);
        assert_eq!(org(&mut host, "org1").org_credit, 2000);

        let tx: Transaction = payload(&host.invoke("invoke", &["queryTransaction", "tx-3"]));
        assert_eq!((tx.from.as_str(), tx.to.as_str(), tx.credit), ("Agency", "org1", 2000));

        assert!(invoke(
            &mut host,
            "tx-4",
            4,
            &["submitRecord", "org1", "rec1", "clientA", "Alice", "1", "3", "late payment"]
        )
        .is_ok());

        let found: Vec<BlackRecord> =
            payload(&host.invoke("invoke", &["queryRecord", "byClientId", "clientA"]));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].record_id, "rec1");
        assert_eq!(found[0].org_addr, org_address("org1"));
        assert_eq!(found[0].negative_info, "late payment");

        assert!(invoke(&mut host, "tx-5", 5, &["deleteRecord", "rec1"]).is_ok());
        let found: Vec<Value> =
            payload(&host.invoke("invoke", &["queryRecord", "byClientId", "clientA"]));
        assert!(found.is_empty());
    }

    #[test]
    fn test_timestamps_follow_proposal_time() {
        let mut host = instantiated_host();
        assert!(invoke(&mut host, "tx-1", 90, &["createOrg", "org1", "OrgOne"]).is_ok());
        assert!(invoke(&mut host, "tx-2", 150, &["transfer", "Agency", "org1", "1"]).is_ok());

        let org1 = org(&mut host, "org1");
        assert_eq!(org1.create_time, "2018-06-01 09:30:00");
        assert_eq!(org1.update_time, "2018-06-01 10:30:00");
    }

    #[test]
    fn test_records_grouped_by_client_name() {
        let mut host = instantiated_host();
        assert!(invoke(&mut host, "tx-1", 1, &["createOrg", "org1", "OrgOne"]).is_ok());
        assert!(invoke(&mut host, "tx-2", 1, &["createOrg", "org2", "OrgTwo"]).is_ok());
        for (tx, org_id, record, client, name) in [
            ("tx-3", "org1", "rec1", "c1", "Alice"),
            ("tx-4", "org2", "rec2", "c2", "Alice"),
            ("tx-5", "org2", "rec3", "c3", "Bob"),
        ] {
            let args = ["submitRecord", org_id, record, client, name, "2", "1", ""];
            assert!(invoke(&mut host, tx, 2, &args).is_ok());
        }

        let alices: Vec<BlackRecord> =
            payload(&host.invoke("invoke", &["queryRecord", "byClientName", "Alice"]));
        let mut ids: Vec<_> = alices.iter().map(|r| r.record_id.as_str()).collect();
        ids.sort_unstable();
        assert_eq!(ids, vec!["rec1", "rec2"]);
        assert_eq!(alices.iter().filter(|r| r.org_addr == org_address("org2")).count(), 1);
    }

    #[test]
    fn test_hostile_query_value_matches_literally() {
        let mut host = instantiated_host();
        assert!(invoke(&mut host, "tx-1", 1, &["createOrg", "org1", "OrgOne"]).is_ok());
        assert!(invoke(
            &mut host,
            "tx-2",
            1,
            &["submitRecord", "org1", "rec1", "clientA", "Alice", "1", "1", "x"]
        )
        .is_ok());

        let hostile = r#"x","docType":{"$ne":null},"clientId":"clientA"#;
        let response = host.invoke("invoke", &["queryRecord", "byClientId", hostile]);
        let found: Vec<Value> = payload(&response);
        assert!(found.is_empty());
    }

    // =========================================================================
    // ATOMICITY
    // =========================================================================

    #[test]
    fn test_failed_invocations_leave_state_untouched() {
        let mut host = instantiated_host();
        assert!(invoke(&mut host, "tx-1", 1, &["createOrg", "org1", "OrgOne"]).is_ok());
        let before_agency = agency(&mut host);
        let before_org = org(&mut host, "org1");

        for (tx, args) in [
            ("tx-2", vec!["transfer", "org1", "Agency", "1"]),
            ("tx-3", vec!["transfer", "Agency", "nobody", "1"]),
            ("tx-4", vec!["issueCoin", "-5"]),
            ("tx-5", vec!["createOrg", "org1", "Clone"]),
            ("tx-6", vec!["submitRecord", "ghost", "r", "c", "n", "1", "1", "i"]),
        ] {
            assert!(!invoke(&mut host, tx, 2, &args).is_ok(), "{args:?} should fail");
            assert!(
                !host.invoke("invoke", &["queryTransaction", tx]).is_ok(),
                "{tx} left a transaction behind"
            );
        }

        assert_eq!(agency(&mut host), before_agency);
        assert_eq!(org(&mut host, "org1"), before_org);
        assert_eq!(host.ledger().committed_keys("BlackRecord:").unwrap().len(), 0);
    }

    #[test]
    fn test_storage_outage_rolls_back_issue() {
        let mut host = instantiated_host();
        host.ledger().fail_writes(true);
        let response = invoke(&mut host, "tx-1", 1, &["issueCoin", "10"]);
        host.ledger().fail_writes(false);

        assert_eq!(response.status, bc_chaincode::response::ERROR);
        assert_eq!(response.error_code(), Some("STORAGE"));
        assert_eq!(agency(&mut host).issue_credit, 100_000_000);
        assert!(host.ledger().committed_keys("Transaction:").unwrap().is_empty());
    }

    #[test]
    fn test_reinit_keeps_balances() {
        let mut host = instantiated_host();
        assert!(invoke(&mut host, "tx-1", 1, &["issueCoin", "77"]).is_ok());
        assert!(host.instantiate().is_ok());
        assert_eq!(agency(&mut host).credit, 100_000_077);
    }
}
