//! # Wire Dispatch
//!
//! Routing and error rendering as a submitter sees them: status, error
//! code prefix and message text.

#[cfg(test)]
mod tests {
    use crate::instantiated_host;
    use bc_chaincode::response::{BAD_REQUEST, OK};
    use bc_chaincode::Action;

    #[test]
    fn test_only_invoke_is_routed() {
        let mut host = instantiated_host();
        for function in ["query", "Invoke", "", "init"] {
            let response = host.invoke(function, &["queryAgency"]);
            assert_eq!(response.status, BAD_REQUEST);
            assert!(response.message.contains("Unknown function call"), "{function}");
        }
    }

    #[test]
    fn test_unknown_and_missing_actions() {
        let mut host = instantiated_host();
        let response = host.invoke("invoke", &["burnCoin", "1"]);
        assert_eq!(response.error_code(), Some("INVALID_ARGUMENT"));
        assert!(response.message.contains("Unknown action"));

        let none: [&str; 0] = [];
        let response = host.invoke("invoke", &none);
        assert!(response.message.contains("Unknown action"));
    }

    #[test]
    fn test_every_action_checks_arity() {
        let mut host = instantiated_host();
        for action in Action::ALL {
            let mut args = vec![action.name().to_string()];
            args.extend((0..=action.arity()).map(|i| format!("p{i}")));
            let response = host.invoke("invoke", &args);
            assert_eq!(response.status, BAD_REQUEST, "{action} accepted extra args");
            assert!(response.message.contains("Incorrect number of arguments"));
        }
    }

    #[test]
    fn test_error_codes_by_failure() {
        let mut host = instantiated_host();
        assert_eq!(host.invoke("invoke", &["createOrg", "o", "O"]).status, OK);

        let cases: [(&[&str], &str); 6] = [
            (&["queryOrg", "missing"], "NOT_FOUND"),
            (&["createOrg", "o", "O"], "DUPLICATE_KEY"),
            (&["transfer", "o", "Agency", "5"], "INSUFFICIENT_CREDIT"),
            (&["issueCoin", "0"], "INVALID_ARGUMENT"),
            (&["queryRecord", "byPhone", "1"], "INVALID_ARGUMENT"),
            (&["deleteRecord", "nope"], "NOT_FOUND"),
        ];
        for (args, code) in cases {
            let response = host.invoke("invoke", args);
            assert_eq!(response.status, BAD_REQUEST, "{args:?}");
            assert_eq!(response.error_code(), Some(code), "{args:?}");
            assert!(response.payload.is_empty());
        }
    }

    #[test]
    fn test_read_only_actions_write_nothing() {
        let mut host = instantiated_host();
        let before = host.stats();
        for args in [
            vec!["queryAgency"],
            vec!["queryRecord", "byClientName", "x"],
        ] {
            assert!(host.invoke("invoke", &args).is_ok());
            assert_eq!(host.ledger().pending_writes(), 0);
        }
        assert_eq!(host.stats().committed, before.committed);
        assert_eq!(host.stats().queries, before.queries + 2);
        assert!(Action::QueryRecord.is_read_only());
    }
}
