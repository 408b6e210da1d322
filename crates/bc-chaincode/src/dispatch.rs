//! # Dispatcher
//!
//! Turns a wire invocation `(function, args)` into a typed [`Invocation`].
//!
//! Only `function == "invoke"` is routed. `args[0]` names the action; the
//! registered [`Action`] table fixes each action's parameter count, and
//! every parameter is converted to its typed form here, before any contract
//! logic runs.

use crate::domain::value_objects::{
    parse_code, CreditAmount, QueryMode, RecordQuery, RecordSubmission,
};
use crate::errors::ChaincodeError;
use std::fmt;
use std::str::FromStr;

/// The only routed function name.
pub const INVOKE_FUNCTION: &str = "invoke";

// =============================================================================
// ACTION TABLE
// =============================================================================

/// Routable contract actions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    CreateOrg,
    SubmitRecord,
    DeleteRecord,
    QueryRecord,
    QueryOrg,
    QueryAgency,
    IssueCoin,
    Transfer,
    QueryTransaction,
}

impl Action {
    /// Every routable action.
    pub const ALL: [Action; 9] = [
        Action::CreateOrg,
        Action::SubmitRecord,
        Action::DeleteRecord,
        Action::QueryRecord,
        Action::QueryOrg,
        Action::QueryAgency,
        Action::IssueCoin,
        Action::Transfer,
        Action::QueryTransaction,
    ];

    /// Wire name, as passed in `args[0]`.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::CreateOrg => "createOrg",
            Self::SubmitRecord => "submitRecord",
            Self::DeleteRecord => "deleteRecord",
            Self::QueryRecord => "queryRecord",
            Self::QueryOrg => "queryOrg",
            Self::QueryAgency => "queryAgency",
            Self::IssueCoin => "issueCoin",
            Self::Transfer => "transfer",
            Self::QueryTransaction => "queryTransaction",
        }
    }

    /// Number of parameters after the action name.
    #[must_use]
    pub const fn arity(self) -> usize {
        match self {
            Self::QueryAgency => 0,
            Self::DeleteRecord | Self::QueryOrg | Self::IssueCoin | Self::QueryTransaction => 1,
            Self::CreateOrg | Self::QueryRecord => 2,
            Self::Transfer => 3,
            Self::SubmitRecord => 7,
        }
    }

    /// True for actions that never write state.
    #[must_use]
    pub const fn is_read_only(self) -> bool {
        matches!(
            self,
            Self::QueryRecord | Self::QueryOrg | Self::QueryAgency | Self::QueryTransaction
        )
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Action {
    type Err = ChaincodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|action| action.name() == s)
            .ok_or_else(|| {
                ChaincodeError::invalid(format!("Unknown action, check the first argument: {s}"))
            })
    }
}

// =============================================================================
// TYPED INVOCATION
// =============================================================================

/// A fully parsed contract call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Invocation {
    CreateOrg { org_id: String, org_name: String },
    SubmitRecord(RecordSubmission),
    DeleteRecord { record_id: String },
    QueryRecord(RecordQuery),
    QueryOrg { org_id: String },
    QueryAgency,
    IssueCoin { amount: CreditAmount },
    Transfer { from_id: String, to_id: String, amount: CreditAmount },
    QueryTransaction { tx_id: String },
}

impl Invocation {
    /// Parses a wire invocation.
    pub fn parse<S: AsRef<str>>(function: &str, args: &[S]) -> Result<Self, ChaincodeError> {
        if function != INVOKE_FUNCTION {
            return Err(ChaincodeError::invalid(format!(
                "Unknown function call: {function}"
            )));
        }
        let Some((name, params)) = args.split_first() else {
            return Err(ChaincodeError::invalid(
                "Unknown action, missing the first argument",
            ));
        };
        let action: Action = name.as_ref().parse()?;
        if params.len() != action.arity() {
            return Err(ChaincodeError::invalid(format!(
                "Incorrect number of arguments for {action}: expecting {}, got {}",
                action.arity(),
                params.len()
            )));
        }

        let p = |i: usize| params[i].as_ref();
        let owned = |i: usize| p(i).to_string();

        Ok(match action {
            Action::CreateOrg => Self::CreateOrg {
                org_id: owned(0),
                org_name: owned(1),
            },
            Action::SubmitRecord => Self::SubmitRecord(RecordSubmission {
                org_id: owned(0),
                record_id: owned(1),
                client_id: owned(2),
                client_name: owned(3),
                negative_type: parse_code("negativeType", p(4))?,
                negative_severity: parse_code("negativeSeverity", p(5))?,
                negative_info: owned(6),
            }),
            Action::DeleteRecord => Self::DeleteRecord { record_id: owned(0) },
            Action::QueryRecord => {
                let mode: QueryMode = p(0).parse()?;
                Self::QueryRecord(RecordQuery::new(mode, p(1))?)
            }
            Action::QueryOrg => Self::QueryOrg { org_id: owned(0) },
            Action::QueryAgency => Self::QueryAgency,
            Action::IssueCoin => Self::IssueCoin {
                amount: p(0).parse()?,
            },
            Action::Transfer => Self::Transfer {
                from_id: owned(0),
                to_id: owned(1),
                amount: p(2).parse()?,
            },
            Action::QueryTransaction => Self::QueryTransaction { tx_id: owned(0) },
        })
    }

    /// The action this invocation routes to.
    #[must_use]
    pub fn action(&self) -> Action {
        match self {
            Self::CreateOrg { .. } => Action::CreateOrg,
            Self::SubmitRecord(_) => Action::SubmitRecord,
            Self::DeleteRecord { .. } => Action::DeleteRecord,
            Self::QueryRecord(_) => Action::QueryRecord,
            Self::QueryOrg { .. } => Action::QueryOrg,
            Self::QueryAgency => Action::QueryAgency,
            Self::IssueCoin { .. } => Action::IssueCoin,
            Self::Transfer { .. } => Action::Transfer,
            Self::QueryTransaction { .. } => Action::QueryTransaction,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Invocation, ChaincodeError> {
        Invocation::parse(INVOKE_FUNCTION, args)
    }

    #[test]
    fn test_unknown_function() {
        let err = Invocation::parse("query", &["queryAgency"]).unwrap_err();
        assert!(err.to_string().contains("Unknown function call"));
    }

    #[test]
    fn test_unknown_action() {
        let err = parse(&["mintEverything"]).unwrap_err();
        assert!(err.to_string().contains("Unknown action"));

        let err = parse(&[]).unwrap_err();
        assert!(err.to_string().contains("Unknown action"));
    }

    #[test]
    fn test_action_names_round_trip() {
        for action in Action::ALL {
            assert_eq!(action.name().parse::<Action>().unwrap(), action);
        }
    }

    #[test]
    fn test_arity_enforced() {
        let err = parse(&["createOrg", "org1"]).unwrap_err();
        assert!(matches!(err, ChaincodeError::InvalidArgument(_)));
        assert!(err.to_string().contains("expecting 2, got 1"));

        assert!(parse(&["queryAgency", "extra"]).is_err());
        assert!(parse(&["transfer", "Agency", "org1"]).is_err());
    }

    #[test]
    fn test_parse_submit_record() {
        let invocation = parse(&[
            "submitRecord",
            "org1",
            "rec1",
            "clientA",
            "Alice",
            "1",
            "3",
            "late payment",
        ])
        .unwrap();
        let Invocation::SubmitRecord(submission) = invocation else {
            panic!("Expected SubmitRecord");
        };
        assert_eq!(submission.record_id, "rec1");
        assert_eq!(submission.negative_type, 1);
        assert_eq!(submission.negative_severity, 3);
    }

    #[test]
    fn test_parse_submit_record_bad_code() {
        let err = parse(&["submitRecord", "org1", "rec1", "c", "n", "x", "3", "i"]).unwrap_err();
        assert!(err.to_string().contains("negativeType"));
    }

    #[test]
    fn test_parse_query_record() {
        let invocation = parse(&["queryRecord", "byClientName", "Alice"]).unwrap();
        assert_eq!(
            invocation,
            Invocation::QueryRecord(RecordQuery::new(QueryMode::ByClientName, "Alice").unwrap())
        );
        assert!(parse(&["queryRecord", "byPhone", "1"]).is_err());
        assert!(parse(&["queryRecord", "byClientId", ""]).is_err());
    }

    #[test]
    fn test_parse_amounts() {
        assert_eq!(
            parse(&["issueCoin", "5000"]).unwrap(),
            Invocation::IssueCoin {
                amount: CreditAmount::new(5000).unwrap()
            }
        );
        assert!(parse(&["issueCoin", "0"]).is_err());
        assert!(parse(&["transfer", "Agency", "org1", "-3"]).is_err());
    }

    #[test]
    fn test_invocation_action() {
        assert_eq!(parse(&["queryAgency"]).unwrap().action(), Action::QueryAgency);
        assert!(Action::QueryAgency.is_read_only());
        assert!(!Action::Transfer.is_read_only());
    }

    #[test]
    fn test_accepts_owned_strings() {
        let args = vec!["queryOrg".to_string(), "org1".to_string()];
        assert_eq!(
            Invocation::parse(INVOKE_FUNCTION, &args).unwrap(),
            Invocation::QueryOrg {
                org_id: "org1".to_string()
            }
        );
    }
}
