//! Core types for the ledger
//!
//! Invocation parameters are validated into typed requests at the
//! boundary, so malformed input fails fast with a named error instead
//! of surfacing later as an arithmetic surprise.

use crate::error::{Error, Result};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use state_store::TransientMap;
use std::fmt;

/// Sentinel reported when no private balance applies to a query
pub const PRIVATE_BALANCE_NA: &str = "N/A";

/// Transient channel keys carrying confidential transfer parameters
const TRANSIENT_COLLECTION: &str = "collection";
const TRANSIENT_AMOUNT: &str = "amount";
const TRANSIENT_FROM: &str = "fromAccount";
const TRANSIENT_TO: &str = "toAccount";

/// Account identifier, used as the public-state key
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountId(String);

impl AccountId {
    /// Create new account ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get as string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Parse a balance from its UTF-8 base-10 wire form.
///
/// Balances live in the stores as decimal strings; arithmetic on them
/// is plain `i64` with no overflow checking and no floor at zero.
pub fn parse_balance(value: &str) -> Result<i64> {
    value
        .trim()
        .parse::<i64>()
        .map_err(|_| Error::InvalidArgument(format!("Integer expected {}", value)))
}

/// Confidential transfer parameters.
///
/// Built only from the transient channel; these values must never be
/// written to world state or echoed into the public transaction
/// record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferRequest {
    /// Private data collection receiving the transfer
    pub collection: String,
    /// Amount to move
    pub amount: i64,
    /// Source account (public balance decreases)
    pub from: AccountId,
    /// Destination account (private balance increases)
    pub to: AccountId,
}

impl TransferRequest {
    /// Validate a transient map into a transfer request.
    ///
    /// All four fields are required; a missing or non-UTF-8 field and
    /// a non-numeric amount each fail with an error naming the
    /// offender.
    pub fn from_transient(transient: &TransientMap) -> Result<Self> {
        let collection = transient.get_utf8(TRANSIENT_COLLECTION)?.to_string();
        let amount = parse_balance(transient.get_utf8(TRANSIENT_AMOUNT)?)?;
        let from = AccountId::new(transient.get_utf8(TRANSIENT_FROM)?);
        let to = AccountId::new(transient.get_utf8(TRANSIENT_TO)?);

        Ok(Self {
            collection,
            amount,
            from,
            to,
        })
    }
}

/// Validated query parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryRequest {
    /// Account to report on
    pub account: AccountId,
    /// Collection whose private balance to include, if any
    pub collection: Option<String>,
}

impl QueryRequest {
    /// Validate positional arguments plus transient into a query request.
    ///
    /// A positional collection (second argument) wins; the transient
    /// `collection` key is consulted only when no positional
    /// collection is given.
    pub fn from_parts(args: &[String], transient: &TransientMap) -> Result<Self> {
        let account = match args.first() {
            Some(name) => AccountId::new(name.as_str()),
            None => {
                return Err(Error::InvalidArgument(
                    "Query requires an account name".to_string(),
                ))
            }
        };

        if args.len() > 2 {
            return Err(Error::InvalidArgument(
                "Query accepts at most an account name and a collection".to_string(),
            ));
        }

        let collection = match args.get(1) {
            Some(positional) => Some(positional.clone()),
            None => match transient.get(TRANSIENT_COLLECTION) {
                Some(_) => Some(transient.get_utf8(TRANSIENT_COLLECTION)?.to_string()),
                None => None,
            },
        };

        Ok(Self {
            account,
            collection,
        })
    }
}

/// Dual-visibility balance report returned by query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryResponse {
    /// Account name
    #[serde(rename = "Name")]
    pub name: String,

    /// Public balance, as stored (decimal string)
    #[serde(rename = "Balance")]
    pub balance: String,

    /// Private balance in the queried collection, or `"N/A"`
    #[serde(rename = "PrivateBalance")]
    pub private_balance: String,
}

/// Success result handed back to the dispatcher.
///
/// Failures travel as [`Error`]; the dispatcher owns translating both
/// into the host runtime's response envelope.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Response {
    payload: Option<Bytes>,
}

impl Response {
    /// Success with no payload
    pub fn empty() -> Self {
        Self::default()
    }

    /// Success carrying a payload
    pub fn with_payload(payload: impl Into<Bytes>) -> Self {
        Self {
            payload: Some(payload.into()),
        }
    }

    /// Payload bytes, if any
    pub fn payload(&self) -> Option<&Bytes> {
        self.payload.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transfer_transient() -> TransientMap {
        [
            ("collection", "orgA"),
            ("amount", "30"),
            ("fromAccount", "alice"),
            ("toAccount", "bob"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_parse_balance() {
        assert_eq!(parse_balance("100").unwrap(), 100);
        assert_eq!(parse_balance("-5").unwrap(), -5);
        assert_eq!(parse_balance(" 42 ").unwrap(), 42);

        let err = parse_balance("10x").unwrap_err();
        assert!(err.to_string().contains("Integer expected 10x"));
    }

    #[test]
    fn test_transfer_request_from_transient() {
        let request = TransferRequest::from_transient(&transfer_transient()).unwrap();
        assert_eq!(request.collection, "orgA");
        assert_eq!(request.amount, 30);
        assert_eq!(request.from, AccountId::new("alice"));
        assert_eq!(request.to, AccountId::new("bob"));
    }

    #[test]
    fn test_transfer_request_missing_field() {
        let transient: TransientMap = [("collection", "orgA"), ("amount", "30")]
            .into_iter()
            .collect();

        let err = TransferRequest::from_transient(&transient).unwrap_err();
        assert!(err.to_string().contains("fromAccount"));
    }

    #[test]
    fn test_transfer_request_bad_amount() {
        let transient: TransientMap = [
            ("collection", "orgA"),
            ("amount", "lots"),
            ("fromAccount", "alice"),
            ("toAccount", "bob"),
        ]
        .into_iter()
        .collect();

        let err = TransferRequest::from_transient(&transient).unwrap_err();
        assert!(err.to_string().contains("Integer expected"));
    }

    #[test]
    fn test_query_request_positional_collection_wins() {
        let transient: TransientMap = [("collection", "orgB")].into_iter().collect();
        let args = vec!["bob".to_string(), "orgA".to_string()];

        let request = QueryRequest::from_parts(&args, &transient).unwrap();
        assert_eq!(request.collection.as_deref(), Some("orgA"));
    }

    #[test]
    fn test_query_request_transient_fallback() {
        let transient: TransientMap = [("collection", "orgB")].into_iter().collect();
        let args = vec!["bob".to_string()];

        let request = QueryRequest::from_parts(&args, &transient).unwrap();
        assert_eq!(request.collection.as_deref(), Some("orgB"));
    }

    #[test]
    fn test_query_request_no_collection() {
        let request =
            QueryRequest::from_parts(&["alice".to_string()], &TransientMap::new()).unwrap();
        assert_eq!(request.collection, None);
    }

    #[test]
    fn test_query_request_requires_account() {
        let err = QueryRequest::from_parts(&[], &TransientMap::new()).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn test_query_response_wire_shape() {
        let response = QueryResponse {
            name: "alice".to_string(),
            balance: "70".to_string(),
            private_balance: PRIVATE_BALANCE_NA.to_string(),
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["Name"], "alice");
        assert_eq!(json["Balance"], "70");
        assert_eq!(json["PrivateBalance"], "N/A");
    }
}
