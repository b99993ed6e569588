//! # Correlation Records
//!
//! Typed request/response pairs handed to hooks when a sent packet resolves.
//! Built transiently by the routers and never persisted.

use super::messages::HookRequest;
use super::value_objects::Sequence;
use serde::{Deserialize, Serialize};

/// Outcome of an acknowledged packet.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AckOutcome {
    /// Host executed the transaction; carries the encoded `TxMsgData`.
    #[serde(rename = "result")]
    Success(Vec<u8>),
    /// Host rejected the transaction.
    #[serde(rename = "error")]
    Failure(String),
}

impl AckOutcome {
    /// Whether the outcome is a success.
    pub fn is_success(&self) -> bool {
        matches!(self, AckOutcome::Success(_))
    }

    /// Error string of a failed outcome.
    pub fn error(&self) -> Option<&str> {
        match self {
            AckOutcome::Success(_) => None,
            AckOutcome::Failure(err) => Some(err),
        }
    }
}

/// Request correlated with its acknowledgement.
#[derive(Clone, Debug, PartialEq)]
pub struct AckExchange<K: HookRequest> {
    /// Sequence of the sent packet.
    pub sequence: Sequence,
    /// Host error, `None` on success.
    pub error: Option<String>,
    /// Original request.
    pub request: K,
    /// Decoded response; default-valued when `error` is set.
    pub response: K::Response,
}

impl<K: HookRequest> AckExchange<K> {
    /// Whether the host reported an error.
    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Request whose packet timed out.
#[derive(Clone, Debug, PartialEq)]
pub struct TimeoutExchange<K: HookRequest> {
    /// Sequence of the sent packet.
    pub sequence: Sequence,
    /// Original request.
    pub request: K,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::messages::MsgLockTokens;

    #[test]
    fn test_ack_outcome_json_shape() {
        let ok = serde_json::to_string(&AckOutcome::Success(vec![1])).unwrap();
        assert_eq!(ok, r#"{"result":[1]}"#);

        let err = serde_json::to_string(&AckOutcome::Failure("out of gas".into())).unwrap();
        assert_eq!(err, r#"{"error":"out of gas"}"#);
    }

    #[test]
    fn test_ack_outcome_error_accessor() {
        assert_eq!(AckOutcome::Failure("x".into()).error(), Some("x"));
        assert!(AckOutcome::Success(vec![]).is_success());
    }

    #[test]
    fn test_exchange_has_error() {
        let ex = AckExchange::<MsgLockTokens> {
            sequence: 3,
            error: Some("insufficient funds".into()),
            request: MsgLockTokens::default(),
            response: Default::default(),
        };
        assert!(ex.has_error());
        assert_eq!(ex.response.id, 0);
    }
}
