//! # Transfer Router
//!
//! Correlates acknowledgements and timeouts of local ICS-20 transfers with
//! their packet data. The response is always empty; an error acknowledgement
//! only sets `error`.

use super::hooks::HookRegistry;
use crate::domain::{
    AckExchange, AckOutcome, BlockContext, FungibleTokenPacketData, IntergammError,
    MsgEmptyIbcResponse, Sequence, TimeoutExchange,
};

/// Run the transfer ack hooks for an acknowledged local transfer.
pub fn route_transfer_ack(
    hooks: &HookRegistry,
    ctx: &BlockContext,
    sequence: Sequence,
    packet_data: FungibleTokenPacketData,
    outcome: &AckOutcome,
) -> Result<(), IntergammError> {
    let exchange = AckExchange {
        sequence,
        error: outcome.error().map(str::to_string),
        request: packet_data,
        response: MsgEmptyIbcResponse::default(),
    };
    hooks.run_ack_hooks(ctx, &exchange)
}

/// Run the transfer timeout hooks for a timed-out local transfer.
pub fn route_transfer_timeout(
    hooks: &HookRegistry,
    ctx: &BlockContext,
    sequence: Sequence,
    packet_data: FungibleTokenPacketData,
) -> Result<(), IntergammError> {
    hooks.run_timeout_hooks(
        ctx,
        &TimeoutExchange {
            sequence,
            request: packet_data,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MessageKind, MsgTransfer};
    use std::sync::{Arc, Mutex};

    fn packet_data() -> FungibleTokenPacketData {
        FungibleTokenPacketData {
            denom: "uqsr".into(),
            amount: "100".into(),
            sender: "quasar1sender".into(),
            receiver: "osmo1receiver".into(),
            memo: String::new(),
        }
    }

    #[test]
    fn test_success_ack() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut hooks = HookRegistry::new();
        let s = seen.clone();
        hooks.add_ack_hook::<FungibleTokenPacketData, _>(move |_, ex| {
            s.lock().unwrap().push(ex.clone());
            Ok(())
        });

        route_transfer_ack(
            &hooks,
            &BlockContext::default(),
            8,
            packet_data(),
            &AckOutcome::Success(vec![1]),
        )
        .unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].sequence, 8);
        assert_eq!(seen[0].error, None);
        assert_eq!(seen[0].request, packet_data());
    }

    #[test]
    fn test_error_ack() {
        let seen = Arc::new(Mutex::new(None));
        let mut hooks = HookRegistry::new();
        let s = seen.clone();
        hooks.add_ack_hook::<FungibleTokenPacketData, _>(move |_, ex| {
            *s.lock().unwrap() = Some(ex.error.clone());
            Ok(())
        });

        route_transfer_ack(
            &hooks,
            &BlockContext::default(),
            3,
            packet_data(),
            &AckOutcome::Failure("insufficient funds".into()),
        )
        .unwrap();
        assert_eq!(
            seen.lock().unwrap().clone(),
            Some(Some("insufficient funds".to_string()))
        );
    }

    #[test]
    fn test_timeout_runs_timeout_hooks_only() {
        let acks = Arc::new(Mutex::new(0));
        let timeouts = Arc::new(Mutex::new(Vec::new()));
        let mut hooks = HookRegistry::new();
        let a = acks.clone();
        hooks.add_ack_hook::<FungibleTokenPacketData, _>(move |_, _| {
            *a.lock().unwrap() += 1;
            Ok(())
        });
        let t = timeouts.clone();
        hooks.add_timeout_hook::<FungibleTokenPacketData, _>(move |_, ex| {
            t.lock().unwrap().push(ex.sequence);
            Ok(())
        });

        route_transfer_timeout(&hooks, &BlockContext::default(), 5, packet_data()).unwrap();
        assert_eq!(*acks.lock().unwrap(), 0);
        assert_eq!(*timeouts.lock().unwrap(), vec![5]);
    }

    #[test]
    fn test_ica_transfer_hooks_not_run() {
        let calls = Arc::new(Mutex::new(0));
        let mut hooks = HookRegistry::new();
        let c = calls.clone();
        hooks.add_ack_hook::<MsgTransfer, _>(move |_, _| {
            *c.lock().unwrap() += 1;
            Ok(())
        });

        route_transfer_ack(
            &hooks,
            &BlockContext::default(),
            1,
            packet_data(),
            &AckOutcome::Success(vec![]),
        )
        .unwrap();
        assert_eq!(*calls.lock().unwrap(), 0);
    }

    #[test]
    fn test_hook_failure() {
        let mut hooks = HookRegistry::new();
        hooks.add_timeout_hook::<FungibleTokenPacketData, _>(|_, _| Err(anyhow::anyhow!("boom")));
        let result = route_transfer_timeout(&hooks, &BlockContext::default(), 1, packet_data());
        assert!(matches!(
            result,
            Err(IntergammError::HookFailed { kind: MessageKind::IbcTransfer, .. })
        ));
    }
}
