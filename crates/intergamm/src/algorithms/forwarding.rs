//! # Packet-Forward Receiver
//!
//! Multi-hop transfers encode the next hop inside the receiver field:
//! `{intermediate}|{forward_port}/{forward_channel}:{final}`.
//! The intermediate chain's forwarding middleware parses it and re-sends.

/// Build the receiver string for a forwarded transfer.
///
/// Addresses are not validated here.
pub fn build_forward_receiver(
    intermediate_receiver: &str,
    forward_port: &str,
    forward_channel: &str,
    final_receiver: &str,
) -> String {
    format!(
        "{}|{}/{}:{}",
        intermediate_receiver, forward_port, forward_channel, final_receiver
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_forward_receiver_format() {
        assert_eq!(
            build_forward_receiver("icaAddr", "transfer", "channel-7", "quasar1abc"),
            "icaAddr|transfer/channel-7:quasar1abc"
        );
    }

    #[test]
    fn test_empty_parts_are_kept() {
        assert_eq!(build_forward_receiver("", "", "", ""), "|/:");
    }

    proptest! {
        #[test]
        fn prop_forward_receiver_is_pure(
            a in "[a-z0-9]{0,16}",
            p in "[a-z]{0,8}",
            c in "channel-[0-9]{1,3}",
            r in "[a-z0-9]{0,16}",
        ) {
            let first = build_forward_receiver(&a, &p, &c, &r);
            let second = build_forward_receiver(&a, &p, &c, &r);
            prop_assert_eq!(&first, &second);
            prop_assert_eq!(first.len(), a.len() + p.len() + c.len() + r.len() + 3);
            let expected_suffix = format!(":{}", r);
            prop_assert!(first.ends_with(&expected_suffix));
        }
    }
}
