//! # Domain Invariants
//!
//! Validation rules for identifiers, denominations, coins and chain addresses.

use super::errors::IntergammError;
use super::value_objects::Coin;

/// Prefix of interchain-account controller ports.
pub const CONTROLLER_PORT_PREFIX: &str = "icacontroller-";

const MIN_DENOM_LEN: usize = 3;
const MAX_DENOM_LEN: usize = 128;

/// Identifiers (zone ids, connection/port/channel ids) must not be empty.
pub fn validate_identifier(id: &str) -> Result<(), IntergammError> {
    if id.is_empty() {
        return Err(IntergammError::InvalidParams(
            "ID can not be empty".to_string(),
        ));
    }
    Ok(())
}

/// Denoms match `[a-zA-Z][a-zA-Z0-9/:._-]{2,127}`.
pub fn validate_denom(denom: &str) -> Result<(), IntergammError> {
    let len = denom.len();
    if !(MIN_DENOM_LEN..=MAX_DENOM_LEN).contains(&len) {
        return Err(IntergammError::InvalidDenom(format!(
            "'{}': length must be between {} and {}",
            denom, MIN_DENOM_LEN, MAX_DENOM_LEN
        )));
    }

    let mut chars = denom.chars();
    let first_ok = chars.next().is_some_and(|c| c.is_ascii_alphabetic());
    let rest_ok = chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '/' | ':' | '.' | '_' | '-'));
    if !first_ok || !rest_ok {
        return Err(IntergammError::InvalidDenom(format!("'{}'", denom)));
    }
    Ok(())
}

/// A transferable coin has a valid denom and a positive amount.
pub fn validate_coin(coin: &Coin) -> Result<(), IntergammError> {
    validate_denom(&coin.denom)?;
    if coin.amount == 0 {
        return Err(IntergammError::InvalidCoin(format!(
            "{}: amount must be positive",
            coin
        )));
    }
    Ok(())
}

/// Chain addresses are bech32 strings with a valid checksum and non-empty payload.
pub fn validate_address(address: &str) -> Result<(), IntergammError> {
    if address.trim().is_empty() {
        return Err(IntergammError::invalid_address(address, "empty address"));
    }
    let (_hrp, data) = bech32::decode(address)
        .map_err(|e| IntergammError::invalid_address(address, e.to_string()))?;
    if data.is_empty() {
        return Err(IntergammError::invalid_address(address, "empty payload"));
    }
    Ok(())
}

/// Controller port of an owner: `icacontroller-{owner}`.
pub fn controller_port_id(owner: &str) -> Result<String, IntergammError> {
    if owner.trim().is_empty() {
        return Err(IntergammError::invalid_address(
            owner,
            "owner address cannot be empty",
        ));
    }
    Ok(format!("{}{}", CONTROLLER_PORT_PREFIX, owner))
}
