//! Amount parsing, formatting and the borrow-amount conversion.

use odra::casper_types::{U256, U512};

use crate::errors::{LendError, Result};
use crate::types::BPS_SCALE;

/// Stablecoin amount to borrow for a given borrowing capacity.
///
/// `capacity` and `price` share the same value units (`price` is the value of
/// one whole stablecoin). The result is in the stablecoin's smallest unit:
///
/// `capacity * safety_margin_bps * 10^stable_decimals / (10_000 * price)`
///
/// Division truncates, so the request never exceeds the margin-adjusted
/// capacity the protocol reported.
pub fn borrow_amount(
    capacity: U256,
    price: U256,
    safety_margin_bps: u32,
    stable_decimals: u8,
) -> Result<U256> {
    if price.is_zero() {
        return Err(LendError::ZeroPrice);
    }
    if safety_margin_bps == 0 || safety_margin_bps > BPS_SCALE {
        return Err(LendError::InvalidMargin(safety_margin_bps));
    }

    let scale = pow10(stable_decimals).ok_or(LendError::Overflow("stablecoin scale"))?;
    // Any U256 capacity times the margin and an 18-decimal scale fits in U512.
    let numerator = u256_to_u512(capacity)
        .checked_mul(U512::from(safety_margin_bps))
        .and_then(|value| value.checked_mul(u256_to_u512(scale)))
        .ok_or(LendError::Overflow("borrow amount"))?;
    let denominator = u256_to_u512(price) * U512::from(BPS_SCALE);

    u512_to_u256(numerator / denominator).ok_or(LendError::Overflow("borrow amount"))
}

/// Parse a decimal string such as `"0.01"` into smallest units.
pub fn parse_units(input: &str, decimals: u8) -> Result<U256> {
    let invalid = |reason: &'static str| LendError::InvalidAmount {
        input: input.to_string(),
        reason,
    };

    let trimmed = input.trim();
    let (whole, fraction) = match trimmed.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (trimmed, ""),
    };
    if whole.is_empty() && fraction.is_empty() {
        return Err(invalid("empty"));
    }
    if !whole.chars().all(|c| c.is_ascii_digit()) || !fraction.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid("not a decimal number"));
    }
    if fraction.len() > decimals as usize {
        return Err(invalid("too many decimal places"));
    }

    let mut digits = String::with_capacity(whole.len() + decimals as usize + 1);
    digits.push('0');
    digits.push_str(whole);
    digits.push_str(fraction);
    for _ in fraction.len()..decimals as usize {
        digits.push('0');
    }

    U256::from_dec_str(&digits).map_err(|_| invalid("out of range"))
}

/// Render smallest units as a decimal string, dropping trailing zeros.
pub fn format_units(value: U256, decimals: u8) -> String {
    let digits = value.to_string();
    let decimals = decimals as usize;
    if decimals == 0 {
        return digits;
    }

    let padded = if digits.len() <= decimals {
        format!("{}{}", "0".repeat(decimals + 1 - digits.len()), digits)
    } else {
        digits
    };
    let (whole, fraction) = padded.split_at(padded.len() - decimals);
    let fraction = fraction.trim_end_matches('0');
    if fraction.is_empty() {
        whole.to_string()
    } else {
        format!("{}.{}", whole, fraction)
    }
}

/// Convert U256 to U512 (attached native value)
pub fn u256_to_u512(value: U256) -> U512 {
    let mut bytes = [0u8; 32];
    value.to_little_endian(&mut bytes);
    U512::from_little_endian(&bytes)
}

/// Narrow a U512 back to U256, `None` if the upper half is set.
fn u512_to_u256(value: U512) -> Option<U256> {
    let mut bytes = [0u8; 64];
    value.to_little_endian(&mut bytes);
    if bytes[32..].iter().any(|byte| *byte != 0) {
        return None;
    }
    Some(U256::from_little_endian(&bytes[..32]))
}

fn pow10(exponent: u8) -> Option<U256> {
    U256::from(10u64).checked_pow(U256::from(exponent))
}
