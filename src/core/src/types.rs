//! Core types for the reserve-backed token system.

/// A 32-byte account address.
pub type Address = [u8; 32];

/// Token balance in scaled units, represented as a 128-bit unsigned integer.
pub type Balance = u128;

/// Number of fractional decimal digits carried by every ledger amount.
pub const DECIMALS: u32 = 6;

/// One whole token in scaled units (10^DECIMALS).
pub const UNIT: Balance = 1_000_000;

/// Parses a human-readable decimal amount into scaled units.
///
/// Accepts an optional fractional part of up to [`DECIMALS`] digits;
/// shorter fractions are right-padded. Returns `None` for malformed
/// input, more than [`DECIMALS`] fractional digits, or overflow.
///
/// # Arguments
/// * `input` - A decimal string such as `"100"` or `"100.5"`
pub fn parse_amount(input: &str) -> Option<Balance> {
    let input = input.trim();
    if input.is_empty() || input == "." {
        return None;
    }

    let mut parts = input.splitn(2, '.');
    let whole = parts.next()?;
    let fraction = parts.next().unwrap_or("");

    if fraction.len() > DECIMALS as usize {
        return None;
    }

    let whole: Balance = if whole.is_empty() {
        0
    } else {
        whole.parse().ok()?
    };

    let fraction: Balance = if fraction.is_empty() {
        0
    } else {
        let padded = format!("{:0<width$}", fraction, width = DECIMALS as usize);
        padded.parse().ok()?
    };

    whole.checked_mul(UNIT)?.checked_add(fraction)
}

/// Formats a scaled amount as a human-readable decimal string.
///
/// Trailing fractional zeros are trimmed; whole amounts render without
/// a decimal point.
pub fn format_amount(amount: Balance) -> String {
    let whole = amount / UNIT;
    let fraction = amount % UNIT;

    if fraction == 0 {
        return whole.to_string();
    }

    let fraction = format!("{:0>width$}", fraction, width = DECIMALS as usize);
    let trimmed = fraction.trim_end_matches('0');
    format!("{}.{}", whole, trimmed)
}
