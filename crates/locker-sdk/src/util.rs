//! Display helpers and small async utilities.

use std::str::FromStr;
use std::time::Duration;

use rust_decimal::{Decimal, RoundingStrategy};

/// Placeholder rendered for missing or unparsable numbers.
pub const MISSING_NUMBER: &str = "--";

/// Most fraction digits `format_number` will render.
const MAX_FRACTION_DIGITS: u32 = 9;

/// Largest scale a `Decimal` can carry.
const MAX_DECIMAL_SCALE: u32 = 28;

/// `abcd...wxyz`: the first and last `chars` characters of an address.
pub fn shorten_address(address: &str, chars: usize) -> String {
    let total = address.chars().count();
    let head: String = address.chars().take(chars).collect();
    let tail: String = address.chars().skip(total.saturating_sub(chars)).collect();
    format!("{head}...{tail}")
}

/// Render a decimal string with thousands separators, rounded to `precision`
/// places with trailing zeros dropped. `None` or unparsable input renders as
/// [`MISSING_NUMBER`].
pub fn format_number(value: Option<&str>, precision: u32) -> String {
    let Some(parsed) = value.and_then(parse_decimal) else {
        return MISSING_NUMBER.to_string();
    };
    let rounded = parsed
        .round_dp_with_strategy(precision, RoundingStrategy::MidpointAwayFromZero)
        .round_dp_with_strategy(MAX_FRACTION_DIGITS, RoundingStrategy::MidpointAwayFromZero)
        .normalize();
    group_thousands(rounded)
}

/// Compact a raw token amount: `k` above 999, `m` above one million, after
/// scaling down by `10^decimals`. Smaller values are rounded to `decimals`
/// places.
pub fn format_number_to_reading_unit(value: Decimal, decimals: u32) -> String {
    let scale = Decimal::try_new(1, decimals.min(MAX_DECIMAL_SCALE)).unwrap_or(Decimal::ONE);
    let thousand = Decimal::from(1_000);
    let million = Decimal::from(1_000_000);

    if value > Decimal::from(999) && value < million {
        format!("{}k", (value / thousand * scale).normalize())
    } else if value > million {
        format!("{}m", (value / million * scale).normalize())
    } else {
        value
            .round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero)
            .normalize()
            .to_string()
    }
}

pub async fn sleep(duration: Duration) {
    tokio::time::sleep(duration).await;
}

fn parse_decimal(raw: &str) -> Option<Decimal> {
    let raw = raw.trim();
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .ok()
}

fn group_thousands(value: Decimal) -> String {
    let negative = value.is_sign_negative() && !value.is_zero();
    let digits = value.abs().to_string();
    let (int_part, frac_part) = match digits.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (digits.as_str(), None),
    };

    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if negative {
        out.push('-');
    }
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}
