use rust_decimal::{Decimal, RoundingStrategy};

/// Decimal places used by every serialized statistic field.
const STAT_DECIMALS: u32 = 2;

/// Render a statistic as a fixed two-decimal string.
///
/// Values are rounded half away from zero and padded with trailing zeros.
/// This runs exactly once, when a snapshot is constructed; accumulation
/// stays at full `Decimal` precision and formatted strings are never parsed
/// back into the numeric pipeline.
pub fn format_stat_value(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(STAT_DECIMALS, RoundingStrategy::MidpointAwayFromZero);
    // Collapse negative zero so values that round to nothing print as "0.00".
    let rounded = if rounded.is_zero() { Decimal::ZERO } else { rounded };
    pad_fraction_to_dp(&rounded.to_string(), STAT_DECIMALS)
}

fn pad_fraction_to_dp(s: &str, dp: u32) -> String {
    let (int_part, frac_part) = match s.split_once('.') {
        Some((i, f)) => (i, f),
        None => (s, ""),
    };

    let mut out = String::with_capacity(int_part.len() + 1 + dp as usize);
    out.push_str(int_part);
    out.push('.');

    let mut written = 0usize;
    for ch in frac_part.chars().take(dp as usize) {
        out.push(ch);
        written += 1;
    }
    while written < dp as usize {
        out.push('0');
        written += 1;
    }

    out
}
