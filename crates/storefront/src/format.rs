//! Display formatting for prices, dates and long text.

use chrono::{DateTime, Utc};
use rust_decimal::RoundingStrategy;

use shophub_core::Price;

/// Format a price as US currency: `$1,234.56`, `-$5.00`.
#[must_use]
pub fn format_price(price: Price) -> String {
    let amount = price
        .amount()
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let sign = if amount.is_sign_negative() && !amount.is_zero() {
        "-"
    } else {
        ""
    };

    let digits = format!("{:.2}", amount.abs());
    let (whole, cents) = digits.split_once('.').unwrap_or((&digits, "00"));
    format!("{sign}${}.{cents}", group_thousands(whole))
}

/// Format a timestamp as a long US date: `January 5, 2025`.
#[must_use]
pub fn format_date(date: &DateTime<Utc>) -> String {
    date.format("%B %-d, %Y").to_string()
}

/// Cut `text` to at most `max_chars` characters, appending `...` when cut.
#[must_use]
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars).collect();
    format!("{cut}...")
}

// =============================================================================
// Helper Functions
// =============================================================================

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}
