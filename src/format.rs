// Display formatting for amounts and dates

use chrono::NaiveDate;

/// `1234.5` → `1,234.50`
pub fn format_amount(amount: f64) -> String {
    let fixed = format!("{:.2}", amount.abs());
    let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if amount < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{}{}.{}", sign, grouped, fraction)
}

/// `1234.5`, `₹` → `₹1,234.50`
pub fn format_currency(amount: f64, symbol: &str) -> String {
    let formatted = format_amount(amount);
    match formatted.strip_prefix('-') {
        Some(positive) => format!("-{}{}", symbol, positive),
        None => format!("{}{}", symbol, formatted),
    }
}

/// Shorten to at most `max_chars` characters, ending in `...` when cut
pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    if max_chars <= 3 {
        return text.chars().take(max_chars).collect();
    }
    let kept: String = text.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{}...", kept)
}

/// `2025-01-05` → `Jan 05, 2025`
pub fn format_date(date: NaiveDate) -> String {
    date.format("%b %d, %Y").to_string()
}
