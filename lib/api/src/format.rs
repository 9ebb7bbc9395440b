//! Display helpers for the presentation layer. The core only deals in raw
//! numbers; currency and percentage strings are built here.

/// Shown in place of an amount when no profile matched
pub const NO_MATCHES_DISPLAY: &str = "No Matches Found";

/// `1234.5` -> `"$1,234.50"`
pub fn format_usd(amount: f64) -> String {
    if !amount.is_finite() {
        return format!("${}", amount);
    }

    let fixed = format!("{:.2}", amount.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if amount < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{}${}.{}", sign, grouped, cents)
}

/// Display string for an optional estimate
pub fn format_estimate(estimate: Option<f64>) -> String {
    match estimate {
        Some(amount) => format_usd(amount),
        None => NO_MATCHES_DISPLAY.to_string(),
    }
}

/// Cosine score as a percentage with two decimals: `0.875` -> `"87.50%"`
pub fn format_similarity(score: f32) -> String {
    format!("{:.2}%", f64::from(score) * 100.0)
}

/// Gallery caption: name on the first line, similarity on the second
pub fn match_caption(name: &str, score: f32) -> String {
    format!("{}\nSimilarity: {}", name, format_similarity(score))
}
