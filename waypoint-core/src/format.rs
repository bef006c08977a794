//! Formatting helpers shared by the CLI and the day renderer.

use chrono::NaiveDate;

/// Amount with two decimals (e.g., "812.50").
pub fn format_amount(amount: f64) -> String {
    format!("{:.2}", amount)
}

/// Amount with a currency symbol, sign before the symbol (e.g., "-$8.60").
pub fn format_money(amount: f64, symbol: &str) -> String {
    if amount < 0.0 {
        format!("-{}{}", symbol, format_amount(-amount))
    } else {
        format!("{}{}", symbol, format_amount(amount))
    }
}

/// Duration in minutes as "1h 30m", "45m" or "2h".
pub fn format_minutes(minutes: u32) -> String {
    let hours = minutes / 60;
    let rest = minutes % 60;
    match (hours, rest) {
        (0, m) => format!("{}m", m),
        (h, 0) => format!("{}h", h),
        (h, m) => format!("{}h {}m", h, m),
    }
}

/// Heading for a trip day, numbered from 1 (e.g., "Day 1 · Thu, Nov 13").
pub fn format_day_heading(index: usize, date: NaiveDate) -> String {
    format!("Day {} · {}", index + 1, date.format("%a, %b %-d"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(812.5), "812.50");
        assert_eq!(format_amount(0.0), "0.00");
        assert_eq!(format_amount(33.333), "33.33");
    }

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(45.0, "$"), "$45.00");
        assert_eq!(format_money(-8.6, "€"), "-€8.60");
    }

    #[test]
    fn test_format_minutes() {
        assert_eq!(format_minutes(45), "45m");
        assert_eq!(format_minutes(120), "2h");
        assert_eq!(format_minutes(90), "1h 30m");
        assert_eq!(format_minutes(0), "0m");
    }

    #[test]
    fn test_format_day_heading() {
        let date = NaiveDate::from_ymd_opt(2025, 11, 13).unwrap();
        assert_eq!(format_day_heading(0, date), "Day 1 · Thu, Nov 13");
    }
}
