// 💲 Display formatting for amounts and percents

pub const CURRENCY_SYMBOL: &str = "$";

/// Two-decimal currency text, e.g. `$27.50`
pub fn format_currency(value: f64) -> String {
    format!("{}{:.2}", CURRENCY_SYMBOL, value)
}

/// Whole-unit currency text, e.g. `$12` (counter display)
pub fn format_whole_currency(value: u64) -> String {
    format!("{}{}", CURRENCY_SYMBOL, value)
}

pub fn format_percent(percent: u32) -> String {
    format!("{} %", percent)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_two_decimals() {
        assert_eq!(format_currency(27.5), "$27.50");
        assert_eq!(format_currency(0.0), "$0.00");
        assert_eq!(format_currency(33.333333), "$33.33");
        assert_eq!(format_currency(-25.0), "$-25.00");
    }

    #[test]
    fn test_whole_currency_and_percent() {
        assert_eq!(format_whole_currency(11), "$11");
        assert_eq!(format_percent(18), "18 %");
    }
}
