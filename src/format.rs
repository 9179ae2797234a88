//! Number formatting shared by tables and chart labels.

/// Formats an integer with comma thousands separators.
pub fn thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        grouped.push('-');
    }
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}

/// Formats whole dollars, writing negative amounts in accounting parentheses.
pub fn dollars(value: i64) -> String {
    if value < 0 {
        format!("$({})", thousands(-value))
    } else {
        format!("${}", thousands(value))
    }
}

/// Formats a percentage with one decimal place.
pub fn percent(value: f64) -> String {
    format!("{value:.1}%")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_thousands() {
        assert_eq!(thousands(0), "0");
        assert_eq!(thousands(999), "999");
        assert_eq!(thousands(1_000), "1,000");
        assert_eq!(thousands(1_897_380), "1,897,380");
        assert_eq!(thousands(-47_295), "-47,295");
    }

    #[test]
    fn negative_dollars_use_parentheses() {
        assert_eq!(dollars(159_360), "$159,360");
        assert_eq!(dollars(-410_000), "$(410,000)");
        assert_eq!(dollars(0), "$0");
    }

    #[test]
    fn percentages_have_one_decimal() {
        assert_eq!(percent(139.06), "139.1%");
        assert_eq!(percent(31.9), "31.9%");
    }
}
