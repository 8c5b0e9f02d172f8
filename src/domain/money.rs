use std::fmt;

/// Money is represented as integer cents to avoid floating-point precision issues.
/// For the campus wallet 1 unit = 100 cents, so ₦500.00 = 50000 cents.
pub type Cents = i64;

/// Minimum accepted top-up: ₦500.00.
pub const MIN_TOP_UP_CENTS: Cents = 50_000;

/// Minimum accepted peer transfer: ₦100.00.
pub const MIN_TRANSFER_CENTS: Cents = 10_000;

/// Loyalty points earned for an amount spent: 1 point per ₦100.00.
pub fn points_for_spend(amount_cents: Cents) -> i64 {
    amount_cents / 10_000
}

/// Format cents as a human-readable currency string.
/// Example: 5000 -> "50.00", 123456 -> "1234.56"
pub fn format_cents(cents: Cents) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs_cents = cents.abs();
    let units = abs_cents / 100;
    let remainder = abs_cents % 100;
    format!("{}{}.{:02}", sign, units, remainder)
}

/// Parse a decimal string into cents.
/// Example: "500.00" -> 50000, "12.5" -> 1250, "100" -> 10000
///
/// Negative amounts are rejected: every wallet operation takes a
/// positive amount and direction is carried by the operation itself.
pub fn parse_cents(input: &str) -> Result<Cents, ParseCentsError> {
    let input = input.trim();
    if input.starts_with('-') {
        return Err(ParseCentsError::Negative);
    }

    let parts: Vec<&str> = input.split('.').collect();
    match parts.len() {
        1 => {
            // No decimal point, treat as whole units
            let units: i64 = parts[0]
                .parse()
                .map_err(|_| ParseCentsError::InvalidFormat)?;
            units.checked_mul(100).ok_or(ParseCentsError::InvalidFormat)
        }
        2 => {
            let units: i64 = if parts[0].is_empty() {
                0
            } else {
                parts[0]
                    .parse()
                    .map_err(|_| ParseCentsError::InvalidFormat)?
            };

            // Handle decimal part - pad or truncate to 2 digits
            let decimal_str = parts[1];
            let decimal_cents: i64 = match decimal_str.len() {
                0 => 0,
                1 => {
                    // Single digit like "5" means 50 cents
                    decimal_str
                        .parse::<i64>()
                        .map_err(|_| ParseCentsError::InvalidFormat)?
                        * 10
                }
                2 => decimal_str
                    .parse()
                    .map_err(|_| ParseCentsError::InvalidFormat)?,
                _ => {
                    // More than 2 decimal places - truncate. Slice by char
                    // boundary: a multibyte character here is bad input,
                    // not a reason to panic.
                    decimal_str
                        .get(..2)
                        .ok_or(ParseCentsError::InvalidFormat)?
                        .parse()
                        .map_err(|_| ParseCentsError::InvalidFormat)?
                }
            };

            units
                .checked_mul(100)
                .and_then(|cents| cents.checked_add(decimal_cents))
                .ok_or(ParseCentsError::InvalidFormat)
        }
        _ => Err(ParseCentsError::InvalidFormat),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseCentsError {
    InvalidFormat,
    Negative,
}

impl fmt::Display for ParseCentsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseCentsError::InvalidFormat => write!(f, "invalid money format"),
            ParseCentsError::Negative => write!(f, "amount must not be negative"),
        }
    }
}

impl std::error::Error for ParseCentsError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_cents() {
        assert_eq!(format_cents(50000), "500.00");
        assert_eq!(format_cents(1234), "12.34");
        assert_eq!(format_cents(100), "1.00");
        assert_eq!(format_cents(1), "0.01");
        assert_eq!(format_cents(0), "0.00");
        assert_eq!(format_cents(-5000), "-50.00");
    }

    #[test]
    fn test_parse_cents() {
        assert_eq!(parse_cents("500.00"), Ok(50000));
        assert_eq!(parse_cents("500"), Ok(50000));
        assert_eq!(parse_cents("12.34"), Ok(1234));
        assert_eq!(parse_cents("12.5"), Ok(1250));
        assert_eq!(parse_cents("0.01"), Ok(1));
        assert_eq!(parse_cents(".50"), Ok(50));
        assert_eq!(parse_cents("100.999"), Ok(10099)); // Truncates
    }

    #[test]
    fn test_parse_cents_invalid() {
        assert!(parse_cents("abc").is_err());
        assert!(parse_cents("12.34.56").is_err());
        assert_eq!(parse_cents("-50.00"), Err(ParseCentsError::Negative));
    }

    #[test]
    fn test_parse_cents_multibyte_decimal_rejected() {
        // Truncation must respect char boundaries, not byte offsets
        assert_eq!(parse_cents("1.5é"), Err(ParseCentsError::InvalidFormat));
        assert_eq!(parse_cents("1.é50"), Err(ParseCentsError::InvalidFormat));
    }

    #[test]
    fn test_parse_cents_overflow_rejected() {
        // Unit counts that overflow i64 when scaled to cents
        assert_eq!(
            parse_cents("99999999999999999"),
            Err(ParseCentsError::InvalidFormat)
        );
        assert_eq!(
            parse_cents("99999999999999999.99"),
            Err(ParseCentsError::InvalidFormat)
        );
    }

    #[test]
    fn test_points_for_spend() {
        assert_eq!(points_for_spend(0), 0);
        assert_eq!(points_for_spend(9_999), 0);
        assert_eq!(points_for_spend(10_000), 1);
        assert_eq!(points_for_spend(30_000), 3);
        assert_eq!(points_for_spend(39_999), 3);
    }
}
