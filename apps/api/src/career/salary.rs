//! Rupee display of the salary text returned by the model.

/// Fixed display rate, dollars to rupees.
pub const USD_TO_INR: u64 = 75;

/// Converts the dollar amounts found in `text` to rupees per annum.
///
/// Two amounts render as a range, any other count renders the first amount
/// only, and text without amounts is returned unchanged.
pub fn salary_in_rupees(text: &str) -> String {
    let amounts: Vec<u64> = amounts_in(text)
        .into_iter()
        .filter_map(|amount| amount.checked_mul(USD_TO_INR))
        .collect();

    match amounts.as_slice() {
        [] => text.to_string(),
        [low, high] => format!(
            "₹{} - ₹{} per annum",
            group_indian(*low),
            group_indian(*high)
        ),
        [first, ..] => format!("₹{} per annum", group_indian(*first)),
    }
}

/// Runs of digits and commas, e.g. `70,000`, read as whole numbers.
fn amounts_in(text: &str) -> Vec<u64> {
    let mut amounts = Vec::new();
    let mut digits = String::new();
    let mut in_run = false;

    for c in text.chars().chain(std::iter::once(' ')) {
        if c.is_ascii_digit() {
            digits.push(c);
            in_run = true;
        } else if c == ',' && in_run {
            continue;
        } else {
            if !digits.is_empty() {
                if let Ok(amount) = digits.parse::<u64>() {
                    amounts.push(amount);
                }
                digits.clear();
            }
            in_run = false;
        }
    }

    amounts
}

/// Indian digit grouping: the last three digits, then pairs (12,34,567).
fn group_indian(value: u64) -> String {
    let digits = value.to_string();
    if digits.len() <= 3 {
        return digits;
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();

    format!("{},{}", groups.join(","), tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_converts_both_ends() {
        assert_eq!(
            salary_in_rupees("$70,000 - $120,000"),
            "₹52,50,000 - ₹90,00,000 per annum"
        );
    }

    #[test]
    fn test_single_amount() {
        assert_eq!(salary_in_rupees("About $1,000 a year"), "₹75,000 per annum");
    }

    #[test]
    fn test_three_amounts_use_first() {
        assert_eq!(salary_in_rupees("$10 or $20 or $30"), "₹750 per annum");
    }

    #[test]
    fn test_text_without_amounts_is_unchanged() {
        assert_eq!(
            salary_in_rupees("Salary information not available"),
            "Salary information not available"
        );
    }

    #[test]
    fn test_comma_between_words_is_not_an_amount() {
        assert_eq!(salary_in_rupees("varies, by region"), "varies, by region");
    }

    #[test]
    fn test_indian_grouping() {
        assert_eq!(group_indian(999), "999");
        assert_eq!(group_indian(1_000), "1,000");
        assert_eq!(group_indian(100_000), "1,00,000");
        assert_eq!(group_indian(1_234_567), "12,34,567");
        assert_eq!(group_indian(123_456_789), "12,34,56,789");
    }
}
