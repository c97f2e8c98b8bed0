use rust_decimal::Decimal;

/// Single store currency; mixed-currency carts are out of scope.
pub const DEFAULT_CURRENCY: &str = "RUB";

fn currency_symbol(code: &str) -> &str {
    match code {
        "RUB" => "₽",
        "USD" => "$",
        "EUR" => "€",
        other => other,
    }
}

/// Presentation-only price formatting: thousands separated by thin spaces,
/// decimals dropped for whole amounts ("1 500 ₽", "99.90 ₽").
pub fn format_amount(amount: Decimal, currency: &str) -> String {
    let normalized = amount.normalize();
    let rendered = if normalized.scale() == 0 {
        group_thousands(&normalized.to_string())
    } else {
        let fixed = amount.round_dp(2).to_string();
        match fixed.split_once('.') {
            Some((int_part, frac)) => format!("{}.{}", group_thousands(int_part), frac),
            None => group_thousands(&fixed),
        }
    };
    format!("{} {}", rendered, currency_symbol(currency))
}

fn group_thousands(digits: &str) -> String {
    let (sign, digits) = match digits.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", digits),
    };
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    let offset = digits.len() % 3;
    for (i, ch) in digits.chars().enumerate() {
        if i != 0 && (i + 3 - offset) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(ch);
    }
    format!("{sign}{grouped}")
}
