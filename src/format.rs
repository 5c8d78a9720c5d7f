// Yen display helpers
use crate::utils::group_thousands;

/// `¥159,800`
pub fn format_price(price: i64) -> String {
    let sign = if price < 0 { "-" } else { "" };
    format!("{sign}¥{}", group_thousands(price.unsigned_abs()))
}

/// `+¥20,200`, `-¥3,000`, or `¥0`.
pub fn format_signed_price(amount: i64) -> String {
    let sign = match amount.signum() {
        1 => "+",
        -1 => "-",
        _ => "",
    };
    format!("{sign}¥{}", group_thousands(amount.unsigned_abs()))
}

/// `-` when unchanged, otherwise `+¥1,000 (0.56%)` with absolute magnitudes.
pub fn format_change(price_change: i64, percent_change: f64) -> String {
    if price_change == 0 {
        return "-".to_string();
    }
    let sign = if price_change > 0 { "+" } else { "-" };
    format!(
        "{sign}¥{} ({}%)",
        group_thousands(price_change.unsigned_abs()),
        percent_change.abs()
    )
}

/// Abbreviated ten-thousand-yen display (`18万`, `17.5万`). Presentation-only
/// alternative to [`format_price`]; amounts under ¥10,000 are left in yen.
pub fn format_man_yen(price: i64) -> String {
    if price.unsigned_abs() < 10_000 {
        return format_price(price);
    }
    let man = price as f64 / 10_000.0;
    let rounded = (man * 10.0).round() / 10.0;
    if rounded.fract() == 0.0 {
        format!("{rounded:.0}万")
    } else {
        format!("{rounded:.1}万")
    }
}
