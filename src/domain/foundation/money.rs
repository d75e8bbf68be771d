//! Rupiah amount formatting.

/// Formats an amount in the smallest currency unit as `Rp. 15.000`.
///
/// Thousands are grouped with dots; values below 1000 are printed bare.
pub fn format_rupiah(amount: i64) -> String {
    format!("Rp. {}", group_thousands(amount))
}

/// Groups the digits of `amount` in threes separated by `.`.
pub fn group_thousands(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);

    if amount < 0 {
        grouped.push('-');
    }

    let lead = digits.len() % 3;
    for (i, ch) in digits.chars().enumerate() {
        if i != 0 && (i + 3 - lead) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    grouped
}
