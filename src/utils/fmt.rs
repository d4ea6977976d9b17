//! Money helpers. Rates arrive as floating dollars, so sums are rounded to
//! whole cents before they are shown or exported.

/// Round a dollar amount to the nearest cent.
pub fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// Format a dollar amount with thousands separators, omitting the cents when
/// they are zero. `1234567.5` renders as `1,234,567.5`.
pub fn dollars(amount: f64) -> String {
    let total_cents = (amount * 100.0).round() as i64;
    let sign = if total_cents < 0 { "-" } else { "" };
    let total_cents = total_cents.abs();
    let whole = group_thousands(total_cents / 100);
    let cents = total_cents % 100;

    if cents == 0 {
        format!("{sign}{whole}")
    } else if cents % 10 == 0 {
        format!("{sign}{whole}.{}", cents / 10)
    } else {
        format!("{sign}{whole}.{cents:02}")
    }
}

fn group_thousands(n: i64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
