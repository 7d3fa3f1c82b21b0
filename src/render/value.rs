//! Small value helpers shared by every renderer.

use serde_json::Value;

/// Tag the final element of an ordered list with `last = true`.
///
/// Templates use the marker to decide where separators ("or", ",") go.
/// Empty lists are returned untouched.
pub fn with_last_marker(mut items: Vec<Value>) -> Vec<Value> {
    if let Some(Value::Object(last)) = items.last_mut() {
        last.insert("last".to_string(), Value::Bool(true));
    }
    items
}

/// Render a literal property value. Integers get thousands separators;
/// anything else passes through unchanged.
pub fn format_value(value: &Value) -> Value {
    if let Some(n) = value.as_i64() {
        Value::String(format_integer(n))
    } else if let Some(n) = value.as_u64() {
        Value::String(group_digits(&n.to_string()))
    } else {
        value.clone()
    }
}

/// `1234567` → `"1,234,567"`. Negative numbers keep their sign in front of
/// the grouped digits.
pub fn format_integer(n: i64) -> String {
    let digits = group_digits(&n.unsigned_abs().to_string());
    if n < 0 {
        format!("-{}", digits)
    } else {
        digits
    }
}

fn group_digits(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn groups_thousands() {
        assert_eq!(format_integer(1234567), "1,234,567");
        assert_eq!(format_integer(1000000), "1,000,000");
        assert_eq!(format_integer(1000), "1,000");
        assert_eq!(format_integer(999), "999");
        assert_eq!(format_integer(12), "12");
        assert_eq!(format_integer(0), "0");
    }

    #[test]
    fn negative_sign_outside_groups() {
        assert_eq!(format_integer(-123), "-123");
        assert_eq!(format_integer(-1234567), "-1,234,567");
        assert_eq!(format_integer(i64::MIN), "-9,223,372,036,854,775,808");
    }

    #[test]
    fn non_integers_pass_through() {
        assert_eq!(format_value(&json!(1.5)), json!(1.5));
        assert_eq!(format_value(&json!("x")), json!("x"));
        assert_eq!(format_value(&json!(true)), json!(true));
        assert_eq!(format_value(&json!(u64::MAX)), json!("18,446,744,073,709,551,615"));
    }

    #[test]
    fn last_marker_on_final_only() {
        let items = with_last_marker(vec![json!({ "name": "a" }), json!({ "name": "b" })]);
        assert_eq!(items[0].get("last"), None);
        assert_eq!(items[1]["last"], json!(true));
    }

    #[test]
    fn last_marker_empty() {
        assert!(with_last_marker(Vec::new()).is_empty());
    }
}
