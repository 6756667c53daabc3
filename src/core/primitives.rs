use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::error::{DashboardError, DashboardResult};

pub fn decimal_to_f64(value: Decimal, field_name: &str) -> DashboardResult<f64> {
    value.to_f64().ok_or_else(|| {
        DashboardError::InvalidData(format!("{field_name} cannot be represented as f64"))
    })
}

/// Parses a currency-formatted amount such as `"$1,234.5"` or `"12 345 US$"`.
///
/// Every character outside `[0-9.-]` is stripped, then the longest leading
/// number is read, so `"1.2.3"` and `"$1.2-1.5"` both yield `1.2`. Returns
/// `None` when no digit leads the cleaned text.
#[must_use]
pub fn parse_currency_amount(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|ch| ch.is_ascii_digit() || *ch == '.' || *ch == '-')
        .collect();
    let number = leading_number(&cleaned)?;
    let value = match Decimal::from_str(&number) {
        Ok(value) => decimal_to_f64(value, "revenue").ok()?,
        Err(_) => number.parse::<f64>().ok()?,
    };
    value.is_finite().then_some(value)
}

/// Longest prefix of `text` shaped like `-?digits(.digits)?`, normalised so
/// the integer part is never empty and no dot trails.
fn leading_number(text: &str) -> Option<String> {
    let (sign, body) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text),
    };
    let integer_len = body.bytes().take_while(u8::is_ascii_digit).count();
    let (integer, rest) = body.split_at(integer_len);
    let fraction = rest
        .strip_prefix('.')
        .map(|tail| &tail[..tail.bytes().take_while(u8::is_ascii_digit).count()])
        .unwrap_or_default();
    if integer.is_empty() && fraction.is_empty() {
        return None;
    }
    let integer = if integer.is_empty() { "0" } else { integer };
    if fraction.is_empty() {
        Some(format!("{sign}{integer}"))
    } else {
        Some(format!("{sign}{integer}.{fraction}"))
    }
}

/// Parses the date formats seen in conflict exports (`2019-03-14`, `14 March 2019`).
#[must_use]
pub fn parse_event_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    ["%Y-%m-%d", "%d %B %Y", "%d-%b-%y", "%m/%d/%Y"]
        .into_iter()
        .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
}
