use chrono::NaiveDate;
use rust_decimal::Decimal;

pub fn fmt_money(d: &Decimal) -> String {
    format!("{:.2}", d.round_dp(2))
}

/// Amount with the user's currency, e.g. `1250.00 TND`.
pub fn fmt_amount(d: &Decimal, currency: &str) -> String {
    format!("{} {currency}", fmt_money(d))
}

pub fn parse_money(s: &str) -> Option<Decimal> {
    let s = s.trim();
    Decimal::from_str_exact(s).ok().or_else(|| s.parse().ok())
}

/// `YYYY-MM-DD` or `YYYY/MM/DD`. Blank input means today.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return Some(today());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(s, "%Y/%m/%d"))
        .ok()
}

pub fn today() -> NaiveDate {
    chrono::Utc::now().date_naive()
}

pub fn blank_to_none(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn money_formatting() {
        let d: Decimal = "12.5".parse().unwrap();
        assert_eq!(fmt_money(&d), "12.50");
        assert_eq!(fmt_amount(&d, "TND"), "12.50 TND");
        assert_eq!(parse_money(" 3.75 "), Some("3.75".parse().unwrap()));
        assert_eq!(parse_money("abc"), None);
    }

    #[test]
    fn date_parsing() {
        assert_eq!(parse_date("2024-02-29"), NaiveDate::from_ymd_opt(2024, 2, 29));
        assert_eq!(parse_date("2024/02/29"), NaiveDate::from_ymd_opt(2024, 2, 29));
        assert_eq!(parse_date(""), Some(today()));
        assert_eq!(parse_date("29.02.2024"), None);
    }
}
