use std::borrow::Borrow;
use std::fmt;

use chrono::NaiveDateTime;

/// Classification axes. A single code may belong to any combination of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    ReportableCrime,
    ViolentOrWeapon,
    Murder,
}

impl Category {
    pub const ALL: [Category; 3] = [
        Category::ReportableCrime,
        Category::ViolentOrWeapon,
        Category::Murder,
    ];

    /// Position in the per-month count array.
    pub fn index(&self) -> usize {
        match self {
            Self::ReportableCrime => 0,
            Self::ViolentOrWeapon => 1,
            Self::Murder => 2,
        }
    }

    /// Output column header.
    pub fn column(&self) -> &'static str {
        match self {
            Self::ReportableCrime => "FA_Crimes",
            Self::ViolentOrWeapon => "Violations",
            Self::Murder => "Murders",
        }
    }
}

const CODE_WIDTH: usize = 4;

/// IUCR code left-padded with zeros to four characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CodeKey(String);

impl CodeKey {
    pub fn normalize(raw: &str) -> Self {
        let len = raw.chars().count();
        if len >= CODE_WIDTH {
            return Self(raw.to_string());
        }
        let mut key = "0".repeat(CODE_WIDTH - len);
        key.push_str(raw);
        Self(key)
    }

    #[cfg(test)]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for CodeKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Calendar month as `YYYY-MM`. The default key is empty and never reported.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MonthKey(String);

impl MonthKey {
    pub fn from_datetime(dt: &NaiveDateTime) -> Self {
        Self(dt.format("%Y-%m").to_string())
    }

    /// Month of the zero timestamp (`0001-01-01 00:00:00`), used for rows whose date failed to parse.
    pub fn zero_time() -> Self {
        Self("0001-01".to_string())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[cfg(test)]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_code_key_pads_short_codes() {
        assert_eq!(CodeKey::normalize("5").as_str(), "0005");
        assert_eq!(CodeKey::normalize("110").as_str(), "0110");
        assert_eq!(CodeKey::normalize("").as_str(), "0000");
    }

    #[test]
    fn test_code_key_padding_collides() {
        assert_eq!(CodeKey::normalize("5"), CodeKey::normalize("0005"));
        assert_eq!(CodeKey::normalize("110"), CodeKey::normalize("0110"));
    }

    #[test]
    fn test_code_key_keeps_wide_codes() {
        assert_eq!(CodeKey::normalize("041A").as_str(), "041A");
        assert_eq!(CodeKey::normalize("12345").as_str(), "12345");
        assert_eq!(CodeKey::normalize("31A").as_str(), "031A");
    }

    #[test]
    fn test_month_key_truncates_to_month() {
        let dt = NaiveDate::from_ymd_opt(2015, 1, 15)
            .unwrap()
            .and_hms_opt(20, 0, 0)
            .unwrap();
        assert_eq!(MonthKey::from_datetime(&dt).as_str(), "2015-01");
    }

    #[test]
    fn test_month_keys_sort_chronologically() {
        let mut months = vec![
            MonthKey("2015-10".into()),
            MonthKey("2014-12".into()),
            MonthKey("2015-02".into()),
        ];
        months.sort();
        let sorted: Vec<&str> = months.iter().map(|m| m.as_str()).collect();
        assert_eq!(sorted, vec!["2014-12", "2015-02", "2015-10"]);
    }

    #[test]
    fn test_zero_time_month_sorts_first() {
        let mut months = vec![MonthKey("2015-01".into()), MonthKey::zero_time()];
        months.sort();
        assert_eq!(months[0].as_str(), "0001-01");
        assert!(!MonthKey::zero_time().is_empty());
        assert!(MonthKey::default().is_empty());
    }

    #[test]
    fn test_category_columns() {
        let cols: Vec<&str> = Category::ALL.iter().map(|c| c.column()).collect();
        assert_eq!(cols, vec!["FA_Crimes", "Violations", "Murders"]);
        for (i, c) in Category::ALL.iter().enumerate() {
            assert_eq!(c.index(), i);
        }
    }
}
