use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Calculated due date for a filing.
///
/// Date-only, so it can never drift across a timezone boundary. Displays and
/// serializes as `YYYY-MM-DD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FilingDeadline(NaiveDate);

impl FilingDeadline {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    pub fn parse(s: &str) -> Option<Self> {
        NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).ok().map(Self)
    }
}

impl From<NaiveDate> for FilingDeadline {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl std::fmt::Display for FilingDeadline {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        write!(f, "{}", self.0.format(DATE_FORMAT))
    }
}

impl Serialize for FilingDeadline {
    fn serialize<S: Serializer>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for FilingDeadline {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).ok_or_else(|| serde::de::Error::custom(format!("invalid date '{s}'")))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn formats_zero_padded() {
        let deadline = FilingDeadline::new(NaiveDate::from_ymd_opt(2025, 3, 5).unwrap());

        assert_eq!(deadline.to_string(), "2025-03-05");
    }

    #[test]
    fn parse_accepts_iso_dates_only() {
        assert_eq!(
            FilingDeadline::parse("2024-05-31").map(|d| d.date()),
            NaiveDate::from_ymd_opt(2024, 5, 31)
        );
        assert!(FilingDeadline::parse("2024/05/31").is_none());
        assert!(FilingDeadline::parse("2024-02-30").is_none());
    }
}
