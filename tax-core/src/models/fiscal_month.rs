use chrono::Month;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

const MONTH_LABELS: [&str; 12] = [
    "1月", "2月", "3月", "4月", "5月", "6月", "7月", "8月", "9月", "10月", "11月", "12月",
];

/// The month in which an account's accounting year closes.
///
/// Stored on account records as a localized label (`"3月"`), handled
/// internally as a [`chrono::Month`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FiscalMonth(Month);

impl FiscalMonth {
    pub fn new(month: Month) -> Self {
        Self(month)
    }

    /// Resolves one of the twelve month labels. Anything else is `None`.
    pub fn from_label(label: &str) -> Option<Self> {
        let index = MONTH_LABELS.iter().position(|&l| l == label)?;
        Self::from_index(index as u32)
    }

    /// Zero-based: January is 0.
    pub fn from_index(index: u32) -> Option<Self> {
        Month::try_from(u8::try_from(index.checked_add(1)?).ok()?)
            .ok()
            .map(Self)
    }

    pub fn index(&self) -> u32 {
        self.0.number_from_month() - 1
    }

    pub fn label(&self) -> &'static str {
        MONTH_LABELS[self.index() as usize]
    }

    pub fn month(&self) -> Month {
        self.0
    }

    pub fn labels() -> &'static [&'static str; 12] {
        &MONTH_LABELS
    }
}

impl From<Month> for FiscalMonth {
    fn from(month: Month) -> Self {
        Self(month)
    }
}

impl std::fmt::Display for FiscalMonth {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for FiscalMonth {
    fn serialize<S: Serializer>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for FiscalMonth {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Self::from_label(&label)
            .ok_or_else(|| serde::de::Error::custom(format!("unrecognized fiscal month '{label}'")))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn labels_map_to_zero_based_indices() {
        for (expected, label) in MONTH_LABELS.iter().enumerate() {
            let month = FiscalMonth::from_label(label).unwrap();

            assert_eq!(month.index(), expected as u32);
            assert_eq!(month.label(), *label);
        }
    }

    #[test]
    fn march_is_index_two() {
        let month = FiscalMonth::from_label("3月").unwrap();

        assert_eq!(month.index(), 2);
        assert_eq!(month.month(), Month::March);
    }

    #[test]
    fn unknown_labels_do_not_resolve() {
        assert!(FiscalMonth::from_label("13月").is_none());
        assert!(FiscalMonth::from_label("").is_none());
        assert!(FiscalMonth::from_label("3").is_none());
        assert!(FiscalMonth::from_label(" 3月").is_none());
    }

    #[test]
    fn from_index_rejects_out_of_range() {
        assert_eq!(FiscalMonth::from_index(11).map(|m| m.month()), Some(Month::December));
        assert!(FiscalMonth::from_index(12).is_none());
    }
}
