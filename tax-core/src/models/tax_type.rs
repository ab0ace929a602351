use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Filing category selected for a tax case.
///
/// The four named variants are the entries of the selection menu. Any other
/// label is carried verbatim in [`TaxType::Other`] and follows the corporate
/// tax deadline rule.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TaxType {
    CorporateTax,
    ConsumptionTax,
    IncomeTax,
    InheritanceTax,
    Other(String),
}

const MENU_LABELS: [&str; 4] = ["法人税", "消費税", "所得税", "相続税"];

/// One entry of the tax-type selection menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TaxTypeOption {
    pub label: &'static str,
    pub value: &'static str,
}

impl TaxType {
    /// The menu variants, in display order.
    pub fn all() -> [TaxType; 4] {
        [
            Self::CorporateTax,
            Self::ConsumptionTax,
            Self::IncomeTax,
            Self::InheritanceTax,
        ]
    }

    /// Localized label, which is also the value stored on a tax case.
    pub fn label(&self) -> &str {
        match self {
            Self::CorporateTax => MENU_LABELS[0],
            Self::ConsumptionTax => MENU_LABELS[1],
            Self::IncomeTax => MENU_LABELS[2],
            Self::InheritanceTax => MENU_LABELS[3],
            Self::Other(label) => label,
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            Self::CorporateTax => "Corporate tax",
            Self::ConsumptionTax => "Consumption tax",
            Self::IncomeTax => "Income tax",
            Self::InheritanceTax => "Inheritance tax",
            Self::Other(label) => label,
        }
    }

    /// Never fails: unknown labels become [`TaxType::Other`].
    pub fn from_label(label: &str) -> Self {
        match label {
            "法人税" => Self::CorporateTax,
            "消費税" => Self::ConsumptionTax,
            "所得税" => Self::IncomeTax,
            "相続税" => Self::InheritanceTax,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, Self::Other(_))
    }

    pub fn options() -> Vec<TaxTypeOption> {
        MENU_LABELS
            .iter()
            .map(|&label| TaxTypeOption {
                label,
                value: label,
            })
            .collect()
    }
}

impl std::fmt::Display for TaxType {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for TaxType {
    fn serialize<S: Serializer>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for TaxType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Ok(Self::from_label(&label))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn labels_round_trip_for_menu_variants() {
        for tax_type in TaxType::all() {
            assert_eq!(TaxType::from_label(tax_type.label()), tax_type);
        }
    }

    #[test]
    fn unknown_label_falls_back_to_other() {
        let tax_type = TaxType::from_label("贈与税");

        assert_eq!(tax_type, TaxType::Other("贈与税".to_string()));
        assert_eq!(tax_type.label(), "贈与税");
        assert!(!tax_type.is_recognized());
    }

    #[test]
    fn options_follow_menu_order() {
        let labels: Vec<_> = TaxType::options().iter().map(|o| o.label).collect();

        assert_eq!(labels, vec!["法人税", "消費税", "所得税", "相続税"]);
        assert!(TaxType::options().iter().all(|o| o.label == o.value));
    }

    #[test]
    fn display_uses_localized_label() {
        assert_eq!(TaxType::IncomeTax.to_string(), "所得税");
        assert_eq!(TaxType::IncomeTax.display_name(), "Income tax");
    }
}
