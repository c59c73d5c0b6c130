use serde::{Deserialize, Serialize};

use super::ModelError;

/// Macro to generate enum with as_str + std::str::FromStr pattern.
/// The string form doubles as the serde representation.
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $s)] $variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = ModelError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(ModelError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }
    };
}

str_enum!(HistoryStatus {
    Current => "current",
    Resolved => "resolved",
    Chronic => "chronic",
});

str_enum!(HistorySeverity {
    Mild => "mild",
    Moderate => "moderate",
    Severe => "severe",
});

str_enum!(Frequency {
    Once => "once",
    Twice => "twice",
    Thrice => "thrice",
    FourTimes => "four-times",
    AsNeeded => "as-needed",
});

str_enum!(UrgencyCategory {
    Urgent => "urgent",
    Monitor => "monitor",
    Routine => "routine",
});

str_enum!(UrgencyLevel {
    Low => "low",
    Medium => "medium",
    High => "high",
});

impl Frequency {
    /// Number of scheduled times of day this frequency implies.
    pub fn dose_count(&self) -> usize {
        match self {
            Self::Once | Self::AsNeeded => 1,
            Self::Twice => 2,
            Self::Thrice => 3,
            Self::FourTimes => 4,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Once => "Once daily",
            Self::Twice => "Twice daily",
            Self::Thrice => "Three times daily",
            Self::FourTimes => "Four times daily",
            Self::AsNeeded => "As needed",
        }
    }
}

impl Default for Frequency {
    fn default() -> Self {
        Self::Once
    }
}

impl Default for HistoryStatus {
    fn default() -> Self {
        Self::Current
    }
}

impl Default for HistorySeverity {
    fn default() -> Self {
        Self::Mild
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn frequency_round_trip() {
        for (variant, s) in [
            (Frequency::Once, "once"),
            (Frequency::Twice, "twice"),
            (Frequency::Thrice, "thrice"),
            (Frequency::FourTimes, "four-times"),
            (Frequency::AsNeeded, "as-needed"),
        ] {
            assert_eq!(variant.as_str(), s);
            assert_eq!(Frequency::from_str(s).unwrap(), variant);
            assert_eq!(serde_json::to_string(&variant).unwrap(), format!("\"{s}\""));
        }
    }

    #[test]
    fn frequency_dose_counts() {
        assert_eq!(Frequency::Once.dose_count(), 1);
        assert_eq!(Frequency::Twice.dose_count(), 2);
        assert_eq!(Frequency::Thrice.dose_count(), 3);
        assert_eq!(Frequency::FourTimes.dose_count(), 4);
        assert_eq!(Frequency::AsNeeded.dose_count(), 1);
    }

    #[test]
    fn history_enums_use_lowercase_labels() {
        assert_eq!(HistoryStatus::Chronic.to_string(), "chronic");
        assert_eq!(HistorySeverity::from_str("severe").unwrap(), HistorySeverity::Severe);
        let status: HistoryStatus = serde_json::from_str("\"resolved\"").unwrap();
        assert_eq!(status, HistoryStatus::Resolved);
    }

    #[test]
    fn invalid_enum_returns_error() {
        assert!(Frequency::from_str("daily").is_err());
        assert!(UrgencyLevel::from_str("critical").is_err());
        assert!(HistoryStatus::from_str("").is_err());
    }
}
