use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::ModelError;

/// Macro to generate enum with as_str + std::str::FromStr pattern.
///
/// Parsing is case-insensitive: model output is not trusted to match the
/// canonical casing exactly. Serde goes through the same pair of functions,
/// so the wire value is always the canonical string.
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = ModelError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let trimmed = s.trim();
                $(
                    if trimmed.eq_ignore_ascii_case($s) {
                        return Ok(Self::$variant);
                    }
                )+
                Err(ModelError::InvalidEnum {
                    field: stringify!($name).into(),
                    value: s.into(),
                })
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                raw.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

str_enum!(WarningKind {
    DrugDrug => "drug-drug",
    DrugDisease => "drug-disease",
});

str_enum!(Severity {
    Major => "Major",
    Moderate => "Moderate",
    Minor => "Minor",
});

str_enum!(FallbackReason {
    InferenceUnavailable => "inference_unavailable",
    MalformedModelOutput => "malformed_model_output",
});
