use serde::{Deserialize, Serialize};

use super::ModelError;

/// Macro to generate enum with as_str + std::str::FromStr pattern
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

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

str_enum!(CandidateSource {
    Brand => "brand_name",
    Generic => "generic_name",
});

impl Default for CandidateSource {
    fn default() -> Self {
        Self::Generic
    }
}

str_enum!(Severity {
    High => "high",
    Medium => "medium",
    Low => "low",
    Unknown => "unknown",
});

impl Severity {
    /// Lenient parse for backend-supplied severities: case-insensitive,
    /// anything unrecognised becomes `Unknown` instead of failing the response.
    pub fn parse_lenient(raw: &str) -> Self {
        raw.trim().to_ascii_lowercase().parse().unwrap_or(Self::Unknown)
    }
}

str_enum!(FontSize {
    Small => "small",
    Normal => "normal",
    Large => "large",
    ExtraLarge => "x-large",
});

impl FontSize {
    /// CSS value applied to the page body.
    pub fn css_value(&self) -> &'static str {
        match self {
            Self::Small => "14px",
            Self::Normal => "16px",
            Self::Large => "20px",
            Self::ExtraLarge => "24px",
        }
    }
}

impl Default for FontSize {
    fn default() -> Self {
        Self::Normal
    }
}
