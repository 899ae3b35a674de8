//! Macro for implementing Display and FromStr for labelled enums
//!
//! Daybook stores several small enums (weekdays, activity status) as their
//! human-facing label. This macro generates both directions of that mapping:
//! `Display` renders the canonical label and `FromStr` accepts any casing
//! with surrounding whitespace trimmed.
//!
//! # Example
//!
//! ```rust
//! use daybook_domain::impl_label_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Shift {
//!     Early,
//!     Late,
//! }
//!
//! impl_label_conversions!(Shift {
//!     Early => "Early",
//!     Late => "Late Shift",
//! });
//!
//! assert_eq!("late shift".parse::<Shift>().unwrap(), Shift::Late);
//! assert_eq!(Shift::Early.to_string(), "Early");
//! ```

/// Implements Display and FromStr traits for labelled enums
///
/// # Arguments
///
/// * `$enum_name` - The name of the enum type
/// * `$variant => $label` - Mapping of enum variants to their canonical label
#[macro_export]
macro_rules! impl_label_conversions {
    ($enum_name:ident { $($variant:ident => $label:expr),+ $(,)? }) => {
        impl $enum_name {
            /// Canonical label for this variant.
            pub fn label(&self) -> &'static str {
                match self {
                    $(Self::$variant => $label,)+
                }
            }
        }

        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.label())
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = s.trim().to_lowercase();
                $(
                    if wanted == $label.to_lowercase() {
                        return Ok(Self::$variant);
                    }
                )+
                Err(format!("Invalid {}: {}", stringify!($enum_name), s))
            }
        }
    };
}
