//! Shared plumbing for option enums and validation.

use pdfops_types::{PdfOpsError, Result};

/// Implemented by every options type; checked before any network call.
pub trait Validate {
    /// Every rule the value breaks, in a stable order. Empty when valid.
    fn violations(&self) -> Vec<String>;

    /// # Errors
    ///
    /// Returns [`PdfOpsError::Validation`] listing all violations at once.
    fn validate(&self) -> Result<()> {
        let violations = self.violations();
        if violations.is_empty() {
            Ok(())
        } else {
            Err(PdfOpsError::Validation(violations))
        }
    }
}

/// Rejects empty or whitespace-only strings in builder setters.
pub(crate) fn non_empty(field: &str, value: impl Into<String>) -> Result<String> {
    let value = value.into();
    if value.trim().is_empty() {
        Err(PdfOpsError::validation(format!("{field} cannot be empty")))
    } else {
        Ok(value)
    }
}

/// Declares a closed enum with a fixed wire string per variant.
///
/// Generates serde (by wire string), `Display`, case-insensitive `FromStr`
/// returning a validation error that lists the allowed values, and `ALL`.
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $wire:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ::serde::Serialize, ::serde::Deserialize)]
        $vis enum $name {
            $( $(#[$vmeta])* #[serde(rename = $wire)] $variant ),+
        }

        impl $name {
            pub const ALL: &'static [Self] = &[$( Self::$variant ),+];

            #[must_use]
            pub fn as_str(self) -> &'static str {
                match self {
                    $( Self::$variant => $wire ),+
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = ::pdfops_types::PdfOpsError;

            fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
                let s = s.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str().eq_ignore_ascii_case(s))
                    .ok_or_else(|| {
                        let allowed: Vec<&str> = Self::ALL.iter().map(|v| v.as_str()).collect();
                        ::pdfops_types::PdfOpsError::validation(format!(
                            "invalid {} '{s}', expected one of: {}",
                            stringify!($name),
                            allowed.join(", ")
                        ))
                    })
            }
        }
    };
}

pub(crate) use wire_enum;
