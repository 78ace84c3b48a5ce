use serde::Deserialize;

/// Comparison operator carried by a [`Filter`](super::Filter).
///
/// The wire format is the numeric code used by callers (0 through 15). Unknown
/// codes map to [`FilterOperator::Fallback`], which behaves like a substring
/// match for single values and a set-membership test for multiple values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(from = "u8")]
pub enum FilterOperator {
    /// `=` for a single value, `IN` for multiple values (code 0)
    Equal,
    /// `<>` (code 1)
    NotEqual,
    /// `<` (code 2)
    LessThan,
    /// `<=` (code 3)
    LessThanOrEqual,
    /// `>` (code 4)
    GreaterThan,
    /// `>= ANY` for multiple values, `>=` plus not-null for one (code 5)
    GreaterThanOrEqual,
    /// case-insensitive substring match (code 6)
    Contains,
    /// negated substring match (code 7)
    NotContains,
    /// case-insensitive prefix match (code 8)
    StartsWith,
    /// negated prefix match (code 9)
    NotStartsWith,
    /// case-insensitive suffix match (code 10)
    EndsWith,
    /// negated suffix match (code 11)
    NotEndsWith,
    /// membership test on an array-typed column (code 12)
    ArrayContains,
    /// overlap test on an array-typed column (code 13)
    ArrayOverlap,
    /// raw substring test against the column's textual serialization (code 14)
    SerializedContains,
    /// splice caller-supplied raw predicate fragments (code 15)
    Custom,
    /// default behavior for unrecognized codes
    Fallback,
}

impl FilterOperator {
    pub fn from_code(code: u8) -> Self {
        match code {
            0 => Self::Equal,
            1 => Self::NotEqual,
            2 => Self::LessThan,
            3 => Self::LessThanOrEqual,
            4 => Self::GreaterThan,
            5 => Self::GreaterThanOrEqual,
            6 => Self::Contains,
            7 => Self::NotContains,
            8 => Self::StartsWith,
            9 => Self::NotStartsWith,
            10 => Self::EndsWith,
            11 => Self::NotEndsWith,
            12 => Self::ArrayContains,
            13 => Self::ArrayOverlap,
            14 => Self::SerializedContains,
            15 => Self::Custom,
            _ => Self::Fallback,
        }
    }
}

impl From<u8> for FilterOperator {
    fn from(code: u8) -> Self {
        Self::from_code(code)
    }
}
