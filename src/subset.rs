use std::{fmt, str::FromStr};

use thiserror::Error;

/// Selects which categories of elements a two-way merge emits.
///
/// Every element of a merge falls into one of three categories: it only
/// occurs in the first source, it only occurs in the second source, or it is
/// matched with an equivalent element of the other source (shared). A
/// `Subset` is a fixed combination of those categories.
///
/// The variants are declared in wire order, see [`Subset::ALL`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Subset {
    None,
    FirstWithoutSecond,
    SecondWithoutFirst,
    SymmetricDifference,
    Intersection,
    First,
    Second,
    Union,
    /// Union that keeps both members of every shared pair.
    #[default]
    Sum,
}

impl Subset {
    pub const ALL: [Subset; 9] = [
        Subset::None,
        Subset::FirstWithoutSecond,
        Subset::SecondWithoutFirst,
        Subset::SymmetricDifference,
        Subset::Intersection,
        Subset::First,
        Subset::Second,
        Subset::Union,
        Subset::Sum,
    ];

    /// `(exclusive to first, exclusive to second, shared)`
    pub const fn flags(self) -> (bool, bool, bool) {
        match self {
            Subset::None                => (false, false, false),
            Subset::FirstWithoutSecond  => (true,  false, false),
            Subset::SecondWithoutFirst  => (false, true,  false),
            Subset::SymmetricDifference => (true,  true,  false),
            Subset::Intersection        => (false, false, true),
            Subset::First               => (true,  false, true),
            Subset::Second              => (false, true,  true),
            Subset::Union               => (true,  true,  true),
            Subset::Sum                 => (true,  true,  true),
        }
    }

    /// Inverse of [`Subset::flags`]. All flags set maps to [`Subset::Union`];
    /// [`Subset::Sum`] is only reachable by name.
    pub const fn from_flags(
        exclusive_first: bool,
        exclusive_second: bool,
        shared: bool) -> Self
    {
        match (exclusive_first, exclusive_second, shared) {
            (false, false, false) => Subset::None,
            (true,  false, false) => Subset::FirstWithoutSecond,
            (false, true,  false) => Subset::SecondWithoutFirst,
            (true,  true,  false) => Subset::SymmetricDifference,
            (false, false, true)  => Subset::Intersection,
            (true,  false, true)  => Subset::First,
            (false, true,  true)  => Subset::Second,
            (true,  true,  true)  => Subset::Union,
        }
    }

    #[inline]
    pub const fn emits_exclusives_to_first(self) -> bool {
        self.flags().0
    }

    #[inline]
    pub const fn emits_exclusives_to_second(self) -> bool {
        self.flags().1
    }

    #[inline]
    pub const fn emits_shared(self) -> bool {
        self.flags().2
    }

    /// Whether a shared pair is emitted as both of its elements rather than
    /// a single representative.
    #[inline]
    pub const fn keeps_duplicates(self) -> bool {
        matches!(self, Subset::Sum)
    }

    /// Whether the single representative of a shared pair is taken from the
    /// second source. Only meaningful when [`Subset::emits_shared`] holds.
    #[inline]
    pub(crate) const fn shared_from_second(self) -> bool {
        matches!(self, Subset::Second)
    }

    /// Whether elements read from the first source can appear in the output.
    pub(crate) const fn emits_from_first(self) -> bool {
        self.emits_exclusives_to_first() ||
            (self.emits_shared() && !self.shared_from_second())
    }

    /// Whether elements read from the second source can appear in the output.
    pub(crate) const fn emits_from_second(self) -> bool {
        self.emits_exclusives_to_second() ||
            (self.emits_shared() && (self.shared_from_second() || self.keeps_duplicates()))
    }

    /// The subset selecting the same categories with the sources swapped.
    pub const fn mirrored(self) -> Self {
        match self {
            Subset::FirstWithoutSecond => Subset::SecondWithoutFirst,
            Subset::SecondWithoutFirst => Subset::FirstWithoutSecond,
            Subset::First  => Subset::Second,
            Subset::Second => Subset::First,
            other => other,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Subset::None                => "none",
            Subset::FirstWithoutSecond  => "firstWithoutSecond",
            Subset::SecondWithoutFirst  => "secondWithoutFirst",
            Subset::SymmetricDifference => "symmetricDifference",
            Subset::Intersection        => "intersection",
            Subset::First               => "first",
            Subset::Second              => "second",
            Subset::Union               => "union",
            Subset::Sum                 => "sum",
        }
    }
}

impl fmt::Display for Subset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown subset `{0}`")]
pub struct ParseSubsetError(String);

impl FromStr for Subset {
    type Err = ParseSubsetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Subset::ALL
            .into_iter()
            .find(|subset| subset.as_str() == s)
            .ok_or_else(|| ParseSubsetError(s.to_string()))
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Subset {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Subset {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = <String as serde::Deserialize>::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}
