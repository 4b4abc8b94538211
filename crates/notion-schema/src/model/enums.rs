//! Closed enumerations of the wire format.
//!
//! Each enumeration is declared once through [`closed_enum!`], which
//! generates the Rust enum, the wire-name table, the reverse lookup used
//! while parsing, and the serde impls. Parse and serialize therefore
//! always agree on the member set.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ErrorKind;

/// An enumeration with a fixed set of wire names.
pub trait WireEnum: Copy + Sized + 'static {
    /// Name used in `UnknownEnumValue` errors.
    const NAME: &'static str;

    /// Every member, in declaration order.
    fn all() -> &'static [Self];

    /// Wire representation of this member.
    fn as_str(self) -> &'static str;

    /// Looks up a member by its wire representation.
    fn from_wire(s: &str) -> Option<Self>;

    /// Like [`from_wire`](Self::from_wire), reporting unknown values.
    fn parse_wire(s: &str) -> Result<Self, ErrorKind> {
        Self::from_wire(s).ok_or_else(|| ErrorKind::UnknownEnumValue {
            enum_name: Self::NAME,
            value: s.to_string(),
        })
    }
}

macro_rules! closed_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident as $wire_name:literal {
            $( $(#[$vmeta:meta])* $variant:ident => $wire:literal, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        $vis enum $name {
            $( $(#[$vmeta])* $variant, )+
        }

        impl $name {
            /// Every member, in declaration order.
            pub const ALL: &'static [$name] = &[ $( $name::$variant, )+ ];

            /// Wire representation of this member.
            pub fn as_str(self) -> &'static str {
                match self {
                    $( $name::$variant => $wire, )+
                }
            }

            /// Looks up a member by its wire representation.
            pub fn from_wire(s: &str) -> Option<$name> {
                ::lazy_static::lazy_static! {
                    static ref LOOKUP: ::rustc_hash::FxHashMap<&'static str, $name> =
                        $name::ALL.iter().map(|v| (v.as_str(), *v)).collect();
                }
                LOOKUP.get(s).copied()
            }
        }

        impl $crate::model::enums::WireEnum for $name {
            const NAME: &'static str = $wire_name;

            fn all() -> &'static [Self] {
                $name::ALL
            }

            fn as_str(self) -> &'static str {
                $name::as_str(self)
            }

            fn from_wire(s: &str) -> Option<Self> {
                $name::from_wire(s)
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.pad(self.as_str())
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = $crate::error::ErrorKind;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                <$name as $crate::model::enums::WireEnum>::parse_wire(s)
            }
        }

        impl ::serde::Serialize for $name {
            fn serialize<S: ::serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> ::serde::Deserialize<'de> for $name {
            fn deserialize<D: ::serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = <::std::borrow::Cow<'de, str> as ::serde::Deserialize>::deserialize(deserializer)?;
                s.parse().map_err(<D::Error as ::serde::de::Error>::custom)
            }
        }
    };
}

pub(crate) use closed_enum;

closed_enum! {
    /// Foreground colors for select options and text.
    pub enum Color as "Color" {
        Default => "default",
        Gray => "gray",
        Brown => "brown",
        Orange => "orange",
        Yellow => "yellow",
        Green => "green",
        Blue => "blue",
        Purple => "purple",
        Pink => "pink",
        Red => "red",
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::Default
    }
}

closed_enum! {
    /// Background highlight colors for text.
    pub enum BackgroundColor as "BackgroundColor" {
        Blue => "blue_background",
        Brown => "brown_background",
        Gray => "gray_background",
        Green => "green_background",
        Orange => "orange_background",
        Pink => "pink_background",
        Purple => "purple_background",
        Red => "red_background",
        Yellow => "yellow_background",
    }
}

/// The `color` annotation of a rich-text span: a foreground or a
/// background color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnnotationColor {
    Text(Color),
    Background(BackgroundColor),
}

impl AnnotationColor {
    pub fn as_str(self) -> &'static str {
        match self {
            AnnotationColor::Text(c) => c.as_str(),
            AnnotationColor::Background(c) => c.as_str(),
        }
    }

    pub fn from_wire(s: &str) -> Option<AnnotationColor> {
        Color::from_wire(s)
            .map(AnnotationColor::Text)
            .or_else(|| BackgroundColor::from_wire(s).map(AnnotationColor::Background))
    }

    /// Every member: the foreground colors followed by the backgrounds.
    pub fn iter() -> impl Iterator<Item = AnnotationColor> {
        Color::ALL
            .iter()
            .copied()
            .map(AnnotationColor::Text)
            .chain(BackgroundColor::ALL.iter().copied().map(AnnotationColor::Background))
    }

    pub fn is_background(self) -> bool {
        matches!(self, AnnotationColor::Background(_))
    }
}

impl Default for AnnotationColor {
    fn default() -> Self {
        AnnotationColor::Text(Color::Default)
    }
}

impl From<Color> for AnnotationColor {
    fn from(color: Color) -> Self {
        AnnotationColor::Text(color)
    }
}

impl From<BackgroundColor> for AnnotationColor {
    fn from(color: BackgroundColor) -> Self {
        AnnotationColor::Background(color)
    }
}

impl fmt::Display for AnnotationColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl std::str::FromStr for AnnotationColor {
    type Err = ErrorKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_wire(s).ok_or_else(|| ErrorKind::UnknownEnumValue {
            enum_name: "AnnotationColor",
            value: s.to_string(),
        })
    }
}

impl Serialize for AnnotationColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for AnnotationColor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = std::borrow::Cow::<'de, str>::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

closed_enum! {
    /// Display format of a number property.
    pub enum NumberFormat as "NumberFormat" {
        ArgentinePeso => "argentine_peso",
        Baht => "baht",
        CanadianDollar => "canadian_dollar",
        ChileanPeso => "chilean_peso",
        ColombianPeso => "colombian_peso",
        DanishKrone => "danish_krone",
        Dirham => "dirham",
        Dollar => "dollar",
        Euro => "euro",
        Forint => "forint",
        Franc => "franc",
        HongKongDollar => "hong_kong_dollar",
        Koruna => "koruna",
        Krona => "krona",
        Leu => "leu",
        Lira => "lira",
        MexicanPeso => "mexican_peso",
        NewTaiwanDollar => "new_taiwan_dollar",
        NewZealandDollar => "new_zealand_dollar",
        NorwegianKrone => "norwegian_krone",
        Number => "number",
        NumberWithCommas => "number_with_commas",
        Percent => "percent",
        PhilippinePeso => "philippine_peso",
        Pound => "pound",
        PeruvianSol => "peruvian_sol",
        Rand => "rand",
        Real => "real",
        Ringgit => "ringgit",
        Riyal => "riyal",
        Ruble => "ruble",
        Rupee => "rupee",
        Rupiah => "rupiah",
        Shekel => "shekel",
        SingaporeDollar => "singapore_dollar",
        UruguayanPeso => "uruguayan_peso",
        Yen => "yen",
        Yuan => "yuan",
        Won => "won",
        Zloty => "zloty",
    }
}

impl NumberFormat {
    /// True for the formats that render a currency symbol.
    pub fn is_currency(self) -> bool {
        !matches!(
            self,
            NumberFormat::Number | NumberFormat::NumberWithCommas | NumberFormat::Percent
        )
    }
}

closed_enum! {
    /// Aggregation applied by a rollup property.
    pub enum RollupFunction as "RollupFunction" {
        Average => "average",
        Checked => "checked",
        CountPerGroup => "count_per_group",
        Count => "count",
        CountValues => "count_values",
        DateRange => "date_range",
        EarliestDate => "earliest_date",
        Empty => "empty",
        LatestDate => "latest_date",
        Max => "max",
        Median => "median",
        Min => "min",
        NotEmpty => "not_empty",
        PercentChecked => "percent_checked",
        PercentEmpty => "percent_empty",
        PercentNotEmpty => "percent_not_empty",
        PercentPerGroup => "percent_per_group",
        PercentUnchecked => "percent_unchecked",
        Range => "range",
        Unchecked => "unchecked",
        Unique => "unique",
        ShowOriginal => "show_original",
        ShowUnique => "show_unique",
        Sum => "sum",
    }
}

closed_enum! {
    /// Relative date tokens of a template mention.
    pub enum TemplateMentionDate as "TemplateMentionDate" {
        Today => "today",
        Now => "now",
    }
}
