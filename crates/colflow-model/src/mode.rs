use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Logical type of a column.
///
/// `DateTime`, `Month` and `Day` share [`DataType::DateTime`] storage and only differ in how
/// values are displayed and which conversions they accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnMode {
    Numeric,
    Integer,
    BigInt,
    Text,
    DateTime,
    Month,
    Day,
}

/// Physical storage kind backing a [`ColumnMode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataType {
    Double,
    Integer,
    BigInt,
    Text,
    DateTime,
}

impl ColumnMode {
    pub const ALL: [ColumnMode; 7] = [
        ColumnMode::Numeric,
        ColumnMode::Integer,
        ColumnMode::BigInt,
        ColumnMode::Text,
        ColumnMode::DateTime,
        ColumnMode::Month,
        ColumnMode::Day,
    ];

    pub fn data_type(self) -> DataType {
        match self {
            ColumnMode::Numeric => DataType::Double,
            ColumnMode::Integer => DataType::Integer,
            ColumnMode::BigInt => DataType::BigInt,
            ColumnMode::Text => DataType::Text,
            ColumnMode::DateTime | ColumnMode::Month | ColumnMode::Day => DataType::DateTime,
        }
    }

    /// Modes holding numbers.
    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            ColumnMode::Numeric | ColumnMode::Integer | ColumnMode::BigInt
        )
    }

    /// Modes a plot can use as an axis.
    pub fn is_plottable(self) -> bool {
        !matches!(self, ColumnMode::Text)
    }

    /// Stable identifier used in saved documents.
    pub fn as_str(self) -> &'static str {
        match self {
            ColumnMode::Numeric => "Numeric",
            ColumnMode::Integer => "Integer",
            ColumnMode::BigInt => "BigInt",
            ColumnMode::Text => "Text",
            ColumnMode::DateTime => "DateTime",
            ColumnMode::Month => "Month",
            ColumnMode::Day => "Day",
        }
    }

    /// Human readable name.
    pub fn display_name(self) -> &'static str {
        match self {
            ColumnMode::Numeric => "Double",
            ColumnMode::Integer => "Integer",
            ColumnMode::BigInt => "Big Integer",
            ColumnMode::Text => "Text",
            ColumnMode::DateTime => "Date and Time",
            ColumnMode::Month => "Month Names",
            ColumnMode::Day => "Day Names",
        }
    }
}

impl fmt::Display for ColumnMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a mode or plot designation name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} `{name}`")]
pub struct UnknownNameError {
    pub kind: &'static str,
    pub name: String,
}

impl FromStr for ColumnMode {
    type Err = UnknownNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ColumnMode::ALL
            .into_iter()
            .find(|mode| mode.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownNameError {
                kind: "column mode",
                name: s.to_string(),
            })
    }
}

/// Role of a column in a plot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlotDesignation {
    #[default]
    None,
    X,
    Y,
    Z,
    XError,
    YError,
}

impl PlotDesignation {
    pub const ALL: [PlotDesignation; 6] = [
        PlotDesignation::None,
        PlotDesignation::X,
        PlotDesignation::Y,
        PlotDesignation::Z,
        PlotDesignation::XError,
        PlotDesignation::YError,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PlotDesignation::None => "None",
            PlotDesignation::X => "X",
            PlotDesignation::Y => "Y",
            PlotDesignation::Z => "Z",
            PlotDesignation::XError => "xErr",
            PlotDesignation::YError => "yErr",
        }
    }

    /// Suffix shown after a column name in table headers (`[X]`, `[yEr]`, or nothing).
    pub fn header_suffix(self) -> &'static str {
        match self {
            PlotDesignation::None => "",
            PlotDesignation::X => "[X]",
            PlotDesignation::Y => "[Y]",
            PlotDesignation::Z => "[Z]",
            PlotDesignation::XError => "[xEr]",
            PlotDesignation::YError => "[yEr]",
        }
    }
}

impl fmt::Display for PlotDesignation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlotDesignation {
    type Err = UnknownNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PlotDesignation::ALL
            .into_iter()
            .find(|pd| pd.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownNameError {
                kind: "plot designation",
                name: s.to_string(),
            })
    }
}
