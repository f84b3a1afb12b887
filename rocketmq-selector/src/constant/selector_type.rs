// Copyright 2023 The RocketMQ Rust Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

/// Static type tag carried by every selector node.
///
/// `Unknown` is a placeholder that is committed to a concrete type the first
/// time an operator asks whether the node "may be" of some type. `Numeric`
/// means "some number of unknown precision" and ranks above `Double`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SelectorType {
    Unknown,
    Boolean,
    String,
    Int,
    Long,
    Float,
    Double,
    Numeric,
    Topic,
    Child,
    Object,
    Invalid,
    Extension,
}

impl SelectorType {
    #[inline]
    pub fn is_numeric(self) -> bool {
        self.numeric_rank().is_some()
    }

    /// Position of a numeric type in the binary promotion order `INT < LONG < FLOAT < DOUBLE < NUMERIC`.
    #[inline]
    pub fn numeric_rank(self) -> Option<u8> {
        match self {
            SelectorType::Int => Some(0),
            SelectorType::Long => Some(1),
            SelectorType::Float => Some(2),
            SelectorType::Double => Some(3),
            SelectorType::Numeric => Some(4),
            _ => None,
        }
    }

    /// The wider of two numeric types, or `None` when either is not numeric.
    pub fn wider_numeric(self, other: SelectorType) -> Option<SelectorType> {
        let (l, r) = (self.numeric_rank()?, other.numeric_rank()?);
        Some(if l >= r { self } else { other })
    }

    /// Category used by `EQ`/`NE` typing: numeric subtypes collapse to `NUMERIC`, topics to `STRING`.
    #[inline]
    pub fn equality_category(self) -> SelectorType {
        if self.is_numeric() {
            SelectorType::Numeric
        } else if self == SelectorType::Topic {
            SelectorType::String
        } else {
            self
        }
    }

    /// One-letter code of the basic type category, used to key ordinal positions.
    pub fn category_code(self) -> char {
        match self {
            SelectorType::String => 'S',
            SelectorType::Boolean => 'B',
            SelectorType::Child => 'C',
            SelectorType::Topic => 'T',
            SelectorType::Unknown | SelectorType::Object => 'U',
            _ => 'N',
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            SelectorType::Unknown => "UNKNOWN",
            SelectorType::Boolean => "BOOLEAN",
            SelectorType::String => "STRING",
            SelectorType::Int => "INT",
            SelectorType::Long => "LONG",
            SelectorType::Float => "FLOAT",
            SelectorType::Double => "DOUBLE",
            SelectorType::Numeric => "NUMERIC",
            SelectorType::Topic => "TOPIC",
            SelectorType::Child => "CHILD",
            SelectorType::Object => "OBJECT",
            SelectorType::Invalid => "INVALID",
            SelectorType::Extension => "EXTENSION",
        }
    }
}

impl fmt::Display for SelectorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}
