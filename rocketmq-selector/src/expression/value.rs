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

//! Runtime values produced by selector evaluation.
//!
//! Evaluation is three-valued: every evaluation returns `Option<Value>` and
//! `None` is the *unknown* truth value. It doubles as the marker for a field
//! the message does not carry.

use std::cmp::Ordering;
use std::fmt;

use cheetah_string::CheetahString;
use serde::Deserialize;
use serde::Serialize;

use crate::constant::SelectorType;

/// A number with binary numeric promotion (`INT < LONG < FLOAT < DOUBLE`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum NumericValue {
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
}

/// Both operands of a binary numeric operation, widened to a common representation.
enum Promoted {
    Int(i32, i32),
    Long(i64, i64),
    Float(f32, f32),
    Double(f64, f64),
}

impl NumericValue {
    pub fn selector_type(&self) -> SelectorType {
        match self {
            NumericValue::Int(_) => SelectorType::Int,
            NumericValue::Long(_) => SelectorType::Long,
            NumericValue::Float(_) => SelectorType::Float,
            NumericValue::Double(_) => SelectorType::Double,
        }
    }

    #[inline]
    fn rank(&self) -> u8 {
        match self {
            NumericValue::Int(_) => 0,
            NumericValue::Long(_) => 1,
            NumericValue::Float(_) => 2,
            NumericValue::Double(_) => 3,
        }
    }

    pub fn as_i64(&self) -> i64 {
        match *self {
            NumericValue::Int(v) => v as i64,
            NumericValue::Long(v) => v,
            NumericValue::Float(v) => v as i64,
            NumericValue::Double(v) => v as i64,
        }
    }

    pub fn as_f64(&self) -> f64 {
        match *self {
            NumericValue::Int(v) => v as f64,
            NumericValue::Long(v) => v as f64,
            NumericValue::Float(v) => v as f64,
            NumericValue::Double(v) => v,
        }
    }

    fn as_f32(&self) -> f32 {
        match *self {
            NumericValue::Int(v) => v as f32,
            NumericValue::Long(v) => v as f32,
            NumericValue::Float(v) => v,
            NumericValue::Double(v) => v as f32,
        }
    }

    fn promote(&self, other: &NumericValue) -> Promoted {
        match self.rank().max(other.rank()) {
            0 => Promoted::Int(self.as_i64() as i32, other.as_i64() as i32),
            1 => Promoted::Long(self.as_i64(), other.as_i64()),
            2 => Promoted::Float(self.as_f32(), other.as_f32()),
            _ => Promoted::Double(self.as_f64(), other.as_f64()),
        }
    }

    /// Compares after promotion. `None` when either side is `NaN`.
    pub fn compare(&self, other: &NumericValue) -> Option<Ordering> {
        match self.promote(other) {
            Promoted::Int(a, b) => Some(a.cmp(&b)),
            Promoted::Long(a, b) => Some(a.cmp(&b)),
            Promoted::Float(a, b) => a.partial_cmp(&b),
            Promoted::Double(a, b) => a.partial_cmp(&b),
        }
    }

    /// Numeric equality after promotion, so `1 == 1L == 1.0`.
    #[inline]
    pub fn numeric_eq(&self, other: &NumericValue) -> bool {
        self.compare(other) == Some(Ordering::Equal)
    }

    pub fn add(&self, other: &NumericValue) -> NumericValue {
        match self.promote(other) {
            Promoted::Int(a, b) => NumericValue::Int(a.wrapping_add(b)),
            Promoted::Long(a, b) => NumericValue::Long(a.wrapping_add(b)),
            Promoted::Float(a, b) => NumericValue::Float(a + b),
            Promoted::Double(a, b) => NumericValue::Double(a + b),
        }
    }

    pub fn subtract(&self, other: &NumericValue) -> NumericValue {
        match self.promote(other) {
            Promoted::Int(a, b) => NumericValue::Int(a.wrapping_sub(b)),
            Promoted::Long(a, b) => NumericValue::Long(a.wrapping_sub(b)),
            Promoted::Float(a, b) => NumericValue::Float(a - b),
            Promoted::Double(a, b) => NumericValue::Double(a - b),
        }
    }

    pub fn multiply(&self, other: &NumericValue) -> NumericValue {
        match self.promote(other) {
            Promoted::Int(a, b) => NumericValue::Int(a.wrapping_mul(b)),
            Promoted::Long(a, b) => NumericValue::Long(a.wrapping_mul(b)),
            Promoted::Float(a, b) => NumericValue::Float(a * b),
            Promoted::Double(a, b) => NumericValue::Double(a * b),
        }
    }

    /// Integer division by zero has no value and yields `None`; floating point
    /// division follows IEEE 754.
    pub fn divide(&self, other: &NumericValue) -> Option<NumericValue> {
        match self.promote(other) {
            Promoted::Int(_, 0) | Promoted::Long(_, 0) => None,
            Promoted::Int(a, b) => Some(NumericValue::Int(a.wrapping_div(b))),
            Promoted::Long(a, b) => Some(NumericValue::Long(a.wrapping_div(b))),
            Promoted::Float(a, b) => Some(NumericValue::Float(a / b)),
            Promoted::Double(a, b) => Some(NumericValue::Double(a / b)),
        }
    }

    pub fn negate(&self) -> NumericValue {
        match *self {
            NumericValue::Int(v) => NumericValue::Int(v.wrapping_neg()),
            NumericValue::Long(v) => NumericValue::Long(v.wrapping_neg()),
            NumericValue::Float(v) => NumericValue::Float(-v),
            NumericValue::Double(v) => NumericValue::Double(-v),
        }
    }

    /// Parses message text into a number: integral text becomes a `Long`,
    /// anything with a fraction or exponent a `Double`.
    pub fn parse(text: &str) -> Option<NumericValue> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        if !text.contains(['.', 'e', 'E']) {
            if let Ok(v) = text.parse::<i64>() {
                return Some(NumericValue::Long(v));
            }
        }
        text.parse::<f64>().ok().map(NumericValue::Double)
    }
}

impl fmt::Display for NumericValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn float(f: &mut fmt::Formatter<'_>, v: f64, debug: String) -> fmt::Result {
            if v.is_infinite() {
                f.write_str(if v > 0.0 { "Infinity" } else { "-Infinity" })
            } else {
                f.write_str(&debug)
            }
        }
        match *self {
            NumericValue::Int(v) => write!(f, "{v}"),
            NumericValue::Long(v) => write!(f, "{v}"),
            NumericValue::Float(v) => float(f, v as f64, format!("{v:?}")),
            NumericValue::Double(v) => float(f, v, format!("{v:?}")),
        }
    }
}

/// Comparison category of a value, indexing the 4x4 compatibility table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueCategory {
    Number = 0,
    Boolean = 1,
    String = 2,
    Other = 3,
}

/// A known value. The unknown value is represented by `Option::None` around it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    String(CheetahString),
    Boolean(bool),
    Number(NumericValue),
    /// Anything a binding hands back that is not a string, boolean or number,
    /// e.g. a list of XPath nodes.
    Object(serde_json::Value),
}

impl Value {
    pub fn category(&self) -> ValueCategory {
        match self {
            Value::Number(_) => ValueCategory::Number,
            Value::Boolean(_) => ValueCategory::Boolean,
            Value::String(_) => ValueCategory::String,
            Value::Object(_) => ValueCategory::Other,
        }
    }

    pub fn selector_type(&self) -> SelectorType {
        match self {
            Value::String(_) => SelectorType::String,
            Value::Boolean(_) => SelectorType::Boolean,
            Value::Number(n) => n.selector_type(),
            Value::Object(_) => SelectorType::Object,
        }
    }

    #[inline]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    #[inline]
    pub fn as_number(&self) -> Option<&NumericValue> {
        match self {
            Value::Number(n) => Some(n),
            _ => None,
        }
    }

    /// Textual form used when a value is cast to a string.
    pub fn to_text(&self) -> String {
        match self {
            Value::String(s) => s.to_string(),
            Value::Boolean(b) => b.to_string(),
            Value::Number(n) => n.to_string(),
            Value::Object(serde_json::Value::String(s)) => s.clone(),
            Value::Object(o) => o.to_string(),
        }
    }

    /// Permissive cast to a number; only strings (and numbers) convert.
    pub fn coerce_to_number(&self) -> Option<NumericValue> {
        match self {
            Value::Number(n) => Some(*n),
            Value::String(s) => NumericValue::parse(s.as_str()),
            _ => None,
        }
    }

    /// Permissive cast to a boolean; only the strings `true`/`false` (any case) convert.
    pub fn coerce_to_boolean(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            Value::String(s) => {
                let s = s.as_str().trim();
                if s.eq_ignore_ascii_case("true") {
                    Some(true)
                } else if s.eq_ignore_ascii_case("false") {
                    Some(false)
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    /// Permissive cast to a string; numbers and booleans render, objects do not.
    pub fn coerce_to_string(&self) -> Option<CheetahString> {
        match self {
            Value::String(s) => Some(s.clone()),
            Value::Boolean(_) | Value::Number(_) => Some(CheetahString::from(self.to_text())),
            Value::Object(_) => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(CheetahString::from(v))
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(CheetahString::from(v))
    }
}

impl From<CheetahString> for Value {
    fn from(v: CheetahString) -> Self {
        Value::String(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Boolean(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Number(NumericValue::Int(v))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Number(NumericValue::Long(v))
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Number(NumericValue::Float(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Number(NumericValue::Double(v))
    }
}

impl From<NumericValue> for Value {
    fn from(v: NumericValue) -> Self {
        Value::Number(v)
    }
}
