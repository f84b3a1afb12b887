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

use std::collections::HashMap;

use ahash::RandomState;
use cheetah_string::CheetahString;
use rocketmq_error::FilterResult;

use crate::constant::SelectorDomain;
use crate::constant::SelectorType;
use crate::expression::selector::Identifier;
use crate::expression::value::Value;

/// Prefix that addresses user properties for `SIMESSAGE` selectors.
pub const USER_PROPERTY_PREFIX: &str = "user.";

/// Access to the fields of the message being matched.
///
/// The evaluator asks the binding for the value of every identifier it meets.
/// `want` is the type the selector expects; a binding may use it to reject a
/// value of the wrong type by returning `Ok(None)`. The evaluator passes
/// [`SelectorType::Unknown`] in permissive mode and then coerces the value
/// itself. `context` is the node an XPath step is evaluated against, `None`
/// meaning the message root.
///
/// # Errors
///
/// A binding returns [`FilterError::BadMessageFormat`](rocketmq_error::FilterError)
/// when the message content cannot be read. The error fails only the
/// evaluation that asked for the field.
///
/// # Example
///
/// ```ignore
/// let mut message = MessageEvaluationContext::new();
/// message.put("region", "EU");
/// let value = message.get_field(&Identifier::new("region"), SelectorType::String, None)?;
/// assert_eq!(value, Some(Value::from("EU")));
/// ```
pub trait MessageBinding {
    fn get_field(
        &self,
        identifier: &Identifier,
        want: SelectorType,
        context: Option<&Value>,
    ) -> FilterResult<Option<Value>>;
}

/// Property map binding for message filtering.
///
/// Properties put with [`put`](Self::put) are stored as strings, the way they
/// travel on the wire; [`put_value`](Self::put_value) stores a typed value.
/// Lookups are domain aware: an `SIMESSAGE` identifier named `user.<name>`
/// addresses the user property `<name>`.
///
/// # Thread Safety
///
/// This structure is not thread-safe by itself. For concurrent access, wrap it in
/// `Arc<Mutex<MessageEvaluationContext>>` or similar synchronization primitives.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MessageEvaluationContext {
    #[serde(with = "hashmap_serde")]
    properties: HashMap<CheetahString, Value, RandomState>,
}

// Custom serde implementation for HashMap with RandomState
mod hashmap_serde {
    use super::*;
    use serde::Deserialize;
    use serde::Deserializer;
    use serde::Serialize;
    use serde::Serializer;

    pub fn serialize<S>(map: &HashMap<CheetahString, Value, RandomState>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let standard_map: HashMap<&CheetahString, &Value> = map.iter().collect();
        standard_map.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<HashMap<CheetahString, Value, RandomState>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let standard_map: HashMap<CheetahString, Value> = HashMap::deserialize(deserializer)?;
        let mut ahash_map = HashMap::with_hasher(RandomState::default());
        ahash_map.extend(standard_map);
        Ok(ahash_map)
    }
}

impl Default for MessageEvaluationContext {
    fn default() -> Self {
        Self {
            properties: HashMap::with_hasher(RandomState::default()),
        }
    }
}

impl MessageEvaluationContext {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            properties: HashMap::with_capacity_and_hasher(capacity, RandomState::default()),
        }
    }

    /// Builds a context from string properties, e.g. the user properties of a message.
    pub fn from_properties<I>(properties: I) -> Self
    where
        I: IntoIterator<Item = (CheetahString, CheetahString)>,
    {
        let mut context = Self::default();
        context.extend(properties);
        context
    }

    /// Sets a string property, returning the previous value.
    #[inline]
    pub fn put(&mut self, key: impl Into<CheetahString>, value: impl Into<CheetahString>) -> Option<Value> {
        self.properties.insert(key.into(), Value::String(value.into()))
    }

    /// Sets a typed property, returning the previous value.
    #[inline]
    pub fn put_value(&mut self, key: impl Into<CheetahString>, value: impl Into<Value>) -> Option<Value> {
        self.properties.insert(key.into(), value.into())
    }

    #[inline]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    #[inline]
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.properties.remove(key)
    }

    #[inline]
    pub fn contains_key(&self, key: &str) -> bool {
        self.properties.contains_key(key)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    #[inline]
    pub fn clear(&mut self) {
        self.properties.clear();
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&CheetahString, &Value)> {
        self.properties.iter()
    }

    pub fn extend<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = (CheetahString, CheetahString)>,
    {
        self.properties
            .extend(iter.into_iter().map(|(k, v)| (k, Value::String(v))));
    }

    fn property_name(identifier: &Identifier) -> &str {
        let name = identifier.name().as_str();
        match identifier.domain() {
            SelectorDomain::SiMessage => name.strip_prefix(USER_PROPERTY_PREFIX).unwrap_or(name),
            _ => name,
        }
    }
}

/// Drops a value whose type cannot satisfy `want`.
///
/// `UNKNOWN` accepts anything; the numeric types accept any number, `TOPIC`
/// accepts strings.
pub fn type_check(value: Value, want: SelectorType) -> Option<Value> {
    let accepted = match want {
        SelectorType::Unknown | SelectorType::Object | SelectorType::Child | SelectorType::Extension => true,
        SelectorType::Boolean => matches!(value, Value::Boolean(_)),
        SelectorType::String | SelectorType::Topic => matches!(value, Value::String(_)),
        SelectorType::Invalid => false,
        _ => matches!(value, Value::Number(_)),
    };
    accepted.then_some(value)
}

impl MessageBinding for MessageEvaluationContext {
    fn get_field(
        &self,
        identifier: &Identifier,
        want: SelectorType,
        _context: Option<&Value>,
    ) -> FilterResult<Option<Value>> {
        Ok(self
            .properties
            .get(Self::property_name(identifier))
            .cloned()
            .and_then(|v| type_check(v, want)))
    }
}
