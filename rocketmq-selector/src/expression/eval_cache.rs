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

use crate::expression::value::Value;

/// Per-message memo of evaluated common subexpressions, keyed by `unique_id`.
///
/// A cache belongs to one pass over one message. Callers evaluating on several
/// threads give each thread its own cache; call [`clear`](Self::clear) before
/// reusing one for the next message.
#[derive(Debug, Default)]
pub struct EvalCache {
    values: HashMap<u32, Option<Value>, RandomState>,
}

impl EvalCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// `Some(result)` when the subexpression has already been evaluated.
    #[inline]
    pub fn get(&self, unique_id: u32) -> Option<&Option<Value>> {
        self.values.get(&unique_id)
    }

    #[inline]
    pub fn insert(&mut self, unique_id: u32, value: Option<Value>) {
        self.values.insert(unique_id, value);
    }

    #[inline]
    pub fn clear(&mut self) {
        self.values.clear();
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
