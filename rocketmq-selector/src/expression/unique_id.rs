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

use crate::expression::selector::Selector;

/// Gives structurally equal subexpressions one shared, non-zero `unique_id`.
///
/// Only operator subtrees over two or more identifiers are numbered: a single
/// identifier is cheap to refetch, and identifier-free subtrees are folded
/// away. Extended (XPath) subtrees are skipped since their values depend on
/// the context node. Ids stay stable for the lifetime of the assigner, so
/// selectors compiled through one assigner can share an
/// [`EvalCache`](crate::expression::eval_cache::EvalCache) per message.
#[derive(Debug, Default)]
pub struct UniqueIdAssigner {
    ids: HashMap<String, u32, RandomState>,
}

impl UniqueIdAssigner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn assign(&mut self, selector: &mut Selector) {
        selector.operands_mut().iter_mut().for_each(|s| self.assign(s));
        if selector.num_identifiers() < 2 || selector.is_extended() || selector.as_operator().is_none() {
            return;
        }
        let key = selector.to_string();
        let next = self.ids.len() as u32 + 1;
        let id = *self.ids.entry(key).or_insert(next);
        selector.set_unique_id(id);
    }

    /// Number of distinct subexpressions numbered so far.
    #[inline]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
