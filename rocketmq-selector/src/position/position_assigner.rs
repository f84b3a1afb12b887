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
use tracing::trace;

use crate::expression::selector::Identifier;
use crate::position::ordinal_position::OrdinalPosition;

/// Positions handed out within one level.
#[derive(Debug, Default)]
struct LevelPositions {
    next: u32,
    assigned: HashMap<String, u32, RandomState>,
}

/// Assigns ordinal positions to identifiers.
///
/// Positions are keyed by the identifier's basic type category and full name
/// within the identifier's level (its `step`). The same `(category, full name,
/// step)` always receives the same position for the lifetime of the
/// assigner; distinct keys at one level never collide. Assignment is
/// append-only.
///
/// # Thread Safety
///
/// The assigner is plain mutable state with no synchronization of its own.
/// When several selectors are compiled concurrently against one assigner, the
/// caller must serialize access, e.g. by holding a
/// `parking_lot::Mutex<PositionAssigner>` for the duration of each
/// registration.
#[derive(Debug, Default)]
pub struct PositionAssigner {
    levels: HashMap<u32, LevelPositions, RandomState>,
}

impl PositionAssigner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assigns (or looks up) the position of `identifier` and writes it back onto it.
    pub fn assign(&mut self, identifier: &mut Identifier) -> OrdinalPosition {
        let level = identifier.step();
        let key = Self::classification_key(identifier);
        let positions = self.levels.entry(level).or_default();
        let minor = match positions.assigned.get(&key) {
            Some(minor) => *minor,
            None => {
                let minor = positions.next;
                positions.next += 1;
                trace!("assigned ordinal position {}.{} to {}", level, minor, key);
                positions.assigned.insert(key, minor);
                minor
            }
        };
        let position = OrdinalPosition::new(level, minor);
        identifier.set_ordinal_position(position);
        position
    }

    fn classification_key(identifier: &Identifier) -> String {
        let mut key = String::with_capacity(identifier.full_name().len() + 1);
        key.push(identifier.ty().category_code());
        key.push_str(identifier.full_name().as_str());
        key
    }

    /// Number of distinct positions handed out at `level`.
    pub fn positions_at(&self, level: u32) -> usize {
        self.levels.get(&level).map_or(0, |l| l.assigned.len())
    }

    pub fn is_empty(&self) -> bool {
        self.levels.values().all(|l| l.assigned.is_empty())
    }
}
