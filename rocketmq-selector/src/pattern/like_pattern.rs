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

use crate::pattern::clause::Clause;

/// A compiled SQL `LIKE` pattern.
///
/// The raw pattern is split at every `%` into clauses. The clause before the
/// first `%` is the prefix and the one after the last `%` is the suffix; the
/// rest are middle clauses. A pattern with no `%` at all is a single clause
/// that must consume the whole candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    prefix: Option<Clause>,
    suffix: Option<Clause>,
    mid_clauses: Vec<Clause>,
    anchored: bool,
}

impl Pattern {
    /// A pattern without `%`: the clause must match the entire candidate.
    pub fn exact(clause: Clause) -> Self {
        Self {
            prefix: Some(clause),
            suffix: None,
            mid_clauses: Vec::new(),
            anchored: true,
        }
    }

    /// A pattern with at least one `%`. Empty clauses are dropped.
    pub fn new(prefix: Option<Clause>, mid_clauses: Vec<Clause>, suffix: Option<Clause>) -> Self {
        Self {
            prefix: prefix.filter(|c| !c.is_empty()),
            suffix: suffix.filter(|c| !c.is_empty()),
            mid_clauses: mid_clauses.into_iter().filter(|c| !c.is_empty()).collect(),
            anchored: false,
        }
    }

    #[inline]
    pub fn prefix(&self) -> Option<&Clause> {
        self.prefix.as_ref()
    }

    #[inline]
    pub fn suffix(&self) -> Option<&Clause> {
        self.suffix.as_ref()
    }

    #[inline]
    pub fn mid_clauses(&self) -> &[Clause] {
        &self.mid_clauses
    }

    pub fn matches(&self, candidate: &str) -> bool {
        let chars: Vec<char> = candidate.chars().collect();
        self.matches_chars(&chars)
    }

    pub fn matches_chars(&self, candidate: &[char]) -> bool {
        let len = candidate.len();
        if self.anchored {
            return self
                .prefix
                .as_ref()
                .is_some_and(|c| c.min_len() == len && c.matches_at(candidate, 0));
        }
        let mut from = 0;
        let mut to = len;
        if let Some(prefix) = &self.prefix {
            if !prefix.matches_at(candidate, 0) {
                return false;
            }
            from = prefix.min_len();
        }
        if let Some(suffix) = &self.suffix {
            // SQL clauses have exact lengths, so the suffix can only start here
            let Some(start) = len.checked_sub(suffix.min_len()) else {
                return false;
            };
            if start < from || !suffix.matches_at(candidate, start) {
                return false;
            }
            to = start;
        }
        for clause in &self.mid_clauses {
            match clause.find(candidate, from, to) {
                Some(end) => from = end,
                None => return false,
            }
        }
        true
    }
}
