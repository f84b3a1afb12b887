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

use crate::constant::RESERVED_TOPIC_MARKER;
use crate::constant::TOPIC_SEPARATOR;
use crate::pattern::clause::Clause;

/// A compiled hierarchical topic pattern.
///
/// Topics are paths of levels separated by `/`. In a pattern, `*` matches one
/// level (or the rest of one) and `//` matches one separator followed by any
/// number of whole levels, so `a//c` matches both `a/c` and `a/b/x/c`. The
/// pattern is split at every `//`; every clause boundary must fall on a
/// separator or at either end of the topic.
///
/// Topics starting with the reserved marker `:` are never matched by a
/// pattern that starts with a wildcard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicPattern {
    prefix: Option<Clause>,
    suffix: Option<Clause>,
    mid_clauses: Vec<Clause>,
    anchored: bool,
    match_many: bool,
    leading_wildcard: bool,
}

impl TopicPattern {
    /// The bare multi-level wildcard: every topic except reserved ones.
    pub fn match_many() -> Self {
        Self {
            prefix: None,
            suffix: None,
            mid_clauses: Vec::new(),
            anchored: false,
            match_many: true,
            leading_wildcard: true,
        }
    }

    /// A pattern without `//`: the clause must match the entire topic.
    pub fn exact(clause: Clause, leading_wildcard: bool) -> Self {
        Self {
            prefix: Some(clause),
            suffix: None,
            mid_clauses: Vec::new(),
            anchored: true,
            match_many: false,
            leading_wildcard,
        }
    }

    pub fn new(
        prefix: Option<Clause>,
        mid_clauses: Vec<Clause>,
        suffix: Option<Clause>,
        leading_wildcard: bool,
    ) -> Self {
        Self {
            prefix: prefix.filter(|c| !c.is_empty()),
            suffix: suffix.filter(|c| !c.is_empty()),
            mid_clauses: mid_clauses.into_iter().filter(|c| !c.is_empty()).collect(),
            anchored: false,
            match_many: false,
            leading_wildcard,
        }
    }

    #[inline]
    pub fn is_match_many(&self) -> bool {
        self.match_many
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

    pub fn matches(&self, topic: &str) -> bool {
        let chars: Vec<char> = topic.chars().collect();
        self.matches_chars(&chars)
    }

    pub fn matches_chars(&self, topic: &[char]) -> bool {
        if self.leading_wildcard && topic.first() == Some(&RESERVED_TOPIC_MARKER) {
            return false;
        }
        if self.match_many {
            return true;
        }
        let len = topic.len();
        match &self.prefix {
            Some(prefix) if self.anchored => prefix.ends_from(topic, 0).contains(&len),
            Some(prefix) => prefix
                .ends_from(topic, 0)
                .into_iter()
                .filter(|&end| is_boundary(topic, end))
                .any(|end| self.matches_rest(topic, 0, Some(end))),
            None => self.matches_rest(topic, 0, None),
        }
    }

    /// Matches middle clause `mid` onwards. `gap` is where the preceding `//`
    /// begins, or `None` when the pattern starts with `//`.
    fn matches_rest(&self, topic: &[char], mid: usize, gap: Option<usize>) -> bool {
        let len = topic.len();
        if let Some(clause) = self.mid_clauses.get(mid) {
            return level_starts(topic, gap).any(|start| {
                clause
                    .ends_from(topic, start)
                    .into_iter()
                    .filter(|&end| is_boundary(topic, end))
                    .any(|end| self.matches_rest(topic, mid + 1, Some(end)))
            });
        }
        match &self.suffix {
            // a trailing `//` matches the topic the gap begins at, or any level below it
            None => true,
            Some(suffix) => {
                let mut starts: Vec<usize> = level_starts(topic, gap).collect();
                // nearest the end first: the suffix is anchored there
                starts.reverse();
                starts.into_iter().any(|start| suffix.ends_from(topic, start).contains(&len))
            }
        }
    }
}

/// `end` is at the end of the topic or on a separator.
#[inline]
fn is_boundary(topic: &[char], end: usize) -> bool {
    end == topic.len() || topic[end] == TOPIC_SEPARATOR
}

/// Offsets where a level may begin after a `//` starting at `gap`.
fn level_starts(topic: &[char], gap: Option<usize>) -> impl Iterator<Item = usize> + '_ {
    let first = match gap {
        None => 0,
        Some(end) => end + 1,
    };
    (first..=topic.len()).filter(move |&start| start == 0 || topic[start - 1] == TOPIC_SEPARATOR)
}
