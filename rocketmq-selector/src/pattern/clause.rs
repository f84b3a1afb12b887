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

use crate::constant::TOPIC_SEPARATOR;

/// One element of a [`Clause`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClauseItem {
    /// A run of characters that must appear verbatim.
    Literal(Vec<char>),
    /// SQL `_`: exactly one character.
    MatchOne,
    /// Topic `*`: one or more characters within a single topic level.
    SingleLevel,
}

/// A run of literal characters and single-position wildcards, delimited in
/// the raw pattern by multi-character wildcards.
///
/// `min_len` is the shortest text the clause can match. For SQL clauses that
/// is also the only length it can match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clause {
    items: Vec<ClauseItem>,
    min_len: usize,
}

impl Clause {
    pub fn new(items: Vec<ClauseItem>) -> Self {
        let min_len = items
            .iter()
            .map(|item| match item {
                ClauseItem::Literal(chars) => chars.len(),
                ClauseItem::MatchOne | ClauseItem::SingleLevel => 1,
            })
            .sum();
        Self { items, min_len }
    }

    #[inline]
    pub fn items(&self) -> &[ClauseItem] {
        &self.items
    }

    #[inline]
    pub fn min_len(&self) -> usize {
        self.min_len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether the clause matches `candidate[start..start + min_len]`.
    ///
    /// Only meaningful for clauses without [`ClauseItem::SingleLevel`], whose
    /// length is exact.
    pub fn matches_at(&self, candidate: &[char], start: usize) -> bool {
        if start + self.min_len > candidate.len() {
            return false;
        }
        let mut pos = start;
        for item in &self.items {
            match item {
                ClauseItem::Literal(chars) => {
                    if candidate[pos..pos + chars.len()] != chars[..] {
                        return false;
                    }
                    pos += chars.len();
                }
                ClauseItem::MatchOne => pos += 1,
                ClauseItem::SingleLevel => unreachable!("topic wildcard in an exact-length clause"),
            }
        }
        true
    }

    /// Finds the leftmost match within `candidate[from..to]`, returning the
    /// offset just past it.
    pub fn find(&self, candidate: &[char], from: usize, to: usize) -> Option<usize> {
        if to < from + self.min_len {
            return None;
        }
        (from..=to - self.min_len)
            .find(|&start| self.matches_at(candidate, start))
            .map(|start| start + self.min_len)
    }

    /// Every offset at which a match starting at `start` can end.
    ///
    /// A single-level wildcard consumes at least one character and never
    /// crosses a topic separator.
    pub fn ends_from(&self, candidate: &[char], start: usize) -> Vec<usize> {
        let mut ends = Vec::new();
        self.collect_ends(candidate, 0, start, &mut ends);
        ends
    }

    fn collect_ends(&self, candidate: &[char], item: usize, pos: usize, ends: &mut Vec<usize>) {
        let Some(current) = self.items.get(item) else {
            if !ends.contains(&pos) {
                ends.push(pos);
            }
            return;
        };
        match current {
            ClauseItem::Literal(chars) => {
                if candidate[pos..].starts_with(chars) {
                    self.collect_ends(candidate, item + 1, pos + chars.len(), ends);
                }
            }
            ClauseItem::MatchOne => {
                if pos < candidate.len() {
                    self.collect_ends(candidate, item + 1, pos + 1, ends);
                }
            }
            ClauseItem::SingleLevel => {
                let mut end = pos;
                while end < candidate.len() && candidate[end] != TOPIC_SEPARATOR {
                    end += 1;
                    self.collect_ends(candidate, item + 1, end, ends);
                }
            }
        }
    }
}
