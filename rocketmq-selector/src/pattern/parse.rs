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

//! Compilation of raw `LIKE` and topic patterns.
//!
//! Compiled patterns are immutable and cached process-wide, keyed by their
//! raw text, so every selector using the same pattern shares one instance.
//! The caches are bounded: when full, patterns no selector holds any more
//! are evicted, and a pattern that still does not fit is compiled uncached.

use std::hash::Hash;
use std::sync::Arc;
use std::sync::LazyLock;

use cheetah_string::CheetahString;
use dashmap::DashMap;

use crate::constant::SQL_MATCH_MANY;
use crate::constant::SQL_MATCH_ONE;
use crate::constant::TOPIC_MULTI_LEVEL_WILDCARD;
use crate::constant::TOPIC_SINGLE_LEVEL_WILDCARD;
use crate::pattern::clause::Clause;
use crate::pattern::clause::ClauseItem;
use crate::pattern::like_pattern::Pattern;
use crate::pattern::topic_pattern::TopicPattern;

/// Most compiled patterns of one kind kept in the process-wide cache.
pub const PATTERN_CACHE_CAPACITY: usize = 4096;

static LIKE_PATTERNS: LazyLock<PatternCache<(CheetahString, Option<char>), Pattern>> =
    LazyLock::new(|| PatternCache::new(PATTERN_CACHE_CAPACITY));

static TOPIC_PATTERNS: LazyLock<PatternCache<CheetahString, TopicPattern>> =
    LazyLock::new(|| PatternCache::new(PATTERN_CACHE_CAPACITY));

/// Bounded map from raw pattern text to the shared compiled pattern.
#[derive(Debug)]
pub(crate) struct PatternCache<K: Eq + Hash, V> {
    entries: DashMap<K, Arc<V>>,
    capacity: usize,
}

impl<K: Eq + Hash, V> PatternCache<K, V> {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            entries: DashMap::new(),
            capacity,
        }
    }

    pub(crate) fn get_or_compile(&self, key: K, compile: impl FnOnce() -> V) -> Arc<V> {
        if let Some(pattern) = self.entries.get(&key) {
            return Arc::clone(&*pattern);
        }
        if self.entries.len() >= self.capacity {
            self.entries.retain(|_, pattern| Arc::strong_count(pattern) > 1);
            if self.entries.len() >= self.capacity {
                return Arc::new(compile());
            }
        }
        Arc::clone(self.entries.entry(key).or_insert_with(|| Arc::new(compile())).value())
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Outcome of compiling a `LIKE` pattern.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedLike {
    /// The pattern is nothing but `%`: any string matches.
    MatchAll,
    /// No wildcards: plain string equality with the unescaped text.
    Literal(String),
    Pattern(Arc<Pattern>),
}

/// Outcome of compiling a topic pattern.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedTopic {
    /// No wildcards: plain string equality.
    Literal(String),
    Pattern(Arc<TopicPattern>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LikeToken {
    Char(char),
    One,
    Many,
}

fn tokenize_like(raw: &str, escape: Option<char>) -> Vec<LikeToken> {
    let mut tokens = Vec::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        let token = if Some(c) == escape {
            // a trailing escape character stands for itself
            LikeToken::Char(chars.next().unwrap_or(c))
        } else if c == SQL_MATCH_ONE {
            LikeToken::One
        } else if c == SQL_MATCH_MANY {
            LikeToken::Many
        } else {
            LikeToken::Char(c)
        };
        tokens.push(token);
    }
    tokens
}

fn like_clause(tokens: &[LikeToken]) -> Clause {
    let mut items = Vec::new();
    let mut run = Vec::new();
    for token in tokens {
        match token {
            LikeToken::Char(c) => run.push(*c),
            LikeToken::One => {
                if !run.is_empty() {
                    items.push(ClauseItem::Literal(std::mem::take(&mut run)));
                }
                items.push(ClauseItem::MatchOne);
            }
            LikeToken::Many => unreachable!("clauses are split at '%'"),
        }
    }
    if !run.is_empty() {
        items.push(ClauseItem::Literal(run));
    }
    Clause::new(items)
}

/// Compiles a SQL `LIKE` pattern with an optional escape character.
pub fn parse_like(raw: &str, escape: Option<char>) -> ParsedLike {
    let tokens = tokenize_like(raw, escape);
    let has_many = tokens.contains(&LikeToken::Many);
    let has_one = tokens.contains(&LikeToken::One);
    if !has_many && !has_one {
        let text = tokens
            .iter()
            .map(|t| match t {
                LikeToken::Char(c) => *c,
                _ => unreachable!("wildcard in a literal pattern"),
            })
            .collect();
        return ParsedLike::Literal(text);
    }
    if !has_one && tokens.iter().all(|t| *t == LikeToken::Many) {
        return ParsedLike::MatchAll;
    }
    let key = (CheetahString::from(raw), escape);
    let pattern = LIKE_PATTERNS.get_or_compile(key, || {
        if has_many {
            let mut clauses: Vec<Clause> = tokens.split(|t| *t == LikeToken::Many).map(like_clause).collect();
            let suffix = clauses.pop();
            let prefix = if clauses.is_empty() { None } else { Some(clauses.remove(0)) };
            Pattern::new(prefix, clauses, suffix)
        } else {
            Pattern::exact(like_clause(&tokens))
        }
    });
    ParsedLike::Pattern(pattern)
}

fn topic_clause(piece: &str) -> Clause {
    let mut items = Vec::new();
    let mut run = Vec::new();
    for c in piece.chars() {
        if c == TOPIC_SINGLE_LEVEL_WILDCARD {
            if !run.is_empty() {
                items.push(ClauseItem::Literal(std::mem::take(&mut run)));
            }
            items.push(ClauseItem::SingleLevel);
        } else {
            run.push(c);
        }
    }
    if !run.is_empty() {
        items.push(ClauseItem::Literal(run));
    }
    Clause::new(items)
}

/// Compiles a topic pattern.
///
/// A trailing `//.` is read as a trailing `//`. Topic legality is not checked
/// here; see [`TopicSyntaxChecker`](crate::filter::TopicSyntaxChecker).
pub fn parse_topic(raw: &str) -> ParsedTopic {
    let normalized = match raw.strip_suffix('.') {
        Some(stem) if stem.ends_with(TOPIC_MULTI_LEVEL_WILDCARD) => stem,
        _ => raw,
    };
    if !normalized.contains(TOPIC_MULTI_LEVEL_WILDCARD) && !normalized.contains(TOPIC_SINGLE_LEVEL_WILDCARD) {
        return ParsedTopic::Literal(normalized.to_string());
    }
    let leading_wildcard =
        normalized.starts_with(TOPIC_MULTI_LEVEL_WILDCARD) || normalized.starts_with(TOPIC_SINGLE_LEVEL_WILDCARD);
    let pattern = TOPIC_PATTERNS.get_or_compile(CheetahString::from(normalized), || {
        if normalized == TOPIC_MULTI_LEVEL_WILDCARD {
            TopicPattern::match_many()
        } else if normalized.contains(TOPIC_MULTI_LEVEL_WILDCARD) {
            let mut clauses: Vec<Clause> = normalized.split(TOPIC_MULTI_LEVEL_WILDCARD).map(topic_clause).collect();
            let suffix = clauses.pop();
            let prefix = if clauses.is_empty() { None } else { Some(clauses.remove(0)) };
            TopicPattern::new(prefix, clauses, suffix, leading_wildcard)
        } else {
            TopicPattern::exact(topic_clause(normalized), leading_wildcard)
        }
    });
    ParsedTopic::Pattern(pattern)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_evicts_unused_patterns() {
        let cache: PatternCache<u32, String> = PatternCache::new(2);
        let held = cache.get_or_compile(1, || "one".to_string());
        drop(cache.get_or_compile(2, || "two".to_string()));
        assert_eq!(cache.len(), 2);

        // full: the pattern nobody holds makes room
        let third = cache.get_or_compile(3, || "three".to_string());
        assert_eq!(cache.len(), 2);
        assert!(Arc::ptr_eq(&held, &cache.get_or_compile(1, || unreachable!())));

        // full of held patterns: compiled but not cached
        let fourth = cache.get_or_compile(4, || "four".to_string());
        assert_eq!(*fourth, "four");
        assert_eq!(cache.len(), 2);
        assert_eq!(*third, "three");
    }

    #[test]
    fn test_shared_pattern_instance() {
        let (ParsedLike::Pattern(a), ParsedLike::Pattern(b)) = (parse_like("sh%red", None), parse_like("sh%red", None))
        else {
            panic!("expected patterns");
        };
        assert!(Arc::ptr_eq(&a, &b));
        assert!(LIKE_PATTERNS.len() <= PATTERN_CACHE_CAPACITY);
    }

    #[test]
    fn test_like_special_cases() {
        assert_eq!(parse_like("%", None), ParsedLike::MatchAll);
        assert_eq!(parse_like("%%%", None), ParsedLike::MatchAll);
        assert_eq!(parse_like("", None), ParsedLike::Literal(String::new()));
        assert_eq!(parse_like("abc", None), ParsedLike::Literal("abc".to_string()));
        assert_eq!(parse_like("50\\%", Some('\\')), ParsedLike::Literal("50%".to_string()));
        assert!(matches!(parse_like("%_", None), ParsedLike::Pattern(_)));
    }

    #[test]
    fn test_like_structure() {
        let ParsedLike::Pattern(p) = parse_like("ab%c%%d%ef", None) else {
            panic!("expected a pattern");
        };
        assert_eq!(p.prefix().map(Clause::min_len), Some(2));
        assert_eq!(p.suffix().map(Clause::min_len), Some(2));
        assert_eq!(p.mid_clauses().len(), 2);

        let ParsedLike::Pattern(p) = parse_like("%abc", None) else {
            panic!("expected a pattern");
        };
        assert!(p.prefix().is_none());
        assert!(p.suffix().is_some());
    }

    #[test]
    fn test_like_patterns_are_shared() {
        let (ParsedLike::Pattern(a), ParsedLike::Pattern(b)) = (parse_like("x%y", None), parse_like("x%y", None)) else {
            panic!("expected patterns");
        };
        assert!(Arc::ptr_eq(&a, &b));
        let ParsedLike::Pattern(c) = parse_like("x%y", Some('!')) else {
            panic!("expected a pattern");
        };
        assert!(!Arc::ptr_eq(&a, &c));
    }

    #[test]
    fn test_topic_special_cases() {
        assert_eq!(parse_topic("a/b"), ParsedTopic::Literal("a/b".to_string()));
        assert_eq!(parse_topic(""), ParsedTopic::Literal(String::new()));
        let ParsedTopic::Pattern(p) = parse_topic("//") else {
            panic!("expected a pattern");
        };
        assert!(p.is_match_many());
        assert!(p.matches("a/b"));
        assert!(!p.matches(":reserved"));
        let ParsedTopic::Pattern(p) = parse_topic("//.") else {
            panic!("expected a pattern");
        };
        assert!(p.is_match_many());
    }

    #[test]
    fn test_topic_structure() {
        let ParsedTopic::Pattern(p) = parse_topic("a//b//c") else {
            panic!("expected a pattern");
        };
        assert!(p.prefix().is_some());
        assert_eq!(p.mid_clauses().len(), 1);
        assert!(p.suffix().is_some());
    }
}
