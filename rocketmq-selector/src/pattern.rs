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

//! Pattern engines for `LIKE` and `TOPIC LIKE`.
//!
//! Both engines compile a raw pattern once into a prefix clause, a suffix
//! clause and middle clauses, and then match many candidates against it.

pub mod clause;
pub mod like_pattern;
pub mod parse;
pub mod topic_pattern;

use std::sync::Arc;

pub use clause::Clause;
pub use clause::ClauseItem;
pub use like_pattern::Pattern;
pub use parse::parse_like;
pub use parse::parse_topic;
pub use parse::ParsedLike;
pub use parse::ParsedTopic;
pub use topic_pattern::TopicPattern;

/// A compiled pattern of either kind, cheap to clone and share across threads.
#[derive(Debug, Clone, PartialEq)]
pub enum PatternMatcher {
    Like(Arc<Pattern>),
    Topic(Arc<TopicPattern>),
}

impl PatternMatcher {
    #[inline]
    pub fn matches(&self, candidate: &str) -> bool {
        match self {
            PatternMatcher::Like(p) => p.matches(candidate),
            PatternMatcher::Topic(p) => p.matches(candidate),
        }
    }

    #[inline]
    pub fn is_topic(&self) -> bool {
        matches!(self, PatternMatcher::Topic(_))
    }
}
