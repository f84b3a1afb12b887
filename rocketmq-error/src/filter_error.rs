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

/// Error types for selector compilation and message matching.
///
/// Only recoverable failures live here. Broken invariants inside the selector
/// core (an `INVALID` node reaching the evaluator, two simple tests sharing an
/// ordinal position) are programmer errors and panic instead.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    /// The message content could not be read while extracting an identifier's value.
    #[error("Bad message format while reading '{identifier}': {reason}")]
    BadMessageFormat { identifier: String, reason: String },

    #[error("Selector syntax error: {0}")]
    QuerySyntax(String),

    #[error("Invalid topic syntax '{topic}': {reason}")]
    InvalidTopicSyntax { topic: String, reason: String },

    #[error("No selector parser registered for domain {0}")]
    ParserNotFound(String),

    #[error("Selector configuration error: {0}")]
    Config(String),
}

impl FilterError {
    pub fn bad_message_format(identifier: impl Into<String>, reason: impl Into<String>) -> Self {
        FilterError::BadMessageFormat {
            identifier: identifier.into(),
            reason: reason.into(),
        }
    }

    pub fn query_syntax(message: impl Into<String>) -> Self {
        FilterError::QuerySyntax(message.into())
    }

    pub fn invalid_topic_syntax(topic: impl Into<String>, reason: impl Into<String>) -> Self {
        FilterError::InvalidTopicSyntax {
            topic: topic.into(),
            reason: reason.into(),
        }
    }

    pub fn parser_not_found(domain: impl Into<String>) -> Self {
        FilterError::ParserNotFound(domain.into())
    }

    pub fn config(message: impl Into<String>) -> Self {
        FilterError::Config(message.into())
    }

    /// Whether this error was caused by the content of a single message rather
    /// than by the selector or the broker configuration.
    #[inline]
    pub fn is_message_error(&self) -> bool {
        matches!(self, FilterError::BadMessageFormat { .. })
    }
}

impl From<config::ConfigError> for FilterError {
    fn from(e: config::ConfigError) -> Self {
        FilterError::Config(e.to_string())
    }
}
