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

use std::fmt;

use rocketmq_error::FilterResult;

use crate::constant::SelectorDomain;
use crate::expression::selector::Selector;

/// Turns selector text of one domain into a typed [`Selector`] tree.
///
/// Parsers live outside this crate and are found through the
/// [`ParserRegistry`](crate::filter::ParserRegistry).
pub trait SelectorParser: Send + Sync + fmt::Debug {
    /// Parses `text` into a selector tree.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::QuerySyntax`](rocketmq_error::FilterError::QuerySyntax)
    /// when the text is not a valid selector of this domain.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// let parser = registry.get_or_err(SelectorDomain::Jms)?;
    /// let selector = parser.parse("price > 100 AND category = 'electronics'")?;
    /// ```
    fn parse(&self, text: &str) -> FilterResult<Selector>;

    /// The domain this parser registers under.
    fn domain(&self) -> SelectorDomain;
}

/// Validates a subscription topic before it is compiled into a `TOPIC LIKE` test.
pub trait TopicSyntaxChecker: Send + Sync {
    /// # Errors
    ///
    /// Returns [`FilterError::InvalidTopicSyntax`](rocketmq_error::FilterError::InvalidTopicSyntax)
    /// for an illegal topic.
    fn check_topic_syntax(&self, topic: &str) -> FilterResult<()>;
}

pub type SelectorParserSpi = dyn SelectorParser;
