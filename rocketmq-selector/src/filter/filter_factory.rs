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

use std::sync::Arc;
use std::sync::LazyLock;

use dashmap::DashMap;
use rocketmq_error::FilterError;
use rocketmq_error::FilterResult;
use tracing::warn;

use crate::constant::SelectorDomain;
use crate::expression::selector::Selector;
use crate::filter::filter_spi::SelectorParser;

static PARSER_REGISTRY: LazyLock<DashMap<SelectorDomain, Arc<dyn SelectorParser>>> = LazyLock::new(DashMap::new);

/// Process-wide registry of selector parsers, one per [`SelectorDomain`].
#[derive(Debug)]
pub struct ParserRegistry;

impl ParserRegistry {
    /// Returns the singleton registry instance.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// let registry = ParserRegistry::instance();
    /// let parser = registry.get(SelectorDomain::Jms);
    /// ```
    pub fn instance() -> &'static Self {
        static INSTANCE: LazyLock<ParserRegistry> = LazyLock::new(|| ParserRegistry);
        &INSTANCE
    }

    /// Registers `parser` under its domain, returning the parser it replaces.
    ///
    /// # Thread Safety
    ///
    /// This method is thread-safe and can be called concurrently from multiple threads.
    pub fn register(&self, parser: Arc<dyn SelectorParser>) -> Option<Arc<dyn SelectorParser>> {
        let domain = parser.domain();
        let previous = PARSER_REGISTRY.insert(domain, parser);
        if previous.is_some() {
            warn!("selector parser for domain {} replaced", domain);
        }
        previous
    }

    pub fn unregister(&self, domain: SelectorDomain) -> Option<Arc<dyn SelectorParser>> {
        PARSER_REGISTRY.remove(&domain).map(|(_, v)| v)
    }

    /// Retrieves the parser registered for `domain`.
    ///
    /// # Performance
    ///
    /// This operation is lock-free for reads and performs an atomic reference
    /// count increment on the returned `Arc`.
    pub fn get(&self, domain: SelectorDomain) -> Option<Arc<dyn SelectorParser>> {
        PARSER_REGISTRY.get(&domain).map(|entry| Arc::clone(&*entry))
    }

    /// Like [`get`](Self::get), failing with [`FilterError::ParserNotFound`].
    pub fn get_or_err(&self, domain: SelectorDomain) -> FilterResult<Arc<dyn SelectorParser>> {
        self.get(domain)
            .ok_or_else(|| FilterError::parser_not_found(domain.name()))
    }

    /// Parses `text` with the parser of `domain`.
    pub fn parse(&self, domain: SelectorDomain, text: &str) -> FilterResult<Selector> {
        self.get_or_err(domain)?.parse(text)
    }

    #[inline]
    pub fn contains(&self, domain: SelectorDomain) -> bool {
        PARSER_REGISTRY.contains_key(&domain)
    }

    pub fn registered_domains(&self) -> Vec<SelectorDomain> {
        PARSER_REGISTRY.iter().map(|entry| *entry.key()).collect()
    }

    pub fn count(&self) -> usize {
        PARSER_REGISTRY.len()
    }
}
