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
use std::sync::Arc;

use parking_lot::Mutex;
use rocketmq_error::FilterError;
use rocketmq_error::FilterResult;
use tracing::debug;

use crate::config::SelectorConfig;
use crate::conjunction::Organized;
use crate::constant::SelectorDomain;
use crate::constant::SelectorType;
use crate::constant::TOPIC_IDENTIFIER;
use crate::expression::builders;
use crate::expression::eval_cache::EvalCache;
use crate::expression::evaluation_context::MessageBinding;
use crate::expression::fold::fold;
use crate::expression::type_inference::unify_identifier_types;
use crate::expression::selector::Identifier;
use crate::expression::selector::Selector;
use crate::expression::unique_id::UniqueIdAssigner;
use crate::expression::value::Value;
use crate::filter::filter_factory::ParserRegistry;
use crate::filter::filter_spi::TopicSyntaxChecker;
use crate::position::resolve_selector;
use crate::position::MinimalResolver;
use crate::position::PositionAssigner;
use crate::position::Resolver;
use crate::transform::organize_tests;
use crate::transform::Transformer;

/// Compiles selectors into [`CompiledSelector`]s: resolve identifiers,
/// rewrite to DNF, decompose into conjunctions.
///
/// The position assigner is shared by every selector compiled here, so the
/// simple tests of all of them are ordered consistently. Its lock is held
/// only while a selector's identifiers are resolved. Compilers that feed one
/// matching structure should share a single assigner through
/// [`with_position_assigner`](Self::with_position_assigner).
pub struct SelectorCompiler {
    config: SelectorConfig,
    assigner: Arc<Mutex<PositionAssigner>>,
    resolver: Arc<dyn Resolver>,
    topic_checker: Option<Arc<dyn TopicSyntaxChecker>>,
    unique_ids: Mutex<UniqueIdAssigner>,
}

impl SelectorCompiler {
    pub fn new(config: SelectorConfig) -> Self {
        Self {
            config,
            assigner: Arc::new(Mutex::new(PositionAssigner::new())),
            resolver: Arc::new(MinimalResolver),
            topic_checker: None,
            unique_ids: Mutex::new(UniqueIdAssigner::new()),
        }
    }

    pub fn with_resolver(mut self, resolver: Arc<dyn Resolver>) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn with_topic_checker(mut self, checker: Arc<dyn TopicSyntaxChecker>) -> Self {
        self.topic_checker = Some(checker);
        self
    }

    pub fn with_position_assigner(mut self, assigner: Arc<Mutex<PositionAssigner>>) -> Self {
        self.assigner = assigner;
        self
    }

    #[inline]
    pub fn config(&self) -> &SelectorConfig {
        &self.config
    }

    #[inline]
    pub fn position_assigner(&self) -> &Arc<Mutex<PositionAssigner>> {
        &self.assigner
    }

    /// Compiles a parsed selector.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::QuerySyntax`] when the selector is not a
    /// well-typed boolean expression.
    pub fn compile(&self, selector: Selector) -> FilterResult<CompiledSelector> {
        let mut selector = selector;
        if !selector.may_be_boolean() {
            return Err(FilterError::query_syntax(format!(
                "selector {selector} is not a boolean expression"
            )));
        }
        unify_identifier_types(&mut selector);
        {
            let mut assigner = self.assigner.lock();
            resolve_selector(&mut selector, self.resolver.as_ref(), &mut assigner);
        }

        let mut organized = organize_tests(Transformer.dnf(fold(selector)));
        if self.config.memoize_subexpressions {
            let mut unique_ids = self.unique_ids.lock();
            for conjunction in organized.conjunctions_mut() {
                if let Some(residual) = conjunction.residual_mut() {
                    unique_ids.assign(residual);
                }
            }
        }

        match &organized {
            Organized::AlwaysTrue => debug!("selector compiled to always true"),
            Organized::Conjunctions(c) if c.is_empty() => debug!("selector compiled to always false"),
            Organized::Conjunctions(c) => debug!("selector compiled to {} conjunction(s): {}", c.len(), organized),
        }
        Ok(CompiledSelector {
            organized,
            permissive: self.config.permissive,
        })
    }

    /// Parses `text` with the registered parser of `domain`, or of the
    /// configured default domain, and compiles it.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::ParserNotFound`] when no parser is registered
    /// for the domain, and any error the parser reports.
    pub fn compile_text(&self, domain: Option<SelectorDomain>, text: &str) -> FilterResult<CompiledSelector> {
        let domain = domain.unwrap_or(self.config.default_domain);
        let selector = ParserRegistry::instance().parse(domain, text)?;
        self.compile(selector)
    }

    /// Compiles a subscription: `topic` as a `TOPIC LIKE` test on the message
    /// topic, ANDed with the optional selector text.
    ///
    /// # Errors
    ///
    /// Returns the topic checker's error for an illegal topic, plus the
    /// errors of [`compile_text`](Self::compile_text).
    pub fn compile_subscription(
        &self,
        topic: &str,
        selector_text: Option<&str>,
        domain: SelectorDomain,
    ) -> FilterResult<CompiledSelector> {
        if let Some(checker) = &self.topic_checker {
            checker.check_topic_syntax(topic)?;
        }
        let topic_identifier = Identifier::new(TOPIC_IDENTIFIER)
            .with_type(SelectorType::Topic)
            .with_domain(domain);
        let mut selector = builders::topic_like(topic_identifier.into(), topic);
        if let Some(text) = selector_text.filter(|text| !text.trim().is_empty()) {
            let parsed = ParserRegistry::instance().parse(domain, text)?;
            selector = builders::and(selector, parsed);
        }
        self.compile(selector)
    }
}

impl fmt::Debug for SelectorCompiler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectorCompiler")
            .field("config", &self.config)
            .field("topic_checker", &self.topic_checker.is_some())
            .finish()
    }
}

/// A selector ready to be matched against messages.
///
/// Immutable; share it across threads and give each evaluation its own
/// [`EvalCache`].
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledSelector {
    organized: Organized,
    permissive: bool,
}

impl CompiledSelector {
    #[inline]
    pub fn organized(&self) -> &Organized {
        &self.organized
    }

    #[inline]
    pub fn is_always_true(&self) -> bool {
        self.organized.is_always_true()
    }

    #[inline]
    pub fn is_always_false(&self) -> bool {
        self.organized.is_always_false()
    }

    /// Matches one message using the configured casting mode.
    pub fn matches(
        &self,
        binding: &dyn MessageBinding,
        cache: &mut EvalCache,
        context: Option<&Value>,
    ) -> FilterResult<bool> {
        self.matches_with(binding, cache, context, self.permissive)
    }

    /// Matches one message. Only a definite `TRUE` matches; unknown does not.
    ///
    /// # Errors
    ///
    /// Returns the binding's error when a field of the message cannot be read.
    pub fn matches_with(
        &self,
        binding: &dyn MessageBinding,
        cache: &mut EvalCache,
        context: Option<&Value>,
        permissive: bool,
    ) -> FilterResult<bool> {
        Ok(self.organized.evaluate(binding, cache, context, permissive)? == Some(true))
    }
}

impl fmt::Display for CompiledSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.organized, f)
    }
}
