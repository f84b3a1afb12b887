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

use crate::conjunction::simple_test::SimpleTest;
use crate::expression::eval_cache::EvalCache;
use crate::expression::evaluation_context::MessageBinding;
use crate::expression::evaluator::and3;
use crate::expression::evaluator::truth;
use crate::expression::evaluator::Evaluator;
use crate::expression::selector::Selector;
use crate::expression::value::Value;

/// One satisfiable conjunction: simple tests in ordinal-position order plus
/// an optional residual over several identifiers.
#[derive(Debug, Clone, PartialEq)]
pub struct Conjunction {
    simple_tests: Vec<SimpleTest>,
    residual: Option<Selector>,
    always_true: bool,
}

impl Conjunction {
    pub(crate) fn new(simple_tests: Vec<SimpleTest>, residual: Option<Selector>) -> Self {
        let always_true = simple_tests.is_empty() && residual.is_none();
        Self {
            simple_tests,
            residual,
            always_true,
        }
    }

    #[inline]
    pub fn simple_tests(&self) -> &[SimpleTest] {
        &self.simple_tests
    }

    #[inline]
    pub fn residual(&self) -> Option<&Selector> {
        self.residual.as_ref()
    }

    /// No simple test and no residual.
    #[inline]
    pub fn is_always_true(&self) -> bool {
        self.always_true
    }

    pub(crate) fn residual_mut(&mut self) -> Option<&mut Selector> {
        self.residual.as_mut()
    }

    /// Evaluates the conjunction against one message, stopping at the first false test.
    pub fn evaluate(
        &self,
        binding: &dyn MessageBinding,
        cache: &mut EvalCache,
        context: Option<&Value>,
        permissive: bool,
    ) -> FilterResult<Option<bool>> {
        let mut result = Some(true);
        for test in &self.simple_tests {
            result = and3(result, test.evaluate(binding, cache, context, permissive)?);
            if result == Some(false) {
                return Ok(result);
            }
        }
        if let Some(residual) = &self.residual {
            let value = Evaluator.eval(residual, binding, cache, context, permissive)?;
            result = and3(result, truth(value, permissive));
        }
        Ok(result)
    }
}

impl fmt::Display for Conjunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.always_true {
            return f.write_str("TRUE");
        }
        let mut first = true;
        for test in &self.simple_tests {
            if !first {
                f.write_str(" AND ")?;
            }
            write!(f, "[{test}]")?;
            first = false;
        }
        if let Some(residual) = &self.residual {
            if !first {
                f.write_str(" AND ")?;
            }
            write!(f, "{residual}")?;
        }
        Ok(())
    }
}

/// A selector decomposed into a disjunction of conjunctions.
///
/// An empty list of conjunctions means the selector can never be true.
#[derive(Debug, Clone, PartialEq)]
pub enum Organized {
    AlwaysTrue,
    Conjunctions(Vec<Conjunction>),
}

impl Organized {
    #[inline]
    pub fn is_always_true(&self) -> bool {
        matches!(self, Organized::AlwaysTrue)
    }

    #[inline]
    pub fn is_always_false(&self) -> bool {
        matches!(self, Organized::Conjunctions(c) if c.is_empty())
    }

    /// The conjunctions, empty for [`Organized::AlwaysTrue`].
    pub fn conjunctions(&self) -> &[Conjunction] {
        match self {
            Organized::AlwaysTrue => &[],
            Organized::Conjunctions(conjunctions) => conjunctions,
        }
    }

    pub(crate) fn conjunctions_mut(&mut self) -> &mut [Conjunction] {
        match self {
            Organized::AlwaysTrue => &mut [],
            Organized::Conjunctions(conjunctions) => conjunctions,
        }
    }

    /// Three-valued OR over the conjunctions.
    pub fn evaluate(
        &self,
        binding: &dyn MessageBinding,
        cache: &mut EvalCache,
        context: Option<&Value>,
        permissive: bool,
    ) -> FilterResult<Option<bool>> {
        let conjunctions = match self {
            Organized::AlwaysTrue => return Ok(Some(true)),
            Organized::Conjunctions(conjunctions) => conjunctions,
        };
        let mut result = Some(false);
        for conjunction in conjunctions {
            match conjunction.evaluate(binding, cache, context, permissive)? {
                Some(true) => return Ok(Some(true)),
                Some(false) => {}
                None => result = None,
            }
        }
        Ok(result)
    }
}

impl fmt::Display for Organized {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Organized::AlwaysTrue => f.write_str("TRUE"),
            Organized::Conjunctions(conjunctions) if conjunctions.is_empty() => f.write_str("FALSE"),
            Organized::Conjunctions(conjunctions) => {
                for (i, conjunction) in conjunctions.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" OR ")?;
                    }
                    write!(f, "({conjunction})")?;
                }
                Ok(())
            }
        }
    }
}
