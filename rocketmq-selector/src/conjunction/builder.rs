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

use tracing::trace;

use crate::conjunction::organized::Conjunction;
use crate::conjunction::simple_test::conjoin;
use crate::conjunction::simple_test::SimpleTest;
use crate::conjunction::simple_test::SimpleTestKind;
use crate::expression::evaluator::Evaluator;
use crate::expression::fold::fold;
use crate::expression::selector::IdentifierKey;
use crate::expression::selector::Literal;
use crate::expression::selector::Selector;
use crate::expression::value::Value;
use crate::position::OrdinalPosition;

/// Accumulates the predicates of one conjunction, merging those on the same
/// identifier into a single [`SimpleTest`].
///
/// Once a contradiction is found the builder refuses further input and
/// [`organize`](Self::organize) yields `None`.
#[derive(Debug, Default)]
pub struct ConjunctionBuilder {
    tests: Vec<SimpleTest>,
    residual: Vec<Selector>,
    contradicted: bool,
}

impl ConjunctionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_contradicted(&self) -> bool {
        self.contradicted
    }

    /// Adds one conjunct. Returns `false` once the conjunction can never be true.
    pub fn and_selector(&mut self, predicate: Selector) -> bool {
        if self.contradicted {
            return false;
        }
        match predicate.num_identifiers() {
            0 => {
                let value = Evaluator.eval_constant(&predicate);
                if value.as_ref().and_then(Value::as_bool) != Some(true) {
                    self.contradicted = true;
                }
            }
            1 => return self.and_test(SimpleTest::from_selector(predicate)),
            _ => self.residual.push(predicate),
        }
        !self.contradicted
    }

    /// Adds one simple test, merging it with an existing test on the same identifier.
    pub fn and_test(&mut self, test: SimpleTest) -> bool {
        if self.contradicted {
            return false;
        }
        let key = test.identifier().key();
        let Some(existing) = self.tests.iter_mut().find(|t| t.identifier().key() == key) else {
            self.tests.push(test);
            return true;
        };

        // Extended identifiers may differ per evaluation, so only merges that
        // do not depend on a single value are safe.
        if existing.identifier().is_extended() || test.identifier().is_extended() {
            if !merges_when_extended(existing.kind(), test.kind()) {
                self.residual.push(test.to_selector());
                return true;
            }
        } else {
            match (existing.kind(), test.kind()) {
                (SimpleTestKind::Numeric(_), SimpleTestKind::StringOth(_)) => {
                    self.residual.push(test.to_selector());
                    return true;
                }
                (SimpleTestKind::StringOth(_), SimpleTestKind::Numeric(_)) => {
                    let displaced = std::mem::replace(existing, test);
                    self.residual.push(displaced.to_selector());
                    return true;
                }
                _ => {}
            }
        }

        if !existing.combine(test) {
            self.contradicted = true;
        }
        !self.contradicted
    }

    /// Finishes the conjunction.
    ///
    /// Residual terms are rewritten with the values that `EQ`, `ID`, `NOTID`
    /// and `NULL` tests pin their identifiers to, until nothing changes. A term
    /// left with no identifier must fold to `TRUE`; one left with a single
    /// identifier becomes a simple test. Returns `None` when the conjunction
    /// is contradictory.
    ///
    /// # Panics
    ///
    /// Panics when a test's identifier has no ordinal position, or when two
    /// different identifiers share one.
    pub fn organize(mut self) -> Option<Conjunction> {
        loop {
            if self.contradicted {
                trace!("conjunction dropped as contradictory");
                return None;
            }
            let substitutions: Vec<(IdentifierKey, Literal)> =
                self.tests.iter().filter_map(SimpleTest::substitution).collect();
            if substitutions.is_empty() || self.residual.is_empty() {
                break;
            }
            let mut shrunk = false;
            for term in std::mem::take(&mut self.residual) {
                let before = term.num_identifiers();
                let term = substitute(term, &substitutions);
                if term.num_identifiers() == before {
                    self.residual.push(term);
                } else {
                    shrunk = true;
                    self.and_selector(term);
                }
            }
            if !shrunk {
                break;
            }
        }

        let mut tests = Vec::with_capacity(self.tests.len());
        for mut test in std::mem::take(&mut self.tests) {
            self.residual.extend(test.shed());
            if !test.is_vacuous() {
                tests.push(test);
            }
        }
        for test in &tests {
            position_of(test);
        }
        tests.sort_by_key(position_of);
        for pair in tests.windows(2) {
            if position_of(&pair[0]) == position_of(&pair[1]) {
                panic!(
                    "identifiers {} and {} share ordinal position {}",
                    pair[0].identifier(),
                    pair[1].identifier(),
                    position_of(&pair[0])
                );
            }
        }

        let conjunction = Conjunction::new(tests, conjoin(self.residual));
        trace!("organized conjunction {}", conjunction);
        Some(conjunction)
    }
}

fn merges_when_extended(existing: &SimpleTestKind, incoming: &SimpleTestKind) -> bool {
    match (existing, incoming) {
        (SimpleTestKind::StringOth(_), SimpleTestKind::StringOth(_)) => true,
        (SimpleTestKind::NotNull, SimpleTestKind::Null) | (SimpleTestKind::Null, SimpleTestKind::NotNull) => false,
        (SimpleTestKind::NotNull, _) | (_, SimpleTestKind::NotNull) => true,
        _ => false,
    }
}

fn position_of(test: &SimpleTest) -> OrdinalPosition {
    match test.identifier().ordinal_position() {
        Some(position) => position,
        None => panic!("identifier {} has no ordinal position", test.identifier()),
    }
}

/// Replaces pinned identifiers with their literals and refolds the term.
fn substitute(mut term: Selector, substitutions: &[(IdentifierKey, Literal)]) -> Selector {
    if replace_identifiers(&mut term, substitutions) {
        fold(term)
    } else {
        term
    }
}

fn replace_identifiers(node: &mut Selector, substitutions: &[(IdentifierKey, Literal)]) -> bool {
    if let Selector::Identifier(identifier) = node {
        if identifier.is_extended() {
            return false;
        }
        let key = identifier.key();
        return match substitutions.iter().find(|(k, _)| *k == key) {
            Some((_, literal)) => {
                *node = literal.clone().into();
                true
            }
            None => false,
        };
    }
    let mut changed = false;
    for operand in node.operands_mut() {
        changed |= replace_identifiers(operand, substitutions);
    }
    if changed {
        node.refresh();
    }
    changed
}
