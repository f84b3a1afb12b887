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

use crate::conjunction::ConjunctionBuilder;
use crate::conjunction::Organized;
use crate::constant::OpCode;
use crate::expression::selector::Selector;

/// Splits a DNF selector into its conjunctions.
///
/// Each disjunct becomes one [`Conjunction`](crate::conjunction::Conjunction);
/// contradictory disjuncts are dropped. If any disjunct is always true the
/// whole selector is, and [`Organized::AlwaysTrue`] is returned. No
/// conjunctions at all means the selector is always false.
///
/// # Panics
///
/// Panics when an identifier in a simple test has no ordinal position; run a
/// [`Resolver`](crate::position::Resolver) over the tree first.
pub fn organize_tests(selector: Selector) -> Organized {
    let mut disjuncts = Vec::new();
    flatten(selector, OpCode::Or, &mut disjuncts);

    let mut conjunctions = Vec::with_capacity(disjuncts.len());
    for disjunct in disjuncts {
        let mut predicates = Vec::new();
        flatten(disjunct, OpCode::And, &mut predicates);

        let mut builder = ConjunctionBuilder::new();
        if !predicates.into_iter().all(|predicate| augment(&mut builder, predicate)) {
            continue;
        }
        let Some(conjunction) = builder.organize() else {
            continue;
        };
        if conjunction.is_always_true() {
            return Organized::AlwaysTrue;
        }
        conjunctions.push(conjunction);
    }
    Organized::Conjunctions(conjunctions)
}

/// Adds one predicate to the conjunction under construction. Returns `false`
/// once the conjunction is contradictory.
#[inline]
pub fn augment(builder: &mut ConjunctionBuilder, predicate: Selector) -> bool {
    builder.and_selector(predicate)
}

/// Collects the operands of a chain of `op` nodes, left to right.
fn flatten(selector: Selector, op: OpCode, out: &mut Vec<Selector>) {
    if selector.op() != Some(op) {
        out.push(selector);
        return;
    }
    let Selector::Operator(operator) = selector else {
        unreachable!("{op} node is not an operator");
    };
    for operand in operator.into_operands() {
        flatten(operand, op, out);
    }
}
