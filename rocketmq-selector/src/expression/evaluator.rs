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

//! Typed, three-valued evaluation of selector trees.
//!
//! Every evaluation yields `Option<Value>`; `None` is the *unknown* truth
//! value and also what a missing field evaluates to. Unknown propagates through
//! arithmetic and comparisons and is absorbed only by `AND`/`OR`:
//!
//! | `AND`   | true    | false | unknown |
//! |---------|---------|-------|---------|
//! | true    | true    | false | unknown |
//! | false   | false   | false | false   |
//! | unknown | unknown | false | unknown |
//!
//! `OR` is the dual. In permissive mode the evaluator casts between strings
//! and numbers/booleans where strict mode would yield unknown.

use std::cmp::Ordering;

use rocketmq_error::FilterResult;

use crate::constant::OpCode;
use crate::constant::SelectorType;
use crate::expression::empty_evaluation_context::EmptyEvaluationContext;
use crate::expression::eval_cache::EvalCache;
use crate::expression::evaluation_context::MessageBinding;
use crate::expression::selector::Identifier;
use crate::expression::selector::Operator;
use crate::expression::selector::Selector;
use crate::expression::value::NumericValue;
use crate::expression::value::Value;

#[derive(Debug, Clone, Copy, Default)]
pub struct Evaluator;

impl Evaluator {
    /// Evaluates `selector` against one message.
    ///
    /// # Arguments
    ///
    /// * `binding` - Field accessor for the message being matched
    /// * `cache` - Memo for nodes with a non-zero `unique_id`, owned by this message pass
    /// * `context` - XPath context node; `None` for the message root
    /// * `permissive` - Whether mismatched string/number/boolean operands are cast
    ///
    /// # Errors
    ///
    /// Returns the binding's error when a field cannot be read. Nothing is
    /// cached for the failing node.
    ///
    /// # Panics
    ///
    /// Panics when asked to evaluate a node of type `INVALID`.
    pub fn eval(
        &self,
        selector: &Selector,
        binding: &dyn MessageBinding,
        cache: &mut EvalCache,
        context: Option<&Value>,
        permissive: bool,
    ) -> FilterResult<Option<Value>> {
        let unique_id = selector.unique_id();
        let cacheable = unique_id != 0 && !selector.is_extended();
        if cacheable {
            if let Some(value) = cache.get(unique_id) {
                return Ok(value.clone());
            }
        }
        let value = self.eval_node(selector, binding, cache, context, permissive)?;
        if cacheable {
            cache.insert(unique_id, value.clone());
        }
        Ok(value)
    }

    /// Evaluates an identifier-free tree.
    ///
    /// # Panics
    ///
    /// Panics if the tree consults the binding and fails, which an
    /// identifier-free tree cannot do.
    pub fn eval_constant(&self, selector: &Selector) -> Option<Value> {
        let mut cache = EvalCache::new();
        match self.eval(selector, &EmptyEvaluationContext, &mut cache, None, false) {
            Ok(value) => value,
            Err(e) => panic!("constant selector {selector} failed to evaluate: {e}"),
        }
    }

    /// Fetches the value of one identifier, casting it to the identifier's type in permissive mode.
    pub fn eval_identifier(
        &self,
        identifier: &Identifier,
        binding: &dyn MessageBinding,
        context: Option<&Value>,
        permissive: bool,
    ) -> FilterResult<Option<Value>> {
        if permissive {
            let raw = binding.get_field(identifier, SelectorType::Unknown, context)?;
            Ok(raw.and_then(|value| cast(value, identifier.ty())))
        } else {
            binding.get_field(identifier, identifier.ty(), context)
        }
    }

    fn eval_node(
        &self,
        selector: &Selector,
        binding: &dyn MessageBinding,
        cache: &mut EvalCache,
        context: Option<&Value>,
        permissive: bool,
    ) -> FilterResult<Option<Value>> {
        if selector.ty() == SelectorType::Invalid {
            panic!("cannot evaluate ill-typed selector {selector}");
        }
        match selector {
            Selector::Literal(literal) => Ok(literal.value().cloned()),
            Selector::Identifier(identifier) => self.eval_identifier(identifier, binding, context, permissive),
            Selector::Operator(operator) => self.eval_operator(operator, binding, cache, context, permissive),
            Selector::Like(like) => {
                let operand = self.eval(like.base().operand(0), binding, cache, context, permissive)?;
                let text = match operand {
                    Some(Value::String(s)) => s,
                    Some(other) if permissive => match other.coerce_to_string() {
                        Some(s) => s,
                        None => return Ok(None),
                    },
                    _ => return Ok(None),
                };
                Ok(Some(Value::Boolean(like.pattern().matches(text.as_str()))))
            }
        }
    }

    fn eval_operator(
        &self,
        operator: &Operator,
        binding: &dyn MessageBinding,
        cache: &mut EvalCache,
        context: Option<&Value>,
        permissive: bool,
    ) -> FilterResult<Option<Value>> {
        let op = operator.op();
        let operand = |index: usize, cache: &mut EvalCache| {
            self.eval(operator.operand(index), binding, cache, context, permissive)
        };
        let result = match op {
            OpCode::And => {
                let left = truth(operand(0, cache)?, permissive);
                if left == Some(false) {
                    return Ok(Some(Value::Boolean(false)));
                }
                let right = truth(operand(1, cache)?, permissive);
                and3(left, right).map(Value::Boolean)
            }
            OpCode::Or => {
                let left = truth(operand(0, cache)?, permissive);
                if left == Some(true) {
                    return Ok(Some(Value::Boolean(true)));
                }
                let right = truth(operand(1, cache)?, permissive);
                or3(left, right).map(Value::Boolean)
            }
            OpCode::Not => truth(operand(0, cache)?, permissive).map(|b| Value::Boolean(!b)),
            OpCode::IsNull => Some(Value::Boolean(operand(0, cache)?.is_none())),
            OpCode::Neg => number(operand(0, cache)?, permissive).map(|n| Value::Number(n.negate())),
            OpCode::Plus | OpCode::Minus | OpCode::Times | OpCode::Div => {
                let Some(left) = number(operand(0, cache)?, permissive) else {
                    return Ok(None);
                };
                let Some(right) = number(operand(1, cache)?, permissive) else {
                    return Ok(None);
                };
                arithmetic(op, &left, &right).map(Value::Number)
            }
            OpCode::Eq | OpCode::Ne | OpCode::Gt | OpCode::Lt | OpCode::Ge | OpCode::Le => {
                let left = operand(0, cache)?;
                let right = operand(1, cache)?;
                compare(op, left.as_ref(), right.as_ref(), permissive).map(Value::Boolean)
            }
            OpCode::Like | OpCode::TopicLike => {
                unreachable!("{op} operator {operator} has no compiled pattern")
            }
        };
        Ok(result)
    }
}

/// Three-valued conjunction.
#[inline]
pub fn and3(left: Option<bool>, right: Option<bool>) -> Option<bool> {
    match (left, right) {
        (Some(false), _) | (_, Some(false)) => Some(false),
        (Some(true), Some(true)) => Some(true),
        _ => None,
    }
}

/// Three-valued disjunction.
#[inline]
pub fn or3(left: Option<bool>, right: Option<bool>) -> Option<bool> {
    match (left, right) {
        (Some(true), _) | (_, Some(true)) => Some(true),
        (Some(false), Some(false)) => Some(false),
        _ => None,
    }
}

/// Truth value of an operand of `AND`, `OR` or `NOT`.
#[inline]
pub(crate) fn truth(value: Option<Value>, permissive: bool) -> Option<bool> {
    match value? {
        Value::Boolean(b) => Some(b),
        other if permissive => other.coerce_to_boolean(),
        _ => None,
    }
}

#[inline]
fn number(value: Option<Value>, permissive: bool) -> Option<NumericValue> {
    match value? {
        Value::Number(n) => Some(n),
        other if permissive => other.coerce_to_number(),
        _ => None,
    }
}

fn arithmetic(op: OpCode, left: &NumericValue, right: &NumericValue) -> Option<NumericValue> {
    match op {
        OpCode::Plus => Some(left.add(right)),
        OpCode::Minus => Some(left.subtract(right)),
        OpCode::Times => Some(left.multiply(right)),
        OpCode::Div => left.divide(right),
        _ => unreachable!("{op} is not an arithmetic operator"),
    }
}

/// Permissive cast of a field value to the type its identifier expects.
///
/// Values of the `Other` category are passed through untouched for the
/// comparison table to sort out.
fn cast(value: Value, ty: SelectorType) -> Option<Value> {
    if matches!(value, Value::Object(_)) {
        return Some(value);
    }
    match ty {
        SelectorType::Boolean => value.coerce_to_boolean().map(Value::Boolean),
        SelectorType::String | SelectorType::Topic => value.coerce_to_string().map(Value::String),
        t if t.is_numeric() => value.coerce_to_number().map(Value::Number),
        _ => Some(value),
    }
}

/// Applies comparison `op` to two evaluated operands.
///
/// The operand categories (Number=0, Boolean=1, String=2, Other=3) index a
/// 4x4 table as `left * 4 + right`. Same-category pairs compare directly;
/// booleans, strings and others only support `=` and `<>`. In permissive mode
/// a string is cast to the other side's number or boolean, and a string
/// against an `Other` compares by text, for equality only. Every other pair is
/// unknown.
pub fn compare(op: OpCode, left: Option<&Value>, right: Option<&Value>, permissive: bool) -> Option<bool> {
    let (left, right) = (left?, right?);
    let index = left.category() as usize * 4 + right.category() as usize;
    match index {
        0 => numeric_relation(op, left.as_number()?, right.as_number()?),
        5 => equality(op, left.as_bool() == right.as_bool()),
        10 => equality(op, left.as_str() == right.as_str()),
        15 => equality(op, left == right),
        2 | 8 if permissive => numeric_relation(op, &left.coerce_to_number()?, &right.coerce_to_number()?),
        6 | 9 if permissive => equality(op, left.coerce_to_boolean()? == right.coerce_to_boolean()?),
        11 | 14 if permissive => equality(op, left.to_text() == right.to_text()),
        _ => None,
    }
}

#[inline]
fn equality(op: OpCode, equal: bool) -> Option<bool> {
    match op {
        OpCode::Eq => Some(equal),
        OpCode::Ne => Some(!equal),
        _ => None,
    }
}

fn numeric_relation(op: OpCode, left: &NumericValue, right: &NumericValue) -> Option<bool> {
    let Some(ordering) = left.compare(right) else {
        // NaN on either side
        return Some(op == OpCode::Ne);
    };
    Some(match op {
        OpCode::Eq => ordering == Ordering::Equal,
        OpCode::Ne => ordering != Ordering::Equal,
        OpCode::Gt => ordering == Ordering::Greater,
        OpCode::Lt => ordering == Ordering::Less,
        OpCode::Ge => ordering != Ordering::Less,
        OpCode::Le => ordering != Ordering::Greater,
        _ => unreachable!("{op} is not a comparison"),
    })
}
