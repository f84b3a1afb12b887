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

use std::cmp::Ordering;
use std::fmt;

use rocketmq_error::FilterResult;

use crate::constant::OpCode;
use crate::constant::SelectorType;
use crate::expression::eval_cache::EvalCache;
use crate::expression::evaluation_context::MessageBinding;
use crate::expression::evaluator::and3;
use crate::expression::evaluator::compare;
use crate::expression::evaluator::truth;
use crate::expression::evaluator::Evaluator;
use crate::expression::selector::Identifier;
use crate::expression::selector::IdentifierKey;
use crate::expression::selector::Literal;
use crate::expression::selector::Operator;
use crate::expression::selector::Selector;
use crate::expression::value::NumericValue;
use crate::expression::value::Value;

/// Interval of numbers with optional, independently inclusive bounds.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NumericRange {
    lower: Option<NumericValue>,
    lower_inclusive: bool,
    upper: Option<NumericValue>,
    upper_inclusive: bool,
}

impl NumericRange {
    /// The range satisfying `x op value`, for an ordering `op`.
    pub fn from_comparison(op: OpCode, value: NumericValue) -> Option<Self> {
        let range = match op {
            OpCode::Gt => Self::at_least(value, false),
            OpCode::Ge => Self::at_least(value, true),
            OpCode::Lt => Self::at_most(value, false),
            OpCode::Le => Self::at_most(value, true),
            _ => return None,
        };
        Some(range)
    }

    pub fn at_least(lower: NumericValue, inclusive: bool) -> Self {
        Self {
            lower: Some(lower),
            lower_inclusive: inclusive,
            ..Self::default()
        }
    }

    pub fn at_most(upper: NumericValue, inclusive: bool) -> Self {
        Self {
            upper: Some(upper),
            upper_inclusive: inclusive,
            ..Self::default()
        }
    }

    #[inline]
    pub fn lower(&self) -> Option<&NumericValue> {
        self.lower.as_ref()
    }

    #[inline]
    pub fn lower_inclusive(&self) -> bool {
        self.lower_inclusive
    }

    #[inline]
    pub fn upper(&self) -> Option<&NumericValue> {
        self.upper.as_ref()
    }

    #[inline]
    pub fn upper_inclusive(&self) -> bool {
        self.upper_inclusive
    }

    /// NaN is in no range.
    pub fn contains(&self, value: &NumericValue) -> bool {
        let above = match &self.lower {
            None => true,
            Some(lower) => match value.compare(lower) {
                Some(Ordering::Greater) => true,
                Some(Ordering::Equal) => self.lower_inclusive,
                _ => false,
            },
        };
        let below = match &self.upper {
            None => true,
            Some(upper) => match value.compare(upper) {
                Some(Ordering::Less) => true,
                Some(Ordering::Equal) => self.upper_inclusive,
                _ => false,
            },
        };
        above && below
    }

    /// Narrows `self` to the intersection with `other`. Returns `false` when
    /// the intersection is empty.
    pub(crate) fn intersect(&mut self, other: &NumericRange) -> bool {
        if let Some(lower) = other.lower {
            match self.lower.as_ref().and_then(|current| lower.compare(current)) {
                _ if self.lower.is_none() => {
                    self.lower = Some(lower);
                    self.lower_inclusive = other.lower_inclusive;
                }
                Some(Ordering::Greater) => {
                    self.lower = Some(lower);
                    self.lower_inclusive = other.lower_inclusive;
                }
                Some(Ordering::Equal) => self.lower_inclusive &= other.lower_inclusive,
                _ => {}
            }
        }
        if let Some(upper) = other.upper {
            match self.upper.as_ref().and_then(|current| upper.compare(current)) {
                _ if self.upper.is_none() => {
                    self.upper = Some(upper);
                    self.upper_inclusive = other.upper_inclusive;
                }
                Some(Ordering::Less) => {
                    self.upper = Some(upper);
                    self.upper_inclusive = other.upper_inclusive;
                }
                Some(Ordering::Equal) => self.upper_inclusive &= other.upper_inclusive,
                _ => {}
            }
        }
        !self.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        match (&self.lower, &self.upper) {
            (Some(lower), Some(upper)) => match lower.compare(upper) {
                Some(Ordering::Less) => false,
                Some(Ordering::Equal) => !(self.lower_inclusive && self.upper_inclusive),
                _ => true,
            },
            _ => false,
        }
    }

    /// The single value of a degenerate range `[v, v]`.
    pub fn as_point(&self) -> Option<NumericValue> {
        match (&self.lower, &self.upper) {
            (Some(lower), Some(upper))
                if self.lower_inclusive
                    && self.upper_inclusive
                    && lower.compare(upper) == Some(Ordering::Equal) =>
            {
                Some(*lower)
            }
            _ => None,
        }
    }

    fn bound_predicates(&self, identifier: &Identifier) -> Vec<Selector> {
        let mut predicates = Vec::with_capacity(2);
        if let Some(lower) = self.lower {
            let op = if self.lower_inclusive { OpCode::Ge } else { OpCode::Gt };
            predicates.push(Operator::binary(op, identifier.clone().into(), Literal::new(lower).into()).into());
        }
        if let Some(upper) = self.upper {
            let op = if self.upper_inclusive { OpCode::Le } else { OpCode::Lt };
            predicates.push(Operator::binary(op, identifier.clone().into(), Literal::new(upper).into()).into());
        }
        predicates
    }
}

impl fmt::Display for NumericRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let open = if self.lower_inclusive { '[' } else { '(' };
        let close = if self.upper_inclusive { ']' } else { ')' };
        match &self.lower {
            Some(lower) => write!(f, "{open}{lower}, ")?,
            None => f.write_str("(-inf, ")?,
        }
        match &self.upper {
            Some(upper) => write!(f, "{upper}{close}"),
            None => f.write_str("+inf)"),
        }
    }
}

/// What a [`SimpleTest`] asserts about its identifier.
#[derive(Debug, Clone, PartialEq)]
pub enum SimpleTestKind {
    /// The boolean identifier is `TRUE`.
    Id,
    /// The boolean identifier is `FALSE`.
    NotId,
    Null,
    NotNull,
    /// The identifier equals a non-boolean value.
    Eq(Value),
    /// Any other single-identifier predicates, all of which must hold.
    StringOth(Vec<Selector>),
    /// The numeric identifier lies in a range.
    Numeric(NumericRange),
}

impl SimpleTestKind {
    /// The one value (or absence) this test allows, for checking it against
    /// pattern predicates.
    fn assumed_value(&self) -> Option<Option<Value>> {
        match self {
            SimpleTestKind::Id => Some(Some(Value::Boolean(true))),
            SimpleTestKind::NotId => Some(Some(Value::Boolean(false))),
            SimpleTestKind::Null => Some(None),
            SimpleTestKind::Eq(value) => Some(Some(value.clone())),
            _ => None,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            SimpleTestKind::Id => "ID",
            SimpleTestKind::NotId => "NOTID",
            SimpleTestKind::Null => "NULL",
            SimpleTestKind::NotNull => "NOTNULL",
            SimpleTestKind::Eq(_) => "EQ",
            SimpleTestKind::StringOth(_) => "STRINGOTH",
            SimpleTestKind::Numeric(_) => "NUMERIC",
        }
    }
}

/// A predicate over exactly one identifier, in a normalized form that a
/// matching engine can index.
#[derive(Debug, Clone, PartialEq)]
pub struct SimpleTest {
    identifier: Identifier,
    kind: SimpleTestKind,
}

impl SimpleTest {
    pub fn new(identifier: Identifier, kind: SimpleTestKind) -> Self {
        Self { identifier, kind }
    }

    /// Classifies a predicate that mentions exactly one identifier.
    ///
    /// # Panics
    ///
    /// Panics when `predicate` contains no identifier.
    pub fn from_selector(predicate: Selector) -> Self {
        debug_assert_eq!(predicate.num_identifiers(), 1, "{predicate} is not a simple test");
        if let Some(test) = Self::classify(&predicate) {
            return test;
        }
        let Some(identifier) = predicate.first_identifier().cloned() else {
            panic!("simple test {predicate} has no identifier");
        };
        Self::new(identifier, SimpleTestKind::StringOth(vec![predicate]))
    }

    fn classify(predicate: &Selector) -> Option<Self> {
        let operator = match predicate {
            Selector::Identifier(identifier) => return Some(Self::new(identifier.clone(), SimpleTestKind::Id)),
            Selector::Operator(operator) => operator,
            _ => return None,
        };
        match (operator.op(), operator.operands()) {
            (OpCode::Not, [Selector::Identifier(identifier)]) => {
                Some(Self::new(identifier.clone(), SimpleTestKind::NotId))
            }
            (OpCode::Not, [Selector::Operator(inner)]) if inner.op() == OpCode::IsNull => {
                let identifier = inner.operand(0).as_identifier()?;
                Some(Self::new(identifier.clone(), SimpleTestKind::NotNull))
            }
            (OpCode::IsNull, [Selector::Identifier(identifier)]) => {
                Some(Self::new(identifier.clone(), SimpleTestKind::Null))
            }
            (op, [Selector::Identifier(identifier), Selector::Literal(literal)]) if op.is_comparison() => {
                Self::comparison(op, identifier, literal)
            }
            (op, [Selector::Literal(literal), Selector::Identifier(identifier)]) if op.is_comparison() => {
                Self::comparison(op.mirrored_comparison()?, identifier, literal)
            }
            _ => None,
        }
    }

    fn comparison(op: OpCode, identifier: &Identifier, literal: &Literal) -> Option<Self> {
        let value = literal.value()?;
        let kind = match op {
            OpCode::Eq => match value {
                Value::Boolean(true) => SimpleTestKind::Id,
                Value::Boolean(false) => SimpleTestKind::NotId,
                Value::Number(n) if n.as_f64().is_nan() => return None,
                Value::Object(_) => return None,
                other => SimpleTestKind::Eq(other.clone()),
            },
            op if op.is_ordering() => {
                let number = value.as_number()?;
                if number.as_f64().is_nan() {
                    return None;
                }
                SimpleTestKind::Numeric(NumericRange::from_comparison(op, *number)?)
            }
            _ => return None,
        };
        Some(Self::new(identifier.clone(), kind))
    }

    #[inline]
    pub fn identifier(&self) -> &Identifier {
        &self.identifier
    }

    #[inline]
    pub fn kind(&self) -> &SimpleTestKind {
        &self.kind
    }

    /// Merges another test on the same identifier into this one. Returns
    /// `false` when the two can never hold together; `self` is then
    /// meaningless.
    ///
    /// # Panics
    ///
    /// Panics on a `NUMERIC` and `STRINGOTH` pair, which
    /// [`ConjunctionBuilder`](crate::conjunction::ConjunctionBuilder) keeps apart.
    pub(crate) fn combine(&mut self, other: SimpleTest) -> bool {
        use SimpleTestKind::*;

        debug_assert_eq!(self.identifier.key(), other.identifier.key());
        let current = std::mem::replace(&mut self.kind, NotNull);
        let (kind, consistent) = match (current, other.kind) {
            (Null, NotNull) | (NotNull, Null) => (Null, false),
            (kind, NotNull) | (NotNull, kind) => (kind, true),
            (Id, Id) => (Id, true),
            (NotId, NotId) => (NotId, true),
            (Null, Null) => (Null, true),
            (Eq(left), Eq(right)) => {
                let consistent = values_equal(&left, &right);
                (Eq(left), consistent)
            }
            (Eq(value), Numeric(range)) | (Numeric(range), Eq(value)) => {
                let consistent = value.as_number().is_some_and(|n| range.contains(n));
                (Eq(value), consistent)
            }
            (Numeric(mut range), Numeric(other)) => {
                if !range.intersect(&other) {
                    (Numeric(range), false)
                } else if let Some(point) = range.as_point() {
                    (Eq(Value::Number(point)), true)
                } else {
                    (Numeric(range), true)
                }
            }
            (StringOth(mut left), StringOth(right)) => {
                left.extend(right);
                (StringOth(left), true)
            }
            (StringOth(predicates), kind) | (kind, StringOth(predicates)) => match kind.assumed_value() {
                Some(value) => {
                    let consistent = satisfies_all(&predicates, value.as_ref());
                    (kind, consistent)
                }
                None => unreachable!("{} and STRINGOTH tests are never combined", kind.name()),
            },
            (kind, _) => (kind, false),
        };
        self.kind = kind;
        consistent
    }

    /// The literal this test pins its identifier to, if any.
    pub(crate) fn substitution(&self) -> Option<(IdentifierKey, Literal)> {
        if self.identifier.is_extended() {
            return None;
        }
        let literal = match &self.kind {
            SimpleTestKind::Id => Literal::new(true),
            SimpleTestKind::NotId => Literal::new(false),
            SimpleTestKind::Eq(value) => Literal::new(value.clone()),
            SimpleTestKind::Null => Literal::from_result(None, self.identifier.ty()),
            _ => return None,
        };
        Some((self.identifier.key(), literal))
    }

    /// Keeps at most one `LIKE`/`TOPIC LIKE` predicate of a `STRINGOTH` test
    /// and hands back the others.
    pub(crate) fn shed(&mut self) -> Vec<Selector> {
        let SimpleTestKind::StringOth(predicates) = &mut self.kind else {
            return Vec::new();
        };
        let mut kept = None;
        let mut shed = Vec::new();
        for predicate in std::mem::take(predicates) {
            if kept.is_none() && predicate.op().is_some_and(OpCode::is_pattern) {
                kept = Some(predicate);
            } else {
                shed.push(predicate);
            }
        }
        predicates.extend(kept);
        shed
    }

    /// A `STRINGOTH` test left without predicates.
    pub(crate) fn is_vacuous(&self) -> bool {
        matches!(&self.kind, SimpleTestKind::StringOth(predicates) if predicates.is_empty())
    }

    /// Evaluates the test against one message.
    pub fn evaluate(
        &self,
        binding: &dyn MessageBinding,
        cache: &mut EvalCache,
        context: Option<&Value>,
        permissive: bool,
    ) -> FilterResult<Option<bool>> {
        let evaluator = Evaluator;
        if let SimpleTestKind::StringOth(predicates) = &self.kind {
            let mut result = Some(true);
            for predicate in predicates {
                let value = evaluator.eval(predicate, binding, cache, context, permissive)?;
                result = and3(result, truth(value, permissive));
                if result == Some(false) {
                    break;
                }
            }
            return Ok(result);
        }
        let value = evaluator.eval_identifier(&self.identifier, binding, context, permissive)?;
        let result = match &self.kind {
            SimpleTestKind::Id => truth(value, permissive),
            SimpleTestKind::NotId => truth(value, permissive).map(|b| !b),
            SimpleTestKind::Null => Some(value.is_none()),
            SimpleTestKind::NotNull => Some(value.is_some()),
            SimpleTestKind::Eq(expected) => compare(OpCode::Eq, value.as_ref(), Some(expected), permissive),
            SimpleTestKind::Numeric(range) => value.as_ref().and_then(Value::as_number).map(|n| range.contains(n)),
            SimpleTestKind::StringOth(_) => unreachable!(),
        };
        Ok(result)
    }

    /// Rebuilds the test as a selector tree.
    pub fn to_selector(&self) -> Selector {
        let identifier: Selector = self.identifier.clone().into();
        match &self.kind {
            SimpleTestKind::Id => identifier,
            SimpleTestKind::NotId => Operator::unary(OpCode::Not, identifier).into(),
            SimpleTestKind::Null => Operator::unary(OpCode::IsNull, identifier).into(),
            SimpleTestKind::NotNull => {
                Operator::unary(OpCode::Not, Operator::unary(OpCode::IsNull, identifier).into()).into()
            }
            SimpleTestKind::Eq(value) => Operator::binary(OpCode::Eq, identifier, Literal::new(value.clone()).into()).into(),
            SimpleTestKind::StringOth(predicates) => conjoin(predicates.clone()).unwrap_or_else(|| Literal::new(true).into()),
            SimpleTestKind::Numeric(range) => {
                conjoin(range.bound_predicates(&self.identifier)).unwrap_or_else(|| Literal::new(true).into())
            }
        }
    }
}

impl fmt::Display for SimpleTest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            SimpleTestKind::Numeric(range) => write!(f, "{} NUMERIC {}", self.identifier, range),
            SimpleTestKind::Eq(value) => write!(f, "{} EQ {}", self.identifier, value),
            SimpleTestKind::StringOth(_) => write!(f, "{} STRINGOTH {}", self.identifier, self.to_selector()),
            kind => write!(f, "{} {}", self.identifier, kind.name()),
        }
    }
}

/// Left-deep `AND` of `terms`, `None` when there are none.
pub(crate) fn conjoin(terms: Vec<Selector>) -> Option<Selector> {
    terms
        .into_iter()
        .reduce(|left, right| Operator::with_type(OpCode::And, vec![left, right], SelectorType::Boolean).into())
}

fn values_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(l), Value::Number(r)) => l.numeric_eq(r),
        _ => left == right,
    }
}

/// Answers every field lookup with one fixed value.
struct SingleValueBinding<'a>(Option<&'a Value>);

impl MessageBinding for SingleValueBinding<'_> {
    fn get_field(&self, _identifier: &Identifier, _want: SelectorType, _context: Option<&Value>) -> FilterResult<Option<Value>> {
        Ok(self.0.cloned())
    }
}

/// Whether every predicate is definitely true when its identifier holds `value`.
fn satisfies_all(predicates: &[Selector], value: Option<&Value>) -> bool {
    let binding = SingleValueBinding(value);
    predicates.iter().all(|predicate| {
        let mut cache = EvalCache::new();
        matches!(
            Evaluator.eval(predicate, &binding, &mut cache, None, false),
            Ok(Some(Value::Boolean(true)))
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::builders::*;
    use crate::expression::MessageEvaluationContext;

    fn id(name: &str, ty: SelectorType) -> Selector {
        Identifier::new(name).with_type(ty).into()
    }

    fn test_of(predicate: Selector) -> SimpleTest {
        SimpleTest::from_selector(predicate)
    }

    #[test]
    fn test_classification() {
        assert_eq!(test_of(id("b", SelectorType::Boolean)).kind(), &SimpleTestKind::Id);
        assert_eq!(test_of(not(id("b", SelectorType::Boolean))).kind(), &SimpleTestKind::NotId);
        assert_eq!(test_of(is_null(identifier("s"))).kind(), &SimpleTestKind::Null);
        assert_eq!(test_of(not(is_null(identifier("s")))).kind(), &SimpleTestKind::NotNull);
        assert_eq!(
            test_of(eq(identifier("s"), literal("x"))).kind(),
            &SimpleTestKind::Eq(Value::from("x"))
        );
        assert_eq!(test_of(eq(identifier("b"), literal(false))).kind(), &SimpleTestKind::NotId);
        assert_eq!(
            test_of(gt(identifier("n"), literal(2))).kind(),
            &SimpleTestKind::Numeric(NumericRange::at_least(NumericValue::Int(2), false))
        );
        assert_eq!(
            test_of(gt(literal(2), identifier("n"))).kind(),
            &SimpleTestKind::Numeric(NumericRange::at_most(NumericValue::Int(2), false))
        );
        assert!(matches!(
            test_of(like(identifier("s"), "a%", None)).kind(),
            SimpleTestKind::StringOth(p) if p.len() == 1
        ));
        assert!(matches!(
            test_of(ne(identifier("s"), literal("x"))).kind(),
            SimpleTestKind::StringOth(_)
        ));
    }

    #[test]
    fn test_range_intersection() {
        let mut range = NumericRange::at_least(NumericValue::Int(2), false);
        assert!(range.intersect(&NumericRange::at_most(NumericValue::Int(5), true)));
        assert!(range.contains(&NumericValue::Int(5)));
        assert!(!range.contains(&NumericValue::Int(2)));
        assert!(!range.contains(&NumericValue::Double(f64::NAN)));
        assert!(!range.intersect(&NumericRange::at_least(NumericValue::Double(5.5), true)));
    }

    #[test]
    fn test_range_tightens_to_point() {
        let mut a = test_of(ge(identifier("n"), literal(3)));
        assert!(a.combine(test_of(le(identifier("n"), literal(3)))));
        assert_eq!(a.kind(), &SimpleTestKind::Eq(Value::from(3)));
    }

    #[test]
    fn test_combine_contradictions() {
        let mut null = test_of(is_null(identifier("s")));
        assert!(!null.combine(test_of(not(is_null(identifier("s"))))));

        let mut eq_x = test_of(eq(identifier("s"), literal("x")));
        assert!(!eq_x.combine(test_of(eq(identifier("s"), literal("y")))));

        let mut id_true = test_of(id("b", SelectorType::Boolean));
        assert!(!id_true.combine(test_of(not(id("b", SelectorType::Boolean)))));
    }

    #[test]
    fn test_not_null_is_absorbed() {
        let mut eq_x = test_of(eq(identifier("s"), literal("x")));
        assert!(eq_x.combine(test_of(not(is_null(id("s", SelectorType::String))))));
        assert_eq!(eq_x.kind(), &SimpleTestKind::Eq(Value::from("x")));

        let mut not_null = test_of(not(is_null(id("n", SelectorType::Numeric))));
        assert!(not_null.combine(test_of(gt(identifier("n"), literal(2)))));
        assert!(matches!(not_null.kind(), SimpleTestKind::Numeric(_)));
    }

    #[test]
    fn test_eq_checked_against_range_and_patterns() {
        let mut eq_4 = test_of(eq(identifier("n"), literal(4)));
        assert!(eq_4.combine(test_of(gt(identifier("n"), literal(2)))));
        let mut eq_1 = test_of(eq(identifier("n"), literal(1)));
        assert!(!eq_1.combine(test_of(gt(identifier("n"), literal(2)))));

        let mut eq_s = test_of(eq(identifier("s"), literal("abc")));
        assert!(eq_s.combine(test_of(like(identifier("s"), "a%", None))));
        assert_eq!(eq_s.kind(), &SimpleTestKind::Eq(Value::from("abc")));
        let mut eq_t = test_of(eq(identifier("s"), literal("xyz")));
        assert!(!eq_t.combine(test_of(like(identifier("s"), "a%", None))));
    }

    #[test]
    fn test_string_others_concatenate() {
        let mut first = test_of(like(identifier("s"), "a%", None));
        assert!(first.combine(test_of(like(identifier("s"), "%z", None))));
        assert!(matches!(first.kind(), SimpleTestKind::StringOth(p) if p.len() == 2));
        let shed = first.shed();
        assert_eq!(shed.len(), 1);
        assert!(!first.is_vacuous());
    }

    #[test]
    fn test_substitution_skips_extended() {
        let plain = test_of(eq(identifier("s"), literal("x")));
        assert!(plain.substitution().is_some());
        let extended = test_of(eq(Identifier::new("s").extended().into(), literal("x")));
        assert!(extended.substitution().is_none());
        let range = test_of(gt(identifier("n"), literal(1)));
        assert!(range.substitution().is_none());
    }

    #[test]
    fn test_evaluate() {
        let mut message = MessageEvaluationContext::new();
        message.put_value("n", 4);
        message.put("s", "abc");
        let mut cache = EvalCache::new();

        let range = test_of(gt(identifier("n"), literal(2)));
        assert_eq!(range.evaluate(&message, &mut cache, None, false).unwrap(), Some(true));
        let missing = test_of(is_null(identifier("m")));
        assert_eq!(missing.evaluate(&message, &mut cache, None, false).unwrap(), Some(true));
        let pattern = test_of(like(identifier("s"), "x%", None));
        assert_eq!(pattern.evaluate(&message, &mut cache, None, false).unwrap(), Some(false));
    }

    #[test]
    fn test_to_selector_display() {
        let range = test_of(gt(identifier("n"), literal(2)));
        assert_eq!(range.to_string(), "n NUMERIC (2, +inf)");
        let mut narrowed = range.clone();
        assert!(narrowed.combine(test_of(le(identifier("n"), literal(9)))));
        assert_eq!(narrowed.to_selector().num_identifiers(), 2);
    }
}
