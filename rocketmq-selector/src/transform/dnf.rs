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

use crate::constant::OpCode;
use crate::constant::SelectorType;
use crate::expression::evaluator::Evaluator;
use crate::expression::fold::fold;
use crate::expression::selector::Literal;
use crate::expression::selector::Operator;
use crate::expression::selector::Selector;
use crate::expression::value::Value;

/// Rewrites boolean selectors into disjunctive normal form.
///
/// `NOT` is pushed down to the leaves first, then `AND` is distributed over
/// `OR`. Every `AND`/`OR` built on the way checks its sides for constants, so
/// tautologies and contradictions collapse into literals as they appear.
/// Constant sides that evaluate to unknown count as `FALSE`, since an unknown
/// selector never matches.
#[derive(Debug, Clone, Copy, Default)]
pub struct Transformer;

impl Transformer {
    /// `simplify` followed by `distribute`.
    pub fn dnf(&self, selector: Selector) -> Selector {
        self.distribute(self.simplify(selector))
    }

    /// Pushes `NOT` down to the leaves and expands boolean `=`/`<>` and numeric `<>`.
    pub fn simplify(&self, selector: Selector) -> Selector {
        match selector.op() {
            Some(OpCode::Not) => self.simplify_not(into_operand(selector)),
            Some(OpCode::And) => {
                let (left, right) = into_pair(selector);
                self.make_and(self.simplify(left), self.simplify(right))
            }
            Some(OpCode::Or) => {
                let (left, right) = into_pair(selector);
                self.make_or(self.simplify(left), self.simplify(right))
            }
            Some(op @ (OpCode::Eq | OpCode::Ne)) if has_boolean_operands(&selector) => {
                let (left, right) = into_pair(selector);
                self.expand_boolean_equality(op == OpCode::Eq, left, right)
            }
            Some(OpCode::Ne) if has_numeric_operands(&selector) => {
                let (left, right) = into_pair(selector);
                self.split_not_equal(left, right)
            }
            _ => selector,
        }
    }

    /// Simplifies `NOT operand`.
    pub fn simplify_not(&self, operand: Selector) -> Selector {
        match operand.op() {
            Some(OpCode::Not) => self.simplify(into_operand(operand)),
            Some(OpCode::And) => {
                let (left, right) = into_pair(operand);
                self.make_or(self.simplify_not(left), self.simplify_not(right))
            }
            Some(OpCode::Or) => {
                let (left, right) = into_pair(operand);
                self.make_and(self.simplify_not(left), self.simplify_not(right))
            }
            Some(op @ (OpCode::Eq | OpCode::Ne)) if has_boolean_operands(&operand) => {
                let (left, right) = into_pair(operand);
                self.expand_boolean_equality(op == OpCode::Ne, left, right)
            }
            Some(op) if op.is_comparison() => {
                let Some(negated) = op.negated_comparison() else {
                    unreachable!("comparison {op} has no negation");
                };
                let (left, right) = into_pair(operand);
                if negated == OpCode::Ne && has_numeric_types(&left, &right) {
                    self.split_not_equal(left, right)
                } else {
                    comparison(negated, left, right)
                }
            }
            _ => fold(Operator::unary(OpCode::Not, operand).into()),
        }
    }

    /// Pushes `AND` below `OR`, so the result is an `OR` of `AND`s.
    pub fn distribute(&self, selector: Selector) -> Selector {
        match selector.op() {
            Some(OpCode::Or) => {
                let (left, right) = into_pair(selector);
                self.make_or(self.distribute(left), self.distribute(right))
            }
            Some(OpCode::And) => {
                let (left, right) = into_pair(selector);
                self.distribute_and(self.distribute(left), self.distribute(right))
            }
            _ => selector,
        }
    }

    fn distribute_and(&self, left: Selector, right: Selector) -> Selector {
        if left.op() == Some(OpCode::Or) {
            let (a, b) = into_pair(left);
            return self.make_or(self.distribute_and(a, right.clone()), self.distribute_and(b, right));
        }
        if right.op() == Some(OpCode::Or) {
            let (a, b) = into_pair(right);
            return self.make_or(self.distribute_and(left.clone(), a), self.distribute_and(left, b));
        }
        self.make_and(left, right)
    }

    /// `left AND right`, collapsing constant sides and `x AND NOT x`.
    pub fn make_and(&self, left: Selector, right: Selector) -> Selector {
        match (constant_truth(&left), constant_truth(&right)) {
            (Some(false), _) | (_, Some(false)) => return Literal::new(false).into(),
            (Some(true), _) => return right,
            (_, Some(true)) => return left,
            _ => {}
        }
        if complementary(&left, &right) {
            return Literal::new(false).into();
        }
        Operator::with_type(OpCode::And, vec![left, right], SelectorType::Boolean).into()
    }

    /// `left OR right`, collapsing constant sides and `x OR NOT x`.
    pub fn make_or(&self, left: Selector, right: Selector) -> Selector {
        match (constant_truth(&left), constant_truth(&right)) {
            (Some(true), _) | (_, Some(true)) => return Literal::new(true).into(),
            (Some(false), _) => return right,
            (_, Some(false)) => return left,
            _ => {}
        }
        if complementary(&left, &right) {
            return Literal::new(true).into();
        }
        Operator::with_type(OpCode::Or, vec![left, right], SelectorType::Boolean).into()
    }

    /// `a = b` as `(a AND b) OR (NOT a AND NOT b)`, or its negation when `equal` is false.
    fn expand_boolean_equality(&self, equal: bool, left: Selector, right: Selector) -> Selector {
        let (a, not_a) = (self.simplify(left.clone()), self.simplify_not(left));
        let (b, not_b) = (self.simplify(right.clone()), self.simplify_not(right));
        if equal {
            self.make_or(self.make_and(a, b), self.make_and(not_a, not_b))
        } else {
            self.make_or(self.make_and(a, not_b), self.make_and(not_a, b))
        }
    }

    fn split_not_equal(&self, left: Selector, right: Selector) -> Selector {
        self.make_or(
            comparison(OpCode::Lt, left.clone(), right.clone()),
            comparison(OpCode::Gt, left, right),
        )
    }
}

/// Whether one side is the simplified negation of the other.
fn complementary(left: &Selector, right: &Selector) -> bool {
    if left.is_extended() || right.is_extended() {
        return false;
    }
    negates(left, right) || negates(right, left)
}

/// Structural check that `b` is what `simplify_not(a)` produces.
fn negates(a: &Selector, b: &Selector) -> bool {
    let b_operator = b.as_operator();
    if let Some(inner) = b_operator.filter(|o| o.op() == OpCode::Not) {
        if inner.operand(0) == a {
            return true;
        }
    }
    let (Some(a_operator), Some(b_operator)) = (a.as_operator(), b_operator) else {
        return false;
    };
    match (a_operator.op(), b_operator.op()) {
        (OpCode::And, OpCode::Or) | (OpCode::Or, OpCode::And) => {
            negates(a_operator.operand(0), b_operator.operand(0)) && negates(a_operator.operand(1), b_operator.operand(1))
        }
        (OpCode::Eq, OpCode::Or) if has_numeric_operands(a) => {
            let split = |index: usize, op: OpCode| {
                b_operator
                    .operand(index)
                    .as_operator()
                    .is_some_and(|o| o.op() == op && o.operands() == a_operator.operands())
            };
            split(0, OpCode::Lt) && split(1, OpCode::Gt)
        }
        (a_op, b_op) if a_op.is_comparison() => {
            a_op.negated_comparison() == Some(b_op) && a_operator.operands() == b_operator.operands()
        }
        _ => false,
    }
}

fn comparison(op: OpCode, left: Selector, right: Selector) -> Selector {
    fold(Operator::with_type(op, vec![left, right], SelectorType::Boolean).into())
}

/// Truth of an identifier-free side, unknown counting as `false`.
fn constant_truth(selector: &Selector) -> Option<bool> {
    if selector.num_identifiers() != 0 {
        return None;
    }
    Some(Evaluator.eval_constant(selector).as_ref().and_then(Value::as_bool) == Some(true))
}

fn has_boolean_operands(selector: &Selector) -> bool {
    match selector.as_operator().map(Operator::operands) {
        Some([left, right]) => left.ty() == SelectorType::Boolean && right.ty() == SelectorType::Boolean,
        _ => false,
    }
}

fn has_numeric_operands(selector: &Selector) -> bool {
    match selector.as_operator().map(Operator::operands) {
        Some([left, right]) => has_numeric_types(left, right),
        _ => false,
    }
}

fn has_numeric_types(left: &Selector, right: &Selector) -> bool {
    left.ty().is_numeric() && right.ty().is_numeric()
}

fn into_operand(selector: Selector) -> Selector {
    let Selector::Operator(operator) = selector else {
        unreachable!("expected a unary operator");
    };
    match operator.into_operands().pop() {
        Some(operand) => operand,
        None => unreachable!("unary operator without operand"),
    }
}

fn into_pair(selector: Selector) -> (Selector, Selector) {
    let Selector::Operator(operator) = selector else {
        unreachable!("expected a binary operator");
    };
    let mut operands = operator.into_operands().into_iter();
    match (operands.next(), operands.next()) {
        (Some(left), Some(right)) => (left, right),
        _ => unreachable!("binary operator without two operands"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::builders::*;
    use crate::expression::selector::Identifier;

    fn flag(name: &str) -> Selector {
        Identifier::new(name).with_type(SelectorType::Boolean).into()
    }

    #[test]
    fn test_de_morgan() {
        let tree = not(and(flag("a"), flag("b")));
        assert_eq!(Transformer.dnf(tree).to_string(), "((NOT a) OR (NOT b))");
    }

    #[test]
    fn test_double_negation() {
        assert_eq!(Transformer.dnf(not(not(flag("a")))).to_string(), "a");
    }

    #[test]
    fn test_not_flips_ordering() {
        let tree = not(gt(identifier("n"), literal(5)));
        assert_eq!(Transformer.dnf(tree).to_string(), "(n <= 5)");
    }

    #[test]
    fn test_numeric_not_equal_splits() {
        let tree = ne(identifier("n"), literal(5));
        assert_eq!(Transformer.dnf(tree).to_string(), "((n < 5) OR (n > 5))");
        let negated = not(eq(identifier("m"), literal(5)));
        assert_eq!(Transformer.dnf(negated).to_string(), "((m < 5) OR (m > 5))");
    }

    #[test]
    fn test_string_equality_flips() {
        let tree = not(eq(identifier("s"), literal("x")));
        assert_eq!(Transformer.dnf(tree).to_string(), "(s <> 'x')");
    }

    #[test]
    fn test_boolean_equality_expands() {
        let tree = eq(flag("a"), flag("b"));
        assert_eq!(
            Transformer.dnf(tree).to_string(),
            "((a AND b) OR ((NOT a) AND (NOT b)))"
        );
    }

    #[test]
    fn test_distribute() {
        let tree = and(or(flag("a"), flag("b")), flag("c"));
        assert_eq!(Transformer.dnf(tree).to_string(), "((a AND c) OR (b AND c))");
        let right = and(flag("c"), or(flag("a"), flag("b")));
        assert_eq!(Transformer.dnf(right).to_string(), "((c AND a) OR (c AND b))");
    }

    #[test]
    fn test_constant_sides_collapse() {
        let t = Transformer;
        assert_eq!(t.make_and(flag("a"), literal(true)).to_string(), "a");
        assert_eq!(t.make_and(flag("a"), literal(false)).literal_bool(), Some(false));
        assert_eq!(t.make_or(flag("a"), literal(true)).literal_bool(), Some(true));
        assert_eq!(t.make_or(null(), flag("a")).to_string(), "a");
    }

    #[test]
    fn test_complement_detection() {
        let tautology = or(eq(identifier("a"), literal(1)), ne(identifier("a"), literal(1)));
        assert_eq!(Transformer.dnf(tautology).literal_bool(), Some(true));
        let contradiction = and(flag("a"), not(flag("a")));
        assert_eq!(Transformer.dnf(contradiction).literal_bool(), Some(false));
    }

    #[test]
    fn test_dnf_is_stable() {
        let tree = not(or(and(flag("a"), gt(identifier("n"), literal(1))), flag("b")));
        let once = Transformer.dnf(tree);
        let twice = Transformer.dnf(once.clone());
        assert_eq!(once, twice);
    }
}
