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

use crate::constant::SelectorType;
use crate::expression::evaluator::Evaluator;
use crate::expression::selector::Literal;
use crate::expression::selector::Selector;

/// Replaces every identifier-free operator subtree with the literal it evaluates to.
///
/// Folding runs bottom-up. Nodes of type `INVALID` are never evaluated and are
/// left in place, so a folded tree may still contain them below an `INVALID`
/// root. Folding does not change any node's type or identifier count.
///
/// # Example
///
/// ```ignore
/// // (price > (2 + 3))  becomes  (price > 5)
/// let tree = fold(Operator::binary(OpCode::Gt, price, two_plus_three.into()).into());
/// ```
pub fn fold(mut selector: Selector) -> Selector {
    fold_in_place(&mut selector);
    selector
}

pub(crate) fn fold_in_place(selector: &mut Selector) {
    if matches!(selector, Selector::Literal(_) | Selector::Identifier(_)) {
        return;
    }
    let ty = selector.ty();
    if selector.num_identifiers() == 0 && ty != SelectorType::Invalid {
        let value = Evaluator.eval_constant(selector);
        *selector = Literal::from_result(value, ty).into();
        return;
    }
    selector.operands_mut().iter_mut().for_each(fold_in_place);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constant::OpCode;
    use crate::expression::selector::Identifier;
    use crate::expression::selector::Operator;
    use crate::expression::value::Value;

    fn lit(v: impl Into<Value>) -> Selector {
        Literal::new(v).into()
    }

    #[test]
    fn test_fold_constant_subtree() {
        let sum = Operator::binary(OpCode::Plus, lit(2), lit(3));
        let tree: Selector = Operator::binary(OpCode::Gt, Identifier::new("price").into(), sum.into()).into();
        let folded = fold(tree);
        assert_eq!(folded.to_string(), "(price > 5)");
        assert_eq!(folded.num_identifiers(), 1);
    }

    #[test]
    fn test_fold_whole_tree() {
        let cmp: Selector = Operator::binary(OpCode::Lt, lit(1), lit(2.5f64)).into();
        let folded = fold(cmp);
        assert_eq!(folded.literal_bool(), Some(true));
        assert_eq!(folded.ty(), SelectorType::Boolean);
    }

    #[test]
    fn test_unknown_result_keeps_operator_type() {
        let quotient: Selector = Operator::binary(OpCode::Div, lit(1), lit(0)).into();
        let folded = fold(quotient);
        let literal = folded.as_literal().unwrap();
        assert!(literal.value().is_none());
        assert_eq!(literal.ty(), SelectorType::Int);
    }

    #[test]
    fn test_invalid_nodes_are_left_alone() {
        let bad: Selector = Operator::binary(OpCode::Eq, lit("a"), lit(1)).into();
        let folded = fold(bad.clone());
        assert_eq!(folded, bad);
    }

    #[test]
    fn test_fold_keeps_unique_ids_of_untouched_nodes() {
        let mut sum: Selector = Operator::binary(OpCode::Plus, Identifier::new("a").into(), Identifier::new("b").into()).into();
        sum.set_unique_id(3);
        let folded = fold(Operator::binary(OpCode::Gt, sum, lit(1)).into());
        assert_eq!(folded.as_operator().unwrap().operand(0).unique_id(), 3);
    }
}
