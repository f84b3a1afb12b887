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

use std::collections::HashMap;

use ahash::RandomState;
use cheetah_string::CheetahString;

use crate::constant::OpCode;
use crate::constant::SelectorType;
use crate::expression::selector::Selector;

/// Computes the static type of an operator from its operands.
///
/// The result depends only on the opcode and the operand types, but operands
/// whose type is still `UNKNOWN` are committed along the way. An impossible
/// combination yields `INVALID`, and such a node must never be evaluated.
pub fn assign_type(op: OpCode, operands: &mut [Selector]) -> SelectorType {
    if operands.iter().any(|s| s.ty() == SelectorType::Invalid) {
        return SelectorType::Invalid;
    }
    match op {
        OpCode::Not => boolean_if(operands[0].may_be_boolean()),
        OpCode::Neg => {
            if operands[0].may_be_numeric() {
                operands[0].ty()
            } else {
                SelectorType::Invalid
            }
        }
        OpCode::IsNull => boolean_if(matches!(operands[0], Selector::Identifier(_))),
        OpCode::Like => boolean_if(operands[0].may_be_string()),
        OpCode::TopicLike => boolean_if(operands[0].ty() == SelectorType::Topic),
        OpCode::Eq | OpCode::Ne => equality_type(operands),
        OpCode::Gt | OpCode::Lt | OpCode::Ge | OpCode::Le => {
            let (left, right) = split_pair(operands);
            // both sides must be asked so that both get committed
            let l = left.may_be_numeric();
            let r = right.may_be_numeric();
            boolean_if(l && r)
        }
        OpCode::Plus | OpCode::Minus | OpCode::Times | OpCode::Div => {
            let (left, right) = split_pair(operands);
            let l = left.may_be_numeric();
            let r = right.may_be_numeric();
            if l && r {
                left.ty()
                    .wider_numeric(right.ty())
                    .unwrap_or(SelectorType::Invalid)
            } else {
                SelectorType::Invalid
            }
        }
        OpCode::And | OpCode::Or => {
            let (left, right) = split_pair(operands);
            let l = left.may_be_boolean();
            let r = right.may_be_boolean();
            boolean_if(l && r)
        }
    }
}

/// Commits every `UNKNOWN` identifier to the type that the same
/// `(full_name, step)` has elsewhere in `selector`.
///
/// `IS NULL` leaves its operand untyped, so without this `s IS NULL` and
/// `s = 'x'` would name two different identifiers. The first concrete type
/// met in left-to-right order wins.
pub fn unify_identifier_types(selector: &mut Selector) {
    let mut known: HashMap<(CheetahString, u32), SelectorType, RandomState> = HashMap::default();
    selector.for_each_identifier(&mut |identifier| {
        if identifier.ty() != SelectorType::Unknown {
            known
                .entry((identifier.full_name().clone(), identifier.step()))
                .or_insert(identifier.ty());
        }
    });
    if known.is_empty() {
        return;
    }
    selector.for_each_identifier_mut(&mut |identifier| {
        if identifier.ty() == SelectorType::Unknown {
            if let Some(ty) = known.get(&(identifier.full_name().clone(), identifier.step())) {
                identifier.set_type(*ty);
            }
        }
    });
}

#[inline]
fn boolean_if(ok: bool) -> SelectorType {
    if ok {
        SelectorType::Boolean
    } else {
        SelectorType::Invalid
    }
}

fn split_pair(operands: &mut [Selector]) -> (&mut Selector, &mut Selector) {
    match operands {
        [left, right] => (left, right),
        _ => panic!("binary operator with {} operands", operands.len()),
    }
}

fn equality_type(operands: &mut [Selector]) -> SelectorType {
    let (left, right) = split_pair(operands);
    let mut l = left.ty().equality_category();
    let mut r = right.ty().equality_category();
    if l == SelectorType::Unknown && r != SelectorType::Unknown {
        left.set_type(r);
        l = r;
    } else if r == SelectorType::Unknown && l != SelectorType::Unknown {
        right.set_type(l);
        r = l;
    }
    boolean_if(l == r)
}
