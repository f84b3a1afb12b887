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

//! Construction helpers that build operator nodes and fold them.
//!
//! Front ends (parsers, the topic subscription path) build selector trees
//! through these functions so that constant subtrees never survive
//! construction. Pattern operators are compiled here as well, with the usual
//! shortcuts: a `LIKE` pattern without wildcards becomes `=`, and a pattern of
//! nothing but `%` becomes `IS NOT NULL`.
//!
//! # Example
//!
//! ```ignore
//! use rocketmq_selector::expression::builders::*;
//!
//! let selector = and(
//!     gt(identifier("price"), literal(100)),
//!     like(identifier("region"), "EU-%", None),
//! );
//! ```

use std::sync::Arc;

use cheetah_string::CheetahString;

use crate::constant::OpCode;
use crate::expression::fold::fold;
use crate::expression::selector::Identifier;
use crate::expression::selector::LikeOperator;
use crate::expression::selector::Literal;
use crate::expression::selector::Operator;
use crate::expression::selector::Selector;
use crate::expression::value::Value;
use crate::pattern::parse_like;
use crate::pattern::parse_topic;
use crate::pattern::ParsedLike;
use crate::pattern::ParsedTopic;
use crate::pattern::Pattern;
use crate::pattern::PatternMatcher;

#[inline]
pub fn literal(value: impl Into<Value>) -> Selector {
    Literal::new(value).into()
}

#[inline]
pub fn null() -> Selector {
    Literal::null().into()
}

#[inline]
pub fn identifier(name: impl Into<CheetahString>) -> Selector {
    Identifier::new(name).into()
}

pub fn unary(op: OpCode, operand: Selector) -> Selector {
    fold(Operator::unary(op, operand).into())
}

pub fn binary(op: OpCode, left: Selector, right: Selector) -> Selector {
    fold(Operator::binary(op, left, right).into())
}

pub fn not(operand: Selector) -> Selector {
    unary(OpCode::Not, operand)
}

pub fn neg(operand: Selector) -> Selector {
    unary(OpCode::Neg, operand)
}

pub fn is_null(operand: Selector) -> Selector {
    unary(OpCode::IsNull, operand)
}

pub fn and(left: Selector, right: Selector) -> Selector {
    binary(OpCode::And, left, right)
}

pub fn or(left: Selector, right: Selector) -> Selector {
    binary(OpCode::Or, left, right)
}

pub fn eq(left: Selector, right: Selector) -> Selector {
    binary(OpCode::Eq, left, right)
}

pub fn ne(left: Selector, right: Selector) -> Selector {
    binary(OpCode::Ne, left, right)
}

pub fn gt(left: Selector, right: Selector) -> Selector {
    binary(OpCode::Gt, left, right)
}

pub fn lt(left: Selector, right: Selector) -> Selector {
    binary(OpCode::Lt, left, right)
}

pub fn ge(left: Selector, right: Selector) -> Selector {
    binary(OpCode::Ge, left, right)
}

pub fn le(left: Selector, right: Selector) -> Selector {
    binary(OpCode::Le, left, right)
}

pub fn plus(left: Selector, right: Selector) -> Selector {
    binary(OpCode::Plus, left, right)
}

pub fn minus(left: Selector, right: Selector) -> Selector {
    binary(OpCode::Minus, left, right)
}

pub fn times(left: Selector, right: Selector) -> Selector {
    binary(OpCode::Times, left, right)
}

pub fn div(left: Selector, right: Selector) -> Selector {
    binary(OpCode::Div, left, right)
}

/// `operand LIKE pattern [ESCAPE escape]`.
pub fn like(operand: Selector, pattern: &str, escape: Option<char>) -> Selector {
    match parse_like(pattern, escape) {
        ParsedLike::Literal(text) => eq(operand, literal(text)),
        ParsedLike::MatchAll if matches!(operand, Selector::Identifier(_)) => not(is_null(operand)),
        ParsedLike::MatchAll => {
            let everything = Pattern::new(None, Vec::new(), None);
            pattern_node(OpCode::Like, operand, PatternMatcher::Like(Arc::new(everything)), pattern, escape)
        }
        ParsedLike::Pattern(compiled) => {
            pattern_node(OpCode::Like, operand, PatternMatcher::Like(compiled), pattern, escape)
        }
    }
}

/// `operand TOPIC LIKE topic`; `operand` must be of type `TOPIC`.
pub fn topic_like(operand: Selector, topic: &str) -> Selector {
    match parse_topic(topic) {
        ParsedTopic::Literal(text) => eq(operand, literal(text)),
        ParsedTopic::Pattern(compiled) => {
            pattern_node(OpCode::TopicLike, operand, PatternMatcher::Topic(compiled), topic, None)
        }
    }
}

fn pattern_node(op: OpCode, operand: Selector, matcher: PatternMatcher, raw: &str, escape: Option<char>) -> Selector {
    let base = Operator::unary(op, operand);
    fold(LikeOperator::new(base, matcher, CheetahString::from(raw), escape).into())
}
