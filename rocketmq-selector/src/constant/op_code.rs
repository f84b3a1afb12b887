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

/// Operation codes of selector operator nodes.
///
/// `IN` and `BETWEEN` never reach the core: parsers expand them into
/// `OR`-chains of `EQ` and pairs of `GE`/`LE` respectively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpCode {
    Not,
    Neg,
    IsNull,
    Like,
    TopicLike,
    Ne,
    Gt,
    Lt,
    Eq,
    Ge,
    Le,
    Plus,
    Minus,
    Times,
    Div,
    And,
    Or,
}

impl OpCode {
    /// Number of operands the operator takes.
    #[inline]
    pub fn arity(self) -> usize {
        match self {
            OpCode::Not | OpCode::Neg | OpCode::IsNull | OpCode::Like | OpCode::TopicLike => 1,
            _ => 2,
        }
    }

    #[inline]
    pub fn is_unary(self) -> bool {
        self.arity() == 1
    }

    /// `GT`, `LT`, `GE` or `LE`.
    #[inline]
    pub fn is_ordering(self) -> bool {
        matches!(self, OpCode::Gt | OpCode::Lt | OpCode::Ge | OpCode::Le)
    }

    #[inline]
    pub fn is_comparison(self) -> bool {
        self.is_ordering() || matches!(self, OpCode::Eq | OpCode::Ne)
    }

    #[inline]
    pub fn is_arithmetic(self) -> bool {
        matches!(self, OpCode::Plus | OpCode::Minus | OpCode::Times | OpCode::Div)
    }

    #[inline]
    pub fn is_pattern(self) -> bool {
        matches!(self, OpCode::Like | OpCode::TopicLike)
    }

    /// The comparison that holds exactly when `self` is false, e.g. `GT` becomes `LE`.
    pub fn negated_comparison(self) -> Option<OpCode> {
        match self {
            OpCode::Gt => Some(OpCode::Le),
            OpCode::Lt => Some(OpCode::Ge),
            OpCode::Ge => Some(OpCode::Lt),
            OpCode::Le => Some(OpCode::Gt),
            OpCode::Eq => Some(OpCode::Ne),
            OpCode::Ne => Some(OpCode::Eq),
            _ => None,
        }
    }

    /// The comparison obtained by swapping the operands, e.g. `a > b` is `b < a`.
    pub fn mirrored_comparison(self) -> Option<OpCode> {
        match self {
            OpCode::Gt => Some(OpCode::Lt),
            OpCode::Lt => Some(OpCode::Gt),
            OpCode::Ge => Some(OpCode::Le),
            OpCode::Le => Some(OpCode::Ge),
            OpCode::Eq => Some(OpCode::Eq),
            OpCode::Ne => Some(OpCode::Ne),
            _ => None,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            OpCode::Not => "NOT",
            OpCode::Neg => "-",
            OpCode::IsNull => "IS NULL",
            OpCode::Like => "LIKE",
            OpCode::TopicLike => "TOPIC LIKE",
            OpCode::Ne => "<>",
            OpCode::Gt => ">",
            OpCode::Lt => "<",
            OpCode::Eq => "=",
            OpCode::Ge => ">=",
            OpCode::Le => "<=",
            OpCode::Plus => "+",
            OpCode::Minus => "-",
            OpCode::Times => "*",
            OpCode::Div => "/",
            OpCode::And => "AND",
            OpCode::Or => "OR",
        }
    }
}

impl fmt::Display for OpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
