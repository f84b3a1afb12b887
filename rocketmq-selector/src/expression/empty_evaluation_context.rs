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

use rocketmq_error::FilterResult;

use crate::constant::SelectorType;
use crate::expression::evaluation_context::MessageBinding;
use crate::expression::selector::Identifier;
use crate::expression::value::Value;

/// Binding for a message that carries no fields.
///
/// Constant folding evaluates identifier-free subtrees against it.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyEvaluationContext;

impl MessageBinding for EmptyEvaluationContext {
    #[inline]
    fn get_field(
        &self,
        _identifier: &Identifier,
        _want: SelectorType,
        _context: Option<&Value>,
    ) -> FilterResult<Option<Value>> {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_field_is_missing() {
        let binding = EmptyEvaluationContext;
        let field = binding
            .get_field(&Identifier::new("anything"), SelectorType::Unknown, None)
            .unwrap();
        assert!(field.is_none());
    }
}
