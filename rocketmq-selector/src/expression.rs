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

//! The selector expression model and its evaluator.

pub mod builders;
pub mod empty_evaluation_context;
pub mod eval_cache;
pub mod evaluation_context;
pub mod evaluator;
pub mod fold;
pub mod selector;
pub mod type_inference;
pub mod unique_id;
pub mod value;

pub use empty_evaluation_context::EmptyEvaluationContext;
pub use eval_cache::EvalCache;
pub use evaluation_context::MessageBinding;
pub use evaluation_context::MessageEvaluationContext;
pub use evaluator::Evaluator;
pub use fold::fold;
pub use selector::Identifier;
pub use selector::IdentifierKey;
pub use selector::LikeOperator;
pub use selector::Literal;
pub use selector::Operator;
pub use selector::Selector;
pub use unique_id::UniqueIdAssigner;
pub use value::NumericValue;
pub use value::Value;
pub use value::ValueCategory;
