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

//! Content-based selector compiler and evaluator.
//!
//! A selector is a boolean expression over message fields. It is compiled
//! once into disjunctive normal form, and each disjunct is split into
//! single-field tests plus a residual. Messages are then matched against the
//! compiled form under three-valued logic.

pub mod config;
pub mod conjunction;
pub mod constant;
pub mod expression;
pub mod filter;
pub mod pattern;
pub mod position;
pub mod transform;

// Re-export commonly used compiler types
pub use config::SelectorConfig;
pub use conjunction::Conjunction;
pub use conjunction::Organized;
pub use conjunction::SimpleTest;
pub use filter::CompiledSelector;
pub use filter::ParserRegistry;
pub use filter::SelectorCompiler;
pub use filter::SelectorParser;
pub use filter::TopicSyntaxChecker;

// Re-export commonly used expression types
pub use expression::EvalCache;
pub use expression::Evaluator;
pub use expression::MessageBinding;
pub use expression::MessageEvaluationContext;
pub use expression::Selector;
pub use expression::Value;
