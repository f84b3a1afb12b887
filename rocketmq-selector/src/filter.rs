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

mod filter_factory;
mod filter_spi;
mod selector_compiler;

pub use filter_factory::ParserRegistry;
pub use filter_spi::SelectorParser;
pub use filter_spi::SelectorParserSpi;
pub use filter_spi::TopicSyntaxChecker;
pub use selector_compiler::CompiledSelector;
pub use selector_compiler::SelectorCompiler;
