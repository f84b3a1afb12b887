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

//! Ordinal positions give every identifier a stable `(level, sequence)` key
//! so that the simple tests of every compiled conjunction are ordered the same
//! way, which any shared decision structure built downstream relies on.

pub mod ordinal_position;
pub mod position_assigner;
pub mod resolver;

pub use ordinal_position::OrdinalPosition;
pub use position_assigner::PositionAssigner;
pub use resolver::resolve_selector;
pub use resolver::MinimalResolver;
pub use resolver::Resolver;
