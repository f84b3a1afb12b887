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

pub mod op_code;
pub mod selector_domain;
pub mod selector_type;

pub use op_code::OpCode;
pub use selector_domain::SelectorDomain;
pub use selector_type::SelectorType;

/// Separator between the levels of a hierarchical topic.
pub const TOPIC_SEPARATOR: char = '/';

/// Single-level topic wildcard; matches exactly one topic segment.
pub const TOPIC_SINGLE_LEVEL_WILDCARD: char = '*';

/// Multi-level topic wildcard; matches zero or more whole segments.
pub const TOPIC_MULTI_LEVEL_WILDCARD: &str = "//";

/// Topics starting with this marker are never matched by a lone multi-level wildcard.
pub const RESERVED_TOPIC_MARKER: char = ':';

/// SQL `LIKE` wildcard matching exactly one character.
pub const SQL_MATCH_ONE: char = '_';

/// SQL `LIKE` wildcard matching any run of characters.
pub const SQL_MATCH_MANY: char = '%';

/// Name of the identifier that carries the message topic.
pub const TOPIC_IDENTIFIER: &str = "topic";
