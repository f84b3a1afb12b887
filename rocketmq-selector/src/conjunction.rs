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

pub mod builder;
pub mod organized;
pub mod simple_test;

pub use builder::ConjunctionBuilder;
pub use organized::Conjunction;
pub use organized::Organized;
pub use simple_test::NumericRange;
pub use simple_test::SimpleTest;
pub use simple_test::SimpleTestKind;
