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

//! # RocketMQ Selector Error Handling
//!
//! Error types shared by the selector crates.
//!
//! Failures fall into two classes:
//! - **Recoverable** failures are returned as [`FilterError`]. A malformed message, an unknown
//!   selector domain, bad syntax handed back by a parser or an unreadable configuration file
//!   all land here. A bad message only fails the single evaluation that touched it.
//! - **Invariant** failures (evaluating an `INVALID` node, colliding ordinal positions) are bugs
//!   in the caller or in the selector core and panic.
//!
//! ```rust
//! use rocketmq_error::FilterError;
//! use rocketmq_error::FilterResult;
//!
//! fn read_priority(raw: &str) -> FilterResult<i32> {
//!     raw.parse::<i32>()
//!         .map_err(|e| FilterError::bad_message_format("JMSPriority", e.to_string()))
//! }
//! # assert!(read_priority("4").is_ok());
//! # assert!(read_priority("high").is_err());
//! ```

// Filter error module
pub mod filter_error;

pub use filter_error::FilterError;

/// Result alias used throughout the selector crates.
pub type FilterResult<T> = std::result::Result<T, FilterError>;
