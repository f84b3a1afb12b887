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

use crate::expression::selector::Identifier;
use crate::expression::selector::Selector;
use crate::position::position_assigner::PositionAssigner;

/// Pre-pass over the identifiers of a freshly parsed selector.
///
/// A resolver may fix identifier types from schema knowledge before it hands
/// the identifier to the [`PositionAssigner`]. Every identifier must carry an
/// ordinal position before the selector is decomposed into conjunctions.
pub trait Resolver: Send + Sync {
    fn resolve(&self, identifier: &mut Identifier, assigner: &mut PositionAssigner);
}

/// Resolver that only assigns ordinal positions.
#[derive(Debug, Clone, Copy, Default)]
pub struct MinimalResolver;

impl Resolver for MinimalResolver {
    #[inline]
    fn resolve(&self, identifier: &mut Identifier, assigner: &mut PositionAssigner) {
        assigner.assign(identifier);
    }
}

/// Resolves every identifier of `selector` in left-to-right order.
pub fn resolve_selector(selector: &mut Selector, resolver: &dyn Resolver, assigner: &mut PositionAssigner) {
    selector.for_each_identifier_mut(&mut |identifier| resolver.resolve(identifier, assigner));
}
