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

//! The selector expression tree.
//!
//! A [`Selector`] is a closed tagged union of four node kinds:
//!
//! - [`Literal`]: a constant, possibly the null literal
//! - [`Identifier`]: a named message field
//! - [`Operator`]: one of the [`OpCode`]s applied to one or two operands
//! - [`LikeOperator`]: a `LIKE` or `TOPIC LIKE` operator with its compiled pattern
//!
//! Every node carries a static [`SelectorType`], the number of identifier
//! nodes below it, an optional `unique_id` used to memoize common
//! subexpressions during evaluation, and an `extended` flag for nodes built by
//! the XPath predicate front end.
//!
//! Operators compute their type and identifier count when constructed.
//! Constant folding is a separate, explicit pass; see
//! [`fold`](crate::expression::fold::fold).

use std::fmt;

use cheetah_string::CheetahString;

use crate::constant::OpCode;
use crate::constant::SelectorDomain;
use crate::constant::SelectorType;
use crate::expression::type_inference::assign_type;
use crate::expression::value::Value;
use crate::pattern::PatternMatcher;
use crate::position::OrdinalPosition;

/// A constant value. `value == None` is the null literal.
#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    value: Option<Value>,
    ty: SelectorType,
    unique_id: u32,
    extended: bool,
}

impl Literal {
    pub fn new(value: impl Into<Value>) -> Self {
        let value = value.into();
        Self {
            ty: value.selector_type(),
            value: Some(value),
            unique_id: 0,
            extended: false,
        }
    }

    pub fn null() -> Self {
        Self {
            value: None,
            ty: SelectorType::Unknown,
            unique_id: 0,
            extended: false,
        }
    }

    /// Literal holding an evaluation result; an unknown result keeps `fallback` as its type.
    pub fn from_result(value: Option<Value>, fallback: SelectorType) -> Self {
        let ty = value.as_ref().map_or(fallback, Value::selector_type);
        Self {
            value,
            ty,
            unique_id: 0,
            extended: false,
        }
    }

    #[inline]
    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    #[inline]
    pub fn ty(&self) -> SelectorType {
        self.ty
    }

    /// `Some(b)` when the literal is the boolean `b`.
    #[inline]
    pub fn as_bool(&self) -> Option<bool> {
        self.value.as_ref().and_then(Value::as_bool)
    }
}

/// Reference to a named field of a message.
#[derive(Debug, Clone, PartialEq)]
pub struct Identifier {
    name: CheetahString,
    full_name: CheetahString,
    ordinal_position: Option<OrdinalPosition>,
    schema_id: u64,
    step: u32,
    domain: SelectorDomain,
    case_of: Option<CheetahString>,
    ty: SelectorType,
    unique_id: u32,
    extended: bool,
}

/// Identity of an identifier for the purpose of merging simple tests: the same
/// full name at the same step with the same basic type category.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IdentifierKey {
    full_name: CheetahString,
    step: u32,
    category: char,
}

impl Identifier {
    pub fn new(name: impl Into<CheetahString>) -> Self {
        let name = name.into();
        Self {
            full_name: name.clone(),
            name,
            ordinal_position: None,
            schema_id: 0,
            step: 0,
            domain: SelectorDomain::default(),
            case_of: None,
            ty: SelectorType::Unknown,
            unique_id: 0,
            extended: false,
        }
    }

    pub fn with_type(mut self, ty: SelectorType) -> Self {
        self.ty = ty;
        self
    }

    pub fn with_full_name(mut self, full_name: impl Into<CheetahString>) -> Self {
        self.full_name = full_name.into();
        self
    }

    pub fn with_step(mut self, step: u32) -> Self {
        self.step = step;
        self
    }

    pub fn with_domain(mut self, domain: SelectorDomain) -> Self {
        self.domain = domain;
        self
    }

    pub fn with_schema_id(mut self, schema_id: u64) -> Self {
        self.schema_id = schema_id;
        self
    }

    /// Marks this identifier as a typed case of the identifier named `case_of`.
    pub fn with_case_of(mut self, case_of: impl Into<CheetahString>) -> Self {
        self.case_of = Some(case_of.into());
        self
    }

    /// Marks the identifier as produced by the XPath predicate front end.
    pub fn extended(mut self) -> Self {
        self.extended = true;
        self
    }

    #[inline]
    pub fn name(&self) -> &CheetahString {
        &self.name
    }

    #[inline]
    pub fn full_name(&self) -> &CheetahString {
        &self.full_name
    }

    #[inline]
    pub fn ordinal_position(&self) -> Option<OrdinalPosition> {
        self.ordinal_position
    }

    #[inline]
    pub fn set_ordinal_position(&mut self, position: OrdinalPosition) {
        self.ordinal_position = Some(position);
    }

    #[inline]
    pub fn schema_id(&self) -> u64 {
        self.schema_id
    }

    #[inline]
    pub fn step(&self) -> u32 {
        self.step
    }

    #[inline]
    pub fn domain(&self) -> SelectorDomain {
        self.domain
    }

    #[inline]
    pub fn case_of(&self) -> Option<&CheetahString> {
        self.case_of.as_ref()
    }

    #[inline]
    pub fn ty(&self) -> SelectorType {
        self.ty
    }

    /// Resolvers may fix the type of an identifier from schema knowledge.
    #[inline]
    pub fn set_type(&mut self, ty: SelectorType) {
        self.ty = ty;
    }

    #[inline]
    pub fn is_extended(&self) -> bool {
        self.extended
    }

    pub fn key(&self) -> IdentifierKey {
        IdentifierKey {
            full_name: self.full_name.clone(),
            step: self.step,
            category: self.ty.category_code(),
        }
    }
}

/// An operator node with one or two operands.
#[derive(Debug, Clone, PartialEq)]
pub struct Operator {
    op: OpCode,
    operands: Vec<Selector>,
    ty: SelectorType,
    num_identifiers: usize,
    unique_id: u32,
    extended: bool,
}

impl Operator {
    /// Builds an operator node, computing its type from the operands.
    ///
    /// Operands of `UNKNOWN` type may be committed to a concrete type as a side
    /// effect. The node is *not* folded; call
    /// [`fold`](crate::expression::fold::fold) on the result when the operands
    /// might be constant.
    ///
    /// # Panics
    ///
    /// Panics when the number of operands does not match the opcode's arity.
    pub fn new(op: OpCode, mut operands: Vec<Selector>) -> Self {
        assert_eq!(
            operands.len(),
            op.arity(),
            "operator {op} takes {} operand(s)",
            op.arity()
        );
        let ty = assign_type(op, &mut operands);
        Self::with_type(op, operands, ty)
    }

    /// Rebuilds an operator keeping an already computed type.
    pub(crate) fn with_type(op: OpCode, operands: Vec<Selector>, ty: SelectorType) -> Self {
        let num_identifiers = operands.iter().map(Selector::num_identifiers).sum();
        let extended = operands.iter().any(Selector::is_extended);
        Self {
            op,
            operands,
            ty,
            num_identifiers,
            unique_id: 0,
            extended,
        }
    }

    pub fn unary(op: OpCode, operand: Selector) -> Self {
        Self::new(op, vec![operand])
    }

    pub fn binary(op: OpCode, left: Selector, right: Selector) -> Self {
        Self::new(op, vec![left, right])
    }

    #[inline]
    pub fn op(&self) -> OpCode {
        self.op
    }

    #[inline]
    pub fn operands(&self) -> &[Selector] {
        &self.operands
    }

    #[inline]
    pub fn operand(&self, index: usize) -> &Selector {
        &self.operands[index]
    }

    pub(crate) fn into_operands(self) -> Vec<Selector> {
        self.operands
    }

    #[inline]
    pub fn ty(&self) -> SelectorType {
        self.ty
    }

    #[inline]
    pub fn num_identifiers(&self) -> usize {
        self.num_identifiers
    }
}

/// `LIKE` or `TOPIC LIKE` with its pattern compiled once at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct LikeOperator {
    base: Operator,
    pattern: PatternMatcher,
    raw_pattern: CheetahString,
    escaped: bool,
    escape: Option<char>,
}

impl LikeOperator {
    pub(crate) fn new(
        base: Operator,
        pattern: PatternMatcher,
        raw_pattern: CheetahString,
        escape: Option<char>,
    ) -> Self {
        debug_assert!(base.op().is_pattern());
        Self {
            base,
            pattern,
            raw_pattern,
            escaped: escape.is_some(),
            escape,
        }
    }

    #[inline]
    pub fn base(&self) -> &Operator {
        &self.base
    }

    #[inline]
    pub fn pattern(&self) -> &PatternMatcher {
        &self.pattern
    }

    #[inline]
    pub fn raw_pattern(&self) -> &CheetahString {
        &self.raw_pattern
    }

    #[inline]
    pub fn is_escaped(&self) -> bool {
        self.escaped
    }

    #[inline]
    pub fn escape(&self) -> Option<char> {
        self.escape
    }
}

/// A boolean filter expression tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Selector {
    Literal(Literal),
    Identifier(Identifier),
    Operator(Operator),
    Like(LikeOperator),
}

impl Selector {
    #[inline]
    pub fn ty(&self) -> SelectorType {
        match self {
            Selector::Literal(l) => l.ty,
            Selector::Identifier(i) => i.ty,
            Selector::Operator(o) => o.ty,
            Selector::Like(l) => l.base.ty,
        }
    }

    pub(crate) fn set_type(&mut self, ty: SelectorType) {
        match self {
            Selector::Literal(l) => l.ty = ty,
            Selector::Identifier(i) => i.ty = ty,
            Selector::Operator(o) => o.ty = ty,
            Selector::Like(l) => l.base.ty = ty,
        }
    }

    /// Count of identifier nodes in this subtree.
    #[inline]
    pub fn num_identifiers(&self) -> usize {
        match self {
            Selector::Literal(_) => 0,
            Selector::Identifier(_) => 1,
            Selector::Operator(o) => o.num_identifiers,
            Selector::Like(l) => l.base.num_identifiers,
        }
    }

    #[inline]
    pub fn unique_id(&self) -> u32 {
        match self {
            Selector::Literal(l) => l.unique_id,
            Selector::Identifier(i) => i.unique_id,
            Selector::Operator(o) => o.unique_id,
            Selector::Like(l) => l.base.unique_id,
        }
    }

    pub(crate) fn set_unique_id(&mut self, id: u32) {
        match self {
            Selector::Literal(l) => l.unique_id = id,
            Selector::Identifier(i) => i.unique_id = id,
            Selector::Operator(o) => o.unique_id = id,
            Selector::Like(l) => l.base.unique_id = id,
        }
    }

    #[inline]
    pub fn is_extended(&self) -> bool {
        match self {
            Selector::Literal(l) => l.extended,
            Selector::Identifier(i) => i.extended,
            Selector::Operator(o) => o.extended,
            Selector::Like(l) => l.base.extended,
        }
    }

    /// The opcode of an operator node (plain or `LIKE`).
    #[inline]
    pub fn op(&self) -> Option<OpCode> {
        self.as_operator().map(Operator::op)
    }

    /// The operator part of an operator or `LIKE` node.
    #[inline]
    pub fn as_operator(&self) -> Option<&Operator> {
        match self {
            Selector::Operator(o) => Some(o),
            Selector::Like(l) => Some(&l.base),
            _ => None,
        }
    }

    #[inline]
    pub fn as_identifier(&self) -> Option<&Identifier> {
        match self {
            Selector::Identifier(i) => Some(i),
            _ => None,
        }
    }

    #[inline]
    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Selector::Literal(l) => Some(l),
            _ => None,
        }
    }

    /// `Some(b)` for a boolean literal.
    #[inline]
    pub fn literal_bool(&self) -> Option<bool> {
        self.as_literal().and_then(Literal::as_bool)
    }

    /// Commits an `UNKNOWN` node to `ty` and reports whether the node now has that type.
    pub fn may_be(&mut self, ty: SelectorType) -> bool {
        if self.ty() == SelectorType::Unknown {
            self.set_type(ty);
        }
        self.ty() == ty
    }

    #[inline]
    pub fn may_be_boolean(&mut self) -> bool {
        self.may_be(SelectorType::Boolean)
    }

    #[inline]
    pub fn may_be_string(&mut self) -> bool {
        self.may_be(SelectorType::String)
    }

    /// Commits an `UNKNOWN` node to `NUMERIC` and reports whether the node is of any numeric type.
    pub fn may_be_numeric(&mut self) -> bool {
        if self.ty() == SelectorType::Unknown {
            self.set_type(SelectorType::Numeric);
        }
        self.ty().is_numeric()
    }

    /// Recomputes identifier count and `extended` after operands were replaced
    /// in place, and drops the node's `unique_id`.
    pub(crate) fn refresh(&mut self) {
        let operator = match self {
            Selector::Operator(o) => o,
            Selector::Like(l) => &mut l.base,
            _ => return,
        };
        operator.num_identifiers = operator.operands.iter().map(Selector::num_identifiers).sum();
        operator.extended = operator.operands.iter().any(Selector::is_extended);
        operator.unique_id = 0;
    }

    pub(crate) fn operands_mut(&mut self) -> &mut [Selector] {
        match self {
            Selector::Operator(o) => &mut o.operands,
            Selector::Like(l) => &mut l.base.operands,
            _ => &mut [],
        }
    }

    /// Visits every identifier in the tree, allowing it to be updated in place.
    pub fn for_each_identifier_mut(&mut self, f: &mut impl FnMut(&mut Identifier)) {
        match self {
            Selector::Literal(_) => {}
            Selector::Identifier(i) => f(i),
            Selector::Operator(o) => o.operands.iter_mut().for_each(|s| s.for_each_identifier_mut(f)),
            Selector::Like(l) => l
                .base
                .operands
                .iter_mut()
                .for_each(|s| s.for_each_identifier_mut(f)),
        }
    }

    pub fn for_each_identifier<'a>(&'a self, f: &mut impl FnMut(&'a Identifier)) {
        match self {
            Selector::Literal(_) => {}
            Selector::Identifier(i) => f(i),
            Selector::Operator(o) => o.operands.iter().for_each(|s| s.for_each_identifier(f)),
            Selector::Like(l) => l.base.operands.iter().for_each(|s| s.for_each_identifier(f)),
        }
    }

    /// The first identifier in the tree, in left-to-right order.
    pub fn first_identifier(&self) -> Option<&Identifier> {
        match self {
            Selector::Literal(_) => None,
            Selector::Identifier(i) => Some(i),
            Selector::Operator(o) => o.operands.iter().find_map(Selector::first_identifier),
            Selector::Like(l) => l.base.operands.iter().find_map(Selector::first_identifier),
        }
    }
}

impl From<Literal> for Selector {
    fn from(l: Literal) -> Self {
        Selector::Literal(l)
    }
}

impl From<Identifier> for Selector {
    fn from(i: Identifier) -> Self {
        Selector::Identifier(i)
    }
}

impl From<Operator> for Selector {
    fn from(o: Operator) -> Self {
        Selector::Operator(o)
    }
}

impl From<LikeOperator> for Selector {
    fn from(l: LikeOperator) -> Self {
        Selector::Like(l)
    }
}

fn write_quoted(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    write!(f, "'{}'", s.replace('\'', "''"))
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            None => f.write_str("NULL"),
            Some(Value::String(s)) => write_quoted(f, s.as_str()),
            Some(Value::Boolean(true)) => f.write_str("TRUE"),
            Some(Value::Boolean(false)) => f.write_str("FALSE"),
            Some(v) => write!(f, "{v}"),
        }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.full_name.as_str())
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.op, self.operands.as_slice()) {
            (OpCode::IsNull, [operand]) => write!(f, "({operand} IS NULL)"),
            (op, [operand]) => write!(f, "({op} {operand})"),
            (op, [left, right]) => write!(f, "({left} {op} {right})"),
            _ => unreachable!("operator with {} operands", self.operands.len()),
        }
    }
}

impl fmt::Display for LikeOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({} {} ", self.base.operand(0), self.base.op)?;
        write_quoted(f, self.raw_pattern.as_str())?;
        if let Some(escape) = self.escape {
            write!(f, " ESCAPE '{escape}'")?;
        }
        f.write_str(")")
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::Literal(l) => l.fmt(f),
            Selector::Identifier(i) => i.fmt(f),
            Selector::Operator(o) => o.fmt(f),
            Selector::Like(l) => l.fmt(f),
        }
    }
}
