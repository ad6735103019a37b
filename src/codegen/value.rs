//! The dual value abstraction.
//!
//! Every expression lowers to a [`Value`]: either a [`MaterializedValue`]
//! already living in the instruction stream, or a [`ConstValue`] held at
//! arbitrary precision until context forces a representation. Operator
//! lowering, conversion, and materialization all dispatch over the
//! operand-kind pairs here; the match is exhaustive, so a new operand
//! kind cannot be added without every operation taking a position on it.
//!
//! Values are immutable: operations never mutate an operand, they return
//! new values.

mod constant;
mod convert;
mod materialized;


pub use constant::{ConstLit, ConstValue};
pub use materialized::MaterializedValue;

use inkwell::values::BasicValueEnum;

use crate::ast::{BinOp, UnaryOp};
use crate::codegen::context::Codegen;
use crate::diagnostics::ValueError;
use crate::types::{BasicKind, Type};

/// An expression value: materialized in the IR or a compile-time
/// constant.
#[derive(Debug, Clone)]
pub enum Value<'ctx> {
    /// A value with a backend representation.
    Materialized(MaterializedValue<'ctx>),
    /// A compile-time constant, possibly still untyped.
    Constant(ConstValue),
}

impl<'ctx> Value<'ctx> {
    /// The predeclared boolean constants.
    pub fn const_bool(value: bool) -> Self {
        Value::Constant(ConstValue::new(ConstLit::Bool(value), Type::bool()))
    }

    /// The predeclared `nil`.
    pub fn const_nil() -> Self {
        Value::Constant(ConstValue::new(
            ConstLit::Nil,
            Type::basic(BasicKind::Nil),
        ))
    }

    /// The semantic type of this value. Untyped integer constants report
    /// their default type (`int32`).
    pub fn ty(&self) -> Type {
        match self {
            Value::Materialized(m) => m.ty.clone(),
            Value::Constant(c) => c.ty(),
        }
    }

    /// Apply a binary operator.
    ///
    /// An untyped constant on one side of a materialized operand is
    /// bound to the materialized operand's type before the operation;
    /// typed constants materialize at their own kind. Two constant
    /// operands fold without touching the instruction stream.
    pub fn binary_op(
        &self,
        cx: &Codegen<'ctx, '_>,
        op: BinOp,
        rhs: &Value<'ctx>,
    ) -> Result<Value<'ctx>, ValueError> {
        match (self, rhs) {
            (Value::Materialized(l), Value::Materialized(r)) => {
                l.binary_op(cx, op, r).map(Value::Materialized)
            }
            (Value::Materialized(l), Value::Constant(c)) => {
                let l = l.loaded(cx)?;
                let r = bind_constant(cx, c, &l.ty)?;
                l.binary_op(cx, op, &r).map(Value::Materialized)
            }
            (Value::Constant(c), Value::Materialized(r)) => {
                let r = r.loaded(cx)?;
                let l = bind_constant(cx, c, &r.ty)?;
                l.binary_op(cx, op, &r).map(Value::Materialized)
            }
            (Value::Constant(a), Value::Constant(b)) => {
                a.binary_op(op, b).map(Value::Constant)
            }
        }
    }

    /// Apply a unary operator.
    pub fn unary_op(
        &self,
        cx: &Codegen<'ctx, '_>,
        op: UnaryOp,
    ) -> Result<Value<'ctx>, ValueError> {
        match self {
            Value::Materialized(m) => m.unary_op(cx, op).map(Value::Materialized),
            Value::Constant(c) => c.unary_op(op).map(Value::Constant),
        }
    }

    /// Convert this value to a target type.
    pub fn convert(
        &self,
        cx: &Codegen<'ctx, '_>,
        target: &Type,
    ) -> Result<Value<'ctx>, ValueError> {
        match self {
            Value::Materialized(m) => m.convert(cx, target),
            Value::Constant(c) => c.convert(cx, target),
        }
    }

    /// Collapse to a backend value and its type.
    ///
    /// Constants are bound to their default type here; an untyped
    /// integer that does not fit its default width is a hard error,
    /// never a silent truncation.
    pub fn materialize(
        &self,
        cx: &Codegen<'ctx, '_>,
    ) -> Result<(BasicValueEnum<'ctx>, Type), ValueError> {
        match self {
            Value::Materialized(m) => Ok((m.value, m.ty.clone())),
            Value::Constant(c) => c.materialize(cx),
        }
    }
}

/// Bind a constant to the type of the materialized operand it meets,
/// then materialize it. Only untyped constants adopt the operand's
/// type (`nil` binds to its zero value); a typed constant keeps its own
/// kind, so a mismatched pairing surfaces as an operator error rather
/// than a silent coercion.
fn bind_constant<'ctx>(
    cx: &Codegen<'ctx, '_>,
    c: &ConstValue,
    ty: &Type,
) -> Result<MaterializedValue<'ctx>, ValueError> {
    let bound = if c.kind.is_untyped() {
        c.convert(cx, ty)?
    } else {
        Value::Constant(c.clone())
    };
    match bound {
        Value::Materialized(m) => Ok(m),
        Value::Constant(bound) => {
            let (value, ty) = bound.materialize(cx)?;
            Ok(MaterializedValue::new(value, ty))
        }
    }
}
