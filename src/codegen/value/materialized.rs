//! Materialized values and operator lowering.
//!
//! A materialized value already has a backend representation. Indirect
//! values denote storage: their machine value is the slot address and
//! their type is a pointer to the stored type. Operators load indirect
//! operands first, then lower over the loaded values.

use inkwell::values::{BasicValueEnum, IntValue};
use inkwell::IntPredicate;

use crate::ast::{BinOp, UnaryOp};
use crate::codegen::context::{Codegen, SlotId};
use crate::diagnostics::ValueError;
use crate::types::{Type, TypeKind};

/// A value with a backend representation.
///
/// Invariant: when `indirect` is set, `ty` is a pointer type and `value`
/// is the address of the storage holding the denoted value. Dereferencing
/// unwraps one pointer level and links the loaded value back to the slot
/// through `address`.
#[derive(Debug, Clone)]
pub struct MaterializedValue<'ctx> {
    /// The backend value.
    pub value: BasicValueEnum<'ctx>,
    /// The semantic type.
    pub ty: Type,
    /// Whether this value denotes storage rather than the value itself.
    pub indirect: bool,
    /// The slot this value was loaded from, if any.
    pub address: Option<SlotId>,
    /// The receiver slot for bound-method values, if any.
    pub receiver: Option<SlotId>,
}

impl<'ctx> MaterializedValue<'ctx> {
    /// Wrap a backend value directly.
    pub fn new(value: BasicValueEnum<'ctx>, ty: Type) -> Self {
        Self {
            value,
            ty,
            indirect: false,
            address: None,
            receiver: None,
        }
    }

    /// Wrap a storage address as an indirect value. `ty` must be the
    /// pointer type of the stored value.
    pub fn new_indirect(value: BasicValueEnum<'ctx>, ty: Type) -> Self {
        Self {
            value,
            ty,
            indirect: true,
            address: None,
            receiver: None,
        }
    }

    /// Attach a receiver slot link.
    pub fn with_receiver(mut self, receiver: SlotId) -> Self {
        self.receiver = Some(receiver);
        self
    }

    /// Load the denoted value out of an indirect value.
    ///
    /// The slot is recorded in the arena and becomes the loaded value's
    /// `address` link, so a later address-of can recover it without a
    /// new allocation.
    pub fn deref(&self, cx: &Codegen<'ctx, '_>) -> Result<Self, ValueError> {
        if !self.indirect {
            return Err(ValueError::Internal {
                reason: "dereference of a non-indirect value".to_string(),
            });
        }
        let pointee = self.ty.pointee().ok_or_else(|| ValueError::Internal {
            reason: format!("indirect value carries non-pointer type `{}`", self.ty),
        })?;
        let ptr = self.value.into_pointer_value();
        let slot = cx.record_slot(ptr, pointee.clone());
        let loaded = cx
            .builder
            .build_load(ptr, "deref")
            .map_err(|e| ValueError::Llvm(e.to_string()))?;
        Ok(Self {
            value: loaded,
            ty: pointee,
            indirect: false,
            address: Some(slot),
            receiver: self.receiver,
        })
    }

    /// The operand form of this value: loaded if indirect, unchanged
    /// otherwise.
    pub fn loaded(&self, cx: &Codegen<'ctx, '_>) -> Result<Self, ValueError> {
        if self.indirect {
            self.deref(cx)
        } else {
            Ok(self.clone())
        }
    }

    /// Lower a binary operator over two materialized operands.
    pub fn binary_op(
        &self,
        cx: &Codegen<'ctx, '_>,
        op: BinOp,
        rhs: &Self,
    ) -> Result<Self, ValueError> {
        let lhs = self.loaded(cx)?;
        let rhs = rhs.loaded(cx)?;

        if lhs.ty.is_struct() && rhs.ty.is_struct() {
            return match op {
                BinOp::Eq | BinOp::Ne => struct_compare(cx, op, &lhs, &rhs),
                _ => Err(unimplemented_op(op, &lhs.ty, &rhs.ty)),
            };
        }
        scalar_op(cx, op, &lhs, &rhs)
    }

    /// Lower a unary operator.
    pub fn unary_op(&self, cx: &Codegen<'ctx, '_>, op: UnaryOp) -> Result<Self, ValueError> {
        match op {
            UnaryOp::Pos => Ok(self.clone()),
            UnaryOp::Neg => {
                let operand = self.loaded(cx)?;
                if !operand.value.is_int_value() {
                    return Err(unimplemented_op_unary(op, &operand.ty));
                }
                let neg = cx
                    .builder
                    .build_int_neg(operand.value.into_int_value(), "neg")
                    .map_err(|e| ValueError::Llvm(e.to_string()))?;
                Ok(Self::new(neg.into(), operand.ty))
            }
            UnaryOp::Addr => {
                if self.indirect {
                    // The machine value already is the address; taking
                    // the address again collapses to the same pointer.
                    return Ok(Self {
                        value: self.value,
                        ty: self.ty.clone(),
                        indirect: false,
                        address: self.address,
                        receiver: self.receiver,
                    });
                }
                let slot_id = self.address.ok_or_else(|| ValueError::InvalidOperandShape {
                    reason: "cannot take the address of a non-addressable value".to_string(),
                })?;
                let slot = cx.slot(slot_id);
                Ok(Self::new(
                    slot.ptr.into(),
                    Type::pointer(self.ty.clone()),
                ))
            }
            UnaryOp::Not | UnaryOp::Deref => Err(unimplemented_op_unary(op, &self.ty)),
        }
    }
}

/// Lower a scalar operation over two loaded operands. Only integer-class
/// machine values have lowering rules.
fn scalar_op<'ctx>(
    cx: &Codegen<'ctx, '_>,
    op: BinOp,
    lhs: &MaterializedValue<'ctx>,
    rhs: &MaterializedValue<'ctx>,
) -> Result<MaterializedValue<'ctx>, ValueError> {
    // Pointer operands support equality only; this is how `p == nil`
    // lowers after the nil constant becomes a typed null.
    if lhs.value.is_pointer_value() && rhs.value.is_pointer_value() {
        let pred = match op {
            BinOp::Eq => IntPredicate::EQ,
            BinOp::Ne => IntPredicate::NE,
            _ => return Err(unimplemented_op(op, &lhs.ty, &rhs.ty)),
        };
        let cmp = cx
            .builder
            .build_int_compare(
                pred,
                lhs.value.into_pointer_value(),
                rhs.value.into_pointer_value(),
                "ptr.cmp",
            )
            .map_err(|e| ValueError::Llvm(e.to_string()))?;
        return Ok(MaterializedValue::new(cmp.into(), Type::bool()));
    }
    if !lhs.value.is_int_value() || !rhs.value.is_int_value() {
        return Err(unimplemented_op(op, &lhs.ty, &rhs.ty));
    }
    let l = lhs.value.into_int_value();
    let r = rhs.value.into_int_value();
    let llvm = |e: inkwell::builder::BuilderError| ValueError::Llvm(e.to_string());
    let b = cx.builder;

    let (value, ty): (IntValue<'ctx>, Type) = match op {
        BinOp::Mul => (b.build_int_mul(l, r, "mul").map_err(llvm)?, lhs.ty.clone()),
        BinOp::Div => (
            b.build_int_unsigned_div(l, r, "div").map_err(llvm)?,
            lhs.ty.clone(),
        ),
        BinOp::Add => (b.build_int_add(l, r, "add").map_err(llvm)?, lhs.ty.clone()),
        BinOp::Sub => (b.build_int_sub(l, r, "sub").map_err(llvm)?, lhs.ty.clone()),
        BinOp::Eq => (
            b.build_int_compare(IntPredicate::EQ, l, r, "eq").map_err(llvm)?,
            Type::bool(),
        ),
        BinOp::Ne => (
            b.build_int_compare(IntPredicate::NE, l, r, "ne").map_err(llvm)?,
            Type::bool(),
        ),
        BinOp::Lt => {
            let pred = if lhs.ty.is_signed() {
                IntPredicate::SLT
            } else {
                IntPredicate::ULT
            };
            (
                b.build_int_compare(pred, l, r, "lt").map_err(llvm)?,
                Type::bool(),
            )
        }
        BinOp::Le => {
            let pred = if lhs.ty.is_signed() {
                IntPredicate::SLE
            } else {
                IntPredicate::ULE
            };
            (
                b.build_int_compare(pred, l, r, "le").map_err(llvm)?,
                Type::bool(),
            )
        }
        BinOp::And => (b.build_and(l, r, "and").map_err(llvm)?, Type::bool()),
        BinOp::Or => (b.build_or(l, r, "or").map_err(llvm)?, Type::bool()),
        BinOp::Rem | BinOp::Gt | BinOp::Ge => {
            return Err(unimplemented_op(op, &lhs.ty, &rhs.ty))
        }
    };
    Ok(MaterializedValue::new(value.into(), ty))
}

/// Field-wise struct equality: compare each field pair in order and fold
/// with `and` for `==`, `or` for `!=`.
fn struct_compare<'ctx>(
    cx: &Codegen<'ctx, '_>,
    op: BinOp,
    lhs: &MaterializedValue<'ctx>,
    rhs: &MaterializedValue<'ctx>,
) -> Result<MaterializedValue<'ctx>, ValueError> {
    let underlying = lhs.ty.underlying();
    let fields = match underlying.kind() {
        TypeKind::Struct { fields } => fields.clone(),
        _ => {
            return Err(ValueError::Internal {
                reason: format!("struct comparison over non-struct type `{}`", lhs.ty),
            })
        }
    };
    if fields.is_empty() {
        return Err(ValueError::InvalidOperandShape {
            reason: "cannot compare values of a zero-field struct type".to_string(),
        });
    }

    let llvm = |e: inkwell::builder::BuilderError| ValueError::Llvm(e.to_string());
    let l_struct = lhs.value.into_struct_value();
    let r_struct = rhs.value.into_struct_value();

    let mut acc: Option<IntValue<'ctx>> = None;
    for (i, field) in fields.iter().enumerate() {
        let l_field = cx
            .builder
            .build_extract_value(l_struct, i as u32, &format!("{}.l", field.name))
            .map_err(llvm)?;
        let r_field = cx
            .builder
            .build_extract_value(r_struct, i as u32, &format!("{}.r", field.name))
            .map_err(llvm)?;
        let cmp = MaterializedValue::new(l_field, field.ty.clone())
            .binary_op(cx, op, &MaterializedValue::new(r_field, field.ty.clone()))?;
        let cmp = cmp.value.into_int_value();
        acc = Some(match acc {
            None => cmp,
            Some(prev) => match op {
                BinOp::Eq => cx.builder.build_and(prev, cmp, "eq.all").map_err(llvm)?,
                _ => cx.builder.build_or(prev, cmp, "ne.any").map_err(llvm)?,
            },
        });
    }
    // Non-empty field list, so the accumulator is set.
    let result = acc.ok_or_else(|| ValueError::Internal {
        reason: "struct comparison produced no result".to_string(),
    })?;
    Ok(MaterializedValue::new(result.into(), Type::bool()))
}

fn unimplemented_op(op: BinOp, lhs: &Type, rhs: &Type) -> ValueError {
    ValueError::UnimplementedOperator {
        op: op.symbol().to_string(),
        lhs: lhs.to_string(),
        rhs: rhs.to_string(),
    }
}

fn unimplemented_op_unary(op: UnaryOp, operand: &Type) -> ValueError {
    ValueError::UnimplementedOperator {
        op: op.symbol().to_string(),
        lhs: operand.to_string(),
        rhs: operand.to_string(),
    }
}
