//! The compile-time constant domain.
//!
//! Constants are held at arbitrary precision (`BigInt` for integers,
//! `BigRational` for floats and complex components) until context forces
//! a representation. Folding never overflows; range checks happen only
//! at the two exits from this domain: [`ConstValue::convert`] when a
//! constant is bound to a sized kind, and [`ConstValue::materialize`]
//! when an untyped integer falls back to its default type.

use inkwell::values::BasicValueEnum;

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{Signed, ToPrimitive, Zero};

use crate::ast::{BinOp, UnaryOp};
use crate::codegen::context::Codegen;
use crate::codegen::value::{MaterializedValue, Value};
use crate::diagnostics::ValueError;
use crate::types::{BasicKind, Type};

/// A constant's literal payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConstLit {
    Int(BigInt),
    Float(BigRational),
    Complex { re: BigRational, im: BigRational },
    Str(String),
    Bool(bool),
    Nil,
}

impl ConstLit {
    /// A short rendering for error messages.
    fn describe(&self) -> String {
        match self {
            ConstLit::Int(v) => v.to_string(),
            ConstLit::Float(v) => format!("{}/{}", v.numer(), v.denom()),
            ConstLit::Complex { re, im } => format!("({re} + {im}i)"),
            ConstLit::Str(s) => format!("{s:?}"),
            ConstLit::Bool(b) => b.to_string(),
            ConstLit::Nil => "nil".to_string(),
        }
    }
}

/// A compile-time constant tagged with its kind.
///
/// The kind is a basic type, possibly untyped. Conversion to a non-basic
/// type (only `nil` supports one) leaves the constant domain and yields a
/// materialized value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstValue {
    pub lit: ConstLit,
    pub kind: Type,
}

impl ConstValue {
    pub fn new(lit: ConstLit, kind: Type) -> Self {
        Self { lit, kind }
    }

    /// The semantic type of this constant. `UntypedInt` reports its
    /// default type (`int32`); other kinds report themselves.
    pub fn ty(&self) -> Type {
        if self.kind.basic_kind() == Some(BasicKind::UntypedInt) {
            Type::int32()
        } else {
            self.kind.clone()
        }
    }

    /// Fold a binary operator over two constants.
    ///
    /// If exactly one side is untyped, the typed kind wins; if both are
    /// untyped, the wider kind wins (int < float < complex). Division of
    /// two integer constants is integer division.
    pub fn binary_op(&self, op: BinOp, rhs: &ConstValue) -> Result<ConstValue, ValueError> {
        let unimplemented = || ValueError::UnimplementedOperator {
            op: op.symbol().to_string(),
            lhs: self.kind.to_string(),
            rhs: rhs.kind.to_string(),
        };

        match op {
            BinOp::Add | BinOp::Sub | BinOp::Mul | BinOp::Div => {
                if let (ConstLit::Str(a), ConstLit::Str(b)) = (&self.lit, &rhs.lit) {
                    if op == BinOp::Add {
                        return Ok(ConstValue::new(
                            ConstLit::Str(format!("{a}{b}")),
                            result_kind(&self.kind, &rhs.kind),
                        ));
                    }
                    return Err(unimplemented());
                }
                let (a, b) = promote_pair(&self.lit, &rhs.lit).ok_or_else(unimplemented)?;
                let lit = fold_arith(op, a, b)?;
                Ok(ConstValue::new(lit, result_kind(&self.kind, &rhs.kind)))
            }
            BinOp::Eq | BinOp::Ne => {
                let equal = match (&self.lit, &rhs.lit) {
                    (ConstLit::Str(a), ConstLit::Str(b)) => a == b,
                    (ConstLit::Bool(a), ConstLit::Bool(b)) => a == b,
                    _ => {
                        let (a, b) =
                            promote_pair(&self.lit, &rhs.lit).ok_or_else(unimplemented)?;
                        numeric_eq(&a, &b)
                    }
                };
                let value = if op == BinOp::Eq { equal } else { !equal };
                Ok(ConstValue::new(ConstLit::Bool(value), Type::bool()))
            }
            BinOp::Lt | BinOp::Le => {
                let ordering = match (&self.lit, &rhs.lit) {
                    (ConstLit::Str(a), ConstLit::Str(b)) => a.cmp(b),
                    _ => {
                        let (a, b) =
                            promote_pair(&self.lit, &rhs.lit).ok_or_else(unimplemented)?;
                        numeric_cmp(&a, &b).ok_or_else(unimplemented)?
                    }
                };
                let value = if op == BinOp::Lt {
                    ordering.is_lt()
                } else {
                    ordering.is_le()
                };
                Ok(ConstValue::new(ConstLit::Bool(value), Type::bool()))
            }
            BinOp::And | BinOp::Or => match (&self.lit, &rhs.lit) {
                (ConstLit::Bool(a), ConstLit::Bool(b)) => {
                    let value = if op == BinOp::And { *a && *b } else { *a || *b };
                    Ok(ConstValue::new(ConstLit::Bool(value), Type::bool()))
                }
                _ => Err(unimplemented()),
            },
            BinOp::Rem | BinOp::Gt | BinOp::Ge => Err(unimplemented()),
        }
    }

    /// Fold a unary operator over a constant.
    pub fn unary_op(&self, op: UnaryOp) -> Result<ConstValue, ValueError> {
        let unimplemented = || ValueError::UnimplementedOperator {
            op: op.symbol().to_string(),
            lhs: self.kind.to_string(),
            rhs: self.kind.to_string(),
        };
        match op {
            UnaryOp::Pos => Ok(self.clone()),
            UnaryOp::Neg => {
                let lit = match &self.lit {
                    ConstLit::Int(v) => ConstLit::Int(-v),
                    ConstLit::Float(v) => ConstLit::Float(-v),
                    ConstLit::Complex { re, im } => ConstLit::Complex {
                        re: -re,
                        im: -im,
                    },
                    _ => return Err(unimplemented()),
                };
                Ok(ConstValue::new(lit, self.kind.clone()))
            }
            UnaryOp::Not => match &self.lit {
                ConstLit::Bool(b) => {
                    Ok(ConstValue::new(ConstLit::Bool(!b), self.kind.clone()))
                }
                _ => Err(unimplemented()),
            },
            UnaryOp::Addr => Err(ValueError::InvalidOperandShape {
                reason: "cannot take the address of a constant".to_string(),
            }),
            UnaryOp::Deref => Err(unimplemented()),
        }
    }

    /// Convert this constant to a target type.
    ///
    /// Conversion to a sized integer kind checks representability here
    /// and fails with `ConstantOverflow` rather than truncating. `nil`
    /// converted to a pointer or interface type leaves the constant
    /// domain: the result is a materialized zero value of the target.
    pub fn convert<'ctx>(
        &self,
        cx: &Codegen<'ctx, '_>,
        target: &Type,
    ) -> Result<Value<'ctx>, ValueError> {
        if let Some(kind) = target.basic_kind() {
            let converted = self.convert_to_basic(kind, target)?;
            return Ok(Value::Constant(converted));
        }
        if self.lit == ConstLit::Nil {
            let zero = cx.zero_value(target)?;
            return Ok(Value::Materialized(MaterializedValue::new(
                zero,
                target.clone(),
            )));
        }
        Err(ValueError::UnsupportedConversion {
            from: self.kind.to_string(),
            to: target.to_string(),
        })
    }

    fn convert_to_basic(&self, kind: BasicKind, target: &Type) -> Result<ConstValue, ValueError> {
        let unsupported = || ValueError::UnsupportedConversion {
            from: self.kind.to_string(),
            to: target.to_string(),
        };

        if self.kind.basic_kind() == Some(kind) {
            return Ok(ConstValue::new(self.lit.clone(), target.clone()));
        }

        if kind.is_integer() {
            let value = self.integral_value().ok_or_else(unsupported)?;
            if let Some((min, max)) = int_range(kind) {
                if value < min || value > max {
                    return Err(ValueError::ConstantOverflow {
                        value: value.to_string(),
                        target: target.to_string(),
                    });
                }
            }
            return Ok(ConstValue::new(ConstLit::Int(value), target.clone()));
        }
        if kind.is_float() {
            let value = match &self.lit {
                ConstLit::Int(v) => BigRational::from_integer(v.clone()),
                ConstLit::Float(v) => v.clone(),
                ConstLit::Complex { re, im } if im.is_zero() => re.clone(),
                _ => return Err(unsupported()),
            };
            return Ok(ConstValue::new(ConstLit::Float(value), target.clone()));
        }
        if kind.is_complex() {
            let (re, im) = match &self.lit {
                ConstLit::Int(v) => (
                    BigRational::from_integer(v.clone()),
                    BigRational::from_integer(BigInt::from(0)),
                ),
                ConstLit::Float(v) => {
                    (v.clone(), BigRational::from_integer(BigInt::from(0)))
                }
                ConstLit::Complex { re, im } => (re.clone(), im.clone()),
                _ => return Err(unsupported()),
            };
            return Ok(ConstValue::new(ConstLit::Complex { re, im }, target.clone()));
        }
        // Str and Bool convert only to themselves; nil converts to no
        // basic kind at all.
        match (&self.lit, kind) {
            (ConstLit::Str(_), BasicKind::Str) | (ConstLit::Bool(_), BasicKind::Bool) => {
                Ok(ConstValue::new(self.lit.clone(), target.clone()))
            }
            _ => Err(unsupported()),
        }
    }

    /// The constant as an exact integer, if it is one.
    fn integral_value(&self) -> Option<BigInt> {
        match &self.lit {
            ConstLit::Int(v) => Some(v.clone()),
            ConstLit::Float(v) if v.is_integer() => Some(v.to_integer()),
            ConstLit::Complex { re, im } if im.is_zero() && re.is_integer() => {
                Some(re.to_integer())
            }
            _ => None,
        }
    }

    /// Emit this constant as a backend value.
    ///
    /// Untyped integers bind to their default type (`int32`) with a
    /// range check; untyped floats, untyped complex, and bare `nil`
    /// must have been bound to a concrete type before this point.
    pub fn materialize<'ctx>(
        &self,
        cx: &Codegen<'ctx, '_>,
    ) -> Result<(BasicValueEnum<'ctx>, Type), ValueError> {
        let kind = self.kind.basic_kind().ok_or_else(|| ValueError::Internal {
            reason: format!("constant carries non-basic kind `{}`", self.kind),
        })?;

        match kind {
            BasicKind::UntypedInt => {
                let value = self.int_lit()?;
                if *value < BigInt::from(i32::MIN) || *value > BigInt::from(i32::MAX) {
                    return Err(ValueError::ConstantOverflow {
                        value: value.to_string(),
                        target: Type::int32().to_string(),
                    });
                }
                let raw = value.to_i64().ok_or_else(|| ValueError::Internal {
                    reason: "range-checked constant failed to narrow".to_string(),
                })?;
                let v = cx.context.i32_type().const_int(raw as u64, true);
                Ok((v.into(), Type::int32()))
            }
            BasicKind::UntypedFloat | BasicKind::UntypedComplex | BasicKind::Nil => {
                Err(ValueError::Internal {
                    reason: format!(
                        "`{kind}` constant must be bound to a concrete type before emission"
                    ),
                })
            }
            BasicKind::Int8
            | BasicKind::Int16
            | BasicKind::Int32
            | BasicKind::Int64
            | BasicKind::Uint8
            | BasicKind::Uint16
            | BasicKind::Uint32
            | BasicKind::Uint64 => {
                let value = self.int_lit()?;
                let raw = if kind.is_signed() {
                    value.to_i64().map(|v| v as u64)
                } else {
                    value.to_u64()
                }
                .ok_or_else(|| ValueError::Internal {
                    reason: "sized constant escaped its range check".to_string(),
                })?;
                let width = kind.bit_width().unwrap_or(64);
                let int_ty = match width {
                    8 => cx.context.i8_type(),
                    16 => cx.context.i16_type(),
                    32 => cx.context.i32_type(),
                    _ => cx.context.i64_type(),
                };
                let v = int_ty.const_int(raw, kind.is_signed());
                Ok((v.into(), self.kind.clone()))
            }
            BasicKind::Float32 | BasicKind::Float64 => {
                let value = match &self.lit {
                    ConstLit::Float(v) => rational_to_f64(v),
                    ConstLit::Int(v) => v.to_f64().unwrap_or(f64::INFINITY),
                    _ => {
                        return Err(ValueError::Internal {
                            reason: "float-kinded constant holds a non-float literal".to_string(),
                        })
                    }
                };
                let float_ty = if kind == BasicKind::Float32 {
                    cx.context.f32_type()
                } else {
                    cx.context.f64_type()
                };
                Ok((float_ty.const_float(value).into(), self.kind.clone()))
            }
            BasicKind::Complex64 | BasicKind::Complex128 => {
                let (re, im) = match &self.lit {
                    ConstLit::Complex { re, im } => (rational_to_f64(re), rational_to_f64(im)),
                    _ => {
                        return Err(ValueError::Internal {
                            reason: "complex-kinded constant holds a non-complex literal"
                                .to_string(),
                        })
                    }
                };
                let float_ty = if kind == BasicKind::Complex64 {
                    cx.context.f32_type()
                } else {
                    cx.context.f64_type()
                };
                let struct_ty = cx
                    .context
                    .struct_type(&[float_ty.into(), float_ty.into()], false);
                let v = struct_ty.const_named_struct(&[
                    float_ty.const_float(re).into(),
                    float_ty.const_float(im).into(),
                ]);
                Ok((v.into(), self.kind.clone()))
            }
            BasicKind::Str => {
                let text = match &self.lit {
                    ConstLit::Str(s) => s,
                    _ => {
                        return Err(ValueError::Internal {
                            reason: "string-kinded constant holds a non-string literal"
                                .to_string(),
                        })
                    }
                };
                let global = cx
                    .builder
                    .build_global_string_ptr(text, "str")
                    .map_err(|e| ValueError::Llvm(e.to_string()))?;
                let len = cx.context.i64_type().const_int(text.len() as u64, false);
                let struct_ty = cx.lower_type(&Type::string())?.into_struct_type();
                let v = struct_ty
                    .const_named_struct(&[global.as_pointer_value().into(), len.into()]);
                Ok((v.into(), self.kind.clone()))
            }
            BasicKind::Bool => {
                let value = match &self.lit {
                    ConstLit::Bool(b) => *b,
                    _ => {
                        return Err(ValueError::Internal {
                            reason: "bool-kinded constant holds a non-bool literal".to_string(),
                        })
                    }
                };
                let bool_ty = cx.context.bool_type();
                let v = if value {
                    bool_ty.const_all_ones()
                } else {
                    bool_ty.const_zero()
                };
                Ok((v.into(), self.kind.clone()))
            }
        }
    }

    fn int_lit(&self) -> Result<&BigInt, ValueError> {
        match &self.lit {
            ConstLit::Int(v) => Ok(v),
            _ => Err(ValueError::Internal {
                reason: format!(
                    "integer-kinded constant holds literal {}",
                    self.lit.describe()
                ),
            }),
        }
    }
}

/// The kind of a folded result: a typed kind wins over an untyped one;
/// two untyped kinds resolve to the wider (int < float < complex).
fn result_kind(a: &Type, b: &Type) -> Type {
    match (a.is_untyped(), b.is_untyped()) {
        (false, _) => a.clone(),
        (true, false) => b.clone(),
        (true, true) => {
            fn rank(ty: &Type) -> u8 {
                match ty.basic_kind() {
                    Some(BasicKind::UntypedInt) => 0,
                    Some(BasicKind::UntypedFloat) => 1,
                    Some(BasicKind::UntypedComplex) => 2,
                    _ => 3,
                }
            }
            if rank(a) >= rank(b) {
                a.clone()
            } else {
                b.clone()
            }
        }
    }
}

/// A numeric literal lifted into the common arithmetic tower.
enum Num {
    Int(BigInt),
    Rat(BigRational),
    Cpx { re: BigRational, im: BigRational },
}

impl Num {
    fn rank(&self) -> u8 {
        match self {
            Num::Int(_) => 0,
            Num::Rat(_) => 1,
            Num::Cpx { .. } => 2,
        }
    }

    fn widen(self, rank: u8) -> Num {
        match (self, rank) {
            (Num::Int(v), 1) => Num::Rat(BigRational::from_integer(v)),
            (Num::Int(v), 2) => Num::Cpx {
                re: BigRational::from_integer(v),
                im: BigRational::from_integer(BigInt::from(0)),
            },
            (Num::Rat(v), 2) => Num::Cpx {
                re: v,
                im: BigRational::from_integer(BigInt::from(0)),
            },
            (n, _) => n,
        }
    }
}

fn lift(lit: &ConstLit) -> Option<Num> {
    match lit {
        ConstLit::Int(v) => Some(Num::Int(v.clone())),
        ConstLit::Float(v) => Some(Num::Rat(v.clone())),
        ConstLit::Complex { re, im } => Some(Num::Cpx {
            re: re.clone(),
            im: im.clone(),
        }),
        _ => None,
    }
}

fn promote_pair(a: &ConstLit, b: &ConstLit) -> Option<(Num, Num)> {
    let a = lift(a)?;
    let b = lift(b)?;
    let rank = a.rank().max(b.rank());
    Some((a.widen(rank), b.widen(rank)))
}

fn fold_arith(op: BinOp, a: Num, b: Num) -> Result<ConstLit, ValueError> {
    let div_by_zero = || ValueError::InvalidOperandShape {
        reason: "constant division by zero".to_string(),
    };
    Ok(match (a, b) {
        (Num::Int(a), Num::Int(b)) => ConstLit::Int(match op {
            BinOp::Add => a + b,
            BinOp::Sub => a - b,
            BinOp::Mul => a * b,
            // Integer constants divide as integers, truncating toward
            // zero.
            _ => {
                if b.is_zero() {
                    return Err(div_by_zero());
                }
                a / b
            }
        }),
        (Num::Rat(a), Num::Rat(b)) => ConstLit::Float(match op {
            BinOp::Add => a + b,
            BinOp::Sub => a - b,
            BinOp::Mul => a * b,
            _ => {
                if b.is_zero() {
                    return Err(div_by_zero());
                }
                a / b
            }
        }),
        (Num::Cpx { re: a, im: b }, Num::Cpx { re: c, im: d }) => match op {
            BinOp::Add => ConstLit::Complex {
                re: a + c,
                im: b + d,
            },
            BinOp::Sub => ConstLit::Complex {
                re: a - c,
                im: b - d,
            },
            BinOp::Mul => ConstLit::Complex {
                re: &a * &c - &b * &d,
                im: &a * &d + &b * &c,
            },
            _ => {
                let den = &c * &c + &d * &d;
                if den.is_zero() {
                    return Err(div_by_zero());
                }
                ConstLit::Complex {
                    re: (&a * &c + &b * &d) / &den,
                    im: (&b * &c - &a * &d) / &den,
                }
            }
        },
        _ => {
            return Err(ValueError::Internal {
                reason: "operands left unpromoted before constant folding".to_string(),
            })
        }
    })
}

fn numeric_eq(a: &Num, b: &Num) -> bool {
    match (a, b) {
        (Num::Int(a), Num::Int(b)) => a == b,
        (Num::Rat(a), Num::Rat(b)) => a == b,
        (Num::Cpx { re: a, im: b }, Num::Cpx { re: c, im: d }) => a == c && b == d,
        _ => false,
    }
}

fn numeric_cmp(a: &Num, b: &Num) -> Option<std::cmp::Ordering> {
    match (a, b) {
        (Num::Int(a), Num::Int(b)) => Some(a.cmp(b)),
        (Num::Rat(a), Num::Rat(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

/// The representable range of a sized integer kind. Untyped kinds are
/// unbounded.
fn int_range(kind: BasicKind) -> Option<(BigInt, BigInt)> {
    let bits = kind.bit_width()?;
    if kind.is_signed() {
        let max = (BigInt::from(1) << (bits - 1)) - 1;
        let min = -(BigInt::from(1) << (bits - 1));
        Some((min, max))
    } else if kind.is_unsigned() {
        let max = (BigInt::from(1) << bits) - 1;
        Some((BigInt::from(0), max))
    } else {
        None
    }
}

/// Convert an exact rational to the nearest `f64`.
fn rational_to_f64(v: &BigRational) -> f64 {
    let num = v.numer().to_f64();
    let den = v.denom().to_f64();
    match (num, den) {
        (Some(n), Some(d)) if d != 0.0 => n / d,
        _ => {
            if v.is_negative() {
                f64::NEG_INFINITY
            } else {
                f64::INFINITY
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int(v: i64) -> ConstValue {
        ConstValue::new(
            ConstLit::Int(BigInt::from(v)),
            Type::basic(BasicKind::UntypedInt),
        )
    }

    fn float(n: i64, d: i64) -> ConstValue {
        ConstValue::new(
            ConstLit::Float(BigRational::new(BigInt::from(n), BigInt::from(d))),
            Type::basic(BasicKind::UntypedFloat),
        )
    }

    #[test]
    fn folding_has_unbounded_precision() {
        let big = int(i64::MAX);
        let doubled = big.binary_op(BinOp::Add, &big).unwrap();
        match &doubled.lit {
            ConstLit::Int(v) => {
                assert_eq!(*v, BigInt::from(i64::MAX) * 2);
            }
            other => panic!("expected integer literal, got {other:?}"),
        }
    }

    #[test]
    fn integer_constant_division_truncates() {
        let q = int(7).binary_op(BinOp::Div, &int(2)).unwrap();
        assert_eq!(q.lit, ConstLit::Int(BigInt::from(3)));
        let q = int(-7).binary_op(BinOp::Div, &int(2)).unwrap();
        assert_eq!(q.lit, ConstLit::Int(BigInt::from(-3)));
    }

    #[test]
    fn constant_division_by_zero_is_rejected() {
        let err = int(1).binary_op(BinOp::Div, &int(0)).unwrap_err();
        assert!(matches!(err, ValueError::InvalidOperandShape { .. }));
    }

    #[test]
    fn mixed_untyped_operands_take_the_wider_kind() {
        let sum = int(1).binary_op(BinOp::Add, &float(1, 2)).unwrap();
        assert_eq!(sum.kind.basic_kind(), Some(BasicKind::UntypedFloat));
        assert_eq!(
            sum.lit,
            ConstLit::Float(BigRational::new(BigInt::from(3), BigInt::from(2)))
        );
    }

    #[test]
    fn typed_kind_wins_over_untyped() {
        let typed = ConstValue::new(ConstLit::Int(BigInt::from(5)), Type::basic(BasicKind::Int64));
        let sum = typed.binary_op(BinOp::Add, &int(1)).unwrap();
        assert_eq!(sum.kind.basic_kind(), Some(BasicKind::Int64));
        let sum = int(1).binary_op(BinOp::Add, &typed).unwrap();
        assert_eq!(sum.kind.basic_kind(), Some(BasicKind::Int64));
    }

    #[test]
    fn comparisons_fold_to_bool() {
        let lt = int(2).binary_op(BinOp::Lt, &int(3)).unwrap();
        assert_eq!(lt.lit, ConstLit::Bool(true));
        assert_eq!(lt.kind.basic_kind(), Some(BasicKind::Bool));

        let ne = float(1, 2).binary_op(BinOp::Ne, &float(1, 2)).unwrap();
        assert_eq!(ne.lit, ConstLit::Bool(false));
    }

    #[test]
    fn complex_multiplication_folds_componentwise() {
        let a = ConstValue::new(
            ConstLit::Complex {
                re: BigRational::from_integer(BigInt::from(1)),
                im: BigRational::from_integer(BigInt::from(2)),
            },
            Type::basic(BasicKind::UntypedComplex),
        );
        let b = ConstValue::new(
            ConstLit::Complex {
                re: BigRational::from_integer(BigInt::from(3)),
                im: BigRational::from_integer(BigInt::from(4)),
            },
            Type::basic(BasicKind::UntypedComplex),
        );
        // (1 + 2i)(3 + 4i) = -5 + 10i
        let p = a.binary_op(BinOp::Mul, &b).unwrap();
        assert_eq!(
            p.lit,
            ConstLit::Complex {
                re: BigRational::from_integer(BigInt::from(-5)),
                im: BigRational::from_integer(BigInt::from(10)),
            }
        );
    }

    #[test]
    fn boolean_folding() {
        let t = ConstValue::new(ConstLit::Bool(true), Type::bool());
        let f = ConstValue::new(ConstLit::Bool(false), Type::bool());
        assert_eq!(
            t.binary_op(BinOp::And, &f).unwrap().lit,
            ConstLit::Bool(false)
        );
        assert_eq!(
            t.binary_op(BinOp::Or, &f).unwrap().lit,
            ConstLit::Bool(true)
        );
        assert_eq!(t.unary_op(UnaryOp::Not).unwrap().lit, ConstLit::Bool(false));
    }

    #[test]
    fn string_concatenation_and_comparison() {
        let a = ConstValue::new(ConstLit::Str("foo".into()), Type::string());
        let b = ConstValue::new(ConstLit::Str("bar".into()), Type::string());
        assert_eq!(
            a.binary_op(BinOp::Add, &b).unwrap().lit,
            ConstLit::Str("foobar".into())
        );
        assert_eq!(
            a.binary_op(BinOp::Eq, &b).unwrap().lit,
            ConstLit::Bool(false)
        );
        assert_eq!(
            b.binary_op(BinOp::Lt, &a).unwrap().lit,
            ConstLit::Bool(true)
        );
    }

    #[test]
    fn negation_preserves_kind() {
        let neg = float(1, 2).unary_op(UnaryOp::Neg).unwrap();
        assert_eq!(neg.kind.basic_kind(), Some(BasicKind::UntypedFloat));
        assert_eq!(
            neg.lit,
            ConstLit::Float(BigRational::new(BigInt::from(-1), BigInt::from(2)))
        );
    }

    #[test]
    fn address_of_constant_is_rejected() {
        let err = int(1).unary_op(UnaryOp::Addr).unwrap_err();
        assert!(matches!(err, ValueError::InvalidOperandShape { .. }));
    }

    #[test]
    fn rem_is_not_folded() {
        let err = int(7).binary_op(BinOp::Rem, &int(2)).unwrap_err();
        assert!(matches!(err, ValueError::UnimplementedOperator { .. }));
    }

    #[test]
    fn untyped_int_reports_default_type() {
        assert_eq!(int(1).ty().basic_kind(), Some(BasicKind::Int32));
        assert_eq!(
            float(1, 2).ty().basic_kind(),
            Some(BasicKind::UntypedFloat)
        );
    }
}
