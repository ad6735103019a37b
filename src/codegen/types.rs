//! Backend type mapping.
//!
//! Lowers semantic [`Type`]s to LLVM types, builds zero values for
//! arbitrary types, and interns the per-type descriptor globals used by
//! interface boxing.

use inkwell::types::{BasicType, BasicTypeEnum};
use inkwell::values::{BasicValueEnum, PointerValue};
use inkwell::AddressSpace;

use crate::codegen::context::Codegen;
use crate::diagnostics::ValueError;
use crate::types::{BasicKind, Type, TypeKind};

impl<'ctx, 'a> Codegen<'ctx, 'a> {
    /// Lower a semantic type to its LLVM representation.
    ///
    /// Strings lower to a `{i8*, i64}` pointer/length pair and interfaces
    /// to a `{i8*, i8*}` descriptor/data pair. Untyped constant kinds
    /// have no machine representation; reaching one here is a compiler
    /// bug upstream.
    pub fn lower_type(&self, ty: &Type) -> Result<BasicTypeEnum<'ctx>, ValueError> {
        match ty.kind() {
            TypeKind::Basic(kind) => self.lower_basic(*kind),
            TypeKind::Named { underlying, .. } => self.lower_type(underlying),
            TypeKind::Pointer { base } => {
                let pointee = self.lower_type(base)?;
                Ok(pointee.ptr_type(AddressSpace::default()).into())
            }
            TypeKind::Struct { fields } => {
                let mut lowered = Vec::with_capacity(fields.len());
                for field in fields {
                    lowered.push(self.lower_type(&field.ty)?);
                }
                Ok(self.context.struct_type(&lowered, false).into())
            }
            TypeKind::Interface { .. } => {
                let i8_ptr = self.context.i8_type().ptr_type(AddressSpace::default());
                Ok(self
                    .context
                    .struct_type(&[i8_ptr.into(), i8_ptr.into()], false)
                    .into())
            }
        }
    }

    fn lower_basic(&self, kind: BasicKind) -> Result<BasicTypeEnum<'ctx>, ValueError> {
        Ok(match kind {
            BasicKind::Bool => self.context.bool_type().into(),
            BasicKind::Int8 | BasicKind::Uint8 => self.context.i8_type().into(),
            BasicKind::Int16 | BasicKind::Uint16 => self.context.i16_type().into(),
            BasicKind::Int32 | BasicKind::Uint32 => self.context.i32_type().into(),
            BasicKind::Int64 | BasicKind::Uint64 => self.context.i64_type().into(),
            BasicKind::Float32 => self.context.f32_type().into(),
            BasicKind::Float64 => self.context.f64_type().into(),
            BasicKind::Complex64 => {
                let f32t = self.context.f32_type();
                self.context
                    .struct_type(&[f32t.into(), f32t.into()], false)
                    .into()
            }
            BasicKind::Complex128 => {
                let f64t = self.context.f64_type();
                self.context
                    .struct_type(&[f64t.into(), f64t.into()], false)
                    .into()
            }
            BasicKind::Str => {
                let i8_ptr = self.context.i8_type().ptr_type(AddressSpace::default());
                let i64t = self.context.i64_type();
                self.context
                    .struct_type(&[i8_ptr.into(), i64t.into()], false)
                    .into()
            }
            BasicKind::UntypedInt
            | BasicKind::UntypedFloat
            | BasicKind::UntypedComplex
            | BasicKind::Nil => {
                return Err(ValueError::Internal {
                    reason: format!("untyped kind `{kind}` reached the backend"),
                })
            }
        })
    }

    /// The zero value of an arbitrary type: null for pointers, zeroed
    /// aggregates for structs and interfaces, numeric zero otherwise.
    pub fn zero_value(&self, ty: &Type) -> Result<BasicValueEnum<'ctx>, ValueError> {
        Ok(match self.lower_type(ty)? {
            BasicTypeEnum::IntType(t) => t.const_zero().into(),
            BasicTypeEnum::FloatType(t) => t.const_zero().into(),
            BasicTypeEnum::PointerType(t) => t.const_null().into(),
            BasicTypeEnum::StructType(t) => t.const_zero().into(),
            BasicTypeEnum::ArrayType(t) => t.const_zero().into(),
            BasicTypeEnum::VectorType(t) => t.const_zero().into(),
        })
    }

    /// The dynamic-type descriptor for a type: one interned `i8` global
    /// per type name, identified by its address. Interface boxing stores
    /// this pointer alongside the boxed data.
    pub fn type_descriptor(&self, ty: &Type) -> PointerValue<'ctx> {
        let name = format!("lark.type.{ty}");
        if let Some(global) = self.module.get_global(&name) {
            return global.as_pointer_value();
        }
        let i8t = self.context.i8_type();
        let global = self.module.add_global(i8t, None, &name);
        global.set_initializer(&i8t.const_zero());
        global.set_constant(true);
        global.as_pointer_value()
    }
}
