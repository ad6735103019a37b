//! The conversion engine for materialized values.
//!
//! Conversion rules run in a fixed order: identity re-tagging first,
//! then the interface rules, with boxing (concrete to interface) as the
//! only rule that emits more than a repack. Conversions out of an
//! interface back to a concrete type require dynamic type inspection and
//! are not supported yet.

use inkwell::AddressSpace;

use crate::codegen::context::Codegen;
use crate::codegen::value::{MaterializedValue, Value};
use crate::diagnostics::ValueError;
use crate::types::{identical, Type};

impl<'ctx> MaterializedValue<'ctx> {
    /// Convert this value to a target type.
    pub fn convert(
        &self,
        cx: &Codegen<'ctx, '_>,
        target: &Type,
    ) -> Result<Value<'ctx>, ValueError> {
        // The structural source is the stored type for indirect values.
        let source = if self.indirect {
            self.ty.pointee().ok_or_else(|| ValueError::Internal {
                reason: format!("indirect value carries non-pointer type `{}`", self.ty),
            })?
        } else {
            self.ty.clone()
        };

        // Identity: the same machine value under a new name. Indirection
        // and back-references survive untouched.
        if identical(&source, target) {
            let ty = if self.indirect {
                Type::pointer(target.clone())
            } else {
                target.clone()
            };
            return Ok(Value::Materialized(MaterializedValue {
                value: self.value,
                ty,
                indirect: self.indirect,
                address: self.address,
                receiver: self.receiver,
            }));
        }

        match (source.is_interface(), target.is_interface()) {
            (true, true) => self.repack_interface(cx, target),
            (true, false) => Err(ValueError::UnsupportedConversion {
                from: source.to_string(),
                to: target.to_string(),
            }),
            (false, true) => self.box_into_interface(cx, &source, target),
            (false, false) => Err(ValueError::UnimplementedConversion {
                from: source.to_string(),
                to: target.to_string(),
            }),
        }
    }

    /// Re-tag an interface value with another interface's static type.
    /// The dynamic type descriptor and the data pointer pass through
    /// unchanged.
    fn repack_interface(
        &self,
        cx: &Codegen<'ctx, '_>,
        target: &Type,
    ) -> Result<Value<'ctx>, ValueError> {
        let llvm = |e: inkwell::builder::BuilderError| ValueError::Llvm(e.to_string());
        let operand = self.loaded(cx)?;
        let pair = operand.value.into_struct_value();
        let descriptor = cx
            .builder
            .build_extract_value(pair, 0, "iface.desc")
            .map_err(llvm)?;
        let data = cx
            .builder
            .build_extract_value(pair, 1, "iface.data")
            .map_err(llvm)?;
        let target_ty = cx.lower_type(target)?.into_struct_type();
        let repacked = cx
            .builder
            .build_insert_value(target_ty.get_undef(), descriptor, 0, "iface")
            .map_err(llvm)?;
        let repacked = cx
            .builder
            .build_insert_value(repacked, data, 1, "iface")
            .map_err(llvm)?
            .into_struct_value();
        Ok(Value::Materialized(MaterializedValue::new(
            repacked.into(),
            target.clone(),
        )))
    }

    /// Box a concrete value into an interface: spill it to a stack slot,
    /// erase the slot address to `i8*`, and pair it with the source
    /// type's descriptor.
    fn box_into_interface(
        &self,
        cx: &Codegen<'ctx, '_>,
        source: &Type,
        target: &Type,
    ) -> Result<Value<'ctx>, ValueError> {
        let llvm = |e: inkwell::builder::BuilderError| ValueError::Llvm(e.to_string());
        let operand = self.loaded(cx)?;
        let source_llvm = cx.lower_type(source)?;
        let slot = cx
            .builder
            .build_alloca(source_llvm, "box")
            .map_err(llvm)?;
        cx.builder.build_store(slot, operand.value).map_err(llvm)?;
        let i8_ptr = cx.context.i8_type().ptr_type(AddressSpace::default());
        let data = cx
            .builder
            .build_pointer_cast(slot, i8_ptr, "box.data")
            .map_err(llvm)?;
        let descriptor = cx.type_descriptor(source);
        let target_ty = cx.lower_type(target)?.into_struct_type();
        let boxed = cx
            .builder
            .build_insert_value(target_ty.get_undef(), descriptor, 0, "iface")
            .map_err(llvm)?;
        let boxed = cx
            .builder
            .build_insert_value(boxed, data, 1, "iface")
            .map_err(llvm)?
            .into_struct_value();
        Ok(Value::Materialized(MaterializedValue::new(
            boxed.into(),
            target.clone(),
        )))
    }
}
