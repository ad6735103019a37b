//! LLVM code generation.
//!
//! This module lowers expression values to LLVM IR through `inkwell`.
//! [`Codegen`] is the per-function cursor over the LLVM context, module,
//! and builder; [`Value`] is the dual value abstraction every expression
//! lowers into.

pub mod context;
pub mod types;
pub mod value;

pub use context::{Codegen, Slot, SlotId};
pub use value::{ConstLit, ConstValue, MaterializedValue, Value};
