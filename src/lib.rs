//! # Lark Compiler — Expression Value Layer
//!
//! The expression-value layer of the Lark compiler's LLVM backend. Every
//! expression the backend lowers becomes a [`Value`]: either a
//! materialized LLVM value already in the instruction stream, or a
//! compile-time constant held at arbitrary precision until context forces
//! a representation.
//!
//! ## Lowering Pipeline
//!
//! ```text
//! Typed AST -> Value construction -> Operator lowering / Conversion -> LLVM IR
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use inkwell::context::Context;
//! use larkc::ast::BinOp;
//! use larkc::codegen::Codegen;
//! use larkc::types::Type;
//!
//! let context = Context::create();
//! let module = context.create_module("demo");
//! let builder = context.create_builder();
//! let function = module.add_function("f", context.void_type().fn_type(&[], false), None);
//! builder.position_at_end(context.append_basic_block(function, "entry"));
//!
//! let cx = Codegen::new(&context, &module, &builder);
//! let i32t = context.i32_type();
//! let a = cx.new_value(i32t.const_int(6, false).into(), Type::int32());
//! let b = cx.new_value(i32t.const_int(7, false).into(), Type::int32());
//! let product = a.binary_op(&cx, BinOp::Mul, &b).unwrap();
//! assert_eq!(product.ty(), Type::int32());
//! ```
//!
//! ## Module Overview
//!
//! - [`ast`] - Operator and literal token kinds
//! - [`types`] - Semantic type representation
//! - [`diagnostics`] - Error reporting infrastructure
//! - [`span`] - Source location tracking
//! - [`codegen`] - LLVM lowering: context, type mapping, values

pub mod ast;
pub mod codegen;
pub mod diagnostics;
pub mod span;
pub mod types;

// Re-export commonly used types
pub use codegen::{Codegen, ConstValue, MaterializedValue, Value};
pub use diagnostics::{Diagnostic, DiagnosticEmitter, DiagnosticKind, ErrorCode, ValueError};
pub use span::{Span, Spanned};
pub use types::{BasicKind, Type, TypeKind};
