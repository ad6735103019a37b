//! Semantic type representation.
//!
//! This module defines the type model consumed by expression lowering.
//! Types are fully resolved by the time they reach this layer; the only
//! resolution this module performs is the *named → underlying* unwrap and
//! structural identity, which everything else builds on.
//!
//! # Type structure
//!
//! - **Basic types**: machine kinds (`i8..i64`, `u8..u64`, `f32`, `f64`,
//!   complex, `bool`, `string`) plus the *untyped* constant kinds that
//!   exist only until a constant is bound to a context.
//! - **Named types**: a nominal wrapper around an underlying type.
//! - **Pointer types**: `*T`.
//! - **Struct types**: ordered, named fields.
//! - **Interface types**: a method set.

use std::fmt;
use std::sync::Arc;

/// The kind tag of a basic type.
///
/// Untyped kinds (`UntypedInt`, `UntypedFloat`, `UntypedComplex`, `Nil`)
/// describe compile-time constants that have not yet been bound to a
/// concrete representation. They must never reach the backend directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BasicKind {
    Bool,
    Int8,
    Int16,
    Int32,
    Int64,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Float32,
    Float64,
    Complex64,
    Complex128,
    Str,
    /// An untyped integer constant.
    UntypedInt,
    /// An untyped floating-point constant.
    UntypedFloat,
    /// An untyped complex constant.
    UntypedComplex,
    /// The predeclared `nil`.
    Nil,
}

impl BasicKind {
    /// Whether this is a signed integer kind.
    pub fn is_signed(&self) -> bool {
        matches!(
            self,
            BasicKind::Int8 | BasicKind::Int16 | BasicKind::Int32 | BasicKind::Int64
        )
    }

    /// Whether this is an unsigned integer kind.
    pub fn is_unsigned(&self) -> bool {
        matches!(
            self,
            BasicKind::Uint8 | BasicKind::Uint16 | BasicKind::Uint32 | BasicKind::Uint64
        )
    }

    /// Whether this is any integer kind, untyped included.
    pub fn is_integer(&self) -> bool {
        self.is_signed() || self.is_unsigned() || *self == BasicKind::UntypedInt
    }

    /// Whether this is a floating-point kind, untyped included.
    pub fn is_float(&self) -> bool {
        matches!(
            self,
            BasicKind::Float32 | BasicKind::Float64 | BasicKind::UntypedFloat
        )
    }

    /// Whether this is a complex kind, untyped included.
    pub fn is_complex(&self) -> bool {
        matches!(
            self,
            BasicKind::Complex64 | BasicKind::Complex128 | BasicKind::UntypedComplex
        )
    }

    /// Whether this kind describes an unbound constant.
    pub fn is_untyped(&self) -> bool {
        matches!(
            self,
            BasicKind::UntypedInt
                | BasicKind::UntypedFloat
                | BasicKind::UntypedComplex
                | BasicKind::Nil
        )
    }

    /// Bit width of the machine representation, where one exists.
    pub fn bit_width(&self) -> Option<u32> {
        Some(match self {
            BasicKind::Bool => 1,
            BasicKind::Int8 | BasicKind::Uint8 => 8,
            BasicKind::Int16 | BasicKind::Uint16 => 16,
            BasicKind::Int32 | BasicKind::Uint32 => 32,
            BasicKind::Int64 | BasicKind::Uint64 => 64,
            BasicKind::Float32 => 32,
            BasicKind::Float64 => 64,
            BasicKind::Complex64 => 64,
            BasicKind::Complex128 => 128,
            _ => return None,
        })
    }

    /// The name of this kind as it appears in source.
    pub fn name(&self) -> &'static str {
        match self {
            BasicKind::Bool => "bool",
            BasicKind::Int8 => "int8",
            BasicKind::Int16 => "int16",
            BasicKind::Int32 => "int32",
            BasicKind::Int64 => "int64",
            BasicKind::Uint8 => "uint8",
            BasicKind::Uint16 => "uint16",
            BasicKind::Uint32 => "uint32",
            BasicKind::Uint64 => "uint64",
            BasicKind::Float32 => "float32",
            BasicKind::Float64 => "float64",
            BasicKind::Complex64 => "complex64",
            BasicKind::Complex128 => "complex128",
            BasicKind::Str => "string",
            BasicKind::UntypedInt => "untyped int",
            BasicKind::UntypedFloat => "untyped float",
            BasicKind::UntypedComplex => "untyped complex",
            BasicKind::Nil => "nil",
        }
    }
}

impl fmt::Display for BasicKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A field of a struct type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StructField {
    pub name: String,
    pub ty: Type,
}

/// A method in an interface's method set.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodSig {
    pub name: String,
    pub params: Vec<Type>,
    pub result: Option<Type>,
}

/// A semantic type.
///
/// Types are handles over an `Arc`'d kind: cloning is cheap and equality
/// is structural. Use [`Type::underlying`] and [`identical`] rather than
/// `==` when source-language identity is what you mean.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Type {
    kind: Arc<TypeKind>,
}

/// The kind of a type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeKind {
    /// A basic type: machine kinds and untyped constant kinds.
    Basic(BasicKind),
    /// A named type wrapping an underlying type.
    Named { name: String, underlying: Type },
    /// A pointer type: `*T`.
    Pointer { base: Type },
    /// A struct type with ordered, named fields.
    Struct { fields: Vec<StructField> },
    /// An interface type with a method set.
    Interface { methods: Vec<MethodSig> },
}

impl Type {
    /// Create a new type from a kind.
    pub fn new(kind: TypeKind) -> Self {
        Self {
            kind: Arc::new(kind),
        }
    }

    /// Get the kind of this type.
    pub fn kind(&self) -> &TypeKind {
        &self.kind
    }

    // Convenience constructors.

    pub fn basic(kind: BasicKind) -> Self {
        Self::new(TypeKind::Basic(kind))
    }

    pub fn bool() -> Self {
        Self::basic(BasicKind::Bool)
    }

    pub fn int32() -> Self {
        Self::basic(BasicKind::Int32)
    }

    pub fn string() -> Self {
        Self::basic(BasicKind::Str)
    }

    pub fn named(name: impl Into<String>, underlying: Type) -> Self {
        Self::new(TypeKind::Named {
            name: name.into(),
            underlying,
        })
    }

    pub fn pointer(base: Type) -> Self {
        Self::new(TypeKind::Pointer { base })
    }

    pub fn strukt(fields: Vec<StructField>) -> Self {
        Self::new(TypeKind::Struct { fields })
    }

    pub fn interface(methods: Vec<MethodSig>) -> Self {
        Self::new(TypeKind::Interface { methods })
    }

    /// The structural underlying type: unwraps all levels of naming.
    pub fn underlying(&self) -> Type {
        let mut ty = self.clone();
        while let TypeKind::Named { underlying, .. } = ty.kind() {
            ty = underlying.clone();
        }
        ty
    }

    /// The basic kind of this type's underlying form, if it is basic.
    pub fn basic_kind(&self) -> Option<BasicKind> {
        match self.underlying().kind() {
            TypeKind::Basic(kind) => Some(*kind),
            _ => None,
        }
    }

    /// The pointee type, if the underlying form is a pointer.
    pub fn pointee(&self) -> Option<Type> {
        match self.underlying().kind() {
            TypeKind::Pointer { base } => Some(base.clone()),
            _ => None,
        }
    }

    /// Whether the underlying form is a struct.
    pub fn is_struct(&self) -> bool {
        matches!(self.underlying().kind(), TypeKind::Struct { .. })
    }

    /// Whether the underlying form is an interface.
    pub fn is_interface(&self) -> bool {
        matches!(self.underlying().kind(), TypeKind::Interface { .. })
    }

    /// Whether the underlying basic kind is a signed integer.
    pub fn is_signed(&self) -> bool {
        self.basic_kind().map(|k| k.is_signed()).unwrap_or(false)
    }

    /// Whether this type is an untyped constant kind.
    pub fn is_untyped(&self) -> bool {
        self.basic_kind().map(|k| k.is_untyped()).unwrap_or(false)
    }
}

/// Structural identity over fully-unwrapped forms.
///
/// Basic types compare by kind tag; pointers by base recursion; structs
/// pairwise by field name and type in declaration order; interfaces by
/// method set in order.
pub fn identical(a: &Type, b: &Type) -> bool {
    let a = a.underlying();
    let b = b.underlying();
    match (a.kind(), b.kind()) {
        (TypeKind::Basic(ka), TypeKind::Basic(kb)) => ka == kb,
        (TypeKind::Pointer { base: ba }, TypeKind::Pointer { base: bb }) => identical(ba, bb),
        (TypeKind::Struct { fields: fa }, TypeKind::Struct { fields: fb }) => {
            fa.len() == fb.len()
                && fa
                    .iter()
                    .zip(fb.iter())
                    .all(|(x, y)| x.name == y.name && identical(&x.ty, &y.ty))
        }
        (TypeKind::Interface { methods: ma }, TypeKind::Interface { methods: mb }) => {
            ma.len() == mb.len()
                && ma.iter().zip(mb.iter()).all(|(x, y)| {
                    x.name == y.name
                        && x.params.len() == y.params.len()
                        && x.params
                            .iter()
                            .zip(y.params.iter())
                            .all(|(p, q)| identical(p, q))
                        && match (&x.result, &y.result) {
                            (Some(p), Some(q)) => identical(p, q),
                            (None, None) => true,
                            _ => false,
                        }
                })
        }
        _ => false,
    }
}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.kind)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind() {
            TypeKind::Basic(kind) => write!(f, "{kind}"),
            TypeKind::Named { name, .. } => write!(f, "{name}"),
            TypeKind::Pointer { base } => write!(f, "*{base}"),
            TypeKind::Struct { fields } => {
                if fields.is_empty() {
                    return write!(f, "struct {{}}");
                }
                write!(f, "struct {{ ")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, "; ")?;
                    }
                    write!(f, "{} {}", field.name, field.ty)?;
                }
                write!(f, " }}")
            }
            TypeKind::Interface { methods } => {
                if methods.is_empty() {
                    return write!(f, "interface {{}}");
                }
                write!(f, "interface {{ ")?;
                for (i, m) in methods.iter().enumerate() {
                    if i > 0 {
                        write!(f, "; ")?;
                    }
                    write!(f, "{}", m.name)?;
                }
                write!(f, " }}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point() -> Type {
        Type::strukt(vec![
            StructField {
                name: "x".into(),
                ty: Type::int32(),
            },
            StructField {
                name: "y".into(),
                ty: Type::int32(),
            },
        ])
    }

    #[test]
    fn underlying_unwraps_all_naming_levels() {
        let inner = Type::named("Celsius", Type::int32());
        let outer = Type::named("Temperature", inner);
        assert_eq!(outer.basic_kind(), Some(BasicKind::Int32));
        assert!(matches!(outer.underlying().kind(), TypeKind::Basic(_)));
    }

    #[test]
    fn identical_sees_through_names() {
        let named = Type::named("MyInt", Type::int32());
        assert!(identical(&named, &Type::int32()));
        assert!(!identical(&named, &Type::basic(BasicKind::Int64)));
    }

    #[test]
    fn identical_structs_compare_fields_in_order() {
        assert!(identical(&point(), &point()));

        let swapped = Type::strukt(vec![
            StructField {
                name: "y".into(),
                ty: Type::int32(),
            },
            StructField {
                name: "x".into(),
                ty: Type::int32(),
            },
        ]);
        assert!(!identical(&point(), &swapped));
    }

    #[test]
    fn identical_pointers_recurse_on_base() {
        let a = Type::pointer(Type::named("MyInt", Type::int32()));
        let b = Type::pointer(Type::int32());
        assert!(identical(&a, &b));
        assert!(!identical(&a, &Type::pointer(Type::bool())));
    }

    #[test]
    fn identical_interfaces_compare_method_sets() {
        let stringer = Type::interface(vec![MethodSig {
            name: "String".into(),
            params: vec![],
            result: Some(Type::string()),
        }]);
        let same = Type::interface(vec![MethodSig {
            name: "String".into(),
            params: vec![],
            result: Some(Type::string()),
        }]);
        let empty = Type::interface(vec![]);
        assert!(identical(&stringer, &same));
        assert!(!identical(&stringer, &empty));
    }

    #[test]
    fn pointee_unwraps_named_pointer() {
        let handle = Type::named("Handle", Type::pointer(Type::int32()));
        let pointee = handle.pointee().unwrap();
        assert_eq!(pointee.basic_kind(), Some(BasicKind::Int32));
    }
}
