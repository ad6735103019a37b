//! Code generation context.
//!
//! [`Codegen`] is the per-function lowering cursor: it holds the LLVM
//! context, the module being built, and the IR builder (positioned by the
//! caller), plus the slot arena that backs value address/receiver links.

use std::cell::RefCell;

use inkwell::builder::Builder;
use inkwell::context::Context;
use inkwell::module::Module;
use inkwell::values::{BasicValueEnum, PointerValue};

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{pow, Num};

use crate::ast::LitKind;
use crate::codegen::value::{ConstLit, ConstValue, MaterializedValue, Value};
use crate::diagnostics::ValueError;
use crate::types::{BasicKind, Type};

/// An addressable storage slot recorded in the arena.
///
/// Slots are how values refer back to the storage they were loaded from
/// without owning it: a [`MaterializedValue`] carries `Option<SlotId>`
/// indices, never pointers into other values.
#[derive(Debug, Clone)]
pub struct Slot<'ctx> {
    /// The slot's address.
    pub ptr: PointerValue<'ctx>,
    /// The type of the value stored in the slot.
    pub pointee: Type,
}

/// An index into the slot arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotId(u32);

/// The code generation context for one function body.
///
/// Single-threaded by construction: the slot arena is a `RefCell` and one
/// `Codegen` exists per function being lowered. The builder must already
/// be positioned inside a basic block before any value operation runs.
pub struct Codegen<'ctx, 'a> {
    /// The LLVM context.
    pub context: &'ctx Context,
    /// The LLVM module being built.
    pub module: &'a Module<'ctx>,
    /// The LLVM IR builder.
    pub builder: &'a Builder<'ctx>,
    /// Storage slots referenced by value address/receiver links.
    slots: RefCell<Vec<Slot<'ctx>>>,
}

impl<'ctx, 'a> Codegen<'ctx, 'a> {
    /// Create a new code generation context.
    pub fn new(
        context: &'ctx Context,
        module: &'a Module<'ctx>,
        builder: &'a Builder<'ctx>,
    ) -> Self {
        Self {
            context,
            module,
            builder,
            slots: RefCell::new(Vec::new()),
        }
    }

    /// Record an addressable storage slot and return its arena index.
    pub fn record_slot(&self, ptr: PointerValue<'ctx>, pointee: Type) -> SlotId {
        let mut slots = self.slots.borrow_mut();
        let id = SlotId(slots.len() as u32);
        slots.push(Slot { ptr, pointee });
        id
    }

    /// Look up a previously recorded slot.
    pub fn slot(&self, id: SlotId) -> Slot<'ctx> {
        self.slots.borrow()[id.0 as usize].clone()
    }

    /// Wrap an existing backend value as a non-indirect value of the
    /// given type.
    pub fn new_value(&self, value: BasicValueEnum<'ctx>, ty: Type) -> Value<'ctx> {
        Value::Materialized(MaterializedValue::new(value, ty))
    }

    /// Wrap an addressable storage slot as an indirect value.
    ///
    /// The result has type `*pointee` and its machine value is the slot
    /// address; dereferencing loads the stored value and links it back to
    /// the slot.
    pub fn new_slot_value(&self, ptr: PointerValue<'ctx>, pointee: Type) -> Value<'ctx> {
        Value::Materialized(MaterializedValue::new_indirect(
            ptr.into(),
            Type::pointer(pointee),
        ))
    }

    /// Wrap a literal token as a compile-time constant.
    ///
    /// Integer, float, and imaginary literals become untyped constants
    /// with unbounded precision; character literals become `int32`
    /// codepoints; string literals become `string` constants.
    pub fn new_const(&self, kind: LitKind, text: &str) -> Result<Value<'ctx>, ValueError> {
        let value = match kind {
            LitKind::Int => ConstValue::new(
                ConstLit::Int(parse_int_literal(text)?),
                Type::basic(BasicKind::UntypedInt),
            ),
            LitKind::Float => ConstValue::new(
                ConstLit::Float(parse_float_literal(text)?),
                Type::basic(BasicKind::UntypedFloat),
            ),
            LitKind::Imag => {
                let digits = text.strip_suffix('i').unwrap_or(text);
                ConstValue::new(
                    ConstLit::Complex {
                        re: BigRational::from_integer(BigInt::from(0)),
                        im: parse_float_literal(digits)?,
                    },
                    Type::basic(BasicKind::UntypedComplex),
                )
            }
            LitKind::Char => {
                let cp = parse_char_literal(text)?;
                ConstValue::new(ConstLit::Int(BigInt::from(cp)), Type::int32())
            }
            LitKind::Str => ConstValue::new(
                ConstLit::Str(parse_str_literal(text)?),
                Type::string(),
            ),
        };
        Ok(Value::Constant(value))
    }
}

/// Parse an integer literal in any of the source radices: `0x`/`0X` hex,
/// `0o`/`0O` octal, `0b`/`0B` binary, a bare leading `0` as legacy octal,
/// decimal otherwise. Underscore separators are accepted everywhere.
fn parse_int_literal(text: &str) -> Result<BigInt, ValueError> {
    let digits: String = text.chars().filter(|c| *c != '_').collect();
    let (radix, body) = if let Some(rest) = digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        (16, rest)
    } else if let Some(rest) = digits
        .strip_prefix("0o")
        .or_else(|| digits.strip_prefix("0O"))
    {
        (8, rest)
    } else if let Some(rest) = digits
        .strip_prefix("0b")
        .or_else(|| digits.strip_prefix("0B"))
    {
        (2, rest)
    } else if digits.len() > 1 && digits.starts_with('0') {
        (8, &digits[1..])
    } else {
        (10, digits.as_str())
    };
    BigInt::from_str_radix(body, radix).map_err(|_| ValueError::Internal {
        reason: format!("lexer produced unparseable integer literal `{text}`"),
    })
}

/// Parse a float literal into an exact rational.
///
/// The decimal text is parsed directly (mantissa digits scaled by a
/// power of ten) rather than through a machine float, so no precision is
/// lost on entry to the constant domain.
fn parse_float_literal(text: &str) -> Result<BigRational, ValueError> {
    let digits: String = text.chars().filter(|c| *c != '_').collect();
    let malformed = || ValueError::Internal {
        reason: format!("lexer produced unparseable float literal `{text}`"),
    };

    let (mantissa_str, exp_str) = match digits.find(['e', 'E']) {
        Some(i) => (&digits[..i], Some(&digits[i + 1..])),
        None => (digits.as_str(), None),
    };
    let exp: i64 = match exp_str {
        Some(s) => s.parse().map_err(|_| malformed())?,
        None => 0,
    };
    let (int_part, frac_part) = match mantissa_str.find('.') {
        Some(i) => (&mantissa_str[..i], &mantissa_str[i + 1..]),
        None => (mantissa_str, ""),
    };
    if int_part.is_empty() && frac_part.is_empty() {
        return Err(malformed());
    }
    let mantissa: BigInt = format!("{int_part}{frac_part}")
        .parse()
        .map_err(|_| malformed())?;

    let scale = exp - frac_part.len() as i64;
    if scale >= 0 {
        let factor = pow(BigInt::from(10), scale as usize);
        Ok(BigRational::from_integer(mantissa * factor))
    } else {
        let denom = pow(BigInt::from(10), (-scale) as usize);
        Ok(BigRational::new(mantissa, denom))
    }
}

/// Parse a character literal (with or without surrounding quotes) to its
/// Unicode codepoint.
fn parse_char_literal(text: &str) -> Result<u32, ValueError> {
    let body = text
        .strip_prefix('\'')
        .and_then(|t| t.strip_suffix('\''))
        .unwrap_or(text);
    let unescaped = unescape(body)?;
    let mut chars = unescaped.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c as u32),
        _ => Err(ValueError::Internal {
            reason: format!("lexer produced malformed character literal `{text}`"),
        }),
    }
}

/// Parse a string literal. Double-quoted strings are unescaped; raw
/// backtick strings are taken verbatim.
fn parse_str_literal(text: &str) -> Result<String, ValueError> {
    if let Some(body) = text.strip_prefix('`').and_then(|t| t.strip_suffix('`')) {
        return Ok(body.to_string());
    }
    let body = text
        .strip_prefix('"')
        .and_then(|t| t.strip_suffix('"'))
        .unwrap_or(text);
    unescape(body)
}

fn unescape(body: &str) -> Result<String, ValueError> {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('\\') => out.push('\\'),
            Some('\'') => out.push('\''),
            Some('"') => out.push('"'),
            Some('0') => out.push('\0'),
            other => {
                return Err(ValueError::Internal {
                    reason: format!("lexer passed through invalid escape `\\{}`",
                        other.map(String::from).unwrap_or_default()),
                })
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_traits::ToPrimitive;

    #[test]
    fn int_literals_parse_in_every_radix() {
        assert_eq!(parse_int_literal("42").unwrap(), BigInt::from(42));
        assert_eq!(parse_int_literal("0xFF").unwrap(), BigInt::from(255));
        assert_eq!(parse_int_literal("0o17").unwrap(), BigInt::from(15));
        assert_eq!(parse_int_literal("0b101").unwrap(), BigInt::from(5));
        assert_eq!(parse_int_literal("017").unwrap(), BigInt::from(15));
        assert_eq!(parse_int_literal("1_000_000").unwrap(), BigInt::from(1_000_000));
    }

    #[test]
    fn int_literals_exceed_machine_width() {
        let huge = parse_int_literal("0xFFFF_FFFF_FFFF_FFFF_FFFF").unwrap();
        assert!(huge.to_i64().is_none());
    }

    #[test]
    fn float_literals_parse_to_rationals() {
        let half = parse_float_literal("0.5").unwrap();
        assert_eq!(half, BigRational::new(BigInt::from(1), BigInt::from(2)));
        assert!(parse_float_literal("2e10").unwrap().is_integer());
        assert_eq!(
            parse_float_literal("1e-3").unwrap(),
            BigRational::new(BigInt::from(1), BigInt::from(1000))
        );
    }

    #[test]
    fn decimal_float_literals_are_exact() {
        // 0.1 has no finite binary representation; exact decimal parsing
        // must not round it through a machine float.
        let tenth = parse_float_literal("0.1").unwrap();
        assert_eq!(tenth, BigRational::new(BigInt::from(1), BigInt::from(10)));

        let a = parse_float_literal("0.1").unwrap();
        let b = parse_float_literal("0.2").unwrap();
        let c = parse_float_literal("0.3").unwrap();
        assert_eq!(a + b, c);

        let tiny = parse_float_literal("1.000000000000000000000000000001").unwrap();
        assert_ne!(tiny, BigRational::from_integer(BigInt::from(1)));
    }

    #[test]
    fn char_literals_yield_codepoints() {
        assert_eq!(parse_char_literal("'a'").unwrap(), 'a' as u32);
        assert_eq!(parse_char_literal("'\\n'").unwrap(), '\n' as u32);
        assert_eq!(parse_char_literal("'\u{4e16}'").unwrap(), 0x4e16);
    }

    #[test]
    fn str_literals_unescape_or_stay_raw() {
        assert_eq!(parse_str_literal("\"a\\tb\"").unwrap(), "a\tb");
        assert_eq!(parse_str_literal("`a\\tb`").unwrap(), "a\\tb");
    }
}
