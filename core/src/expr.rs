//! Formula expressions.
//!
//! A closed set of typed variants: field reads, constants, the four
//! arithmetic operators, `max`, `sum` and `round_up`. Nothing else can
//! appear in a formula, so every formula's input set is known statically
//! (`Expr::dependencies`) and no interpreter is involved.
//!
//! Evaluation is strictly left to right in the order the expression was
//! built, so results are bit-reproducible.

use crate::{
    failure::{ArithmeticFault, Fault},
    math,
    record::Record,
    types::FieldName,
};
use std::fmt;
use std::ops::{Add, Div, Mul, Sub};

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Field(FieldName),
    Const(f64),
    Add(Box<Expr>, Box<Expr>),
    Sub(Box<Expr>, Box<Expr>),
    Mul(Box<Expr>, Box<Expr>),
    Div(Box<Expr>, Box<Expr>),
    Max(Vec<Expr>),
    Sum(Vec<Expr>),
    RoundUp(Box<Expr>, i32),
}

pub fn field(name: FieldName) -> Expr {
    Expr::Field(name)
}

pub fn constant(value: f64) -> Expr {
    Expr::Const(value)
}

pub fn max<I: IntoIterator<Item = Expr>>(items: I) -> Expr {
    Expr::Max(items.into_iter().collect())
}

pub fn sum<I: IntoIterator<Item = Expr>>(items: I) -> Expr {
    Expr::Sum(items.into_iter().collect())
}

/// Shorthand for summing a list of fields.
pub fn sum_fields(names: &[FieldName]) -> Expr {
    sum(names.iter().copied().map(field))
}

pub fn round_up(expr: Expr, digits: i32) -> Expr {
    Expr::RoundUp(Box::new(expr), digits)
}

impl Expr {
    pub fn evaluate(&self, record: &Record) -> Result<f64, Fault> {
        match self {
            Expr::Field(name) => record.read(name),
            Expr::Const(v) => Ok(*v),
            Expr::Add(a, b) => finite(a.evaluate(record)? + b.evaluate(record)?),
            Expr::Sub(a, b) => finite(a.evaluate(record)? - b.evaluate(record)?),
            Expr::Mul(a, b) => finite(a.evaluate(record)? * b.evaluate(record)?),
            Expr::Div(a, b) => {
                let numerator = a.evaluate(record)?;
                let divisor = b.evaluate(record)?;
                if divisor == 0.0 {
                    return Err(Fault::arithmetic(ArithmeticFault::DivisionByZero));
                }
                finite(numerator / divisor)
            }
            Expr::Max(items) => math::max_of(&evaluate_all(items, record)?),
            Expr::Sum(items) => finite(math::sum_of(&evaluate_all(items, record)?)),
            Expr::RoundUp(inner, digits) => {
                finite(math::round_up(inner.evaluate(record)?, *digits))
            }
        }
    }

    /// Every field this expression reads, in first-read order, without
    /// duplicates.
    pub fn dependencies(&self) -> Vec<FieldName> {
        let mut out = Vec::new();
        self.collect_dependencies(&mut out);
        out
    }

    fn collect_dependencies(&self, out: &mut Vec<FieldName>) {
        match self {
            Expr::Field(name) => {
                if !out.contains(name) {
                    out.push(*name);
                }
            }
            Expr::Const(_) => {}
            Expr::Add(a, b) | Expr::Sub(a, b) | Expr::Mul(a, b) | Expr::Div(a, b) => {
                a.collect_dependencies(out);
                b.collect_dependencies(out);
            }
            Expr::Max(items) | Expr::Sum(items) => {
                for item in items {
                    item.collect_dependencies(out);
                }
            }
            Expr::RoundUp(inner, _) => inner.collect_dependencies(out),
        }
    }
}

// First failing operand wins; later operands are not evaluated.
fn evaluate_all(items: &[Expr], record: &Record) -> Result<Vec<f64>, Fault> {
    items.iter().map(|e| e.evaluate(record)).collect()
}

fn finite(v: f64) -> Result<f64, Fault> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(Fault::arithmetic(ArithmeticFault::NonFinite))
    }
}

impl From<f64> for Expr {
    fn from(v: f64) -> Self {
        Expr::Const(v)
    }
}

macro_rules! binary_op {
    ($trait:ident, $method:ident, $variant:ident) => {
        impl<R: Into<Expr>> $trait<R> for Expr {
            type Output = Expr;
            fn $method(self, rhs: R) -> Expr {
                Expr::$variant(Box::new(self), Box::new(rhs.into()))
            }
        }
    };
}

binary_op!(Add, add, Add);
binary_op!(Sub, sub, Sub);
binary_op!(Mul, mul, Mul);
binary_op!(Div, div, Div);

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Field(name) => write!(f, "{name}"),
            Expr::Const(v) => write!(f, "{v}"),
            Expr::Add(a, b) => write!(f, "({a} + {b})"),
            Expr::Sub(a, b) => write!(f, "({a} - {b})"),
            Expr::Mul(a, b) => write!(f, "({a} * {b})"),
            Expr::Div(a, b) => write!(f, "({a} / {b})"),
            Expr::Max(items) => write_call(f, "max", items),
            Expr::Sum(items) => write_call(f, "sum", items),
            Expr::RoundUp(inner, digits) => write!(f, "round_up({inner}, {digits})"),
        }
    }
}

fn write_call(f: &mut fmt::Formatter<'_>, name: &str, items: &[Expr]) -> fmt::Result {
    write!(f, "{name}(")?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{item}")?;
    }
    write!(f, ")")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::failure::FailureKind;

    fn record(pairs: &[(&str, f64)]) -> Record {
        pairs.iter().map(|(k, v)| (*k, *v)).collect()
    }

    #[test]
    fn operators_build_left_to_right() {
        let e = constant(20.16) * field("a") * 0.55 / 3600.0;
        let r = record(&[("a", 10.0)]);
        assert_eq!(e.evaluate(&r).unwrap(), 20.16 * 10.0 * 0.55 / 3600.0);
    }

    #[test]
    fn dependencies_are_deduplicated_in_read_order() {
        let e = max([field("b"), field("a")]) / field("b") + sum_fields(&["c", "a"]);
        assert_eq!(e.dependencies(), vec!["b", "a", "c"]);
    }

    #[test]
    fn division_by_zero_is_a_root_fault() {
        let e = field("a") / field("b");
        let r = record(&[("a", 1.0), ("b", 0.0)]);
        assert_eq!(
            e.evaluate(&r),
            Err(Fault::arithmetic(ArithmeticFault::DivisionByZero))
        );
    }

    #[test]
    fn first_missing_operand_is_reported() {
        let e = sum_fields(&["x", "y"]);
        let r = record(&[]);
        assert_eq!(
            e.evaluate(&r),
            Err(Fault::Root(FailureKind::MissingDependency { field: "x".into() }))
        );
    }

    #[test]
    fn display_renders_formula() {
        let e = round_up(field("out_docs") / 25.0, 0);
        assert_eq!(e.to_string(), "round_up((out_docs / 25), 0)");
    }
}
