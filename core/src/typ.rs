//! Merl static types.
//!
//! This module defines the declared/reported representation of types: the one used to write down
//! the types of primitive operators in the initial environment, and the one extracted from the
//! unification graph when reporting inferred types or type errors. The representation used
//! internally by type inference lives in [crate::typecheck::unif] instead.
//!
//! Free type variables appearing in a declared type are implicitly universally quantified: the
//! type `a -> a` of the identity stands for `forall a. a -> a`, and each use site gets fresh
//! copies of its variables.
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{identifier::Ident, impl_display_from_pretty};

/// A non-composite base type.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum GroundType {
    Int,
    Float,
    String,
    Bool,
    Unit,
}

impl fmt::Display for GroundType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            GroundType::Int => write!(f, "int"),
            GroundType::Float => write!(f, "float"),
            GroundType::String => write!(f, "string"),
            GroundType::Bool => write!(f, "bool"),
            GroundType::Unit => write!(f, "unit"),
        }
    }
}

/// A concrete, recursive Merl type.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub enum Type {
    /// A base type.
    Ground(GroundType),
    /// A function type.
    Arrow(Box<Type>, Box<Type>),
    /// A tuple type. The arity is fixed and at least 2.
    Tuple(Vec<Type>),
    /// A type variable.
    Var(Ident),
}

/// Multi-ary arrow constructor: `mk_arrow!(a, b, c)` is the type `a -> b -> c`.
#[macro_export]
macro_rules! mk_arrow {
    ($left:expr, $right:expr) => {
        $crate::typ::Type::Arrow(Box::new($left), Box::new($right))
    };
    ( $fst:expr, $snd:expr , $( $types:expr ),+ ) => {
        $crate::mk_arrow!($fst, $crate::mk_arrow!($snd, $( $types ),+))
    };
}

/// Tuple type constructor: `mk_ty_tuple!(a, b)` is the type `a * b`.
#[macro_export]
macro_rules! mk_ty_tuple {
    ( $( $types:expr ),+ ) => {
        $crate::typ::Type::Tuple(vec![$( $types ),+])
    };
}

/// Generate an helper function to build a 0-ary type.
macro_rules! generate_builder {
    ($fun:ident, $var:ident) => {
        pub fn $fun() -> Type {
            Type::Ground(GroundType::$var)
        }
    };
}

/// Helpers to build [Type] values without spelling out the constructors.
pub mod build {
    use super::*;

    generate_builder!(int, Int);
    generate_builder!(float, Float);
    generate_builder!(str, String);
    generate_builder!(bool, Bool);
    generate_builder!(unit, Unit);

    pub fn var(name: impl Into<Ident>) -> Type {
        Type::Var(name.into())
    }
}

impl From<GroundType> for Type {
    fn from(ground: GroundType) -> Self {
        Type::Ground(ground)
    }
}

impl_display_from_pretty!(Type);
