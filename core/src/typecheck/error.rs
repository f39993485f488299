//! Internal error types for typechecking.
use super::reporting::to_type;
use super::unif::{NodeId, UnifTable};

use crate::{error::TypecheckError, position::TermPos};

/// Error during the unification of two types.
///
/// In each variant, `expected` and `inferred` refer to the two nodes that failed to unify. This
/// error carries raw graph nodes; it is converted to the public [TypecheckError], which carries
/// printable types and positions, by [UnifError::into_typecheck_err].
#[derive(Debug, PartialEq, Clone)]
pub enum UnifError {
    /// Tried to unify two incompatible types.
    TypeMismatch { expected: NodeId, inferred: NodeId },
    /// Tried to unify two tuple types with a different number of components.
    TupleArityMismatch { expected: NodeId, inferred: NodeId },
    /// An error occurred when unifying the domains of two arrows.
    DomainMismatch {
        expected: NodeId,
        inferred: NodeId,
        cause: Box<UnifError>,
    },
    /// An error occurred when unifying the codomains of two arrows.
    CodomainMismatch {
        expected: NodeId,
        inferred: NodeId,
        cause: Box<UnifError>,
    },
    /// A type contains itself.
    InfiniteType { typ: NodeId },
    /// A generalized node took part in unification or in a level update without having been
    /// instantiated first. This is a bug of the inference engine, not an error in the checked
    /// program.
    GeneralizedTypeUnification { typ: NodeId },
}

impl UnifError {
    /// Convert a unification error to a typechecking error by resolving the involved nodes to
    /// printable types and attaching the position of the offending expression.
    ///
    /// There is a hierarchy between error types: [UnifError] is the most local/specific one, and
    /// [crate::error::TypecheckError] is the most high-level. This conversion adds information
    /// and groups specific errors into more general ones.
    pub fn into_typecheck_err(self, table: &UnifTable, pos: TermPos) -> TypecheckError {
        match self {
            UnifError::TypeMismatch { expected, inferred } => TypecheckError::TypeMismatch {
                expected: to_type(table, expected),
                inferred: to_type(table, inferred),
                pos,
            },
            UnifError::TupleArityMismatch { expected, inferred } => {
                TypecheckError::TupleArityMismatch {
                    expected: to_type(table, expected),
                    inferred: to_type(table, inferred),
                    pos,
                }
            }
            UnifError::DomainMismatch {
                expected,
                inferred,
                cause,
            }
            | UnifError::CodomainMismatch {
                expected,
                inferred,
                cause,
            } => TypecheckError::ArrowTypeMismatch {
                expected: to_type(table, expected),
                inferred: to_type(table, inferred),
                cause: Box::new(cause.into_typecheck_err(table, pos)),
                pos,
            },
            UnifError::InfiniteType { typ } => TypecheckError::InfiniteType {
                typ: to_type(table, typ),
                pos,
            },
            UnifError::GeneralizedTypeUnification { typ } => TypecheckError::InternalError {
                msg: format!(
                    "unexpected unification or level update involving the generalized type `{}`",
                    to_type(table, typ)
                ),
                pos,
            },
        }
    }
}
