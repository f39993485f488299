//! Error types and diagnostic rendering.
//!
//! All failures of the front-end are materialized as error values and eventually converted to
//! [codespan_reporting] diagnostics through the [IntoDiagnostics] trait.
use codespan::{FileId, Files};
use codespan_reporting::diagnostic::{Diagnostic, Label};

use crate::{
    identifier::LocIdent,
    position::{RawSpan, TermPos},
    typ::Type,
};

/// An error occurring during the static typechecking phase.
#[derive(Debug, PartialEq, Clone)]
pub enum TypecheckError {
    /// An unbound identifier was referenced.
    UnboundIdentifier { id: LocIdent, pos: TermPos },
    /// The actual (inferred) type of an expression is incompatible with its expected type.
    TypeMismatch {
        expected: Type,
        inferred: Type,
        pos: TermPos,
    },
    /// Type mismatch on a subtype of an arrow type.
    ///
    /// The unification of two arrow types requires the unification of the domain and the codomain
    /// (and recursively so, if they are themselves arrow types). When the unification of a subtype
    /// fails, we want to report which part of the arrow types is problematic, and why, rather than
    /// a generic `TypeMismatch`. Failing to unify two arrow types is a common type error which
    /// deserves a good reporting, caused e.g. by applying a function to an argument of a wrong
    /// type.
    ArrowTypeMismatch {
        expected: Type,
        inferred: Type,
        cause: Box<TypecheckError>,
        pos: TermPos,
    },
    /// Two tuple types with a different number of components were unified.
    TupleArityMismatch {
        expected: Type,
        inferred: Type,
        pos: TermPos,
    },
    /// A self-referential (infinite) type was detected, either during unification or by the
    /// occurs check run after generalization.
    InfiniteType { typ: Type, pos: TermPos },
    /// A tuple-destructuring pattern was used as the left-hand side of a binding or as a function
    /// parameter. Those aren't supported yet.
    UnsupportedPattern { pos: TermPos },
    /// An internal invariant of the inference engine was broken. This is a bug in the typechecker,
    /// not an error in the program being checked.
    InternalError { msg: String, pos: TermPos },
}

pub const INTERNAL_ERROR_MSG: &str =
    "This error should not happen. This is likely a bug in the Merl typechecker. Please consider\
 reporting it at https://github.com/merl-lang/merl/issues with the above error message.";

/// A trait for converting an error to a diagnostic.
pub trait IntoDiagnostics<FileId> {
    /// Convert an error to a list of printable formatted diagnostics.
    ///
    /// Most errors generate only one diagnostic; the list shape is kept so that errors wrapping a
    /// cause (such as arrow mismatches) can lay out the cause as its own diagnostic.
    fn into_diagnostics(self, files: &mut Files<String>) -> Vec<Diagnostic<FileId>>;
}

// Allow the use of a single `Diagnostic` directly as an error that can be reported by Merl.
impl IntoDiagnostics<FileId> for Diagnostic<FileId> {
    fn into_diagnostics(self, _files: &mut Files<String>) -> Vec<Diagnostic<FileId>> {
        vec![self]
    }
}

// Helpers for the creation of codespan `Label`s

/// Create a primary label from a span.
fn primary(span: &RawSpan) -> Label<FileId> {
    Label::primary(span.src_id, span.start.to_usize()..span.end.to_usize())
}

impl IntoDiagnostics<FileId> for TypecheckError {
    fn into_diagnostics(self, files: &mut Files<String>) -> Vec<Diagnostic<FileId>> {
        fn mk_expr_label(span_opt: &TermPos) -> Vec<Label<FileId>> {
            span_opt
                .as_opt_ref()
                .map(|span| vec![primary(span).with_message("this expression")])
                .unwrap_or_default()
        }

        fn mk_expected_msg<T: std::fmt::Display>(expected: &T) -> String {
            format!("Expected an expression of type `{expected}`")
        }

        fn mk_inferred_msg<T: std::fmt::Display>(inferred: &T) -> String {
            format!("Found an expression of type `{inferred}`")
        }

        match self {
            TypecheckError::UnboundIdentifier { id, pos } => vec![Diagnostic::error()
                .with_message(format!("unbound identifier `{id}`"))
                .with_labels(
                    pos.as_opt_ref()
                        .map(|span| vec![primary(span).with_message("this identifier is unbound")])
                        .unwrap_or_default(),
                )],
            TypecheckError::TypeMismatch {
                expected,
                inferred,
                pos,
            } => vec![Diagnostic::error()
                .with_message("incompatible types")
                .with_labels(mk_expr_label(&pos))
                .with_notes(vec![
                    mk_expected_msg(&expected),
                    mk_inferred_msg(&inferred),
                    String::from("These types are not compatible"),
                ])],
            TypecheckError::ArrowTypeMismatch {
                expected,
                inferred,
                cause,
                pos,
            } => {
                let mut diags = vec![Diagnostic::error()
                    .with_message("function types are not compatible")
                    .with_labels(mk_expr_label(&pos))
                    .with_notes(vec![
                        mk_expected_msg(&expected),
                        mk_inferred_msg(&inferred),
                        String::from("Could not match the two function types"),
                    ])];
                diags.extend(cause.into_diagnostics(files).into_iter().map(|diag| {
                    let message = format!("while typing a function: {}", diag.message);
                    diag.with_message(message)
                }));
                diags
            }
            TypecheckError::TupleArityMismatch {
                expected,
                inferred,
                pos,
            } => vec![Diagnostic::error()
                .with_message("tuple sizes do not match")
                .with_labels(mk_expr_label(&pos))
                .with_notes(vec![
                    mk_expected_msg(&expected),
                    mk_inferred_msg(&inferred),
                    String::from("These tuples have a different number of components"),
                ])],
            TypecheckError::InfiniteType { typ, pos } => vec![Diagnostic::error()
                .with_message("infinite type")
                .with_labels(mk_expr_label(&pos))
                .with_notes(vec![
                    format!("The type of this expression would be the infinite type `{typ}`"),
                    String::from(
                        "A type cannot contain itself. This usually comes from applying a \
                         function to itself",
                    ),
                ])],
            TypecheckError::UnsupportedPattern { pos } => vec![Diagnostic::error()
                .with_message("unsupported pattern")
                .with_labels(
                    pos.as_opt_ref()
                        .map(|span| vec![primary(span).with_message("this pattern")])
                        .unwrap_or_default(),
                )
                .with_notes(vec![String::from(
                    "Tuple patterns aren't supported yet: bind the tuple to a name and project \
                     with `fst` and `snd` instead",
                )])],
            TypecheckError::InternalError { msg, pos } => vec![Diagnostic::error()
                .with_message(format!("internal typechecker error: {msg}"))
                .with_labels(mk_expr_label(&pos))
                .with_notes(vec![String::from(INTERNAL_ERROR_MSG)])],
        }
    }
}
