//! Pretty-printing of types.
use std::fmt;

use crate::typ::Type;

use pretty::docs;
pub use pretty::{BoxAllocator, DocAllocator, DocBuilder, Pretty};

/// Determines if a type needs parentheses when printed as the domain of an arrow or as a tuple
/// component. Arrows associate to the right and bind looser than the tuple product, so both arrows
/// and nested tuples must be parenthesized in those positions.
fn needs_parens(typ: &Type) -> bool {
    matches!(typ, Type::Arrow(..) | Type::Tuple(_))
}

impl<'a, D, A> Pretty<'a, D, A> for &Type
where
    D: DocAllocator<'a, A>,
    D::Doc: Clone,
    A: Clone + 'a,
{
    fn pretty(self, allocator: &'a D) -> DocBuilder<'a, D, A> {
        match self {
            Type::Ground(ground) => allocator.as_string(ground),
            Type::Var(name) => allocator.as_string(name),
            Type::Arrow(dom, codom) => docs![
                allocator,
                atom(dom, allocator),
                " -> ",
                codom.as_ref().pretty(allocator),
            ],
            Type::Tuple(items) => allocator.intersperse(
                items.iter().map(|item| atom(item, allocator)),
                allocator.text(" * "),
            ),
        }
    }
}

/// Pretty-print a type, wrapping it in parentheses when required by the enclosing position.
fn atom<'a, D, A>(typ: &Type, allocator: &'a D) -> DocBuilder<'a, D, A>
where
    D: DocAllocator<'a, A>,
    D::Doc: Clone,
    A: Clone + 'a,
{
    if needs_parens(typ) {
        typ.pretty(allocator).parens()
    } else {
        typ.pretty(allocator)
    }
}

pub fn fmt_pretty<T>(value: &T, f: &mut fmt::Formatter) -> fmt::Result
where
    T: for<'a> Pretty<'a, BoxAllocator, ()> + Clone,
{
    let allocator = BoxAllocator;
    let doc: DocBuilder<_, ()> = value.clone().pretty(&allocator);
    doc.render_fmt(80, f)
}

/// Generate an implementation of `fmt::Display` for types that implement `Pretty`.
#[macro_export]
macro_rules! impl_display_from_pretty {
    ($ty:ty) => {
        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                $crate::pretty::fmt_pretty(&self, f)
            }
        }
    };
}
