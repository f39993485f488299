//! The types of the Merl primitive operators and builtins.
//!
//! The inference engine doesn't know anything about primitives: it receives their types as an
//! initial environment, built here. Free type variables in these types are implicitly quantified,
//! so `fst : a * b -> a` is polymorphic and gets fresh variables at each use site.
use crate::identifier::Ident;
use crate::typ::{build as ty, Type};
use crate::{mk_arrow, mk_ty_tuple};

/// The types of the primitive operators, in the order they are declared in the runtime.
pub fn bindings() -> Vec<(Ident, Type)> {
    [
        // Integer arithmetic.
        ("+", mk_arrow!(ty::int(), ty::int(), ty::int())),
        ("-", mk_arrow!(ty::int(), ty::int(), ty::int())),
        ("*", mk_arrow!(ty::int(), ty::int(), ty::int())),
        ("/", mk_arrow!(ty::int(), ty::int(), ty::int())),
        ("neg", mk_arrow!(ty::int(), ty::int())),
        // Floating-point arithmetic.
        ("+.", mk_arrow!(ty::float(), ty::float(), ty::float())),
        ("-.", mk_arrow!(ty::float(), ty::float(), ty::float())),
        ("*.", mk_arrow!(ty::float(), ty::float(), ty::float())),
        ("/.", mk_arrow!(ty::float(), ty::float(), ty::float())),
        // Comparisons, defined on integers.
        ("=", mk_arrow!(ty::int(), ty::int(), ty::bool())),
        ("<>", mk_arrow!(ty::int(), ty::int(), ty::bool())),
        ("<", mk_arrow!(ty::int(), ty::int(), ty::bool())),
        (">", mk_arrow!(ty::int(), ty::int(), ty::bool())),
        ("<=", mk_arrow!(ty::int(), ty::int(), ty::bool())),
        (">=", mk_arrow!(ty::int(), ty::int(), ty::bool())),
        // Boolean connectives.
        ("&&", mk_arrow!(ty::bool(), ty::bool(), ty::bool())),
        ("||", mk_arrow!(ty::bool(), ty::bool(), ty::bool())),
        ("not", mk_arrow!(ty::bool(), ty::bool())),
        // Strings.
        ("^", mk_arrow!(ty::str(), ty::str(), ty::str())),
        // Conversions.
        ("float_of_int", mk_arrow!(ty::int(), ty::float())),
        ("int_of_float", mk_arrow!(ty::float(), ty::int())),
        // Pair projections.
        ("fst", mk_arrow!(mk_ty_tuple!(ty::var("a"), ty::var("b")), ty::var("a"))),
        ("snd", mk_arrow!(mk_ty_tuple!(ty::var("a"), ty::var("b")), ty::var("b"))),
        // Output builtins.
        ("print_int", mk_arrow!(ty::int(), ty::unit())),
        ("print_string", mk_arrow!(ty::str(), ty::unit())),
        ("print_newline", mk_arrow!(ty::unit(), ty::unit())),
    ]
    .into_iter()
    .map(|(name, typ)| (Ident::new(name), typ))
    .collect()
}
