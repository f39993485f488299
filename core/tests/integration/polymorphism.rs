use merl_lang_core::term::make;
use merl_lang_core::typ::Type;
use merl_lang_core::{mk_app, mk_fun, mk_tuple};
use pretty_assertions::assert_eq;

use crate::common::{as_var_arrow, check_program};

fn sample_program() -> Vec<merl_lang_core::term::LetBinding> {
    vec![
        make::binding(false, "id", mk_fun!("x", make::var("x"))),
        make::binding(
            false,
            "pair",
            mk_tuple!(
                mk_app!(make::var("id"), make::int(1)),
                mk_app!(make::var("id"), make::bool(true))
            ),
        ),
        make::binding(
            true,
            "fix",
            mk_fun!("f", mk_app!(make::var("fix"), make::var("f"))),
        ),
    ]
}

#[test]
fn runs_are_deterministic() {
    // Two independent runs on the same input: same variable names, same types. Each run owns its
    // whole inference state, so nothing leaks from one to the other.
    let first = check_program(sample_program()).unwrap();
    let second = check_program(sample_program()).unwrap();

    assert_eq!(first.types, second.types);

    let rendered_first: Vec<String> = first.types.values().map(Type::to_string).collect();
    let rendered_second: Vec<String> = second.types.values().map(Type::to_string).collect();
    assert_eq!(rendered_first, rendered_second);
}

#[test]
fn instances_do_not_alias_the_scheme() {
    // `id` is used at `int` and at `bool` in the same binding: if the two instantiations shared
    // a variable cell, the second application could not typecheck.
    let typing = check_program(sample_program()).unwrap();

    let (dom, codom) = as_var_arrow(&typing.types[0]);
    assert_eq!(dom, codom);
    assert_eq!(typing.types[1].to_string(), "int * bool");
}

#[test]
fn declared_schemes_are_instantiated_per_use() {
    // The declared type of `fst` is `a * b -> a`: two uses at different types must not interfere.
    let typing = check_program(vec![
        make::binding(
            false,
            "first_int",
            mk_app!(make::var("fst"), mk_tuple!(make::int(1), make::bool(true))),
        ),
        make::binding(
            false,
            "first_string",
            mk_app!(make::var("fst"), mk_tuple!(make::string("s"), make::unit())),
        ),
    ])
    .unwrap();

    assert_eq!(typing.types[0].to_string(), "int");
    assert_eq!(typing.types[1].to_string(), "string");
}

#[test]
fn monomorphic_parameters_do_not_generalize() {
    // Inside `fun f -> (f 1, f 2)`, `f` is a lambda-bound parameter: both uses must share the
    // same monomorphic type, pinning the second application to `int` as well.
    let typing = check_program(vec![make::binding(
        false,
        "apply_twice",
        mk_fun!(
            "f",
            mk_tuple!(
                mk_app!(make::var("f"), make::int(1)),
                mk_app!(make::var("f"), make::int(2))
            )
        ),
    )])
    .unwrap();

    assert_eq!(typing.types[0].to_string(), "(int -> b) -> b * b");
}

#[test]
fn lambda_bound_parameters_reject_polymorphic_use() {
    use assert_matches::assert_matches;
    use merl_lang_core::error::TypecheckError;

    // Unlike let-bound names, a parameter can't be used at two incompatible types.
    assert_matches!(
        crate::common::infer_expr(mk_fun!(
            "f",
            mk_tuple!(
                mk_app!(make::var("f"), make::int(1)),
                mk_app!(make::var("f"), make::bool(true))
            )
        )),
        Err(TypecheckError::ArrowTypeMismatch { .. })
    );
}
