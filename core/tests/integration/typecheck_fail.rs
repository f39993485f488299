use assert_matches::assert_matches;
use merl_lang_core::error::TypecheckError;
use merl_lang_core::term::{make, LetBinding, Pattern, PatternData};
use merl_lang_core::{mk_app, mk_fun, mk_tuple};

use crate::common::{check_program, infer_expr};

#[test]
fn unbound_identifier() {
    assert_matches!(
        infer_expr(make::var("nope")),
        Err(TypecheckError::UnboundIdentifier { .. })
    );
}

#[test]
fn condition_must_be_boolean() {
    assert_matches!(
        infer_expr(make::if_then_else(make::int(1), make::int(1), make::int(2))),
        Err(TypecheckError::TypeMismatch { .. })
    );
}

#[test]
fn branches_must_agree() {
    assert_matches!(
        infer_expr(make::if_then_else(
            make::bool(true),
            make::int(1),
            make::bool(true)
        )),
        Err(TypecheckError::TypeMismatch { .. })
    );
}

#[test]
fn applying_a_non_function() {
    assert_matches!(
        infer_expr(mk_app!(make::int(1), make::int(2))),
        Err(TypecheckError::TypeMismatch { .. })
    );
}

#[test]
fn wrong_argument_type() {
    // `+` expects integers: the unification of the two arrows fails on their domains and the
    // error names the arrow shapes.
    assert_matches!(
        infer_expr(mk_app!(make::var("+"), make::bool(true))),
        Err(TypecheckError::ArrowTypeMismatch { cause, .. }) => {
            assert_matches!(*cause, TypecheckError::TypeMismatch { .. })
        }
    );
}

#[test]
fn mixed_numeric_operators() {
    // Integer and float arithmetic are distinct, as in ML.
    assert_matches!(
        infer_expr(mk_app!(make::var("+"), make::float(1.0))),
        Err(TypecheckError::ArrowTypeMismatch { .. })
    );
}

#[test]
fn tuple_arity_mismatch() {
    assert_matches!(
        infer_expr(make::if_then_else(
            make::bool(true),
            mk_tuple!(make::int(1), make::int(2)),
            mk_tuple!(make::int(1), make::int(2), make::int(3)),
        )),
        Err(TypecheckError::TupleArityMismatch { .. })
    );
}

#[test]
fn occurs_check_rejects_self_application() {
    assert_matches!(
        infer_expr(mk_fun!("x", mk_app!(make::var("x"), make::var("x")))),
        Err(TypecheckError::InfiniteType { .. })
    );
}

#[test]
fn tuple_parameter_patterns_are_unsupported() {
    let pat = Pattern::any(PatternData::Tuple(vec![
        Pattern::from("a"),
        Pattern::from("b"),
    ]));

    assert_matches!(
        infer_expr(mk_fun!(pat, make::var("a"))),
        Err(TypecheckError::UnsupportedPattern { .. })
    );
}

#[test]
fn tuple_binding_patterns_are_unsupported() {
    let binding = LetBinding {
        rec: false,
        pat: Pattern::any(PatternData::Tuple(vec![
            Pattern::from("a"),
            Pattern::from("b"),
        ])),
        bound: mk_tuple!(make::int(1), make::int(2)),
    };

    assert_matches!(
        check_program(vec![binding]),
        Err(TypecheckError::UnsupportedPattern { .. })
    );
}

#[test]
fn first_error_aborts_the_run() {
    // The failing first binding aborts the whole program: the valid second binding produces no
    // partial result.
    let result = check_program(vec![
        make::binding(false, "bad", make::var("nope")),
        make::binding(false, "good", make::int(1)),
    ]);

    assert_matches!(result, Err(TypecheckError::UnboundIdentifier { .. }));
}

#[test]
fn error_in_nested_let() {
    assert_matches!(
        infer_expr(make::let_in(
            "x",
            make::int(1),
            mk_app!(make::var("&&"), make::var("x"), make::bool(true)),
        )),
        Err(TypecheckError::ArrowTypeMismatch { .. })
    );
}
