use merl_lang_core::term::{make, Pattern, PatternData};
use merl_lang_core::{mk_app, mk_fun, mk_tuple};
use pretty_assertions::assert_eq;

use crate::common::{as_var_arrow, check_program, infer_expr};

#[test]
fn literals() {
    assert_eq!(infer_expr(make::int(1)).unwrap().to_string(), "int");
    assert_eq!(infer_expr(make::float(1.5)).unwrap().to_string(), "float");
    assert_eq!(infer_expr(make::string("hi")).unwrap().to_string(), "string");
    assert_eq!(infer_expr(make::bool(true)).unwrap().to_string(), "bool");
    assert_eq!(infer_expr(make::unit()).unwrap().to_string(), "unit");
}

#[test]
fn identity_function() {
    assert_eq!(
        infer_expr(mk_fun!("x", make::var("x"))).unwrap().to_string(),
        "a -> a"
    );
}

#[test]
fn wildcard_and_unit_parameters() {
    assert_eq!(
        infer_expr(mk_fun!(Pattern::any(PatternData::Wildcard), make::int(1)))
            .unwrap()
            .to_string(),
        "a -> int"
    );
    assert_eq!(
        infer_expr(mk_fun!(Pattern::any(PatternData::Unit), make::int(1)))
            .unwrap()
            .to_string(),
        "a -> int"
    );
}

#[test]
fn primitive_applications() {
    assert_eq!(
        infer_expr(mk_app!(make::var("+"), make::int(1), make::int(2)))
            .unwrap()
            .to_string(),
        "int"
    );
    assert_eq!(
        infer_expr(mk_app!(make::var("+."), make::float(1.0), make::float(2.0)))
            .unwrap()
            .to_string(),
        "float"
    );
    assert_eq!(
        infer_expr(mk_app!(make::var("^"), make::string("a"), make::string("b")))
            .unwrap()
            .to_string(),
        "string"
    );
    assert_eq!(
        infer_expr(mk_app!(make::var("="), make::int(1), make::int(2)))
            .unwrap()
            .to_string(),
        "bool"
    );
    // Partial application.
    assert_eq!(
        infer_expr(mk_app!(make::var("+"), make::int(1)))
            .unwrap()
            .to_string(),
        "int -> int"
    );
}

#[test]
fn tuples() {
    assert_eq!(
        infer_expr(mk_tuple!(make::int(1), make::bool(true)))
            .unwrap()
            .to_string(),
        "int * bool"
    );
    assert_eq!(
        infer_expr(mk_tuple!(make::int(1), make::bool(true), make::string("x")))
            .unwrap()
            .to_string(),
        "int * bool * string"
    );
}

#[test]
fn polymorphic_projections() {
    assert_eq!(
        infer_expr(mk_app!(make::var("fst"), mk_tuple!(make::int(1), make::bool(true))))
            .unwrap()
            .to_string(),
        "int"
    );
    assert_eq!(
        infer_expr(mk_app!(make::var("snd"), mk_tuple!(make::int(1), make::bool(true))))
            .unwrap()
            .to_string(),
        "bool"
    );
}

#[test]
fn conditionals() {
    assert_eq!(
        infer_expr(make::if_then_else(make::bool(true), make::int(1), make::int(2)))
            .unwrap()
            .to_string(),
        "int"
    );

    // The condition may be an arbitrary boolean expression.
    assert_eq!(
        infer_expr(make::if_then_else(
            mk_app!(make::var("<"), make::int(1), make::int(2)),
            make::string("lt"),
            make::string("ge"),
        ))
        .unwrap()
        .to_string(),
        "string"
    );
}

#[test]
fn let_polymorphism() {
    // `let id = fun x -> x in (id 1, id true)`: the two use sites instantiate `id`
    // independently.
    let typ = infer_expr(make::let_in(
        "id",
        mk_fun!("x", make::var("x")),
        mk_tuple!(
            mk_app!(make::var("id"), make::int(1)),
            mk_app!(make::var("id"), make::bool(true))
        ),
    ))
    .unwrap();

    assert_eq!(typ.to_string(), "int * bool");
}

#[test]
fn unapplied_binding_stays_polymorphic() {
    // `let f = fun x -> x in f`: never applied, the result must still be an arrow between
    // unresolved variables, not a concrete type.
    let typ = infer_expr(make::let_in(
        "f",
        mk_fun!("x", make::var("x")),
        make::var("f"),
    ))
    .unwrap();

    let (dom, codom) = as_var_arrow(&typ);
    assert_eq!(dom, codom);
}

#[test]
fn no_variable_escapes_inner_scope() {
    // `let f = fun x -> (let g = x in g) in f`: the inner binding `g` aliases the parameter of
    // the enclosing function, which must not pin `f` to an inner-scope type.
    let typ = infer_expr(make::let_in(
        "f",
        mk_fun!("x", make::let_in("g", make::var("x"), make::var("g"))),
        make::var("f"),
    ))
    .unwrap();

    let (dom, codom) = as_var_arrow(&typ);
    assert_eq!(dom, codom);
}

#[test]
fn recursive_binding() {
    // `let rec loop = fun x -> loop x`: self-reference through the pre-bound variable; both the
    // parameter and the result stay free and generalize separately.
    let typing = check_program(vec![make::binding(
        true,
        "loop",
        mk_fun!("x", mk_app!(make::var("loop"), make::var("x"))),
    )])
    .unwrap();

    let typ = &typing.types[0];
    let (dom, codom) = as_var_arrow(typ);
    assert_ne!(dom, codom);
}

#[test]
fn recursive_factorial() {
    // let rec fact = fun n -> if n = 0 then 1 else n * fact (n - 1)
    let fact = mk_fun!(
        "n",
        make::if_then_else(
            mk_app!(make::var("="), make::var("n"), make::int(0)),
            make::int(1),
            mk_app!(
                make::var("*"),
                make::var("n"),
                mk_app!(
                    make::var("fact"),
                    mk_app!(make::var("-"), make::var("n"), make::int(1))
                )
            ),
        )
    );

    let typing = check_program(vec![make::binding(true, "fact", fact)]).unwrap();
    assert_eq!(typing.types[0].to_string(), "int -> int");
}

#[test]
fn top_level_bindings_thread_the_environment() {
    let typing = check_program(vec![
        make::binding(false, "id", mk_fun!("x", make::var("x"))),
        make::binding(false, "n", mk_app!(make::var("id"), make::int(5))),
        make::binding(false, "b", mk_app!(make::var("id"), make::bool(true))),
    ])
    .unwrap();

    let (dom, codom) = as_var_arrow(&typing.types[0]);
    assert_eq!(dom, codom);
    assert_eq!(typing.types[1].to_string(), "int");
    assert_eq!(typing.types[2].to_string(), "bool");
}

#[test]
fn later_bindings_shadow_earlier_ones() {
    let typing = check_program(vec![
        make::binding(false, "x", make::int(1)),
        make::binding(false, "x", make::bool(true)),
    ])
    .unwrap();

    assert_eq!(
        typing
            .types
            .get(&merl_lang_core::identifier::Ident::new("x"))
            .unwrap()
            .to_string(),
        "bool"
    );
}

#[test]
fn wildcard_top_level_binding_checks_but_binds_nothing() {
    let typing = check_program(vec![merl_lang_core::term::LetBinding {
        rec: false,
        pat: Pattern::any(PatternData::Wildcard),
        bound: mk_app!(make::var("print_int"), make::int(1)),
    }])
    .unwrap();

    assert!(typing.types.is_empty());
    assert_eq!(typing.typed.bindings.len(), 1);
}

#[test]
fn typed_ast_mirrors_the_input() {
    let typing = check_program(vec![make::binding(
        false,
        "it",
        mk_app!(make::var("+"), make::int(1), make::int(2)),
    )])
    .unwrap();

    use merl_lang_core::typecheck::TypedTermData;

    let bound = &typing.typed.bindings[0].bound;
    let TypedTermData::App(f, arg) = bound.term.as_ref() else {
        panic!("expected a typed application");
    };
    assert!(matches!(arg.term.as_ref(), TypedTermData::Int(2)));
    assert!(matches!(f.term.as_ref(), TypedTermData::App(..)));
}

#[test]
fn nested_lets_in_a_binding_body() {
    // let a = 1 in let b = a + 1 in (a, b)
    let expr = make::let_in(
        "a",
        make::int(1),
        make::let_in(
            "b",
            mk_app!(make::var("+"), make::var("a"), make::int(1)),
            mk_tuple!(make::var("a"), make::var("b")),
        ),
    );

    assert_eq!(infer_expr(expr).unwrap().to_string(), "int * int");
}

#[test]
fn higher_order_inference() {
    // fun f -> f 1: the parameter is refined to an arrow from int.
    let typ = infer_expr(mk_fun!("f", mk_app!(make::var("f"), make::int(1)))).unwrap();
    assert_eq!(typ.to_string(), "(int -> b) -> b");
}
