use merl_lang_core::error::TypecheckError;
use merl_lang_core::identifier::Ident;
use merl_lang_core::term::{make, LetBinding, Program, RichTerm};
use merl_lang_core::typ::Type;
use merl_lang_core::typecheck::{self, mk_stdlib_ctxt, ProgramTyping};

/// Typecheck a program made of the given top-level bindings against the standard primitive
/// operators.
pub fn check_program(bindings: Vec<LetBinding>) -> Result<ProgramTyping, TypecheckError> {
    typecheck::type_check(&Program::new(bindings), mk_stdlib_ctxt())
}

/// Typecheck a single expression by binding it at the top level, and return its inferred type.
pub fn infer_expr(rt: RichTerm) -> Result<Type, TypecheckError> {
    let typing = check_program(vec![make::binding(false, "it", rt)])?;

    Ok(typing
        .types
        .get(&Ident::new("it"))
        .expect("the checked binding must appear in the result")
        .clone())
}

/// Assert that a type is an arrow between two type variables, and return both variable names.
#[track_caller]
pub fn as_var_arrow(typ: &Type) -> (Ident, Ident) {
    match typ {
        Type::Arrow(dom, codom) => match (dom.as_ref(), codom.as_ref()) {
            (Type::Var(dom_var), Type::Var(codom_var)) => (*dom_var, *codom_var),
            _ => panic!("expected an arrow between two type variables, got `{typ}`"),
        },
        _ => panic!("expected an arrow type, got `{typ}`"),
    }
}
