//! Typechecking and type inference.
//!
//! Merl uses standard Hindley-Milner type inference with let-polymorphism: the type of every
//! binding is inferred without annotations, and a let-bound name gets a polymorphic type
//! whenever its definition doesn't constrain it to the enclosing scope.
//!
//! # Levels
//!
//! Generalization is decided with variable levels rather than by recomputing free variables at
//! every binding. Each unification variable records the let-nesting depth at which it was
//! introduced. Inferring the right-hand side of a binding happens at `var_level + 1`; once it is
//! done, every variable still scoped strictly deeper than the binding cannot appear anywhere
//! else, and is promoted to a universally quantified variable. Variables that were unified with
//! something from an outer scope have been lowered to that scope's level along the way and stay
//! monomorphic. The level bookkeeping lives in [unif], together with the lazy propagation queue
//! that keeps variable/composite unification constant-time.
//!
//! # Drivers
//!
//! [`infer`] is a structural recursion over the AST producing a typed mirror of it. The scoped
//! data (typing environment and current level) is carried by a [Context], cloned at each
//! recursive call: entering a scope is a clone, leaving it is dropping the clone. The mutable
//! state of the run (the unification graph and its queues) is owned by a [unif::UnifTable],
//! created per run by [`type_check`], which folds binding inference over the program and threads
//! the context from one top-level binding to the next.
use crate::{
    environment::Environment as GenericEnvironment,
    error::TypecheckError,
    identifier::{Ident, LocIdent},
    position::TermPos,
    term::{LetBinding, PatternData, Program, RichTerm, Term},
    typ::{GroundType, Type},
};

use indexmap::IndexMap;

pub mod error;
mod pattern;
pub mod reporting;
pub mod unif;

use unif::{NodeId, UnifTable, VarLevel};

/// The typing environment.
pub type Environment = GenericEnvironment<Ident, Scheme>;

/// A type scheme bound in the typing environment.
#[derive(Clone, PartialEq, Debug)]
pub enum Scheme {
    /// A type declared by the caller in the initial environment, such as the type of a primitive
    /// operator. Its free variables are implicitly quantified: every lookup allocates a fresh
    /// copy in the unification graph.
    Declared(Type),
    /// A type inferred by the current run, possibly generalized. Lookups instantiate its
    /// generalized part.
    Inferred(NodeId),
}

/// The typing context is a structure holding the scoped, environment-like data required to
/// perform typechecking.
#[derive(Debug, PartialEq, Clone)]
pub struct Context {
    /// The typing environment.
    pub type_env: Environment,
    /// The current variable level, incremented each time we enter the right-hand side of a
    /// let-binding and thus introduce a new block of variables.
    pub var_level: VarLevel,
}

impl Context {
    pub fn new() -> Self {
        Context {
            type_env: Environment::new(),
            var_level: VarLevel::MIN_LEVEL,
        }
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

/// Populate the initial typing context from declared bindings, typically
/// [crate::stdlib::bindings].
pub fn mk_initial_ctxt(bindings: impl IntoIterator<Item = (Ident, Type)>) -> Context {
    Context {
        type_env: bindings
            .into_iter()
            .map(|(id, typ)| (id, Scheme::Declared(typ)))
            .collect(),
        var_level: VarLevel::MIN_LEVEL,
    }
}

/// The typing context of the standard primitive operators.
pub fn mk_stdlib_ctxt() -> Context {
    mk_initial_ctxt(crate::stdlib::bindings())
}

/// A typed term: the same shape as the [RichTerm] it was built from, with every node additionally
/// carrying the node of its inferred type. Node ids are interpreted by the [unif::UnifTable]
/// returned alongside the typed program.
#[derive(Clone, PartialEq, Debug)]
pub struct TypedTerm {
    pub term: Box<TypedTermData>,
    pub typ: NodeId,
    pub pos: TermPos,
}

/// The AST of a typed Merl expression. Mirrors [Term] one-for-one.
#[derive(Clone, PartialEq, Debug)]
pub enum TypedTermData {
    Int(i64),
    Float(f64),
    Str(String),
    Bool(bool),
    Unit,
    Var(LocIdent),
    Tuple(Vec<TypedTerm>),
    Fun(TypedPattern, TypedTerm),
    App(TypedTerm, TypedTerm),
    IfThenElse(TypedTerm, TypedTerm, TypedTerm),
    Let(TypedLetBinding, TypedTerm),
}

/// A typed pattern. Tuple patterns never make it here: they are rejected during inference.
#[derive(Clone, PartialEq, Debug)]
pub struct TypedPattern {
    pub data: TypedPatternData,
    pub typ: NodeId,
    pub pos: TermPos,
}

#[derive(Clone, PartialEq, Debug)]
pub enum TypedPatternData {
    Wildcard,
    Unit,
    Ident(LocIdent),
}

/// A typed let-binding. `typ` is the type the left-hand side was bound to: the generalized type
/// of the bound expression.
#[derive(Clone, PartialEq, Debug)]
pub struct TypedLetBinding {
    pub rec: bool,
    pub pat: TypedPattern,
    pub bound: TypedTerm,
    pub typ: NodeId,
}

/// A typed program.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct TypedProgram {
    pub bindings: Vec<TypedLetBinding>,
}

/// The outcome of a successful inference run.
#[derive(Debug)]
pub struct ProgramTyping {
    /// The typed program, structurally isomorphic to the input.
    pub typed: TypedProgram,
    /// The reported types of the named top-level bindings, in declaration order.
    pub types: IndexMap<Ident, Type>,
    /// The unification table of the run, required to interpret the node ids carried by the typed
    /// program.
    pub table: UnifTable,
}

/// Typecheck a program.
///
/// A fresh [unif::UnifTable] is created for the run: the variable name generator, the level
/// bookkeeping and the pending update queue are all owned by it, so successive runs are
/// independent and reproducible. Binding inference is folded left to right over the top-level
/// bindings, threading the context; the first error aborts the whole run and no partial result
/// is produced.
pub fn type_check(
    prog: &Program,
    initial_ctxt: Context,
) -> Result<ProgramTyping, TypecheckError> {
    let mut table = UnifTable::new();
    let mut ctxt = initial_ctxt;
    let mut bindings = Vec::with_capacity(prog.bindings.len());

    for binding in &prog.bindings {
        let (typed, new_ctxt) = infer_binding(&mut table, ctxt, binding)?;
        bindings.push(typed);
        ctxt = new_ctxt;
    }

    let mut types = IndexMap::new();
    for typed in &bindings {
        if let TypedPatternData::Ident(id) = &typed.pat.data {
            types.insert(id.ident(), reporting::to_type(&table, typed.typ));
        }
    }

    Ok(ProgramTyping {
        typed: TypedProgram { bindings },
        types,
        table,
    })
}

/// Infer the type of one let-binding, local or top-level, and bind its pattern in the outer
/// context.
///
/// The right-hand side is inferred one level deeper than the binding. For a recursive binding,
/// the bound name is pre-bound to a fresh variable first, and the inferred type is unified with
/// it afterwards. Once back at the outer level, pending level updates are settled, the inferred
/// type is generalized and the occurs check certifies it is finite.
fn infer_binding(
    table: &mut UnifTable,
    outer: Context,
    binding: &LetBinding,
) -> Result<(TypedLetBinding, Context), TypecheckError> {
    let outer_level = outer.var_level;

    // Entering the scope of the right-hand side: the inner context gets its own level, and
    // dropping it at the end of this function is the scope exit.
    let mut inner = outer.clone();
    inner.var_level.incr();

    // The pre-binding variable of a recursive binding lives at the inner level: created at the
    // outer level, it would drag the whole right-hand side down with it and the binding could
    // never generalize.
    let rec_var = match (&binding.pat.data, binding.rec) {
        (PatternData::Ident(id), true) => {
            let var = table.fresh_var(inner.var_level);
            inner.type_env.insert(id.ident(), Scheme::Inferred(var));
            Some(var)
        }
        _ => None,
    };

    let typed_bound = infer(table, inner, &binding.bound)?;

    if let Some(var) = rec_var {
        table
            .unify(typed_bound.typ, var)
            .map_err(|err| err.into_typecheck_err(table, binding.bound.pos))?;
    }

    // Back at the outer level: settle the level updates owed by the unifications of the closed
    // scope, promote what stayed strictly deeper than it, and certify the result.
    table
        .force_level_updates(outer_level)
        .map_err(|err| err.into_typecheck_err(table, binding.bound.pos))?;
    table
        .generalize(outer_level, typed_bound.typ)
        .map_err(|err| err.into_typecheck_err(table, binding.bound.pos))?;
    table
        .occurs_check(typed_bound.typ)
        .map_err(|err| err.into_typecheck_err(table, binding.bound.pos))?;

    let mut ctxt = outer;
    let typ = typed_bound.typ;
    let pat = binding.pat.bind_scheme(typ, &mut ctxt)?;

    Ok((
        TypedLetBinding {
            rec: binding.rec,
            pat,
            bound: typed_bound,
            typ,
        },
        ctxt,
    ))
}

/// Infer the type of an expression, producing its typed mirror.
fn infer(
    table: &mut UnifTable,
    mut ctxt: Context,
    rt: &RichTerm,
) -> Result<TypedTerm, TypecheckError> {
    let pos = rt.pos;
    let level = ctxt.var_level;

    let (term, typ) = match rt.as_ref() {
        Term::Int(n) => (TypedTermData::Int(*n), table.ground(GroundType::Int)),
        Term::Float(x) => (TypedTermData::Float(*x), table.ground(GroundType::Float)),
        Term::Str(s) => (
            TypedTermData::Str(s.clone()),
            table.ground(GroundType::String),
        ),
        Term::Bool(b) => (TypedTermData::Bool(*b), table.ground(GroundType::Bool)),
        Term::Unit => (TypedTermData::Unit, table.ground(GroundType::Unit)),
        Term::Var(x) => {
            let typ = match ctxt.type_env.get(&x.ident()) {
                Some(Scheme::Declared(declared)) => table.from_type(declared, level),
                Some(Scheme::Inferred(node)) => table.instantiate(level, *node),
                None => return Err(TypecheckError::UnboundIdentifier { id: *x, pos }),
            };

            (TypedTermData::Var(*x), typ)
        }
        Term::Tuple(items) => {
            let mut typed_items = Vec::with_capacity(items.len());
            for item in items {
                typed_items.push(infer(table, ctxt.clone(), item)?);
            }

            let typ = table.tuple(typed_items.iter().map(|item| item.typ), level);
            (TypedTermData::Tuple(typed_items), typ)
        }
        Term::Fun(pat, body) => {
            let typed_pat = pat.bind_param(table, &mut ctxt)?;
            let typed_body = infer(table, ctxt, body)?;
            let typ = table.arrow(typed_pat.typ, typed_body.typ, level);
            (TypedTermData::Fun(typed_pat, typed_body), typ)
        }
        Term::App(f, arg) => {
            let typed_f = infer(table, ctxt.clone(), f)?;
            let typed_arg = infer(table, ctxt, arg)?;

            // The type of the application is a fresh variable, refined by unifying the callee's
            // type against an arrow into it.
            let result = table.fresh_var(level);
            let expected = table.arrow(typed_arg.typ, result, level);
            table
                .unify(typed_f.typ, expected)
                .map_err(|err| err.into_typecheck_err(table, pos))?;

            (TypedTermData::App(typed_f, typed_arg), result)
        }
        Term::IfThenElse(cond, then_branch, else_branch) => {
            let typed_cond = infer(table, ctxt.clone(), cond)?;
            let bool_type = table.ground(GroundType::Bool);
            table
                .unify(typed_cond.typ, bool_type)
                .map_err(|err| err.into_typecheck_err(table, cond.pos.or(pos)))?;

            let typed_then = infer(table, ctxt.clone(), then_branch)?;
            let typed_else = infer(table, ctxt, else_branch)?;
            table
                .unify(typed_then.typ, typed_else.typ)
                .map_err(|err| err.into_typecheck_err(table, pos))?;

            let typ = typed_then.typ;
            (
                TypedTermData::IfThenElse(typed_cond, typed_then, typed_else),
                typ,
            )
        }
        Term::Let(binding, body) => {
            let (typed_binding, new_ctxt) = infer_binding(table, ctxt, binding)?;
            let typed_body = infer(table, new_ctxt, body)?;
            let typ = typed_body.typ;
            (TypedTermData::Let(typed_binding, typed_body), typ)
        }
    };

    Ok(TypedTerm {
        term: Box::new(term),
        typ,
        pos,
    })
}
