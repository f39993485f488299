//! Abstract syntax of Merl terms.
//!
//! A program is an ordered sequence of top-level let-bindings. Expressions are literals, variable
//! occurrences, tuples, single-parameter functions, applications, conditionals and local
//! let-bindings. Every node carries the position of the corresponding source fragment for error
//! reporting.
//!
//! Since parsing lives in a separate crate, this module also provides the [make] module with
//! helpers and macros to build terms programmatically, which is how tests and embedders construct
//! programs.
use crate::{identifier::LocIdent, position::TermPos};

/// A term together with its position in the source.
#[derive(Debug, PartialEq, Clone)]
pub struct RichTerm {
    pub term: Box<Term>,
    pub pos: TermPos,
}

impl RichTerm {
    /// Create a new value from a term and an optional position.
    pub fn new(t: Term, pos: TermPos) -> Self {
        RichTerm {
            term: Box::new(t),
            pos,
        }
    }

    /// Set the position and return the term updated.
    pub fn with_pos(mut self, pos: TermPos) -> Self {
        self.pos = pos;
        self
    }

    pub fn as_ref(&self) -> &Term {
        &self.term
    }
}

impl From<Term> for RichTerm {
    fn from(t: Term) -> Self {
        RichTerm {
            term: Box::new(t),
            pos: TermPos::None,
        }
    }
}

/// The AST of a Merl expression.
#[derive(Debug, PartialEq, Clone)]
pub enum Term {
    /// An integer literal.
    Int(i64),
    /// A floating-point literal.
    Float(f64),
    /// A string literal.
    Str(String),
    /// A boolean literal.
    Bool(bool),
    /// The unit literal `()`.
    Unit,
    /// A variable occurrence.
    Var(LocIdent),
    /// A tuple of at least two components.
    Tuple(Vec<RichTerm>),
    /// A function literal with a single parameter pattern.
    Fun(Pattern, RichTerm),
    /// An application.
    App(RichTerm, RichTerm),
    /// A conditional expression.
    IfThenElse(RichTerm, RichTerm, RichTerm),
    /// A local let-binding `let [rec] pat = bound in body`.
    Let(LetBinding, RichTerm),
}

/// A let-binding, either local or at the top level of a program.
#[derive(Debug, PartialEq, Clone)]
pub struct LetBinding {
    /// Whether the bound name is in scope in its own definition.
    pub rec: bool,
    /// The left-hand side pattern.
    pub pat: Pattern,
    /// The bound expression.
    pub bound: RichTerm,
}

/// A pattern together with its position.
#[derive(Debug, PartialEq, Clone)]
pub struct Pattern {
    pub data: PatternData,
    pub pos: TermPos,
}

impl Pattern {
    pub fn new(data: PatternData, pos: TermPos) -> Self {
        Pattern { data, pos }
    }

    /// Create a pattern without position.
    pub fn any(data: PatternData) -> Self {
        Pattern {
            data,
            pos: TermPos::None,
        }
    }
}

/// The various kinds of patterns.
#[derive(Debug, PartialEq, Clone)]
pub enum PatternData {
    /// The wildcard pattern `_`, which binds nothing.
    Wildcard,
    /// The unit pattern `()`, which binds nothing.
    Unit,
    /// A pattern binding a name.
    Ident(LocIdent),
    /// A tuple-destructuring pattern. Parsed, but rejected by the typechecker for now.
    Tuple(Vec<Pattern>),
}

/// A full program: an ordered sequence of top-level let-bindings.
#[derive(Debug, PartialEq, Clone, Default)]
pub struct Program {
    pub bindings: Vec<LetBinding>,
}

impl Program {
    pub fn new(bindings: Vec<LetBinding>) -> Self {
        Program { bindings }
    }
}

impl FromIterator<LetBinding> for Program {
    fn from_iter<T: IntoIterator<Item = LetBinding>>(iter: T) -> Self {
        Program {
            bindings: iter.into_iter().collect(),
        }
    }
}

/// Helpers to build [Term] objects as [RichTerm]s from other values.
pub mod make {
    use super::*;

    /// Multi-ary application for types implementing `Into<RichTerm>`.
    #[macro_export]
    macro_rules! mk_app {
        ( $f:expr, $arg:expr ) => {
            $crate::term::RichTerm::from(
                $crate::term::Term::App(
                    $crate::term::RichTerm::from($f),
                    $crate::term::RichTerm::from($arg)
                )
            )
        };
        ( $f:expr, $fst:expr , $( $args:expr ),+ ) => {
            mk_app!(mk_app!($f, $fst), $( $args ),+)
        };
    }

    /// Multi argument function for types implementing `Into<Pattern>` (for the parameters), and
    /// `Into<RichTerm>` for the body.
    #[macro_export]
    macro_rules! mk_fun {
        ( $pat:expr, $body:expr ) => {
            $crate::term::RichTerm::from(
                $crate::term::Term::Fun(
                    $crate::term::Pattern::from($pat),
                    $crate::term::RichTerm::from($body)
                )
            )
        };
        ( $pat1:expr, $pat2:expr , $( $rest:expr ),+ ) => {
            mk_fun!($crate::term::Pattern::from($pat1), mk_fun!($pat2, $( $rest ),+))
        };
    }

    /// Tuple for types implementing `Into<RichTerm>`: `mk_tuple!(t1, t2)` is the pair `(t1, t2)`.
    #[macro_export]
    macro_rules! mk_tuple {
        ( $( $terms:expr ),+ ) => {
            $crate::term::RichTerm::from(
                $crate::term::Term::Tuple(vec![$( $crate::term::RichTerm::from($terms) ),+])
            )
        };
    }

    pub fn var<I>(v: I) -> RichTerm
    where
        I: Into<LocIdent>,
    {
        Term::Var(v.into()).into()
    }

    pub fn int(n: i64) -> RichTerm {
        Term::Int(n).into()
    }

    pub fn float(x: f64) -> RichTerm {
        Term::Float(x).into()
    }

    pub fn string(s: impl Into<String>) -> RichTerm {
        Term::Str(s.into()).into()
    }

    pub fn bool(b: bool) -> RichTerm {
        Term::Bool(b).into()
    }

    pub fn unit() -> RichTerm {
        Term::Unit.into()
    }

    /// A local binding `let id = bound in body`.
    pub fn let_in<I, T1, T2>(id: I, bound: T1, body: T2) -> RichTerm
    where
        I: Into<LocIdent>,
        T1: Into<RichTerm>,
        T2: Into<RichTerm>,
    {
        Term::Let(binding(false, id, bound), body.into()).into()
    }

    /// A local recursive binding `let rec id = bound in body`.
    pub fn let_rec_in<I, T1, T2>(id: I, bound: T1, body: T2) -> RichTerm
    where
        I: Into<LocIdent>,
        T1: Into<RichTerm>,
        T2: Into<RichTerm>,
    {
        Term::Let(binding(true, id, bound), body.into()).into()
    }

    pub fn if_then_else<T1, T2, T3>(cond: T1, t1: T2, t2: T3) -> RichTerm
    where
        T1: Into<RichTerm>,
        T2: Into<RichTerm>,
        T3: Into<RichTerm>,
    {
        Term::IfThenElse(cond.into(), t1.into(), t2.into()).into()
    }

    /// A top-level or local binding of a name.
    pub fn binding<I, T>(rec: bool, id: I, bound: T) -> LetBinding
    where
        I: Into<LocIdent>,
        T: Into<RichTerm>,
    {
        LetBinding {
            rec,
            pat: Pattern::any(PatternData::Ident(id.into())),
            bound: bound.into(),
        }
    }
}

impl<I> From<I> for Pattern
where
    I: Into<LocIdent>,
{
    fn from(id: I) -> Self {
        Pattern::any(PatternData::Ident(id.into()))
    }
}
