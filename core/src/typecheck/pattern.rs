//! Typing of patterns.
use crate::error::TypecheckError;
use crate::term::{Pattern, PatternData};

use super::unif::{NodeId, UnifTable};
use super::{Context, Scheme, TypedPattern, TypedPatternData};

impl Pattern {
    /// Bind a function parameter pattern in `ctxt` and return the typed pattern.
    ///
    /// A wildcard or unit pattern produces a fresh placeholder type without binding any name. A
    /// named pattern introduces a fresh type variable under that name. Tuple-destructuring
    /// parameters are rejected.
    pub(super) fn bind_param(
        &self,
        table: &mut UnifTable,
        ctxt: &mut Context,
    ) -> Result<TypedPattern, TypecheckError> {
        let typ = table.fresh_var(ctxt.var_level);
        self.bind_scheme(typ, ctxt)
    }

    /// Bind a pattern to an already inferred (and, for let-bindings, generalized) type in
    /// `ctxt`. Only named patterns extend the environment; tuple-destructuring patterns are
    /// rejected.
    pub(super) fn bind_scheme(
        &self,
        typ: NodeId,
        ctxt: &mut Context,
    ) -> Result<TypedPattern, TypecheckError> {
        let data = match &self.data {
            PatternData::Wildcard => TypedPatternData::Wildcard,
            PatternData::Unit => TypedPatternData::Unit,
            PatternData::Ident(id) => {
                ctxt.type_env.insert(id.ident(), Scheme::Inferred(typ));
                TypedPatternData::Ident(*id)
            }
            PatternData::Tuple(_) => {
                return Err(TypecheckError::UnsupportedPattern { pos: self.pos })
            }
        };

        Ok(TypedPattern {
            data,
            typ,
            pos: self.pos,
        })
    }
}
