//! Extraction of printable [Type]s from the unification graph, for output and error reporting.
use std::collections::HashSet;

use crate::typ::Type;

use super::unif::{NodeId, TypeNode, UnifTable, VarState};

/// Extract a concrete type corresponding to a node of the unification graph.
///
/// Free and generalized variables are rendered with the deterministic cosmetic name recorded at
/// their creation (`a`, .., `z`, `t26`, ..). The traversal is cycle-safe: it never diverges even
/// on a self-referential graph, which can legitimately be printed while reporting an
/// infinite-type error. The recursion point of a cyclic type is cut with the placeholder `_`.
pub fn to_type(table: &UnifTable, id: NodeId) -> Type {
    let mut visiting = HashSet::new();
    to_type_with(table, id, &mut visiting)
}

fn to_type_with(table: &UnifTable, id: NodeId, visiting: &mut HashSet<NodeId>) -> Type {
    let id = table.root(id);

    match table.node(id) {
        TypeNode::Ground(ground) => Type::Ground(*ground),
        TypeNode::Var(VarState::Unbound { name, .. }) => Type::Var(*name),
        // unreachable after root resolution; rendered as its target for good measure
        TypeNode::Var(VarState::Link { target }) => to_type_with(table, *target, visiting),
        TypeNode::Arrow { dom, codom, .. } => {
            if !visiting.insert(id) {
                return Type::Var("_".into());
            }

            let typ = Type::Arrow(
                Box::new(to_type_with(table, *dom, visiting)),
                Box::new(to_type_with(table, *codom, visiting)),
            );
            visiting.remove(&id);
            typ
        }
        TypeNode::Tuple { items, .. } => {
            if !visiting.insert(id) {
                return Type::Var("_".into());
            }

            let typ = Type::Tuple(
                items
                    .iter()
                    .map(|item| to_type_with(table, *item, visiting))
                    .collect(),
            );
            visiting.remove(&id);
            typ
        }
    }
}
