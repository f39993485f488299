//! Types unification.
//!
//! The unification graph is an arena of type nodes addressed by [NodeId]. Type variables are
//! union-find style cells: a variable is either unbound or linked to another node, and unifying a
//! variable amounts to installing a link. Two nodes are the same type variable if and only if they
//! are the same arena slot.
//!
//! Levels are used in order to implement let-polymorphism in a sound way: each unification
//! variable carries the let-nesting depth at which it was introduced, and a binding generalizes
//! exactly the variables that are scoped strictly deeper than the binding itself. To keep
//! variable/composite unification constant-time, the propagation of level lowering inside
//! composite types is delayed: lowered composites are pushed on a pending queue which is drained
//! by [UnifTable::force_level_updates] right before generalization. This is Didier Remy's
//! optimization of level-based generalization, see [Efficient and insightful
//! generalization](http://web.archive.org/web/20230525023637/https://okmij.org/ftp/ML/generalization.html).
use std::cmp::min;
use std::collections::{HashMap, HashSet};
use std::num::NonZeroU16;

use smallvec::SmallVec;

use crate::identifier::Ident;
use crate::typ::{GroundType, Type};

use super::error::UnifError;

/// The index of a type node in the unification table. Node identity is arena identity: comparing
/// two `NodeId`s for equality compares the nodes themselves, not their structure.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct NodeId(usize);

/// Variable levels. Levels are used in order to implement polymorphism in a sound way: we need to
/// associate to each unification variable a level, which depends on when the variable was
/// introduced, and to restrict generalization based on a condition on levels.
#[derive(Clone, Copy, Ord, Eq, PartialEq, PartialOrd, Debug, Hash)]
pub struct VarLevel(NonZeroU16);

impl VarLevel {
    /// Special constant used for level upper bounds to indicate that a type doesn't contain any
    /// unification variable. It's equal to `1` and strictly smaller than [VarLevel::MIN_LEVEL],
    /// so it's strictly smaller than any concrete variable level.
    pub const NO_VAR: Self = VarLevel(NonZeroU16::MIN);
    /// The first available variable level, `2`: the level of the top-level scope.
    // unsafe is required because `unwrap()` is not usable in `const fn` code as of today in stable
    // Rust.
    // unsafe(): we must enforce the invariant that the argument `n` of `new_unchecked(n)` verifies
    // `0 < n`. Indeed `0 < 2`.
    pub const MIN_LEVEL: Self = unsafe { VarLevel(NonZeroU16::new_unchecked(2)) };
    /// The level of universally quantified variables. It is strictly greater than any real
    /// nesting depth. Nodes at this level must never take part in unification directly: they are
    /// first copied by [UnifTable::instantiate].
    pub const GENERALIZED: Self = VarLevel(NonZeroU16::MAX);

    /// Increment the variable level by one. Panic if the maximum nesting depth supported by the
    /// underlying numeric type is reached.
    pub fn incr(&mut self) {
        let new_value = self
            .0
            .checked_add(1)
            .filter(|lvl| *lvl < NonZeroU16::MAX)
            .expect("reached the maximum unification variable level");
        self.0 = new_value;
    }
}

/// Metadata attached to composite (arrow and tuple) nodes, used to delay and group the
/// potentially costly type traversals incurred by variable level updates.
///
/// When unifying a variable with a composite type, the levels of all the free unification
/// variables contained in that type have to be bounded by the variable's level, which naively
/// requires a full traversal of the type. Instead, the new bound is recorded here as a pending
/// update and the node is pushed on the queue drained by [UnifTable::force_level_updates].
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub struct VarLevelsData {
    /// Upper bound on the levels of the free unification variables contained in this type.
    pub upper_bound: VarLevel,
    /// Pending level update, which must satisfy `pending < upper_bound`. `None` means the node is
    /// level-stable.
    pub pending: Option<VarLevel>,
}

impl VarLevelsData {
    /// Create new variable levels data with the given upper bound and no pending level update.
    pub fn new_from_level(upper_bound: VarLevel) -> Self {
        VarLevelsData {
            upper_bound,
            pending: None,
        }
    }

    /// The level currently in force for the node: the scheduled lowered level if there is one, or
    /// the stable upper bound.
    pub fn effective(&self) -> VarLevel {
        self.pending.unwrap_or(self.upper_bound)
    }
}

/// The state of a type variable cell.
#[derive(Clone, PartialEq, Debug)]
pub enum VarState {
    /// A free variable scoped to the let-nesting depth `level`. `name` is a cosmetic display name
    /// attributed deterministically at creation.
    Unbound { name: Ident, level: VarLevel },
    /// A variable that has been unified away and now aliases `target`. Once set, a link is never
    /// reset.
    Link { target: NodeId },
}

/// A node of the unification graph.
#[derive(Clone, PartialEq, Debug)]
pub enum TypeNode {
    /// A type variable cell.
    Var(VarState),
    /// A ground type. Ground types contain no variables and thus carry no level data.
    Ground(GroundType),
    /// A function type.
    Arrow {
        dom: NodeId,
        codom: NodeId,
        levels: VarLevelsData,
    },
    /// A tuple type of fixed arity.
    Tuple {
        items: SmallVec<[NodeId; 4]>,
        levels: VarLevelsData,
    },
}

/// The unification table: an arena of type nodes together with the bookkeeping state of one
/// inference run.
///
/// All the mutable state of inference is owned here: the node arena, the queue of pending level
/// updates, the set of composites currently being unified and the cosmetic name generator.
/// Successive runs each build their own table and are therefore independent and reproducible.
#[derive(Debug)]
pub struct UnifTable {
    nodes: Vec<TypeNode>,
    /// Composite nodes with a scheduled level update whose children haven't been traversed yet.
    pending_updates: Vec<NodeId>,
    /// Composite nodes whose unification is in progress. Reaching one of those from a nested
    /// unification or level update means the type is infinite.
    visiting: HashSet<NodeId>,
    /// Counter backing the deterministic variable name generator (`a`, .., `z`, `t26`, `t27`,
    /// ..).
    var_count: usize,
}

impl UnifTable {
    pub fn new() -> Self {
        UnifTable {
            nodes: Vec::new(),
            pending_updates: Vec::new(),
            visiting: HashSet::new(),
            var_count: 0,
        }
    }

    /// Generate the next cosmetic variable name.
    fn fresh_name(&mut self) -> Ident {
        let next = self.var_count;
        self.var_count += 1;

        if next < 26 {
            // unwrap(): 'a' + next is a valid lowercase letter for next < 26
            Ident::new(String::from(
                std::char::from_u32('a' as u32 + next as u32).unwrap(),
            ))
        } else {
            Ident::new(format!("t{next}"))
        }
    }

    fn push(&mut self, node: TypeNode) -> NodeId {
        let next = NodeId(self.nodes.len());
        self.nodes.push(node);
        next
    }

    /// Create a fresh unbound variable at the given level and allocate a corresponding slot in
    /// the table.
    pub fn fresh_var(&mut self, level: VarLevel) -> NodeId {
        let name = self.fresh_name();
        self.push(TypeNode::Var(VarState::Unbound { name, level }))
    }

    /// Allocate a ground type node.
    pub fn ground(&mut self, ground: GroundType) -> NodeId {
        self.push(TypeNode::Ground(ground))
    }

    /// Allocate an arrow node at the given level.
    pub fn arrow(&mut self, dom: NodeId, codom: NodeId, level: VarLevel) -> NodeId {
        self.push(TypeNode::Arrow {
            dom,
            codom,
            levels: VarLevelsData::new_from_level(level),
        })
    }

    /// Allocate a tuple node at the given level.
    pub fn tuple(&mut self, items: impl IntoIterator<Item = NodeId>, level: VarLevel) -> NodeId {
        self.push(TypeNode::Tuple {
            items: items.into_iter().collect(),
            levels: VarLevelsData::new_from_level(level),
        })
    }

    /// Allocate graph nodes for a declared [Type].
    ///
    /// Each occurrence of the same type variable name maps to the same fresh variable within one
    /// call, and to independent variables across calls: calling `from_type` on `a -> a` twice
    /// gives two non-aliased instances. This is how declared polymorphic types (whose free
    /// variables are implicitly quantified) are instantiated.
    pub fn from_type(&mut self, typ: &Type, level: VarLevel) -> NodeId {
        let mut vars = HashMap::new();
        self.from_type_with(typ, level, &mut vars)
    }

    fn from_type_with(
        &mut self,
        typ: &Type,
        level: VarLevel,
        vars: &mut HashMap<Ident, NodeId>,
    ) -> NodeId {
        match typ {
            Type::Ground(ground) => self.ground(*ground),
            Type::Var(name) => {
                if let Some(&id) = vars.get(name) {
                    id
                } else {
                    let id = self.fresh_var(level);
                    vars.insert(*name, id);
                    id
                }
            }
            Type::Arrow(dom, codom) => {
                let dom = self.from_type_with(dom, level, vars);
                let codom = self.from_type_with(codom, level, vars);
                self.arrow(dom, codom, level)
            }
            Type::Tuple(items) => {
                let mut nodes = SmallVec::<[NodeId; 4]>::with_capacity(items.len());
                for item in items {
                    nodes.push(self.from_type_with(item, level, vars));
                }
                self.tuple(nodes, level)
            }
        }
    }

    /// Access a node of the graph.
    pub fn node(&self, id: NodeId) -> &TypeNode {
        &self.nodes[id.0]
    }

    /// Follow the links in the unification table to find the representative of the equivalence
    /// class of the node `id`.
    ///
    /// This corresponds to the find in union-find. It is idempotent: `root(root(id)) ==
    /// root(id)`.
    // TODO This should be a union-find like algorithm with path compression.
    pub fn root(&self, id: NodeId) -> NodeId {
        match &self.nodes[id.0] {
            TypeNode::Var(VarState::Link { target }) => self.root(*target),
            _ => id,
        }
    }

    fn set_levels(&mut self, id: NodeId, levels: VarLevelsData) {
        match &mut self.nodes[id.0] {
            TypeNode::Arrow { levels: data, .. } | TypeNode::Tuple { levels: data, .. } => {
                *data = levels
            }
            _ => debug_assert!(false, "set_levels called on a non-composite node"),
        }
    }

    /// Bound the levels of the unification variables of `id` by `target`, at least lazily.
    ///
    /// An unbound variable deeper than `target` is lowered on the spot. A composite node is only
    /// marked with a pending update and pushed on the queue drained by
    /// [Self::force_level_updates]; its children are not traversed here. Returns the resolved
    /// root of `id`.
    pub fn update_level(&mut self, target: VarLevel, id: NodeId) -> Result<NodeId, UnifError> {
        let id = self.root(id);

        // Only composites currently being unified are in the visiting set. Reaching one of them
        // again through a level update means the type contains itself.
        if self.visiting.contains(&id) {
            return Err(UnifError::InfiniteType { typ: id });
        }

        let enqueue = match &mut self.nodes[id.0] {
            TypeNode::Var(VarState::Unbound { level, .. }) => {
                if *level == VarLevel::GENERALIZED {
                    return Err(UnifError::GeneralizedTypeUnification { typ: id });
                }

                if *level > target {
                    *level = target;
                }

                false
            }
            TypeNode::Var(VarState::Link { .. }) | TypeNode::Ground(_) => false,
            TypeNode::Arrow { levels, .. } | TypeNode::Tuple { levels, .. } => {
                if levels.upper_bound == VarLevel::GENERALIZED {
                    return Err(UnifError::GeneralizedTypeUnification { typ: id });
                }

                if target < levels.effective() {
                    let was_stable = levels.pending.is_none();
                    levels.pending = Some(target);
                    was_stable
                } else {
                    false
                }
            }
        };

        if enqueue {
            self.pending_updates.push(id);
        }

        Ok(id)
    }

    /// Drain the queue of pending level updates, in preparation for a generalization at level
    /// `current`.
    ///
    /// Updates that can't change which variables sit strictly above `current` are delayed
    /// further; the others are applied by traversing the children of the queued node, bounding
    /// every variable encountered by the scheduled level. This laziness is what makes level-based
    /// generalization sub-quadratic: a level lowering coming from a deep unification is recorded
    /// once at the point of change, and propagated only when a generalization actually needs it.
    pub fn force_level_updates(&mut self, current: VarLevel) -> Result<(), UnifError> {
        let pending = std::mem::take(&mut self.pending_updates);
        let mut delayed = Vec::new();

        for id in pending {
            let levels = match &self.nodes[id.0] {
                TypeNode::Arrow { levels, .. } | TypeNode::Tuple { levels, .. } => *levels,
                // The node was linked away since it was enqueued; drop the entry.
                _ => continue,
            };

            let Some(pending_level) = levels.pending else {
                // Re-stabilized by unification or generalization since it was enqueued.
                continue;
            };

            // The update can be delayed further when it can't change which variables sit
            // strictly above `current`:
            // 1. If `upper_bound <= current`, every variable level inside is already at or below
            //    `current`, and an update only decreases levels.
            // 2. If `pending_level > current`, the update lowers levels that are above `current`
            //    to a value still above `current`.
            if levels.upper_bound <= current || pending_level > current {
                delayed.push(id);
            } else {
                let mut visiting = HashSet::new();
                self.update_with_level(id, pending_level, &mut visiting)?;
            }
        }

        self.pending_updates = delayed;
        Ok(())
    }

    /// Eagerly bound the levels of all the variables reachable from `id` by `level`, discharging
    /// pending updates along the way. This is the traversal that [Self::force_level_updates]
    /// delays for as long as possible.
    fn update_with_level(
        &mut self,
        id: NodeId,
        level: VarLevel,
        visiting: &mut HashSet<NodeId>,
    ) -> Result<(), UnifError> {
        let id = self.root(id);

        match &mut self.nodes[id.0] {
            TypeNode::Var(VarState::Unbound {
                level: var_level, ..
            }) => {
                if *var_level == VarLevel::GENERALIZED {
                    return Err(UnifError::GeneralizedTypeUnification { typ: id });
                }

                if *var_level > level {
                    *var_level = level;
                }

                Ok(())
            }
            TypeNode::Var(VarState::Link { .. }) | TypeNode::Ground(_) => Ok(()),
            TypeNode::Arrow { levels, .. } | TypeNode::Tuple { levels, .. } => {
                if levels.upper_bound == VarLevel::GENERALIZED {
                    return Err(UnifError::GeneralizedTypeUnification { typ: id });
                }

                if levels.upper_bound <= level && levels.pending.is_none() {
                    return Ok(());
                }

                // A node can owe a level both to its own pending update and to the enclosing
                // traversal; the stricter of the two bounds its children.
                let bound = min(levels.effective(), level);

                if !visiting.insert(id) {
                    return Err(UnifError::InfiniteType { typ: id });
                }

                let children: SmallVec<[NodeId; 4]> = match &self.nodes[id.0] {
                    TypeNode::Arrow { dom, codom, .. } => [*dom, *codom].into_iter().collect(),
                    TypeNode::Tuple { items, .. } => items.clone(),
                    // unreachable: the node was matched as a composite just above
                    _ => SmallVec::new(),
                };

                for child in children {
                    self.update_with_level(child, bound, visiting)?;
                }

                self.set_levels(id, VarLevelsData::new_from_level(bound));
                visiting.remove(&id);

                Ok(())
            }
        }
    }

    fn is_generalized_var(&self, id: NodeId) -> bool {
        matches!(
            &self.nodes[id.0],
            TypeNode::Var(VarState::Unbound { level, .. }) if *level == VarLevel::GENERALIZED
        )
    }

    /// Try to unify two types. Unification corresponds to imposing an equality constraint on
    /// those types. This can fail if the types can't be matched.
    pub fn unify(&mut self, t1: NodeId, t2: NodeId) -> Result<(), UnifError> {
        let id1 = self.root(t1);
        let id2 = self.root(t2);

        // The same arena slot is trivially the same type.
        if id1 == id2 {
            return Ok(());
        }

        // Unifying a variable that has already been generalized is an engine bug: polymorphic
        // types must be instantiated before their variables can take part in unification again.
        if self.is_generalized_var(id1) {
            return Err(UnifError::GeneralizedTypeUnification { typ: id1 });
        }
        if self.is_generalized_var(id2) {
            return Err(UnifError::GeneralizedTypeUnification { typ: id2 });
        }

        match (self.nodes[id1.0].clone(), self.nodes[id2.0].clone()) {
            (
                TypeNode::Var(VarState::Unbound { level: l1, .. }),
                TypeNode::Var(VarState::Unbound { level: l2, .. }),
            ) => {
                // Link the deeper variable to the shallower one: the surviving variable lives at
                // the shallowest scope, which maximizes later generalization opportunities.
                let (child, parent) = if l1 > l2 { (id1, id2) } else { (id2, id1) };
                self.nodes[child.0] = TypeNode::Var(VarState::Link { target: parent });
                Ok(())
            }
            (TypeNode::Var(VarState::Unbound { level, .. }), _) => {
                // Bound the concrete side by the variable's level before linking, so that nothing
                // in it outlives the scope the variable belongs to.
                let target = self.update_level(level, id2)?;
                self.nodes[id1.0] = TypeNode::Var(VarState::Link { target });
                Ok(())
            }
            (_, TypeNode::Var(VarState::Unbound { .. })) => self.unify(id2, id1),
            (TypeNode::Ground(g1), TypeNode::Ground(g2)) if g1 == g2 => Ok(()),
            (
                TypeNode::Arrow {
                    dom: dom1,
                    codom: codom1,
                    levels: levels1,
                },
                TypeNode::Arrow {
                    dom: dom2,
                    codom: codom2,
                    levels: levels2,
                },
            ) => {
                if self.visiting.contains(&id1) || self.visiting.contains(&id2) {
                    return Err(UnifError::InfiniteType { typ: id1 });
                }

                let level = min(levels1.effective(), levels2.effective());

                self.visiting.insert(id1);
                self.visiting.insert(id2);
                let result = self.unify_arrow_parts(level, id1, dom1, codom1, id2, dom2, codom2);
                self.visiting.remove(&id1);
                self.visiting.remove(&id2);
                result?;

                // The level assigned here is a provisional upper bound; the authoritative level
                // is re-derived bottom-up by `generalize`.
                self.set_levels(id1, VarLevelsData::new_from_level(level));
                self.set_levels(id2, VarLevelsData::new_from_level(level));
                Ok(())
            }
            (
                TypeNode::Tuple {
                    items: items1,
                    levels: levels1,
                },
                TypeNode::Tuple {
                    items: items2,
                    levels: levels2,
                },
            ) => {
                if items1.len() != items2.len() {
                    return Err(UnifError::TupleArityMismatch {
                        expected: id1,
                        inferred: id2,
                    });
                }

                if self.visiting.contains(&id1) || self.visiting.contains(&id2) {
                    return Err(UnifError::InfiniteType { typ: id1 });
                }

                let level = min(levels1.effective(), levels2.effective());

                self.visiting.insert(id1);
                self.visiting.insert(id2);
                let result = self.unify_tuple_items(level, &items1, &items2);
                self.visiting.remove(&id1);
                self.visiting.remove(&id2);
                result?;

                self.set_levels(id1, VarLevelsData::new_from_level(level));
                self.set_levels(id2, VarLevelsData::new_from_level(level));
                Ok(())
            }
            (_, _) => Err(UnifError::TypeMismatch {
                expected: id1,
                inferred: id2,
            }),
        }
    }

    /// Bound a pair of children by the level of the unification in progress, then unify them.
    ///
    /// The bounding makes the level stamped on the enclosing composites a genuine upper bound:
    /// variables directly below are lowered on the spot, and nested composites inherit the debt
    /// as their own pending update.
    fn unify_child_pair(
        &mut self,
        level: VarLevel,
        t1: NodeId,
        t2: NodeId,
    ) -> Result<(), UnifError> {
        self.update_level(level, t1)?;
        self.update_level(level, t2)?;
        self.unify(t1, t2)
    }

    #[allow(clippy::too_many_arguments)]
    fn unify_arrow_parts(
        &mut self,
        level: VarLevel,
        id1: NodeId,
        dom1: NodeId,
        codom1: NodeId,
        id2: NodeId,
        dom2: NodeId,
        codom2: NodeId,
    ) -> Result<(), UnifError> {
        self.unify_child_pair(level, dom1, dom2)
            .map_err(|cause| UnifError::DomainMismatch {
                expected: id1,
                inferred: id2,
                cause: Box::new(cause),
            })?;
        self.unify_child_pair(level, codom1, codom2)
            .map_err(|cause| UnifError::CodomainMismatch {
                expected: id1,
                inferred: id2,
                cause: Box::new(cause),
            })
    }

    fn unify_tuple_items(
        &mut self,
        level: VarLevel,
        items1: &[NodeId],
        items2: &[NodeId],
    ) -> Result<(), UnifError> {
        for (item1, item2) in items1.iter().zip(items2.iter()) {
            self.unify_child_pair(level, *item1, *item2)?;
        }

        Ok(())
    }

    /// Generalize the type `id` at the close of the scope of the binding at level `current`:
    /// promote every unbound variable scoped strictly deeper than `current` to
    /// [VarLevel::GENERALIZED].
    ///
    /// [Self::force_level_updates] must have been run at `current` first, so that the levels
    /// taken into account reflect all the unifications performed in the closed scope. Composite
    /// nodes deeper than `current` get their authoritative level re-derived bottom-up from their
    /// generalized children. Nodes at or below `current` are left untouched and stay shared with
    /// the outer scope.
    pub fn generalize(&mut self, current: VarLevel, id: NodeId) -> Result<(), UnifError> {
        let mut visiting = HashSet::new();
        self.generalize_node(current, id, &mut visiting).map(|_| ())
    }

    fn generalize_node(
        &mut self,
        current: VarLevel,
        id: NodeId,
        visiting: &mut HashSet<NodeId>,
    ) -> Result<VarLevel, UnifError> {
        let id = self.root(id);

        match &mut self.nodes[id.0] {
            TypeNode::Ground(_) => Ok(VarLevel::NO_VAR),
            TypeNode::Var(VarState::Unbound { level, .. }) => {
                if *level > current {
                    *level = VarLevel::GENERALIZED;
                }

                Ok(*level)
            }
            // unreachable thanks to the root resolution above, but there is no harm in treating a
            // link transparently
            TypeNode::Var(VarState::Link { target }) => {
                let target = *target;
                self.generalize_node(current, target, visiting)
            }
            TypeNode::Arrow { levels, .. } | TypeNode::Tuple { levels, .. } => {
                if levels.effective() <= current {
                    return Ok(levels.effective());
                }

                if !visiting.insert(id) {
                    return Err(UnifError::InfiniteType { typ: id });
                }

                let children: SmallVec<[NodeId; 4]> = match &self.nodes[id.0] {
                    TypeNode::Arrow { dom, codom, .. } => [*dom, *codom].into_iter().collect(),
                    TypeNode::Tuple { items, .. } => items.clone(),
                    // unreachable: the node was matched as a composite just above
                    _ => SmallVec::new(),
                };

                let mut level = VarLevel::NO_VAR;
                for child in children {
                    level = std::cmp::max(level, self.generalize_node(current, child, visiting)?);
                }

                self.set_levels(id, VarLevelsData::new_from_level(level));
                visiting.remove(&id);

                Ok(level)
            }
        }
    }

    /// Produce a fresh instance of the generalized type `id` for one use site.
    ///
    /// Exactly the subgraph reachable through [VarLevel::GENERALIZED] nodes is deep-copied, with
    /// one fresh variable at `level` per distinct generic variable. The copy is memoized by node
    /// identity within one call, so shared structure such as `a -> a` stays shared in the
    /// instance. Non-generic subtrees are returned as-is: they are shared between the scheme and
    /// all its instances, and no mutation of an instance is observable through them.
    pub fn instantiate(&mut self, level: VarLevel, id: NodeId) -> NodeId {
        let mut copies = HashMap::new();
        self.instantiate_node(level, id, &mut copies)
    }

    fn instantiate_node(
        &mut self,
        level: VarLevel,
        id: NodeId,
        copies: &mut HashMap<NodeId, NodeId>,
    ) -> NodeId {
        let id = self.root(id);

        if let Some(&copy) = copies.get(&id) {
            return copy;
        }

        let copy = match self.nodes[id.0].clone() {
            TypeNode::Var(VarState::Unbound {
                level: var_level, ..
            }) if var_level == VarLevel::GENERALIZED => self.fresh_var(level),
            TypeNode::Arrow { dom, codom, levels }
                if levels.upper_bound == VarLevel::GENERALIZED =>
            {
                let dom = self.instantiate_node(level, dom, copies);
                let codom = self.instantiate_node(level, codom, copies);
                self.arrow(dom, codom, level)
            }
            TypeNode::Tuple { items, levels } if levels.upper_bound == VarLevel::GENERALIZED => {
                let mut copied = SmallVec::<[NodeId; 4]>::with_capacity(items.len());
                for item in items {
                    copied.push(self.instantiate_node(level, item, copies));
                }
                self.tuple(copied, level)
            }
            // Anything not generalized is monomorphic and shared by reference.
            _ => id,
        };

        copies.insert(id, copy);
        copy
    }

    /// Check that the type `id` is finite, i.e. doesn't contain itself. Run after each
    /// generalization to certify its result.
    pub fn occurs_check(&self, id: NodeId) -> Result<(), UnifError> {
        let mut visiting = HashSet::new();
        self.cyc_free(id, &mut visiting)
    }

    fn cyc_free(&self, id: NodeId, visiting: &mut HashSet<NodeId>) -> Result<(), UnifError> {
        let id = self.root(id);

        let children: SmallVec<[NodeId; 4]> = match &self.nodes[id.0] {
            TypeNode::Var(_) | TypeNode::Ground(_) => return Ok(()),
            TypeNode::Arrow { dom, codom, .. } => [*dom, *codom].into_iter().collect(),
            TypeNode::Tuple { items, .. } => items.clone(),
        };

        if !visiting.insert(id) {
            return Err(UnifError::InfiniteType { typ: id });
        }

        for child in children {
            self.cyc_free(child, visiting)?;
        }

        visiting.remove(&id);
        Ok(())
    }
}

impl Default for UnifTable {
    fn default() -> Self {
        UnifTable::new()
    }
}
