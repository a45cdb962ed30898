use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// A pure transformation of the environment.
///
/// Applying an action never mutates its input; it returns a replacement
/// snapshot. The `Ord` bound gives actions both decidable set membership and
/// a canonical iteration order, which keeps every decision loop
/// deterministic without any tie-break randomness.
pub trait Action<Env>: Clone + Ord {
    fn apply(&self, env: &Env) -> Env;
}

/// A set of actions with deterministic iteration order.
///
/// The selection loops maintain pairwise compatibility of the selected set
/// as an invariant; the empty set is the initial and a legal final state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionSet<A: Ord>(BTreeSet<A>);

impl<A: Ord> Default for ActionSet<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Ord> ActionSet<A> {
    pub fn new() -> Self {
        ActionSet(BTreeSet::new())
    }

    /// Copy of this set with `action` inserted. The selection loops use this
    /// to form the trial set for a candidate.
    pub fn with(&self, action: A) -> Self
    where
        A: Clone,
    {
        let mut set = self.clone();
        set.0.insert(action);
        set
    }
}

impl<A: Ord> std::ops::Deref for ActionSet<A> {
    type Target = BTreeSet<A>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<A: Ord> std::ops::DerefMut for ActionSet<A> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl<A: Ord> From<BTreeSet<A>> for ActionSet<A> {
    fn from(set: BTreeSet<A>) -> Self {
        ActionSet(set)
    }
}

impl<A: Ord> FromIterator<A> for ActionSet<A> {
    fn from_iter<I: IntoIterator<Item = A>>(iter: I) -> Self {
        ActionSet(iter.into_iter().collect())
    }
}

impl<'a, A: Ord> IntoIterator for &'a ActionSet<A> {
    type Item = &'a A;
    type IntoIter = std::collections::btree_set::Iter<'a, A>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
