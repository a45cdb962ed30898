use crate::action::{Action, ActionSet};

/// The contract of a cooperative agent.
///
/// An agent is purely functional. All mutable state lives in the
/// environment, so an agent is a decision function that selects the next
/// actions to apply. The provided [`decide`](Agent::decide) implements the
/// selection algorithm: grow a conflict-free action set greedily, keeping
/// the lexicographically smallest vector of predicted neighbor
/// criticalities.
///
/// Implementors supply the four domain operations:
///
/// - [`predicted_neighbors`](Agent::predicted_neighbors), the neighborhood
///   the agent would have if a set of actions were applied
/// - [`possible_actions`](Agent::possible_actions), the actions the agent
///   may legitimately propose right now
/// - [`contradictory_actions`](Agent::contradictory_actions), the actions
///   that cannot coexist with an already selected set
/// - [`predicted_criticality`](Agent::predicted_criticality), the estimated
///   criticality of an agent once a set of actions is applied
///
/// Everything else has a default implementation.
pub trait Agent: Sized {
    /// Immutable snapshot of system state. Cloned only to seed a fold of
    /// action applications; actions replace it rather than mutate it.
    type Env: Clone;
    type Action: Action<Self::Env>;
    /// Totally ordered criticality, smaller is better. [`Crit`](crate::Crit)
    /// covers the floating-point case.
    type Crit: Ord + Clone;

    /// The agents that would constitute this agent's neighborhood if
    /// `actions` were applied. For a static topology this is independent of
    /// `actions`. Must include the agent itself whenever its own criticality
    /// contributes to the objective.
    fn predicted_neighbors<'e>(
        &self,
        env: &'e Self::Env,
        actions: &ActionSet<Self::Action>,
    ) -> Vec<&'e Self>;

    fn possible_actions(&self, env: &Self::Env) -> ActionSet<Self::Action>;

    /// The actions that cannot coexist with any of `actions` in a selected
    /// set.
    fn contradictory_actions(
        &self,
        env: &Self::Env,
        actions: &ActionSet<Self::Action>,
    ) -> ActionSet<Self::Action>;

    /// Estimate of `agent`'s criticality after `actions` are applied to
    /// `env`.
    fn predicted_criticality(
        &self,
        env: &Self::Env,
        actions: &ActionSet<Self::Action>,
        agent: &Self,
    ) -> Self::Crit;

    fn is_compatible(
        &self,
        env: &Self::Env,
        actions: &ActionSet<Self::Action>,
        action: &Self::Action,
    ) -> bool {
        !self.contradictory_actions(env, actions).contains(action)
    }

    /// Current criticality of this agent. Applications with a direct
    /// criticality measure override this and delegate
    /// [`predicted_criticality`](Agent::predicted_criticality) to it.
    fn criticality(&self, env: &Self::Env) -> Self::Crit {
        self.predicted_criticality(env, &ActionSet::new(), self)
    }

    /// One-step decision: the selected, pairwise-compatible action set for
    /// the current round. See [`select::decide`](crate::select::decide).
    fn decide(&self, env: &Self::Env) -> ActionSet<Self::Action> {
        crate::select::decide(self, env)
    }

    /// Apply every action in `actions` once, sequentially in set order, and
    /// return the resulting environment.
    fn act(&self, env: &Self::Env, actions: &ActionSet<Self::Action>) -> Self::Env {
        let mut next = env.clone();
        for action in actions {
            next = action.apply(&next);
        }
        next
    }
}
