use std::cmp::Ordering;

use crate::action::{Action, ActionSet};
use crate::agent::Agent;
use crate::compare::compare_vectors;
use crate::select;

/// Bounded-lookahead extension of [`Agent`].
///
/// Instead of scoring candidates by their direct effect on the
/// neighborhood, a lookahead agent simulates one level of neighbor response
/// per depth unit and scores candidates in the resulting anticipated
/// environment. Cost grows exponentially in depth and branching factor
/// (actions times neighbors); stack use is proportional to depth.
pub trait Lookahead: Agent {
    /// Depth of the decision tree explored during the decision process.
    /// Depth 1 means one action from this agent, then one response from its
    /// neighbors.
    fn search_depth(&self) -> usize;

    /// Decision at the agent's configured [`search_depth`](Lookahead::search_depth).
    fn decide_ahead(&self, env: &Self::Env) -> ActionSet<Self::Action> {
        decide_to_depth(self, env, self.search_depth())
    }
}

/// Selection loop scoring candidates at the given lookahead depth.
///
/// Structurally identical to [`select::decide`]: monotone acceptance on the
/// direct neighborhood vector, compatibility pruning after each insertion.
/// Only the best-candidate choice looks ahead. Depth 0 is exactly the
/// one-step loop.
pub fn decide_to_depth<A: Lookahead>(
    agent: &A,
    env: &A::Env,
    depth: usize,
) -> ActionSet<A::Action> {
    let mut candidates = agent.possible_actions(env);
    let mut selected = ActionSet::new();

    while let Some(best) = best_action_to_depth(agent, &candidates, env, &selected, depth) {
        let trial = selected.with(best.clone());
        let after = select::neighborhood_criticalities(agent, env, &trial);
        let current = select::neighborhood_criticalities(agent, env, &selected);

        if compare_vectors(&after, &current) == Ordering::Greater {
            break;
        }

        selected.insert(best.clone());
        candidates.remove(&best);

        let contradicted = agent.contradictory_actions(env, &selected);
        debug_assert!(
            !contradicted.contains(&best),
            "selected action contradicts its own selection"
        );
        candidates.retain(|candidate| !contradicted.contains(candidate));
    }

    selected
}

/// The candidate with the lexicographically smallest anticipated vector.
///
/// At depth zero this is [`select::best_action`]. Above that, for every
/// candidate:
///
/// 1. apply the candidate to the environment,
/// 2. let every predicted neighbor decide at depth − 1 against that applied
///    environment and fold their actions in sequence,
/// 3. re-decide at depth − 1 in the environment that responded,
/// 4. score the candidate by the neighbor criticalities of that future
///    decision, evaluated against the already selected set.
///
/// Step 4 deliberately scores against `selected` rather than the trial set:
/// the lookahead measures what the world looks like after it responds,
/// judged from the current commitment level.
pub fn best_action_to_depth<A: Lookahead>(
    agent: &A,
    candidates: &ActionSet<A::Action>,
    env: &A::Env,
    selected: &ActionSet<A::Action>,
    depth: usize,
) -> Option<A::Action> {
    if depth == 0 {
        return select::best_action(agent, candidates, env, selected);
    }

    let mut best: Option<(A::Action, Vec<A::Crit>)> = None;

    for candidate in candidates {
        let trial = selected.with(candidate.clone());
        let applied = candidate.apply(env);

        // Neighbors all respond to the applied environment; their actions
        // accumulate into the anticipated one.
        let mut anticipated = applied.clone();
        for neighbor in agent.predicted_neighbors(&applied, &trial) {
            for action in &decide_to_depth(neighbor, &applied, depth - 1) {
                anticipated = action.apply(&anticipated);
            }
        }

        let own_future = decide_to_depth(agent, &anticipated, depth - 1);
        let vector: Vec<A::Crit> = agent
            .predicted_neighbors(&anticipated, &own_future)
            .into_iter()
            .map(|neighbor| agent.predicted_criticality(&anticipated, selected, neighbor))
            .collect();

        let improves = match &best {
            Some((_, incumbent)) => compare_vectors(&vector, incumbent) == Ordering::Less,
            None => true,
        };
        if improves {
            best = Some((candidate.clone(), vector));
        }
    }

    best.map(|(action, _)| action)
}
