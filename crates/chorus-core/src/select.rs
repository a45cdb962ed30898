use std::cmp::Ordering;

use crate::action::ActionSet;
use crate::agent::Agent;
use crate::compare::compare_vectors;

/// Predicted criticalities of the agent's neighborhood under `actions`.
///
/// The result is a bag; [`compare_vectors`] sorts it internally.
pub fn neighborhood_criticalities<A: Agent>(
    agent: &A,
    env: &A::Env,
    actions: &ActionSet<A::Action>,
) -> Vec<A::Crit> {
    agent
        .predicted_neighbors(env, actions)
        .into_iter()
        .map(|neighbor| agent.predicted_criticality(env, actions, neighbor))
        .collect()
}

/// The candidate whose trial vector is the lexicographic minimum.
///
/// Each candidate is scored once against `selected ∪ {candidate}` and the
/// scan is stable: the first candidate of an equal-minimum class wins, in
/// the canonical iteration order of `candidates`. Returns `None` when the
/// candidate set is empty.
pub fn best_action<A: Agent>(
    agent: &A,
    candidates: &ActionSet<A::Action>,
    env: &A::Env,
    selected: &ActionSet<A::Action>,
) -> Option<A::Action> {
    let mut best: Option<(A::Action, Vec<A::Crit>)> = None;

    for candidate in candidates {
        let trial = selected.with(candidate.clone());
        let vector = neighborhood_criticalities(agent, env, &trial);

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

/// One-step decision loop.
///
/// Starting from the possible actions, repeatedly pick the best remaining
/// candidate and add it to the selected set as long as the neighborhood
/// vector does not get lexicographically worse. Equal vectors accept: a
/// non-worsening action may still unlock useful combinations later. After
/// each insertion the candidates contradicting the selected set are pruned,
/// so the selected set stays pairwise compatible and the loop terminates
/// once the candidates run out.
pub fn decide<A: Agent>(agent: &A, env: &A::Env) -> ActionSet<A::Action> {
    let mut candidates = agent.possible_actions(env);
    let mut selected = ActionSet::new();

    while let Some(best) = best_action(agent, &candidates, env, &selected) {
        let trial = selected.with(best.clone());
        let after = neighborhood_criticalities(agent, env, &trial);
        let current = neighborhood_criticalities(agent, env, &selected);

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
