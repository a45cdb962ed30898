use std::cmp::Ordering;

use chorus_core::select::neighborhood_criticalities;
use chorus_core::{compare_vectors, ActionSet, Agent, Lookahead};
use chorus_models::value_sync::SyncEnv;
use chorus_models::SyncAgent;

fn run_to_convergence<F>(mut env: SyncEnv, max_rounds: usize, decide: F) -> (SyncEnv, usize)
where
    F: Fn(&SyncAgent, &SyncEnv) -> ActionSet<chorus_models::Nudge>,
{
    let agents: Vec<SyncAgent> = env.agents.values().cloned().collect();
    let mut rounds = 0;

    while !env.converged() && rounds < max_rounds {
        for agent in &agents {
            let decision = decide(agent, &env);
            env = agent.act(&env, &decision);
        }
        rounds += 1;
    }

    (env, rounds)
}

#[test]
fn depth_one_converges_no_slower_than_one_step() {
    let env = SyncEnv::chain(&[("a", 2), ("b", 9), ("c", 3), ("d", 6)]);

    let (plain, plain_rounds) =
        run_to_convergence(env.clone(), 10, |agent, env| agent.decide(env));
    assert!(plain.converged());

    let deep_env = env.with_search_depth(1);
    let (deep, deep_rounds) =
        run_to_convergence(deep_env, 10, |agent, env| agent.decide_ahead(env));
    assert!(deep.converged(), "lookahead run stuck after {deep_rounds} rounds");
    assert!(
        deep_rounds <= plain_rounds,
        "lookahead took {deep_rounds} rounds, one-step took {plain_rounds}"
    );
}

#[test]
fn lookahead_selections_never_worsen_the_neighborhood() {
    let mut env = SyncEnv::chain(&[("a", 2), ("b", 9), ("c", 3), ("d", 6)]).with_search_depth(1);
    let agents: Vec<SyncAgent> = env.agents.values().cloned().collect();

    for _ in 0..5 {
        for agent in &agents {
            let selection = agent.decide_ahead(&env);

            let with_selection = neighborhood_criticalities(agent, &env, &selection);
            let baseline = neighborhood_criticalities(agent, &env, &ActionSet::new());
            assert_ne!(
                compare_vectors(&with_selection, &baseline),
                Ordering::Greater,
                "selection worsens the neighborhood of {:?}",
                agent.id()
            );

            // pairwise compatibility of the selection
            for action in &selection {
                let mut rest = selection.clone();
                rest.remove(action);
                assert!(!agent.contradictory_actions(&env, &rest).contains(action));
            }

            env = agent.act(&env, &selection);
        }
    }
}

#[test]
fn lookahead_leaves_a_converged_system_alone() {
    let env = SyncEnv::chain(&[("a", 5), ("b", 5), ("c", 5), ("d", 5)]).with_search_depth(1);

    for agent in env.agents.values() {
        assert!(agent.decide_ahead(&env).is_empty());
    }
}
