use chorus_core::Agent;
use chorus_models::value_sync::SyncEnv;
use chorus_models::SyncAgent;

fn sweep(agents: &[SyncAgent], mut env: SyncEnv) -> SyncEnv {
    for agent in agents {
        let decision = agent.decide(&env);
        env = agent.act(&env, &decision);
    }
    env
}

fn run_to_convergence(mut env: SyncEnv, max_rounds: usize) -> (SyncEnv, usize) {
    let agents: Vec<SyncAgent> = env.agents.values().cloned().collect();
    let mut rounds = 0;

    while !env.converged() && rounds < max_rounds {
        let before = env.max_criticality();
        env = sweep(&agents, env);
        rounds += 1;

        assert!(
            env.max_criticality() <= before,
            "max criticality rose from {} to {} in round {rounds}",
            before,
            env.max_criticality()
        );
    }

    (env, rounds)
}

#[test]
fn chain_converges_to_a_common_value() {
    let env = SyncEnv::chain(&[("a", 2), ("b", 9), ("c", 3), ("d", 6)]);
    let initial_max = env.max_criticality();

    let after_one = sweep(&env.agents.values().cloned().collect::<Vec<_>>(), env.clone());
    assert!(
        after_one.max_criticality() < initial_max,
        "the first round must strictly reduce the worst criticality"
    );

    let (finished, rounds) = run_to_convergence(env, 10);
    assert!(finished.converged(), "not converged after {rounds} rounds");

    let first_value = *finished.values.values().next().unwrap();
    assert!(
        finished.values.values().all(|&v| v == first_value),
        "converged but not uniform: {:?}",
        finished.values
    );
}

#[test]
fn converged_system_stays_put() {
    let env = SyncEnv::chain(&[("a", 5), ("b", 5), ("c", 5), ("d", 5)]);
    assert!(env.converged());

    for agent in env.agents.values() {
        assert!(agent.decide(&env).is_empty());
    }

    let agents: Vec<SyncAgent> = env.agents.values().cloned().collect();
    assert_eq!(sweep(&agents, env.clone()), env);
}

#[test]
fn saturated_bounds_still_converge() {
    // both bounds occupied: each agent can only move inward
    let env = SyncEnv::chain(&[("a", 0), ("b", 10), ("c", 0), ("d", 10)]);

    let (finished, rounds) = run_to_convergence(env, 30);
    assert!(finished.converged(), "not converged after {rounds} rounds");

    let first_value = *finished.values.values().next().unwrap();
    assert!(finished.values.values().all(|&v| v == first_value));
}
