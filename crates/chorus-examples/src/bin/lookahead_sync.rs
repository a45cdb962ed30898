use chorus_core::{ActionSet, Agent, Lookahead};
use chorus_models::value_sync::SyncEnv;
use chorus_models::{Nudge, SyncAgent};

fn rounds_to_convergence<F>(mut env: SyncEnv, decide: F) -> usize
where
    F: Fn(&SyncAgent, &SyncEnv) -> ActionSet<Nudge>,
{
    let agents: Vec<SyncAgent> = env.agents.values().cloned().collect();
    let mut rounds = 0;

    while !env.converged() && rounds < 32 {
        for agent in &agents {
            let decision = decide(agent, &env);
            env = agent.act(&env, &decision);
        }
        rounds += 1;
    }

    rounds
}

fn main() {
    let env = SyncEnv::chain(&[("a", 2), ("b", 9), ("c", 3), ("d", 6)]);

    println!("Value synchronization, one-step vs lookahead");
    println!("============================================");

    let plain = rounds_to_convergence(env.clone(), |agent, env| agent.decide(env));
    println!("depth 0: converged in {plain} rounds");

    let deep = rounds_to_convergence(env.with_search_depth(1), |agent, env| {
        agent.decide_ahead(env)
    });
    println!("depth 1: converged in {deep} rounds");
}
