use chorus_core::Agent;
use chorus_models::value_sync::SyncEnv;
use chorus_models::SyncAgent;

fn print_env(env: &SyncEnv) {
    for (id, agent) in &env.agents {
        print!(
            "{}: ( value: {}, crit: {:.2} ) ",
            id,
            env.values[id],
            agent.criticality(env).value()
        );
    }
    println!("\nmax criticality: {:.2}\n", env.max_criticality().value());
}

fn main() {
    // four agents on a chain, trying to agree on one value
    let mut env = SyncEnv::chain(&[("a", 2), ("b", 9), ("c", 3), ("d", 6)]);
    let agents: Vec<SyncAgent> = env.agents.values().cloned().collect();

    println!("--- INITIAL STATE");
    print_env(&env);

    let mut turn = 0;
    while !env.converged() {
        turn += 1;
        println!("### TURN {turn}");

        for agent in &agents {
            let decision = agent.decide(&env);
            env = agent.act(&env, &decision);
        }

        print_env(&env);
    }

    println!("--- SUCCESS after {turn} turns");
}
