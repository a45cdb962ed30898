use chorus_models::load_balance::LoadEnv;
use chorus_models::Worker;
use chorus_runner::{Halting, RunSpec, Runner};

fn main() {
    let env = LoadEnv::line(&[("w0", 0), ("w1", 14), ("w2", 2), ("w3", 0)]);
    let total = env.total_load();

    println!("Load balancing {} tasks over {} workers", total, env.workers.len());
    println!("initial loads: {:?}", env.loads);

    let runner = Runner::new(env.workers.values().cloned().collect::<Vec<Worker>>());
    let halting = Halting::new().converged_when(LoadEnv::balanced);
    let trace = runner.run(env, &RunSpec::new(32), &halting);

    let last = trace.final_env().expect("trace records the initial state");
    println!("final loads:   {:?}", last.loads);
    println!(
        "balanced: {} after {} rounds (total {} conserved: {})",
        trace.converged,
        trace.rounds_run,
        total,
        last.total_load() == total
    );
}
