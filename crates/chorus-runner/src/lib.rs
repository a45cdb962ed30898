use chorus_core::{ActionSet, Agent, Lookahead};
use rayon::prelude::*;

/// How the agents are swept within one round.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Sweep {
    /// Each agent decides against the freshest environment, in order.
    Sequential,
    /// All agents decide against the same snapshot; the resulting action
    /// sets are applied serially in agent order. Decisions are independent,
    /// so they are computed in parallel.
    Simultaneous,
}

/// Round specification for a run.
#[derive(Clone, Debug)]
pub struct RunSpec {
    pub max_rounds: usize,
    /// Record every nth round into the trace. The initial and final
    /// environments are always recorded.
    pub record_stride: usize,
    pub sweep: Sweep,
}

impl RunSpec {
    pub fn new(max_rounds: usize) -> Self {
        Self { max_rounds, record_stride: 1, sweep: Sweep::Sequential }
    }

    pub fn with_stride(mut self, stride: usize) -> Self {
        self.record_stride = stride.max(1);
        self
    }

    pub fn with_sweep(mut self, sweep: Sweep) -> Self {
        self.sweep = sweep;
        self
    }
}

/// Halting condition checked after each round.
pub struct Halting<E> {
    converged: Option<Box<dyn Fn(&E) -> bool + Send + Sync>>,
}

impl<E> Default for Halting<E> {
    fn default() -> Self {
        Self { converged: None }
    }
}

impl<E> Halting<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn converged_when<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&E) -> bool + Send + Sync + 'static,
    {
        self.converged = Some(Box::new(predicate));
        self
    }

    fn is_converged(&self, env: &E) -> bool {
        self.converged.as_ref().map_or(false, |predicate| predicate(env))
    }
}

/// Recorded trajectory of one run.
#[derive(Clone, Debug)]
pub struct Trace<E> {
    pub rounds: Vec<E>,
    pub rounds_run: usize,
    pub converged: bool,
}

impl<E> Trace<E> {
    pub fn final_env(&self) -> Option<&E> {
        self.rounds.last()
    }

    pub fn initial_env(&self) -> Option<&E> {
        self.rounds.first()
    }
}

/// Drives a fixed roster of agents round by round.
///
/// Each round every agent in roster order decides and acts. A round is one
/// full sweep; the run stops when the halting predicate holds or the round
/// budget is spent.
pub struct Runner<A: Agent> {
    pub agents: Vec<A>,
}

impl<A: Agent> Runner<A> {
    pub fn new(agents: Vec<A>) -> Self {
        Self { agents }
    }

    /// Run with one-step decisions.
    pub fn run(&self, env: A::Env, spec: &RunSpec, halting: &Halting<A::Env>) -> Trace<A::Env>
    where
        A: Sync,
        A::Env: Sync,
        A::Action: Send,
    {
        self.run_inner(env, spec, halting, |agent, env| agent.decide(env))
    }

    /// Run with lookahead decisions at each agent's configured depth.
    pub fn run_ahead(&self, env: A::Env, spec: &RunSpec, halting: &Halting<A::Env>) -> Trace<A::Env>
    where
        A: Lookahead + Sync,
        A::Env: Sync,
        A::Action: Send,
    {
        self.run_inner(env, spec, halting, |agent, env| agent.decide_ahead(env))
    }

    /// Run several initial environments in parallel, one trace each.
    pub fn run_many(
        &self,
        envs: Vec<A::Env>,
        spec: &RunSpec,
        halting: &Halting<A::Env>,
    ) -> Vec<Trace<A::Env>>
    where
        A: Sync,
        A::Env: Send + Sync,
        A::Action: Send,
    {
        envs.into_par_iter()
            .map(|env| self.run(env, spec, halting))
            .collect()
    }

    fn run_inner<F>(
        &self,
        mut env: A::Env,
        spec: &RunSpec,
        halting: &Halting<A::Env>,
        decide: F,
    ) -> Trace<A::Env>
    where
        F: Fn(&A, &A::Env) -> ActionSet<A::Action> + Sync,
        A: Sync,
        A::Env: Sync,
        A::Action: Send,
    {
        let mut trace = Trace { rounds: Vec::new(), rounds_run: 0, converged: false };
        trace.rounds.push(env.clone());

        if halting.is_converged(&env) {
            trace.converged = true;
            return trace;
        }

        for round in 1..=spec.max_rounds {
            let mut proposed = 0usize;

            match spec.sweep {
                Sweep::Sequential => {
                    for agent in &self.agents {
                        let decision = decide(agent, &env);
                        proposed += decision.len();
                        env = agent.act(&env, &decision);
                    }
                }
                Sweep::Simultaneous => {
                    let decisions: Vec<ActionSet<A::Action>> = self
                        .agents
                        .par_iter()
                        .map(|agent| decide(agent, &env))
                        .collect();
                    for (agent, decision) in self.agents.iter().zip(&decisions) {
                        proposed += decision.len();
                        env = agent.act(&env, decision);
                    }
                }
            }

            trace.rounds_run = round;
            let converged = halting.is_converged(&env);
            tracing::debug!(round, proposed, converged, "round swept");

            let on_stride = round % spec.record_stride == 0;
            if on_stride || converged || round == spec.max_rounds {
                trace.rounds.push(env.clone());
            }

            if converged {
                trace.converged = true;
                break;
            }
        }

        trace
    }
}
