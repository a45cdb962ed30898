use std::collections::BTreeMap;

use chorus_core::{Action, ActionSet, Agent, Crit, Lookahead};
use serde::{Deserialize, Serialize};

/// Scale used to normalize load gaps into criticalities.
pub const LOAD_SCALE: i64 = 16;

pub type WorkerId = String;

/// Load-balancing sample: workers shift single tasks along edges until no
/// neighborhood sees a gap worth closing. Total load is conserved.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LoadEnv {
    pub workers: BTreeMap<WorkerId, Worker>,
    pub loads: BTreeMap<WorkerId, i64>,
}

impl LoadEnv {
    pub fn new(workers: BTreeMap<WorkerId, Worker>, loads: BTreeMap<WorkerId, i64>) -> Self {
        Self { workers, loads }
    }

    /// Line topology: each worker neighbors its predecessor and successor.
    pub fn line(spec: &[(&str, i64)]) -> Self {
        let mut workers = BTreeMap::new();
        let mut loads = BTreeMap::new();

        for (i, &(id, load)) in spec.iter().enumerate() {
            let mut peers = Vec::new();
            if i > 0 {
                peers.push(spec[i - 1].0.to_string());
            }
            if i + 1 < spec.len() {
                peers.push(spec[i + 1].0.to_string());
            }
            workers.insert(id.to_string(), Worker::new(id, peers));
            loads.insert(id.to_string(), load);
        }

        Self { workers, loads }
    }

    /// Same environment with every worker set to the given lookahead depth.
    pub fn with_search_depth(mut self, depth: usize) -> Self {
        for worker in self.workers.values_mut() {
            worker.depth = depth;
        }
        self
    }

    pub fn total_load(&self) -> i64 {
        self.loads.values().sum()
    }

    pub fn max_criticality(&self) -> Crit {
        self.workers
            .values()
            .map(|worker| worker.criticality(self))
            .max()
            .unwrap_or(Crit::ZERO)
    }

    /// Balanced when no edge gap exceeds one task. A gap of one cannot be
    /// narrowed by moving a task, only mirrored.
    pub fn balanced(&self) -> bool {
        self.workers.values().all(|worker| worker.max_gap(self) <= 1)
    }
}

/// Move one task along an edge. The edge is the action's identity, so the
/// same transfer proposed from either endpoint is a single set member.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Transfer {
    pub from: WorkerId,
    pub to: WorkerId,
}

impl Transfer {
    pub fn new(from: impl Into<WorkerId>, to: impl Into<WorkerId>) -> Self {
        Self { from: from.into(), to: to.into() }
    }

    fn reversed(&self) -> Transfer {
        Transfer { from: self.to.clone(), to: self.from.clone() }
    }
}

impl Action<LoadEnv> for Transfer {
    fn apply(&self, env: &LoadEnv) -> LoadEnv {
        let mut next = env.clone();
        let available = next.loads.get(&self.from).copied().unwrap_or(0);
        if available > 0 {
            if let Some(from) = next.loads.get_mut(&self.from) {
                *from -= 1;
            }
            if let Some(to) = next.loads.get_mut(&self.to) {
                *to += 1;
            }
        }
        next
    }
}

/// A worker leveling its task load with its peers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Worker {
    id: WorkerId,
    /// Neighbor ids, self included.
    neighbors: Vec<WorkerId>,
    depth: usize,
}

impl Worker {
    pub fn new<I, S>(id: impl Into<WorkerId>, peers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<WorkerId>,
    {
        let id = id.into();
        let mut neighbors: Vec<WorkerId> = peers.into_iter().map(Into::into).collect();
        neighbors.push(id.clone());
        Self { id, neighbors, depth: 0 }
    }

    pub fn with_search_depth(mut self, depth: usize) -> Self {
        self.depth = depth;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    fn peers(&self) -> impl Iterator<Item = &WorkerId> {
        self.neighbors.iter().filter(move |id| **id != self.id)
    }

    /// Worst absolute load gap between this worker and a neighbor.
    pub fn max_gap(&self, env: &LoadEnv) -> i64 {
        let load = env.loads.get(&self.id).copied().unwrap_or(0);
        self.neighbors
            .iter()
            .filter_map(|id| env.loads.get(id))
            .map(|&neighbor| (load - neighbor).abs())
            .max()
            .unwrap_or(0)
    }
}

impl Agent for Worker {
    type Env = LoadEnv;
    type Action = Transfer;
    type Crit = Crit;

    fn predicted_neighbors<'e>(
        &self,
        env: &'e LoadEnv,
        _actions: &ActionSet<Transfer>,
    ) -> Vec<&'e Worker> {
        self.neighbors
            .iter()
            .filter_map(|id| env.workers.get(id))
            .collect()
    }

    /// A transfer is proposed only when it strictly narrows the gap; moving
    /// a task across a gap of one merely mirrors the imbalance.
    fn possible_actions(&self, env: &LoadEnv) -> ActionSet<Transfer> {
        let load = env.loads.get(&self.id).copied().unwrap_or(0);

        let mut actions = ActionSet::new();
        for peer in self.peers() {
            let peer_load = env.loads.get(peer).copied().unwrap_or(0);
            if load > peer_load + 1 {
                actions.insert(Transfer::new(self.id.clone(), peer.clone()));
            }
            if peer_load > load + 1 {
                actions.insert(Transfer::new(peer.clone(), self.id.clone()));
            }
        }
        actions
    }

    fn contradictory_actions(
        &self,
        _env: &LoadEnv,
        actions: &ActionSet<Transfer>,
    ) -> ActionSet<Transfer> {
        // a transfer excludes its reverse
        actions.iter().map(Transfer::reversed).collect()
    }

    fn predicted_criticality(
        &self,
        env: &LoadEnv,
        actions: &ActionSet<Transfer>,
        agent: &Worker,
    ) -> Crit {
        agent.criticality(&self.act(env, actions))
    }

    fn criticality(&self, env: &LoadEnv) -> Crit {
        Crit::new(self.max_gap(env) as f64 / LOAD_SCALE as f64)
    }
}

impl Lookahead for Worker {
    fn search_depth(&self) -> usize {
        self.depth
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sweep(env: LoadEnv) -> LoadEnv {
        let workers: Vec<Worker> = env.workers.values().cloned().collect();
        let mut env = env;
        for worker in &workers {
            let decision = worker.decide(&env);
            env = worker.act(&env, &decision);
        }
        env
    }

    #[test]
    fn transfer_conserves_total_load() {
        let env = LoadEnv::line(&[("a", 0), ("b", 6), ("c", 0)]);
        let moved = Transfer::new("b", "a").apply(&env);
        assert_eq!(moved.total_load(), env.total_load());
        assert_eq!(moved.loads["a"], 1);
        assert_eq!(moved.loads["b"], 5);
    }

    #[test]
    fn transfer_from_empty_worker_is_identity() {
        let env = LoadEnv::line(&[("a", 0), ("b", 2)]);
        let unchanged = Transfer::new("a", "b").apply(&env);
        assert_eq!(unchanged, env);
    }

    #[test]
    fn no_actions_once_balanced() {
        let env = LoadEnv::line(&[("a", 3), ("b", 4), ("c", 3)]);
        assert!(env.balanced());
        for worker in env.workers.values() {
            assert!(worker.decide(&env).is_empty());
        }
    }

    #[test]
    fn reverse_transfer_is_contradicted() {
        let env = LoadEnv::line(&[("a", 0), ("b", 6)]);
        let a = &env.workers["a"];
        let selected: ActionSet<Transfer> = [Transfer::new("b", "a")].into_iter().collect();
        assert!(!a.is_compatible(&env, &selected, &Transfer::new("a", "b")));
    }

    #[test]
    fn line_levels_out_within_bounded_rounds() {
        let total = 12;
        let mut env = LoadEnv::line(&[("a", 0), ("b", 12), ("c", 0)]);

        let mut rounds = 0;
        while !env.balanced() && rounds < 32 {
            env = sweep(env);
            rounds += 1;
        }

        assert!(env.balanced(), "still unbalanced after {rounds} rounds: {:?}", env.loads);
        assert_eq!(env.total_load(), total);
    }
}
