use std::collections::BTreeMap;

use chorus_core::{Action, ActionSet, Agent, Crit, Lookahead};
use serde::{Deserialize, Serialize};

pub const MAX_VALUE: i64 = 10;
pub const MIN_VALUE: i64 = 0;

pub type AgentId = String;

/// Value-synchronization sample: agents on a fixed topology nudge an integer
/// value up or down until the whole neighborhood agrees.
///
/// The environment holds all mutable state, split over two maps: the agent
/// table and the value each agent currently holds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SyncEnv {
    pub agents: BTreeMap<AgentId, SyncAgent>,
    pub values: BTreeMap<AgentId, i64>,
}

impl SyncEnv {
    pub fn new(agents: BTreeMap<AgentId, SyncAgent>, values: BTreeMap<AgentId, i64>) -> Self {
        Self { agents, values }
    }

    /// Line topology: each agent neighbors its predecessor and successor.
    pub fn chain(spec: &[(&str, i64)]) -> Self {
        let mut agents = BTreeMap::new();
        let mut values = BTreeMap::new();

        for (i, &(id, value)) in spec.iter().enumerate() {
            let mut neighbors = Vec::new();
            if i > 0 {
                neighbors.push(spec[i - 1].0.to_string());
            }
            if i + 1 < spec.len() {
                neighbors.push(spec[i + 1].0.to_string());
            }
            agents.insert(id.to_string(), SyncAgent::new(id, neighbors));
            values.insert(id.to_string(), value);
        }

        Self { agents, values }
    }

    /// Same environment with every agent set to the given lookahead depth.
    pub fn with_search_depth(mut self, depth: usize) -> Self {
        for agent in self.agents.values_mut() {
            agent.depth = depth;
        }
        self
    }

    pub fn max_criticality(&self) -> Crit {
        self.agents
            .values()
            .map(|agent| agent.criticality(self))
            .max()
            .unwrap_or(Crit::ZERO)
    }

    /// All criticalities are zero, that is, all values are equal within
    /// every neighborhood.
    pub fn converged(&self) -> bool {
        self.agents
            .values()
            .all(|agent| agent.criticality(self).is_zero())
    }
}

/// The two possible actions: move the agent's own value by one, clamped at
/// the bounds.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Nudge {
    Up(AgentId),
    Down(AgentId),
}

impl Action<SyncEnv> for Nudge {
    fn apply(&self, env: &SyncEnv) -> SyncEnv {
        let mut next = env.clone();
        match self {
            Nudge::Up(id) => {
                if let Some(value) = next.values.get_mut(id) {
                    *value = (*value + 1).min(MAX_VALUE);
                }
            }
            Nudge::Down(id) => {
                if let Some(value) = next.values.get_mut(id) {
                    *value = (*value - 1).max(MIN_VALUE);
                }
            }
        }
        next
    }
}

/// An agent trying to synchronize its value with its neighbors.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncAgent {
    id: AgentId,
    /// Neighbor ids, self included. The topology here is static, so it can
    /// live on the agent; a dynamic topology belongs in the environment
    /// (agents stay stateless).
    neighbors: Vec<AgentId>,
    pub(crate) depth: usize,
}

impl SyncAgent {
    pub fn new<I, S>(id: impl Into<AgentId>, neighbors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<AgentId>,
    {
        let id = id.into();
        let mut neighbors: Vec<AgentId> = neighbors.into_iter().map(Into::into).collect();
        // the agent's own criticality is part of the objective
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

    fn up(&self) -> Nudge {
        Nudge::Up(self.id.clone())
    }

    fn down(&self) -> Nudge {
        Nudge::Down(self.id.clone())
    }
}

impl Agent for SyncAgent {
    type Env = SyncEnv;
    type Action = Nudge;
    type Crit = Crit;

    fn predicted_neighbors<'e>(
        &self,
        env: &'e SyncEnv,
        _actions: &ActionSet<Nudge>,
    ) -> Vec<&'e SyncAgent> {
        // static topology: map the neighbor ids to their refs
        self.neighbors
            .iter()
            .filter_map(|id| env.agents.get(id))
            .collect()
    }

    fn possible_actions(&self, env: &SyncEnv) -> ActionSet<Nudge> {
        let current = env.values.get(&self.id).copied().unwrap_or(MIN_VALUE);

        let mut actions = ActionSet::new();
        if current < MAX_VALUE {
            actions.insert(self.up());
        }
        if current > MIN_VALUE {
            actions.insert(self.down());
        }
        actions
    }

    fn contradictory_actions(
        &self,
        _env: &SyncEnv,
        actions: &ActionSet<Nudge>,
    ) -> ActionSet<Nudge> {
        // moving up and moving down exclude each other
        let mut contradicted = ActionSet::new();
        if actions.contains(&self.up()) {
            contradicted.insert(self.down());
        }
        if actions.contains(&self.down()) {
            contradicted.insert(self.up());
        }
        contradicted
    }

    fn predicted_criticality(
        &self,
        env: &SyncEnv,
        actions: &ActionSet<Nudge>,
        agent: &SyncAgent,
    ) -> Crit {
        // at most one action can be selected here, the only two possible
        // ones being contradictory
        debug_assert!(actions.len() <= 1);
        agent.criticality(&self.act(env, actions))
    }

    /// Largest distance between this agent's value and a neighbor's, over
    /// the attainable range.
    fn criticality(&self, env: &SyncEnv) -> Crit {
        let value = env.values.get(&self.id).copied().unwrap_or(MIN_VALUE);
        let max_distance = self
            .neighbors
            .iter()
            .filter_map(|id| env.values.get(id))
            .map(|&neighbor| (value - neighbor).abs())
            .max()
            .unwrap_or(0);

        Crit::new(max_distance as f64 / (MAX_VALUE - MIN_VALUE) as f64)
    }
}

impl Lookahead for SyncAgent {
    fn search_depth(&self) -> usize {
        self.depth
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn two_agent_env(left: i64, right: i64) -> SyncEnv {
        SyncEnv::chain(&[("a", left), ("b", right)])
    }

    #[test]
    fn criticality_is_worst_gap_over_range() {
        let env = SyncEnv::chain(&[("a", 2), ("b", 9), ("c", 3)]);
        let b = &env.agents["b"];
        assert_relative_eq!(b.criticality(&env).value(), 0.7);

        let a = &env.agents["a"];
        assert_relative_eq!(a.criticality(&env).value(), 0.7);
    }

    #[test]
    fn criticality_zero_when_neighborhood_agrees() {
        let env = two_agent_env(5, 5);
        assert!(env.converged());
        assert_eq!(env.max_criticality(), Crit::ZERO);
    }

    #[test]
    fn possible_actions_respect_bounds() {
        let env = two_agent_env(MIN_VALUE, MAX_VALUE);
        let a = &env.agents["a"];
        let b = &env.agents["b"];

        let a_actions = a.possible_actions(&env);
        assert!(a_actions.contains(&Nudge::Up("a".into())));
        assert!(!a_actions.contains(&Nudge::Down("a".into())));

        let b_actions = b.possible_actions(&env);
        assert!(b_actions.contains(&Nudge::Down("b".into())));
        assert!(!b_actions.contains(&Nudge::Up("b".into())));
    }

    #[test]
    fn nudges_clamp_at_bounds() {
        let env = two_agent_env(MIN_VALUE, MAX_VALUE);
        let clamped_down = Nudge::Down("a".into()).apply(&env);
        assert_eq!(clamped_down.values["a"], MIN_VALUE);

        let clamped_up = Nudge::Up("b".into()).apply(&env);
        assert_eq!(clamped_up.values["b"], MAX_VALUE);
    }

    #[test]
    fn up_and_down_are_mutually_contradictory() {
        let env = two_agent_env(4, 6);
        let a = &env.agents["a"];

        let selected: ActionSet<Nudge> = [Nudge::Up("a".into())].into_iter().collect();
        let contradicted = a.contradictory_actions(&env, &selected);
        assert!(contradicted.contains(&Nudge::Down("a".into())));
        assert!(!a.is_compatible(&env, &selected, &Nudge::Down("a".into())));
    }

    #[test]
    fn act_on_empty_set_is_identity() {
        let env = two_agent_env(3, 8);
        let a = &env.agents["a"];
        assert_eq!(a.act(&env, &ActionSet::new()), env);
    }

    #[test]
    fn act_folds_each_action_once() {
        let env = two_agent_env(3, 8);
        let a = &env.agents["a"];
        let actions: ActionSet<Nudge> =
            [Nudge::Up("a".into()), Nudge::Down("b".into())].into_iter().collect();

        let next = a.act(&env, &actions);
        assert_eq!(next.values["a"], 4);
        assert_eq!(next.values["b"], 7);
    }
}
