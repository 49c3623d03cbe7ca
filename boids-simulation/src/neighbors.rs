//! Radius-bounded neighbour discovery.

use boids_core::Agent;

use crate::spatial::SpatialGrid;

/// Which neighbours a behaviour is allowed to see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupFilter {
    /// Every agent, regardless of team
    Any,
    /// Only agents whose group equals the given one
    SameGroup(Option<u32>),
}

impl GroupFilter {
    /// Filter for alignment and cohesion: same team when teams are on,
    /// everyone otherwise.
    pub fn flockmates(agent: &Agent, team_mode: bool) -> Self {
        if team_mode {
            GroupFilter::SameGroup(agent.group())
        } else {
            GroupFilter::Any
        }
    }

    #[inline]
    pub fn admits(&self, other: &Agent) -> bool {
        match self {
            GroupFilter::Any => true,
            GroupFilter::SameGroup(group) => other.group() == *group,
        }
    }
}

/// Read-only view over a candidate list, optionally backed by a grid.
///
/// Results always come back in candidate-list order whichever backend is
/// used, so downstream tie-breaks are stable.
#[derive(Clone, Copy)]
pub struct NeighborQuery<'a> {
    agents: &'a [Agent],
    grid: Option<&'a SpatialGrid>,
}

impl<'a> NeighborQuery<'a> {
    pub fn new(agents: &'a [Agent]) -> Self {
        NeighborQuery { agents, grid: None }
    }

    /// `grid` must have been built from (or kept in sync with) `agents`.
    pub fn with_grid(agents: &'a [Agent], grid: &'a SpatialGrid) -> Self {
        NeighborQuery { agents, grid: Some(grid) }
    }

    pub fn agents(&self) -> &'a [Agent] {
        self.agents
    }

    /// Every candidate other than `skip` that is strictly closer than
    /// `radius` to `subject` and passes `filter`.
    pub fn within(&self, subject: &Agent, skip: Option<usize>, radius: f32, filter: GroupFilter) -> Vec<&'a Agent> {
        let radius_sq = radius * radius;
        let admits = |index: usize, other: &Agent| {
            Some(index) != skip
                && filter.admits(other)
                && subject.position.distance_squared(other.position) < radius_sq
        };

        match self.grid {
            Some(grid) => grid
                .candidates(subject.position, radius)
                .into_iter()
                .filter_map(|index| self.agents.get(index).map(|other| (index, other)))
                .filter(|(index, other)| admits(*index, *other))
                .map(|(_, other)| other)
                .collect(),
            None => self
                .agents
                .iter()
                .enumerate()
                .filter(|(index, other)| admits(*index, *other))
                .map(|(_, other)| other)
                .collect(),
        }
    }
}
