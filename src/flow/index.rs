use super::model::{Step, StepId};
use ahash::AHashMap;

/// An ordered step list with an id → position index for O(1) lookups.
///
/// Appends and in-place edits keep the index valid; removals and moves rebuild it.
#[derive(Debug, Clone, Default)]
pub struct StepIndex {
    steps: Vec<Step>,
    positions: AHashMap<StepId, usize>,
}

impl StepIndex {
    /// Builds an index over `steps`. With duplicate ids the first occurrence wins.
    pub fn new(steps: Vec<Step>) -> Self {
        let mut index = Self {
            steps,
            positions: AHashMap::new(),
        };
        index.reindex();
        index
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.positions.contains_key(id)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.positions.get(id).copied()
    }

    pub fn get(&self, id: &str) -> Option<&Step> {
        self.position(id).map(|pos| &self.steps[pos])
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Step> {
        let pos = self.position(id)?;
        self.steps.get_mut(pos)
    }

    pub fn first(&self) -> Option<&Step> {
        self.steps.first()
    }

    pub fn push(&mut self, step: Step) {
        self.positions
            .entry(step.id.clone())
            .or_insert(self.steps.len());
        self.steps.push(step);
    }

    pub fn remove(&mut self, id: &str) -> Option<Step> {
        let pos = self.position(id)?;
        let step = self.steps.remove(pos);
        self.reindex();
        Some(step)
    }

    /// Moves a step to `to`, clamped to the last position.
    pub fn move_to(&mut self, id: &str, to: usize) -> bool {
        let Some(from) = self.position(id) else {
            return false;
        };
        let to = to.min(self.steps.len() - 1);
        if from != to {
            let step = self.steps.remove(from);
            self.steps.insert(to, step);
            self.reindex();
        }
        true
    }

    fn reindex(&mut self) {
        self.positions.clear();
        for (pos, step) in self.steps.iter().enumerate() {
            self.positions.entry(step.id.clone()).or_insert(pos);
        }
    }
}
