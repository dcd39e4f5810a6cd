//! Sequential entity ids

use std::collections::HashMap;

/// Renames entity ids to `e1, e2, …` in the order they are first asked for.
///
/// One instance covers one document; asking again for a known id returns the same name.
#[derive(Debug, Default)]
pub struct SequentialIds {
    assigned: HashMap<String, String>,
}

impl SequentialIds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&mut self, eid: &str) -> String {
        let next = self.assigned.len() + 1;
        self.assigned
            .entry(eid.to_string())
            .or_insert_with(|| format!("e{next}"))
            .clone()
    }

    pub fn len(&self) -> usize {
        self.assigned.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assigned.is_empty()
    }
}
