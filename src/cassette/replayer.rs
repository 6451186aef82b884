//! Replays recorded interactions from a cassette.

use std::collections::{HashMap, VecDeque};
use std::path::Path;

use super::format::{Cassette, Interaction};
use crate::error::Error;

/// Serves interactions from a loaded cassette, in recorded order, per
/// port/method pair.
#[derive(Debug)]
pub struct CassetteReplayer {
    queues: HashMap<(String, String), VecDeque<Interaction>>,
}

impl CassetteReplayer {
    /// Create a new replayer from a loaded cassette.
    #[must_use]
    pub fn new(cassette: Cassette) -> Self {
        let mut queues: HashMap<(String, String), VecDeque<Interaction>> = HashMap::new();
        let mut interactions = cassette.interactions;
        interactions.sort_by_key(|i| i.seq);
        for interaction in interactions {
            queues
                .entry((interaction.port.clone(), interaction.method.clone()))
                .or_default()
                .push_back(interaction);
        }
        Self { queues }
    }

    /// Load a YAML cassette file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, Error> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read cassette {}: {e}", path.display()))
        })?;
        let cassette: Cassette = serde_yaml::from_str(&content).map_err(|e| {
            Error::Config(format!("Failed to parse cassette {}: {e}", path.display()))
        })?;
        Ok(Self::new(cassette))
    }

    /// Take the next interaction recorded for `port`/`method`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] once the cassette holds no further
    /// interactions for the pair.
    pub fn next_interaction(&mut self, port: &str, method: &str) -> Result<Interaction, Error> {
        self.queues
            .get_mut(&(port.to_string(), method.to_string()))
            .and_then(VecDeque::pop_front)
            .ok_or_else(|| {
                let mut available: Vec<String> = self
                    .queues
                    .iter()
                    .filter(|(_, q)| !q.is_empty())
                    .map(|((p, m), q)| format!("{p}::{m} ({})", q.len()))
                    .collect();
                available.sort();
                Error::Config(format!(
                    "Cassette exhausted: nothing left for {port}::{method}. Remaining: [{}]",
                    available.join(", ")
                ))
            })
    }
}
