use crate::models::{Candidate, CandidateRole};
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Failed to read candidate file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid candidate file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Duplicate candidate id: {0}")]
    DuplicateId(String),
}

/// Supplies the ordered candidates a deck is built from
pub trait CandidateSource {
    /// Up to `n` candidates, in display order
    fn next(&mut self, n: usize) -> Vec<Candidate>;
}

/// Candidates held in memory, handed out in order without repeating
#[derive(Debug, Clone, Default)]
pub struct StaticCandidates {
    candidates: Vec<Candidate>,
    position: usize,
}

#[derive(Debug, Deserialize)]
struct CandidateFile {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

impl StaticCandidates {
    pub fn new(candidates: Vec<Candidate>) -> Self {
        Self {
            candidates,
            position: 0,
        }
    }

    /// Parse a `[[candidates]]` TOML document
    pub fn from_toml_str(raw: &str) -> Result<Self, SourceError> {
        let file: CandidateFile = toml::from_str(raw)?;

        let mut seen = std::collections::HashSet::new();
        for candidate in &file.candidates {
            if !seen.insert(candidate.id.as_str()) {
                return Err(SourceError::DuplicateId(candidate.id.clone()));
            }
        }

        Ok(Self::new(file.candidates))
    }

    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self, SourceError> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let source = Self::from_toml_str(&raw)?;
        tracing::info!(
            "Loaded {} candidates from {}",
            source.len(),
            path.as_ref().display()
        );
        Ok(source)
    }

    /// Keep only candidates on one side of the marketplace
    pub fn with_role(mut self, role: Option<CandidateRole>) -> Self {
        if let Some(role) = role {
            self.candidates.retain(|c| c.role == role);
        }
        self.position = 0;
        self
    }

    /// Drop the viewer's own profile so nobody is shown their own card
    pub fn excluding(mut self, user_id: Option<&str>) -> Self {
        if let Some(user_id) = user_id {
            self.candidates.retain(|c| c.id != user_id);
        }
        self.position = 0;
        self
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

impl CandidateSource for StaticCandidates {
    fn next(&mut self, n: usize) -> Vec<Candidate> {
        let end = self.position.saturating_add(n).min(self.candidates.len());
        let batch = self.candidates[self.position..end].to_vec();
        self.position = end;
        batch
    }
}
