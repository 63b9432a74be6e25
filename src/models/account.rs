use crate::models::domain::{Candidate, CandidateRole, SwipeDecision};
use serde::{Deserialize, Serialize};

/// Signed-in identity as reported by the auth provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Access/refresh token pair returned on sign-in or sign-up
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
    #[serde(default)]
    pub user: Option<User>,
}

/// Row in the hosted `profiles` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    #[serde(default)]
    pub role: Option<CandidateRole>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub headline: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub stage: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub onboarding_complete: bool,
}

impl Profile {
    /// Card for this profile; profiles without a role are not shown
    pub fn into_candidate(self) -> Option<Candidate> {
        let role = self.role?;
        Some(Candidate {
            name: self.full_name.unwrap_or_else(|| "Anonymous".to_string()),
            id: self.id,
            role,
            headline: self.headline.unwrap_or_default(),
            company: self.company,
            stage: self.stage,
            location: self.location,
            image_url: self.avatar_url,
            tags: self.interests,
        })
    }
}

/// A liked or super-liked candidate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub user_id: String,
    pub candidate_id: String,
    pub decision: SwipeDecision,
    pub decided_at: chrono::DateTime<chrono::Utc>,
}

/// Body returned by the account deletion function
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeletionResult {
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
}
