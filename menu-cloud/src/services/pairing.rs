//! Item pairing enrichment
//!
//! When an item is created, an external suggestion service proposes dishes
//! that go well with it. Suggestions arrive as free-form names and are mapped
//! onto the venue's real items by an [`ItemMatcher`]. Everything here is
//! best-effort: the item is created whether or not enrichment works.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use crate::db;
use shared::models::Item;

/// Most pairings stored per item
pub const MAX_PAIRINGS: usize = 3;

const SUGGESTER_TIMEOUT: Duration = Duration::from_secs(10);

/// One suggestion from the pairing service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairingSuggestion {
    pub name: String,
    #[serde(default)]
    pub reason: String,
}

/// Item described to the suggestion service
#[derive(Debug, Clone, Serialize)]
pub struct PairingSubject<'a> {
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub tags: &'a [String],
    /// Names of the other items on the venue's menu
    pub candidates: Vec<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum PairingError {
    #[error("pairing service request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("pairing service returned status {0}")]
    Status(u16),
}

/// Source of pairing suggestions
#[async_trait]
pub trait PairingSuggester: Send + Sync {
    async fn suggest(
        &self,
        subject: &PairingSubject<'_>,
    ) -> Result<Vec<PairingSuggestion>, PairingError>;
}

#[derive(Deserialize)]
struct SuggestResponse {
    #[serde(default)]
    pairings: Vec<PairingSuggestion>,
}

/// JSON-over-HTTP suggestion service
pub struct HttpPairingSuggester {
    client: reqwest::Client,
    url: String,
    api_key: Option<String>,
}

impl HttpPairingSuggester {
    pub fn new(url: String, api_key: Option<String>) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(SUGGESTER_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            url,
            api_key,
        })
    }
}

#[async_trait]
impl PairingSuggester for HttpPairingSuggester {
    async fn suggest(
        &self,
        subject: &PairingSubject<'_>,
    ) -> Result<Vec<PairingSuggestion>, PairingError> {
        let mut request = self.client.post(&self.url).json(subject);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let resp = request.send().await?;
        if !resp.status().is_success() {
            return Err(PairingError::Status(resp.status().as_u16()));
        }
        let body: SuggestResponse = resp.json().await?;
        Ok(body.pairings)
    }
}

/// Venue item a suggestion can resolve to
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Candidate {
    pub id: i64,
    pub name: String,
}

/// Maps a suggested name onto one of the candidates
pub trait ItemMatcher: Send + Sync {
    fn best_match(&self, suggestion: &str, candidates: &[Candidate]) -> Option<i64>;
}

/// Accent- and case-insensitive name matcher
///
/// Substring containment in either direction wins; otherwise the candidate
/// sharing the most words of 3+ characters, first one on ties.
pub struct FuzzyNameMatcher;

impl ItemMatcher for FuzzyNameMatcher {
    fn best_match(&self, suggestion: &str, candidates: &[Candidate]) -> Option<i64> {
        let wanted = normalize_name(suggestion);
        if wanted.is_empty() {
            return None;
        }

        let normalized: Vec<(i64, String)> = candidates
            .iter()
            .map(|c| (c.id, normalize_name(&c.name)))
            .filter(|(_, name)| !name.is_empty())
            .collect();

        if let Some((id, _)) = normalized
            .iter()
            .find(|(_, name)| name.contains(&wanted) || wanted.contains(name.as_str()))
        {
            return Some(*id);
        }

        let wanted_words = significant_words(&wanted);
        let mut best: Option<(i64, usize)> = None;
        for (id, name) in &normalized {
            let overlap = significant_words(name).intersection(&wanted_words).count();
            if overlap > 0 && best.is_none_or(|(_, b)| overlap > b) {
                best = Some((*id, overlap));
            }
        }
        best.map(|(id, _)| id)
    }
}

/// NFD, drop combining marks, lowercase, collapse everything else to single spaces
pub fn normalize_name(name: &str) -> String {
    let folded: String = name
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();
    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn significant_words(normalized: &str) -> HashSet<&str> {
    normalized
        .split(' ')
        .filter(|w| w.chars().count() >= 3)
        .collect()
}

/// Resolve suggestions to `(partner id, reason)` in suggestion order
///
/// Skips the item itself and repeated partners; stops at [`MAX_PAIRINGS`].
pub fn select_pairings(
    matcher: &dyn ItemMatcher,
    item_id: i64,
    suggestions: &[PairingSuggestion],
    candidates: &[Candidate],
) -> Vec<(i64, String)> {
    let mut seen = HashSet::new();
    let mut selected = Vec::new();
    for suggestion in suggestions {
        if selected.len() == MAX_PAIRINGS {
            break;
        }
        let Some(partner) = matcher.best_match(&suggestion.name, candidates) else {
            tracing::debug!(suggestion = %suggestion.name, "No menu item matches suggestion");
            continue;
        };
        if partner == item_id || !seen.insert(partner) {
            continue;
        }
        selected.push((partner, suggestion.reason.clone()));
    }
    selected
}

/// Ask for suggestions and persist the matched pairings; returns how many were stored
///
/// Never fails: every error is logged and yields 0.
pub async fn enrich_item(
    pool: &PgPool,
    suggester: &Arc<dyn PairingSuggester>,
    matcher: &dyn ItemMatcher,
    venue_id: i64,
    item: &Item,
) -> usize {
    let candidates = match db::items::pairing_candidates(pool, venue_id, item.id).await {
        Ok(c) if !c.is_empty() => c,
        Ok(_) => return 0,
        Err(e) => {
            tracing::warn!(item_id = item.id, error = %e, "Failed to load pairing candidates");
            return 0;
        }
    };

    let subject = PairingSubject {
        name: &item.name,
        description: item.description.as_deref(),
        tags: &item.tags,
        candidates: candidates.iter().map(|c| c.name.clone()).collect(),
    };
    let suggestions = match suggester.suggest(&subject).await {
        Ok(s) => s,
        Err(e) => {
            tracing::warn!(item_id = item.id, error = %e, "Pairing suggestion failed");
            return 0;
        }
    };

    let pairings = select_pairings(matcher, item.id, &suggestions, &candidates);
    if pairings.is_empty() {
        return 0;
    }
    match db::items::insert_pairings(pool, item.id, &pairings).await {
        Ok(()) => {
            tracing::info!(item_id = item.id, count = pairings.len(), "Item pairings stored");
            pairings.len()
        }
        Err(e) => {
            tracing::warn!(item_id = item.id, error = %e, "Failed to store item pairings");
            0
        }
    }
}
