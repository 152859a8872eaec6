//! Strategies for choosing one record when a company lookup matches several.
//!
//! | Name          | Behavior                                                     |
//! |---------------|--------------------------------------------------------------|
//! | `first`       | First record in store order (placeholder policy, default)    |
//! | `best`        | Exact name, then prefix, then shortest name; ties keep order |
//! | `interactive` | Lists the candidates on the prompt and asks for a number     |
//! | `reject`      | Fails with `AmbiguousMatch`                                  |

use std::sync::Arc;

use crate::input::Prompt;

use super::types::{CompanyError, CompanyRecord};

/// Picks one of several candidate records.
///
/// `select` is only called with two or more candidates and returns an index
/// into `candidates`.
pub trait DisambiguationStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    fn select(&self, query: &str, candidates: &[CompanyRecord]) -> Result<usize, CompanyError>;
}

/// Take the first candidate in store order.
///
/// This is a placeholder policy: store order carries no meaning, so the pick
/// is arbitrary. It is the default because it never blocks and never fails.
#[derive(Debug, Default)]
pub struct FirstMatch;

impl DisambiguationStrategy for FirstMatch {
    fn name(&self) -> &'static str {
        "first"
    }

    fn select(&self, _query: &str, _candidates: &[CompanyRecord]) -> Result<usize, CompanyError> {
        Ok(0)
    }
}

/// Prefer the candidate whose name most closely matches the query.
#[derive(Debug, Default)]
pub struct BestMatch;

impl BestMatch {
    /// Higher is better: exact (2), prefix (1), substring (0)
    fn score(query: &str, candidate: &CompanyRecord) -> u8 {
        let name = candidate.company.trim().to_lowercase();
        if name == query {
            2
        } else if name.starts_with(query) {
            1
        } else {
            0
        }
    }
}

impl DisambiguationStrategy for BestMatch {
    fn name(&self) -> &'static str {
        "best"
    }

    fn select(&self, query: &str, candidates: &[CompanyRecord]) -> Result<usize, CompanyError> {
        let query = query.trim().to_lowercase();

        let mut best: Option<(usize, u8, usize)> = None;
        for (index, candidate) in candidates.iter().enumerate() {
            let score = Self::score(&query, candidate);
            let len = candidate.company.trim().chars().count();
            let better = match best {
                None => true,
                Some((_, best_score, best_len)) => {
                    score > best_score || (score == best_score && len < best_len)
                }
            };
            if better {
                best = Some((index, score, len));
            }
        }

        best.map(|(index, _, _)| index)
            .ok_or_else(|| CompanyError::NotFound(query.to_string()))
    }
}

/// Ask the operator to pick a candidate by number.
pub struct InteractiveSelection {
    prompt: Arc<dyn Prompt>,
}

impl InteractiveSelection {
    pub fn new(prompt: Arc<dyn Prompt>) -> Self {
        Self { prompt }
    }

    fn label(query: &str, candidates: &[CompanyRecord]) -> String {
        let mut label = format!("Several companies match '{}':\n", query);
        for (i, candidate) in candidates.iter().enumerate() {
            label.push_str(&format!("  {}) {}\n", i + 1, candidate.describe()));
        }
        label.push_str(&format!("Select company [1-{}]", candidates.len()));
        label
    }
}

impl DisambiguationStrategy for InteractiveSelection {
    fn name(&self) -> &'static str {
        "interactive"
    }

    fn select(&self, query: &str, candidates: &[CompanyRecord]) -> Result<usize, CompanyError> {
        let input = self.prompt.ask(&Self::label(query, candidates))?;

        match input.trim().parse::<usize>() {
            Ok(n) if (1..=candidates.len()).contains(&n) => Ok(n - 1),
            _ => Err(CompanyError::InvalidSelection {
                query: query.to_string(),
                input,
            }),
        }
    }
}

/// Refuse to guess.
#[derive(Debug, Default)]
pub struct RejectAmbiguous;

impl DisambiguationStrategy for RejectAmbiguous {
    fn name(&self) -> &'static str {
        "reject"
    }

    fn select(&self, query: &str, candidates: &[CompanyRecord]) -> Result<usize, CompanyError> {
        Err(CompanyError::AmbiguousMatch {
            query: query.to_string(),
            count: candidates.len(),
        })
    }
}

/// Build a strategy from its configured name.
///
/// Returns `None` for an unknown name.
pub fn create_strategy(
    name: &str,
    prompt: Arc<dyn Prompt>,
) -> Option<Arc<dyn DisambiguationStrategy>> {
    let strategy: Arc<dyn DisambiguationStrategy> = match name.trim().to_lowercase().as_str() {
        "first" => Arc::new(FirstMatch),
        "best" => Arc::new(BestMatch),
        "interactive" => Arc::new(InteractiveSelection::new(prompt)),
        "reject" => Arc::new(RejectAmbiguous),
        _ => return None,
    };
    Some(strategy)
}
