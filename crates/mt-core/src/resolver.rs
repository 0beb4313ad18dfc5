//! Project/service name resolution.

use serde::Serialize;

/// An `(id, name)` pair as listed by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Candidate {
    pub id: u64,
    pub name: String,
}

impl Candidate {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Find the id for `name` among `candidates`.
///
/// A case-insensitive exact match wins. Otherwise the first candidate (in
/// the order given) whose name contains `name` case-insensitively is used.
pub fn resolve(name: &str, candidates: &[Candidate]) -> Option<u64> {
    let needle = name.to_lowercase();

    let exact = candidates
        .iter()
        .find(|c| c.name.to_lowercase() == needle);
    if let Some(candidate) = exact {
        tracing::debug!(query = name, id = candidate.id, "resolved by exact match");
        return Some(candidate.id);
    }

    let partial = candidates
        .iter()
        .find(|c| c.name.to_lowercase().contains(&needle));
    if let Some(candidate) = partial {
        tracing::debug!(
            query = name,
            id = candidate.id,
            matched = %candidate.name,
            "resolved by partial match"
        );
    }
    partial.map(|c| c.id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn acme() -> Vec<Candidate> {
        vec![Candidate::new(1, "Acme Corp"), Candidate::new(2, "Acme Inc")]
    }

    #[test]
    fn exact_match_is_case_insensitive() {
        assert_eq!(resolve("acme corp", &acme()), Some(1));
        assert_eq!(resolve("ACME INC", &acme()), Some(2));
    }

    #[test]
    fn partial_match_takes_first_in_list_order() {
        assert_eq!(resolve("acme", &acme()), Some(1));
        assert_eq!(resolve("inc", &acme()), Some(2));
    }

    #[test]
    fn exact_match_beats_earlier_partial_match() {
        let candidates = vec![
            Candidate::new(10, "Internal Tools"),
            Candidate::new(11, "Tools"),
        ];
        assert_eq!(resolve("tools", &candidates), Some(11));
    }

    #[test]
    fn no_match_returns_none() {
        assert_eq!(resolve("globex", &acme()), None);
        assert_eq!(resolve("acme", &[]), None);
    }
}
