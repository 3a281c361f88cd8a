use std::collections::HashSet;

use rand::Rng;
use serde::Serialize;

use crate::error::{Result, TeamDraftError};
use crate::types::{DocumentId, Team};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InterleavedItem {
    pub doc_id: DocumentId,
    pub team: Team,
    pub position: usize,
}

/// One interleaved page plus the team that picked first in each round.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InterleavedResult {
    items: Vec<InterleavedItem>,
    rounds: Vec<Team>,
}

impl InterleavedResult {
    pub fn items(&self) -> &[InterleavedItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// First-picking team of every round that placed at least one result.
    pub fn rounds(&self) -> &[Team] {
        &self.rounds
    }

    pub fn doc_ids(&self) -> Vec<&str> {
        self.items.iter().map(|i| i.doc_id.as_str()).collect()
    }

    /// The subsequence of the page drafted by `team`, in page order.
    pub fn draft(&self, team: Team) -> Vec<&InterleavedItem> {
        self.items.iter().filter(|i| i.team == team).collect()
    }

    pub fn team_a(&self) -> Vec<&InterleavedItem> {
        self.draft(Team::A)
    }

    pub fn team_b(&self) -> Vec<&InterleavedItem> {
        self.draft(Team::B)
    }

    /// Attribute a clicked document to the team that drafted it.
    /// Returns `None` if the doc_id is not on the page.
    pub fn attribute_click(&self, doc_id: &str) -> Option<Team> {
        self.items
            .iter()
            .find(|item| item.doc_id == doc_id)
            .map(|item| item.team)
    }
}

/// Interleave two ranked result lists using the team draft algorithm.
///
/// Every round flips a fair coin (drawn from `rng`) to choose which list
/// picks first; each list then takes its best not-yet-placed result. A round
/// places two results, one, or none once both lists are exhausted. The page
/// stops at `page_size` even mid-round, so the second pick of the last round
/// may be cut.
///
/// # Errors
///
/// [`TeamDraftError::InvalidInput`] if either list is empty or `page_size`
/// is zero.
pub fn team_draft_interleave<'a, S, R>(
    list_a: &'a [S],
    list_b: &'a [S],
    page_size: usize,
    rng: &mut R,
) -> Result<InterleavedResult>
where
    S: AsRef<str>,
    R: Rng + ?Sized,
{
    if list_a.is_empty() || list_b.is_empty() {
        return Err(TeamDraftError::InvalidInput(
            "both ranked lists must be non-empty".to_string(),
        ));
    }
    if page_size == 0 {
        return Err(TeamDraftError::InvalidInput(
            "pageSize must be greater than 0".to_string(),
        ));
    }

    let mut items: Vec<InterleavedItem> = Vec::with_capacity(page_size);
    let mut rounds = Vec::new();
    let mut seen: HashSet<&'a str> = HashSet::with_capacity(page_size);
    let mut ptr_a = 0usize;
    let mut ptr_b = 0usize;

    while items.len() < page_size {
        let first = if rng.gen_bool(0.5) { Team::A } else { Team::B };
        let mut placed = 0;

        for team in [first, first.other()] {
            if items.len() == page_size {
                break;
            }
            let picked = match team {
                Team::A => pick_next(list_a, &mut ptr_a, &seen),
                Team::B => pick_next(list_b, &mut ptr_b, &seen),
            };
            if let Some(doc_id) = picked {
                seen.insert(doc_id);
                items.push(InterleavedItem {
                    doc_id: doc_id.to_string(),
                    team,
                    position: items.len(),
                });
                placed += 1;
            }
        }

        if placed == 0 {
            // Both lists exhausted
            break;
        }
        rounds.push(first);
    }

    Ok(InterleavedResult { items, rounds })
}

/// Advance the pointer past already-placed docs and return the next unseen doc.
fn pick_next<'a, S: AsRef<str>>(
    list: &'a [S],
    ptr: &mut usize,
    seen: &HashSet<&'a str>,
) -> Option<&'a str> {
    while *ptr < list.len() {
        let doc = list[*ptr].as_ref();
        *ptr += 1;
        if !seen.contains(doc) {
            return Some(doc);
        }
    }
    None
}

/// Fraction of rounds in which team A picked first, across many pages.
/// Should sit near 0.5; values far outside indicate a biased coin.
pub fn first_team_a_ratio(results: &[InterleavedResult]) -> f64 {
    let (a_first, total) = results
        .iter()
        .flat_map(|r| r.rounds.iter())
        .fold((0usize, 0usize), |(a, n), team| {
            (a + usize::from(*team == Team::A), n + 1)
        });
    if total == 0 {
        0.5 // neutral default when no data
    } else {
        a_first as f64 / total as f64
    }
}
