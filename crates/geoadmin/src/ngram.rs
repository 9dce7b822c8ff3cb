//! Approximate name matching over the published n-gram index
//!
//! The index maps character trigrams of normalized alias names to postings
//! of (name id, occurrence count). Similarity is the Sørensen–Dice
//! coefficient over padded trigram multisets: 1.0 for an exact match, down
//! to 0.0 for strings sharing no grams. The index file ships alongside the
//! relation and the pair is verified together, so both sides agree on name
//! ids.

use crate::error::{GeoError, Result};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// Gram width used by the published index
const GRAM_LEN: usize = 3;

/// Sentinels marking the start and end of a name, so that leading and
/// trailing characters weigh like interior ones
const PAD_START: char = '\u{2}';
const PAD_END: char = '\u{3}';

/// Approximate-match index over normalized alias strings
#[derive(Debug, Serialize, Deserialize)]
pub struct NgramIndex {
    /// Total gram count per entry, indexed by name id
    totals: Vec<u32>,
    /// Trigram → (name id, occurrences of the gram in that name)
    postings: HashMap<String, Vec<(u32, u32)>>,
}

/// Padded trigrams of a normalized name
fn grams(name: &str) -> Vec<String> {
    let chars: Vec<char> = std::iter::once(PAD_START)
        .chain(name.chars())
        .chain(std::iter::once(PAD_END))
        .collect();
    chars
        .windows(GRAM_LEN)
        .map(|window| window.iter().collect())
        .collect()
}

impl NgramIndex {
    /// Build an index from `(name id, normalized name)` entries.
    ///
    /// This is the publisher side of the contract; resolvers only
    /// [`load`](Self::load) and [`search`](Self::search).
    pub fn build<'a, I>(entries: I) -> NgramIndex
    where
        I: IntoIterator<Item = (u32, &'a str)>,
    {
        let mut totals = Vec::new();
        let mut postings: HashMap<String, Vec<(u32, u32)>> = HashMap::new();

        for (name_id, name) in entries {
            let name_grams = grams(name);
            if totals.len() <= name_id as usize {
                totals.resize(name_id as usize + 1, 0);
            }
            totals[name_id as usize] = name_grams.len() as u32;

            let mut counts: HashMap<String, u32> = HashMap::new();
            for gram in name_grams {
                *counts.entry(gram).or_default() += 1;
            }
            for (gram, count) in counts {
                postings.entry(gram).or_default().push((name_id, count));
            }
        }

        for list in postings.values_mut() {
            list.sort_unstable();
        }

        NgramIndex { totals, postings }
    }

    /// Load a published index file
    pub fn load(path: impl AsRef<Path>) -> Result<NgramIndex> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(GeoError::not_found(path.display().to_string()));
        }

        let reader = BufReader::new(File::open(path)?);
        bincode::deserialize_from(reader).map_err(|e| {
            GeoError::corrupt(format!("fuzzy index '{}' is unreadable: {e}", path.display()))
        })
    }

    /// Write the index to a file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let writer = BufWriter::new(File::create(path.as_ref())?);
        bincode::serialize_into(writer, self)
            .map_err(|e| GeoError::corrupt(format!("failed to encode fuzzy index: {e}")))?;
        Ok(())
    }

    /// Number of entries the index holds
    pub fn len(&self) -> usize {
        self.totals.len()
    }

    /// Whether the index holds no entries
    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }

    /// Score candidates for `query`, keeping those at or above `threshold`.
    ///
    /// Results are sorted by descending score, ties broken by ascending
    /// name id so the order is deterministic.
    pub fn search(&self, query: &str, threshold: f32) -> Vec<(u32, f32)> {
        let query_grams = grams(query);
        let query_total = query_grams.len() as u32;
        if query_total == 0 {
            return Vec::new();
        }

        let mut query_counts: HashMap<String, u32> = HashMap::new();
        for gram in query_grams {
            *query_counts.entry(gram).or_default() += 1;
        }

        // Multiset intersection size per candidate
        let mut shared: HashMap<u32, u32> = HashMap::new();
        for (gram, query_count) in &query_counts {
            if let Some(list) = self.postings.get(gram) {
                for (name_id, name_count) in list {
                    *shared.entry(*name_id).or_default() += (*query_count).min(*name_count);
                }
            }
        }

        let mut hits: Vec<(u32, f32)> = shared
            .into_iter()
            .filter_map(|(name_id, shared_count)| {
                let total = self.totals.get(name_id as usize).copied().unwrap_or(0);
                if total == 0 {
                    return None;
                }
                let score = 2.0 * shared_count as f32 / (query_total + total) as f32;
                (score >= threshold).then_some((name_id, score))
            })
            .collect();

        hits.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(Ordering::Equal)
                .then(a.0.cmp(&b.0))
        });
        hits
    }
}
