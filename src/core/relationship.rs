use std::cmp::Reverse;
use std::f64::consts::TAU;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::core::EventRecord;

/// Square, symmetric actor-by-actor interaction counts.
///
/// Rebuilt from scratch for every filtered view; never patched in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipMatrix {
    actors: Vec<String>,
    counts: Vec<Vec<u32>>,
}

impl RelationshipMatrix {
    /// Indexes every distinct actor in first-appearance order and counts each
    /// event with two actors once in both directions.
    pub fn from_events<'a>(events: impl IntoIterator<Item = &'a EventRecord>) -> Self {
        let events: Vec<&EventRecord> = events.into_iter().collect();
        let mut actors: IndexSet<&str> = IndexSet::new();
        for event in &events {
            for actor in [event.actor1.as_deref(), event.actor2.as_deref()]
                .into_iter()
                .flatten()
            {
                if !actor.is_empty() {
                    actors.insert(actor);
                }
            }
        }

        let size = actors.len();
        let mut counts = vec![vec![0_u32; size]; size];
        for event in &events {
            let (Some(first), Some(second)) = (event.actor1.as_deref(), event.actor2.as_deref())
            else {
                continue;
            };
            let (Some(source), Some(target)) =
                (actors.get_index_of(first), actors.get_index_of(second))
            else {
                continue;
            };
            counts[source][target] += 1;
            counts[target][source] += 1;
        }

        Self {
            actors: actors.into_iter().map(str::to_owned).collect(),
            counts,
        }
    }

    /// Drops actors whose row (and therefore column) is all zero.
    #[must_use]
    pub fn pruned(&self) -> Self {
        let keep: Vec<usize> = (0..self.len())
            .filter(|&index| self.counts[index].iter().any(|&count| count != 0))
            .collect();
        Self {
            actors: keep.iter().map(|&index| self.actors[index].clone()).collect(),
            counts: keep
                .iter()
                .map(|&row| keep.iter().map(|&col| self.counts[row][col]).collect())
                .collect(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.actors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }

    #[must_use]
    pub fn actors(&self) -> &[String] {
        &self.actors
    }

    #[must_use]
    pub fn actor(&self, index: usize) -> Option<&str> {
        self.actors.get(index).map(String::as_str)
    }

    #[must_use]
    pub fn index_of(&self, actor: &str) -> Option<usize> {
        self.actors.iter().position(|candidate| candidate == actor)
    }

    #[must_use]
    pub fn count(&self, row: usize, col: usize) -> u32 {
        self.counts
            .get(row)
            .and_then(|cells| cells.get(col))
            .copied()
            .unwrap_or(0)
    }

    #[must_use]
    pub fn row_total(&self, row: usize) -> u64 {
        self.counts
            .get(row)
            .map_or(0, |cells| cells.iter().map(|&count| u64::from(count)).sum())
    }

    #[must_use]
    pub fn rows(&self) -> &[Vec<u32>] {
        &self.counts
    }

    #[must_use]
    pub fn is_symmetric(&self) -> bool {
        (0..self.len()).all(|row| {
            (0..self.len()).all(|col| self.count(row, col) == self.count(col, row))
        })
    }
}

/// Angular extent of one actor on the chord circle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChordGroup {
    pub index: usize,
    pub start_angle: f64,
    pub end_angle: f64,
    pub value: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChordEnd {
    pub index: usize,
    pub start_angle: f64,
    pub end_angle: f64,
}

/// Connection between two actors' subgroups.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChordRibbon {
    pub source: ChordEnd,
    pub target: ChordEnd,
    pub value: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChordLayout {
    pub groups: Vec<ChordGroup>,
    pub ribbons: Vec<ChordRibbon>,
}

/// Lays groups around the circle proportionally to row totals, separated by
/// `pad_angle`; subgroups inside a group are ordered by value descending.
#[must_use]
pub fn chord_layout(matrix: &RelationshipMatrix, pad_angle: f64) -> ChordLayout {
    let size = matrix.len();
    let total: u64 = (0..size).map(|row| matrix.row_total(row)).sum();
    if total == 0 {
        return ChordLayout::default();
    }

    let pad_angle = if pad_angle.is_finite() { pad_angle.max(0.0) } else { 0.0 };
    let radians_per_unit = (TAU - pad_angle * size as f64).max(0.0) / total as f64;

    let mut subgroups = vec![vec![None::<ChordEnd>; size]; size];
    let mut groups = Vec::with_capacity(size);
    let mut cursor = 0.0;
    for row in 0..size {
        let start_angle = cursor;
        let mut order: Vec<usize> = (0..size).collect();
        order.sort_by_key(|&col| (Reverse(matrix.count(row, col)), col));
        for col in order {
            let span = f64::from(matrix.count(row, col)) * radians_per_unit;
            subgroups[row][col] = Some(ChordEnd {
                index: row,
                start_angle: cursor,
                end_angle: cursor + span,
            });
            cursor += span;
        }
        groups.push(ChordGroup {
            index: row,
            start_angle,
            end_angle: cursor,
            value: matrix.row_total(row),
        });
        cursor += pad_angle;
    }

    let mut ribbons = Vec::new();
    for row in 0..size {
        for col in row..size {
            let value = matrix.count(row, col);
            if value == 0 {
                continue;
            }
            if let (Some(source), Some(target)) = (subgroups[row][col], subgroups[col][row]) {
                ribbons.push(ChordRibbon {
                    source,
                    target,
                    value,
                });
            }
        }
    }

    ChordLayout { groups, ribbons }
}

#[cfg(test)]
mod tests {
    use super::{RelationshipMatrix, chord_layout};
    use crate::core::{EventRecord, EventType};

    fn event(id: &str, actor1: Option<&str>, actor2: Option<&str>) -> EventRecord {
        EventRecord {
            id: id.to_owned(),
            year: 2020,
            event_date: None,
            event_type: EventType::Battles,
            location: "Somewhere".to_owned(),
            latitude: 30.0,
            longitude: 40.0,
            fatalities: 1,
            actor1: actor1.map(str::to_owned),
            actor2: actor2.map(str::to_owned),
            notes: None,
        }
    }

    #[test]
    fn counts_mirror_across_the_diagonal() {
        let events = vec![
            event("1", Some("A"), Some("B")),
            event("2", Some("B"), Some("A")),
            event("3", Some("A"), Some("C")),
        ];
        let matrix = RelationshipMatrix::from_events(&events);
        assert_eq!(matrix.actors(), &["A", "B", "C"]);
        assert_eq!(matrix.count(0, 1), 2);
        assert_eq!(matrix.count(1, 0), 2);
        assert_eq!(matrix.count(0, 2), 1);
        assert!(matrix.is_symmetric());
    }

    #[test]
    fn pruning_removes_solo_actors() {
        let events = vec![
            event("1", Some("A"), Some("B")),
            event("2", Some("Lonely"), None),
        ];
        let matrix = RelationshipMatrix::from_events(&events);
        assert_eq!(matrix.len(), 3);
        let pruned = matrix.pruned();
        assert_eq!(pruned.actors(), &["A", "B"]);
        assert_eq!(pruned.count(0, 1), 1);
        assert!(pruned.is_symmetric());
    }

    #[test]
    fn layout_spans_circle_minus_padding() {
        let events = vec![
            event("1", Some("A"), Some("B")),
            event("2", Some("A"), Some("C")),
        ];
        let matrix = RelationshipMatrix::from_events(&events).pruned();
        let layout = chord_layout(&matrix, 0.05);
        assert_eq!(layout.groups.len(), 3);
        assert_eq!(layout.ribbons.len(), 2);
        let covered: f64 = layout
            .groups
            .iter()
            .map(|group| group.end_angle - group.start_angle)
            .sum();
        assert!((covered - (std::f64::consts::TAU - 0.15)).abs() < 1e-9);
        assert!(layout.groups.iter().all(|group| group.end_angle > group.start_angle));
    }

    #[test]
    fn empty_matrix_has_empty_layout() {
        let matrix = RelationshipMatrix::from_events(std::iter::empty());
        assert!(matrix.is_empty());
        assert!(chord_layout(&matrix, 0.05).groups.is_empty());
    }
}
