//! Cyclic prev/next navigation across the active record sequence

use serde::{Deserialize, Serialize};

use crate::state::Record;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Prev,
    Next,
}

impl Direction {
    pub fn step(self) -> i64 {
        match self {
            Direction::Prev => -1,
            Direction::Next => 1,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailNavigator {
    index: usize,
}

impl DetailNavigator {
    /// Positions on the first record with `id`, or on index 0 when absent.
    pub fn open(records: &[Record], id: u32) -> Self {
        let index = records
            .iter()
            .position(|record| record.id == id)
            .unwrap_or(0);
        Self { index }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current<'a>(&self, records: &'a [Record]) -> Option<&'a Record> {
        records.get(self.index)
    }

    /// Moves one step with wrap-around. `None` only for an empty sequence.
    pub fn navigate<'a>(
        &mut self,
        records: &'a [Record],
        direction: Direction,
    ) -> Option<&'a Record> {
        if records.is_empty() {
            self.index = 0;
            return None;
        }
        let len = records.len() as i64;
        let next = (self.index as i64 + direction.step()).rem_euclid(len);
        self.index = next as usize;
        records.get(self.index)
    }
}
