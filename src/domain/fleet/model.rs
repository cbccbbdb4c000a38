//! The venue's fixed set of reservable tables

use std::collections::BTreeSet;

/// Fixed, finite set of table numbers. Tables have no lifecycle; only their
/// per-slot occupancy varies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableFleet {
    tables: BTreeSet<u32>,
}

impl TableFleet {
    /// Fleet of tables numbered `1..=size`
    pub fn numbered(size: u32) -> Self {
        Self {
            tables: (1..=size).collect(),
        }
    }

    pub fn size(&self) -> u32 {
        self.tables.len() as u32
    }

    pub fn contains(&self, table_number: u32) -> bool {
        self.tables.contains(&table_number)
    }

    /// Tables of the fleet not in `taken`, ascending
    pub fn free(&self, taken: &BTreeSet<u32>) -> Vec<u32> {
        self.tables.difference(taken).copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbered_fleet_starts_at_one() {
        let fleet = TableFleet::numbered(5);
        assert_eq!(fleet.size(), 5);
        assert!(fleet.contains(1));
        assert!(fleet.contains(5));
        assert!(!fleet.contains(0));
        assert!(!fleet.contains(6));
    }

    #[test]
    fn free_is_fleet_minus_taken() {
        let fleet = TableFleet::numbered(5);
        let taken: BTreeSet<u32> = [1, 3].into_iter().collect();
        assert_eq!(fleet.free(&taken), vec![2, 4, 5]);
    }
}
