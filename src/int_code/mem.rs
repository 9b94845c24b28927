use std::collections::BTreeMap;

/// Cells below this address live in the dense tape, unless the image itself is longer.
const DENSE_LIMIT: usize = 1 << 20;

/// Memory tape of an intcode process.
///
/// Cells past the end read as zero. Writing past the end grows the dense tape, filling the gap
/// with zeros, so relative addressing may reach any non-negative address. Writes at or beyond
/// `DENSE_LIMIT` go to a sparse map instead of growing the tape. Memory never shrinks.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Memory {
    cells: Vec<i64>,
    far_cells: BTreeMap<usize, i64>,
}

impl Memory {
    pub fn new(image: &[i64]) -> Self {
        Self {
            cells: Vec::from(image),
            far_cells: BTreeMap::new(),
        }
    }

    pub fn read(&self, ind: usize) -> i64 {
        match self.cells.get(ind) {
            Some(&value) => value,
            None => self.far_cells.get(&ind).copied().unwrap_or(0),
        }
    }

    pub fn write(&mut self, ind: usize, value: i64) {
        if ind < self.cells.len() {
            self.cells[ind] = value;
        } else if ind < DENSE_LIMIT {
            self.cells.resize(ind + 1, 0);
            self.cells[ind] = value;
        } else {
            self.far_cells.insert(ind, value);
        }
    }

    /// The dense part of memory, starting at address 0.
    pub fn as_slice(&self) -> &[i64] {
        &self.cells
    }

    /// Cells written beyond the dense part, in address order.
    pub fn far_cells(&self) -> impl Iterator<Item = (usize, i64)> + '_ {
        self.far_cells.iter().map(|(&ind, &value)| (ind, value))
    }
}

