//! The memory tape: a row of byte cells that starts as a single zero cell and
//! grows to the right whenever the pointer walks off the end.

/// Growable byte tape with a single data pointer.
///
/// - Cells are `u8` and wrap on increment/decrement.
/// - Moving right past the last cell appends a fresh zero cell.
/// - Moving left from cell 0 is silently ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tape {
    cells: Vec<u8>,
    pointer: usize,
}

impl Default for Tape {
    fn default() -> Self {
        Self::new()
    }
}

impl Tape {
    /// A tape holding one zero cell with the pointer on it.
    pub fn new() -> Self {
        Self {
            cells: vec![0],
            pointer: 0,
        }
    }

    pub fn read(&self) -> u8 {
        self.cells[self.pointer]
    }

    pub fn write(&mut self, value: u8) {
        self.cells[self.pointer] = value;
    }

    /// Value of an arbitrary cell. Indexes the tape has never reached read as 0.
    pub fn cell(&self, index: usize) -> u8 {
        self.cells.get(index).copied().unwrap_or(0)
    }

    pub fn increment(&mut self) -> u8 {
        let after = self.read().wrapping_add(1);
        self.write(after);
        after
    }

    pub fn decrement(&mut self) -> u8 {
        let after = self.read().wrapping_sub(1);
        self.write(after);
        after
    }

    /// Move the pointer one cell right, appending a zero cell if needed.
    pub fn advance(&mut self) {
        self.pointer += 1;
        if self.pointer == self.cells.len() {
            self.cells.push(0);
        }
    }

    /// Move the pointer one cell left. A no-op at cell 0.
    pub fn retreat(&mut self) {
        if self.pointer > 0 {
            self.pointer -= 1;
        }
    }

    pub fn pointer(&self) -> usize {
        self.pointer
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Never true; the tape always holds at least one cell.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cells(&self) -> &[u8] {
        &self.cells
    }
}
