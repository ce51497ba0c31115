//! Recent message positions
//!
//! Messages tied to a world location (a unit under attack, a marker) store
//! that location so the camera can jump between them, newest first.

use std::collections::VecDeque;

/// Positions kept before the oldest is forgotten
pub const MAX_POSITIONS: usize = 10;

#[derive(Debug, Clone, Default)]
pub struct MessagePositions {
    positions: VecDeque<[f32; 3]>,
    cursor: usize,
}

impl MessagePositions {
    /// Add the newest position and restart cycling from it
    pub fn push(&mut self, position: [f32; 3]) {
        if self.positions.len() >= MAX_POSITIONS {
            self.positions.pop_back();
        }
        self.positions.push_front(position);
        self.cursor = 0;
    }

    /// Position under the cursor, then advance (wrapping)
    pub fn advance(&mut self) -> Option<[f32; 3]> {
        let position = *self.positions.get(self.cursor)?;
        self.cursor = (self.cursor + 1) % self.positions.len();
        Some(position)
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}
