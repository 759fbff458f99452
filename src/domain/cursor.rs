//! Row cursor - position in the fixed input row list, wrapping at the end.

/// Index into a non-empty row list that cycles forever.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowCursor {
    index: usize,
    len: usize,
}

impl RowCursor {
    /// Cursor at row 0. Returns `None` for an empty row list.
    pub fn new(len: usize) -> Option<Self> {
        (len > 0).then_some(Self { index: 0, len })
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Move to the next row, wrapping from the last row to row 0.
    pub fn advance(&mut self) {
        self.index = (self.index + 1) % self.len;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wraps_to_first_row() {
        let mut cursor = RowCursor::new(3).unwrap();
        cursor.advance();
        cursor.advance();
        assert_eq!(cursor.index(), 2);

        cursor.advance();
        assert_eq!(cursor.index(), 0);
    }

    #[test]
    fn test_single_row_stays_put() {
        let mut cursor = RowCursor::new(1).unwrap();
        cursor.advance();
        assert_eq!(cursor.index(), 0);
    }

    #[test]
    fn test_empty_rejected() {
        assert!(RowCursor::new(0).is_none());
    }
}
