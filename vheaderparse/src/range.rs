//! An inclusive bit range `[msb:lsb]` as written in a port declaration.

use std::fmt;

/// An inclusive range in verilog.
///
/// The direction is inferred from the relation between two ends, so
/// `[0:7]` and `[7:0]` describe the same width.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct BitRange(pub isize, pub isize);

impl BitRange {
    /// The conventional descending range `[width-1:0]`.
    #[inline]
    pub fn from_width(width: usize) -> BitRange {
        BitRange(width as isize - 1, 0)
    }

    /// Number of bits covered, at least 1.
    ///
    /// `None` if the count does not fit in a `usize`.
    #[inline]
    pub fn width(&self) -> Option<usize> {
        self.0.abs_diff(self.1).checked_add(1)
    }
}

impl fmt::Display for BitRange {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[{}:{}]", self.0, self.1)
    }
}

#[test]
fn test_range() {
    assert_eq!(BitRange(-2, 99).width(), Some(102));
    assert_eq!(BitRange(99, -2).width(), Some(102));
    assert_eq!(BitRange(0, 0).width(), Some(1));
    assert_eq!(BitRange(isize::MAX, isize::MIN).width(), None);
    assert_eq!(BitRange(isize::MAX, isize::MIN + 1).width(), Some(usize::MAX));
    assert_eq!(BitRange(7, 0).width(), BitRange(0, 7).width());
    assert_eq!(BitRange::from_width(4), BitRange(3, 0));
    assert_eq!(format!("{}", BitRange::from_width(8)), "[7:0]");
}
