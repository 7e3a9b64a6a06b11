use serde::Serialize;
use std::fmt;

/// Outfield formations the squad editor offers.
pub const RECOGNISED_FORMATIONS: [(usize, usize, usize); 7] = [
    (3, 4, 3),
    (3, 5, 2),
    (4, 4, 2),
    (4, 3, 3),
    (4, 5, 1),
    (5, 3, 2),
    (5, 4, 1),
];

/// Fallback reported when the squad shape matches no recognised formation.
pub const DEFAULT_FORMATION: Formation = Formation {
    defenders: 3,
    midfielders: 4,
    forwards: 3,
    recognised: false,
};

/// A `DEF-MID-FWD` formation detected from squad group sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Formation {
    pub defenders: usize,
    pub midfielders: usize,
    pub forwards: usize,
    pub recognised: bool,
}

impl Formation {
    pub fn detect(goalkeepers: usize, defenders: usize, midfielders: usize, forwards: usize) -> Self {
        let shape = (defenders, midfielders, forwards);
        if goalkeepers == 1 && RECOGNISED_FORMATIONS.contains(&shape) {
            Formation {
                defenders,
                midfielders,
                forwards,
                recognised: true,
            }
        } else {
            DEFAULT_FORMATION
        }
    }

    /// Players required including the goalkeeper.
    pub fn size(&self) -> usize {
        1 + self.defenders + self.midfielders + self.forwards
    }
}

impl fmt::Display for Formation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.defenders, self.midfielders, self.forwards)
    }
}
