use serde::{Deserialize, Serialize};

/// Ascending point thresholds and the title shown for each level.
///
/// Level `n` (1-based) is reached once points meet `thresholds[n - 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelTable {
    #[serde(default = "default_thresholds")]
    pub thresholds: Vec<u64>,
    #[serde(default = "default_titles")]
    pub titles: Vec<String>,
}

fn default_thresholds() -> Vec<u64> {
    vec![0, 500, 1000, 2000, 3500, 5500, 8000]
}

fn default_titles() -> Vec<String> {
    [
        "Người mới bắt đầu",
        "Học viên AI",
        "Người thực hành AI",
        "Chuyên viên AI",
        "Chuyên gia AI",
        "Bậc thầy AI",
        "Huyền thoại AI",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

impl Default for LevelTable {
    fn default() -> Self {
        Self {
            thresholds: default_thresholds(),
            titles: default_titles(),
        }
    }
}

impl LevelTable {
    /// Number of thresholds the points satisfy, i.e. the highest satisfied
    /// index plus one. Zero only when the first threshold is above `points`.
    pub fn level_for(&self, points: u64) -> u32 {
        self.thresholds.iter().take_while(|&&t| points >= t).count() as u32
    }

    pub fn title_for(&self, level: u32) -> String {
        match level {
            0 => String::new(),
            n => self
                .titles
                .get(n as usize - 1)
                .cloned()
                .unwrap_or_else(|| format!("Cấp {n}")),
        }
    }

    /// Points still needed to reach the next level, if there is one.
    pub fn points_to_next(&self, points: u64) -> Option<u64> {
        let level = self.level_for(points) as usize;
        self.thresholds.get(level).map(|t| t - points)
    }

    /// Thresholds must be strictly ascending.
    pub fn is_ascending(&self) -> bool {
        self.thresholds.windows(2).all(|w| w[0] < w[1])
    }
}
