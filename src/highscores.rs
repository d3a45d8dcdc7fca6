//! High score leaderboard system
//!
//! Tracks the top 3 scores with Gold/Silver/Bronze badges. The text form is
//! one `name score badge` line per entry.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 3;

/// Rank badge for the top three places
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Badge {
    Gold,
    Silver,
    Bronze,
}

impl Badge {
    /// Badge for a 0-based leaderboard position
    pub fn for_rank(index: usize) -> Option<Self> {
        match index {
            0 => Some(Badge::Gold),
            1 => Some(Badge::Silver),
            2 => Some(Badge::Bronze),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Badge::Gold => "Gold",
            Badge::Silver => "Silver",
            Badge::Bronze => "Bronze",
        }
    }
}

impl FromStr for Badge {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Gold" => Ok(Badge::Gold),
            "Silver" => Ok(Badge::Silver),
            "Bronze" => Ok(Badge::Bronze),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Badge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    /// Player's callsign (no whitespace)
    pub name: String,
    pub score: u64,
    pub badge: Badge,
}

impl ScoreEntry {
    /// `name score badge`, no trailing newline
    pub fn to_line(&self) -> String {
        format!("{} {} {}", self.name, self.score, self.badge)
    }

    /// Parse one stored line. Anything other than exactly three fields with a
    /// numeric score and a known badge is rejected.
    pub fn from_line(line: &str) -> Option<Self> {
        let mut fields = line.split_whitespace();
        let name = fields.next()?;
        let score = fields.next()?.parse().ok()?;
        let badge = fields.next()?.parse().ok()?;
        if fields.next().is_some() {
            return None;
        }
        Some(Self {
            name: name.to_string(),
            score,
            badge,
        })
    }
}

/// Ranks final scores. Implementations may persist the ranking; a failed
/// save must not surface to the caller.
pub trait ScoreStore {
    /// Record a final score and return the ranked top-3 list
    fn submit(&mut self, name: &str, score: u64) -> Vec<ScoreEntry>;

    /// Current ranking, best first
    fn scores(&self) -> &[ScoreEntry];
}

impl<S: ScoreStore + ?Sized> ScoreStore for Box<S> {
    fn submit(&mut self, name: &str, score: u64) -> Vec<ScoreEntry> {
        (**self).submit(name, score)
    }

    fn scores(&self) -> &[ScoreEntry] {
        (**self).scores()
    }
}

/// High score leaderboard (in memory)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HighScores {
    entries: Vec<ScoreEntry>,
}

impl HighScores {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn entries(&self) -> &[ScoreEntry] {
        &self.entries
    }

    /// Check if a score would make the leaderboard
    pub fn qualifies(&self, score: u64) -> bool {
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Add a new score to the leaderboard (if it qualifies).
    /// Returns the rank achieved (1-indexed) or None if it didn't qualify.
    ///
    /// Equal scores keep arrival order: a newcomer goes after existing ties.
    pub fn add_score(&mut self, name: &str, score: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }

        // Find insertion point (sorted descending by score)
        let pos = self
            .entries
            .iter()
            .position(|e| score > e.score)
            .unwrap_or(self.entries.len());
        self.entries.insert(
            pos,
            ScoreEntry {
                name: name.to_string(),
                score,
                badge: Badge::Gold,
            },
        );

        // Trim to max size
        self.entries.truncate(MAX_HIGH_SCORES);
        self.assign_badges();

        Some(pos + 1)
    }

    fn assign_badges(&mut self) {
        for (i, entry) in self.entries.iter_mut().enumerate() {
            if let Some(badge) = Badge::for_rank(i) {
                entry.badge = badge;
            }
        }
    }

    /// Check if the leaderboard is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// Parse the stored text form, skipping malformed lines.
    ///
    /// Stored badges are recomputed from the final order.
    pub fn from_text(text: &str) -> Self {
        let mut scores = Self::new();
        for (n, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match ScoreEntry::from_line(line) {
                Some(entry) => scores.entries.push(entry),
                None => log::warn!("Skipping malformed high score line {}: {:?}", n + 1, line),
            }
        }
        // Stable sort keeps file order among ties
        scores.entries.sort_by(|a, b| b.score.cmp(&a.score));
        scores.entries.truncate(MAX_HIGH_SCORES);
        scores.assign_badges();
        scores
    }

    /// Text form, one newline-terminated line per entry
    pub fn to_text(&self) -> String {
        self.entries
            .iter()
            .map(|e| format!("{}\n", e.to_line()))
            .collect()
    }
}

impl ScoreStore for HighScores {
    fn submit(&mut self, name: &str, score: u64) -> Vec<ScoreEntry> {
        match self.add_score(name, score) {
            Some(rank) => log::info!("{} placed #{} with {}", name, rank, score),
            None => log::info!("{} scored {} (not ranked)", name, score),
        }
        self.entries.clone()
    }

    fn scores(&self) -> &[ScoreEntry] {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_ranking_keeps_top_three() {
        let mut scores = HighScores::new();
        let mut last = Vec::new();
        for s in [10, 50, 30, 90, 20] {
            last = scores.submit("ACE", s);
        }
        let ranked: Vec<_> = last.iter().map(|e| (e.score, e.badge)).collect();
        assert_eq!(
            ranked,
            vec![(90, Badge::Gold), (50, Badge::Silver), (30, Badge::Bronze)]
        );
    }

    #[test]
    fn test_ties_keep_arrival_order() {
        let mut scores = HighScores::new();
        scores.submit("FIRST", 40);
        scores.submit("SECOND", 40);
        assert_eq!(scores.entries()[0].name, "FIRST");
        assert_eq!(scores.entries()[1].name, "SECOND");

        // A later tie with a full board does not displace anyone
        scores.submit("THIRD", 40);
        assert_eq!(scores.submit("FOURTH", 40).len(), 3);
        assert!(scores.entries().iter().all(|e| e.name != "FOURTH"));
    }

    #[test]
    fn test_line_format() {
        let entry = ScoreEntry {
            name: "ACE".into(),
            score: 120,
            badge: Badge::Silver,
        };
        assert_eq!(entry.to_line(), "ACE 120 Silver");
        assert_eq!(ScoreEntry::from_line("ACE 120 Silver"), Some(entry));
    }

    #[test]
    fn test_malformed_lines_skipped() {
        let text = "ACE 300 Gold\n\
                    garbage\n\
                    BOB notanumber Silver\n\
                    CAT 100 Platinum\n\
                    DOG 50 Bronze extra\n\
                    EVE 200 Bronze\n";
        let scores = HighScores::from_text(text);
        let names: Vec<_> = scores.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["ACE", "EVE"]);
        assert_eq!(scores.entries()[1].badge, Badge::Silver);
    }

    #[test]
    fn test_text_is_newline_terminated() {
        let mut scores = HighScores::new();
        scores.submit("ACE", 90);
        scores.submit("BOB", 50);
        assert_eq!(scores.to_text(), "ACE 90 Gold\nBOB 50 Silver\n");
        assert_eq!(HighScores::from_text(&scores.to_text()).entries(), scores.entries());
    }

    #[test]
    fn test_zero_score_accepted_when_room() {
        let mut scores = HighScores::new();
        assert_eq!(scores.add_score("ZED", 0), Some(1));
        assert_eq!(scores.top_score(), Some(0));
    }

    proptest! {
        #[test]
        fn prop_ranking_sorted_and_bounded(submitted in proptest::collection::vec(0u64..1000, 0..30)) {
            let mut scores = HighScores::new();
            for s in &submitted {
                scores.submit("P", *s);
            }
            let entries = scores.entries();
            prop_assert!(entries.len() <= MAX_HIGH_SCORES);
            prop_assert_eq!(entries.len(), submitted.len().min(MAX_HIGH_SCORES));
            prop_assert!(entries.windows(2).all(|w| w[0].score >= w[1].score));

            let mut best = submitted.clone();
            best.sort_unstable_by(|a, b| b.cmp(a));
            best.truncate(MAX_HIGH_SCORES);
            let kept: Vec<u64> = entries.iter().map(|e| e.score).collect();
            prop_assert_eq!(kept, best);
            for (i, e) in entries.iter().enumerate() {
                prop_assert_eq!(Some(e.badge), Badge::for_rank(i));
            }
        }
    }
}
