//! Wave/level director
//!
//! Maps (level, wave) to a formation: an ordered list of spawn descriptors
//! built from a named geometric layout and a fixed subtype mix. Generation
//! is pure; the same (level, wave) always yields the same list.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::invader::InvaderKind;

/// Off-screen entry columns
const ENTER_LEFT_X: f32 = -50.0;
const ENTER_RIGHT_X: f32 = 850.0;
const FORMATION_CENTER_X: f32 = 400.0;

/// Waves per authored level; levels past the table repeat the last entry
const WAVES_PER_LEVEL: [u32; 3] = [3, 3, 3];

/// Columns on each side kept by an outline rectangle. Two-column walls
/// put 28 invaders in a 4x10 outline (top and bottom rows of 10, plus two
/// inner rows of 2 + 2); one-column walls would give 24.
const OUTLINE_SIDE_COLUMNS: usize = 2;

/// One invader to spawn
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnDescriptor {
    pub kind: InvaderKind,
    pub start: Vec2,
    pub target: Vec2,
}

/// How subtypes are assigned across a layout's slots
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mix {
    Uniform(InvaderKind),
    /// Alpha on even (row + col), Beta on odd
    Alternating,
    /// Alpha / Beta / Gamma by (row + col) mod 3
    Cycle3,
}

impl Mix {
    fn kind_for(self, row: usize, col: usize) -> InvaderKind {
        match self {
            Mix::Uniform(kind) => kind,
            Mix::Alternating => {
                if (row + col) % 2 == 0 {
                    InvaderKind::Alpha
                } else {
                    InvaderKind::Beta
                }
            }
            Mix::Cycle3 => match (row + col) % 3 {
                0 => InvaderKind::Alpha,
                1 => InvaderKind::Beta,
                _ => InvaderKind::Gamma,
            },
        }
    }
}

/// Named geometric formations
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Layout {
    /// Grid on a 60-unit pitch entering from the left. The outline keeps the top
    /// and bottom rows plus two columns on each side.
    Rectangle { rows: usize, cols: usize, filled: bool },
    /// Rows of 1, 3, 5... centred on x = 400, entering from the right
    Triangle { rows: usize, spacing: f32, top: f32, filled: bool },
    /// Rows growing to the middle then shrinking, entering from the right
    Diamond { rows: usize, spacing: f32, top: f32, filled: bool },
    /// Pairs converging from both sides onto two fixed columns
    MirroredColumns { rows: usize },
    /// Evenly spaced ring, entering from the left at the slot's height
    Circle { count: usize, radius: f32, center: Vec2 },
    /// Columns sliding in from alternating sides
    SlideInColumns { columns: usize, per_column: usize },
}

/// A slot in a layout before a subtype is chosen
struct Slot {
    row: usize,
    col: usize,
    start: Vec2,
    target: Vec2,
}

impl Layout {
    fn slots(&self) -> Vec<Slot> {
        let mut slots = Vec::new();
        match *self {
            Layout::Rectangle { rows, cols, filled } => {
                for row in 0..rows {
                    let y = 50.0 + row as f32 * 60.0;
                    for col in 0..cols {
                        let border = row == 0
                            || row == rows - 1
                            || col < OUTLINE_SIDE_COLUMNS
                            || col >= cols.saturating_sub(OUTLINE_SIDE_COLUMNS);
                        if filled || border {
                            slots.push(Slot {
                                row,
                                col,
                                start: Vec2::new(ENTER_LEFT_X, y),
                                target: Vec2::new(100.0 + col as f32 * 60.0, y),
                            });
                        }
                    }
                }
            }
            Layout::Triangle {
                rows,
                spacing,
                top,
                filled,
            } => {
                for row in 0..rows {
                    let width = 2 * row + 1;
                    let edge_only = !filled && row != rows - 1;
                    push_row(&mut slots, row, width, spacing, top, edge_only);
                }
            }
            Layout::Diamond {
                rows,
                spacing,
                top,
                filled,
            } => {
                let half = rows / 2;
                for row in 0..rows {
                    let width = if row <= half {
                        row * 2 + 1
                    } else {
                        (rows - row - 1) * 2 + 1
                    };
                    push_row(&mut slots, row, width, spacing, top, !filled);
                }
            }
            Layout::MirroredColumns { rows } => {
                for row in 0..rows {
                    let y = 80.0 + row as f32 * 60.0;
                    slots.push(Slot {
                        row,
                        col: 0,
                        start: Vec2::new(ENTER_LEFT_X, y),
                        target: Vec2::new(300.0, y),
                    });
                    slots.push(Slot {
                        row,
                        col: 1,
                        start: Vec2::new(ENTER_RIGHT_X, y),
                        target: Vec2::new(500.0, y),
                    });
                }
            }
            Layout::Circle {
                count,
                radius,
                center,
            } => {
                for i in 0..count {
                    let angle = i as f32 * std::f32::consts::TAU / count as f32;
                    let target = center + Vec2::new(angle.cos(), angle.sin()) * radius;
                    slots.push(Slot {
                        row: 0,
                        col: i,
                        start: Vec2::new(ENTER_LEFT_X, target.y),
                        target,
                    });
                }
            }
            Layout::SlideInColumns {
                columns,
                per_column,
            } => {
                for col in 0..columns {
                    let x = 100.0 + col as f32 * 100.0;
                    let entry_x = if col % 2 == 0 { ENTER_LEFT_X } else { ENTER_RIGHT_X };
                    for row in 0..per_column {
                        let y = 60.0 + row as f32 * 60.0;
                        slots.push(Slot {
                            row,
                            col,
                            start: Vec2::new(entry_x, y),
                            target: Vec2::new(x, y),
                        });
                    }
                }
            }
        }
        slots
    }

    /// Spawn descriptors for this layout with the given subtype mix
    pub fn spawn(&self, mix: Mix) -> Vec<SpawnDescriptor> {
        self.slots()
            .into_iter()
            .map(|slot| SpawnDescriptor {
                kind: mix.kind_for(slot.row, slot.col),
                start: slot.start,
                target: slot.target,
            })
            .collect()
    }
}

/// A centred row entering from the right
fn push_row(slots: &mut Vec<Slot>, row: usize, width: usize, spacing: f32, top: f32, edge_only: bool) {
    let start_x = FORMATION_CENTER_X - (width as f32 / 2.0) * spacing;
    let y = top + row as f32 * spacing;
    for col in 0..width {
        if edge_only && col != 0 && col != width - 1 {
            continue;
        }
        slots.push(Slot {
            row,
            col,
            start: Vec2::new(ENTER_RIGHT_X, y),
            target: Vec2::new(start_x + col as f32 * spacing, y),
        });
    }
}

/// Authored layout and mix for a (level, wave) pair
pub fn wave_plan(level: u32, wave: u32) -> (Layout, Mix) {
    match (level.clamp(1, 3), wave) {
        (1, 1) => (
            Layout::Rectangle {
                rows: 4,
                cols: 10,
                filled: false,
            },
            Mix::Uniform(InvaderKind::Alpha),
        ),
        (1, 2) => (
            Layout::Triangle {
                rows: 5,
                spacing: 60.0,
                top: 50.0,
                filled: false,
            },
            Mix::Uniform(InvaderKind::Alpha),
        ),
        (1, _) => (
            Layout::MirroredColumns { rows: 5 },
            Mix::Uniform(InvaderKind::Alpha),
        ),
        (2, 1) => (
            Layout::Circle {
                count: 18,
                radius: 150.0,
                center: Vec2::new(400.0, 200.0),
            },
            Mix::Alternating,
        ),
        (2, 2) => (
            Layout::Diamond {
                rows: 7,
                spacing: 55.0,
                top: 60.0,
                filled: false,
            },
            Mix::Alternating,
        ),
        (2, _) => (
            Layout::SlideInColumns {
                columns: 5,
                per_column: 4,
            },
            Mix::Uniform(InvaderKind::Beta),
        ),
        (_, 1) => (
            Layout::Rectangle {
                rows: 3,
                cols: 10,
                filled: true,
            },
            Mix::Cycle3,
        ),
        (_, 2) => (
            Layout::Triangle {
                rows: 4,
                spacing: 55.0,
                top: 60.0,
                filled: true,
            },
            Mix::Cycle3,
        ),
        (_, _) => (
            Layout::Diamond {
                rows: 7,
                spacing: 55.0,
                top: 60.0,
                filled: true,
            },
            Mix::Cycle3,
        ),
    }
}

/// Pure formation generator
pub fn formation(level: u32, wave: u32) -> Vec<SpawnDescriptor> {
    let (layout, mix) = wave_plan(level, wave);
    layout.spawn(mix)
}

/// Number of waves in a level
pub fn waves_in_level(level: u32) -> u32 {
    let idx = (level.max(1) as usize - 1).min(WAVES_PER_LEVEL.len() - 1);
    WAVES_PER_LEVEL[idx]
}

/// Level and wave counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaveDirector {
    level: u32,
    wave: u32,
}

impl Default for WaveDirector {
    fn default() -> Self {
        Self::new()
    }
}

impl WaveDirector {
    pub fn new() -> Self {
        Self { level: 1, wave: 1 }
    }

    #[inline]
    pub fn level(&self) -> u32 {
        self.level
    }

    #[inline]
    pub fn wave(&self) -> u32 {
        self.wave
    }

    /// Step to the next wave, rolling over into the next level
    pub fn advance(&mut self) {
        self.wave += 1;
        if self.wave > waves_in_level(self.level) {
            self.wave = 1;
            self.level += 1;
        }
    }

    pub fn current_formation(&self) -> Vec<SpawnDescriptor> {
        formation(self.level, self.wave)
    }

    /// Advance the counters and return the formation to spawn
    pub fn next_formation(&mut self) -> Vec<SpawnDescriptor> {
        self.advance();
        self.current_formation()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn count_kind(formation: &[SpawnDescriptor], kind: InvaderKind) -> usize {
        formation.iter().filter(|d| d.kind == kind).count()
    }

    #[test]
    fn test_first_wave_is_rectangle_outline() {
        let wave = formation(1, 1);
        // Full rows top and bottom, two-column walls on the two inner rows
        assert_eq!(wave.len(), 10 + 10 + 2 * (2 + 2));
        assert_eq!(count_kind(&wave, InvaderKind::Alpha), 28);
        assert!(wave.iter().all(|d| d.start.x == -50.0));
        assert!(wave.iter().all(|d| d.start.y == d.target.y));
        assert_eq!(wave[0].target, Vec2::new(100.0, 50.0));
    }

    #[test]
    fn test_formation_counts() {
        let expected = [
            ((1, 1), 28),
            ((1, 2), 16),
            ((1, 3), 10),
            ((2, 1), 18),
            ((2, 2), 12),
            ((2, 3), 20),
            ((3, 1), 30),
            ((3, 2), 16),
            ((3, 3), 25),
        ];
        for ((level, wave), count) in expected {
            assert_eq!(formation(level, wave).len(), count, "level {} wave {}", level, wave);
        }
    }

    #[test]
    fn test_level_two_mixes_alpha_and_beta() {
        let circle = formation(2, 1);
        assert_eq!(count_kind(&circle, InvaderKind::Alpha), 9);
        assert_eq!(count_kind(&circle, InvaderKind::Beta), 9);
        assert_eq!(circle[0].kind, InvaderKind::Alpha);
        assert_eq!(circle[1].kind, InvaderKind::Beta);

        let columns = formation(2, 3);
        assert_eq!(count_kind(&columns, InvaderKind::Beta), 20);
        assert!(columns.iter().all(|d| d.kind != InvaderKind::Gamma));
    }

    #[test]
    fn test_level_three_cycles_subtypes() {
        let wave = formation(3, 1);
        assert_eq!(count_kind(&wave, InvaderKind::Alpha), 10);
        assert_eq!(count_kind(&wave, InvaderKind::Beta), 10);
        assert_eq!(count_kind(&wave, InvaderKind::Gamma), 10);
        assert_eq!(wave[0].kind, InvaderKind::Alpha);
        assert_eq!(wave[1].kind, InvaderKind::Beta);
        assert_eq!(wave[2].kind, InvaderKind::Gamma);
    }

    #[test]
    fn test_mirrored_columns_converge() {
        let wave = formation(1, 3);
        let left: Vec<_> = wave.iter().filter(|d| d.start.x < 0.0).collect();
        let right: Vec<_> = wave.iter().filter(|d| d.start.x > 800.0).collect();
        assert_eq!(left.len(), 5);
        assert_eq!(right.len(), 5);
        assert!(left.iter().all(|d| d.target.x == 300.0));
        assert!(right.iter().all(|d| d.target.x == 500.0));
    }

    #[test]
    fn test_director_rolls_over_levels() {
        let mut director = WaveDirector::new();
        assert_eq!(director.current_formation().len(), 28);
        let sizes: Vec<_> = (0..5).map(|_| director.next_formation().len()).collect();
        assert_eq!(sizes, vec![16, 10, 18, 12, 20]);
        assert_eq!((director.level(), director.wave()), (2, 3));

        director.advance();
        assert_eq!((director.level(), director.wave()), (3, 1));
    }

    #[test]
    fn test_levels_past_table_repeat_last_level() {
        assert_eq!(waves_in_level(4), 3);
        assert_eq!(waves_in_level(40), 3);
        assert_eq!(formation(4, 1), formation(3, 1));
        assert_eq!(formation(9, 3), formation(3, 3));

        let mut director = WaveDirector { level: 3, wave: 3 };
        director.advance();
        assert_eq!((director.level(), director.wave()), (4, 1));
        assert_eq!(director.current_formation().len(), 30);
    }

    proptest! {
        #[test]
        fn prop_generator_is_pure(level in 1u32..12, wave in 1u32..=3) {
            prop_assert_eq!(formation(level, wave), formation(level, wave));
        }

        #[test]
        fn prop_targets_inside_arena(level in 1u32..12, wave in 1u32..=3) {
            let wave = formation(level, wave);
            prop_assert!(!wave.is_empty());
            for d in &wave {
                prop_assert!(d.target.x >= 0.0 && d.target.x < 800.0);
                prop_assert!(d.target.y >= 0.0 && d.target.y < 600.0);
                prop_assert!(d.start.x < 0.0 || d.start.x > 800.0);
            }
        }
    }
}
