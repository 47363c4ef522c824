//! Static and per-session sample series shown on the dashboard cards.
//!
//! Nothing here is fetched: the series are fixed, except the pressure pad,
//! whose 64 tiles are drawn once per session from a seedable RNG.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Number of tiles on the pressure pad (8 × 8).
pub const PAD_TILES: usize = 64;
pub const PAD_SIDE: usize = 8;

pub const GREETING: &str = "Welcome back to your Smart Panel";

/// Lines revealed one after another as the hero scrolls away.
pub const HERO_LINES: [&str; 5] = [
    "Solar generation, live.",
    "Storage at a glance.",
    "Every kWh sent to the grid, tracked.",
    "Footsteps turned into watts.",
    "Your energy, your panel.",
];

/// What a card plots.
#[derive(Debug, Clone, PartialEq)]
pub enum Series {
    /// Continuous reading over time.
    Line { points: Vec<f64> },
    /// One bar per label.
    Bars {
        labels: Vec<&'static str>,
        values: Vec<f64>,
    },
    /// Several named series over the same labels, drawn as grouped bars.
    Compare {
        labels: Vec<&'static str>,
        series: Vec<(&'static str, Vec<f64>)>,
    },
    /// Shares of a whole (rendered as proportional gauges).
    Split {
        labels: Vec<&'static str>,
        values: Vec<f64>,
    },
    /// Sensor pad reading, 0–100 per tile.
    Pad { tiles: Vec<u8> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardCard {
    pub title: &'static str,
    pub unit: &'static str,
    pub series: Series,
}

impl DashboardCard {
    fn new(title: &'static str, unit: &'static str, series: Series) -> Self {
        Self { title, unit, series }
    }

    /// Headline number shown next to the title.
    pub fn headline(&self) -> Option<f64> {
        match &self.series {
            Series::Line { points } => points.last().copied(),
            Series::Bars { values, .. } => {
                (!values.is_empty()).then(|| values.iter().sum::<f64>() / values.len() as f64)
            }
            Series::Compare { series, .. } => series.first().and_then(|(_, v)| v.last().copied()),
            Series::Split { values, .. } => values.first().copied(),
            Series::Pad { tiles } => {
                (!tiles.is_empty()).then(|| tiles.iter().map(|&t| t as f64).sum::<f64>() / tiles.len() as f64)
            }
        }
    }
}

/// Build the session RNG; a fixed seed makes the pad reproducible.
pub fn session_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

pub fn pressure_pad<R: Rng>(rng: &mut R) -> Vec<u8> {
    (0..PAD_TILES).map(|_| rng.gen_range(0..=100)).collect()
}

const WEEKDAYS: [&str; 7] = ["MON", "TUE", "WED", "THU", "FRI", "SAT", "SUN"];

/// Cards inside the managed grid, in grid order.
pub fn grid_cards<R: Rng>(rng: &mut R) -> Vec<DashboardCard> {
    vec![
        DashboardCard::new("Current Power", "kW", Series::Line { points: vec![2.74, 2.74] }),
        DashboardCard::new(
            "Power Today",
            "kWh",
            Series::Line {
                points: vec![0.0, 0.0, 0.0, 0.0, 0.1, 0.5, 1.0, 1.5, 2.0, 2.5, 3.0, 3.5, 4.0],
            },
        ),
        DashboardCard::new(
            "Weekly Average",
            "kWh",
            Series::Bars {
                labels: WEEKDAYS.to_vec(),
                values: vec![3.0, 4.0, 3.5, 5.0, 4.5, 6.0, 5.5],
            },
        ),
        DashboardCard::new(
            "Stored vs Used",
            "kWh",
            Series::Split {
                labels: vec!["Stored", "Used"],
                values: vec![350.0, 250.0],
            },
        ),
        DashboardCard::new(
            "Stored Energy",
            "kWh",
            Series::Line {
                points: vec![300.0, 310.0, 320.0, 310.0, 330.0, 340.0, 350.0],
            },
        ),
        DashboardCard::new("Pressure Pad", "%", Series::Pad { tiles: pressure_pad(rng) }),
    ]
}

/// Cards below the grid, revealed by the visibility toggler.
pub fn loose_cards() -> Vec<DashboardCard> {
    vec![
        DashboardCard::new(
            "Energy Yield",
            "%",
            Series::Split {
                labels: vec!["Stored", "Sent to grid", "System losses"],
                values: vec![35.0, 50.0, 15.0],
            },
        ),
        DashboardCard::new(
            "Energy Consumption",
            "%",
            Series::Split {
                labels: vec!["Self-sufficiency", "From grid", "Export surplus"],
                values: vec![60.0, 30.0, 10.0],
            },
        ),
        DashboardCard::new(
            "Generated vs Consumed",
            "kWh",
            Series::Compare {
                labels: WEEKDAYS.to_vec(),
                series: vec![
                    ("Generated", vec![320.0, 410.0, 380.0, 460.0, 540.0, 490.0, 600.0]),
                    ("Consumed", vec![300.0, 380.0, 350.0, 420.0, 500.0, 450.0, 520.0]),
                ],
            },
        ),
        DashboardCard::new(
            "Achievements",
            "%",
            Series::Bars {
                labels: vec!["Steps", "Energy", "Saved", "CO₂"],
                values: vec![80.0, 75.0, 70.0, 30.0],
            },
        ),
    ]
}
