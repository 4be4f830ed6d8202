use std::fmt::Display;

use clap::ValueEnum;

pub const DEFAULT_HOUR_HEIGHT: f64 = 60.;
pub const DEFAULT_MIN_HEIGHT_PX: f64 = 40.;
pub const DEFAULT_MIN_DURATION: i64 = 15;

/// How horizontal space is shared between overlapping events.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Default)]
pub enum Packing {
    /// Every event is sized by the events it directly overlaps. Chained overlaps can end up with
    /// different widths inside one cluster. A cluster where two overlapping events would collide
    /// is laid out as [Packing::Cluster].
    #[default]
    Local,
    /// Every event of a cluster gets the width of the whole cluster's lane count.
    Cluster,
}

impl Display for Packing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Packing::Local => write!(f, "local"),
            Packing::Cluster => write!(f, "cluster"),
        }
    }
}

/// Constants of a single layout pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutConfig {
    hour_height: f64,
    min_height_px: f64,
    min_duration: i64,
    packing: Packing,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            hour_height: DEFAULT_HOUR_HEIGHT,
            min_height_px: DEFAULT_MIN_HEIGHT_PX,
            min_duration: DEFAULT_MIN_DURATION,
            packing: Packing::default(),
        }
    }
}

impl LayoutConfig {
    pub fn new_opt(
        hour_height: f64,
        min_height_px: f64,
        min_duration: i64,
        packing: Packing,
    ) -> Option<Self> {
        let valid_height = hour_height.is_finite() && hour_height > 0.;
        let valid_min_height = min_height_px.is_finite() && min_height_px >= 0.;
        // A zero minute event can't be clicked, so at least a minute is required.
        if valid_height && valid_min_height && min_duration > 0 {
            Some(Self {
                hour_height,
                min_height_px,
                min_duration,
                packing,
            })
        } else {
            None
        }
    }

    pub fn with_packing(self, packing: Packing) -> Self {
        Self { packing, ..self }
    }

    pub fn hour_height(&self) -> f64 {
        self.hour_height
    }

    pub fn min_height_px(&self) -> f64 {
        self.min_height_px
    }

    /// Minimal duration of an event in minutes.
    pub fn min_duration(&self) -> i64 {
        self.min_duration
    }

    pub fn packing(&self) -> Packing {
        self.packing
    }

    /// Height of the whole day canvas in pixels.
    pub fn canvas_height(&self) -> f64 {
        24. * self.hour_height
    }

    pub fn minutes_to_px(&self, minutes: i64) -> f64 {
        minutes as f64 / 60. * self.hour_height
    }
}
