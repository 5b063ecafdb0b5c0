//! Presentation settings
//!
//! Only affect how the scene is drawn, never the simulation. Read from the
//! page URL on web (`?quality=low&reduced_motion=1`); not persisted.

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Number of parallax stars drawn
    pub fn star_count(&self) -> usize {
        match self {
            QualityPreset::Low => 0,
            QualityPreset::Medium => 40,
            QualityPreset::High => 80,
        }
    }

    /// Whether to render the rolling hills layer
    pub fn hills_enabled(&self) -> bool {
        !matches!(self, QualityPreset::Low)
    }

    /// Whether to render the glow halo behind the sky
    pub fn halo_enabled(&self) -> bool {
        matches!(self, QualityPreset::High)
    }
}

/// Presentation settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,
    /// Diagonal stripes scrolling along the ground
    pub ground_stripes: bool,
    /// Show best score next to the live score
    pub show_best: bool,
    /// Freeze all parallax motion
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,
            ground_stripes: true,
            show_best: true,
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Create settings from a quality preset (applies preset defaults)
    pub fn from_preset(preset: QualityPreset) -> Self {
        let mut settings = Self::default();
        settings.apply_preset(preset);
        settings
    }

    /// Apply a quality preset (updates quality-dependent settings)
    pub fn apply_preset(&mut self, preset: QualityPreset) {
        self.quality = preset;
        if preset == QualityPreset::Low {
            self.ground_stripes = false;
        }
    }

    /// Parse a URL query string. Unknown keys and bad values are ignored.
    pub fn from_query(query: &str) -> Self {
        let mut settings = Self::default();
        for pair in query.trim_start_matches('?').split('&') {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            match key {
                "quality" => match QualityPreset::from_name(value) {
                    Some(preset) => settings.apply_preset(preset),
                    None => log::warn!("Unknown quality preset {:?}", value),
                },
                "reduced_motion" => settings.reduced_motion = is_truthy(value),
                "stripes" => settings.ground_stripes = is_truthy(value),
                "best" => settings.show_best = is_truthy(value),
                _ => {}
            }
        }
        settings
    }

    /// Effective parallax (respects reduced_motion)
    pub fn effective_parallax(&self) -> bool {
        !self.reduced_motion
    }

    /// Effective star count
    pub fn star_count(&self) -> usize {
        self.quality.star_count()
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(value, "" | "1" | "true" | "yes" | "on")
}
