//! Observer and countdown configuration.
//!
//! Every section may override its observer preset through `data-threshold` and
//! `data-root-margin` attributes; anything unparsable keeps the preset.

/// Fraction of a scene section that must be on screen before it animates.
pub const AMBIENT_THRESHOLD: f64 = 0.2;
/// The countdown waits until half of its section is visible.
pub const COUNTDOWN_THRESHOLD: f64 = 0.5;
/// Reveal blocks fade in as soon as a sliver is visible.
pub const REVEAL_THRESHOLD: f64 = 0.15;

#[derive(Clone, Debug, PartialEq)]
pub struct ObserverConfig {
    pub threshold: f64,
    /// CSS offset string handed to the IntersectionObserver, e.g. `"0px 0px -10% 0px"`.
    pub root_margin: String,
}

impl ObserverConfig {
    pub fn new(threshold: f64, root_margin: impl Into<String>) -> Self {
        Self {
            threshold: sanitize_threshold(threshold, AMBIENT_THRESHOLD),
            root_margin: root_margin.into(),
        }
    }

    pub fn ambient() -> Self {
        Self::new(AMBIENT_THRESHOLD, "")
    }

    pub fn countdown() -> Self {
        Self::new(COUNTDOWN_THRESHOLD, "")
    }

    pub fn reveal() -> Self {
        Self::new(REVEAL_THRESHOLD, "0px 0px -10% 0px")
    }

    /// Apply raw `data-*` attribute values on top of this preset.
    pub fn with_overrides(mut self, threshold: Option<&str>, root_margin: Option<&str>) -> Self {
        if let Some(raw) = threshold {
            match raw.trim().parse::<f64>() {
                Ok(value) if value.is_finite() => {
                    self.threshold = sanitize_threshold(value, self.threshold);
                }
                _ => log::warn!("ignoring invalid data-threshold {raw:?}"),
            }
        }
        if let Some(raw) = root_margin {
            if is_css_offset(raw) {
                self.root_margin = raw.trim().to_string();
            } else {
                log::warn!("ignoring invalid data-root-margin {raw:?}");
            }
        }
        self
    }
}

impl Default for ObserverConfig {
    fn default() -> Self {
        Self::ambient()
    }
}

fn sanitize_threshold(value: f64, fallback: f64) -> f64 {
    if value.is_nan() {
        fallback
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// One to four space-separated `px` or `%` lengths, or empty.
fn is_css_offset(raw: &str) -> bool {
    let parts: Vec<&str> = raw.split_whitespace().collect();
    if parts.len() > 4 {
        return false;
    }
    parts.iter().all(|part| {
        let number = part
            .strip_suffix("px")
            .or_else(|| part.strip_suffix('%'))
            .unwrap_or(part);
        match number.parse::<f64>() {
            Ok(value) if value.is_finite() => number != *part || value == 0.0,
            _ => false,
        }
    })
}

/// Timing of the "years of output" countdown.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CountdownConfig {
    /// Wall-clock tick period, independent of the display refresh rate.
    pub period_ms: u32,
    /// The tick on which the sequence stops and the closing message appears.
    pub final_tick: u32,
    /// Number of ticks the legacy battery shows a charge before it fails.
    pub legacy_ticks: u32,
    /// Legacy charge before the first tick, in percent.
    pub legacy_start: u32,
    /// Percent lost on every tick.
    pub legacy_step: u32,
}

impl Default for CountdownConfig {
    fn default() -> Self {
        Self {
            period_ms: 100,
            final_tick: 50,
            legacy_ticks: 3,
            legacy_start: 100,
            legacy_step: 30,
        }
    }
}
