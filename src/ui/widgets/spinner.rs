//! Spinner animation state
//!
//! A handful of classic spinner glyph sets, cycled with `n` while the
//! widget is focused. The frame index lives here; the event loop supplies
//! ticks at whatever interval the current variant asks for.

use std::time::Duration;

pub struct SpinnerVariant {
    pub name: &'static str,
    pub frames: &'static [&'static str],
    pub interval: Duration,
}

pub const SPINNER_VARIANTS: &[SpinnerVariant] = &[
    SpinnerVariant {
        name: "line",
        frames: &["|", "/", "-", "\\"],
        interval: Duration::from_millis(100),
    },
    SpinnerVariant {
        name: "dot",
        frames: &["⣾", "⣽", "⣻", "⢿", "⡿", "⣟", "⣯", "⣷"],
        interval: Duration::from_millis(100),
    },
    SpinnerVariant {
        name: "mini-dot",
        frames: &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"],
        interval: Duration::from_millis(83),
    },
    SpinnerVariant {
        name: "jump",
        frames: &["⢄", "⢂", "⢁", "⡁", "⡈", "⡐", "⡠"],
        interval: Duration::from_millis(100),
    },
    SpinnerVariant {
        name: "pulse",
        frames: &["█", "▓", "▒", "░"],
        interval: Duration::from_millis(125),
    },
    SpinnerVariant {
        name: "points",
        frames: &["∙∙∙", "●∙∙", "∙●∙", "∙∙●"],
        interval: Duration::from_millis(142),
    },
    SpinnerVariant {
        name: "globe",
        frames: &["🌍", "🌎", "🌏"],
        interval: Duration::from_millis(250),
    },
    SpinnerVariant {
        name: "moon",
        frames: &["🌑", "🌒", "🌓", "🌔", "🌕", "🌖", "🌗", "🌘"],
        interval: Duration::from_millis(125),
    },
    SpinnerVariant {
        name: "monkey",
        frames: &["🙈", "🙉", "🙊"],
        interval: Duration::from_millis(333),
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpinnerState {
    variant: usize,
    frame: usize,
    running: bool,
}

impl SpinnerState {
    pub fn new() -> Self {
        Self {
            variant: 0,
            frame: 0,
            running: true,
        }
    }

    pub fn variant_index(&self) -> usize {
        self.variant
    }

    pub fn running(&self) -> bool {
        self.running
    }

    fn variant(&self) -> &'static SpinnerVariant {
        &SPINNER_VARIANTS[self.variant]
    }

    pub fn interval(&self) -> Duration {
        self.variant().interval
    }

    pub fn variant_name(&self) -> &'static str {
        self.variant().name
    }

    pub fn advance(&mut self) {
        if !self.running {
            return;
        }
        self.frame = (self.frame + 1) % self.variant().frames.len();
    }

    /// Move to the next glyph set, wrapping after the last.
    pub fn next_variant(&mut self) {
        self.variant = (self.variant + 1) % SPINNER_VARIANTS.len();
    }

    /// Restart the animation from frame zero. A reset, not a resume.
    pub fn reset(&mut self) {
        self.frame = 0;
        self.running = true;
    }

    pub fn view(&self) -> &'static str {
        self.variant().frames[self.frame]
    }
}

impl Default for SpinnerState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frames_wrap_within_variant() {
        let mut spinner = SpinnerState::new();
        let len = SPINNER_VARIANTS[0].frames.len();
        for _ in 0..len {
            spinner.advance();
        }
        assert_eq!(spinner.view(), SPINNER_VARIANTS[0].frames[0]);
    }

    #[test]
    fn variants_cycle_back_to_start() {
        let mut spinner = SpinnerState::new();
        let start = spinner.variant_index();
        let mut seen = std::collections::HashSet::new();
        for _ in 0..SPINNER_VARIANTS.len() {
            seen.insert(spinner.variant_index());
            spinner.next_variant();
        }
        assert_eq!(seen.len(), SPINNER_VARIANTS.len());
        assert_eq!(spinner.variant_index(), start);
    }

    #[test]
    fn reset_discards_animation_phase() {
        let mut spinner = SpinnerState::new();
        spinner.advance();
        spinner.advance();
        spinner.reset();
        assert_eq!(spinner.view(), SPINNER_VARIANTS[0].frames[0]);
        assert!(spinner.running());
    }
}
