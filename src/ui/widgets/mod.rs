pub mod spinner;
pub mod timer;

pub use spinner::{SpinnerState, SPINNER_VARIANTS};
pub use timer::{TimerState, TIMER_TICK};
