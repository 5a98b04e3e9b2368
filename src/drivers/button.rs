//! Polled button driver with single, double and long press detection.
//!
//! ## Hardware
//!
//! Active-low momentary switch with pull-up on the boot-strap GPIO.  The
//! button task samples the pin every 20 ms and feeds the level into the
//! gesture state machine below.
//!
//! ## Gesture detection
//!
//! | Gesture      | Condition                                   | Result            |
//! |--------------|---------------------------------------------|-------------------|
//! | Single press | Release, no second press within 400 ms      | `PressKind::Single` |
//! | Double press | Second press within 400 ms of the release   | `PressKind::Double` |
//! | Long press   | Held for 1 s                                | `PressKind::Long`   |
//!
//! Each gesture fires once; the button must be released before the next
//! one can start.

use embedded_hal::digital::InputPin;
use log::warn;

use crate::control::inhibit::PressKind;

const DEBOUNCE_MS: u32 = 40;
const LONG_PRESS_MS: u32 = 1000;
const DOUBLE_PRESS_WINDOW_MS: u32 = 400;

/// Internal state machine for gesture detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GestureState {
    Idle,
    Debounce { since_ms: u32 },
    Pressed { since_ms: u32 },
    WaitSecondPress { released_ms: u32 },
    /// Gesture already reported; wait for release.
    WaitRelease,
}

/// Pure gesture classifier.  Feed it the sampled level and a monotonic
/// millisecond timestamp.
pub struct GestureClassifier {
    state: GestureState,
}

impl GestureClassifier {
    pub const fn new() -> Self {
        Self {
            state: GestureState::Idle,
        }
    }

    pub fn poll(&mut self, now_ms: u32, pressed: bool) -> Option<PressKind> {
        let (next, event) = match self.state {
            GestureState::Idle if pressed => (GestureState::Debounce { since_ms: now_ms }, None),
            GestureState::Idle => (GestureState::Idle, None),

            GestureState::Debounce { since_ms } => {
                if !pressed {
                    (GestureState::Idle, None)
                } else if now_ms.wrapping_sub(since_ms) >= DEBOUNCE_MS {
                    (GestureState::Pressed { since_ms }, None)
                } else {
                    (self.state, None)
                }
            }

            GestureState::Pressed { since_ms } => {
                if !pressed {
                    (GestureState::WaitSecondPress { released_ms: now_ms }, None)
                } else if now_ms.wrapping_sub(since_ms) >= LONG_PRESS_MS {
                    (GestureState::WaitRelease, Some(PressKind::Long))
                } else {
                    (self.state, None)
                }
            }

            GestureState::WaitSecondPress { released_ms } => {
                let gap = now_ms.wrapping_sub(released_ms);
                if gap > DOUBLE_PRESS_WINDOW_MS {
                    (GestureState::Idle, Some(PressKind::Single))
                } else if pressed && gap >= DEBOUNCE_MS {
                    (GestureState::WaitRelease, Some(PressKind::Double))
                } else {
                    (self.state, None)
                }
            }

            GestureState::WaitRelease if pressed => (GestureState::WaitRelease, None),
            GestureState::WaitRelease => (GestureState::Idle, None),
        };
        self.state = next;
        event
    }
}

impl Default for GestureClassifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Button on an active-low input pin.
pub struct ButtonDriver<P: InputPin> {
    pin: P,
    classifier: GestureClassifier,
}

impl<P: InputPin> ButtonDriver<P> {
    pub fn new(pin: P) -> Self {
        Self {
            pin,
            classifier: GestureClassifier::new(),
        }
    }

    /// Sample the pin and advance the classifier.  A failed read counts
    /// as released.
    pub fn tick(&mut self, now_ms: u32) -> Option<PressKind> {
        let pressed = match self.pin.is_low() {
            Ok(level) => level,
            Err(e) => {
                warn!("Button: GPIO read failed: {:?}", e);
                false
            }
        };
        self.classifier.poll(now_ms, pressed)
    }
}
