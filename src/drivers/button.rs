//! ISR-debounced wall-button driver with short and long press detection.
//!
//! ## Hardware
//!
//! Active-low momentary switch with external pull-up. The GPIO fires on the
//! falling edge; the ISR records the raw timestamp into an atomic, and
//! `tick()` (called from the main loop at control-tick rate) runs the
//! debounce + gesture state machine.
//!
//! | Gesture     | Condition        | Meaning                       |
//! |-------------|------------------|-------------------------------|
//! | Short press | Release < 3s     | Toggle open/close             |
//! | Long press  | Hold >= 3s       | Force a sensor state resync   |

use core::sync::atomic::{AtomicU32, Ordering};

const DEBOUNCE_MS: u32 = 50;
const LONG_PRESS_MS: u32 = 3_000;

/// Raw ISR timestamp (milliseconds since boot, truncated to u32).
/// Written by the ISR, read by the main loop.
static BUTTON_ISR_TIMESTAMP: AtomicU32 = AtomicU32::new(0);

/// Button events emitted after gesture classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonEvent {
    ShortPress,
    LongPress,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GestureState {
    Idle,
    DebounceWait { since_ms: u32 },
    Pressed { since_ms: u32 },
}

pub struct ButtonDriver<F> {
    state: GestureState,
    last_isr_ms: u32,
    /// Samples the physical pin level (true = held down). Injected so the
    /// gesture machine is testable without a GPIO.
    is_pressed: F,
}

impl<F: FnMut() -> bool> ButtonDriver<F> {
    pub fn new(is_pressed: F) -> Self {
        Self {
            state: GestureState::Idle,
            last_isr_ms: 0,
            is_pressed,
        }
    }

    /// Call from the main loop at each control tick.
    /// `now_ms` is the current monotonic time in milliseconds.
    /// Returns a classified gesture event, if any.
    pub fn tick(&mut self, now_ms: u32) -> Option<ButtonEvent> {
        let isr_ms = BUTTON_ISR_TIMESTAMP.load(Ordering::Acquire);
        let new_press = isr_ms != self.last_isr_ms && isr_ms != 0;

        match self.state {
            GestureState::Idle => {
                if new_press {
                    self.last_isr_ms = isr_ms;
                    self.state = GestureState::DebounceWait { since_ms: now_ms };
                }
                None
            }

            GestureState::DebounceWait { since_ms } => {
                if now_ms.wrapping_sub(since_ms) >= DEBOUNCE_MS {
                    // Chatter shorter than the debounce window never makes
                    // it to Pressed; a released pin here was a glitch.
                    if (self.is_pressed)() {
                        self.state = GestureState::Pressed { since_ms };
                    } else {
                        self.state = GestureState::Idle;
                    }
                }
                None
            }

            GestureState::Pressed { since_ms } => {
                let held_ms = now_ms.wrapping_sub(since_ms);

                if held_ms >= LONG_PRESS_MS {
                    self.state = GestureState::Idle;
                    return Some(ButtonEvent::LongPress);
                }

                if !(self.is_pressed)() {
                    self.state = GestureState::Idle;
                    return Some(ButtonEvent::ShortPress);
                }

                None
            }
        }
    }
}

/// ISR handler — register this on the button GPIO falling edge.
/// Safe to call from interrupt context (lock-free atomic store).
pub fn button_isr_handler(now_ms: u32) {
    BUTTON_ISR_TIMESTAMP.store(now_ms, Ordering::Release);
}
