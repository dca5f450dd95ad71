//! BayDoor Firmware — Main Entry Point
//!
//! Hexagonal architecture with event-driven execution.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                   Adapters (outer ring)                  │
//! │                                                          │
//! │  HardwareAdapter        LogEventSink     MonotonicClock  │
//! │  (Sensor+Actuator)      (EventSink)      (timestamps)    │
//! │                                                          │
//! │  ────────────── Port Trait Boundary ──────────────       │
//! │                                                          │
//! │  ┌────────────────────────────────────────────────┐      │
//! │  │            DoorService (pure logic)            │      │
//! │  │  resolver · state machine · pulse sequencer    │      │
//! │  └────────────────────────────────────────────────┘      │
//! └──────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use log::{info, warn};

use esp_idf_hal::delay::FreeRtos;
use esp_idf_hal::gpio::{AnyIOPin, InterruptType, PinDriver, Pull};

use baydoor::adapters::hardware::HardwareAdapter;
use baydoor::adapters::log_sink::LogEventSink;
use baydoor::adapters::time::MonotonicClock;
use baydoor::app::commands::DoorCommand;
use baydoor::app::events::DoorEvent;
use baydoor::app::ports::EventSink;
use baydoor::app::service::DoorService;
use baydoor::config::DoorConfig;
use baydoor::door::DoorState;
use baydoor::drivers::button::{button_isr_handler, ButtonDriver, ButtonEvent};
use baydoor::drivers::relay::RelayDriver;
use baydoor::events::{self, push_event, Event};
use baydoor::sensors::LimitSwitches;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  BayDoor v{}                         ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Config ─────────────────────────────────────────────
    let config = DoorConfig::default();
    config.validate().map_err(anyhow::Error::msg)?;

    // ── 3. GPIO setup ─────────────────────────────────────────
    //
    // Pin assignments live in the `pins` module. SAFETY: each GPIO is
    // claimed exactly once, here.
    let clock = MonotonicClock::new();

    let mut top = PinDriver::input(unsafe { AnyIOPin::new(baydoor::pins::LIMIT_OPEN_GPIO) })?;
    top.set_pull(Pull::Up)?;
    top.set_interrupt_type(InterruptType::AnyEdge)?;
    unsafe {
        top.subscribe(|| {
            push_event(Event::LimitEdge);
        })?;
    }
    top.enable_interrupt()?;

    let mut bottom = PinDriver::input(unsafe { AnyIOPin::new(baydoor::pins::LIMIT_CLOSED_GPIO) })?;
    bottom.set_pull(Pull::Up)?;
    bottom.set_interrupt_type(InterruptType::AnyEdge)?;
    unsafe {
        bottom.subscribe(|| {
            push_event(Event::LimitEdge);
        })?;
    }
    bottom.enable_interrupt()?;

    let mut button_pin = PinDriver::input(unsafe { AnyIOPin::new(baydoor::pins::BUTTON_GPIO) })?;
    button_pin.set_pull(Pull::Up)?;
    button_pin.set_interrupt_type(InterruptType::AnyEdge)?;
    unsafe {
        button_pin.subscribe(|| {
            let now = (esp_idf_svc::sys::esp_timer_get_time() / 1_000) as u32;
            button_isr_handler(now);
        })?;
    }
    button_pin.enable_interrupt()?;

    let relay_pin = PinDriver::output(unsafe { AnyIOPin::new(baydoor::pins::RELAY_GPIO) })?;

    // ── 4. Construct adapters ─────────────────────────────────
    let mut hw = HardwareAdapter::new(
        LimitSwitches::new(top, bottom),
        RelayDriver::new(relay_pin, FreeRtos),
    );
    let mut sink = LogEventSink::new();
    let mut button = ButtonDriver::new(move || button_pin.is_low());

    // ── 5. Construct the door service ─────────────────────────
    let mut svc = DoorService::start(config.clone(), &mut hw, &mut sink, clock.now_ms());

    info!("System ready. Entering event loop.");

    // ── 6. Event loop ─────────────────────────────────────────
    //
    // All triggers (limit edges, button gestures, ticks) funnel through
    // the lock-free queue and are handled strictly one at a time, so a
    // pulse sequence in flight can never be interrupted by another
    // command.
    let ticks_per_telemetry =
        (config.telemetry_interval_secs as u64 * 1_000) / config.control_loop_interval_ms as u64;
    let mut tick_counter: u64 = 0;

    loop {
        FreeRtos::delay_ms(config.control_loop_interval_ms);
        push_event(Event::ControlTick);

        tick_counter += 1;
        if tick_counter >= ticks_per_telemetry {
            push_event(Event::TelemetryTick);
            tick_counter = 0;
        }

        events::drain_events(|event| {
            let now_ms = clock.now_ms();
            match event {
                Event::LimitEdge | Event::ControlTick => {
                    if let Err(e) = svc.poll_limits(&mut hw, &mut sink, now_ms) {
                        warn!("limit poll failed: {e}");
                    }
                }

                Event::OpenRequested => {
                    if let Err(e) =
                        svc.handle_command(DoorCommand::RequestOpen, &mut hw, &mut sink, now_ms)
                    {
                        warn!("open refused: {e}");
                    }
                }

                Event::CloseRequested => {
                    if let Err(e) =
                        svc.handle_command(DoorCommand::RequestClose, &mut hw, &mut sink, now_ms)
                    {
                        warn!("close refused: {e}");
                    }
                }

                Event::TelemetryTick => {
                    use baydoor::app::ports::SensorPort;
                    let limits = hw.read_limits().unwrap_or_default();
                    sink.emit(&DoorEvent::Telemetry(svc.telemetry(limits, now_ms)));
                }

                Event::ButtonShortPress => {
                    // Toggle: drive away from where the door is (or is heading).
                    let cmd = match svc.state() {
                        DoorState::Open | DoorState::Opening => DoorCommand::RequestClose,
                        _ => DoorCommand::RequestOpen,
                    };
                    info!("Button: short press → {:?}", cmd);
                    if let Err(e) = svc.handle_command(cmd, &mut hw, &mut sink, now_ms) {
                        warn!("button command refused: {e}");
                    }
                }

                Event::ButtonLongPress => {
                    info!("Button: long press → resync from limit switches");
                    if let Err(e) =
                        svc.handle_command(DoorCommand::SyncState, &mut hw, &mut sink, now_ms)
                    {
                        warn!("resync failed: {e}");
                    }
                }
            }
        });

        // Button gesture detection (runs outside drain_events since it
        // uses its own ISR-fed atomic timestamp).
        let now_ms = clock.now_ms() as u32;
        if let Some(gesture) = button.tick(now_ms) {
            match gesture {
                ButtonEvent::ShortPress => {
                    push_event(Event::ButtonShortPress);
                }
                ButtonEvent::LongPress => {
                    push_event(Event::ButtonLongPress);
                }
            }
        }
    }
}
