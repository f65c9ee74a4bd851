//! Traffic Light Component
//!
//! A traffic light is an actor that owns its current [`Phase`] and flips it
//! between red and green on a background thread at randomized intervals.
//!
//! # Overview
//!
//! - **Phase ownership**: the phase lives in an [`AtomicPhase`]; only the
//!   cycling thread writes it, any thread may read it
//! - **Randomized timing**: each cycle lasts a uniform draw from a
//!   [`CycleInterval`] (default `[4000ms, 6000ms)`)
//! - **Point-to-point notification**: each transition is pushed onto the
//!   light's [`BlockingQueue`](crate::queue::BlockingQueue);
//!   [`TrafficLight::wait_for_green`] pops until it sees green
//! - **Broadcast notification**: each transition is also published on a
//!   [`PhaseSignal`], which any number of [`PhaseWatcher`]s can wait on
//! - **Clean teardown**: [`TrafficLight::shutdown`] cancels the loop, joins
//!   the thread and unblocks all waiters with `Cancelled`
//!
//! # Timeline
//!
//! ```text
//!  simulate()
//!     │  draw 4.7s          draw 5.2s          draw 4.1s
//!     ├──────────────────▶├──────────────────▶├─────────────▶ ...
//!   red                 green                red
//!                         │ push(green)        │ push(red)
//!                         ▼                    ▼
//!                  wait_for_green() returns   (ignored by waiters)
//! ```

mod cycler;
mod error;
mod interval;
mod phase;
mod signal;

pub mod api;

pub use cycler::{LightConfig, PhaseCycler, PhaseSnapshot, TrafficLight};
pub use error::{LightError, LightResult};
pub use interval::{CycleInterval, DEFAULT_MAX_CYCLE_MS, DEFAULT_MIN_CYCLE_MS};
pub use phase::{AtomicPhase, LightId, Phase};
pub use signal::{PhaseSignal, PhaseWatcher};

#[cfg(test)]
mod tests;
