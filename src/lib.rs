#![warn(missing_docs)]

//! # PID Controller Pool
//!
//! This library manages a small, fixed-capacity pool of independent discrete PID
//! (Proportional-Integral-Derivative) controllers, each addressed through an opaque handle.
//!
//! It targets embedded control loops: the pool never allocates, never blocks, and every operation
//! reports failure through an explicit `Result`.
//!
//! ## Features
//!
//! - Fixed capacity chosen at compile time, with handle reuse after deletion.
//! - Discrete-time PID law evaluated at most once per configured cycle time.
//!   - Bounded output (defaults to `[0, 255]`).
//!   - Configurable cycle time (defaults to 60ms): _Calling `update` early is rejected with
//!     `NotDue` and changes nothing_.
//! - A health signal telling the caller whether a controller has missed a cycle.
//! - Injectable monotonic clock for deterministic testing.
//! - A lock-guarded variant of the pool for use from several tasks.
//!
//! The integral term is not saturated; only the output is clamped. Sustained large errors will
//! wind up the integrator.
//!
//! ## Usage
//!
//! ```rust
//! use pid_pool::pid::{PidConfig, PidParams};
//! use pid_pool::pool::PidPool;
//! use pid_pool::time::StdClock;
//!
//! let mut pool: PidPool<StdClock> = PidPool::new(StdClock);
//!
//! let heater = pool.create(PidConfig::new(PidParams::new(2.0, 0.5, 0.0), 21.5));
//! assert!(pool.is_active(heater));
//!
//! pool.set_output_limits(heater, 0.0, 100.0)?;
//!
//! // A fresh controller is due immediately
//! let duty = pool.update(heater, 19.0)?;
//! assert!(duty > 0.0 && duty <= 100.0);
//! assert!(pool.healthy(heater)?);
//!
//! // Later cycles are spaced by the configured cycle time
//! pool.set_cycle_time(heater, 100)?;
//! assert!(pool.update(heater, 19.5).is_err());
//!
//! pool.delete(heater)?;
//! # Ok::<(), pid_pool::error::PidError>(())
//! ```
//!
//! ### Plugging in your clock
//!
//! ``` rust
//! use pid_pool::pid::PidConfig;
//! use pid_pool::pool::PidPool;
//! use pid_pool::time::{Clock, Millis};
//!
//! struct Ticks;
//!
//! impl Clock for Ticks {
//!     type Instant = Millis;
//!
//!     fn now(&self) -> Millis {
//!         Millis(0) // read your hardware timer here
//!     }
//! }
//!
//! let mut pool: PidPool<Ticks, f32, 8> = PidPool::new(Ticks);
//! let pid = pool.create(PidConfig::default());
//! assert_eq!(pool.update(pid, 0.0), Ok(0.0));
//! ```
//!
//! ## License
//!
//! MIT
#![no_std]

#[cfg(feature = "std")]
extern crate std;

/// Error type shared by all operations
pub mod error;

/// The discrete PID law and the state of a single controller
pub mod pid;

/// The fixed-capacity controller pool and its handles
pub mod pool;

/// The pool behind a lock, for callers in several execution contexts
pub mod shared;

/// The module containing time-related utilities to support cycle time handling
pub mod time;

#[doc(hidden)]
#[cfg(feature = "simulation")]
pub mod sim;

#[doc = include_str!("../README.md")]
#[cfg(doctest)]
pub struct ReadmeDoctests;
