// Fixed-capacity pool of handle-addressed controllers
// Copyright © 2025 Hs293Go
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the "Software"),
// to deal in the Software without restriction, including without limitation
// the rights to use, copy, modify, merge, publish, distribute, sublicense,
// and/or sell copies of the Software, and to permit persons to whom the
// Software is furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included
// in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES
// OF MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT.
// IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM,
// DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION OF CONTRACT,
// TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE
// OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use core::fmt;

use num_traits::cast::AsPrimitive;
use num_traits::float::FloatCore;

use crate::error::PidError;
use crate::pid::{Controller, OutputLimits, PidConfig, PidParams};
use crate::time::Clock;

/// Capacity of a pool when none is given.
pub const DEFAULT_CAPACITY: usize = 4;

/// An opaque reference to a pool slot.
///
/// A handle is the index of its slot. Indices are reused after deletion, so a handle is only
/// meaningful while the slot it was issued for stays in use: after `delete`, a later `create` may
/// hand out the same value for an unrelated controller.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PidHandle(usize);

impl PidHandle {
    /// Builds a handle from a raw slot index, e.g. one stored by a foreign caller
    pub const fn from_index(index: usize) -> Self {
        Self(index)
    }

    /// The slot index this handle refers to
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for PidHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pid#{}", self.0)
    }
}

/// A fixed array of `N` controller slots, each either free or active, addressed by `PidHandle`.
///
/// The pool owns its clock and reads it whenever an operation depends on the current time. Every
/// operation validates the handle before touching a slot, and validates its arguments before
/// mutating anything, so a failed call leaves the pool unchanged.
///
/// A pool is plain mutable state; wrap it in [`SharedPidPool`](crate::shared::SharedPidPool) to
/// drive it from more than one execution context.
pub struct PidPool<C: Clock, F = f32, const N: usize = DEFAULT_CAPACITY> {
    clock: C,
    slots: [Option<Controller<C::Instant, F>>; N],
}

impl<C, F, const N: usize> PidPool<C, F, N>
where
    C: Clock,
    F: FloatCore + 'static,
    u32: AsPrimitive<F>,
{
    /// The handle returned by `create` when every slot is in use. It never refers to a slot.
    pub const FULL: PidHandle = PidHandle(N);

    /// Creates a pool with every slot free.
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            slots: core::array::from_fn(|_| None),
        }
    }

    /// Number of slots, fixed for the lifetime of the pool.
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Number of slots currently in use.
    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// Returns `true` if `handle` refers to a slot in use.
    pub fn is_active(&self, handle: PidHandle) -> bool {
        self.slot(handle).is_ok()
    }

    /// The clock this pool reads.
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Claims the lowest-indexed free slot and initializes a controller in it.
    ///
    /// The new controller has default output limits and cycle time, zeroed accumulators, and is
    /// due for an update immediately.
    ///
    /// # Returns
    /// - The handle of the claimed slot.
    /// - [`Self::FULL`] if no slot is free. Existing controllers are not affected.
    pub fn create(&mut self, config: PidConfig<F>) -> PidHandle {
        let Some(index) = self.slots.iter().position(Option::is_none) else {
            log::warn!("no free controller slot among {}", N);
            return Self::FULL;
        };

        self.slots[index] = Some(Controller::new(config, self.clock.now()));
        log::debug!("created controller in slot {}", index);
        PidHandle(index)
    }

    /// Frees the slot, discarding the controller's configuration and accumulators.
    pub fn delete(&mut self, handle: PidHandle) -> Result<(), PidError> {
        let slot = self
            .slots
            .get_mut(handle.index())
            .filter(|slot| slot.is_some())
            .ok_or(PidError::Invalid)?;
        *slot = None;
        log::debug!("deleted controller in slot {}", handle.index());
        Ok(())
    }

    /// Replaces the output limits.
    ///
    /// # Returns
    /// - `Err(PidError::InvalidArgument)` unless `min < max`; the previous limits stay in effect.
    pub fn set_output_limits(&mut self, handle: PidHandle, min: F, max: F) -> Result<(), PidError> {
        let controller = self.slot_mut(handle)?;
        controller.set_output_limits(OutputLimits::new(min, max)?);
        log::debug!("{}: output limits updated", handle);
        Ok(())
    }

    /// Replaces the setpoint.
    pub fn set_setpoint(&mut self, handle: PidHandle, setpoint: F) -> Result<(), PidError> {
        self.slot_mut(handle)?.set_setpoint(setpoint);
        Ok(())
    }

    /// Replaces the gains. Accumulators are kept.
    pub fn set_params(&mut self, handle: PidHandle, params: PidParams<F>) -> Result<(), PidError> {
        self.slot_mut(handle)?.set_params(params);
        log::debug!("{}: gains updated", handle);
        Ok(())
    }

    /// Sets the minimum spacing between accepted updates.
    ///
    /// # Returns
    /// - `Err(PidError::InvalidArgument)` if `cycle_time_ms` is zero; the cycle time is unchanged.
    pub fn set_cycle_time(&mut self, handle: PidHandle, cycle_time_ms: u32) -> Result<(), PidError> {
        self.slot_mut(handle)?.set_cycle_time(cycle_time_ms)?;
        log::debug!("{}: cycle time set to {} ms", handle, cycle_time_ms);
        Ok(())
    }

    /// Returns the gains.
    pub fn params(&self, handle: PidHandle) -> Result<PidParams<F>, PidError> {
        self.slot(handle).map(Controller::params)
    }

    /// Returns the cycle time in milliseconds.
    pub fn cycle_time(&self, handle: PidHandle) -> Result<u32, PidError> {
        self.slot(handle).map(Controller::cycle_time_ms)
    }

    /// Returns the setpoint.
    pub fn setpoint(&self, handle: PidHandle) -> Result<F, PidError> {
        self.slot(handle).map(Controller::setpoint)
    }

    /// Returns the output limits.
    pub fn output_limits(&self, handle: PidHandle) -> Result<OutputLimits<F>, PidError> {
        self.slot(handle).map(Controller::output_limits)
    }

    /// Borrows the controller behind `handle` for inspection.
    pub fn controller(&self, handle: PidHandle) -> Result<&Controller<C::Instant, F>, PidError> {
        self.slot(handle)
    }

    /// Runs one cycle of the controller behind `handle` against `measurement`.
    ///
    /// # Returns
    /// - The clamped control output.
    /// - `Err(PidError::NotDue)` if the controller's cycle time has not elapsed since its last
    ///   accepted update. Retry on the next tick.
    pub fn update(&mut self, handle: PidHandle, measurement: F) -> Result<F, PidError> {
        let now = self.clock.now();
        let controller = self.slot_mut(handle)?;
        match controller.update(measurement, now) {
            Ok(output) => {
                log::trace!("{}: update accepted", handle);
                Ok(output)
            }
            Err(e) => {
                log::trace!("{}: update rejected: {:?}", handle, e);
                Err(e)
            }
        }
    }

    /// Returns whether the controller behind `handle` has been updated within its cycle time.
    pub fn healthy(&self, handle: PidHandle) -> Result<bool, PidError> {
        let controller = self.slot(handle)?;
        Ok(controller.healthy(self.clock.now()))
    }

    fn slot(&self, handle: PidHandle) -> Result<&Controller<C::Instant, F>, PidError> {
        self.slots
            .get(handle.index())
            .and_then(Option::as_ref)
            .ok_or(PidError::Invalid)
    }

    fn slot_mut(&mut self, handle: PidHandle) -> Result<&mut Controller<C::Instant, F>, PidError> {
        self.slots
            .get_mut(handle.index())
            .and_then(Option::as_mut)
            .ok_or(PidError::Invalid)
    }
}
