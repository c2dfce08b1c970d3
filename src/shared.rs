// Pool guarded by a single lock for use from several execution contexts
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

use num_traits::cast::AsPrimitive;
use num_traits::float::FloatCore;
use spin::Mutex;

use crate::error::PidError;
use crate::pid::{OutputLimits, PidConfig, PidParams};
use crate::pool::{PidHandle, PidPool, DEFAULT_CAPACITY};
use crate::time::Clock;

/// A [`PidPool`] behind one spin lock.
///
/// Every method takes the lock exactly once and releases it before returning, so slot claiming in
/// `create`, slot reclamation in `delete` and the accumulator update in `update` are each atomic
/// with respect to all other calls. No operation waits while holding the lock.
///
/// The lock spins, so on a single core it must not be taken from an interrupt handler that can
/// preempt a holder; mask that interrupt around calls made from thread context instead.
pub struct SharedPidPool<C: Clock, F = f32, const N: usize = DEFAULT_CAPACITY> {
    inner: Mutex<PidPool<C, F, N>>,
}

impl<C, F, const N: usize> SharedPidPool<C, F, N>
where
    C: Clock,
    F: FloatCore + 'static,
    u32: AsPrimitive<F>,
{
    /// See [`PidPool::FULL`].
    pub const FULL: PidHandle = PidPool::<C, F, N>::FULL;

    /// Creates a shared pool with every slot free.
    pub fn new(clock: C) -> Self {
        Self::from_pool(PidPool::new(clock))
    }

    /// Puts an existing pool behind the lock.
    pub fn from_pool(pool: PidPool<C, F, N>) -> Self {
        Self {
            inner: Mutex::new(pool),
        }
    }

    /// Takes the pool back out, e.g. at shutdown.
    pub fn into_inner(self) -> PidPool<C, F, N> {
        self.inner.into_inner()
    }

    /// Runs `f` with the lock held, for sequences of operations that must not interleave with
    /// other callers, e.g. reconfiguring several controllers at once.
    pub fn with<R>(&self, f: impl FnOnce(&mut PidPool<C, F, N>) -> R) -> R {
        f(&mut self.inner.lock())
    }

    /// See [`PidPool::capacity`].
    pub fn capacity(&self) -> usize {
        N
    }

    /// See [`PidPool::active_count`].
    pub fn active_count(&self) -> usize {
        self.inner.lock().active_count()
    }

    /// See [`PidPool::is_active`].
    pub fn is_active(&self, handle: PidHandle) -> bool {
        self.inner.lock().is_active(handle)
    }

    /// See [`PidPool::create`].
    pub fn create(&self, config: PidConfig<F>) -> PidHandle {
        self.inner.lock().create(config)
    }

    /// See [`PidPool::delete`].
    pub fn delete(&self, handle: PidHandle) -> Result<(), PidError> {
        self.inner.lock().delete(handle)
    }

    /// See [`PidPool::set_output_limits`].
    pub fn set_output_limits(&self, handle: PidHandle, min: F, max: F) -> Result<(), PidError> {
        self.inner.lock().set_output_limits(handle, min, max)
    }

    /// See [`PidPool::set_setpoint`].
    pub fn set_setpoint(&self, handle: PidHandle, setpoint: F) -> Result<(), PidError> {
        self.inner.lock().set_setpoint(handle, setpoint)
    }

    /// See [`PidPool::set_params`].
    pub fn set_params(&self, handle: PidHandle, params: PidParams<F>) -> Result<(), PidError> {
        self.inner.lock().set_params(handle, params)
    }

    /// See [`PidPool::set_cycle_time`].
    pub fn set_cycle_time(&self, handle: PidHandle, cycle_time_ms: u32) -> Result<(), PidError> {
        self.inner.lock().set_cycle_time(handle, cycle_time_ms)
    }

    /// See [`PidPool::params`].
    pub fn params(&self, handle: PidHandle) -> Result<PidParams<F>, PidError> {
        self.inner.lock().params(handle)
    }

    /// See [`PidPool::cycle_time`].
    pub fn cycle_time(&self, handle: PidHandle) -> Result<u32, PidError> {
        self.inner.lock().cycle_time(handle)
    }

    /// See [`PidPool::setpoint`].
    pub fn setpoint(&self, handle: PidHandle) -> Result<F, PidError> {
        self.inner.lock().setpoint(handle)
    }

    /// See [`PidPool::output_limits`].
    pub fn output_limits(&self, handle: PidHandle) -> Result<OutputLimits<F>, PidError> {
        self.inner.lock().output_limits(handle)
    }

    /// See [`PidPool::update`].
    pub fn update(&self, handle: PidHandle, measurement: F) -> Result<F, PidError> {
        self.inner.lock().update(handle, measurement)
    }

    /// See [`PidPool::healthy`].
    pub fn healthy(&self, handle: PidHandle) -> Result<bool, PidError> {
        self.inner.lock().healthy(handle)
    }
}
