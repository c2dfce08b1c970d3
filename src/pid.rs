// Discrete-time PID law and per-controller state
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

use core::time::Duration;

use num_traits::cast::AsPrimitive;
use num_traits::float::FloatCore;

use crate::error::PidError;
use crate::time::InstantLike;

/// Cycle time assigned to every newly created controller, in milliseconds.
pub const DEFAULT_CYCLE_TIME_MS: u32 = 60;

/// Proportional, integral and derivative gains.
///
/// No sign or range restriction is enforced on any gain.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct PidParams<F> {
    /// Proportional gain
    pub kp: F,
    /// Integral gain, applied to the running sum of `error * dt`
    pub ki: F,
    /// Derivative gain, applied to the backward difference of the error divided by `dt`
    pub kd: F,
}

impl<F> PidParams<F> {
    /// Convenience constructor
    pub fn new(kp: F, ki: F, kd: F) -> Self {
        Self { kp, ki, kd }
    }
}

/// Everything needed to bring a controller up: its gains and its initial setpoint.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct PidConfig<F> {
    /// Gains of the controller
    pub params: PidParams<F>,
    /// Target value for the process measurement
    pub setpoint: F,
}

impl<F> PidConfig<F> {
    /// Convenience constructor
    pub fn new(params: PidParams<F>, setpoint: F) -> Self {
        Self { params, setpoint }
    }
}

/// Bounds applied to the controller output. `min < max` always holds.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct OutputLimits<F> {
    min: F,
    max: F,
}

impl<F: FloatCore> OutputLimits<F> {
    /// Creates a pair of output limits.
    ///
    /// # Returns
    /// - `Err(PidError::InvalidArgument)` unless `min < max`. NaN bounds are rejected as well.
    pub fn new(min: F, max: F) -> Result<Self, PidError> {
        if min < max {
            Ok(Self { min, max })
        } else {
            Err(PidError::InvalidArgument)
        }
    }

    /// Lower output bound
    pub fn min(&self) -> F {
        self.min
    }

    /// Upper output bound
    pub fn max(&self) -> F {
        self.max
    }

    /// Clamps `value` into `[min, max]`
    pub fn clamp(&self, value: F) -> F {
        num_traits::clamp(value, self.min, self.max)
    }
}

impl<F> Default for OutputLimits<F>
where
    F: FloatCore + 'static,
    u32: AsPrimitive<F>,
{
    /// `[0, 255]`, the range of an 8-bit PWM duty cycle
    fn default() -> Self {
        Self {
            min: F::zero(),
            max: 255u32.as_(),
        }
    }
}

/// State of a single PID loop: configuration plus the integral and derivative memory.
///
/// A controller evaluates its control law at most once per cycle time. The integration step used
/// by the law is the configured cycle time, not the measured time between calls, so the caller is
/// expected to drive the controller at (close to) its configured rate. Only the output is clamped;
/// the integral accumulator is never saturated and will wind up under sustained error.
#[derive(Copy, Clone, Debug)]
pub struct Controller<I, F> {
    setpoint: F,
    params: PidParams<F>,
    output_limits: OutputLimits<F>,
    cycle_time_ms: u32,
    integral: F,
    previous_error: F,
    created_at: I,
    creation_lead: Duration,
    last_update: Option<I>,
}

impl<I, F> Controller<I, F>
where
    I: InstantLike,
    F: FloatCore + 'static,
    u32: AsPrimitive<F>,
{
    /// Creates a controller with default output limits and cycle time. The controller is due for
    /// an update immediately.
    pub fn new(config: PidConfig<F>, now: I) -> Self {
        Self {
            setpoint: config.setpoint,
            params: config.params,
            output_limits: OutputLimits::default(),
            cycle_time_ms: DEFAULT_CYCLE_TIME_MS,
            integral: F::zero(),
            previous_error: F::zero(),
            created_at: now,
            creation_lead: Duration::from_millis(u64::from(DEFAULT_CYCLE_TIME_MS)),
            last_update: None,
        }
    }

    /// Returns the setpoint.
    pub fn setpoint(&self) -> F {
        self.setpoint
    }

    /// Returns the gains.
    pub fn params(&self) -> PidParams<F> {
        self.params
    }

    /// Returns the output limits.
    pub fn output_limits(&self) -> OutputLimits<F> {
        self.output_limits
    }

    /// Returns the cycle time in milliseconds.
    pub fn cycle_time_ms(&self) -> u32 {
        self.cycle_time_ms
    }

    /// Returns the cycle time as a `Duration`.
    pub fn cycle_time(&self) -> Duration {
        Duration::from_millis(u64::from(self.cycle_time_ms))
    }

    /// Returns the running sum of `error * dt`.
    pub fn integral(&self) -> F {
        self.integral
    }

    /// Returns the error seen by the last accepted update, or zero before the first one.
    pub fn previous_error(&self) -> F {
        self.previous_error
    }

    /// Returns the instant of the last accepted update, if any.
    pub fn last_update(&self) -> Option<I> {
        self.last_update
    }

    /// Replaces the setpoint. Accumulators are left untouched.
    pub fn set_setpoint(&mut self, setpoint: F) {
        self.setpoint = setpoint;
    }

    /// Replaces the gains. Accumulators are left untouched.
    pub fn set_params(&mut self, params: PidParams<F>) {
        self.params = params;
    }

    /// Replaces the output limits.
    pub fn set_output_limits(&mut self, limits: OutputLimits<F>) {
        self.output_limits = limits;
    }

    /// Sets the cycle time.
    ///
    /// # Returns
    /// - `Err(PidError::InvalidArgument)` if `cycle_time_ms` is zero; the cycle time is unchanged.
    pub fn set_cycle_time(&mut self, cycle_time_ms: u32) -> Result<(), PidError> {
        if cycle_time_ms == 0 {
            return Err(PidError::InvalidArgument);
        }
        self.cycle_time_ms = cycle_time_ms;
        Ok(())
    }

    /// Time elapsed since the last accepted update.
    ///
    /// A controller that has never been updated behaves as if its last update happened one default
    /// cycle before it was created. Changing the cycle time afterwards does not move that instant.
    pub fn elapsed(&self, now: I) -> Duration {
        match self.last_update {
            Some(last) => now.duration_since(last),
            None => now.duration_since(self.created_at) + self.creation_lead,
        }
    }

    /// Returns `true` if the cycle time has elapsed since the last accepted update.
    pub fn is_due(&self, now: I) -> bool {
        self.elapsed(now) >= self.cycle_time()
    }

    /// Returns `true` if the controller was updated within its own cycle time, i.e. the caller has
    /// not missed a cycle.
    pub fn healthy(&self, now: I) -> bool {
        self.elapsed(now) <= self.cycle_time()
    }

    /// Evaluates the control law for one cycle.
    ///
    /// # Arguments
    /// - `measurement`: The current process value.
    /// - `now`: The current time.
    ///
    /// # Returns
    /// - The output, clamped into the output limits.
    /// - `Err(PidError::NotDue)` if called before one cycle time has elapsed since the last
    ///   accepted update. No state is changed in that case.
    ///
    /// The integral accumulator is not saturated, only the output is. A NaN measurement is not
    /// rejected either: it yields a NaN output and leaves NaN in the integral and the previous
    /// error until the controller is deleted and recreated.
    pub fn update(&mut self, measurement: F, now: I) -> Result<F, PidError> {
        if !self.is_due(now) {
            return Err(PidError::NotDue);
        }

        let millis: F = self.cycle_time_ms.as_();
        let per_second: F = 1000u32.as_();
        let dt = millis / per_second;

        let error = self.setpoint - measurement;
        self.integral = self.integral + error * dt;
        let derivative = (error - self.previous_error) / dt;
        self.previous_error = error;

        let raw_output =
            self.params.kp * error + self.params.ki * self.integral + self.params.kd * derivative;
        let output = self.output_limits.clamp(raw_output);

        self.last_update = Some(now);
        Ok(output)
    }
}
