// Instant and clock abstractions used to rate-limit and health-check controllers
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

use core::ops::Add;
use core::time::Duration;

use core::any::Any;
use core::fmt::Debug;

/// A trait for time-like objects that can be used to measure elapsed time.
/// The pool uses this trait to compare the time elapsed since a controller's last accepted update
/// against its cycle time, both to admit updates and to report health.
pub trait InstantLike:
    Sized + Add<Duration, Output = Self> + Clone + Copy + Debug + PartialEq<Self> + Send + Sync + Any
{
    /// Returns the amount of time elapsed from another instant to this one.
    /// Saturates to zero if `earlier` is actually later than `self`.
    #[must_use]
    fn duration_since(&self, earlier: Self) -> Duration;
}

/// A monotonic time source.
///
/// The pool reads its clock once per operation that needs the current time. Inject a manually
/// advanced clock to make controller timing deterministic under test.
pub trait Clock {
    /// The instant type produced by this clock
    type Instant: InstantLike;

    /// Returns the current instant
    fn now(&self) -> Self::Instant;
}

impl<T: Clock + ?Sized> Clock for &T {
    type Instant = T::Instant;

    fn now(&self) -> Self::Instant {
        (**self).now()
    }
}

/// A wrapper around an unsigned 64-bit integer representing milliseconds, e.g. a tick counter
/// from a hardware timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Millis(pub u64);

impl InstantLike for Millis {
    fn duration_since(&self, earlier: Self) -> Duration {
        Duration::from_millis(self.0.saturating_sub(earlier.0))
    }
}

impl Add<Duration> for Millis {
    type Output = Self;

    fn add(self, rhs: Duration) -> Self::Output {
        Millis(self.0.saturating_add(u64::try_from(rhs.as_millis()).unwrap_or(u64::MAX)))
    }
}

/// A wrapper around an unsigned 64-bit integer representing microseconds, e.g. the value of
/// a free-running microsecond timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Micros(pub u64);

impl InstantLike for Micros {
    fn duration_since(&self, earlier: Self) -> Duration {
        Duration::from_micros(self.0.saturating_sub(earlier.0))
    }
}

impl Add<Duration> for Micros {
    type Output = Self;

    fn add(self, rhs: Duration) -> Self::Output {
        Micros(self.0.saturating_add(u64::try_from(rhs.as_micros()).unwrap_or(u64::MAX)))
    }
}

/// A convenient wrapper around `std::time::Instant` satisfying the `InstantLike` trait.
#[cfg(feature = "std")]
mod std_instant {

    use super::{Add, Clock, Duration, InstantLike};

    /// Newtype over `std::time::Instant`
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
    pub struct StdInstant(pub std::time::Instant);

    impl StdInstant {
        /// Reads the current instant from the system's monotonic clock
        pub fn now() -> Self {
            StdInstant(std::time::Instant::now())
        }
    }

    impl InstantLike for StdInstant {
        fn duration_since(&self, other: Self) -> Duration {
            self.0.saturating_duration_since(other.0)
        }
    }

    impl Add<Duration> for StdInstant {
        type Output = Self;

        fn add(self, rhs: Duration) -> Self::Output {
            StdInstant(self.0 + rhs)
        }
    }

    /// The system's monotonic clock
    #[derive(Debug, Clone, Copy, Default)]
    pub struct StdClock;

    impl Clock for StdClock {
        type Instant = StdInstant;

        fn now(&self) -> StdInstant {
            StdInstant::now()
        }
    }

    /// Tests that StdInstant is just one constructor call away from std::time::Instant
    /// and calling duration_since is equivalent to calling the same method on the underlying Instant.
    #[cfg(test)]
    #[test]
    fn test_std_instant_wrapper() {
        let start = StdClock.now();
        let end = StdInstant(std::time::Instant::now());
        let result = end.duration_since(start);
        let expected = end.0.duration_since(start.0);
        assert_eq!(result, expected);

        // Reversed order saturates instead of panicking
        assert_eq!(start.duration_since(end + Duration::from_secs(1)), Duration::ZERO);
    }
}

#[cfg(feature = "std")]
pub use std_instant::{StdClock, StdInstant};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_instants_saturate() {
        assert_eq!(
            Millis(1500).duration_since(Millis(500)),
            Duration::from_millis(1000)
        );
        assert_eq!(Millis(500).duration_since(Millis(1500)), Duration::ZERO);

        assert_eq!(
            Micros(2500).duration_since(Micros(500)),
            Duration::from_micros(2000)
        );
        assert_eq!(Micros(0).duration_since(Micros(1)), Duration::ZERO);
    }

    #[test]
    fn test_add_duration() {
        assert_eq!(Millis(10) + Duration::from_millis(60), Millis(70));
        assert_eq!(Micros(10) + Duration::from_millis(1), Micros(1010));
    }

    #[test]
    fn test_add_duration_saturates() {
        assert_eq!(Millis(u64::MAX - 5) + Duration::from_millis(60), Millis(u64::MAX));
        assert_eq!(Millis(1) + Duration::MAX, Millis(u64::MAX));
        assert_eq!(Micros(u64::MAX) + Duration::from_micros(1), Micros(u64::MAX));
        assert_eq!(Micros(0) + Duration::MAX, Micros(u64::MAX));
    }

    struct Fixed(Millis);

    impl Clock for Fixed {
        type Instant = Millis;

        fn now(&self) -> Millis {
            self.0
        }
    }

    #[test]
    fn test_clock_by_reference() {
        fn read<C: Clock>(clock: C) -> C::Instant {
            clock.now()
        }

        let clock = Fixed(Millis(42));
        assert_eq!(read(&clock), Millis(42));
        assert_eq!(read(&&clock), Millis(42));
    }
}
