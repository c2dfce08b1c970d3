
#[cfg(feature = "simulation")]
mod test_pid_closed_loop {
    use super::fixtures::test_pid::*;

    use pid_pool::pid::{PidConfig, PidParams};
    use pid_pool::pool::PidPool;
    use pid_pool::sim;

    use approx::assert_relative_eq;
    use nalgebra as na;

    const FIXED_STEP_SIZE_MS: u64 = 10;
    const FIXED_STEP_SIZE_S: f64 = FIXED_STEP_SIZE_MS as f64 * 0.001;

    fn plant() -> sim::MassSpringDamper {
        sim::MassSpringDamper {
            natural_frequency: 2.0,
            damping_ratio: 0.7,
        }
    }

    /// Drives a PI controller against a unit-gain second-order plant. The closed loop
    /// s³ + 2.8s² + 12s + 4 is stable, so the integral action removes the steady-state error.
    #[test]
    fn test_pi_tracks_setpoint() {
        let clock = ManualClock::new(0);
        let mut pool: PidPool<&ManualClock, f64, CAPACITY> = PidPool::new(&clock);

        let pid = pool.create(PidConfig::new(PidParams::new(2.0, 1.0, 0.0), 1.0));
        assert!(pool.set_cycle_time(pid, FIXED_STEP_SIZE_MS as u32).is_ok());
        assert!(pool.set_output_limits(pid, -10.0, 10.0).is_ok());

        let mdl = plant();
        let mut state = na::Vector2::<f64>::zeros();
        let mut measured = 0.0;

        for _ in 0..3000usize {
            let control = pool.update(pid, measured).unwrap();
            state = sim::rk4_step(|x| mdl.f(x, control), state, FIXED_STEP_SIZE_S);
            measured = mdl.h(state);

            clock.advance_ms(FIXED_STEP_SIZE_MS);
            assert_eq!(pool.healthy(pid), Ok(true));
        }

        assert_relative_eq!(measured, 1.0, epsilon = 1e-2);
        assert_relative_eq!(state[1], 0.0, epsilon = 1e-2);
    }

    /// Driving the controller at half its configured rate still gets every update accepted,
    /// but the pool reports each missed cycle.
    #[test]
    fn test_missed_cycles_reported() {
        let clock = ManualClock::new(0);
        let mut pool: PidPool<&ManualClock, f64, CAPACITY> = PidPool::new(&clock);

        let pid = pool.create(PidConfig::new(PidParams::new(2.0, 1.0, 0.0), 1.0));
        assert!(pool.set_cycle_time(pid, FIXED_STEP_SIZE_MS as u32).is_ok());

        let mdl = plant();
        let mut state = na::Vector2::<f64>::zeros();

        for i in 0..50usize {
            if i > 0 {
                assert_eq!(pool.healthy(pid), Ok(false));
            }
            let control = pool.update(pid, mdl.h(state)).unwrap();
            assert_eq!(pool.healthy(pid), Ok(true));

            for _ in 0..2 {
                state = sim::rk4_step(|x| mdl.f(x, control), state, FIXED_STEP_SIZE_S);
                clock.advance_ms(FIXED_STEP_SIZE_MS);
            }
        }
    }
}
