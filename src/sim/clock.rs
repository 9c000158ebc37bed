use std::ops::Range;

/// Tolerance for deciding whether an hour boundary lies inside a step.
const BOUNDARY_EPS: f64 = 1e-9;

/// One tick of the simulation clock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tick {
    /// Step index, starting at 0.
    pub index: usize,
    /// Simulation time at the start of the step, in hours.
    pub time_hr: f64,
    /// Step length in hours.
    pub step_hours: f64,
}

impl Tick {
    /// Whole hours `h` (since simulation start) with `time_hr <= h < time_hr + step_hours`.
    pub fn hours_started(&self) -> Range<usize> {
        let first = (self.time_hr - BOUNDARY_EPS).ceil().max(0.0) as usize;
        let end = (self.time_hr + self.step_hours - BOUNDARY_EPS).ceil().max(0.0) as usize;
        first..end.max(first)
    }
}

/// A simulation clock that tracks fixed-length steps.
///
/// # Examples
///
/// ```
/// use home_energy_sim::sim::clock::Clock;
///
/// let mut clock = Clock::new(3, 0.5);
/// let mut times = Vec::new();
///
/// clock.run(|tick| times.push(tick.time_hr));
/// assert_eq!(times, vec![0.0, 0.5, 1.0]);
/// ```
pub struct Clock {
    /// Current step of the simulation
    current: usize,
    /// Total steps to run in the simulation
    total: usize,
    step_hours: f64,
}

impl Clock {
    /// Creates a new clock.
    ///
    /// # Arguments
    ///
    /// * `total` - The number of steps the clock will run
    /// * `step_hours` - Length of every step in hours
    pub fn new(total: usize, step_hours: f64) -> Self {
        Self {
            current: 0,
            total,
            step_hours,
        }
    }

    /// Advances the clock by one step.
    ///
    /// Returns `None` once every step has been handed out.
    pub fn tick(&mut self) -> Option<Tick> {
        if self.current < self.total {
            let index = self.current;
            self.current += 1;
            Some(Tick {
                index,
                time_hr: index as f64 * self.step_hours,
                step_hours: self.step_hours,
            })
        } else {
            None
        }
    }

    /// Runs a function for each remaining step.
    pub fn run(&mut self, mut f: impl FnMut(Tick)) {
        while let Some(tick) = self.tick() {
            f(tick);
        }
    }

    /// Runs a fallible function for each remaining step, stopping at the first error.
    ///
    /// # Errors
    ///
    /// Returns the first error produced by `f`.
    pub fn try_run<E>(&mut self, mut f: impl FnMut(Tick) -> Result<(), E>) -> Result<(), E> {
        while let Some(tick) = self.tick() {
            f(tick)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_sequence() {
        let mut clock = Clock::new(3, 1.0);
        assert_eq!(clock.tick().map(|t| t.index), Some(0));
        assert_eq!(clock.tick().map(|t| t.time_hr), Some(1.0));
        assert_eq!(clock.tick().map(|t| t.index), Some(2));
        assert_eq!(clock.tick(), None);
    }

    #[test]
    fn test_zero_steps() {
        let mut clock = Clock::new(0, 1.0);
        let mut count = 0;
        clock.run(|_| count += 1);
        assert_eq!(count, 0);
    }

    #[test]
    fn test_try_run_stops_on_error() {
        let mut clock = Clock::new(5, 1.0);
        let mut seen = Vec::new();
        let result = clock.try_run(|tick| {
            seen.push(tick.index);
            if tick.index == 2 { Err("boom") } else { Ok(()) }
        });
        assert_eq!(result, Err("boom"));
        assert_eq!(seen, vec![0, 1, 2]);
    }

    #[test]
    fn hourly_steps_start_one_hour_each() {
        let mut clock = Clock::new(24, 1.0);
        clock.run(|tick| assert_eq!(tick.hours_started(), tick.index..tick.index + 1));
    }

    #[test]
    fn quarter_hour_steps_start_an_hour_every_fourth_step() {
        let mut clock = Clock::new(8, 0.25);
        let mut started = Vec::new();
        clock.run(|tick| started.extend(tick.hours_started()));
        assert_eq!(started, vec![0, 1]);
    }

    #[test]
    fn long_steps_cover_several_hours() {
        let tick = Tick {
            index: 1,
            time_hr: 3.0,
            step_hours: 3.0,
        };
        assert_eq!(tick.hours_started(), 3..6);
    }

    #[test]
    fn float_noise_does_not_duplicate_hours() {
        let mut clock = Clock::new(30, 0.1);
        let mut started = Vec::new();
        clock.run(|tick| started.extend(tick.hours_started()));
        assert_eq!(started, vec![0, 1, 2]);
    }
}
