use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use crate::errors::{Error, ErrorKind, Result};
use crate::math::{point, Interval, Point, SphereField};
use crate::surface::Surface;

/// Parameters of a random walk simulation on a sphere.
#[derive(Clone, Debug, PartialEq)]
pub struct WalkConfig {
    pub num_walkers: usize,
    pub num_steps: usize,
    pub step_size: f64,
    pub grid_spacing: f64,
    pub center: Point,
    pub radius: f64,
    /// The sampled domain is the cube `[domain_min, domain_max]^3`.
    pub domain_min: f64,
    pub domain_max: f64,
    pub start: Point,
    pub snap: bool,
    /// Record a trajectory position every `log_every` steps.
    pub log_every: usize,
    pub seed: u64,
    pub output_dir: PathBuf,
    pub dump_surface: bool,
}

impl Default for WalkConfig {
    fn default() -> Self {
        WalkConfig {
            num_walkers: 200,
            num_steps: 15000,
            step_size: 0.5,
            grid_spacing: 0.06,
            center: point(5.0, 5.0, 5.0),
            radius: 4.5,
            domain_min: 0.0,
            domain_max: 10.0,
            start: point(5.0, 0.5, 5.0),
            snap: false,
            log_every: 1000,
            seed: 0,
            output_dir: PathBuf::from("."),
            dump_surface: false,
        }
    }
}

impl WalkConfig {
    pub fn validate(&self) -> Result<()> {
        if self.num_walkers == 0 {
            return Err(invalid("the number of walkers must be positive"));
        }
        if self.num_steps == 0 {
            return Err(invalid("the number of steps must be positive"));
        }
        if self.log_every == 0 {
            return Err(invalid("the logging interval must be positive"));
        }
        if !self.step_size.is_finite() || self.step_size <= 0.0 {
            return Err(invalid(format!("step size {} must be finite and positive", self.step_size)));
        }
        if !self.radius.is_finite() || self.radius <= 0.0 {
            return Err(invalid(format!("radius {} must be finite and positive", self.radius)));
        }
        if !self.center.is_finite() {
            return Err(invalid(format!("center {} must be finite", self.center)));
        }
        if !self.start.is_finite() {
            return Err(invalid(format!("start {} must be finite", self.start)));
        }
        if !self.grid_spacing.is_finite() || self.grid_spacing <= 0.0 {
            return Err(ErrorKind::InvalidSpacing(self.grid_spacing).into());
        }
        self.domain().map(|_| ())
    }

    pub fn domain(&self) -> Result<Interval> {
        Interval::new(self.domain_min, self.domain_max)
    }

    pub fn field(&self) -> SphereField {
        SphereField::new(self.center, self.radius)
    }

    /// Samples the configured sphere over the configured domain.
    pub fn build_surface(&self) -> Result<Surface> {
        let domain = self.domain()?;
        Surface::from_field(self.field(), domain, domain, domain, self.grid_spacing)
    }
}

fn invalid<S: Into<String>>(msg: S) -> Error {
    ErrorKind::InvalidConfig(msg.into()).into()
}

/// One of the six axis-aligned unit steps.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Right,
    Left,
    Up,
    Down,
    Forward,
    Backward,
}

pub const DIRECTIONS: [Direction; 6] = [Direction::Right,
                                        Direction::Left,
                                        Direction::Up,
                                        Direction::Down,
                                        Direction::Forward,
                                        Direction::Backward];

impl Direction {
    #[inline]
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        DIRECTIONS[rng.gen_range(0..DIRECTIONS.len())]
    }

    #[inline]
    pub fn offset(&self, step: f64) -> Point {
        match *self {
            Direction::Right => point(step, 0.0, 0.0),
            Direction::Left => point(-step, 0.0, 0.0),
            Direction::Up => point(0.0, step, 0.0),
            Direction::Down => point(0.0, -step, 0.0),
            Direction::Forward => point(0.0, 0.0, step),
            Direction::Backward => point(0.0, 0.0, -step),
        }
    }
}

/// Positions of a walker sampled every `log_every` steps, ending with its
/// final position.
#[derive(Clone, Debug, PartialEq)]
pub struct Trajectory {
    pub walker: usize,
    pub positions: Vec<Point>,
}

impl Trajectory {
    #[inline]
    pub fn final_position(&self) -> Option<&Point> {
        self.positions.last()
    }
}

pub struct Walker {
    position: Point,
}

impl Walker {
    pub fn new(start: Point) -> Self {
        Walker { position: start }
    }

    #[inline]
    pub fn position(&self) -> Point {
        self.position
    }

    /// Moves `step_size` along a random axis, then back onto `surface`.
    pub fn step<R: Rng>(&mut self,
                        surface: &Surface,
                        rng: &mut R,
                        step_size: f64,
                        snap: bool)
                        -> Result<Point> {
        let next = self.position + Direction::random(rng).offset(step_size);
        let mut next = surface.project(next)?;
        if snap {
            next = surface.snap(next)?;
        }
        self.position = next;
        Ok(next)
    }

    pub fn walk<R: Rng>(mut self,
                        index: usize,
                        surface: &Surface,
                        rng: &mut R,
                        config: &WalkConfig)
                        -> Result<Trajectory> {
        let mut positions = Vec::with_capacity(config.num_steps / config.log_every + 2);
        positions.push(self.position);
        for step in 1..config.num_steps + 1 {
            let position = self.step(surface, rng, config.step_size, config.snap)?;
            if step % config.log_every == 0 || step == config.num_steps {
                positions.push(position);
            }
        }
        Ok(Trajectory {
            walker: index,
            positions: positions,
        })
    }
}

/// Runs `config.num_walkers` independent walkers on `surface` in parallel.
///
/// Walker `i` draws from a generator seeded with `config.seed + i`, so the
/// result does not depend on scheduling.
pub fn simulate(surface: &Surface, config: &WalkConfig) -> Result<Vec<Trajectory>> {
    config.validate()?;
    info!("Starting {} walkers for {} steps of size {} (snap: {}).",
          config.num_walkers,
          config.num_steps,
          config.step_size,
          config.snap);

    let time = Instant::now();
    let finished = AtomicUsize::new(0);
    let trajectories = (0..config.num_walkers)
        .into_par_iter()
        .map(|index| -> Result<Trajectory> {
            let mut rng = StdRng::seed_from_u64(config.seed.wrapping_add(index as u64));
            let trajectory = Walker::new(config.start).walk(index, surface, &mut rng, config)?;
            let done = finished.fetch_add(1, Ordering::Relaxed) + 1;
            debug!("Walker {} finished at {:?} ({}/{}).",
                   index,
                   trajectory.final_position(),
                   done,
                   config.num_walkers);
            Ok(trajectory)
        })
        .collect::<Result<Vec<_>>>()?;

    info!("Simulation of {} walkers completed in {:.2}s.",
          trajectories.len(),
          time.elapsed().as_secs_f64());
    Ok(trajectories)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::ScalarField;

    fn small_config() -> WalkConfig {
        WalkConfig {
            num_walkers: 6,
            num_steps: 250,
            grid_spacing: 0.2,
            log_every: 100,
            seed: 7,
            ..WalkConfig::default()
        }
    }

    #[test]
    fn default_config_is_valid() {
        WalkConfig::default().validate().unwrap();
    }

    #[test]
    fn invalid_configs_are_rejected() {
        let bad = vec![WalkConfig { num_walkers: 0, ..WalkConfig::default() },
                       WalkConfig { num_steps: 0, ..WalkConfig::default() },
                       WalkConfig { log_every: 0, ..WalkConfig::default() },
                       WalkConfig { step_size: -0.5, ..WalkConfig::default() },
                       WalkConfig { radius: 0.0, ..WalkConfig::default() },
                       WalkConfig { grid_spacing: 0.0, ..WalkConfig::default() },
                       WalkConfig { domain_max: -1.0, ..WalkConfig::default() }];
        for config in bad {
            assert!(config.validate().is_err(), "{:?}", config);
        }
    }

    #[test]
    fn non_finite_center_and_start_are_rejected() {
        let nan = ::std::f64::NAN;
        let bad = vec![WalkConfig { center: point(nan, 5.0, 5.0), ..WalkConfig::default() },
                       WalkConfig { start: point(nan, 0.0, 0.0), ..WalkConfig::default() },
                       WalkConfig {
                           start: point(5.0, ::std::f64::INFINITY, 5.0),
                           ..WalkConfig::default()
                       }];
        for config in bad {
            let err = config.validate().unwrap_err();
            assert!(matches!(*err.kind(), ErrorKind::InvalidConfig(_)), "{:?}", config);
        }
    }

    #[test]
    fn directions_are_unit_axis_steps() {
        for direction in DIRECTIONS.iter() {
            let offset = direction.offset(0.5);
            assert_eq!(offset.norm(), 0.5);
            assert_eq!(offset.to_array().iter().filter(|&&v| v != 0.0).count(), 1);
        }
    }

    #[test]
    fn all_directions_are_drawn() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut seen = [0usize; 6];
        for _ in 0..6000 {
            let direction = Direction::random(&mut rng);
            let index = DIRECTIONS.iter().position(|&d| d == direction).unwrap();
            seen[index] += 1;
        }
        assert!(seen.iter().all(|&count| count > 800 && count < 1200), "{:?}", seen);
    }

    #[test]
    fn walk_is_reproducible() {
        let config = small_config();
        let surface = config.build_surface().unwrap();
        let first = simulate(&surface, &config).unwrap();
        let second = simulate(&surface, &config).unwrap();
        assert_eq!(first, second);

        let other = simulate(&surface, &WalkConfig { seed: 8, ..config.clone() }).unwrap();
        assert_ne!(first, other);
    }

    #[test]
    fn trajectories_record_every_interval_and_the_end() {
        let config = small_config();
        let surface = config.build_surface().unwrap();
        let trajectories = simulate(&surface, &config).unwrap();
        assert_eq!(trajectories.len(), config.num_walkers);
        for (index, trajectory) in trajectories.iter().enumerate() {
            assert_eq!(trajectory.walker, index);
            // Steps 0, 100, 200 and 250.
            assert_eq!(trajectory.positions.len(), 4);
            assert_eq!(trajectory.positions[0], config.start);
        }
    }

    #[test]
    fn walkers_stay_on_the_sphere() {
        let config = small_config();
        let surface = config.build_surface().unwrap();
        let field = config.field();
        for trajectory in simulate(&surface, &config).unwrap() {
            for position in &trajectory.positions[1..] {
                assert!(field.value_at_point(position).abs() < 1e-4, "{}", position);
            }
        }
    }

    #[test]
    fn snapped_walkers_stay_on_the_lattice() {
        let config = WalkConfig { snap: true, ..small_config() };
        let surface = config.build_surface().unwrap();
        let field = config.field();
        let h = config.grid_spacing;
        for trajectory in simulate(&surface, &config).unwrap() {
            for position in &trajectory.positions[1..] {
                for &v in position.to_array().iter() {
                    assert!((v / h - (v / h).round()).abs() < 1e-9, "{}", position);
                }
                assert!(field.value_at_point(position).abs() <= 3f64.sqrt() / 2.0 * h + 1e-4);
            }
        }
    }

    #[test]
    fn unbound_surface_fails_the_walk() {
        let config = small_config();
        let surface = Surface::from_points(vec![config.start]);
        let err = simulate(&surface, &config).unwrap_err();
        assert!(matches!(*err.kind(), ErrorKind::UnboundField));
    }
}
