#![recursion_limit = "1024"]

extern crate clap;
#[macro_use]
extern crate error_chain;
extern crate itertools;
#[macro_use]
extern crate log;
extern crate num;
extern crate rand;
extern crate rayon;

pub mod analysis;
pub mod errors;
pub mod math;
pub mod output;
pub mod surface;
pub mod walk;

pub use crate::errors::{Error, ErrorKind, Result};
pub use crate::math::{Interval, Point, ScalarField, SphereField};
pub use crate::surface::{Sampling, Surface};
pub use crate::walk::{simulate, Trajectory, WalkConfig};
