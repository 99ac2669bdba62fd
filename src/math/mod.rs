pub mod interval;
pub mod point;
pub mod scalar_field;

pub use self::interval::{Interval, Nodes};
pub use self::point::{point, Point};
pub use self::scalar_field::{ScalarField, SphereField};
