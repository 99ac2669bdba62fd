use num::Zero;
use std::fmt;
use std::ops::{Add, AddAssign, Div, DivAssign, Index, IndexMut, Mul, MulAssign, Neg, Sub,
               SubAssign};

#[inline]
pub fn point(x: f64, y: f64, z: f64) -> Point {
    Point::new(x, y, z)
}

/// A point (or displacement) in 3D space.
#[derive(Copy, Clone, PartialEq, PartialOrd, Debug, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point {
    #[inline]
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Point { x: x, y: y, z: z }
    }

    #[inline]
    pub fn from_array(array: [f64; 3]) -> Self {
        Point::new(array[0], array[1], array[2])
    }

    #[inline]
    pub fn to_array(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    #[inline]
    pub fn dot(&self, rhs: &Point) -> f64 {
        self.x * rhs.x + self.y * rhs.y + self.z * rhs.z
    }

    #[inline]
    pub fn cross(&self, rhs: &Point) -> Point {
        Point::new(self.y * rhs.z - self.z * rhs.y,
                   self.z * rhs.x - self.x * rhs.z,
                   self.x * rhs.y - self.y * rhs.x)
    }

    #[inline]
    pub fn squared_norm(&self) -> f64 {
        self.dot(self)
    }

    #[inline]
    pub fn norm(&self) -> f64 {
        self.squared_norm().sqrt()
    }

    /// Unit vector in the same direction; the zero vector stays zero.
    #[inline]
    pub fn normalized(self) -> Point {
        let norm = self.norm();
        if norm == 0.0 { Point::zero() } else { self / norm }
    }

    #[inline]
    pub fn distance(&self, other: &Point) -> f64 {
        (*self - *other).norm()
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// Applies `f` to every coordinate.
    #[inline]
    pub fn map<F: Fn(f64) -> f64>(self, f: F) -> Point {
        Point::new(f(self.x), f(self.y), f(self.z))
    }
}

impl Zero for Point {
    #[inline]
    fn zero() -> Self {
        Point::new(0.0, 0.0, 0.0)
    }

    #[inline]
    fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0 && self.z == 0.0
    }
}

impl From<[f64; 3]> for Point {
    #[inline]
    fn from(array: [f64; 3]) -> Self {
        Point::from_array(array)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {} {}", self.x, self.y, self.z)
    }
}

macro_rules! impl_componentwise_ops {
    ($($op:ident::$method:ident, $op_assign:ident::$method_assign:ident, $sym:tt;)+) => {
        $(
            impl $op<Point> for Point {
                type Output = Point;

                #[inline]
                fn $method(self, rhs: Point) -> Point {
                    Point::new(self.x $sym rhs.x, self.y $sym rhs.y, self.z $sym rhs.z)
                }
            }

            impl $op_assign<Point> for Point {
                #[inline]
                fn $method_assign(&mut self, rhs: Point) {
                    *self = *self $sym rhs;
                }
            }
        )+
    }
}

macro_rules! impl_scalar_ops {
    ($($op:ident::$method:ident, $op_assign:ident::$method_assign:ident, $sym:tt;)+) => {
        $(
            impl $op<f64> for Point {
                type Output = Point;

                #[inline]
                fn $method(self, rhs: f64) -> Point {
                    Point::new(self.x $sym rhs, self.y $sym rhs, self.z $sym rhs)
                }
            }

            impl $op_assign<f64> for Point {
                #[inline]
                fn $method_assign(&mut self, rhs: f64) {
                    *self = *self $sym rhs;
                }
            }
        )+
    }
}

impl_componentwise_ops! {
    Add::add, AddAssign::add_assign, +;
    Sub::sub, SubAssign::sub_assign, -;
}

impl_scalar_ops! {
    Mul::mul, MulAssign::mul_assign, *;
    Div::div, DivAssign::div_assign, /;
}

impl Neg for Point {
    type Output = Point;

    #[inline]
    fn neg(self) -> Point {
        Point::new(-self.x, -self.y, -self.z)
    }
}

impl Index<usize> for Point {
    type Output = f64;

    #[inline]
    fn index(&self, axis: usize) -> &f64 {
        match axis {
            0 => &self.x,
            1 => &self.y,
            2 => &self.z,
            _ => panic!("Point axis out of range: {}", axis),
        }
    }
}

impl IndexMut<usize> for Point {
    #[inline]
    fn index_mut(&mut self, axis: usize) -> &mut f64 {
        match axis {
            0 => &mut self.x,
            1 => &mut self.y,
            2 => &mut self.z,
            _ => panic!("Point axis out of range: {}", axis),
        }
    }
}
