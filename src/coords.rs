use cgmath::Point2;
use num::{NumCast, Zero};
use std::ops::Add;
use winit::dpi::PhysicalSize;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Dimensions<T: Copy> {
	pub w: T,
	pub h: T,
}

impl<T: Copy> From<(T, T)> for Dimensions<T> {
	fn from((w, h): (T, T)) -> Dimensions<T> {
		Dimensions { w, h }
	}
}

impl<T: Copy + NumCast> Dimensions<T> {
	/// `None` when a side doesn't fit in `V`
	pub fn into_dim<V>(self) -> Option<Dimensions<V>>
	where
		V: Copy + NumCast,
	{
		Some(Dimensions { w: num::cast(self.w)?, h: num::cast(self.h)? })
	}
}

macro_rules! into_rect_impl {
	($t:ty, $v: ty) => {
		impl Dimensions<$t> {
			pub fn into_rect(self) -> Option<Rect<$v>> {
				Some(Rect {
					top_left: (<$v>::zero(), <$v>::zero()).into(),
					dims: self.into_dim()?,
				})
			}
		}
	};
}

into_rect_impl!(u32, i32);

macro_rules! dim_to_physical_size {
	($type: ty) => {
		impl From<PhysicalSize<u32>> for Dimensions<$type> {
			fn from(size: PhysicalSize<u32>) -> Dimensions<$type> {
				Dimensions { w: size.width as $type, h: size.height as $type }
			}
		}
	};
}

dim_to_physical_size!(u32);

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect<T: Copy> {
	pub top_left: Point2<T>,
	pub dims: Dimensions<T>,
}
pub type RectF = Rect<f32>;
pub type RectI = Rect<i32>;

impl<T> Rect<T>
where
	T: Copy + Add<Output = T> + PartialOrd,
{
	pub fn new(top_left: Point2<T>, dims: Dimensions<T>) -> Rect<T> {
		Rect { top_left, dims }
	}
	pub fn top(self) -> T {
		self.top_left.y
	}
	pub fn left(self) -> T {
		self.top_left.x
	}
	/// Bottom edge, one past the last row of pixels
	pub fn bottom(self) -> T {
		self.top_left.y + self.dims.h
	}
	/// Right edge, one past the last column of pixels
	pub fn right(self) -> T {
		self.top_left.x + self.dims.w
	}

	/// Half-open containment, used for pixel addressing.
	pub fn contains(self, coords: Point2<T>) -> bool {
		self.left() <= coords.x
			&& coords.x < self.right()
			&& self.top() <= coords.y
			&& coords.y < self.bottom()
	}

	/// Inclusive overlap: two rectangles collide as soon as they share a point,
	/// edges included.
	pub fn collides(self, other: Rect<T>) -> bool {
		self.left() <= other.right()
			&& other.left() <= self.right()
			&& self.top() <= other.bottom()
			&& other.top() <= self.bottom()
	}
}

impl RectI {
	/// Snaps a simulation rectangle to the pixel grid.
	pub fn from_float(rect: RectF) -> RectI {
		Rect {
			top_left: Point2 { x: rect.left().round() as i32, y: rect.top().round() as i32 },
			dims: Dimensions { w: rect.dims.w.round() as i32, h: rect.dims.h.round() as i32 },
		}
	}

	pub fn iter(self) -> IterPointRect {
		IterPointRect::with_rect(self)
	}
}

pub struct IterPointRect {
	current: Point2<i32>,
	rect: RectI,
}

impl IterPointRect {
	fn with_rect(rect: RectI) -> IterPointRect {
		IterPointRect { current: rect.top_left, rect }
	}
}

impl Iterator for IterPointRect {
	type Item = Point2<i32>;
	fn next(&mut self) -> Option<Point2<i32>> {
		let coords = self.current;
		self.current.x += 1;
		if !self.rect.contains(self.current) {
			self.current.x = self.rect.left();
			self.current.y += 1;
		}
		if self.rect.contains(coords) {
			Some(coords)
		} else {
			None
		}
	}
}
