use anyhow::{Context, Result};
use cgmath::{Point2, Vector2};
use image::{DynamicImage, GenericImageView, ImageFormat};
use pixels::{Pixels, SurfaceTexture};
use std::ops::Range;
use winit::dpi::PhysicalSize;
use winit::event_loop::ActiveEventLoop;
use winit::window::Window;

use crate::coords::{Dimensions, Rect, RectI};
use crate::session::Phase;
use crate::world::{World, ROUND};

struct DrawConstants {
	title: &'static str,
	/// Font cells are upscaled by this factor
	text_scale: i32,
	line_width: i32,
	score_pos: Point2<i32>,
	lost_lines_y: [i32; 2],
}

const DRAW_CONSTANTS: DrawConstants = DrawConstants {
	title: "Simple Runner Game",
	text_scale: 4,
	line_width: 3,
	score_pos: Point2 { x: 10, y: 10 },
	lost_lines_y: [200 - 40, 200 + 10],
};

const GLYPH: Dimensions<i32> = Dimensions { w: 4, h: 6 };

struct ColorPalette {
	bg: [u8; 4],
	fg: [u8; 4],
	lost_overlay: [u8; 4],
	error_overlay: [u8; 4],
}

const COLORS: ColorPalette = ColorPalette {
	bg: [0xff, 0xff, 0xff, 0xff],
	fg: [0x00, 0x00, 0x00, 0xff],
	lost_overlay: [0xff, 0xff, 0xff, 200],
	error_overlay: [0xff, 0xc8, 0xc8, 220],
};

pub struct Sheets {
	font: DynamicImage,
}

impl Sheets {
	pub fn load() -> Result<Self> {
		const FONT_FILE: &[u8] = include_bytes!("../assets/font.png");
		let font = image::load_from_memory_with_format(FONT_FILE, ImageFormat::Png)
			.context("could not decode the font sheet")?;
		Ok(Sheets { font })
	}
}

pub fn conv_srgb_to_linear(x: f64) -> f64 {
	// See https://github.com/gfx-rs/wgpu/issues/2326
	if x > 0.04045 {
		((x + 0.055) / 1.055).powf(2.4)
	} else {
		x / 12.92
	}
}

pub fn create_window(event_loop: &ActiveEventLoop) -> Result<Window> {
	let win_size = PhysicalSize::new(ROUND.playfield.w as u32, ROUND.playfield.h as u32);
	let attributes = Window::default_attributes()
		.with_title(DRAW_CONSTANTS.title)
		.with_inner_size(win_size)
		.with_resizable(false);
	event_loop
		.create_window(attributes)
		.context("could not create the window")
}

pub struct FrameBuffer {
	pub buffer: Pixels,
	pub dims: Dimensions<u32>,
}

impl FrameBuffer {
	/// The buffer keeps the playfield size, the surface stretches it if the
	/// window manager hands us something else.
	pub fn new(window: &Window) -> Result<Self> {
		let dims = Dimensions { w: ROUND.playfield.w as u32, h: ROUND.playfield.h as u32 };
		let surface_dims: Dimensions<u32> = window.inner_size().into();
		let bg_color_wgpu = pixels::wgpu::Color {
			r: conv_srgb_to_linear(COLORS.bg[0] as f64 / 255.0),
			g: conv_srgb_to_linear(COLORS.bg[1] as f64 / 255.0),
			b: conv_srgb_to_linear(COLORS.bg[2] as f64 / 255.0),
			a: conv_srgb_to_linear(COLORS.bg[3] as f64 / 255.0),
		};
		let surface_texture = SurfaceTexture::new(surface_dims.w, surface_dims.h, window);
		let buffer = pixels::PixelsBuilder::new(dims.w, dims.h, surface_texture)
			.clear_color(bg_color_wgpu)
			.build()
			.context("could not create the pixel surface")?;
		Ok(FrameBuffer { buffer, dims })
	}

	pub fn resize_surface(&mut self, size: PhysicalSize<u32>) -> Result<()> {
		self
			.buffer
			.resize_surface(size.width, size.height)
			.context("could not resize the surface")
	}

	pub fn canvas(&mut self) -> Canvas<'_> {
		Canvas { frame: self.buffer.frame_mut(), dims: self.dims }
	}

	pub fn render(&self) -> Result<()> {
		self.buffer.render().context("could not present the frame")
	}
}

/// RGBA8 pixels, row-major.
pub struct Canvas<'a> {
	pub frame: &'a mut [u8],
	pub dims: Dimensions<u32>,
}

macro_rules! opacity {
	($color: expr, $bg: expr, $alpha:expr, $index: literal) => {
		($alpha * ($color[$index] as f32) + (1. - $alpha) * ($bg[$index] as f32)).round() as u8
	};
}

impl Canvas<'_> {
	fn pixel_bytes(&self, coords: Point2<i32>) -> Option<Range<usize>> {
		let window = self.dims.into_rect()?;
		if !window.contains(coords) {
			return None;
		}
		let pixel_index = coords.y as usize * self.dims.w as usize + coords.x as usize;
		Some(pixel_index * 4..pixel_index * 4 + 4)
	}

	fn fill_with_color(&mut self, color: [u8; 4]) {
		self
			.frame
			.chunks_exact_mut(4)
			.for_each(|pixel| pixel.copy_from_slice(&color));
	}

	/// Blends over what's already there; off-canvas coordinates are ignored.
	fn put_pixel(&mut self, coords: Point2<i32>, color: [u8; 4]) {
		let Some(pixel_bytes) = self.pixel_bytes(coords) else {
			return;
		};
		let pixel = &mut self.frame[pixel_bytes];
		if color[3] == 0xff {
			pixel.copy_from_slice(&color);
			return;
		}
		let alpha = color[3] as f32 / 255.;
		let blended = [
			opacity!(color, pixel, alpha, 0),
			opacity!(color, pixel, alpha, 1),
			opacity!(color, pixel, alpha, 2),
			0xff,
		];
		pixel.copy_from_slice(&blended);
	}
}

pub fn draw_rect(canvas: &mut Canvas, dst: RectI, color: [u8; 4]) {
	// Transparent
	if color[3] == 0x00 {
		return;
	}
	for coords in dst.iter() {
		canvas.put_pixel(coords, color);
	}
}

/// Bresenham, stamping a `width` wide square on every step.
pub fn draw_line(
	canvas: &mut Canvas,
	from: Point2<i32>,
	to: Point2<i32>,
	width: i32,
	color: [u8; 4],
) {
	let dx = (to.x - from.x).abs();
	let dy = -(to.y - from.y).abs();
	let sx = if from.x < to.x { 1 } else { -1 };
	let sy = if from.y < to.y { 1 } else { -1 };
	let mut err = dx + dy;
	let offset = Vector2::new(width / 2, width / 2);
	let stamp = Dimensions { w: width, h: width };

	let mut p = from;
	loop {
		draw_rect(canvas, Rect::new(p - offset, stamp), color);
		if p == to {
			break;
		}
		let e2 = 2 * err;
		if e2 >= dy {
			err += dy;
			p.x += sx;
		}
		if e2 <= dx {
			err += dx;
			p.y += sy;
		}
	}
}

pub fn fill_circle(canvas: &mut Canvas, center: Point2<i32>, radius: i32, color: [u8; 4]) {
	let mut hline = |x1: i32, x2: i32, y: i32| {
		draw_rect(canvas, Rect::new((x1, y).into(), (x2 - x1 + 1, 1).into()), color)
	};
	let Point2 { x: cx, y: cy } = center;
	let mut x = radius;
	let mut y = 0;
	let mut err = 0;
	while x >= y {
		hline(cx - x, cx + x, cy + y);
		hline(cx - y, cx + y, cy + x);
		hline(cx - x, cx + x, cy - y);
		hline(cx - y, cx + y, cy - x);

		y += 1;
		if err <= 0 {
			err += 2 * y + 1;
		}
		if err > 0 {
			x -= 1;
			err -= 2 * x + 1;
		}
	}
}

/// Position of a glyph in the font sheet, in cells. Lowercase maps to uppercase.
fn char_position(c: char) -> Option<(u32, u32)> {
	const FOURTH_LINE: &str = ".,:;!?'\"-+=/";
	const FIFTH_LINE: &str = "()<>_#%*";
	let c = c.to_ascii_uppercase();
	match c {
		'A'..='M' => Some((c as u32 - 'A' as u32, 0)),
		'N'..='Z' => Some((c as u32 - 'N' as u32, 1)),
		'0'..='9' => Some((c as u32 - '0' as u32, 2)),
		ch => FOURTH_LINE
			.chars()
			.position(|c| c == ch)
			.map(|x| (x as u32, 3))
			.or_else(|| FIFTH_LINE.chars().position(|c| c == ch).map(|x| (x as u32, 4))),
	}
}

struct SpriteCoords {
	sheet_pos: Point2<u32>,
	dims: Dimensions<u32>,
}

pub fn text_dims(text: &str) -> Dimensions<i32> {
	let len = text.chars().count() as i32;
	let scale = DRAW_CONSTANTS.text_scale;
	Dimensions { w: len * GLYPH.w * scale, h: GLYPH.h * scale }
}

fn draw_text(canvas: &mut Canvas, font_sheet: &DynamicImage, dst: RectI, color: [u8; 4], text: &str) {
	if color[3] == 0x00 {
		return;
	}
	let len = text.chars().count() as i32;
	if len == 0 {
		return;
	}
	let char_dims = Dimensions { w: dst.dims.w / len, h: dst.dims.h };
	for (i, c) in text.chars().enumerate() {
		// Spaces and glyphs the sheet lacks are left blank
		let Some(sheet_pos) = char_position(c) else {
			continue;
		};
		let top_left = dst.top_left + Vector2::new(i as i32 * char_dims.w, 0);
		let dst_c = Rect { top_left, dims: char_dims };
		draw_sprite(
			canvas,
			font_sheet,
			SpriteCoords { sheet_pos: sheet_pos.into(), dims: (GLYPH.w as u32, GLYPH.h as u32).into() },
			dst_c,
			Some(color),
		);
	}
}

fn draw_centered_text(
	canvas: &mut Canvas,
	font_sheet: &DynamicImage,
	y: i32,
	color: [u8; 4],
	text: &str,
) {
	let dims = text_dims(text);
	let x = (canvas.dims.w as i32 - dims.w) / 2;
	draw_text(canvas, font_sheet, Rect { top_left: (x, y).into(), dims }, color, text);
}

fn draw_sprite(
	canvas: &mut Canvas,
	sheet: &DynamicImage,
	SpriteCoords { sheet_pos, dims }: SpriteCoords,
	dst: RectI,
	color: Option<[u8; 4]>,
) {
	for coords in dst.iter() {
		let px = {
			let sx =
				dims.w * sheet_pos.x + dims.w * (coords.x - dst.top_left.x) as u32 / dst.dims.w as u32;
			let sy =
				dims.h * sheet_pos.y + dims.h * (coords.y - dst.top_left.y) as u32 / dst.dims.h as u32;
			if !sheet.in_bounds(sx, sy) {
				continue;
			}
			sheet.get_pixel(sx, sy).0
		};
		if px[3] == 0x00 {
			continue;
		}
		canvas.put_pixel(coords, color.unwrap_or(px));
	}
}

/// Stick figure fitted in the player's box.
fn draw_player_man(canvas: &mut Canvas, rect: RectI, color: [u8; 4]) {
	let Rect { top_left: Point2 { x, y }, dims: Dimensions { w, h } } = rect;
	let line_width = DRAW_CONSTANTS.line_width;
	let cx = x + w / 2;

	// Head
	let head_radius = (w.min(h) / 6).max(4);
	let head_center = Point2::new(cx, y + head_radius + 2);
	fill_circle(canvas, head_center, head_radius, color);

	// Body
	let body_top = head_center.y + head_radius;
	let body_bottom = y + h - 8;
	draw_line(canvas, (cx, body_top).into(), (cx, body_bottom).into(), line_width, color);

	// Arms
	let arm_y = body_top + (body_bottom - body_top) / 3;
	let arm_half = w / 2 / 2;
	draw_line(canvas, (cx - arm_half, arm_y).into(), (cx + arm_half, arm_y).into(), line_width, color);

	// Legs
	let leg_length = (h / 3).max(8);
	let hip = Point2::new(cx, body_bottom);
	for side in [-1, 1] {
		let foot = Point2::new(cx + side * leg_length, body_bottom + leg_length);
		draw_line(canvas, hip, foot, line_width, color);
	}
}

fn clear(canvas: &mut Canvas) {
	canvas.fill_with_color(COLORS.bg);
}

/// A whole frame: the round while playing, only the prompt once it's lost.
pub fn draw_round(canvas: &mut Canvas, sheets: &Sheets, world: &World, phase: Phase) {
	clear(canvas);
	match phase {
		Phase::Playing => world.draw_gameplay(canvas, sheets),
		Phase::LostAwaitingDecision => draw_lost_overlay(canvas, sheets),
	}
}

impl World {
	pub fn draw_gameplay(&self, canvas: &mut Canvas, sheets: &Sheets) {
		draw_player_man(canvas, RectI::from_float(self.player.rect()), COLORS.fg);
		draw_rect(canvas, RectI::from_float(self.obstacle.rect()), COLORS.fg);

		let score_str = format!("Score: {}", self.score);
		draw_text(
			canvas,
			&sheets.font,
			Rect { top_left: DRAW_CONSTANTS.score_pos, dims: text_dims(&score_str) },
			COLORS.fg,
			&score_str,
		);
	}
}

fn draw_lost_overlay(canvas: &mut Canvas, sheets: &Sheets) {
	let Some(window) = canvas.dims.into_rect() else {
		return;
	};
	draw_rect(canvas, window, COLORS.lost_overlay);
	let [lost_y, prompt_y] = DRAW_CONSTANTS.lost_lines_y;
	draw_centered_text(canvas, &sheets.font, lost_y, COLORS.fg, "You Lost the Game");
	draw_centered_text(canvas, &sheets.font, prompt_y, COLORS.fg, "Press Y to restart or N to quit");
}

pub fn draw_error_overlay(canvas: &mut Canvas, sheets: &Sheets) {
	let Some(window) = canvas.dims.into_rect() else {
		return;
	};
	draw_rect(canvas, window, COLORS.error_overlay);
	let y = (canvas.dims.h as i32 - text_dims("").h) / 2;
	draw_centered_text(canvas, &sheets.font, y, COLORS.fg, "An error occurred; see error.log");
}
