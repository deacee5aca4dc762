//! Scene-wide pan and zoom.
//!
//! The view transform maps scene coordinates to screen coordinates as
//! `screen = scene * k + (x, y)` and is the root container placement. Scale
//! is clamped to the configured extent after every operation.

use std::fmt;

use log::{debug, trace, warn};

use super::transform::{Affine, get_translation};
use super::types::DiagramConfig;

/// Middle mouse button; the only pointer button that pans.
pub const PAN_BUTTON: i16 = 1;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self {
			x: 0.0,
			y: 0.0,
			k: 1.0,
		}
	}
}

impl ViewTransform {
	pub fn apply(&self, p: (f64, f64)) -> (f64, f64) {
		(p.0 * self.k + self.x, p.1 * self.k + self.y)
	}

	pub fn invert(&self, p: (f64, f64)) -> (f64, f64) {
		((p.0 - self.x) / self.k, (p.1 - self.y) / self.k)
	}

	pub fn to_affine(&self) -> Affine {
		Affine::new(self.k, 0.0, 0.0, self.k, self.x, self.y)
	}
}

impl fmt::Display for ViewTransform {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "translate({},{}) scale({})", self.x, self.y, self.k)
	}
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct PanSession {
	pointer: (f64, f64),
	start: (f64, f64),
}

#[derive(Clone, Debug)]
pub struct ViewController {
	transform: ViewTransform,
	width: f64,
	height: f64,
	min_scale: f64,
	max_scale: f64,
	focus_scale: f64,
	pan: Option<PanSession>,
}

/// Usable `(min, max)` scale bounds: reversed bounds are swapped, anything
/// non-positive or non-finite falls back to the defaults.
fn scale_extent(config: &DiagramConfig) -> (f64, f64) {
	let (lo, hi) = (config.min_scale, config.max_scale);
	if !lo.is_finite() || !hi.is_finite() || lo <= 0.0 || hi <= 0.0 {
		let fallback = DiagramConfig::default();
		warn!(
			"invalid scale extent [{lo}, {hi}], using [{}, {}]",
			fallback.min_scale, fallback.max_scale
		);
		return (fallback.min_scale, fallback.max_scale);
	}
	if lo > hi {
		warn!("scale extent [{lo}, {hi}] is reversed, swapping");
		return (hi, lo);
	}
	(lo, hi)
}

impl ViewController {
	pub fn new(config: &DiagramConfig) -> Self {
		let (min_scale, max_scale) = scale_extent(config);
		Self {
			transform: ViewTransform::default(),
			width: config.width,
			height: config.height,
			min_scale,
			max_scale,
			focus_scale: config.focus_scale,
			pan: None,
		}
	}

	pub fn transform(&self) -> ViewTransform {
		self.transform
	}

	/// Placement of the root container.
	pub fn root_transform(&self) -> Affine {
		self.transform.to_affine()
	}

	/// Only the pan button may start a pointer-driven pan.
	pub fn accepts_button(button: i16) -> bool {
		button == PAN_BUTTON
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}

	fn clamp(&self, k: f64) -> f64 {
		if k.is_nan() {
			return self.transform.k;
		}
		k.clamp(self.min_scale, self.max_scale)
	}

	fn center(&self) -> (f64, f64) {
		(self.width / 2.0, self.height / 2.0)
	}

	/// Scale to `k` while keeping the screen point `anchor` fixed.
	fn scale_about(&mut self, k: f64, anchor: (f64, f64)) {
		let k = self.clamp(k);
		let p = self.transform.invert(anchor);
		self.transform = ViewTransform {
			x: anchor.0 - p.0 * k,
			y: anchor.1 - p.1 * k,
			k,
		};
	}

	/// Translate by `(dx, dy)` in scene units.
	pub fn translate_by(&mut self, dx: f64, dy: f64) {
		if !dx.is_finite() || !dy.is_finite() {
			return;
		}
		self.transform.x += self.transform.k * dx;
		self.transform.y += self.transform.k * dy;
		trace!("view {}", self.transform);
	}

	/// Scale to `k` around the viewport center.
	pub fn scale_to(&mut self, k: f64) {
		self.scale_about(k, self.center());
		trace!("view {}", self.transform);
	}

	/// Wheel zoom anchored at the pointer. `delta_mode` follows the DOM
	/// `WheelEvent` constants (pixel, line, page).
	pub fn wheel(&mut self, delta_y: f64, delta_mode: u32, pointer: (f64, f64)) {
		let unit = match delta_mode {
			0 => 0.002,
			1 => 0.05,
			_ => 1.0,
		};
		let k = self.transform.k * 2f64.powf(-delta_y * unit);
		self.scale_about(k, pointer);
		trace!("wheel {delta_y} -> {}", self.transform);
	}

	pub fn pan_start(&mut self, pointer: (f64, f64)) {
		self.pan = Some(PanSession {
			pointer,
			start: (self.transform.x, self.transform.y),
		});
	}

	pub fn pan_move(&mut self, pointer: (f64, f64)) -> bool {
		let Some(pan) = self.pan else {
			return false;
		};
		self.transform.x = pan.start.0 + (pointer.0 - pan.pointer.0);
		self.transform.y = pan.start.1 + (pointer.1 - pan.pointer.1);
		true
	}

	pub fn pan_end(&mut self) -> bool {
		self.pan.take().is_some()
	}

	pub fn is_panning(&self) -> bool {
		self.pan.is_some()
	}

	/// Center the node at scene position `local` in the viewport at the focus
	/// scale: reset to scale 1, move the node to the center, then zoom in
	/// around the center.
	pub fn focus(&mut self, local: (f64, f64)) {
		self.scale_to(1.0);
		let root_attr = self.root_transform().to_string();
		let root = get_translation(&root_attr).unwrap_or((0.0, 0.0));
		debug!("focus node at {local:?}, root {root_attr}");
		let (cx, cy) = self.center();
		self.translate_by(-root.0 - local.0 + cx, -root.1 - local.1 + cy);
		self.scale_to(self.focus_scale);
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn view() -> ViewController {
		ViewController::new(&DiagramConfig::default())
	}

	fn approx(a: (f64, f64), b: (f64, f64)) -> bool {
		(a.0 - b.0).abs() < 1e-9 && (a.1 - b.1).abs() < 1e-9
	}

	// ========================================================================
	// ViewTransform
	// ========================================================================

	#[test]
	fn test_apply_and_invert() {
		let t = ViewTransform {
			x: 100.0,
			y: -20.0,
			k: 2.0,
		};
		assert_eq!(t.apply((5.0, 5.0)), (110.0, -10.0));
		assert_eq!(t.invert((110.0, -10.0)), (5.0, 5.0));
		assert_eq!(t.to_string(), "translate(100,-20) scale(2)");
		assert_eq!(t.to_affine().apply(5.0, 5.0), (110.0, -10.0));
	}

	// ========================================================================
	// translate_by() / scale_to()
	// ========================================================================

	#[test]
	fn test_translate_by_is_scaled() {
		let mut v = view();
		v.translate_by(480.0, 220.0);
		assert_eq!(
			v.transform(),
			ViewTransform {
				x: 480.0,
				y: 220.0,
				k: 1.0
			}
		);
		v.scale_to(2.0);
		v.translate_by(10.0, 0.0);
		assert_eq!(v.transform().x, 500.0);
	}

	#[test]
	fn test_scale_to_keeps_center_fixed() {
		let mut v = view();
		v.translate_by(30.0, 40.0);
		let center_scene = v.transform().invert((480.0, 320.0));
		v.scale_to(3.0);
		assert!(approx(v.transform().apply(center_scene), (480.0, 320.0)));
	}

	#[test]
	fn test_scale_to_clamps() {
		let mut v = view();
		v.scale_to(50.0);
		assert_eq!(v.transform().k, 10.0);
		v.scale_to(0.01);
		assert_eq!(v.transform().k, 1.0);
		v.scale_to(f64::NAN);
		assert_eq!(v.transform().k, 1.0);
	}

	#[test]
	fn test_reversed_scale_extent_is_swapped() {
		let mut v = ViewController::new(&DiagramConfig {
			min_scale: 10.0,
			max_scale: 1.0,
			..DiagramConfig::default()
		});
		v.wheel(-100.0, 0, (0.0, 0.0));
		assert!((1.0..=10.0).contains(&v.transform().k));
		v.scale_to(50.0);
		assert_eq!(v.transform().k, 10.0);
		v.scale_to(0.5);
		assert_eq!(v.transform().k, 1.0);
	}

	#[test]
	fn test_unusable_scale_extent_falls_back_to_default() {
		let extents = [
			(f64::NAN, 4.0),
			(0.0, 4.0),
			(2.0, f64::INFINITY),
			(-3.0, -1.0),
		];
		for (min_scale, max_scale) in extents {
			let mut v = ViewController::new(&DiagramConfig {
				min_scale,
				max_scale,
				..DiagramConfig::default()
			});
			v.wheel(-100.0, 0, (0.0, 0.0));
			v.scale_to(50.0);
			assert_eq!(v.transform().k, 10.0);
			v.scale_to(0.0);
			assert_eq!(v.transform().k, 1.0);
		}
	}

	#[test]
	fn test_narrow_scale_extent_is_honoured() {
		let mut v = ViewController::new(&DiagramConfig {
			min_scale: 2.0,
			max_scale: 3.0,
			..DiagramConfig::default()
		});
		v.scale_to(8.0);
		assert_eq!(v.transform().k, 3.0);
		v.scale_to(1.0);
		assert_eq!(v.transform().k, 2.0);
	}

	// ========================================================================
	// wheel()
	// ========================================================================

	#[test]
	fn test_wheel_zooms_about_pointer() {
		let mut v = view();
		let pointer = (200.0, 150.0);
		let under = v.transform().invert(pointer);
		// deltaY of -500 pixels doubles the scale.
		v.wheel(-500.0, 0, pointer);
		assert!((v.transform().k - 2.0).abs() < 1e-9);
		assert!(approx(v.transform().apply(under), pointer));
	}

	#[test]
	fn test_wheel_never_leaves_scale_extent() {
		let mut v = view();
		for _ in 0..100 {
			v.wheel(-300.0, 1, (10.0, 10.0));
			assert!((1.0..=10.0).contains(&v.transform().k));
		}
		assert_eq!(v.transform().k, 10.0);
		for _ in 0..100 {
			v.wheel(1.0e6, 2, (10.0, 10.0));
			assert!((1.0..=10.0).contains(&v.transform().k));
		}
		assert_eq!(v.transform().k, 1.0);
	}

	// ========================================================================
	// pan
	// ========================================================================

	#[test]
	fn test_pan_follows_pointer() {
		let mut v = view();
		v.scale_to(2.0);
		let before = v.transform();
		v.pan_start((100.0, 100.0));
		assert!(v.pan_move((130.0, 90.0)));
		assert_eq!(v.transform().x, before.x + 30.0);
		assert_eq!(v.transform().y, before.y - 10.0);
		assert_eq!(v.transform().k, 2.0);
		assert!(v.pan_end());
		assert!(!v.pan_move((0.0, 0.0)));
		assert!(!v.pan_end());
	}

	#[test]
	fn test_only_middle_button_pans() {
		assert!(ViewController::accepts_button(1));
		assert!(!ViewController::accepts_button(0));
		assert!(!ViewController::accepts_button(2));
	}

	// ========================================================================
	// focus()
	// ========================================================================

	#[test]
	fn test_focus_centers_node_at_focus_scale() {
		let mut v = view();
		v.translate_by(480.0, 220.0);
		v.wheel(-250.0, 0, (10.0, 600.0));
		v.focus((0.0, 200.0));
		assert_eq!(v.transform().k, 4.0);
		assert!(approx(v.transform().apply((0.0, 200.0)), (480.0, 320.0)));
	}

	#[test]
	fn test_focus_from_identity() {
		let mut v = view();
		v.focus((-35.0, 12.0));
		assert!(approx(v.transform().apply((-35.0, 12.0)), (480.0, 320.0)));
	}
}
