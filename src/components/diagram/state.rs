use log::{debug, info};

use super::drag::DragController;
use super::edges::EdgeGeometry;
use super::scene::Scene;
use super::types::{DiagramConfig, DiagramData};
use super::view::ViewController;

/// Primary mouse button; the only button that drags nodes.
pub const DRAG_BUTTON: i16 = 0;

/// Whether a handled gesture may continue to the background pan/zoom.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Propagation {
	Continue,
	Stop,
}

/// Gestures the diagram reacts to. Drag pointers are in scene space, zoom
/// pointers in screen space.
#[derive(Clone, Debug, PartialEq)]
pub enum DiagramEvent {
	DragStart { node: String, pointer: (f64, f64) },
	DragMove { pointer: (f64, f64) },
	DragEnd,
	Zoom {
		delta_y: f64,
		delta_mode: u32,
		pointer: (f64, f64),
	},
	FocusNode { node: String },
}

/// The whole interactive scene: node handles, edge geometry, the active drag
/// and the view transform.
pub struct DiagramState {
	config: DiagramConfig,
	scene: Scene,
	edges: EdgeGeometry,
	drag: DragController,
	view: ViewController,
}

impl DiagramState {
	pub fn new(data: &DiagramData, config: DiagramConfig) -> Self {
		let mut scene = Scene::compose(data, &config);
		let mut edges = EdgeGeometry::new(&config);
		edges.recompute_all(&mut scene);

		let mut view = ViewController::new(&config);
		view.translate_by(config.width / 2.0, config.height / 2.0 - config.spacing);

		info!(
			"diagram ready: {} nodes, {} edges, view {}",
			scene.nodes().len(),
			scene.edges().len(),
			view.transform()
		);

		Self {
			drag: DragController::new(config.live_edges),
			config,
			scene,
			edges,
			view,
		}
	}

	pub fn config(&self) -> &DiagramConfig {
		&self.config
	}

	pub fn scene(&self) -> &Scene {
		&self.scene
	}

	pub fn edges(&self) -> &EdgeGeometry {
		&self.edges
	}

	pub fn drag(&self) -> &DragController {
		&self.drag
	}

	pub fn view(&self) -> &ViewController {
		&self.view
	}

	// === Named handlers ===

	pub fn drag_start(&mut self, node: &str, pointer: (f64, f64)) -> Propagation {
		if self.drag.start(&mut self.scene, &mut self.edges, node, pointer) {
			Propagation::Stop
		} else {
			Propagation::Continue
		}
	}

	pub fn drag_move(&mut self, pointer: (f64, f64)) -> bool {
		self.drag.drag(&mut self.scene, &mut self.edges, pointer)
	}

	pub fn drag_end(&mut self) -> bool {
		self.drag.end(&mut self.scene, &mut self.edges)
	}

	pub fn zoom(&mut self, delta_y: f64, delta_mode: u32, pointer: (f64, f64)) {
		self.view.wheel(delta_y, delta_mode, pointer);
	}

	/// Center `node` in the viewport at the focus scale.
	pub fn focus_node(&mut self, node: &str) -> bool {
		let Some(local) = self.scene.placement_position(node) else {
			debug!("focus on unknown node {node:?}");
			return false;
		};
		self.view.focus(local);
		true
	}

	pub fn apply(&mut self, event: DiagramEvent) -> Propagation {
		match event {
			DiagramEvent::DragStart { node, pointer } => {
				return self.drag_start(&node, pointer);
			}
			DiagramEvent::DragMove { pointer } => {
				self.drag_move(pointer);
			}
			DiagramEvent::DragEnd => {
				self.drag_end();
			}
			DiagramEvent::Zoom {
				delta_y,
				delta_mode,
				pointer,
			} => self.zoom(delta_y, delta_mode, pointer),
			DiagramEvent::FocusNode { node } => {
				self.focus_node(&node);
			}
		}
		Propagation::Continue
	}

	// === Raw pointer input (screen space) ===

	pub fn screen_to_scene(&self, screen: (f64, f64)) -> (f64, f64) {
		self.view.transform().invert(screen)
	}

	/// Name of the node under a screen point.
	pub fn node_at_screen(&self, screen: (f64, f64)) -> Option<&str> {
		let (x, y) = self.screen_to_scene(screen);
		self.scene.node_at(x, y)
	}

	/// Route a button press: primary on a node drags it, the pan button pans
	/// the background, anything else is ignored. A press while a drag or pan
	/// is already running is ignored too.
	pub fn pointer_down(&mut self, screen: (f64, f64), button: i16) -> Propagation {
		if self.drag.is_dragging() || self.view.is_panning() {
			debug!("ignoring button {button} during an active gesture");
			return Propagation::Continue;
		}
		if button == DRAG_BUTTON {
			let pointer = self.screen_to_scene(screen);
			if let Some(node) = self.scene.node_at(pointer.0, pointer.1).map(str::to_string) {
				return self.drag_start(&node, pointer);
			}
		}
		if ViewController::accepts_button(button) {
			self.view.pan_start(screen);
		}
		Propagation::Continue
	}

	pub fn pointer_move(&mut self, screen: (f64, f64)) {
		if self.drag.is_dragging() {
			let pointer = self.screen_to_scene(screen);
			self.drag_move(pointer);
		} else if self.view.is_panning() {
			self.view.pan_move(screen);
		}
	}

	/// Release of `button` ends only the gesture that button started.
	pub fn pointer_up(&mut self, button: i16) {
		if button == DRAG_BUTTON {
			self.drag_end();
		} else if ViewController::accepts_button(button) {
			self.view.pan_end();
		}
	}

	/// The pointer left the surface: end whatever gesture is running.
	pub fn pointer_leave(&mut self) {
		self.drag_end();
		self.view.pan_end();
	}

	pub fn double_click(&mut self, screen: (f64, f64)) -> bool {
		match self.node_at_screen(screen).map(str::to_string) {
			Some(node) => self.focus_node(&node),
			None => false,
		}
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.config.width = width;
		self.config.height = height;
		self.view.resize(width, height);
	}
}
