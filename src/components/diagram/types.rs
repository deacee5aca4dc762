/// A node descriptor handed to the scene composer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiagramNode {
	pub name: String,
}

impl DiagramNode {
	pub fn new(name: impl Into<String>) -> Self {
		Self { name: name.into() }
	}
}

/// A directed connection from the `output` port of one node to the `input`
/// port of another.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiagramLink {
	pub output: String,
	pub input: String,
}

impl DiagramLink {
	pub fn new(output: impl Into<String>, input: impl Into<String>) -> Self {
		Self {
			output: output.into(),
			input: input.into(),
		}
	}
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DiagramData {
	pub nodes: Vec<DiagramNode>,
	pub links: Vec<DiagramLink>,
}

/// Visual constants of the diagram.
///
/// All lengths are in scene units; the view transform scales them on screen.
#[derive(Clone, Debug, PartialEq)]
pub struct DiagramConfig {
	/// Viewport width.
	pub width: f64,
	/// Viewport height.
	pub height: f64,
	pub node_width: f64,
	pub node_height: f64,
	/// Vertical distance between consecutive nodes in the initial layout.
	pub spacing: f64,
	pub port_width: f64,
	pub port_height: f64,
	pub min_scale: f64,
	pub max_scale: f64,
	/// Scale applied when a node is double-clicked.
	pub focus_scale: f64,
	/// Recompute incident edges on every drag move instead of only on release.
	pub live_edges: bool,
}

impl Default for DiagramConfig {
	fn default() -> Self {
		Self {
			width: 960.0,
			height: 640.0,
			node_width: 100.0,
			node_height: 20.0,
			spacing: 100.0,
			port_width: 14.0,
			port_height: 2.0,
			min_scale: 1.0,
			max_scale: 10.0,
			focus_scale: 4.0,
			live_edges: false,
		}
	}
}

impl DiagramConfig {
	/// Offset from node center to where an edge leaves the output port.
	pub fn output_port_offset(&self) -> f64 {
		(self.node_height + self.port_height) / 2.0
	}

	/// Offset from node center to where an edge arrives above the input port.
	/// Leaves room for the arrowhead.
	pub fn input_port_offset(&self) -> f64 {
		self.node_height / 2.0 + self.port_height * 1.5
	}
}
