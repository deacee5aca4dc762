use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::scene::{Line, NodeHandle};
use super::state::DiagramState;
use super::types::DiagramConfig;

const BACKGROUND: &str = "#f7f7f9";
const EDGE_COLOR: &str = "#555b6e";
const NODE_FILL: &str = "#ffffff";
const NODE_STROKE: &str = "#2f3542";
const DRAGGING_STROKE: &str = "#1e90ff";
const PORT_FILL: &str = "#2f3542";
const EDGE_WIDTH: f64 = 1.5;
const NODE_RADIUS: f64 = 1.0;

pub fn render(state: &DiagramState, ctx: &CanvasRenderingContext2d) {
	let config = state.config();
	let t = state.view().transform();

	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, config.width, config.height);
	ctx.save();
	let _ = ctx.translate(t.x, t.y);
	let _ = ctx.scale(t.k, t.k);
	// Edges go first so nodes cover their ends.
	for line in state.scene().edges().iter().filter_map(|e| e.line) {
		draw_edge(&line, ctx);
	}
	for node in state.scene().nodes() {
		draw_node(node, config, ctx);
	}
	ctx.restore();
}

fn draw_edge(line: &Line, ctx: &CanvasRenderingContext2d) {
	ctx.set_stroke_style_str(EDGE_COLOR);
	ctx.set_line_width(EDGE_WIDTH);
	ctx.begin_path();
	ctx.move_to(line.x1, line.y1);
	ctx.line_to(line.x2, line.y2);
	ctx.stroke();

	let (dx, dy) = (line.x2 - line.x1, line.y2 - line.y1);
	let dist = (dx * dx + dy * dy).sqrt();
	if dist < 0.001 {
		return;
	}

	// Arrowhead glyph `M0,-5 L10,0 L0,5` anchored at x=5 on the line end,
	// sized to four stroke widths.
	let (ux, uy) = (dx / dist, dy / dist);
	let s = 4.0 * EDGE_WIDTH / 10.0;
	let (tip_x, tip_y) = (line.x2 + ux * 5.0 * s, line.y2 + uy * 5.0 * s);
	let (back_x, back_y) = (line.x2 - ux * 5.0 * s, line.y2 - uy * 5.0 * s);
	let (px, py) = (-uy * 5.0 * s, ux * 5.0 * s);
	ctx.set_fill_style_str(EDGE_COLOR);
	ctx.begin_path();
	ctx.move_to(tip_x, tip_y);
	ctx.line_to(back_x + px, back_y + py);
	ctx.line_to(back_x - px, back_y - py);
	ctx.close_path();
	ctx.fill();
}

fn draw_node(node: &NodeHandle, config: &DiagramConfig, ctx: &CanvasRenderingContext2d) {
	let (x, y) = node.placement.translation();
	let (w, h) = (config.node_width, config.node_height);
	let (pw, ph) = (config.port_width, config.port_height);

	ctx.set_fill_style_str(PORT_FILL);
	ctx.fill_rect(x - pw / 2.0, y - h / 2.0 - ph, pw, ph);
	ctx.fill_rect(x - pw / 2.0, y + h / 2.0, pw, ph);

	ctx.set_fill_style_str(NODE_FILL);
	rounded_rect(ctx, x - w / 2.0, y - h / 2.0, w, h, NODE_RADIUS);
	ctx.fill();

	if node.dragging {
		ctx.set_stroke_style_str(DRAGGING_STROKE);
		let _ = ctx.set_line_dash(&js_sys::Array::of2(
			&JsValue::from_f64(4.0),
			&JsValue::from_f64(2.0),
		));
	} else {
		ctx.set_stroke_style_str(NODE_STROKE);
	}
	ctx.set_line_width(1.0);
	ctx.stroke();
	let _ = ctx.set_line_dash(&js_sys::Array::new());

	ctx.set_fill_style_str(NODE_STROKE);
	ctx.set_font("10px sans-serif");
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");
	let _ = ctx.fill_text(&node.name, x, y);
}

/// Radius that still fits a `w` by `h` box.
fn corner_radius(w: f64, h: f64, r: f64) -> f64 {
	r.min(w / 2.0).min(h / 2.0).max(0.0)
}

/// Trace a rounded rectangle as the current path.
fn rounded_rect(ctx: &CanvasRenderingContext2d, x: f64, y: f64, w: f64, h: f64, r: f64) {
	let r = corner_radius(w, h, r);
	ctx.begin_path();
	ctx.move_to(x + r, y);
	let _ = ctx.arc_to(x + w, y, x + w, y + h, r);
	let _ = ctx.arc_to(x + w, y + h, x, y + h, r);
	let _ = ctx.arc_to(x, y + h, x, y, r);
	let _ = ctx.arc_to(x, y, x + w, y, r);
	ctx.close_path();
}
