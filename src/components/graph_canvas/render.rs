use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::scene::{EdgeShape, VertexShape};
use super::state::GraphCanvasState;
use super::types::{CanvasConfig, Point};

const ARROW_SIZE: f64 = 9.0;

pub fn render(state: &GraphCanvasState, ctx: &CanvasRenderingContext2d, width: f64, height: f64) {
	let config = state.scene().config();
	ctx.set_fill_style_str(&config.palette.canvas_bg);
	ctx.fill_rect(0.0, 0.0, width, height);

	let directed = !state.graph().is_undirected();
	for edge in state.scene().edges() {
		draw_edge(edge, directed, config, ctx);
	}
	for vertex in state.scene().vertices() {
		draw_vertex(vertex, config, ctx);
	}
}

fn draw_edge(edge: &EdgeShape, directed: bool, config: &CanvasConfig, ctx: &CanvasRenderingContext2d) {
	let palette = &config.palette;
	let (color, width) = if edge.highlighted {
		(palette.accent.as_str(), 4.0)
	} else {
		(palette.edge.as_str(), 2.0)
	};

	ctx.set_stroke_style_str(color);
	ctx.set_line_width(width);
	ctx.begin_path();
	ctx.move_to(edge.start.x, edge.start.y);
	ctx.line_to(edge.end.x, edge.end.y);
	ctx.stroke();

	if directed {
		ctx.set_fill_style_str(color);
		if edge.forward {
			draw_arrowhead(edge.start, edge.end, config.vertex_radius, ctx);
		}
		if edge.backward {
			draw_arrowhead(edge.end, edge.start, config.vertex_radius, ctx);
		}
	}

	ctx.set_fill_style_str(&palette.edge_text);
	ctx.set_font("12px sans-serif");
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");
	let _ = ctx.fill_text(&edge.weight_text, edge.label_at.x, edge.label_at.y);
}

fn draw_arrowhead(from: Point, to: Point, radius: f64, ctx: &CanvasRenderingContext2d) {
	let (dx, dy) = (to.x - from.x, to.y - from.y);
	let dist = (dx * dx + dy * dy).sqrt();
	if dist < radius * 2.0 {
		return;
	}
	let (ux, uy) = (dx / dist, dy / dist);
	let (tip_x, tip_y) = (to.x - ux * radius, to.y - uy * radius);
	let (back_x, back_y) = (tip_x - ux * ARROW_SIZE, tip_y - uy * ARROW_SIZE);
	let (px, py) = (-uy * ARROW_SIZE * 0.5, ux * ARROW_SIZE * 0.5);
	ctx.begin_path();
	ctx.move_to(tip_x, tip_y);
	ctx.line_to(back_x + px, back_y + py);
	ctx.line_to(back_x - px, back_y - py);
	ctx.close_path();
	ctx.fill();
}

fn draw_vertex(vertex: &VertexShape, config: &CanvasConfig, ctx: &CanvasRenderingContext2d) {
	let palette = &config.palette;
	let (x, y, radius) = (vertex.center.x, vertex.center.y, config.vertex_radius);

	if vertex.highlighted {
		if let Ok(gradient) = ctx.create_radial_gradient(x, y, radius * 0.5, x, y, radius * 2.0) {
			let _ = gradient.add_color_stop(0.0, "rgba(239, 71, 111, 0.35)");
			let _ = gradient.add_color_stop(1.0, "rgba(239, 71, 111, 0)");
			ctx.begin_path();
			let _ = ctx.arc(x, y, radius * 2.0, 0.0, 2.0 * PI);
			#[allow(deprecated)]
			ctx.set_fill_style(&gradient);
			ctx.fill();
		}
	}

	let (fill, outline, width) = match (vertex.selected, vertex.highlighted) {
		(true, _) => (
			if vertex.highlighted {
				&palette.node_fill_active
			} else {
				&palette.node_fill
			},
			&palette.select,
			3.0,
		),
		(false, true) => (&palette.node_fill_active, &palette.accent, 3.0),
		(false, false) => (&palette.node_fill, &palette.node_border, 2.0),
	};

	ctx.begin_path();
	let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
	ctx.set_fill_style_str(fill);
	ctx.fill();
	ctx.set_stroke_style_str(outline);
	ctx.set_line_width(width);
	if vertex.selected {
		let _ = ctx.set_line_dash(&js_sys::Array::of2(
			&JsValue::from_f64(4.0),
			&JsValue::from_f64(3.0),
		));
	}
	ctx.stroke();
	let _ = ctx.set_line_dash(&js_sys::Array::new());

	ctx.set_fill_style_str(&palette.node_text);
	ctx.set_font("bold 13px sans-serif");
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");
	let _ = ctx.fill_text(&vertex.label, x, y);
}
