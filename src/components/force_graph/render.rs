use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::state::{ForceGraphState, NODE_RADIUS};

const BACKGROUND: &str = "#0d0d0d";
const LINK_COLOR: &str = "rgba(51, 51, 51, 0.6)";
const RELATIONSHIP_COLOR: &str = "rgba(160, 160, 160, 0.8)";
/// Relationship labels are hidden below this zoom level.
const RELATIONSHIP_MIN_ZOOM: f64 = 1.2;

/// Draw the current positions. Called after each tick and on every frame.
pub fn render(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	let t = state.interaction.transform;
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, state.viewport.width, state.viewport.height);
	ctx.save();
	let _ = ctx.translate(t.x, t.y);
	let _ = ctx.scale(t.k, t.k);
	draw_links(state, ctx);
	draw_nodes(state, ctx);
	ctx.restore();
}

fn draw_links(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	let k = state.interaction.transform.k;
	let arrow_size = 6.0;

	for (from, to, link) in state.link_segments() {
		let (dx, dy) = (to.x - from.x, to.y - from.y);
		let dist = (dx * dx + dy * dy).sqrt();
		if dist < NODE_RADIUS * 2.0 {
			continue;
		}
		let (ux, uy) = (dx / dist, dy / dist);

		ctx.set_stroke_style_str(LINK_COLOR);
		ctx.set_line_width(1.5);
		ctx.begin_path();
		ctx.move_to(from.x + ux * NODE_RADIUS, from.y + uy * NODE_RADIUS);
		ctx.line_to(
			to.x - ux * (NODE_RADIUS + arrow_size),
			to.y - uy * (NODE_RADIUS + arrow_size),
		);
		ctx.stroke();

		ctx.set_fill_style_str(LINK_COLOR);
		let (tip_x, tip_y) = (to.x - ux * NODE_RADIUS, to.y - uy * NODE_RADIUS);
		let (back_x, back_y) = (tip_x - ux * arrow_size, tip_y - uy * arrow_size);
		let (px, py) = (-uy * arrow_size * 0.5, ux * arrow_size * 0.5);
		ctx.begin_path();
		ctx.move_to(tip_x, tip_y);
		ctx.line_to(back_x + px, back_y + py);
		ctx.line_to(back_x - px, back_y - py);
		ctx.close_path();
		ctx.fill();

		if k >= RELATIONSHIP_MIN_ZOOM && !link.relationship.is_empty() {
			ctx.set_fill_style_str(RELATIONSHIP_COLOR);
			ctx.set_font("9px sans-serif");
			ctx.set_text_align("center");
			let _ = ctx.fill_text(
				&link.relationship,
				(from.x + to.x) / 2.0,
				(from.y + to.y) / 2.0 - 3.0,
			);
			ctx.set_text_align("start");
		}
	}
}

fn draw_nodes(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	let positions = state.simulation.positions();
	for (info, (_, p)) in state.nodes.iter().zip(positions.iter()) {
		if state.is_selected(&info.id) {
			ctx.begin_path();
			let _ = ctx.arc(p.x, p.y, NODE_RADIUS + 5.0, 0.0, 2.0 * PI);
			ctx.set_stroke_style_str("rgba(255, 255, 255, 0.85)");
			ctx.set_line_width(2.0);
			ctx.stroke();
		}

		ctx.begin_path();
		let _ = ctx.arc(p.x, p.y, NODE_RADIUS, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(info.color);
		ctx.fill();
		ctx.set_stroke_style_str("#000");
		ctx.set_line_width(2.0);
		ctx.stroke();

		ctx.set_fill_style_str("#fff");
		ctx.set_font("500 12px sans-serif");
		let _ = ctx.fill_text(&info.label, p.x + 16.0, p.y + 4.0);
	}
}
