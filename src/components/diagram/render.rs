use std::collections::HashMap;

use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, HtmlImageElement};

use super::graph::{DiagramNode, NodeIdx};
use super::scale::{Metrics, chip_text};
use super::state::{DiagramState, year_caption};
use super::types::NodeKind;
use crate::config::DataConfig;

const BACKGROUND: &str = "#333333";
const ACCENT: &str = "#92F90E";
const EDGE_IDLE: &str = "#888888";
const CHIP_FILL: &str = "rgba(146, 249, 19, 0.5)";
const UPCOMING_FILL: &str = "#facc15";
const DIM_ALPHA: f64 = 0.2;

/// Lazily created `<img>` elements, keyed by URL. Nothing is drawn for an
/// image until the browser reports it decoded.
pub struct ImageCache {
	data: DataConfig,
	images: HashMap<String, HtmlImageElement>,
}

impl ImageCache {
	pub fn new(data: DataConfig) -> Self {
		Self {
			data,
			images: HashMap::new(),
		}
	}

	fn get(&mut self, src: String) -> Option<&HtmlImageElement> {
		if !self.images.contains_key(&src) {
			let img = HtmlImageElement::new().ok()?;
			img.set_src(&src);
			self.images.insert(src.clone(), img);
		}
		self.images
			.get(&src)
			.filter(|img| img.complete() && img.natural_width() > 0)
	}

	fn thumbnail(&mut self, id: &str) -> Option<&HtmlImageElement> {
		let src = self.data.thumbnail_url(id);
		self.get(src)
	}

	fn background(&mut self) -> Option<&HtmlImageElement> {
		let src = self.data.background_image.clone()?;
		self.get(src)
	}
}

pub fn render(state: &DiagramState, ctx: &CanvasRenderingContext2d, images: &mut ImageCache) {
	let (w, h) = (state.viewport.width, state.viewport.height);
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, w, h);
	if let Some(bg) = images.background() {
		let _ = ctx.draw_image_with_html_image_element_and_dw_and_dh(bg, 0.0, 0.0, w, h);
	}

	let metrics = state.metrics();
	draw_edges(state, ctx);
	for idx in state.draw_order() {
		draw_node(state, ctx, images, &metrics, idx);
	}
	draw_year_tooltip(state, ctx, &metrics);
}

fn node_alpha(state: &DiagramState, idx: NodeIdx) -> f64 {
	if !state.has_active_highlight() || state.is_highlighted(idx) {
		1.0
	} else {
		1.0 - (1.0 - DIM_ALPHA) * state.highlight_level()
	}
}

fn draw_edges(state: &DiagramState, ctx: &CanvasRenderingContext2d) {
	let dimmed = if state.has_active_highlight() {
		1.0 - (1.0 - DIM_ALPHA) * state.highlight_level()
	} else {
		1.0
	};

	for edge in state.visible_edges() {
		let (x1, y1) = state.pixel_position(edge.source);
		let (x2, y2) = state.pixel_position(edge.target);

		if state.is_edge_highlighted(edge) {
			ctx.set_global_alpha(1.0);
			ctx.set_stroke_style_str(ACCENT);
			ctx.set_line_width(1.5);
			let _ = ctx.set_line_dash(&js_sys::Array::new());
		} else {
			ctx.set_global_alpha(dimmed);
			ctx.set_stroke_style_str(EDGE_IDLE);
			ctx.set_line_width(1.0);
			let _ = ctx.set_line_dash(&js_sys::Array::of2(
				&JsValue::from_f64(4.0),
				&JsValue::from_f64(2.0),
			));
		}

		ctx.begin_path();
		ctx.move_to(x1, y1);
		ctx.line_to(x2, y2);
		ctx.stroke();
	}
	let _ = ctx.set_line_dash(&js_sys::Array::new());
	ctx.set_global_alpha(1.0);
}

fn draw_node(
	state: &DiagramState,
	ctx: &CanvasRenderingContext2d,
	images: &mut ImageCache,
	metrics: &Metrics,
	idx: NodeIdx,
) {
	let node = &state.graph.nodes[idx];
	let (x, y) = state.pixel_position(idx);
	let alpha = node_alpha(state, idx);

	ctx.set_global_alpha(alpha);
	ctx.set_filter(if alpha < 0.99 { "blur(1px)" } else { "none" });
	match node.kind {
		NodeKind::Project => draw_project(ctx, images, metrics, node, x, y),
		NodeKind::Media => draw_media(ctx, metrics, node, x, y),
		NodeKind::Upcoming => draw_upcoming(ctx, metrics, node, x, y, state.spin_angle()),
	}
	ctx.set_filter("none");
	ctx.set_global_alpha(1.0);
}

fn draw_project(
	ctx: &CanvasRenderingContext2d,
	images: &mut ImageCache,
	metrics: &Metrics,
	node: &DiagramNode,
	x: f64,
	y: f64,
) {
	let s = metrics.thumb;
	match images.thumbnail(&node.id) {
		Some(img) => {
			let (nw, nh) = (img.natural_width() as f64, img.natural_height().max(1) as f64);
			let fit = (s / nw).min(s / nh);
			let (w, h) = (nw * fit, nh * fit);
			let _ = ctx.draw_image_with_html_image_element_and_dw_and_dh(
				img,
				x - w / 2.0,
				y - h / 2.0,
				w,
				h,
			);
		}
		None => {
			ctx.set_stroke_style_str("rgba(255, 255, 255, 0.25)");
			ctx.set_line_width(1.0);
			ctx.stroke_rect(x - s / 2.0, y - s / 2.0, s, s);
		}
	}

	ctx.set_fill_style_str("white");
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");
	ctx.set_font(&format!("200 {}px sans-serif", metrics.bracket_font));
	let bracket_x = s / 2.0 + metrics.bracket_margin;
	let _ = ctx.fill_text("(", x - bracket_x, y);
	let _ = ctx.fill_text(")", x + bracket_x, y);

	ctx.set_text_baseline("top");
	ctx.set_font(&format!("300 {}px sans-serif", metrics.label_font));
	let line_height = metrics.label_font * 1.2;
	let top = y + s / 2.0 + metrics.label_gap;
	for (i, line) in wrap_label(ctx, &node.label, metrics.label_width).iter().enumerate() {
		let _ = ctx.fill_text(line, x, top + i as f64 * line_height);
	}
}

fn draw_chip(
	ctx: &CanvasRenderingContext2d,
	metrics: &Metrics,
	text: &str,
	fill: &str,
	ink: &str,
	x: f64,
	y: f64,
) {
	ctx.set_font(&format!("{}px sans-serif", metrics.chip_font));
	let text_width = ctx
		.measure_text(text)
		.map(|m| m.width())
		.unwrap_or_else(|_| metrics.estimate_text_width(text, metrics.chip_font));
	let (w, h) = metrics.chip_size(text_width);

	ctx.set_fill_style_str(fill);
	ctx.fill_rect(x - w / 2.0, y - h / 2.0, w, h);
	ctx.set_fill_style_str(ink);
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");
	let _ = ctx.fill_text(text, x, y);
}

fn draw_media(
	ctx: &CanvasRenderingContext2d,
	metrics: &Metrics,
	node: &DiagramNode,
	x: f64,
	y: f64,
) {
	draw_chip(ctx, metrics, &chip_text(&node.label), CHIP_FILL, "white", x, y);
}

fn draw_upcoming(
	ctx: &CanvasRenderingContext2d,
	metrics: &Metrics,
	node: &DiagramNode,
	x: f64,
	y: f64,
	angle: f64,
) {
	ctx.save();
	let _ = ctx.translate(x, y);
	let _ = ctx.rotate(angle);
	draw_chip(ctx, metrics, &node.label, UPCOMING_FILL, "black", 0.0, 0.0);
	ctx.restore();
}

fn draw_year_tooltip(state: &DiagramState, ctx: &CanvasRenderingContext2d, metrics: &Metrics) {
	let Some(idx) = state.tooltip_node() else {
		return;
	};
	let Some(caption) = year_caption(&state.graph.nodes[idx].years) else {
		return;
	};
	let (x, y) = state.pixel_position(idx);
	let font = 12.0;
	ctx.set_font(&format!("{font}px sans-serif"));
	let width = ctx
		.measure_text(&caption)
		.map(|m| m.width())
		.unwrap_or_else(|_| metrics.estimate_text_width(&caption, font));
	let (pad_x, pad_y) = (8.0, 4.0);
	let (w, h) = (width + pad_x * 2.0, font + pad_y * 2.0);
	let bottom = y - metrics.thumb / 2.0 - 8.0;

	ctx.set_fill_style_str("rgba(0, 0, 0, 0.75)");
	ctx.fill_rect(x - w / 2.0, bottom - h, w, h);
	ctx.set_fill_style_str("white");
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");
	let _ = ctx.fill_text(&caption, x, bottom - h / 2.0);
}

/// Greedy word wrap; a word wider than `max_width` gets a line of its own.
fn wrap_label(ctx: &CanvasRenderingContext2d, text: &str, max_width: f64) -> Vec<String> {
	let width = |s: &str| ctx.measure_text(s).map(|m| m.width()).unwrap_or(0.0);
	let mut lines = Vec::new();
	let mut current = String::new();
	for word in text.split_whitespace() {
		if current.is_empty() {
			current.push_str(word);
			continue;
		}
		let candidate = format!("{current} {word}");
		if width(&candidate) <= max_width {
			current = candidate;
		} else {
			lines.push(std::mem::replace(&mut current, word.to_string()));
		}
	}
	if !current.is_empty() {
		lines.push(current);
	}
	lines
}
