//! Responsive sizing shared by drawing and hit testing.

use super::types::NodeKind;

/// Nodes never shrink below this fraction of their reference size.
pub const MIN_SCALE: f64 = 0.4;

/// Rough advance of one glyph relative to font size, for hit boxes.
const GLYPH_WIDTH: f64 = 0.6;

pub fn scale_factor(viewport_width: f64, reference_width: f64) -> f64 {
	if reference_width <= 0.0 {
		return 1.0;
	}
	(viewport_width / reference_width).clamp(MIN_SCALE, 1.0)
}

/// Box around a node center, symmetric horizontally; `above` and `below`
/// are the reach up and down.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Extent {
	pub half_width: f64,
	pub above: f64,
	pub below: f64,
}

impl Extent {
	pub fn contains(&self, dx: f64, dy: f64) -> bool {
		dx.abs() <= self.half_width && dy >= -self.above && dy <= self.below
	}
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Metrics {
	pub scale: f64,
	pub thumb: f64,
	pub label_font: f64,
	pub label_gap: f64,
	pub label_width: f64,
	pub bracket_font: f64,
	pub bracket_margin: f64,
	pub chip_font: f64,
	pub chip_pad_x: f64,
	pub chip_pad_y: f64,
}

impl Metrics {
	pub fn new(scale: f64, thumb_size: f64) -> Self {
		let thumb = thumb_size * scale;
		Self {
			scale,
			thumb,
			label_font: (14.0 * scale).max(10.0),
			label_gap: 6.0 * scale,
			label_width: thumb + 80.0 * scale,
			bracket_font: 50.0 * scale,
			bracket_margin: 12.0 * scale + 10.0,
			chip_font: 20.0 * scale,
			chip_pad_x: 10.0 * scale,
			chip_pad_y: 6.0 * scale,
		}
	}

	pub fn chip_size(&self, text_width: f64) -> (f64, f64) {
		(
			text_width + self.chip_pad_x * 2.0,
			self.chip_font + self.chip_pad_y * 2.0,
		)
	}

	pub fn estimate_text_width(&self, text: &str, font: f64) -> f64 {
		text.chars().count() as f64 * font * GLYPH_WIDTH
	}

	/// Pointer target for a node. Projects cover the thumbnail and one label
	/// line below it; chips cover their padded text.
	pub fn extent(&self, kind: NodeKind, label: &str) -> Extent {
		match kind {
			NodeKind::Project => Extent {
				half_width: self.thumb / 2.0,
				above: self.thumb / 2.0,
				below: self.thumb / 2.0 + self.label_gap + self.label_font * 1.2,
			},
			NodeKind::Media => {
				let text = chip_text(label);
				let (w, h) = self.chip_size(self.estimate_text_width(&text, self.chip_font));
				Extent {
					half_width: w / 2.0,
					above: h / 2.0,
					below: h / 2.0,
				}
			}
			NodeKind::Upcoming => {
				let (w, h) = self.chip_size(self.estimate_text_width(label, self.chip_font));
				// rotates, so cover the full circle it sweeps
				let r = (w.max(h)) / 2.0;
				Extent {
					half_width: r,
					above: r,
					below: r,
				}
			}
		}
	}
}

/// Media chips read `[label]`.
pub fn chip_text(label: &str) -> String {
	format!("[{label}]")
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn scale_is_capped_and_floored() {
		assert_eq!(scale_factor(3840.0, 1920.0), 1.0);
		assert_eq!(scale_factor(960.0, 1920.0), 0.5);
		assert_eq!(scale_factor(100.0, 1920.0), MIN_SCALE);
		assert_eq!(scale_factor(500.0, 0.0), 1.0);
	}

	#[test]
	fn project_extent_reaches_below_for_label() {
		let m = Metrics::new(1.0, 112.0);
		let e = m.extent(NodeKind::Project, "Work");
		assert!(e.contains(0.0, 0.0));
		assert!(e.contains(55.0, -55.0));
		assert!(e.contains(0.0, 70.0));
		assert!(!e.contains(0.0, -70.0));
		assert!(!e.contains(60.0, 0.0));
	}

	#[test]
	fn media_extent_grows_with_label() {
		let m = Metrics::new(1.0, 112.0);
		let short = m.extent(NodeKind::Media, "TV");
		let long = m.extent(NodeKind::Media, "Broadcasting");
		assert!(long.half_width > short.half_width);
		assert_eq!(short.above, short.below);
	}
}
