use super::graph::{DiagramGraph, NodeIdx, Position};

/// Pixel size of the drawing surface. Derived from the container on every
/// resize; node pixels are always `pos * size`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Viewport {
	pub width: f64,
	pub height: f64,
}

impl Viewport {
	pub fn new(width: f64, height: f64) -> Self {
		Self { width, height }
	}

	pub fn to_pixels(&self, pos: Position) -> (f64, f64) {
		(pos.x * self.width, pos.y * self.height)
	}

	pub fn to_normalized(&self, x: f64, y: f64) -> Position {
		let fraction = |v: f64, extent: f64| if extent > 0.0 { v / extent } else { 0.0 };
		Position::new(fraction(x, self.width), fraction(y, self.height))
	}
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LayoutMode {
	#[default]
	Free,
	YearGrid,
}

impl LayoutMode {
	pub fn toggled(self) -> Self {
		match self {
			LayoutMode::Free => LayoutMode::YearGrid,
			LayoutMode::YearGrid => LayoutMode::Free,
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridSpec {
	/// Empty border on every side, as a viewport fraction.
	pub margin: f64,
	/// Row height multiplier; the stretched grid stays vertically centred.
	pub stretch: f64,
}

/// Grid cells for every project node, newest first.
///
/// Projects are ordered by descending latest year (no years sorts last,
/// ties keep node order) and laid out row-major on a `ceil(sqrt(n))` wide
/// grid inside the margin.
pub fn year_grid(graph: &DiagramGraph, grid: GridSpec) -> Vec<(NodeIdx, Position)> {
	let mut projects: Vec<(NodeIdx, Option<i32>)> = graph
		.projects()
		.map(|(idx, node)| (idx, node.latest_year()))
		.collect();
	projects.sort_by(|a, b| b.1.cmp(&a.1));

	let n = projects.len();
	if n == 0 {
		return Vec::new();
	}
	let cols = (n as f64).sqrt().ceil() as usize;
	let rows = n.div_ceil(cols);

	let usable = 1.0 - 2.0 * grid.margin;
	let cell_w = usable / cols as f64;
	let cell_h = usable / rows as f64 * grid.stretch;
	let offset_y = grid.margin - (cell_h * rows as f64 - usable) / 2.0;

	projects
		.into_iter()
		.enumerate()
		.map(|(i, (idx, _))| {
			let (row, col) = (i / cols, i % cols);
			let pos = Position::new(
				grid.margin + (col as f64 + 0.5) * cell_w,
				offset_y + (row as f64 + 0.5) * cell_h,
			);
			(idx, pos)
		})
		.collect()
}

/// Target position of every node for `mode`, given where nodes are now.
/// Only project nodes move; media and upcoming nodes stay put.
pub fn layout_targets(
	graph: &DiagramGraph,
	mode: LayoutMode,
	grid: GridSpec,
) -> Vec<(NodeIdx, Position)> {
	match mode {
		LayoutMode::YearGrid => year_grid(graph, grid),
		LayoutMode::Free => graph
			.projects()
			.map(|(idx, _)| (idx, graph.baseline(idx)))
			.collect(),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::diagram::graph::tests::raw_node;
	use crate::components::diagram::types::RawNode;

	const GRID: GridSpec = GridSpec {
		margin: 0.15,
		stretch: 1.2,
	};

	fn project_with_years(id: &str, years: &[i32]) -> RawNode {
		let mut node = raw_node(id, "project", 0.5, 0.5);
		node.years = years.to_vec();
		node
	}

	#[test]
	fn normalized_conversion_inverts_pixels() {
		let vp = Viewport::new(1000.0, 500.0);
		assert_eq!(vp.to_normalized(250.0, 100.0), Position::new(0.25, 0.2));
		assert_eq!(Viewport::default().to_normalized(10.0, 10.0), Position::default());
	}

	#[test]
	fn four_projects_fill_a_two_by_two_grid_newest_first() {
		let graph = DiagramGraph::build(
			vec![
				project_with_years("a", &[2019, 2021]),
				project_with_years("b", &[2022]),
				project_with_years("c", &[2023]),
				project_with_years("d", &[2024]),
			],
			vec![],
			&[],
		);
		let cells = year_grid(&graph, GRID);
		let order: Vec<&str> = cells.iter().map(|(idx, _)| graph.nodes[*idx].id.as_str()).collect();
		assert_eq!(order, vec!["d", "c", "b", "a"]);

		let positions: Vec<Position> = cells.iter().map(|(_, p)| *p).collect();
		let approx = |a: f64, b: f64| (a - b).abs() < 1e-9;
		assert!(approx(positions[0].x, 0.325) && approx(positions[0].y, 0.29));
		assert!(approx(positions[1].x, 0.675) && approx(positions[1].y, 0.29));
		assert!(approx(positions[2].x, 0.325) && approx(positions[2].y, 0.71));
		assert!(approx(positions[3].x, 0.675) && approx(positions[3].y, 0.71));

		for (i, a) in positions.iter().enumerate() {
			assert!(a.x >= GRID.margin && a.x <= 1.0 - GRID.margin);
			assert!(a.y >= GRID.margin && a.y <= 1.0 - GRID.margin);
			for b in &positions[i + 1..] {
				assert_ne!(a, b);
			}
		}
	}

	#[test]
	fn grid_ignores_media_and_keeps_tie_order() {
		let graph = DiagramGraph::build(
			vec![
				project_with_years("first", &[2020]),
				raw_node("m1", "media", 0.1, 0.1),
				project_with_years("undated", &[]),
				project_with_years("second", &[2020]),
			],
			vec![],
			&[],
		);
		let order: Vec<&str> = year_grid(&graph, GRID)
			.iter()
			.map(|(idx, _)| graph.nodes[*idx].id.as_str())
			.collect();
		assert_eq!(order, vec!["first", "second", "undated"]);
	}

	#[test]
	fn free_targets_are_the_authored_baseline() {
		let graph = DiagramGraph::build(
			vec![raw_node("p1", "project", 0.3, 0.4), raw_node("m1", "media", 0.2, 0.2)],
			vec![],
			&[],
		);
		assert_eq!(
			layout_targets(&graph, LayoutMode::Free, GRID),
			vec![(0, Position::new(0.3, 0.4))]
		);
		assert!(year_grid(&DiagramGraph::default(), GRID).is_empty());
	}
}
