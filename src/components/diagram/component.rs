use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use leptos::task::spawn_local;
use log::{debug, warn};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, PointerEvent, Window};

use super::filter::KeywordFilter;
use super::graph::DiagramGraph;
use super::layout::LayoutMode;
use super::render::{self, ImageCache};
use super::state::{DiagramState, NodeAction};
use crate::config::DiagramConfig;

type PointerListener = Rc<RefCell<Option<Closure<dyn FnMut(PointerEvent)>>>>;

const DRAG_END_EVENTS: [&str; 2] = ["pointerup", "pointercancel"];

fn window_size(window: &Window) -> (f64, f64) {
	let dim = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
	(dim(window.inner_width()), dim(window.inner_height()))
}

fn local_point(canvas: &HtmlCanvasElement, ev: &MouseEvent) -> (f64, f64) {
	let rect = canvas.get_bounding_client_rect();
	(
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	)
}

/// Registers window-level handlers for the lifetime of one drag. The end
/// handler also covers `pointercancel`.
fn attach_drag_listeners(on_move: &PointerListener, on_end: &PointerListener) {
	let Some(window) = web_sys::window() else {
		return;
	};
	if let Some(ref cb) = *on_move.borrow() {
		let _ = window.add_event_listener_with_callback("pointermove", cb.as_ref().unchecked_ref());
	}
	if let Some(ref cb) = *on_end.borrow() {
		for event in DRAG_END_EVENTS {
			let _ = window.add_event_listener_with_callback(event, cb.as_ref().unchecked_ref());
		}
	}
}

fn detach_drag_listeners(on_move: &PointerListener, on_end: &PointerListener) {
	let Some(window) = web_sys::window() else {
		return;
	};
	if let Some(ref cb) = *on_move.borrow() {
		let _ = window
			.remove_event_listener_with_callback("pointermove", cb.as_ref().unchecked_ref());
	}
	if let Some(ref cb) = *on_end.borrow() {
		for event in DRAG_END_EVENTS {
			let _ = window.remove_event_listener_with_callback(event, cb.as_ref().unchecked_ref());
		}
	}
}

/// Release point in canvas coordinates, or `None` when the pointer came up
/// over something other than the canvas.
fn release_point(canvas: &HtmlCanvasElement, ev: &PointerEvent) -> Option<(f64, f64)> {
	let on_canvas = ev
		.target()
		.is_some_and(|target| JsValue::from(target) == JsValue::from(canvas.clone()));
	on_canvas.then(|| local_point(canvas, ev))
}

/// Canvas rendering of the project/media diagram.
///
/// The canvas fills the window and follows its size. Positions are kept
/// normalized, so resizing only changes the pixel mapping.
/// Clicks (gestures that stay under the drag threshold) are reported through
/// `on_action`; everything else about the interaction stays inside.
#[component]
pub fn DiagramCanvas(
	graph: DiagramGraph,
	#[prop(into)] filter: Signal<KeywordFilter>,
	#[prop(into)] layout_mode: Signal<LayoutMode>,
	on_action: Callback<NodeAction>,
) -> impl IntoView {
	let config = use_context::<DiagramConfig>().unwrap_or_default();
	let settings = config.settings();
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: Rc<RefCell<Option<DiagramState>>> = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let (state_init, animate_init, resize_cb_init) =
		(state.clone(), animate.clone(), resize_cb.clone());

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			return;
		};

		let (w, h) = window_size(&window);
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let Some(ctx) = canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
		else {
			warn!("2d canvas context unavailable");
			return;
		};

		let mut initial = DiagramState::new(graph.clone(), w, h, settings);
		initial.set_filter(filter.get_untracked());
		initial.set_layout_mode(layout_mode.get_untracked(), false);
		*state_init.borrow_mut() = Some(initial);

		let (state_resize, canvas_resize) = (state_init.clone(), canvas.clone());
		*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
			let Some(win) = web_sys::window() else {
				return;
			};
			let (nw, nh) = window_size(&win);
			canvas_resize.set_width(nw as u32);
			canvas_resize.set_height(nh as u32);
			if let Some(ref mut s) = *state_resize.borrow_mut() {
				s.resize(nw, nh);
			}
		}));
		if let Some(ref cb) = *resize_cb_init.borrow() {
			let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}

		let mut images = ImageCache::new(config.data.clone());
		let mut last_frame: Option<f64> = None;
		let (state_anim, animate_inner, resize_inner) =
			(state_init.clone(), animate_init.clone(), resize_cb_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move |now: f64| {
			// Unmounted: release the resize handler and let this loop end.
			if !canvas.is_connected() {
				debug!("diagram canvas detached, stopping render loop");
				let resize = resize_inner.borrow_mut().take();
				if let (Some(win), Some(cb)) = (web_sys::window(), resize) {
					let _ = win
						.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
				}
				if let Some(cb) = animate_inner.borrow_mut().take() {
					spawn_local(async move { drop(cb) });
				}
				return;
			}

			let dt = last_frame.map_or(0.0, |last| ((now - last) / 1000.0).clamp(0.0, 0.1));
			last_frame = Some(now);
			if let Some(ref mut s) = *state_anim.borrow_mut() {
				s.tick(dt);
				render::render(s, &ctx, &mut images);
			}
			if let (Some(win), Some(cb)) = (web_sys::window(), animate_inner.borrow().as_ref()) {
				let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let state_filter = state.clone();
	Effect::new(move |_| {
		let current = filter.get();
		if let Some(ref mut s) = *state_filter.borrow_mut() {
			s.set_filter(current);
		}
	});

	let state_layout = state.clone();
	Effect::new(move |_| {
		let mode = layout_mode.get();
		if let Some(ref mut s) = *state_layout.borrow_mut() {
			if s.layout != mode {
				s.set_layout_mode(mode, true);
			}
		}
	});

	let drag_move: PointerListener = Rc::new(RefCell::new(None));
	let drag_up: PointerListener = Rc::new(RefCell::new(None));

	let state_dm = state.clone();
	*drag_move.borrow_mut() = Some(Closure::new(move |ev: PointerEvent| {
		let Some(canvas) = canvas_ref.get_untracked() else {
			return;
		};
		let (x, y) = local_point(&canvas, &ev);
		if let Some(ref mut s) = *state_dm.borrow_mut() {
			s.pointer_move(x, y);
		}
	}));

	// Weak handles: the end closure lives in one of these slots itself.
	let (state_du, drag_move_du, drag_up_du) =
		(state.clone(), Rc::downgrade(&drag_move), Rc::downgrade(&drag_up));
	*drag_up.borrow_mut() = Some(Closure::new(move |ev: PointerEvent| {
		if let (Some(on_move), Some(on_end)) = (drag_move_du.upgrade(), drag_up_du.upgrade()) {
			detach_drag_listeners(&on_move, &on_end);
		}
		let point = canvas_ref
			.get_untracked()
			.and_then(|canvas| release_point(&canvas, &ev));
		let action = state_du.borrow_mut().as_mut().and_then(|s| {
			if ev.type_() == "pointercancel" {
				s.cancel_drag();
				s.set_hover(None);
				None
			} else {
				s.release(point)
			}
		});
		if let Some(action) = action {
			on_action.run(action);
		}
	}));

	let state_pd = state.clone();
	let on_pointerdown = move |ev: PointerEvent| {
		if ev.button() != 0 {
			return;
		}
		let Some(canvas) = canvas_ref.get_untracked() else {
			return;
		};
		let (x, y) = local_point(&canvas, &ev);
		let grabbed = state_pd
			.borrow_mut()
			.as_mut()
			.and_then(|s| s.pointer_down(x, y))
			.is_some();
		if grabbed {
			ev.prevent_default();
			attach_drag_listeners(&drag_move, &drag_up);
		}
	};

	let state_pm = state.clone();
	let on_pointermove = move |ev: PointerEvent| {
		let Some(canvas) = canvas_ref.get_untracked() else {
			return;
		};
		let (x, y) = local_point(&canvas, &ev);
		if let Some(ref mut s) = *state_pm.borrow_mut() {
			if s.drag.is_none() {
				let hovered = s.node_at_position(x, y);
				s.set_hover(hovered);
			}
		}
	};

	let state_pl = state.clone();
	let on_pointerleave = move |_: PointerEvent| {
		if let Some(ref mut s) = *state_pl.borrow_mut() {
			if s.drag.is_none() {
				s.set_hover(None);
			}
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="diagram-canvas"
			on:pointerdown=on_pointerdown
			on:pointermove=on_pointermove
			on:pointerleave=on_pointerleave
			style="display: block; cursor: grab; touch-action: none;"
		/>
	}
}
