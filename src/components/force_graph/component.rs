use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::{info, warn};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlElement, MouseEvent, WheelEvent};

use super::interaction::PointerInput;
use super::render;
use super::simulation::{Point, Viewport};
use super::state::{ForceGraphState, SelectionChanged};
use crate::ontology::OntologyData;

type SharedState = Rc<RefCell<Option<ForceGraphState>>>;

fn context_2d(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
	canvas
		.get_context("2d")
		.ok()
		.flatten()
		.and_then(|ctx| ctx.dyn_into().ok())
}

/// Pointer position relative to the canvas' top-left corner.
fn canvas_point(canvas: &HtmlCanvasElement, ev: &MouseEvent) -> Point {
	let rect = canvas.get_bounding_client_rect();
	Point::new(
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	)
}

/// Force-directed ontology view. Each new `revision` starts a fresh layout
/// session over `data`, even when the graph equals the previous one. The ring
/// follows `selected`; clicks only report through `on_select`.
#[component]
pub fn ForceGraphCanvas(
	#[prop(into)] data: Signal<OntologyData>,
	#[prop(into)] revision: Signal<u64>,
	#[prop(into)] selected: Signal<Option<String>>,
	#[prop(into)] on_select: Callback<Option<String>>,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: SharedState = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let (state_init, animate_init) = (state.clone(), animate.clone());

	Effect::new(move |_| {
		revision.track();
		let data = data.get_untracked();
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();

		// Static snapshot of the container size; later resizes keep the layout.
		let viewport = Viewport {
			width: width.unwrap_or_else(|| {
				canvas
					.parent_element()
					.map(|p| p.client_width() as f64)
					.filter(|w| *w > 0.0)
					.unwrap_or(800.0)
			}),
			height: height.unwrap_or_else(|| {
				canvas
					.parent_element()
					.map(|p| p.client_height() as f64)
					.filter(|h| *h > 0.0)
					.unwrap_or(600.0)
			}),
		};
		canvas.set_width(viewport.width as u32);
		canvas.set_height(viewport.height as u32);

		// The previous session stops before the new graph's first tick.
		if let Some(old) = state_init.borrow_mut().as_mut() {
			old.stop();
		}
		let mut session = ForceGraphState::new(&data, viewport);
		session.set_selected(selected.get_untracked());
		*state_init.borrow_mut() = Some(session);

		if animate_init.borrow().is_some() {
			return;
		}
		let Some(ctx) = context_2d(&canvas) else {
			warn!("force_graph: 2d canvas context unavailable");
			return;
		};
		info!("force_graph: starting animation loop");

		let (state_anim, animate_inner) = (state_init.clone(), animate_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if !canvas.is_connected() {
				if let Some(ref mut s) = *state_anim.borrow_mut() {
					s.stop();
				}
				info!("force_graph: canvas detached, animation loop halted");
				return;
			}
			if let Some(ref mut s) = *state_anim.borrow_mut() {
				// a settled layout still redraws for pan and zoom
				if !s.step(|s| render::render(s, &ctx)) {
					render::render(s, &ctx);
				}
				let _ = HtmlElement::style(&canvas).set_property("cursor", s.cursor());
			}
			if let (Some(cb), Some(window)) = (animate_inner.borrow().as_ref(), web_sys::window()) {
				let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let (Some(cb), Some(window)) = (animate_init.borrow().as_ref(), web_sys::window()) {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	{
		let state = state.clone();
		Effect::new(move |_| {
			let id = selected.get();
			if let Some(s) = state.borrow_mut().as_mut() {
				s.set_selected(id);
			}
		});
	}

	let dispatch = {
		let state = state.clone();
		move |input: PointerInput| {
			let change = state.borrow_mut().as_mut().and_then(|s| s.handle(input));
			if let Some(SelectionChanged(selected)) = change {
				on_select.run(selected);
			}
		}
	};
	let point = move |ev: &MouseEvent| {
		canvas_ref.get().map(|canvas| {
			let canvas: HtmlCanvasElement = canvas.into();
			canvas_point(&canvas, ev)
		})
	};

	let on_mousedown = {
		let dispatch = dispatch.clone();
		move |ev: MouseEvent| {
			if let Some(down) = point(&ev).and_then(|at| PointerInput::press(at, ev.button())) {
				dispatch(down);
			}
		}
	};
	let on_mousemove = {
		let dispatch = dispatch.clone();
		move |ev: MouseEvent| {
			if let Some(at) = point(&ev) {
				dispatch(PointerInput::Move { at });
			}
		}
	};
	let on_mouseup = {
		let dispatch = dispatch.clone();
		move |ev: MouseEvent| {
			if let Some(at) = point(&ev) {
				dispatch(PointerInput::Up { at });
			}
		}
	};
	let on_mouseleave = {
		let dispatch = dispatch.clone();
		move |_: MouseEvent| dispatch(PointerInput::Leave)
	};
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let mouse: &MouseEvent = &ev;
		if let Some(at) = point(mouse) {
			dispatch(PointerInput::Wheel {
				at,
				delta_y: ev.delta_y(),
			});
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="force-graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			style="display: block; cursor: grab;"
		/>
	}
}
