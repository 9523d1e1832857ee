//! DOM binding for the graph view and the Leptos component wrapping it.
//!
//! [`mount_graph`] builds the SVG surface inside a container, wires pointer
//! events on every node circle to the [`GraphView`], and drives ticks from
//! `requestAnimationFrame`. The returned [`ViewHandle`] tears all of it down.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use leptos::prelude::*;
use log::{error, info, warn};
use wasm_bindgen::prelude::*;
use web_sys::{Element, Event, HtmlElement, MouseEvent, PointerEvent, Window};

use super::config::ViewConfig;
use super::error::{GraphError, Result};
use super::layout::{ForceLayout, Point};
use super::render::SvgSurface;
use super::scene::{ElementIds, Viewport};
use super::state::GraphView;
use super::types::GraphData;

type SharedView = Rc<RefCell<GraphView<ForceLayout>>>;
type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

struct Listener {
	target: Element,
	event: &'static str,
	callback: Closure<dyn FnMut(Event)>,
}

fn listen(target: &Element, event: &'static str, handler: impl FnMut(Event) + 'static) -> Result<Listener> {
	let callback = Closure::<dyn FnMut(Event)>::new(handler);
	target.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())?;
	Ok(Listener {
		target: target.clone(),
		event,
		callback,
	})
}

fn report(result: Result<()>) {
	if let Err(e) = result {
		warn!("producoes-graph: render failed: {}", e);
	}
}

/// Pointer position relative to the drawing surface's bounding box, in CSS pixels.
fn surface_point(svg: &Element, ev: &MouseEvent) -> Point {
	let rect = svg.get_bounding_client_rect();
	Point::new(
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	)
}

/// Size the surface is currently drawn at, in CSS pixels.
fn rendered_size(svg: &Element) -> Viewport {
	let rect = svg.get_bounding_client_rect();
	Viewport::new(rect.width(), rect.height())
}

fn window_viewport(window: &Window) -> Option<Viewport> {
	let width = window.inner_width().ok()?.as_f64()?;
	let height = window.inner_height().ok()?.as_f64()?;
	Some(Viewport::new(width, height))
}

/// Lifecycle handle for a mounted graph.
pub struct ViewHandle {
	view: SharedView,
	surface: Rc<SvgSurface>,
	listeners: Vec<Listener>,
	// Owns the frame closure; the closure itself only holds a weak reference.
	_animate: FrameCallback,
	frame: Rc<Cell<Option<i32>>>,
	window: Window,
}

impl ViewHandle {
	/// Stop the simulation, cancel the pending frame, detach listeners and
	/// remove the SVG surface and tooltip from the container.
	///
	/// Closures stay owned by the handle until it is dropped, so destroying
	/// from inside an event callback is safe.
	pub fn destroy(&self) {
		if self.view.borrow().is_destroyed() {
			return;
		}
		self.view.borrow_mut().destroy();
		if let Some(id) = self.frame.take() {
			let _ = self.window.cancel_animation_frame(id);
		}
		for l in &self.listeners {
			let _ = l
				.target
				.remove_event_listener_with_callback(l.event, l.callback.as_ref().unchecked_ref());
		}
		self.surface.remove();
	}

	/// Whether [`ViewHandle::destroy`] has run.
	pub fn is_destroyed(&self) -> bool {
		self.view.borrow().is_destroyed()
	}
}

impl Drop for ViewHandle {
	fn drop(&mut self) {
		self.destroy();
	}
}

fn node_listeners(view: &SharedView, surface: &Rc<SvgSurface>, i: usize, circle: &Element) -> Result<Vec<Listener>> {
	let mut out = Vec::with_capacity(7);

	let (v, s) = (view.clone(), surface.clone());
	out.push(listen(circle, "pointerenter", move |ev: Event| {
		let Some(ev) = ev.dyn_ref::<MouseEvent>() else {
			return;
		};
		let mut view = v.borrow_mut();
		view.pointer_enter(i, surface_point(s.svg(), ev));
		report(s.render_tooltip(view.scene()));
	})?);

	let (v, s, el) = (view.clone(), surface.clone(), circle.clone());
	out.push(listen(circle, "pointermove", move |ev: Event| {
		let Some(ev) = ev.dyn_ref::<PointerEvent>() else {
			return;
		};
		let pointer = surface_point(s.svg(), ev);
		let mut view = v.borrow_mut();
		view.pointer_move(i, pointer);
		if el.has_pointer_capture(ev.pointer_id()) {
			let at = view.scene().viewport.css_to_surface(pointer, rendered_size(s.svg()));
			view.drag_move(i, at);
		}
		report(s.render_tooltip(view.scene()));
	})?);

	let (v, s) = (view.clone(), surface.clone());
	out.push(listen(circle, "pointerleave", move |_: Event| {
		let mut view = v.borrow_mut();
		view.pointer_leave(i);
		report(s.render_tooltip(view.scene()));
	})?);

	let (v, el) = (view.clone(), circle.clone());
	out.push(listen(circle, "pointerdown", move |ev: Event| {
		let Some(ev) = ev.dyn_ref::<PointerEvent>() else {
			return;
		};
		ev.prevent_default();
		let _ = el.set_pointer_capture(ev.pointer_id());
		v.borrow_mut().drag_start(i);
	})?);

	for event in ["pointerup", "pointercancel"] {
		let (v, el) = (view.clone(), circle.clone());
		out.push(listen(circle, event, move |ev: Event| {
			if let Some(ev) = ev.dyn_ref::<PointerEvent>() {
				if el.has_pointer_capture(ev.pointer_id()) {
					let _ = el.release_pointer_capture(ev.pointer_id());
				}
			}
			v.borrow_mut().drag_end(i);
		})?);
	}

	let v = view.clone();
	out.push(listen(circle, "click", move |_: Event| {
		let handler = v.borrow().click(i);
		if let Some(handler) = handler {
			handler.call();
		}
	})?);

	Ok(out)
}

/// Build a graph view inside `container` and start its simulation.
///
/// The container's current client size becomes the viewport, falling back to
/// the window size and then 800x600 when the container has no area. The
/// container is made a positioning context so the tooltip can be placed over
/// the surface.
///
/// Dropping the returned handle destroys the view, so keep it alive for as
/// long as the graph should stay on screen. Do not drop it from inside one of
/// the graph's own click callbacks.
pub fn mount_graph(
	container: &HtmlElement,
	data: GraphData,
	config: ViewConfig,
	ids: &ElementIds,
) -> Result<ViewHandle> {
	let window: Window = web_sys::window().ok_or_else(|| GraphError::dom("window unavailable"))?;
	let document = window
		.document()
		.ok_or_else(|| GraphError::dom("document unavailable"))?;

	let measured = Viewport::new(
		container.client_width() as f64,
		container.client_height() as f64,
	);
	let viewport = measured.or_fallback(window_viewport(&window));
	if viewport != measured {
		warn!(
			"producoes-graph: container has no area, using {}x{}",
			viewport.width, viewport.height
		);
	}
	let view = GraphView::new(data, viewport, config.clone(), ids)?;
	let surface = Rc::new(SvgSurface::build(&document, view.scene(), &config)?);

	container.style().set_property("position", "relative")?;
	container.append_child(surface.svg())?;
	container.append_child(surface.tooltip())?;

	let view: SharedView = Rc::new(RefCell::new(view));
	let mut listeners = Vec::new();
	for (i, circle) in surface.circles().iter().enumerate() {
		listeners.extend(node_listeners(&view, &surface, i, circle)?);
	}

	let animate: FrameCallback = Rc::new(RefCell::new(None));
	let frame = Rc::new(Cell::new(None));
	let (view_anim, surface_anim, frame_anim) = (view.clone(), surface.clone(), frame.clone());
	let animate_weak: Weak<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::downgrade(&animate);
	*animate.borrow_mut() = Some(Closure::new(move || {
		frame_anim.set(None);
		{
			let mut v = view_anim.borrow_mut();
			if v.is_destroyed() {
				return;
			}
			if v.tick() {
				report(surface_anim.render_positions(v.scene()));
			}
		}
		let Some(animate) = animate_weak.upgrade() else {
			return;
		};
		if let (Some(win), Some(cb)) = (web_sys::window(), animate.borrow().as_ref()) {
			if let Ok(id) = win.request_animation_frame(cb.as_ref().unchecked_ref()) {
				frame_anim.set(Some(id));
			}
		}
	}));
	if let Some(ref cb) = *animate.borrow() {
		frame.set(Some(window.request_animation_frame(cb.as_ref().unchecked_ref())?));
	}

	info!(
		"producoes-graph: mounted {} nodes into {}x{} container",
		view.borrow().node_count(),
		viewport.width,
		viewport.height
	);

	Ok(ViewHandle {
		view,
		surface,
		listeners,
		_animate: animate,
		frame,
		window,
	})
}

/// Renders an interactive force-directed graph as SVG inside a `div`.
///
/// The graph fills the div, which in turn takes the size of its parent. The
/// view is built once, after the div is mounted, and destroyed on cleanup.
#[component]
pub fn ForceGraphSvg(
	/// Nodes and links to draw.
	data: GraphData,
	/// Visual and layout settings. Defaults to [`ViewConfig::default`].
	#[prop(optional)]
	config: Option<ViewConfig>,
	/// Prefix of the DOM ids given to the surface and tooltip.
	#[prop(into, default = "producoes-graph".to_string())]
	id_prefix: String,
) -> impl IntoView {
	let container_ref = NodeRef::<leptos::html::Div>::new();
	let handle = StoredValue::new_local(None::<ViewHandle>);
	let ids = ElementIds::new(id_prefix);

	Effect::new(move |_| {
		let Some(container) = container_ref.get() else {
			return;
		};
		if handle.with_value(|h| h.is_some()) {
			return;
		}
		match mount_graph(&container, data.clone(), config.clone().unwrap_or_default(), &ids) {
			Ok(h) => handle.set_value(Some(h)),
			Err(e) => error!("producoes-graph: failed to mount graph: {}", e),
		}
	});

	on_cleanup(move || {
		handle.try_with_value(|h| {
			if let Some(h) = h {
				h.destroy();
			}
		});
	});

	view! { <div node_ref=container_ref class="producoes-graph" style="width: 100%; height: 100%;" /> }
}
