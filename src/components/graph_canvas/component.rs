use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::prelude::*;
use log::{info, warn};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, KeyboardEvent, MouseEvent, Window};

use super::render;
use super::state::GraphCanvasState;
use super::types::{
	CanvasConfig, ContextTarget, EdgeOutcome, Mode, PathOutcome, Point, PointerOutcome,
	WeightPrompt,
};
use crate::graph::Weight;

const STORAGE_KEY: &str = "shortest-path-canvas.snapshot";

/// Weight dialog backed by `window.prompt`; re-asks until it gets a
/// non-negative number or the user cancels.
struct DialogPrompt;

impl WeightPrompt for DialogPrompt {
	fn ask_weight(&mut self, current: Option<Weight>) -> Option<Weight> {
		let window = web_sys::window()?;
		let default = current.map(|w| w.to_string()).unwrap_or_default();
		loop {
			let answer = window
				.prompt_with_message_and_default("Edge weight (non-negative):", &default)
				.ok()
				.flatten()?;
			match answer.trim().parse::<Weight>() {
				Ok(w) if w.is_finite() && w >= 0.0 => return Some(w),
				_ => {
					let _ = window.alert_with_message("Please enter a non-negative number.");
				}
			}
		}
	}
}

fn confirm(message: &str) -> bool {
	web_sys::window()
		.and_then(|w| w.confirm_with_message(message).ok())
		.unwrap_or(false)
}

fn alert(message: &str) {
	if let Some(w) = web_sys::window() {
		let _ = w.alert_with_message(message);
	}
}

fn canvas_point(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<Point> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?;
	let rect = canvas.get_bounding_client_rect();
	Some(Point::new(
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

fn display_if(visible: bool) -> &'static str {
	if visible { "" } else { "display: none;" }
}

#[component]
pub fn GraphEditor(
	#[prop(default = true)] undirected: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state = Rc::new(RefCell::new(GraphCanvasState::new(
		undirected,
		CanvasConfig::default(),
	)));
	let size = Rc::new(Cell::new((800.0, 600.0)));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));

	let mode = RwSignal::new(Mode::default());
	let status = RwSignal::new(Mode::default().hint().to_string());
	let names = RwSignal::new(Vec::<String>::new());
	let start_name = RwSignal::new(String::new());
	let goal_name = RwSignal::new(String::new());
	let menu = RwSignal::new(None::<(ContextTarget, f64, f64)>);
	let snapshot_text = RwSignal::new(String::new());

	let sync_names: Rc<dyn Fn()> = {
		let state = state.clone();
		Rc::new(move || {
			let list = state.borrow().vertex_names();
			let first = list.first().cloned().unwrap_or_default();
			for picked in [start_name, goal_name] {
				if !list.contains(&picked.get_untracked()) {
					picked.set(first.clone());
				}
			}
			names.set(list);
		})
	};

	let (state_init, size_init, animate_init) = (state.clone(), size.clone(), animate.clone());
	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window): Option<Window> = web_sys::window() else {
			return;
		};

		let (w, h) = (
			width.unwrap_or_else(|| {
				canvas
					.parent_element()
					.map(|p| p.client_width() as f64)
					.filter(|w| *w > 0.0)
					.unwrap_or(800.0)
			}),
			height.unwrap_or(600.0),
		);
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);
		size_init.set((w, h));

		let Some(ctx) = canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
		else {
			warn!("2d canvas context unavailable");
			return;
		};

		let (state_anim, size_anim, animate_inner) =
			(state_init.clone(), size_init.clone(), animate_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if let Ok(s) = state_anim.try_borrow() {
				let (w, h) = size_anim.get();
				render::render(&s, &ctx, w, h);
			}
			if let (Some(cb), Some(win)) = (&*animate_inner.borrow(), web_sys::window()) {
				let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let (state_md, sync_md) = (state.clone(), sync_names.clone());
	let on_mousedown = move |ev: MouseEvent| {
		if ev.button() != 0 {
			return;
		}
		menu.set(None);
		let Some(at) = canvas_point(canvas_ref, &ev) else {
			return;
		};
		let outcome = state_md.borrow_mut().pointer_down(at, &mut DialogPrompt);
		match outcome {
			PointerOutcome::VertexCreated(_) => sync_md(),
			PointerOutcome::Edge(EdgeOutcome::Pending(_)) => {
				status.set("Pick the second vertex, or click the first one again to cancel.".into())
			}
			PointerOutcome::Edge(EdgeOutcome::Cancelled) => status.set("Edge cancelled.".into()),
			PointerOutcome::Edge(EdgeOutcome::Duplicate { .. }) => {
				alert("An edge between these vertices already exists.");
			}
			PointerOutcome::Edge(EdgeOutcome::Created { weight, .. }) => {
				status.set(format!("Edge added with weight {weight}."))
			}
			PointerOutcome::Rejected(err) => alert(&err.to_string()),
			PointerOutcome::Edge(EdgeOutcome::PromptCancelled)
			| PointerOutcome::DragStarted(_)
			| PointerOutcome::Ignored => {}
		}
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		if let Some(at) = canvas_point(canvas_ref, &ev) {
			state_mm.borrow_mut().pointer_move(at);
		}
	};

	let state_mu = state.clone();
	let on_mouseup = move |_: MouseEvent| state_mu.borrow_mut().pointer_up();

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| state_ml.borrow_mut().pointer_up();

	let state_cm = state.clone();
	let on_contextmenu = move |ev: MouseEvent| {
		ev.prevent_default();
		let Some(at) = canvas_point(canvas_ref, &ev) else {
			return;
		};
		let target = state_cm.borrow().context_target(at);
		menu.set(target.map(|t| (t, at.x, at.y)));
	};

	let state_kd = state.clone();
	let on_keydown = move |ev: KeyboardEvent| {
		if ev.key() == "Escape" {
			state_kd.borrow_mut().cancel_pending_edge();
			menu.set(None);
		}
	};

	let (state_dv, sync_dv) = (state.clone(), sync_names.clone());
	let on_delete_vertex = move |_| {
		let Some((ContextTarget::Vertex(id), ..)) = menu.get_untracked() else {
			return;
		};
		menu.set(None);
		let removed = state_dv.borrow_mut().delete_vertex(id);
		sync_dv();
		status.set(format!("Vertex deleted; edge entries removed: {}.", removed.len()));
	};

	let state_ew = state.clone();
	let on_edit_weight = move |_| {
		let Some((ContextTarget::Edge(u, v), ..)) = menu.get_untracked() else {
			return;
		};
		menu.set(None);
		let result = state_ew
			.borrow_mut()
			.edit_edge_weight(u, v, &mut DialogPrompt);
		match result {
			Ok(Some(w)) => status.set(format!("Edge weight updated: {w}.")),
			Ok(None) => {}
			Err(err) => alert(&err.to_string()),
		}
	};

	let state_de = state.clone();
	let on_delete_edge = move |_| {
		let Some((ContextTarget::Edge(u, v), ..)) = menu.get_untracked() else {
			return;
		};
		menu.set(None);
		state_de.borrow_mut().delete_edge(u, v);
		status.set("Edge deleted.".into());
	};

	let state_calc = state.clone();
	let on_calculate = move |_| {
		let outcome = state_calc
			.borrow_mut()
			.calculate_path(&start_name.get_untracked(), &goal_name.get_untracked());
		match outcome {
			Ok(PathOutcome::Found {
				distance, names, ..
			}) => status.set(format!("Length = {distance:.3}; path: {}", names.join(" → "))),
			Ok(PathOutcome::Unreachable) => status.set("No path.".into()),
			Ok(PathOutcome::SameEndpoints) => alert("Start and finish are the same vertex."),
			Ok(PathOutcome::MissingEndpoints) => alert("Choose a start and a finish."),
			Err(err) => alert(&err.to_string()),
		}
	};

	let state_ch = state.clone();
	let on_clear_highlight = move |_| {
		if state_ch.borrow().highlighted_path().is_empty() {
			return;
		}
		state_ch.borrow_mut().clear_highlight();
		status.set(String::new());
	};

	let (state_ca, sync_ca) = (state.clone(), sync_names.clone());
	let on_clear_all = move |_| {
		if !confirm("Delete the whole graph?") {
			return;
		}
		state_ca.borrow_mut().clear_all();
		menu.set(None);
		sync_ca();
		status.set(String::new());
	};

	let state_save = state.clone();
	let on_save = move |_| {
		let text = {
			let s = state_save.borrow();
			if s.graph().is_empty() {
				status.set("The graph is empty, nothing to save.".into());
				return;
			}
			s.snapshot().to_json()
		};
		let text = match text {
			Ok(text) => text,
			Err(err) => {
				alert(&format!("Save failed: {err}"));
				return;
			}
		};
		let stored = web_sys::window()
			.and_then(|w| w.local_storage().ok().flatten())
			.map(|storage| storage.set_item(STORAGE_KEY, &text).is_ok())
			.unwrap_or(false);
		snapshot_text.set(text);
		if stored {
			info!("snapshot written to local storage");
			status.set("Saved.".into());
		} else {
			status.set("Local storage unavailable; snapshot shown below.".into());
		}
	};

	let (state_load, sync_load) = (state.clone(), sync_names.clone());
	let load_text = Rc::new(move |text: String| {
		let occupied = !state_load.borrow().graph().is_empty();
		if occupied && !confirm("Replace the current graph?") {
			return;
		}
		let result = state_load.borrow_mut().load_json(&text);
		match result {
			Ok(()) => {
				menu.set(None);
				sync_load();
				status.set("Loaded.".into());
			}
			Err(err) => alert(&format!("Format error: {err}")),
		}
	});

	let load_stored = load_text.clone();
	let on_load = move |_| {
		let stored = web_sys::window()
			.and_then(|w| w.local_storage().ok().flatten())
			.and_then(|storage| storage.get_item(STORAGE_KEY).ok().flatten());
		match stored {
			Some(text) => load_stored(text),
			None => status.set("No saved graph found.".into()),
		}
	};

	let on_import = move |_| load_text(snapshot_text.get_untracked());

	let mode_buttons = Mode::ALL
		.into_iter()
		.map(|m| {
			let state = state.clone();
			let on_change = move |_| {
				state.borrow_mut().set_mode(m);
				mode.set(m);
				menu.set(None);
				status.set(m.hint().to_string());
			};
			view! {
				<label class="mode-option">
					<input
						type="radio"
						name="mode"
						prop:checked=move || mode.get() == m
						on:change=on_change
					/>
					{m.label()}
				</label>
			}
		})
		.collect_view();

	let name_options = move || {
		names
			.get()
			.into_iter()
			.map(|n| view! { <option value=n.clone()>{n.clone()}</option> })
			.collect_view()
	};

	view! {
		<div class="graph-editor" tabindex="0" on:keydown=on_keydown>
			<div class="toolbar">
				<span>"Mode:"</span>
				{mode_buttons}
				<span class="separator" />
				<span>"Start:"</span>
				<select
					prop:value=move || start_name.get()
					on:change=move |ev| start_name.set(event_target_value(&ev))
				>
					{name_options}
				</select>
				<span>"Finish:"</span>
				<select
					prop:value=move || goal_name.get()
					on:change=move |ev| goal_name.set(event_target_value(&ev))
				>
					{name_options}
				</select>
				<button on:click=on_calculate>"Find path"</button>
				<button on:click=on_clear_highlight>"Clear highlight"</button>
				<button on:click=on_clear_all>"Delete all"</button>
				<span class="separator" />
				<button on:click=on_save>"Save"</button>
				<button on:click=on_load>"Open"</button>
			</div>
			<div class="canvas-wrap" style="position: relative;">
				<canvas
					node_ref=canvas_ref
					class="graph-canvas"
					on:mousedown=on_mousedown
					on:mousemove=on_mousemove
					on:mouseup=on_mouseup
					on:mouseleave=on_mouseleave
					on:contextmenu=on_contextmenu
					style="display: block;"
				/>
				<div
					class="context-menu"
					style=move || match menu.get() {
						Some((_, x, y)) => format!("position: absolute; left: {x}px; top: {y}px;"),
						None => "display: none;".to_string(),
					}
				>
					<button
						style=move || display_if(matches!(menu.get(), Some((ContextTarget::Vertex(_), ..))))
						on:click=on_delete_vertex
					>
						"Delete vertex"
					</button>
					<button
						style=move || display_if(matches!(menu.get(), Some((ContextTarget::Edge(..), ..))))
						on:click=on_edit_weight
					>
						"Edit weight"
					</button>
					<button
						style=move || display_if(matches!(menu.get(), Some((ContextTarget::Edge(..), ..))))
						on:click=on_delete_edge
					>
						"Delete edge"
					</button>
				</div>
			</div>
			<div class="status">
				<span>"Result: "</span>
				<span class="result">{move || status.get()}</span>
			</div>
			<details class="snapshot">
				<summary>"Snapshot JSON"</summary>
				<textarea
					rows="8"
					prop:value=move || snapshot_text.get()
					on:input=move |ev| snapshot_text.set(event_target_value(&ev))
				/>
				<button on:click=on_import>"Load from text"</button>
			</details>
		</div>
	}
}
