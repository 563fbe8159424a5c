use std::rc::Rc;

use leptos::prelude::*;
use leptos::task::spawn_local;
use log::warn;

use crate::components::analytics::Analytics;
use crate::components::details::SelectedCompetency;
use crate::components::force_graph::ForceGraphCanvas;
use crate::components::legend::Legend;
use crate::config::ModelConfig;
use crate::download::download_json;
use crate::generation::{Extractor, GeminiExtractor, generate};
use crate::ontology::{EXPORT_FILE_NAME, OntologyData};
use crate::workbench::Workbench;

/// Placeholder shown before the first graph is generated.
#[component]
fn EmptyState() -> impl IntoView {
	view! {
		<div class="empty-state">
			<p class="empty-title">"Ready to Model"</p>
			<p class="empty-hint">
				"Click 'Generate Ontology Graph' to begin mapping competencies."
			</p>
		</div>
	}
}

/// Input sidebar plus graph panel.
#[component]
pub fn Home() -> impl IntoView {
	let workbench = RwSignal::new(Workbench::default());
	let extractor: Rc<dyn Extractor> =
		Rc::new(GeminiExtractor::new(ModelConfig::from_build_env()));

	// The graph is only re-read when a generation lands, not on every keystroke.
	let revision = Memo::new(move |_| workbench.with(Workbench::revision));
	let graph = Memo::new(move |_| {
		revision.track();
		workbench.with_untracked(|w| w.ontology().cloned())
	});
	let selected_id = Memo::new(move |_| workbench.with(|w| w.selected_id().map(str::to_string)));
	let selected = Memo::new(move |_| {
		let id = selected_id.get()?;
		graph.with(|g| g.as_ref()?.node(&id).cloned())
	});
	let loading = Memo::new(move |_| workbench.with(Workbench::loading));

	let on_generate = move |_| {
		let Some(text) = workbench.try_update(Workbench::begin_generation).flatten() else {
			return;
		};
		let extractor = extractor.clone();
		spawn_local(async move {
			let result = generate(extractor.as_ref(), &text).await;
			workbench.update(|w| w.finish_generation(result));
		});
	};

	let on_export = move |_| {
		if let Some(data) = graph.get_untracked() {
			if let Err(e) = download_json(&data, EXPORT_FILE_NAME) {
				warn!("export failed: {:?}", e);
			}
		}
	};

	view! {
		<div class="workbench">
			<aside class="sidebar">
				<header class="brand">
					<h1>
						<span class="accent">"Physical AI"</span>
						" Architect"
					</h1>
					<p class="tagline">"Ontology & Capability Modeler"</p>
				</header>

				<label class="field-label" for="raw-data">
					"Raw Data Input"
				</label>
				<textarea
					id="raw-data"
					class="raw-input"
					placeholder="Paste competency layers here..."
					prop:value=move || workbench.with(|w| w.raw_text.clone())
					on:input=move |ev| {
						let text = event_target_value(&ev);
						workbench.update(|w| w.raw_text = text);
					}
				></textarea>

				<button
					class="generate-button"
					class:loading=move || loading.get()
					disabled=move || !workbench.with(Workbench::can_generate)
					on:click=on_generate
				>
					{move || {
						if loading.get() { "Analyzing & Constructing..." } else { "Generate Ontology Graph" }
					}}
				</button>

				{move || {
					workbench
						.with(|w| w.error().map(str::to_string))
						.map(|message| view! { <div class="error-box">{message}</div> })
				}}

				<SelectedCompetency node=selected />
			</aside>

			<main class="graph-panel">
				<Show when=move || graph.with(Option::is_some) fallback=|| view! { <EmptyState /> }>
					<div class="graph-toolbar">
						<button class="export-button" on:click=on_export>
							"Export JSON (NetworkX)"
						</button>
					</div>
					<div class="graph-container">
						<Legend />
						<ForceGraphCanvas
							data=Signal::derive(move || graph.get().unwrap_or_default())
							revision=revision
							selected=selected_id
							on_select={move |id: Option<String>| workbench.update(|w| w.select(id))}
						/>
					</div>
					<Analytics stats=Signal::derive(move || {
						graph.with(|g| g.as_ref().map(OntologyData::stats).unwrap_or_default())
					}) />
				</Show>
			</main>
		</div>
	}
}
