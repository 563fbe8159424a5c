use leptos::prelude::*;

use crate::ontology::GraphStats;

/// Node/edge counts and average connectivity of the current graph.
#[component]
pub fn Analytics(#[prop(into)] stats: Signal<GraphStats>) -> impl IntoView {
	view! {
		<div class="analytics-panel">
			<h4 class="analytics-heading">"SYSTEM ANALYTICS"</h4>
			<div class="analytics-row">
				<span class="analytics-key">"Nodes:"</span>
				<span>{move || stats.get().nodes}</span>
			</div>
			<div class="analytics-row">
				<span class="analytics-key">"Edges:"</span>
				<span>{move || stats.get().links}</span>
			</div>
			<div class="analytics-row">
				<span class="analytics-key">"Connectivity:"</span>
				<span>{move || format!("{:.2} avg/node", stats.get().connectivity())}</span>
			</div>
		</div>
	}
}
