use leptos::prelude::*;

use crate::ontology::OntologyNode;

/// Sidebar panel describing the selected competency.
#[component]
pub fn SelectedCompetency(#[prop(into)] node: Signal<Option<OntologyNode>>) -> impl IntoView {
	view! {
		<section class="selected-panel">
			<h3 class="panel-heading">"Selected Competency"</h3>
			{move || match node.get() {
				Some(node) => {
					let layer = node.layer();
					let color = layer.map(|l| l.color()).unwrap_or("#999999");
					let layer_label = layer.map(|l| l.label()).unwrap_or("Unknown layer");
					view! {
						<div class="selected-card">
							<div class="selected-layer">
								<span
									class="layer-dot"
									style=format!("background-color: {}", color)
								></span>
								<span class="layer-name">{layer_label}</span>
							</div>
							<h2 class="selected-label">{node.label}</h2>
							<p class="selected-description">{node.description}</p>
						</div>
					}
						.into_any()
				}
				None => {
					view! { <div class="selected-empty">"Select a node to view details"</div> }
						.into_any()
				}
			}}
		</section>
	}
}
