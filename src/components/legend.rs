use leptos::prelude::*;

use crate::ontology::Layer;

/// Layer colour key overlaid on the graph.
#[component]
pub fn Legend() -> impl IntoView {
	view! {
		<div class="graph-legend">
			{Layer::ALL
				.into_iter()
				.map(|layer| {
					view! {
						<div class="legend-row">
							<span
								class="legend-swatch"
								style=format!("background-color: {}", layer.color())
							></span>
							<span class="legend-label">{layer.short_label()}</span>
						</div>
					}
				})
				.collect_view()}
		</div>
	}
}
