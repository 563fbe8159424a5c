use log::debug;

use super::interaction::{Effect, InteractionState, Mode, NodeHit, PointerInput};
use super::simulation::{Point, Simulation, SimulationParams, Viewport};
use crate::ontology::{Layer, OntologyData, OntologyLink};

/// Fallback for nodes whose group slipped past validation.
const UNKNOWN_COLOR: &str = "#999999";

pub const NODE_RADIUS: f64 = 12.0;
pub const HIT_RADIUS: f64 = 12.0;

#[derive(Clone, Debug)]
pub struct NodeInfo {
	pub id: String,
	pub label: String,
	pub color: &'static str,
}

/// Selection reported by a pointer gesture.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectionChanged(pub Option<String>);

/// One canvas session: a graph, its simulation and the gesture state.
pub struct ForceGraphState {
	pub simulation: Simulation,
	pub interaction: InteractionState,
	pub nodes: Vec<NodeInfo>,
	pub links: Vec<OntologyLink>,
	/// Mirror of the owner's selection, set through [`Self::set_selected`].
	pub selected: Option<String>,
	pub viewport: Viewport,
}

impl ForceGraphState {
	pub fn new(data: &OntologyData, viewport: Viewport) -> Self {
		let nodes = data
			.nodes
			.iter()
			.map(|node| NodeInfo {
				id: node.id.clone(),
				label: node.label.clone(),
				color: node.layer().map(Layer::color).unwrap_or(UNKNOWN_COLOR),
			})
			.collect();

		Self {
			simulation: Simulation::new(data, viewport, SimulationParams::default()),
			interaction: InteractionState::default(),
			nodes,
			links: data.links.clone(),
			selected: None,
			viewport,
		}
	}

	pub fn screen_to_graph(&self, screen: Point) -> Point {
		self.interaction.transform.invert(screen)
	}

	/// Topmost node under a canvas point. Nodes are drawn in order, so the last
	/// match wins.
	pub fn node_at_position(&self, screen: Point) -> Option<NodeHit> {
		let world = self.screen_to_graph(screen);
		self.simulation
			.positions()
			.iter()
			// HIT_RADIUS is in world-space, scales with zoom like nodes
			.filter(|(_, p)| p.distance(world) < HIT_RADIUS)
			.last()
			.map(|(id, position)| NodeHit {
				id: id.to_string(),
				position,
			})
	}

	/// Feed one pointer input through the gesture state machine and apply the
	/// resulting effects. Selection changes are reported, not applied; the owner
	/// decides and writes back with [`Self::set_selected`].
	pub fn handle(&mut self, input: PointerInput) -> Option<SelectionChanged> {
		let input = match input {
			PointerInput::Down { at, .. } => PointerInput::Down {
				at,
				hit: self.node_at_position(at),
			},
			other => other,
		};

		let (next, effects) = std::mem::take(&mut self.interaction).transition(input);
		self.interaction = next;

		let mut change = None;
		for effect in effects {
			match effect {
				Effect::Pin { id, at } => {
					self.simulation.pin(&id, at);
				}
				Effect::Unpin { id } => {
					debug!("force_graph: release {}", id);
					self.simulation.unpin(&id);
				}
				Effect::Reheat => self.simulation.reheat(),
				Effect::Cool => self.simulation.cool(),
				Effect::Select(id) => change = Some(SelectionChanged(Some(id))),
				Effect::ClearSelection => change = Some(SelectionChanged(None)),
			}
		}
		change
	}

	/// Link endpoints resolved against the current positions.
	pub fn link_segments(&self) -> impl Iterator<Item = (Point, Point, &OntologyLink)> + '_ {
		let positions = self.simulation.positions();
		self.links.iter().filter_map(move |link| {
			Some((positions.get(&link.source)?, positions.get(&link.target)?, link))
		})
	}

	/// Ids this session does not draw are dropped.
	pub fn set_selected(&mut self, id: Option<String>) {
		self.selected = id.filter(|id| self.simulation.positions().get(id).is_some());
	}

	pub fn is_selected(&self, id: &str) -> bool {
		self.selected.as_deref() == Some(id)
	}

	pub fn cursor(&self) -> &'static str {
		match self.interaction.mode {
			Mode::Idle => "grab",
			Mode::Panning { .. } | Mode::DraggingNode { .. } => "grabbing",
		}
	}

	/// Advance the layout one tick and hand the updated session to `on_tick`.
	/// Returns `false` without calling back once the layout has settled.
	pub fn step(&mut self, on_tick: impl FnOnce(&ForceGraphState)) -> bool {
		if self.simulation.tick() {
			on_tick(self);
			true
		} else {
			false
		}
	}

	/// Halt the simulation for good; called when the session is replaced.
	pub fn stop(&mut self) {
		self.simulation.stop();
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::ontology::OntologyNode;

	fn data() -> OntologyData {
		let node = |id: &str, group| OntologyNode {
			id: id.into(),
			label: id.to_uppercase(),
			group,
			description: format!("about {id}"),
		};
		OntologyData {
			nodes: vec![node("ros2", 2), node("python", 1), node("safety", 4)],
			links: vec![
				OntologyLink {
					source: "ros2".into(),
					target: "python".into(),
					relationship: "built on".into(),
				},
				OntologyLink {
					source: "safety".into(),
					target: "ros2".into(),
					relationship: "governs".into(),
				},
			],
		}
	}

	fn session() -> ForceGraphState {
		let mut state = ForceGraphState::new(
			&data(),
			Viewport {
				width: 800.0,
				height: 600.0,
			},
		);
		while state.simulation.tick() {}
		state
	}

	fn screen_of(state: &ForceGraphState, id: &str) -> Point {
		let world = state.simulation.positions().get(id).unwrap();
		state.interaction.transform.apply(world)
	}

	#[test]
	fn colors_follow_layers() {
		let state = session();
		let colors: Vec<&str> = state.nodes.iter().map(|n| n.color).collect();
		assert_eq!(colors, ["#10b981", "#3b82f6", "#f43f5e"]);
	}

	#[test]
	fn click_node_then_background() {
		let mut state = session();
		let before = data();
		let at = screen_of(&state, "python");

		state.handle(PointerInput::Down { at, hit: None });
		let change = state.handle(PointerInput::Up { at });
		assert_eq!(change, Some(SelectionChanged(Some("python".into()))));
		assert!(!state.is_selected("python"));
		state.set_selected(Some("python".into()));
		assert!(state.is_selected("python"));

		let empty = Point::new(-1000.0, -1000.0);
		assert!(state.node_at_position(empty).is_none());
		state.handle(PointerInput::Down {
			at: empty,
			hit: None,
		});
		let change = state.handle(PointerInput::Up { at: empty });
		assert_eq!(change, Some(SelectionChanged(None)));
		state.set_selected(None);
		assert_eq!(state.selected, None);
		assert_eq!(state.links, before.links);
		assert_eq!(state.nodes.len(), before.nodes.len());
	}

	#[test]
	fn dragging_pins_node_under_pointer() {
		let mut state = session();
		let at = screen_of(&state, "ros2");
		state.handle(PointerInput::Down { at, hit: None });
		assert!(state.simulation.is_running());
		assert_eq!(state.cursor(), "grabbing");

		let to = Point::new(at.x + 40.0, at.y - 25.0);
		assert_eq!(state.handle(PointerInput::Move { at: to }), None);
		let pin = state.simulation.positions().pin_of("ros2").unwrap();
		assert!(pin.distance(state.screen_to_graph(to)) < 1e-9);
		for _ in 0..3 {
			state.simulation.tick();
			assert_eq!(state.simulation.positions().get("ros2"), Some(pin));
		}

		assert_eq!(state.handle(PointerInput::Up { at: to }), None);
		assert_eq!(state.simulation.positions().pin_of("ros2"), None);
		assert_eq!(state.selected, None);
	}

	#[test]
	fn selection_ignores_ids_outside_the_graph() {
		let mut state = session();
		state.set_selected(Some("safety".into()));
		assert!(state.is_selected("safety"));
		state.set_selected(Some("gone".into()));
		assert_eq!(state.selected, None);
	}

	#[test]
	fn step_calls_back_once_per_tick_until_settled() {
		let mut state = ForceGraphState::new(
			&data(),
			Viewport {
				width: 800.0,
				height: 600.0,
			},
		);
		let mut frames = 0;
		while state.step(|s| {
			assert!(s.simulation.ticks() > 0);
			frames += 1;
		}) {}
		assert_eq!(frames, state.simulation.ticks());
		assert!(!state.step(|_| panic!("settled layout must not call back")));
	}

	#[test]
	fn link_segments_follow_positions() {
		let state = session();
		let segments: Vec<_> = state.link_segments().collect();
		assert_eq!(segments.len(), 2);
		let (a, b, link) = segments[0];
		assert_eq!(link.relationship, "built on");
		assert_eq!(Some(a), state.simulation.positions().get("ros2"));
		assert_eq!(Some(b), state.simulation.positions().get("python"));
	}
}
