//! Pointer gestures over the graph canvas as a pure state machine.
//!
//! [`InteractionState::transition`] consumes one [`PointerInput`] and returns the
//! next state together with the [`Effect`]s the caller applies to the
//! simulation and the selection. Hit testing happens before the input is built.

use super::simulation::Point;

pub const MIN_ZOOM: f64 = 0.1;
pub const MAX_ZOOM: f64 = 4.0;
/// Screen pixels a press may travel and still count as a click.
pub const CLICK_TOLERANCE: f64 = 3.0;
/// `MouseEvent.button` of the main (usually left) button.
pub const PRIMARY_BUTTON: i16 = 0;

/// Pan/zoom as translate-then-scale: `screen = world * k + (x, y)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self {
			x: 0.0,
			y: 0.0,
			k: 1.0,
		}
	}
}

impl ViewTransform {
	pub fn apply(&self, world: Point) -> Point {
		Point::new(world.x * self.k + self.x, world.y * self.k + self.y)
	}

	pub fn invert(&self, screen: Point) -> Point {
		Point::new((screen.x - self.x) / self.k, (screen.y - self.y) / self.k)
	}

	/// Zoom by `factor` keeping the world point under `anchor` fixed.
	pub fn zoom_at(&self, anchor: Point, factor: f64) -> Self {
		let k = (self.k * factor).clamp(MIN_ZOOM, MAX_ZOOM);
		let ratio = k / self.k;
		Self {
			x: anchor.x - (anchor.x - self.x) * ratio,
			y: anchor.y - (anchor.y - self.y) * ratio,
			k,
		}
	}
}

/// The node under the pointer at press time.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeHit {
	pub id: String,
	/// Simulation coordinate of the node when pressed.
	pub position: Point,
}

/// Canvas-space pointer input.
#[derive(Clone, Debug, PartialEq)]
pub enum PointerInput {
	Down { at: Point, hit: Option<NodeHit> },
	Move { at: Point },
	Up { at: Point },
	/// Pointer left the canvas; cancels any gesture.
	Leave,
	Wheel { at: Point, delta_y: f64 },
}

impl PointerInput {
	/// A press with `button`; only the primary button starts a gesture.
	pub fn press(at: Point, button: i16) -> Option<Self> {
		(button == PRIMARY_BUTTON).then_some(PointerInput::Down { at, hit: None })
	}
}

/// Instructions for the simulation and the selection.
#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
	Pin { id: String, at: Point },
	Unpin { id: String },
	Reheat,
	Cool,
	Select(String),
	ClearSelection,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub enum Mode {
	#[default]
	Idle,
	Panning {
		press: Point,
		start: ViewTransform,
		moved: bool,
	},
	DraggingNode {
		id: String,
		press: Point,
		/// Node centre minus the pointer, in world units, fixed at press.
		grab_offset: Point,
		moved: bool,
	},
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct InteractionState {
	pub mode: Mode,
	pub transform: ViewTransform,
}

fn exceeds_tolerance(press: Point, at: Point) -> bool {
	press.distance(at) > CLICK_TOLERANCE
}

impl InteractionState {
	pub fn transition(self, input: PointerInput) -> (InteractionState, Vec<Effect>) {
		let InteractionState { mode, transform } = self;
		match (mode, input) {
			(Mode::Idle, PointerInput::Down { at, hit: Some(hit) }) => {
				let effects = vec![
					Effect::Pin {
						id: hit.id.clone(),
						at: hit.position,
					},
					Effect::Reheat,
				];
				let grabbed = transform.invert(at);
				let mode = Mode::DraggingNode {
					id: hit.id,
					press: at,
					grab_offset: Point::new(hit.position.x - grabbed.x, hit.position.y - grabbed.y),
					moved: false,
				};
				(InteractionState { mode, transform }, effects)
			}
			(Mode::Idle, PointerInput::Down { at, hit: None }) => {
				let mode = Mode::Panning {
					press: at,
					start: transform,
					moved: false,
				};
				(InteractionState { mode, transform }, vec![])
			}
			(
				Mode::DraggingNode {
					id,
					press,
					grab_offset,
					moved,
				},
				PointerInput::Move { at },
			) => {
				let moved = moved || exceeds_tolerance(press, at);
				// the current transform, which a wheel mid-drag may have changed
				let pointer = transform.invert(at);
				let pin = Point::new(pointer.x + grab_offset.x, pointer.y + grab_offset.y);
				let effects = vec![Effect::Pin {
					id: id.clone(),
					at: pin,
				}];
				let mode = Mode::DraggingNode {
					id,
					press,
					grab_offset,
					moved,
				};
				(InteractionState { mode, transform }, effects)
			}
			(Mode::DraggingNode { id, moved, .. }, PointerInput::Up { .. }) => {
				let mut effects = vec![Effect::Unpin { id: id.clone() }, Effect::Cool];
				if !moved {
					effects.push(Effect::Select(id));
				}
				(InteractionState::idle(transform), effects)
			}
			(Mode::DraggingNode { id, .. }, PointerInput::Leave) => (
				InteractionState::idle(transform),
				vec![Effect::Unpin { id }, Effect::Cool],
			),
			(Mode::Panning { press, start, moved }, PointerInput::Move { at }) => {
				let moved = moved || exceeds_tolerance(press, at);
				let transform = ViewTransform {
					x: start.x + (at.x - press.x),
					y: start.y + (at.y - press.y),
					k: start.k,
				};
				let mode = Mode::Panning { press, start, moved };
				(InteractionState { mode, transform }, vec![])
			}
			(Mode::Panning { moved, .. }, PointerInput::Up { .. }) => {
				let effects = if moved {
					vec![]
				} else {
					vec![Effect::ClearSelection]
				};
				(InteractionState::idle(transform), effects)
			}
			(Mode::Panning { .. }, PointerInput::Leave) => {
				(InteractionState::idle(transform), vec![])
			}
			(mode, PointerInput::Wheel { at, delta_y }) => {
				let factor = if delta_y > 0.0 { 0.9 } else { 1.1 };
				let transform = transform.zoom_at(at, factor);
				// a pan in progress continues from the zoomed transform
				let mode = match mode {
					Mode::Panning { moved, .. } => Mode::Panning {
						press: at,
						start: transform,
						moved,
					},
					other => other,
				};
				(InteractionState { mode, transform }, vec![])
			}
			(mode, _) => (InteractionState { mode, transform }, vec![]),
		}
	}

	fn idle(transform: ViewTransform) -> Self {
		Self {
			mode: Mode::Idle,
			transform,
		}
	}

	/// Id of the node being dragged, if any.
	pub fn dragging(&self) -> Option<&str> {
		match &self.mode {
			Mode::DraggingNode { id, .. } => Some(id),
			_ => None,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn p(x: f64, y: f64) -> Point {
		Point::new(x, y)
	}

	fn run(state: InteractionState, inputs: Vec<PointerInput>) -> (InteractionState, Vec<Effect>) {
		inputs
			.into_iter()
			.fold((state, vec![]), |(state, mut all), input| {
				let (next, effects) = state.transition(input);
				all.extend(effects);
				(next, all)
			})
	}

	fn hit(id: &str, x: f64, y: f64) -> Option<NodeHit> {
		Some(NodeHit {
			id: id.into(),
			position: p(x, y),
		})
	}

	#[test]
	fn click_on_node_selects_without_clearing() {
		let (state, effects) = run(
			InteractionState::default(),
			vec![
				PointerInput::Down {
					at: p(10.0, 10.0),
					hit: hit("a", 11.0, 9.0),
				},
				PointerInput::Up { at: p(10.0, 10.0) },
			],
		);
		assert_eq!(state.mode, Mode::Idle);
		assert_eq!(
			effects,
			vec![
				Effect::Pin {
					id: "a".into(),
					at: p(11.0, 9.0)
				},
				Effect::Reheat,
				Effect::Unpin { id: "a".into() },
				Effect::Cool,
				Effect::Select("a".into()),
			]
		);
		assert!(!effects.contains(&Effect::ClearSelection));
	}

	#[test]
	fn click_on_background_clears_selection() {
		let (state, effects) = run(
			InteractionState::default(),
			vec![
				PointerInput::Down {
					at: p(5.0, 5.0),
					hit: None,
				},
				PointerInput::Move { at: p(6.0, 5.0) },
				PointerInput::Up { at: p(6.0, 5.0) },
			],
		);
		assert_eq!(state.transform.x, 1.0);
		assert_eq!(effects, vec![Effect::ClearSelection]);
	}

	#[test]
	fn drag_moves_pin_in_world_units_and_keeps_selection() {
		let start = InteractionState {
			mode: Mode::Idle,
			transform: ViewTransform {
				x: 100.0,
				y: 50.0,
				k: 2.0,
			},
		};
		let (state, effects) = run(
			start,
			vec![
				PointerInput::Down {
					at: p(300.0, 250.0),
					hit: hit("a", 100.0, 100.0),
				},
				PointerInput::Move { at: p(320.0, 260.0) },
			],
		);
		assert_eq!(state.dragging(), Some("a"));
		assert_eq!(
			effects.last(),
			Some(&Effect::Pin {
				id: "a".into(),
				at: p(110.0, 105.0)
			})
		);

		let (state, effects) = state.transition(PointerInput::Up { at: p(320.0, 260.0) });
		assert_eq!(state.mode, Mode::Idle);
		assert_eq!(effects, vec![Effect::Unpin { id: "a".into() }, Effect::Cool]);
	}

	#[test]
	fn wheel_during_drag_keeps_node_under_pointer() {
		let (state, _) = run(
			InteractionState::default(),
			vec![
				PointerInput::Down {
					at: p(300.0, 250.0),
					hit: hit("a", 302.0, 248.0),
				},
				PointerInput::Wheel {
					at: p(0.0, 0.0),
					delta_y: -1.0,
				},
			],
		);
		assert!(state.transform.k > 1.0);
		let (state, effects) = state.transition(PointerInput::Move { at: p(310.0, 250.0) });
		let pointer = state.transform.invert(p(310.0, 250.0));
		let Some(Effect::Pin { at, .. }) = effects.last() else {
			panic!("expected a pin, got {effects:?}");
		};
		assert!((at.x - (pointer.x + 2.0)).abs() < 1e-9, "pin {at:?} pointer {pointer:?}");
		assert!((at.y - (pointer.y - 2.0)).abs() < 1e-9, "pin {at:?} pointer {pointer:?}");
	}

	#[test]
	fn only_primary_button_presses() {
		assert_eq!(
			PointerInput::press(p(1.0, 2.0), PRIMARY_BUTTON),
			Some(PointerInput::Down {
				at: p(1.0, 2.0),
				hit: None
			})
		);
		assert_eq!(PointerInput::press(p(1.0, 2.0), 1), None);
		assert_eq!(PointerInput::press(p(1.0, 2.0), 2), None);
	}

	#[test]
	fn pan_translates_transform() {
		let (state, effects) = run(
			InteractionState::default(),
			vec![
				PointerInput::Down {
					at: p(0.0, 0.0),
					hit: None,
				},
				PointerInput::Move { at: p(40.0, -30.0) },
			],
		);
		assert!(effects.is_empty());
		assert_eq!(
			state.transform,
			ViewTransform {
				x: 40.0,
				y: -30.0,
				k: 1.0
			}
		);
		let (state, effects) = state.transition(PointerInput::Up { at: p(40.0, -30.0) });
		assert_eq!(state.mode, Mode::Idle);
		assert!(effects.is_empty());
	}

	#[test]
	fn zoom_is_clamped_and_anchored() {
		let mut state = InteractionState::default();
		for _ in 0..100 {
			state = state
				.transition(PointerInput::Wheel {
					at: p(200.0, 100.0),
					delta_y: -1.0,
				})
				.0;
		}
		assert_eq!(state.transform.k, MAX_ZOOM);
		let anchor = state.transform.invert(p(200.0, 100.0));
		assert!((anchor.x - 200.0).abs() < 1e-9 && (anchor.y - 100.0).abs() < 1e-9);

		for _ in 0..200 {
			state = state
				.transition(PointerInput::Wheel {
					at: p(0.0, 0.0),
					delta_y: 1.0,
				})
				.0;
		}
		assert_eq!(state.transform.k, MIN_ZOOM);
	}

	#[test]
	fn leaving_canvas_releases_pin_without_selecting() {
		let (state, effects) = run(
			InteractionState::default(),
			vec![
				PointerInput::Down {
					at: p(0.0, 0.0),
					hit: hit("b", 0.0, 0.0),
				},
				PointerInput::Leave,
			],
		);
		assert_eq!(state.mode, Mode::Idle);
		assert_eq!(
			&effects[2..],
			&[Effect::Unpin { id: "b".into() }, Effect::Cool]
		);
	}

	#[test]
	fn transform_round_trips_points() {
		let t = ViewTransform {
			x: -12.5,
			y: 40.0,
			k: 0.5,
		};
		let world = p(33.0, -7.0);
		assert_eq!(t.invert(t.apply(world)), world);
	}

	#[test]
	fn stray_move_and_up_are_ignored_when_idle() {
		let (state, effects) = run(
			InteractionState::default(),
			vec![PointerInput::Move { at: p(1.0, 1.0) }, PointerInput::Up { at: p(1.0, 1.0) }],
		);
		assert_eq!(state, InteractionState::default());
		assert!(effects.is_empty());
	}
}
