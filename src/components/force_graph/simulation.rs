//! Force-directed layout: pairwise repulsion, link springs, centering and
//! collision avoidance, integrated with a decaying alpha.
//!
//! Positions live in a [`PositionTable`] owned by the [`Simulation`], keyed by
//! node id and kept apart from the ontology records. Building a simulation for
//! a new graph always starts from a fresh table.

use std::collections::HashMap;
use std::f64::consts::PI;

use log::info;

use crate::ontology::OntologyData;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
	pub x: f64,
	pub y: f64,
}

impl Point {
	pub fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}

	pub fn distance(self, other: Point) -> f64 {
		((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
	}
}

/// Drawing surface size, snapshotted when a session starts.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
	pub width: f64,
	pub height: f64,
}

impl Viewport {
	pub fn center(&self) -> Point {
		Point::new(self.width / 2.0, self.height / 2.0)
	}
}

#[derive(Clone, Debug)]
pub struct SimulationParams {
	/// Many-body strength; negative repels.
	pub charge_strength: f64,
	pub link_distance: f64,
	pub collide_radius: f64,
	pub collide_strength: f64,
	pub alpha_min: f64,
	pub alpha_decay: f64,
	/// Fraction of velocity lost per tick.
	pub velocity_decay: f64,
	/// Alpha target held while a node is dragged.
	pub drag_alpha_target: f64,
}

impl Default for SimulationParams {
	fn default() -> Self {
		let alpha_min: f64 = 0.001;
		Self {
			charge_strength: -300.0,
			link_distance: 100.0,
			collide_radius: 50.0,
			collide_strength: 1.0,
			alpha_min,
			alpha_decay: 1.0 - alpha_min.powf(1.0 / 300.0),
			velocity_decay: 0.4,
			drag_alpha_target: 0.3,
		}
	}
}

#[derive(Clone, Copy, Debug, Default)]
struct Body {
	position: Point,
	velocity: Point,
	pin: Option<Point>,
}

/// Simulation-owned node positions, indexed in graph node order.
#[derive(Clone, Debug, Default)]
pub struct PositionTable {
	ids: Vec<String>,
	index: HashMap<String, usize>,
	bodies: Vec<Body>,
}

impl PositionTable {
	fn new(data: &OntologyData, center: Point) -> Self {
		let initial_angle = PI * (3.0 - 5f64.sqrt());
		let mut table = Self::default();
		for (i, node) in data.nodes.iter().enumerate() {
			let radius = 10.0 * (0.5 + i as f64).sqrt();
			let angle = i as f64 * initial_angle;
			table.index.insert(node.id.clone(), i);
			table.ids.push(node.id.clone());
			table.bodies.push(Body {
				position: Point::new(
					center.x + radius * angle.cos(),
					center.y + radius * angle.sin(),
				),
				..Body::default()
			});
		}
		table
	}

	pub fn len(&self) -> usize {
		self.bodies.len()
	}

	pub fn is_empty(&self) -> bool {
		self.bodies.is_empty()
	}

	pub fn get(&self, id: &str) -> Option<Point> {
		self.index.get(id).map(|&i| self.bodies[i].position)
	}

	pub fn pin_of(&self, id: &str) -> Option<Point> {
		self.index.get(id).and_then(|&i| self.bodies[i].pin)
	}

	/// `(id, position)` in graph node order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, Point)> + '_ {
		self.ids
			.iter()
			.zip(&self.bodies)
			.map(|(id, body)| (id.as_str(), body.position))
	}
}

struct Spring {
	source: usize,
	target: usize,
	strength: f64,
	bias: f64,
}

/// Deterministic jitter for separating coincident nodes.
struct Lcg(u32);

impl Lcg {
	fn jiggle(&mut self) -> f64 {
		self.0 = self.0.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
		(self.0 as f64 / 4_294_967_296.0 - 0.5) * 1e-6
	}
}

pub struct Simulation {
	params: SimulationParams,
	center: Point,
	table: PositionTable,
	springs: Vec<Spring>,
	alpha: f64,
	alpha_target: f64,
	running: bool,
	ticks: u64,
	rng: Lcg,
}

impl Simulation {
	/// Start a layout session. Links must already be validated; unresolved
	/// endpoints are skipped rather than panicking.
	pub fn new(data: &OntologyData, viewport: Viewport, params: SimulationParams) -> Self {
		let center = viewport.center();
		let table = PositionTable::new(data, center);

		let mut degree = vec![0usize; table.len()];
		let pairs: Vec<(usize, usize)> = data
			.links
			.iter()
			.filter_map(|l| Some((*table.index.get(&l.source)?, *table.index.get(&l.target)?)))
			.collect();
		for &(s, t) in &pairs {
			degree[s] += 1;
			degree[t] += 1;
		}
		let springs = pairs
			.into_iter()
			.map(|(source, target)| Spring {
				source,
				target,
				strength: 1.0 / degree[source].min(degree[target]) as f64,
				bias: degree[source] as f64 / (degree[source] + degree[target]) as f64,
			})
			.collect();

		let running = !table.is_empty();
		info!(
			"simulation: {} nodes in {}x{}",
			table.len(),
			viewport.width,
			viewport.height
		);
		Self {
			params,
			center,
			table,
			springs,
			alpha: 1.0,
			alpha_target: 0.0,
			running,
			ticks: 0,
			rng: Lcg(1),
		}
	}

	pub fn positions(&self) -> &PositionTable {
		&self.table
	}

	pub fn alpha(&self) -> f64 {
		self.alpha
	}

	pub fn is_running(&self) -> bool {
		self.running
	}

	pub fn ticks(&self) -> u64 {
		self.ticks
	}

	/// Advance one integration step. Returns `false` once settled or stopped.
	pub fn tick(&mut self) -> bool {
		if !self.running {
			return false;
		}
		self.alpha += (self.alpha_target - self.alpha) * self.params.alpha_decay;

		self.apply_links();
		self.apply_charge();
		self.apply_center();
		self.apply_collide();
		self.integrate();

		self.ticks += 1;
		if self.alpha < self.params.alpha_min {
			self.running = false;
			info!("simulation: settled after {} ticks", self.ticks);
		}
		true
	}

	/// Halt ticking. Idempotent.
	pub fn stop(&mut self) {
		self.running = false;
	}

	/// Raise the alpha target for drag re-settling and resume ticking.
	pub fn reheat(&mut self) {
		self.alpha_target = self.params.drag_alpha_target;
		self.running = !self.table.is_empty();
	}

	/// Let alpha decay back toward zero.
	pub fn cool(&mut self) {
		self.alpha_target = 0.0;
	}

	/// Fix a node at `at` until [`unpin`](Self::unpin). Returns `false` for unknown ids.
	pub fn pin(&mut self, id: &str, at: Point) -> bool {
		let Some(&i) = self.table.index.get(id) else {
			return false;
		};
		let body = &mut self.table.bodies[i];
		body.pin = Some(at);
		body.position = at;
		body.velocity = Point::default();
		true
	}

	pub fn unpin(&mut self, id: &str) {
		if let Some(&i) = self.table.index.get(id) {
			self.table.bodies[i].pin = None;
		}
	}

	fn apply_links(&mut self) {
		let bodies = &mut self.table.bodies;
		for spring in &self.springs {
			let (s, t) = (bodies[spring.source], bodies[spring.target]);
			let mut x = t.position.x + t.velocity.x - s.position.x - s.velocity.x;
			let mut y = t.position.y + t.velocity.y - s.position.y - s.velocity.y;
			if x == 0.0 {
				x = self.rng.jiggle();
			}
			if y == 0.0 {
				y = self.rng.jiggle();
			}
			let l = (x * x + y * y).sqrt();
			let k = (l - self.params.link_distance) / l * self.alpha * spring.strength;
			x *= k;
			y *= k;
			let b = spring.bias;
			bodies[spring.target].velocity.x -= x * b;
			bodies[spring.target].velocity.y -= y * b;
			bodies[spring.source].velocity.x += x * (1.0 - b);
			bodies[spring.source].velocity.y += y * (1.0 - b);
		}
	}

	fn apply_charge(&mut self) {
		let bodies = &mut self.table.bodies;
		let strength = self.params.charge_strength * self.alpha;
		for i in 0..bodies.len() {
			let pi = bodies[i].position;
			for j in 0..bodies.len() {
				if i == j {
					continue;
				}
				let pj = bodies[j].position;
				let mut x = pj.x - pi.x;
				let mut y = pj.y - pi.y;
				let mut l = x * x + y * y;
				if x == 0.0 {
					x = self.rng.jiggle();
					l += x * x;
				}
				if y == 0.0 {
					y = self.rng.jiggle();
					l += y * y;
				}
				if l < 1.0 {
					l = l.sqrt();
				}
				bodies[i].velocity.x += x * strength / l;
				bodies[i].velocity.y += y * strength / l;
			}
		}
	}

	fn apply_center(&mut self) {
		let bodies = &mut self.table.bodies;
		if bodies.is_empty() {
			return;
		}
		let n = bodies.len() as f64;
		let sx = bodies.iter().map(|b| b.position.x).sum::<f64>() / n - self.center.x;
		let sy = bodies.iter().map(|b| b.position.y).sum::<f64>() / n - self.center.y;
		for body in bodies.iter_mut() {
			body.position.x -= sx;
			body.position.y -= sy;
		}
	}

	fn apply_collide(&mut self) {
		let bodies = &mut self.table.bodies;
		let r = self.params.collide_radius * 2.0;
		for i in 0..bodies.len() {
			let xi = bodies[i].position.x + bodies[i].velocity.x;
			let yi = bodies[i].position.y + bodies[i].velocity.y;
			for j in (i + 1)..bodies.len() {
				let mut x = xi - bodies[j].position.x - bodies[j].velocity.x;
				let mut y = yi - bodies[j].position.y - bodies[j].velocity.y;
				let mut l = x * x + y * y;
				if l >= r * r {
					continue;
				}
				if x == 0.0 {
					x = self.rng.jiggle();
					l += x * x;
				}
				if y == 0.0 {
					y = self.rng.jiggle();
					l += y * y;
				}
				let d = l.sqrt();
				let k = (r - d) / d * self.params.collide_strength;
				x *= k;
				y *= k;
				// equal radii split the correction evenly
				bodies[i].velocity.x += x * 0.5;
				bodies[i].velocity.y += y * 0.5;
				bodies[j].velocity.x -= x * 0.5;
				bodies[j].velocity.y -= y * 0.5;
			}
		}
	}

	fn integrate(&mut self) {
		let keep = 1.0 - self.params.velocity_decay;
		for body in &mut self.table.bodies {
			match body.pin {
				Some(pin) => {
					body.position = pin;
					body.velocity = Point::default();
				}
				None => {
					body.velocity.x *= keep;
					body.velocity.y *= keep;
					body.position.x += body.velocity.x;
					body.position.y += body.velocity.y;
				}
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::ontology::{OntologyLink, OntologyNode};

	const VIEW: Viewport = Viewport {
		width: 800.0,
		height: 600.0,
	};

	fn graph(n: usize, links: &[(usize, usize)]) -> OntologyData {
		OntologyData {
			nodes: (0..n)
				.map(|i| OntologyNode {
					id: format!("n{i}"),
					label: format!("Node {i}"),
					group: (i % 4) as i64 + 1,
					description: String::new(),
				})
				.collect(),
			links: links
				.iter()
				.map(|&(s, t)| OntologyLink {
					source: format!("n{s}"),
					target: format!("n{t}"),
					relationship: "requires".into(),
				})
				.collect(),
		}
	}

	fn settle(sim: &mut Simulation) {
		while sim.tick() {}
	}

	#[test]
	fn empty_graph_is_settled_immediately() {
		let mut sim = Simulation::new(&OntologyData::default(), VIEW, SimulationParams::default());
		assert!(!sim.is_running());
		assert!(!sim.tick());
		assert_eq!(sim.ticks(), 0);
		sim.reheat();
		assert!(!sim.tick());
	}

	#[test]
	fn alpha_never_increases_and_ticking_stops() {
		let data = graph(12, &[(0, 1), (1, 2), (2, 3), (3, 0), (4, 5), (6, 7)]);
		let mut sim = Simulation::new(&data, VIEW, SimulationParams::default());
		let mut last = sim.alpha();
		let mut ticks = 0;
		while sim.tick() {
			assert!(sim.alpha() <= last);
			last = sim.alpha();
			ticks += 1;
			assert!(ticks <= 310, "did not settle");
		}
		assert!(sim.alpha() < 0.001);
		assert!(!sim.tick());
	}

	#[test]
	fn linked_pair_settles_near_link_distance() {
		let data = graph(2, &[(0, 1)]);
		let mut sim = Simulation::new(&data, VIEW, SimulationParams::default());
		settle(&mut sim);
		let table = sim.positions();
		let d = table.get("n0").unwrap().distance(table.get("n1").unwrap());
		assert!((90.0..140.0).contains(&d), "distance {d}");
	}

	#[test]
	fn nodes_do_not_overlap_after_settling() {
		let data = graph(8, &[]);
		let mut sim = Simulation::new(&data, VIEW, SimulationParams::default());
		settle(&mut sim);
		let points: Vec<Point> = sim.positions().iter().map(|(_, p)| p).collect();
		for (i, a) in points.iter().enumerate() {
			for b in &points[i + 1..] {
				assert!(a.distance(*b) > 90.0, "{a:?} vs {b:?}");
			}
		}
	}

	#[test]
	fn layout_is_pulled_to_viewport_center() {
		let data = graph(6, &[(0, 1), (1, 2), (3, 4)]);
		let mut sim = Simulation::new(&data, VIEW, SimulationParams::default());
		settle(&mut sim);
		let n = sim.positions().len() as f64;
		let mx = sim.positions().iter().map(|(_, p)| p.x).sum::<f64>() / n;
		let my = sim.positions().iter().map(|(_, p)| p.y).sum::<f64>() / n;
		assert!((mx - 400.0).abs() < 1.0 && (my - 300.0).abs() < 1.0, "{mx},{my}");
	}

	#[test]
	fn pinned_node_follows_pin_exactly() {
		let data = graph(5, &[(0, 1), (0, 2), (0, 3), (0, 4)]);
		let mut sim = Simulation::new(&data, VIEW, SimulationParams::default());
		sim.reheat();
		let mut pin = Point::new(120.0, 80.0);
		assert!(sim.pin("n0", pin));
		for _ in 0..30 {
			assert!(sim.tick());
			assert_eq!(sim.positions().get("n0"), Some(pin));
			pin.x += 3.0;
			sim.pin("n0", pin);
		}

		let last = sim.positions().get("n0").unwrap();
		sim.unpin("n0");
		sim.cool();
		for _ in 0..5 {
			sim.tick();
		}
		assert_ne!(sim.positions().get("n0"), Some(last));
		assert_eq!(sim.positions().pin_of("n0"), None);
	}

	#[test]
	fn reheat_raises_alpha_and_cool_lets_it_settle() {
		let data = graph(3, &[(0, 1), (1, 2)]);
		let mut sim = Simulation::new(&data, VIEW, SimulationParams::default());
		settle(&mut sim);
		let settled = sim.alpha();

		sim.reheat();
		for _ in 0..20 {
			assert!(sim.tick());
		}
		assert!(sim.alpha() > settled);

		sim.cool();
		settle(&mut sim);
		assert!(!sim.is_running());
	}

	#[test]
	fn stop_is_idempotent() {
		let data = graph(3, &[]);
		let mut sim = Simulation::new(&data, VIEW, SimulationParams::default());
		sim.stop();
		sim.stop();
		assert!(!sim.tick());
	}

	#[test]
	fn pin_of_unknown_id_is_refused() {
		let mut sim = Simulation::new(&graph(1, &[]), VIEW, SimulationParams::default());
		assert!(!sim.pin("missing", Point::default()));
	}

	#[test]
	fn fresh_session_ignores_previous_positions() {
		let data = graph(2, &[(0, 1)]);
		let mut first = Simulation::new(&data, VIEW, SimulationParams::default());
		first.pin("n0", Point::new(-500.0, -500.0));
		settle(&mut first);

		let second = Simulation::new(&data, VIEW, SimulationParams::default());
		let start = second.positions().get("n0").unwrap();
		assert!(start.distance(VIEW.center()) < 10.0);
		assert_eq!(second.positions().pin_of("n0"), None);
	}

	#[test]
	fn identical_inputs_give_identical_layouts() {
		let data = graph(7, &[(0, 1), (2, 3), (4, 5), (5, 6)]);
		let mut a = Simulation::new(&data, VIEW, SimulationParams::default());
		let mut b = Simulation::new(&data, VIEW, SimulationParams::default());
		settle(&mut a);
		settle(&mut b);
		let pa: Vec<Point> = a.positions().iter().map(|(_, p)| p).collect();
		let pb: Vec<Point> = b.positions().iter().map(|(_, p)| p).collect();
		assert_eq!(pa, pb);
	}
}
