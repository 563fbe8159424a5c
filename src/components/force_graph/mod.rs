mod component;
pub mod interaction;
mod render;
pub mod simulation;
mod state;

pub use component::ForceGraphCanvas;
pub use simulation::{Point, PositionTable, Simulation, SimulationParams, Viewport};
pub use state::{ForceGraphState, SelectionChanged};
