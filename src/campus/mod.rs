pub mod directory;
pub mod map;

pub use directory::{Category, Coordinates, LocationDirectory, PointOfInterest, LOCATIONS};
pub use map::{DevicePlot, Directions, MapConfig, MapError, MapViewController, Viewport};
