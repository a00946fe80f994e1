pub mod sensor;
pub mod simulated;
pub mod tracker;

pub use sensor::{LocationSensor, SensorError, SensorEvent, SensorWatch, WatchId, WatchOptions};
pub use simulated::SimulatedSensor;
pub use tracker::LocationTracker;
