pub mod device;
pub mod error;
pub mod event;
pub mod geometry;
pub mod history;
pub mod state;
pub mod timestamp;
pub mod view;

pub use device::{Chart, Display, Panel, Scene, TouchPanel};
pub use error::{PortalError, Result};
pub use event::FeedMessage;
pub use geometry::{Bounds, Button, Point, TouchLatch};
pub use history::HistoryBuffer;
pub use state::{AppState, HistorySource, HistoryWindow};
pub use view::{View, ViewController, ViewId, ViewKind};
