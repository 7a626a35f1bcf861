//! Publishing spine: milestone progress for a project, and the physical
//! spine of the printed book.

pub mod progress;
pub mod thickness;

pub use progress::{NodeStatus, SpineNode, SpineNodeId, SpineProgress};
pub use thickness::{estimate_page_count, spine_width, PaperStock, SpineDimensions, SpineError};
