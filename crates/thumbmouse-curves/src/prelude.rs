//! Common imports for shaping.

pub use crate::cycler::ModeCycler;
pub use crate::policy::{DEFAULT_DIVISOR, ShapingPolicy};
pub use crate::profile::{ProfileSet, ShapingProfile};
pub use crate::selector::ProfileSelector;
pub use crate::shaper::{MotionDelta, MotionShaper};
