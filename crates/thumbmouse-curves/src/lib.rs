//! Motion shaping for thumbmouse.
//!
//! Turns a normalized axis value into a bounded per-report motion delta.
//!
//! # Overview
//!
//! Two policies are available:
//! - **Deadzone-linear**: values within `deadzone` of center give no motion,
//!   the rest are divided down and capped at `max_speed`. Used by the
//!   analog joystick path.
//! - **Polynomial**: `cubic * |v|^3 + quadratic * |v|^2 + linear * |v|`,
//!   capped at `max_magnitude`. Coefficients come from the active
//!   [`ShapingProfile`]. Used by the trackball path.
//!
//! Both policies are odd-symmetric around center and never exceed their cap.
//!
//! The active profile is an index in a [`ProfileSelector`]. The input-edge
//! handler advances it through a [`ModeCycler`]; the consumer reads it on
//! every shaped sample.
//!
//! # Example
//!
//! ```
//! use thumbmouse_calibration::NormalizedCoord;
//! use thumbmouse_curves::{MotionShaper, ShapingPolicy};
//!
//! let shaper = MotionShaper::fixed(ShapingPolicy::deadzone_linear(15, 30), 0);
//! let delta = shaper.shape_coord(NormalizedCoord::new(50, -50));
//! assert_eq!((delta.x, delta.y), (11, -11));
//! assert_eq!(delta.to_report(), (11, -11));
//! ```

#![deny(unsafe_op_in_unsafe_fn, clippy::unwrap_used)]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod cycler;
pub mod policy;
pub mod prelude;
pub mod profile;
pub mod selector;
pub mod shaper;

pub use cycler::ModeCycler;
pub use policy::{DEFAULT_DIVISOR, ShapingPolicy};
pub use profile::{ProfileSet, ShapingProfile};
pub use selector::ProfileSelector;
pub use shaper::{MotionDelta, MotionShaper};
