//! Convenience re-exports for tests.

pub use crate::i2c::{FakeDelay, FakeI2c, FakeI2cError, Transaction};
pub use crate::mock::{
    ConstantAnalog, MockTransport, RecordingIndicator, ScriptedAnalog, ScriptedSource,
};
pub use crate::must::{must, must_err, must_some, must_with};
