//! Register-file I2C fake.
//!
//! Behaves like the trackball firmware: a write sets the register pointer
//! from its first byte and stores the rest at consecutive registers; a read
//! returns consecutive registers from the pointer. Reading a motion counter
//! clears it. Writing the reset bit to the control register clears every
//! counter.
//!
//! The fake is cheaply cloneable. Clones share one register file, so a test
//! can keep a handle while the driver owns another.

use std::collections::VecDeque;
use std::sync::Arc;

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::{self, ErrorKind, ErrorType, I2c, NoAcknowledgeSource, Operation};
use parking_lot::Mutex;
use thumbmouse_source::registers::{self, Register};

/// Error returned by [`FakeI2c`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FakeI2cError(pub ErrorKind);

impl i2c::Error for FakeI2cError {
    fn kind(&self) -> ErrorKind {
        self.0
    }
}

/// One completed transaction, for assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transaction {
    /// Bytes written, register pointer first
    Write(Vec<u8>),
    /// Register read from and number of bytes read
    Read(u8, usize),
}

#[derive(Debug)]
struct State {
    address: u8,
    registers: [u8; 256],
    pointer: u8,
    faults: VecDeque<ErrorKind>,
    log: Vec<Transaction>,
}

/// Shared-state I2C fake.
#[derive(Debug, Clone)]
pub struct FakeI2c {
    state: Arc<Mutex<State>>,
}

impl FakeI2c {
    /// A device answering at `address` with all registers zero.
    pub fn new(address: u8) -> Self {
        Self {
            state: Arc::new(Mutex::new(State {
                address,
                registers: [0; 256],
                pointer: 0,
                faults: VecDeque::new(),
                log: Vec::new(),
            })),
        }
    }

    /// Set one register.
    pub fn set_register(&self, reg: Register, value: u8) {
        self.state.lock().registers[usize::from(reg.addr())] = value;
    }

    /// Read one register without going through the bus.
    pub fn register(&self, reg: Register) -> u8 {
        self.state.lock().registers[usize::from(reg.addr())]
    }

    /// Load the motion block as the device would present it.
    pub fn push_motion(&self, left: u8, right: u8, up: u8, down: u8, pressed: bool) {
        let mut state = self.state.lock();
        state.registers[usize::from(Register::Left.addr())] = left;
        state.registers[usize::from(Register::Right.addr())] = right;
        state.registers[usize::from(Register::Up.addr())] = up;
        state.registers[usize::from(Register::Down.addr())] = down;
        state.registers[usize::from(Register::Switch.addr())] =
            if pressed { registers::SWITCH_STATE } else { 0 };
    }

    /// Fail the next transaction with `kind`.
    pub fn fail_next(&self, kind: ErrorKind) {
        self.state.lock().faults.push_back(kind);
    }

    /// Every transaction seen so far.
    pub fn transactions(&self) -> Vec<Transaction> {
        self.state.lock().log.clone()
    }

    /// Forget the transaction log.
    pub fn clear_log(&self) {
        self.state.lock().log.clear();
    }
}

impl ErrorType for FakeI2c {
    type Error = FakeI2cError;
}

impl I2c for FakeI2c {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        let mut state = self.state.lock();
        if address != state.address {
            return Err(FakeI2cError(ErrorKind::NoAcknowledge(
                NoAcknowledgeSource::Address,
            )));
        }
        if let Some(kind) = state.faults.pop_front() {
            return Err(FakeI2cError(kind));
        }

        for op in operations.iter_mut() {
            match op {
                Operation::Write(bytes) => {
                    state.log.push(Transaction::Write(bytes.to_vec()));
                    let Some((&reg, data)) = bytes.split_first() else {
                        continue;
                    };
                    state.pointer = reg;
                    for &byte in data {
                        let idx = usize::from(state.pointer);
                        state.registers[idx] = byte;
                        state.pointer = state.pointer.wrapping_add(1);
                    }
                    if reg == Register::Control.addr()
                        && data.first().is_some_and(|b| b & registers::CTRL_RESET != 0)
                    {
                        for r in Register::Left.addr()..=Register::Switch.addr() {
                            state.registers[usize::from(r)] = 0;
                        }
                        state.registers[usize::from(Register::Control.addr())] = 0;
                    }
                }
                Operation::Read(buf) => {
                    let start = state.pointer;
                    state.log.push(Transaction::Read(start, buf.len()));
                    for slot in buf.iter_mut() {
                        let idx = usize::from(state.pointer);
                        *slot = state.registers[idx];
                        if (Register::Left.addr()..=Register::Down.addr()).contains(&state.pointer) {
                            state.registers[idx] = 0;
                        }
                        state.pointer = state.pointer.wrapping_add(1);
                    }
                }
            }
        }
        Ok(())
    }
}

/// Delay that returns immediately and records how long it was asked to wait.
#[derive(Debug, Default, Clone, Copy)]
pub struct FakeDelay {
    /// Total requested delay in nanoseconds
    pub total_ns: u64,
}

impl DelayNs for FakeDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ns = self.total_ns.saturating_add(u64::from(ns));
    }
}
