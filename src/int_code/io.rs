use std::{cell::RefCell, collections::VecDeque, rc::Rc};

use crate::Error;

/// Data source and sink of an intcode process.
///
/// The computer only talks to devices through this trait. `read` must not block: when the device
/// has nothing pending it fails, usually with [`Error::NotEnoughInput`].
pub trait Stream {
    fn read(&mut self) -> Result<i64, Error>;
    fn write(&mut self, value: i64) -> Result<(), Error>;
}

impl<S: Stream + ?Sized> Stream for &mut S {
    fn read(&mut self) -> Result<i64, Error> {
        (**self).read()
    }

    fn write(&mut self, value: i64) -> Result<(), Error> {
        (**self).write(value)
    }
}

impl<S: Stream + ?Sized> Stream for Box<S> {
    fn read(&mut self) -> Result<i64, Error> {
        (**self).read()
    }

    fn write(&mut self, value: i64) -> Result<(), Error> {
        (**self).write(value)
    }
}

/// Device handle which can be attached to a computer while the caller keeps a clone of it.
pub struct SharedDevice<D: ?Sized> {
    r: Rc<RefCell<D>>,
}

impl<D> SharedDevice<D> {
    pub fn new(device: D) -> Self {
        Self {
            r: Rc::new(RefCell::new(device)),
        }
    }
}

impl<D: ?Sized> Clone for SharedDevice<D> {
    fn clone(&self) -> Self {
        Self { r: self.r.clone() }
    }
}

impl<D: ?Sized> SharedDevice<D> {
    pub fn check<F, U>(&self, f: F) -> U
    where
        F: FnOnce(&D) -> U,
    {
        f(&self.r.borrow())
    }

    pub fn tweak<F, U>(&self, f: F) -> U
    where
        F: FnOnce(&mut D) -> U,
    {
        f(&mut self.r.borrow_mut())
    }
}

impl<D: Stream + ?Sized> Stream for SharedDevice<D> {
    fn read(&mut self) -> Result<i64, Error> {
        self.tweak(|d| d.read())
    }

    fn write(&mut self, value: i64) -> Result<(), Error> {
        self.tweak(|d| d.write(value))
    }
}

/// FIFO device: pending inputs are handed out in order, outputs are queued for the caller.
#[derive(Debug, Default, Clone)]
pub struct Channel {
    inputs: VecDeque<i64>,
    outputs: VecDeque<i64>,
}

impl Stream for Channel {
    fn read(&mut self) -> Result<i64, Error> {
        self.inputs.pop_front().ok_or(Error::NotEnoughInput)
    }

    fn write(&mut self, value: i64) -> Result<(), Error> {
        self.outputs.push_back(value);
        Ok(())
    }
}

impl Channel {
    pub fn new(init_input: &[i64]) -> Self {
        Self {
            inputs: VecDeque::from_iter(init_input.iter().copied()),
            outputs: VecDeque::new(),
        }
    }

    pub fn push_input(&mut self, value: i64) {
        self.inputs.push_back(value);
    }

    pub fn extend_input<I: IntoIterator<Item = i64>>(&mut self, values: I) {
        self.inputs.extend(values);
    }

    /// Queues `text` as ASCII codes, followed by a newline.
    pub fn push_ascii(&mut self, text: &str) {
        self.inputs
            .extend(text.bytes().chain(std::iter::once(b'\n')).map(i64::from));
    }

    pub fn pending_inputs(&self) -> &VecDeque<i64> {
        &self.inputs
    }

    pub fn pop_output(&mut self) -> Option<i64> {
        self.outputs.pop_front()
    }

    pub fn take_outputs(&mut self) -> Vec<i64> {
        self.outputs.drain(..).collect()
    }

    pub fn outputs(&self) -> &VecDeque<i64> {
        &self.outputs
    }

    /// Outputs within the ASCII range, rendered as text.
    pub fn ascii_output(&self) -> String {
        self.outputs
            .iter()
            .filter_map(|&n| u8::try_from(n).ok().filter(u8::is_ascii))
            .map(char::from)
            .collect()
    }

    pub fn non_ascii_outputs(&self) -> Vec<i64> {
        self.outputs
            .iter()
            .copied()
            .filter(|&n| !(0..=127).contains(&n))
            .collect()
    }
}
