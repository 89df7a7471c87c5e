//! Reconstructed call stacks.

use std::collections::vec_deque;
use std::collections::VecDeque;
use std::fmt;

use crate::types::Address;

/// One reconstructed activation record
///
/// `return_address` is the word found on the stack; `caller_address` is the
/// first byte of the call instruction that pushed it, so
/// `caller_address + call_length() == return_address`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StackFrame
{
    return_address: Address,
    caller_address: Address,
}

impl StackFrame
{
    /// Create a frame from a return address and the call instruction before it.
    pub const fn new(return_address: Address, caller_address: Address) -> Self
    {
        Self {
            return_address,
            caller_address,
        }
    }

    /// Address execution resumes at when the callee returns.
    pub const fn return_address(&self) -> Address
    {
        self.return_address
    }

    /// Address of the call instruction.
    pub const fn caller_address(&self) -> Address
    {
        self.caller_address
    }

    /// Encoded length of the call instruction.
    pub fn call_length(&self) -> u64
    {
        self.return_address.value().wrapping_sub(self.caller_address.value())
    }
}

impl fmt::Display for StackFrame
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        write!(f, "{} (called from {})", self.return_address, self.caller_address)
    }
}

/// Ordered frames, innermost first
///
/// An empty stack is a normal result: it is what the unwinder returns when
/// the heuristic does not apply. Every accessor reports absence through
/// `Option` rather than panicking.
///
/// ```rust
/// use stackscope_core::types::Address;
/// use stackscope_core::unwind::{CallStack, StackFrame};
///
/// let mut stack = CallStack::new();
/// assert!(stack.top().is_none());
///
/// stack.push(StackFrame::new(Address::from(0x1005), Address::from(0x1000)));
/// stack.push(StackFrame::new(Address::from(0x2005), Address::from(0x2000)));
///
/// assert_eq!(stack.size(), 2);
/// assert_eq!(stack.top().map(|f| f.return_address()), Some(Address::from(0x2005)));
/// assert_eq!(stack.bottom().map(|f| f.return_address()), Some(Address::from(0x1005)));
/// assert!(stack.get(2).is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallStack
{
    frames: VecDeque<StackFrame>,
}

impl CallStack
{
    /// Create an empty call stack.
    pub fn new() -> Self
    {
        Self::default()
    }

    /// Insert `frame` as the new innermost frame.
    pub fn push(&mut self, frame: StackFrame)
    {
        self.frames.push_front(frame);
    }

    /// Append `frame` as the new outermost frame.
    pub(crate) fn push_outermost(&mut self, frame: StackFrame)
    {
        self.frames.push_back(frame);
    }

    /// Innermost frame.
    pub fn top(&self) -> Option<&StackFrame>
    {
        self.frames.front()
    }

    /// Outermost frame.
    pub fn bottom(&self) -> Option<&StackFrame>
    {
        self.frames.back()
    }

    /// Frame at `index`, counting from the innermost.
    pub fn get(&self, index: usize) -> Option<&StackFrame>
    {
        self.frames.get(index)
    }

    /// Number of frames.
    pub fn len(&self) -> usize
    {
        self.frames.len()
    }

    /// Number of frames; same as [`len`](Self::len).
    pub fn size(&self) -> usize
    {
        self.frames.len()
    }

    /// `true` if no frame was reconstructed.
    pub fn is_empty(&self) -> bool
    {
        self.frames.is_empty()
    }

    /// Frames from innermost to outermost.
    pub fn iter(&self) -> vec_deque::Iter<'_, StackFrame>
    {
        self.frames.iter()
    }
}

impl IntoIterator for CallStack
{
    type Item = StackFrame;
    type IntoIter = vec_deque::IntoIter<StackFrame>;

    fn into_iter(self) -> Self::IntoIter
    {
        self.frames.into_iter()
    }
}

impl<'a> IntoIterator for &'a CallStack
{
    type Item = &'a StackFrame;
    type IntoIter = vec_deque::Iter<'a, StackFrame>;

    fn into_iter(self) -> Self::IntoIter
    {
        self.frames.iter()
    }
}

impl FromIterator<StackFrame> for CallStack
{
    /// Collect frames given innermost first.
    fn from_iter<I: IntoIterator<Item = StackFrame>>(iter: I) -> Self
    {
        Self {
            frames: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for CallStack
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        for (index, frame) in self.frames.iter().enumerate() {
            writeln!(f, "#{index:<3} {frame}")?;
        }
        Ok(())
    }
}
