// Error taxonomy shared by the controller and the pool
// Copyright © 2025 Hs293Go
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the "Software"),
// to deal in the Software without restriction, including without limitation
// the rights to use, copy, modify, merge, publish, distribute, sublicense,
// and/or sell copies of the Software, and to permit persons to whom the
// Software is furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included
// in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES
// OF MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT.
// IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM,
// DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION OF CONTRACT,
// TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE
// OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

/// Errors returned by controller and pool operations.
///
/// None of these is fatal to the pool: a failed operation leaves every slot exactly as it was.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "std", derive(thiserror::Error))]
pub enum PidError {
    /// The handle is out of range, or its slot is not in use
    #[cfg_attr(feature = "std", error("handle is out of range or refers to a free slot"))]
    Invalid,

    /// A configuration value violates an invariant, e.g. `min >= max` or a zero cycle time
    #[cfg_attr(feature = "std", error("configuration value violates a controller invariant"))]
    InvalidArgument,

    /// The controller's cycle time has not elapsed since its last accepted update
    #[cfg_attr(feature = "std", error("controller cycle time has not elapsed since the last update"))]
    NotDue,
}

#[cfg(not(feature = "std"))]
impl core::fmt::Display for PidError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let msg = match self {
            PidError::Invalid => "handle is out of range or refers to a free slot",
            PidError::InvalidArgument => "configuration value violates a controller invariant",
            PidError::NotDue => "controller cycle time has not elapsed since the last update",
        };
        f.write_str(msg)
    }
}
