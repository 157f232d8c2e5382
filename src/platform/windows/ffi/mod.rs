//! Small Win32 helpers shared by the Windows backend.
//!
//! - UTF-16 conversion for `PCWSTR` arguments and fixed-size buffers
//! - mapping `windows::core::Error` onto [`CoreError`]

pub mod monitors;

use crate::error::CoreError;

pub use monitors::enumerate_monitors;

/// Null-terminated UTF-16 copy of `s`.
pub fn wide(s: &str) -> Vec<u16> {
    s.encode_utf16().chain(std::iter::once(0)).collect()
}

/// Copy `s` into a fixed UTF-16 buffer (tooltips, balloon text), truncating
/// so the terminator always fits.
pub fn copy_wide(dst: &mut [u16], s: &str) {
    if dst.is_empty() {
        return;
    }
    let max = dst.len() - 1;
    let mut n = 0;
    for (slot, c) in dst.iter_mut().zip(s.encode_utf16().take(max)) {
        *slot = c;
        n += 1;
    }
    dst[n] = 0;
}

/// A drawing-path failure: the overlay cannot be used any more.
pub fn surface_error(context: &str, err: windows::core::Error) -> CoreError {
    CoreError::RenderSurfaceUnavailable(format!("{}: {}", context, err.message()))
}

/// A failure that clears up once the display configuration settles.
pub fn transient_error(context: &str, err: windows::core::Error) -> CoreError {
    CoreError::DisplayReconfiguration(format!("{}: {}", context, err.message()))
}
