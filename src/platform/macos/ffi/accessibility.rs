//! FFI bindings for ApplicationServices (Accessibility).

#[link(name = "ApplicationServices", kind = "framework")]
extern "C" {
    fn AXIsProcessTrusted() -> bool;
}

/// Whether the process is trusted for Accessibility.
///
/// Pointer polling works without it; some hotkey combinations do not.
pub fn accessibility_trusted() -> bool {
    unsafe { AXIsProcessTrusted() }
}
