//! Layered overlay window.
//!
//! One `WS_POPUP` window spans the virtual desktop. Its extended styles make
//! it transparent to input (`WS_EX_TRANSPARENT`), keep it above other windows
//! (`WS_EX_TOPMOST`), never take focus (`WS_EX_NOACTIVATE`) and keep it off
//! the taskbar and Alt+Tab (`WS_EX_TOOLWINDOW`).

pub mod renderer;

use tracing::debug;
use windows::core::w;
use windows::Win32::Foundation::{HINSTANCE, HWND, LPARAM, LRESULT, WPARAM};
use windows::Win32::UI::WindowsAndMessaging::{
    CreateWindowExW, DefWindowProcW, DestroyWindow, RegisterClassW, SetWindowPos, ShowWindow,
    HWND_TOPMOST, MA_NOACTIVATE, SWP_NOACTIVATE, SWP_NOMOVE, SWP_NOSIZE, SW_HIDE,
    SW_SHOWNOACTIVATE, WM_MOUSEACTIVATE, WNDCLASSW, WS_EX_LAYERED, WS_EX_NOACTIVATE,
    WS_EX_TOOLWINDOW, WS_EX_TOPMOST, WS_EX_TRANSPARENT, WS_POPUP,
};

use crate::error::CoreError;
use crate::geometry::CrosshairGeometry;
use crate::model::Rect;
use crate::platform::windows::ffi::surface_error;
use crate::ui::OverlaySurface;

pub use renderer::Renderer;

pub struct LayeredSurface {
    hwnd: HWND,
    renderer: Renderer,
    bounds: Rect,
}

impl LayeredSurface {
    pub fn new(instance: HINSTANCE) -> Result<Self, CoreError> {
        let renderer = Renderer::new()?;
        let class_name = w!("MouseCrossOverlay");
        unsafe {
            let wc = WNDCLASSW {
                lpfnWndProc: Some(overlay_proc),
                hInstance: instance,
                lpszClassName: class_name,
                ..Default::default()
            };
            RegisterClassW(&wc);

            let ex_style = WS_EX_LAYERED
                | WS_EX_TRANSPARENT
                | WS_EX_TOPMOST
                | WS_EX_NOACTIVATE
                | WS_EX_TOOLWINDOW;
            let hwnd = CreateWindowExW(
                ex_style,
                class_name,
                w!("MouseCross Overlay"),
                WS_POPUP,
                0,
                0,
                1,
                1,
                None,
                None,
                Some(instance),
                None,
            )
            .map_err(|e| surface_error("CreateWindowExW", e))?;

            Ok(Self {
                hwnd,
                renderer,
                bounds: Rect::default(),
            })
        }
    }
}

impl OverlaySurface for LayeredSurface {
    fn show(&mut self) -> Result<(), CoreError> {
        unsafe {
            let _ = ShowWindow(self.hwnd, SW_SHOWNOACTIVATE);
            // Re-assert topmost in case another topmost window was raised
            let _ = SetWindowPos(
                self.hwnd,
                Some(HWND_TOPMOST),
                0,
                0,
                0,
                0,
                SWP_NOMOVE | SWP_NOSIZE | SWP_NOACTIVATE,
            );
        }
        Ok(())
    }

    fn hide(&mut self) -> Result<(), CoreError> {
        unsafe {
            let _ = ShowWindow(self.hwnd, SW_HIDE);
        }
        self.renderer.release_frame();
        Ok(())
    }

    fn render(&mut self, geometry: &CrosshairGeometry) -> Result<(), CoreError> {
        self.renderer.present(self.hwnd, self.bounds, geometry)
    }

    fn resize_to_desktop(&mut self, bounds: Rect) -> Result<(), CoreError> {
        debug!(
            x = bounds.x,
            y = bounds.y,
            width = bounds.width,
            height = bounds.height,
            "overlay resized"
        );
        self.bounds = bounds;
        unsafe {
            SetWindowPos(
                self.hwnd,
                Some(HWND_TOPMOST),
                bounds.x.round() as i32,
                bounds.y.round() as i32,
                bounds.width.round() as i32,
                bounds.height.round() as i32,
                SWP_NOACTIVATE,
            )
            .map_err(|e| surface_error("SetWindowPos", e))
        }
    }
}

impl Drop for LayeredSurface {
    fn drop(&mut self) {
        unsafe {
            let _ = DestroyWindow(self.hwnd);
        }
    }
}

extern "system" fn overlay_proc(hwnd: HWND, msg: u32, wparam: WPARAM, lparam: LPARAM) -> LRESULT {
    match msg {
        WM_MOUSEACTIVATE => LRESULT(MA_NOACTIVATE as isize),
        _ => unsafe { DefWindowProcW(hwnd, msg, wparam, lparam) },
    }
}
