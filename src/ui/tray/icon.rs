//! Tray icon artwork, rasterised in-process.
//!
//! A small crosshair with a centre gap and a ring, drawn in the crosshair
//! colour when Visible and in grey when Hidden.

use crate::app::VisibilityState;
use crate::model::constants::{TRAY_HIDDEN_COLOR, TRAY_ICON_SIZE};
use crate::model::Rgb;

/// Straight RGBA8 bitmap, row-major, top row first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrayIcon {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl TrayIcon {
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = ((y * self.width + x) * 4) as usize;
        [self.rgba[i], self.rgba[i + 1], self.rgba[i + 2], self.rgba[i + 3]]
    }

    /// Pixels in BGRA order with premultiplied alpha (Win32 icons).
    pub fn to_bgra_premultiplied(&self) -> Vec<u8> {
        self.rgba
            .chunks_exact(4)
            .flat_map(|p| {
                let a = p[3] as u16;
                let pm = |c: u8| ((c as u16 * a + 127) / 255) as u8;
                [pm(p[2]), pm(p[1]), pm(p[0]), p[3]]
            })
            .collect()
    }
}

pub fn render_icon(state: VisibilityState, color: Rgb) -> TrayIcon {
    render_icon_sized(state, color, TRAY_ICON_SIZE)
}

pub fn render_icon_sized(state: VisibilityState, color: Rgb, size: u32) -> TrayIcon {
    let ink = match state {
        VisibilityState::Visible => color,
        VisibilityState::Hidden => Rgb::new(TRAY_HIDDEN_COLOR.0, TRAY_HIDDEN_COLOR.1, TRAY_HIDDEN_COLOR.2),
    };
    let mut rgba = vec![0u8; (size * size * 4) as usize];
    let c = (size as f64 - 1.0) / 2.0;
    let gap = size as f64 / 8.0;
    let ring = size as f64 * 0.375;

    for y in 0..size {
        for x in 0..size {
            let dx = x as f64 - c;
            let dy = y as f64 - c;
            let r = dx.hypot(dy);
            let on_arm = (dx.abs() < 1.0 && dy.abs() > gap) || (dy.abs() < 1.0 && dx.abs() > gap);
            let on_ring = (r - ring).abs() < 0.75;
            if on_arm || on_ring {
                let i = ((y * size + x) * 4) as usize;
                rgba[i..i + 4].copy_from_slice(&[ink.r, ink.g, ink.b, 255]);
            }
        }
    }
    TrayIcon {
        width: size,
        height: size,
        rgba,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_icon_dimensions() {
        let icon = render_icon(VisibilityState::Visible, Rgb::new(255, 0, 0));
        assert_eq!(icon.width, TRAY_ICON_SIZE);
        assert_eq!(icon.rgba.len(), (TRAY_ICON_SIZE * TRAY_ICON_SIZE * 4) as usize);
    }

    #[test]
    fn test_visible_uses_colour_hidden_uses_grey() {
        let red = Rgb::new(255, 0, 0);
        let visible = render_icon(VisibilityState::Visible, red);
        let hidden = render_icon(VisibilityState::Hidden, red);
        assert_ne!(visible, hidden);
        // Arm pixel on the top edge of the vertical line
        assert_eq!(visible.pixel(8, 0), [255, 0, 0, 255]);
        assert_eq!(hidden.pixel(8, 0)[..3], [128, 128, 128]);
    }

    #[test]
    fn test_centre_and_corners_transparent() {
        let icon = render_icon(VisibilityState::Visible, Rgb::new(0, 255, 0));
        assert_eq!(icon.pixel(0, 0)[3], 0);
        assert_eq!(icon.pixel(15, 15)[3], 0);
    }

    #[test]
    fn test_bgra_swaps_channels() {
        let icon = render_icon(VisibilityState::Visible, Rgb::new(10, 20, 30));
        let bgra = icon.to_bgra_premultiplied();
        let i = (8 * 4) as usize;
        assert_eq!(&bgra[i..i + 4], &[30, 20, 10, 255]);
    }
}
