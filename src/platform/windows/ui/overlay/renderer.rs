//! Direct2D crosshair rendering.
//!
//! GPU-accelerated, anti-aliased drawing into a top-down 32-bit DIB, pushed
//! to the layered window with `UpdateLayeredWindow` for per-pixel alpha.
//! The DIB and DC render target are kept between frames and only rebuilt
//! when the desktop size changes.

use windows::Win32::Foundation::{COLORREF, HWND, POINT, RECT, SIZE};
use windows::Win32::Graphics::Direct2D::Common::{
    D2D1_ALPHA_MODE_PREMULTIPLIED, D2D1_COLOR_F, D2D1_FIGURE_BEGIN_FILLED, D2D1_FIGURE_END_CLOSED,
    D2D1_PIXEL_FORMAT,
};
use windows::Win32::Graphics::Direct2D::{
    D2D1CreateFactory, ID2D1DCRenderTarget, ID2D1Factory, ID2D1PathGeometry, ID2D1SolidColorBrush,
    ID2D1StrokeStyle,
    D2D1_ANTIALIAS_MODE_PER_PRIMITIVE, D2D1_CAP_STYLE_FLAT, D2D1_CAP_STYLE_ROUND,
    D2D1_DASH_STYLE_SOLID, D2D1_ELLIPSE, D2D1_FACTORY_TYPE_SINGLE_THREADED, D2D1_LINE_JOIN_ROUND,
    D2D1_RENDER_TARGET_PROPERTIES, D2D1_RENDER_TARGET_TYPE_DEFAULT, D2D1_RENDER_TARGET_USAGE_NONE,
    D2D1_STROKE_STYLE_PROPERTIES,
};
use windows::Win32::Graphics::Dxgi::Common::DXGI_FORMAT_B8G8R8A8_UNORM;
use windows::Win32::Graphics::Gdi::{
    CreateCompatibleDC, CreateDIBSection, DeleteDC, DeleteObject, GetDC, ReleaseDC, SelectObject,
    BITMAPINFO, BITMAPINFOHEADER, BI_RGB, BLENDFUNCTION, DIB_RGB_COLORS, HBITMAP, HDC, HGDIOBJ,
};
use windows::Win32::UI::WindowsAndMessaging::{UpdateLayeredWindow, ULW_ALPHA};
use windows_numerics::Vector2;

use crate::error::CoreError;
use crate::geometry::{CrosshairGeometry, Marker, Paint, Primitive, Segment};
use crate::model::{Point, Rect, ShapeKind};
use crate::platform::windows::ffi::{surface_error, transient_error};

/// Off-screen 32-bit DIB selected into a memory DC.
struct FrameBuffer {
    dc: HDC,
    bitmap: HBITMAP,
    previous: HGDIOBJ,
    width: i32,
    height: i32,
}

impl FrameBuffer {
    unsafe fn new(width: i32, height: i32) -> Result<Self, CoreError> {
        let screen_dc = GetDC(None);
        let dc = CreateCompatibleDC(Some(screen_dc));
        ReleaseDC(None, screen_dc);

        let bmi = BITMAPINFO {
            bmiHeader: BITMAPINFOHEADER {
                biSize: std::mem::size_of::<BITMAPINFOHEADER>() as u32,
                biWidth: width,
                biHeight: -height, // Top-down
                biPlanes: 1,
                biBitCount: 32,
                biCompression: BI_RGB.0,
                ..Default::default()
            },
            ..Default::default()
        };

        let mut bits: *mut std::ffi::c_void = std::ptr::null_mut();
        let bitmap = match CreateDIBSection(Some(dc), &bmi, DIB_RGB_COLORS, &mut bits, None, 0) {
            Ok(bitmap) if !bits.is_null() => bitmap,
            Ok(bitmap) => {
                let _ = DeleteObject(bitmap.into());
                let _ = DeleteDC(dc);
                return Err(CoreError::RenderSurfaceUnavailable(
                    "CreateDIBSection returned no pixels".into(),
                ));
            }
            Err(e) => {
                let _ = DeleteDC(dc);
                return Err(surface_error("CreateDIBSection", e));
            }
        };
        let previous = SelectObject(dc, bitmap.into());

        Ok(Self {
            dc,
            bitmap,
            previous,
            width,
            height,
        })
    }
}

impl Drop for FrameBuffer {
    fn drop(&mut self) {
        unsafe {
            SelectObject(self.dc, self.previous);
            let _ = DeleteObject(self.bitmap.into());
            let _ = DeleteDC(self.dc);
        }
    }
}

pub struct Renderer {
    factory: ID2D1Factory,
    target: ID2D1DCRenderTarget,
    round: Option<ID2D1StrokeStyle>,
    flat: Option<ID2D1StrokeStyle>,
    frame: Option<FrameBuffer>,
}

impl Renderer {
    pub fn new() -> Result<Self, CoreError> {
        unsafe {
            let factory: ID2D1Factory = D2D1CreateFactory(D2D1_FACTORY_TYPE_SINGLE_THREADED, None)
                .map_err(|e| surface_error("D2D1CreateFactory", e))?;

            let props = D2D1_RENDER_TARGET_PROPERTIES {
                r#type: D2D1_RENDER_TARGET_TYPE_DEFAULT,
                pixelFormat: D2D1_PIXEL_FORMAT {
                    format: DXGI_FORMAT_B8G8R8A8_UNORM,
                    alphaMode: D2D1_ALPHA_MODE_PREMULTIPLIED,
                },
                // Geometry is already in physical pixels
                dpiX: 96.0,
                dpiY: 96.0,
                usage: D2D1_RENDER_TARGET_USAGE_NONE,
                minLevel: Default::default(),
            };
            let target = factory
                .CreateDCRenderTarget(&props)
                .map_err(|e| surface_error("CreateDCRenderTarget", e))?;

            let round = stroke_style(&factory, D2D1_CAP_STYLE_ROUND);
            let flat = stroke_style(&factory, D2D1_CAP_STYLE_FLAT);

            Ok(Self {
                factory,
                target,
                round,
                flat,
                frame: None,
            })
        }
    }

    /// Draw `geometry` and present it on `hwnd`, which covers `bounds`.
    pub fn present(
        &mut self,
        hwnd: HWND,
        bounds: Rect,
        geometry: &CrosshairGeometry,
    ) -> Result<(), CoreError> {
        let width = bounds.width.round() as i32;
        let height = bounds.height.round() as i32;
        if width <= 0 || height <= 0 {
            return Ok(());
        }

        let stale = self
            .frame
            .as_ref()
            .map_or(true, |f| f.width != width || f.height != height);
        if stale {
            // Release the old DIB before allocating a new desktop-sized one
            self.frame = None;
            self.frame = Some(unsafe { FrameBuffer::new(width, height)? });
        }
        let Some(frame) = self.frame.as_ref() else {
            return Ok(());
        };

        unsafe {
            let rect = RECT {
                left: 0,
                top: 0,
                right: width,
                bottom: height,
            };
            self.target
                .BindDC(frame.dc, &rect)
                .map_err(|e| surface_error("BindDC", e))?;

            self.target.BeginDraw();
            self.target.Clear(Some(&D2D1_COLOR_F {
                r: 0.0,
                g: 0.0,
                b: 0.0,
                a: 0.0,
            }));
            self.target.SetAntialiasMode(D2D1_ANTIALIAS_MODE_PER_PRIMITIVE);

            // One brush per frame, recoloured only when the paint changes
            let origin = Point::new(bounds.x, bounds.y);
            let mut brush: Option<(ID2D1SolidColorBrush, Paint)> = None;
            for primitive in geometry.primitives() {
                let paint = match primitive {
                    Primitive::Line(segment) => segment.paint,
                    Primitive::Shape(marker) => marker.paint,
                };
                let Some(current) = self.brush_for(&mut brush, paint) else {
                    continue;
                };
                match primitive {
                    Primitive::Line(segment) => self.draw_segment(segment, origin, &current),
                    Primitive::Shape(marker) => self.draw_marker(marker, origin, &current),
                }
            }

            // D2DERR_RECREATE_TARGET and friends: the next frame retries
            self.target
                .EndDraw(None, None)
                .map_err(|e| transient_error("EndDraw", e))?;

            let screen_dc = GetDC(None);
            let pt_src = POINT { x: 0, y: 0 };
            let size = SIZE {
                cx: width,
                cy: height,
            };
            let pt_dst = POINT {
                x: bounds.x.round() as i32,
                y: bounds.y.round() as i32,
            };
            let blend = BLENDFUNCTION {
                BlendOp: 0,
                BlendFlags: 0,
                SourceConstantAlpha: 255,
                AlphaFormat: 1,
            };
            let result = UpdateLayeredWindow(
                hwnd,
                Some(screen_dc),
                Some(&pt_dst),
                Some(&size),
                Some(frame.dc),
                Some(&pt_src),
                COLORREF(0),
                Some(&blend),
                ULW_ALPHA,
            );
            ReleaseDC(None, screen_dc);
            result.map_err(|e| transient_error("UpdateLayeredWindow", e))
        }
    }

    /// Drop the cached DIB (the surface is hidden; no need to hold it).
    pub fn release_frame(&mut self) {
        self.frame = None;
    }

    unsafe fn brush_for(
        &self,
        cached: &mut Option<(ID2D1SolidColorBrush, Paint)>,
        paint: Paint,
    ) -> Option<ID2D1SolidColorBrush> {
        match cached {
            Some((brush, current)) => {
                if *current != paint {
                    brush.SetColor(&d2d_color(paint));
                    *current = paint;
                }
                Some(brush.clone())
            }
            None => {
                let brush = self.target.CreateSolidColorBrush(&d2d_color(paint), None).ok()?;
                *cached = Some((brush.clone(), paint));
                Some(brush)
            }
        }
    }

    unsafe fn draw_segment(&self, segment: &Segment, origin: Point, brush: &ID2D1SolidColorBrush) {
        self.target.DrawLine(
            local(segment.from, origin),
            local(segment.to, origin),
            brush,
            segment.width as f32,
            self.flat.as_ref(),
        );
    }

    unsafe fn draw_marker(&self, marker: &Marker, origin: Point, brush: &ID2D1SolidColorBrush) {
        match marker.kind {
            ShapeKind::Circle => {
                let c = local(marker.center, origin);
                let ellipse = D2D1_ELLIPSE {
                    point: c,
                    radiusX: marker.half_size as f32,
                    radiusY: marker.half_size as f32,
                };
                self.target.FillEllipse(&ellipse, brush);
            }
            ShapeKind::Cross => {
                for (from, to) in marker.cross_strokes() {
                    self.target.DrawLine(
                        local(from, origin),
                        local(to, origin),
                        brush,
                        marker.stroke_width as f32,
                        self.round.as_ref(),
                    );
                }
            }
            ShapeKind::ArrowToCenter | ShapeKind::Diamond => {
                if let Some(path) = self.polygon(&marker.polygon(), origin) {
                    self.target.FillGeometry(&path, brush, None);
                }
            }
        }
    }

    unsafe fn polygon(&self, points: &[Point], origin: Point) -> Option<ID2D1PathGeometry> {
        let (first, rest) = points.split_first()?;
        let path = self.factory.CreatePathGeometry().ok()?;
        let sink = path.Open().ok()?;
        sink.BeginFigure(local(*first, origin), D2D1_FIGURE_BEGIN_FILLED);
        for p in rest {
            sink.AddLine(local(*p, origin));
        }
        sink.EndFigure(D2D1_FIGURE_END_CLOSED);
        sink.Close().ok()?;
        Some(path)
    }
}

unsafe fn stroke_style(
    factory: &ID2D1Factory,
    cap: windows::Win32::Graphics::Direct2D::D2D1_CAP_STYLE,
) -> Option<ID2D1StrokeStyle> {
    let props = D2D1_STROKE_STYLE_PROPERTIES {
        startCap: cap,
        endCap: cap,
        dashCap: cap,
        lineJoin: D2D1_LINE_JOIN_ROUND,
        miterLimit: 1.0,
        dashStyle: D2D1_DASH_STYLE_SOLID,
        dashOffset: 0.0,
    };
    factory.CreateStrokeStyle(&props, None).ok()
}

fn local(p: Point, origin: Point) -> Vector2 {
    Vector2::new((p.x - origin.x) as f32, (p.y - origin.y) as f32)
}

fn d2d_color(paint: Paint) -> D2D1_COLOR_F {
    let (r, g, b) = paint.color.to_f32();
    D2D1_COLOR_F {
        r,
        g,
        b,
        a: paint.opacity as f32,
    }
}
