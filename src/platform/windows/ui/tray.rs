//! System tray (notification area) icon for Windows.
//!
//! [`Win32Tray`] is the engine's [`TrayPresenter`]. The context menu handle
//! lives in a thread-local so the window procedure can show it without
//! borrowing the engine (`TrackPopupMenu` runs a modal loop).

use std::cell::RefCell;

use tracing::{debug, warn};
use windows::core::PCWSTR;
use windows::Win32::Foundation::{HWND, LPARAM, POINT, WPARAM};
use windows::Win32::UI::Shell::{
    Shell_NotifyIconW, NIF_ICON, NIF_INFO, NIF_MESSAGE, NIF_TIP, NIIF_INFO, NIM_ADD, NIM_DELETE,
    NIM_MODIFY, NOTIFYICONDATAW,
};
use windows::Win32::UI::WindowsAndMessaging::{
    AppendMenuW, CreateIcon, CreatePopupMenu, DestroyIcon, DestroyMenu, GetCursorPos,
    PostMessageW, SetForegroundWindow, TrackPopupMenu, HICON, HMENU, MF_SEPARATOR, MF_STRING,
    TPM_BOTTOMALIGN, TPM_LEFTALIGN, TPM_NONOTIFY, TPM_RETURNCMD, TPM_RIGHTBUTTON, WM_NULL, WM_USER,
};

use crate::app::VisibilityState;
use crate::events::TrayAction;
use crate::platform::windows::ffi::{copy_wide, wide};
use crate::ui::{menu_entries, MenuEntry, TrayIcon, TrayPresenter};

// Custom message for tray icon events
pub const WM_TRAYICON: u32 = WM_USER + 1;

// Menu item IDs
const MENU_TOGGLE: u32 = 1001;
const MENU_SETTINGS: u32 = 1002;
const MENU_ABOUT: u32 = 1003;
const MENU_QUIT: u32 = 1004;

// Tray icon ID
const TRAY_ICON_ID: u32 = 1;

thread_local! {
    static TRAY_MENU: RefCell<Option<HMENU>> = const { RefCell::new(None) };
}

fn menu_id(action: TrayAction) -> u32 {
    match action {
        TrayAction::Toggle => MENU_TOGGLE,
        TrayAction::Settings => MENU_SETTINGS,
        TrayAction::About => MENU_ABOUT,
        TrayAction::Quit => MENU_QUIT,
    }
}

fn action_for(id: u32) -> Option<TrayAction> {
    match id {
        MENU_TOGGLE => Some(TrayAction::Toggle),
        MENU_SETTINGS => Some(TrayAction::Settings),
        MENU_ABOUT => Some(TrayAction::About),
        MENU_QUIT => Some(TrayAction::Quit),
        _ => None,
    }
}

pub struct Win32Tray {
    hwnd: HWND,
    icon: Option<HICON>,
    added: bool,
}

impl Win32Tray {
    /// Add the icon to the notification area. Tray messages go to `hwnd`.
    pub fn install(hwnd: HWND) -> Self {
        let mut tray = Self {
            hwnd,
            icon: None,
            added: false,
        };
        tray.add();
        tray
    }

    fn base(&self) -> NOTIFYICONDATAW {
        NOTIFYICONDATAW {
            cbSize: std::mem::size_of::<NOTIFYICONDATAW>() as u32,
            hWnd: self.hwnd,
            uID: TRAY_ICON_ID,
            ..Default::default()
        }
    }

    fn add(&mut self) {
        let mut nid = self.base();
        nid.uFlags = NIF_MESSAGE;
        nid.uCallbackMessage = WM_TRAYICON;
        if let Some(icon) = self.icon {
            nid.uFlags |= NIF_ICON;
            nid.hIcon = icon;
        }
        self.added = unsafe { Shell_NotifyIconW(NIM_ADD, &nid) }.as_bool();
        if !self.added {
            warn!("could not add the tray icon; retrying on the next update");
        }
    }

    fn modify(&mut self, nid: &NOTIFYICONDATAW) {
        if !self.added {
            self.add();
        }
        if !unsafe { Shell_NotifyIconW(NIM_MODIFY, nid) }.as_bool() {
            debug!("tray icon update failed");
        }
    }
}

impl TrayPresenter for Win32Tray {
    fn set_toggle_label(&mut self, label: &str) {
        let menu = unsafe { build_menu(label) };
        TRAY_MENU.with(|m| {
            if let Some(old) = m.borrow_mut().replace(menu) {
                unsafe {
                    let _ = DestroyMenu(old);
                }
            }
        });
    }

    fn set_icon(&mut self, icon: &TrayIcon) {
        let Some(hicon) = create_hicon(icon) else {
            warn!("could not create tray icon image");
            return;
        };
        let mut nid = self.base();
        nid.uFlags = NIF_ICON;
        nid.hIcon = hicon;
        self.modify(&nid);
        if let Some(old) = self.icon.replace(hicon) {
            unsafe {
                let _ = DestroyIcon(old);
            }
        }
    }

    fn set_tooltip(&mut self, tooltip: &str) {
        let mut nid = self.base();
        nid.uFlags = NIF_TIP;
        copy_wide(&mut nid.szTip, tooltip);
        self.modify(&nid);
    }

    fn notify(&mut self, title: &str, message: &str) {
        let mut nid = self.base();
        nid.uFlags = NIF_INFO;
        nid.dwInfoFlags = NIIF_INFO;
        copy_wide(&mut nid.szInfoTitle, title);
        copy_wide(&mut nid.szInfo, message);
        self.modify(&nid);
    }
}

impl Drop for Win32Tray {
    fn drop(&mut self) {
        unsafe {
            let nid = self.base();
            let _ = Shell_NotifyIconW(NIM_DELETE, &nid);
            if let Some(icon) = self.icon.take() {
                let _ = DestroyIcon(icon);
            }
        }
        TRAY_MENU.with(|m| {
            if let Some(menu) = m.borrow_mut().take() {
                unsafe {
                    let _ = DestroyMenu(menu);
                }
            }
        });
    }
}

/// Menu from the shared layout, with `toggle_label` on the Toggle item.
unsafe fn build_menu(toggle_label: &str) -> HMENU {
    let menu = CreatePopupMenu().unwrap_or_default();
    for entry in menu_entries(VisibilityState::Hidden) {
        match entry {
            MenuEntry::Separator => {
                let _ = AppendMenuW(menu, MF_SEPARATOR, 0, PCWSTR::null());
            }
            MenuEntry::Item { action, label } => {
                let text = if action == TrayAction::Toggle {
                    wide(toggle_label)
                } else {
                    wide(&label)
                };
                let _ = AppendMenuW(
                    menu,
                    MF_STRING,
                    menu_id(action) as usize,
                    PCWSTR(text.as_ptr()),
                );
            }
        }
    }
    menu
}

/// Show the context menu at the cursor and return the chosen action.
pub fn show_tray_menu(hwnd: HWND) -> Option<TrayAction> {
    let menu = TRAY_MENU.with(|m| *m.borrow())?;
    unsafe {
        let mut pt = POINT::default();
        let _ = GetCursorPos(&mut pt);

        // Required for menu to close when clicking outside
        let _ = SetForegroundWindow(hwnd);

        let cmd = TrackPopupMenu(
            menu,
            TPM_BOTTOMALIGN | TPM_LEFTALIGN | TPM_RIGHTBUTTON | TPM_RETURNCMD | TPM_NONOTIFY,
            pt.x,
            pt.y,
            None,
            hwnd,
            None,
        );
        let _ = PostMessageW(Some(hwnd), WM_NULL, WPARAM(0), LPARAM(0));
        action_for(cmd.0 as u32)
    }
}

fn create_hicon(icon: &TrayIcon) -> Option<HICON> {
    let color = icon.to_bgra_premultiplied();
    // 1bpp AND mask, rows padded to 16 bits; all zero so alpha decides
    let mask_stride = (icon.width as usize).div_ceil(16) * 2;
    let mask = vec![0u8; mask_stride * icon.height as usize];
    unsafe {
        CreateIcon(
            None,
            icon.width as i32,
            icon.height as i32,
            1,
            32,
            mask.as_ptr(),
            color.as_ptr(),
        )
        .ok()
    }
}
