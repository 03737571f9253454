use gpui::*;

#[cfg(target_os = "macos")]
use objc2::rc::Retained;
#[cfg(target_os = "macos")]
use objc2_app_kit::NSColor;

/// Band shades, darkest (shallowest nesting) first.
pub const BAND_SHADES: [u32; 3] = [0xe3e3e3, 0xededed, 0xf7f7f7];
pub const TABLE_FALLBACK: u32 = 0xf9f9f9;
pub const BORDER: u32 = 0xcacaca;
pub const COPIED: u32 = 0xccccff;
pub const DRAGGED_OVER: u32 = 0xccccff;
pub const DRAGGED_OVER_COPIED: u32 = 0x9999ff;

pub struct Theme {
    pub text: Rgba,
    pub subtext: Rgba,
    pub base: Rgba,
    pub header: Rgba,
    pub border: Rgba,
    pub accent: Rgba,
}

impl Global for Theme {}

/// Get the system accent color on macOS
#[cfg(target_os = "macos")]
fn get_system_accent_color() -> Rgba {
    let accent_color: Retained<NSColor> = NSColor::controlAccentColor();
    // Convert to sRGB color space
    if let Some(rgb_color) = accent_color.colorUsingColorSpace(objc2_app_kit::NSColorSpace::sRGBColorSpace().as_ref()) {
        let r = rgb_color.redComponent() as f32;
        let g = rgb_color.greenComponent() as f32;
        let b = rgb_color.blueComponent() as f32;
        let a = rgb_color.alphaComponent() as f32;
        return rgba(
            ((r * 255.0) as u32) << 24
                | ((g * 255.0) as u32) << 16
                | ((b * 255.0) as u32) << 8
                | (a * 255.0) as u32,
        );
    }
    rgb(0x66afe9)
}

#[cfg(not(target_os = "macos"))]
fn get_system_accent_color() -> Rgba {
    rgb(0x66afe9)
}

impl Theme {
    pub fn init(app: &mut App) {
        app.set_global(Theme::get_light());
    }

    pub fn get_light() -> Theme {
        Theme {
            text: rgb(0x222222),
            subtext: rgb(0x6c7086),
            base: rgb(0xffffff),
            header: rgb(0xf3f3f3),
            border: rgb(BORDER),
            accent: get_system_accent_color(),
        }
    }
}

/// Background for a cell in the copy / drag-fill states.
pub fn state_background(copied: bool, dragged_over: bool) -> Option<Rgba> {
    match (copied, dragged_over) {
        (true, true) => Some(rgb(DRAGGED_OVER_COPIED)),
        (false, true) => Some(rgb(DRAGGED_OVER)),
        (true, false) => Some(rgb(COPIED)),
        (false, false) => None,
    }
}
