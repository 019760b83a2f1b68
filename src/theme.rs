//! Centralized theme for ISCV Consulta
//! All colors, sizes, and styling should reference this module

use egui::Color32;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    pub fn is_dark(self) -> bool {
        self == Self::Dark
    }

    /// Icon for the header toggle: the mode a click switches to
    pub fn toggle_icon(self) -> &'static str {
        match self {
            Self::Light => egui_phosphor::regular::MOON,
            Self::Dark => egui_phosphor::regular::SUN,
        }
    }
}

/// Color set for one theme mode
pub struct Palette {
    // Backgrounds
    pub bg_base: Color32,
    pub bg_elevated: Color32,
    pub bg_input: Color32,
    pub bg_surface: Color32,
    pub bg_hover: Color32,
    pub window_fill: Color32,

    // Brand
    pub primary: Color32,
    pub on_primary: Color32,
    pub secondary: Color32,
    pub on_secondary: Color32,

    // Text
    pub text_primary: Color32,
    pub text_secondary: Color32,
    pub text_muted: Color32,
    pub text_dim: Color32,

    // Borders
    pub border_subtle: Color32,
    pub border_strong: Color32,

    // Status
    pub status_success: Color32,
    pub status_warning: Color32,
    pub warning_bg: Color32,
    pub warning_text: Color32,
    pub error_bg: Color32,
    pub error_border: Color32,
    pub error_text: Color32,

    // Buttons
    pub btn_default: Color32,
    pub btn_disabled: Color32,
    pub btn_disabled_text: Color32,
}

// =============================================================================
// COLORS - Light
// =============================================================================
pub const LIGHT: Palette = Palette {
    bg_base: Color32::from_rgb(0xf4, 0xf4, 0xef), // paper
    bg_elevated: Color32::WHITE,
    bg_input: Color32::WHITE,
    bg_surface: Color32::from_rgb(0xe7, 0xe5, 0xe4), // stone-200
    bg_hover: Color32::from_rgb(0xfe, 0xf0, 0x8a), // yellow-200
    window_fill: Color32::WHITE,
    primary: Color32::from_rgb(0x25, 0x63, 0xeb), // blue-600
    on_primary: Color32::WHITE,
    secondary: Color32::from_rgb(0x0a, 0x0a, 0x0a),
    on_secondary: Color32::WHITE,
    text_primary: Color32::from_rgb(0x0a, 0x0a, 0x0a),
    text_secondary: Color32::from_rgb(0x27, 0x27, 0x2a), // zinc-800
    text_muted: Color32::from_rgb(0x52, 0x52, 0x5b), // zinc-600
    text_dim: Color32::from_rgb(0x71, 0x71, 0x7a), // zinc-500
    border_subtle: Color32::from_rgb(0xd4, 0xd4, 0xd8), // zinc-300
    border_strong: Color32::from_rgb(0x0a, 0x0a, 0x0a),
    status_success: Color32::from_rgb(0x16, 0xa3, 0x4a), // green-600
    status_warning: Color32::from_rgb(0xd9, 0x77, 0x06), // amber-600
    warning_bg: Color32::from_rgb(0xff, 0xfb, 0xeb), // amber-50
    warning_text: Color32::from_rgb(0x92, 0x40, 0x0e), // amber-800
    error_bg: Color32::from_rgb(0xfe, 0xf2, 0xf2), // red-50
    error_border: Color32::from_rgb(0xfc, 0xa5, 0xa5), // red-300
    error_text: Color32::from_rgb(0x99, 0x1b, 0x1b), // red-800
    btn_default: Color32::from_rgb(0xe4, 0xe4, 0xe7), // zinc-200
    btn_disabled: Color32::from_rgb(0xf4, 0xf4, 0xf5), // zinc-100
    btn_disabled_text: Color32::from_rgb(0xa1, 0xa1, 0xaa), // zinc-400
};

// =============================================================================
// COLORS - Dark
// =============================================================================
pub const DARK: Palette = Palette {
    bg_base: Color32::from_rgb(0x09, 0x09, 0x0b), // zinc-950
    bg_elevated: Color32::from_rgb(0x18, 0x18, 0x1b), // zinc-900
    bg_input: Color32::from_rgb(0x14, 0x14, 0x18),
    bg_surface: Color32::from_rgb(0x27, 0x27, 0x2a), // zinc-800
    bg_hover: Color32::from_rgb(0x1e, 0x29, 0x3b), // slate-800
    window_fill: Color32::from_rgb(0x12, 0x12, 0x14),
    primary: Color32::from_rgb(0x60, 0xa5, 0xfa), // blue-400
    on_primary: Color32::from_rgb(0x0a, 0x0a, 0x0a),
    secondary: Color32::from_rgb(0xfa, 0xcc, 0x15), // yellow-400
    on_secondary: Color32::from_rgb(0x0a, 0x0a, 0x0a),
    text_primary: Color32::WHITE,
    text_secondary: Color32::from_rgb(0xe4, 0xe4, 0xe7), // zinc-200
    text_muted: Color32::from_rgb(0xa1, 0xa1, 0xaa), // zinc-400
    text_dim: Color32::from_rgb(0x71, 0x71, 0x7a), // zinc-500
    border_subtle: Color32::from_rgb(0x27, 0x27, 0x2a), // zinc-800
    border_strong: Color32::from_rgb(0x52, 0x52, 0x5b), // zinc-600
    status_success: Color32::from_rgb(0x34, 0xd3, 0x99), // emerald-400
    status_warning: Color32::from_rgb(0xfb, 0xbf, 0x24), // amber-400
    warning_bg: Color32::from_rgb(0x2b, 0x1d, 0x05),
    warning_text: Color32::from_rgb(0xfc, 0xd3, 0x4d), // amber-300
    error_bg: Color32::from_rgb(0x2d, 0x0a, 0x0a),
    error_border: Color32::from_rgb(0x7f, 0x1d, 0x1d),
    error_text: Color32::from_rgb(0xfc, 0xa5, 0xa5),
    btn_default: Color32::from_rgb(0x3f, 0x3f, 0x46), // zinc-700
    btn_disabled: Color32::from_rgb(0x27, 0x27, 0x2a), // zinc-800
    btn_disabled_text: Color32::from_rgb(0x71, 0x71, 0x7a), // zinc-500
};

pub fn palette(mode: ThemeMode) -> &'static Palette {
    match mode {
        ThemeMode::Light => &LIGHT,
        ThemeMode::Dark => &DARK,
    }
}

// =============================================================================
// TYPOGRAPHY - Font Sizes
// =============================================================================
pub const FONT_DISPLAY: f32 = 34.0;
pub const FONT_TITLE: f32 = 18.0;
pub const FONT_BODY: f32 = 14.0;
pub const FONT_LABEL: f32 = 13.0;
pub const FONT_SMALL: f32 = 11.0;

// =============================================================================
// DIMENSIONS - Layout
// =============================================================================
pub const SIDEBAR_WIDTH: f32 = 280.0;
pub const HEADER_HEIGHT: f32 = 96.0;
pub const ROW_HEIGHT: f32 = 44.0;
pub const TABLE_HEADER_HEIGHT: f32 = 36.0;
pub const PAGINATION_HEIGHT: f32 = 52.0;
pub const LOGO_SIZE: f32 = 56.0;
pub const MODAL_WIDTH: f32 = 460.0;
pub const DETAIL_MODAL_WIDTH: f32 = 560.0;

// =============================================================================
// CORNER RADIUS / STROKES / SPACING
// =============================================================================
pub const RADIUS_DEFAULT: f32 = 4.0;
pub const RADIUS_LARGE: f32 = 8.0;

pub const STROKE_DEFAULT: f32 = 1.0;
pub const STROKE_MEDIUM: f32 = 1.5;
pub const STROKE_THICK: f32 = 2.0;

pub const SPACING_SM: f32 = 4.0;
pub const SPACING_MD: f32 = 8.0;
pub const SPACING_LG: f32 = 12.0;
pub const SPACING_XL: f32 = 16.0;

// =============================================================================
// HELPER - Apply global visuals
// =============================================================================
pub fn apply_visuals(ctx: &egui::Context, mode: ThemeMode) {
    let p = palette(mode);
    let base = if mode.is_dark() {
        egui::Visuals::dark()
    } else {
        egui::Visuals::light()
    };
    ctx.set_theme(if mode.is_dark() {
        egui::Theme::Dark
    } else {
        egui::Theme::Light
    });

    let widget = |bg_fill: Color32, weak_bg_fill: Color32, stroke: egui::Stroke, fg: Color32| {
        egui::style::WidgetVisuals {
            bg_fill,
            weak_bg_fill,
            bg_stroke: stroke,
            fg_stroke: egui::Stroke::new(STROKE_DEFAULT, fg),
            corner_radius: RADIUS_DEFAULT.into(),
            expansion: 0.0,
        }
    };

    ctx.set_visuals(egui::Visuals {
        dark_mode: mode.is_dark(),
        panel_fill: p.bg_base,
        window_fill: p.window_fill,
        extreme_bg_color: p.bg_input,
        faint_bg_color: p.bg_elevated,
        hyperlink_color: p.primary,
        selection: egui::style::Selection {
            bg_fill: p.bg_hover,
            stroke: egui::Stroke::new(STROKE_DEFAULT, p.text_primary),
        },
        widgets: egui::style::Widgets {
            noninteractive: widget(
                p.bg_elevated,
                p.bg_surface,
                egui::Stroke::new(STROKE_DEFAULT, p.border_subtle),
                p.text_primary,
            ),
            inactive: widget(
                p.bg_input,
                p.btn_default,
                egui::Stroke::new(STROKE_DEFAULT, p.border_subtle),
                p.text_secondary,
            ),
            hovered: widget(
                p.bg_hover,
                lighten(p.btn_default, 0.12),
                egui::Stroke::new(STROKE_MEDIUM, p.border_strong),
                p.text_primary,
            ),
            active: egui::style::WidgetVisuals {
                expansion: -1.0,
                ..widget(
                    p.bg_surface,
                    p.bg_surface,
                    egui::Stroke::new(STROKE_MEDIUM, p.border_strong),
                    p.text_primary,
                )
            },
            open: widget(
                p.bg_surface,
                p.bg_elevated,
                egui::Stroke::new(STROKE_DEFAULT, p.border_subtle),
                p.text_primary,
            ),
        },
        striped: true,
        interact_cursor: Some(egui::CursorIcon::PointingHand),
        popup_shadow: egui::epaint::Shadow {
            offset: [0, 4],
            blur: 12,
            spread: 0,
            color: Color32::from_black_alpha(60),
        },
        window_stroke: egui::Stroke::new(STROKE_THICK, p.border_strong),
        window_corner_radius: egui::CornerRadius::same(RADIUS_LARGE as u8),
        menu_corner_radius: egui::CornerRadius::same(RADIUS_LARGE as u8),
        ..base
    });

    ctx.style_mut(|style| {
        style.interaction.selectable_labels = false;
        style.spacing.item_spacing = egui::vec2(8.0, 6.0);
        style.spacing.button_padding = egui::vec2(12.0, 6.0);
        style.spacing.combo_width = SIDEBAR_WIDTH - 2.0 * SPACING_XL - 2.0 * SPACING_LG;
        style.spacing.scroll.bar_width = 6.0;
        style.spacing.scroll.floating = false;
    });
}

// =============================================================================
// HELPER - Frames
// =============================================================================

/// Bordered panel with a hard offset look
pub fn card_frame(p: &Palette) -> egui::Frame {
    egui::Frame::new()
        .fill(p.bg_elevated)
        .stroke(egui::Stroke::new(STROKE_THICK, p.border_strong))
        .corner_radius(RADIUS_DEFAULT)
        .inner_margin(egui::Margin::same(SPACING_LG as i8))
        .shadow(egui::epaint::Shadow {
            offset: [4, 4],
            blur: 0,
            spread: 0,
            color: p.border_strong,
        })
}

pub fn section_frame(p: &Palette) -> egui::Frame {
    egui::Frame::new()
        .fill(p.bg_elevated)
        .stroke(egui::Stroke::new(STROKE_DEFAULT, p.border_subtle))
        .corner_radius(RADIUS_DEFAULT)
        .inner_margin(egui::Margin::same(12))
}

pub fn modal_frame(p: &Palette) -> egui::Frame {
    egui::Frame::new()
        .fill(p.window_fill)
        .stroke(egui::Stroke::new(STROKE_THICK, p.border_strong))
        .corner_radius(RADIUS_LARGE)
        .inner_margin(SPACING_XL)
}

/// Tinted callout used for notices inside modals
pub fn notice_frame(fill: Color32, border: Color32) -> egui::Frame {
    egui::Frame::new()
        .fill(fill)
        .stroke(egui::Stroke::new(STROKE_DEFAULT, border))
        .corner_radius(RADIUS_DEFAULT)
        .inner_margin(egui::Margin::same(10))
}

// =============================================================================
// HELPER - Button styles
// =============================================================================

/// Default gray button
pub fn button(p: &Palette, text: impl Into<String>) -> egui::Button<'static> {
    egui::Button::new(egui::RichText::new(text.into()).color(p.text_primary))
        .fill(p.btn_default)
        .corner_radius(RADIUS_DEFAULT)
}

/// Primary action button
pub fn button_accent(p: &Palette, text: impl Into<String>) -> egui::Button<'static> {
    egui::Button::new(egui::RichText::new(text.into()).color(p.on_primary).strong())
        .fill(p.primary)
        .stroke(egui::Stroke::new(STROKE_THICK, p.border_strong))
        .corner_radius(RADIUS_DEFAULT)
}

/// Pagination button that greys out at the bounds
pub fn button_nav(p: &Palette, text: impl Into<String>, enabled: bool) -> egui::Button<'static> {
    if enabled {
        egui::Button::new(egui::RichText::new(text.into()).color(p.text_primary).strong())
            .fill(p.bg_elevated)
            .stroke(egui::Stroke::new(STROKE_THICK, p.border_strong))
            .corner_radius(RADIUS_DEFAULT)
    } else {
        egui::Button::new(egui::RichText::new(text.into()).color(p.btn_disabled_text))
            .fill(p.btn_disabled)
            .stroke(egui::Stroke::new(STROKE_DEFAULT, p.border_subtle))
            .corner_radius(RADIUS_DEFAULT)
    }
}

// =============================================================================
// HELPER - Segmented toggle (pill-style)
// =============================================================================

/// Renders a segmented toggle with two options. Returns true if selection changed.
/// `left_active` indicates if the left option is currently selected.
pub fn segmented_toggle(
    ui: &mut egui::Ui,
    p: &Palette,
    left_label: &str,
    right_label: &str,
    left_active: &mut bool,
) -> bool {
    let mut changed = false;
    let height = 26.0;
    let font_size = FONT_SMALL;
    let rounding = RADIUS_DEFAULT;
    let segment_width = 72.0;

    let (rect, response) =
        ui.allocate_exact_size(egui::vec2(segment_width * 2.0, height), egui::Sense::click());
    let painter = ui.painter();

    painter.rect_filled(rect, rounding + 2.0, p.bg_surface);

    let left_rect =
        egui::Rect::from_min_max(rect.min, egui::pos2(rect.min.x + segment_width, rect.max.y));
    let right_rect =
        egui::Rect::from_min_max(egui::pos2(rect.min.x + segment_width, rect.min.y), rect.max);
    let active_rect = if *left_active { left_rect } else { right_rect };
    painter.rect_filled(active_rect.shrink(2.0), rounding, p.primary);

    let (left_color, right_color) = if *left_active {
        (p.on_primary, p.text_muted)
    } else {
        (p.text_muted, p.on_primary)
    };
    painter.text(
        left_rect.center(),
        egui::Align2::CENTER_CENTER,
        left_label,
        egui::FontId::proportional(font_size),
        left_color,
    );
    painter.text(
        right_rect.center(),
        egui::Align2::CENTER_CENTER,
        right_label,
        egui::FontId::proportional(font_size),
        right_color,
    );

    if response.hovered() {
        ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
    }

    if response.clicked() {
        if let Some(pos) = response.interact_pointer_pos() {
            let clicked_left = pos.x < rect.min.x + segment_width;
            if clicked_left != *left_active {
                *left_active = clicked_left;
                changed = true;
            }
        }
    }
    changed
}

fn lighten(c: Color32, amount: f32) -> Color32 {
    let r = (c.r() as f32 + (255.0 - c.r() as f32) * amount) as u8;
    let g = (c.g() as f32 + (255.0 - c.g() as f32) * amount) as u8;
    let b = (c.b() as f32 + (255.0 - c.b() as f32) * amount) as u8;
    Color32::from_rgb(r, g, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_toggle() {
        assert_eq!(ThemeMode::Light.toggled(), ThemeMode::Dark);
        assert_eq!(ThemeMode::Dark.toggled(), ThemeMode::Light);
        assert!(palette(ThemeMode::Dark).text_primary != palette(ThemeMode::Light).text_primary);
    }

    #[test]
    fn test_theme_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&ThemeMode::Dark).unwrap(), "\"dark\"");
        let mode: ThemeMode = serde_json::from_str("\"light\"").unwrap();
        assert_eq!(mode, ThemeMode::Light);
    }
}
