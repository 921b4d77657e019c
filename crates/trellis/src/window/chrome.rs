//! Window and popup chrome.
//!
//! Windows and popups are drawn by the screen rather than by their widget:
//! the node role decides the frame, the widget only paints the contents on
//! top. All functions draw in the node's local coordinates.

use crate::geometry::{Color, Rect, Size};
use crate::render::{DrawContext, Paint, TextAlign, Winding};
use crate::theme::Theme;

use super::popup::Side;
use super::WindowState;

/// Half the height of the arrow joining a popup to its button.
const ARROW_HALF_HEIGHT: f32 = 15.0;

/// Draw a window: body, drop shadow and, for titled windows, the header.
pub(crate) fn draw_window(
    draw: &mut dyn DrawContext,
    theme: &Theme,
    size: Size,
    state: &WindowState,
    focused: bool,
    hovered: bool,
) {
    let ds = theme.get_int_or("/window/shadow-size", 10) as f32;
    let cr = theme.get_int_or("/window/corner-radius", 2) as f32;
    let hh = theme.get_int_or("/window/header/height", 30) as f32;
    let (w, h) = (size.width as f32, size.height as f32);
    let transparent = theme.get_color_or("/transparent", Color::TRANSPARENT);
    let shadow = theme.get_color_or("/shadow", Color::gray8(0, 128));

    draw.save();

    draw.begin_path();
    draw.rounded_rect(0.0, 0.0, w, h, cr);
    let fill_key = if hovered {
        "/window/focused/fill"
    } else {
        "/window/unfocused/fill"
    };
    draw.fill_color(theme.get_color_or(fill_key, Color::gray8(43, 230)));
    draw.fill();

    draw.save();
    draw.reset_scissor();
    draw.begin_path();
    draw.rect(-ds, -ds + 2.0, w + 2.0 * ds, h + 2.0 * ds);
    draw.rounded_rect(0.0, 0.0, w, h, cr);
    draw.path_winding(Winding::Hole);
    draw.fill_paint(Paint::Box {
        x: 0.0,
        y: 2.0,
        width: w,
        height: h,
        radius: cr * 2.0,
        feather: ds * 2.0,
        inner: shadow,
        outer: transparent,
    });
    draw.fill();
    draw.restore();

    if !state.title.is_empty() {
        draw.begin_path();
        draw.rounded_rect(0.0, 0.0, w, hh, cr);
        draw.fill_paint(Paint::Linear {
            start: (0.0, 0.0),
            end: (0.0, hh),
            inner: theme.get_color_or("/window/header/grad-top", Color::gray8(74, 255)),
            outer: theme.get_color_or("/window/header/grad-bot", Color::gray8(58, 255)),
        });
        draw.fill();

        draw.begin_path();
        draw.rounded_rect(0.0, 0.0, w, hh, cr);
        draw.stroke_color(theme.get_color_or("/window/header/sep-top", Color::gray8(92, 255)));
        draw.save();
        draw.intersect_scissor(0.0, 0.0, w, 0.5);
        draw.stroke();
        draw.restore();

        draw.begin_path();
        draw.move_to(0.5, hh - 1.5);
        draw.line_to(w - 0.5, hh - 1.5);
        draw.stroke_color(theme.get_color_or("/window/header/sep-bot", Color::gray8(29, 255)));
        draw.stroke();

        draw.font_size(18.0);
        draw.font_face(theme.get_str_or("/font/bold", "sans-bold"));
        draw.text_align(TextAlign::CENTER_MIDDLE);
        draw.fill_color(shadow);
        draw.text(w / 2.0, hh / 2.0 + 1.0, &state.title);

        let title_key = if focused {
            "/window/focused/title"
        } else {
            "/window/unfocused/title"
        };
        draw.fill_color(theme.get_color_or(title_key, Color::gray8(220, 160)));
        draw.text(w / 2.0, hh / 2.0, &state.title);
    }

    draw.restore();
}

/// Draw a popup: drop shadow and body, with an arrow reaching to the owning
/// button when there is one. `button` is relative to the popup's origin.
pub(crate) fn draw_popup(
    draw: &mut dyn DrawContext,
    theme: &Theme,
    size: Size,
    side: Side,
    button: Option<Rect>,
) {
    let ds = theme.get_int_or("/window/shadow-size", 10) as f32;
    let cr = theme.get_int_or("/window/corner-radius", 2) as f32;
    let (w, h) = (size.width as f32, size.height as f32);

    draw.save();
    draw.reset_scissor();

    draw.begin_path();
    draw.rect(-ds, -ds, w + 2.0 * ds, h + 2.0 * ds);
    draw.rounded_rect(0.0, 0.0, w, h, cr);
    draw.path_winding(Winding::Hole);
    draw.fill_paint(Paint::Box {
        x: 0.0,
        y: 0.0,
        width: w,
        height: h,
        radius: cr * 2.0,
        feather: ds * 2.0,
        inner: theme.get_color_or("/shadow", Color::gray8(0, 128)),
        outer: theme.get_color_or("/transparent", Color::TRANSPARENT),
    });
    draw.fill();

    draw.begin_path();
    draw.rounded_rect(0.0, 0.0, w, h, cr);
    if let Some(button) = button {
        let mid = h * 0.5;
        let (tip_x, edge_x) = match side {
            Side::Right => ((button.origin.x + button.size.width) as f32, 0.0),
            Side::Left => (button.origin.x as f32, w),
        };
        let tip_y = button.origin.y as f32 + button.size.height as f32 * 0.5;
        draw.move_to(tip_x, tip_y);
        draw.line_to(edge_x, (mid + ARROW_HALF_HEIGHT).min(h));
        draw.line_to(edge_x, (mid - ARROW_HALF_HEIGHT).max(0.0));
    }
    draw.fill_color(theme.get_color_or("/popup/fill", Color::gray8(50, 255)));
    draw.fill();

    draw.restore();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{DrawCommand, RecordingContext};

    #[test]
    fn test_titled_window_draws_title() {
        let mut draw = RecordingContext::new();
        draw_window(
            &mut draw,
            &Theme::default(),
            Size::new(200, 100),
            &WindowState::new("Tools"),
            true,
            false,
        );
        assert_eq!(draw.texts(), vec!["Tools".to_string(), "Tools".to_string()]);
    }

    #[test]
    fn test_untitled_window_has_no_header() {
        let mut draw = RecordingContext::new();
        draw_window(
            &mut draw,
            &Theme::default(),
            Size::new(200, 100),
            &WindowState::default(),
            false,
            false,
        );
        assert!(draw.texts().is_empty());
    }

    #[test]
    fn test_popup_arrow_points_at_button() {
        let mut draw = RecordingContext::new();
        let commands = draw.commands();
        let button = Rect::from_xywh(-100, 20, 80, 20);
        draw_popup(&mut draw, &Theme::default(), Size::new(100, 60), Side::Right, Some(button));
        assert!(commands.lock().contains(&DrawCommand::MoveTo(-20.0, 30.0)));
        assert!(commands.lock().contains(&DrawCommand::LineTo(0.0, 45.0)));
    }
}
