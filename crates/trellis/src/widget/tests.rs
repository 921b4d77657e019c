//! Event ordering tests for widgets living in a screen.

use std::sync::Arc;

use parking_lot::Mutex;
use trellis_core::{ManualClock, WidgetError, WidgetId};

use super::*;
use crate::geometry::{Point, Size};
use crate::render::RecordingContext;
use crate::screen::Screen;
use crate::window::{ScreenConfig, WindowState};

type Log = Arc<Mutex<Vec<String>>>;

/// Records every event it sees as `"<name>:<event>"`.
struct Probe {
    name: &'static str,
    log: Log,
    consume_keys: bool,
    forward_press_to: Option<WidgetId>,
    fail_on_press: bool,
}

impl Probe {
    fn new(name: &'static str, log: &Log) -> Self {
        Self {
            name,
            log: log.clone(),
            consume_keys: false,
            forward_press_to: None,
            fail_on_press: false,
        }
    }

    fn consuming_keys(mut self) -> Self {
        self.consume_keys = true;
        self
    }
}

struct Ping(u32);

impl Widget for Probe {
    fn event(&mut self, ctx: &mut EventContext<'_>, event: &WidgetEvent) -> EventResult {
        let entry = match event {
            WidgetEvent::Enter(e) => format!("{}:enter@{},{}", self.name, e.local_pos.x, e.local_pos.y),
            WidgetEvent::Leave(_) => format!("{}:leave", self.name),
            WidgetEvent::Message(m) => match m.downcast_ref::<Ping>() {
                Some(Ping(n)) => format!("{}:ping{}", self.name, n),
                None => format!("{}:message", self.name),
            },
            other => format!("{}:{}", self.name, other.name()),
        };
        self.log.lock().push(entry);

        match event {
            WidgetEvent::Key(_) | WidgetEvent::Char(_) => Ok(self.consume_keys),
            WidgetEvent::MouseButton(e) if e.is_left_press() => {
                if self.fail_on_press {
                    return Err(WidgetError::fault("probe refused the press"));
                }
                if let Some(target) = self.forward_press_to {
                    ctx.notify(target, Ping(1));
                }
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

/// Passes every ping on to its peer.
struct Echo {
    peer: Option<WidgetId>,
    log: Log,
}

impl Widget for Echo {
    fn event(&mut self, ctx: &mut EventContext<'_>, event: &WidgetEvent) -> EventResult {
        if let WidgetEvent::Message(m) = event
            && let Some(Ping(n)) = m.downcast_ref::<Ping>()
        {
            self.log.lock().push("echo".into());
            if let Some(peer) = self.peer {
                ctx.notify(peer, Ping(n + 1));
            }
            return Ok(true);
        }
        Ok(false)
    }
}

fn screen() -> Screen {
    Screen::with_clock(
        ScreenConfig::new("test").with_size(400, 300),
        Box::new(RecordingContext::new()),
        Arc::new(ManualClock::new(10.0)),
    )
    .unwrap()
}

fn place(screen: &mut Screen, id: WidgetId, x: i32, y: i32, w: i32, h: i32) {
    let base = screen.tree_mut().base_mut(id).unwrap();
    base.set_pos(Point::new(x, y));
    base.set_size(Size::new(w, h));
}

/// A window at (10, 10) holding a panel at (20, 40) holding a probe at
/// (5, 5).
fn nested(screen: &mut Screen, log: &Log) -> (WidgetId, WidgetId, WidgetId) {
    let window = screen.add_window_with(Probe::new("window", log), WindowState::default()).unwrap();
    place(screen, window, 10, 10, 200, 200);
    let panel = screen.tree_mut().add_child(window, Probe::new("panel", log)).unwrap();
    place(screen, panel, 20, 40, 100, 100);
    let leaf = screen.tree_mut().add_child(panel, Probe::new("leaf", log)).unwrap();
    place(screen, leaf, 5, 5, 30, 30);
    (window, panel, leaf)
}

fn take(log: &Log) -> Vec<String> {
    std::mem::take(&mut *log.lock())
}

#[test]
fn test_focus_in_runs_root_first() {
    let log = Log::default();
    let mut screen = screen();
    let (window, panel, leaf) = nested(&mut screen, &log);

    screen.update_focus(Some(leaf));
    assert_eq!(take(&log), ["window:focus_in", "panel:focus_in", "leaf:focus_in"]);
    assert_eq!(screen.focus_path(), [window, panel, leaf]);
    assert!(screen.tree().base(panel).unwrap().is_focused());
}

#[test]
fn test_focus_change_notifies_only_the_difference() {
    let log = Log::default();
    let mut screen = screen();
    let (window, _, leaf) = nested(&mut screen, &log);
    let sibling = screen.tree_mut().add_child(window, Probe::new("sibling", &log)).unwrap();

    screen.update_focus(Some(leaf));
    take(&log);

    screen.update_focus(Some(sibling));
    assert_eq!(take(&log), ["leaf:focus_out", "panel:focus_out", "sibling:focus_in"]);
    assert!(!screen.tree().base(leaf).unwrap().is_focused());
    assert!(screen.tree().base(window).unwrap().is_focused());

    screen.update_focus(Some(sibling));
    assert!(take(&log).is_empty());

    screen.update_focus(None);
    assert_eq!(take(&log), ["sibling:focus_out", "window:focus_out"]);
    assert!(screen.focus_path().is_empty());
}

#[test]
fn test_crossing_events_carry_local_positions() {
    let log = Log::default();
    let mut screen = screen();
    let (_, _, leaf) = nested(&mut screen, &log);

    // leaf spans screen (35, 55)..(65, 85)
    screen.update_mouse_focus(Point::new(40, 60));
    assert_eq!(
        take(&log),
        ["window:enter@30,50", "panel:enter@10,10", "leaf:enter@5,5"]
    );
    assert_eq!(screen.mouse_focus_path().last(), Some(&leaf));

    screen.update_mouse_focus(Point::new(100, 60));
    assert_eq!(take(&log), ["leaf:leave"]);
    assert!(!screen.tree().base(leaf).unwrap().has_mouse_focus());
}

#[test]
fn test_keys_go_leaf_first_until_consumed() {
    let log = Log::default();
    let mut screen = screen();
    let window = screen.add_window_with(Probe::new("window", &log), WindowState::default()).unwrap();
    let panel = screen
        .tree_mut()
        .add_child(window, Probe::new("panel", &log).consuming_keys())
        .unwrap();
    let leaf = screen.tree_mut().add_child(panel, Probe::new("leaf", &log)).unwrap();
    screen.update_focus(Some(leaf));
    take(&log);

    let result = screen.char_event('x');
    assert_eq!(result, DispatchResult::Accepted);
    assert_eq!(take(&log), ["leaf:char", "panel:char"]);
}

#[test]
fn test_keys_skip_the_top_level_window() {
    let log = Log::default();
    let mut screen = screen();
    let window = screen
        .add_window_with(Probe::new("window", &log).consuming_keys(), WindowState::default())
        .unwrap();
    let leaf = screen.tree_mut().add_child(window, Probe::new("leaf", &log)).unwrap();
    screen.update_focus(Some(leaf));
    take(&log);

    assert_eq!(screen.char_event('x'), DispatchResult::Ignored);
    assert_eq!(take(&log), ["leaf:char"]);
}

#[test]
fn test_messages_are_delivered_after_the_handler() {
    let log = Log::default();
    let mut screen = screen();
    let (window, _, leaf) = nested(&mut screen, &log);
    screen
        .tree_mut()
        .downcast_mut::<Probe>(leaf)
        .unwrap()
        .forward_press_to = Some(window);

    screen.cursor_pos_event(40.0, 60.0);
    take(&log);
    let result = screen.mouse_button_event(MouseButton::Left, true, Modifiers::empty());
    assert_eq!(result, DispatchResult::Accepted);

    let entries = take(&log);
    let press = entries.iter().position(|e| e == "leaf:mouse_button").unwrap();
    let ping = entries.iter().position(|e| e == "window:ping1").unwrap();
    assert!(press < ping);
    assert_eq!(screen.focused_widget(), Some(leaf));
}

#[test]
fn test_failing_handler_faults_the_event() {
    let log = Log::default();
    let mut screen = screen();
    let (_, _, leaf) = nested(&mut screen, &log);
    screen.tree_mut().downcast_mut::<Probe>(leaf).unwrap().fail_on_press = true;

    screen.cursor_pos_event(40.0, 60.0);
    let result = screen.mouse_button_event(MouseButton::Left, true, Modifiers::empty());
    assert_eq!(result, DispatchResult::Faulted);

    // The screen keeps working afterwards.
    screen.tree_mut().downcast_mut::<Probe>(leaf).unwrap().fail_on_press = false;
    screen.mouse_button_event(MouseButton::Left, false, Modifiers::empty());
    let result = screen.mouse_button_event(MouseButton::Left, true, Modifiers::empty());
    assert_eq!(result, DispatchResult::Accepted);
}

#[test]
fn test_runaway_message_loop_is_cut_off() {
    let log = Log::default();
    let mut screen = screen();
    let window = screen.add_window(WindowState::default()).unwrap();
    place(&mut screen, window, 0, 0, 200, 200);
    let echo_log = Log::default();
    let a = screen
        .tree_mut()
        .add_child(window, Echo { peer: None, log: echo_log.clone() })
        .unwrap();
    let b = screen
        .tree_mut()
        .add_child(window, Echo { peer: Some(a), log: echo_log.clone() })
        .unwrap();
    screen.tree_mut().downcast_mut::<Echo>(a).unwrap().peer = Some(b);

    let mut probe = Probe::new("probe", &log);
    probe.forward_press_to = Some(a);
    let probe = screen.tree_mut().add_child(window, probe).unwrap();
    place(&mut screen, probe, 100, 0, 50, 50);

    screen.cursor_pos_event(110.0, 10.0);
    let result = screen.mouse_button_event(MouseButton::Left, true, Modifiers::empty());
    assert_eq!(result, DispatchResult::Accepted);

    let echoes = echo_log.lock().len();
    assert!(echoes > 100);
    assert!(echoes <= 300);
}

#[test]
fn test_destroying_part_of_the_focus_path_clears_it() {
    let log = Log::default();
    let mut screen = screen();
    let (window, panel, leaf) = nested(&mut screen, &log);
    screen.update_focus(Some(leaf));
    screen.update_mouse_focus(Point::new(40, 60));
    take(&log);

    screen.destroy_widget(panel).unwrap();
    assert!(screen.focus_path().is_empty());
    assert_eq!(screen.focused_widget(), None);
    assert!(!screen.tree().base(window).unwrap().is_focused());
    assert!(take(&log).contains(&"window:focus_out".to_string()));
    assert_eq!(screen.mouse_focus_path(), [screen.root(), window]);
    assert!(!screen.tree().contains_widget(leaf));

    // Nothing is delivered to the removed widgets.
    screen.char_event('x');
    assert!(take(&log).is_empty());
}

#[test]
fn test_destroying_the_focused_leaf_clears_focus() {
    let log = Log::default();
    let mut screen = screen();
    let window = screen.add_window_with(Probe::new("window", &log), WindowState::default()).unwrap();
    let leaf = screen.tree_mut().add_child(window, Probe::new("leaf", &log)).unwrap();
    screen.update_focus(Some(leaf));
    take(&log);

    screen.destroy_widget(leaf).unwrap();
    assert!(screen.focus_path().is_empty());
    assert!(!screen.tree().base(window).unwrap().is_focused());
    assert_eq!(take(&log), ["leaf:focus_out", "window:focus_out"]);
}

#[test]
fn test_destroying_an_unfocused_sibling_keeps_focus() {
    let log = Log::default();
    let mut screen = screen();
    let (window, panel, leaf) = nested(&mut screen, &log);
    let sibling = screen.tree_mut().add_child(window, Probe::new("sibling", &log)).unwrap();
    screen.update_focus(Some(leaf));
    take(&log);

    screen.destroy_widget(sibling).unwrap();
    assert_eq!(screen.focus_path(), [window, panel, leaf]);
    assert!(take(&log).is_empty());
}
