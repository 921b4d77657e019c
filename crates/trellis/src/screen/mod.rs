//! The screen: root of a widget tree and its input state machine.
//!
//! A [`Screen`] owns everything shown in one native window: the widget arena,
//! the theme, the drawing context and the dispatch state (pointer position,
//! held buttons, keyboard and hover focus paths, the drag in progress).
//!
//! # Input
//!
//! Every entry point returns a [`DispatchResult`]:
//!
//! - pointer motion goes to the drag widget while a drag is active, and
//!   otherwise updates the hover path and travels through the tree;
//! - presses and releases travel through the tree after the screen has
//!   settled double clicks, the drag widget and modal gating;
//! - keys and characters go to the focus path, deepest widget first.
//!
//! Handlers queue requests that touch other widgets (focus, visibility,
//! messages); the screen applies them once the handler chain has returned.
//!
//! # Example
//!
//! ```ignore
//! use trellis::prelude::*;
//!
//! let mut screen = Screen::new(ScreenConfig::new("Demo"), Box::new(RecordingContext::new()))?;
//! let window = screen.add_window(WindowState::new("Tools"))?;
//! screen.tree_mut().set_layout(window, BoxLayout::vertical().with_margin(15))?;
//! screen.tree_mut().add_child(window, Label::new("Volume"))?;
//! screen.tree_mut().add_child(window, Slider::new())?;
//! screen.perform_layout();
//! screen.center_window(window)?;
//!
//! screen.handle_input(InputEvent::CursorMoved { x: 300.0, y: 200.0 });
//! screen.draw_all();
//! ```

mod frame;

use std::path::PathBuf;

use trellis_core::logging::targets;
use trellis_core::{
    Result, SharedClock, Signal, SystemClock, TreeError, TreeResult, TrellisError, WidgetId,
};

use crate::geometry::{Color, Point, Rect, Size, Vector2};
use crate::render::DrawContext;
use crate::theme::Theme;
use crate::widget::widgets::PopupOwner;
use crate::widget::{
    CharEvent, Command, CrossingEvent, CursorShape, CursorSink, DispatchResult, Dispatcher,
    EventResult, KeyEvent, LayoutContext, Modifiers, MouseButton, MouseButtonEvent, MouseButtons,
    MouseMotionEvent, NodeRole, Panel, ScrollEvent, Widget, WidgetEvent, WidgetTree, diff_paths,
    focus_chain, hover_chain,
};
use crate::window::popup::{popup_below, popups};
use crate::window::{InputEvent, PopupState, ScreenConfig, WindowState};

/// Upper bound on command flush rounds per entry point. Handlers reacting to
/// messages with more messages would otherwise never settle.
const MAX_COMMAND_ROUNDS: usize = 256;

/// Whether a widget currently owns the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DragState {
    Idle,
    Dragging(WidgetId),
}

/// One native window's worth of widgets and the state that routes input to
/// them.
///
/// # Signals
///
/// - `resized`: Emitted with the new logical size after a framebuffer resize
/// - `files_dropped`: Emitted with the paths of files dropped on the window
pub struct Screen {
    tree: WidgetTree,
    draw: Box<dyn DrawContext>,
    theme: Theme,
    clock: SharedClock,
    cursor_sink: Option<Box<dyn CursorSink>>,
    commands: Vec<Command>,

    caption: String,
    background: Color,
    size: Size,
    fb_size: Size,
    pixel_ratio: f32,
    visible: bool,
    process_events: bool,
    double_click_interval: f64,
    tooltip_delay: f64,

    mouse_pos: Point,
    buttons: MouseButtons,
    modifiers: Modifiers,
    last_interaction: f64,
    last_mouse_down: Option<f64>,
    drag: DragState,
    focus_path: Vec<WidgetId>,
    mouse_focus_path: Vec<WidgetId>,
    cursor: CursorShape,
    fps: f32,

    /// Signal emitted after a resize.
    pub resized: Signal<Size>,
    /// Signal emitted when files are dropped on the window.
    pub files_dropped: Signal<Vec<PathBuf>>,
}

impl std::fmt::Debug for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Screen")
            .field("caption", &self.caption)
            .field("size", &self.size)
            .field("pixel_ratio", &self.pixel_ratio)
            .field("widgets", &self.tree.widget_count())
            .field("drag", &self.drag)
            .field("focus_path", &self.focus_path)
            .finish_non_exhaustive()
    }
}

impl Screen {
    /// Create a screen drawing into `draw`, timed by the system clock.
    pub fn new(config: ScreenConfig, draw: Box<dyn DrawContext>) -> Result<Self> {
        Self::with_clock(config, draw, SystemClock::shared())
    }

    /// Create a screen with an explicit time source.
    pub fn with_clock(
        config: ScreenConfig,
        draw: Box<dyn DrawContext>,
        clock: SharedClock,
    ) -> Result<Self> {
        config.validate()?;
        if !draw.is_ready() {
            return Err(TrellisError::ContextCreation(
                "drawing context reported itself unavailable".into(),
            ));
        }

        let size = config.size();
        let pixel_ratio = config.pixel_ratio();
        let fb_size = Size::new(
            (size.width as f32 * pixel_ratio) as i32,
            (size.height as f32 * pixel_ratio) as i32,
        );

        let mut tree = WidgetTree::new();
        let root = tree.root();
        if let Some(base) = tree.base_mut(root) {
            base.set_size(size);
            base.set_name("screen");
        }

        let now = clock.now();
        tracing::info!(
            target: targets::SCREEN,
            caption = config.caption(),
            width = size.width,
            height = size.height,
            pixel_ratio,
            "screen created"
        );

        Ok(Self {
            tree,
            draw,
            theme: Theme::default(),
            clock,
            cursor_sink: None,
            commands: Vec::new(),
            caption: config.caption().to_owned(),
            background: config.background(),
            size,
            fb_size,
            pixel_ratio,
            visible: true,
            process_events: true,
            double_click_interval: config.double_click_interval(),
            tooltip_delay: config.tooltip_delay(),
            mouse_pos: Point::ZERO,
            buttons: MouseButtons::empty(),
            modifiers: Modifiers::empty(),
            last_interaction: now,
            last_mouse_down: None,
            drag: DragState::Idle,
            focus_path: Vec::new(),
            mouse_focus_path: Vec::new(),
            cursor: CursorShape::Arrow,
            fps: 0.0,
            resized: Signal::new(),
            files_dropped: Signal::new(),
        })
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn tree(&self) -> &WidgetTree {
        &self.tree
    }

    /// Mutable access to the tree for building content. Removal goes through
    /// the screen so that focus and drag state stay consistent.
    pub fn tree_mut(&mut self) -> &mut WidgetTree {
        &mut self.tree
    }

    /// The screen widget at the root of the tree.
    pub fn root(&self) -> WidgetId {
        self.tree.root()
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn theme_mut(&mut self) -> &mut Theme {
        &mut self.theme
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    pub fn caption(&self) -> &str {
        &self.caption
    }

    pub fn set_caption(&mut self, caption: impl Into<String>) {
        self.caption = caption.into();
    }

    pub fn background(&self) -> Color {
        self.background
    }

    pub fn set_background(&mut self, background: Color) {
        self.background = background;
    }

    /// Logical size in pixels.
    pub fn size(&self) -> Size {
        self.size
    }

    /// Set the logical size; the framebuffer size follows from the pixel
    /// ratio.
    pub fn set_size(&mut self, size: Size) {
        self.size = size;
        self.fb_size = Size::new(
            (size.width as f32 * self.pixel_ratio) as i32,
            (size.height as f32 * self.pixel_ratio) as i32,
        );
        let root = self.tree.root();
        if let Some(base) = self.tree.base_mut(root) {
            base.set_size(size);
        }
    }

    /// Framebuffer size in physical pixels.
    pub fn framebuffer_size(&self) -> Size {
        self.fb_size
    }

    pub fn pixel_ratio(&self) -> f32 {
        self.pixel_ratio
    }

    /// Last pointer position in logical screen coordinates.
    pub fn mouse_pos(&self) -> Point {
        self.mouse_pos
    }

    /// Buttons currently held.
    pub fn mouse_state(&self) -> MouseButtons {
        self.buttons
    }

    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    /// The keyboard focus path, root-first, without the root.
    pub fn focus_path(&self) -> &[WidgetId] {
        &self.focus_path
    }

    /// The deepest widget on the focus path.
    pub fn focused_widget(&self) -> Option<WidgetId> {
        self.focus_path.last().copied()
    }

    /// The hover path, root-first, root included.
    pub fn mouse_focus_path(&self) -> &[WidgetId] {
        &self.mouse_focus_path
    }

    /// The widget owning the current drag, if any.
    pub fn drag_widget(&self) -> Option<WidgetId> {
        match self.drag {
            DragState::Dragging(widget) => Some(widget),
            DragState::Idle => None,
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.drag != DragState::Idle
    }

    /// The cursor shape last pushed to the cursor sink.
    pub fn cursor(&self) -> CursorShape {
        self.cursor
    }

    /// Receive cursor shape changes, usually the native window.
    pub fn set_cursor_sink(&mut self, sink: Box<dyn CursorSink>) {
        self.cursor_sink = Some(sink);
    }

    /// Smoothed frames-per-second estimate from [`draw_all`](Self::draw_all).
    pub fn fps(&self) -> f32 {
        self.fps
    }

    /// Timestamp of the last input the screen saw.
    pub fn last_interaction(&self) -> f64 {
        self.last_interaction
    }

    pub fn double_click_interval(&self) -> f64 {
        self.double_click_interval
    }

    pub fn tooltip_delay(&self) -> f64 {
        self.tooltip_delay
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Hidden screens skip drawing.
    pub fn set_visible(&mut self, visible: bool) {
        if self.visible != visible {
            tracing::debug!(target: targets::SCREEN, visible, "screen visibility changed");
        }
        self.visible = visible;
    }

    pub fn process_events(&self) -> bool {
        self.process_events
    }

    /// Pause or resume input processing. A paused screen ignores all input.
    pub fn set_process_events(&mut self, process_events: bool) {
        self.process_events = process_events;
    }

    /// The drawing context.
    pub fn draw_context(&mut self) -> &mut dyn DrawContext {
        self.draw.as_mut()
    }

    // =========================================================================
    // Windows and popups
    // =========================================================================

    /// Add a top-level window showing a plain panel.
    pub fn add_window(&mut self, state: WindowState) -> TreeResult<WidgetId> {
        self.add_window_with(Panel, state)
    }

    /// Add a top-level window whose contents are `widget`.
    pub fn add_window_with(
        &mut self,
        widget: impl Widget,
        state: WindowState,
    ) -> TreeResult<WidgetId> {
        let root = self.tree.root();
        let title = state.title.clone();
        let window = self
            .tree
            .insert(root, Box::new(widget), NodeRole::Window(state))?;
        if let Some(base) = self.tree.base_mut(window) {
            base.set_draggable(true);
        }
        tracing::debug!(target: targets::TREE, ?window, title = %title, "window added");
        Ok(window)
    }

    /// Add a popup anchored to `parent_window`, which may itself be a popup.
    ///
    /// The popup starts visible at anchor (0, 0); set its anchor through
    /// [`WidgetTree::popup_state_mut`].
    pub fn add_popup(&mut self, parent_window: WidgetId) -> TreeResult<WidgetId> {
        self.require_window(parent_window)?;
        let root = self.tree.root();
        let popup = self.tree.insert(
            root,
            Box::new(Panel),
            NodeRole::Popup(PopupState::new(parent_window)),
        )?;
        tracing::debug!(target: targets::POPUP, ?popup, ?parent_window, "popup added");
        Ok(popup)
    }

    /// Add a widget that owns a popup (a [`PopupButton`] or [`ComboBox`])
    /// under `parent`, creating its hidden popup next to the enclosing
    /// window.
    ///
    /// [`PopupButton`]: crate::widget::widgets::PopupButton
    /// [`ComboBox`]: crate::widget::widgets::ComboBox
    pub fn add_popup_owner<W: PopupOwner>(
        &mut self,
        parent: WidgetId,
        widget: W,
    ) -> TreeResult<WidgetId> {
        if !self.tree.contains_widget(parent) {
            return Err(TreeError::InvalidWidget(parent));
        }
        let window = self
            .tree
            .window_of(parent)
            .ok_or(TreeError::NotAWindow(parent))?;

        let owner = self.tree.add_child(parent, widget)?;
        let mut state = PopupState::new(window);
        state.button = Some(owner);
        if let Some(owner_widget) = self.tree.downcast_ref::<W>(owner) {
            owner_widget.configure_popup(&mut state);
        }

        let root = self.tree.root();
        let popup = self
            .tree
            .insert(root, Box::new(Panel), NodeRole::Popup(state))?;
        if let Some(base) = self.tree.base_mut(popup) {
            base.set_visible(false);
        }
        if let Some(owner_widget) = self.tree.downcast_mut::<W>(owner) {
            owner_widget.attach_popup(popup);
        }
        W::populate_popup(&mut self.tree, owner, popup)?;

        tracing::debug!(target: targets::POPUP, ?owner, ?popup, ?window, "popup owner added");
        Ok(owner)
    }

    /// Recreate the children of the popup owned by `owner`, e.g. after a
    /// combo box's items changed, and resize the popup to fit them.
    pub fn rebuild_popup<W: PopupOwner>(&mut self, owner: WidgetId) -> TreeResult<()> {
        if !self.tree.contains_widget(owner) {
            return Err(TreeError::InvalidWidget(owner));
        }
        let popup = popups(&self.tree)
            .into_iter()
            .find(|&p| {
                self.tree
                    .popup_state(p)
                    .is_some_and(|state| state.button() == Some(owner))
            })
            .ok_or(TreeError::NotAWindow(owner))?;

        for child in self.tree.children(popup).to_vec() {
            self.destroy_widget(child)?;
        }
        W::populate_popup(&mut self.tree, owner, popup)?;

        let preferred = self.preferred_size(popup);
        if let Some(base) = self.tree.base_mut(popup) {
            let size = base.fixed_size().or(preferred);
            base.set_size(size);
        }
        self.perform_layout_of(popup);
        tracing::debug!(target: targets::POPUP, ?owner, ?popup, "popup rebuilt");
        Ok(())
    }

    /// Centre a window on the screen, sizing and laying it out first if it
    /// has no size yet.
    pub fn center_window(&mut self, window: WidgetId) -> TreeResult<()> {
        self.require_window(window)?;
        if self.tree.try_base(window)?.size() == Size::ZERO {
            let preferred = self.preferred_size(window);
            self.tree.try_base_mut(window)?.set_size(preferred);
            self.perform_layout_of(window);
        }
        let base = self.tree.try_base_mut(window)?;
        let pos = ((self.size - base.size()) / 2).to_point();
        base.set_pos(pos);
        Ok(())
    }

    /// Raise `window` above its siblings, then every popup anchored to it
    /// (and, recursively, popups anchored to those) above it.
    pub fn move_window_to_front(&mut self, window: WidgetId) -> TreeResult<()> {
        if !self.tree.contains_widget(window) {
            return Err(TreeError::InvalidWidget(window));
        }
        self.raise_with_popups(window, 0)
    }

    fn raise_with_popups(&mut self, window: WidgetId, depth: usize) -> TreeResult<()> {
        self.tree.raise(window)?;
        if depth > self.tree.widget_count() {
            tracing::warn!(target: targets::POPUP, ?window, "popup chain too deep, stopping");
            return Ok(());
        }
        while let Some(popup) = popup_below(&self.tree, window) {
            self.raise_with_popups(popup, depth + 1)?;
        }
        Ok(())
    }

    /// Destroy a window or popup and everything in it.
    pub fn dispose_window(&mut self, window: WidgetId) -> TreeResult<()> {
        self.require_window(window)?;
        self.destroy_widget(window)
    }

    // =========================================================================
    // Tree removal
    // =========================================================================

    /// Destroy the child at `index` of `parent`.
    pub fn remove_child(&mut self, parent: WidgetId, index: usize) -> TreeResult<()> {
        let child = self.tree.child_at(parent, index)?;
        self.destroy_widget(child)
    }

    /// Destroy `child`, which must be a child of `parent`.
    pub fn remove_child_widget(&mut self, parent: WidgetId, child: WidgetId) -> TreeResult<()> {
        if !self.tree.contains_widget(parent) {
            return Err(TreeError::InvalidWidget(parent));
        }
        if self.tree.parent(child) != Some(parent) {
            return Err(TreeError::InvalidWidget(child));
        }
        self.destroy_widget(child)
    }

    /// Destroy a widget and its subtree.
    ///
    /// If the subtree holds part of the focus path, the whole path loses
    /// focus. The hover path is cut where it enters the subtree and a drag
    /// owned by the subtree is cancelled. All of this happens before any
    /// node is removed.
    pub fn destroy_widget(&mut self, id: WidgetId) -> TreeResult<()> {
        if id == self.tree.root() {
            return Err(TreeError::CannotReparentRoot);
        }
        if !self.tree.contains_widget(id) {
            return Err(TreeError::InvalidWidget(id));
        }

        let subtree = self.subtree(id);
        let mut faulted = false;
        if self.focus_path.iter().any(|w| subtree.contains(w)) {
            faulted = self.apply_focus(None);
        }
        if let Some(index) = self.mouse_focus_path.iter().position(|w| subtree.contains(w)) {
            self.mouse_focus_path.truncate(index);
        }
        if let DragState::Dragging(widget) = self.drag
            && subtree.contains(&widget)
        {
            self.drag = DragState::Idle;
        }

        let removed = self.tree.destroy(id)?;
        tracing::debug!(target: targets::TREE, ?id, count = removed.len(), "widget destroyed");
        if self.flush_commands() || faulted {
            tracing::debug!(target: targets::FOCUS, ?id, "focus handlers faulted during destroy");
        }
        Ok(())
    }

    fn subtree(&self, id: WidgetId) -> Vec<WidgetId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            out.push(current);
            stack.extend(self.tree.children(current).iter().copied());
        }
        out
    }

    fn require_window(&self, id: WidgetId) -> TreeResult<()> {
        match self.tree.role(id) {
            None => Err(TreeError::InvalidWidget(id)),
            Some(role) if role.is_window() => Ok(()),
            Some(_) => Err(TreeError::NotAWindow(id)),
        }
    }

    // =========================================================================
    // Layout
    // =========================================================================

    /// Size every window and popup and lay out their contents.
    pub fn perform_layout(&mut self) {
        let root = self.tree.root();
        self.perform_layout_of(root);
    }

    /// Lay out the children of one widget, recursively.
    pub fn perform_layout_of(&mut self, id: WidgetId) {
        let mut ctx = LayoutContext::new(self.draw.as_mut(), &self.theme);
        self.tree.perform_layout(id, &mut ctx);
    }

    /// The size `id` would like.
    pub fn preferred_size(&mut self, id: WidgetId) -> Size {
        let mut ctx = LayoutContext::new(self.draw.as_mut(), &self.theme);
        self.tree.preferred_size(id, &mut ctx)
    }

    // =========================================================================
    // Focus
    // =========================================================================

    /// Move keyboard focus to `widget` (or clear it).
    ///
    /// Widgets leaving the focus path get `FocusOut`, widgets joining it get
    /// `FocusIn`, ancestors first. Applying the current target again sends
    /// nothing. The window containing the new target is raised unless it is a
    /// background window.
    pub fn update_focus(&mut self, widget: Option<WidgetId>) {
        let faulted = self.apply_focus(widget);
        let faulted = self.flush_commands() || faulted;
        if faulted {
            tracing::debug!(target: targets::FOCUS, "focus handlers reported faults");
        }
    }

    /// Recompute the hover path for a screen point, sending `Leave` and
    /// `Enter`.
    pub fn update_mouse_focus(&mut self, p: Point) {
        let faulted = self.apply_mouse_focus(p);
        let faulted = self.flush_commands() || faulted;
        if faulted {
            tracing::debug!(target: targets::FOCUS, "crossing handlers reported faults");
        }
    }

    /// Returns whether any handler faulted.
    fn apply_focus(&mut self, widget: Option<WidgetId>) -> bool {
        let widget = widget.filter(|&w| self.tree.contains_widget(w));
        let new_path = focus_chain(&self.tree, widget);
        let change = diff_paths(&self.focus_path, &new_path);
        self.focus_path = new_path;

        let mut faulted = false;
        if !change.is_empty() {
            tracing::debug!(
                target: targets::FOCUS,
                ?widget,
                lost = change.lost.len(),
                gained = change.gained.len(),
                "focus path changed"
            );
            for &id in &change.lost {
                if let Some(base) = self.tree.base_mut(id) {
                    base.set_focused(false);
                }
            }
            for &id in &change.gained {
                if let Some(base) = self.tree.base_mut(id) {
                    base.set_focused(true);
                }
            }

            let mut dispatcher = Dispatcher::new(&mut self.tree, &self.theme, &mut self.commands);
            for &id in &change.lost {
                faulted |= dispatcher.deliver(id, &WidgetEvent::FocusOut).is_err();
            }
            for &id in &change.gained {
                faulted |= dispatcher.deliver(id, &WidgetEvent::FocusIn).is_err();
            }
        }

        if let Some(window) = widget.and_then(|w| self.tree.window_of(w))
            && !self.is_background_window(window)
            && let Err(err) = self.move_window_to_front(window)
        {
            tracing::debug!(target: targets::FOCUS, ?window, %err, "could not raise window");
        }
        faulted
    }

    fn apply_mouse_focus(&mut self, p: Point) -> bool {
        let target = self.tree.find_widget(p);
        let new_path = hover_chain(&self.tree, target);
        let change = diff_paths(&self.mouse_focus_path, &new_path);
        self.mouse_focus_path = new_path;
        if change.is_empty() {
            return false;
        }

        tracing::trace!(target: targets::FOCUS, ?target, "hover path changed");
        for &id in &change.lost {
            if let Some(base) = self.tree.base_mut(id) {
                base.set_mouse_focus(false);
            }
        }
        for &id in &change.gained {
            if let Some(base) = self.tree.base_mut(id) {
                base.set_mouse_focus(true);
            }
        }

        let origins: Vec<(WidgetId, Point)> = change
            .lost
            .iter()
            .chain(&change.gained)
            .map(|&id| (id, self.tree.absolute_position(id)))
            .collect();
        let origin_of = |id: WidgetId| {
            origins
                .iter()
                .find(|(w, _)| *w == id)
                .map(|(_, origin)| *origin)
                .unwrap_or_default()
        };

        let mut faulted = false;
        let mut dispatcher = Dispatcher::new(&mut self.tree, &self.theme, &mut self.commands);
        for &id in &change.lost {
            let event = WidgetEvent::Leave(CrossingEvent {
                local_pos: p - origin_of(id),
            });
            faulted |= dispatcher.deliver(id, &event).is_err();
        }
        for &id in &change.gained {
            let event = WidgetEvent::Enter(CrossingEvent {
                local_pos: p - origin_of(id),
            });
            faulted |= dispatcher.deliver(id, &event).is_err();
        }
        faulted
    }

    fn is_background_window(&self, id: WidgetId) -> bool {
        match self.tree.role(id) {
            Some(NodeRole::Window(state)) => state.background,
            Some(NodeRole::Popup(state)) => state.window().background,
            _ => false,
        }
    }

    fn is_modal_window(&self, id: WidgetId) -> bool {
        match self.tree.role(id) {
            Some(NodeRole::Window(state)) => state.modal,
            Some(NodeRole::Popup(state)) => state.window().modal,
            _ => false,
        }
    }

    /// A modal window on the focus path swallows pointer input outside it.
    fn blocked_by_modal(&self) -> bool {
        let Some(&window) = self.focus_path.first() else {
            return false;
        };
        if !self.is_modal_window(window) {
            return false;
        }
        let Some(base) = self.tree.base(window) else {
            return false;
        };
        let rect = Rect::new(self.tree.absolute_position(window), base.size());
        if rect.contains(self.mouse_pos) {
            return false;
        }
        tracing::debug!(target: targets::SCREEN, ?window, "input outside modal window blocked");
        true
    }

    // =========================================================================
    // Input entry points
    // =========================================================================

    /// Feed one normalized input event.
    pub fn handle_input(&mut self, event: InputEvent) -> DispatchResult {
        match event {
            InputEvent::CursorMoved { x, y } => self.cursor_pos_event(x, y),
            InputEvent::MouseButton {
                button,
                pressed,
                modifiers,
            } => self.mouse_button_event(button, pressed, modifiers),
            InputEvent::Scroll { delta } => self.scroll_event(delta),
            InputEvent::Key(event) => self.key_event(event),
            InputEvent::Char(codepoint) => self.char_event(codepoint),
            InputEvent::FramebufferResized { width, height } => self.resize_event(width, height),
            InputEvent::ScaleFactorChanged(ratio) => self.scale_factor_event(ratio),
            InputEvent::FilesDropped(paths) => self.drop_event(paths),
        }
    }

    /// The pointer moved to physical position (`x`, `y`).
    pub fn cursor_pos_event(&mut self, x: f64, y: f64) -> DispatchResult {
        if !self.process_events {
            return DispatchResult::Ignored;
        }
        let ratio = f64::from(self.pixel_ratio);
        let p = Point::new((x / ratio) as i32, (y / ratio) as i32);
        self.last_interaction = self.clock.now();

        let result = match self.drag {
            DragState::Idle => {
                let hovered = self.tree.find_widget(p);
                self.refresh_cursor(hovered);
                Ok(false)
            }
            DragState::Dragging(widget) => {
                let delta = p - self.mouse_pos;
                let (buttons, modifiers, size) = (self.buttons, self.modifiers, self.size);
                Dispatcher::new(&mut self.tree, &self.theme, &mut self.commands)
                    .deliver_drag(widget, p, delta, buttons, modifiers, size)
            }
        };

        let mut faulted = false;
        let result = match result {
            Ok(false) => {
                faulted = self.apply_mouse_focus(p);
                let motion = MouseMotionEvent {
                    local_pos: p,
                    screen_pos: p,
                    delta: p - self.mouse_pos,
                    buttons: self.buttons,
                    modifiers: self.modifiers,
                };
                let root = self.tree.root();
                Dispatcher::new(&mut self.tree, &self.theme, &mut self.commands)
                    .deliver_motion(root, p, &motion)
            }
            other => other,
        };

        self.mouse_pos = p;
        self.finish(result, faulted)
    }

    /// A mouse button was pressed or released at the current pointer
    /// position.
    pub fn mouse_button_event(
        &mut self,
        button: MouseButton,
        pressed: bool,
        modifiers: Modifiers,
    ) -> DispatchResult {
        if !self.process_events {
            return DispatchResult::Ignored;
        }
        let now = self.clock.now();
        self.modifiers = modifiers;
        self.last_interaction = now;

        if self.blocked_by_modal() {
            return DispatchResult::Blocked;
        }

        if pressed {
            self.buttons.insert(button.mask());
        } else {
            self.buttons.remove(button.mask());
        }

        let mut modifiers = modifiers;
        let mut double_click = false;
        if button == MouseButton::Left && pressed {
            if let Some(previous) = self.last_mouse_down
                && now - previous > self.double_click_interval
            {
                self.last_mouse_down = None;
            }
            match self.last_mouse_down {
                Some(previous) if now - previous < self.double_click_interval => {
                    double_click = true;
                    modifiers |= Modifiers::DOUBLE_CLICK;
                    self.last_mouse_down = None;
                }
                _ => self.last_mouse_down = Some(now),
            }
        }

        let mouse = self.mouse_pos;
        let drop_target = self.draggable_at(mouse);
        let mut result: EventResult = Ok(false);
        if let DragState::Dragging(widget) = self.drag
            && !pressed
            && drop_target != Some(widget)
        {
            let local = mouse - self.tree.absolute_position(widget);
            let release = MouseButtonEvent {
                local_pos: local,
                screen_pos: mouse,
                button,
                pressed: false,
                modifiers,
            };
            result = Dispatcher::new(&mut self.tree, &self.theme, &mut self.commands)
                .deliver_button(widget, local, &release);
        }

        self.refresh_cursor(drop_target);

        let mut faulted = false;
        if !double_click && pressed && button.starts_drag() {
            match self.draggable_at(mouse) {
                Some(widget) => self.drag = DragState::Dragging(widget),
                None => {
                    self.drag = DragState::Idle;
                    faulted = self.apply_focus(None);
                }
            }
        } else {
            self.drag = DragState::Idle;
        }

        tracing::trace!(
            target: targets::SCREEN,
            ?button,
            pressed,
            double_click,
            x = mouse.x,
            y = mouse.y,
            "mouse button"
        );

        let event = MouseButtonEvent {
            local_pos: mouse,
            screen_pos: mouse,
            button,
            pressed,
            modifiers,
        };
        let root = self.tree.root();
        let delivered = Dispatcher::new(&mut self.tree, &self.theme, &mut self.commands)
            .deliver_button(root, mouse, &event);
        self.finish(result.and(delivered), faulted)
    }

    /// Scroll at the current pointer position. `delta` is in lines.
    pub fn scroll_event(&mut self, delta: Vector2) -> DispatchResult {
        if !self.process_events {
            return DispatchResult::Ignored;
        }
        self.last_interaction = self.clock.now();
        if self.blocked_by_modal() {
            return DispatchResult::Blocked;
        }

        let mouse = self.mouse_pos;
        let event = ScrollEvent {
            local_pos: mouse,
            screen_pos: mouse,
            delta,
        };
        let root = self.tree.root();
        let result = Dispatcher::new(&mut self.tree, &self.theme, &mut self.commands)
            .deliver_scroll(root, mouse, &event);
        self.finish(result, false)
    }

    /// A key changed state.
    pub fn key_event(&mut self, event: KeyEvent) -> DispatchResult {
        if !self.process_events {
            return DispatchResult::Ignored;
        }
        self.last_interaction = self.clock.now();
        self.deliver_to_focus_path(&WidgetEvent::Key(event))
    }

    /// A character was typed.
    pub fn char_event(&mut self, codepoint: char) -> DispatchResult {
        if !self.process_events {
            return DispatchResult::Ignored;
        }
        self.last_interaction = self.clock.now();
        self.deliver_to_focus_path(&WidgetEvent::Char(CharEvent { codepoint }))
    }

    /// The framebuffer was resized to `width` x `height` physical pixels.
    ///
    /// An empty framebuffer (a minimized window) or one that is empty once
    /// scaled is ignored.
    pub fn resize_event(&mut self, width: i32, height: i32) -> DispatchResult {
        if !self.process_events {
            return DispatchResult::Ignored;
        }
        let fb_size = Size::new(width, height);
        let size = Size::new(
            (width as f32 / self.pixel_ratio) as i32,
            (height as f32 / self.pixel_ratio) as i32,
        );
        if fb_size.is_empty() || size.is_empty() {
            tracing::debug!(target: targets::SCREEN, width, height, "ignoring empty resize");
            return DispatchResult::Ignored;
        }

        self.fb_size = fb_size;
        self.size = size;
        let root = self.tree.root();
        if let Some(base) = self.tree.base_mut(root) {
            base.set_size(size);
        }
        self.last_interaction = self.clock.now();
        tracing::debug!(
            target: targets::SCREEN,
            width = size.width,
            height = size.height,
            "screen resized"
        );
        self.resized.emit(size);
        DispatchResult::Accepted
    }

    /// The display scale changed. The logical size is recomputed from the
    /// framebuffer.
    pub fn scale_factor_event(&mut self, pixel_ratio: f32) -> DispatchResult {
        if !self.process_events {
            return DispatchResult::Ignored;
        }
        if !(pixel_ratio.is_finite() && pixel_ratio > 0.0) {
            tracing::debug!(target: targets::SCREEN, pixel_ratio, "ignoring invalid pixel ratio");
            return DispatchResult::Ignored;
        }
        self.pixel_ratio = pixel_ratio;
        let size = Size::new(
            (self.fb_size.width as f32 / pixel_ratio) as i32,
            (self.fb_size.height as f32 / pixel_ratio) as i32,
        );
        if !size.is_empty() {
            self.size = size;
            let root = self.tree.root();
            if let Some(base) = self.tree.base_mut(root) {
                base.set_size(size);
            }
        }
        self.last_interaction = self.clock.now();
        DispatchResult::Accepted
    }

    /// Files were dropped on the window. Accepted if anything listens to
    /// `files_dropped`.
    pub fn drop_event(&mut self, paths: Vec<PathBuf>) -> DispatchResult {
        if !self.process_events {
            return DispatchResult::Ignored;
        }
        self.last_interaction = self.clock.now();
        tracing::debug!(target: targets::SCREEN, count = paths.len(), "files dropped");
        let listening = self.files_dropped.connection_count() > 0;
        self.files_dropped.emit(paths);
        if listening {
            DispatchResult::Accepted
        } else {
            DispatchResult::Ignored
        }
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// Deliver to the focused entries of the focus path below the top-level
    /// window, deepest first, until one consumes the event.
    fn deliver_to_focus_path(&mut self, event: &WidgetEvent) -> DispatchResult {
        let targets: Vec<WidgetId> = self
            .focus_path
            .iter()
            .skip(1)
            .rev()
            .copied()
            .filter(|&id| self.tree.base(id).is_some_and(|base| base.is_focused()))
            .collect();

        let mut result: EventResult = Ok(false);
        let mut dispatcher = Dispatcher::new(&mut self.tree, &self.theme, &mut self.commands);
        for id in targets {
            result = dispatcher.deliver(id, event);
            if !matches!(result, Ok(false)) {
                break;
            }
        }
        self.finish(result, false)
    }

    /// The deepest draggable widget under `p`, never the screen itself.
    fn draggable_at(&self, p: Point) -> Option<WidgetId> {
        let root = self.tree.root();
        self.tree
            .find_widget_where(p, |base| base.is_draggable())
            .filter(|&id| id != root)
    }

    fn refresh_cursor(&mut self, widget: Option<WidgetId>) {
        let Some(shape) = widget
            .and_then(|w| self.tree.base(w))
            .map(|base| base.cursor())
        else {
            return;
        };
        if shape == self.cursor {
            return;
        }
        self.cursor = shape;
        if let Some(sink) = self.cursor_sink.as_mut() {
            sink.set_cursor(shape);
        }
    }

    /// Apply queued commands, then turn the handler result into a dispatch
    /// result. Any fault along the way makes the whole event faulted.
    fn finish(&mut self, result: EventResult, faulted: bool) -> DispatchResult {
        let faulted = self.flush_commands() || faulted;
        match DispatchResult::from_result(result) {
            _ if faulted => DispatchResult::Faulted,
            outcome => outcome,
        }
    }

    /// Returns whether any handler faulted.
    fn flush_commands(&mut self) -> bool {
        let mut faulted = false;
        let mut rounds = 0;
        while !self.commands.is_empty() {
            rounds += 1;
            if rounds > MAX_COMMAND_ROUNDS {
                tracing::warn!(
                    target: targets::SCREEN,
                    dropped = self.commands.len(),
                    "handlers keep queueing commands, dropping the rest"
                );
                self.commands.clear();
                break;
            }
            for command in std::mem::take(&mut self.commands) {
                faulted |= self.apply(command);
            }
        }
        faulted
    }

    fn apply(&mut self, command: Command) -> bool {
        match command {
            Command::RequestFocus(id) => {
                if self.tree.contains_widget(id) {
                    self.apply_focus(Some(id))
                } else {
                    tracing::trace!(target: targets::FOCUS, ?id, "focus request for stale widget");
                    false
                }
            }
            Command::SetVisible(id, visible) => {
                if let Some(base) = self.tree.base_mut(id) {
                    base.set_visible(visible);
                }
                false
            }
            Command::MoveToFront(id) => {
                if let Err(err) = self.move_window_to_front(id) {
                    tracing::debug!(target: targets::SCREEN, ?id, %err, "cannot raise widget");
                }
                false
            }
            Command::Notify(id, message) => {
                Dispatcher::new(&mut self.tree, &self.theme, &mut self.commands)
                    .deliver(id, &WidgetEvent::Message(message))
                    .is_err()
            }
        }
    }
}
