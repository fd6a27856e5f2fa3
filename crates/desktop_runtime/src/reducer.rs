//! Reducer actions, side-effect intents, and transition logic for the desktop runtime.

use crate::{
    interaction,
    model::{
        DesktopSnapshot, GestureState, PointerPosition, ResizeEdge, Theme, Viewport, WindowId,
        WindowRect,
    },
    reconcile::apply_viewport,
    window_manager::WindowManager,
};

#[derive(Debug, Clone, PartialEq)]
/// Actions accepted by [`reduce_desktop`].
pub enum DesktopAction {
    /// Open (or re-open) a window by id.
    OpenWindow {
        /// Window to open.
        window_id: WindowId,
    },
    /// Dock or palette activation: external catalog entries leave the shell, others open.
    ActivateApp {
        /// Catalog id that was activated.
        window_id: WindowId,
    },
    /// Open a link outside the shell.
    OpenExternalUrl {
        /// Link to open.
        url: String,
    },
    /// Close a window, keeping its geometry.
    CloseWindow {
        /// Window to close.
        window_id: WindowId,
    },
    /// Minimize a window.
    MinimizeWindow {
        /// Window to minimize.
        window_id: WindowId,
    },
    /// Focus (and raise) a window.
    FocusWindow {
        /// Window to focus.
        window_id: WindowId,
    },
    /// Maximize a normal window or restore a maximized one.
    ToggleMaximize {
        /// Window to toggle.
        window_id: WindowId,
    },
    /// Begin dragging a window by its title bar.
    BeginMove {
        /// Window being dragged.
        window_id: WindowId,
        /// Pointer position at drag start.
        pointer: PointerPosition,
    },
    /// Update an in-progress drag.
    UpdateMove {
        /// Current pointer position.
        pointer: PointerPosition,
    },
    /// Begin resizing a window from a handle.
    BeginResize {
        /// Window being resized.
        window_id: WindowId,
        /// Handle being dragged.
        edge: ResizeEdge,
        /// Pointer position at resize start.
        pointer: PointerPosition,
    },
    /// Update an in-progress resize.
    UpdateResize {
        /// Current pointer position.
        pointer: PointerPosition,
    },
    /// Pointer released: commit and reset the gesture.
    EndGesture {
        /// Final rendered rect of the gesture's window, when the host could measure it.
        rendered: Option<WindowRect>,
    },
    /// The host viewport changed size.
    ViewportResized {
        /// New viewport.
        viewport: Viewport,
    },
    /// Select the desktop theme.
    SetTheme {
        /// Theme to apply.
        theme: Theme,
    },
    /// Flip the command palette.
    ToggleCommandPalette,
    /// Open or close the command palette.
    SetCommandPaletteOpen {
        /// Desired visibility.
        open: bool,
    },
    /// Close the palette, then run the selected command.
    RunPaletteCommand(Box<DesktopAction>),
    /// Replace state with a persisted snapshot.
    HydrateSnapshot {
        /// Snapshot payload to restore.
        snapshot: DesktopSnapshot,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Side-effect intents emitted by [`reduce_desktop`] for the host to execute.
pub enum RuntimeEffect {
    /// Save the current desktop snapshot.
    PersistSnapshot,
    /// Open a url outside the shell.
    OpenExternalUrl(String),
    /// Move keyboard focus into the newly focused window.
    FocusWindowInput(WindowId),
}

/// Applies a [`DesktopAction`] and collects the resulting side effects.
///
/// Actions naming unknown windows are no-ops and produce no effects.
/// [`RuntimeEffect::PersistSnapshot`] is emitted only when the persisted snapshot changed; live
/// gesture updates are saved once, at [`DesktopAction::EndGesture`].
pub fn reduce_desktop(
    manager: &mut WindowManager,
    gesture: &mut GestureState,
    action: DesktopAction,
) -> Vec<RuntimeEffect> {
    let mut effects = Vec::new();
    let before = manager.snapshot();
    let mut persist = true;

    match action {
        DesktopAction::OpenWindow { window_id } => {
            manager.open(&window_id);
            manager.set_command_palette_open(false);
            effects.push(RuntimeEffect::FocusWindowInput(window_id));
        }
        DesktopAction::ActivateApp { window_id } => {
            let external = manager
                .catalog()
                .external_url_for(&window_id)
                .map(str::to_string);
            match external {
                Some(url) => effects.push(RuntimeEffect::OpenExternalUrl(url)),
                None => {
                    return reduce_desktop(
                        manager,
                        gesture,
                        DesktopAction::OpenWindow { window_id },
                    );
                }
            }
        }
        DesktopAction::OpenExternalUrl { url } => {
            effects.push(RuntimeEffect::OpenExternalUrl(url));
        }
        DesktopAction::CloseWindow { window_id } => {
            if gesture.window_id() == Some(&window_id) {
                *gesture = GestureState::Idle;
            }
            manager.close(&window_id);
        }
        DesktopAction::MinimizeWindow { window_id } => {
            if gesture.window_id() == Some(&window_id) {
                *gesture = GestureState::Idle;
            }
            manager.minimize(&window_id);
        }
        DesktopAction::FocusWindow { window_id } => {
            if manager.focus(&window_id) {
                effects.push(RuntimeEffect::FocusWindowInput(window_id));
            }
        }
        DesktopAction::ToggleMaximize { window_id } => {
            interaction::toggle_maximize(manager, &window_id);
        }
        DesktopAction::BeginMove { window_id, pointer } => {
            interaction::begin_move(manager, gesture, &window_id, pointer);
        }
        DesktopAction::UpdateMove { pointer } => {
            interaction::update_move(manager, gesture, pointer);
            persist = false;
        }
        DesktopAction::BeginResize {
            window_id,
            edge,
            pointer,
        } => {
            interaction::begin_resize(manager, gesture, &window_id, edge, pointer);
        }
        DesktopAction::UpdateResize { pointer } => {
            interaction::update_resize(manager, gesture, pointer);
            persist = false;
        }
        DesktopAction::EndGesture { rendered } => {
            if interaction::end_gesture(manager, gesture, rendered) {
                effects.push(RuntimeEffect::PersistSnapshot);
            }
            persist = false;
        }
        DesktopAction::ViewportResized { viewport } => {
            apply_viewport(manager, viewport);
        }
        DesktopAction::SetTheme { theme } => {
            manager.set_theme(theme);
        }
        DesktopAction::ToggleCommandPalette => {
            manager.toggle_command_palette();
        }
        DesktopAction::SetCommandPaletteOpen { open } => {
            manager.set_command_palette_open(open);
        }
        DesktopAction::RunPaletteCommand(command) => {
            manager.set_command_palette_open(false);
            return reduce_desktop(manager, gesture, *command);
        }
        DesktopAction::HydrateSnapshot { snapshot } => {
            *gesture = GestureState::Idle;
            manager.hydrate(snapshot);
            persist = false;
        }
    }

    if persist && manager.snapshot() != before {
        effects.insert(0, RuntimeEffect::PersistSnapshot);
    }
    effects
}
