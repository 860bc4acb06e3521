//! Input-intent boundary — the only input the core consumes.
//!
//! The collaborating input layer translates raw key presses into at most one
//! `Intent` per simulation step. When several keys are held at once the input
//! layer is expected to resolve them in a fixed priority order: movement
//! before turning before actions before menu-toggle. The core itself never
//! sees more than one intent per step.

/// Cursor movement inside the active menu or list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectDir {
    Up,
    Down,
    Left,
    Right,
}

/// One discrete player command, consumed per step.
///
/// Intents that make no sense in the current mode are ignored (no-ops).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Intent {
    /// Step one cell in the facing direction.
    MoveForward,
    /// Step one cell against the facing direction, without turning.
    MoveBackward,
    /// Rotate facing counter-clockwise.
    TurnLeft,
    /// Rotate facing clockwise.
    TurnRight,
    /// Select / use tile / advance a log.
    Confirm,
    /// Back out of the current sub-mode, or retreat to town from the dungeon.
    Cancel,
    /// Move the cursor of the active menu.
    DirectionalSelect(SelectDir),
    /// Open or close the inventory menu.
    ToggleMenu,
}
