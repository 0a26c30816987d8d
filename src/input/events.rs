//! Input event payload types

use bitflags::bitflags;
use winit::keyboard::PhysicalKey;

/// Key identifier
///
/// Crate-owned so listeners never depend on winit directly. The numeric
/// value (`as u16`) is stable within a build and feeds the composed
/// binding key, so every variant must stay within 16 bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum Key {
    // Common keys
    Space,
    Enter,
    Escape,
    Backspace,
    Tab,
    Delete,

    // Letters
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
    J,
    K,
    L,
    M,
    N,
    O,
    P,
    Q,
    R,
    S,
    T,
    U,
    V,
    W,
    X,
    Y,
    Z,

    // Numbers
    Num0,
    Num1,
    Num2,
    Num3,
    Num4,
    Num5,
    Num6,
    Num7,
    Num8,
    Num9,

    // Function keys
    F1,
    F2,
    F3,
    F4,
    F5,
    F6,
    F7,
    F8,
    F9,
    F10,
    F11,
    F12,

    // Arrows
    Left,
    Right,
    Up,
    Down,

    // Anything the platform reports that has no variant here
    Other,
}

impl Key {
    /// Numeric encoding used by the composed binding key
    pub fn code(self) -> u16 {
        self as u16
    }
}

/// Convert from winit key code
impl From<winit::keyboard::KeyCode> for Key {
    fn from(key: winit::keyboard::KeyCode) -> Self {
        use winit::keyboard::KeyCode as WK;
        match key {
            WK::Space => Self::Space,
            WK::Enter => Self::Enter,
            WK::Escape => Self::Escape,
            WK::Backspace => Self::Backspace,
            WK::Tab => Self::Tab,
            WK::Delete => Self::Delete,

            WK::KeyA => Self::A,
            WK::KeyB => Self::B,
            WK::KeyC => Self::C,
            WK::KeyD => Self::D,
            WK::KeyE => Self::E,
            WK::KeyF => Self::F,
            WK::KeyG => Self::G,
            WK::KeyH => Self::H,
            WK::KeyI => Self::I,
            WK::KeyJ => Self::J,
            WK::KeyK => Self::K,
            WK::KeyL => Self::L,
            WK::KeyM => Self::M,
            WK::KeyN => Self::N,
            WK::KeyO => Self::O,
            WK::KeyP => Self::P,
            WK::KeyQ => Self::Q,
            WK::KeyR => Self::R,
            WK::KeyS => Self::S,
            WK::KeyT => Self::T,
            WK::KeyU => Self::U,
            WK::KeyV => Self::V,
            WK::KeyW => Self::W,
            WK::KeyX => Self::X,
            WK::KeyY => Self::Y,
            WK::KeyZ => Self::Z,

            WK::Digit0 => Self::Num0,
            WK::Digit1 => Self::Num1,
            WK::Digit2 => Self::Num2,
            WK::Digit3 => Self::Num3,
            WK::Digit4 => Self::Num4,
            WK::Digit5 => Self::Num5,
            WK::Digit6 => Self::Num6,
            WK::Digit7 => Self::Num7,
            WK::Digit8 => Self::Num8,
            WK::Digit9 => Self::Num9,

            WK::F1 => Self::F1,
            WK::F2 => Self::F2,
            WK::F3 => Self::F3,
            WK::F4 => Self::F4,
            WK::F5 => Self::F5,
            WK::F6 => Self::F6,
            WK::F7 => Self::F7,
            WK::F8 => Self::F8,
            WK::F9 => Self::F9,
            WK::F10 => Self::F10,
            WK::F11 => Self::F11,
            WK::F12 => Self::F12,

            WK::ArrowLeft => Self::Left,
            WK::ArrowRight => Self::Right,
            WK::ArrowUp => Self::Up,
            WK::ArrowDown => Self::Down,

            _ => Self::Other,
        }
    }
}

impl From<PhysicalKey> for Key {
    fn from(key: PhysicalKey) -> Self {
        match key {
            PhysicalKey::Code(code) => code.into(),
            PhysicalKey::Unidentified(_) => Self::Other,
        }
    }
}

/// What happened to a key or mouse button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum KeyAction {
    Release = 0,
    Press = 1,
    Repeat = 2,
}

impl KeyAction {
    /// Numeric encoding used by the composed binding key
    pub fn code(self) -> u16 {
        self as u16
    }

    /// Classify a winit element state, folding in the repeat flag
    pub fn from_state(state: winit::event::ElementState, repeat: bool) -> Self {
        match state {
            winit::event::ElementState::Pressed if repeat => Self::Repeat,
            winit::event::ElementState::Pressed => Self::Press,
            winit::event::ElementState::Released => Self::Release,
        }
    }
}

/// Mouse button identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Back,
    Forward,
    Other(u16),
}

impl From<winit::event::MouseButton> for MouseButton {
    fn from(button: winit::event::MouseButton) -> Self {
        use winit::event::MouseButton as WB;
        match button {
            WB::Left => Self::Left,
            WB::Right => Self::Right,
            WB::Middle => Self::Middle,
            WB::Back => Self::Back,
            WB::Forward => Self::Forward,
            WB::Other(id) => Self::Other(id),
        }
    }
}

bitflags! {
    /// Keyboard modifiers as a bit set
    ///
    /// Bit positions follow the conventional shift/ctrl/alt/super order
    /// so the set packs into the low 16 bits of a composed binding key.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u16 {
        const SHIFT = 1;
        const CTRL = 1 << 1;
        const ALT = 1 << 2;
        const META = 1 << 3;
    }
}

impl From<winit::keyboard::ModifiersState> for Modifiers {
    fn from(state: winit::keyboard::ModifiersState) -> Self {
        let mut mods = Self::empty();
        mods.set(Self::SHIFT, state.shift_key());
        mods.set(Self::CTRL, state.control_key());
        mods.set(Self::ALT, state.alt_key());
        mods.set(Self::META, state.super_key());
        mods
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_codes_fit_sixteen_bits() {
        // The composed binding key reserves 16 bits per field
        assert!(Key::Other.code() < u16::MAX);
        assert!(KeyAction::Repeat.code() < u16::MAX);
    }

    #[test]
    fn test_key_action_from_state() {
        use winit::event::ElementState;
        assert_eq!(
            KeyAction::from_state(ElementState::Pressed, false),
            KeyAction::Press
        );
        assert_eq!(
            KeyAction::from_state(ElementState::Pressed, true),
            KeyAction::Repeat
        );
        assert_eq!(
            KeyAction::from_state(ElementState::Released, false),
            KeyAction::Release
        );
        // A release never counts as a repeat
        assert_eq!(
            KeyAction::from_state(ElementState::Released, true),
            KeyAction::Release
        );
    }

    #[test]
    fn test_unknown_keys_collapse_to_other() {
        use winit::keyboard::KeyCode as WK;
        assert_eq!(Key::from(WK::NumLock), Key::Other);
        assert_eq!(Key::from(WK::Home), Key::Other);
    }

    #[test]
    fn test_modifiers_from_winit() {
        use winit::keyboard::ModifiersState;
        let state = ModifiersState::SHIFT | ModifiersState::CONTROL;
        let mods = Modifiers::from(state);
        assert!(mods.contains(Modifiers::SHIFT));
        assert!(mods.contains(Modifiers::CTRL));
        assert!(!mods.contains(Modifiers::ALT));
        assert_eq!(mods.bits(), 0b11);
    }
}
