/// Timeline keyboard shortcuts
use eframe::egui;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyCommand {
    ToggleBlade,
    SetInPoint,
    SetOutPoint,
    ClearInOut,
    ZoomIn,
    ZoomOut,
}

impl KeyCommand {
    pub fn all() -> [KeyCommand; 6] {
        [
            Self::ToggleBlade,
            Self::SetInPoint,
            Self::SetOutPoint,
            Self::ClearInOut,
            Self::ZoomIn,
            Self::ZoomOut,
        ]
    }

    /// Check if keyboard input matches this command
    pub fn check(&self, ctx: &egui::Context) -> bool {
        ctx.input(|i| match self {
            Self::ToggleBlade => i.key_pressed(egui::Key::B) && !i.modifiers.command,
            Self::SetInPoint => i.key_pressed(egui::Key::I) && !i.modifiers.command,
            Self::SetOutPoint => i.key_pressed(egui::Key::O) && !i.modifiers.command,
            Self::ClearInOut => {
                i.modifiers.command && i.modifiers.shift && i.key_pressed(egui::Key::X)
            }
            Self::ZoomIn => i.key_pressed(egui::Key::Equals) || i.key_pressed(egui::Key::Plus),
            Self::ZoomOut => i.key_pressed(egui::Key::Minus),
        })
    }

    pub fn description(&self) -> &str {
        match self {
            Self::ToggleBlade => "Toggle Blade",
            Self::SetInPoint => "Set In Point",
            Self::SetOutPoint => "Set Out Point",
            Self::ClearInOut => "Clear In/Out",
            Self::ZoomIn => "Zoom In",
            Self::ZoomOut => "Zoom Out",
        }
    }

    pub fn shortcut_text(&self) -> &str {
        match self {
            Self::ToggleBlade => "B",
            Self::SetInPoint => "I",
            Self::SetOutPoint => "O",
            Self::ClearInOut => "Cmd+Shift+X",
            Self::ZoomIn => "+",
            Self::ZoomOut => "-",
        }
    }

    /// Commands whose keys were pressed this frame.
    pub fn pressed(ctx: &egui::Context) -> Vec<KeyCommand> {
        Self::all().into_iter().filter(|c| c.check(ctx)).collect()
    }
}
