/// A built-in browser command with its default accelerator.
#[derive(Debug)]
pub struct BuiltinCommand {
    pub id: &'static str,
    pub label: &'static str,
    pub default_accel: &'static str,
}

pub const BUILTIN_COMMANDS: &[BuiltinCommand] = &[
    BuiltinCommand {
        id: "back",
        label: "Back",
        default_accel: "<Alt>Left",
    },
    BuiltinCommand {
        id: "forward",
        label: "Forward",
        default_accel: "<Alt>Right",
    },
    BuiltinCommand {
        id: "reload",
        label: "Reload",
        default_accel: "F5",
    },
    BuiltinCommand {
        id: "home",
        label: "Home",
        default_accel: "<Alt>Home",
    },
    BuiltinCommand {
        id: "new_tab",
        label: "New Tab",
        default_accel: "<Ctrl>t",
    },
    BuiltinCommand {
        id: "close_tab",
        label: "Close Tab",
        default_accel: "<Ctrl>w",
    },
    BuiltinCommand {
        id: "add_bookmark",
        label: "Add Bookmark",
        default_accel: "<Ctrl>d",
    },
    BuiltinCommand {
        id: "edit_bookmarks",
        label: "Edit Bookmarks...",
        default_accel: "<Ctrl><Shift>o",
    },
    BuiltinCommand {
        id: "view_history",
        label: "View Detailed History...",
        default_accel: "<Ctrl>h",
    },
    BuiltinCommand {
        id: "focus_address",
        label: "Focus Address Bar",
        default_accel: "<Ctrl>l",
    },
];

pub fn find_command(id: &str) -> Option<&'static BuiltinCommand> {
    BUILTIN_COMMANDS.iter().find(|c| c.id == id)
}

/// Tooltip text such as `"Back (Alt+Left)"`.
pub fn tooltip(id: &str) -> String {
    match find_command(id) {
        Some(cmd) => format!("{} ({})", cmd.label, accel_to_display(cmd.default_accel)),
        None => id.to_string(),
    }
}

/// Converts a GTK accel string like `"<Ctrl><Shift>o"` to a human-readable
/// display string like `"Ctrl+Shift+O"`.
pub fn accel_to_display(accel: &str) -> String {
    let mut parts: Vec<String> = Vec::new();
    let mut remaining = accel;

    while remaining.starts_with('<') {
        if let Some(end) = remaining.find('>') {
            let modifier = &remaining[1..end];
            let name = match modifier.to_lowercase().as_str() {
                "ctrl" | "control" => "Ctrl".to_string(),
                "shift" => "Shift".to_string(),
                "alt" => "Alt".to_string(),
                "super" => "Super".to_string(),
                _ => modifier.to_string(),
            };
            parts.push(name);
            remaining = &remaining[end + 1..];
        } else {
            break;
        }
    }

    if !remaining.is_empty() {
        let key_display = match remaining {
            "comma" => ",".to_string(),
            "period" => ".".to_string(),
            "equal" => "=".to_string(),
            "minus" => "-".to_string(),
            k if k.chars().count() == 1 => k.to_uppercase(),
            other => other.to_string(),
        };
        parts.push(key_display);
    }

    parts.join("+")
}
