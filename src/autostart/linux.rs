//! XDG autostart `.desktop` entry.

use std::path::{Path, PathBuf};

use super::{Autostart, descriptor_exists, remove_descriptor, write_descriptor};
use crate::Result;

/// Autostart via `<dir>/<app>.desktop`.
#[derive(Debug, Clone)]
pub struct LinuxAutostart {
    app_name: String,
    executable: PathBuf,
    desktop_path: PathBuf,
}

impl LinuxAutostart {
    pub fn new(dir: &Path, app_name: &str, executable: &Path) -> Self {
        Self {
            app_name: app_name.to_string(),
            executable: executable.to_path_buf(),
            desktop_path: dir.join(format!("{}.desktop", app_name)),
        }
    }

    fn desktop_entry(&self) -> String {
        format!(
            "[Desktop Entry]\n\
             Type=Application\n\
             Name={}\n\
             Exec={}\n\
             Hidden=false\n\
             NoDisplay=false\n\
             X-GNOME-Autostart-enabled=true\n\
             Comment=Claude Code profile switcher\n",
            self.app_name,
            exec_quote(&self.executable.to_string_lossy())
        )
    }
}

impl Autostart for LinuxAutostart {
    fn is_enabled(&self) -> Result<bool> {
        descriptor_exists(&self.desktop_path)
    }

    fn enable(&self) -> Result<()> {
        write_descriptor(&self.desktop_path, &self.desktop_entry())
    }

    fn disable(&self) -> Result<()> {
        remove_descriptor(&self.desktop_path)
    }

    fn location(&self) -> PathBuf {
        self.desktop_path.clone()
    }
}

/// Quote an `Exec=` argument for a desktop entry when it needs it.
fn exec_quote(arg: &str) -> String {
    if arg
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '/' | '-' | '_' | '.'))
    {
        return arg.to_string();
    }
    let mut quoted = String::with_capacity(arg.len() + 2);
    quoted.push('"');
    for c in arg.chars() {
        if matches!(c, '"' | '`' | '$' | '\\') {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_desktop_entry_contents() {
        let dir = tempfile::tempdir().unwrap();
        let autostart =
            LinuxAutostart::new(dir.path(), "cc-quick-profile", Path::new("/usr/bin/ccqp"));
        autostart.enable().unwrap();

        let content = fs::read_to_string(dir.path().join("cc-quick-profile.desktop")).unwrap();
        assert!(content.starts_with("[Desktop Entry]\n"));
        assert!(content.contains("Name=cc-quick-profile\n"));
        assert!(content.contains("Exec=/usr/bin/ccqp\n"));
        assert!(content.contains("X-GNOME-Autostart-enabled=true\n"));
    }

    #[test]
    fn test_exec_quote() {
        assert_eq!(exec_quote("/usr/bin/ccqp"), "/usr/bin/ccqp");
        assert_eq!(exec_quote("/opt/my app/ccqp"), "\"/opt/my app/ccqp\"");
        assert_eq!(exec_quote("/opt/$x/ccqp"), "\"/opt/\\$x/ccqp\"");
    }
}
