//! LaunchAgent plist.

use std::path::{Path, PathBuf};

use super::{Autostart, descriptor_exists, remove_descriptor, write_descriptor};
use crate::Result;

/// Autostart via `<dir>/com.github.<app>.plist`.
#[derive(Debug, Clone)]
pub struct MacosAutostart {
    label: String,
    executable: PathBuf,
    plist_path: PathBuf,
}

impl MacosAutostart {
    pub fn new(dir: &Path, app_name: &str, executable: &Path) -> Self {
        let label = format!("com.github.{}", app_name);
        Self {
            plist_path: dir.join(format!("{}.plist", label)),
            label,
            executable: executable.to_path_buf(),
        }
    }

    fn plist(&self) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
	<key>Label</key>
	<string>{}</string>
	<key>ProgramArguments</key>
	<array>
		<string>{}</string>
	</array>
	<key>RunAtLoad</key>
	<true/>
	<key>KeepAlive</key>
	<false/>
	<key>StandardOutPath</key>
	<string>/dev/null</string>
	<key>StandardErrorPath</key>
	<string>/dev/null</string>
</dict>
</plist>
"#,
            xml_escape(&self.label),
            xml_escape(&self.executable.to_string_lossy())
        )
    }
}

impl Autostart for MacosAutostart {
    fn is_enabled(&self) -> Result<bool> {
        descriptor_exists(&self.plist_path)
    }

    fn enable(&self) -> Result<()> {
        write_descriptor(&self.plist_path, &self.plist())
    }

    fn disable(&self) -> Result<()> {
        remove_descriptor(&self.plist_path)
    }

    fn location(&self) -> PathBuf {
        self.plist_path.clone()
    }
}

fn xml_escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_plist_contents() {
        let dir = tempfile::tempdir().unwrap();
        let autostart = MacosAutostart::new(
            dir.path(),
            "cc-quick-profile",
            Path::new("/Applications/A&B.app/ccqp"),
        );
        autostart.enable().unwrap();

        let content =
            fs::read_to_string(dir.path().join("com.github.cc-quick-profile.plist")).unwrap();
        assert!(content.contains("<string>com.github.cc-quick-profile</string>"));
        assert!(content.contains("<string>/Applications/A&amp;B.app/ccqp</string>"));
        assert!(content.contains("<key>RunAtLoad</key>\n\t<true/>"));
        assert!(content.contains("<key>KeepAlive</key>\n\t<false/>"));
    }
}
