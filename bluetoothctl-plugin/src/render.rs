/*!
 * Rendering sink
 * UI directives emitted as JSON lines for the host to replay
 */

use serde::{Deserialize, Serialize};
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationIcon {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Directive {
    DirectoryItem {
        handle: i32,
        url: String,
        label: String,
        icon: Option<String>,
        is_folder: bool,
    },
    EndOfDirectory {
        handle: i32,
    },
    Notification {
        heading: String,
        message: String,
        icon: NotificationIcon,
    },
    TextViewer {
        heading: String,
        text: String,
        usemono: bool,
    },
    Busy {
        active: bool,
    },
}

pub trait Renderer {
    fn render(&mut self, directive: Directive);
}

pub struct JsonLinesRenderer<W> {
    writer: W,
}

impl<W: Write> JsonLinesRenderer<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    fn emit(&mut self, directive: &Directive) -> anyhow::Result<()> {
        serde_json::to_writer(&mut self.writer, directive)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }
}

impl<W: Write> Renderer for JsonLinesRenderer<W> {
    fn render(&mut self, directive: Directive) {
        if let Err(e) = self.emit(&directive) {
            tracing::error!("failed to emit {:?}: {}", directive, e);
        }
    }
}

/// Busy indicator held for the lifetime of the guard, closed on every exit path.
pub struct BusyDialog<'a> {
    renderer: &'a mut dyn Renderer,
}

impl<'a> BusyDialog<'a> {
    pub fn open(renderer: &'a mut dyn Renderer) -> Self {
        renderer.render(Directive::Busy { active: true });
        Self { renderer }
    }
}

impl Drop for BusyDialog<'_> {
    fn drop(&mut self) {
        self.renderer.render(Directive::Busy { active: false });
    }
}


#[cfg(test)]
mod tests {
    use super::testing::Recorder;
    use super::*;
    use std::panic::{self, AssertUnwindSafe};

    #[test]
    fn json_lines_are_internally_tagged() {
        let mut renderer = JsonLinesRenderer::new(Vec::new());
        renderer.render(Directive::Notification {
            heading: "Bluetooth".to_string(),
            message: "connecting successful".to_string(),
            icon: NotificationIcon::Info,
        });
        renderer.render(Directive::EndOfDirectory { handle: 3 });

        let output = String::from_utf8(renderer.writer).unwrap();
        let lines: Vec<serde_json::Value> = output
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["type"], "Notification");
        assert_eq!(lines[0]["icon"], "info");
        assert_eq!(lines[1], serde_json::json!({"type": "EndOfDirectory", "handle": 3}));
    }

    #[test]
    fn busy_dialog_closes_when_dropped() {
        let mut recorder = Recorder::default();
        {
            let _busy = BusyDialog::open(&mut recorder);
        }

        assert_eq!(
            recorder.directives(),
            [Directive::Busy { active: true }, Directive::Busy { active: false }]
        );
    }

    #[test]
    fn busy_dialog_closes_on_panic() {
        let mut recorder = Recorder::default();
        let log = recorder.clone();

        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            let _busy = BusyDialog::open(&mut recorder);
            panic!("tool crashed");
        }));

        assert!(result.is_err());
        assert_eq!(log.directives().last(), Some(&Directive::Busy { active: false }));
    }

    #[test]
    fn release_profile_unwinds_so_busy_dialog_can_close() {
        let manifest: toml::Value = toml::from_str(include_str!("../../Cargo.toml")).unwrap();
        let panic_strategy = manifest
            .get("profile")
            .and_then(|profile| profile.get("release"))
            .and_then(|release| release.get("panic"))
            .and_then(toml::Value::as_str);

        assert_ne!(panic_strategy, Some("abort"));
    }
}
