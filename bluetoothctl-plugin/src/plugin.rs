/*!
 * Plugin context and action router
 * One invocation: one request, one handler, one rendered page or notification
 */

use anyhow::Result;
use bluetoothctl_core::DeviceController;
use std::collections::BTreeMap;
use tracing::debug;
use url::form_urlencoded;

use crate::config::{Labels, PluginConfig};
use crate::error::RouteError;
use crate::render::{BusyDialog, Directive, NotificationIcon, Renderer};
use crate::request::{Params, Request};

pub type Handler = Box<dyn Fn(&mut Plugin, &Params) -> Result<()>>;

/// Everything a handler may touch, built once per invocation.
pub struct Plugin {
    base_url: String,
    handle: i32,
    config: PluginConfig,
    controller: DeviceController,
    renderer: Box<dyn Renderer>,
}

impl Plugin {
    pub fn new(
        base_url: impl Into<String>,
        handle: i32,
        config: PluginConfig,
        controller: DeviceController,
        renderer: Box<dyn Renderer>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            handle,
            config,
            controller,
            renderer,
        }
    }

    pub fn name(&self) -> &str {
        &self.config.addon.name
    }

    pub fn labels(&self) -> &Labels {
        &self.config.labels
    }

    pub fn controller(&self) -> &DeviceController {
        &self.controller
    }

    /// URL that re-invokes the plugin with `action` and `params`.
    pub fn build_url(&self, action: &str, params: &[(&str, &str)]) -> String {
        let mut query = form_urlencoded::Serializer::new(String::new());
        query.append_pair("action", action);
        query.extend_pairs(params);
        format!("{}?{}", self.base_url, query.finish())
    }

    pub fn add_directory_item(&mut self, label: impl Into<String>, url: String, is_folder: bool) {
        let directive = Directive::DirectoryItem {
            handle: self.handle,
            url,
            label: label.into(),
            icon: self.config.addon.icon.clone(),
            is_folder,
        };
        self.renderer.render(directive);
    }

    pub fn end_of_directory(&mut self) {
        self.renderer.render(Directive::EndOfDirectory {
            handle: self.handle,
        });
    }

    pub fn notify(&mut self, message: impl Into<String>, icon: NotificationIcon) {
        let heading = self.config.addon.name.clone();
        self.renderer.render(Directive::Notification {
            heading,
            message: message.into(),
            icon,
        });
    }

    pub fn show_text(&mut self, heading: impl Into<String>, text: impl Into<String>) {
        self.renderer.render(Directive::TextViewer {
            heading: heading.into(),
            text: text.into(),
            usemono: true,
        });
    }

    /// Run `operation` with the busy indicator up.
    pub fn while_busy<T>(&mut self, operation: impl FnOnce(&DeviceController) -> T) -> T {
        let _busy = BusyDialog::open(&mut *self.renderer);
        operation(&self.controller)
    }
}

/// Closed table of named actions.
#[derive(Default)]
pub struct Router {
    actions: BTreeMap<String, Handler>,
}

impl Router {
    pub fn register<F>(&mut self, name: &str, handler: F) -> Result<(), RouteError>
    where
        F: Fn(&mut Plugin, &Params) -> Result<()> + 'static,
    {
        if self.actions.contains_key(name) {
            return Err(RouteError::DuplicateAction(name.to_string()));
        }

        debug!("registering action: {}", name);
        self.actions.insert(name.to_string(), Box::new(handler));
        Ok(())
    }

    pub fn actions(&self) -> impl Iterator<Item = &str> {
        self.actions.keys().map(String::as_str)
    }

    /// Run the handler registered for the request's action. Unknown actions are rejected.
    pub fn dispatch(&self, plugin: &mut Plugin, request: &Request) -> Result<()> {
        debug!("entering with action {} and parameters {}", request.action(), request.params());

        let handler = self
            .actions
            .get(request.action())
            .ok_or_else(|| RouteError::UnknownAction(request.action().to_string()))?;

        handler(plugin, request.params())
    }
}

#[cfg(test)]
pub mod testing {
    use bluetoothctl_core::{CommandRunner, DeviceController, OperationOutcome};
    use std::collections::HashMap;
    use std::io;
    use std::path::Path;

    use super::Plugin;
    use crate::config::PluginConfig;
    use crate::render::testing::Recorder;

    pub const BASE_URL: &str = "plugin://plugin.program.bluetoothctl/";
    pub const HANDLE: i32 = 7;

    /// Stands in for bluetoothctl: replies by joined argument list, anything else "is missing".
    #[derive(Default)]
    pub struct ScriptedTool(HashMap<String, OperationOutcome>);

    impl ScriptedTool {
        pub fn reply(mut self, args: &str, exit_code: i32, stdout: &str) -> Self {
            self.0
                .insert(args.to_string(), OperationOutcome::from_exit(exit_code, stdout, ""));
            self
        }
    }

    impl CommandRunner for ScriptedTool {
        fn run(&self, _executable: &Path, args: &[&str]) -> io::Result<OperationOutcome> {
            self.0
                .get(&args.join(" "))
                .cloned()
                .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such file"))
        }
    }

    pub fn plugin(tool: ScriptedTool) -> (Plugin, Recorder) {
        let config = PluginConfig::default();
        let controller = DeviceController::with_runner(&config.bluetoothctl, tool);
        let recorder = Recorder::default();
        let plugin = Plugin::new(BASE_URL, HANDLE, config, controller, Box::new(recorder.clone()));
        (plugin, recorder)
    }
}
