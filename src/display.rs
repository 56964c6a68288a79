// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use logger::*;

use std::path::Path;
use std::process::Command;

/// Hand the rendered image to the platform viewer. Does nothing when there is
/// no display to show it on; a viewer that fails to start is only logged.
pub fn show(path: &Path) {
    if !display_available() {
        debug!("no display available, not opening {}", path.display());
        return;
    }

    match viewer(path).spawn() {
        Ok(_) => {
            info!("opened {} in viewer", path.display());
        }
        Err(e) => {
            warn!("failed to open viewer for {}: {}", path.display(), e);
        }
    }
}

#[cfg(all(unix, not(target_os = "macos")))]
fn display_available() -> bool {
    std::env::var_os("DISPLAY").map_or(false, |v| !v.is_empty())
        || std::env::var_os("WAYLAND_DISPLAY").map_or(false, |v| !v.is_empty())
}

#[cfg(not(all(unix, not(target_os = "macos"))))]
fn display_available() -> bool {
    true
}

#[cfg(target_os = "macos")]
fn viewer(path: &Path) -> Command {
    let mut command = Command::new("open");
    command.arg(path);
    command
}

#[cfg(windows)]
fn viewer(path: &Path) -> Command {
    let mut command = Command::new("cmd");
    command.args(&["/C", "start", ""]).arg(path);
    command
}

#[cfg(all(not(windows), not(target_os = "macos")))]
fn viewer(path: &Path) -> Command {
    let mut command = Command::new("xdg-open");
    command.arg(path);
    command
}

#[cfg(all(test, unix, not(target_os = "macos")))]
mod tests {
    use super::*;

    use std::env;

    // no other test reads these variables
    #[test]
    fn headless_without_display_variables() {
        let saved: Vec<_> = ["DISPLAY", "WAYLAND_DISPLAY"]
            .iter()
            .map(|name| (*name, env::var_os(name)))
            .collect();

        env::remove_var("DISPLAY");
        env::remove_var("WAYLAND_DISPLAY");
        assert!(!display_available());
        // returns without spawning a viewer
        show(Path::new("/nonexistent/memory_latency_plot.png"));

        env::set_var("DISPLAY", "");
        assert!(!display_available());

        env::set_var("WAYLAND_DISPLAY", "wayland-0");
        assert!(display_available());

        env::remove_var("WAYLAND_DISPLAY");
        env::set_var("DISPLAY", ":0");
        assert!(display_available());

        for (name, value) in saved {
            match value {
                Some(value) => env::set_var(name, value),
                None => env::remove_var(name),
            }
        }
    }
}
