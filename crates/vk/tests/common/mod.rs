use std::{path::Path, process::Command};

/// Create a new vk CLI command isolated in `data_dir`
pub fn vk(data_dir: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_vk"));
    cmd.env("VK_APPDATA_DIR", data_dir)
        .env_remove("VK_SESSION")
        .env("RUST_LOG", "warn")
        .args(["--nointeraction", "--color", "no"]);
    cmd
}
