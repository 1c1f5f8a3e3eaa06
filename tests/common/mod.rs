use assert_cmd::Command;
use std::fs;
use std::path::Path;

pub fn mtimeline_cmd() -> Command {
    let mut cmd = Command::cargo_bin("mtimeline").unwrap();
    cmd.env_remove("MTIMELINE_ROOT");
    cmd.env_remove("MTIMELINE_LOG");
    cmd.env_remove("EDITOR");
    cmd.env_remove("VISUAL");
    cmd
}

/// Initialize a timeline root and write the given notes into it
#[allow(dead_code)]
pub fn timeline_with(root: &Path, notes: &[(&str, &str)]) {
    mtimeline_cmd().arg("init").arg(root).assert().success();
    for (name, content) in notes {
        let path = root.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }
}
