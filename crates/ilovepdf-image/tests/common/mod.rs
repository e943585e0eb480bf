use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Isolated working directory with no config file and no user config dir.
pub struct TestProject {
    pub root: TempDir,
}

impl TestProject {
    pub fn new() -> Self {
        let root = tempfile::tempdir().unwrap();
        Self { root }
    }

    #[allow(dead_code)]
    pub fn write_config(&self, content: &str) {
        fs::write(self.root.path().join("image-build.kdl"), content).unwrap();
    }

    /// Command for the binary, running inside the project directory.
    #[allow(deprecated)]
    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("ilovepdf-image").unwrap();
        cmd.current_dir(self.root.path())
            .env("HOME", self.root.path())
            .env("XDG_CONFIG_HOME", self.root.path().join(".config"))
            .env("NO_COLOR", "1")
            .env("RUST_LOG", "warn")
            .env_remove("ILOVEPDF_BUILD_CONFIG")
            .env_remove("ILOVEPDF_BUILDER")
            .env_remove("ILOVEPDF_DOCKER");
        cmd
    }

    /// Shell script standing in for docker. Every invocation is appended to
    /// the returned log; `create` always fails, `inspect` and `build` exit
    /// with $INSPECT_CODE / $BUILD_CODE (default 0).
    #[cfg(unix)]
    #[allow(dead_code)]
    pub fn fake_docker(&self) -> (PathBuf, PathBuf) {
        use std::os::unix::fs::PermissionsExt;

        let script = self.root.path().join("fake-docker");
        let log = self.root.path().join("fake-docker.log");
        fs::write(
            &script,
            format!(
                "#!/bin/sh\n\
                 echo \"$@\" >> '{}'\n\
                 case \"$2\" in\n\
                   create) echo 'existing instance' >&2; exit 1 ;;\n\
                   inspect) exit ${{INSPECT_CODE:-0}} ;;\n\
                   build) exit ${{BUILD_CODE:-0}} ;;\n\
                 esac\n\
                 exit 0\n",
                log.display()
            ),
        )
        .unwrap();
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();
        (script, log)
    }
}

#[allow(dead_code)]
pub fn read_log(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap_or_default()
        .lines()
        .map(str::to_string)
        .collect()
}
