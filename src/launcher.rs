//! Server process launch

use std::path::Path;
use std::process::{Command, Stdio};

use tracing::info;

use crate::environment::{JFROG_HOME_ENV, LICENSE_ENV};
use crate::error::{Result, SetupError};
use crate::host::HostOs;
use crate::layout::ServerLayout;

/// Run the platform start script and wait for the script itself to finish.
///
/// The script daemonises the server; its exit status only says whether the
/// launch worked, not whether the server is healthy.
pub fn start(layout: &ServerLayout, os: HostOs) -> Result<()> {
    info!("Starting Artifactory...");
    let (program, args) = layout.start_command(os);
    let status = start_command(&program, &args, layout.home())
        .status()
        .map_err(|e| launch_error(&program, &args, e))?;

    if status.success() {
        Ok(())
    } else {
        Err(launch_error(&program, &args, format!("exited with {status}")))
    }
}

fn start_command(program: &Path, args: &[&str], home: &Path) -> Command {
    let mut command = Command::new(program);
    command
        .args(args)
        .env(JFROG_HOME_ENV, home)
        .env_remove(LICENSE_ENV)
        .stdin(Stdio::null())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit());
    command
}

fn launch_error(program: &Path, args: &[&str], reason: impl std::fmt::Display) -> SetupError {
    let mut command = program.display().to_string();
    for arg in args {
        command.push(' ');
        command.push_str(arg);
    }
    SetupError::Launch {
        command,
        reason: reason.to_string(),
    }
}

#[cfg(all(test, unix))]
mod tests {
    // Spawning reads the process environment, which the home and
    // environment tests mutate under `#[serial]`.
    use super::*;
    use serial_test::serial;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use tempfile::TempDir;

    fn write_ctl(layout: &ServerLayout, body: &str) {
        let bin = layout.bin_dir();
        fs::create_dir_all(&bin).unwrap();
        let script = bin.join("artifactoryctl");
        fs::write(&script, body).unwrap();
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();
    }

    #[test]
    #[serial]
    fn test_start_passes_home_and_start_argument() {
        let temp = TempDir::new().unwrap();
        let layout = ServerLayout::new(temp.path(), false);
        let record = temp.path().join("record");
        write_ctl(
            &layout,
            &format!(
                "#!/bin/sh\necho \"$1 $JFROG_HOME ${{RTLIC:-unset}}\" > '{}'\n",
                record.display()
            ),
        );

        start(&layout, HostOs::Linux).unwrap();

        let recorded = fs::read_to_string(&record).unwrap();
        assert_eq!(
            recorded.trim(),
            format!("start {} unset", temp.path().display())
        );
    }

    #[test]
    #[serial]
    fn test_nonzero_exit_is_launch_error() {
        let temp = TempDir::new().unwrap();
        let layout = ServerLayout::new(temp.path(), true);
        write_ctl(&layout, "#!/bin/sh\nexit 3\n");

        let err = start(&layout, HostOs::Linux).unwrap_err();
        assert!(matches!(err, SetupError::Launch { .. }));
        assert!(err.to_string().contains("artifactoryctl start"));
    }

    #[test]
    #[serial]
    fn test_missing_script_is_launch_error() {
        let temp = TempDir::new().unwrap();
        let layout = ServerLayout::new(temp.path(), false);

        let err = start(&layout, HostOs::Mac).unwrap_err();
        assert!(matches!(err, SetupError::Launch { .. }));
    }
}
