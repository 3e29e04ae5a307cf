use crate::host::PackageRegistry;
use editor_notifications_util::{linux_distro, macos_version, windows_edition};
use tokio::process::Command;

async fn command_output(program: &str, args: &[&str]) -> Option<String> {
    match Command::new(program).args(args).output().await {
        Ok(output) if output.status.success() => Some(String::from_utf8_lossy(&output.stdout).into_owned()),
        Ok(output) => {
            tracing::debug!("{} exited with {}", program, output.status);
            None
        }
        Err(err) => {
            tracing::debug!("Failed to run {}: {}", program, err);
            None
        }
    }
}

async fn kernel_release() -> Option<String> {
    if let Ok(release) = tokio::fs::read_to_string("/proc/sys/kernel/osrelease").await {
        return Some(release.trim().to_string());
    }
    command_output("uname", &["-r"]).await.map(|r| r.trim().to_string())
}

/// Human readable OS name for bug reports
///
/// Falls back to the platform name and kernel release when the
/// distribution tools are missing.
pub async fn os_version() -> String {
    let info = match std::env::consts::OS {
        "linux" => command_output("lsb_release", &["-ds"])
            .await
            .and_then(|out| linux_distro(&out)),
        "macos" => command_output(
            "/usr/libexec/PlistBuddy",
            &[
                "-c",
                "Print ProductVersion",
                "-c",
                "Print ProductName",
                "/System/Library/CoreServices/SystemVersion.plist",
            ],
        )
        .await
        .and_then(|out| macos_version(&out)),
        "windows" => command_output("systeminfo", &[])
            .await
            .and_then(|out| windows_edition(&out)),
        _ => None,
    };

    match info {
        Some(info) => info,
        None => match kernel_release().await {
            Some(release) => format!("{} {}", std::env::consts::OS, release),
            None => std::env::consts::OS.to_string(),
        },
    }
}

/// Installed packages that do not ship with the editor, dev checkouts marked
pub fn non_core_packages(packages: &dyn PackageRegistry) -> Vec<String> {
    packages
        .available_packages()
        .into_iter()
        .filter(|p| !packages.is_bundled(&p.name))
        .map(|p| {
            let path = p.path.to_string_lossy().replace('\\', "/");
            let dev = if path.contains("dev/packages") { "(dev)" } else { "" };
            format!("{} {} {}", p.name, p.version().unwrap_or("unknown"), dev)
        })
        .collect()
}
