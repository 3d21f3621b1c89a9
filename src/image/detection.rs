// ABOUTME: Local container engine socket detection.
// ABOUTME: Checks for Podman sockets first, then Docker.

use std::path::Path;

use super::ImageError;

const ROOTFUL_PODMAN: &str = "/run/podman/podman.sock";
const DOCKER_SOCKET: &str = "/var/run/docker.sock";

/// A container engine socket speaking the Docker-compatible API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineSocket {
    pub path: String,
}

/// Detect the container engine on the local system.
///
/// Detection order:
/// 1. Rootless Podman socket (`/run/user/$UID/podman/podman.sock`)
/// 2. Rootful Podman socket (`/run/podman/podman.sock`)
/// 3. Docker socket (`/var/run/docker.sock`)
pub fn detect_local() -> Result<EngineSocket, ImageError> {
    let mut candidates = Vec::with_capacity(3);
    if let Some(uid) = get_uid() {
        candidates.push(format!("/run/user/{}/podman/podman.sock", uid));
    }
    candidates.push(ROOTFUL_PODMAN.to_string());
    candidates.push(DOCKER_SOCKET.to_string());

    candidates
        .into_iter()
        .find(|path| Path::new(path).exists())
        .map(|path| EngineSocket { path })
        .ok_or(ImageError::NoEngineFound)
}

fn get_uid() -> Option<String> {
    std::env::var("UID").ok().or_else(|| {
        // Fall back to reading /proc/self/status
        std::fs::read_to_string("/proc/self/status")
            .ok()
            .and_then(|s| {
                s.lines()
                    .find(|l| l.starts_with("Uid:"))
                    .and_then(|l| l.split_whitespace().nth(1))
                    .map(|s| s.to_string())
            })
    })
}
