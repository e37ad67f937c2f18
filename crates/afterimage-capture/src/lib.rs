pub mod capture;

pub use capture::{CameraCapture, CameraFrame, CaptureConfig};

pub type CaptureResult<T> = Result<T, CaptureError>;

#[derive(thiserror::Error, Debug)]
pub enum CaptureError {
    #[error("failed to spawn capture thread: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("camera error: {0}")]
    Nokhwa(#[from] nokhwa::NokhwaError),
}

/// An attached camera, as reported by device enumeration.
#[derive(Clone, Debug)]
pub struct CameraInfo {
    pub index: u32,
    pub name: String,
}

/// Platform capture initialization. On macOS this triggers the AVFoundation
/// permission prompt; elsewhere it is a no-op.
pub fn init() {
    #[cfg(target_os = "macos")]
    nokhwa::nokhwa_initialize(|granted| {
        tracing::info!(granted, "camera permission");
    });
}

/// List attached cameras. Diagnostic only; capture opens the configured
/// index directly.
pub fn list_cameras() -> CaptureResult<Vec<CameraInfo>> {
    let devices = nokhwa::query(nokhwa::utils::ApiBackend::Auto)?;
    Ok(devices
        .iter()
        .enumerate()
        .map(|(index, info)| CameraInfo {
            index: index as u32,
            name: info.human_name().to_string(),
        })
        .collect())
}
