//! Scoped camera-session handling for QR scanning.
//!
//! A scanning session holds an exclusive camera handle; failing to release
//! it on any exit path leaves the camera locked for every other consumer.
//! [`ScanSession`] makes release structural: the device is stopped exactly
//! once, on explicit stop or on drop (teardown, early return, panic unwind).

use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

/// Errors specific to scan-session lifecycle.
#[derive(Error, Debug)]
pub enum ScanError {
    /// The device is already held by another session.
    #[error("scan device already in use")]
    AlreadyActive,

    /// Device-level failure while starting the camera.
    #[error("scan device error: {0}")]
    Device(String),
}

/// An exclusive camera-like scan device.
///
/// `start` must fail with [`ScanError::AlreadyActive`] while a prior start
/// has not been balanced by `stop`; `stop` must be idempotent-safe only in
/// the sense that the session guarantees a single call per session.
pub trait ScanDevice: Send + Sync {
    fn start(&self) -> Result<(), ScanError>;
    fn stop(&self);
}

/// RAII guard over a started scan device.
pub struct ScanSession {
    device: Arc<dyn ScanDevice>,
    released: bool,
}

impl ScanSession {
    /// Acquire the device and begin scanning.
    pub fn start(device: Arc<dyn ScanDevice>) -> Result<Self, ScanError> {
        device.start()?;
        debug!("scan session started");
        Ok(Self { device, released: false })
    }

    /// Stop scanning and release the device.
    pub fn stop(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if !self.released {
            self.released = true;
            self.device.stop();
            debug!("scan session released");
        } else {
            warn!("scan session released twice");
        }
    }
}

impl std::fmt::Debug for ScanSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScanSession")
            .field("released", &self.released)
            .finish_non_exhaustive()
    }
}

impl Drop for ScanSession {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

    #[derive(Default)]
    struct FakeCamera {
        active: AtomicBool,
        stops: AtomicU32,
    }

    impl ScanDevice for FakeCamera {
        fn start(&self) -> Result<(), ScanError> {
            if self.active.swap(true, Ordering::SeqCst) {
                return Err(ScanError::AlreadyActive);
            }
            Ok(())
        }

        fn stop(&self) {
            self.active.store(false, Ordering::SeqCst);
            self.stops.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn explicit_stop_releases_the_device() {
        let camera = Arc::new(FakeCamera::default());
        let session = ScanSession::start(camera.clone()).unwrap();
        session.stop();
        assert!(!camera.active.load(Ordering::SeqCst));
        assert_eq!(camera.stops.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn drop_releases_the_device() {
        let camera = Arc::new(FakeCamera::default());
        {
            let _session = ScanSession::start(camera.clone()).unwrap();
            // simulated teardown without an explicit stop
        }
        assert!(!camera.active.load(Ordering::SeqCst));
        assert_eq!(camera.stops.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn stop_is_called_exactly_once_per_session() {
        let camera = Arc::new(FakeCamera::default());
        let session = ScanSession::start(camera.clone()).unwrap();
        session.stop();
        // session consumed; only the drop-after-stop path remains, which
        // must not double-release.
        assert_eq!(camera.stops.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn second_concurrent_start_is_refused() {
        let camera = Arc::new(FakeCamera::default());
        let first = ScanSession::start(camera.clone()).unwrap();
        let err = ScanSession::start(camera.clone()).unwrap_err();
        assert!(matches!(err, ScanError::AlreadyActive));
        // The failed second start must not have released the first session.
        assert!(camera.active.load(Ordering::SeqCst));
        drop(first);
        assert!(!camera.active.load(Ordering::SeqCst));
    }

    #[test]
    fn device_can_be_reacquired_after_release() {
        let camera = Arc::new(FakeCamera::default());
        ScanSession::start(camera.clone()).unwrap().stop();
        let again = ScanSession::start(camera.clone());
        assert!(again.is_ok());
    }
}
