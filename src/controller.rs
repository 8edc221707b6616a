//! The status-synchronized controller for the casting service.
//!
//! Holds the last fetched status snapshot and keeps it aligned with
//! server-reported truth: every mutating action is followed by an
//! unconditional status refresh once the action's response is in.

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::Error;
use crate::models::{ServiceStatus, Toast};

/// The remote procedure surface of the casting service.
///
/// `start` and `stop` report plain success or failure; a `false` answer is a
/// routine outcome, not a transport error. Only `status` distinguishes a
/// transport failure from a negative answer.
#[async_trait]
pub trait CastService: Send + Sync {
    /// Starts the casting service.
    async fn start(&self) -> bool;
    /// Stops the casting service.
    async fn stop(&self) -> bool;
    /// Queries the current service status.
    async fn status(&self) -> Result<ServiceStatus, Error>;
}

/// The host-side presentation surface.
pub trait HostNotifier: Send + Sync {
    /// Asks the host UI to display a transient notification.
    fn toast(&self, toast: Toast);
    /// Tells the host UI that a fresh status snapshot is available.
    fn status_changed(&self, status: &ServiceStatus);
}

/// Tracks the casting service through a local copy of its last reported
/// status.
pub struct CastController<S> {
    service: S,
    status: Mutex<Option<ServiceStatus>>,
}

impl<S: CastService> CastController<S> {
    pub fn new(service: S) -> Self {
        Self {
            service,
            status: Mutex::new(None),
        }
    }

    /// The underlying remote service surface.
    pub fn service(&self) -> &S {
        &self.service
    }

    /// Returns the last fetched status, or `None` when no refresh has
    /// succeeded yet.
    pub async fn last_known(&self) -> Option<ServiceStatus> {
        self.status.lock().await.clone()
    }

    /// Starts the casting service and re-synchronizes the local status.
    ///
    /// The outcome is surfaced as a toast; the refresh runs either way, so the
    /// returned snapshot reflects post-action server truth rather than the
    /// action's boolean.
    pub async fn start(&self, host: &impl HostNotifier) -> Option<ServiceStatus> {
        let started = self.service.start().await;
        host.toast(if started {
            Toast::cast_started()
        } else {
            Toast::start_failed()
        });
        self.refresh_status(host).await
    }

    /// Stops the casting service and re-synchronizes the local status.
    pub async fn stop(&self, host: &impl HostNotifier) -> Option<ServiceStatus> {
        let stopped = self.service.stop().await;
        host.toast(if stopped {
            Toast::cast_stopped()
        } else {
            Toast::stop_failed()
        });
        self.refresh_status(host).await
    }

    /// Queries the service manager and replaces the local status wholesale.
    ///
    /// A failed query leaves the previous snapshot untouched (including the
    /// absent one); the failure is logged and surfaced as a toast.
    pub async fn refresh_status(&self, host: &impl HostNotifier) -> Option<ServiceStatus> {
        match self.service.status().await {
            Ok(status) => {
                *self.status.lock().await = Some(status.clone());
                host.status_changed(&status);
                Some(status)
            }
            Err(e) => {
                log::error!("Failed to query casting service status: {}", e);
                host.toast(Toast::status_failed());
                self.last_known().await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex as StdMutex;

    #[derive(Default)]
    struct RecordingHost {
        toasts: StdMutex<Vec<Toast>>,
        status_events: StdMutex<Vec<ServiceStatus>>,
    }

    impl RecordingHost {
        fn toast_titles(&self) -> Vec<String> {
            self.toasts
                .lock()
                .unwrap()
                .iter()
                .map(|t| t.title.clone())
                .collect()
        }
    }

    impl HostNotifier for RecordingHost {
        fn toast(&self, toast: Toast) {
            self.toasts.lock().unwrap().push(toast);
        }

        fn status_changed(&self, status: &ServiceStatus) {
            self.status_events.lock().unwrap().push(status.clone());
        }
    }

    /// Plays back queued responses and records the order of remote calls.
    #[derive(Default)]
    struct ScriptedService {
        start_results: StdMutex<VecDeque<bool>>,
        stop_results: StdMutex<VecDeque<bool>>,
        status_results: StdMutex<VecDeque<Result<ServiceStatus, Error>>>,
        calls: StdMutex<Vec<&'static str>>,
    }

    impl ScriptedService {
        fn queue_start(&self, result: bool) {
            self.start_results.lock().unwrap().push_back(result);
        }

        fn queue_stop(&self, result: bool) {
            self.stop_results.lock().unwrap().push_back(result);
        }

        fn queue_status(&self, result: Result<ServiceStatus, Error>) {
            self.status_results.lock().unwrap().push_back(result);
        }

        fn calls(&self) -> Vec<&'static str> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CastService for ScriptedService {
        async fn start(&self) -> bool {
            self.calls.lock().unwrap().push("start");
            self.start_results.lock().unwrap().pop_front().unwrap()
        }

        async fn stop(&self) -> bool {
            self.calls.lock().unwrap().push("stop");
            self.stop_results.lock().unwrap().pop_front().unwrap()
        }

        async fn status(&self) -> Result<ServiceStatus, Error> {
            self.calls.lock().unwrap().push("status");
            self.status_results.lock().unwrap().pop_front().unwrap()
        }
    }

    fn inactive() -> ServiceStatus {
        ServiceStatus {
            running: false,
            enabled: true,
            service: "playercast".to_string(),
            state: "inactive".to_string(),
        }
    }

    fn active() -> ServiceStatus {
        ServiceStatus {
            running: true,
            enabled: true,
            service: "playercast".to_string(),
            state: "active".to_string(),
        }
    }

    fn transport_error() -> Error {
        Error::Systemd("connection refused".to_string())
    }

    #[tokio::test]
    async fn initial_refresh_populates_absent_status() {
        let service = ScriptedService::default();
        service.queue_status(Ok(inactive()));
        let controller = CastController::new(service);
        let host = RecordingHost::default();

        assert_eq!(controller.last_known().await, None);
        let status = controller.refresh_status(&host).await;

        assert_eq!(status, Some(inactive()));
        assert_eq!(controller.last_known().await, Some(inactive()));
        assert_eq!(host.status_events.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn start_success_toasts_then_refreshes() {
        let service = ScriptedService::default();
        service.queue_start(true);
        service.queue_status(Ok(active()));
        let controller = CastController::new(service);
        let host = RecordingHost::default();

        let status = controller.start(&host).await;

        assert_eq!(controller.service().calls(), vec!["start", "status"]);
        assert_eq!(host.toast_titles(), vec!["Chromecast started"]);
        let toasts = host.toasts.lock().unwrap();
        assert!(toasts[0].body.contains("ready for casting"));
        assert_eq!(status, Some(active()));
    }

    #[tokio::test]
    async fn start_failure_toasts_and_still_refreshes() {
        let service = ScriptedService::default();
        service.queue_start(false);
        service.queue_status(Ok(inactive()));
        let controller = CastController::new(service);
        let host = RecordingHost::default();

        controller.start(&host).await;

        assert_eq!(controller.service().calls(), vec!["start", "status"]);
        assert_eq!(host.toast_titles(), vec!["Failed to start"]);
        assert_eq!(controller.last_known().await, Some(inactive()));
    }

    #[tokio::test]
    async fn failed_refresh_keeps_previous_status() {
        let service = ScriptedService::default();
        service.queue_status(Ok(active()));
        service.queue_status(Err(transport_error()));
        let controller = CastController::new(service);
        let host = RecordingHost::default();

        controller.refresh_status(&host).await;
        let status = controller.refresh_status(&host).await;

        assert_eq!(status, Some(active()));
        assert_eq!(controller.last_known().await, Some(active()));
        assert_eq!(host.toast_titles(), vec!["Failed to get casting service status"]);
        // No re-render for a failed refresh, only for fresh snapshots.
        assert_eq!(host.status_events.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn failed_refresh_with_no_prior_status_stays_absent() {
        let service = ScriptedService::default();
        service.queue_status(Err(transport_error()));
        let controller = CastController::new(service);
        let host = RecordingHost::default();

        let status = controller.refresh_status(&host).await;

        assert_eq!(status, None);
        assert_eq!(controller.last_known().await, None);
        assert_eq!(host.toast_titles(), vec!["Failed to get casting service status"]);
    }

    #[tokio::test]
    async fn repeated_stops_each_toast_and_refresh() {
        let service = ScriptedService::default();
        service.queue_stop(true);
        service.queue_stop(true);
        service.queue_status(Ok(inactive()));
        service.queue_status(Ok(inactive()));
        let controller = CastController::new(service);
        let host = RecordingHost::default();

        controller.stop(&host).await;
        controller.stop(&host).await;

        assert_eq!(
            controller.service().calls(),
            vec!["stop", "status", "stop", "status"]
        );
        assert_eq!(
            host.toast_titles(),
            vec!["Chromecast stopped", "Chromecast stopped"]
        );
    }

    #[tokio::test]
    async fn casting_session_round_trip() {
        let service = ScriptedService::default();
        service.queue_status(Ok(inactive()));
        service.queue_start(true);
        service.queue_status(Ok(active()));
        let controller = CastController::new(service);
        let host = RecordingHost::default();

        controller.refresh_status(&host).await;
        assert_eq!(controller.last_known().await, Some(inactive()));

        let status = controller.start(&host).await;

        assert_eq!(host.toast_titles(), vec!["Chromecast started"]);
        assert_eq!(status, Some(active()));
        assert!(controller.last_known().await.unwrap().running);
    }

    #[tokio::test]
    async fn stop_with_backend_down_keeps_stale_status() {
        let service = ScriptedService::default();
        service.queue_status(Ok(active()));
        service.queue_stop(false);
        service.queue_status(Err(transport_error()));
        let controller = CastController::new(service);
        let host = RecordingHost::default();

        controller.refresh_status(&host).await;
        let status = controller.stop(&host).await;

        assert_eq!(
            host.toast_titles(),
            vec!["Failed to stop", "Failed to get casting service status"]
        );
        assert_eq!(status, Some(active()));
        assert!(controller.last_known().await.unwrap().running);
    }
}
