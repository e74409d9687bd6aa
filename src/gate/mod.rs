//! Route gate: decides, per navigation, whether to show a spinner, the not-found
//! page, the password prompt, or the page itself.

pub mod client;
pub mod machine;

pub use client::{HttpSessionClient, SessionClient};
pub use machine::{GateMachine, GatePhase, GateView, NavigationStep, Submission, Ticket};

use std::{
    future::Future,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use crate::{error::GateError, registry::RouteRegistry};

/// GateSettings
#[derive(Debug, Clone)]
pub struct GateSettings {
    /// Upper bound for each verifier/issuer call. Expiry counts as a failure.
    pub request_timeout: Duration,
}

impl Default for GateSettings {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(5),
        }
    }
}

/// RouteGate
///
/// Drives a [`GateMachine`] with a [`SessionClient`]. All methods take `&self`, so a
/// gate can be shared (e.g. behind an `Arc`) while calls are in flight; a newer
/// navigation always wins over the result of an older one.
pub struct RouteGate<C> {
    machine: Mutex<GateMachine>,
    client: C,
    settings: GateSettings,
}

impl<C: SessionClient> RouteGate<C> {
    pub fn new(registry: Arc<RouteRegistry>, client: C) -> Self {
        Self {
            machine: Mutex::new(GateMachine::new(registry)),
            client,
            settings: GateSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: GateSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    // The machine never panics mid-update, so a poisoned lock still holds a usable state.
    fn machine(&self) -> MutexGuard<'_, GateMachine> {
        self.machine.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// navigate
    ///
    /// Handles a path change. Public and unknown paths settle immediately; protected
    /// paths ask the verifier once. Returns the phase after this navigation's work,
    /// which is the newer navigation's phase if this one was superseded meanwhile.
    pub async fn navigate(&self, path: &str) -> GatePhase {
        let step = self.machine().begin_navigation(path);
        let ticket = match step {
            NavigationStep::Settled(phase) => return phase,
            NavigationStep::Verify(ticket) => ticket,
        };

        let outcome = self.bounded(self.client.verify()).await;

        let mut machine = self.machine();
        machine.complete_verification(ticket, outcome);
        machine.phase().clone()
    }

    pub fn set_password(&self, value: impl Into<String>) {
        self.machine().set_password(value);
    }

    /// submit_password
    ///
    /// Sends the typed password to the issuer. No-op while the prompt is not showing
    /// or a submission is already pending.
    pub async fn submit_password(&self) -> GatePhase {
        let submission = self.machine().begin_submit();
        let Some(Submission { ticket, password }) = submission else {
            return self.phase();
        };

        let outcome = self.bounded(self.client.authenticate(&password)).await;

        let mut machine = self.machine();
        machine.complete_submission(ticket, outcome);
        machine.phase().clone()
    }

    pub fn phase(&self) -> GatePhase {
        self.machine().phase().clone()
    }

    pub fn view(&self) -> GateView {
        self.machine().view()
    }

    async fn bounded<T>(&self, call: impl Future<Output = Result<T, GateError>>) -> Result<T, GateError> {
        match tokio::time::timeout(self.settings.request_timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(GateError::Timeout),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Notify;

    const SECRET_PAGE: &str = "/work/automate-design-handovers-with-a-figma-to-code-pipeline";

    /// Behaves like the real endpoints: one accepted password, a session flag that
    /// flips on success.
    struct FakeSessions {
        accepted: String,
        signed_in: Mutex<bool>,
        verify_calls: AtomicUsize,
        authenticate_calls: AtomicUsize,
    }

    impl FakeSessions {
        fn new(accepted: &str) -> Arc<Self> {
            Arc::new(Self {
                accepted: accepted.to_string(),
                signed_in: Mutex::new(false),
                verify_calls: AtomicUsize::new(0),
                authenticate_calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl SessionClient for FakeSessions {
        async fn verify(&self) -> Result<bool, GateError> {
            self.verify_calls.fetch_add(1, Ordering::SeqCst);
            Ok(*self.signed_in.lock().unwrap())
        }

        async fn authenticate(&self, password: &str) -> Result<(), GateError> {
            self.authenticate_calls.fetch_add(1, Ordering::SeqCst);
            if password == self.accepted {
                *self.signed_in.lock().unwrap() = true;
                Ok(())
            } else {
                Err(GateError::IncorrectPassword)
            }
        }
    }

    /// Verifier that answers only when released.
    struct HeldVerifier {
        started: Notify,
        release: Notify,
    }

    #[async_trait]
    impl SessionClient for HeldVerifier {
        async fn verify(&self) -> Result<bool, GateError> {
            self.started.notify_one();
            self.release.notified().await;
            Ok(true)
        }

        async fn authenticate(&self, _password: &str) -> Result<(), GateError> {
            Ok(())
        }
    }

    /// Never answers.
    struct Unresponsive;

    #[async_trait]
    impl SessionClient for Unresponsive {
        async fn verify(&self) -> Result<bool, GateError> {
            std::future::pending().await
        }

        async fn authenticate(&self, _password: &str) -> Result<(), GateError> {
            std::future::pending().await
        }
    }

    fn registry() -> Arc<RouteRegistry> {
        Arc::new(RouteRegistry::portfolio())
    }

    #[tokio::test]
    async fn public_pages_skip_the_verifier() {
        let sessions = FakeSessions::new("letmein");
        let gate = RouteGate::new(registry(), sessions.clone());

        for path in ["/", "/about", "/blog/some-post", "/contact"] {
            assert_eq!(gate.navigate(path).await, GatePhase::Authenticated);
        }
        assert_eq!(sessions.verify_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn unknown_pages_are_not_found() {
        let sessions = FakeSessions::new("letmein");
        let gate = RouteGate::new(registry(), sessions.clone());

        assert_eq!(gate.navigate("/admin").await, GatePhase::NotFound);
        assert_eq!(gate.view(), GateView::NotFound);
        assert_eq!(sessions.verify_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn unlock_flow() {
        let sessions = FakeSessions::new("letmein");
        let gate = RouteGate::new(registry(), sessions.clone());

        assert!(matches!(
            gate.navigate(SECRET_PAGE).await,
            GatePhase::PasswordRequired { error: None, .. }
        ));

        gate.set_password("wrong");
        assert_eq!(
            gate.submit_password().await,
            GatePhase::PasswordRequired {
                error: Some(GateError::IncorrectPassword),
                submitting: false,
            }
        );

        gate.set_password("letmein");
        assert_eq!(gate.submit_password().await, GatePhase::Authenticated);
        assert_eq!(sessions.authenticate_calls.load(Ordering::SeqCst), 2);

        // Coming back later re-verifies and finds the session.
        gate.navigate("/about").await;
        assert_eq!(gate.navigate(SECRET_PAGE).await, GatePhase::Authenticated);
        assert_eq!(sessions.verify_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn stale_verification_does_not_overwrite_newer_navigation() {
        let held = Arc::new(HeldVerifier {
            started: Notify::new(),
            release: Notify::new(),
        });
        let gate = Arc::new(RouteGate::new(registry(), held.clone()));

        let pending = {
            let gate = gate.clone();
            tokio::spawn(async move { gate.navigate(SECRET_PAGE).await })
        };
        held.started.notified().await;
        assert_eq!(gate.view(), GateView::Loading);

        assert_eq!(gate.navigate("/missing").await, GatePhase::NotFound);
        held.release.notify_one();

        assert_eq!(pending.await.unwrap(), GatePhase::NotFound);
        assert_eq!(gate.phase(), GatePhase::NotFound);
    }

    #[tokio::test]
    async fn timeouts_fail_closed() {
        let gate = RouteGate::new(registry(), Unresponsive).with_settings(GateSettings {
            request_timeout: Duration::from_millis(20),
        });

        assert_eq!(
            gate.navigate(SECRET_PAGE).await,
            GatePhase::PasswordRequired {
                error: None,
                submitting: false,
            }
        );

        gate.set_password("anything");
        assert_eq!(
            gate.submit_password().await,
            GatePhase::PasswordRequired {
                error: Some(GateError::Timeout),
                submitting: false,
            }
        );
        match gate.view() {
            GateView::PasswordPrompt { password, error } => {
                assert_eq!(password, "anything");
                assert_ne!(error, Some("Incorrect password"));
            }
            other => panic!("unexpected view {other:?}"),
        }
    }

    #[tokio::test]
    async fn submit_outside_prompt_is_a_no_op() {
        let sessions = FakeSessions::new("letmein");
        let gate = RouteGate::new(registry(), sessions.clone());

        gate.navigate("/about").await;
        assert_eq!(gate.submit_password().await, GatePhase::Authenticated);
        assert_eq!(sessions.authenticate_calls.load(Ordering::SeqCst), 0);
    }
}
