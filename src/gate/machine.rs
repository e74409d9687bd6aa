use std::sync::Arc;

use crate::{
    error::GateError,
    registry::{RouteAccess, RouteRegistry},
};

/// Monotonic id of a navigation. Bumped on every path change.
pub type NavigationId = u64;

/// Ticket
///
/// Handed out for each network call the gate starts. A completion is applied only if
/// its ticket still belongs to the current navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    navigation: NavigationId,
}

impl Ticket {
    pub fn navigation(&self) -> NavigationId {
        self.navigation
    }
}

/// GatePhase
///
/// Where the gate stands for the current path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatePhase {
    /// Resolution for the current path is still outstanding.
    Checking,
    NotFound,
    /// The path is protected and no valid session was found.
    PasswordRequired {
        /// Outcome of the last failed submission, if any.
        error: Option<GateError>,
        /// A submission is in flight.
        submitting: bool,
    },
    /// The gate is open: public path, or protected path with a valid session.
    Authenticated,
}

/// NavigationStep
///
/// What the caller has to do after starting a navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationStep {
    /// Decided locally from the registry; no network call needed.
    Settled(GatePhase),
    /// Protected path: ask the session verifier, then report back with the ticket.
    Verify(Ticket),
}

/// A password submission ready to be sent to the issuer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub ticket: Ticket,
    pub password: String,
}

/// GateView
///
/// The single thing to render for the current state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateView {
    Loading,
    NotFound,
    PasswordPrompt {
        password: String,
        error: Option<&'static str>,
    },
    Content {
        path: String,
    },
}

/// GateMachine
///
/// The route gate's state, free of any I/O. Network calls happen outside; their
/// results come back through `complete_*` together with the ticket they were started
/// with, and results for a superseded navigation are dropped.
#[derive(Debug)]
pub struct GateMachine {
    registry: Arc<RouteRegistry>,
    path: Option<String>,
    access: Option<RouteAccess>,
    navigation: NavigationId,
    phase: GatePhase,
    password: String,
}

impl GateMachine {
    pub fn new(registry: Arc<RouteRegistry>) -> Self {
        Self {
            registry,
            path: None,
            access: None,
            navigation: 0,
            phase: GatePhase::Checking,
            password: String::new(),
        }
    }

    pub fn phase(&self) -> &GatePhase {
        &self.phase
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    /// Whether the current path needs a session.
    pub fn protection_required(&self) -> bool {
        self.access == Some(RouteAccess::Protected)
    }

    pub fn current_navigation(&self) -> NavigationId {
        self.navigation
    }

    /// begin_navigation
    ///
    /// Starts a new navigation to `path`. The password field and any error from the
    /// previous page are reset, and earlier in-flight calls become stale.
    pub fn begin_navigation(&mut self, path: &str) -> NavigationStep {
        self.navigation += 1;
        self.path = Some(path.to_string());
        self.password.clear();

        let access = self.registry.resolve(path);
        self.access = Some(access);

        self.phase = match access {
            RouteAccess::Disabled => GatePhase::NotFound,
            RouteAccess::Public => GatePhase::Authenticated,
            RouteAccess::Protected => GatePhase::Checking,
        };
        tracing::debug!(path, navigation = self.navigation, ?access, "navigation started");

        match access {
            RouteAccess::Protected => NavigationStep::Verify(self.ticket()),
            _ => NavigationStep::Settled(self.phase.clone()),
        }
    }

    /// complete_verification
    ///
    /// Applies the verifier's answer. Any failure counts as "no session".
    /// Returns `false` when the answer was stale and ignored.
    pub fn complete_verification(
        &mut self,
        ticket: Ticket,
        outcome: Result<bool, GateError>,
    ) -> bool {
        if !self.is_current(ticket) || self.phase != GatePhase::Checking {
            tracing::debug!(
                navigation = ticket.navigation,
                current = self.navigation,
                "dropping stale session check"
            );
            return false;
        }

        let authenticated = match outcome {
            Ok(authenticated) => authenticated,
            Err(err) => {
                tracing::warn!(error = %err, "session check failed, treating as signed out");
                false
            }
        };

        self.phase = if authenticated {
            GatePhase::Authenticated
        } else {
            GatePhase::PasswordRequired {
                error: None,
                submitting: false,
            }
        };
        true
    }

    /// Updates the password field. Ignored unless the prompt is showing.
    pub fn set_password(&mut self, value: impl Into<String>) {
        if matches!(self.phase, GatePhase::PasswordRequired { .. }) {
            self.password = value.into();
        }
    }

    /// begin_submit
    ///
    /// Marks a submission as in flight and returns what to send. `None` when the
    /// prompt is not showing or a submission is already pending.
    pub fn begin_submit(&mut self) -> Option<Submission> {
        let ticket = self.ticket();
        match &mut self.phase {
            GatePhase::PasswordRequired { submitting, .. } if !*submitting => {
                *submitting = true;
                Some(Submission {
                    ticket,
                    password: self.password.clone(),
                })
            }
            _ => None,
        }
    }

    /// complete_submission
    ///
    /// Applies the issuer's answer. On failure the prompt stays, the typed password is
    /// kept, and the error is recorded. Returns `false` for stale answers.
    pub fn complete_submission(&mut self, ticket: Ticket, outcome: Result<(), GateError>) -> bool {
        let pending = matches!(
            self.phase,
            GatePhase::PasswordRequired {
                submitting: true,
                ..
            }
        );
        if !self.is_current(ticket) || !pending {
            tracing::debug!(navigation = ticket.navigation, "dropping stale submission result");
            return false;
        }

        self.phase = match outcome {
            Ok(()) => {
                self.password.clear();
                GatePhase::Authenticated
            }
            Err(err) => {
                if err != GateError::IncorrectPassword {
                    tracing::warn!(error = %err, "password submission failed");
                }
                GatePhase::PasswordRequired {
                    error: Some(err),
                    submitting: false,
                }
            }
        };
        true
    }

    pub fn view(&self) -> GateView {
        match &self.phase {
            GatePhase::Checking => GateView::Loading,
            GatePhase::NotFound => GateView::NotFound,
            GatePhase::PasswordRequired { error, .. } => GateView::PasswordPrompt {
                password: self.password.clone(),
                error: error.as_ref().map(GateError::user_message),
            },
            GatePhase::Authenticated => GateView::Content {
                path: self.path.clone().unwrap_or_default(),
            },
        }
    }

    fn ticket(&self) -> Ticket {
        Ticket {
            navigation: self.navigation,
        }
    }

    fn is_current(&self, ticket: Ticket) -> bool {
        ticket.navigation == self.navigation
    }
}
