// Route guards for the admin, provider, and user sections
// Each guard consumes the session snapshot and produces exactly one outcome
// per evaluation: render, redirect, or a placeholder. Redirects are side
// effects issued once per qualifying state entry, never once per render.

use crate::auth::policy::{authorize, home_route, AccessDecision, RouteClass, LOGIN_ROUTE};
use crate::auth::session::SessionSnapshot;

/// Protected top-level section of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Admin,
    Provider,
    User,
}

impl Section {
    pub fn route_class(self) -> RouteClass {
        match self {
            Section::Admin => RouteClass::AdminScoped,
            Section::Provider => RouteClass::ProviderScoped,
            Section::User => RouteClass::UserScoped,
        }
    }
}

/// Where the guard state machine currently sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardState {
    /// Session still hydrating; no decision can be made yet.
    Initializing,
    /// Mid-logout grace window; redirects are suppressed so the in-flight
    /// navigation to the landing page wins.
    LoggingOut,
    Unauthenticated,
    WrongRole,
    Authorized,
}

/// The single outcome of one guard evaluation. Render and Redirect are
/// mutually exclusive by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// Show the loading / redirecting placeholder.
    Loading,
    /// Render the section shell and its children.
    Render,
    /// Navigate away. Issued at most once per state entry.
    Redirect(&'static str),
}

// Remembers the redirect already issued for the current state entry so a
// re-render of an unchanged state shows the placeholder instead of firing
// the navigation again.
#[derive(Debug, Default)]
struct RedirectLatch {
    issued: Option<&'static str>,
}

impl RedirectLatch {
    fn fire(&mut self, to: &'static str) -> GuardDecision {
        if self.issued == Some(to) {
            GuardDecision::Loading
        } else {
            self.issued = Some(to);
            GuardDecision::Redirect(to)
        }
    }

    fn clear(&mut self) {
        self.issued = None;
    }
}

/// Guard for one protected section, parameterized by the required role via
/// the shared policy table.
#[derive(Debug)]
pub struct RouteGuard {
    section: Section,
    latch: RedirectLatch,
}

impl RouteGuard {
    pub fn new(section: Section) -> Self {
        Self {
            section,
            latch: RedirectLatch::default(),
        }
    }

    /// Classify the snapshot without side effects.
    pub fn state(&self, snapshot: &SessionSnapshot) -> GuardState {
        if snapshot.loading {
            return GuardState::Initializing;
        }
        if snapshot.logging_out {
            return GuardState::LoggingOut;
        }
        if !snapshot.is_authenticated {
            return GuardState::Unauthenticated;
        }
        match authorize(self.section.route_class(), snapshot.user.as_ref()) {
            AccessDecision::Allow => GuardState::Authorized,
            // An authenticated flag without a readable principal fails
            // closed into the unauthenticated path.
            AccessDecision::ToLogin => GuardState::Unauthenticated,
            AccessDecision::ToHome(_) => GuardState::WrongRole,
        }
    }

    /// Evaluate the guard against the current snapshot. Called from the
    /// reactive effect whenever (loading, is_authenticated, user,
    /// logging_out) changes, and harmlessly on every re-render in between.
    pub fn evaluate(&mut self, snapshot: &SessionSnapshot) -> GuardDecision {
        match self.state(snapshot) {
            GuardState::Initializing | GuardState::LoggingOut => {
                self.latch.clear();
                GuardDecision::Loading
            }
            GuardState::Unauthenticated => self.latch.fire(LOGIN_ROUTE),
            GuardState::WrongRole => {
                let home = match authorize(self.section.route_class(), snapshot.user.as_ref()) {
                    AccessDecision::ToHome(home) => home,
                    _ => crate::auth::policy::USER_HOME,
                };
                self.latch.fire(home)
            }
            GuardState::Authorized => {
                self.latch.clear();
                GuardDecision::Render
            }
        }
    }
}

/// Inverse guard for the public auth pages (login, register,
/// forgot-password): an already-authenticated visitor is sent to their
/// role home instead of seeing the form again.
#[derive(Debug, Default)]
pub struct AuthPagesGuard {
    latch: RedirectLatch,
}

impl AuthPagesGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn evaluate(&mut self, snapshot: &SessionSnapshot) -> GuardDecision {
        if snapshot.loading {
            self.latch.clear();
            return GuardDecision::Loading;
        }
        if snapshot.logging_out {
            // The logout navigation targets the landing page; leave the
            // auth pages alone until the grace window closes.
            self.latch.clear();
            return GuardDecision::Render;
        }
        match snapshot.user.as_ref().filter(|_| snapshot.is_authenticated) {
            Some(user) => self.latch.fire(home_route(user)),
            None => {
                self.latch.clear();
                GuardDecision::Render
            }
        }
    }
}
