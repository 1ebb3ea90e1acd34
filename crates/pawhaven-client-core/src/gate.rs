//! Area layouts (admin / shelter) that only render once the session has been
//! re-validated

use std::sync::Arc;

use pawhaven_shared::{
    const_config::route::ROUTE_HOME,
    uac::{Role, RouteRequirement},
};
use tracing::{info, instrument};

use crate::{
    guard::authorize,
    session::{Identity, Session, SessionContext, SessionGeneration},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayoutArea {
    Admin,
    Shelter,
}

impl LayoutArea {
    pub fn requirement(&self) -> RouteRequirement {
        match self {
            LayoutArea::Admin => RouteRequirement::any_of([Role::Admin]),
            // A missing shelter id is not a reason to deny access
            LayoutArea::Shelter => RouteRequirement::any_of([Role::ShelterStaff]),
        }
    }
}

impl std::str::FromStr for LayoutArea {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "shelter" => Ok(Self::Shelter),
            other => anyhow::bail!("{other:?} is not a layout area. Use either `admin` or `shelter`"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum GateState {
    #[default]
    Checking,
    Authorized(Arc<Identity>),
    /// Holds the route being navigated to instead
    Redirecting(&'static str),
}

/// Re-checks the session every time the layout is mounted and renders nothing
/// until that check passes
#[derive(Debug)]
pub struct LayoutGate {
    area: LayoutArea,
    state: GateState,
}

impl LayoutGate {
    pub fn new(area: LayoutArea) -> Self {
        Self {
            area,
            state: GateState::Checking,
        }
    }

    pub fn area(&self) -> LayoutArea {
        self.area
    }

    pub fn state(&self) -> &GateState {
        &self.state
    }

    /// Runs the check for this mount. Nothing is carried over from earlier
    /// mounts
    ///
    /// The identity is re-derived from persisted storage, not taken from
    /// memory. Changes made to storage by other processes or tabs after this
    /// call are not noticed
    #[instrument(skip(session), fields(area = ?self.area))]
    pub fn mount(&mut self, session: &SessionContext) -> &GateState {
        self.state = GateState::Checking;
        let generation = session.generation();
        let rederived = session.rehydrate();
        self.settle(session, generation, rederived);
        &self.state
    }

    /// Decides on the re-derived session. The identity is only written back if
    /// no clear or login happened since `generation` was read
    fn settle(
        &mut self,
        session: &SessionContext,
        generation: SessionGeneration,
        rederived: Session,
    ) {
        let is_authorized = authorize(&rederived, &self.area.requirement());
        self.state = match rederived {
            Session::Authenticated(identity) if is_authorized => {
                match session.commit(generation, Arc::clone(&identity)) {
                    Ok(identity) => GateState::Authorized(identity),
                    Err(e) => {
                        info!(?e, "session changed while mounting, redirecting");
                        GateState::Redirecting(ROUTE_HOME)
                    }
                }
            }
            _ => {
                info!("layout access denied, redirecting");
                GateState::Redirecting(ROUTE_HOME)
            }
        };
    }

    /// Produces the children only when authorized
    pub fn render<T, F>(&self, children: F) -> Option<T>
    where
        F: FnOnce(&Identity) -> T,
    {
        match &self.state {
            GateState::Authorized(identity) => Some(children(identity)),
            GateState::Checking | GateState::Redirecting(_) => None,
        }
    }

    /// Where to navigate if the gate decided against rendering
    pub fn redirect_target(&self) -> Option<&'static str> {
        match self.state {
            GateState::Redirecting(target) => Some(target),
            GateState::Checking | GateState::Authorized(_) => None,
        }
    }
}
