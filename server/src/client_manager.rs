//! Session registry and player-role assignment for the game server
//!
//! This module tracks every admitted connection and owns the mapping from the
//! two player roles to the sessions that hold them:
//! - Session id allocation that never collides with a live session
//! - Role assignment in fixed priority order (odd before even)
//! - Reconciliation of sessions whose transport has already closed
//! - Idempotent release on disconnect
//!
//! The registry is owned by the server's authority task, so admission,
//! release and fullness checks are serialized simply by requiring `&mut self`.

use log::{debug, info};
use shared::Role;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::Instant;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;

/// Unique identifier assigned by the registry to each connection
pub type SessionId = u32;

/// Outbound queue drained by a connection's writer task
pub type Outbox = mpsc::Sender<Message>;

/// Represents one admitted connection
///
/// Each session keeps:
/// - Its identity and peer address for logging
/// - The role it plays, if any
/// - The sending half of its writer queue, which doubles as the liveness
///   signal: once the writer task exits the queue reports closed
#[derive(Debug)]
pub struct Session {
    /// Unique session identifier assigned by the registry
    pub id: SessionId,
    /// Remote address of the peer
    pub addr: SocketAddr,
    /// Role held by this session
    pub role: Option<Role>,
    /// When the session was admitted
    pub connected_at: Instant,
    sender: Outbox,
}

impl Session {
    /// Creates a session without a role
    pub fn new(id: SessionId, addr: SocketAddr, sender: Outbox) -> Self {
        Self {
            id,
            addr,
            role: None,
            connected_at: Instant::now(),
            sender,
        }
    }

    /// Returns true while the transport behind this session is still open
    pub fn is_live(&self) -> bool {
        !self.sender.is_closed()
    }

    pub fn outbox(&self) -> &Outbox {
        &self.sender
    }
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AdmissionError {
    /// Both roles are held by live sessions
    #[error("game is full")]
    GameFull,

    #[error("session {0} is already registered")]
    DuplicateSession(SessionId),
}

/// Manages admitted sessions and the two player roles
///
/// The ClientManager is the only component that mutates role assignment.
/// A role is handed to a new session only after its previous holder has been
/// released or found dead by [`ClientManager::reconcile`].
pub struct ClientManager {
    /// Admitted sessions indexed by their id
    clients: HashMap<SessionId, Session>,
    /// Current holder of each role
    roles: HashMap<Role, SessionId>,
    /// Next candidate id for a new connection
    next_client_id: SessionId,
}

impl Default for ClientManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientManager {
    /// Creates an empty registry
    ///
    /// Session ids start from 1 and increase for each new connection.
    pub fn new() -> Self {
        Self {
            clients: HashMap::new(),
            roles: HashMap::new(),
            next_client_id: 1,
        }
    }

    /// Reserves an id that no registered session currently uses
    ///
    /// Ids increase monotonically and wrap around to 1, skipping any id that
    /// is still registered.
    pub fn allocate_id(&mut self) -> SessionId {
        loop {
            let id = self.next_client_id;
            self.next_client_id = self.next_client_id.checked_add(1).unwrap_or(1);
            if !self.clients.contains_key(&id) {
                return id;
            }
        }
    }

    /// Removes every session whose transport has closed
    ///
    /// Roles held by purged sessions become unassigned. The purged sessions
    /// are returned so the caller can treat them as disconnects.
    pub fn reconcile(&mut self) -> Vec<Session> {
        let dead: Vec<SessionId> = self
            .clients
            .values()
            .filter(|session| !session.is_live())
            .map(|session| session.id)
            .collect();

        let mut purged = Vec::with_capacity(dead.len());
        for id in dead {
            if let Some(session) = self.release(id) {
                info!("Purged dead session {} ({})", session.id, session.addr);
                purged.push(session);
            }
        }
        purged
    }

    /// Admits a session and assigns it the first free role
    ///
    /// Dead sessions are reconciled first so their roles can be reclaimed.
    /// Roles are tried in `Role::ALL` order, so odd is always preferred over
    /// even when both are free. Returns `GameFull` when both roles are held by
    /// live sessions; the session is not registered in that case.
    pub fn admit(
        &mut self,
        id: SessionId,
        addr: SocketAddr,
        sender: Outbox,
    ) -> Result<Role, AdmissionError> {
        self.reconcile();

        if self.clients.contains_key(&id) {
            return Err(AdmissionError::DuplicateSession(id));
        }

        let role = Role::ALL
            .into_iter()
            .find(|role| !self.roles.contains_key(role))
            .ok_or(AdmissionError::GameFull)?;

        let mut session = Session::new(id, addr, sender);
        session.role = Some(role);
        self.roles.insert(role, id);
        self.clients.insert(id, session);

        info!("Session {} from {} assigned as {} player", id, addr, role);
        Ok(role)
    }

    /// Removes a session and frees its role
    ///
    /// Releasing an unknown or already released session is a no-op and
    /// returns None.
    pub fn release(&mut self, id: SessionId) -> Option<Session> {
        let session = self.clients.remove(&id)?;
        if let Some(role) = session.role {
            if self.roles.get(&role) == Some(&id) {
                self.roles.remove(&role);
            }
        }
        debug!("Released session {}", id);
        Some(session)
    }

    /// Returns true iff both roles are held by live sessions
    pub fn both_roles_filled(&self) -> bool {
        Role::ALL.iter().all(|&role| {
            self.occupant(role)
                .and_then(|id| self.clients.get(&id))
                .is_some_and(Session::is_live)
        })
    }

    /// Number of roles currently held by live sessions
    pub fn active_players(&self) -> usize {
        Role::ALL
            .iter()
            .filter_map(|&role| self.occupant(role))
            .filter_map(|id| self.clients.get(&id))
            .filter(|session| session.is_live())
            .count()
    }

    /// Session currently holding `role`
    pub fn occupant(&self, role: Role) -> Option<SessionId> {
        self.roles.get(&role).copied()
    }

    pub fn role_of(&self, id: SessionId) -> Option<Role> {
        self.clients.get(&id).and_then(|session| session.role)
    }

    pub fn get(&self, id: SessionId) -> Option<&Session> {
        self.clients.get(&id)
    }

    pub fn sessions(&self) -> impl Iterator<Item = &Session> {
        self.clients.values()
    }

    /// Returns the number of registered sessions
    pub fn len(&self) -> usize {
        self.clients.len()
    }

    /// Returns true if no sessions are registered
    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}
