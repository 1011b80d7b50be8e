//! WebSocket layer: connection handling, message routing, room membership.
//!
//! The WebSocket endpoint at `/ws` delivers push events for the per-user
//! rooms (`user_<uuid>`) a client has joined. Clients join their own room
//! after connecting; a provider's dashboard may additionally join the
//! rooms of the accounts it manages.

pub mod connection;
pub mod handler;
pub mod messages;
pub mod subscription;
