//! Local development server.
//!
//! Stands in for the streaming backend while working on the web client:
//! - serves the built output directory
//! - renders the HTML shell with mock data substituted for its tokens
//! - answers the backend's JSON API from fixed mock payloads
//! - accepts a minimal WebSocket connection
//!
//! Nothing here persists or talks to a real backend.

pub mod mock;
pub mod routes;
pub mod server;
pub mod shell;
pub mod state;
pub mod static_files;
pub mod ws;

pub use mock::{MockConfig, MockData, MockStatus};
pub use routes::{resolve_route, Handler, Matcher, Route, RouteTable};
pub use server::DevServer;
pub use state::DevState;
pub use ws::{ClientMessage, ServerMessage};
