//! `spec.md` §4.4 "Handshake state machine" and its supporting pieces
//! (§4.1's wire framing at the message level, §4.4's key exchange
//! branches, §4.4's key schedule, §3.1's buffered transcript). This crate
//! owns everything between a parsed TLS record and a negotiated
//! `Session`; it does not drive I/O itself — `spec.md` §1 scopes
//! "buffered I/O abstractions" out, and `tls_engine::ServerConnection` (the
//! root facade crate) is the one place that reads/writes a transport and
//! sequences these pieces into the state diagram of §4.4.

pub mod client_hello;
pub mod error;
pub mod finished;
pub mod kex;
pub mod key_schedule;
pub mod message;
pub mod prf;
pub mod record;
pub mod server_hello;
pub mod session_cache;
pub mod state;
pub mod transcript;

pub use client_hello::{select_cipher_suite, ClientHello};
pub use error::{HandshakeError, Result};
pub use finished::{compute_finished, CLIENT_LABEL, SERVER_LABEL, VERIFY_DATA_LEN};
pub use key_schedule::{derive_gcm_key_block, derive_master_secret, GcmKeyBlock, MASTER_SECRET_LEN};
pub use message::{read_handshake_message, write_handshake_message, HandshakeMessage};
pub use record::{DirectionState, GcmDirection, RecordLayer};
pub use server_hello::{build_server_hello_body, is_downgrade, make_server_random};
pub use session_cache::SessionCache;
pub use state::ServerState;
pub use transcript::Transcript;
