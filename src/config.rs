//! `spec.md` §3.3/§3.6/§5 "Server configuration": the caller-assembled
//! bundle of negotiable parameters, key material, and collaborators
//! (`CertStore`, `ServerSigningKey`, `SessionCache`) a [`crate::ServerConnection`]
//! is built from. Grounded in the teacher's `brontide::machine::Machine::new`
//! taking a flat bag of caller-supplied key material rather than a builder
//! with setters — this workspace keeps that same "plain struct, public
//! fields" shape since every field here is required before a connection can
//! accept anything.

use std::sync::{Arc, RwLock};

use primitives::{CertStore, DhParams, NamedCurve, ServerSigningKey};
use tls_types::{CipherSuite, ProtocolVersion};

use handshake::SessionCache;
use ticket::TicketKeyRing;

/// `spec.md` §4.4 "CertificateRequest": configuration for optional or
/// required client certificate authentication. Kept distinct from the
/// server's own certificate/signing key since a server that never
/// requests client auth need not supply one.
pub struct ClientAuthConfig {
    pub required: bool,
    pub cert_store: Arc<dyn CertStore + Send + Sync>,
    /// Resolves an opaque leaf certificate (the first entry of the
    /// client's `Certificate` chain) into a verification key. X.509
    /// parsing is out of scope (`spec.md` §1), so the caller supplies
    /// this the same way it supplies `CertStore` itself.
    pub resolve_peer_key: Arc<dyn Fn(&[u8]) -> Option<Arc<dyn primitives::PeerVerifyKey + Send + Sync>> + Send + Sync>,
}

/// A finite-field DH group the server offers for DHE suites, stored as
/// the raw big-endian `(p, g)` bytes rather than a `DhParams` since a
/// `ServerConfig` is shared across many connections and `DhParams`
/// carries no `Clone` impl of its own (`primitives::bigint`).
pub struct DheGroup {
    pub p: Vec<u8>,
    pub g: Vec<u8>,
}

impl DheGroup {
    /// RFC 7919 `ffdhe2048`, a reasonable default for callers that don't
    /// care to pick their own group.
    pub fn ffdhe2048() -> Self {
        const P: &str = "\
FFFFFFFFFFFFFFFFADF85458A2BB4A9AAFDC5620273D3CF1D8B9C583CE2D3695A9E13641146433FBCC939DCE249B3EF97D2FE363630C75D8F681B202AEC4617AD3DF1ED5D5FD65612433F51F5F066ED0856365553DED1AF3B557135E7F57C935984F0C70E0E68B77E2A689DAF3EFE8721DF158A136ADE73530ACCA4F483A797ABC0AB182B324FB61D108A94BB2C8E3FBB96ADAB760D7F4681D4F42A3DE394DF4AE56EDE76372BB190B07A7C8EE0A6D709E02FCE1CDF7E2ECC03404CD28342F619172FE9CE98583FF8E4F1232EEF28183C3FE3B1B4C6FAD733BB5FCBC2EC22005C58EF1837D1683B2C6F34A26C1B2EFFA886B4238611FCFDCDE355B3B6519035BBC34F4DEF99C023861B46FC9D6E6C9077AD91D2691F7F7EE598CB0FAC186D91CAEFE130985139270B4130C93BC437944F4FD4452E2D74DD364F2E21E71F54BFF5CAE82AB9C9DF69EE86D2BC522363A0DABC521979B0DEADA1DBF9A42D5C4484E0ABCD06BFA53DDEF3C1B20EE3FD59D7C25E41D2B66C62E37FFFFFFFFFFFFFFFF";
        DheGroup { p: hex::decode(P).expect("static hex literal"), g: vec![2u8] }
    }

    pub fn params(&self) -> DhParams {
        DhParams::new(self.p.clone(), self.g.clone())
    }
}

/// Everything a [`crate::ServerConnection::accept`] needs to run a
/// handshake to completion. One `ServerConfig` is built once and shared
/// (via `&`, or `Arc` at the caller's option) across every connection a
/// listener accepts, mirroring how `spec.md` §5 describes the session
/// cache and ticket keys as process-wide state rather than per-connection.
pub struct ServerConfig {
    /// Offered in server-preference or client-preference order depending
    /// on `server_cipher_preference`; `spec.md` §4.4 "Cipher selection".
    pub cipher_suites: Vec<&'static CipherSuite>,
    pub server_cipher_preference: bool,
    pub min_version: ProtocolVersion,
    pub max_version: ProtocolVersion,

    /// Leaf certificate first, per `spec.md` §4.4 "full handshake
    /// continues": Certificate.
    pub certificate_chain: Vec<Vec<u8>>,
    pub signing_key: Arc<dyn ServerSigningKey + Send + Sync>,
    /// `None` disables every RSA-key-exchange suite in `cipher_suites`.
    /// Kept distinct from `signing_key`: RSA key exchange needs the raw
    /// private key to decrypt an `EncryptedPreMasterSecret`, not just the
    /// signing capability `ServerSigningKey` exposes (and an ECDSA- or
    /// DSA-signing server has no RSA key to decrypt with at all).
    pub rsa_decryption_key: Option<Arc<primitives::RsaPrivateKey>>,

    /// `None` disables every DHE suite in `cipher_suites` at selection
    /// time (`spec.md` §4.4 "server chooses a DH group").
    pub dhe_group: Option<DheGroup>,
    /// Preference order for ECDHE curve selection, highest preference first.
    pub ec_curve_preference: Vec<NamedCurve>,

    pub session_cache: Arc<dyn SessionCache + Send + Sync>,
    /// `None` disables session-ticket issuance entirely; the server still
    /// accepts `session_id`-based resumption regardless.
    pub ticket_keys: Option<Arc<RwLock<TicketKeyRing>>>,
    /// `spec.md` §4.5 "Issuance" step 1: hint carried in `NewSessionTicket`.
    pub ticket_lifetime_hint_secs: u32,
    /// `spec.md` §3.2 "absolute lifetime": how long a freshly established
    /// session (cache entry or ticket) remains resumable.
    pub session_lifetime_secs: u64,

    pub client_auth: Option<ClientAuthConfig>,

    /// Server's ALPN preference order; empty disables ALPN negotiation.
    pub alpn_protocols: Vec<Vec<u8>>,
    /// Server's NPN advertisement list; ignored whenever ALPN is also
    /// offered and the client sent both (`spec.md` §4.3, §9 Open Question).
    pub npn_protocols: Vec<Vec<u8>>,

    /// DER-encoded OCSP response to staple via `CertificateStatus`;
    /// `None` leaves `status_request` unacknowledged even if the client
    /// asked. Fetching/caching the response from a responder is out of
    /// scope (`spec.md` §1) — the caller refreshes this field itself.
    pub ocsp_response: Option<Vec<u8>>,

    /// SRTP protection profiles this server offers, preference order;
    /// empty disables `use_srtp` negotiation entirely.
    pub srtp_profiles: Vec<u16>,

    /// DTLS only: require a `HelloVerifyRequest` cookie round trip before
    /// processing a ClientHello (`spec.md` §4.4, §9 Open Question on DTLS
    /// scope — resolved in `DESIGN.md` to this single HMAC-checked cookie,
    /// not a full anti-replay/retransmission subsystem).
    pub dtls_cookie_exchange: bool,
    pub dtls_cookie_secret: [u8; 32],
}
