//! `spec.md` §6.1: `Cache::lookup(session_id)`, `Cache::insert(session)`,
//! `Cache::remove(session_id)`. `spec.md` §5: "process-wide and must
//! permit concurrent readers and serialized writers ... at-most-once
//! insertion semantics". Like `primitives::CertStore`, this ships only
//! the trait boundary — the concrete `RwLock<HashMap<...>>` table lives
//! in the facade crate that owns process-wide state.

use tls_types::SharedSession;

pub trait SessionCache {
    fn lookup(&self, session_id: &[u8]) -> Option<SharedSession>;

    /// Inserts a freshly established session, keyed by its own
    /// `session_id`. `spec.md` §5 "at-most-once insertion semantics": a
    /// second insert under the same id replaces rather than duplicates,
    /// the caller never observes two live entries for one id.
    fn insert(&self, session: SharedSession);

    fn remove(&self, session_id: &[u8]);
}
