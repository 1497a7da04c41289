//! `spec.md` §5 "process-wide and must permit concurrent readers and
//! serialized writers ... at-most-once insertion semantics". The trait
//! itself lives in `handshake::session_cache`; this is the one concrete
//! table this workspace ships, the same way `ticket::TicketKeyRing` is the
//! one concrete key-rotation table — a caller is free to substitute a
//! distributed cache behind the same trait.

use std::collections::HashMap;
use std::sync::RwLock;

use handshake::SessionCache;
use tls_types::SharedSession;

#[derive(Default)]
pub struct InMemorySessionCache {
    table: RwLock<HashMap<Vec<u8>, SharedSession>>,
}

impl InMemorySessionCache {
    pub fn new() -> Self {
        InMemorySessionCache { table: RwLock::new(HashMap::new()) }
    }
}

impl SessionCache for InMemorySessionCache {
    fn lookup(&self, session_id: &[u8]) -> Option<SharedSession> {
        self.table.read().expect("session cache lock poisoned").get(session_id).cloned()
    }

    fn insert(&self, session: SharedSession) {
        // `spec.md` §5 "at-most-once insertion semantics": `HashMap::insert`
        // already replaces any prior entry under the same key.
        self.table.write().expect("session cache lock poisoned").insert(session.session_id.clone(), session);
    }

    fn remove(&self, session_id: &[u8]) {
        self.table.write().expect("session cache lock poisoned").remove(session_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tls_types::{CipherSuite, ProtocolVersion, Session, VerifyResult};

    fn sample(id: &[u8]) -> SharedSession {
        let suite = CipherSuite::by_id(0xC02F).unwrap();
        SharedSession::new(Session {
            session_id: id.to_vec(),
            master_secret: [0u8; 48],
            cipher_suite: suite,
            protocol_version: ProtocolVersion::TLS1_2,
            peer_certificate: None,
            verify_result: VerifyResult::NotRequested,
            not_after: u64::MAX,
            server_name: None,
            ec_point_format: None,
            ticket: None,
        })
    }

    #[test]
    fn insert_then_lookup_round_trips() {
        let cache = InMemorySessionCache::new();
        cache.insert(sample(b"abc"));
        assert!(cache.lookup(b"abc").is_some());
        assert!(cache.lookup(b"xyz").is_none());
    }

    #[test]
    fn insert_under_same_id_replaces_not_duplicates() {
        let cache = InMemorySessionCache::new();
        cache.insert(sample(b"abc"));
        cache.insert(sample(b"abc"));
        assert_eq!(cache.table.read().unwrap().len(), 1);
    }

    #[test]
    fn remove_drops_entry() {
        let cache = InMemorySessionCache::new();
        cache.insert(sample(b"abc"));
        cache.remove(b"abc");
        assert!(cache.lookup(b"abc").is_none());
    }
}
