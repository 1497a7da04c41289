//! `spec.md` §3.6 Ticket Key Material and §5 rotation obligation: "callers
//! implementing rotation must guarantee that the previous key remains
//! accepted for at least the session lifetime."

use zeroize::{Zeroize, ZeroizeOnDrop};

#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct TicketKeyMaterial {
    pub key_name: [u8; 16],
    pub aes_key: [u8; 16],
    pub hmac_key: [u8; 16],
}

impl TicketKeyMaterial {
    pub fn generate(rng: &mut dyn primitives::Rng) -> Result<TicketKeyMaterial, primitives::RngError> {
        let mut key_name = [0u8; 16];
        let mut aes_key = [0u8; 16];
        let mut hmac_key = [0u8; 16];
        rng.fill(&mut key_name)?;
        rng.fill(&mut aes_key)?;
        rng.fill(&mut hmac_key)?;
        Ok(TicketKeyMaterial { key_name, aes_key, hmac_key })
    }
}

/// Holds the active key plus the immediately prior one so a rotation
/// leaves tickets issued under the old key decryptable for the rest of
/// their natural lifetime (spec.md §5 last sentence).
pub struct TicketKeyRing {
    current: TicketKeyMaterial,
    previous: Option<TicketKeyMaterial>,
}

impl TicketKeyRing {
    pub fn new(initial: TicketKeyMaterial) -> Self {
        TicketKeyRing { current: initial, previous: None }
    }

    pub fn current(&self) -> &TicketKeyMaterial {
        &self.current
    }

    /// Replaces the active key, retaining the outgoing one for lookups.
    pub fn rotate(&mut self, next: TicketKeyMaterial) {
        self.previous = Some(std::mem::replace(&mut self.current, next));
    }

    /// Finds the key material matching `key_name`, current first. Returns
    /// `(keys, is_current)`; `is_current == false` signals the caller
    /// should request a renewed ticket (spec.md §4.5 step 2 "renew").
    pub fn find(&self, key_name: &[u8; 16]) -> Option<(&TicketKeyMaterial, bool)> {
        if self.current.key_name == *key_name {
            return Some((&self.current, true));
        }
        if let Some(prev) = &self.previous {
            if prev.key_name == *key_name {
                return Some((prev, false));
            }
        }
        None
    }
}
