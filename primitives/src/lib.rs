//! Trait boundary for the collaborators `spec.md` §6.1 lists as external to
//! the handshake engine (block cipher, RNG, bignum/DH, EC group, hash,
//! certificate store), plus one reference implementation per trait so the
//! workspace builds and its known-answer tests run without a consumer
//! wiring in their own crypto provider. Every consumer of these traits is
//! generic over them, never tied to the concrete types here.

pub mod bigint;
pub mod block_cipher;
pub mod cert;
pub mod ctutil;
pub mod ecgroup;
pub mod hash;
pub mod rng;
pub mod rsa;
pub mod sigkey;

pub use bigint::{DhParams, FfdheError};
pub use block_cipher::{Aes128Cipher, Aes256Cipher, BlockCipher};
pub use cert::{CertStore, VerifyResult};
pub use ctutil::ct_eq;
pub use ecgroup::{EcGroup, EcdhError, NamedCurve, P256Group};
pub use hash::{HashAlgorithm, HashCtx, LegacyMd5Sha1};
pub use rng::{OsRng, Rng, RngError};
pub use rsa::RsaPrivateKey;
pub use sigkey::{PeerVerifyKey, ServerSigningKey, SignError, SignatureScheme, VerifyError};
