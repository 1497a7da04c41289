//! Drives `handshake::ServerState`'s flight diagram end to end over a
//! blocking `Read + Write` transport: ClientHello processing, cipher and
//! session-resumption negotiation, the full or abbreviated message flight,
//! Finished verification, and installation of the GCM record-layer keys
//! for the application-data phase that follows. Every building block here
//! (wire framing, key exchange, key schedule, ticket issuance) lives in
//! the `handshake`/`ticket`/`extensions` crates; this module only
//! sequences them the way RFC 5246 §7.3/§7.4 and RFC 6347 §4.2 order the
//! messages.

use std::io::{Read, Write};

use hmac::{Hmac, Mac};
use sha2::Sha256;

use extensions::{ExtensionError, ParsedExtensions, ServerHelloExtensions};
use handshake::kex::{dhe::DheKeyExchange, ecdhe, rsa as rsa_kex};
use handshake::{
    derive_gcm_key_block, derive_master_secret, is_downgrade, make_server_random, read_handshake_message,
    write_handshake_message, ClientHello, GcmDirection, HandshakeError, HandshakeMessage, RecordLayer, Result,
    Transcript, CLIENT_LABEL, SERVER_LABEL, VERIFY_DATA_LEN,
};
use primitives::{ct_eq, EcGroup, NamedCurve, P256Group, Rng, SignatureScheme};
use tls_types::{
    CipherSuite, ContentType, EcPointFormat, HandshakeType, KeyExchange, ProtocolVersion, Session, SharedSession,
    VerifyResult,
};
use wire::{Reader, Writer};

use crate::certificate;
use crate::config::ServerConfig;

/// `client_verify_data ++ server_verify_data` from a completed handshake,
/// cached by the caller and handed back to [`ServerConnection::accept`] on
/// the next ClientHello received over the *same* connection (`spec.md`
/// §4.4 "the server caches a copy of both Finished values to use as
/// renegotiation_info on subsequent renegotiation"). Absent entirely for
/// an initial handshake.
#[derive(Debug, Clone, Copy)]
pub struct PriorHandshake {
    pub client_verify_data: [u8; VERIFY_DATA_LEN],
    pub server_verify_data: [u8; VERIFY_DATA_LEN],
}

/// The connection state left once `accept` returns: negotiated parameters
/// plus the protected record layer, ready to carry application data.
pub struct ServerConnection {
    pub negotiated_version: ProtocolVersion,
    pub cipher_suite: &'static CipherSuite,
    pub resumed: bool,
    pub session: SharedSession,
    pub selected_alpn: Option<Vec<u8>>,
    pub selected_npn: Option<Vec<u8>>,
    /// Finished values from this handshake, to pass back in as
    /// [`PriorHandshake`] if the caller drives a renegotiation over the
    /// same connection (`spec.md` §8 testable property 5).
    pub client_verify_data: [u8; VERIFY_DATA_LEN],
    pub server_verify_data: [u8; VERIFY_DATA_LEN],
    record: RecordLayer,
}

impl ServerConnection {
    /// Runs one server-side handshake to completion and returns the
    /// resulting connection, or a [`HandshakeError`] if the peer could not
    /// be accepted. `now_unix_secs` drives ServerHello.random, session
    /// expiry, and ticket lifetime. `prior_handshake` is `None` for an
    /// initial handshake and `Some` when this ClientHello is a
    /// renegotiation over a connection that already completed one
    /// handshake (`spec.md` §4.3 "renegotiate", §7.2 RFC 5746).
    pub fn accept<T: Read + Write>(
        config: &ServerConfig,
        rng: &mut dyn Rng,
        transport: &mut T,
        now_unix_secs: u64,
        prior_handshake: Option<&PriorHandshake>,
    ) -> Result<ServerConnection> {
        accept_inner(config, rng, transport, now_unix_secs, prior_handshake)
    }

    pub fn send_application_data<T: Write>(&mut self, transport: &mut T, data: &[u8]) -> Result<()> {
        send_record(&mut self.record, transport, ContentType::ApplicationData, self.negotiated_version, data)
    }

    pub fn recv_application_data<T: Read>(&mut self, transport: &mut T) -> Result<Vec<u8>> {
        let (content_type, plaintext) = read_record(&mut self.record, transport)?;
        match content_type {
            ContentType::ApplicationData => Ok(plaintext),
            ContentType::Alert => Err(alert_to_error(&plaintext)),
            _ => Err(HandshakeError::Protocol("expected application_data record")),
        }
    }
}

enum Resumption {
    None,
    Resume(Session),
}

fn accept_inner<T: Read + Write>(
    config: &ServerConfig,
    rng: &mut dyn Rng,
    transport: &mut T,
    now_unix_secs: u64,
    prior_handshake: Option<&PriorHandshake>,
) -> Result<ServerConnection> {
    let mut record = RecordLayer::new();
    let mut dtls_message_seq: u16 = 0;

    let (mut is_dtls, mut hello, mut hello_body) = read_client_hello(&mut record, transport)?;

    if is_dtls && config.dtls_cookie_exchange {
        let expected_cookie = compute_dtls_cookie(&config.dtls_cookie_secret, &hello.random);
        if hello.cookie.as_deref() != Some(&expected_cookie[..]) {
            let hvr_body = build_hello_verify_request_body(hello.client_version, &expected_cookie);
            let wire = write_handshake_message(HandshakeType::HelloVerifyRequest, &hvr_body, Some(dtls_message_seq));
            dtls_message_seq += 1;
            send_record(&mut record, transport, ContentType::Handshake, hello.client_version, &wire)?;

            let (is_dtls2, hello2, hello2_body) = read_client_hello(&mut record, transport)?;
            if hello2.cookie.as_deref() != Some(&expected_cookie[..]) {
                return Err(HandshakeError::Protocol("dtls cookie mismatch on retry"));
            }
            is_dtls = is_dtls2;
            hello = hello2;
            hello_body = hello2_body;
        }
    }

    let mut transcript = Transcript::new();
    transcript.extend(&write_handshake_message(HandshakeType::ClientHello, &hello_body, None));

    let negotiated_version = hello.client_version.min_with(config.max_version);
    if !negotiated_version.is_at_least(config.min_version) || negotiated_version.is_dtls() != is_dtls {
        return Err(HandshakeError::Policy("no mutually supported protocol version"));
    }
    let downgrade = is_downgrade(negotiated_version, config.max_version);
    let is_tls12 = negotiated_version == ProtocolVersion::TLS1_2 || negotiated_version == ProtocolVersion::DTLS1_2;

    let reneg_info_out = validate_renegotiation_info(hello.extensions.renegotiation_info.as_deref(), prior_handshake)?;

    let usable: Vec<&'static CipherSuite> = config
        .cipher_suites
        .iter()
        .copied()
        .filter(|s| {
            s.bulk.is_aead()
                && (!s.tls12_only || is_tls12)
                && (!s.requires_ec || !config.ec_curve_preference.is_empty())
                && match s.kx {
                    KeyExchange::Rsa => config.rsa_decryption_key.is_some(),
                    KeyExchange::Dhe => config.dhe_group.is_some(),
                    KeyExchange::Ecdhe => !config.ec_curve_preference.is_empty(),
                    KeyExchange::Gost => false,
                }
        })
        .collect();
    let cipher_suite = handshake::select_cipher_suite(&hello.cipher_suites, &usable, config.server_cipher_preference)
        .ok_or(HandshakeError::Policy("no mutually acceptable cipher suite"))?;

    let resumption = resolve_resumption(config, &hello, cipher_suite, negotiated_version, now_unix_secs)?;
    let (session_id, resuming_session) = match resumption {
        Resumption::None => (fresh_session_id(rng)?, None),
        Resumption::Resume(session) => (session.session_id.clone(), Some(session)),
    };

    let server_random = make_server_random(rng, now_unix_secs as u32, downgrade)?;

    let curve = if cipher_suite.kx == KeyExchange::Ecdhe {
        Some(
            ecdhe::select_curve(&config.ec_curve_preference, hello.extensions.elliptic_curves.as_deref())
                .ok_or(HandshakeError::Policy("no mutually supported elliptic curve"))?,
        )
    } else {
        None
    };

    let alpn_selected = negotiate_alpn(config, &hello.extensions)?;
    let npn_offered = hello.extensions.next_proto_neg && alpn_selected.is_none() && !config.npn_protocols.is_empty();
    let npn_refs: Vec<&[u8]> = config.npn_protocols.iter().map(|v| v.as_slice()).collect();
    let use_srtp_profile = negotiate_srtp(config, &hello.extensions);
    let issues_ticket = config.ticket_keys.is_some() && hello.extensions.session_ticket.is_some();

    let server_hello_exts = ServerHelloExtensions {
        sni_acknowledged: hello.extensions.server_name.is_some(),
        renegotiation_info: Some(&reneg_info_out),
        ec_point_formats: curve.is_some(),
        new_session_ticket: issues_ticket,
        status_request: config.ocsp_response.is_some() && hello.extensions.status_request,
        use_srtp_profile,
        npn_protocols: if npn_offered { Some(&npn_refs[..]) } else { None },
        alpn_selected: alpn_selected.as_deref(),
        cryptopro_workaround: false,
        pad_to_avoid_danger_zone: true,
    };

    let server_hello_body = handshake::build_server_hello_body(
        negotiated_version,
        &server_random,
        &session_id,
        cipher_suite.id,
        &server_hello_exts,
    );
    send_handshake(
        &mut record,
        transport,
        &mut transcript,
        is_dtls,
        &mut dtls_message_seq,
        negotiated_version,
        HandshakeType::ServerHello,
        &server_hello_body,
    )?;

    let (master_secret, peer_certificate, verify_result, ec_point_format) = if let Some(session) = &resuming_session
    {
        (session.master_secret, session.peer_certificate.clone(), session.verify_result, session.ec_point_format)
    } else {
        let (master_secret, peer_certificate, verify_result) = run_full_handshake(
            config,
            rng,
            &mut record,
            transport,
            &mut transcript,
            is_dtls,
            &mut dtls_message_seq,
            negotiated_version,
            is_tls12,
            cipher_suite,
            curve,
            &hello,
            &server_random,
        )?;
        let ec_point_format = curve.map(|_| EcPointFormat::Uncompressed);
        (master_secret, peer_certificate, verify_result, ec_point_format)
    };

    let key_block = derive_gcm_key_block(
        is_tls12,
        cipher_suite.prf_hash,
        &master_secret,
        &hello.random,
        &server_random,
        cipher_suite.bulk.key_len(),
    );

    let not_after = now_unix_secs.saturating_add(config.session_lifetime_secs);
    let mut session = Session {
        session_id: session_id.clone(),
        master_secret,
        cipher_suite,
        protocol_version: negotiated_version,
        peer_certificate,
        verify_result,
        not_after,
        server_name: hello.extensions.server_name.clone(),
        ec_point_format,
        ticket: None,
    };

    if issues_ticket {
        if let Some(ticket_keys) = &config.ticket_keys {
            let keys = { ticket_keys.read().expect("ticket key ring lock poisoned").current().clone() };
            let mut iv = [0u8; 16];
            rng.fill(&mut iv)?;
            let issued = ticket::issue(&keys, &iv, &session, config.ticket_lifetime_hint_secs);
            session.ticket = Some(issued.body.clone());
            let nst_body = build_new_session_ticket_body(&issued);
            send_handshake(
                &mut record,
                transport,
                &mut transcript,
                is_dtls,
                &mut dtls_message_seq,
                negotiated_version,
                HandshakeType::NewSessionTicket,
                &nst_body,
            )?;
        }
    }

    send_record(&mut record, transport, ContentType::ChangeCipherSpec, negotiated_version, &[1])?;
    record.write = handshake::DirectionState::Gcm(make_direction(cipher_suite, &key_block.server_write_key, key_block.server_write_salt));

    let server_verify =
        handshake::compute_finished(is_tls12, cipher_suite.prf_hash, &master_secret, SERVER_LABEL, transcript.current());
    send_handshake(
        &mut record,
        transport,
        &mut transcript,
        is_dtls,
        &mut dtls_message_seq,
        negotiated_version,
        HandshakeType::Finished,
        &server_verify,
    )?;

    read_change_cipher_spec(&mut record, transport)?;
    record.read = handshake::DirectionState::Gcm(make_direction(cipher_suite, &key_block.client_write_key, key_block.client_write_salt));

    let (_, client_finished_msg) = read_one_handshake_message(&mut record, transport)?;
    if client_finished_msg.msg_type != HandshakeType::Finished {
        return Err(HandshakeError::Protocol("expected client Finished"));
    }
    let expected_client_verify =
        handshake::compute_finished(is_tls12, cipher_suite.prf_hash, &master_secret, CLIENT_LABEL, transcript.current());
    if !ct_eq(&client_finished_msg.body, &expected_client_verify) {
        return Err(HandshakeError::Crypto("client Finished verify_data mismatch"));
    }

    config.session_cache.insert(SharedSession::new(session.clone()));

    Ok(ServerConnection {
        negotiated_version,
        cipher_suite,
        resumed: resuming_session.is_some(),
        session: SharedSession::new(session),
        selected_alpn: alpn_selected,
        selected_npn: None,
        client_verify_data: expected_client_verify,
        server_verify_data: server_verify,
        record,
    })
}

#[allow(clippy::too_many_arguments)]
fn run_full_handshake<T: Read + Write>(
    config: &ServerConfig,
    rng: &mut dyn Rng,
    record: &mut RecordLayer,
    transport: &mut T,
    transcript: &mut Transcript,
    is_dtls: bool,
    dtls_message_seq: &mut u16,
    negotiated_version: ProtocolVersion,
    is_tls12: bool,
    cipher_suite: &'static CipherSuite,
    curve: Option<NamedCurve>,
    hello: &ClientHello,
    server_random: &[u8; 32],
) -> Result<([u8; 48], Option<Vec<u8>>, VerifyResult)> {
    send_handshake(
        record,
        transport,
        transcript,
        is_dtls,
        dtls_message_seq,
        negotiated_version,
        HandshakeType::Certificate,
        &certificate::build_certificate_body(&config.certificate_chain),
    )?;

    if config.ocsp_response.is_some() && hello.extensions.status_request {
        let ocsp = config.ocsp_response.as_ref().unwrap();
        let mut w = Writer::new();
        w.put_u8(1); // CertificateStatusType::ocsp
        w.begin_u24().put_bytes(ocsp);
        send_handshake(
            record,
            transport,
            transcript,
            is_dtls,
            dtls_message_seq,
            negotiated_version,
            HandshakeType::CertificateStatus,
            &w.finish(),
        )?;
    }

    let sigalgs_pairs: Option<Vec<(u8, u8)>> =
        hello.extensions.signature_algorithms.as_ref().map(|v| v.iter().map(|s| (s.hash, s.signature)).collect());

    let premaster: Vec<u8> = match cipher_suite.kx {
        KeyExchange::Rsa => Vec::new(), // no ServerKeyExchange; derived below from ClientKeyExchange
        KeyExchange::Dhe => {
            let group = config.dhe_group.as_ref().expect("filtered to suites with a configured dhe group").params();
            let dhe = DheKeyExchange::generate(group, rng)?;
            let params_body = dhe.params_body();
            let mut signed = Vec::with_capacity(64 + params_body.len());
            signed.extend_from_slice(&hello.random);
            signed.extend_from_slice(server_random);
            signed.extend_from_slice(&params_body);
            let sig = certificate::sign_server_key_exchange(
                &*config.signing_key,
                is_tls12,
                sigalgs_pairs.as_deref(),
                &signed,
            )?;
            let mut body = params_body;
            body.extend_from_slice(&sig);
            send_handshake(
                record,
                transport,
                transcript,
                is_dtls,
                dtls_message_seq,
                negotiated_version,
                HandshakeType::ServerKeyExchange,
                &body,
            )?;

            let cke = expect_handshake(record, transport, transcript, HandshakeType::ClientKeyExchange)?;
            let client_public = handshake::kex::dhe::parse_client_public(&cke.body)?;
            dhe.shared_secret(&client_public)?
        }
        KeyExchange::Ecdhe => {
            let group = P256Group;
            debug_assert_eq!(curve, Some(group.curve()));
            let ecdhe = ecdhe::EcdheKeyExchange::generate(&group, rng)?;
            let params_body = ecdhe.params_body();
            let mut signed = Vec::with_capacity(64 + params_body.len());
            signed.extend_from_slice(&hello.random);
            signed.extend_from_slice(server_random);
            signed.extend_from_slice(&params_body);
            let sig = certificate::sign_server_key_exchange(
                &*config.signing_key,
                is_tls12,
                sigalgs_pairs.as_deref(),
                &signed,
            )?;
            let mut body = params_body;
            body.extend_from_slice(&sig);
            send_handshake(
                record,
                transport,
                transcript,
                is_dtls,
                dtls_message_seq,
                negotiated_version,
                HandshakeType::ServerKeyExchange,
                &body,
            )?;

            let cke = expect_handshake(record, transport, transcript, HandshakeType::ClientKeyExchange)?;
            let client_point = ecdhe::parse_client_public(&cke.body)?;
            ecdhe.shared_x(&group, &client_point)?
        }
        KeyExchange::Gost => return Err(HandshakeError::Policy("gost key exchange is not implemented")),
    };

    if let Some(auth) = &config.client_auth {
        let tls12_sigalgs =
            if is_tls12 { Some([(4u8, SignatureScheme::Rsa.wire_id()), (4u8, SignatureScheme::Ecdsa.wire_id())]) } else { None };
        send_handshake(
            record,
            transport,
            transcript,
            is_dtls,
            dtls_message_seq,
            negotiated_version,
            HandshakeType::CertificateRequest,
            &certificate::build_certificate_request_body(
                &[SignatureScheme::Rsa, SignatureScheme::Ecdsa],
                tls12_sigalgs.as_deref(),
            ),
        )?;
        let _ = auth; // cert_types/hints only; verification happens once the chain arrives below
    }

    send_handshake(
        record,
        transport,
        transcript,
        is_dtls,
        dtls_message_seq,
        negotiated_version,
        HandshakeType::ServerHelloDone,
        &[],
    )?;

    let mut client_cert_chain: Vec<Vec<u8>> = Vec::new();
    let mut verify_result = VerifyResult::NotRequested;
    if let Some(auth) = &config.client_auth {
        let cert_msg = expect_handshake(record, transport, transcript, HandshakeType::Certificate)?;
        client_cert_chain = certificate::parse_certificate_body(&cert_msg.body)?;
        if client_cert_chain.is_empty() {
            if auth.required {
                return Err(HandshakeError::Policy("client certificate required but none was presented"));
            }
            verify_result = VerifyResult::NoCertificate;
        } else {
            let chain_refs: Vec<&[u8]> = client_cert_chain.iter().map(|v| v.as_slice()).collect();
            let outcome = auth.cert_store.verify(&chain_refs, "tls-client-auth", 0);
            if !outcome.is_ok() {
                return Err(HandshakeError::Policy("client certificate chain failed verification"));
            }
            verify_result = VerifyResult::Verified;
        }
    }

    let premaster: Vec<u8> = if cipher_suite.kx == KeyExchange::Rsa {
        let cke = expect_handshake(record, transport, transcript, HandshakeType::ClientKeyExchange)?;
        let ciphertext = parse_rsa_client_key_exchange(&cke.body)?;
        let accepted = [hello.client_version, negotiated_version];
        rsa_kex::decrypt_premaster(
            config.rsa_decryption_key.as_ref().expect("filtered to suites with a configured rsa key"),
            &accepted,
            &ciphertext,
            rng,
        )?
        .to_vec()
    } else {
        // DHE/ECDHE secrets are variable-length big-endian integers fed to
        // the PRF exactly as produced, per RFC 5246 §8.1.2 — no padding to
        // a fixed width.
        premaster
    };

    if !client_cert_chain.is_empty() {
        let (_, cv_msg) = read_one_handshake_message(record, transport)?;
        if cv_msg.msg_type != HandshakeType::CertificateVerify {
            return Err(HandshakeError::Protocol("expected CertificateVerify"));
        }
        let parsed = certificate::parse_certificate_verify_body(&cv_msg.body, is_tls12)?;
        let auth = config.client_auth.as_ref().expect("client_cert_chain only populated when client_auth is set");
        let peer_key = (auth.resolve_peer_key)(&client_cert_chain[0])
            .ok_or(HandshakeError::Policy("no verification key for client certificate"))?;
        certificate::verify_certificate_verify(&*peer_key, is_tls12, &parsed, transcript.current())
            .map_err(|_| HandshakeError::Crypto("client CertificateVerify signature invalid"))?;
        transcript.extend(&write_handshake_message(cv_msg.msg_type, &cv_msg.body, None));
    }

    let master_secret = derive_master_secret(is_tls12, cipher_suite.prf_hash, &premaster, &hello.random, server_random);

    let peer_certificate = client_cert_chain.into_iter().next();
    Ok((master_secret, peer_certificate, verify_result))
}

fn resolve_resumption(
    config: &ServerConfig,
    hello: &ClientHello,
    cipher_suite: &CipherSuite,
    negotiated_version: ProtocolVersion,
    now: u64,
) -> Result<Resumption> {
    if !hello.session_id.is_empty() {
        if let Some(shared) = config.session_cache.lookup(&hello.session_id) {
            if !shared.is_expired(now) && shared.cipher_suite.id == cipher_suite.id
                && shared.protocol_version == negotiated_version
            {
                return Ok(Resumption::Resume((*shared).clone()));
            }
        }
    }
    if let Some(ticket_body) = &hello.extensions.session_ticket {
        if !ticket_body.is_empty() {
            if let Some(ring_lock) = &config.ticket_keys {
                let ring = ring_lock.read().expect("ticket key ring lock poisoned");
                if let Ok((mut session, _is_current)) = ticket::validate(&ring, ticket_body) {
                    session.session_id = hello.session_id.clone();
                    if !session.is_expired(now) && session.cipher_suite.id == cipher_suite.id
                        && session.protocol_version == negotiated_version
                    {
                        return Ok(Resumption::Resume(session));
                    }
                }
            }
        }
    }
    Ok(Resumption::None)
}

fn negotiate_alpn(config: &ServerConfig, extensions: &ParsedExtensions) -> Result<Option<Vec<u8>>> {
    let Some(offered) = &extensions.alpn_protocols else { return Ok(None) };
    if config.alpn_protocols.is_empty() {
        return Ok(None);
    }
    for candidate in &config.alpn_protocols {
        if offered.iter().any(|p| p == candidate) {
            return Ok(Some(candidate.clone()));
        }
    }
    Err(HandshakeError::Policy("no mutually supported ALPN protocol"))
}

fn negotiate_srtp(config: &ServerConfig, extensions: &ParsedExtensions) -> Option<u16> {
    let offered = extensions.use_srtp_profiles.as_ref()?;
    config.srtp_profiles.iter().copied().find(|p| offered.contains(p))
}

/// `spec.md` §4.3 "renegotiate" / §7.2 RFC 5746: on an initial handshake
/// (`prior_handshake` is `None`) a non-empty `renegotiated_connection` is
/// rejected outright; on a renegotiation the extension must be present
/// and must equal exactly the previous handshake's `client_verify_data ++
/// server_verify_data`. Returns the bytes the server should echo back in
/// its own `renegotiation_info` extension.
fn validate_renegotiation_info(offered: Option<&[u8]>, prior_handshake: Option<&PriorHandshake>) -> Result<Vec<u8>> {
    match prior_handshake {
        None => {
            if offered.is_some_and(|v| !v.is_empty()) {
                return Err(HandshakeError::Protocol("renegotiation_info non-empty on initial handshake"));
            }
            Ok(Vec::new())
        }
        Some(prior) => {
            let mut expected = Vec::with_capacity(2 * VERIFY_DATA_LEN);
            expected.extend_from_slice(&prior.client_verify_data);
            expected.extend_from_slice(&prior.server_verify_data);
            match offered {
                Some(info) if ct_eq(info, &expected) => Ok(expected),
                _ => Err(ExtensionError::MissingRenegotiationInfo.into()),
            }
        }
    }
}

fn fresh_session_id(rng: &mut dyn Rng) -> Result<Vec<u8>> {
    let mut id = [0u8; 32];
    rng.fill(&mut id)?;
    Ok(id.to_vec())
}

fn make_direction(cipher_suite: &CipherSuite, key: &[u8], salt: [u8; 4]) -> GcmDirection {
    match cipher_suite.bulk.key_len() {
        16 => GcmDirection::new_aes128(key.try_into().expect("gcm suite table guarantees a 16-byte key"), salt),
        32 => GcmDirection::new_aes256(key.try_into().expect("gcm suite table guarantees a 32-byte key"), salt),
        other => unreachable!("cipher suite table only lists 16- and 32-byte gcm keys, got {other}"),
    }
}

fn build_hello_verify_request_body(version: ProtocolVersion, cookie: &[u8]) -> Vec<u8> {
    let mut w = Writer::new();
    w.put_u16(version.wire());
    w.begin_u8().put_bytes(cookie);
    w.finish()
}

fn compute_dtls_cookie(secret: &[u8; 32], client_random: &[u8; 32]) -> [u8; 32] {
    let mut mac = Hmac::<Sha256>::new_from_slice(secret).expect("hmac accepts any key length");
    mac.update(client_random);
    mac.finalize().into_bytes().into()
}

fn build_new_session_ticket_body(issued: &ticket::IssuedTicket) -> Vec<u8> {
    let mut w = Writer::new();
    w.put_u32(issued.lifetime_hint);
    w.begin_u16().put_bytes(&issued.body);
    w.finish()
}

fn parse_rsa_client_key_exchange(body: &[u8]) -> Result<Vec<u8>> {
    let mut r = Reader::new(body);
    let ciphertext = r.read_u16_prefixed_bytes()?;
    r.assert_exhausted()?;
    Ok(ciphertext.to_vec())
}

fn read_client_hello<T: Read>(record: &mut RecordLayer, transport: &mut T) -> Result<(bool, ClientHello, Vec<u8>)> {
    let (is_dtls, msg) = read_one_handshake_message(record, transport)?;
    if msg.msg_type != HandshakeType::ClientHello {
        return Err(HandshakeError::Protocol("expected ClientHello"));
    }
    let hello = ClientHello::parse(&msg.body, is_dtls)?;
    Ok((is_dtls, hello, msg.body))
}

fn expect_handshake<T: Read>(
    record: &mut RecordLayer,
    transport: &mut T,
    transcript: &mut Transcript,
    want: HandshakeType,
) -> Result<HandshakeMessage> {
    let (_, msg) = read_one_handshake_message(record, transport)?;
    if msg.msg_type != want {
        return Err(HandshakeError::Protocol("unexpected handshake message type"));
    }
    transcript.extend(&write_handshake_message(msg.msg_type, &msg.body, None));
    Ok(msg)
}

#[allow(clippy::too_many_arguments)]
fn send_handshake<T: Write>(
    record: &mut RecordLayer,
    transport: &mut T,
    transcript: &mut Transcript,
    is_dtls: bool,
    dtls_message_seq: &mut u16,
    version: ProtocolVersion,
    msg_type: HandshakeType,
    body: &[u8],
) -> Result<()> {
    let canonical = write_handshake_message(msg_type, body, None);
    transcript.extend(&canonical);
    let wire = if is_dtls {
        let seq = *dtls_message_seq;
        *dtls_message_seq += 1;
        write_handshake_message(msg_type, body, Some(seq))
    } else {
        canonical
    };
    send_record(record, transport, ContentType::Handshake, version, &wire)
}

fn send_record<T: Write>(
    record: &mut RecordLayer,
    transport: &mut T,
    content_type: ContentType,
    version: ProtocolVersion,
    payload: &[u8],
) -> Result<()> {
    let bytes = record.seal_record(content_type, version, payload)?;
    transport.write_all(&bytes)?;
    Ok(())
}

fn read_record<T: Read>(record: &mut RecordLayer, transport: &mut T) -> Result<(ContentType, Vec<u8>)> {
    let mut header = [0u8; 5];
    transport.read_exact(&mut header)?;
    let len = u16::from_be_bytes([header[3], header[4]]) as usize;
    let mut rest = vec![0u8; len];
    transport.read_exact(&mut rest)?;
    let mut buf = Vec::with_capacity(5 + len);
    buf.extend_from_slice(&header);
    buf.extend_from_slice(&rest);
    let (content_type, plaintext, _consumed) = record.open_record(&buf)?;
    Ok((content_type, plaintext))
}

/// Reads exactly one handshake message. This engine does not coalesce
/// multiple handshake messages into a single record on either side, so
/// one record always yields exactly one message.
fn read_one_handshake_message<T: Read>(record: &mut RecordLayer, transport: &mut T) -> Result<(bool, HandshakeMessage)> {
    let mut header = [0u8; 5];
    transport.read_exact(&mut header)?;
    let version = ProtocolVersion::from_wire(u16::from_be_bytes([header[1], header[2]]));
    let is_dtls = version.is_dtls();
    let len = u16::from_be_bytes([header[3], header[4]]) as usize;
    let mut rest = vec![0u8; len];
    transport.read_exact(&mut rest)?;
    let mut buf = Vec::with_capacity(5 + len);
    buf.extend_from_slice(&header);
    buf.extend_from_slice(&rest);
    let (content_type, plaintext, _consumed) = record.open_record(&buf)?;
    match content_type {
        ContentType::Handshake => {
            let (msg, _consumed) = read_handshake_message(&plaintext, is_dtls)?;
            Ok((is_dtls, msg))
        }
        ContentType::Alert => Err(alert_to_error(&plaintext)),
        _ => Err(HandshakeError::Protocol("expected a handshake record")),
    }
}

fn read_change_cipher_spec<T: Read>(record: &mut RecordLayer, transport: &mut T) -> Result<()> {
    let (content_type, plaintext) = read_record(record, transport)?;
    if content_type != ContentType::ChangeCipherSpec || plaintext != [1] {
        return Err(HandshakeError::Protocol("expected change_cipher_spec"));
    }
    Ok(())
}

fn alert_to_error(body: &[u8]) -> HandshakeError {
    if body.len() < 2 {
        return HandshakeError::Decode("alert record shorter than 2 bytes");
    }
    HandshakeError::Protocol("peer sent a fatal alert")
}
