//! # Admin Surface & Boundary Tests
//!
//! Owner-only operations, signed callers, dev-mode gating, input
//! attestation and the event stream. Every rejected call must leave the
//! router exactly as it was.

use blindroute_fhe::{InputValue, MockBackend};
use blindroute_router::{
    AdminAction, AgentId, BlindRouteError, CallerContext, ExternalCiphertext, InputProof,
    MemorySink, Principal, Router, RouterConfig, RouterEvent, TicketId, TracingSink,
};
use ed25519_dalek::{Signer, SigningKey};
use rand::rngs::OsRng;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

const OWNER: Principal = Principal([0x01; 32]);
const RELAY: Principal = Principal([0x02; 32]);
const ALICE: Principal = Principal([0xA1; 32]);
const MALLORY: Principal = Principal([0x66; 32]);

fn owner() -> CallerContext {
    CallerContext::trusted(OWNER)
}

fn mallory() -> CallerContext {
    CallerContext::trusted(MALLORY)
}

fn id(n: u32) -> AgentId {
    AgentId::new(n).unwrap()
}

fn router_with(config: RouterConfig) -> Router {
    init_tracing();
    Router::new(config, MockBackend::new(), MemorySink::new())
        .unwrap()
}

fn encrypt4(
    r: &mut Router,
    who: Principal,
    levels: [u16; 4],
) -> ([ExternalCiphertext; 4], InputProof) {
    let (cts, proof) = r
        .backend_mut()
        .encrypt_inputs(who, &levels.map(InputValue::from));
    (cts.try_into().unwrap(), proof)
}

fn seed_agent(r: &mut Router, n: u32, levels: [u16; 4]) {
    let (cts, proof) = encrypt4(r, OWNER, levels);
    r.upsert_agent(&owner(), id(n), &cts, &proof, true).unwrap();
}

// ═══════════════════════════════════════════════════════════════════
// Authorization
// ═══════════════════════════════════════════════════════════════════

#[test]
fn non_owner_admin_calls_rejected() {
    let mut r = router_with(RouterConfig::development(OWNER, RELAY));
    seed_agent(&mut r, 1, [1; 4]);
    let events = r.sink().len();

    let (cts, proof) = encrypt4(&mut r, MALLORY, [9; 4]);
    let attempts = [
        r.upsert_agent(&mallory(), id(2), &cts, &proof, true).err(),
        r.upsert_agent_plain(&mallory(), id(2), [9; 4], true).err(),
        r.deactivate_agent(&mallory(), id(1)).err(),
        r.set_router_principal(&mallory(), MALLORY).err(),
        r.transfer_ownership(&mallory(), MALLORY).err(),
        r.force_public(&mallory(), TicketId::from_label("x")).err(),
    ];
    for err in attempts {
        assert!(
            matches!(err, Some(BlindRouteError::Unauthorized(p)) if p == MALLORY),
            "Expected Unauthorized, got: {err:?}"
        );
    }

    assert!(r.is_active(id(1)));
    assert!(r.agent(id(2)).is_none());
    assert_eq!(r.owner(), OWNER);
    assert_eq!(r.router_principal(), RELAY);
    assert_eq!(r.sink().len(), events);
}

#[test]
fn signed_owner_call_accepted() {
    let key = SigningKey::generate(&mut OsRng);
    let owner_principal = Principal::from(&key.verifying_key());
    let mut r = router_with(RouterConfig::new(owner_principal, RELAY));

    let (cts, proof) = encrypt4(&mut r, owner_principal, [2; 4]);
    let action = AdminAction::UpsertAgent {
        agent_id: id(5),
        active: true,
    };
    let payload = action.signing_payload(1);
    let caller = CallerContext::verified(&key.verifying_key(), &payload, &key.sign(&payload))
        .unwrap();

    r.upsert_agent(&caller, id(5), &cts, &proof, true).unwrap();
    assert!(r.is_active(id(5)));
}

#[test]
fn signature_from_other_key_is_not_owner() {
    let owner_key = SigningKey::generate(&mut OsRng);
    let intruder = SigningKey::generate(&mut OsRng);
    let owner_principal = Principal::from(&owner_key.verifying_key());
    let mut r = router_with(RouterConfig::new(owner_principal, RELAY));

    let action = AdminAction::SetRouterPrincipal { principal: ALICE };
    let payload = action.signing_payload(9);
    let caller = CallerContext::verified(
        &intruder.verifying_key(),
        &payload,
        &intruder.sign(&payload),
    )
    .unwrap();
    let err = r.set_router_principal(&caller, MALLORY).unwrap_err();
    assert!(matches!(err, BlindRouteError::Unauthorized(_)));
    assert_eq!(r.router_principal(), RELAY);
}

#[test]
fn ownership_transfer_moves_admin_rights() {
    let mut r = router_with(RouterConfig::development(OWNER, RELAY));
    r.transfer_ownership(&owner(), ALICE).unwrap();
    assert_eq!(r.owner(), ALICE);

    let err = r
        .upsert_agent_plain(&owner(), id(1), [1; 4], true)
        .unwrap_err();
    assert!(matches!(err, BlindRouteError::Unauthorized(p) if p == OWNER));
    r.upsert_agent_plain(&CallerContext::trusted(ALICE), id(1), [1; 4], true)
        .unwrap();
}

// ═══════════════════════════════════════════════════════════════════
// Input attestation
// ═══════════════════════════════════════════════════════════════════

#[test]
fn foreign_proof_rejected_without_state_change() {
    let mut r = router_with(RouterConfig::new(OWNER, RELAY));
    seed_agent(&mut r, 1, [3; 4]);

    let values: Vec<InputValue> = [1u16, 1, 1, 1, 0].map(InputValue::from).to_vec();
    let (cts_a, _proof_a) = r.backend_mut().encrypt_inputs(ALICE, &values);
    let (_cts_b, proof_b) = r.backend_mut().encrypt_inputs(ALICE, &values);

    let ticket = TicketId::from_label("mixed");
    let need = [cts_a[0], cts_a[1], cts_a[2], cts_a[3]];
    let err = r
        .route(
            &CallerContext::trusted(ALICE),
            ticket,
            &need,
            &cts_a[4],
            &proof_b,
        )
        .unwrap_err();
    assert!(matches!(err, BlindRouteError::ProofMismatch { .. }));
    assert!(r.lookup(&ticket).is_none());
    assert!(r.ledger().is_empty());
}

#[test]
fn proof_from_someone_else_rejected() {
    let mut r = router_with(RouterConfig::new(OWNER, RELAY));
    seed_agent(&mut r, 1, [3; 4]);

    let values: Vec<InputValue> = [1u16, 1, 1, 1, 0].map(InputValue::from).to_vec();
    let (cts, proof) = r.backend_mut().encrypt_inputs(MALLORY, &values);
    let need = [cts[0], cts[1], cts[2], cts[3]];
    let err = r
        .route(
            &CallerContext::trusted(ALICE),
            TicketId::from_label("stolen"),
            &need,
            &cts[4],
            &proof,
        )
        .unwrap_err();
    assert!(matches!(err, BlindRouteError::ProofMismatch { .. }));
}

#[test]
fn wrong_width_input_rejected() {
    let mut r = router_with(RouterConfig::new(OWNER, RELAY));
    seed_agent(&mut r, 1, [3; 4]);

    let values = [
        InputValue::from(1u16),
        InputValue::from(1u16),
        InputValue::from(1u16),
        InputValue::from(1u16),
        InputValue::from(7u32),
    ];
    let (cts, proof) = r.backend_mut().encrypt_inputs(ALICE, &values);
    let need = [cts[0], cts[1], cts[2], cts[3]];
    let err = r
        .route(
            &CallerContext::trusted(ALICE),
            TicketId::from_label("wide"),
            &need,
            &cts[4],
            &proof,
        )
        .unwrap_err();
    assert!(matches!(err, BlindRouteError::CiphertextKindMismatch { .. }));
    assert!(r.ledger().is_empty());
}

#[test]
fn upsert_with_unattested_skill_rejected() {
    let mut r = router_with(RouterConfig::new(OWNER, RELAY));
    let (mut cts, proof) = encrypt4(&mut r, OWNER, [1; 4]);
    let (other, _) = encrypt4(&mut r, OWNER, [9; 4]);
    cts[2] = other[2];

    let err = r
        .upsert_agent(&owner(), id(1), &cts, &proof, true)
        .unwrap_err();
    assert!(matches!(err, BlindRouteError::ProofMismatch { handle } if handle == other[2].handle));
    assert!(r.agent(id(1)).is_none());
    assert_eq!(r.active_count(), 0);
}

// ═══════════════════════════════════════════════════════════════════
// Dev mode
// ═══════════════════════════════════════════════════════════════════

#[test]
fn dev_paths_refused_in_production() {
    let mut r = router_with(RouterConfig::new(OWNER, RELAY));
    seed_agent(&mut r, 1, [1; 4]);

    assert!(matches!(
        r.upsert_agent_plain(&owner(), id(2), [1; 4], true),
        Err(BlindRouteError::DevModeDisabled { .. })
    ));
    assert!(matches!(
        r.route_plain(&owner(), TicketId::from_label("p"), [1; 4], 0),
        Err(BlindRouteError::DevModeDisabled { .. })
    ));
    assert!(matches!(
        r.force_public(&owner(), TicketId::from_label("p")),
        Err(BlindRouteError::DevModeDisabled { .. })
    ));
    assert!(r.ledger().is_empty());
}

#[test]
fn force_public_opens_winner_to_everyone() {
    let mut r = router_with(RouterConfig::development(OWNER, RELAY));
    r.upsert_agent_plain(&owner(), id(4), [2; 4], true).unwrap();
    let ticket = TicketId::from_label("reveal");
    r.route_plain(&CallerContext::trusted(ALICE), ticket, [2; 4], 0)
        .unwrap();
    assert!(r.decrypt_match(&ticket, &MALLORY).is_err());

    let winner = r.force_public(&owner(), ticket).unwrap();
    assert_eq!(winner, r.lookup(&ticket).unwrap());
    assert!(r.match_record(&ticket).unwrap().public);
    assert_eq!(r.decrypt_match(&ticket, &MALLORY).unwrap(), 4);
}

#[test]
fn force_public_unknown_ticket() {
    let mut r = router_with(RouterConfig::development(OWNER, RELAY));
    let err = r
        .force_public(&owner(), TicketId::from_label("ghost"))
        .unwrap_err();
    assert!(matches!(err, BlindRouteError::NoMatch(_)));
}

// ═══════════════════════════════════════════════════════════════════
// Registry edge cases
// ═══════════════════════════════════════════════════════════════════

#[test]
fn deactivate_inactive_agent_fails() {
    let mut r = router_with(RouterConfig::development(OWNER, RELAY));
    assert!(matches!(
        r.deactivate_agent(&owner(), id(1)),
        Err(BlindRouteError::NotActive(_))
    ));
    assert!(r.sink().is_empty());

    r.upsert_agent_plain(&owner(), id(1), [1; 4], false)
        .unwrap();
    let events = r.sink().len();
    assert!(matches!(
        r.deactivate_agent(&owner(), id(1)),
        Err(BlindRouteError::NotActive(_))
    ));
    assert_eq!(r.sink().len(), events);
    assert_eq!(r.registry().index_len(), 0);
}

#[test]
fn upsert_inactive_takes_agent_out_of_rotation() {
    let mut r = router_with(RouterConfig::development(OWNER, RELAY));
    r.upsert_agent_plain(&owner(), id(1), [9; 4], true).unwrap();
    r.upsert_agent_plain(&owner(), id(2), [1; 4], true).unwrap();
    r.upsert_agent_plain(&owner(), id(1), [9; 4], false)
        .unwrap();
    assert_eq!(r.active_count(), 1);

    let ticket = TicketId::from_label("rotation");
    let receipt = r
        .route_plain(&CallerContext::trusted(ALICE), ticket, [9; 4], 0)
        .unwrap();
    assert_eq!(receipt.candidates_scored, vec![id(2)]);
    assert_eq!(r.decrypt_match(&ticket, &ALICE).unwrap(), 2);
}

// ═══════════════════════════════════════════════════════════════════
// Events
// ═══════════════════════════════════════════════════════════════════

#[test]
fn events_follow_state_transitions() {
    let mut r = router_with(RouterConfig::development(OWNER, RELAY));
    r.upsert_agent_plain(&owner(), id(1), [1; 4], true).unwrap();
    let ticket = TicketId::from_label("events");
    let receipt = r
        .route_plain(&CallerContext::trusted(ALICE), ticket, [1; 4], 0)
        .unwrap();
    r.deactivate_agent(&owner(), id(1)).unwrap();
    r.set_router_principal(&owner(), ALICE).unwrap();
    r.force_public(&owner(), ticket).unwrap();
    r.transfer_ownership(&owner(), ALICE).unwrap();

    let events: Vec<RouterEvent> = r.sink_mut().drain().into_iter().map(|e| e.event).collect();
    assert_eq!(
        events,
        vec![
            RouterEvent::AgentChanged {
                agent_id: id(1),
                active: true,
            },
            RouterEvent::MatchRouted {
                ticket,
                requester: ALICE,
                winner: receipt.winner,
            },
            RouterEvent::AgentChanged {
                agent_id: id(1),
                active: false,
            },
            RouterEvent::RouterPrincipalChanged {
                previous: RELAY,
                current: ALICE,
            },
            RouterEvent::MatchMadePublic {
                ticket,
                winner: receipt.winner,
            },
            RouterEvent::OwnershipTransferred {
                previous: OWNER,
                current: ALICE,
            },
        ]
    );
    assert!(r.sink().is_empty());
}

#[test]
fn events_serialize_without_plaintext() {
    let mut r = router_with(RouterConfig::development(OWNER, RELAY));
    r.upsert_agent_plain(&owner(), id(42), [1; 4], true)
        .unwrap();
    r.route_plain(
        &CallerContext::trusted(ALICE),
        TicketId::from_label("j"),
        [1; 4],
        0,
    )
    .unwrap();

    let routed = r.sink().events().last().unwrap();
    let json = serde_json::to_value(routed).unwrap();
    assert_eq!(json["event"]["kind"], "match_routed");
    assert!(json["event"].get("winner").is_some());
    assert!(json["event"].get("agent_id").is_none());
}

#[test]
fn tracing_sink_router_works() {
    init_tracing();
    let mut r = Router::new(
        RouterConfig::development(OWNER, RELAY),
        MockBackend::new(),
        TracingSink,
    )
    .unwrap();
    r.upsert_agent_plain(&owner(), id(1), [1; 4], true).unwrap();
    let ticket = TicketId::from_label("t");
    r.route_plain(&CallerContext::trusted(ALICE), ticket, [1; 4], 0)
        .unwrap();
    assert_eq!(r.decrypt_match(&ticket, &RELAY).unwrap(), 1);
}
