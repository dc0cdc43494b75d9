//! # End-to-End Lifecycle
//!
//! Site → inspector → device → certificate, then a second certificate on
//! the same device, checking every record the issuance writes.

use std::sync::Arc;

use scm_core::{Address, DeviceId, FixedClock, SafetyCheckId, SiteId};
use scm_crypto::{create_address, is_on_curve, IdentityKeyPair};
use scm_ledger::{InMemoryLedger, Ledger};
use scm_registry::{
    DeviceStatus, ProgramContext, ProgramIds, Record, RegistryError, SafetyCheckProgram,
    SafetyCheckRequest,
};

const T0: i64 = 1_717_000_000;

struct Fixture {
    program: SafetyCheckProgram,
    ledger: InMemoryLedger<Record>,
    clock: Arc<FixedClock>,
    authority: Address,
    inspector: Address,
}

fn fixture() -> Fixture {
    let ledger = InMemoryLedger::new();
    let clock = Arc::new(FixedClock::new(T0));
    let program = SafetyCheckProgram::new(ProgramContext::new(
        Arc::new(ledger.clone()),
        clock.clone(),
        ProgramIds::default(),
    ));
    Fixture {
        program,
        ledger,
        clock,
        authority: IdentityKeyPair::from_seed(&[1; 32]).address(),
        inspector: IdentityKeyPair::from_seed(&[2; 32]).address(),
    }
}

fn site() -> SiteId {
    SiteId::new("S1").unwrap()
}

fn device() -> DeviceId {
    DeviceId::new("D1").unwrap()
}

fn request(id: &str, days: i64, inspector: Address) -> SafetyCheckRequest {
    SafetyCheckRequest {
        site_id: site(),
        device_id: device(),
        safety_check_id: SafetyCheckId::new(id).unwrap(),
        name: "Fire extinguisher".into(),
        symbol: "SCM".into(),
        uri: "https://example.com/checks/c1.json".into(),
        duration_in_days: days,
        inspector,
    }
}

fn register(f: &Fixture) {
    f.program.create_site(site(), f.authority).unwrap();
    f.program
        .create_inspector(site(), f.inspector, &f.authority)
        .unwrap();
    f.program
        .create_device(site(), device(), &f.authority)
        .unwrap();
}

#[test]
fn full_scenario_five_day_certificate() {
    let f = fixture();
    register(&f);

    let issued = f
        .program
        .create_safety_check(request("C1", 5, f.inspector), &f.inspector)
        .unwrap();
    let check = &issued.safety_check;
    assert_eq!(check.created_at, T0);
    assert_eq!(check.expires_at, T0 + 432_000);
    assert_eq!(check.duration_in_days, 5);

    let stored = f
        .program
        .safety_check(&site(), &device(), &SafetyCheckId::new("C1").unwrap())
        .unwrap()
        .unwrap();
    assert_eq!(&stored.record, check);
    assert_eq!(stored.address, issued.address);

    let dev = f.program.device(&site(), &device()).unwrap().unwrap();
    assert_eq!(dev.record.last_safety_check, Some(issued.address));
    assert_eq!(dev.record.expires_at, Some(check.expires_at));

    let mint = f.program.proof_mint(&issued.address).unwrap().unwrap();
    assert_eq!(mint.address, check.proof_token);
    assert_eq!(mint.record.supply, 1);
    assert_eq!(mint.record.decimals, 0);
    assert_eq!(mint.record.mint_authority, dev.address);

    let vault = f
        .program
        .token_vault(&dev.address, &check.proof_token)
        .unwrap()
        .unwrap();
    assert_eq!(vault.record.amount, 1);
    assert_eq!(vault.record.owner, dev.address);

    let metadata = f.program.token_metadata(&check.proof_token).unwrap().unwrap();
    assert_eq!(metadata.record.name, "Fire extinguisher");
    assert_eq!(metadata.record.symbol, "SCM");
    assert_eq!(metadata.record.seller_fee_basis_points, 0);

    let edition = f.program.master_edition(&check.proof_token).unwrap().unwrap();
    assert_eq!(edition.record.max_supply, Some(1));
    assert_eq!(edition.record.supply, 0);

    // All six writes landed in one commit.
    assert_eq!(f.ledger.get(&issued.address).unwrap().slot, issued.receipt.slot);
    assert_eq!(f.ledger.get(&dev.address).unwrap().slot, issued.receipt.slot);
}

#[test]
fn second_certificate_moves_device_forward() {
    let f = fixture();
    register(&f);
    f.program
        .create_safety_check(request("C1", 5, f.inspector), &f.inspector)
        .unwrap();

    f.clock.advance(86_400);
    let second = f
        .program
        .create_safety_check(request("C2", 30, f.inspector), &f.inspector)
        .unwrap();

    let dev = f.program.device(&site(), &device()).unwrap().unwrap();
    assert_eq!(dev.version, 2);
    assert_eq!(dev.record.last_safety_check, Some(second.address));
    assert_eq!(dev.record.expires_at, Some(T0 + 86_400 + 30 * 86_400));

    // The first certificate is untouched.
    let first = f
        .program
        .safety_check(&site(), &device(), &SafetyCheckId::new("C1").unwrap())
        .unwrap()
        .unwrap();
    assert_eq!(first.version, 0);
    assert_eq!(first.record.expires_at, T0 + 432_000);
}

#[test]
fn device_expires_at_always_matches_latest_certificate() {
    let f = fixture();
    register(&f);
    for (i, days) in [3_i64, 1, 90, 7].into_iter().enumerate() {
        f.clock.advance(3_600);
        let issued = f
            .program
            .create_safety_check(request(&format!("C{i}"), days, f.inspector), &f.inspector)
            .unwrap();
        let dev = f.program.device(&site(), &device()).unwrap().unwrap();
        let latest = f
            .program
            .safety_check(&site(), &device(), &SafetyCheckId::new(format!("C{i}")).unwrap())
            .unwrap()
            .unwrap();
        assert_eq!(dev.record.last_safety_check, Some(issued.address));
        assert_eq!(dev.record.expires_at, Some(latest.record.expires_at));
    }
}

#[test]
fn status_follows_the_clock() {
    let f = fixture();
    register(&f);
    f.program
        .create_safety_check(request("C1", 5, f.inspector), &f.inspector)
        .unwrap();
    assert_eq!(
        f.program.device_status(&site(), &device(), T0).unwrap(),
        DeviceStatus::Valid {
            expires_at: T0 + 432_000
        }
    );
    assert_eq!(
        f.program
            .device_status(&site(), &device(), T0 + 432_000)
            .unwrap(),
        DeviceStatus::Expired {
            expired_at: T0 + 432_000
        }
    );
}

#[test]
fn inspector_of_another_site_is_not_found() {
    let f = fixture();
    register(&f);
    let other = SiteId::new("S2").unwrap();
    let stranger = IdentityKeyPair::from_seed(&[3; 32]).address();
    f.program.create_site(other.clone(), f.authority).unwrap();
    f.program
        .create_inspector(other, stranger, &f.authority)
        .unwrap();

    // Registered at S2 only, so no inspector record exists at S1.
    assert!(matches!(
        f.program
            .create_safety_check(request("C1", 5, stranger), &stranger),
        Err(RegistryError::InspectorNotFound { .. })
    ));
}

#[test]
fn every_stored_bump_reverifies() {
    let f = fixture();
    register(&f);
    let issued = f
        .program
        .create_safety_check(request("C1", 5, f.inspector), &f.inspector)
        .unwrap();
    let check = &issued.safety_check;
    let programs = ProgramIds::default();

    let mint_bump = [check.mint_bump];
    let mint = create_address(
        &[b"safety_check_mint", issued.address.as_ref(), &mint_bump],
        &programs.registry,
    )
    .unwrap();
    assert_eq!(mint, check.proof_token);

    let bump = [check.bump];
    let address = create_address(
        &[b"safety_check", b"S1", b"D1", b"C1", &bump],
        &programs.registry,
    )
    .unwrap();
    assert_eq!(address, issued.address);

    for record_address in &issued.receipt.addresses {
        assert!(!is_on_curve(record_address.as_bytes()));
    }
}
