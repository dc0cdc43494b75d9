//! # Ledger Workspace
//!
//! Loads program ids and the ledger snapshot for one CLI invocation and
//! writes the snapshot back after a successful write.
//!
//! A workspace holds an exclusive lock on `<ledger>.lock` for its whole
//! lifetime, so overlapping invocations run one after another and each one
//! reads the snapshot its predecessor saved. The lock lives on a sidecar
//! file because `save` replaces the ledger file by rename.

use std::ffi::OsString;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use fs2::FileExt;
use scm_core::{Clock, FixedClock, SystemClock};
use scm_crypto::IdentityKeyPair;
use scm_ledger::{InMemoryLedger, LedgerSnapshot};
use scm_registry::{ProgramContext, ProgramIds, Record, SafetyCheckProgram};

use crate::GlobalOptions;

/// Program ids from `--config` (or defaults), then `SCM_*_PROGRAM` overrides.
pub fn load_programs(config: Option<&Path>) -> Result<ProgramIds> {
    let base = match config {
        Some(path) => ProgramIds::from_yaml_file(path)?,
        None => ProgramIds::default(),
    };
    Ok(base.with_env_overrides()?)
}

/// Read an identity from a key file holding the hex secret seed.
pub fn load_identity(path: &Path) -> Result<IdentityKeyPair> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read key file: {}", path.display()))?;
    IdentityKeyPair::from_seed_hex(raw.trim())
        .with_context(|| format!("invalid key file: {}", path.display()))
}

/// Path of the lock file guarding a ledger snapshot.
pub fn lock_path(ledger: &Path) -> PathBuf {
    let mut name = OsString::from(ledger.as_os_str());
    name.push(".lock");
    PathBuf::from(name)
}

/// Block until the ledger lock is ours. Released when the file is dropped.
fn lock_ledger(ledger: &Path) -> Result<File> {
    let path = lock_path(ledger);
    let file = OpenOptions::new()
        .create(true)
        .read(true)
        .write(true)
        .truncate(false)
        .open(&path)
        .with_context(|| format!("failed to open ledger lock: {}", path.display()))?;
    file.lock_exclusive()
        .with_context(|| format!("failed to lock ledger: {}", path.display()))?;
    tracing::debug!(path = %path.display(), "ledger lock acquired");
    Ok(file)
}

/// The state a single command operates on.
#[derive(Debug)]
pub struct Workspace {
    // Held until drop.
    _lock: File,
    ledger_path: PathBuf,
    ledger: InMemoryLedger<Record>,
    program: SafetyCheckProgram,
}

impl Workspace {
    /// Lock the ledger, then load its snapshot, or start an empty ledger if
    /// the file does not exist yet. Blocks while another workspace holds the
    /// same ledger.
    pub fn open(opts: &GlobalOptions) -> Result<Self> {
        let programs = load_programs(opts.config.as_deref())?;
        let lock = lock_ledger(&opts.ledger)?;
        let snapshot = if opts.ledger.exists() {
            let raw = std::fs::read_to_string(&opts.ledger)
                .with_context(|| format!("failed to read ledger: {}", opts.ledger.display()))?;
            serde_json::from_str::<LedgerSnapshot<Record>>(&raw)
                .with_context(|| format!("failed to parse ledger: {}", opts.ledger.display()))?
        } else {
            tracing::info!(path = %opts.ledger.display(), "ledger file not found; starting empty");
            LedgerSnapshot::default()
        };
        tracing::debug!(slot = snapshot.slot, accounts = snapshot.accounts.len(), "ledger loaded");

        let clock: Arc<dyn Clock> = match opts.now {
            Some(now) => Arc::new(FixedClock::new(now)),
            None => Arc::new(SystemClock),
        };
        let ledger = InMemoryLedger::from_snapshot(snapshot);
        let program = SafetyCheckProgram::new(ProgramContext::new(
            Arc::new(ledger.clone()),
            clock,
            programs,
        ));
        Ok(Self {
            _lock: lock,
            ledger_path: opts.ledger.clone(),
            ledger,
            program,
        })
    }

    pub fn program(&self) -> &SafetyCheckProgram {
        &self.program
    }

    pub fn programs(&self) -> &ProgramIds {
        &self.program.context().programs
    }

    /// Write the ledger back. The file is replaced by rename so a crash
    /// never leaves a half-written snapshot.
    pub fn save(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.ledger.snapshot())
            .context("failed to serialize ledger")?;
        let tmp = self.ledger_path.with_extension("json.tmp");
        std::fs::write(&tmp, json)
            .with_context(|| format!("failed to write ledger: {}", tmp.display()))?;
        std::fs::rename(&tmp, &self.ledger_path)
            .with_context(|| format!("failed to replace ledger: {}", self.ledger_path.display()))?;
        tracing::debug!(path = %self.ledger_path.display(), slot = self.ledger.slot(), "ledger saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scm_core::{Address, DeviceId, SiteId};
    use scm_registry::RegistryError;
    use std::sync::mpsc;
    use std::time::Duration;

    const AUTHORITY: Address = Address::new([1; 32]);

    fn opts(dir: &Path) -> GlobalOptions {
        GlobalOptions {
            config: None,
            ledger: dir.join("ledger.json"),
            now: Some(1_000),
        }
    }

    #[test]
    fn missing_ledger_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let ws = Workspace::open(&opts(dir.path())).unwrap();
        assert!(ws.program().site(&SiteId::new("S1").unwrap()).unwrap().is_none());
        assert!(!dir.path().join("ledger.json").exists());
    }

    #[test]
    fn save_and_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let ws = Workspace::open(&opts(dir.path())).unwrap();
        ws.program()
            .create_site(SiteId::new("S1").unwrap(), Address::new([1; 32]))
            .unwrap();
        ws.save().unwrap();

        let reopened = Workspace::open(&opts(dir.path())).unwrap();
        let site = reopened
            .program()
            .site(&SiteId::new("S1").unwrap())
            .unwrap()
            .unwrap();
        assert_eq!(site.record.authority, Address::new([1; 32]));
        assert!(!dir.path().join("ledger.json.tmp").exists());
    }

    #[test]
    fn corrupt_ledger_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("ledger.json"), "not json").unwrap();
        let err = Workspace::open(&opts(dir.path())).unwrap_err();
        assert!(format!("{err:#}").contains("failed to parse ledger"));
    }

    #[test]
    fn key_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let key = IdentityKeyPair::from_seed(&[9; 32]);
        let path = dir.path().join("id.key");
        std::fs::write(&path, format!("{}\n", key.seed_hex())).unwrap();
        assert_eq!(load_identity(&path).unwrap().address(), key.address());
    }

    #[test]
    fn config_file_sets_program_ids() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scm.yaml");
        std::fs::write(&path, format!("registry: \"{}\"\n", "ab".repeat(32))).unwrap();
        let programs = load_programs(Some(&path)).unwrap();
        assert_eq!(programs.registry, Address::new([0xab; 32]));
    }

    #[test]
    fn lock_is_held_until_drop() {
        let dir = tempfile::tempdir().unwrap();
        let opts = opts(dir.path());
        let ws = Workspace::open(&opts).unwrap();

        let other = File::open(lock_path(&opts.ledger)).unwrap();
        assert!(other.try_lock_exclusive().is_err());
        drop(ws);
        assert!(other.try_lock_exclusive().is_ok());
    }

    #[test]
    fn overlapping_workspaces_serialize() {
        let dir = tempfile::tempdir().unwrap();
        let opts = opts(dir.path());
        let site = SiteId::new("S1").unwrap();
        let ws = Workspace::open(&opts).unwrap();
        ws.program().create_site(site.clone(), AUTHORITY).unwrap();
        ws.save().unwrap();
        drop(ws);

        let (opened, wait_opened) = mpsc::channel();
        std::thread::scope(|s| {
            let (opts, site) = (&opts, &site);
            let first = s.spawn(move || {
                let ws = Workspace::open(opts).unwrap();
                opened.send(()).unwrap();
                // Give the second workspace time to block on the lock.
                std::thread::sleep(Duration::from_millis(100));
                ws.program()
                    .create_device(site.clone(), DeviceId::new("D1").unwrap(), &AUTHORITY)
                    .unwrap();
                ws.program()
                    .create_device(site.clone(), DeviceId::new("D2").unwrap(), &AUTHORITY)
                    .unwrap();
                ws.save().unwrap();
            });
            let second = s.spawn(move || {
                wait_opened.recv().unwrap();
                let ws = Workspace::open(opts).unwrap();
                let duplicate = ws.program().create_device(
                    site.clone(),
                    DeviceId::new("D1").unwrap(),
                    &AUTHORITY,
                );
                assert!(matches!(duplicate, Err(RegistryError::AlreadyExists { .. })));
                ws.program()
                    .create_device(site.clone(), DeviceId::new("D3").unwrap(), &AUTHORITY)
                    .unwrap();
                ws.save().unwrap();
            });
            first.join().unwrap();
            second.join().unwrap();
        });

        let ws = Workspace::open(&opts).unwrap();
        for id in ["D1", "D2", "D3"] {
            assert!(
                ws.program()
                    .device(&site, &DeviceId::new(id).unwrap())
                    .unwrap()
                    .is_some(),
                "{id} missing after both saves"
            );
        }
    }
}
