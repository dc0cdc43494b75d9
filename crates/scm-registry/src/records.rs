//! # Ledger Records
//!
//! Every account the registry reads or writes holds one [`Record`]. The
//! registry program owns sites, inspectors, devices and safety checks; the
//! token program owns the proof mint and the device vault; the metadata
//! program owns the descriptor and the master edition.

use scm_core::{Address, DeviceId, SafetyCheckId, SiteId, UnixTimestamp};
use serde::{Deserialize, Serialize};

use crate::config::ProgramIds;

/// An organizational site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Site {
    /// Caller-chosen site identifier.
    pub site_id: SiteId,
    /// The only identity allowed to register inspectors and devices.
    pub authority: Address,
    /// Bump of the site address.
    pub bump: u8,
}

/// An inspector registered under a site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inspector {
    /// Site the inspector belongs to.
    pub site_id: SiteId,
    /// Identity of the inspector.
    pub owner: Address,
    /// Bump of the inspector address.
    pub bump: u8,
}

/// A physical device under a site.
///
/// `last_safety_check` and `expires_at` are either both absent (never
/// inspected) or both present and taken from the same certificate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    /// Site the device belongs to.
    pub site_id: SiteId,
    /// Device identifier within the site.
    pub device_id: DeviceId,
    /// Address of the most recent certificate.
    pub last_safety_check: Option<Address>,
    /// Expiry of the most recent certificate.
    pub expires_at: Option<UnixTimestamp>,
    /// Bump of the device address.
    pub bump: u8,
}

impl Device {
    /// Whether a certificate has ever been issued for this device.
    pub fn is_inspected(&self) -> bool {
        self.last_safety_check.is_some()
    }
}

/// An immutable safety check certificate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetyCheck {
    /// Site of the inspected device.
    pub site_id: SiteId,
    /// Inspected device.
    pub device_id: DeviceId,
    /// Certificate identifier within the device.
    pub safety_check_id: SafetyCheckId,
    /// Address of the inspector record that issued the certificate.
    pub inspector: Address,
    /// Validity period in days.
    pub duration_in_days: i64,
    /// Ledger time of issuance.
    pub created_at: UnixTimestamp,
    /// `created_at + duration_in_days * 86400`.
    pub expires_at: UnixTimestamp,
    /// Address of the proof mint.
    pub proof_token: Address,
    /// Bump of the certificate address.
    pub bump: u8,
    /// Bump of the proof mint address.
    pub mint_bump: u8,
    /// Bump of the metadata address.
    pub metadata_bump: u8,
    /// Bump of the master edition address.
    pub master_edition_bump: u8,
}

/// The proof-token: one indivisible unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofMint {
    /// Always 0.
    pub decimals: u8,
    /// Always 1.
    pub supply: u64,
    /// The device the token was minted for.
    pub mint_authority: Address,
    /// The device the token was minted for.
    pub freeze_authority: Option<Address>,
}

/// Token account holding the proof unit for a device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenVault {
    /// Mint of the held token.
    pub mint: Address,
    /// Device that owns the vault.
    pub owner: Address,
    /// Units held.
    pub amount: u64,
}

/// Descriptive metadata of a proof-token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenMetadata {
    /// Described mint.
    pub mint: Address,
    /// Identity allowed to update the descriptor.
    pub update_authority: Address,
    /// Display name.
    pub name: String,
    /// Ticker symbol.
    pub symbol: String,
    /// Off-ledger descriptor location.
    pub uri: String,
    /// Always 0: proof-tokens carry no royalties.
    pub seller_fee_basis_points: u16,
}

/// Edition record pinning a proof-token as one of one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MasterEdition {
    /// Edition mint.
    pub mint: Address,
    /// Prints made so far.
    pub supply: u64,
    /// Prints allowed.
    pub max_supply: Option<u64>,
}

/// Discriminant of a [`Record`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    /// [`Site`]
    Site,
    /// [`Inspector`]
    Inspector,
    /// [`Device`]
    Device,
    /// [`SafetyCheck`]
    SafetyCheck,
    /// [`ProofMint`]
    ProofMint,
    /// [`TokenVault`]
    TokenVault,
    /// [`TokenMetadata`]
    TokenMetadata,
    /// [`MasterEdition`]
    MasterEdition,
}

impl RecordKind {
    /// Returns the kind identifier string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Site => "site",
            Self::Inspector => "inspector",
            Self::Device => "device",
            Self::SafetyCheck => "safety_check",
            Self::ProofMint => "proof_mint",
            Self::TokenVault => "token_vault",
            Self::TokenMetadata => "token_metadata",
            Self::MasterEdition => "master_edition",
        }
    }

    /// The program that owns accounts of this kind.
    pub fn owner(&self, programs: &ProgramIds) -> Address {
        match self {
            Self::Site | Self::Inspector | Self::Device | Self::SafetyCheck => programs.registry,
            Self::ProofMint | Self::TokenVault => programs.token,
            Self::TokenMetadata | Self::MasterEdition => programs.metadata,
        }
    }
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Any record stored on the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Record {
    /// An organizational site.
    Site(Site),
    /// An inspector registered at a site.
    Inspector(Inspector),
    /// A device registered at a site.
    Device(Device),
    /// A safety check certificate.
    SafetyCheck(SafetyCheck),
    /// The proof-token mint of a certificate.
    ProofMint(ProofMint),
    /// A device's holding of a proof token.
    TokenVault(TokenVault),
    /// Display metadata of a proof token.
    TokenMetadata(TokenMetadata),
    /// One-of-one edition marker of a proof token.
    MasterEdition(MasterEdition),
}

impl Record {
    /// The discriminant of this record.
    pub fn kind(&self) -> RecordKind {
        match self {
            Self::Site(_) => RecordKind::Site,
            Self::Inspector(_) => RecordKind::Inspector,
            Self::Device(_) => RecordKind::Device,
            Self::SafetyCheck(_) => RecordKind::SafetyCheck,
            Self::ProofMint(_) => RecordKind::ProofMint,
            Self::TokenVault(_) => RecordKind::TokenVault,
            Self::TokenMetadata(_) => RecordKind::TokenMetadata,
            Self::MasterEdition(_) => RecordKind::MasterEdition,
        }
    }
}

/// A concrete record type that can be pulled out of a [`Record`].
pub trait RecordType: Sized {
    /// The variant this type is stored under.
    const KIND: RecordKind;

    /// Unwrap the record if it has the right variant.
    fn from_record(record: Record) -> Option<Self>;

    /// Wrap into a [`Record`].
    fn into_record(self) -> Record;
}

macro_rules! record_type {
    ($ty:ident) => {
        impl RecordType for $ty {
            const KIND: RecordKind = RecordKind::$ty;

            fn from_record(record: Record) -> Option<Self> {
                match record {
                    Record::$ty(inner) => Some(inner),
                    _ => None,
                }
            }

            fn into_record(self) -> Record {
                Record::$ty(self)
            }
        }
    };
}

record_type!(Site);
record_type!(Inspector);
record_type!(Device);
record_type!(SafetyCheck);
record_type!(ProofMint);
record_type!(TokenVault);
record_type!(TokenMetadata);
record_type!(MasterEdition);
