//! Privilege checks and security resets
//!
//! These are the actions the CLI hands to the walker as visitors; the walker
//! itself never calls into this module.
//!
//! On Unix a privilege is the capability that grants the same power as the
//! Windows privilege of the same role, and a security reset means taking
//! ownership and granting everyone full access through the permission bits.

use std::fmt;
use std::fs;
use std::io;
use std::path::Path;
use std::str::FromStr;

use tracing::debug;

use crate::error::SecurityError;

/// Permission bits granting everyone full access.
pub const FULL_ACCESS_MODE: u32 = 0o777;

/// A privilege needed to rewrite ownership and permissions of any node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Privilege {
    /// Read any file or directory (`SeBackupPrivilege`, `CAP_DAC_READ_SEARCH`)
    Backup,
    /// Write any file or directory (`SeRestorePrivilege`, `CAP_DAC_OVERRIDE`)
    Restore,
    /// Take ownership of any node (`SeTakeOwnershipPrivilege`, `CAP_CHOWN`)
    TakeOwnership,
}

impl Privilege {
    /// The privileges the reset tool enables before touching anything.
    pub const REQUIRED: [Privilege; 3] = [
        Privilege::Backup,
        Privilege::Restore,
        Privilege::TakeOwnership,
    ];

    pub fn windows_name(self) -> &'static str {
        match self {
            Privilege::Backup => "SeBackupPrivilege",
            Privilege::Restore => "SeRestorePrivilege",
            Privilege::TakeOwnership => "SeTakeOwnershipPrivilege",
        }
    }

    pub fn capability_name(self) -> &'static str {
        match self {
            Privilege::Backup => "CAP_DAC_READ_SEARCH",
            Privilege::Restore => "CAP_DAC_OVERRIDE",
            Privilege::TakeOwnership => "CAP_CHOWN",
        }
    }

    /// Capability bits that grant this privilege; any one of them is enough.
    ///
    /// `CAP_DAC_OVERRIDE` is a superset of `CAP_DAC_READ_SEARCH`, so it also
    /// satisfies the backup privilege.
    #[cfg_attr(not(target_os = "linux"), allow(dead_code))]
    fn capability_mask(self) -> u64 {
        const CAP_CHOWN: u64 = 1 << 0;
        const CAP_DAC_OVERRIDE: u64 = 1 << 1;
        const CAP_DAC_READ_SEARCH: u64 = 1 << 2;

        match self {
            Privilege::TakeOwnership => CAP_CHOWN,
            Privilege::Restore => CAP_DAC_OVERRIDE,
            Privilege::Backup => CAP_DAC_READ_SEARCH | CAP_DAC_OVERRIDE,
        }
    }
}

impl fmt::Display for Privilege {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.windows_name(), self.capability_name())
    }
}

impl FromStr for Privilege {
    type Err = SecurityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Privilege::REQUIRED
            .into_iter()
            .find(|p| {
                s.eq_ignore_ascii_case(p.windows_name()) || s.eq_ignore_ascii_case(p.capability_name())
            })
            .ok_or_else(|| SecurityError::UnknownPrivilege { name: s.to_string() })
    }
}

/// Make sure the process holds the named privilege.
///
/// Accepts either the Windows privilege name or the Linux capability name.
/// A Unix process cannot grant itself a capability it was not started with, so
/// this checks the effective set rather than adjusting it.
pub fn elevate(name: &str) -> Result<(), SecurityError> {
    let privilege: Privilege = name.parse()?;
    if holds(privilege)? {
        debug!(privilege = %privilege, "privilege held");
        Ok(())
    } else {
        Err(SecurityError::PrivilegeNotHeld {
            name: privilege.to_string(),
        })
    }
}

#[cfg(target_os = "linux")]
fn holds(privilege: Privilege) -> Result<bool, SecurityError> {
    let status = fs::read_to_string("/proc/self/status")
        .map_err(|source| SecurityError::Query { source })?;
    let effective = parse_effective_capabilities(&status).ok_or_else(|| SecurityError::Query {
        source: io::Error::new(io::ErrorKind::InvalidData, "no CapEff line in /proc/self/status"),
    })?;
    Ok(effective & privilege.capability_mask() != 0)
}

#[cfg(all(unix, not(target_os = "linux")))]
fn holds(_privilege: Privilege) -> Result<bool, SecurityError> {
    Ok(rustix::process::geteuid().as_raw() == 0)
}

#[cfg(not(unix))]
fn holds(_privilege: Privilege) -> Result<bool, SecurityError> {
    Err(SecurityError::Unsupported)
}

/// Parse the hex `CapEff:` mask out of `/proc/<pid>/status` text.
#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn parse_effective_capabilities(status: &str) -> Option<u64> {
    status
        .lines()
        .find_map(|line| line.strip_prefix("CapEff:"))
        .and_then(|mask| u64::from_str_radix(mask.trim(), 16).ok())
}

/// Ownership and permissions to stamp onto every visited node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SecurityDescriptor {
    /// New owner uid; `None` leaves the owner alone
    pub owner: Option<u32>,
    /// New group gid; `None` leaves the group alone
    pub group: Option<u32>,
    /// Permission bits, applied to everything except symlink nodes
    pub mode: u32,
}

impl Default for SecurityDescriptor {
    /// Owned by root, everyone gets full access.
    fn default() -> Self {
        Self {
            owner: Some(0),
            group: Some(0),
            mode: FULL_ACCESS_MODE,
        }
    }
}

impl SecurityDescriptor {
    /// Owned by the effective user and group of this process, full access.
    #[cfg(unix)]
    pub fn current_user() -> Self {
        Self {
            owner: Some(rustix::process::geteuid().as_raw()),
            group: Some(rustix::process::getegid().as_raw()),
            mode: FULL_ACCESS_MODE,
        }
    }

    /// Apply this descriptor to `path` itself, never to a link's target.
    ///
    /// Contents, timestamps and other attributes are left as they are.
    #[cfg(unix)]
    pub fn apply(&self, path: &Path) -> Result<(), SecurityError> {
        use std::os::unix::fs::{PermissionsExt, lchown};

        let wrap = |source: io::Error| SecurityError::Apply {
            path: path.to_path_buf(),
            source,
        };

        // chown clears setuid/setgid, so ownership goes first
        if self.owner.is_some() || self.group.is_some() {
            lchown(path, self.owner, self.group).map_err(wrap)?;
        }

        let meta = fs::symlink_metadata(path).map_err(wrap)?;
        if !meta.file_type().is_symlink() {
            fs::set_permissions(path, fs::Permissions::from_mode(self.mode & 0o7777))
                .map_err(wrap)?;
        }
        Ok(())
    }

    #[cfg(not(unix))]
    pub fn apply(&self, _path: &Path) -> Result<(), SecurityError> {
        Err(SecurityError::Unsupported)
    }
}

/// Reset `path` to the default descriptor: root-owned, full access for everyone.
pub fn reset_security(path: &Path) -> Result<(), SecurityError> {
    SecurityDescriptor::default().apply(path)
}
