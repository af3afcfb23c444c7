//! UFCx interface version
//!
//! Generated modules and the host library must agree on the interface
//! version before any symbol in a module is trusted. Modules embed the
//! version at generation time via [`define_ufcx_abi_version!`]; the host
//! checks it with [`is_compatible`] at load time.
//!
//! [`define_ufcx_abi_version!`]: crate::define_ufcx_abi_version

/// Major version of the UFCx interface
pub const UFCX_VERSION_MAJOR: u32 = 0;

/// Minor version of the UFCx interface
pub const UFCX_VERSION_MINOR: u32 = 9;

/// Maintenance version of the UFCx interface
pub const UFCX_VERSION_MAINTENANCE: u32 = 0;

/// Nonzero for release builds, zero for development builds
pub const UFCX_VERSION_RELEASE: u32 = 0;

/// Full version string; development builds carry a `.dev0` suffix
pub const UFCX_VERSION: &str = if UFCX_VERSION_RELEASE != 0 {
    "0.9.0"
} else {
    "0.9.0.dev0"
};

/// Pack a major/minor pair into the single `u32` exchanged across the
/// module boundary.
pub const fn pack_abi_version(major: u32, minor: u32) -> u32 {
    (major << 16) | (minor & 0xffff)
}

/// Packed interface version of this build
pub const ABI_VERSION: u32 = pack_abi_version(UFCX_VERSION_MAJOR, UFCX_VERSION_MINOR);

/// Version string assembled from the version constants
pub fn version_string() -> String {
    let base = format!("{UFCX_VERSION_MAJOR}.{UFCX_VERSION_MINOR}.{UFCX_VERSION_MAINTENANCE}");
    if UFCX_VERSION_RELEASE != 0 {
        base
    } else {
        format!("{base}.dev0")
    }
}

/// Whether a module compiled against `module_version` can be consumed by
/// this build.
///
/// Pre-1.0 the interface may change between minor versions, so while the
/// major version is 0 an exact major.minor match is required. From 1.0 on,
/// matching majors are sufficient.
pub fn is_compatible(module_version: u32) -> bool {
    let major = module_version >> 16;
    let minor = module_version & 0xffff;
    if UFCX_VERSION_MAJOR == 0 {
        major == 0 && minor == UFCX_VERSION_MINOR
    } else {
        major == UFCX_VERSION_MAJOR
    }
}
