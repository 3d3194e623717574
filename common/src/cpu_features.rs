//! CPU feature detection for runtime SIMD dispatch.
//!
//! Detection runs once; later calls read the cached flags instead of issuing
//! CPUID again.

use std::sync::OnceLock;

/// SIMD capabilities used by the plane kernels.
#[derive(Debug, Clone, Copy, Default)]
pub struct X86Features {
    pub sse2: bool,
}

static FEATURES: OnceLock<X86Features> = OnceLock::new();

#[cfg(target_arch = "x86_64")]
#[inline]
pub fn get() -> X86Features {
    *FEATURES.get_or_init(|| X86Features {
        sse2: is_x86_feature_detected!("sse2"),
    })
}

#[cfg(not(target_arch = "x86_64"))]
#[inline]
pub fn get() -> X86Features {
    *FEATURES.get_or_init(X86Features::default)
}

#[inline]
pub fn has_sse2() -> bool {
    get().sse2
}
