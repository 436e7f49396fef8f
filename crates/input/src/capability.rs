use std::fmt::Debug;

/// Pointer-lock support, resolved once at startup from an ordered list of
/// host mechanisms (e.g. a native lock, then a confining fallback).
///
/// After probing, callers branch on the result; nothing is re-probed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockCapability<M> {
    Available(M),
    Unavailable,
}

impl<M: Copy + Debug> LockCapability<M> {
    /// Pick the first candidate `supported` accepts.
    pub fn probe(
        candidates: impl IntoIterator<Item = M>,
        mut supported: impl FnMut(M) -> bool,
    ) -> Self {
        for mode in candidates {
            if supported(mode) {
                tracing::info!(?mode, "pointer lock available");
                return Self::Available(mode);
            }
            tracing::debug!(?mode, "pointer lock mechanism rejected");
        }
        tracing::warn!("pointer lock unavailable; mouse look disabled for this session");
        Self::Unavailable
    }

    pub fn mode(&self) -> Option<M> {
        match self {
            Self::Available(m) => Some(*m),
            Self::Unavailable => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available(_))
    }
}
