use std::sync::atomic::{AtomicBool, Ordering};

/// Flag allowing at most one bootstrap sequence at a time.
#[derive(Debug, Default)]
pub struct LoadingFlag {
    loading: AtomicBool,
}

impl LoadingFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes the flag, or returns `None` when a sequence already holds it.
    /// Callers that get `None` drop their trigger; nothing is queued.
    pub fn try_acquire(&self) -> Option<LoadingGuard<'_>> {
        self.loading
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| LoadingGuard { flag: self })
    }

    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::Acquire)
    }
}

/// RAII guard releasing the [`LoadingFlag`] when the sequence ends,
/// however it ends.
#[derive(Debug)]
pub struct LoadingGuard<'a> {
    flag: &'a LoadingFlag,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.flag.loading.store(false, Ordering::Release);
        log::debug!("LoadingGuard: bootstrap sequence released");
    }
}
