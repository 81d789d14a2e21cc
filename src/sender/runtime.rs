//! Keeps blocking HTTP work off async runtime threads.
//!
//! reqwest's blocking client panics when it is built, used or dropped on a
//! thread driving a tokio runtime. Logging calls can come from such threads,
//! so that work is moved to a scoped thread and joined.

use std::cell::Cell;

thread_local! {
    static DELIVERING: Cell<bool> = const { Cell::new(false) };
}

/// True while a delivery is in progress on this thread.
pub fn is_delivering() -> bool {
    DELIVERING.with(Cell::get)
}

/// Marks the current thread as delivering until dropped.
pub struct DeliveryGuard {
    previous: bool,
}

impl DeliveryGuard {
    pub fn enter() -> Self {
        let previous = DELIVERING.with(|flag| flag.replace(true));
        Self { previous }
    }
}

impl Drop for DeliveryGuard {
    fn drop(&mut self) {
        let previous = self.previous;
        DELIVERING.with(|flag| flag.set(previous));
    }
}

/// Runs `f` inline, or on a scoped thread when called from inside a tokio
/// runtime. Blocks the caller until `f` returns either way.
pub fn off_runtime<T, F>(f: F) -> std::thread::Result<T>
where
    F: FnOnce() -> T + Send,
    T: Send,
{
    if tokio::runtime::Handle::try_current().is_err() {
        return Ok(f());
    }
    std::thread::scope(|scope| scope.spawn(f).join())
}
