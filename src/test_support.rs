use tokio::sync::Mutex as AsyncMutex;

/// Serializes tests that read or mutate process environment variables.
/// `.blocking_lock()` in sync tests, `.lock().await` in async tests.
pub static ENV_LOCK: AsyncMutex<()> = AsyncMutex::const_new(());
