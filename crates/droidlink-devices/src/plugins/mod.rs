//! Bridge-backed stat providers.
//!
//! Each provider is bound to one device qualifier, issues its bridge calls
//! on first use, and memoizes the parsed snapshot for its own lifetime. The
//! device keeps one provider instance per stat, so repeated stat queries
//! reuse the cached snapshot.

mod audio;
mod battery;
mod disk;
mod memory;

pub use audio::AudioProvider;
pub use battery::BatteryProvider;
pub use disk::DiskProvider;
pub use memory::MemoryProvider;
