//! # Live Gal
//!
//! The core of a live event photo wall: operators drop photos in while the
//! event runs, and viewers see them newest first in a waterfall of columns.
//!
//! # Flow
//!
//! ```text
//! files ─▶ ingest ─▶ imaging (≤1600px JPEG) ─▶ PhotoRecord ─▶ PhotoStore ─▶ layout
//!                                                              │
//!                                                              ▼
//!                                                      event_photos.json
//! ```
//!
//! The settings singleton (title and banner) lives beside the photos in
//! `event_settings.json`.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`gallery`] | Session facade: opens the data directory, wires stores, backend, and layout |
//! | [`ingest`] | Batch transcoding with capture-time staggering and progress events |
//! | [`imaging`] | Decode, bound, and re-encode photos as JPEG data URLs |
//! | [`store`] | Durable key/value layer plus the photo and settings stores |
//! | [`layout`] | Round-robin waterfall columns and viewport breakpoints |
//! | [`config`] | `config.toml` loading, merging over stock defaults, validation |
//! | [`types`] | Durable records (`PhotoRecord`, `GallerySettings`) |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Memory Is Truth, Disk Is a Mirror
//!
//! Each store answers reads from memory and rewrites its whole blob after
//! every mutation. A failed write is logged, reported as
//! [`store::Persisted`], and otherwise ignored: the session keeps working
//! and the next mutation tries again.
//!
//! ## Bounded Photos
//!
//! Photos are stored inline as `data:image/jpeg;base64,...` URLs, so their
//! size drives everything else. Bounding the long edge to 1600px at JPEG
//! quality 80 keeps a typical photo in the low hundreds of kilobytes. When
//! the quota still runs out, only the 50 newest photos are mirrored.
//!
//! ## Batch Order Without Sequence Numbers
//!
//! The collection is ordered by capture time alone. Files of one batch are
//! stamped 10ms apart, and the merge is a stable sort over `new ++ existing`,
//! so a batch keeps its selection order even if two stamps collide.
//!
//! ## Position-Only Layout
//!
//! Columns are dealt round-robin by position. The layout never needs
//! rendered heights, so it is the same for every viewer with the same
//! column count.

pub mod config;
pub mod gallery;
pub mod imaging;
pub mod ingest;
pub mod layout;
pub mod output;
pub mod store;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
