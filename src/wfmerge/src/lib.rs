//! # wfmerge
//!
//! Fuses warframe, archwing and necramech definitions from several
//! independently maintained data sources into one normalized document.
//!
//! The pipeline:
//! - Loads each source, degrading missing or malformed optional sources to
//!   empty input
//! - Extracts base stats through alias tables and projects rank-30 values
//! - Applies polarity fallbacks and manual overrides in fixed precedence
//! - Enriches abilities by joining on name, then internal path, then
//!   manual override
//! - Assembles the `{generatedAt, count, entities}` document
//!
//! ## Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let paths = wfmerge::SourcePaths::in_dir(Path::new("data"));
//! let doc = wfmerge::run(&paths, &wfmerge::MergeConfig::default(), chrono::Utc::now())?;
//! wfmerge::write_document(Path::new("data/merged_warframe.json"), &doc)?;
//! println!("{} entities", doc.count);
//! # Ok(())
//! # }
//! ```

pub mod abilities;
pub mod assemble;
pub mod entity;
pub mod error;
pub mod index;
pub mod output;
pub mod overrides;
pub mod pipeline;
pub mod sources;
pub mod stats;
pub mod text;

#[doc(inline)]
pub use assemble::{assemble, slug_collisions, DatasetDocument, SlugCollision};
#[doc(inline)]
pub use entity::{Ability, AbilitySummary, Cost, Entity, EntityType, Modifier, StatBlock};
#[doc(inline)]
pub use error::MergeError;
#[doc(inline)]
pub use output::{entities_digest, read_document, write_document};
#[doc(inline)]
pub use pipeline::{merge, run, MergeConfig};
#[doc(inline)]
pub use sources::{SourcePaths, Sources};
#[doc(inline)]
pub use stats::{RankException, RankProjector, StatAliases};
