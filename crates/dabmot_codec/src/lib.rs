//! # dabmot codec
//!
//! Bit-exact binary parsing for the MOT transport (ETSI EN 301 234).
//!
//! This crate decodes the binary structures an MOT receiver sees on the
//! wire, without holding any reassembly state:
//! - the 7-byte header core (body size, header size, content type/subtype)
//! - the TLV header-extension parameter stream shared by headers and the
//!   directory extension
//! - textual parameters in the DAB character sets
//! - the 13-byte directory core and its entry stream
//!
//! Parsing over broadcast input is best-effort where the protocol demands
//! it: extension scanning reports boundary violations as a structured
//! outcome instead of aborting, so the reassembly layer can keep running
//! on noisy input while never letting a damaged header complete an object.
//!
//! ## Usage
//!
//! ```
//! use dabmot_codec::{HeaderCore, scan_extension};
//!
//! let core = HeaderCore { body_size: 10, header_size: 7, content_type: 2, content_subtype: 5 };
//! let parsed = HeaderCore::parse(&core.encode()).unwrap();
//! assert_eq!(parsed.body_size, 10);
//!
//! let scan = scan_extension(&[]);
//! assert!(!scan.truncated);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod charset;
mod directory;
mod error;
mod header;
mod params;

pub use charset::{decode_text, CharsetId};
pub use directory::{DirectoryCore, DirectoryEntries, DirectoryEntry, DIRECTORY_CORE_LEN};
pub use error::{CodecError, CodecResult};
pub use header::{HeaderCore, HEADER_CORE_LEN};
pub use params::{scan_extension, ExtParameter, ExtensionScan};
