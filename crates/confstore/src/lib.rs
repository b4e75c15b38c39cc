//! confstore: a minimal YAML-backed configuration store
//!
//! One [`ConfigStore`] per backing file. The file is read lazily on the
//! first accessor, mutations stay in memory, and [`ConfigStore::save`]
//! rewrites the whole document. There is no file locking and no merge
//! logic; the store assumes it is the only writer for its lifetime.
//!
//! # Example
//!
//! ```rust
//! use confstore::ConfigStore;
//!
//! let path = std::env::temp_dir().join("confstore-doc-example.yml");
//! # std::fs::remove_file(&path).ok();
//! let mut store = ConfigStore::open(&path).unwrap();
//!
//! assert_eq!(store.get("editor").unwrap(), None);
//! store.set("editor", "vim").unwrap();
//! store.save().unwrap();
//!
//! let mut reopened = ConfigStore::open(&path).unwrap();
//! assert_eq!(reopened.get("editor").unwrap().unwrap().as_str(), Some("vim"));
//! # std::fs::remove_file(&path).ok();
//! ```

pub mod error;
pub mod value;

mod store;

pub use error::{Error, ErrorKind, Result};
pub use store::ConfigStore;
pub use value::Value;
