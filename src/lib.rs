//! Developer utilities for the Polyglot Connect web app: directory backup,
//! project scaffolding, asset migration into `public/` and Firestore group
//! seeding.

pub mod fs_op;
pub mod relocate;
pub mod report;
pub mod scaffold;
pub mod seed;
pub mod settings;
pub mod snapshot;

pub use settings::Settings;
