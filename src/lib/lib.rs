#![warn(
    missing_debug_implementations,
    rust_2018_idioms,
    missing_docs,
    rustdoc::broken_intra_doc_links,
    rustdoc::missing_crate_level_docs
)]

//! Course registration mailer: turns registration form submissions into
//! notification emails for the institute's staff mailbox

pub mod domain;
pub mod infrastructure;
