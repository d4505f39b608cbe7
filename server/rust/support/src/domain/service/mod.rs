pub mod enterprise_release;
pub mod freshness;
pub mod ticket_translator;
pub mod version_fold;

pub use enterprise_release::{enterprise_release, enterprise_repo_url};
pub use freshness::is_fresh;
pub use ticket_translator::translate_ticket;
pub use version_fold::{fold_release_tags, fold_step};
