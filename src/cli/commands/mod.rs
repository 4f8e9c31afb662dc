pub mod document;
pub mod entry;
pub mod system;

use crate::cli::core::CommandError;
use crate::cli::registry::CommandRegistry;

pub fn register_all(registry: &mut CommandRegistry) {
    for entry in entry::definitions()
        .into_iter()
        .chain(document::definitions())
        .chain(system::definitions())
    {
        registry.register(entry);
    }
}

pub(crate) fn usage_error(usage: &str) -> CommandError {
    CommandError::InvalidArguments(format!("usage: {usage}"))
}
