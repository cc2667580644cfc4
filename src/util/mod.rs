//! Internal helpers shared by the Jenkins client and the webhook notifier.

pub(crate) mod diagnostics;
pub(crate) mod redact;
pub(crate) mod url;
