use crate::{Result, Version};

/// Connection-side collaborator of the capability probe. The generator reads
/// the server version exactly once, at construction; no other part of the
/// connection is touched.
pub trait DatabaseAdapter {
    fn server_version(&self) -> Result<Version>;
}
