// linkstash services
// Long-running operations layered over the managers.

pub mod import_transformer;
