// Engine payloads to dashboard models, and request bodies to Engine payloads.

mod container;
mod create;
mod host;
mod resources;

pub use container::{build_container, build_container_details};
pub use create::{build_create_payload, build_exec_payload};
pub use host::{build_host_details, build_host_stats};
pub use resources::{build_images, build_networks, build_volumes, split_reference};
