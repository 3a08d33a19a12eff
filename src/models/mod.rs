// Display models (camelCase JSON, shared with the dashboard)

mod alert;
mod api;
mod container;
mod event;
mod host;
mod resources;

pub use alert::{Alert, AlertAction, Severity};
pub use api::{
    ApiResponse, CreateContainerRequest, CreateResourceRequest, ExecRequest, LogsQuery,
    PortMappingRequest, PullRequest,
};
pub use container::{
    Container, ContainerDetails, ContainerStatus, NetworkIdentity, Port, RestartPolicy,
    VolumeMount,
};
pub use event::{ActivityEvent, ContainerEvent, EventAction, EventType, LogEntry};
pub use host::{ContainerSummary, HostDetails, HostStats, OverviewPayload, OverviewSummary};
pub use resources::{DANGLING_NAME, DockerImage, DockerNetwork, DockerVolume, PruneReport};
