// Threshold rules over host stats and containers. Alerts are rebuilt on every call.

use uuid::Uuid;

use crate::models::{Alert, AlertAction, Container, ContainerStatus, HostStats, Severity};

pub const CPU_WARNING_PERCENT: f64 = 85.0;
pub const DISK_CRITICAL_RATIO: f64 = 0.85;

fn alert(severity: Severity, title: &str, message: String) -> Alert {
    Alert {
        id: Uuid::new_v4().to_string(),
        severity,
        title: title.to_string(),
        message,
        container_id: None,
        action: None,
    }
}

pub fn build_alerts(host: &HostStats, containers: &[Container], dangling_images: usize) -> Vec<Alert> {
    let mut alerts = Vec::new();

    if host.cpu_usage > CPU_WARNING_PERCENT {
        alerts.push(alert(
            Severity::Warning,
            "High CPU Usage",
            format!("Host CPU usage is at {}%.", host.cpu_usage),
        ));
    }

    if host.disk_total > 0.0 && host.disk_usage / host.disk_total > DISK_CRITICAL_RATIO {
        alerts.push(alert(
            Severity::Critical,
            "Low Disk Space",
            format!(
                "Docker is using {}GB of {}GB available.",
                host.disk_usage, host.disk_total
            ),
        ));
    }

    for container in containers
        .iter()
        .filter(|c| c.status == ContainerStatus::Restarting)
    {
        alerts.push(Alert {
            container_id: Some(container.id.clone()),
            ..alert(
                Severity::Critical,
                "Container Restarting",
                format!("Container \"{}\" is restarting repeatedly.", container.name),
            )
        });
    }

    if dangling_images > 0 {
        alerts.push(Alert {
            action: Some(AlertAction::ViewDanglingImages),
            ..alert(
                Severity::Warning,
                "Dangling Images",
                format!(
                    "There are {} dangling images that can be pruned.",
                    dangling_images
                ),
            )
        });
    }

    alerts
}
