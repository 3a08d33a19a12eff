// Engine payloads for container creation and exec.

use serde_json::{Map, Value, json};

use crate::models::CreateContainerRequest;

/// `POST /containers/create` body. Absent values are left out rather than sent as null.
pub fn build_create_payload(request: &CreateContainerRequest, image: &str) -> Value {
    let mut exposed = Map::new();
    let mut bindings = Map::new();
    for port in &request.ports {
        let Some(container_port) = port.container_port.as_deref() else {
            continue;
        };
        let protocol = port
            .protocol
            .as_deref()
            .filter(|p| !p.is_empty())
            .unwrap_or("tcp");
        let key = format!("{}/{}", container_port, protocol);
        exposed.insert(key.clone(), json!({}));
        if let Some(host_port) = port.host_port.as_deref() {
            bindings.insert(key, json!([{ "HostPort": host_port }]));
        }
    }

    let mut host_config = Map::new();
    if !bindings.is_empty() {
        host_config.insert("PortBindings".into(), Value::Object(bindings));
    }
    host_config.insert(
        "RestartPolicy".into(),
        json!({ "Name": request.restart_policy.unwrap_or_default().as_str() }),
    );

    let mut payload = Map::new();
    payload.insert("Image".into(), json!(image));
    if let Some(cmd) = request
        .command
        .as_deref()
        .map(split_command)
        .filter(|c| !c.is_empty())
    {
        payload.insert("Cmd".into(), json!(cmd));
    }
    if let Some(env) = &request.env {
        let entries: Vec<String> = env.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
        payload.insert("Env".into(), json!(entries));
    }
    if !exposed.is_empty() {
        payload.insert("ExposedPorts".into(), Value::Object(exposed));
    }
    payload.insert("HostConfig".into(), Value::Object(host_config));
    Value::Object(payload)
}

/// `POST /containers/{id}/exec` body for a TTY exec capturing stdout and stderr.
pub fn build_exec_payload(command: &str) -> Value {
    json!({
        "AttachStdout": true,
        "AttachStderr": true,
        "Cmd": split_command(command),
        "Tty": true,
    })
}

fn split_command(command: &str) -> Vec<&str> {
    command.split_whitespace().collect()
}
