use std::io;
use std::net::TcpListener;

use chromate_cdp::cdp::browser_protocol::target::TargetInfo;

/// Asks the OS for a currently free local port.
///
/// The port is released again before the browser binds it; the tiny race is
/// inherent to the handoff.
pub(crate) fn free_port() -> io::Result<u16> {
    let listener = TcpListener::bind(("127.0.0.1", 0))?;
    Ok(listener.local_addr()?.port())
}

/// Field-level difference between two target snapshots, for debug logging.
pub(crate) fn target_info_diff(
    old: &TargetInfo,
    new: &TargetInfo,
) -> Vec<(&'static str, String, String)> {
    let mut changes = Vec::new();
    if old.r#type != new.r#type {
        changes.push(("type", old.r#type.clone(), new.r#type.clone()));
    }
    if old.title != new.title {
        changes.push(("title", old.title.clone(), new.title.clone()));
    }
    if old.url != new.url {
        changes.push(("url", old.url.clone(), new.url.clone()));
    }
    if old.attached != new.attached {
        changes.push(("attached", old.attached.to_string(), new.attached.to_string()));
    }
    changes
}
