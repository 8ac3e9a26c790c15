use tracing::{debug, error, info, warn};

/// Logs command start with consistent format
pub fn log_command_start(command: &str, user: &str, user_id: u64, details: Option<&str>) {
    match details {
        Some(d) => info!("CMD_START: {} by {}({}) - {}", command, user, user_id, d),
        None => info!("CMD_START: {} by {}({})", command, user, user_id),
    }
}

/// Logs command completion with consistent format
pub fn log_command_success(command: &str, user: &str, user_id: u64, details: Option<&str>) {
    match details {
        Some(d) => info!("CMD_SUCCESS: {} by {}({}) - {}", command, user, user_id, d),
        None => info!("CMD_SUCCESS: {} by {}({})", command, user, user_id),
    }
}

/// Logs command errors with consistent format
pub fn log_command_error(command: &str, user: &str, user_id: u64, error: &str) {
    error!("CMD_ERROR: {} by {}({}) - {}", command, user, user_id, error);
}

/// Logs rejected input for a form step
pub fn log_validation_error(step: &str, value: &str, error: &str, user_id: u64) {
    warn!(
        "VALIDATION_ERROR: step '{}' rejected '{}': {} - user {}",
        step, value, error, user_id
    );
}

/// Logs form progress for one user
pub fn log_workflow_step(user_id: u64, from: &str, to: Option<&str>) {
    match to {
        Some(next) => debug!("FORM_STEP: user {} {} -> {}", user_id, from, next),
        None => debug!("FORM_STEP: user {} {} -> commit", user_id, from),
    }
}

/// Logs database errors with consistent format
pub fn log_database_error(operation: &str, table: &str, error: &str) {
    error!("DB_ERROR: {} on {} failed: {}", operation, table, error);
}

/// Logs a failed notification delivery
pub fn log_dispatch_error(recipient: i64, subject: &str, error: &str) {
    warn!("DISPATCH_ERROR: to {} about {} - {}", recipient, subject, error);
}

/// Logs system events with consistent format
pub fn log_system_event(event: &str, details: Option<&str>) {
    match details {
        Some(d) => info!("SYSTEM: {} - {}", event, d),
        None => info!("SYSTEM: {}", event),
    }
}
