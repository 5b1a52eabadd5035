//! Fallback retrieval through an external command-line HTTP client
//!
//! Used when the primary fetch produced binary content that could not be
//! decoded. The client is invoked curl-style with transparent decompression
//! and redirect following enabled.

use std::io;
use std::time::Duration;
use tokio::process::Command;

/// Extra time granted to the child process beyond its own `--max-time`
const PROCESS_GRACE: Duration = Duration::from_secs(5);

/// Builds the argument list passed to the external client
pub fn client_args(url: &str, user_agent: &str, timeout: Duration) -> Vec<String> {
    vec![
        "--silent".to_string(),
        "--show-error".to_string(),
        "--location".to_string(),
        "--compressed".to_string(),
        "--max-time".to_string(),
        timeout.as_secs().max(1).to_string(),
        "--user-agent".to_string(),
        user_agent.to_string(),
        url.to_string(),
    ]
}

/// Runs `program` against `url` and returns its stdout
///
/// Fails if the program cannot be spawned, exits unsuccessfully, or overruns
/// the timeout.
pub async fn fetch_with_client(
    program: &str,
    url: &str,
    user_agent: &str,
    timeout: Duration,
) -> io::Result<Vec<u8>> {
    let mut command = Command::new(program);
    command
        .args(client_args(url, user_agent, timeout))
        .kill_on_drop(true);

    let output = tokio::time::timeout(timeout + PROCESS_GRACE, command.output())
        .await
        .map_err(|_| {
            io::Error::new(
                io::ErrorKind::TimedOut,
                format!("{} timed out fetching {}", program, url),
            )
        })??;

    if !output.status.success() {
        return Err(io::Error::new(
            io::ErrorKind::Other,
            format!(
                "{} exited with {}: {}",
                program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            ),
        ));
    }

    Ok(output.stdout)
}
