use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::browser::surface::{ElementHandle, ElementState, Locator, NodeSnapshot, Surface};
use crate::error::{Result, SynthError};

/// Request sent to the browser helper over stdin (one JSON line).
#[derive(Debug, Serialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum BrowserRequest {
    Navigate {
        url: String,
    },
    WaitSettled,
    Title,
    CurrentUrl,
    QueryAll {
        locator: Locator,
        #[serde(skip_serializing_if = "Option::is_none")]
        wait_ms: Option<u64>,
    },
    HasGlobal {
        name: String,
    },
    Action {
        action: &'static str,
        locator: Locator,
        index: usize,
        #[serde(skip_serializing_if = "Option::is_none")]
        value: Option<String>,
    },
    WaitFor {
        locator: Locator,
        index: usize,
        state: ElementState,
        timeout_ms: u64,
    },
    Quit,
}

impl BrowserRequest {
    pub fn name(&self) -> &'static str {
        match self {
            BrowserRequest::Navigate { .. } => "navigate",
            BrowserRequest::WaitSettled => "wait_settled",
            BrowserRequest::Title => "title",
            BrowserRequest::CurrentUrl => "current_url",
            BrowserRequest::QueryAll { .. } => "query_all",
            BrowserRequest::HasGlobal { .. } => "has_global",
            BrowserRequest::Action { action, .. } => *action,
            BrowserRequest::WaitFor { .. } => "wait_for",
            BrowserRequest::Quit => "quit",
        }
    }

    fn action(action: &'static str, handle: &ElementHandle, value: Option<&str>) -> Self {
        BrowserRequest::Action {
            action,
            locator: handle.locator.clone(),
            index: handle.index,
            value: value.map(str::to_string),
        }
    }
}

/// Response received from the browser helper over stdout (one JSON line).
#[derive(Debug, Deserialize)]
pub struct BrowserResponse {
    pub ok: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub ready: Option<bool>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub nodes: Option<Vec<NodeSnapshot>>,
    #[serde(default)]
    pub present: Option<bool>,
}

/// A persistent Playwright session backed by a Node.js helper script.
///
/// The helper keeps one Chromium page open. Commands go out as NDJSON on
/// stdin and each produces exactly one response line on stdout.
pub struct BrowserSession {
    child: Child,
    stdin: ChildStdin,
    reader: BufReader<ChildStdout>,
    script: String,
    closed: bool,
}

impl std::fmt::Debug for BrowserSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BrowserSession")
            .field("script", &self.script)
            .field("closed", &self.closed)
            .finish()
    }
}

impl BrowserSession {
    /// Launch a new session by spawning `node <script>` and waiting for its ready line.
    pub fn launch(script: &str) -> Result<Self> {
        let mut child = Command::new("node")
            .arg(script)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| SynthError::SubprocessSpawn {
                script: script.into(),
                source: e,
            })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| SynthError::SessionIO(format!("Failed to capture stdin of {}", script)))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| SynthError::SessionIO(format!("Failed to capture stdout of {}", script)))?;

        let mut reader = BufReader::new(stdout);

        let mut line = String::new();
        reader
            .read_line(&mut line)
            .map_err(|e| SynthError::SessionIO(format!("Failed to read ready signal: {}", e)))?;

        let response: BrowserResponse =
            serde_json::from_str(line.trim()).map_err(|e| SynthError::JsonParse {
                context: format!("{} ready signal", script),
                source: e,
            })?;

        if !response.ok || response.ready != Some(true) {
            return Err(SynthError::SessionProtocol {
                command: "launch".into(),
                error: format!("Did not receive ready signal from {}", script),
            });
        }

        debug!(script, "browser session ready");

        Ok(BrowserSession {
            child,
            stdin,
            reader,
            script: script.to_string(),
            closed: false,
        })
    }

    fn send(&mut self, request: &BrowserRequest) -> Result<BrowserResponse> {
        if self.closed {
            return Err(SynthError::SessionIO("Session already released".into()));
        }

        let json = serde_json::to_string(request).map_err(|e| SynthError::JsonSerialize {
            context: "BrowserRequest".into(),
            source: e,
        })?;

        writeln!(self.stdin, "{}", json)
            .and_then(|()| self.stdin.flush())
            .map_err(|e| SynthError::SessionIO(format!("Failed to write to {}: {}", self.script, e)))?;

        let mut line = String::new();
        self.reader
            .read_line(&mut line)
            .map_err(|e| SynthError::SessionIO(format!("Failed to read from {}: {}", self.script, e)))?;

        if line.trim().is_empty() {
            return Err(SynthError::SessionIO(format!(
                "Empty response from {} (process may have died)",
                self.script
            )));
        }

        serde_json::from_str(line.trim()).map_err(|e| SynthError::JsonParse {
            context: format!("{} response", request.name()),
            source: e,
        })
    }

    /// Send a request and verify it succeeded.
    fn send_ok(&mut self, request: &BrowserRequest) -> Result<BrowserResponse> {
        let response = self.send(request)?;
        if !response.ok {
            return Err(SynthError::SessionProtocol {
                command: request.name().into(),
                error: response.error.unwrap_or_else(|| "Unknown error".into()),
            });
        }
        Ok(response)
    }

    fn missing(command: &str, field: &str) -> SynthError {
        SynthError::SessionProtocol {
            command: command.into(),
            error: format!("No {} in response", field),
        }
    }
}

impl Surface for BrowserSession {
    fn navigate(&mut self, address: &str) -> Result<()> {
        self.send_ok(&BrowserRequest::Navigate {
            url: address.to_string(),
        })?;
        Ok(())
    }

    fn wait_settled(&mut self) -> Result<()> {
        self.send_ok(&BrowserRequest::WaitSettled)?;
        Ok(())
    }

    fn title(&mut self) -> Result<String> {
        let response = self.send_ok(&BrowserRequest::Title)?;
        Ok(response.title.unwrap_or_default())
    }

    fn current_url(&mut self) -> Result<String> {
        let response = self.send_ok(&BrowserRequest::CurrentUrl)?;
        response.url.ok_or_else(|| Self::missing("current_url", "url"))
    }

    fn query_all(&mut self, locator: &Locator, wait_ms: Option<u64>) -> Result<Vec<NodeSnapshot>> {
        let response = self.send_ok(&BrowserRequest::QueryAll {
            locator: locator.clone(),
            wait_ms,
        })?;
        response.nodes.ok_or_else(|| Self::missing("query_all", "nodes"))
    }

    fn has_global(&mut self, name: &str) -> Result<bool> {
        let response = self.send_ok(&BrowserRequest::HasGlobal {
            name: name.to_string(),
        })?;
        Ok(response.present.unwrap_or(false))
    }

    fn click(&mut self, handle: &ElementHandle) -> Result<()> {
        self.send_ok(&BrowserRequest::action("click", handle, None))?;
        Ok(())
    }

    fn fill(&mut self, handle: &ElementHandle, value: &str) -> Result<()> {
        self.send_ok(&BrowserRequest::action("fill", handle, Some(value)))?;
        Ok(())
    }

    fn select_option(&mut self, handle: &ElementHandle, label: &str) -> Result<()> {
        self.send_ok(&BrowserRequest::action("select_option", handle, Some(label)))?;
        Ok(())
    }

    fn hover(&mut self, handle: &ElementHandle) -> Result<()> {
        self.send_ok(&BrowserRequest::action("hover", handle, None))?;
        Ok(())
    }

    fn wait_for_state(
        &mut self,
        handle: &ElementHandle,
        state: ElementState,
        timeout_ms: u64,
    ) -> Result<()> {
        self.send_ok(&BrowserRequest::WaitFor {
            locator: handle.locator.clone(),
            index: handle.index,
            state,
            timeout_ms,
        })?;
        Ok(())
    }

    fn release(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        // Best-effort quit; the helper may already be gone
        let _ = self.send(&BrowserRequest::Quit);
        self.closed = true;
        let _ = self.child.wait();
        Ok(())
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        let _ = self.release();
    }
}
