// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Identification of a local file with the external tool battery

pub mod markdown;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::config::{IdentifyConfig, ToolsConfig};
use crate::normalizers::{parse_exiftool, parse_magic, parse_ssdeep, parse_trid};
use crate::tools::ToolRunner;

/// libmagic classification of a file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMagic {
    #[serde(rename = "mime")]
    pub mime_type: String,
    pub description: String,
}

/// Combined output of every identification tool for one file
///
/// Field names on the wire follow the tools that produced them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentificationResult {
    pub magic: FileMagic,
    #[serde(rename = "ssdeep")]
    pub fuzzy_hash: String,
    #[serde(rename = "trid")]
    pub signature_matches: Option<Vec<String>>,
    #[serde(rename = "exiftool")]
    pub metadata_tags: Option<BTreeMap<String, String>>,
    #[serde(rename = "markdown", default, skip_serializing_if = "Option::is_none")]
    pub rendered_summary: Option<String>,
}

/// Runs the identification tools against a file and assembles the result
///
/// Each call builds its own result value, so concurrent calls never share
/// state.
pub struct Identifier {
    runner: Arc<dyn ToolRunner>,
    tools: ToolsConfig,
    deadline: Duration,
    render_markdown: bool,
}

impl Identifier {
    pub fn new(runner: Arc<dyn ToolRunner>, config: &IdentifyConfig) -> Self {
        Self {
            runner,
            tools: config.tools.clone(),
            deadline: config.deadline(),
            render_markdown: config.render_markdown,
        }
    }

    /// Identify the file at `path`
    ///
    /// Never fails: a tool that errors or runs out of time leaves its error
    /// text in the corresponding field and the remaining tools still run.
    pub async fn identify(&self, path: &Path) -> IdentificationResult {
        let deadline = Instant::now() + self.deadline;
        info!("Identifying: {:?}", path);

        let file = self.tools.file.as_str();
        let mime = self.runner.run(file, &["-L", "-b", "--mime-type"], path, deadline).await;
        let description = self.runner.run(file, &["-L", "-b"], path, deadline).await;
        let ssdeep = self.runner.run(&self.tools.ssdeep, &[], path, deadline).await;
        let trid = self.runner.run(&self.tools.trid, &[], path, deadline).await;
        let exiftool = self.runner.run(&self.tools.exiftool, &[], path, deadline).await;

        for (name, run) in [("ssdeep", &ssdeep), ("trid", &trid), ("exiftool", &exiftool)] {
            if let Some(e) = &run.error {
                warn!("{} failed on {:?}: {}", name, path, e);
            }
        }

        let mut result = IdentificationResult {
            magic: FileMagic {
                mime_type: parse_magic(&mime.output, mime.error.as_ref()),
                description: parse_magic(&description.output, description.error.as_ref()),
            },
            fuzzy_hash: parse_ssdeep(&ssdeep.output, ssdeep.error.as_ref()),
            signature_matches: parse_trid(&trid.output, trid.error.as_ref()),
            metadata_tags: parse_exiftool(&exiftool.output, exiftool.error.as_ref()),
            rendered_summary: None,
        };

        if self.render_markdown {
            match markdown::render(&result) {
                Ok(summary) => result.rendered_summary = Some(summary),
                Err(e) => warn!("Failed to render summary for {:?}: {}", path, e),
            }
        }

        debug!("Identification of {:?}: mime={} ssdeep={}", path, result.magic.mime_type, result.fuzzy_hash);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::{ToolError, ToolOutput};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Returns canned output per program and records every invocation
    #[derive(Default)]
    struct ScriptedRunner {
        outputs: HashMap<String, ToolOutput>,
        calls: Mutex<Vec<(String, Vec<String>, Instant)>>,
    }

    impl ScriptedRunner {
        fn with(mut self, key: &str, output: ToolOutput) -> Self {
            self.outputs.insert(key.to_string(), output);
            self
        }
    }

    #[async_trait]
    impl ToolRunner for ScriptedRunner {
        async fn run(&self, program: &str, args: &[&str], _path: &Path, deadline: Instant) -> ToolOutput {
            self.calls.lock().unwrap().push((
                program.to_string(),
                args.iter().map(|a| a.to_string()).collect(),
                deadline,
            ));
            // `file` is keyed by its mode so the two magic runs can differ
            let key = if program == "file" && args.contains(&"--mime-type") {
                "file-mime".to_string()
            } else {
                program.to_string()
            };
            self.outputs.get(&key).cloned().unwrap_or_default()
        }
    }

    fn not_found(program: &str) -> ToolOutput {
        ToolOutput::failed(ToolError::NotFound { program: program.to_string() })
    }

    #[tokio::test]
    async fn test_assembles_all_tool_outputs() {
        let runner = ScriptedRunner::default()
            .with("file-mime", ToolOutput::ok("application/pdf\n"))
            .with("file", ToolOutput::ok("PDF document, version 1.4\n"))
            .with("ssdeep", ToolOutput::ok("ssdeep,1.1--blocksize:hash:hash,filename\n3:abc:def,\"/tmp/x\"\n"))
            .with("trid", ToolOutput::ok("\n\n\n\n\n\n 89.0% (.PDF) Adobe Portable Document Format (5000/1)\n"))
            .with("exiftool", ToolOutput::ok("PDF Version : 1.4\nDirectory : /tmp\n"));
        let identifier = Identifier::new(Arc::new(runner), &IdentifyConfig::default());

        let result = identifier.identify(Path::new("/tmp/x")).await;

        assert_eq!(result.magic.mime_type, "application/pdf");
        assert_eq!(result.magic.description, "PDF document, version 1.4");
        assert_eq!(result.fuzzy_hash, "3:abc:def");
        assert_eq!(
            result.signature_matches,
            Some(vec!["89.0% (.PDF) Adobe Portable Document Format (5000/1)".to_string()])
        );
        let tags = result.metadata_tags.unwrap();
        assert_eq!(tags.len(), 1);
        assert_eq!(tags.get("PDFVersion").map(String::as_str), Some("1.4"));
        assert_eq!(result.rendered_summary, None);
    }

    #[tokio::test]
    async fn test_every_tool_failing_still_yields_result() {
        let runner = ScriptedRunner::default()
            .with("file-mime", not_found("file"))
            .with("file", not_found("file"))
            .with("ssdeep", not_found("ssdeep"))
            .with("trid", ToolOutput::failed(ToolError::TimedOut { program: "trid".to_string() }))
            .with("exiftool", not_found("exiftool"));
        let identifier = Identifier::new(Arc::new(runner), &IdentifyConfig::default());

        let result = identifier.identify(Path::new("/tmp/x")).await;

        assert_eq!(result.magic.mime_type, "file: executable file not found");
        assert_eq!(result.magic.description, "file: executable file not found");
        assert_eq!(result.fuzzy_hash, "ssdeep: executable file not found");
        assert_eq!(result.signature_matches, Some(vec!["trid: deadline exceeded".to_string()]));
        assert_eq!(
            result.metadata_tags.unwrap().get("error").map(String::as_str),
            Some("exiftool: executable file not found")
        );
    }

    #[tokio::test]
    async fn test_tools_share_one_deadline() {
        let runner = Arc::new(ScriptedRunner::default());
        let mut config = IdentifyConfig::default();
        config.tools.ssdeep = "/opt/ssdeep".to_string();
        let identifier = Identifier::new(runner.clone(), &config);

        let before = Instant::now();
        identifier.identify(Path::new("/tmp/x")).await;

        let calls = runner.calls.lock().unwrap();
        let programs: Vec<&str> = calls.iter().map(|(p, _, _)| p.as_str()).collect();
        assert_eq!(programs, vec!["file", "file", "/opt/ssdeep", "trid", "exiftool"]);
        assert!(calls.iter().all(|(_, _, d)| *d == calls[0].2));
        assert!(calls[0].2 >= before + Duration::from_secs(60));
        assert_eq!(calls[0].1, vec!["-L", "-b", "--mime-type"]);
    }

    #[tokio::test]
    async fn test_renders_summary_when_enabled() {
        let runner = ScriptedRunner::default().with("file-mime", ToolOutput::ok("text/plain"));
        let config = IdentifyConfig { render_markdown: true, ..IdentifyConfig::default() };
        let identifier = Identifier::new(Arc::new(runner), &config);

        let result = identifier.identify(Path::new("/tmp/x")).await;
        let summary = result.rendered_summary.unwrap();
        assert!(summary.contains("text/plain"));
    }

    #[test]
    fn test_wire_format() {
        let result = IdentificationResult {
            magic: FileMagic { mime_type: "text/plain".to_string(), description: "ASCII text".to_string() },
            fuzzy_hash: "3:a:b".to_string(),
            signature_matches: None,
            metadata_tags: Some(BTreeMap::from([("FileSize".to_string(), "1 kB".to_string())])),
            rendered_summary: None,
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "magic": {"mime": "text/plain", "description": "ASCII text"},
                "ssdeep": "3:a:b",
                "trid": null,
                "exiftool": {"FileSize": "1 kB"}
            })
        );
    }
}
