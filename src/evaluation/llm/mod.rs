//! Model-assisted questionnaire analysis.

pub mod parser;
pub mod prompt;

use std::sync::Arc;

use log::debug;

use crate::evaluation::input::ParsedInput;
use crate::llm::{LlmClient, LlmError};
use crate::supporting_file::SupportingFile;

pub use parser::{extract_analysis, ExtractedAnalysis};

/// Sends a questionnaire to the text-generation collaborator once.
///
/// There is no retry: a failed call is returned as-is so the caller can fall
/// back immediately.
pub struct ModelAnalyzer {
    client: Arc<dyn LlmClient>,
}

impl ModelAnalyzer {
    pub fn new(client: Arc<dyn LlmClient>) -> Self {
        Self { client }
    }

    pub fn analyze(
        &self,
        input: &ParsedInput,
        file: Option<&SupportingFile>,
    ) -> Result<ExtractedAnalysis, LlmError> {
        let prompt_text = prompt::build_analysis_prompt(input, file);
        debug!("Sending analysis prompt ({} chars)", prompt_text.len());

        let response = self.client.complete(&prompt_text)?;
        debug!(
            "Model response received: {}",
            crate::utils::prefix_chars(&response, 100)
        );

        Ok(extract_analysis(&response))
    }
}
