//! Prompt construction for model-assisted questionnaire analysis.

use crate::evaluation::input::ParsedInput;
use crate::supporting_file::SupportingFile;

fn render_input(input: &ParsedInput) -> String {
    match input {
        ParsedInput::PlainText { text } => text.clone(),
        ParsedInput::Structured { value } => {
            serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
        }
    }
}

/// Builds the analysis prompt for a questionnaire and optional file.
pub fn build_analysis_prompt(input: &ParsedInput, file: Option<&SupportingFile>) -> String {
    let mut prompt = format!(
        r#"You are an experienced mining systems evaluation expert. Your task is to analyze mining evaluation system questionnaire answers and provide a comprehensive assessment.

QUESTIONNAIRE ANSWERS:
{}

Please conduct an in-depth analysis using the following criteria:

1. TECHNICAL EVALUATION:
   - Completeness of mining methodology
   - Compliance with industry standards
   - Safety and environmental aspects
   - Operational efficiency

2. MANAGEMENT EVALUATION:
   - Planning and strategy
   - Resource management
   - Monitoring and control systems
   - Compliance and regulations

3. SUSTAINABILITY ASPECTS:
   - Environmental impact
   - Social responsibility
   - Economic sustainability
   - Technological innovation

Provide the results in JSON format with the following structure:
{{
    "analysis": "comprehensive analysis in English (maximum 500 words)",
    "score": [score 1-100 based on overall evaluation],
    "recommendations": ["recommendation 1", "recommendation 2", "recommendation 3"]
}}

Ensure the analysis is objective, constructive, and provides useful insights for mining system improvements.
"#,
        render_input(input)
    );

    if let Some(file) = file {
        prompt.push_str("\n\nSUPPORTING FILE INFORMATION:\n");
        prompt.push_str(&file.summary());
    }

    prompt
}
