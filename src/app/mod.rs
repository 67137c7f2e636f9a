mod ask;

use std::fs;
use std::io::{self, Read};
use std::path::Path;
use std::sync::Arc;

use log::{debug, info};

use crate::cli::{AskArgs, Command, EvaluateArgs};
use crate::evaluation::{format_report, EvaluationEngine, EvaluationReport};
use crate::llm::{LlmClient, LlmError};
use crate::supporting_file::SupportingFile;

pub use ask::{ask_once, run_session};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    Input(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Llm(#[from] LlmError),
    #[error("{0}")]
    User(String),
}

pub struct App {
    client: Arc<dyn LlmClient>,
    engine: EvaluationEngine,
}

impl App {
    pub fn new(client: Arc<dyn LlmClient>) -> Self {
        Self {
            engine: EvaluationEngine::new(Arc::clone(&client)),
            client,
        }
    }

    pub fn run(&self, command: Command) -> Result<(), AppError> {
        match command {
            Command::Evaluate(opts) => self.handle_evaluate(opts),
            Command::Ask(opts) => self.handle_ask(opts),
        }
    }

    fn handle_evaluate(&self, opts: EvaluateArgs) -> Result<(), AppError> {
        let report = self.evaluate(&opts)?;
        println!("{}", format_report(&report, opts.format.into()));
        Ok(())
    }

    /// Run an evaluation without printing it.
    pub fn evaluate(&self, opts: &EvaluateArgs) -> Result<EvaluationReport, AppError> {
        let answers = match (&opts.answers, &opts.input) {
            (Some(text), _) => text.clone(),
            (None, Some(path)) if path != Path::new("-") => read_questionnaire_file(path)?,
            (None, _) => read_stdin()?,
        };

        let file = match &opts.file {
            Some(path) => {
                let file = SupportingFile::from_path(path).map_err(|e| {
                    AppError::User(format!(
                        "Cannot read supporting file {}: {}",
                        path.display(),
                        e
                    ))
                })?;
                debug!("Loaded supporting file {} ({} bytes)", file.name, file.bytes.len());
                Some(file)
            }
            None => None,
        };

        info!("Evaluating questionnaire ({} bytes)", answers.len());
        let result = self.engine.evaluate(&answers, file.as_ref());
        info!("Evaluation complete: score {:.2}", result.score);

        Ok(EvaluationReport::new(result))
    }

    fn handle_ask(&self, opts: AskArgs) -> Result<(), AppError> {
        match opts.prompt {
            Some(prompt) => {
                let reply = ask_once(self.client.as_ref(), &prompt)?;
                println!("{}", reply.trim_end());
            }
            None => {
                info!("Interactive session; type 'exit' or 'quit' to leave");
                let stdin = io::stdin();
                let mut stdout = io::stdout();
                run_session(self.client.as_ref(), stdin.lock(), &mut stdout)?;
            }
        }
        Ok(())
    }
}

fn decode_questionnaire(bytes: Vec<u8>) -> Result<String, AppError> {
    String::from_utf8(bytes)
        .map_err(|e| AppError::Input(format!("questionnaire is not valid UTF-8: {}", e)))
}

fn read_questionnaire_file(path: &Path) -> Result<String, AppError> {
    let bytes = fs::read(path).map_err(|e| {
        AppError::User(format!("Cannot read questionnaire {}: {}", path.display(), e))
    })?;
    decode_questionnaire(bytes)
}

fn read_stdin() -> Result<String, AppError> {
    let mut bytes = Vec::new();
    io::stdin().read_to_end(&mut bytes)?;
    decode_questionnaire(bytes)
}
