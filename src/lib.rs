pub mod app;
pub mod cli;
pub mod evaluation;
pub mod llm;
pub mod supporting_file;
pub mod utils;

#[cfg(test)]
pub mod test_utils;
