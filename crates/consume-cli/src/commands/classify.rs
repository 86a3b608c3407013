//! Classify command

use clap::Args;
use consume_clis::clis::geth::geth_exception_mapper;

use crate::{output::Output, CliError};

/// Map client error text onto a canonical exception kind
#[derive(Debug, Args)]
pub struct ClassifyCommand {
    /// Error text as printed by the client
    pub text: String,
}

impl ClassifyCommand {
    pub fn execute(self, json: bool) -> Result<(), CliError> {
        let mapper = geth_exception_mapper();
        let classification = mapper.classify(&self.text);
        let label = classification.to_string();

        Output::new(json)
            .field("client", mapper.table().client())
            .field("classification", &label)
            .field_bool("mapped", classification.is_mapped())
            .message(&label)
            .print();

        Ok(())
    }
}
